//! Integration tests for the games subsystem against PostgreSQL.
//!
//! Covers hangman persistence (create, guess, withdraw, stats) and Two
//! Truths and a Lie rounds, including the authorization rules the managers
//! enforce on top of the engines.

use std::sync::Arc;

use ferrymail::auth::{AuthManager, RegisterRequest, UserId};
use ferrymail::db::{Database, DatabaseConfig};
use ferrymail::games::{GameError, GameManager, GameStatus, RoundStatus};
use serial_test::serial;
use sqlx::PgPool;

/// Helper to create a test database pool
async fn setup_test_db() -> Arc<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://postgres@localhost/ferrymail_test".to_string());

    let config = DatabaseConfig {
        database_url,
        max_connections: 5,
        min_connections: 1,
        connection_timeout_secs: 5,
        idle_timeout_secs: 300,
        max_lifetime_secs: 1800,
    };

    let db = Database::new(&config)
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Failed to run migrations");

    Arc::new(db.pool().clone())
}

async fn register_pair(pool: &Arc<PgPool>, prefix: &str) -> (UserId, UserId) {
    let auth = AuthManager::new(
        pool.clone(),
        "test_pepper".to_string(),
        "test_jwt_secret".to_string(),
    );

    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let mut ids = Vec::with_capacity(2);
    for n in 0..2 {
        let username = format!("{prefix}{n}_{nanos}");
        let user = auth
            .register(RegisterRequest {
                username: username.clone(),
                password: "TestPass123".to_string(),
                display_name: username,
            })
            .await
            .expect("Failed to register test user");
        ids.push(user.id);
    }

    (ids[0], ids[1])
}

async fn cleanup_users(pool: &PgPool, ids: &[UserId]) {
    for table in ["hangman_games", "two_truths_rounds"] {
        let _ = sqlx::query(&format!(
            "DELETE FROM {table} WHERE creator_id = ANY($1) OR recipient_id = ANY($1)"
        ))
        .bind(ids)
        .execute(pool)
        .await;
    }
    let _ = sqlx::query("DELETE FROM users WHERE id = ANY($1)")
        .bind(ids)
        .execute(pool)
        .await;
}

#[tokio::test]
#[serial]
async fn hangman_game_persists_and_plays_to_a_win() {
    let pool = setup_test_db().await;
    let (creator, recipient) = register_pair(&pool, "hm_win").await;
    let games = GameManager::new(pool.clone());

    let created = games
        .create_hangman(
            creator,
            recipient,
            "cat",
            Some("small and furry".to_string()),
            6,
        )
        .await
        .expect("Failed to create game");
    assert!(created.id > 0);
    assert_eq!(created.status, GameStatus::InProgress);
    assert_eq!(created.masked_word, "___");

    let after_c = games
        .guess_letter(created.id, recipient, 'c')
        .await
        .expect("Guess failed");
    assert_eq!(after_c.masked_word, "c__");
    assert_eq!(after_c.wrong_guess_count, 0);

    let after_z = games
        .guess_letter(created.id, recipient, 'z')
        .await
        .expect("Guess failed");
    assert_eq!(after_z.wrong_guess_count, 1);
    assert_eq!(after_z.remaining_guesses, 5);

    let won = games
        .guess_word(created.id, recipient, "cat")
        .await
        .expect("Word guess failed");
    assert_eq!(won.status, GameStatus::Won);
    assert_eq!(won.target_word.as_deref(), Some("cat"));

    // Terminal games reject further moves at the persistence layer too.
    let err = games
        .guess_letter(created.id, recipient, 'a')
        .await
        .expect_err("Terminal game accepted a guess");
    assert!(matches!(err, GameError::InvalidState));

    cleanup_users(&pool, &[creator, recipient]).await;
}

#[tokio::test]
#[serial]
async fn hangman_creator_cannot_guess_their_own_word() {
    let pool = setup_test_db().await;
    let (creator, recipient) = register_pair(&pool, "hm_auth").await;
    let games = GameManager::new(pool.clone());

    let created = games
        .create_hangman(creator, recipient, "boat", None, 9)
        .await
        .expect("Failed to create game");

    let err = games
        .guess_letter(created.id, creator, 'b')
        .await
        .expect_err("Creator was allowed to guess");
    assert!(matches!(err, GameError::Unauthorized));

    // The creator still sees the word; the recipient does not while playing.
    let creator_view = games
        .get_hangman(created.id, creator)
        .await
        .expect("Get failed");
    assert_eq!(creator_view.target_word.as_deref(), Some("boat"));

    let recipient_view = games
        .get_hangman(created.id, recipient)
        .await
        .expect("Get failed");
    assert!(recipient_view.target_word.is_none());

    cleanup_users(&pool, &[creator, recipient]).await;
}

#[tokio::test]
#[serial]
async fn hangman_withdraw_and_stats() {
    let pool = setup_test_db().await;
    let (creator, recipient) = register_pair(&pool, "hm_stats").await;
    let games = GameManager::new(pool.clone());

    let open = games
        .create_hangman(creator, recipient, "ferry", None, 6)
        .await
        .expect("Failed to create game");
    let withdrawn = games
        .create_hangman(creator, recipient, "harbor", None, 6)
        .await
        .expect("Failed to create game");

    let after = games
        .withdraw_hangman(withdrawn.id, creator)
        .await
        .expect("Withdraw failed");
    assert_eq!(after.status, GameStatus::Withdrawn);

    // Withdraw is terminal: a second withdraw is rejected.
    let err = games
        .withdraw_hangman(withdrawn.id, creator)
        .await
        .expect_err("Withdrew a withdrawn game");
    assert!(matches!(err, GameError::InvalidState));

    let stats = games.hangman_stats(creator).await.expect("Stats failed");
    assert_eq!(stats.in_progress, 1);
    assert_eq!(stats.withdrawn, 1);
    assert_eq!(stats.won, 0);
    assert_eq!(stats.lost, 0);

    let listed = games.list_hangman(creator).await.expect("List failed");
    let ids: Vec<_> = listed.iter().map(|g| g.id).collect();
    assert!(ids.contains(&open.id));
    assert!(ids.contains(&withdrawn.id));

    cleanup_users(&pool, &[creator, recipient]).await;
}

#[tokio::test]
#[serial]
async fn two_truths_round_guessing() {
    let pool = setup_test_db().await;
    let (creator, recipient) = register_pair(&pool, "tt").await;
    let games = GameManager::new(pool.clone());

    let round = games
        .create_two_truths(
            creator,
            recipient,
            ["I have sailed to Norway", "I once met a shark"],
            "I can juggle five oranges",
        )
        .await
        .expect("Failed to create round");
    assert_eq!(round.status, RoundStatus::Open);
    let lie_index = round.lie_index.expect("Creator view must show the lie");

    // The open round hides the lie from the recipient.
    let recipient_view = games
        .get_two_truths(round.id, recipient)
        .await
        .expect("Get failed");
    assert!(recipient_view.lie_index.is_none());

    // Creator cannot guess on their own round.
    let err = games
        .guess_two_truths(round.id, creator, 0)
        .await
        .expect_err("Creator was allowed to guess");
    assert!(matches!(err, GameError::Unauthorized));

    let updated = games
        .guess_two_truths(round.id, recipient, lie_index)
        .await
        .expect("Guess failed");
    assert_eq!(updated.status, RoundStatus::Guessed);
    assert_eq!(updated.guessed_correctly, Some(true));
    assert_eq!(updated.lie_index, Some(lie_index));

    // Only one guess per round.
    let err = games
        .guess_two_truths(round.id, recipient, 0)
        .await
        .expect_err("Second guess accepted");
    assert!(matches!(err, GameError::InvalidState));

    let stats = games
        .two_truths_stats(recipient)
        .await
        .expect("Stats failed");
    assert_eq!(stats.rounds_guessed, 1);
    assert_eq!(stats.correct_guesses, 1);

    cleanup_users(&pool, &[creator, recipient]).await;
}
