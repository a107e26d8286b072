//! Integration tests for registration against PostgreSQL.
//!
//! Focuses on username uniqueness, including the case where two
//! registrations race each other past the duplicate pre-check.

use std::sync::Arc;

use ferrymail::auth::{AuthError, AuthManager, RegisterRequest, UserId};
use ferrymail::db::{Database, DatabaseConfig};
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

fn test_auth_manager(pool: &Arc<PgPool>) -> AuthManager {
    AuthManager::new(
        pool.clone(),
        "test_pepper".to_string(),
        "test_jwt_secret".to_string(),
    )
}

fn register_request(username: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        password: "TestPass123".to_string(),
        display_name: username.to_string(),
    }
}

async fn cleanup_users(pool: &PgPool, ids: &[UserId]) {
    let _ = sqlx::query("DELETE FROM users WHERE id = ANY($1)")
        .bind(ids)
        .execute(pool)
        .await;
}

#[tokio::test]
#[serial]
async fn duplicate_username_is_rejected() {
    let pool = setup_test_db().await;
    let auth = test_auth_manager(&pool);

    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let username = format!("auth_dup_{nanos}");

    let user = auth
        .register(register_request(&username))
        .await
        .expect("first registration succeeds");

    let second = auth.register(register_request(&username)).await;
    assert!(matches!(second, Err(AuthError::UsernameTaken)));

    cleanup_users(&pool, &[user.id]).await;
}

#[tokio::test]
#[serial]
async fn concurrent_registrations_of_one_username_leave_one_winner() {
    let pool = setup_test_db().await;
    let auth = test_auth_manager(&pool);

    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let username = format!("auth_race_{nanos}");

    // Both can pass the duplicate pre-check; the loser must still come
    // back as UsernameTaken, never as a bare database error.
    let (first, second) = tokio::join!(
        auth.register(register_request(&username)),
        auth.register(register_request(&username)),
    );

    let mut ids = Vec::new();
    let mut taken = 0;
    for outcome in [first, second] {
        match outcome {
            Ok(user) => ids.push(user.id),
            Err(AuthError::UsernameTaken) => taken += 1,
            Err(other) => panic!("unexpected registration error: {other}"),
        }
    }

    assert_eq!(ids.len(), 1, "exactly one registration wins");
    assert_eq!(taken, 1, "the loser sees UsernameTaken");

    cleanup_users(&pool, &ids).await;
}
