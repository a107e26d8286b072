/// Property-based tests for the Hangman engine using proptest
///
/// These tests verify the game rules hold across randomly generated
/// words and guess sequences, not just the handful of hand-picked
/// scenarios in the unit tests.
use ferrymail::games::{GameError, GameStatus, HangmanGame};
use proptest::prelude::*;

// Strategy to generate a valid target word (lowercase letters, 1-12 chars)
fn word_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::char::range('a', 'z'), 1..=12)
        .prop_map(|chars| chars.into_iter().collect())
}

// Strategy to generate a phrase of 1-3 words
fn phrase_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(word_strategy(), 1..=3).prop_map(|words| words.join(" "))
}

// Strategy to generate a sequence of letter guesses
fn guess_sequence_strategy() -> impl Strategy<Value = Vec<char>> {
    prop::collection::vec(prop::char::range('a', 'z'), 0..=40)
}

fn new_game(word: &str, tier: u8) -> HangmanGame {
    match HangmanGame::new(1, 2, word, None, tier) {
        Ok(game) => game,
        Err(err) => panic!("game creation failed for {word:?}: {err}"),
    }
}

proptest! {
    #[test]
    fn wrong_guess_count_never_decreases_or_exceeds_tier(
        word in phrase_strategy(),
        guesses in guess_sequence_strategy(),
    ) {
        let mut game = new_game(&word, 6);
        let mut previous = game.wrong_guess_count;

        for letter in guesses {
            let _ = game.guess_letter(letter);
            prop_assert!(game.wrong_guess_count >= previous);
            prop_assert!(game.wrong_guess_count <= game.allowed_wrong_guesses);
            previous = game.wrong_guess_count;
        }
    }

    #[test]
    fn terminal_games_reject_every_further_guess(
        word in word_strategy(),
        guesses in guess_sequence_strategy(),
        extra in prop::char::range('a', 'z'),
    ) {
        let mut game = new_game(&word, 6);

        for letter in guesses {
            let _ = game.guess_letter(letter);
        }

        if game.status != GameStatus::InProgress {
            let snapshot = game.masked_word();
            let wrong_before = game.wrong_guess_count;

            prop_assert!(matches!(
                game.guess_letter(extra),
                Err(GameError::InvalidState)
            ));
            prop_assert!(matches!(
                game.guess_word("anything"),
                Err(GameError::InvalidState)
            ));

            prop_assert_eq!(game.masked_word(), snapshot);
            prop_assert_eq!(game.wrong_guess_count, wrong_before);
        }
    }

    #[test]
    fn masked_word_shape_always_matches_target(
        word in phrase_strategy(),
        guesses in guess_sequence_strategy(),
    ) {
        let mut game = new_game(&word, 9);

        for letter in guesses {
            let _ = game.guess_letter(letter);
        }

        let masked = game.masked_word();
        prop_assert_eq!(masked.chars().count(), word.chars().count());
        for (masked_char, target_char) in masked.chars().zip(word.chars()) {
            if target_char == ' ' {
                prop_assert_eq!(masked_char, ' ');
            } else {
                prop_assert!(masked_char == '_' || masked_char == target_char);
            }
        }
    }

    #[test]
    fn guessing_every_letter_of_the_word_wins_within_budget(
        word in prop::collection::vec(prop::char::range('a', 'f'), 1..=6)
            .prop_map(|chars| chars.into_iter().collect::<String>()),
    ) {
        // Words drawn from a 6-letter alphabet cannot exhaust a 9-guess budget.
        let mut game = new_game(&word, 9);
        for letter in 'a'..='f' {
            let _ = game.guess_letter(letter);
        }
        prop_assert_eq!(game.status, GameStatus::Won);
        prop_assert_eq!(game.masked_word(), word);
    }

    #[test]
    fn repeated_guess_changes_nothing(
        word in word_strategy(),
        letter in prop::char::range('a', 'z'),
    ) {
        let mut game = new_game(&word, 6);
        let _ = game.guess_letter(letter);

        let masked = game.masked_word();
        let wrong = game.wrong_guess_count;
        let status = game.status;

        if status == GameStatus::InProgress {
            prop_assert!(matches!(
                game.guess_letter(letter),
                Err(GameError::AlreadyGuessed(_))
            ));
            prop_assert_eq!(game.masked_word(), masked);
            prop_assert_eq!(game.wrong_guess_count, wrong);
            prop_assert_eq!(game.status, status);
        }
    }

    #[test]
    fn correct_word_guess_always_wins_in_progress_games(
        word in phrase_strategy(),
        wrong_guesses in 0u8..6,
    ) {
        let mut game = new_game(&word, 6);

        // Burn some wrong guesses with letters the word cannot contain.
        let mut burned = 0;
        for letter in 'a'..='z' {
            if burned == wrong_guesses {
                break;
            }
            if !word.contains(letter) {
                let _ = game.guess_letter(letter);
                burned += 1;
            }
        }

        if game.status == GameStatus::InProgress {
            prop_assert!(game.guess_word(&word).is_ok());
            prop_assert_eq!(game.status, GameStatus::Won);
            prop_assert_eq!(game.masked_word(), word);
        }
    }
}
