//! # FerryMail
//!
//! The shared library behind FerryMail, a private two-person web app with a
//! mailbox, countdown timers, a bucket list, a mood journal, and two games.
//!
//! Each feature lives in its own module with the same shape: `models` for the
//! serde types, `errors` for a `thiserror` enum with client-safe messages,
//! and a manager struct over a shared PostgreSQL pool that owns the feature's
//! queries. The Hangman engine in [`games`] is a pure state machine with no
//! I/O, so its rules can be tested without a database.
//!
//! ## Core Modules
//!
//! - [`auth`]: Registration, login, JWT access tokens, rotating refresh tokens
//! - [`db`]: Connection pooling and embedded migrations
//! - [`mailbox`]: Private messages between the two users
//! - [`countdown`]: Shared countdowns towards future moments
//! - [`bucket`]: The shared bucket list
//! - [`lovelog`]: The mood journal
//! - [`games`]: Hangman and Two Truths and a Lie
//!
//! ## Example
//!
//! ```
//! use ferrymail::games::HangmanGame;
//!
//! let game = HangmanGame::new(1, 2, "ferry", Some("it floats".to_string()), 6).unwrap();
//! assert_eq!(game.masked_word(), "_____");
//! ```

pub mod auth;
pub mod bucket;
pub mod countdown;
pub mod db;
pub mod games;
pub mod lovelog;
pub mod mailbox;

pub use auth::{AuthManager, UserId};
pub use bucket::BucketManager;
pub use countdown::CountdownManager;
pub use db::Database;
pub use games::GameManager;
pub use lovelog::LoveLogManager;
pub use mailbox::MailboxManager;
