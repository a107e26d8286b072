//! Authentication module providing user registration, login, and session management.
//!
//! This module implements:
//! - Argon2id password hashing with server-side pepper
//! - JWT access tokens (15-minute expiry)
//! - Rotating refresh tokens (7-day expiry)
//! - Device fingerprint checks on token refresh
//!
//! ## Example
//!
//! ```no_run
//! use ferrymail::auth::{AuthManager, RegisterRequest};
//! use ferrymail::db::Database;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let auth = AuthManager::new(
//!         Arc::new(db.pool().clone()),
//!         "secret_pepper".to_string(),
//!         "jwt_secret".to_string(),
//!     );
//!
//!     let request = RegisterRequest {
//!         username: "ferry".to_string(),
//!         password: "SecurePass123".to_string(),
//!         display_name: "Ferry".to_string(),
//!     };
//!
//!     let user = auth.register(request).await?;
//!     println!("Registered user: {}", user.username);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{AuthError, AuthResult};
pub use manager::AuthManager;
pub use models::{
    AccessTokenClaims, LoginRequest, RegisterRequest, Session, SessionTokens, User, UserId,
};
