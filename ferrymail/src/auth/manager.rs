//! Authentication manager implementation.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::{PgPool, Row};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use super::{
    errors::{AuthError, AuthResult},
    models::{AccessTokenClaims, LoginRequest, RegisterRequest, SessionTokens, User, UserId},
};

/// Authentication manager
#[derive(Clone)]
pub struct AuthManager {
    pool: Arc<PgPool>,
    pepper: String,
    jwt_secret: String,
    access_token_duration: Duration,
    refresh_token_duration: Duration,
}

impl AuthManager {
    /// Create a new authentication manager
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `pepper` - Server-side pepper for password hashing
    /// * `jwt_secret` - Secret key for JWT signing
    pub fn new(pool: Arc<PgPool>, pepper: String, jwt_secret: String) -> Self {
        Self {
            pool,
            pepper,
            jwt_secret,
            access_token_duration: Duration::minutes(15),
            refresh_token_duration: Duration::days(7),
        }
    }

    /// Register a new user
    ///
    /// # Errors
    ///
    /// * `AuthError::UsernameTaken` - Username already exists
    /// * `AuthError::InvalidUsername` - Username format invalid
    /// * `AuthError::WeakPassword` - Password too weak
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<User> {
        self.validate_username(&request.username)?;
        self.validate_password(&request.password)?;

        let existing_user = sqlx::query("SELECT id FROM users WHERE username = $1")
            .bind(&request.username)
            .fetch_optional(self.pool.as_ref())
            .await?;

        if existing_user.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = self.hash_password(&request.password)?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, display_name)
            VALUES ($1, $2, $3)
            RETURNING id, username, display_name, is_active, is_admin, created_at, last_login
            "#,
        )
        .bind(&request.username)
        .bind(&password_hash)
        .bind(&request.display_name)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| match &e {
            // Two concurrent registrations can both pass the SELECT above;
            // the loser hits the unique index on username.
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AuthError::UsernameTaken
            }
            _ => AuthError::Database(e),
        })?;

        Ok(Self::user_from_row(&row))
    }

    /// Login a user
    ///
    /// # Arguments
    ///
    /// * `request` - Login request with username and password
    /// * `device_fingerprint` - Device fingerprint (User-Agent hash)
    ///
    /// # Errors
    ///
    /// * `AuthError::UserNotFound` - User doesn't exist
    /// * `AuthError::InvalidPassword` - Incorrect password
    /// * `AuthError::AccountDeactivated` - User is deactivated
    pub async fn login(
        &self,
        request: LoginRequest,
        device_fingerprint: String,
    ) -> AuthResult<(User, SessionTokens)> {
        let user_row = sqlx::query(
            r#"
            SELECT id, username, password_hash, display_name, is_active, is_admin,
                   created_at, last_login
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(&request.username)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(AuthError::UserNotFound)?;

        let password_hash: String = user_row.get("password_hash");
        self.verify_password(&request.password, &password_hash)?;

        let user = Self::user_from_row(&user_row);
        if !user.is_active {
            return Err(AuthError::AccountDeactivated);
        }

        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(user.id)
            .execute(self.pool.as_ref())
            .await?;

        let tokens = self
            .create_session(user.id, &user.username, user.is_admin, device_fingerprint)
            .await?;

        Ok((user, tokens))
    }

    /// Create a new session with access and refresh tokens
    async fn create_session(
        &self,
        user_id: UserId,
        username: &str,
        is_admin: bool,
        device_fingerprint: String,
    ) -> AuthResult<SessionTokens> {
        let access_token = self.generate_access_token(user_id, username, is_admin)?;
        let refresh_token = Uuid::new_v4().to_string();

        let expires_at = Utc::now() + self.refresh_token_duration;
        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, device_fingerprint, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&refresh_token)
        .bind(user_id)
        .bind(&device_fingerprint)
        .bind(expires_at.naive_utc())
        .execute(self.pool.as_ref())
        .await?;

        Ok(SessionTokens {
            access_token,
            refresh_token,
        })
    }

    /// Refresh access token using refresh token
    ///
    /// The old refresh token is invalidated and replaced (rotation), and the
    /// device fingerprint must match the one recorded at login.
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidRefreshToken` - Refresh token not found or wrong device
    /// * `AuthError::SessionExpired` - Refresh token expired
    pub async fn refresh_token(
        &self,
        refresh_token: String,
        device_fingerprint: String,
    ) -> AuthResult<SessionTokens> {
        let session_row = sqlx::query(
            r#"
            SELECT token, user_id, device_fingerprint, created_at, expires_at
            FROM sessions
            WHERE token = $1
            "#,
        )
        .bind(&refresh_token)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(AuthError::InvalidRefreshToken)?;

        let expires_at = session_row
            .get::<chrono::NaiveDateTime, _>("expires_at")
            .and_utc();
        if expires_at < Utc::now() {
            sqlx::query("DELETE FROM sessions WHERE token = $1")
                .bind(&refresh_token)
                .execute(self.pool.as_ref())
                .await?;
            return Err(AuthError::SessionExpired);
        }

        // Constant-time compare so fingerprint probing leaks nothing.
        let stored_fingerprint: String = session_row.get("device_fingerprint");
        if stored_fingerprint
            .as_bytes()
            .ct_eq(device_fingerprint.as_bytes())
            .unwrap_u8()
            == 0
        {
            return Err(AuthError::InvalidRefreshToken);
        }

        let user_id: UserId = session_row.get("user_id");
        let user_row = sqlx::query(
            "SELECT id, username, display_name, is_active, is_admin, created_at, last_login
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(AuthError::UserNotFound)?;

        let username: String = user_row.get("username");
        let is_admin: bool = user_row.get("is_admin");

        // Rotation: the old token dies with this refresh.
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(&refresh_token)
            .execute(self.pool.as_ref())
            .await?;

        self.create_session(user_id, &username, is_admin, device_fingerprint)
            .await
    }

    /// Logout user by invalidating refresh token
    pub async fn logout(&self, refresh_token: String) -> AuthResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(&refresh_token)
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }

    /// Verify an access token and return its decoded claims
    pub fn verify_access_token(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        let token_data = decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Fetch a user by id
    pub async fn get_user(&self, user_id: UserId) -> AuthResult<User> {
        let row = sqlx::query(
            "SELECT id, username, display_name, is_active, is_admin, created_at, last_login
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(AuthError::UserNotFound)?;

        Ok(Self::user_from_row(&row))
    }

    fn user_from_row(row: &sqlx::postgres::PgRow) -> User {
        User {
            id: row.get("id"),
            username: row.get("username"),
            display_name: row.get("display_name"),
            is_active: row.get("is_active"),
            is_admin: row.get("is_admin"),
            created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
            last_login: row
                .get::<Option<chrono::NaiveDateTime>, _>("last_login")
                .map(|dt| dt.and_utc()),
        }
    }

    /// Hash password with Argon2id + pepper
    fn hash_password(&self, password: &str) -> AuthResult<String> {
        let peppered = format!("{}{}", password, self.pepper);
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        Ok(argon2
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|_| AuthError::HashingFailed)?
            .to_string())
    }

    /// Verify password against hash
    fn verify_password(&self, password: &str, hash: &str) -> AuthResult<()> {
        let peppered = format!("{}{}", password, self.pepper);
        let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidPassword)?;
        let argon2 = Argon2::default();

        argon2
            .verify_password(peppered.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidPassword)
    }

    /// Generate JWT access token
    fn generate_access_token(
        &self,
        user_id: UserId,
        username: &str,
        is_admin: bool,
    ) -> AuthResult<String> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: user_id,
            username: username.to_string(),
            is_admin,
            exp: (now + self.access_token_duration).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Validate username format
    fn validate_username(&self, username: &str) -> AuthResult<()> {
        let len = username.len();
        if !(3..=20).contains(&len) {
            return Err(AuthError::InvalidUsername(
                "Username must be 3-20 characters".to_string(),
            ));
        }

        if !username.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(AuthError::InvalidUsername(
                "Username can only contain letters, numbers, and underscores".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate password strength
    fn validate_password(&self, password: &str) -> AuthResult<()> {
        if password.len() < 8 {
            return Err(AuthError::WeakPassword(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
        let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());

        if !has_digit || !has_uppercase || !has_lowercase {
            return Err(AuthError::WeakPassword(
                "Password must contain at least one number, one uppercase and one lowercase letter"
                    .to_string(),
            ));
        }

        Ok(())
    }
}
