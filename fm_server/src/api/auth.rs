//! Authentication API handlers.
//!
//! This module provides HTTP REST endpoints for user authentication including:
//! - User registration with username, password, and display name
//! - Login with username/password
//! - Logout to invalidate refresh tokens
//! - Token refresh for obtaining new access tokens
//!
//! All endpoints return JSON responses with either authentication tokens or error messages.
//!
//! # Examples
//!
//! Register a new user:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/auth/register \
//!   -H "Content-Type: application/json" \
//!   -d '{"username": "ferry", "password": "Pass1234", "display_name": "Ferry"}'
//! ```
//!
//! Login:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/auth/login \
//!   -H "Content-Type: application/json" \
//!   -d '{"username": "ferry", "password": "Pass1234"}'
//! ```

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::USER_AGENT},
};
use ferrymail::auth::{LoginRequest, RegisterRequest};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{logging, metrics};

use super::{AppState, ErrorResponse};

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub username: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: i64,
    pub username: String,
}

/// Sessions are bound to the device that opened them: the refresh token
/// only works together with the same User-Agent hash.
fn device_fingerprint(headers: &HeaderMap) -> String {
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    hex::encode(Sha256::digest(user_agent.as_bytes()))
}

/// Register a new user account and automatically log them in.
///
/// Creates a new user with the provided credentials and immediately generates
/// authentication tokens for the new account.
///
/// # Request Body
///
/// ```json
/// {
///   "username": "ferry",
///   "password": "SecurePass123",
///   "display_name": "Ferry"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Username already taken, weak password, or invalid input
/// - `429 Too Many Requests`: Rate limited
/// - `500 Internal Server Error`: Server error during registration or login
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<AuthResponse>, (StatusCode, Json<ErrorResponse>)> {
    if !state.auth_rate_limiter.check(&payload.username) {
        metrics::rate_limit_hits_total("register");
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            ErrorResponse::new("Too many attempts, try again later"),
        ));
    }

    let request = RegisterRequest {
        username: payload.username.clone(),
        password: payload.password.clone(),
        display_name: payload.display_name,
    };

    match state.auth_manager.register(request).await {
        Ok(_user) => {
            metrics::registrations_total();

            // Login to generate tokens
            let login_request = LoginRequest {
                username: payload.username,
                password: payload.password,
            };

            match state
                .auth_manager
                .login(login_request, device_fingerprint(&headers))
                .await
            {
                Ok((user, tokens)) => Ok(Json(AuthResponse {
                    access_token: tokens.access_token,
                    refresh_token: tokens.refresh_token,
                    user_id: user.id,
                    username: user.username,
                })),
                Err(e) => Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(e.client_message()),
                )),
            }
        }
        Err(e) => Err((
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(e.client_message()),
        )),
    }
}

/// Authenticate a user and generate session tokens.
///
/// Validates user credentials and returns JWT access and refresh tokens.
/// Access tokens are short-lived (15 minutes) while refresh tokens last
/// 7 days and rotate on every refresh.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials or deactivated account
/// - `429 Too Many Requests`: Rate limited
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, (StatusCode, Json<ErrorResponse>)> {
    if !state.auth_rate_limiter.check(&payload.username) {
        metrics::rate_limit_hits_total("login");
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            ErrorResponse::new("Too many attempts, try again later"),
        ));
    }

    let request = LoginRequest {
        username: payload.username.clone(),
        password: payload.password,
    };

    match state
        .auth_manager
        .login(request, device_fingerprint(&headers))
        .await
    {
        Ok((user, tokens)) => {
            metrics::login_attempts_total(true);
            Ok(Json(AuthResponse {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                user_id: user.id,
                username: user.username,
            }))
        }
        Err(e) => {
            metrics::login_attempts_total(false);
            logging::log_security_event(
                "failed_login",
                None,
                &format!("Failed login for '{}'", payload.username),
            );
            Err((
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new(e.client_message()),
            ))
        }
    }
}

/// Logout and invalidate the current refresh token.
///
/// Terminates the user's session by invalidating their refresh token in the
/// database. The access token will continue to work until it expires
/// naturally (15 minutes).
///
/// # Request Body
///
/// ```json
/// "550e8400-e29b-41d4-a716-446655440000"
/// ```
pub async fn logout(
    State(state): State<AppState>,
    Json(refresh_token): Json<String>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    match state.auth_manager.logout(refresh_token).await {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err((
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(e.client_message()),
        )),
    }
}

/// Refresh an expired access token using a valid refresh token.
///
/// The old refresh token is invalidated and replaced with a new one
/// (rotation). The device fingerprint must match the one recorded at login.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid, expired, revoked token or wrong device
/// - `500 Internal Server Error`: Server error during token generation
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(old_refresh_token): Json<String>,
) -> Result<Json<AuthResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state
        .auth_manager
        .refresh_token(old_refresh_token, device_fingerprint(&headers))
        .await
    {
        Ok(tokens) => match state.auth_manager.verify_access_token(&tokens.access_token) {
            Ok(claims) => Ok(Json(AuthResponse {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                user_id: claims.sub,
                username: claims.username,
            })),
            Err(e) => Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(e.client_message()),
            )),
        },
        Err(e) => Err((
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new(e.client_message()),
        )),
    }
}
