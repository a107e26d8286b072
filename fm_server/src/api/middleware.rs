//! Authentication middleware for protected endpoints.
//!
//! This module provides Axum middleware for JWT-based authentication.
//! The middleware extracts and validates JWT access tokens from the Authorization header,
//! then injects the authenticated user ID into request extensions for downstream handlers.
//!
//! # Extracting User ID
//!
//! In handler functions, extract the user ID from request extensions:
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//!
//! async fn protected_handler(Extension(user_id): Extension<i64>) -> String {
//!     format!("Authenticated as user {}", user_id)
//! }
//! # let _ = protected_handler;
//! ```

use axum::{
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use super::AppState;

/// Authentication middleware that validates JWT tokens and injects user ID.
///
/// Extracts the JWT access token from the `Authorization: Bearer <token>` header,
/// validates it using the AuthManager, and injects the user ID into request extensions.
///
/// # Behavior
///
/// - **Success**: Token valid, injects `user_id: i64` into request extensions
/// - **Missing header / invalid format / invalid token**: `401 Unauthorized`
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // Extract token from Authorization header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let token = match auth_header {
        Some(t) => t,
        None => return Err(StatusCode::UNAUTHORIZED),
    };

    // Verify token and get user ID
    match state.auth_manager.verify_access_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims.sub);
            Ok(next.run(request).await)
        }
        Err(_) => Err(StatusCode::UNAUTHORIZED),
    }
}
