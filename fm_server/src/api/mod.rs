//! HTTP API for the FerryMail server.
//!
//! This module provides the complete REST API for the two-person FerryMail
//! app. It handles authentication, the mailbox, countdowns, the bucket
//! list, the love log, and both games.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: Async web framework
//! - **Tower**: Middleware for CORS and request correlation
//! - **JWT**: Token-based authentication with access/refresh tokens
//!
//! # Modules
//!
//! - [`auth`]: User authentication (register, login, logout, token refresh)
//! - [`mailbox`]: Send and read messages
//! - [`countdowns`]: Shared countdowns
//! - [`bucket`]: The shared bucket list
//! - [`lovelog`]: The mood journal
//! - [`games`]: Hangman and Two Truths and a Lie
//! - [`middleware`]: Authentication middleware for protected endpoints
//!
//! # Endpoints Overview
//!
//! ## Authentication (No Auth Required)
//! - `POST /api/v1/auth/register` - Register new user
//! - `POST /api/v1/auth/login` - Login with credentials
//!
//! ## Everything else (Auth Required)
//! - `POST /api/v1/auth/logout` / `POST /api/v1/auth/refresh`
//! - `/api/v1/mailbox/*`, `/api/v1/countdowns*`, `/api/v1/bucket*`,
//!   `/api/v1/lovelog*`, `/api/v1/games/*`
//!
//! ## Health Check
//! - `GET /health` - Server health status
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use fm_server::api::{AppState, create_router};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let state: AppState = unimplemented!();
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod auth;
pub mod bucket;
pub mod countdowns;
pub mod games;
pub mod lovelog;
pub mod mailbox;
pub mod middleware;
pub mod rate_limiter;
pub mod request_id;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
};
use ferrymail::{
    auth::AuthManager, bucket::BucketManager, countdown::CountdownManager, games::GameManager,
    lovelog::LoveLogManager, mailbox::MailboxManager,
};
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use rate_limiter::AuthRateLimiter;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request (cheap due to Arc wrappers) and
/// provides access to the feature managers.
#[derive(Clone)]
pub struct AppState {
    pub auth_manager: Arc<AuthManager>,
    pub mailbox_manager: Arc<MailboxManager>,
    pub countdown_manager: Arc<CountdownManager>,
    pub bucket_manager: Arc<BucketManager>,
    pub lovelog_manager: Arc<LoveLogManager>,
    pub game_manager: Arc<GameManager>,
    pub auth_rate_limiter: Arc<AuthRateLimiter>,
    pub pool: Arc<PgPool>,
}

/// JSON error body returned by every failing endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Json<Self> {
        Json(Self {
            error: error.into(),
        })
    }
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Endpoint Summary
///
/// ```text
/// GET  /health                                    - Health check (public)
/// POST /api/v1/auth/register                      - Register user (public)
/// POST /api/v1/auth/login                         - Login (public)
/// POST /api/v1/auth/logout                        - Logout (auth required)
/// POST /api/v1/auth/refresh                       - Refresh token (auth required)
/// POST /api/v1/mailbox/messages                   - Send message
/// GET  /api/v1/mailbox/inbox                      - List inbox
/// GET  /api/v1/mailbox/sent                       - List sent
/// POST /api/v1/mailbox/messages/{id}/read         - Mark read
/// GET  /api/v1/mailbox/unread                     - Unread count
/// POST /api/v1/countdowns                         - Create countdown
/// GET  /api/v1/countdowns                         - List countdowns
/// DELETE /api/v1/countdowns/{id}                  - Delete countdown
/// POST /api/v1/bucket                             - Add bucket item
/// GET  /api/v1/bucket                             - List bucket items
/// POST /api/v1/bucket/{id}/complete               - Complete item
/// POST /api/v1/bucket/{id}/reopen                 - Reopen item
/// DELETE /api/v1/bucket/{id}                      - Delete item
/// POST /api/v1/lovelog                            - Create entry
/// GET  /api/v1/lovelog                            - List entries
/// DELETE /api/v1/lovelog/{id}                     - Delete entry
/// POST /api/v1/games/hangman                      - Create hangman game
/// GET  /api/v1/games/hangman                      - List caller's games
/// GET  /api/v1/games/hangman/stats                - Win/loss stats
/// GET  /api/v1/games/hangman/{id}                 - View game
/// POST /api/v1/games/hangman/{id}/guess-letter    - Guess a letter
/// POST /api/v1/games/hangman/{id}/guess-word      - Guess the word
/// POST /api/v1/games/hangman/{id}/withdraw        - Withdraw game
/// POST /api/v1/games/two-truths                   - Create round
/// GET  /api/v1/games/two-truths                   - List caller's rounds
/// GET  /api/v1/games/two-truths/stats             - Guess stats
/// GET  /api/v1/games/two-truths/{id}              - View round
/// POST /api/v1/games/two-truths/{id}/guess        - Guess the lie
/// ```
pub fn create_router(state: AppState) -> Router {
    let v1_routes = create_v1_router(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create API v1 router with all versioned endpoints.
///
/// This allows for future API evolution (v2, v3, etc.) while maintaining
/// backward compatibility with existing clients.
fn create_v1_router(state: AppState) -> Router<AppState> {
    // Public routes (no authentication middleware)
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    // Protected routes (require authentication middleware)
    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/mailbox/messages", post(mailbox::send_message))
        .route("/mailbox/inbox", get(mailbox::list_inbox))
        .route("/mailbox/sent", get(mailbox::list_sent))
        .route("/mailbox/messages/{id}/read", post(mailbox::mark_read))
        .route("/mailbox/unread", get(mailbox::unread_count))
        .route(
            "/countdowns",
            post(countdowns::create_countdown).get(countdowns::list_countdowns),
        )
        .route("/countdowns/{id}", delete(countdowns::delete_countdown))
        .route("/bucket", post(bucket::add_item).get(bucket::list_items))
        .route("/bucket/{id}/complete", post(bucket::complete_item))
        .route("/bucket/{id}/reopen", post(bucket::reopen_item))
        .route("/bucket/{id}", delete(bucket::delete_item))
        .route(
            "/lovelog",
            post(lovelog::create_entry).get(lovelog::list_entries),
        )
        .route("/lovelog/{id}", delete(lovelog::delete_entry))
        .route(
            "/games/hangman",
            post(games::create_hangman).get(games::list_hangman),
        )
        .route("/games/hangman/stats", get(games::hangman_stats))
        .route("/games/hangman/{id}", get(games::get_hangman))
        .route("/games/hangman/{id}/guess-letter", post(games::guess_letter))
        .route("/games/hangman/{id}/guess-word", post(games::guess_word))
        .route("/games/hangman/{id}/withdraw", post(games::withdraw_hangman))
        .route(
            "/games/two-truths",
            post(games::create_two_truths).get(games::list_two_truths),
        )
        .route("/games/two-truths/stats", get(games::two_truths_stats))
        .route("/games/two-truths/{id}", get(games::get_two_truths))
        .route("/games/two-truths/{id}/guess", post(games::guess_two_truths))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new().merge(public_routes).merge(protected_routes)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Checks database connectivity with a simple query and reports overall
/// status with the matching HTTP status code.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","database":true,"version":"1.0.0","timestamp":"2026-08-25T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = sqlx::query("SELECT 1")
        .fetch_one(&*state.pool)
        .await
        .is_ok();

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
