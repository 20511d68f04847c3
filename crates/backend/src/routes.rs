use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;
use crate::{handlers, system};

/// All application routes.
///
/// Form rendering and submission stay public so respondents never need an
/// account; everything that touches owned data goes through `require_auth`.
pub fn configure_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES (PUBLIC)
        // ========================================
        .route(
            "/api/auth/register",
            post(system::handlers::auth::register),
        )
        .route("/api/auth/login", post(system::handlers::auth::login))
        .route("/api/auth/refresh", post(system::handlers::auth::refresh))
        .route("/api/auth/logout", post(system::handlers::auth::logout))
        // System auth routes (protected)
        .route(
            "/api/auth/me",
            get(system::handlers::auth::current_user)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // ========================================
        // BUSINESS ROUTES
        // ========================================
        // A001 Form handlers
        .route(
            "/api/forms",
            get(handlers::a001_form::list)
                .post(handlers::a001_form::create)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        .route(
            "/api/forms/client-email",
            get(handlers::a001_form::client_email)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // Public render endpoint for respondents
        .route("/api/forms/:id", get(handlers::a001_form::get_by_id))
        .route(
            "/api/forms/:id",
            put(handlers::a001_form::update)
                .delete(handlers::a001_form::delete)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // A002 Response handlers
        .route(
            "/api/forms/:id/responses",
            post(handlers::a002_response::submit),
        )
        // Legacy submission path kept for already-published forms; the
        // listing stays public alongside it
        .route(
            "/api/responses/:id",
            post(handlers::a002_response::submit).get(handlers::a002_response::list_by_form),
        )
        .with_state(state)
}
