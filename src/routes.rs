// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{analytics, attempt, auth, generation, quiz},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, generation, quizzes, attempts, analytics).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);
    let require_auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Guests can try generation; nothing is stored.
    let generate_routes = Router::new()
        .route("/", post(generation::preview_questions))
        .layer(upload_limit.clone());

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes).post(quiz::create_quiz))
        .route("/{id}", get(quiz::get_quiz).delete(quiz::delete_quiz))
        .route("/{id}/questions", post(quiz::save_question))
        .route(
            "/{id}/generate",
            post(generation::generate_into_quiz).layer(upload_limit),
        )
        .layer(require_auth.clone());

    let attempt_routes = Router::new()
        .route("/", get(attempt::list_attempts).post(attempt::submit_attempt))
        .layer(require_auth.clone());

    let analytics_routes = Router::new()
        .route("/", get(analytics::get_analytics))
        .layer(require_auth);

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/generate", generate_routes)
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/attempts", attempt_routes)
        .nest("/api/analytics", analytics_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
