// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{games, player, results, sessions},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges the sub-routers (games, results, player, sessions).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (stores and the session registry).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let game_routes = Router::new()
        .route("/", get(games::list_games).post(games::create_game))
        .route("/{id}", get(games::get_game).delete(games::delete_game))
        .route("/{id}/ranking", get(games::get_ranking))
        .route("/{id}/sessions", post(sessions::start_session));

    let session_routes = Router::new()
        .route(
            "/{id}",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/{id}/answers", post(sessions::submit_answer))
        .route("/{id}/restart", post(sessions::restart_session));

    let result_routes = Router::new().route(
        "/",
        get(results::list_results).post(results::record_result),
    );

    Router::new()
        .nest("/api/games", game_routes)
        .nest("/api/sessions", session_routes)
        .nest("/api/results", result_routes)
        .route("/api/share/{code}", get(games::get_by_share_code))
        .route("/api/player", get(player::get_player).put(player::set_player))
        // Global Middleware (outermost first)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
