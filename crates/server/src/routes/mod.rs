pub mod analysis;
pub mod champions;
pub mod games;
pub mod health;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::clients::chess_api::AnalysisClient;
use crate::clients::chess_com::ChessComClient;
use crate::clients::lichess::LichessClient;
use crate::config::Config;
use crate::registry::ChampionRegistry;
use crate::session::SessionStore;

/// Build the application router with all shared state attached.
pub fn router(
    config: Config,
    registry: ChampionRegistry,
    lichess: LichessClient,
    chess_com: ChessComClient,
    analysis_client: AnalysisClient,
    store: SessionStore,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Champions — specific routes before parameterized
        .route("/api/champions", get(champions::list_champions))
        .route("/api/champions/search", get(champions::search_champions))
        .route("/api/champions/{id}", get(champions::get_champion))
        .route("/api/champions/{id}/games", get(games::get_champion_games))
        .route("/api/champions/{id}/stats", get(champions::get_champion_stats))
        // Analysis sessions
        .route("/api/analysis/sessions", post(analysis::create_session))
        .route(
            "/api/analysis/sessions/{id}",
            get(analysis::get_session).delete(analysis::delete_session),
        )
        .route("/api/analysis/sessions/{id}/goto", post(analysis::goto))
        .route("/api/analysis/sessions/{id}/next", post(analysis::next_move))
        .route("/api/analysis/sessions/{id}/prev", post(analysis::prev_move))
        .route("/api/analysis/sessions/{id}/reset", post(analysis::reset_session))
        // Shared state
        .layer(Extension(registry))
        .layer(Extension(config))
        .layer(Extension(lichess))
        .layer(Extension(chess_com))
        .layer(Extension(analysis_client))
        .layer(Extension(store))
        .layer(cors)
}
