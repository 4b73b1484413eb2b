//! Analysis session endpoints: create a session for one game, step through
//! its positions, poll the evaluation.
//!
//! Navigation handlers mutate the session under its lock and hand the
//! returned ticket to a spawned task; the task runs the evaluation and
//! reports back through `NavigationState::apply`, which drops anything
//! cancelled or superseded in the meantime.

use std::sync::Arc;

use axum::{extract::Path, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tokio::sync::Mutex;

use crate::clients::chess_api::AnalysisClient;
use crate::clients::chess_com::ChessComClient;
use crate::clients::lichess::LichessClient;
use crate::config::Config;
use crate::error::AppError;
use crate::games;
use crate::registry::ChampionRegistry;
use crate::routes::games::fetch_merged_games;
use crate::session::{AnalysisTicket, NavigationState, SessionStore};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub champion_id: i64,
    pub game_id: String,
}

#[derive(Deserialize)]
pub struct GotoRequest {
    pub index: usize,
}

/// POST /api/analysis/sessions
///
/// Locate the game among the champion's recent games on either platform,
/// rebuild its move list by replaying the move text against the rules
/// engine, and open a session at the initial position.
pub async fn create_session(
    Extension(registry): Extension<ChampionRegistry>,
    Extension(config): Extension<Config>,
    Extension(lichess): Extension<LichessClient>,
    Extension(chess_com): Extension<ChessComClient>,
    Extension(store): Extension<SessionStore>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<Json<JsonValue>, AppError> {
    let champion = registry
        .find(body.champion_id)
        .await?
        .ok_or(AppError::NotFound("Champion not found".into()))?;

    let merged = fetch_merged_games(&champion, &config, &lichess, &chess_com).await;
    let game = games::find_game(&merged, &body.game_id)
        .ok_or(AppError::NotFound("Game not found".into()))?;

    let game_data = game
        .game_data()
        .ok_or(AppError::UnusableGame("Game has no parseable moves".into()))?;
    chess_core::replay::validate_line(&game_data.moves)
        .map_err(|e| AppError::UnusableGame(format!("Game does not replay: {e}")))?;

    let state = NavigationState::new(champion.id, body.game_id.clone(), game_data);
    let (id, session) = store.insert(state).await;
    let view = session.lock().await.view();

    tracing::info!(
        "Opened analysis session {id} for champion {} game {}",
        champion.id,
        body.game_id
    );

    Ok(Json(json!({ "sessionId": id, "session": view })))
}

/// GET /api/analysis/sessions/{id}
pub async fn get_session(
    Extension(store): Extension<SessionStore>,
    Path(id): Path<String>,
) -> Result<Json<JsonValue>, AppError> {
    let session = store
        .get(&id)
        .await
        .ok_or(AppError::NotFound("Session not found".into()))?;

    let view = session.lock().await.view();
    Ok(Json(json!({ "session": view })))
}

/// POST /api/analysis/sessions/{id}/goto
pub async fn goto(
    Extension(store): Extension<SessionStore>,
    Extension(config): Extension<Config>,
    Extension(analysis): Extension<AnalysisClient>,
    Path(id): Path<String>,
    Json(body): Json<GotoRequest>,
) -> Result<Json<JsonValue>, AppError> {
    navigate(&store, &config, &analysis, &id, |state| state.goto(body.index)).await
}

/// POST /api/analysis/sessions/{id}/next
pub async fn next_move(
    Extension(store): Extension<SessionStore>,
    Extension(config): Extension<Config>,
    Extension(analysis): Extension<AnalysisClient>,
    Path(id): Path<String>,
) -> Result<Json<JsonValue>, AppError> {
    navigate(&store, &config, &analysis, &id, NavigationState::next).await
}

/// POST /api/analysis/sessions/{id}/prev
pub async fn prev_move(
    Extension(store): Extension<SessionStore>,
    Extension(config): Extension<Config>,
    Extension(analysis): Extension<AnalysisClient>,
    Path(id): Path<String>,
) -> Result<Json<JsonValue>, AppError> {
    navigate(&store, &config, &analysis, &id, NavigationState::prev).await
}

/// POST /api/analysis/sessions/{id}/reset
pub async fn reset_session(
    Extension(store): Extension<SessionStore>,
    Path(id): Path<String>,
) -> Result<Json<JsonValue>, AppError> {
    let session = store
        .get(&id)
        .await
        .ok_or(AppError::NotFound("Session not found".into()))?;

    let mut state = session.lock().await;
    state.reset();
    Ok(Json(json!({ "session": state.view() })))
}

/// DELETE /api/analysis/sessions/{id}
pub async fn delete_session(
    Extension(store): Extension<SessionStore>,
    Path(id): Path<String>,
) -> Result<Json<JsonValue>, AppError> {
    if let Some(session) = store.get(&id).await {
        // Drop any in-flight evaluation with the session.
        session.lock().await.reset();
    }

    if store.remove(&id).await {
        Ok(Json(json!({ "deleted": true })))
    } else {
        Err(AppError::NotFound("Session not found".into()))
    }
}

async fn navigate(
    store: &SessionStore,
    config: &Config,
    analysis: &AnalysisClient,
    id: &str,
    step: impl FnOnce(&mut NavigationState) -> Option<AnalysisTicket>,
) -> Result<Json<JsonValue>, AppError> {
    let session = store
        .get(id)
        .await
        .ok_or(AppError::NotFound("Session not found".into()))?;

    let mut state = session.lock().await;
    if let Some(ticket) = step(&mut state) {
        spawn_analysis(session.clone(), analysis.clone(), config.analysis_depth, ticket);
    }

    Ok(Json(json!({ "session": state.view() })))
}

fn spawn_analysis(
    session: Arc<Mutex<NavigationState>>,
    client: AnalysisClient,
    depth: u32,
    ticket: AnalysisTicket,
) {
    tokio::spawn(async move {
        let outcome = client.analyze(&ticket.fen, depth, ticket.cancel).await;
        session.lock().await.apply(ticket.generation, outcome);
    });
}
