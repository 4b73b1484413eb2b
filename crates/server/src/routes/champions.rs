use axum::{extract::Path, extract::Query, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::clients::chess_com::ChessComClient;
use crate::clients::lichess::LichessClient;
use crate::error::AppError;
use crate::registry::{Champion, ChampionRegistry};
use crate::search;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// GET /api/champions
pub async fn list_champions(
    Extension(registry): Extension<ChampionRegistry>,
) -> Result<Json<Vec<Champion>>, AppError> {
    Ok(Json(registry.load().await?))
}

/// GET /api/champions/search
pub async fn search_champions(
    Extension(registry): Extension<ChampionRegistry>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<JsonValue>, AppError> {
    let champions = registry.load().await?;
    let query = q.q.unwrap_or_default();
    let suggestions: Vec<&Champion> = search::suggest(&champions, &query);

    Ok(Json(json!({ "suggestions": suggestions })))
}

/// GET /api/champions/{id}
///
/// The champion record plus whatever linked platform profiles could be
/// fetched. Profile fetches run concurrently; either platform failing only
/// nulls out its own side of the response.
pub async fn get_champion(
    Extension(registry): Extension<ChampionRegistry>,
    Extension(lichess): Extension<LichessClient>,
    Extension(chess_com): Extension<ChessComClient>,
    Path(id): Path<i64>,
) -> Result<Json<JsonValue>, AppError> {
    let champion = registry
        .find(id)
        .await?
        .ok_or(AppError::NotFound("Champion not found".into()))?;

    let lichess_profile = async {
        match &champion.lichess {
            Some(username) => match lichess.fetch_user(username).await {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("Lichess profile fetch for {username} failed: {e}");
                    None
                }
            },
            None => None,
        }
    };

    let chess_com_profile = async {
        match &champion.chess_com {
            Some(username) => match chess_com.fetch_player(username).await {
                Ok(player) => Some(player),
                Err(e) => {
                    tracing::warn!("Chess.com profile fetch for {username} failed: {e}");
                    None
                }
            },
            None => None,
        }
    };

    let (lichess_profile, chess_com_profile) = tokio::join!(lichess_profile, chess_com_profile);

    Ok(Json(json!({
        "champion": champion,
        "lichessUser": lichess_profile,
        "chessComPlayer": chess_com_profile,
    })))
}

/// GET /api/champions/{id}/stats
///
/// Aggregate win/loss/draw counts from the champion's Lichess profile.
/// Champions without a linked Lichess account report zeros.
pub async fn get_champion_stats(
    Extension(registry): Extension<ChampionRegistry>,
    Extension(lichess): Extension<LichessClient>,
    Path(id): Path<i64>,
) -> Result<Json<JsonValue>, AppError> {
    let champion = registry
        .find(id)
        .await?
        .ok_or(AppError::NotFound("Champion not found".into()))?;

    let counts = match &champion.lichess {
        Some(username) => lichess
            .fetch_user(username)
            .await
            .map_err(|e| AppError::Upstream(format!("Lichess profile fetch failed: {e}")))?
            .count
            .unwrap_or_default(),
        None => Default::default(),
    };

    let win_rate = if counts.all > 0 {
        counts.win as f64 / counts.all as f64 * 100.0
    } else {
        0.0
    };

    Ok(Json(json!({
        "wins": counts.win,
        "losses": counts.loss,
        "draws": counts.draw,
        "totalGames": counts.all,
        "winRate": win_rate,
    })))
}
