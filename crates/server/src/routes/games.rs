use axum::{extract::Path, extract::Query, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::clients::chess_com::ChessComClient;
use crate::clients::lichess::LichessClient;
use crate::config::Config;
use crate::error::AppError;
use crate::games::{self, PlatformGame, PAGE_SIZE};
use crate::registry::{Champion, ChampionRegistry};

#[derive(Deserialize)]
pub struct PageQuery {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

/// GET /api/champions/{id}/games
pub async fn get_champion_games(
    Extension(registry): Extension<ChampionRegistry>,
    Extension(config): Extension<Config>,
    Extension(lichess): Extension<LichessClient>,
    Extension(chess_com): Extension<ChessComClient>,
    Path(id): Path<i64>,
    Query(q): Query<PageQuery>,
) -> Result<Json<JsonValue>, AppError> {
    let champion = registry
        .find(id)
        .await?
        .ok_or(AppError::NotFound("Champion not found".into()))?;

    let offset = q.offset.unwrap_or(0);
    let limit = q.limit.unwrap_or(PAGE_SIZE).min(100);

    let merged = fetch_merged_games(&champion, &config, &lichess, &chess_com).await;
    let page = games::paginate(&merged, offset, limit);

    Ok(Json(json!({
        "championId": champion.id,
        "games": page.games,
        "total": page.total,
        "offset": page.offset,
        "limit": page.limit,
        "hasMore": page.has_more,
    })))
}

/// Fetch both platforms' recent games concurrently and merge them
/// newest-first. The fetches are independent: one platform erroring (or not
/// being linked at all) leaves the other platform's games intact.
pub async fn fetch_merged_games(
    champion: &Champion,
    config: &Config,
    lichess: &LichessClient,
    chess_com: &ChessComClient,
) -> Vec<PlatformGame> {
    let lichess_games = async {
        match &champion.lichess {
            Some(username) => match lichess
                .fetch_user_games(username, config.max_games_per_platform)
                .await
            {
                Ok(games) => games,
                Err(e) => {
                    tracing::warn!("Lichess games fetch for {username} failed: {e}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        }
    };

    let chess_com_games = async {
        match &champion.chess_com {
            Some(username) => match chess_com.fetch_recent_games(username).await {
                Ok(games) => games,
                Err(e) => {
                    tracing::warn!("Chess.com games fetch for {username} failed: {e}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        }
    };

    let (lichess_games, chess_com_games) = tokio::join!(lichess_games, chess_com_games);
    games::merge_games(lichess_games, chess_com_games)
}
