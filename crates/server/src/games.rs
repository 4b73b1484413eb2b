//! Platform game records, merge/sort and pagination.
//!
//! Both platforms keep their native shape; the source discriminant rides
//! alongside each record so consumers dispatch with an exhaustive match
//! instead of probing for fields.

use serde::{Deserialize, Serialize};

use chess_core::pgn;
use chess_core::{GameData, GameMetadata};

/// How many additional games one pagination request reveals.
pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LichessGame {
    pub id: String,
    #[serde(default)]
    pub rated: Option<bool>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub speed: Option<String>,
    #[serde(default)]
    pub perf: Option<String>,
    /// Game creation time, epoch milliseconds.
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub last_move_at: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub players: Option<LichessPlayers>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub opening: Option<LichessOpening>,
    /// Bare SAN move string ("e4 e5 Nf3 ...").
    #[serde(default)]
    pub moves: Option<String>,
    #[serde(default)]
    pub pgn: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LichessPlayers {
    #[serde(default)]
    pub white: Option<LichessPlayerSide>,
    #[serde(default)]
    pub black: Option<LichessPlayerSide>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LichessPlayerSide {
    #[serde(default)]
    pub user: Option<LichessUserRef>,
    #[serde(default)]
    pub rating: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LichessUserRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LichessOpening {
    #[serde(default)]
    pub eco: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ply: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChessComGame {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub pgn: Option<String>,
    #[serde(default)]
    pub time_control: Option<String>,
    /// Game end time, epoch seconds.
    #[serde(default)]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub rated: Option<bool>,
    #[serde(default)]
    pub white: Option<ChessComSide>,
    #[serde(default)]
    pub black: Option<ChessComSide>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChessComSide {
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// A game record tagged with its source platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PlatformGame {
    Lichess(LichessGame),
    ChessCom(ChessComGame),
}

impl PlatformGame {
    /// Timestamp normalized to epoch milliseconds: Lichess records creation
    /// time in ms, Chess.com records end time in seconds.
    pub fn timestamp_ms(&self) -> i64 {
        match self {
            PlatformGame::Lichess(g) => g.created_at.unwrap_or(0),
            PlatformGame::ChessCom(g) => g.end_time.unwrap_or(0) * 1000,
        }
    }

    /// The identifier games are addressed by: the Lichess game id, or an id
    /// pulled out of the Chess.com game URL.
    pub fn game_id(&self) -> Option<String> {
        match self {
            PlatformGame::Lichess(g) => Some(g.id.clone()),
            PlatformGame::ChessCom(g) => g.url.as_deref().and_then(chess_com_game_id),
        }
    }

    /// Build the replayable carrier for this game: header-level metadata plus
    /// the SAN move list. `None` means the game has no usable move text and
    /// cannot be navigated.
    ///
    /// Chess.com games always describe themselves through their PGN. Lichess
    /// games may arrive with a PGN, or with just a bare SAN string plus typed
    /// player fields.
    pub fn game_data(&self) -> Option<GameData> {
        match self {
            PlatformGame::Lichess(g) => {
                if let Some(text) = g.pgn.as_deref().filter(|s| !s.is_empty()) {
                    return pgn::parse_pgn(text);
                }

                let move_text = g.moves.as_deref().filter(|s| !s.is_empty())?;
                let moves = pgn::extract_moves(move_text);
                if moves.is_empty() {
                    return None;
                }

                let player = |side: Option<&LichessPlayerSide>| {
                    side.and_then(|s| s.user.as_ref())
                        .and_then(|u| u.name.clone())
                        .unwrap_or_else(|| "Unknown".to_string())
                };
                let players = g.players.as_ref();

                Some(GameData {
                    metadata: GameMetadata {
                        white: player(players.and_then(|p| p.white.as_ref())),
                        black: player(players.and_then(|p| p.black.as_ref())),
                        result: match g.winner.as_deref() {
                            Some("white") => "1-0".to_string(),
                            Some("black") => "0-1".to_string(),
                            None if matches!(
                                g.status.as_deref(),
                                Some("draw") | Some("stalemate")
                            ) =>
                            {
                                "1/2-1/2".to_string()
                            }
                            _ => "*".to_string(),
                        },
                        date: None,
                        time_control: g.speed.clone(),
                        eco: g.opening.as_ref().and_then(|o| o.eco.clone()),
                        event: None,
                        link: Some(format!("https://lichess.org/{}", g.id)),
                    },
                    moves,
                    pgn: move_text.to_string(),
                })
            }
            PlatformGame::ChessCom(g) => pgn::parse_pgn(g.pgn.as_deref()?),
        }
    }

    fn matches_id(&self, game_id: &str) -> bool {
        if self.game_id().as_deref() == Some(game_id) {
            return true;
        }
        // Last resort for Chess.com URLs the id heuristic mis-split.
        match self {
            PlatformGame::Lichess(_) => false,
            PlatformGame::ChessCom(g) => g
                .url
                .as_deref()
                .is_some_and(|url| url.contains(&format!("/{game_id}/"))),
        }
    }
}

/// Extract a game id from a Chess.com game URL. Looks for a "live" or
/// "daily" path segment and takes the segment after it, else the
/// second-to-last segment. This mirrors the URL layout Chess.com uses today;
/// a restructured URL would mismatch silently.
pub fn chess_com_game_id(url: &str) -> Option<String> {
    let parts: Vec<&str> = url.split('/').filter(|s| !s.is_empty()).collect();

    if let Some(idx) = parts.iter().position(|p| *p == "live" || *p == "daily") {
        if idx + 1 < parts.len() {
            return Some(parts[idx + 1].to_string());
        }
    }

    if parts.len() >= 2 {
        Some(parts[parts.len() - 2].to_string())
    } else {
        None
    }
}

/// Concatenate both platforms' games and sort newest-first by normalized
/// timestamp.
pub fn merge_games(
    lichess: Vec<LichessGame>,
    chess_com: Vec<ChessComGame>,
) -> Vec<PlatformGame> {
    let mut merged: Vec<PlatformGame> = lichess
        .into_iter()
        .map(PlatformGame::Lichess)
        .chain(chess_com.into_iter().map(PlatformGame::ChessCom))
        .collect();

    merged.sort_by_key(|g| std::cmp::Reverse(g.timestamp_ms()));
    merged
}

/// Find the game a session refers to. `None` means "not found" — callers
/// render a fallback, they do not crash.
pub fn find_game<'a>(games: &'a [PlatformGame], game_id: &str) -> Option<&'a PlatformGame> {
    games.iter().find(|g| g.matches_id(game_id))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePage {
    pub games: Vec<PlatformGame>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}

/// One increment of the merged feed.
pub fn paginate(games: &[PlatformGame], offset: usize, limit: usize) -> GamePage {
    let total = games.len();
    let start = offset.min(total);
    let end = start.saturating_add(limit).min(total);

    GamePage {
        games: games[start..end].to_vec(),
        total,
        offset,
        limit,
        has_more: end < total,
    }
}
