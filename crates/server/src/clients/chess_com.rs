//! Chess.com public API client.
//!
//! Games are organized into monthly archives. "Recent games" means the
//! current calendar month; if that request comes back with a non-success
//! status the client falls back exactly once to the previous month, then
//! gives up. No further retry and no backoff.

use chrono::{Datelike, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::FetchError;
use crate::games::ChessComGame;

const DEFAULT_BASE_URL: &str = "https://api.chess.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChessComPlayer {
    #[serde(default)]
    pub player_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MonthlyArchive {
    #[serde(default)]
    games: Vec<ChessComGame>,
}

/// The month immediately before `(year, month)`, rolling December back into
/// the previous year.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

#[derive(Clone)]
pub struct ChessComClient {
    client: Client,
    base_url: String,
}

impl ChessComClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        let client = Client::builder()
            .user_agent("ChessChampions/1.0")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("reqwest client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch a player's public profile.
    pub async fn fetch_player(&self, username: &str) -> Result<ChessComPlayer, FetchError> {
        let url = format!("{}/pub/player/{}", self.base_url, username);

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        resp.json().await.map_err(FetchError::from)
    }

    /// Fetch one monthly archive of games.
    pub async fn fetch_month(
        &self,
        username: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<ChessComGame>, FetchError> {
        let url = format!(
            "{}/pub/player/{}/games/{}/{:02}",
            self.base_url, username, year, month
        );

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        let archive: MonthlyArchive = resp.json().await?;
        Ok(archive.games)
    }

    /// Fetch the current month's games, falling back once to the previous
    /// month on a non-success status. Transport and parse failures do not
    /// trigger the fallback.
    pub async fn fetch_recent_games(
        &self,
        username: &str,
    ) -> Result<Vec<ChessComGame>, FetchError> {
        let now = Utc::now();
        let (year, month) = (now.year(), now.month());

        match self.fetch_month(username, year, month).await {
            Ok(games) => Ok(games),
            Err(FetchError::Status(status)) => {
                let (prev_year, prev_month) = previous_month(year, month);
                tracing::warn!(
                    "Chess.com archive {year}/{month:02} for {username} returned {status}; \
                     falling back to {prev_year}/{prev_month:02}"
                );
                self.fetch_month(username, prev_year, prev_month).await
            }
            Err(e) => Err(e),
        }
    }
}

impl Default for ChessComClient {
    fn default() -> Self {
        Self::new()
    }
}
