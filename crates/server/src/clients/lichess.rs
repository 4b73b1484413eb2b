//! Lichess public API client.
//!
//! Game exports arrive as newline-delimited JSON. The export is strict: one
//! malformed line fails the whole call, there is no per-line recovery.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::FetchError;
use crate::games::LichessGame;

const DEFAULT_BASE_URL: &str = "https://lichess.org";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LichessUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub count: Option<LichessCounts>,
}

/// Lifetime game counts from the Lichess profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LichessCounts {
    #[serde(default)]
    pub all: i64,
    #[serde(default)]
    pub rated: i64,
    #[serde(default)]
    pub win: i64,
    #[serde(default)]
    pub loss: i64,
    #[serde(default)]
    pub draw: i64,
}

#[derive(Clone)]
pub struct LichessClient {
    client: Client,
    base_url: String,
}

impl LichessClient {
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

    /// Fetch a user's profile, including lifetime win/loss/draw counts.
    pub async fn fetch_user(&self, username: &str) -> Result<LichessUser, FetchError> {
        let url = format!("{}/api/user/{}", self.base_url, username);

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        resp.json().await.map_err(FetchError::from)
    }

    /// Fetch up to `max` recent games for a user as typed records.
    pub async fn fetch_user_games(
        &self,
        username: &str,
        max: usize,
    ) -> Result<Vec<LichessGame>, FetchError> {
        let url = format!("{}/api/games/user/{}", self.base_url, username);

        let resp = self
            .client
            .get(&url)
            .query(&[("max", max.to_string()), ("pgnInJson", "true".to_string())])
            .header("Accept", "application/x-ndjson")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        let text = resp.text().await?;

        let mut games = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let game: LichessGame = serde_json::from_str(line)
                .map_err(|e| FetchError::Parse(format!("bad NDJSON line: {e}")))?;
            games.push(game);
        }

        Ok(games)
    }
}

impl Default for LichessClient {
    fn default() -> Self {
        Self::new()
    }
}
