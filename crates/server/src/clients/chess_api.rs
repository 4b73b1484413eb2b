//! Position-evaluation API client.
//!
//! One POST per position. Rejections and transport failures come back as
//! `Ok(None)` ("no analysis available"); cancellation is its own error
//! variant so callers can tell a superseded request apart from a failed one.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub bestmove: Option<String>,
    /// Evaluation in centipawns from the side to move.
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub mate: Option<i64>,
    #[serde(default)]
    pub depth: Option<u32>,
    #[serde(default)]
    pub continuation: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The caller cancelled the request before the evaluator answered.
    #[error("analysis request cancelled")]
    Cancelled,
}

#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    url: String,
}

impl AnalysisClient {
    pub fn new(url: &str) -> Self {
        let client = Client::builder()
            .user_agent("ChessChampions/1.0")
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("reqwest client");
        Self {
            client,
            url: url.to_string(),
        }
    }

    /// Evaluate one position. The request runs until the evaluator answers
    /// or `cancel` fires — firing (or dropping the sender) wins immediately
    /// and yields `AnalysisError::Cancelled`.
    pub async fn analyze(
        &self,
        fen: &str,
        depth: u32,
        mut cancel: oneshot::Receiver<()>,
    ) -> Result<Option<AnalysisResult>, AnalysisError> {
        let request = async {
            let resp = self
                .client
                .post(&self.url)
                .json(&json!({ "fen": fen, "depth": depth }))
                .send()
                .await;

            match resp {
                Ok(resp) if resp.status().is_success() => match resp.json().await {
                    Ok(result) => Some(result),
                    Err(e) => {
                        tracing::warn!("Analysis response was not valid JSON: {e}");
                        None
                    }
                },
                Ok(resp) => {
                    tracing::warn!("Analysis request rejected: HTTP {}", resp.status());
                    None
                }
                Err(e) => {
                    tracing::warn!("Analysis request failed: {e}");
                    None
                }
            }
        };

        tokio::select! {
            biased;

            _ = &mut cancel => Err(AnalysisError::Cancelled),
            result = request => Ok(result),
        }
    }
}
