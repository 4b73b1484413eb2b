pub mod chess_api;
pub mod chess_com;
pub mod lichess;

use thiserror::Error;

/// Errors from the game-history adapters. Non-success statuses and transport
/// failures are distinct from malformed bodies so callers can tell "the
/// platform said no" apart from "the platform sent garbage".
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Parse(String),
}
