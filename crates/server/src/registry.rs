//! Champion registry backed by a static JSON file.
//!
//! The file is re-read on every load so edits show up without a restart, and
//! a missing or unreadable file surfaces as an error on the endpoint that
//! needed it rather than at startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Champion {
    /// Stable champion rank, unique across the registry.
    pub id: i64,
    pub name: String,
    pub dob: String,
    pub chess_com: Option<String>,
    pub lichess: Option<String>,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read champions file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("champions file {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone)]
pub struct ChampionRegistry {
    path: PathBuf,
}

impl ChampionRegistry {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub async fn load(&self) -> Result<Vec<Champion>, RegistryError> {
        let path = self.path.display().to_string();
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| RegistryError::Io {
                path: path.clone(),
                source,
            })?;
        serde_json::from_str(&text).map_err(|source| RegistryError::Parse { path, source })
    }

    pub async fn find(&self, id: i64) -> Result<Option<Champion>, RegistryError> {
        Ok(self.load().await?.into_iter().find(|c| c.id == id))
    }
}
