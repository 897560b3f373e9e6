use std::path::PathBuf;

use crate::utils::validation::ValidationError;

/// Failure reported by a call to the chat platform
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("rate limited by Discord")]
    RateLimited,
    #[error("{0} not found")]
    NotFound(String),
    #[error("Discord request failed: {0}")]
    Request(String),
}

impl PlatformError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, PlatformError::RateLimited)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PlatformError::NotFound(_))
    }
}

/// Failure reading or writing a JSON store file
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors produced by the bot's feature services
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("rate limited, please try again later")]
    RateLimited,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Platform(PlatformError),
}

impl From<PlatformError> for BotError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::RateLimited => BotError::RateLimited,
            PlatformError::NotFound(what) => BotError::NotFound(what),
            other => BotError::Platform(other),
        }
    }
}
