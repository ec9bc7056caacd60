use std::error::Error as StdError;

use thiserror::Error;

use crate::errors::domain::DomainError;

type BoxedSource = Box<dyn StdError + Send + Sync>;

/// Failures outside the session core: configuration, the websocket
/// transport and Socket.IO framing.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {detail}")]
    Config {
        detail: String,
        #[source]
        source: BoxedSource,
    },
    #[error("Transport error: {detail}")]
    Transport {
        detail: String,
        #[source]
        source: BoxedSource,
    },
    #[error("Protocol error: {detail}")]
    Protocol { detail: String },
    #[error("Connection closed by server")]
    Closed,
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ClientError {
    pub fn config(detail: impl Into<String>, source: impl Into<BoxedSource>) -> Self {
        Self::Config {
            detail: detail.into(),
            source: source.into(),
        }
    }

    /// Configuration error for a required variable that is not set.
    pub fn missing_env(name: &str) -> Self {
        Self::config(
            format!("{name} must be set"),
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{name} environment variable not found"),
            ),
        )
    }

    pub fn transport(detail: impl Into<String>, source: impl Into<BoxedSource>) -> Self {
        Self::Transport {
            detail: detail.into(),
            source: source.into(),
        }
    }

    pub fn protocol(detail: impl Into<String>) -> Self {
        Self::Protocol {
            detail: detail.into(),
        }
    }

    /// A single frame could not be decoded; the connection itself is fine.
    pub fn is_frame_error(&self) -> bool {
        matches!(self, Self::Protocol { .. } | Self::Json(_))
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        ClientError::transport("websocket failure", err)
    }
}
