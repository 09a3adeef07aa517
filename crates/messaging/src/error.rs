/// Failures of the messaging handshake, split the way callers handle them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP transport failure (connect, TLS, read).
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket transport failure.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A body that should have been JSON was not.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The service answered, but not with what the protocol requires.
    #[error("protocol error: {message}")]
    Protocol { message: String },

    #[error("timed out waiting for {operation}")]
    Timeout { operation: String },

    #[error("messaging channel closed")]
    ChannelClosed,

    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl Error {
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Stable, lowercase category name for error payloads and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http(_) | Self::WebSocket(_) => "transport",
            Self::Parse(_) => "parse",
            Self::Protocol { .. } => "protocol",
            Self::Timeout { .. } => "timeout",
            Self::ChannelClosed => "channel_closed",
            Self::Config { .. } => "config",
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(source: url::ParseError) -> Self {
        Self::config(format!("invalid endpoint URL: {source}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
