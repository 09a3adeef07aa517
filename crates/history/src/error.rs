use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request signing failed: {0}")]
    Oauth(#[from] courier_oauth::Error),

    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl Error {
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
            Self::Transport(_) => "transport",
            Self::Io { .. } => "io",
            Self::Oauth(_) => "oauth",
            Self::Config { .. } => "config",
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(source: url::ParseError) -> Self {
        Self::config(format!("invalid history URL: {source}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
