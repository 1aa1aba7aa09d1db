use client::ClientError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdminError>;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("unknown timezone: {0}")]
    Timezone(String),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("{0}")]
    Prompt(String),
    #[error("{0}")]
    Usage(String),
}

impl AdminError {
    /// Process exit code: 2 for bad input, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) | Self::Timezone(_) => 2,
            Self::Client(ClientError::Validation(_) | ClientError::Engine(_)) => 2,
            _ => 1,
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Client(err) if err.is_auth_failure())
    }
}
