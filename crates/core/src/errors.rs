use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error("invalid pricing request: {0}")]
    InvalidRequest(String),
    #[error("i/o failure: {0}")]
    Io(String),
}

impl ApplicationError {
    /// Stable classifier reported in machine-readable command output.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "config_validation",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Io(_) => "io",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::InvalidRequest(_) => 3,
            Self::Io(_) => 4,
        }
    }
}
