use brine_nano_schema::PoolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NanoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bad {option}, {message} found '{value}'")]
    Config {
        option:  String,
        value:   String,
        message: String,
    },

    #[error("{file}: {message}")]
    Validation {
        file:    String,
        message: String,
    },

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Descriptor pool error: {0}")]
    Pool(String),
}

impl From<PoolError> for NanoError {
    fn from(e: PoolError) -> Self {
        NanoError::Pool(e.to_string())
    }
}

/// A non-fatal problem found while reading generator parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub option: String,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ignore unknown javanano generator option: {}", self.option)
    }
}
