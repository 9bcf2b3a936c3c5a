use axum::http::StatusCode;
use thiserror::Error;

/// Request-level failures of the import pipeline. Each variant belongs to one
/// pipeline stage and maps to a fixed wire code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("{0}")]
    MapModelNotPassed(String),

    #[error("{0}")]
    MapModelNotFound(String),

    #[error("{0}")]
    CsvInvalid(String),

    #[error("{0}")]
    MappingsInvalid(String),
}

impl ImportError {
    pub fn code(&self) -> &'static str {
        match self {
            ImportError::MapModelNotPassed(_) => "MAP_MODEL_NOT_PASSED",
            ImportError::MapModelNotFound(_) => "MAP_MODEL_NOT_FOUND",
            ImportError::CsvInvalid(_) => "CSV_INVALID",
            ImportError::MappingsInvalid(_) => "MAPPINGS_INVALID",
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<csv::Error> for ImportError {
    fn from(e: csv::Error) -> Self {
        ImportError::CsvInvalid(format!("Upload is not valid CSV: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;

/// Startup faults. These never reach a client.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid target definition: {0}")]
    InvalidTarget(String),
}
