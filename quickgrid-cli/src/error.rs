//! CLI errors

use quickgrid_lib::error::GridError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Invalid column '{spec}': {reason}")]
    Column { spec: String, reason: &'static str },

    #[error("Invalid filter '{spec}': {reason}")]
    Filter { spec: String, reason: &'static str },

    #[error("Records must be a JSON array of objects")]
    NotRecords,

    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl CliError {
    pub fn column(spec: impl Into<String>, reason: &'static str) -> Self {
        Self::Column {
            spec: spec.into(),
            reason,
        }
    }

    pub fn filter(spec: impl Into<String>, reason: &'static str) -> Self {
        Self::Filter {
            spec: spec.into(),
            reason,
        }
    }
}
