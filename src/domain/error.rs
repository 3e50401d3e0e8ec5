//! Domain error types.

/// Top-level error type for milo.
#[derive(Debug, thiserror::Error)]
pub enum MiloError {
    #[error("validation failure in {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no open trade with id {id_signal} (not found or already closed)")]
    TradeNotFound { id_signal: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("ledger storage error: {reason}")]
    Storage { reason: String },

    #[error("unexpected failure: {reason}")]
    Internal { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MiloError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        MiloError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn storage(reason: impl Into<String>) -> Self {
        MiloError::Storage {
            reason: reason.into(),
        }
    }
}

impl MiloError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            MiloError::Io(_) | MiloError::Internal { .. } => 1,
            MiloError::ConfigParse { .. } | MiloError::ConfigInvalid { .. } => 2,
            MiloError::Storage { .. } => 3,
            MiloError::Validation { .. } => 4,
            MiloError::TradeNotFound { .. } => 5,
        }
    }
}

impl From<&MiloError> for std::process::ExitCode {
    fn from(err: &MiloError) -> Self {
        std::process::ExitCode::from(err.exit_code())
    }
}
