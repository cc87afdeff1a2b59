//! Domain error types.

/// Top-level error type for levsim.
#[derive(Debug, thiserror::Error)]
pub enum LevsimError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("insufficient data for {metric}: have {have} points, need {need}")]
    InsufficientData {
        metric: &'static str,
        have: usize,
        need: usize,
    },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data provider error: {reason}")]
    Data { reason: String },

    #[error("price cache error: {reason}")]
    Cache { reason: String },

    #[error("no price data for {ticker} ({period})")]
    NoData { ticker: String, period: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LevsimError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        LevsimError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// True when the error marks a metric as undefined rather than a failure.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, LevsimError::InsufficientData { .. })
    }
}

impl From<&LevsimError> for std::process::ExitCode {
    fn from(err: &LevsimError) -> Self {
        let code: u8 = match err {
            LevsimError::Io(_) => 1,
            LevsimError::ConfigParse { .. }
            | LevsimError::ConfigMissing { .. }
            | LevsimError::ConfigInvalid { .. } => 2,
            LevsimError::Data { .. } | LevsimError::Cache { .. } => 3,
            LevsimError::InvalidInput { .. } => 4,
            LevsimError::NoData { .. } | LevsimError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
