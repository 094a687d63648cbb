//! Domain error types.

/// Top-level error type for swingwatch.
///
/// A `QuoteUnavailable` for one symbol never aborts a batch: the pipeline
/// logs it and moves to the next asset.
#[derive(Debug, thiserror::Error)]
pub enum SwingwatchError {
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

    #[error("quote unavailable for {symbol}: {reason}")]
    QuoteUnavailable { symbol: String, reason: String },

    #[error("history store error: {reason}")]
    History { reason: String },

    #[error("notification error: {reason}")]
    Notify { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SwingwatchError> for std::process::ExitCode {
    fn from(err: &SwingwatchError) -> Self {
        let code: u8 = match err {
            SwingwatchError::Io(_) => 1,
            SwingwatchError::ConfigParse { .. }
            | SwingwatchError::ConfigMissing { .. }
            | SwingwatchError::ConfigInvalid { .. } => 2,
            SwingwatchError::QuoteUnavailable { .. }
            | SwingwatchError::History { .. }
            | SwingwatchError::Notify { .. } => 3,
            SwingwatchError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
