//! Domain error types.

/// Top-level error type for turtletrader.
#[derive(Debug, thiserror::Error)]
pub enum TurtleError {
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

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TurtleError> for std::process::ExitCode {
    fn from(err: &TurtleError) -> Self {
        let code: u8 = match err {
            TurtleError::Io(_) => 1,
            TurtleError::ConfigParse { .. }
            | TurtleError::ConfigMissing { .. }
            | TurtleError::ConfigInvalid { .. } => 2,
            TurtleError::Data { .. } => 3,
            TurtleError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
