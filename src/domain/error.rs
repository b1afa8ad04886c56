//! Domain error types.

/// Top-level error type for crosstrader.
#[derive(Debug, thiserror::Error)]
pub enum CrosstraderError {
    #[error("data error: {reason}")]
    Data { reason: String },

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

    #[error("no price data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data: have {bars} bars, need at least {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error("invalid moving-average windows: short={short}, long={long} (need 0 < short < long)")]
    InvalidWindows { short: usize, long: usize },

    #[error("initial investment must be positive, got {amount}")]
    InvalidInvestment { amount: f64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CrosstraderError> for std::process::ExitCode {
    fn from(err: &CrosstraderError) -> Self {
        let code: u8 = match err {
            CrosstraderError::Io(_) => 1,
            CrosstraderError::ConfigParse { .. }
            | CrosstraderError::ConfigMissing { .. }
            | CrosstraderError::ConfigInvalid { .. } => 2,
            CrosstraderError::Data { .. } => 3,
            CrosstraderError::InsufficientData { .. }
            | CrosstraderError::InvalidWindows { .. }
            | CrosstraderError::InvalidInvestment { .. } => 4,
            CrosstraderError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
