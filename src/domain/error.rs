//! Domain error types.

/// Top-level error type for stockcast.
#[derive(Debug, thiserror::Error)]
pub enum StockcastError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("insufficient funds to buy {ticker}: need {required:.2}, have {available:.2}")]
    InsufficientFunds {
        ticker: String,
        required: f64,
        available: f64,
    },

    #[error("insufficient holdings of {ticker}: requested {requested}, held {held}")]
    InsufficientHoldings {
        ticker: String,
        requested: u64,
        held: u64,
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

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("price feed error: {reason}")]
    Feed { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StockcastError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        StockcastError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// True for the ledger rejections a caller may retry with a smaller order.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StockcastError::InsufficientFunds { .. } | StockcastError::InsufficientHoldings { .. }
        )
    }
}

impl From<&StockcastError> for std::process::ExitCode {
    fn from(err: &StockcastError) -> Self {
        let code: u8 = match err {
            StockcastError::Io(_) => 1,
            StockcastError::ConfigParse { .. }
            | StockcastError::ConfigMissing { .. }
            | StockcastError::ConfigInvalid { .. } => 2,
            StockcastError::NoData { .. } | StockcastError::Feed { .. } => 3,
            StockcastError::InvalidArgument { .. } => 4,
            StockcastError::InsufficientFunds { .. }
            | StockcastError::InsufficientHoldings { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
