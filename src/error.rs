use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors from the on-chain read path.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("contract read of {field} failed: {reason}")]
    ReadFailed { field: &'static str, reason: String },

    #[error("balance query failed: {0}")]
    BalanceFailed(String),
}

/// Errors from the purchase write path.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("simulation call failed: {0}")]
    SimulationFailed(String),

    #[error("failed to submit transaction: {0}")]
    SubmissionFailed(String),

    #[error("failed to fetch receipt: {0}")]
    ReceiptFailed(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// The last coalesced refresh failed; the caller shares its outcome.
    #[error("funding data unavailable")]
    FundingUnavailable,

    /// The monitor was closed while the call was outstanding or before it
    /// started; the result must not be applied.
    #[error("funding monitor closed")]
    MonitorClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
