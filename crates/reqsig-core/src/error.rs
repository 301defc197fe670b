//! Error types for the reqsig core.

/// Core error type for reqsig infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum ReqsigError {
    /// An environment variable held a value that could not be parsed.
    #[error("configuration error: {name}={value:?} ({reason})")]
    Config {
        /// Name of the offending variable.
        name: &'static str,
        /// The raw value found in the environment.
        value: String,
        /// What was expected instead.
        reason: &'static str,
    },
}

/// Convenience result type for reqsig core operations.
pub type ReqsigResult<T> = Result<T, ReqsigError>;
