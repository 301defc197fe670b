//! Error types for request signing and authentication.
//!
//! Every failure of the pipeline is an [`AuthError`]. Only
//! [`SignableRequest::authenticate`](crate::SignableRequest::authenticate) may
//! turn one into `Ok(false)`; everything else returns it.

/// Errors that can occur while building, signing, or authenticating a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Constructor input had the wrong shape.
    #[error("Invalid type: {0}")]
    InvalidType(String),

    /// The credential used for verification has an empty secret.
    #[error("Provided credential is missing secret")]
    MissingSecret,

    /// A required `auth_*` parameter is absent.
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// `auth_version` is not a version this implementation speaks.
    #[error("Version not supported: {0}")]
    UnsupportedVersion(String),

    /// `auth_timestamp` is not an integer number of seconds.
    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// `auth_timestamp` is older than the grace window allows.
    #[error(
        "Timestamp expired: Given timestamp ({timestamp}) not within {grace} of server time ({now})"
    )]
    Expired {
        /// Timestamp carried by the request.
        timestamp: i64,
        /// Grace window in seconds.
        grace: u64,
        /// Verifier's current time.
        now: i64,
    },

    /// The recomputed signature differs from `auth_signature`.
    #[error(
        "Invalid signature: you should have sent HmacSHA256Hex({string_to_sign:?}, your_secret_key), but you sent {provided:?}"
    )]
    InvalidSignature {
        /// The canonical string the verifier signed.
        string_to_sign: String,
        /// The signature the request carried.
        provided: String,
    },

    /// Auth parameters were requested from a request that was never signed locally.
    #[error("Request not signed")]
    NotSigned,

    /// The credential provider does not know the identifier.
    #[error("Access key not found: {0}")]
    AccessKeyNotFound(String),
}
