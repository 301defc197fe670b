//! Verification policy for reqsig.
//!
//! Configuration is driven by environment variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `REQSIG_TIMESTAMP_GRACE` | `600` | Seconds a signed request stays valid; `0` disables the check |
//! | `REQSIG_RAISE_ON_FAILURE` | `true` | Surface failures as errors instead of `false` |

use tracing::warn;

use crate::error::{ReqsigError, ReqsigResult};

/// Default grace window, in seconds, between signing and verification.
pub const DEFAULT_TIMESTAMP_GRACE_SECS: u64 = 600;

const GRACE_VAR: &str = "REQSIG_TIMESTAMP_GRACE";
const RAISE_VAR: &str = "REQSIG_RAISE_ON_FAILURE";

/// How an incoming signed request is verified.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyConfig {
    /// Maximum age of `auth_timestamp`, in seconds.
    ///
    /// Zero disables the timestamp check entirely; it does not mean "expire
    /// immediately".
    pub timestamp_grace_secs: u64,
    /// Return failures as errors (`true`) or as `Ok(false)` (`false`).
    pub raise_on_failure: bool,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            timestamp_grace_secs: DEFAULT_TIMESTAMP_GRACE_SECS,
            raise_on_failure: true,
        }
    }
}

impl VerifyConfig {
    /// Set the grace window.
    #[must_use]
    pub fn with_timestamp_grace(mut self, secs: u64) -> Self {
        self.timestamp_grace_secs = secs;
        self
    }

    /// Choose between errors and `Ok(false)` on failure.
    #[must_use]
    pub fn with_raise_on_failure(mut self, raise: bool) -> Self {
        self.raise_on_failure = raise;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Unparsable values are logged and replaced by their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok()).unwrap_or_else(|e| {
            warn!(error = %e, "ignoring invalid reqsig environment configuration");
            Self::default()
        })
    }

    /// Load configuration from environment variables, rejecting bad values.
    pub fn try_from_env() -> ReqsigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ReqsigResult<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup(GRACE_VAR) {
            config.timestamp_grace_secs = v.trim().parse().map_err(|_| ReqsigError::Config {
                name: GRACE_VAR,
                value: v.clone(),
                reason: "expected a non-negative integer",
            })?;
        }
        if let Some(v) = lookup(RAISE_VAR) {
            config.raise_on_failure = parse_bool(&v).ok_or_else(|| ReqsigError::Config {
                name: RAISE_VAR,
                value: v.clone(),
                reason: "expected 1, 0, true or false",
            })?;
        }

        Ok(config)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw == "1" || raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw == "0" || raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
