//! Integration tests for reqsig.
//!
//! Each test plays both sides: a client signs and renders a request for the
//! wire, a server rebuilds it from the raw method, path and query and
//! authenticates it.
//!
//! Run them with:
//! ```text
//! cargo test -p reqsig-integration
//! ```

use std::sync::Once;

use reqsig_auth::query::parse_query;
use reqsig_auth::{AuthError, SignableRequest};

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Rebuild a request the way a server would from a raw request line.
///
/// # Errors
///
/// Returns the constructor's [`AuthError`] for malformed auth parameters.
pub fn server_view(method: &str, path_and_query: &str) -> Result<SignableRequest, AuthError> {
    let (path, query) = path_and_query
        .split_once('?')
        .unwrap_or((path_and_query, ""));
    SignableRequest::new(method, path, parse_query(query))
}

/// Render the request line a client would send.
#[must_use]
pub fn request_line(request: &SignableRequest) -> String {
    format!("{}?{}", request.path(), request.to_query_string())
}

#[cfg(test)]
mod test_interop;
#[cfg(test)]
mod test_roundtrip;
