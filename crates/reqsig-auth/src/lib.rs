//! HMAC-SHA256 canonical request signing and verification.
//!
//! A client holding a `(key, secret)` [`Credential`] serializes a request
//! (method, path, query parameters) into a canonical string, signs it with
//! HMAC-SHA256, and attaches the result as `auth_*` parameters. A server
//! holding the same secret rebuilds the request from what it received and
//! recomputes the signature.
//!
//! # Usage
//!
//! ```rust
//! use reqsig_auth::{Credential, SignableRequest};
//! use reqsig_auth::query::parse_query;
//! use reqsig_core::VerifyConfig;
//!
//! let credential = Credential::new("k1", "s1");
//!
//! // Client side.
//! let mut request = SignableRequest::new("GET", "/widgets", vec![("color", "Red")]).unwrap();
//! request.sign(&credential);
//! let wire_query = request.to_query_string();
//!
//! // Server side.
//! let received = SignableRequest::new("GET", "/widgets", parse_query(&wire_query)).unwrap();
//! assert_eq!(received.authenticate(&credential, &VerifyConfig::default()), Ok(true));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical string construction and HMAC computation
//! - [`credentials`] - Credentials and credential lookup
//! - [`error`] - Authentication error types
//! - [`params`] - Parameter values and ingestion rules
//! - [`query`] - Wire query string parsing
//! - [`request`] - Signing and authentication of a request

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod params;
pub mod query;
pub mod request;

pub use credentials::{Credential, CredentialProvider, StaticCredentialProvider};
pub use error::AuthError;
pub use params::ParamValue;
pub use request::{AUTH_VERSION, SignableRequest};
