//! Credentials and credential lookup.
//!
//! A [`Credential`] is the `(identifier, secret)` pair both sides hold. The
//! [`CredentialProvider`] trait lets a verifier resolve the credential named by
//! an incoming `auth_key`, with [`StaticCredentialProvider`] as the in-memory
//! implementation.

use std::collections::HashMap;
use std::fmt;

use crate::error::AuthError;

/// A public identifier and the shared secret it signs with.
///
/// No validation happens at construction; an empty secret is rejected only
/// where one is needed to verify.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    identifier: String,
    secret: String,
}

impl Credential {
    /// Create a credential from its identifier and secret.
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    /// The public identifier, sent in clear as `auth_key`.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The shared secret. Never transmitted.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Trait for resolving credentials by identifier.
///
/// Implementations may back this with a database, configuration file,
/// or any other credential store.
pub trait CredentialProvider: Send + Sync {
    /// Retrieve the credential for the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AccessKeyNotFound`] if the identifier is not recognized.
    fn get_credential(&self, identifier: &str) -> Result<Credential, AuthError>;
}

/// A simple in-memory credential provider backed by a `HashMap`.
///
/// # Examples
///
/// ```
/// use reqsig_auth::credentials::{CredentialProvider, StaticCredentialProvider};
///
/// let provider = StaticCredentialProvider::new(vec![
///     ("k1".to_owned(), "s1".to_owned()),
/// ]);
///
/// let credential = provider.get_credential("k1").unwrap();
/// assert_eq!(credential.secret(), "s1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialProvider {
    secrets: HashMap<String, String>,
}

impl StaticCredentialProvider {
    /// Create a provider from an iterable of `(identifier, secret)` pairs.
    pub fn new(credentials: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            secrets: credentials.into_iter().collect(),
        }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn get_credential(&self, identifier: &str) -> Result<Credential, AuthError> {
        self.secrets
            .get(identifier)
            .map(|secret| Credential::new(identifier, secret.clone()))
            .ok_or_else(|| AuthError::AccessKeyNotFound(identifier.to_owned()))
    }
}
