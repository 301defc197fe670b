//! Signable requests: signing on the client, authentication on the server.
//!
//! A client builds a [`SignableRequest`] from method, path, and query
//! parameters, calls [`sign`](SignableRequest::sign), and transmits
//! [`signed_params`](SignableRequest::signed_params). A server rebuilds the
//! request from what it received (auth parameters included) and calls
//! [`authenticate`](SignableRequest::authenticate), which checks in order:
//!
//! 1. `auth_version` is [`AUTH_VERSION`]
//! 2. `auth_timestamp` is within the grace window (skipped when the window is 0)
//! 3. `auth_signature` equals the signature recomputed from the request

use reqsig_core::{Clock, SystemClock, VerifyConfig};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{self, SIGNATURE_FIELD};
use crate::credentials::{Credential, CredentialProvider};
use crate::error::AuthError;
use crate::params::{AUTH_PREFIX, AuthParameters, ParamValue, Parameters, partition};
use crate::query::parse_query;

/// The only signing scheme version this implementation produces and accepts.
pub const AUTH_VERSION: &str = "1.0";

/// An HTTP-like request that can be signed or authenticated.
///
/// Instances are meant for a single sign-or-authenticate cycle.
#[derive(Debug, Clone)]
pub struct SignableRequest {
    method: String,
    path: String,
    parameters: Parameters,
    auth_parameters: AuthParameters,
    signed: bool,
}

impl SignableRequest {
    /// Build a request from method, path, and parsed query parameters.
    ///
    /// The method is upper-cased and the path kept verbatim. Parameters follow
    /// the ingestion rules of [`partition`].
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidType`] if an `auth_*` parameter is not a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use reqsig_auth::SignableRequest;
    ///
    /// let request = SignableRequest::new("get", "/widgets", vec![("Color", "Red ")]).unwrap();
    /// assert_eq!(request.method(), "GET");
    /// assert_eq!(request.parameter_string(), "color=Red");
    /// ```
    pub fn new<I, K, V>(method: &str, path: impl Into<String>, query: I) -> Result<Self, AuthError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ParamValue>,
    {
        let (parameters, auth_parameters) = partition(query)?;
        Ok(Self {
            method: method.to_uppercase(),
            path: path.into(),
            parameters,
            auth_parameters,
            signed: false,
        })
    }

    /// Build a request from an `http` request head.
    ///
    /// The URI path is used verbatim and its query string is parsed with
    /// [`parse_query`].
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidType`] if an `auth_*` parameter is repeated.
    pub fn from_parts(parts: &http::request::Parts) -> Result<Self, AuthError> {
        let query = parts.uri.query().map(parse_query).unwrap_or_default();
        Self::new(parts.method.as_str(), parts.uri.path(), query)
    }

    /// The upper-cased method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The path, exactly as given.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The plain (non-auth) parameters.
    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Whether [`sign`](Self::sign) has been called on this instance.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Sign the request with the system clock.
    ///
    /// See [`sign_with_clock`](Self::sign_with_clock).
    pub fn sign(&mut self, credential: &Credential) -> &AuthParameters {
        self.sign_with_clock(credential, &SystemClock)
    }

    /// Sign the request, replacing any auth parameters it carried.
    ///
    /// Sets `auth_version`, `auth_key`, and `auth_timestamp`, then computes
    /// `auth_signature` over the result and marks the request signed.
    pub fn sign_with_clock(&mut self, credential: &Credential, clock: &dyn Clock) -> &AuthParameters {
        let timestamp = clock.now_unix_secs();

        self.auth_parameters = AuthParameters::from([
            (auth_key("version"), AUTH_VERSION.to_owned()),
            (auth_key("key"), credential.identifier().to_owned()),
            (auth_key("timestamp"), timestamp.to_string()),
        ]);

        let signature = self.signature(credential);
        debug!(
            key = %credential.identifier(),
            timestamp,
            signature = %signature,
            "Signed request"
        );

        self.auth_parameters
            .insert(SIGNATURE_FIELD.to_owned(), signature);
        self.signed = true;
        &self.auth_parameters
    }

    /// Plain and auth parameters merged; auth values win on collision.
    #[must_use]
    pub fn signed_params(&self) -> Parameters {
        canonical::merge_params(&self.parameters, &self.auth_parameters)
    }

    /// The canonical parameter line of the string to sign.
    ///
    /// Keys are lower-cased; values keep their case (`Red` stays `Red`).
    #[must_use]
    pub fn parameter_string(&self) -> String {
        canonical::parameter_string(&self.parameters, &self.auth_parameters)
    }

    /// The three-line canonical string: method, path, parameter line.
    #[must_use]
    pub fn string_to_sign(&self) -> String {
        canonical::string_to_sign(&self.method, &self.path, &self.parameter_string())
    }

    /// Hex HMAC-SHA256 of [`string_to_sign`](Self::string_to_sign) under the credential's secret.
    #[must_use]
    pub fn signature(&self, credential: &Credential) -> String {
        canonical::compute_signature(credential.secret(), &self.string_to_sign())
    }

    /// The merged parameters rendered as a percent-encoded query string.
    ///
    /// # Examples
    ///
    /// ```
    /// use reqsig_auth::SignableRequest;
    ///
    /// let request =
    ///     SignableRequest::new("GET", "/", vec![("q", "a b"), ("auth_key", "k1")]).unwrap();
    /// assert_eq!(request.to_query_string(), "auth_key=k1&q=a%20b");
    /// ```
    #[must_use]
    pub fn to_query_string(&self) -> String {
        canonical::encode_query(canonical::flatten_params(&self.signed_params()))
    }

    /// Authenticate the request against the system clock.
    ///
    /// See [`authenticate_with_clock`](Self::authenticate_with_clock).
    pub fn authenticate(
        &self,
        credential: &Credential,
        config: &VerifyConfig,
    ) -> Result<bool, AuthError> {
        self.authenticate_with_clock(credential, config, &SystemClock)
    }

    /// Check version, timestamp freshness, and signature, in that order.
    ///
    /// Returns `Ok(true)` when every check passes. On the first failing check
    /// the error is returned if `config.raise_on_failure` is set, otherwise
    /// `Ok(false)`.
    ///
    /// # Errors
    ///
    /// [`AuthError::MissingSecret`] if the credential's secret is empty, regardless
    /// of `raise_on_failure`. Otherwise the failing check's error, when
    /// `raise_on_failure` is set.
    pub fn authenticate_with_clock(
        &self,
        credential: &Credential,
        config: &VerifyConfig,
        clock: &dyn Clock,
    ) -> Result<bool, AuthError> {
        if credential.secret().is_empty() {
            return Err(AuthError::MissingSecret);
        }

        let outcome = self
            .validate_version()
            .and_then(|()| self.validate_timestamp(config.timestamp_grace_secs, clock))
            .and_then(|()| self.validate_signature(credential));

        settle(outcome, config)
    }

    /// Resolve the credential named by `auth_key` and authenticate with it,
    /// against the system clock.
    ///
    /// See [`authenticate_with_provider_and_clock`](Self::authenticate_with_provider_and_clock).
    pub fn authenticate_with_provider(
        &self,
        provider: &dyn CredentialProvider,
        config: &VerifyConfig,
    ) -> Result<bool, AuthError> {
        self.authenticate_with_provider_and_clock(provider, config, &SystemClock)
    }

    /// Resolve the credential named by `auth_key` and authenticate with it.
    ///
    /// A missing `auth_key` or an unknown identifier counts as an
    /// authentication failure and follows `config.raise_on_failure`.
    pub fn authenticate_with_provider_and_clock(
        &self,
        provider: &dyn CredentialProvider,
        config: &VerifyConfig,
        clock: &dyn Clock,
    ) -> Result<bool, AuthError> {
        let credential = match self
            .auth_field("key")
            .and_then(|identifier| provider.get_credential(identifier))
        {
            Ok(credential) => credential,
            Err(e) => return settle(Err(e), config),
        };
        self.authenticate_with_clock(&credential, config, clock)
    }

    /// The auth parameters produced by [`sign`](Self::sign).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotSigned`] unless this instance was signed.
    pub fn auth_dict(&self) -> Result<&AuthParameters, AuthError> {
        if self.signed {
            Ok(&self.auth_parameters)
        } else {
            Err(AuthError::NotSigned)
        }
    }

    /// Look up `auth_<field>`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingParameter`] if the field is absent.
    pub fn auth_field(&self, field: &str) -> Result<&str, AuthError> {
        self.auth_parameters
            .get(&auth_key(field))
            .map(String::as_str)
            .ok_or_else(|| AuthError::MissingParameter(field.to_owned()))
    }

    fn validate_version(&self) -> Result<(), AuthError> {
        let version = self.auth_field("version")?;
        if version == AUTH_VERSION {
            Ok(())
        } else {
            Err(AuthError::UnsupportedVersion(version.to_owned()))
        }
    }

    fn validate_timestamp(&self, grace: u64, clock: &dyn Clock) -> Result<(), AuthError> {
        if grace == 0 {
            return Ok(());
        }

        let raw = self.auth_field("timestamp")?;
        let timestamp: i64 = raw
            .parse()
            .map_err(|_| AuthError::InvalidTimestamp(raw.to_owned()))?;
        let now = clock.now_unix_secs();
        let age = now.saturating_sub(timestamp);

        if age < 0 {
            // Only lateness is enforced; early timestamps pass.
            debug!(timestamp, now, "Request timestamp is ahead of verifier clock");
        }

        if i128::from(age) >= i128::from(grace) {
            return Err(AuthError::Expired {
                timestamp,
                grace,
                now,
            });
        }
        Ok(())
    }

    fn validate_signature(&self, credential: &Credential) -> Result<(), AuthError> {
        let provided = self.auth_field("signature")?;
        let string_to_sign = self.string_to_sign();
        let expected = canonical::compute_signature(credential.secret(), &string_to_sign);

        if provided.as_bytes().ct_eq(expected.as_bytes()).into() {
            debug!(key = %credential.identifier(), "Signature verification succeeded");
            Ok(())
        } else {
            debug!(
                expected = %expected,
                provided = %provided,
                string_to_sign = ?string_to_sign,
                "Signature mismatch"
            );
            Err(AuthError::InvalidSignature {
                string_to_sign,
                provided: provided.to_owned(),
            })
        }
    }
}

fn auth_key(field: &str) -> String {
    format!("{AUTH_PREFIX}{field}")
}

fn settle(outcome: Result<(), AuthError>, config: &VerifyConfig) -> Result<bool, AuthError> {
    match outcome {
        Ok(()) => Ok(true),
        Err(e) if config.raise_on_failure => Err(e),
        Err(e) => {
            debug!(error = %e, "Authentication failed");
            Ok(false)
        }
    }
}
