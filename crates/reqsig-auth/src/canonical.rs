//! Canonical string construction and HMAC-SHA256 signing.
//!
//! The string to sign has three newline-separated lines:
//!
//! ```text
//! METHOD\n
//! path\n
//! key1=value1&key2=value2...
//! ```
//!
//! The parameter line is the union of plain and auth parameters, keys
//! lower-cased, `auth_signature` removed, sorted by byte order of the key.
//!
//! # Encoding policy
//!
//! Pairs are first rendered as a query string with every byte outside
//! `A-Z a-z 0-9 - _ . ! ~ * ' ( )` percent-encoded ([`encode_query`]); that
//! is the form sent on the wire. The canonical line then reverses the escapes
//! of every character except `%`, `&` and `=` ([`unescape`]). Those three stay
//! encoded (`%25`, `%26`, `%3D`) so a value can never read as a pair separator.
//! Values keep their case.
//! Lists emit one `key[]=element` pair per element in order and empty lists
//! emit nothing. Structured values emit their compact JSON text, `null`
//! emits an empty value.

use std::borrow::Cow;

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use sha2::Sha256;

use crate::params::{AuthParameters, ParamValue, Parameters};

/// The auth field excluded from the string to sign.
pub const SIGNATURE_FIELD: &str = "auth_signature";

/// Characters kept percent-encoded in the canonical parameter line.
const CANONICAL_RESERVED: &AsciiSet = &AsciiSet::EMPTY.add(b'%').add(b'&').add(b'=');

/// Characters left unencoded in query keys and values.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

type HmacSha256 = Hmac<Sha256>;

/// Merge plain and auth parameters; auth values win on a key collision.
#[must_use]
pub fn merge_params(params: &Parameters, auth: &AuthParameters) -> Parameters {
    let mut merged = params.clone();
    merged.extend(
        auth.iter()
            .map(|(k, v)| (k.clone(), ParamValue::Scalar(v.clone()))),
    );
    merged
}

/// Flatten parameters into ordered `(key, value)` pairs.
///
/// Keys come out in map order; list elements keep their original order.
#[must_use]
pub fn flatten_params(params: &Parameters) -> Vec<(&str, Cow<'_, str>)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        match value {
            ParamValue::Scalar(s) => pairs.push((key.as_str(), Cow::Borrowed(s.as_str()))),
            ParamValue::List(items) => {
                pairs.extend(items.iter().map(|s| (key.as_str(), Cow::Borrowed(s.as_str()))));
            }
            ParamValue::Structured(v) => pairs.push((key.as_str(), structured_text(v))),
        }
    }
    pairs
}

/// Render pairs as a percent-encoded query string.
///
/// # Examples
///
/// ```
/// use reqsig_auth::canonical::encode_query;
///
/// let pairs = [("q", "a b&c"), ("ids[]", "1")];
/// assert_eq!(encode_query(pairs), "q=a%20b%26c&ids%5B%5D=1");
/// ```
pub fn encode_query<'a, I, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, V)>,
    V: AsRef<str>,
{
    pairs
        .into_iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, QUERY_COMPONENT),
                utf8_percent_encode(v.as_ref(), QUERY_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Reverse the escapes of an [`encode_query`] string, keeping `%`, `&` and `=`
/// encoded.
///
/// # Examples
///
/// ```
/// use reqsig_auth::canonical::unescape;
///
/// assert_eq!(unescape("q=a%20b%26c%3Dd&ids%5B%5D=1"), "q=a b%26c%3Dd&ids[]=1");
/// ```
#[must_use]
pub fn unescape(input: &str) -> String {
    input
        .split('&')
        .map(|pair| {
            pair.split('=')
                .map(|component| {
                    let decoded = percent_decode_str(component).decode_utf8_lossy();
                    utf8_percent_encode(&decoded, CANONICAL_RESERVED).to_string()
                })
                .collect::<Vec<_>>()
                .join("=")
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical parameter line.
///
/// Values are case-preserving: only keys are lower-cased.
///
/// # Examples
///
/// ```
/// use reqsig_auth::canonical::parameter_string;
/// use reqsig_auth::params::{AuthParameters, ParamValue, Parameters};
///
/// let mut params = Parameters::new();
/// params.insert("color".to_owned(), ParamValue::from("Red"));
/// let mut auth = AuthParameters::new();
/// auth.insert("auth_key".to_owned(), "k1".to_owned());
/// auth.insert("auth_signature".to_owned(), "ignored".to_owned());
///
/// assert_eq!(parameter_string(&params, &auth), "auth_key=k1&color=Red");
/// ```
#[must_use]
pub fn parameter_string(params: &Parameters, auth: &AuthParameters) -> String {
    let mut lowered = Parameters::new();
    for (key, value) in merge_params(params, auth) {
        lowered.insert(key.to_lowercase(), value);
    }
    lowered.remove(SIGNATURE_FIELD);

    unescape(&encode_query(flatten_params(&lowered)))
}

/// Join method, path, and parameter line into the string to sign.
#[must_use]
pub fn string_to_sign(method: &str, path: &str, parameter_string: &str) -> String {
    format!("{method}\n{path}\n{parameter_string}")
}

/// Compute the lower-case hex HMAC-SHA256 of `string_to_sign` keyed by `secret`.
///
/// # Examples
///
/// ```
/// use reqsig_auth::canonical::compute_signature;
///
/// let sig = compute_signature("s1", "GET\n/widgets\n");
/// assert_eq!(sig.len(), 64);
/// assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
/// ```
#[must_use]
pub fn compute_signature(secret: &str, string_to_sign: &str) -> String {
    let mut mac = <HmacSha256 as KeyInit>::new_from_slice(secret.as_bytes())
        .expect("HMAC can accept keys of any length");
    mac.update(string_to_sign.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn structured_text(value: &serde_json::Value) -> Cow<'_, str> {
    match value {
        serde_json::Value::Null => Cow::Borrowed(""),
        serde_json::Value::String(s) => Cow::Borrowed(s.trim()),
        other => Cow::Owned(other.to_string()),
    }
}
