//! Request parameter values and ingestion rules.
//!
//! Incoming query maps are partitioned into ordinary parameters and `auth_*`
//! parameters. Keys are lower-cased, scalar values trimmed, list-valued keys
//! suffixed with `[]`, and structured values kept exactly as given. A
//! structured JSON string is ingested as a scalar.

use std::collections::BTreeMap;

use crate::error::AuthError;

/// Prefix that routes a parameter into the auth map.
pub const AUTH_PREFIX: &str = "auth_";

/// Suffix appended to the key of a list-valued parameter.
pub const LIST_SUFFIX: &str = "[]";

/// Plain request parameters keyed by their canonical (lower-case) name.
pub type Parameters = BTreeMap<String, ParamValue>;

/// `auth_*` parameters keyed by their lower-case name.
pub type AuthParameters = BTreeMap<String, String>;

/// The value of a single request parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A single string.
    Scalar(String),
    /// An ordered sequence of strings, serialized as repeated `key[]` pairs.
    List(Vec<String>),
    /// Any other JSON value, passed through untrimmed.
    Structured(serde_json::Value),
}

impl ParamValue {
    /// The scalar value, if this is one.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::List(_) | Self::Structured(_) => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(ToOwned::to_owned).collect())
    }
}

impl From<serde_json::Value> for ParamValue {
    /// JSON strings become scalars and arrays of strings become lists; every
    /// other value is kept as structured.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::Scalar(s),
            serde_json::Value::Array(items)
                if items.iter().all(serde_json::Value::is_string) =>
            {
                Self::List(
                    items
                        .into_iter()
                        .filter_map(|item| match item {
                            serde_json::Value::String(s) => Some(s),
                            _ => None,
                        })
                        .collect(),
                )
            }
            other => Self::Structured(other),
        }
    }
}

/// Split a query map into plain and auth parameters.
///
/// # Errors
///
/// Returns [`AuthError::InvalidType`] if an `auth_*` key carries a list or
/// structured value.
///
/// # Examples
///
/// ```
/// use reqsig_auth::params::{ParamValue, partition};
///
/// let (params, auth) = partition(vec![
///     ("Color", ParamValue::from(" Red ")),
///     ("Tags", ParamValue::from(vec!["a ", " b"])),
///     ("AUTH_KEY", ParamValue::from("k1")),
/// ])
/// .unwrap();
///
/// assert_eq!(params["color"], ParamValue::from("Red"));
/// assert_eq!(params["tags[]"], ParamValue::from(vec!["a", "b"]));
/// assert_eq!(auth["auth_key"], "k1");
/// ```
pub fn partition<I, K, V>(query: I) -> Result<(Parameters, AuthParameters), AuthError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<ParamValue>,
{
    let mut params = Parameters::new();
    let mut auth = AuthParameters::new();

    for (key, value) in query {
        let key = key.as_ref().to_lowercase();
        let value = match value.into() {
            ParamValue::Structured(serde_json::Value::String(s)) => ParamValue::Scalar(s),
            other => other,
        };

        if key.starts_with(AUTH_PREFIX) {
            let ParamValue::Scalar(s) = value else {
                return Err(AuthError::InvalidType(format!(
                    "auth parameter {key} must be a string"
                )));
            };
            auth.insert(key, s.trim().to_owned());
            continue;
        }

        match value {
            ParamValue::Scalar(s) => {
                params.insert(key, ParamValue::Scalar(s.trim().to_owned()));
            }
            ParamValue::List(items) => {
                let items = items.iter().map(|s| s.trim().to_owned()).collect();
                params.insert(format!("{key}{LIST_SUFFIX}"), ParamValue::List(items));
            }
            structured @ ParamValue::Structured(_) => {
                params.insert(key, structured);
            }
        }
    }

    Ok((params, auth))
}
