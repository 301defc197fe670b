//! Parsing wire query strings into request parameters.
//!
//! This is the inverse of
//! [`SignableRequest::to_query_string`](crate::SignableRequest::to_query_string):
//! a query produced by a signer parses into parameters whose canonical form
//! is identical.

use std::collections::BTreeMap;

use crate::params::{LIST_SUFFIX, ParamValue};

/// Parse an `application/x-www-form-urlencoded` query string.
///
/// A key ending in `[]` collects into a list under the key without the
/// suffix; a plain key repeated more than once also becomes a list; any other
/// key is a scalar. Keys are returned in first-seen order.
///
/// # Examples
///
/// ```
/// use reqsig_auth::params::ParamValue;
/// use reqsig_auth::query::parse_query;
///
/// let parsed = parse_query("color=Red&ids%5B%5D=1&ids%5B%5D=2&q=a+b");
/// assert_eq!(
///     parsed,
///     vec![
///         ("color".to_owned(), ParamValue::from("Red")),
///         ("ids".to_owned(), ParamValue::from(vec!["1", "2"])),
///         ("q".to_owned(), ParamValue::from("a b")),
///     ]
/// );
/// ```
#[must_use]
pub fn parse_query(raw: &str) -> Vec<(String, ParamValue)> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    let mut positions: BTreeMap<String, usize> = BTreeMap::new();

    for (key, value) in form_urlencoded::parse(raw.trim_start_matches('?').as_bytes()) {
        if let Some(&index) = positions.get(&*key) {
            grouped[index].1.push(value.into_owned());
        } else {
            positions.insert(key.to_string(), grouped.len());
            grouped.push((key.into_owned(), vec![value.into_owned()]));
        }
    }

    grouped
        .into_iter()
        .map(|(key, mut values)| match key.strip_suffix(LIST_SUFFIX) {
            Some(base) => (base.to_owned(), ParamValue::List(values)),
            None if values.len() > 1 => (key, ParamValue::List(values)),
            None => (key, ParamValue::Scalar(values.pop().unwrap_or_default())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_return_empty_for_empty_query() {
        assert!(parse_query("").is_empty());
        assert!(parse_query("?").is_empty());
    }

    #[test]
    fn test_should_collect_repeated_plain_keys_into_list() {
        assert_eq!(
            parse_query("k=a&k=b"),
            vec![("k".to_owned(), ParamValue::from(vec!["a", "b"]))]
        );
    }

    #[test]
    fn test_should_keep_scalar_and_bracketed_keys_apart() {
        assert_eq!(
            parse_query("tag=x&tag[]=y"),
            vec![
                ("tag".to_owned(), ParamValue::from("x")),
                ("tag".to_owned(), ParamValue::from(vec!["y"])),
            ]
        );
    }

    #[test]
    fn test_should_keep_first_seen_order_for_interleaved_repeats() {
        assert_eq!(
            parse_query("b=1&a=2&b=3&c=4&a=5"),
            vec![
                ("b".to_owned(), ParamValue::from(vec!["1", "3"])),
                ("a".to_owned(), ParamValue::from(vec!["2", "5"])),
                ("c".to_owned(), ParamValue::from("4")),
            ]
        );
    }

    #[test]
    fn test_should_group_many_distinct_keys() {
        let raw = (0..2000)
            .map(|i| format!("k{i}=v&k{i}=w"))
            .collect::<Vec<_>>()
            .join("&");
        let parsed = parse_query(&raw);
        assert_eq!(parsed.len(), 2000);
        assert_eq!(parsed[1999], ("k1999".to_owned(), ParamValue::from(vec!["v", "w"])));
    }

    #[test]
    fn test_should_decode_percent_escapes() {
        assert_eq!(
            parse_query("q=a%20b%26c&auth_key=k%2F1"),
            vec![
                ("q".to_owned(), ParamValue::from("a b&c")),
                ("auth_key".to_owned(), ParamValue::from("k/1")),
            ]
        );
    }

    #[test]
    fn test_should_treat_missing_value_as_empty() {
        assert_eq!(
            parse_query("flag"),
            vec![("flag".to_owned(), ParamValue::from(""))]
        );
    }
}
