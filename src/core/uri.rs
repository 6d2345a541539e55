//! Request URI reconstruction
//!
//! API Gateway never hands over the URI the client used, only fragments of
//! it. The proxy (V1) event carries a path and decoded query parameter maps;
//! the HTTP (V2) event carries the raw path and the raw query string.

use super::headers::{HeaderMap, find_header};
use std::collections::BTreeMap;
use url::form_urlencoded;

const DEFAULT_SCHEME: &str = "http";
const DEFAULT_HOST: &str = "localhost";

/// Rebuild the URI of a proxy (V1) request
///
/// The multi-value parameter map is preferred over the single-value one when
/// both are present. Keys and values are form-encoded.
pub fn path_style_uri(
    headers: &HeaderMap,
    path: &str,
    query: &BTreeMap<String, String>,
    multi_value_query: &BTreeMap<String, Vec<String>>,
) -> String {
    let mut uri = String::new();
    uri.push_str(find_header(headers, "X-Forwarded-Proto").unwrap_or(DEFAULT_SCHEME));
    uri.push_str("://");
    uri.push_str(find_header(headers, "Host").unwrap_or(DEFAULT_HOST));
    uri.push_str(if path.is_empty() { "/" } else { path });

    if !multi_value_query.is_empty() {
        let pairs = multi_value_query
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |value| (key.as_str(), value.as_str())));
        uri.push('?');
        uri.push_str(&encode_pairs(pairs));
    } else if !query.is_empty() {
        let pairs = query.iter().map(|(key, value)| (key.as_str(), value.as_str()));
        uri.push('?');
        uri.push_str(&encode_pairs(pairs));
    }

    uri
}

/// Rebuild the URI of an HTTP API (V2) request
///
/// An empty raw path replaces the whole URI with `/`. The raw query string is
/// already encoded and is appended as is.
pub fn raw_path_uri(headers: &HeaderMap, raw_path: &str, raw_query: &str) -> String {
    let mut uri = if raw_path.is_empty() {
        "/".to_string()
    } else {
        format!(
            "{}://{}{}",
            find_header(headers, "x-forwarded-proto").unwrap_or(DEFAULT_SCHEME),
            find_header(headers, "host").unwrap_or(DEFAULT_HOST),
            raw_path
        )
    };

    if !raw_query.is_empty() {
        uri.push('?');
        uri.push_str(raw_query);
    }

    uri
}

/// Join `key=value` pairs with `&`, form-encoding each side
fn encode_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .map(|(key, value)| format!("{}={}", query_escape(key), query_escape(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Form-encode one query component, keeping `~` and escaping `*`
fn query_escape(component: &str) -> String {
    // A literal `%` is always emitted as `%25`, so `%7E` only comes from `~`
    form_urlencoded::byte_serialize(component.as_bytes())
        .collect::<String>()
        .replace('*', "%2A")
        .replace("%7E", "~")
}
