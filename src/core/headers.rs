//! Header normalization
//!
//! Captured header maps keep the caller's key casing; nothing here folds case.

use std::collections::BTreeMap;

/// Single-valued header map
pub type HeaderMap = BTreeMap<String, String>;
/// Multi-valued header map
pub type MultiHeaderMap = BTreeMap<String, Vec<String>>;

/// Return the headers to record, never absent
pub fn normalize_headers(headers: Option<&HeaderMap>) -> HeaderMap {
    match headers {
        Some(headers) if !headers.is_empty() => headers.clone(),
        _ => HeaderMap::new(),
    }
}

/// Fold a multi-valued map into the single-valued one
///
/// Keys already present in `single` win. Keys only found in `multi`
/// contribute their values joined with `","`.
pub fn merge_multi_value_headers(single: &HeaderMap, multi: &MultiHeaderMap) -> HeaderMap {
    let mut merged = single.clone();
    for (name, values) in multi {
        if values.is_empty() || merged.contains_key(name) {
            continue;
        }
        merged.insert(name.clone(), values.join(","));
    }
    merged
}

/// Expand every header into a one-element list
pub fn expand_headers(headers: &HeaderMap) -> MultiHeaderMap {
    headers
        .iter()
        .map(|(name, value)| (name.clone(), vec![value.clone()]))
        .collect()
}

/// Case-insensitive header lookup
pub fn find_header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
