//! Client IP resolution
//!
//! Lambda sits behind API Gateway and usually a CDN, so the peer address is
//! rarely the client. The resolver walks the usual forwarding headers and
//! falls back to the address reported by the platform.

use super::headers::MultiHeaderMap;
use std::net::IpAddr;

/// Resolves the originating client address of a request
pub trait ClientIpResolver: Send + Sync {
    fn resolve(&self, headers: &MultiHeaderMap, fallback: Option<&str>) -> Option<String>;
}

/// Header lookup order used by [`HeaderIpResolver`]
const FORWARDING_HEADERS: &[&str] = &[
    "x-client-ip",
    "x-forwarded-for",
    "cf-connecting-ip",
    "true-client-ip",
    "x-real-ip",
    "x-cluster-client-ip",
    "x-forwarded",
    "forwarded-for",
    "forwarded",
];

/// Resolver that inspects well-known forwarding headers
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderIpResolver;

impl ClientIpResolver for HeaderIpResolver {
    fn resolve(&self, headers: &MultiHeaderMap, fallback: Option<&str>) -> Option<String> {
        for wanted in FORWARDING_HEADERS {
            let values = headers
                .iter()
                .filter(|(name, _)| name.eq_ignore_ascii_case(wanted))
                .flat_map(|(_, values)| values.iter());

            for value in values {
                if let Some(ip) = first_address(value) {
                    return Some(ip);
                }
            }
        }

        fallback.filter(|ip| !ip.is_empty()).map(str::to_string)
    }
}

/// First valid address in a comma separated forwarding value
fn first_address(value: &str) -> Option<String> {
    value.split(',').find_map(|candidate| {
        let candidate = candidate.trim();
        let candidate = candidate
            .split(';')
            .find_map(|part| part.trim().strip_prefix("for="))
            .unwrap_or(candidate);
        parse_address(candidate.trim_matches('"'))
    })
}

/// Parse an address, tolerating a port suffix and IPv6 brackets
fn parse_address(candidate: &str) -> Option<String> {
    if let Ok(ip) = candidate.parse::<IpAddr>() {
        return Some(ip.to_string());
    }

    if let Some(rest) = candidate.strip_prefix('[') {
        let host = rest.split(']').next()?;
        return host.parse::<IpAddr>().ok().map(|ip| ip.to_string());
    }

    let (host, port) = candidate.rsplit_once(':')?;
    if port.chars().all(|c| c.is_ascii_digit()) {
        host.parse::<IpAddr>().ok().map(|ip| ip.to_string())
    } else {
        None
    }
}
