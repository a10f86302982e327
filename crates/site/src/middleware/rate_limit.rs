//! Per-client rate limiting with `governor` / `tower_governor`.
//!
//! Two tiers: a strict limiter for the auth form posts (each one costs a
//! backend credential check) and a looser one for the JSON API. Keys are
//! client IPs, taken from the edge proxy's headers when present and from
//! the socket peer address otherwise, so direct connections in local
//! development are limited too instead of erroring.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Proxy headers that may carry the real client IP, most trusted first.
/// `x-forwarded-for` may hold a chain; only the first hop counts.
const CLIENT_IP_HEADERS: [&str; 3] = ["cf-connecting-ip", "x-forwarded-for", "x-real-ip"];

/// The client IP as reported by the edge proxy, if any header parses.
fn forwarded_client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    CLIENT_IP_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .and_then(|value| value.trim().parse().ok())
    })
}

/// Key extractor: proxy headers first, socket peer address as fallback.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if let Some(ip) = forwarded_client_ip(req.headers()) {
            return Ok(ip);
        }
        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for this router.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// One token per `replenish_secs` seconds, up to `burst` stored.
///
/// # Panics
///
/// Does not panic for the non-zero constants this module passes in.
fn limiter(replenish_secs: u64, burst: u32) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(replenish_secs)
        .burst_size(burst)
        .finish()
        .expect("non-zero rate limiter configuration");
    GovernorLayer::new(Arc::new(config))
}

/// Auth form limiter: burst of 5, then one attempt per 6 seconds per IP.
/// Roughly 10 credential checks a minute, enough for a fumbled password
/// and far too slow for a brute force run.
#[must_use]
pub fn auth_rate_limiter() -> RateLimiterLayer {
    limiter(6, 5)
}

/// JSON API limiter: burst of 50, refilling once a second per IP.
#[must_use]
pub fn api_rate_limiter() -> RateLimiterLayer {
    limiter(1, 50)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use tower_governor::key_extractor::KeyExtractor;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                axum::http::HeaderName::try_from(*name).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_forwarded_ip_prefers_cloudflare_header() {
        let map = headers(&[
            ("x-forwarded-for", "10.0.0.1"),
            ("cf-connecting-ip", "203.0.113.9"),
        ]);
        assert_eq!(forwarded_client_ip(&map), Some("203.0.113.9".parse().unwrap()));
    }

    #[test]
    fn test_forwarded_ip_takes_first_hop_of_chain() {
        let map = headers(&[("x-forwarded-for", "198.51.100.4, 10.0.0.1, 10.0.0.2")]);
        assert_eq!(forwarded_client_ip(&map), Some("198.51.100.4".parse().unwrap()));
    }

    #[test]
    fn test_forwarded_ip_ignores_garbage() {
        let map = headers(&[("x-forwarded-for", "not-an-ip")]);
        assert_eq!(forwarded_client_ip(&map), None);
    }

    #[test]
    fn test_extractor_falls_back_to_peer_address() {
        let peer: SocketAddr = "192.0.2.20:50000".parse().unwrap();
        let mut request = Request::builder().uri("/auth/login").body(()).unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));

        assert_eq!(
            ClientIpKeyExtractor.extract(&request).unwrap(),
            peer.ip()
        );
    }

    #[test]
    fn test_extractor_errors_without_any_source() {
        let request = Request::builder().uri("/auth/login").body(()).unwrap();
        assert!(ClientIpKeyExtractor.extract(&request).is_err());
    }
}
