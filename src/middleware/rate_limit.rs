// Rate limiting middleware for account registration
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::{ErrorMessage, HttpError};

pub const REGISTRATION_MAX_REQUESTS: usize = 3;
pub const REGISTRATION_WINDOW: Duration = Duration::from_secs(300);

const PRUNE_THRESHOLD: usize = 10_000;

/// Sliding-window limiter keyed by client.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    requests: Arc<Mutex<HashMap<String, Vec<Instant>>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    pub fn is_allowed(&self, key: &str) -> bool {
        self.is_allowed_at(key, Instant::now())
    }

    fn is_allowed_at(&self, key: &str, now: Instant) -> bool {
        let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);

        if requests.len() > PRUNE_THRESHOLD {
            let window = self.window;
            requests.retain(|_, hits| {
                hits.retain(|&t| now.duration_since(t) < window);
                !hits.is_empty()
            });
        }

        let entry = requests.entry(key.to_string()).or_default();

        // Remove old requests outside the window
        entry.retain(|&timestamp| now.duration_since(timestamp) < self.window);

        if entry.len() < self.max_requests {
            entry.push(now);
            true
        } else {
            false
        }
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let client_id = get_client_id(&request);

    if !limiter.is_allowed(&client_id) {
        tracing::warn!("Rate limit exceeded for {} on {}", client_id, request.uri().path());
        return Err(HttpError::too_many_requests(
            ErrorMessage::TooManyRequests.to_string(),
        ));
    }

    Ok(next.run(request).await)
}

/// Forwarding headers first, then the peer address of the connection.
fn get_client_id(request: &Request) -> String {
    let headers = request.headers();

    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
        })
        .map(str::to_string)
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// 3 registrations per 5 minutes per client.
pub fn registration_rate_limiter() -> RateLimiter {
    RateLimiter::new(REGISTRATION_MAX_REQUESTS, REGISTRATION_WINDOW)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http};

    #[test]
    fn fourth_request_in_window_is_denied() {
        let limiter = registration_rate_limiter();
        let start = Instant::now();

        assert!(limiter.is_allowed_at("203.0.113.7", start));
        assert!(limiter.is_allowed_at("203.0.113.7", start + Duration::from_secs(10)));
        assert!(limiter.is_allowed_at("203.0.113.7", start + Duration::from_secs(20)));
        assert!(!limiter.is_allowed_at("203.0.113.7", start + Duration::from_secs(30)));

        assert!(limiter.is_allowed_at("198.51.100.2", start + Duration::from_secs(30)));
    }

    #[test]
    fn window_slides() {
        let limiter = registration_rate_limiter();
        let start = Instant::now();

        for i in 0..3 {
            assert!(limiter.is_allowed_at("ip", start + Duration::from_secs(i * 100)));
        }
        assert!(!limiter.is_allowed_at("ip", start + Duration::from_secs(299)));
        assert!(limiter.is_allowed_at("ip", start + Duration::from_secs(300)));
    }

    #[test]
    fn client_id_prefers_first_forwarded_hop() {
        let request = http::Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .header("x-real-ip", "10.0.0.9")
            .body(Body::empty())
            .unwrap();
        assert_eq!(get_client_id(&request), "203.0.113.7");

        let request = http::Request::builder()
            .header("x-real-ip", "10.0.0.9")
            .body(Body::empty())
            .unwrap();
        assert_eq!(get_client_id(&request), "10.0.0.9");

        let request = http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(get_client_id(&request), "unknown");
    }

    #[test]
    fn client_id_falls_back_to_peer_address() {
        let peer: SocketAddr = "192.0.2.44:51234".parse().unwrap();
        let request = http::Request::builder()
            .extension(ConnectInfo(peer))
            .body(Body::empty())
            .unwrap();
        assert_eq!(get_client_id(&request), "192.0.2.44");

        let request = http::Request::builder()
            .header("x-real-ip", "10.0.0.9")
            .extension(ConnectInfo(peer))
            .body(Body::empty())
            .unwrap();
        assert_eq!(get_client_id(&request), "10.0.0.9");
    }
}
