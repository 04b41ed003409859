//! # Login Throttle
//!
//! A process-local counter of login attempts per source address. The window
//! for a source opens on its first attempt; once it has elapsed the next
//! attempt starts a fresh window. State lives only in memory and is lost on
//! restart, so it only limits a single instance.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Mutex,
    time::{Duration, Instant},
};

use axum::http::HeaderMap;

/// Entries kept before expired windows are swept.
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    opened_at: Instant,
}

#[derive(Debug)]
pub struct LoginThrottle {
    max_attempts: u32,
    window: Duration,
    attempts: Mutex<HashMap<String, Window>>,
}

impl LoginThrottle {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Records an attempt for `key` and reports whether it is allowed.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    /// [`check`](Self::check) with an explicit clock reading.
    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        // A poisoned map only holds counters, so keep using it
        let mut attempts = self
            .attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if attempts.len() >= PRUNE_THRESHOLD {
            let window = self.window;
            attempts.retain(|_, entry| now.duration_since(entry.opened_at) <= window);
        }

        let entry = attempts.entry(key.to_string()).or_insert(Window {
            count: 0,
            opened_at: now,
        });
        if now.duration_since(entry.opened_at) > self.window {
            *entry = Window {
                count: 0,
                opened_at: now,
            };
        }

        entry.count += 1;
        entry.count <= self.max_attempts
    }
}

/// Throttle key for a request: the first `X-Forwarded-For` hop, else the
/// peer address, else `unknown`.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string);

    let source = forwarded
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string());

    format!("login:{}", source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_header_wins_over_peer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        let peer: SocketAddr = "127.0.0.1:5000".parse().unwrap();

        assert_eq!(client_key(&headers, Some(peer)), "login:203.0.113.7");
        assert_eq!(client_key(&HeaderMap::new(), Some(peer)), "login:127.0.0.1");
        assert_eq!(client_key(&HeaderMap::new(), None), "login:unknown");
    }
}
