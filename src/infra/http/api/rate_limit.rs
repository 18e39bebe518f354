//! Fixed-window request throttle for the write endpoints.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimit {
    pub const fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

/// Per-endpoint buckets with the limits the site's scripts already observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Likes,
    Comments,
    Newsletter,
    Views,
}

impl Bucket {
    pub const fn as_str(self) -> &'static str {
        match self {
            Bucket::Likes => "likes",
            Bucket::Comments => "comments",
            Bucket::Newsletter => "newsletter",
            Bucket::Views => "views",
        }
    }

    pub const fn limit(self) -> RateLimit {
        match self {
            Bucket::Likes => RateLimit::new(5, Duration::from_secs(60)),
            Bucket::Comments => RateLimit::new(3, Duration::from_secs(60)),
            Bucket::Newsletter => RateLimit::new(2, Duration::from_secs(300)),
            Bucket::Views => RateLimit::new(30, Duration::from_secs(60)),
        }
    }

    /// Bucket guarding a write to `path`; reads are never throttled.
    pub fn for_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "/api/likes" => Some(Bucket::Likes),
            "/api/comments" => Some(Bucket::Comments),
            "/api/newsletter" => Some(Bucket::Newsletter),
            "/api/views" => Some(Bucket::Views),
            _ => None,
        }
    }
}

/// Checks between sweeps of expired windows.
const SWEEP_EVERY: u64 = 1024;

#[derive(Debug, Clone, Copy)]
struct Window {
    requests: u32,
    window_start: Instant,
    length: Duration,
}

impl Window {
    fn open(now: Instant, length: Duration) -> Self {
        Self {
            requests: 0,
            window_start: now,
            length,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.window_start) > self.length
    }
}

/// Owned by the router state; independent instances never share counters.
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    windows: Arc<DashMap<String, Window>>,
    checks: Arc<AtomicU64>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request against `key`. A window resets once strictly more
    /// than `limit.window` has passed since it opened.
    pub fn check(&self, key: &str, limit: RateLimit) -> Result<(), Duration> {
        self.check_at(key, limit, Instant::now())
    }

    pub fn check_at(&self, key: &str, limit: RateLimit, now: Instant) -> Result<(), Duration> {
        if self.checks.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            self.sweep(now);
        }

        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert_with(|| Window::open(now, limit.window));

        if entry.is_expired(now) {
            *entry = Window::open(now, limit.window);
        }

        if entry.requests >= limit.max_requests {
            let elapsed = now.saturating_duration_since(entry.window_start);
            return Err(limit.window.saturating_sub(elapsed));
        }

        entry.requests += 1;
        Ok(())
    }

    /// Drop every window that has fully elapsed; returns how many were removed.
    pub fn sweep(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, window| !window.is_expired(now));
        before.saturating_sub(self.windows.len())
    }

    /// Seconds a client should wait, never less than one.
    pub fn retry_after_secs(wait: Duration) -> u64 {
        wait.as_secs_f64().ceil().max(1.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: RateLimit = RateLimit::new(2, Duration::from_secs(60));

    #[test]
    fn allows_up_to_the_limit_then_rejects() {
        let limiter = RateLimiter::new();
        let start = Instant::now();

        assert!(limiter.check_at("k", LIMIT, start).is_ok());
        assert!(limiter.check_at("k", LIMIT, start).is_ok());
        let wait = limiter
            .check_at("k", LIMIT, start + Duration::from_secs(10))
            .expect_err("third request is throttled");
        assert_eq!(wait, Duration::from_secs(50));
    }

    #[test]
    fn window_resets_only_after_it_has_fully_elapsed() {
        let limiter = RateLimiter::new();
        let start = Instant::now();
        limiter.check_at("k", LIMIT, start).expect("first");
        limiter.check_at("k", LIMIT, start).expect("second");

        assert!(limiter.check_at("k", LIMIT, start + LIMIT.window).is_err());
        assert!(
            limiter
                .check_at("k", LIMIT, start + LIMIT.window + Duration::from_millis(1))
                .is_ok()
        );
    }

    #[test]
    fn keys_and_instances_are_independent() {
        let first = RateLimiter::new();
        let second = RateLimiter::new();
        let now = Instant::now();
        first.check_at("a", LIMIT, now).expect("a1");
        first.check_at("a", LIMIT, now).expect("a2");

        assert!(first.check_at("a", LIMIT, now).is_err());
        assert!(first.check_at("b", LIMIT, now).is_ok());
        assert!(second.check_at("a", LIMIT, now).is_ok());
    }

    #[test]
    fn expired_windows_are_swept() {
        let limiter = RateLimiter::new();
        let start = Instant::now();
        limiter.check_at("old", LIMIT, start).expect("old");
        limiter
            .check_at("fresh", LIMIT, start + LIMIT.window)
            .expect("fresh");

        let removed = limiter.sweep(start + LIMIT.window + Duration::from_millis(1));
        assert_eq!(removed, 1);
        assert!(!limiter.windows.contains_key("old"));
        assert!(limiter.windows.contains_key("fresh"));
    }

    #[test]
    fn steady_traffic_from_many_clients_stays_bounded() {
        let limiter = RateLimiter::new();
        let start = Instant::now();
        for n in 0..SWEEP_EVERY {
            let at = start + Duration::from_secs(n);
            limiter.check_at(&format!("client-{n}"), LIMIT, at).expect("allowed");
        }

        let live = usize::try_from(LIMIT.window.as_secs() + 1).expect("small");
        assert!(limiter.windows.len() <= live);
    }

    #[test]
    fn buckets_carry_endpoint_limits() {
        assert_eq!(Bucket::for_path("/api/likes"), Some(Bucket::Likes));
        assert_eq!(Bucket::for_path("/api/stats"), None);
        assert_eq!(Bucket::Newsletter.limit().max_requests, 2);
        assert_eq!(Bucket::Newsletter.limit().window, Duration::from_secs(300));
        assert_eq!(Bucket::Views.limit().max_requests, 30);
    }

    #[test]
    fn retry_after_rounds_up() {
        assert_eq!(RateLimiter::retry_after_secs(Duration::from_millis(1)), 1);
        assert_eq!(RateLimiter::retry_after_secs(Duration::from_millis(1500)), 2);
        assert_eq!(RateLimiter::retry_after_secs(Duration::ZERO), 1);
    }
}
