//! Sliding-window rate limiting for the authentication endpoints.
//!
//! Limits credential guessing by capping the number of login and register
//! attempts per username within a time window.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Rate limiter using a sliding window algorithm
#[derive(Debug)]
pub struct RateLimiter {
    /// Timestamps of recent requests
    timestamps: VecDeque<Instant>,
    /// Maximum number of requests allowed in the window
    max_requests: usize,
    /// Time window for rate limiting
    window: Duration,
}

impl RateLimiter {
    /// Create a new rate limiter
    ///
    /// # Example
    ///
    /// ```
    /// use fm_server::api::rate_limiter::RateLimiter;
    /// use std::time::Duration;
    ///
    /// // Allow 10 requests per second
    /// let limiter = RateLimiter::new(10, Duration::from_secs(1));
    /// ```
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: VecDeque::with_capacity(max_requests),
            max_requests,
            window,
        }
    }

    /// Check if a request should be allowed
    ///
    /// Returns `true` if the request is allowed, `false` if rate limit exceeded.
    ///
    /// # Example
    ///
    /// ```
    /// # use fm_server::api::rate_limiter::RateLimiter;
    /// # use std::time::Duration;
    /// let mut limiter = RateLimiter::new(5, Duration::from_secs(1));
    ///
    /// // First 5 requests allowed
    /// for _ in 0..5 {
    ///     assert!(limiter.check());
    /// }
    ///
    /// // 6th request blocked
    /// assert!(!limiter.check());
    /// ```
    pub fn check(&mut self) -> bool {
        let now = Instant::now();

        // Remove timestamps outside the window
        while let Some(ts) = self.timestamps.front() {
            if now.duration_since(*ts) > self.window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }

        if self.timestamps.len() >= self.max_requests {
            return false;
        }

        self.timestamps.push_back(now);
        true
    }

    /// Get the number of requests in the current window
    pub fn current_count(&self) -> usize {
        self.timestamps.len()
    }

    /// Get the number of remaining requests allowed in the current window
    pub fn remaining(&self) -> usize {
        self.max_requests.saturating_sub(self.timestamps.len())
    }

    /// Whether every recorded attempt has aged out of the window.
    ///
    /// The newest timestamp sits at the back, so one comparison suffices.
    fn expired(&self, now: Instant) -> bool {
        match self.timestamps.back() {
            Some(ts) => now.duration_since(*ts) > self.window,
            None => true,
        }
    }
}

/// Per-username rate limiting for login and register attempts.
///
/// Keys limiters by lowercased username so case variants share a budget.
pub struct AuthRateLimiter {
    limiters: Mutex<HashMap<String, RateLimiter>>,
    max_attempts: usize,
    window: Duration,
}

impl AuthRateLimiter {
    /// Create a limiter allowing `max_attempts` per `window` per username
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            limiters: Mutex::new(HashMap::new()),
            max_attempts,
            window,
        }
    }

    /// Check whether an attempt for this username should be allowed
    ///
    /// Usernames arrive unauthenticated, so the map would grow with every
    /// name an attacker invents; each call first drops limiters whose
    /// window has fully expired to keep it bounded by recent traffic.
    pub fn check(&self, username: &str) -> bool {
        let key = username.to_lowercase();
        let mut limiters = match self.limiters.lock() {
            Ok(guard) => guard,
            // A poisoned lock means another check panicked; fail open.
            Err(poisoned) => poisoned.into_inner(),
        };

        let now = Instant::now();
        limiters.retain(|_, limiter| !limiter.expired(now));

        limiters
            .entry(key)
            .or_insert_with(|| RateLimiter::new(self.max_attempts, self.window))
            .check()
    }

    /// Number of usernames currently being tracked
    pub fn tracked_usernames(&self) -> usize {
        match self.limiters.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

impl Default for AuthRateLimiter {
    /// 10 attempts per minute per username
    fn default() -> Self {
        Self::new(10, Duration::from_secs(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_rate_limiter_allows_within_limit() {
        let mut limiter = RateLimiter::new(5, Duration::from_secs(1));

        for _ in 0..5 {
            assert!(limiter.check(), "Should allow requests within limit");
        }
    }

    #[test]
    fn test_rate_limiter_blocks_over_limit() {
        let mut limiter = RateLimiter::new(3, Duration::from_secs(1));

        for _ in 0..3 {
            assert!(limiter.check());
        }

        assert!(!limiter.check(), "Should block request over limit");
    }

    #[test]
    fn test_rate_limiter_window_expiry() {
        let mut limiter = RateLimiter::new(2, Duration::from_millis(100));

        assert!(limiter.check());
        assert!(limiter.check());
        assert!(!limiter.check());

        thread::sleep(Duration::from_millis(150));

        assert!(limiter.check(), "Should allow after window expires");
    }

    #[test]
    fn test_rate_limiter_current_count() {
        let mut limiter = RateLimiter::new(10, Duration::from_secs(1));

        assert_eq!(limiter.current_count(), 0);

        limiter.check();
        assert_eq!(limiter.current_count(), 1);

        limiter.check();
        limiter.check();
        assert_eq!(limiter.current_count(), 3);
    }

    #[test]
    fn test_remaining_count() {
        let mut limiter = RateLimiter::new(5, Duration::from_secs(1));

        assert_eq!(limiter.remaining(), 5);

        limiter.check();
        assert_eq!(limiter.remaining(), 4);
    }

    #[test]
    fn test_auth_limiter_is_per_username() {
        let limiter = AuthRateLimiter::new(2, Duration::from_secs(60));

        assert!(limiter.check("alice"));
        assert!(limiter.check("alice"));
        assert!(!limiter.check("alice"));

        // A different user has their own budget.
        assert!(limiter.check("bob"));
    }

    #[test]
    fn test_auth_limiter_drops_expired_usernames() {
        let limiter = AuthRateLimiter::new(2, Duration::from_millis(50));

        for i in 0..200 {
            assert!(limiter.check(&format!("user{i}")));
        }
        assert_eq!(limiter.tracked_usernames(), 200);

        thread::sleep(Duration::from_millis(100));

        // The next check sweeps every username whose window has expired.
        assert!(limiter.check("fresh"));
        assert_eq!(limiter.tracked_usernames(), 1);
    }

    #[test]
    fn test_auth_limiter_keeps_active_usernames() {
        let limiter = AuthRateLimiter::new(5, Duration::from_secs(60));

        assert!(limiter.check("alice"));
        assert!(limiter.check("bob"));

        // Both windows are still open, so neither entry is swept.
        assert!(limiter.check("alice"));
        assert_eq!(limiter.tracked_usernames(), 2);
    }

    #[test]
    fn test_auth_limiter_is_case_insensitive() {
        let limiter = AuthRateLimiter::new(2, Duration::from_secs(60));

        assert!(limiter.check("Alice"));
        assert!(limiter.check("ALICE"));
        assert!(!limiter.check("alice"));
    }
}
