use dashmap::DashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

const MAX_REQUESTS_PER_MINUTE: u32 = 5;
const MAX_REQUESTS_PER_HOUR: u32 = 20;
const CLEANUP_INTERVAL_SECS: u64 = 300;

#[derive(Clone)]
struct RequestRecord {
    minute_count: u32,
    hour_count: u32,
    minute_start: Instant,
    hour_start: Instant,
}

impl Default for RequestRecord {
    fn default() -> Self {
        let now = Instant::now();
        Self {
            minute_count: 0,
            hour_count: 0,
            minute_start: now,
            hour_start: now,
        }
    }
}

/// Per-IP request limiter with minute and hour windows. Scraping plus three
/// LLM calls per demo request is expensive enough to warrant it.
#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<DashMap<IpAddr, RequestRecord>>,
    last_cleanup: Arc<std::sync::Mutex<Instant>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(DashMap::new()),
            last_cleanup: Arc::new(std::sync::Mutex::new(Instant::now())),
        }
    }

    pub fn check_rate_limit(&self, ip: IpAddr) -> Result<(), RateLimitError> {
        self.maybe_cleanup();

        let now = Instant::now();
        let mut record = self.requests.entry(ip).or_default();

        if now.duration_since(record.minute_start) > Duration::from_secs(60) {
            record.minute_count = 0;
            record.minute_start = now;
        }

        if now.duration_since(record.hour_start) > Duration::from_secs(3600) {
            record.hour_count = 0;
            record.hour_start = now;
        }

        if record.minute_count >= MAX_REQUESTS_PER_MINUTE {
            let wait_secs = 60 - now.duration_since(record.minute_start).as_secs();
            return Err(RateLimitError::TooManyRequestsPerMinute(wait_secs));
        }

        if record.hour_count >= MAX_REQUESTS_PER_HOUR {
            let wait_secs = 3600 - now.duration_since(record.hour_start).as_secs();
            return Err(RateLimitError::TooManyRequestsPerHour(wait_secs));
        }

        record.minute_count += 1;
        record.hour_count += 1;

        Ok(())
    }

    fn maybe_cleanup(&self) {
        let mut last_cleanup = self.last_cleanup.lock().unwrap();
        if last_cleanup.elapsed() > Duration::from_secs(CLEANUP_INTERVAL_SECS) {
            // The monotonic clock may be younger than an hour right after
            // boot; skip this round rather than underflow.
            if let Some(cutoff) = Instant::now().checked_sub(Duration::from_secs(3600)) {
                self.requests.retain(|_, v| v.hour_start > cutoff);
            }
            *last_cleanup = Instant::now();
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub enum RateLimitError {
    TooManyRequestsPerMinute(u64),
    TooManyRequestsPerHour(u64),
}

impl RateLimitError {
    pub fn message(&self) -> String {
        match self {
            Self::TooManyRequestsPerMinute(secs) => {
                format!("Too many requests. Try again in {} seconds.", secs)
            }
            Self::TooManyRequestsPerHour(secs) => {
                format!("Hourly limit reached. Try again in {} minutes.", secs / 60)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn allows_up_to_the_minute_limit() {
        let limiter = RateLimiter::new();
        let ip = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));
        for _ in 0..MAX_REQUESTS_PER_MINUTE {
            assert!(limiter.check_rate_limit(ip).is_ok());
        }
        assert!(matches!(
            limiter.check_rate_limit(ip),
            Err(RateLimitError::TooManyRequestsPerMinute(_))
        ));
    }

    #[test]
    fn cleanup_pass_keeps_recent_records() {
        let limiter = RateLimiter::new();
        let ip = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 9));
        assert!(limiter.check_rate_limit(ip).is_ok());

        // Force the next call to run a cleanup pass.
        if let Some(past) = Instant::now().checked_sub(Duration::from_secs(CLEANUP_INTERVAL_SECS + 1))
        {
            *limiter.last_cleanup.lock().unwrap() = past;
        }

        assert!(limiter.check_rate_limit(ip).is_ok());
        assert!(limiter.requests.contains_key(&ip));
    }

    #[test]
    fn limits_are_per_ip() {
        let limiter = RateLimiter::new();
        let first = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));
        let second = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 8));
        for _ in 0..MAX_REQUESTS_PER_MINUTE {
            assert!(limiter.check_rate_limit(first).is_ok());
        }
        assert!(limiter.check_rate_limit(second).is_ok());
    }
}
