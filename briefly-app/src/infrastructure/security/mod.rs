mod cost_tracker;
mod input_sanitizer;
mod rate_limiter;

pub use cost_tracker::{CostLimitError, CostTracker};
pub use input_sanitizer::InputSanitizer;
pub use rate_limiter::{RateLimitError, RateLimiter};
