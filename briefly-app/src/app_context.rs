use crate::application::{DemoChat, GenerateDemoContext};
use crate::infrastructure::security::{CostTracker, RateLimiter};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub generate_context: Arc<GenerateDemoContext>,
    pub demo_chat: Arc<DemoChat>,
    pub rate_limiter: RateLimiter,
    pub cost_tracker: Arc<CostTracker>,
}

impl AppContext {
    pub fn new(openai_api_key: String) -> Self {
        Self {
            generate_context: Arc::new(GenerateDemoContext::new(openai_api_key.clone())),
            demo_chat: Arc::new(DemoChat::new(openai_api_key)),
            rate_limiter: RateLimiter::new(),
            cost_tracker: Arc::new(CostTracker::new()),
        }
    }

    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set");
        Self::new(api_key)
    }
}
