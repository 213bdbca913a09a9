mod brand_intelligence;
mod chat_message;
mod demo_context;
mod fallback;
mod page_content;

pub use brand_intelligence::BrandIntelligence;
pub use chat_message::ChatMessage;
pub use demo_context::DemoContext;
pub use fallback::{fallback_context, FALLBACK_WEBSITE, GENERIC_BRAND_SUMMARY, PAPERS_PENS_BRAND_SUMMARY};
pub use page_content::PageContent;
