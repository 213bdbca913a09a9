pub mod openai;
pub mod scraper;
pub mod security;
