mod color_extractor;
mod logo_locator;
mod website_scraper;

#[cfg(feature = "headless")]
mod vision_fallback;

pub use website_scraper::WebsiteScraper;
