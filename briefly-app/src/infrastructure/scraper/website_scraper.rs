use briefly_errors::AppError;
use scraper::{Html, Selector};
use url::Url;

use crate::domain::{BrandIntelligence, PageContent};

use super::color_extractor;
use super::logo_locator;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; Briefly-Bot/1.0)";
const FETCH_TIMEOUT_SECS: u64 = 10;
const MAX_HEADINGS: usize = 15;
const MAX_HEADING_LENGTH: usize = 200;
const PARAGRAPH_SCAN_LIMIT: usize = 15;
const MIN_PARAGRAPH_LENGTH: usize = 20;
const MAX_PARAGRAPH_LENGTH: usize = 500;

#[cfg(feature = "headless")]
const MIN_CSS_COLORS: usize = 3;

/// Best-effort single-page scraper. One fetch, no retries; every shortfall
/// degrades to fewer fields rather than an error visible to the demo user.
pub struct WebsiteScraper {
    http_client: reqwest::Client,
}

impl WebsiteScraper {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
                .redirect(reqwest::redirect::Policy::limited(5))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    pub async fn scrape(&self, url: &str) -> Result<PageContent, AppError> {
        let parsed_url =
            Url::parse(url).map_err(|_| AppError::InvalidUrl(url.to_string()))?;

        let html = self.fetch(&parsed_url).await?;
        let mut content = parse_page(&html, parsed_url.as_str());

        #[cfg(feature = "headless")]
        if content.brand_intelligence.colors.len() < MIN_CSS_COLORS {
            tracing::info!(
                "Only {} colors found via CSS for {}, trying vision fallback",
                content.brand_intelligence.colors.len(),
                url
            );
            let vision_colors =
                super::vision_fallback::extract_colors_with_vision(parsed_url.as_str()).await;
            if !vision_colors.is_empty() {
                tracing::info!("Vision fallback found {} colors for {}", vision_colors.len(), url);
                content.brand_intelligence.colors = vision_colors;
            }
        }

        Ok(content)
    }

    async fn fetch(&self, url: &Url) -> Result<String, AppError> {
        let response = self
            .http_client
            .get(url.as_str())
            .header("User-Agent", USER_AGENT)
            .header("Accept-Language", "en,vi,*")
            .send()
            .await
            .map_err(|e| AppError::ScrapingFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ScrapingFailed(format!("HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::ScrapingFailed(e.to_string()))
    }
}

impl Default for WebsiteScraper {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a fetched page into `PageContent`, including brand intelligence.
/// Logo and color extraction are pure passes over the same parsed document.
pub(crate) fn parse_page(html: &str, url: &str) -> PageContent {
    let document = Html::parse_document(html);

    PageContent {
        title: extract_title(&document),
        description: extract_description(&document),
        headings: extract_headings(&document),
        paragraphs: extract_paragraphs(&document),
        url: url.to_string(),
        language: detect_language(&document, html),
        brand_intelligence: BrandIntelligence {
            logo: logo_locator::locate_logo(&document, url),
            colors: color_extractor::extract_colors(&document, html),
        },
    }
}

fn extract_title(document: &Html) -> String {
    for selector in ["title", "h1"] {
        if let Ok(selector) = Selector::parse(selector) {
            if let Some(element) = document.select(&selector).next() {
                let text = element.text().collect::<String>().trim().to_string();
                if !text.is_empty() {
                    return text;
                }
            }
        }
    }
    String::new()
}

fn extract_description(document: &Html) -> String {
    for selector in ["meta[name='description']", "meta[property='og:description']"] {
        if let Ok(selector) = Selector::parse(selector) {
            if let Some(content) = document
                .select(&selector)
                .next()
                .and_then(|el| el.value().attr("content"))
            {
                let text = content.trim().to_string();
                if !text.is_empty() {
                    return text;
                }
            }
        }
    }
    String::new()
}

fn extract_headings(document: &Html) -> Vec<String> {
    let mut headings = Vec::new();

    if let Ok(selector) = Selector::parse("h1, h2, h3") {
        for element in document.select(&selector) {
            let text = element.text().collect::<String>().trim().to_string();
            if !text.is_empty() && text.len() < MAX_HEADING_LENGTH {
                headings.push(text);
            }
        }
    }

    headings.truncate(MAX_HEADINGS);
    headings
}

fn extract_paragraphs(document: &Html) -> Vec<String> {
    let mut paragraphs = Vec::new();

    if let Ok(selector) = Selector::parse("p") {
        // The scan stops after the 15th <p> in the document, qualifying or
        // not, so a page front-loaded with short paragraphs yields fewer.
        for element in document.select(&selector).take(PARAGRAPH_SCAN_LIMIT) {
            let text = element.text().collect::<String>().trim().to_string();
            if text.len() > MIN_PARAGRAPH_LENGTH && text.len() < MAX_PARAGRAPH_LENGTH {
                paragraphs.push(text);
            }
        }
    }

    paragraphs
}

fn detect_language(document: &Html, html: &str) -> String {
    if let Ok(selector) = Selector::parse("html") {
        if let Some(lang) = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("lang"))
        {
            if !lang.is_empty() {
                return primary_subtag(lang);
            }
        }
    }

    if let Ok(selector) = Selector::parse("meta[http-equiv='content-language']") {
        if let Some(lang) = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
        {
            if !lang.is_empty() {
                return primary_subtag(lang);
            }
        }
    }

    // Diacritic heuristic for Vietnamese pages with no declared language.
    if html.contains('ă') || html.contains('ơ') || html.contains('ư') {
        return "vi".to_string();
    }

    "en".to_string()
}

fn primary_subtag(lang: &str) -> String {
    lang.split('-').next().unwrap_or(lang).to_lowercase()
}
