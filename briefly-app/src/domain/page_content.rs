use serde::{Deserialize, Serialize};

use super::BrandIntelligence;

/// Everything extracted from a single scraped page. Built once per request and
/// discarded after the response; nothing here is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    pub title: String,
    pub description: String,
    pub headings: Vec<String>,
    pub paragraphs: Vec<String>,
    pub url: String,
    pub language: String,
    pub brand_intelligence: BrandIntelligence,
}
