use serde::{Deserialize, Serialize};

use super::BrandIntelligence;

/// The brand context handed to the demo chat. Field names follow the wire
/// format the demo front-end expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoContext {
    pub website: String,
    pub brand_summary: String,
    pub insights: Vec<String>,
    pub brand_voice: String,
    pub brand_intelligence: BrandIntelligence,
}
