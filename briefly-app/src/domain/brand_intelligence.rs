use serde::{Deserialize, Serialize};

/// The `{logo, colors}` summary extracted from a scraped website.
///
/// `logo`, when present, is an absolute http/https URL. `colors` holds at most
/// five uppercase `#RRGGBB` values, none of which is a plain UI white/black/gray.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandIntelligence {
    pub logo: Option<String>,
    pub colors: Vec<String>,
}
