use super::{BrandIntelligence, DemoContext};

/// Static brand profile used whenever scraping or generation comes back
/// incomplete, so the demo experience never dead-ends.
pub const FALLBACK_WEBSITE: &str = "https://papers-pens.com";

pub const PAPERS_PENS_BRAND_SUMMARY: &str = "Papers & Pens is a product marketing agency helping B2B/SaaS brands grow through expert positioning, messaging, and go-to-market strategies.";

pub const PAPERS_PENS_BRAND_VOICE: &str = "Direct, confident, and expertise-driven. Uses clear language without jargon, focuses on practical outcomes, and speaks to ambitious agency owners who value efficiency.";

pub const GENERIC_BRAND_SUMMARY: &str =
    "A creative agency focused on delivering high-quality work for ambitious brands.";

pub const GENERIC_BRAND_VOICE: &str = "Professional, clear, and outcome-focused. Uses straightforward language and emphasizes practical value.";

const FALLBACK_LOGO: &str = "https://cdn.sanity.io/images/n0d9khdx/production/03c5d6e90a1b3ca130471e0e0f2003cfeff012ef-1200x628.png";

const FALLBACK_COLORS: &[&str] = &["#00A57C", "#007B5E", "#1D1D1D", "#F4F4F4", "#C4C4C4"];

fn fallback_brand_intelligence() -> BrandIntelligence {
    BrandIntelligence {
        logo: Some(FALLBACK_LOGO.to_string()),
        colors: FALLBACK_COLORS.iter().map(|c| c.to_string()).collect(),
    }
}

/// Build the complete static fallback profile for a website. Known sites get
/// their curated profile, everything else gets the generic one.
pub fn fallback_context(website: &str) -> DemoContext {
    let normalized = website
        .to_lowercase()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string();

    if normalized.is_empty()
        || normalized.contains("papers-pens.com")
        || normalized.contains("paperspens.com")
    {
        return DemoContext {
            website: FALLBACK_WEBSITE.to_string(),
            brand_summary: PAPERS_PENS_BRAND_SUMMARY.to_string(),
            insights: vec![
                "B2B agencies see 3x better client retention with structured brief processes".to_string(),
                "Most successful projects start with thorough discovery and brand alignment".to_string(),
                "Clients value speed and quality equally in agency partnerships".to_string(),
                "Product marketing specialists command premium rates in the B2B space".to_string(),
                "Clear positioning reduces sales cycles by 40% for SaaS brands".to_string(),
            ],
            brand_voice: PAPERS_PENS_BRAND_VOICE.to_string(),
            brand_intelligence: fallback_brand_intelligence(),
        };
    }

    DemoContext {
        website: website.to_string(),
        brand_summary: GENERIC_BRAND_SUMMARY.to_string(),
        insights: vec![
            "Agencies with clear processes see better client satisfaction".to_string(),
            "Quality briefs lead to better project outcomes".to_string(),
            "Strong brand positioning attracts ideal clients".to_string(),
        ],
        brand_voice: GENERIC_BRAND_VOICE.to_string(),
        brand_intelligence: fallback_brand_intelligence(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_site_gets_curated_profile() {
        let context = fallback_context("https://www.papers-pens.com/");
        assert_eq!(context.brand_summary, PAPERS_PENS_BRAND_SUMMARY);
        assert_eq!(context.website, FALLBACK_WEBSITE);
        assert_eq!(context.insights.len(), 5);
    }

    #[test]
    fn unknown_site_gets_generic_profile() {
        let context = fallback_context("https://example.com");
        assert_eq!(context.brand_summary, GENERIC_BRAND_SUMMARY);
        assert_eq!(context.website, "https://example.com");
        assert!(context.brand_intelligence.logo.is_some());
    }

    #[test]
    fn empty_website_defaults_to_known_profile() {
        let context = fallback_context("");
        assert_eq!(context.brand_summary, PAPERS_PENS_BRAND_SUMMARY);
    }
}
