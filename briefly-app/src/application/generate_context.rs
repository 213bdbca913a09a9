use crate::domain::{fallback_context, BrandIntelligence, DemoContext, PageContent};
use crate::infrastructure::openai::{
    prompt, strip_code_fences, ChatCompletionRequest, Message, OpenAiClient, TEXT_MODEL,
};
use crate::infrastructure::scraper::WebsiteScraper;

const MAX_INSIGHTS: usize = 6;

/// Builds a demo brand context for a prospect's website: scrape the page,
/// then generate the summary, voice, and insights in parallel. Any failure
/// along the way degrades to fallback content, never to an error.
pub struct GenerateDemoContext {
    scraper: WebsiteScraper,
    ai: OpenAiClient,
}

impl GenerateDemoContext {
    pub fn new(openai_api_key: String) -> Self {
        Self {
            scraper: WebsiteScraper::new(),
            ai: OpenAiClient::new(openai_api_key),
        }
    }

    pub async fn execute(&self, website: String) -> DemoContext {
        let page = match self.scraper.scrape(&website).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Scrape failed for {}, using fallback context: {}", website, e);
                return fallback_context(&website);
            }
        };

        let (summary, voice, insights) = tokio::join!(
            self.generate_summary(&page),
            self.generate_voice(&page),
            self.generate_insights(&page),
        );

        let fallback = fallback_context(&website);

        DemoContext {
            website,
            brand_summary: summary.unwrap_or_else(|| fallback.brand_summary.clone()),
            brand_voice: voice.unwrap_or_else(|| fallback.brand_voice.clone()),
            insights: insights.unwrap_or_else(|| fallback.insights.clone()),
            brand_intelligence: Self::pick_brand_intelligence(
                page.brand_intelligence,
                fallback.brand_intelligence,
            ),
        }
    }

    async fn generate_summary(&self, page: &PageContent) -> Option<String> {
        self.complete_text(prompt::build_summary_prompt(page), 200, 0.7)
            .await
    }

    async fn generate_voice(&self, page: &PageContent) -> Option<String> {
        self.complete_text(prompt::build_voice_prompt(page), 200, 0.7)
            .await
    }

    async fn generate_insights(&self, page: &PageContent) -> Option<Vec<String>> {
        let text = self
            .complete_text(prompt::build_insights_prompt(page), 800, 0.8)
            .await?;

        match serde_json::from_str::<Vec<String>>(strip_code_fences(&text)) {
            Ok(insights) if !insights.is_empty() => {
                let mut insights = insights;
                insights.truncate(MAX_INSIGHTS);
                Some(insights)
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Insights response was not a JSON array: {}", e);
                None
            }
        }
    }

    async fn complete_text(
        &self,
        prompt: String,
        max_tokens: u32,
        temperature: f32,
    ) -> Option<String> {
        let request = ChatCompletionRequest::new(
            TEXT_MODEL,
            vec![Message::user(prompt)],
            max_tokens,
            temperature,
        );

        match self.ai.complete(request).await {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Completion failed: {}", e);
                None
            }
        }
    }

    // Scraped branding wins when it found anything at all, otherwise the
    // fallback palette keeps the demo UI from rendering unstyled.
    fn pick_brand_intelligence(
        scraped: BrandIntelligence,
        fallback: BrandIntelligence,
    ) -> BrandIntelligence {
        if scraped.logo.is_none() && scraped.colors.is_empty() {
            fallback
        } else {
            scraped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GENERIC_BRAND_SUMMARY, PAPERS_PENS_BRAND_SUMMARY};

    fn use_case() -> GenerateDemoContext {
        GenerateDemoContext::new("test-key".to_string())
    }

    #[tokio::test]
    async fn invalid_url_yields_generic_fallback() {
        let context = use_case().execute("not a url".to_string()).await;
        assert_eq!(context.brand_summary, GENERIC_BRAND_SUMMARY);
        assert_eq!(context.website, "not a url");
        assert!(context.brand_intelligence.logo.is_some());
    }

    #[tokio::test]
    async fn unreachable_host_yields_fallback() {
        // .invalid never resolves, so this parses fine and fails at fetch.
        let context = use_case()
            .execute("https://nonexistent.invalid/".to_string())
            .await;
        assert_eq!(context.brand_summary, GENERIC_BRAND_SUMMARY);
        assert_eq!(context.website, "https://nonexistent.invalid/");
    }

    #[tokio::test]
    async fn papers_pens_url_yields_branded_fallback() {
        // The bogus port makes URL parsing fail before any network I/O.
        let context = use_case()
            .execute("https://papers-pens.com:99999".to_string())
            .await;
        assert_eq!(context.brand_summary, PAPERS_PENS_BRAND_SUMMARY);
    }

    #[test]
    fn scraped_branding_wins_over_fallback() {
        let scraped = BrandIntelligence {
            logo: None,
            colors: vec!["#00A57C".to_string()],
        };
        let fallback = fallback_context("https://example.com").brand_intelligence;
        let picked = GenerateDemoContext::pick_brand_intelligence(scraped, fallback.clone());
        assert_eq!(picked.colors, vec!["#00A57C".to_string()]);

        let empty = BrandIntelligence::default();
        let picked = GenerateDemoContext::pick_brand_intelligence(empty, fallback.clone());
        assert_eq!(picked.logo, fallback.logo);
    }
}
