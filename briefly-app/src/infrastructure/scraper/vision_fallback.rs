use std::time::Duration;

use base64::Engine;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions};

use crate::infrastructure::openai::{
    strip_code_fences, ChatCompletionRequest, ImageUrl, Message, OpenAiClient, VISION_MODEL,
};

use super::color_extractor::normalize_color;

const VIEWPORT_WIDTH: u32 = 1920;
const VIEWPORT_HEIGHT: u32 = 1080;
const NAVIGATION_TIMEOUT_SECS: u64 = 15;
const MAX_VISION_COLORS: usize = 5;

const VISION_SYSTEM_PROMPT: &str = r#"You are a brand designer analyzing websites to extract primary brand colors.
Focus on the BRAND colors, not UI chrome (whites, blacks, light grays).
Return colors as hex codes in order of brand importance (primary -> secondary -> accent).
Return ONLY a JSON array of hex colors, no explanations."#;

/// Screenshot the page and ask the vision model for its brand colors. Used
/// only when CSS extraction came up short; any failure here returns an empty
/// list so the caller keeps whatever the CSS pass found.
pub async fn extract_colors_with_vision(url: &str) -> Vec<String> {
    let Ok(api_key) = std::env::var("OPENAI_API_KEY") else {
        tracing::warn!("OPENAI_API_KEY not set, skipping vision fallback");
        return Vec::new();
    };

    let Some(screenshot) = take_screenshot(url.to_string()).await else {
        tracing::warn!("Failed to take screenshot of {} for vision fallback", url);
        return Vec::new();
    };

    match analyze_screenshot(&api_key, url, &screenshot).await {
        Ok(colors) => colors,
        Err(e) => {
            tracing::warn!("Vision color analysis failed for {}: {}", url, e);
            Vec::new()
        }
    }
}

async fn take_screenshot(url: String) -> Option<String> {
    // headless_chrome is a blocking API; keep it off the async runtime.
    match tokio::task::spawn_blocking(move || capture_viewport_png(&url)).await {
        Ok(Some(png)) => Some(base64::engine::general_purpose::STANDARD.encode(png)),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("Screenshot task failed: {}", e);
            None
        }
    }
}

fn capture_viewport_png(url: &str) -> Option<Vec<u8>> {
    let launch_options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(false)
        .window_size(Some((VIEWPORT_WIDTH, VIEWPORT_HEIGHT)))
        .build()
        .ok()?;

    // The browser process is torn down when this scope ends, success or not.
    let browser = Browser::new(launch_options).ok()?;
    let tab = browser.new_tab().ok()?;
    tab.set_default_timeout(Duration::from_secs(NAVIGATION_TIMEOUT_SECS));

    tab.navigate_to(url).ok()?;
    tab.wait_until_navigated().ok()?;

    // Viewport-only capture; a full-page shot is slower and adds nothing for
    // color analysis.
    tab.capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
        .ok()
}

async fn analyze_screenshot(
    api_key: &str,
    url: &str,
    screenshot_base64: &str,
) -> Result<Vec<String>, briefly_errors::AppError> {
    let client = OpenAiClient::new(api_key.to_string());

    let user_text = format!(
        r##"Analyze this screenshot of {url} and extract the 5 most important BRAND colors.

Rules:
1. Focus on brand-specific colors (buttons, headers, accents, links)
2. IGNORE common UI colors: pure white (#FFFFFF), pure black (#000000), light grays
3. Return colors in order of brand importance (most prominent first)
4. Return exactly 5 colors if possible, fewer if the site uses fewer brand colors
5. Return ONLY a JSON array of uppercase hex codes

Example output: ["#635BFF", "#FF6B35", "#2A9D8F", "#FFB84D", "#004E89"]"##
    );

    let request = ChatCompletionRequest::new(
        VISION_MODEL,
        vec![
            Message::system(VISION_SYSTEM_PROMPT),
            Message::user_with_image(
                user_text,
                ImageUrl {
                    url: format!("data:image/png;base64,{screenshot_base64}"),
                    detail: "low",
                },
            ),
        ],
        200,
        0.3,
    );

    let response = client.complete(request).await?;
    Ok(parse_vision_colors(&response))
}

/// Parse the model's reply into validated brand colors. Anything that is not
/// a clean 6-digit hex string is discarded.
fn parse_vision_colors(response: &str) -> Vec<String> {
    let cleaned = strip_code_fences(response);

    let Ok(values) = serde_json::from_str::<Vec<serde_json::Value>>(cleaned) else {
        tracing::warn!("Vision model returned non-array response");
        return Vec::new();
    };

    // Unlike the CSS pass, no common-UI filtering here: the model was already
    // told to skip UI chrome, and dark brand palettes are legitimate.
    values
        .iter()
        .filter_map(|value| value.as_str())
        .filter(|s| s.len() == 7)
        .filter_map(normalize_color)
        .take(MAX_VISION_COLORS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_json_array() {
        let response = "```json\n[\"#635BFF\", \"#ff6b35\"]\n```";
        assert_eq!(
            parse_vision_colors(response),
            vec!["#635BFF".to_string(), "#FF6B35".to_string()]
        );
    }

    #[test]
    fn discards_invalid_entries_and_caps_at_five() {
        let response = r##"["#635BFF", "blue", "#12", 42, "#FF6B35", "#2A9D8F", "#6A4C93", "#33A1FD", "#8338EC"]"##;
        let colors = parse_vision_colors(response);
        assert_eq!(colors.len(), 5);
        assert_eq!(colors[0], "#635BFF");
        assert!(!colors.contains(&"#8338EC".to_string()));
    }

    #[test]
    fn malformed_output_yields_nothing() {
        assert!(parse_vision_colors("sorry, I can't").is_empty());
        assert!(parse_vision_colors("{\"colors\":[]}").is_empty());
    }
}
