use scraper::{ElementRef, Html, Selector};
use url::Url;

// Weight table for <img> candidates. The admission threshold keeps decorative
// images out of the ranking.
const CLASS_OR_ID_LOGO: i32 = 50;
const ALT_CONTAINS_LOGO: i32 = 40;
const CLASS_OR_ID_BRAND: i32 = 35;
const ALT_EXACT_MATCH: i32 = 20;
const INSIDE_HEADER: i32 = 20;
const INSIDE_NAV: i32 = 15;
const INSIDE_HEADER_CLASS: i32 = 15;
const LINKED_TO_HOMEPAGE: i32 = 15;
const TYPICAL_LOGO_SIZE: i32 = 10;
const MIN_IMG_CONFIDENCE: i32 = 30;

const OG_IMAGE_CONFIDENCE: i32 = 70;
const TWITTER_IMAGE_CONFIDENCE: i32 = 65;
const FAVICON_CONFIDENCE: i32 = 30;

struct LogoCandidate {
    url: String,
    confidence: i32,
    #[allow(dead_code)]
    source: &'static str,
}

/// Pick the most plausible logo URL for a page. Candidates are collected from
/// social meta tags, `<img>` heuristics and favicons, ranked by confidence
/// (discovery order breaks ties), and the first one with an http/https URL
/// wins.
pub fn locate_logo(document: &Html, base_url: &str) -> Option<String> {
    let mut candidates: Vec<LogoCandidate> = Vec::new();

    let og_image = meta_content(document, "meta[property='og:image']");
    if let Some(og) = &og_image {
        candidates.push(LogoCandidate {
            url: resolve_url(og, base_url),
            confidence: OG_IMAGE_CONFIDENCE,
            source: "og:image",
        });
    }

    let twitter_image = meta_content(document, "meta[name='twitter:image']");
    if let Some(twitter) = twitter_image {
        if og_image.as_deref() != Some(twitter.as_str()) {
            candidates.push(LogoCandidate {
                url: resolve_url(&twitter, base_url),
                confidence: TWITTER_IMAGE_CONFIDENCE,
                source: "twitter:image",
            });
        }
    }

    if let Ok(selector) = Selector::parse("img") {
        for element in document.select(&selector) {
            let Some(src) = element.value().attr("src") else {
                continue;
            };
            let confidence = score_img_candidate(element, base_url);
            if confidence >= MIN_IMG_CONFIDENCE {
                candidates.push(LogoCandidate {
                    url: resolve_url(src, base_url),
                    confidence,
                    source: "img-tag",
                });
            }
        }
    }

    // Favicon as last resort, in rel-priority order rather than document order.
    for favicon_selector in [
        "link[rel='icon']",
        "link[rel='shortcut icon']",
        "link[rel='apple-touch-icon']",
    ] {
        if let Some(href) = meta_attr(document, favicon_selector, "href") {
            candidates.push(LogoCandidate {
                url: resolve_url(&href, base_url),
                confidence: FAVICON_CONFIDENCE,
                source: "favicon",
            });
            break;
        }
    }

    // Stable sort keeps discovery order among equal scores.
    candidates.sort_by(|a, b| b.confidence.cmp(&a.confidence));

    candidates
        .into_iter()
        .find(|candidate| has_web_scheme(&candidate.url))
        .map(|candidate| candidate.url)
}

/// Score one `<img>` against the logo weight table.
fn score_img_candidate(element: ElementRef, base_url: &str) -> i32 {
    let value = element.value();
    let alt = value.attr("alt").map(str::to_lowercase).unwrap_or_default();
    let class = value.attr("class").map(str::to_lowercase).unwrap_or_default();
    let id = value.attr("id").map(str::to_lowercase).unwrap_or_default();

    let mut confidence = 0;

    if class.contains("logo") || id.contains("logo") {
        confidence += CLASS_OR_ID_LOGO;
    }
    if alt.contains("logo") {
        confidence += ALT_CONTAINS_LOGO;
    }
    if class.contains("brand") || id.contains("brand") {
        confidence += CLASS_OR_ID_BRAND;
    }
    if alt == "logo" || alt == "brand logo" {
        confidence += ALT_EXACT_MATCH;
    }

    let ancestors: Vec<ElementRef> = element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .collect();
    if ancestors.iter().any(|a| a.value().name() == "header") {
        confidence += INSIDE_HEADER;
    }
    if ancestors.iter().any(|a| a.value().name() == "nav") {
        confidence += INSIDE_NAV;
    }
    if ancestors.iter().any(|a| {
        a.value()
            .attr("class")
            .is_some_and(|c| c.to_lowercase().contains("header"))
    }) {
        confidence += INSIDE_HEADER_CLASS;
    }

    if let Some(parent) = element.parent().and_then(ElementRef::wrap) {
        if parent.value().name() == "a" {
            if let Some(href) = parent.value().attr("href") {
                if href == "/" || href == base_url || href == "#" {
                    confidence += LINKED_TO_HOMEPAGE;
                }
            }
        }
    }

    let width = value.attr("width").and_then(|w| w.parse::<i32>().ok());
    let height = value.attr("height").and_then(|h| h.parse::<i32>().ok());
    if let (Some(w), Some(h)) = (width, height) {
        if (100..=400).contains(&w) && (30..=200).contains(&h) {
            confidence += TYPICAL_LOGO_SIZE;
        }
    }

    confidence
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    meta_attr(document, selector, "content")
}

fn meta_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn resolve_url(relative: &str, base_url: &str) -> String {
    Url::parse(base_url)
        .and_then(|base| base.join(relative))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| relative.to_string())
}

fn has_web_scheme(url: &str) -> bool {
    Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://acme.example/";

    #[test]
    fn header_logo_scores_by_the_weight_table() {
        let html = r#"<html><body>
            <header><a href="/"><img class="logo" alt="acme logo" src="/logo.png"></a></header>
        </body></html>"#;
        let document = Html::parse_document(html);
        let selector = Selector::parse("img").unwrap();
        let img = document.select(&selector).next().unwrap();
        // class +50, alt contains +40, header +20, homepage link +15
        assert_eq!(score_img_candidate(img, BASE), 125);
    }

    #[test]
    fn header_logo_beats_favicon() {
        let html = r#"<html><head>
            <link rel="icon" href="/favicon.ico">
        </head><body>
            <header><a href="/"><img class="logo" alt="acme logo" src="/logo.png"></a></header>
        </body></html>"#;
        let document = Html::parse_document(html);
        assert_eq!(
            locate_logo(&document, BASE),
            Some("https://acme.example/logo.png".to_string())
        );
    }

    #[test]
    fn non_web_scheme_falls_through_to_next_candidate() {
        let html = r#"<html><head>
            <meta property="og:image" content="data:image/png;base64,AAAA">
            <link rel="icon" href="/favicon.ico">
        </head><body></body></html>"#;
        let document = Html::parse_document(html);
        assert_eq!(
            locate_logo(&document, BASE),
            Some("https://acme.example/favicon.ico".to_string())
        );
    }

    #[test]
    fn og_image_wins_over_everything() {
        let html = r#"<html><head>
            <meta property="og:image" content="https://cdn.acme.example/og.png">
        </head><body>
            <header><img class="logo" src="/logo.png"></header>
        </body></html>"#;
        let document = Html::parse_document(html);
        assert_eq!(
            locate_logo(&document, BASE),
            Some("https://cdn.acme.example/og.png".to_string())
        );
    }

    #[test]
    fn low_confidence_images_are_not_admitted() {
        let html = r#"<html><body><img src="/hero.jpg" alt="sunset"></body></html>"#;
        let document = Html::parse_document(html);
        assert_eq!(locate_logo(&document, BASE), None);
    }
}
