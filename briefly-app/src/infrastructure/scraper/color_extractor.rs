use regex_lite::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

const MAX_BRAND_COLORS: usize = 5;

// Frequency weights per source. CSS custom properties are where design tokens
// live, so they get a heavy boost; theme data attributes slightly less.
const CSS_OCCURRENCE_WEIGHT: u32 = 1;
const CSS_VARIABLE_WEIGHT: u32 = 10;
const THEME_ATTRIBUTE_WEIGHT: u32 = 8;

const HEX_PATTERN: &str = r"#[0-9a-fA-F]{3,8}";
const RGB_PATTERN: &str = r"(?i)rgba?\(\s*\d+\s*,\s*\d+\s*,\s*\d+\s*(?:,\s*[\d.]+\s*)?\)";
const CSS_VARIABLE_PATTERN: &str = r"--[a-zA-Z0-9-]+:\s*(?:#[0-9a-fA-F]{3,8}|rgba?\([^)]+\))";
const THEME_OBJECT_PATTERN: &str =
    r"(?:colors|theme).*?\{[^}]*(?:#[0-9a-fA-F]{3,8}|rgba?\([^)]+\))[^}]*\}";

/// Frequency tally that keeps insertion order, so equal scores rank in the
/// order the scan passes first saw them.
#[derive(Default)]
struct ColorTally {
    entries: Vec<(String, u32)>,
}

impl ColorTally {
    fn add(&mut self, color: String, weight: u32) {
        match self.entries.iter_mut().find(|(c, _)| *c == color) {
            Some(entry) => entry.1 += weight,
            None => self.entries.push((color, weight)),
        }
    }

    fn into_ranked(mut self) -> Vec<String> {
        // Stable sort: ties keep insertion order.
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries
            .into_iter()
            .map(|(color, _)| color)
            .take(MAX_BRAND_COLORS)
            .collect()
    }
}

struct ColorScanner {
    hex_re: Regex,
    rgb_re: Regex,
    tally: ColorTally,
}

impl ColorScanner {
    fn new() -> Self {
        Self {
            hex_re: Regex::new(HEX_PATTERN).expect("valid hex pattern"),
            rgb_re: Regex::new(RGB_PATTERN).expect("valid rgb pattern"),
            tally: ColorTally::default(),
        }
    }

    fn admit(&mut self, color: Option<String>, weight: u32) {
        if let Some(color) = color {
            if !is_common_ui_color(&color) {
                self.tally.add(color, weight);
            }
        }
    }

    fn scan_css(&mut self, css: &str, weight: u32) {
        let hex_colors: Vec<Option<String>> = self
            .hex_re
            .find_iter(css)
            .map(|m| normalize_color(m.as_str()))
            .collect();
        for color in hex_colors {
            self.admit(color, weight);
        }

        let rgb_colors: Vec<Option<String>> = self
            .rgb_re
            .find_iter(css)
            .map(|m| rgb_to_hex(m.as_str()))
            .collect();
        for color in rgb_colors {
            self.admit(color, weight);
        }
    }

    fn scan_value(&mut self, value: &Value) {
        match value {
            Value::String(s) => {
                if s.starts_with('#') {
                    self.admit(normalize_color(s), THEME_ATTRIBUTE_WEIGHT);
                } else if s.starts_with("rgb") {
                    self.admit(rgb_to_hex(s), THEME_ATTRIBUTE_WEIGHT);
                }
            }
            Value::Object(map) => {
                for nested in map.values() {
                    self.scan_value(nested);
                }
            }
            Value::Array(items) => {
                for nested in items {
                    self.scan_value(nested);
                }
            }
            _ => {}
        }
    }
}

/// Scan the document for brand colors and return the top 5 by weighted
/// frequency. Pass ordering matters: it decides tie-breaks.
pub fn extract_colors(document: &Html, html: &str) -> Vec<String> {
    let mut scanner = ColorScanner::new();

    // Pass 1: inline style attributes.
    if let Ok(selector) = Selector::parse("[style]") {
        for element in document.select(&selector) {
            if let Some(style) = element.value().attr("style") {
                scanner.scan_css(style, CSS_OCCURRENCE_WEIGHT);
            }
        }
    }

    // Pass 2: style blocks.
    if let Ok(selector) = Selector::parse("style") {
        for element in document.select(&selector) {
            let css: String = element.text().collect();
            scanner.scan_css(&css, CSS_OCCURRENCE_WEIGHT);
        }
    }

    // Pass 3: CSS custom properties over the raw HTML. Design tokens often sit
    // in framework-generated markup a DOM walk would miss.
    if let Ok(var_re) = Regex::new(CSS_VARIABLE_PATTERN) {
        let declarations: Vec<String> = var_re
            .find_iter(html)
            .map(|m| m.as_str().to_string())
            .collect();
        for declaration in declarations {
            let hex = scanner
                .hex_re
                .find(&declaration)
                .and_then(|m| normalize_color(m.as_str()));
            scanner.admit(hex, CSS_VARIABLE_WEIGHT);

            let rgb = scanner
                .rgb_re
                .find(&declaration)
                .and_then(|m| rgb_to_hex(m.as_str()));
            scanner.admit(rgb, CSS_VARIABLE_WEIGHT);
        }
    }

    // Pass 4: theme-like object literals in script tags (Tailwind configs and
    // friends).
    if let Ok(selector) = Selector::parse("script") {
        if let Ok(theme_re) = Regex::new(THEME_OBJECT_PATTERN) {
            for element in document.select(&selector) {
                let script: String = element.text().collect();
                let blocks: Vec<String> = theme_re
                    .find_iter(&script)
                    .map(|m| m.as_str().to_string())
                    .collect();
                for block in blocks {
                    scanner.scan_css(&block, CSS_OCCURRENCE_WEIGHT);
                }
            }
        }
    }

    // Pass 5: theme data attributes, parsed as JSON when possible.
    if let Ok(selector) = Selector::parse("[data-theme], [data-colors], [data-brand-colors]") {
        for element in document.select(&selector) {
            let attrs = element.value();
            let theme_data = attrs
                .attr("data-theme")
                .or_else(|| attrs.attr("data-colors"))
                .or_else(|| attrs.attr("data-brand-colors"));
            if let Some(theme_data) = theme_data {
                match serde_json::from_str::<Value>(theme_data) {
                    Ok(parsed) => scanner.scan_value(&parsed),
                    Err(_) => scanner.scan_css(theme_data, CSS_OCCURRENCE_WEIGHT),
                }
            }
        }
    }

    // Pass 6: framework-injected style tags.
    if let Ok(selector) = Selector::parse("style[data-n-href], style[data-styled], style[data-emotion]")
    {
        for element in document.select(&selector) {
            let css: String = element.text().collect();
            scanner.scan_css(&css, CSS_OCCURRENCE_WEIGHT);
        }
    }

    scanner.tally.into_ranked()
}

/// Normalize a `#`-prefixed color to uppercase `#RRGGBB`. Three-digit hex is
/// expanded, an alpha channel is dropped, anything else is rejected.
pub fn normalize_color(color: &str) -> Option<String> {
    let hex = color.strip_prefix('#')?;
    let mut hex = hex.to_ascii_uppercase();

    if hex.len() == 3 {
        hex = hex.chars().flat_map(|c| [c, c]).collect();
    }

    if hex.len() >= 6 {
        hex.truncate(6);
    }

    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)) {
        return None;
    }

    Some(format!("#{hex}"))
}

/// Convert an `rgb()`/`rgba()` string to uppercase hex.
pub fn rgb_to_hex(rgb: &str) -> Option<String> {
    let digits_re = Regex::new(r"\d+").expect("valid digits pattern");
    let channels: Vec<u32> = digits_re
        .find_iter(rgb)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    if channels.len() < 3 {
        return None;
    }

    let (r, g, b) = (channels[0], channels[1], channels[2]);
    if r > 255 || g > 255 || b > 255 {
        return None;
    }

    Some(format!("#{r:02X}{g:02X}{b:02X}"))
}

/// True for whites, blacks and grays that show up on nearly every page and
/// carry no brand signal.
pub fn is_common_ui_color(hex: &str) -> bool {
    let color = hex.trim_start_matches('#');

    if color == "FFFFFF" || color == "FFF" || color == "000000" || color == "000" {
        return true;
    }

    if color.len() != 6 || !color.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
    {
        return false;
    }

    let r = u8::from_str_radix(&color[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&color[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&color[4..6], 16).unwrap_or(0);

    // Near-white and near-black need every channel in range, otherwise
    // saturated colors with one dark or bright channel get caught.
    if r >= 0xF0 && g >= 0xF0 && b >= 0xF0 {
        return true;
    }
    if r <= 0x2F && g <= 0x2F && b <= 0x2F {
        return true;
    }

    // Grays: all channels within 10 of each other.
    let max_diff = r.abs_diff(g).max(g.abs_diff(b)).max(r.abs_diff(b));

    max_diff <= 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_expands_three_digit_hex() {
        assert_eq!(normalize_color("#a3f"), Some("#AA33FF".to_string()));
    }

    #[test]
    fn normalize_drops_alpha_channel() {
        assert_eq!(normalize_color("#33669980"), Some("#336699".to_string()));
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert_eq!(normalize_color("blue"), None);
        assert_eq!(normalize_color("#12"), None);
        assert_eq!(normalize_color("#12345"), None);
        assert_eq!(normalize_color("#GGGGGG"), None);
    }

    #[test]
    fn normalize_output_is_canonical() {
        for input in ["#a3f", "#336699", "#33669980", "#ABCDEF"] {
            let once = normalize_color(input).unwrap();
            assert!(once.starts_with('#') && once.len() == 7);
            assert!(once[1..].bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)));
            // Idempotent: normalizing its own output changes nothing.
            assert_eq!(normalize_color(&once), Some(once.clone()));
        }
    }

    #[test]
    fn rgb_conversion() {
        assert_eq!(rgb_to_hex("rgb(0, 165, 124)"), Some("#00A57C".to_string()));
        assert_eq!(rgb_to_hex("rgba(51, 102, 153, 0.5)"), Some("#336699".to_string()));
        assert_eq!(rgb_to_hex("rgb(300, 0, 0)"), None);
        assert_eq!(rgb_to_hex("rgb()"), None);
    }

    #[test]
    fn common_ui_colors_are_flagged() {
        assert!(is_common_ui_color("#FFFFFF"));
        assert!(is_common_ui_color("#000000"));
        assert!(is_common_ui_color("#F5F5F5"));
        assert!(is_common_ui_color("#101010"));
        assert!(is_common_ui_color("#808080"));
        assert!(!is_common_ui_color("#00A57C"));
    }

    #[test]
    fn saturated_colors_with_one_extreme_channel_are_kept() {
        // A single dark or bright channel must not tip the verdict.
        assert!(!is_common_ui_color("#004E89"));
        assert!(!is_common_ui_color("#2A9D8F"));
        assert!(!is_common_ui_color("#FF6B35"));
        assert!(is_common_ui_color("#1A1A2E"));
        assert!(is_common_ui_color("#FAFAF5"));
    }

    #[test]
    fn css_variable_outranks_plain_occurrences() {
        let html = r##"<html><head><style>
            .a { color: #336699; } .b { color: #336699; } .c { border-color: #336699; }
            :root { --brand: #AA3366; }
        </style></head><body></body></html>"##;
        let document = Html::parse_document(html);
        let colors = extract_colors(&document, html);
        assert_eq!(colors[0], "#AA3366");
        assert!(colors.contains(&"#336699".to_string()));
    }

    #[test]
    fn ui_chrome_is_filtered_and_brand_variable_survives() {
        let html = r##"<html><head><style>body{color:#FFFFFF;background:#000000}</style>
            <style>:root { --brand: #00A57C; }</style></head><body></body></html>"##;
        let document = Html::parse_document(html);
        let colors = extract_colors(&document, html);
        assert_eq!(colors, vec!["#00A57C".to_string()]);
    }

    #[test]
    fn result_is_capped_and_clean() {
        let html = r##"<html><body>
            <div style="color:#336699"></div>
            <div style="color:#993366"></div>
            <div style="color:#669933"></div>
            <div style="color:#663399"></div>
            <div style="color:#339966"></div>
            <div style="color:#996633"></div>
            <div style="color:#FFFFFF"></div>
        </body></html>"##;
        let document = Html::parse_document(html);
        let colors = extract_colors(&document, html);
        assert_eq!(colors.len(), 5);
        assert!(colors.iter().all(|c| !is_common_ui_color(c)));
    }

    #[test]
    fn theme_data_attribute_is_walked_recursively() {
        let html = r##"<html><body>
            <div data-theme='{"palette":{"primary":"#4B0082","accent":"rgb(102, 51, 153)"}}'></div>
        </body></html>"##;
        let document = Html::parse_document(html);
        let colors = extract_colors(&document, html);
        assert!(colors.contains(&"#4B0082".to_string()));
        assert!(colors.contains(&"#663399".to_string()));
    }

    #[test]
    fn ties_keep_scan_order() {
        let html = r##"<html><body>
            <div style="color:#336699"></div>
            <div style="color:#993366"></div>
        </body></html>"##;
        let document = Html::parse_document(html);
        let colors = extract_colors(&document, html);
        assert_eq!(colors, vec!["#336699".to_string(), "#993366".to_string()]);
    }
}
