use html_escape::encode_double_quoted_attribute;
use serde::Serialize;
use url::form_urlencoded;

pub const DEFAULT_BADGE_HOST: &str = "darkmodenow.com";

/// Everything presentation code needs to render a verified site's badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeEmbed {
    pub hostname: String,
    pub url: String,
    pub snippet: String,
}

pub fn badge_url(badge_host: &str, hostname: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(hostname.as_bytes()).collect();
    format!("https://{badge_host}/?url={encoded}")
}

impl BadgeEmbed {
    pub fn new(badge_host: &str, hostname: &str) -> Self {
        let url = badge_url(badge_host, hostname);
        let href = encode_double_quoted_attribute(&url);
        let alt_text = format!("Environment Friendly - {hostname}");
        let alt = encode_double_quoted_attribute(&alt_text);
        let snippet = format!(
            r#"<a href="{href}" target="_blank" rel="noopener noreferrer"><img src="{href}" alt="{alt}" /></a>"#
        );

        Self {
            hostname: hostname.to_string(),
            url,
            snippet,
        }
    }
}
