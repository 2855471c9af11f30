use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::normalize_host;
use crate::records::SiteRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    /// Dark mode is the site's default theme.
    DarkPlus,
    /// Dark mode is offered as an option.
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn matches(self, record: &SiteRecord) -> bool {
        match self {
            ThemeMode::DarkPlus => record.has_dark_mode && record.is_default,
            ThemeMode::Dark => record.has_dark_mode,
            ThemeMode::Light => !record.has_dark_mode,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::DarkPlus => "Default Dark Mode",
            ThemeMode::Dark => "Optional Dark Mode",
            ThemeMode::Light => "Light Mode",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShowcaseEntry<'a> {
    pub host: String,
    pub favicon_url: String,
    pub record: &'a SiteRecord,
}

/// Keeps the first record seen for each normalized hostname, in input order.
/// Only used for display; adoption figures work on the full snapshot.
pub fn dedupe_by_host(records: &[SiteRecord]) -> Vec<&SiteRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|record| seen.insert(record.host()))
        .collect()
}

/// The record behind a clicked logo: first match on the normalized host.
pub fn site_detail<'a>(records: &'a [SiteRecord], raw: &str) -> Option<&'a SiteRecord> {
    let host = normalize_host(raw.trim());
    if host.is_empty() {
        return None;
    }
    records.iter().find(|record| record.host() == host)
}

pub fn favicon_url(host: &str) -> String {
    format!("https://www.google.com/s2/favicons?domain={host}&sz=128")
}

/// A non-empty search looks across every mode; otherwise only records
/// matching `mode` are shown.
pub fn filter_showcase<'a>(
    records: &'a [SiteRecord],
    mode: ThemeMode,
    search: Option<&str>,
) -> Vec<ShowcaseEntry<'a>> {
    let query = search
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    dedupe_by_host(records)
        .into_iter()
        .filter_map(|record| {
            let host = record.host();
            let keep = match &query {
                Some(q) => host.to_lowercase().contains(q.as_str()),
                None => mode.matches(record),
            };
            keep.then(|| ShowcaseEntry {
                favicon_url: favicon_url(&host),
                host,
                record,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(website: &str, has_dark_mode: bool, is_default: bool) -> SiteRecord {
        SiteRecord {
            website: website.to_string(),
            has_dark_mode,
            is_default,
            analyzed_at: Utc::now(),
            notes: String::new(),
            screenshot: None,
        }
    }

    fn snapshot() -> Vec<SiteRecord> {
        vec![
            record("https://www.discord.com", true, true),
            record("https://facebook.com/home", true, false),
            record("discord.com", false, false),
            record("https://pinterest.com", false, false),
        ]
    }

    #[test]
    fn dedupe_keeps_first_per_host() {
        let records = snapshot();
        let unique = dedupe_by_host(&records);
        assert_eq!(unique.len(), 3);
        assert_eq!(unique[0].website, "https://www.discord.com");
        assert!(unique[0].has_dark_mode);
    }

    #[test]
    fn filters_by_mode() {
        let records = snapshot();
        let hosts = |mode| {
            filter_showcase(&records, mode, None)
                .into_iter()
                .map(|e| e.host)
                .collect::<Vec<_>>()
        };
        assert_eq!(hosts(ThemeMode::DarkPlus), vec!["discord.com"]);
        assert_eq!(hosts(ThemeMode::Dark), vec!["discord.com", "facebook.com"]);
        assert_eq!(hosts(ThemeMode::Light), vec!["pinterest.com"]);
    }

    #[test]
    fn search_ignores_mode_and_case() {
        let records = snapshot();
        let found = filter_showcase(&records, ThemeMode::DarkPlus, Some("  PIN "));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].host, "pinterest.com");
        assert_eq!(
            found[0].favicon_url,
            "https://www.google.com/s2/favicons?domain=pinterest.com&sz=128"
        );
    }

    #[test]
    fn defaults_to_optional_dark_mode() {
        assert_eq!(ThemeMode::default(), ThemeMode::Dark);
    }

    #[test]
    fn site_detail_matches_normalized_host() {
        let mut records = snapshot();
        records[1].notes = "toggle in settings".to_string();
        records[1].screenshot = Some("facebook.png".to_string());

        let detail = site_detail(&records, "http://WWW.facebook.com/marketplace").unwrap();
        assert_eq!(detail.website, "https://facebook.com/home");
        assert_eq!(detail.notes, "toggle in settings");
        assert_eq!(detail.screenshot.as_deref(), Some("facebook.png"));

        let first = site_detail(&records, "discord.com").unwrap();
        assert!(first.is_default);
    }

    #[test]
    fn site_detail_misses_unknown_or_blank() {
        let records = snapshot();
        assert!(site_detail(&records, "snapchat.com").is_none());
        assert!(site_detail(&records, "   ").is_none());
        assert!(site_detail(&records, "https://").is_none());
    }

    #[test]
    fn blank_search_falls_back_to_mode() {
        let records = snapshot();
        assert_eq!(filter_showcase(&records, ThemeMode::Light, Some("   ")).len(), 1);
    }
}
