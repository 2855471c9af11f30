use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::normalize_host;

/// One analyzed website. Read-only once it has passed [`validate_record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub website: String,
    pub has_dark_mode: bool,
    /// Dark mode is the theme a first-time visitor sees.
    pub is_default: bool,
    pub analyzed_at: DateTime<Utc>,
    pub notes: String,
    pub screenshot: Option<String>,
}

impl SiteRecord {
    pub fn host(&self) -> String {
        normalize_host(&self.website)
    }
}

/// A record as it arrives from the document store, before any checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSiteRecord {
    pub website: Option<String>,
    pub has_dark_mode: Option<bool>,
    pub is_default: Option<bool>,
    pub analyzed_at: Option<String>,
    pub notes: Option<String>,
    pub screenshot: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("record has no website")]
    MissingWebsite,

    #[error("website '{0}' has no hostname")]
    EmptyHost(String),

    #[error("record for '{0}' does not say whether it has dark mode")]
    MissingDarkModeFlag(String),

    #[error("record for '{0}' marks dark mode as default but not available")]
    DefaultWithoutDarkMode(String),

    #[error("record for '{website}' has an invalid analyzed_at '{value}'")]
    InvalidTimestamp { website: String, value: String },
}

pub fn validate_record(raw: RawSiteRecord) -> Result<SiteRecord, RecordError> {
    let website = raw
        .website
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .ok_or(RecordError::MissingWebsite)?;

    if normalize_host(&website).is_empty() {
        return Err(RecordError::EmptyHost(website));
    }

    let has_dark_mode = raw
        .has_dark_mode
        .ok_or_else(|| RecordError::MissingDarkModeFlag(website.clone()))?;
    let is_default = raw.is_default.unwrap_or(false);
    if is_default && !has_dark_mode {
        return Err(RecordError::DefaultWithoutDarkMode(website));
    }

    let analyzed_at = match raw.analyzed_at {
        Some(value) => DateTime::parse_from_rfc3339(value.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| RecordError::InvalidTimestamp {
                website: website.clone(),
                value,
            })?,
        None => {
            return Err(RecordError::InvalidTimestamp {
                website,
                value: String::new(),
            })
        }
    };

    Ok(SiteRecord {
        website,
        has_dark_mode,
        is_default,
        analyzed_at,
        notes: raw.notes.unwrap_or_default(),
        screenshot: raw.screenshot.filter(|s| !s.trim().is_empty()),
    })
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub accepted: Vec<SiteRecord>,
    /// Position in the input alongside the reason it was dropped.
    pub rejected: Vec<(usize, RecordError)>,
}

pub fn ingest_records(raw: Vec<RawSiteRecord>) -> IngestReport {
    let mut report = IngestReport::default();

    for (index, record) in raw.into_iter().enumerate() {
        match validate_record(record) {
            Ok(record) => report.accepted.push(record),
            Err(e) => {
                warn!(action = "reject", component = "record_ingest", index, error = %e, "Dropping malformed record");
                report.rejected.push((index, e));
            }
        }
    }

    debug!(
        action = "complete",
        component = "record_ingest",
        accepted = report.accepted.len(),
        rejected = report.rejected.len(),
        "Record ingest finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(website: &str, has_dark_mode: Option<bool>) -> RawSiteRecord {
        RawSiteRecord {
            website: Some(website.to_string()),
            has_dark_mode,
            is_default: Some(false),
            analyzed_at: Some("2025-01-06T12:00:00Z".to_string()),
            notes: None,
            screenshot: Some(String::new()),
        }
    }

    #[test]
    fn accepts_well_formed_record() {
        let record = validate_record(raw(" https://www.github.com/ ", Some(true))).unwrap();
        assert_eq!(record.website, "https://www.github.com/");
        assert_eq!(record.host(), "github.com");
        assert!(record.has_dark_mode);
        assert_eq!(record.notes, "");
        assert_eq!(record.screenshot, None);
    }

    #[test]
    fn rejects_missing_fields() {
        let mut missing_site = raw("x.com", Some(true));
        missing_site.website = Some("   ".into());
        assert_eq!(validate_record(missing_site), Err(RecordError::MissingWebsite));

        assert_eq!(
            validate_record(raw("x.com", None)),
            Err(RecordError::MissingDarkModeFlag("x.com".into()))
        );

        assert_eq!(
            validate_record(raw("https://", Some(true))),
            Err(RecordError::EmptyHost("https://".into()))
        );
    }

    #[test]
    fn rejects_default_without_dark_mode() {
        let mut record = raw("x.com", Some(false));
        record.is_default = Some(true);
        assert_eq!(
            validate_record(record),
            Err(RecordError::DefaultWithoutDarkMode("x.com".into()))
        );
    }

    #[test]
    fn rejects_bad_timestamp() {
        let mut record = raw("x.com", Some(true));
        record.analyzed_at = Some("yesterday".into());
        assert!(matches!(
            validate_record(record),
            Err(RecordError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn ingest_splits_accepted_and_rejected() {
        let report = ingest_records(vec![
            raw("a.com", Some(true)),
            raw("b.com", None),
            raw("c.com", Some(false)),
        ]);
        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].0, 1);
    }
}
