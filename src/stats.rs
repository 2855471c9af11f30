use rayon::prelude::*;
use serde::Serialize;

use crate::records::SiteRecord;

/// Adoption target shown next to the current figure on the progress line.
pub const DEFAULT_GOAL_PERCENT: u8 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ThemeCounts {
    pub total: usize,
    pub with_dark_mode: usize,
    pub dark_by_default: usize,
}

impl ThemeCounts {
    fn merge(self, other: Self) -> Self {
        Self {
            total: self.total + other.total,
            with_dark_mode: self.with_dark_mode + other.with_dark_mode,
            dark_by_default: self.dark_by_default + other.dark_by_default,
        }
    }
}

pub fn count_themes(records: &[SiteRecord]) -> ThemeCounts {
    records
        .par_iter()
        .fold(ThemeCounts::default, |mut acc, record| {
            acc.total += 1;
            if record.has_dark_mode {
                acc.with_dark_mode += 1;
                if record.is_default {
                    acc.dark_by_default += 1;
                }
            }
            acc
        })
        .reduce(ThemeCounts::default, ThemeCounts::merge)
}

/// `part / total` as a whole percentage, rounding halves away from zero.
fn rounded_percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let scaled = (200 * part as u128 + total as u128) / (2 * total as u128);
    scaled.min(100) as u8
}

/// Share of records with dark mode, 0..=100. Records are counted as given;
/// deduplicate by hostname beforehand if that matters.
pub fn compute_adoption_percentage(records: &[SiteRecord]) -> u8 {
    let counts = count_themes(records);
    rounded_percent(counts.with_dark_mode, counts.total)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub counts: ThemeCounts,
    pub adoption_percent: u8,
    pub goal_percent: u8,
}

impl Dashboard {
    pub fn from_records(records: &[SiteRecord], goal_percent: u8) -> Self {
        let counts = count_themes(records);
        Self {
            counts,
            adoption_percent: rounded_percent(counts.with_dark_mode, counts.total),
            goal_percent: goal_percent.min(100),
        }
    }

    pub fn goal_reached(&self) -> bool {
        self.adoption_percent >= self.goal_percent
    }
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

    #[test]
    fn empty_is_zero() {
        assert_eq!(compute_adoption_percentage(&[]), 0);
        let dashboard = Dashboard::from_records(&[], DEFAULT_GOAL_PERCENT);
        assert_eq!(dashboard.adoption_percent, 0);
        assert!(!dashboard.goal_reached());
    }

    #[test]
    fn two_of_three_rounds_to_67() {
        let records = vec![
            record("a.com", true, false),
            record("b.com", false, false),
            record("c.com", true, false),
        ];
        assert_eq!(compute_adoption_percentage(&records), 67);
    }

    #[test]
    fn halves_round_away_from_zero() {
        // 1/8 = 12.5%
        let mut records = vec![record("a.com", true, false)];
        records.extend((0..7).map(|i| record(&format!("{i}.com"), false, false)));
        assert_eq!(compute_adoption_percentage(&records), 13);
    }

    #[test]
    fn duplicates_are_counted() {
        let records = vec![
            record("https://www.a.com", true, false),
            record("a.com", true, false),
            record("b.com", false, false),
        ];
        assert_eq!(compute_adoption_percentage(&records), 67);
    }

    #[test]
    fn dashboard_counts_defaults() {
        let records = vec![
            record("a.com", true, true),
            record("b.com", true, false),
            record("c.com", false, false),
            record("d.com", false, false),
        ];
        let dashboard = Dashboard::from_records(&records, DEFAULT_GOAL_PERCENT);
        assert_eq!(
            dashboard.counts,
            ThemeCounts {
                total: 4,
                with_dark_mode: 2,
                dark_by_default: 1
            }
        );
        assert_eq!(dashboard.adoption_percent, 50);
        assert!(dashboard.goal_reached());
    }

    #[test]
    fn all_dark_is_100() {
        let records: Vec<_> = (0..1000)
            .map(|i| record(&format!("site{i}.com"), true, false))
            .collect();
        assert_eq!(compute_adoption_percentage(&records), 100);
    }
}
