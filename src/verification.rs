use anyhow::Result;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

use crate::badge::BadgeEmbed;
use crate::domain::{host_pattern, looks_like_host, normalize_host};
use crate::records::SiteRecord;
use crate::tutorial::Tutorial;

/// Supplies the snapshot of analyzed sites that lookups run against.
pub trait RecordSource {
    fn load_records(&self) -> Result<Vec<SiteRecord>>;
}

/// Out-of-band review queue for sites nobody has analyzed yet.
///
/// Implementations stamp `submitted_at` themselves. Submitting the same
/// hostname twice is allowed.
pub trait ReviewQueue {
    fn submit(&self, website: &str) -> Result<ReviewSubmission>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
}

impl ReviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSubmission {
    pub website: String,
    pub submitted_at: DateTime<Utc>,
    pub status: ReviewStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationErrorKind {
    EmptyInput,
    InvalidFormat,
    NotImplemented,
    SubmissionFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("Please enter your website URL")]
    EmptyInput,

    #[error("'{0}' doesn't look like a website address")]
    InvalidFormat(String),

    #[error("{hostname} doesn't support dark mode yet. Implement dark mode first, then verify again")]
    NotImplemented { hostname: String },

    #[error("Couldn't submit {hostname} for review: {reason}")]
    SubmissionFailed { hostname: String, reason: String },
}

impl VerificationError {
    pub fn kind(&self) -> VerificationErrorKind {
        match self {
            VerificationError::EmptyInput => VerificationErrorKind::EmptyInput,
            VerificationError::InvalidFormat(_) => VerificationErrorKind::InvalidFormat,
            VerificationError::NotImplemented { .. } => VerificationErrorKind::NotImplemented,
            VerificationError::SubmissionFailed { .. } => VerificationErrorKind::SubmissionFailed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VerificationState {
    /// Walking through the code samples; nothing is validated yet.
    Implementation(Tutorial),
    /// Waiting for a URL to check.
    Verifying,
    Success(BadgeEmbed),
    /// Queued for manual review.
    Pending { hostname: String },
    Error(VerificationError),
}

impl VerificationState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            VerificationState::Success(_)
                | VerificationState::Pending { .. }
                | VerificationState::Error(_)
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot {action} while {state}")]
pub struct InvalidTransition {
    pub action: &'static str,
    pub state: &'static str,
}

fn state_name(state: &VerificationState) -> &'static str {
    match state {
        VerificationState::Implementation(_) => "implementing",
        VerificationState::Verifying => "verifying",
        VerificationState::Success(_) => "verified",
        VerificationState::Pending { .. } => "pending review",
        VerificationState::Error(_) => "in error",
    }
}

/// Drives one site owner from the tutorial to a badge, a review ticket or an
/// error they can fix.
pub struct Verifier<'q> {
    queue: &'q dyn ReviewQueue,
    badge_host: String,
    pattern: Regex,
    state: VerificationState,
}

impl<'q> Verifier<'q> {
    pub fn new(queue: &'q dyn ReviewQueue, badge_host: impl Into<String>) -> Result<Self> {
        Ok(Self {
            queue,
            badge_host: badge_host.into(),
            pattern: host_pattern()?,
            state: VerificationState::Implementation(Tutorial::new()),
        })
    }

    /// Starts on the URL form, for callers that have already been through
    /// the tutorial.
    pub fn verifying(queue: &'q dyn ReviewQueue, badge_host: impl Into<String>) -> Result<Self> {
        let mut verifier = Self::new(queue, badge_host)?;
        verifier.state = VerificationState::Verifying;
        Ok(verifier)
    }

    pub fn state(&self) -> &VerificationState {
        &self.state
    }

    /// Moves the tutorial forward. Returns false outside the tutorial.
    pub fn advance_tutorial(&mut self) -> bool {
        match &mut self.state {
            VerificationState::Implementation(tutorial) => {
                tutorial.next();
                true
            }
            _ => false,
        }
    }

    /// Opens the URL form once the walkthrough has been completed.
    pub fn begin_verification(&mut self) -> Result<(), InvalidTransition> {
        let ready = matches!(
            &self.state,
            VerificationState::Implementation(tutorial) if tutorial.is_completed()
        );
        if !ready {
            return Err(InvalidTransition {
                action: "start verification",
                state: state_name(&self.state),
            });
        }
        self.state = VerificationState::Verifying;
        Ok(())
    }

    /// Checks `raw_url` against `records`. Allowed from the URL form and,
    /// with a new URL, after an error or a pending submission.
    pub fn submit(
        &mut self,
        raw_url: &str,
        records: &[SiteRecord],
    ) -> Result<&VerificationState, InvalidTransition> {
        match &self.state {
            VerificationState::Verifying
            | VerificationState::Error(_)
            | VerificationState::Pending { .. } => {}
            state => {
                return Err(InvalidTransition {
                    action: "submit a URL",
                    state: state_name(state),
                })
            }
        }

        self.state = match verify_url(raw_url, records, &self.pattern, self.queue, &self.badge_host) {
            Ok(VerificationOutcome::Verified(badge)) => VerificationState::Success(badge),
            Ok(VerificationOutcome::Queued(submission)) => VerificationState::Pending {
                hostname: submission.website,
            },
            Err(e) => VerificationState::Error(e),
        };
        Ok(&self.state)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    Verified(BadgeEmbed),
    Queued(ReviewSubmission),
}

/// Single verification pass. The queue is only touched when the hostname is
/// missing from `records`.
pub fn verify_url(
    raw_url: &str,
    records: &[SiteRecord],
    pattern: &Regex,
    queue: &dyn ReviewQueue,
    badge_host: &str,
) -> Result<VerificationOutcome, VerificationError> {
    let start_time = Instant::now();
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err(VerificationError::EmptyInput);
    }
    if !looks_like_host(trimmed, pattern) {
        return Err(VerificationError::InvalidFormat(trimmed.to_string()));
    }

    let hostname = normalize_host(trimmed);
    let known = records.iter().find(|record| record.host() == hostname);

    let outcome = match known {
        Some(record) if record.has_dark_mode => {
            VerificationOutcome::Verified(BadgeEmbed::new(badge_host, &hostname))
        }
        Some(_) => return Err(VerificationError::NotImplemented { hostname }),
        None => match queue.submit(&hostname) {
            Ok(submission) => VerificationOutcome::Queued(submission),
            Err(e) => {
                warn!(action = "submit", component = "review_queue", hostname = %hostname, error = %e, "Review submission failed");
                return Err(VerificationError::SubmissionFailed {
                    hostname,
                    reason: e.to_string(),
                });
            }
        },
    };

    info!(
        action = "complete",
        component = "verification",
        hostname = %hostname,
        verified = matches!(outcome, VerificationOutcome::Verified(_)),
        duration_ms = start_time.elapsed().as_millis(),
        "Verification finished"
    );
    Ok(outcome)
}
