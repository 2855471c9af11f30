use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::records::SiteRecord;
use crate::verification::{RecordSource, ReviewQueue, ReviewStatus, ReviewSubmission};

const CURRENT_SCHEMA_VERSION: i32 = 1;

const SCHEMA_V1: &str = "
CREATE TABLE IF NOT EXISTS theme_analysis (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    website       TEXT NOT NULL,
    has_dark_mode INTEGER NOT NULL,
    is_default    INTEGER NOT NULL DEFAULT 0,
    analyzed_at   TEXT NOT NULL,
    notes         TEXT NOT NULL DEFAULT '',
    screenshot    TEXT
);

CREATE TABLE IF NOT EXISTS pending_reviews (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    website      TEXT NOT NULL,
    submitted_at TEXT NOT NULL,
    status       TEXT NOT NULL
);
";

/// The one handle to the site database. Construct it once and pass it to
/// whatever needs records or the review queue.
pub struct SiteStore {
    conn: Connection,
}

fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid {field} timestamp '{value}'"))
}

fn row_to_record(row: &Row) -> Result<SiteRecord> {
    let analyzed_at: String = row.get("analyzed_at")?;
    Ok(SiteRecord {
        website: row.get("website")?,
        has_dark_mode: row.get("has_dark_mode")?,
        is_default: row.get("is_default")?,
        analyzed_at: parse_timestamp(&analyzed_at, "analyzed_at")?,
        notes: row.get("notes")?,
        screenshot: row.get("screenshot")?,
    })
}

impl SiteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        info!(action = "open", component = "site_store", path = ?path, "Connected to database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(mut conn: Connection) -> Result<Self> {
        run_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    /// Adds already validated records inside one transaction.
    pub fn insert_records(&mut self, records: &[SiteRecord]) -> Result<usize> {
        let start_time = Instant::now();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO theme_analysis (website, has_dark_mode, is_default, analyzed_at, notes, screenshot)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.website,
                    record.has_dark_mode,
                    record.is_default,
                    record.analyzed_at.to_rfc3339(),
                    record.notes,
                    record.screenshot,
                ])?;
            }
        }
        tx.commit().context("Failed to commit record import")?;

        info!(
            action = "complete",
            component = "record_import",
            record_count = records.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Imported records"
        );
        Ok(records.len())
    }

    pub fn pending_reviews(&self) -> Result<Vec<ReviewSubmission>> {
        let mut stmt = self.conn.prepare(
            "SELECT website, submitted_at, status FROM pending_reviews ORDER BY id ASC",
        )?;
        let mut rows = stmt.query([])?;
        let mut submissions = Vec::new();
        while let Some(row) = rows.next()? {
            let submitted_at: String = row.get(1)?;
            let status: String = row.get(2)?;
            if status != ReviewStatus::Pending.as_str() {
                warn!(action = "skip", component = "review_queue", status = %status, "Unknown review status");
                continue;
            }
            submissions.push(ReviewSubmission {
                website: row.get(0)?,
                submitted_at: parse_timestamp(&submitted_at, "submitted_at")?,
                status: ReviewStatus::Pending,
            });
        }
        Ok(submissions)
    }
}

impl RecordSource for SiteStore {
    /// Newest analysis first, so lookups see the latest verdict for a host.
    fn load_records(&self) -> Result<Vec<SiteRecord>> {
        let start_time = Instant::now();
        let mut stmt = self.conn.prepare(
            "SELECT website, has_dark_mode, is_default, analyzed_at, notes, screenshot
             FROM theme_analysis ORDER BY analyzed_at DESC, id DESC",
        )?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(row_to_record(row)?);
        }

        info!(
            action = "query",
            component = "site_store",
            record_count = records.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Loaded record snapshot"
        );
        Ok(records)
    }
}

impl ReviewQueue for SiteStore {
    fn submit(&self, website: &str) -> Result<ReviewSubmission> {
        let submitted_at: String = self
            .conn
            .query_row(
                "INSERT INTO pending_reviews (website, submitted_at, status)
                 VALUES (?1, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'), ?2)
                 RETURNING submitted_at",
                params![website, ReviewStatus::Pending.as_str()],
                |row| row.get(0),
            )
            .context("Failed to queue website for review")?;

        info!(action = "submit", component = "review_queue", website = website, "Queued website for review");
        Ok(ReviewSubmission {
            website: website.to_string(),
            submitted_at: parse_timestamp(&submitted_at, "submitted_at")?,
            status: ReviewStatus::Pending,
        })
    }
}

fn schema_version(conn: &Connection) -> Result<i32> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .context("Failed to read user_version pragma")
}

pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let version = schema_version(conn)?;

    if version > CURRENT_SCHEMA_VERSION {
        bail!(
            "Database version ({}) is newer than supported schema ({})",
            version,
            CURRENT_SCHEMA_VERSION
        );
    }
    if version == CURRENT_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction().context("Failed to open migration transaction")?;
    tx.execute_batch(SCHEMA_V1).context("Failed to create schema")?;
    tx.execute_batch(&format!("PRAGMA user_version = {CURRENT_SCHEMA_VERSION}"))
        .context("Failed to update user_version pragma")?;
    tx.commit().context("Failed to commit migrations")?;

    info!(action = "migrate", component = "site_store", from = version, to = CURRENT_SCHEMA_VERSION, "Applied schema migrations");
    Ok(())
}
