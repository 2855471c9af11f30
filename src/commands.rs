use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::impact::{compute_impact, CalculatorInput, Device, ScreenType};
use crate::preferences::{JsonPreferenceStore, PreferenceStore};
use crate::records::{ingest_records, RawSiteRecord, SiteRecord};
use crate::showcase::{filter_showcase, site_detail, ThemeMode};
use crate::sqlite::SiteStore;
use crate::stats::Dashboard;
use crate::tutorial::{Clipboard, Tutorial, STEPS};
use crate::utils::format_number;
use crate::verification::{RecordSource, VerificationState, Verifier};
use crate::{Args, Command};

/// The terminal has no clipboard, so copied samples are printed.
pub struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        println!("{text}");
        Ok(())
    }
}

pub fn run(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    match &args.command {
        Command::Calc {
            device,
            screen,
            hours,
            apps,
            dark_percent,
        } => print_impact(*device, *screen, *hours, *apps, *dark_percent),
        Command::Adoption { goal } => {
            let store = SiteStore::open(&args.db)?;
            let dashboard = Dashboard::from_records(&store.load_records()?, *goal);
            print_dashboard(&dashboard);
        }
        Command::Showcase { mode, search } => {
            let store = SiteStore::open(&args.db)?;
            let mode = match mode {
                Some(mode) => *mode,
                None => JsonPreferenceStore::open(args.preferences.clone())?
                    .theme_mode()?
                    .unwrap_or_default(),
            };
            print_showcase(&store, mode, search.as_deref())?;
        }
        Command::Site { url } => {
            let store = SiteStore::open(&args.db)?;
            let records = store.load_records()?;
            match site_detail(&records, url) {
                Some(record) => print_site_detail(record),
                None => println!("{} is not tracked yet", url.trim()),
            }
        }
        Command::Verify { url } => {
            let store = SiteStore::open(&args.db)?;
            let records = store.load_records()?;
            let mut verifier = Verifier::verifying(&store, args.badge_host.clone())?;
            let state = verifier.submit(url, &records)?;
            print_verification(state);
        }
        Command::Import { file } => import_records(&args.db, file)?,
        Command::Tutorial { step, copy } => {
            let tutorial = Tutorial::at_step(step.saturating_sub(1));
            print_tutorial(&tutorial);
            if *copy {
                tutorial.copy_code(&StdoutClipboard)?;
            }
        }
        Command::Mode { mode } => {
            JsonPreferenceStore::open(args.preferences.clone())?.set_theme_mode(*mode)?;
            println!("Showcase mode set to {}", mode.label());
        }
        Command::Init => {
            SiteStore::open(&args.db)?;
            println!("Initialized database at {}", args.db.display());
        }
    }

    info!(
        action = "complete",
        component = "command",
        duration_ms = start_time.elapsed().as_millis(),
        "Command finished"
    );
    Ok(())
}

fn print_impact(device: Device, screen: ScreenType, hours: f64, apps: i64, dark_percent: f64) {
    let input = CalculatorInput::clamped(device, screen, hours, apps, dark_percent);
    let result = compute_impact(&input);

    println!("\n--- Your Impact ---");
    println!(
        "{:?} ({:?}), {} h/day, {} apps, {}% already dark",
        input.device,
        input.screen_type,
        input.daily_hours,
        input.app_count,
        input.dark_mode_adoption_percent
    );
    for (label, value) in result.display_rows() {
        println!("- {label}: {value}");
    }
}

fn print_dashboard(dashboard: &Dashboard) {
    println!("\n--- Dark Mode Progress ---");
    println!(
        "Sites tracked: {}",
        format_number(dashboard.counts.total as u64)
    );
    println!(
        "With dark mode: {} ({} by default)",
        format_number(dashboard.counts.with_dark_mode as u64),
        format_number(dashboard.counts.dark_by_default as u64)
    );
    println!("Adoption: {}%", dashboard.adoption_percent);
    println!(
        "Goal: {}%{}",
        dashboard.goal_percent,
        if dashboard.goal_reached() { " (reached)" } else { "" }
    );
}

fn print_showcase(store: &SiteStore, mode: ThemeMode, search: Option<&str>) -> Result<()> {
    let records = store.load_records()?;
    let entries = filter_showcase(&records, mode, search);

    match search.map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => println!("\n--- Sites matching '{query}' ---"),
        None => println!("\n--- {} ---", mode.label()),
    }
    if entries.is_empty() {
        println!("No sites found");
    }
    for entry in entries {
        println!("- {} ({})", entry.host, entry.favicon_url);
    }
    Ok(())
}

fn print_site_detail(record: &SiteRecord) {
    println!("\n--- {} ---", record.website);
    println!(
        "Analyzed on {}",
        record.analyzed_at.format("%B %-d, %Y %H:%M UTC")
    );
    if let Some(screenshot) = &record.screenshot {
        println!("Screenshot: {screenshot}");
    }
    if record.has_dark_mode {
        let theme = if record.is_default { "default" } else { "optional" };
        println!("This website has dark mode support ({theme})");
    } else {
        println!("This website does not support dark mode");
    }
    if !record.notes.is_empty() {
        println!("Notes: {}", record.notes);
    }
}

fn print_verification(state: &VerificationState) {
    match state {
        VerificationState::Success(badge) => {
            println!("{} is verified. Embed this badge:\n", badge.hostname);
            println!("{}", badge.snippet);
        }
        VerificationState::Pending { hostname } => {
            println!("{hostname} has been submitted for review. Check back soon.");
        }
        VerificationState::Error(e) => println!("{e}"),
        VerificationState::Implementation(_) | VerificationState::Verifying => {}
    }
}

fn print_tutorial(tutorial: &Tutorial) {
    let step = tutorial.current();
    println!("\n--- How to Add Dark Mode ({}) ---", tutorial.progress_label());
    println!("{}\n", step.title);
    println!("{}\n", step.description);
    if tutorial.step_index() + 1 < STEPS.len() {
        println!("Next: run with --step {}", tutorial.step_index() + 2);
    } else {
        println!("Done? Verify your site with `darkmodenow verify <url>`");
    }
}

fn import_records(db: &Path, file: &Path) -> Result<()> {
    let contents = fs::read_to_string(file)
        .with_context(|| format!("Failed to read records from {}", file.display()))?;
    let raw: Vec<RawSiteRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of records", file.display()))?;

    let report = ingest_records(raw);
    let mut store = SiteStore::open(db)?;
    let imported = store.insert_records(&report.accepted)?;

    println!("Imported {} records", format_number(imported as u64));
    if !report.rejected.is_empty() {
        println!("Skipped {} malformed records:", report.rejected.len());
        for (index, reason) in &report.rejected {
            println!("- #{index}: {reason}");
        }
    }
    Ok(())
}
