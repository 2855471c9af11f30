use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::badge::DEFAULT_BADGE_HOST;
use crate::impact::{Device, ScreenType};
use crate::showcase::ThemeMode;
use crate::stats::DEFAULT_GOAL_PERCENT;

#[derive(Parser, Debug)]
#[command(
    name = "darkmodenow",
    about = "Track dark mode adoption, estimate its energy impact and verify sites for a badge",
    version,
    long_about = None
)]
pub struct Args {
    /// Path to the site database
    #[arg(long, global = true, default_value = "darkmodenow.db")]
    pub db: PathBuf,

    /// Path to the preferences file
    #[arg(long, global = true, default_value = "darkmodenow.json")]
    pub preferences: PathBuf,

    /// Host serving the embeddable badge
    #[arg(long, global = true, default_value = DEFAULT_BADGE_HOST)]
    pub badge_host: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Number of worker threads
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Estimate yearly savings from switching apps to dark mode
    Calc {
        #[arg(long, value_enum, default_value_t = Device::Phone)]
        device: Device,

        #[arg(long, value_enum, default_value_t = ScreenType::Oled)]
        screen: ScreenType,

        /// Daily usage in hours (clamped to 0-24)
        #[arg(long, default_value_t = 4.8, allow_negative_numbers = true)]
        hours: f64,

        /// Number of apps in use
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        apps: i64,

        /// Share of those apps already using dark mode (clamped to 0-100)
        #[arg(long, default_value_t = 50.0, allow_negative_numbers = true)]
        dark_percent: f64,
    },

    /// Show the adoption dashboard
    Adoption {
        /// Target adoption percentage
        #[arg(long, default_value_t = DEFAULT_GOAL_PERCENT)]
        goal: u8,
    },

    /// List tracked sites, one per hostname
    Showcase {
        /// Defaults to the saved preference
        #[arg(long, value_enum)]
        mode: Option<ThemeMode>,

        /// Search hostnames across every mode
        #[arg(long)]
        search: Option<String>,
    },

    /// Show what is known about one tracked site
    Site { url: String },

    /// Verify a website and get its badge
    Verify { url: String },

    /// Import analyzed sites from a JSON array
    Import { file: PathBuf },

    /// Show a step of the dark mode tutorial
    Tutorial {
        #[arg(long, default_value_t = 1)]
        step: usize,

        /// Copy the step's code sample
        #[arg(long)]
        copy: bool,
    },

    /// Save the preferred showcase mode
    Mode {
        #[arg(value_enum)]
        mode: ThemeMode,
    },

    /// Create the database schema
    Init,
}
