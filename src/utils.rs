use time::macros::format_description;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

use crate::args::{Args, Command};
use crate::tutorial::STEPS;

/// `RUST_LOG` wins when set; otherwise `--verbose` picks info over error.
pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let timer = LocalTime::new(format_description!(
        "[hour]:[minute]:[second].[subsecond digits:3]"
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn format_number(num: u64) -> String {
    let digits = num.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn validate_args(args: &Args) -> anyhow::Result<()> {
    if let Some(workers) = args.workers {
        if workers == 0 {
            anyhow::bail!("--workers must be greater than 0");
        }
    }

    if args.badge_host.trim().is_empty() {
        anyhow::bail!("--badge-host must not be empty");
    }

    match &args.command {
        Command::Adoption { goal } if *goal > 100 => {
            anyhow::bail!("--goal must be between 0 and 100");
        }
        Command::Tutorial { step, .. } if *step == 0 || *step > STEPS.len() => {
            anyhow::bail!("--step must be between 1 and {}", STEPS.len());
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn formats_thousands() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(24_862_100), "24,862,100");
    }

    #[test]
    fn rejects_zero_workers_and_bad_ranges() {
        let args = Args::parse_from(["darkmodenow", "--workers", "0", "init"]);
        assert!(validate_args(&args).is_err());

        let args = Args::parse_from(["darkmodenow", "adoption", "--goal", "120"]);
        assert!(validate_args(&args).is_err());

        let args = Args::parse_from(["darkmodenow", "tutorial", "--step", "4"]);
        assert!(validate_args(&args).is_err());

        let args = Args::parse_from(["darkmodenow", "--badge-host", " ", "init"]);
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn accepts_defaults() {
        let args = Args::parse_from(["darkmodenow", "calc"]);
        assert!(validate_args(&args).is_ok());
    }
}
