use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use darkmodenow::utils::{setup_logging, validate_args};
use darkmodenow::{commands, Args};

fn configure_workers(workers: Option<usize>) -> Result<()> {
    let workers = workers.unwrap_or_else(|| {
        let cpu_count = num_cpus::get();
        std::cmp::min(cpu_count, 8)
    });

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()?;
    info!(action = "configure", component = "thread_pool", worker_count = workers, "Using workers for processing");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    validate_args(&args)?;
    configure_workers(args.workers)?;

    match commands::run(&args) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
