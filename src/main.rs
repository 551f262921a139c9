use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::error;

use dirmirror::propagate::{ConsoleProgressCallback, DefaultPropagationOptions};
use dirmirror::schedule::Scheduler;
use dirmirror::{CopyPolicy, SyncInfo};

/// Periodically mirror SOURCE onto REPLICA.
#[derive(Parser, Debug)]
#[command(name = "dirmirror", version, about)]
struct Cli {
    /// Directory to mirror
    source: PathBuf,
    /// Directory kept identical to the source
    replica: PathBuf,
    /// Directory the per-cycle log.txt is written to
    log_dir: PathBuf,
    /// Seconds to wait between cycles
    interval_secs: u64,
    /// Don't recopy files that are already identical in the replica
    #[arg(long)]
    skip_unchanged: bool,
    /// Treat files of different sizes as changed without hashing them
    #[arg(long)]
    quick_check: bool,
    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut info = SyncInfo::new(cli.source, cli.replica);
    info.quick_check = cli.quick_check;
    if cli.skip_unchanged {
        info.copy_policy = CopyPolicy::SkipUnchanged;
    }

    let scheduler = match Scheduler::new(info, &cli.log_dir, cli.interval_secs) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    if cli.once {
        scheduler.run_once(&DefaultPropagationOptions, &ConsoleProgressCallback);
        return;
    }

    scheduler.run(&DefaultPropagationOptions, &ConsoleProgressCallback)
}
