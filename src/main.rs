//! taskpulse - periodic markdown-checklist progress tracker.
//!
//! Running with no subcommand starts the immediate-plus-periodic update
//! loop; `once` runs a single cycle and exits.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use taskpulse::{ProgressTracker, Scheduler, TrackerConfig};

#[derive(Parser)]
#[command(name = "taskpulse")]
#[command(version = "0.1.0")]
#[command(about = "Periodic markdown-checklist progress tracker", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the update loop: one cycle immediately, then on the
    /// configured interval until interrupted (default)
    Watch,

    /// Run a single cycle and exit
    Once,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "taskpulse=debug,info"
    } else {
        "taskpulse=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Resolve project path
    let project_path = cli.project.canonicalize().unwrap_or(cli.project.clone());

    if !project_path.exists() {
        eprintln!(
            "{} Project directory does not exist: {}",
            "Error:".red().bold(),
            project_path.display()
        );
        std::process::exit(1);
    }

    let config = match TrackerConfig::load(&project_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            std::process::exit(1);
        }
    };

    let tracker = ProgressTracker::new(config);

    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Once => {
            let cycle = tracker.run_cycle()?;
            println!(
                "{} {}/{} tasks completed ({}%)",
                "Progress updated:".green().bold(),
                cycle.summary.completed,
                cycle.summary.total,
                cycle.summary.completed_percent
            );
        }
        Commands::Watch => {
            println!(
                "{} updating every {}s. Press Ctrl+C to stop.",
                "Progress tracker started:".green().bold(),
                tracker.config().update_interval().as_secs()
            );

            let handle = Scheduler::new(tracker).spawn();
            tokio::signal::ctrl_c().await?;
            handle.stop().await;
        }
    }

    Ok(())
}
