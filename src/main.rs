use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shift_scheduler::display::{print_auto_fill_report, print_stats, print_week_schedule, write_schedule_to_file};
use shift_scheduler::parser::{load_roster, parse_required_staff};
use shift_scheduler::{web, EngineConfig, ScheduleEngine};

#[derive(Parser)]
#[command(name = "shift-scheduler")]
#[command(about = "Weekly two-hour shift scheduler", long_about = None)]
struct Cli {
    /// CSV roster with name and total_hours columns (defaults to the built-in roster)
    #[arg(long, global = true)]
    roster: Option<PathBuf>,

    /// Required staff for slots 1-7, e.g. "2,3,3,3,3,3,2"
    #[arg(long, global = true)]
    required: Option<String>,

    /// Do not enforce the weekday contiguity pattern
    #[arg(long, global = true)]
    no_contiguity: bool,

    /// Seed for auto-fill scoring; random when omitted
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API
    Web {
        #[arg(long, env = "PORT", default_value = "8080")]
        port: u16,
    },
    /// Auto-fill an empty week and print the result
    Auto {
        /// Also write the schedule as CSV
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn build_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = EngineConfig {
        contiguity: !cli.no_contiguity,
        seed: cli.seed,
        ..EngineConfig::default()
    };
    if let Some(path) = &cli.roster {
        config.roster = load_roster(path)
            .with_context(|| format!("Failed to load roster from {}", path.display()))?;
        info!(workers = config.roster.len(), path = %path.display(), "Loaded roster");
    }
    if let Some(required) = &cli.required {
        config.required_staff = parse_required_staff(required)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let mut engine = ScheduleEngine::new(config)?;

    match cli.command {
        Commands::Web { port } => {
            println!("Starting web server on port {}...", port);
            println!("Access the API at http://localhost:{}/api/schedule", port);
            web::start_server(port, engine).await?;
        }
        Commands::Auto { output } => {
            let report = engine.auto_fill();
            print_week_schedule(&engine);
            print_stats(&engine);
            print_auto_fill_report(&report);

            if let Some(path) = output {
                write_schedule_to_file(&engine, &path)
                    .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
                println!("\nSchedule saved to {}", path.display());
            }
        }
    }

    Ok(())
}
