//! TripWeaver CLI: the main entry point.
//!
//! Commands:
//! - `onboard`: Create the config file
//! - `plan`: Plan one trip from flags and print or save it
//! - `session`: Interactive planning with section switching
//! - `doctor`: Diagnose configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "tripweaver",
    about = "TripWeaver — multi-agent travel planning",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Plan a trip in one shot
    Plan(commands::plan::PlanArgs),

    /// Plan trips interactively and browse the sections
    Session,

    /// Diagnose configuration health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Plan(args) => commands::plan::run(args).await?,
        Commands::Session => commands::session::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
