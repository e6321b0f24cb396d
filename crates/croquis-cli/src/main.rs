use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod scan;

#[derive(Parser)]
#[command(name = "croquis", version, about = "Croquis gesture-drawing session CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interval selection
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Practice sessions
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
}

/// Logs go to stderr so stdout stays machine-readable. Filter via CROQUIS_LOG.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("CROQUIS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Session { action } => commands::session::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
