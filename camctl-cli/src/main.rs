use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "camctl", about = "Control ONVIF PTZ cameras")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    connection: commands::ConnectionArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether cameras are reachable
    Status(commands::status::StatusArgs),
    /// Move a camera in a direction
    Move(commands::movement::MoveArgs),
    /// Return a camera to its first preset
    Reset(commands::reset::ResetArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Status(args) => commands::status::run(args, &cli.connection).await,
        Commands::Move(args) => commands::movement::run(args, &cli.connection).await,
        Commands::Reset(args) => commands::reset::run(args, &cli.connection).await,
        Commands::Config(args) => commands::config::run(args, &cli.connection),
    }
}
