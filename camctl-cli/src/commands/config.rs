use crate::config::ConfigLoader;
use anyhow::Result;
use clap::{Args, Subcommand};

use super::ConnectionArgs;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (merged, password masked)
    Show,
    /// Show configuration file paths
    Path,
}

pub fn run(args: ConfigArgs, connection: &ConnectionArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(connection),
        ConfigCommands::Path => show_paths(),
    }
}

fn show_config(connection: &ConnectionArgs) -> Result<()> {
    let config = ConfigLoader::load(connection.overrides())?;
    let toml_str = toml::to_string_pretty(&config.redacted())?;
    println!("{}", toml_str);
    Ok(())
}

fn show_paths() -> Result<()> {
    println!("User config:    {}", ConfigLoader::user_config_path().display());
    println!("Project config: {}", ConfigLoader::project_config_path().display());
    Ok(())
}
