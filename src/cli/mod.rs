//! Command-line interface.
//!
//! With no subcommand the binary serves the API. Subcommands:
//! - `seed` - Load the bundled dataset into the selected database
//! - `config check` - Validate the configuration file and print a summary

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, Environment};

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "neighborly")]
#[command(author, version, about = "REST API for building residents and their shared interests", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "neighborly.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Environment whose database settings are used
    #[arg(short, long, env = "NEIGHBORLY_ENV", default_value = "development")]
    pub env: Environment,

    /// Subcommand to run (if none, starts the server)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replace all rows with the bundled seed dataset
    Seed,

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate the configuration file
    Check,
}

/// Human-readable summary of the resolved configuration for `config check`
pub fn config_summary(config: &Config, env: Environment) -> String {
    let connection = config.connection(env);
    format!(
        "Configuration OK\n  listen:      {}:{}\n  api prefix:  {}\n  log level:   {}\n  environment: {}\n  database:    {} (max {} connections)",
        config.server.host,
        config.server.port,
        config.server.api_prefix,
        config.logging.level,
        env,
        connection.url,
        connection.max_connections,
    )
}

/// Run `config check`
pub fn check_config(cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;
    println!("{}", config_summary(&config, cli.env));
    Ok(())
}
