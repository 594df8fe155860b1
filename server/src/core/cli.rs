use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::config::StoreBackend;
use super::constants::{
    ENV_CONFIG, ENV_CORS_ORIGINS, ENV_DATABASE_URL, ENV_HOST, ENV_PORT, ENV_SEED, ENV_STORE,
};

#[derive(Parser)]
#[command(name = "incidents")]
#[command(version, about = "Read-only reporting API over shelling incident records", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Incident store backend (postgres or memory)
    #[arg(long, global = true, env = ENV_STORE, value_parser = parse_store_backend)]
    pub store: Option<StoreBackend>,

    /// PostgreSQL connection URL
    #[arg(long, global = true, env = ENV_DATABASE_URL)]
    pub database_url: Option<String>,

    /// JSON file with incidents to load into the memory store
    #[arg(long, global = true, env = ENV_SEED)]
    pub seed: Option<PathBuf>,

    /// Allowed CORS origins: `*` or a comma-separated list
    #[arg(long, global = true, env = ENV_CORS_ORIGINS)]
    pub cors_origins: Option<String>,
}

/// Parse store backend from CLI/env string
fn parse_store_backend(s: &str) -> Result<StoreBackend, String> {
    match s.to_lowercase().as_str() {
        "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
        "memory" => Ok(StoreBackend::Memory),
        _ => Err(format!(
            "Invalid store backend '{}'. Valid options: postgres, memory",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Connect to the incident store, verify the incidents table and exit
    Check,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub store: Option<StoreBackend>,
    pub database_url: Option<String>,
    pub seed: Option<PathBuf>,
    pub cors_origins: Option<String>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            config: cli.config,
            store: cli.store,
            database_url: cli.database_url,
            seed: cli.seed,
            cors_origins: cli.cors_origins,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let mut cli = Cli::parse();
    let command = cli.command.take();
    (cli.into(), command)
}
