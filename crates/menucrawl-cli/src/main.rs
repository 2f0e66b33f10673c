mod profile;
mod search;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::search::SearchArgs;

#[derive(Debug, Parser)]
#[command(name = "menucrawl-cli")]
#[command(about = "Restaurant menu extraction command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a restaurant search and print the result as JSON
    Search(SearchArgs),
    /// Validate a site profile and print the effective settings as YAML
    Profile {
        /// Profile file to check; defaults to MENUCRAWL_SITE_PROFILE_PATH
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Help and usage errors must not depend on the environment being valid.
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = menucrawl_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries the JSON document; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search(args) => search::run(&args, &config).await,
        Commands::Profile { path } => profile::run(path.as_deref(), &config),
    }
}
