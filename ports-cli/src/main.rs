use anyhow::Result;
use clap::Parser;
use colored::*;

use ports_cli::cli::commands::{export, extract, generate, inspect, load};
use ports_cli::cli::{Cli, Commands};
use ports_cli::config::Config;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load(cli.config.as_deref())?;
    log::debug!("Using config: {:?}", config);

    match cli.command {
        Commands::Generate(args) => generate::handle_generate_command(args, config),
        Commands::Load(args) => load::handle_load_command(args, config).await,
        Commands::Export(args) => export::handle_export_command(args, config),
        Commands::Extract(args) => extract::handle_extract_command(args),
        Commands::Inspect(args) => inspect::handle_inspect_command(args, config),
    }
}
