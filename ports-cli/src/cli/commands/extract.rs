//! `extract` command handler

use anyhow::{Context, Result};
use colored::*;

use super::ExtractCommands;
use crate::importer::extract_from_script;

pub fn handle_extract_command(args: ExtractCommands) -> Result<()> {
    if !args.file.exists() {
        anyhow::bail!("SQL file does not exist: {}", args.file.display());
    }

    let ports = extract_from_script(&args.file)?;

    if args.json {
        let json = serde_json::to_string_pretty(&ports).context("Failed to serialize ports")?;
        println!("{}", json);
        return Ok(());
    }

    for port in &ports {
        println!(
            "  {} - {} ({}) at {}, {}",
            port.unlocode.bold(),
            port.name,
            port.country_code,
            port.latitude,
            port.longitude
        );
    }
    println!();
    println!("Extracted {} ports", ports.len().to_string().bright_green());
    Ok(())
}
