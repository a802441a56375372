//! `load` command handler

use anyhow::Result;
use colored::*;
use dialoguer::Confirm;
use is_terminal::IsTerminal;

use super::{LoadCommands, print_summary};
use crate::config::Config;
use crate::importer::PortImporter;
use crate::ports::artifact::read_ports_csv;
use crate::store::{PortStore, SqliteStore};

/// Rows shown after a load to eyeball the result
const SAMPLE_SIZE: i64 = 10;

pub async fn handle_load_command(args: LoadCommands, mut config: Config) -> Result<()> {
    args.source.apply(&mut config);
    if let Some(url) = args.database_url {
        config.store.database_url = url;
    }

    let importer = PortImporter::new(config);

    let ports = match &args.from_csv {
        Some(path) => {
            println!("Reading CSV file: {}", path.display().to_string().cyan());
            let ports = read_ports_csv(path)?;
            println!("Ports read: {}", ports.len().to_string().bright_green().bold());
            ports
        }
        None => {
            println!(
                "Reading Excel file: {}",
                importer.config().source_path.display().to_string().cyan()
            );
            let output = importer.transform_source()?;
            print_summary(&output.summary);
            output.ports
        }
    };

    if !args.yes && std::io::stdin().is_terminal() {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Replace all rows of the ports table with {} ports?",
                ports.len()
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted, nothing was changed");
            return Ok(());
        }
    }

    println!();
    println!("Connecting to database...");
    let store = SqliteStore::connect(&importer.config().store.database_url).await?;

    println!("Importing ports...");
    let written = importer.load(&store, &ports).await?;
    println!("Successfully imported {} ports", written);

    let count = store.count().await?;
    println!();
    println!("Total ports in database: {}", count.to_string().bright_green().bold());

    let sample = store.sample(SAMPLE_SIZE).await?;
    if !sample.is_empty() {
        println!();
        println!("Sample ports:");
        for port in &sample {
            println!(
                "  {} - {} ({}) at {}, {}",
                port.unlocode.bold(),
                port.name,
                port.country_code,
                port.latitude,
                port.longitude
            );
        }
    }

    store.close().await;
    println!();
    println!("{} Port database updated", "[OK]".bright_green().bold());
    Ok(())
}
