//! `export` command handler

use anyhow::Result;
use colored::*;

use super::{ExportCommands, print_summary};
use crate::config::Config;
use crate::importer::PortImporter;

pub fn handle_export_command(args: ExportCommands, mut config: Config) -> Result<()> {
    args.source.apply(&mut config);
    config.output_path = args
        .output
        .unwrap_or_else(|| config.output_path.with_extension("csv"));

    let importer = PortImporter::new(config);
    let summary = importer.export_csv()?;

    print_summary(&summary);
    println!(
        "{} CSV file created: {}",
        "[OK]".bright_green().bold(),
        importer.config().output_path.display()
    );
    Ok(())
}
