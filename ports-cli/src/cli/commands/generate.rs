//! `generate` command handler

use anyhow::Result;
use colored::*;

use super::{GenerateCommands, print_summary};
use crate::config::Config;
use crate::importer::PortImporter;

pub fn handle_generate_command(args: GenerateCommands, mut config: Config) -> Result<()> {
    args.source.apply(&mut config);
    if let Some(output) = args.output {
        config.output_path = output;
    }

    println!(
        "Reading Excel file: {}",
        config.source_path.display().to_string().cyan()
    );

    let importer = PortImporter::new(config);
    let summary = importer.generate_script(args.dialect)?;

    print_summary(&summary);
    println!();
    println!(
        "{} SQL file created: {}",
        "[OK]".bright_green().bold(),
        importer.config().output_path.display()
    );
    println!(
        "{} Total ports to import: {}",
        "[OK]".bright_green().bold(),
        summary.retained
    );
    Ok(())
}
