//! Subcommands and their arguments

pub mod export;
pub mod extract;
pub mod generate;
pub mod inspect;
pub mod load;

use std::path::PathBuf;

use clap::{Args, Subcommand};
use colored::*;

use crate::config::Config;
use crate::ports::TransformSummary;
use crate::sql::Dialect;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a SQL script that recreates the ports table
    Generate(GenerateCommands),
    /// Load sea ports straight into the database
    Load(LoadCommands),
    /// Write the transformed ports as CSV
    Export(ExportCommands),
    /// Recover port tuples from an existing SQL script
    Extract(ExtractCommands),
    /// Show sheets and sea port counts of a workbook
    Inspect(InspectCommands),
}

/// Workbook overrides shared by commands that read the code list
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// UN/LOCODE workbook (.xlsx)
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Sheet holding the code list
    #[arg(long)]
    pub sheet: Option<String>,
}

impl SourceArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(source) = &self.source {
            config.source_path = source.clone();
        }
        if let Some(sheet) = &self.sheet {
            config.sheet_name = sheet.clone();
        }
    }
}

#[derive(Args, Debug)]
pub struct GenerateCommands {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Script to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// SQL dialect of the generated script
    #[arg(long, value_enum, default_value_t = Dialect::Postgres)]
    pub dialect: Dialect,
}

#[derive(Args, Debug)]
pub struct LoadCommands {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Load a CSV artifact written by `export` instead of reading the workbook
    #[arg(long, conflicts_with_all = ["source", "sheet"])]
    pub from_csv: Option<PathBuf>,

    /// Database URL (e.g. sqlite://ports.db)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Replace the table contents without asking
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ExportCommands {
    #[command(flatten)]
    pub source: SourceArgs,

    /// CSV file to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ExtractCommands {
    /// SQL script containing INSERT INTO ports statements
    pub file: PathBuf,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InspectCommands {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Print the drop tallies of a transform run
pub fn print_summary(summary: &TransformSummary) {
    println!("Rows read:           {}", summary.total_rows);
    println!("Sea ports found:     {}", summary.sea_ports.to_string().cyan());
    if summary.missing_code > 0 {
        println!("  missing code:      {}", summary.missing_code.to_string().yellow());
    }
    if summary.invalid_code > 0 {
        println!("  malformed code:    {}", summary.invalid_code.to_string().yellow());
    }
    if summary.dropped_for_coordinates() > 0 {
        println!(
            "  bad coordinates:   {}",
            summary.dropped_for_coordinates().to_string().yellow()
        );
    }
    if summary.duplicates > 0 {
        println!("  duplicate codes:   {}", summary.duplicates.to_string().yellow());
    }
    println!("Rows dropped:        {}", summary.dropped());
    println!(
        "Ports retained:      {}",
        summary.retained.to_string().bright_green().bold()
    );
}
