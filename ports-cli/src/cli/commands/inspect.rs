//! `inspect` command handler

use anyhow::Result;
use colored::*;

use super::InspectCommands;
use crate::config::Config;
use crate::ports::filter_sea_ports;
use crate::sheet::{headers, list_sheets, read_ports_excel};

pub fn handle_inspect_command(args: InspectCommands, mut config: Config) -> Result<()> {
    args.source.apply(&mut config);

    println!(
        "Reading Excel file: {}",
        config.source_path.display().to_string().cyan()
    );

    let sheets = list_sheets(&config.source_path)?;
    println!();
    println!("Sheet names: {}", sheets.join(", "));

    let rows = read_ports_excel(&config.source_path, &config.sheet_name)?;
    let total = rows.len();
    let mut sea_ports = filter_sea_ports(rows);
    let first = sea_ports.next();
    let sea_port_count = first.iter().count() + sea_ports.count();

    println!();
    println!("=== {} ===", config.sheet_name.bold());
    println!("Total rows: {}", total);
    println!(
        "Rows with '{}' containing 1 (sea ports): {}",
        headers::FUNCTION,
        sea_port_count.to_string().bright_green()
    );

    if let Some(port) = first {
        println!();
        println!("First sea port example:");
        println!("  {}: {}", headers::COUNTRY, port.country);
        println!("  {}: {}", headers::LOCATION, port.location);
        println!("  {}: {}", headers::NAME, port.name);
        println!("  {}: {}", headers::FUNCTION, port.function.unwrap_or_default());
        println!(
            "  {}: {}",
            headers::LATITUDE,
            port.latitude_raw.unwrap_or_default()
        );
        println!(
            "  {}: {}",
            headers::LONGITUDE,
            port.longitude_raw.unwrap_or_default()
        );
    }

    Ok(())
}
