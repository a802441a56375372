//! CSV artifact of normalized port records
//!
//! The structured intermediate between the transform and a later load, so
//! a run can be reviewed or loaded elsewhere without re-reading the workbook
//! or re-parsing generated SQL.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::{Reader, Writer};

use super::types::PortRecord;

/// Write port records as CSV with a header row
pub fn write_ports<W: Write>(writer: W, ports: &[PortRecord]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);

    for port in ports {
        wtr.serialize(port)
            .with_context(|| format!("Failed to write port: {}", port.unlocode))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

/// Read port records written by [`write_ports`]
///
/// Every record is validated; the first bad one fails the read with its
/// 1-based data row number.
pub fn read_ports<R: Read>(reader: R) -> Result<Vec<PortRecord>> {
    let mut rdr = Reader::from_reader(reader);
    let mut ports = Vec::new();

    for (idx, result) in rdr.deserialize::<PortRecord>().enumerate() {
        let row_num = idx + 1;
        let port = result.with_context(|| format!("Row {}: malformed port record", row_num))?;
        if let Err(e) = port.validate() {
            bail!("Row {}: {}", row_num, e);
        }
        ports.push(port);
    }

    Ok(ports)
}

/// Write port records to a CSV file
pub fn write_ports_csv<P: AsRef<Path>>(path: P, ports: &[PortRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    write_ports(file, ports)?;

    log::info!("Wrote {} ports to {}", ports.len(), path.display());
    Ok(())
}

/// Read port records from a CSV file
pub fn read_ports_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PortRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    read_ports(file).with_context(|| format!("Failed to read ports from {}", path.display()))
}
