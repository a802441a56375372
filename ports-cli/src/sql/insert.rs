//! INSERT statement emission and script writing

use std::io::Write;

use anyhow::{Context, Result};

use super::escape::{quote_literal, quote_optional};
use super::schema::{Dialect, create_table_script};
use super::{DATA_COLUMNS, TABLE_NAME};
use crate::ports::PortRecord;

/// One INSERT for one record, column list and VALUES on separate lines
///
/// Text fields are escaped literals, coordinates are bare numbers and
/// absent optionals are `NULL`.
pub fn emit_insert_statement(port: &PortRecord) -> String {
    format!(
        "INSERT INTO {} ({})\nVALUES ({}, {}, {}, {}, {}, {}, {}, {});",
        TABLE_NAME,
        DATA_COLUMNS.join(", "),
        quote_literal(&port.unlocode),
        quote_literal(&port.name),
        quote_literal(&port.country_code),
        port.latitude,
        port.longitude,
        quote_literal(&port.function_code),
        quote_optional(port.iata_code.as_deref()),
        quote_optional(port.subdivision.as_deref()),
    )
}

/// INSERT statements for each record, in input order
pub fn emit_insert_statements(ports: &[PortRecord]) -> impl Iterator<Item = String> + '_ {
    ports.iter().map(emit_insert_statement)
}

/// Write a complete script: schema block followed by one INSERT per record
///
/// Returns the number of statements written.
pub fn write_script<W: Write>(writer: &mut W, ports: &[PortRecord], dialect: Dialect) -> Result<usize> {
    writeln!(
        writer,
        "-- Generated by ports-cli ({}) at {}",
        dialect,
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .context("Failed to write script header")?;
    writeln!(writer).context("Failed to write script header")?;

    write!(writer, "{}", create_table_script(dialect)).context("Failed to write schema block")?;
    writeln!(writer, "\n-- Insert ports").context("Failed to write schema block")?;

    let mut written = 0;
    for statement in emit_insert_statements(ports) {
        writeln!(writer, "\n{}", statement).context("Failed to write INSERT statement")?;
        written += 1;
    }

    writer.flush().context("Failed to flush script")?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(unlocode: &str, name: &str) -> PortRecord {
        PortRecord {
            unlocode: unlocode.to_string(),
            name: name.to_string(),
            country_code: unlocode[..2].to_string(),
            latitude: 40.71,
            longitude: -74.5,
            function_code: "1234".to_string(),
            iata_code: None,
            subdivision: None,
        }
    }

    #[test]
    fn test_emit_insert_statement() {
        let statement = emit_insert_statement(&port("USNYC", "New York"));
        assert_eq!(
            statement,
            "INSERT INTO ports (unlocode, name, country_code, latitude, longitude, function_code, iata_code, subdivision)\n\
             VALUES ('USNYC', 'New York', 'US', 40.71, -74.5, '1234', NULL, NULL);"
        );
    }

    #[test]
    fn test_emit_escapes_text() {
        let mut record = port("IEOBP", "O'Brien's Port");
        record.iata_code = Some("O'B".to_string());
        record.subdivision = Some("D".to_string());

        let statement = emit_insert_statement(&record);
        assert!(statement.contains("'O''Brien''s Port'"));
        assert!(statement.ends_with("'1234', 'O''B', 'D');"));
    }

    #[test]
    fn test_emit_preserves_order() {
        let ports = vec![port("USNYC", "New York"), port("NLRTM", "Rotterdam")];
        let statements: Vec<_> = emit_insert_statements(&ports).collect();

        assert_eq!(statements.len(), 2);
        assert!(statements[0].contains("'USNYC'"));
        assert!(statements[1].contains("'NLRTM'"));
    }

    #[test]
    fn test_write_script() {
        let ports = vec![port("USNYC", "New York"), port("NLRTM", "Rotterdam")];
        let mut buf = Vec::new();

        let written = write_script(&mut buf, &ports, Dialect::Postgres).unwrap();
        assert_eq!(written, 2);

        let text = String::from_utf8(buf).unwrap();
        let drop_pos = text.find("DROP TABLE IF EXISTS ports").unwrap();
        let insert_pos = text.find("INSERT INTO ports").unwrap();
        assert!(drop_pos < insert_pos);
        assert_eq!(text.matches("INSERT INTO ports").count(), 2);
    }
}
