//! Configured import pipeline
//!
//! [`PortImporter`] owns the run configuration and drives each variant:
//! SQL script generation, CSV export and direct load into a store.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::ports::{self, PortRecord, RawPortRecord, TransformOutput, TransformSummary};
use crate::sheet;
use crate::sql::{self, Dialect, ExtractedPort};
use crate::store::{self, PortStore};

pub struct PortImporter {
    config: Config,
}

impl PortImporter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Raw rows of the configured sheet
    pub fn read_source(&self) -> Result<Vec<RawPortRecord>> {
        sheet::read_ports_excel(&self.config.source_path, &self.config.sheet_name)
    }

    /// Read the workbook and run the sea port transform over it
    pub fn transform_source(&self) -> Result<TransformOutput> {
        let rows = self.read_source()?;
        Ok(ports::transform(rows))
    }

    /// Write a drop/create + INSERT script to the configured output path
    pub fn generate_script(&self, dialect: Dialect) -> Result<TransformSummary> {
        let output = self.transform_source()?;
        let path = &self.config.output_path;

        let file = create_output_file(path)?;
        let mut writer = BufWriter::new(file);
        let written = sql::write_script(&mut writer, &output.ports, dialect)
            .with_context(|| format!("Failed to write SQL script: {}", path.display()))?;

        log::info!("Wrote {} INSERT statements to {}", written, path.display());
        Ok(output.summary)
    }

    /// Write the transformed records as a CSV artifact to the output path
    pub fn export_csv(&self) -> Result<TransformSummary> {
        let output = self.transform_source()?;
        let path = &self.config.output_path;

        let file = create_output_file(path)?;
        ports::artifact::write_ports(BufWriter::new(file), &output.ports)
            .with_context(|| format!("Failed to write CSV artifact: {}", path.display()))?;

        log::info!("Wrote {} ports to {}", output.ports.len(), path.display());
        Ok(output.summary)
    }

    /// Ensure the table exists, then replace its contents with `ports`
    pub async fn load(&self, store: &dyn PortStore, ports: &[PortRecord]) -> Result<u64> {
        store::prepare(store).await?;
        store::upsert(store, ports).await
    }
}

/// Port tuples recovered from an existing SQL script
pub fn extract_from_script<P: AsRef<Path>>(path: P) -> Result<Vec<ExtractedPort>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read SQL file: {}", path.display()))?;
    let extracted = sql::extract_insert_statements(&text);

    log::info!("Extracted {} ports from {}", extracted.len(), path.display());
    Ok(extracted)
}

fn create_output_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::store::SqliteStore;
    use rust_xlsxwriter::Workbook;
    use std::path::PathBuf;

    fn write_workbook(path: &Path) {
        let mut workbook = Workbook::new();

        // Decoy sheet first, like the real file
        workbook.add_worksheet().set_name("DNV").unwrap();

        let sheet = workbook.add_worksheet();
        sheet.set_name("UNLOCODE").unwrap();
        let headers = [
            "Change",
            "Country",
            "Location",
            "Name",
            "Subdivision",
            "Function",
            "IATA",
            "Lat in Decimal Degrees",
            "Long in Decimal Degrees",
        ];
        for (col, h) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *h).unwrap();
        }

        let rows: [(&str, &str, &str, &str, &str, &str, Option<f64>, Option<f64>); 4] = [
            ("US", "NYC", "New York", "NY", "1234----", "JFK", Some(40.71), Some(-74.0)),
            ("FR", "PAR", "Paris", "", "--3-----", "", Some(48.85), Some(2.35)),
            ("IE", "OBP", "O'Brien's Port", "D", "1-------", "", Some(53.1), Some(-6.2)),
            ("NL", "XXX", "Nowhere", "", "1-------", "", None, Some(4.4)),
        ];
        for (i, (country, location, name, subdivision, function, iata, lat, lon)) in
            rows.iter().enumerate()
        {
            let r = (i + 1) as u32;
            sheet.write_string(r, 1, *country).unwrap();
            sheet.write_string(r, 2, *location).unwrap();
            sheet.write_string(r, 3, *name).unwrap();
            if !subdivision.is_empty() {
                sheet.write_string(r, 4, *subdivision).unwrap();
            }
            sheet.write_string(r, 5, *function).unwrap();
            if !iata.is_empty() {
                sheet.write_string(r, 6, *iata).unwrap();
            }
            if let Some(lat) = lat {
                sheet.write_number(r, 7, *lat).unwrap();
            }
            if let Some(lon) = lon {
                sheet.write_number(r, 8, *lon).unwrap();
            }
        }

        workbook.save(path).unwrap();
    }

    fn importer_in(dir: &Path, output: &str) -> PortImporter {
        let source = dir.join("unlocode.xlsx");
        write_workbook(&source);

        PortImporter::new(Config {
            source_path: source,
            output_path: dir.join(output),
            sheet_name: "UNLOCODE".to_string(),
            store: StoreConfig {
                database_url: "sqlite::memory:".to_string(),
            },
        })
    }

    #[test]
    fn test_generate_script_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let importer = importer_in(dir.path(), "out/ports.sql");

        let summary = importer.generate_script(Dialect::Postgres).unwrap();
        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.retained, 2);
        assert_eq!(summary.not_sea_port, 1);
        assert_eq!(summary.invalid_coordinates, 1);

        let script_path: PathBuf = dir.path().join("out/ports.sql");
        let script = std::fs::read_to_string(&script_path).unwrap();
        assert!(script.contains("DROP TABLE IF EXISTS ports CASCADE;"));
        assert!(script.contains("'O''Brien''s Port'"));
        assert!(script.contains("'1234----', 'JFK', 'NY');"));

        let extracted = extract_from_script(&script_path).unwrap();
        let expected = importer.transform_source().unwrap().ports;
        assert_eq!(extracted.len(), expected.len());
        for (got, want) in extracted.iter().zip(&expected) {
            assert_eq!(got.unlocode, want.unlocode);
            assert_eq!(got.name, want.name);
            assert_eq!(got.country_code, want.country_code);
            assert_eq!(got.latitude, want.latitude);
            assert_eq!(got.longitude, want.longitude);
        }
    }

    #[test]
    fn test_export_csv() {
        let dir = tempfile::tempdir().unwrap();
        let importer = importer_in(dir.path(), "ports.csv");

        importer.export_csv().unwrap();

        let ports = ports::artifact::read_ports_csv(dir.path().join("ports.csv")).unwrap();
        let codes: Vec<_> = ports.iter().map(|p| p.unlocode.as_str()).collect();
        assert_eq!(codes, vec!["USNYC", "IEOBP"]);
        assert_eq!(ports[0].subdivision.as_deref(), Some("NY"));
        assert_eq!(ports[1].iata_code, None);
    }

    #[tokio::test]
    async fn test_load_into_store() {
        let dir = tempfile::tempdir().unwrap();
        let importer = importer_in(dir.path(), "ports.sql");
        let store = SqliteStore::connect(&importer.config().store.database_url)
            .await
            .unwrap();

        let ports = importer.transform_source().unwrap().ports;
        let written = importer.load(&store, &ports).await.unwrap();
        assert_eq!(written, 2);

        // Second run over the same input changes nothing
        importer.load(&store, &ports).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);

        let stored = store.get("IEOBP").await.unwrap().unwrap();
        assert_eq!(stored.name, "O'Brien's Port");
        assert_eq!(stored.subdivision.as_deref(), Some("D"));
    }
}
