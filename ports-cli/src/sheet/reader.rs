//! Read raw port rows from a UN/LOCODE workbook
//!
//! Columns are located by header text on the first row, so extra or
//! reordered columns are fine. `IATA` and `Subdivision` may be missing
//! entirely; the other six columns are required.

use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, Xlsx, open_workbook};

use crate::ports::RawPortRecord;

/// Header names as they appear in the UN/LOCODE export
pub mod headers {
    pub const COUNTRY: &str = "Country";
    pub const LOCATION: &str = "Location";
    pub const NAME: &str = "Name";
    pub const FUNCTION: &str = "Function";
    pub const LATITUDE: &str = "Lat in Decimal Degrees";
    pub const LONGITUDE: &str = "Long in Decimal Degrees";
    pub const IATA: &str = "IATA";
    pub const SUBDIVISION: &str = "Subdivision";
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, PartialEq)]
struct ColumnMap {
    country: usize,
    location: usize,
    name: usize,
    function: usize,
    latitude: usize,
    longitude: usize,
    iata: Option<usize>,
    subdivision: Option<usize>,
}

impl ColumnMap {
    fn from_headers(header_row: &[String]) -> Result<Self> {
        let find = |name: &str| {
            header_row
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).with_context(|| format!("Required column '{}' not found in header row", name))
        };

        Ok(Self {
            country: require(headers::COUNTRY)?,
            location: require(headers::LOCATION)?,
            name: require(headers::NAME)?,
            function: require(headers::FUNCTION)?,
            latitude: require(headers::LATITUDE)?,
            longitude: require(headers::LONGITUDE)?,
            iata: find(headers::IATA),
            subdivision: find(headers::SUBDIVISION),
        })
    }
}

/// Cell as text; empty strings, blanks and error cells are absent
///
/// String cells are returned unchanged, surrounding whitespace included.
fn get_cell_string(row: &[Data], col: usize) -> Option<String> {
    let value = match row.get(col)? {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Whole numbers lose the trailing ".0"
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::DateTime(dt) => dt.to_string(),
        Data::Error(_) | Data::Empty => return None,
    };

    if value.is_empty() { None } else { Some(value) }
}

/// Code cell with surrounding whitespace removed
fn get_cell_code(row: &[Data], col: usize) -> Option<String> {
    get_cell_string(row, col)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn to_raw_record(row: &[Data], cols: &ColumnMap) -> RawPortRecord {
    let optional = |col: Option<usize>| col.and_then(|c| get_cell_code(row, c));

    RawPortRecord {
        country: get_cell_code(row, cols.country).unwrap_or_default(),
        location: get_cell_code(row, cols.location).unwrap_or_default(),
        name: get_cell_string(row, cols.name).unwrap_or_default(),
        function: get_cell_code(row, cols.function),
        latitude_raw: get_cell_code(row, cols.latitude),
        longitude_raw: get_cell_code(row, cols.longitude),
        iata: optional(cols.iata),
        subdivision: optional(cols.subdivision),
    }
}

/// Names of the sheets in a workbook
pub fn list_sheets<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;
    Ok(workbook.sheet_names().to_vec())
}

/// Read every data row of `sheet_name` as a [`RawPortRecord`]
///
/// Rows where every cell is blank are skipped.
pub fn read_ports_excel<P: AsRef<Path>>(path: P, sheet_name: &str) -> Result<Vec<RawPortRecord>> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    if !sheet_names.iter().any(|s| s == sheet_name) {
        bail!(
            "Sheet '{}' not found in {} (available: {})",
            sheet_name,
            path.display(),
            sheet_names.join(", ")
        );
    }

    let range = workbook
        .worksheet_range(sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    let mut rows = range.rows();
    let header_row: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(|c| c.to_string()).collect(),
        None => bail!("Sheet '{}' is empty", sheet_name),
    };
    let cols = ColumnMap::from_headers(&header_row)
        .with_context(|| format!("Sheet '{}' has an unexpected layout", sheet_name))?;

    let records: Vec<RawPortRecord> = rows
        .filter(|row| row.iter().any(|c| !c.to_string().trim().is_empty()))
        .map(|row| to_raw_record(row, &cols))
        .collect();

    log::info!(
        "Read {} rows from sheet '{}' of {}",
        records.len(),
        sheet_name,
        path.display()
    );
    Ok(records)
}
