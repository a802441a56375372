//! Port record types

use serde::{Deserialize, Serialize};

/// Maximum absolute latitude in decimal degrees
pub const MAX_LATITUDE: f64 = 90.0;
/// Maximum absolute longitude in decimal degrees
pub const MAX_LONGITUDE: f64 = 180.0;
/// Characters in a UN/LOCODE: 2 for the country, 3 for the location
pub const UNLOCODE_LEN: usize = 5;

/// One row of the UNLOCODE sheet, as read
///
/// Text cells are kept as-is. Numeric cells are coerced to text by the
/// reader, so the coordinate fields may hold anything the sheet contained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPortRecord {
    /// 2-letter country code
    pub country: String,
    /// 3-letter location code
    pub location: String,
    pub name: String,
    /// Function classifier digits (e.g. "1234" or "1-3-----")
    pub function: Option<String>,
    pub latitude_raw: Option<String>,
    pub longitude_raw: Option<String>,
    pub iata: Option<String>,
    pub subdivision: Option<String>,
}

impl RawPortRecord {
    /// Create a record with the key fields set and everything else absent
    pub fn new(country: &str, location: &str, name: &str) -> Self {
        Self {
            country: country.to_string(),
            location: location.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_function(mut self, function: &str) -> Self {
        self.function = Some(function.to_string());
        self
    }

    pub fn with_coordinates(mut self, latitude: &str, longitude: &str) -> Self {
        self.latitude_raw = Some(latitude.to_string());
        self.longitude_raw = Some(longitude.to_string());
        self
    }

    pub fn with_iata(mut self, iata: &str) -> Self {
        self.iata = Some(iata.to_string());
        self
    }

    pub fn with_subdivision(mut self, subdivision: &str) -> Self {
        self.subdivision = Some(subdivision.to_string());
        self
    }
}

/// A validated sea port, ready for SQL emission or bulk load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortRecord {
    /// Country code + location code, the natural unique key
    pub unlocode: String,
    pub name: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Original function classifier string
    pub function_code: String,
    pub iata_code: Option<String>,
    pub subdivision: Option<String>,
}

impl PortRecord {
    /// Check the invariants a record must hold once it leaves the transform
    ///
    /// Used when records come back from an artifact rather than from the
    /// pipeline itself.
    pub fn validate(&self) -> Result<(), String> {
        if self.unlocode.chars().count() != UNLOCODE_LEN {
            return Err(format!(
                "unlocode '{}' must be exactly {} characters",
                self.unlocode, UNLOCODE_LEN
            ));
        }
        if !self.unlocode.starts_with(&self.country_code) {
            return Err(format!(
                "unlocode '{}' does not start with country code '{}'",
                self.unlocode, self.country_code
            ));
        }
        if !coordinates_in_range(self.latitude, self.longitude) {
            return Err(format!(
                "coordinates ({}, {}) are out of range",
                self.latitude, self.longitude
            ));
        }
        Ok(())
    }
}

/// Whether a coordinate pair lies on the globe
pub fn coordinates_in_range(latitude: f64, longitude: f64) -> bool {
    latitude.abs() <= MAX_LATITUDE && longitude.abs() <= MAX_LONGITUDE
}

/// Why a raw row did not become a [`PortRecord`]
///
/// Dropping a row is not a failure: the pipeline keeps going and the reason
/// is tallied in [`TransformSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Function classifier absent or without a `1`
    NotSeaPort,
    /// Country or location code is blank
    MissingCode,
    /// Country + location does not make a 5-character UN/LOCODE
    InvalidCode,
    /// Latitude or longitude is missing or not numeric
    InvalidCoordinates,
    /// Latitude outside -90..90 or longitude outside -180..180
    CoordinatesOutOfRange,
    /// An earlier row already produced the same UN/LOCODE
    DuplicateUnlocode,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::NotSeaPort => write!(f, "not a sea port"),
            DropReason::MissingCode => write!(f, "missing country or location code"),
            DropReason::InvalidCode => write!(f, "UN/LOCODE is not 5 characters"),
            DropReason::InvalidCoordinates => write!(f, "missing or non-numeric coordinates"),
            DropReason::CoordinatesOutOfRange => write!(f, "coordinates out of range"),
            DropReason::DuplicateUnlocode => write!(f, "duplicate UN/LOCODE"),
        }
    }
}

impl std::error::Error for DropReason {}

/// Counts gathered while transforming a sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformSummary {
    /// Rows handed to the transform
    pub total_rows: usize,
    /// Rows that passed the sea port filter
    pub sea_ports: usize,
    /// Records emitted
    pub retained: usize,
    pub not_sea_port: usize,
    pub missing_code: usize,
    pub invalid_code: usize,
    pub invalid_coordinates: usize,
    pub out_of_range: usize,
    pub duplicates: usize,
}

impl TransformSummary {
    /// Tally one dropped row
    pub fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::NotSeaPort => self.not_sea_port += 1,
            DropReason::MissingCode => self.missing_code += 1,
            DropReason::InvalidCode => self.invalid_code += 1,
            DropReason::InvalidCoordinates => self.invalid_coordinates += 1,
            DropReason::CoordinatesOutOfRange => self.out_of_range += 1,
            DropReason::DuplicateUnlocode => self.duplicates += 1,
        }
    }

    /// Total rows dropped for any reason
    pub fn dropped(&self) -> usize {
        self.not_sea_port
            + self.missing_code
            + self.invalid_code
            + self.invalid_coordinates
            + self.out_of_range
            + self.duplicates
    }

    /// Sea ports dropped for coordinate problems
    pub fn dropped_for_coordinates(&self) -> usize {
        self.invalid_coordinates + self.out_of_range
    }
}
