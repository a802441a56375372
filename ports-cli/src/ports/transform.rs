//! Sea port filter and record normalization
//!
//! The pipeline is: keep sea ports, derive the UN/LOCODE, parse the
//! coordinates, then collapse repeated keys. Rows that fall out at any step
//! are counted in [`TransformSummary`] rather than reported as errors.

use std::collections::HashSet;

use super::types::{
    DropReason, PortRecord, RawPortRecord, TransformSummary, UNLOCODE_LEN, coordinates_in_range,
};

/// Function classifier digit marking a maritime port
const SEA_PORT_FUNCTION: char = '1';

/// Records produced by [`transform`] together with the drop tallies
#[derive(Debug, Clone, Default)]
pub struct TransformOutput {
    pub ports: Vec<PortRecord>,
    pub summary: TransformSummary,
}

/// Whether a function classifier marks a sea port
///
/// Substring test: "1234", "4321" and "1-3-----" all qualify.
pub fn is_sea_port(function: Option<&str>) -> bool {
    function.is_some_and(|f| f.contains(SEA_PORT_FUNCTION))
}

/// Keep only rows whose function classifier contains a `1`
///
/// Lazy and order-preserving.
pub fn filter_sea_ports<I>(rows: I) -> impl Iterator<Item = RawPortRecord>
where
    I: IntoIterator<Item = RawPortRecord>,
{
    rows.into_iter().filter(|row| is_sea_port(row.function.as_deref()))
}

/// Build the UN/LOCODE from country and location codes
///
/// No case normalization: mixed-case input gives a mixed-case code.
pub fn derive_unlocode(country: &str, location: &str) -> String {
    format!("{}{}", country, location)
}

/// Parse one coordinate cell
///
/// Surrounding whitespace is allowed. Blank, non-numeric, NaN and infinite
/// values all count as missing.
fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse and range-check the latitude/longitude of a row
pub fn normalize_coordinates(row: &RawPortRecord) -> Result<(f64, f64), DropReason> {
    let latitude = parse_coordinate(row.latitude_raw.as_deref());
    let longitude = parse_coordinate(row.longitude_raw.as_deref());

    let (latitude, longitude) = match (latitude, longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(DropReason::InvalidCoordinates),
    };

    if !coordinates_in_range(latitude, longitude) {
        return Err(DropReason::CoordinatesOutOfRange);
    }

    Ok((latitude, longitude))
}

/// Normalize a row that already passed the sea port filter
fn normalize_row(row: RawPortRecord) -> Result<PortRecord, DropReason> {
    if row.country.trim().is_empty() || row.location.trim().is_empty() {
        return Err(DropReason::MissingCode);
    }

    let unlocode = derive_unlocode(&row.country, &row.location);
    if unlocode.chars().count() != UNLOCODE_LEN {
        return Err(DropReason::InvalidCode);
    }

    let (latitude, longitude) = normalize_coordinates(&row)?;

    Ok(PortRecord {
        unlocode,
        name: row.name,
        country_code: row.country,
        latitude,
        longitude,
        function_code: row.function.unwrap_or_default(),
        iata_code: row.iata,
        subdivision: row.subdivision,
    })
}

/// Run the full pipeline over a sheet's rows
///
/// The first row for a given UN/LOCODE wins; later ones are counted as
/// duplicates.
pub fn transform<I>(rows: I) -> TransformOutput
where
    I: IntoIterator<Item = RawPortRecord>,
{
    let mut summary = TransformSummary::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut ports = Vec::new();

    let mut total_rows = 0usize;
    let rows = rows.into_iter().inspect(|_| total_rows += 1);

    for row in filter_sea_ports(rows) {
        summary.sea_ports += 1;

        let label = format!("{}{} ({})", row.country, row.location, row.name);
        let record = match normalize_row(row) {
            Ok(record) => record,
            Err(reason) => {
                log::debug!("Dropping {}: {}", label, reason);
                summary.record_drop(reason);
                continue;
            }
        };

        if !seen.insert(record.unlocode.clone()) {
            log::debug!("Dropping {}: {}", label, DropReason::DuplicateUnlocode);
            summary.record_drop(DropReason::DuplicateUnlocode);
            continue;
        }

        ports.push(record);
    }

    summary.total_rows = total_rows;
    summary.not_sea_port = total_rows - summary.sea_ports;
    summary.retained = ports.len();

    log::info!(
        "Transformed {} rows: {} sea ports, {} retained, {} dropped for coordinates",
        summary.total_rows,
        summary.sea_ports,
        summary.retained,
        summary.dropped_for_coordinates()
    );

    TransformOutput { ports, summary }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_with_function(function: Option<&str>) -> RawPortRecord {
        RawPortRecord {
            function: function.map(|f| f.to_string()),
            ..RawPortRecord::new("US", "NYC", "New York")
        }
    }

    #[test]
    fn test_filter_sea_ports_substring() {
        let rows = vec![
            row_with_function(Some("1234")),
            row_with_function(Some("2")),
            row_with_function(Some("31")),
            row_with_function(Some("")),
            row_with_function(None),
        ];

        let kept: Vec<_> = filter_sea_ports(rows).map(|r| r.function.unwrap()).collect();
        assert_eq!(kept, vec!["1234".to_string(), "31".to_string()]);
    }

    #[test]
    fn test_filter_sea_ports_keeps_order() {
        let rows = vec![
            RawPortRecord::new("NL", "RTM", "Rotterdam").with_function("1-3-----"),
            RawPortRecord::new("FR", "PAR", "Paris").with_function("--3-----"),
            RawPortRecord::new("DE", "HAM", "Hamburg").with_function("4321"),
        ];

        let names: Vec<_> = filter_sea_ports(rows).map(|r| r.name).collect();
        assert_eq!(names, vec!["Rotterdam", "Hamburg"]);
    }

    #[test]
    fn test_derive_unlocode() {
        assert_eq!(derive_unlocode("US", "NYC"), "USNYC");
        // Case is inherited, not normalized
        assert_eq!(derive_unlocode("us", "Nyc"), "usNyc");
    }

    #[test]
    fn test_normalize_coordinates_valid() {
        let row = RawPortRecord::new("US", "NYC", "New York").with_coordinates("40.71", "-74.00");
        assert_eq!(normalize_coordinates(&row), Ok((40.71, -74.0)));

        let row = RawPortRecord::new("US", "NYC", "New York").with_coordinates(" 40.71 ", "\t-74\n");
        assert_eq!(normalize_coordinates(&row), Ok((40.71, -74.0)));
    }

    #[test]
    fn test_normalize_coordinates_invalid() {
        let row = RawPortRecord::new("US", "NYC", "New York").with_coordinates("40.71", "abc");
        assert_eq!(normalize_coordinates(&row), Err(DropReason::InvalidCoordinates));

        let row = RawPortRecord::new("US", "NYC", "New York").with_coordinates("", "-74.00");
        assert_eq!(normalize_coordinates(&row), Err(DropReason::InvalidCoordinates));

        let row = RawPortRecord::new("US", "NYC", "New York").with_coordinates("NaN", "-74.00");
        assert_eq!(normalize_coordinates(&row), Err(DropReason::InvalidCoordinates));

        let row = RawPortRecord::new("US", "NYC", "New York");
        assert_eq!(normalize_coordinates(&row), Err(DropReason::InvalidCoordinates));
    }

    #[test]
    fn test_normalize_coordinates_out_of_range() {
        let row = RawPortRecord::new("US", "NYC", "New York").with_coordinates("95.0", "10.0");
        assert_eq!(normalize_coordinates(&row), Err(DropReason::CoordinatesOutOfRange));
    }

    #[test]
    fn test_transform_end_to_end() {
        let rows = vec![
            RawPortRecord::new("US", "NYC", "New York")
                .with_function("1234")
                .with_coordinates("40.71", "-74.00"),
            RawPortRecord::new("FR", "PAR", "Paris")
                .with_function("2")
                .with_coordinates("48.85", "2.35"),
        ];

        let output = transform(rows);
        assert_eq!(output.ports.len(), 1);

        let port = &output.ports[0];
        assert_eq!(port.unlocode, "USNYC");
        assert_eq!(port.country_code, "US");
        assert_eq!(port.latitude, 40.71);
        assert_eq!(port.longitude, -74.0);
        assert_eq!(port.function_code, "1234");
        assert_eq!(port.iata_code, None);

        assert_eq!(output.summary.total_rows, 2);
        assert_eq!(output.summary.not_sea_port, 1);
        assert_eq!(output.summary.retained, 1);
    }

    #[test]
    fn test_transform_counts_drops() {
        let rows = vec![
            RawPortRecord::new("US", "NYC", "New York")
                .with_function("1")
                .with_coordinates("40.71", "abc"),
            RawPortRecord::new("", "XXX", "Nowhere")
                .with_function("1")
                .with_coordinates("1", "1"),
            RawPortRecord::new("NL", "RTM", "Rotterdam")
                .with_function("1")
                .with_coordinates("51.9", "4.4"),
            RawPortRecord::new("NL", "RTM", "Rotterdam Europoort")
                .with_function("1")
                .with_coordinates("51.95", "4.1"),
            RawPortRecord::new("AQ", "XXX", "Off the map")
                .with_function("1")
                .with_coordinates("-91", "0"),
        ];

        let output = transform(rows);
        let summary = &output.summary;

        assert_eq!(output.ports.len(), 1);
        assert_eq!(output.ports[0].name, "Rotterdam");
        assert_eq!(summary.sea_ports, 5);
        assert_eq!(summary.invalid_coordinates, 1);
        assert_eq!(summary.missing_code, 1);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.out_of_range, 1);
        assert_eq!(summary.dropped(), 4);
        assert_eq!(summary.dropped_for_coordinates(), 2);
    }

    #[test]
    fn test_transform_drops_wrong_length_codes() {
        let rows = vec![
            RawPortRecord::new("US", "NY", "Short")
                .with_function("1")
                .with_coordinates("40.7", "-74.0"),
            RawPortRecord::new("USA", "NYC", "Long")
                .with_function("1")
                .with_coordinates("40.7", "-74.0"),
            RawPortRecord::new("us", "nyc", "Lower case")
                .with_function("1")
                .with_coordinates("40.7", "-74.0"),
        ];

        let output = transform(rows);
        let codes: Vec<_> = output.ports.iter().map(|p| p.unlocode.as_str()).collect();
        assert_eq!(codes, vec!["usnyc"]);
        assert_eq!(output.summary.invalid_code, 2);
        assert!(output.ports.iter().all(|p| p.validate().is_ok()));
    }

    #[test]
    fn test_transform_keeps_optional_fields() {
        let rows = vec![
            RawPortRecord::new("GB", "LON", "London")
                .with_function("12345---")
                .with_coordinates("51.5", "-0.12")
                .with_iata("LHR")
                .with_subdivision("LND"),
        ];

        let output = transform(rows);
        assert_eq!(output.ports[0].iata_code.as_deref(), Some("LHR"));
        assert_eq!(output.ports[0].subdivision.as_deref(), Some("LND"));
    }
}
