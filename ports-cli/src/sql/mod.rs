//! SQL text generation and re-extraction for the ports table

pub mod escape;
pub mod extract;
pub mod insert;
pub mod schema;

pub use escape::{escape_sql_text, quote_literal, quote_optional, unescape_sql_text};
pub use extract::{ExtractedPort, extract_insert_statements};
pub use insert::{emit_insert_statement, emit_insert_statements, write_script};
pub use schema::{Dialect, create_table_script, ensure_table_statements};

/// Name of the generated table
pub const TABLE_NAME: &str = "ports";

/// Data columns written by inserts, in statement order
pub const DATA_COLUMNS: [&str; 8] = [
    "unlocode",
    "name",
    "country_code",
    "latitude",
    "longitude",
    "function_code",
    "iata_code",
    "subdivision",
];

/// Columns overwritten when an upsert hits an existing UN/LOCODE
///
/// `country_code`, `iata_code`, `subdivision` and `created_at` keep the
/// values from the first insert.
pub const UPSERT_UPDATE_COLUMNS: [&str; 4] = ["name", "latitude", "longitude", "function_code"];
