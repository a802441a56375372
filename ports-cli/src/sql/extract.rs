//! Best-effort re-extraction of port tuples from generated INSERT statements
//!
//! This is not a SQL parser. It looks for `INSERT INTO ports (...) VALUES (`
//! and splits the tuple on commas that sit outside single-quoted literals.
//! Anything that does not fit the shape is skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::escape::unescape_sql_text;

static INSERT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)INSERT\s+INTO\s+ports\s*\([^)]*\)\s*VALUES\s*\(")
        .expect("insert prefix pattern is valid")
});

/// Leading five values of an extracted INSERT
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedPort {
    pub unlocode: String,
    pub name: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Split a VALUES tuple body up to its closing parenthesis
///
/// `input` starts just after the opening `(`. Returns the raw trimmed fields
/// and the byte length consumed including the `)`, or `None` if the tuple
/// never closes. A doubled `''` inside a literal does not end it.
fn split_tuple(input: &str) -> Option<(Vec<String>, usize)> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = input.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '\'' if in_quotes => {
                if matches!(chars.peek(), Some((_, '\''))) {
                    chars.next();
                    current.push_str("''");
                } else {
                    in_quotes = false;
                    current.push('\'');
                }
            }
            '\'' => {
                in_quotes = true;
                current.push('\'');
            }
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            ')' if !in_quotes => {
                fields.push(current.trim().to_string());
                return Some((fields, pos + 1));
            }
            _ => current.push(ch),
        }
    }

    None
}

/// Contents of a `'...'` literal with quotes unescaped
fn text_value(field: &str) -> Option<String> {
    let inner = field.strip_prefix('\'')?.strip_suffix('\'')?;
    Some(unescape_sql_text(inner))
}

fn numeric_value(field: &str) -> Option<f64> {
    field.parse::<f64>().ok()
}

fn to_port(fields: &[String]) -> Option<ExtractedPort> {
    if fields.len() < 5 {
        return None;
    }

    Some(ExtractedPort {
        unlocode: text_value(&fields[0])?,
        name: text_value(&fields[1])?,
        country_code: text_value(&fields[2])?,
        latitude: numeric_value(&fields[3])?,
        longitude: numeric_value(&fields[4])?,
    })
}

/// Pull `(unlocode, name, country_code, latitude, longitude)` out of every
/// well-formed ports INSERT in `sql`
///
/// Trailing values are ignored and coordinates are not range-checked.
pub fn extract_insert_statements(sql: &str) -> Vec<ExtractedPort> {
    let mut ports = Vec::new();
    let mut pos = 0;

    while let Some(m) = INSERT_PREFIX.find_at(sql, pos) {
        let Some((fields, consumed)) = split_tuple(&sql[m.end()..]) else {
            log::debug!("Unterminated VALUES tuple at byte {}", m.start());
            break;
        };
        pos = m.end() + consumed;

        match to_port(&fields) {
            Some(port) => ports.push(port),
            None => log::debug!("Skipping malformed INSERT at byte {}", m.start()),
        }
    }

    ports
}
