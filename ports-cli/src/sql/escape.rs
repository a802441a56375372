//! SQL string literal escaping

/// Double every single quote so the text can sit inside a `'...'` literal
pub fn escape_sql_text(s: &str) -> String {
    s.replace('\'', "''")
}

/// Reverse of [`escape_sql_text`]
pub fn unescape_sql_text(s: &str) -> String {
    s.replace("''", "'")
}

/// Escape and wrap in single quotes
pub fn quote_literal(s: &str) -> String {
    format!("'{}'", escape_sql_text(s))
}

/// Quoted literal for a present value, bare `NULL` for an absent one
pub fn quote_optional(value: Option<&str>) -> String {
    match value {
        Some(s) => quote_literal(s),
        None => "NULL".to_string(),
    }
}
