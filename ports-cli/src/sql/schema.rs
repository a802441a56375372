//! Ports table schema

use clap::ValueEnum;

use super::TABLE_NAME;

/// SQL flavour a script or store speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Dialect {
    /// PostgreSQL (`SERIAL` ids, `DROP ... CASCADE`)
    #[default]
    Postgres,
    /// SQLite (`INTEGER PRIMARY KEY AUTOINCREMENT` ids)
    Sqlite,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Secondary indexes: (name, column list)
const INDEXES: [(&str, &str); 4] = [
    ("idx_ports_unlocode", "unlocode"),
    ("idx_ports_name", "name"),
    ("idx_ports_country", "country_code"),
    ("idx_ports_location", "latitude, longitude"),
];

fn id_column(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Postgres => "id SERIAL PRIMARY KEY",
        Dialect::Sqlite => "id INTEGER PRIMARY KEY AUTOINCREMENT",
    }
}

fn create_table(dialect: Dialect, if_not_exists: bool) -> String {
    format!(
        "CREATE TABLE {}{} (
    {},
    unlocode VARCHAR(5) UNIQUE NOT NULL,
    name VARCHAR(255) NOT NULL,
    country_code VARCHAR(2) NOT NULL,
    latitude DECIMAL(10, 8),
    longitude DECIMAL(11, 8),
    function_code VARCHAR(10),
    iata_code VARCHAR(3),
    subdivision VARCHAR(10),
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);",
        if if_not_exists { "IF NOT EXISTS " } else { "" },
        TABLE_NAME,
        id_column(dialect)
    )
}

fn create_indexes(if_not_exists: bool) -> Vec<String> {
    INDEXES
        .iter()
        .map(|(name, columns)| {
            format!(
                "CREATE INDEX {}{} ON {}({});",
                if if_not_exists { "IF NOT EXISTS " } else { "" },
                name,
                TABLE_NAME,
                columns
            )
        })
        .collect()
}

/// Drop-and-recreate block that opens a generated script
///
/// Depends only on the dialect, never on the data.
pub fn create_table_script(dialect: Dialect) -> String {
    let drop = match dialect {
        Dialect::Postgres => format!("DROP TABLE IF EXISTS {} CASCADE;", TABLE_NAME),
        Dialect::Sqlite => format!("DROP TABLE IF EXISTS {};", TABLE_NAME),
    };

    let mut script = String::new();
    script.push_str("-- Create ports table\n");
    script.push_str(&drop);
    script.push_str("\n\n");
    script.push_str(&create_table(dialect, false));
    script.push_str("\n\n");
    for index in create_indexes(false) {
        script.push_str(&index);
        script.push('\n');
    }
    script
}

/// Create-if-missing statements for a live store, one per element
///
/// Safe to run on every load; existing rows are left alone.
pub fn ensure_table_statements(dialect: Dialect) -> Vec<String> {
    let mut statements = vec![create_table(dialect, true)];
    statements.extend(create_indexes(true));
    statements
}
