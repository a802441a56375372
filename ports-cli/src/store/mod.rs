//! Persistent store for imported ports
//!
//! The direct-load variant writes through [`PortStore`]. Clearing the table
//! and inserting the new rows always happen in one transaction, so a failed
//! import leaves the previous contents in place.

pub mod sqlite;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::ports::PortRecord;
use crate::sql::{Dialect, ensure_table_statements};

pub use sqlite::SqliteStore;

/// A row of the ports table as stored
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPort {
    pub id: i64,
    pub unlocode: String,
    pub name: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub function_code: Option<String>,
    pub iata_code: Option<String>,
    pub subdivision: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl StoredPort {
    /// The data columns as a [`PortRecord`]
    pub fn to_record(&self) -> PortRecord {
        PortRecord {
            unlocode: self.unlocode.clone(),
            name: self.name.clone(),
            country_code: self.country_code.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            function_code: self.function_code.clone().unwrap_or_default(),
            iata_code: self.iata_code.clone(),
            subdivision: self.subdivision.clone(),
        }
    }
}

/// Relational store holding the ports table
#[async_trait]
pub trait PortStore: Send + Sync {
    /// SQL flavour used for schema statements
    fn dialect(&self) -> Dialect;

    /// Run schema statements in order
    async fn execute_schema(&self, statements: &[String]) -> Result<()>;

    /// Clear the table and bulk upsert `ports` in a single transaction
    ///
    /// Returns the number of rows written.
    async fn replace_all(&self, ports: &[PortRecord]) -> Result<u64>;

    async fn count(&self) -> Result<i64>;

    /// First `limit` rows by id
    async fn sample(&self, limit: i64) -> Result<Vec<StoredPort>>;

    async fn get(&self, unlocode: &str) -> Result<Option<StoredPort>>;
}

/// Create the ports table and its indexes if they are missing
pub async fn prepare(store: &dyn PortStore) -> Result<()> {
    store
        .execute_schema(&ensure_table_statements(store.dialect()))
        .await
        .context("Failed to create ports table")?;
    log::info!("Ports table ready");
    Ok(())
}

/// Replace the stored ports with `ports`, keyed on UN/LOCODE
///
/// Re-running with the same input leaves the table in the same state.
pub async fn upsert(store: &dyn PortStore, ports: &[PortRecord]) -> Result<u64> {
    log::info!("Importing {} ports", ports.len());
    let written = store
        .replace_all(ports)
        .await
        .context("Failed to import ports")?;
    log::info!("Imported {} ports", written);
    Ok(written)
}
