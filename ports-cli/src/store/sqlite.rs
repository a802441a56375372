//! SQLite-backed port store

use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool, Transaction};

use super::{PortStore, StoredPort};
use crate::ports::PortRecord;
use crate::sql::{DATA_COLUMNS, Dialect, TABLE_NAME, UPSERT_UPDATE_COLUMNS};

/// Rows per INSERT; 8 binds each keeps well under SQLite's variable limit
const UPSERT_CHUNK_ROWS: usize = 100;

const SELECT_COLUMNS: &str = "id, unlocode, name, country_code, \
    CAST(latitude AS REAL) AS latitude, CAST(longitude AS REAL) AS longitude, \
    function_code, iata_code, subdivision, created_at, updated_at";

/// Port store over a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `database_url`
    ///
    /// A single pooled connection is kept so `sqlite::memory:` databases
    /// survive for the life of the store.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;

        log::debug!("Connected to {}", database_url);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn upsert_clause() -> String {
    let updates: Vec<String> = UPSERT_UPDATE_COLUMNS
        .iter()
        .map(|col| format!("{col} = excluded.{col}"))
        .collect();

    format!(
        " ON CONFLICT(unlocode) DO UPDATE SET {}, updated_at = CURRENT_TIMESTAMP",
        updates.join(", ")
    )
}

/// Delete all rows and restart the id sequence
async fn clear_table(tx: &mut Transaction<'_, Sqlite>) -> Result<u64> {
    let result = sqlx::query(&format!("DELETE FROM {}", TABLE_NAME))
        .execute(&mut **tx)
        .await
        .context("Failed to clear ports table")?;

    // Only exists once some table in the database uses AUTOINCREMENT
    let (has_sequence,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'sqlite_sequence')",
    )
    .fetch_one(&mut **tx)
    .await
    .context("Failed to look up sqlite_sequence")?;

    if has_sequence {
        sqlx::query("DELETE FROM sqlite_sequence WHERE name = ?")
            .bind(TABLE_NAME)
            .execute(&mut **tx)
            .await
            .context("Failed to reset ports id sequence")?;
    }

    Ok(result.rows_affected())
}

async fn bulk_upsert(tx: &mut Transaction<'_, Sqlite>, ports: &[PortRecord]) -> Result<u64> {
    let mut written = 0;

    for chunk in ports.chunks(UPSERT_CHUNK_ROWS) {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "INSERT INTO {} ({}) ",
            TABLE_NAME,
            DATA_COLUMNS.join(", ")
        ));

        builder.push_values(chunk, |mut row, port| {
            row.push_bind(port.unlocode.as_str())
                .push_bind(port.name.as_str())
                .push_bind(port.country_code.as_str())
                .push_bind(port.latitude)
                .push_bind(port.longitude)
                .push_bind(port.function_code.as_str())
                .push_bind(port.iata_code.as_deref())
                .push_bind(port.subdivision.as_deref());
        });
        builder.push(upsert_clause());

        let result = builder
            .build()
            .execute(&mut **tx)
            .await
            .with_context(|| {
                format!(
                    "Failed to upsert ports {}..{}",
                    chunk[0].unlocode,
                    chunk[chunk.len() - 1].unlocode
                )
            })?;
        written += result.rows_affected();
    }

    Ok(written)
}

fn row_to_stored(row: &SqliteRow) -> Result<StoredPort> {
    Ok(StoredPort {
        id: row.try_get("id")?,
        unlocode: row.try_get("unlocode")?,
        name: row.try_get("name")?,
        country_code: row.try_get("country_code")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        function_code: row.try_get("function_code")?,
        iata_code: row.try_get("iata_code")?,
        subdivision: row.try_get("subdivision")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl PortStore for SqliteStore {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn execute_schema(&self, statements: &[String]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to start transaction")?;

        for statement in statements {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to execute schema statement: {}", statement))?;
        }

        tx.commit().await.context("Failed to commit schema")?;
        Ok(())
    }

    async fn replace_all(&self, ports: &[PortRecord]) -> Result<u64> {
        let mut tx = self.pool.begin().await.context("Failed to start transaction")?;

        let cleared = clear_table(&mut tx).await?;
        log::debug!("Cleared {} existing ports", cleared);

        let written = bulk_upsert(&mut tx, ports).await?;

        tx.commit().await.context("Failed to commit import")?;
        Ok(written)
    }

    async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", TABLE_NAME))
            .fetch_one(&self.pool)
            .await
            .context("Failed to count ports")?;
        Ok(count)
    }

    async fn sample(&self, limit: i64) -> Result<Vec<StoredPort>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM {} ORDER BY id LIMIT ?",
            SELECT_COLUMNS, TABLE_NAME
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to read sample ports")?;

        rows.iter().map(row_to_stored).collect()
    }

    async fn get(&self, unlocode: &str) -> Result<Option<StoredPort>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM {} WHERE unlocode = ?",
            SELECT_COLUMNS, TABLE_NAME
        ))
        .bind(unlocode)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to get port {}", unlocode))?;

        row.as_ref().map(row_to_stored).transpose()
    }
}
