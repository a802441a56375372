//! Import UN/LOCODE sea ports into a `ports` table
//!
//! Reads the UNLOCODE sheet of the code list workbook, keeps locations whose
//! function classifier marks them as sea ports, and either generates a SQL
//! script, writes a CSV artifact, or loads the rows straight into a store.

pub mod cli;
pub mod config;
pub mod importer;
pub mod ports;
pub mod sheet;
pub mod sql;
pub mod store;

pub use config::Config;
pub use importer::PortImporter;
