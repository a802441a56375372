//! Port records and the sea port transform pipeline
//!
//! Raw rows come from the UNLOCODE sheet, are filtered to sea ports and
//! normalized into [`PortRecord`]s keyed by UN/LOCODE.

pub mod artifact;
pub mod transform;
pub mod types;

pub use transform::{
    TransformOutput, derive_unlocode, filter_sea_ports, is_sea_port, normalize_coordinates,
    transform,
};
pub use types::{DropReason, PortRecord, RawPortRecord, TransformSummary};
