//! Excel import of the UN/LOCODE code list

mod reader;

pub use reader::{headers, list_sheets, read_ports_excel};
