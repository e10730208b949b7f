//! Lootforge Export - the serialization boundary
//!
//! Turns core data into interchange formats and back:
//! - JSON table projection with placeholder omission, hidden-field
//!   stripping, and optional reference inlining (`export_table`)
//! - Whole-design state blobs (`save_design`, `load_design`)

mod error;
mod json;
mod state;

pub use error::{Error, Result};
pub use json::{export_table, export_table_string, ExportOptions};
pub use state::{load_design, load_design_file, save_design, save_design_file};
