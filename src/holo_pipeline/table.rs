//! Cast table module
//!
//! In-memory cast tables and their persisted CSV form.

mod writer;
mod csv_writer;
mod reader;
pub mod types;

#[cfg(test)]
mod tests;

pub use writer::{TableWriter, create_table_file};
pub use csv_writer::CsvTableWriter;
pub use reader::{read_cast_table, read_cast_table_from};
pub use types::{CastTable, SegmentedCast, SegmentedRow};
