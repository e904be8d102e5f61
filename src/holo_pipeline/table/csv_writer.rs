use std::io::Write;

use tracing::debug;

use crate::holo_pipeline::common::error::Result;
use crate::holo_pipeline::metadata::MetadataRecord;
use crate::holo_pipeline::table::types::{CastTable, SegmentedCast};
use crate::holo_pipeline::table::writer::TableWriter;

/// Writes tables as comma-separated values with a header row. Undefined
/// values are written as empty cells.
pub struct CsvTableWriter;

impl TableWriter for CsvTableWriter {
    fn write_metadata(&self, table: &CastTable, output: &mut dyn Write) -> Result<()> {
        debug!("Writing metadata table: {} rows", table.len());

        let mut writer = csv::Writer::from_writer(output);
        writer.write_record(MetadataRecord::columns())?;
        for record in table.records() {
            writer.write_record(record.cells())?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_segmented(&self, cast: &SegmentedCast, output: &mut dyn Write) -> Result<()> {
        debug!("Writing segmented table: {} rows", cast.len());

        let mut writer = csv::Writer::from_writer(output);
        writer.write_record(SegmentedCast::columns())?;
        for row in cast.rows() {
            let mut cells = row.record.cells();
            cells.push(row.smoothed_depth.map(|d| d.to_string()).unwrap_or_default());
            cells.push(row.phase.to_string());
            writer.write_record(cells)?;
        }
        writer.flush()?;
        Ok(())
    }
}
