use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::holo_pipeline::common::error::{HoloError, Result};
use crate::holo_pipeline::table::types::{CastTable, SegmentedCast};

pub trait TableWriter {
    fn write_metadata(&self, table: &CastTable, output: &mut dyn Write) -> Result<()>;
    fn write_segmented(&self, cast: &SegmentedCast, output: &mut dyn Write) -> Result<()>;
}

/// Creates (or truncates) a table file, creating missing parent directories.
pub fn create_table_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| HoloError::OutputWriteError(format!("{}: {}", parent.display(), e)))?;
    }
    File::create(path).map_err(|e| HoloError::OutputWriteError(format!("{}: {}", path.display(), e)))
}
