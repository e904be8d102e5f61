use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::holo_pipeline::common::error::{HoloError, Result};
use crate::holo_pipeline::table::{CsvTableWriter, SegmentedCast, TableWriter, create_table_file};

/// Outcome of persisting a filtered cast.
#[derive(Debug, Clone)]
pub struct FilterReport {
    pub path: PathBuf,
    pub rows: usize,
    pub cast: SegmentedCast,
}

/// Keeps downcast and upcast rows whose smoothed depth is at least the
/// minimum depth, i.e. at or deeper than it.
pub struct CastFilter<W: TableWriter> {
    writer: W,
    min_depth: f64,
}

impl CastFilter<CsvTableWriter> {
    pub fn new(min_depth: f64) -> Result<Self> {
        Self::with_custom(CsvTableWriter, min_depth)
    }
}

impl<W: TableWriter> CastFilter<W> {
    pub fn with_custom(writer: W, min_depth: f64) -> Result<Self> {
        if !min_depth.is_finite() {
            return Err(HoloError::InvalidParameter(format!(
                "minimum depth must be finite, got {}",
                min_depth
            )));
        }
        Ok(Self { writer, min_depth })
    }

    pub fn min_depth(&self) -> f64 {
        self.min_depth
    }

    /// Retained rows in their original order. Rows with an undefined
    /// smoothed depth are dropped.
    pub fn retain(&self, cast: &SegmentedCast) -> SegmentedCast {
        cast.retain(|row| {
            row.phase.is_usable() && row.smoothed_depth.is_some_and(|depth| depth >= self.min_depth)
        })
    }

    pub fn filter(&self, cast: &SegmentedCast, output: &mut dyn Write) -> Result<SegmentedCast> {
        let retained = self.retain(cast);
        self.writer.write_segmented(&retained, output)?;
        Ok(retained)
    }

    /// Filters `cast` and writes the retained rows to `path`, replacing any
    /// existing file.
    #[instrument(skip_all, fields(rows = cast.len(), path = %path.display()))]
    pub fn filter_to_file(&self, cast: &SegmentedCast, path: &Path) -> Result<FilterReport> {
        let mut file = create_table_file(path)?;
        let retained = self.filter(cast, &mut file)?;

        info!(
            retained = retained.len(),
            dropped = cast.len() - retained.len(),
            min_depth = self.min_depth,
            "Filtered cast saved"
        );
        Ok(FilterReport {
            path: path.to_path_buf(),
            rows: retained.len(),
            cast: retained,
        })
    }
}
