use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::holo_pipeline::collector::types::{BatchOutcome, CollectReport, CollectorConfig, DecodeFailure};
use crate::holo_pipeline::common::error::{HoloError, Result};
use crate::holo_pipeline::metadata::{FrameDecoder, LisstFrameDecoder, MetadataRecord, read_text_echo};
use crate::holo_pipeline::table::{CastTable, CsvTableWriter, TableWriter, create_table_file};

pub struct MetadataCollector<D: FrameDecoder, W: TableWriter> {
    decoder: D,
    writer: W,
    config: CollectorConfig,
}

impl MetadataCollector<LisstFrameDecoder, CsvTableWriter> {
    pub fn new(config: CollectorConfig) -> Self {
        Self {
            decoder: LisstFrameDecoder::new(config.geometry),
            writer: CsvTableWriter,
            config,
        }
    }
}

impl<D: FrameDecoder + Sync, W: TableWriter> MetadataCollector<D, W> {
    pub fn with_custom(decoder: D, writer: W, config: CollectorConfig) -> Self {
        Self {
            decoder,
            writer,
            config,
        }
    }

    /// Raw frame files in `dir`, ordered by path.
    pub fn list_frames(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(HoloError::InvalidDirectory(dir.to_path_buf()));
        }

        let mut frames = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && self.config.pattern.matches(&path) {
                frames.push(path);
            }
        }
        frames.sort();

        debug!(
            count = frames.len(),
            extension = %self.config.pattern.extension,
            case_sensitive = self.config.pattern.case_sensitive,
            "Listed frame files"
        );
        Ok(frames)
    }

    /// Decodes every frame in `dir`. Files that fail to decode are logged
    /// and reported in the outcome instead of aborting the batch. A frame
    /// whose identifier was already decoded from an earlier path is reported
    /// as a failure, so the table stays keyed by identifier.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn decode_all(&self, dir: &Path) -> Result<BatchOutcome> {
        let frames = self.list_frames(dir)?;
        let decoder = &self.decoder;

        let results: Vec<(PathBuf, Result<MetadataRecord>)> = if self.config.parallel {
            frames
                .into_par_iter()
                .map(|path| {
                    let result = decoder.decode(&path);
                    (path, result)
                })
                .collect()
        } else {
            frames
                .into_iter()
                .map(|path| {
                    let result = decoder.decode(&path);
                    (path, result)
                })
                .collect()
        };

        let mut records = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        let mut sources: HashMap<String, PathBuf> = HashMap::new();
        for (path, result) in results {
            let result = result.and_then(|record| match sources.entry(record.image.clone()) {
                Entry::Occupied(first) => Err(HoloError::MalformedTable(format!(
                    "duplicate frame identifier '{}' (already read from {})",
                    record.image,
                    first.get().display()
                ))),
                Entry::Vacant(slot) => {
                    slot.insert(path.clone());
                    Ok(record)
                }
            });
            match result {
                Ok(record) => records.push(
                    record.with_labels(self.config.cruise.clone(), self.config.event.clone()),
                ),
                Err(error) => {
                    warn!(file = %path.display(), error = %error, "Skipping frame");
                    failures.push(DecodeFailure { path, error });
                }
            }
        }

        info!(
            decoded = records.len(),
            failed = failures.len(),
            "Decoded frame metadata"
        );
        Ok(BatchOutcome {
            table: CastTable::new(records),
            failures,
        })
    }

    /// Decodes every frame in `dir` and writes the table to `output`,
    /// replacing any existing file.
    ///
    /// # Errors
    ///
    /// * `InvalidDirectory` - `dir` is missing or not a directory
    /// * `EmptyBatch` - no frame decoded; nothing is written
    #[instrument(skip_all, fields(dir = %dir.display(), output = %output.display()))]
    pub fn collect(&self, dir: &Path, output: &Path) -> Result<CollectReport> {
        let BatchOutcome { table, failures } = self.decode_all(dir)?;

        if table.is_empty() {
            return Err(HoloError::EmptyBatch {
                directory: dir.to_path_buf(),
                failures: failures.len(),
            });
        }

        let mut file = create_table_file(output)?;
        self.writer.write_metadata(&table, &mut file)?;

        info!(rows = table.len(), "Metadata saved");
        Ok(CollectReport {
            path: output.to_path_buf(),
            table,
            failures,
        })
    }

    /// Writes the text echo of every frame in `dir` to `<out_dir>/<stem>.txt`.
    /// Returns the number of echoes written; unreadable frames are skipped.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn export_text_echoes(&self, dir: &Path, out_dir: &Path) -> Result<usize> {
        fs::create_dir_all(out_dir)
            .map_err(|e| HoloError::OutputWriteError(format!("{}: {}", out_dir.display(), e)))?;

        let mut written = 0;
        for path in self.list_frames(dir)? {
            let echo = match read_text_echo(&path, self.config.geometry) {
                Ok(echo) => echo,
                Err(error) => {
                    warn!(file = %path.display(), error = %error, "Skipping text echo");
                    continue;
                }
            };
            let Some(stem) = path.file_stem() else {
                continue;
            };
            let mut name = stem.to_os_string();
            name.push(".txt");
            let target = out_dir.join(name);
            fs::write(&target, echo.as_str())
                .map_err(|e| HoloError::OutputWriteError(format!("{}: {}", target.display(), e)))?;
            written += 1;
        }

        info!(written, out_dir = %out_dir.display(), "Text echoes exported");
        Ok(written)
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }
}

/// Where a metadata table for `dir` goes when no path is given.
///
/// With both labels the table lands in a `metadata` directory next to the
/// frame directory, named after the cruise and event.
pub fn default_overview_path(dir: &Path, cruise: Option<&str>, event: Option<&str>) -> PathBuf {
    match (cruise, event) {
        (Some(cruise), Some(event)) => dir
            .parent()
            .unwrap_or(dir)
            .join("metadata")
            .join(format!("_metadata_overview_{}_event{}.csv", cruise, event)),
        _ => dir.join("metadata_overview.csv"),
    }
}
