//! Collector configuration and result types

use std::path::{Path, PathBuf};

use crate::holo_pipeline::common::error::HoloError;
use crate::holo_pipeline::metadata::FrameGeometry;
use crate::holo_pipeline::table::CastTable;

/// Which directory entries count as raw frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    /// Extension without the leading dot
    pub extension: String,
    /// Whether `PGM` and `pgm` are different extensions
    pub case_sensitive: bool,
}

impl Default for FilePattern {
    fn default() -> Self {
        Self {
            extension: "pgm".to_string(),
            case_sensitive: true,
        }
    }
}

impl FilePattern {
    pub fn new(extension: impl Into<String>, case_sensitive: bool) -> Self {
        let extension = extension.into();
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            case_sensitive,
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        if self.case_sensitive {
            extension == self.extension
        } else {
            extension.eq_ignore_ascii_case(&self.extension)
        }
    }
}

/// Configuration for batch metadata collection
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub pattern: FilePattern,
    pub geometry: FrameGeometry,
    /// Cruise label copied into every row
    pub cruise: Option<String>,
    /// Event (deployment) label copied into every row
    pub event: Option<String>,
    /// Decode files on the rayon thread pool
    pub parallel: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            pattern: FilePattern::default(),
            geometry: FrameGeometry::default(),
            cruise: None,
            event: None,
            parallel: true,
        }
    }
}

impl CollectorConfig {
    pub fn builder() -> CollectorConfigBuilder {
        CollectorConfigBuilder::default()
    }
}

/// Builder for CollectorConfig
#[derive(Default)]
pub struct CollectorConfigBuilder {
    pattern: Option<FilePattern>,
    geometry: Option<FrameGeometry>,
    cruise: Option<String>,
    event: Option<String>,
    parallel: Option<bool>,
}

impl CollectorConfigBuilder {
    pub fn pattern(mut self, pattern: FilePattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn geometry(mut self, geometry: FrameGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn cruise(mut self, cruise: impl Into<String>) -> Self {
        self.cruise = Some(cruise.into());
        self
    }

    pub fn event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    pub fn build(self) -> CollectorConfig {
        let default = CollectorConfig::default();
        CollectorConfig {
            pattern: self.pattern.unwrap_or(default.pattern),
            geometry: self.geometry.unwrap_or(default.geometry),
            cruise: self.cruise,
            event: self.event,
            parallel: self.parallel.unwrap_or(default.parallel),
        }
    }
}

/// A file that was skipped, and why.
#[derive(Debug)]
pub struct DecodeFailure {
    pub path: PathBuf,
    pub error: HoloError,
}

/// Decoded rows and skipped files of one batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub table: CastTable,
    pub failures: Vec<DecodeFailure>,
}

/// Result of a persisted collection.
#[derive(Debug)]
pub struct CollectReport {
    pub path: PathBuf,
    pub table: CastTable,
    pub failures: Vec<DecodeFailure>,
}
