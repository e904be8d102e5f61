//! Hologram cast processing pipeline
//!
//! Decodes the metadata appended to raw hologram frames, collects a cast
//! into one table, labels each frame with its cast phase and keeps the
//! downcast and upcast frames.

pub mod cast;
pub mod collector;
pub mod common;
pub mod metadata;
pub mod table;

pub use common::{
    HoloError,
    Result,
};

pub use metadata::{
    BinaryMetadata,
    FrameDecoder,
    FrameGeometry,
    LisstFrameDecoder,
    MetadataRecord,
    TextEcho,
    read_text_echo,
};

pub use table::{
    CastTable,
    CsvTableWriter,
    SegmentedCast,
    TableWriter,
    read_cast_table,
};

pub use collector::{
    BatchOutcome,
    CollectReport,
    CollectorConfig,
    FilePattern,
    MetadataCollector,
    default_overview_path,
};

pub use cast::{
    CastFilter,
    DepthSegmenter,
    FilterReport,
    Phase,
    SegmentationConfig,
};
