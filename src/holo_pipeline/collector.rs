//! Metadata batch collection module
//!
//! Decodes every raw frame in a directory into one cast table, skipping
//! files that fail to decode.

mod batch_collector;
pub mod types;


pub use batch_collector::{MetadataCollector, default_overview_path};
pub use types::{BatchOutcome, CollectReport, CollectorConfig, CollectorConfigBuilder, DecodeFailure, FilePattern};
