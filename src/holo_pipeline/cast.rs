//! Cast segmentation module
//!
//! Labels each frame of a cast with its operational phase and keeps the
//! downcast and upcast frames below a minimum depth.

mod segmenter;
mod filter;
pub mod config;
pub mod phase;


pub use config::{SegmentationConfig, SegmentationConfigBuilder};
pub use filter::{CastFilter, FilterReport};
pub use phase::{Phase, Trend};
pub use segmenter::DepthSegmenter;
