//! Frame metadata module
//!
//! This module decodes the binary metadata block that the instrument appends
//! to every hologram frame, plus the text echo that follows it.

mod decoder;
mod lisst_decoder;
pub mod geometry;
pub mod layout;
pub mod record;
pub mod text_echo;

#[cfg(test)]
pub(crate) mod fixtures;

pub use decoder::FrameDecoder;
pub use geometry::FrameGeometry;
pub use layout::{BINARY_LAYOUT, Endian, FieldId, FieldKind, FieldSpec, FieldValue};
pub use lisst_decoder::LisstFrameDecoder;
pub use record::{BinaryMetadata, CameraSetting, MetadataRecord};
pub use text_echo::{TextEcho, read_text_echo};
