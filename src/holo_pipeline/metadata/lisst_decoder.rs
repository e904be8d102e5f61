//! Decoder for LISST-Holo raw frame files.
//!
//! A raw frame is a PGM image (`P5<lf>1600 1200 255<lf>` followed by one byte
//! per pixel) with two 1024-byte blocks appended: binary metadata written as
//! packed C structs, then a text echo of the same values. Only the binary
//! block feeds the decoded record.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::holo_pipeline::common::error::{HoloError, Result};
use crate::holo_pipeline::metadata::decoder::FrameDecoder;
use crate::holo_pipeline::metadata::geometry::{BINARY_BLOCK_LEN, FrameGeometry};
use crate::holo_pipeline::metadata::record::{BinaryMetadata, MetadataRecord};

/// Frame decoder that locates the metadata block from the image dimensions.
///
/// The offset is computed, never parsed from the PGM header, so a damaged
/// header cannot shift the metadata. The decoder holds no state beyond its
/// geometry and is safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct LisstFrameDecoder {
    geometry: FrameGeometry,
}

impl LisstFrameDecoder {
    pub fn new(geometry: FrameGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    /// Reads the binary block of `path` without interpreting it.
    pub fn read_binary_block(&self, path: &Path) -> Result<[u8; BINARY_BLOCK_LEN]> {
        let mut file = File::open(path)
            .map_err(|e| HoloError::InputReadError(format!("{}: {}", path.display(), e)))?;

        let available = file.metadata()?.len();
        let needed = self.geometry.min_file_len();
        if available < needed {
            return Err(HoloError::TruncatedRecord {
                path: path.to_path_buf(),
                needed,
                available,
            });
        }

        let mut block = [0u8; BINARY_BLOCK_LEN];
        file.seek(SeekFrom::Start(self.geometry.binary_block_offset()))?;
        file.read_exact(&mut block).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => HoloError::TruncatedRecord {
                path: path.to_path_buf(),
                needed,
                available,
            },
            _ => HoloError::IoError(e),
        })?;
        Ok(block)
    }
}

impl FrameDecoder for LisstFrameDecoder {
    /// Decodes the binary metadata block of a raw frame file.
    ///
    /// # Errors
    ///
    /// * `TruncatedRecord` - the file ends before both trailing blocks
    /// * `InputReadError` - the file cannot be opened
    fn decode(&self, path: &Path) -> Result<MetadataRecord> {
        let block = self.read_binary_block(path)?;

        let binary = BinaryMetadata::unpack(&block).map_err(|spec| HoloError::TruncatedRecord {
            path: path.to_path_buf(),
            needed: (spec.offset + spec.kind.width()) as u64,
            available: block.len() as u64,
        })?;

        let image = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let record = MetadataRecord::from_binary(image, binary);
        debug!(
            image = %record.image,
            pressure = binary.pressure_counts,
            depth = ?record.depth,
            "Decoded frame metadata"
        );
        Ok(record)
    }
}
