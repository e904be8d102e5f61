//! Raw frame geometry

use crate::holo_pipeline::common::error::{HoloError, Result};

/// Bytes between the image samples and the start of the file that are not
/// part of the image (the `P5<lf>1600 1200 255<lf>` header, minus one).
pub const HEADER_OFFSET: u64 = 17;

/// Size of the binary metadata block that follows the image samples.
pub const BINARY_BLOCK_LEN: usize = 1024;

/// Size of the text echo that follows the binary block.
pub const TEXT_BLOCK_LEN: usize = 1024;

/// Image dimensions of a raw frame, which fix where the metadata starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    /// Width of the hologram in pixels
    pub width: u64,
    /// Height of the hologram in pixels
    pub height: u64,
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 1200,
        }
    }
}

impl FrameGeometry {
    pub fn new(width: u64, height: u64) -> Self {
        Self { width, height }
    }

    /// Like [`FrameGeometry::new`], but rejects dimensions whose trailing
    /// blocks would lie beyond `u64::MAX` bytes.
    pub fn try_new(width: u64, height: u64) -> Result<Self> {
        width
            .checked_mul(height)
            .and_then(|samples| samples.checked_add(HEADER_OFFSET))
            .and_then(|offset| offset.checked_add((BINARY_BLOCK_LEN + TEXT_BLOCK_LEN) as u64))
            .ok_or_else(|| {
                HoloError::InvalidParameter(format!("frame geometry {}x{} is too large", width, height))
            })?;
        Ok(Self { width, height })
    }

    /// Byte offset of the binary metadata block.
    pub fn binary_block_offset(&self) -> u64 {
        self.width
            .saturating_mul(self.height)
            .saturating_add(HEADER_OFFSET)
    }

    /// Byte offset of the text echo block.
    pub fn text_block_offset(&self) -> u64 {
        self.binary_block_offset().saturating_add(BINARY_BLOCK_LEN as u64)
    }

    /// Smallest file length that holds both trailing blocks. Saturates at
    /// `u64::MAX`, which no file reaches.
    pub fn min_file_len(&self) -> u64 {
        self.text_block_offset().saturating_add(TEXT_BLOCK_LEN as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_offsets_match_instrument_layout() {
        let geometry = FrameGeometry::default();
        assert_eq!(geometry.binary_block_offset(), 1600 * 1200 + 17);
        assert_eq!(geometry.text_block_offset(), 1600 * 1200 + 17 + 1024);
        assert_eq!(geometry.min_file_len(), 1600 * 1200 + 17 + 2048);
    }

    #[test]
    fn offsets_follow_custom_dimensions() {
        let geometry = FrameGeometry::new(4, 3);
        assert_eq!(geometry.binary_block_offset(), 29);
        assert_eq!(geometry.min_file_len(), 29 + 2048);
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert!(matches!(
            FrameGeometry::try_new(u64::MAX, 2),
            Err(HoloError::InvalidParameter(_))
        ));
        assert!(matches!(
            FrameGeometry::try_new(1, u64::MAX - 100),
            Err(HoloError::InvalidParameter(_))
        ));
        assert_eq!(FrameGeometry::try_new(1600, 1200).unwrap(), FrameGeometry::default());

        let unchecked = FrameGeometry::new(u64::MAX, u64::MAX);
        assert_eq!(unchecked.min_file_len(), u64::MAX);
    }
}
