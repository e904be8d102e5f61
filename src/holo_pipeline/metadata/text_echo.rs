//! Text echo block reader
//!
//! The instrument repeats the metadata as text after the binary block, with
//! temperature and depth already converted to physical units.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::holo_pipeline::common::error::{HoloError, Result};
use crate::holo_pipeline::metadata::geometry::{FrameGeometry, TEXT_BLOCK_LEN};

/// Position of the converted depth among the whitespace-separated tokens.
const DEPTH_TOKEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEcho {
    text: String,
}

impl TextEcho {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Depth in metres as converted by the instrument firmware.
    pub fn depth(&self) -> Option<f64> {
        self.text
            .split_whitespace()
            .nth(DEPTH_TOKEN)
            .and_then(|token| token.parse().ok())
    }
}

/// Reads the text echo of a raw frame file.
pub fn read_text_echo(path: &Path, geometry: FrameGeometry) -> Result<TextEcho> {
    let mut file = File::open(path)
        .map_err(|e| HoloError::InputReadError(format!("{}: {}", path.display(), e)))?;

    let available = file.metadata()?.len();
    let needed = geometry.min_file_len();
    if available < needed {
        return Err(HoloError::TruncatedRecord {
            path: path.to_path_buf(),
            needed,
            available,
        });
    }

    let mut block = vec![0u8; TEXT_BLOCK_LEN];
    file.seek(SeekFrom::Start(geometry.text_block_offset()))?;
    file.read_exact(&mut block)?;

    let text = String::from_utf8_lossy(&block);
    Ok(TextEcho::new(text.trim_end_matches(|c: char| c == '\0' || c.is_whitespace())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holo_pipeline::metadata::fixtures::{TEST_GEOMETRY, frame_bytes, sample_metadata};

    const ECHO: &str = "Date 2022-02-23 Time 10:27:15 Temp 4.52 degC Pressure 10234 counts Depth 152.37 m\r\n";

    #[test]
    fn reads_echo_and_parses_depth() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("HOLO.pgm");
        std::fs::write(&path, frame_bytes(TEST_GEOMETRY, &sample_metadata(1, 1.0, 0.0), ECHO)).unwrap();

        let echo = read_text_echo(&path, TEST_GEOMETRY).unwrap();
        assert!(echo.as_str().ends_with("152.37 m"));
        assert_eq!(echo.depth(), Some(152.37));
    }

    #[test]
    fn echo_without_depth_token() {
        assert_eq!(TextEcho::new("too short").depth(), None);
    }

    #[test]
    fn missing_text_block_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("HOLO.pgm");
        let mut bytes = frame_bytes(TEST_GEOMETRY, &sample_metadata(1, 1.0, 0.0), ECHO);
        bytes.truncate(bytes.len() - 100);
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(
            read_text_echo(&path, TEST_GEOMETRY),
            Err(HoloError::TruncatedRecord { .. })
        ));
    }
}
