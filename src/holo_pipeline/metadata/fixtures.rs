//! Synthetic frame files for tests.

use std::fs;
use std::path::{Path, PathBuf};

use crate::holo_pipeline::metadata::geometry::{FrameGeometry, TEXT_BLOCK_LEN};
use crate::holo_pipeline::metadata::record::{BinaryMetadata, CameraSetting};

/// Geometry small enough to keep test frames tiny.
pub const TEST_GEOMETRY: FrameGeometry = FrameGeometry { width: 8, height: 4 };

pub fn sample_metadata(pressure_counts: u64, depth_b: f32, depth_c: f32) -> BinaryMetadata {
    BinaryMetadata {
        capture_epoch: 1_700_000_000,
        pressure_counts,
        temperature_counts: 2101,
        supply_voltage_counts: 3300,
        exposure_time: 12,
        laser_power_counts: 180,
        laser_photodiode_counts: 95,
        camera_brightness: CameraSetting { value: 40, min: 0, max: 255 },
        camera_shutter: CameraSetting { value: 7, min: 1, max: 4095 },
        camera_gain: CameraSetting { value: 16, min: 16, max: 64 },
        depth_coefs: [0.0, depth_b, depth_c],
        temp_coefs: [1.25, -0.5, 0.001, 1.0, -2.0],
        aux_channels: [1, 2, 3, 4000, 4095],
        inter_frame_delay_ms: 250,
        timestamp_ms: 1_700_000_000_123,
    }
}

/// Builds a complete raw frame: header, samples, binary block, text echo.
pub fn frame_bytes(geometry: FrameGeometry, metadata: &BinaryMetadata, echo: &str) -> Vec<u8> {
    let offset = geometry.binary_block_offset() as usize;
    let header = format!("P5\n{} {} 255\n", geometry.width, geometry.height);
    let mut bytes = vec![0u8; offset];
    let header_len = header.len().min(offset);
    bytes[..header_len].copy_from_slice(&header.as_bytes()[..header_len]);
    for (i, sample) in bytes[header_len..].iter_mut().enumerate() {
        *sample = (i % 251) as u8;
    }
    bytes.extend_from_slice(&metadata.pack());
    let mut text = echo.as_bytes().to_vec();
    text.resize(TEXT_BLOCK_LEN, 0);
    bytes.extend_from_slice(&text);
    bytes
}

pub fn write_frame(dir: &Path, name: &str, metadata: &BinaryMetadata) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, frame_bytes(TEST_GEOMETRY, metadata, "")).unwrap();
    path
}

pub fn write_truncated_frame(dir: &Path, name: &str, keep: usize) -> PathBuf {
    let path = dir.join(name);
    let mut bytes = frame_bytes(TEST_GEOMETRY, &sample_metadata(100, 0.1, 0.0), "");
    bytes.truncate(keep);
    fs::write(&path, bytes).unwrap();
    path
}
