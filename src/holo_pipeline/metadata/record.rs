//! Metadata record types

use chrono::DateTime;

use crate::holo_pipeline::metadata::geometry::BINARY_BLOCK_LEN;
use crate::holo_pipeline::metadata::layout::{BINARY_LAYOUT, FieldId, FieldSpec, FieldValue};

/// Minimum/current/maximum triple reported for a camera setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CameraSetting {
    pub value: u16,
    pub min: u16,
    pub max: u16,
}

/// Contents of the 1024-byte binary metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BinaryMetadata {
    /// Seconds since the Unix epoch when the frame was captured
    pub capture_epoch: u64,
    pub pressure_counts: u64,
    pub temperature_counts: u16,
    pub supply_voltage_counts: u16,
    /// Exposure time in 600 ns increments
    pub exposure_time: u16,
    pub laser_power_counts: u16,
    pub laser_photodiode_counts: u16,
    pub camera_brightness: CameraSetting,
    pub camera_shutter: CameraSetting,
    pub camera_gain: CameraSetting,
    /// Depth calibration A, B, C
    pub depth_coefs: [f32; 3],
    /// Temperature calibration A, B, C, slope, offset
    pub temp_coefs: [f32; 5],
    /// Auxiliary A/D channels 2 to 6
    pub aux_channels: [u32; 5],
    pub inter_frame_delay_ms: u16,
    pub timestamp_ms: u64,
}

impl BinaryMetadata {
    /// Unpacks every field of [`BINARY_LAYOUT`] from `block`.
    ///
    /// On failure returns the first field that does not fit in the buffer.
    pub fn unpack(block: &[u8]) -> Result<Self, &'static FieldSpec> {
        let mut metadata = Self::default();
        for spec in BINARY_LAYOUT {
            let value = spec.read(block).ok_or(spec)?;
            metadata.assign(spec.id, value);
        }
        Ok(metadata)
    }

    /// Packs every field back into a zeroed 1024-byte block.
    pub fn pack(&self) -> [u8; BINARY_BLOCK_LEN] {
        let mut block = [0u8; BINARY_BLOCK_LEN];
        for spec in BINARY_LAYOUT {
            spec.write(&mut block, self.get(spec.id));
        }
        block
    }

    /// Depth in metres: pressure counts scaled by coefficient B, offset by C.
    /// Coefficient A is carried but not used by the instrument's conversion.
    pub fn depth_m(&self) -> f64 {
        let [_, multiplier, offset] = self.depth_coefs;
        self.pressure_counts as f64 * multiplier as f64 + offset as f64
    }

    pub fn get(&self, id: FieldId) -> FieldValue {
        use FieldValue::*;
        match id {
            FieldId::CaptureEpoch => U64(self.capture_epoch),
            FieldId::PressureCounts => U64(self.pressure_counts),
            FieldId::TemperatureCounts => U16(self.temperature_counts),
            FieldId::SupplyVoltageCounts => U16(self.supply_voltage_counts),
            FieldId::ExposureTime => U16(self.exposure_time),
            FieldId::LaserPower => U16(self.laser_power_counts),
            FieldId::LaserPhotodiode => U16(self.laser_photodiode_counts),
            FieldId::CameraBrightness => U16(self.camera_brightness.value),
            FieldId::CameraBrightnessMin => U16(self.camera_brightness.min),
            FieldId::CameraBrightnessMax => U16(self.camera_brightness.max),
            FieldId::CameraShutter => U16(self.camera_shutter.value),
            FieldId::CameraShutterMin => U16(self.camera_shutter.min),
            FieldId::CameraShutterMax => U16(self.camera_shutter.max),
            FieldId::CameraGain => U16(self.camera_gain.value),
            FieldId::CameraGainMin => U16(self.camera_gain.min),
            FieldId::CameraGainMax => U16(self.camera_gain.max),
            FieldId::DepthCoefA => F32(self.depth_coefs[0]),
            FieldId::DepthCoefB => F32(self.depth_coefs[1]),
            FieldId::DepthCoefC => F32(self.depth_coefs[2]),
            FieldId::TempCoefA => F32(self.temp_coefs[0]),
            FieldId::TempCoefB => F32(self.temp_coefs[1]),
            FieldId::TempCoefC => F32(self.temp_coefs[2]),
            FieldId::TempCoefSlope => F32(self.temp_coefs[3]),
            FieldId::TempCoefOffset => F32(self.temp_coefs[4]),
            FieldId::AuxChannel2 => U32(self.aux_channels[0]),
            FieldId::AuxChannel3 => U32(self.aux_channels[1]),
            FieldId::AuxChannel4 => U32(self.aux_channels[2]),
            FieldId::AuxChannel5 => U32(self.aux_channels[3]),
            FieldId::AuxChannel6 => U32(self.aux_channels[4]),
            FieldId::InterFrameDelay => U16(self.inter_frame_delay_ms),
            FieldId::TimestampMs => U64(self.timestamp_ms),
        }
    }

    /// Stores `value` into the field named by `id`. Values whose kind does
    /// not match the field are ignored; the layout table guarantees they do.
    pub fn assign(&mut self, id: FieldId, value: FieldValue) {
        match (id, value) {
            (FieldId::CaptureEpoch, FieldValue::U64(v)) => self.capture_epoch = v,
            (FieldId::PressureCounts, FieldValue::U64(v)) => self.pressure_counts = v,
            (FieldId::TemperatureCounts, FieldValue::U16(v)) => self.temperature_counts = v,
            (FieldId::SupplyVoltageCounts, FieldValue::U16(v)) => self.supply_voltage_counts = v,
            (FieldId::ExposureTime, FieldValue::U16(v)) => self.exposure_time = v,
            (FieldId::LaserPower, FieldValue::U16(v)) => self.laser_power_counts = v,
            (FieldId::LaserPhotodiode, FieldValue::U16(v)) => self.laser_photodiode_counts = v,
            (FieldId::CameraBrightness, FieldValue::U16(v)) => self.camera_brightness.value = v,
            (FieldId::CameraBrightnessMin, FieldValue::U16(v)) => self.camera_brightness.min = v,
            (FieldId::CameraBrightnessMax, FieldValue::U16(v)) => self.camera_brightness.max = v,
            (FieldId::CameraShutter, FieldValue::U16(v)) => self.camera_shutter.value = v,
            (FieldId::CameraShutterMin, FieldValue::U16(v)) => self.camera_shutter.min = v,
            (FieldId::CameraShutterMax, FieldValue::U16(v)) => self.camera_shutter.max = v,
            (FieldId::CameraGain, FieldValue::U16(v)) => self.camera_gain.value = v,
            (FieldId::CameraGainMin, FieldValue::U16(v)) => self.camera_gain.min = v,
            (FieldId::CameraGainMax, FieldValue::U16(v)) => self.camera_gain.max = v,
            (FieldId::DepthCoefA, FieldValue::F32(v)) => self.depth_coefs[0] = v,
            (FieldId::DepthCoefB, FieldValue::F32(v)) => self.depth_coefs[1] = v,
            (FieldId::DepthCoefC, FieldValue::F32(v)) => self.depth_coefs[2] = v,
            (FieldId::TempCoefA, FieldValue::F32(v)) => self.temp_coefs[0] = v,
            (FieldId::TempCoefB, FieldValue::F32(v)) => self.temp_coefs[1] = v,
            (FieldId::TempCoefC, FieldValue::F32(v)) => self.temp_coefs[2] = v,
            (FieldId::TempCoefSlope, FieldValue::F32(v)) => self.temp_coefs[3] = v,
            (FieldId::TempCoefOffset, FieldValue::F32(v)) => self.temp_coefs[4] = v,
            (FieldId::AuxChannel2, FieldValue::U32(v)) => self.aux_channels[0] = v,
            (FieldId::AuxChannel3, FieldValue::U32(v)) => self.aux_channels[1] = v,
            (FieldId::AuxChannel4, FieldValue::U32(v)) => self.aux_channels[2] = v,
            (FieldId::AuxChannel5, FieldValue::U32(v)) => self.aux_channels[3] = v,
            (FieldId::AuxChannel6, FieldValue::U32(v)) => self.aux_channels[4] = v,
            (FieldId::InterFrameDelay, FieldValue::U16(v)) => self.inter_frame_delay_ms = v,
            (FieldId::TimestampMs, FieldValue::U64(v)) => self.timestamp_ms = v,
            _ => {}
        }
    }
}

/// One row of a cast table: a decoded frame plus its identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
    pub cruise: Option<String>,
    pub event: Option<String>,
    /// Frame identifier (file stem)
    pub image: String,
    /// Capture time rendered as UTC, when the epoch is representable
    pub datetime: Option<String>,
    /// Depth in metres; `None` when undefined
    pub depth: Option<f64>,
    pub binary: BinaryMetadata,
}

impl MetadataRecord {
    /// Identifier columns that precede the binary layout columns.
    pub const IDENTITY_COLUMNS: [&'static str; 5] = ["Cruise", "Event", "Image", "Datetime", "Depth"];

    pub fn from_binary(image: impl Into<String>, binary: BinaryMetadata) -> Self {
        let depth = binary.depth_m();
        Self {
            cruise: None,
            event: None,
            image: image.into(),
            datetime: format_epoch(binary.capture_epoch),
            depth: depth.is_finite().then_some(depth),
            binary,
        }
    }

    pub fn with_labels(mut self, cruise: Option<String>, event: Option<String>) -> Self {
        self.cruise = cruise;
        self.event = event;
        self
    }

    /// Header of a persisted metadata table.
    pub fn columns() -> Vec<&'static str> {
        Self::IDENTITY_COLUMNS
            .iter()
            .copied()
            .chain(BINARY_LAYOUT.iter().map(|spec| spec.column))
            .collect()
    }

    /// Cells of this record, in [`MetadataRecord::columns`] order.
    pub fn cells(&self) -> Vec<String> {
        let mut cells = vec![
            self.cruise.clone().unwrap_or_default(),
            self.event.clone().unwrap_or_default(),
            self.image.clone(),
            self.datetime.clone().unwrap_or_default(),
            self.depth.map(|d| d.to_string()).unwrap_or_default(),
        ];
        cells.extend(BINARY_LAYOUT.iter().map(|spec| self.binary.get(spec.id).to_string()));
        cells
    }
}

fn format_epoch(epoch: u64) -> Option<String> {
    let seconds = i64::try_from(epoch).ok()?;
    DateTime::from_timestamp(seconds, 0).map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holo_pipeline::metadata::fixtures::sample_metadata;

    #[test]
    fn unpack_then_pack_reproduces_assigned_bytes() {
        let mut block = sample_metadata(1000, 0.01, 0.5).pack();
        // unassigned regions stay as the instrument wrote them
        block[50] = 0xAB;
        let decoded = BinaryMetadata::unpack(&block).unwrap();
        let repacked = decoded.pack();
        for spec in BINARY_LAYOUT {
            assert_eq!(&block[spec.range()], &repacked[spec.range()], "{}", spec.column);
        }
    }

    #[test]
    fn unpack_names_the_first_field_that_does_not_fit() {
        let block = [0u8; 170];
        let missing = BinaryMetadata::unpack(&block).unwrap_err();
        assert_eq!(missing.id, FieldId::InterFrameDelay);
    }

    #[test]
    fn depth_uses_b_as_multiplier_and_c_as_offset() {
        let mut metadata = sample_metadata(2000, 0.01, -1.5);
        metadata.depth_coefs[0] = 1000.0;
        assert!((metadata.depth_m() - 18.5).abs() < 1e-6);
    }

    #[test]
    fn record_cells_line_up_with_columns() {
        let record = MetadataRecord::from_binary("HOLO_0001", sample_metadata(40, 0.25, 0.0))
            .with_labels(Some("DY086".to_string()), None);
        let columns = MetadataRecord::columns();
        let cells = record.cells();
        assert_eq!(columns.len(), cells.len());
        assert_eq!(cells[0], "DY086");
        assert_eq!(cells[1], "");
        assert_eq!(cells[2], "HOLO_0001");
        assert_eq!(cells[3], "2023-11-14 22:13:20");
        assert_eq!(cells[4], "10");
    }

    #[test]
    fn non_finite_depth_is_undefined() {
        let record = MetadataRecord::from_binary("x", sample_metadata(1, f32::NAN, 0.0));
        assert_eq!(record.depth, None);
    }
}
