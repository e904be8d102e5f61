//! Declarative layout of the binary metadata block.
//!
//! Each entry names a field, where it lives in the 1024-byte block and how it
//! is encoded. Decoding and encoding both walk [`BINARY_LAYOUT`], so adapting
//! to a firmware revision means editing this table and nothing else.

use std::fmt;

/// Identifies a field of the binary metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    CaptureEpoch,
    PressureCounts,
    TemperatureCounts,
    SupplyVoltageCounts,
    ExposureTime,
    LaserPower,
    LaserPhotodiode,
    CameraBrightness,
    CameraBrightnessMin,
    CameraBrightnessMax,
    CameraShutter,
    CameraShutterMin,
    CameraShutterMax,
    CameraGain,
    CameraGainMin,
    CameraGainMax,
    DepthCoefA,
    DepthCoefB,
    DepthCoefC,
    TempCoefA,
    TempCoefB,
    TempCoefC,
    TempCoefSlope,
    TempCoefOffset,
    AuxChannel2,
    AuxChannel3,
    AuxChannel4,
    AuxChannel5,
    AuxChannel6,
    InterFrameDelay,
    TimestampMs,
}

/// Numeric encoding of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U16,
    U32,
    U64,
    F32,
}

impl FieldKind {
    pub fn width(self) -> usize {
        match self {
            FieldKind::U16 => 2,
            FieldKind::U32 | FieldKind::F32 => 4,
            FieldKind::U64 => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// A decoded field value, tagged with its encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::U16(_) => FieldKind::U16,
            FieldValue::U32(_) => FieldKind::U32,
            FieldValue::U64(_) => FieldKind::U64,
            FieldValue::F32(_) => FieldKind::F32,
        }
    }

    /// Parses a persisted table cell back into a value of `kind`.
    pub fn parse(kind: FieldKind, text: &str) -> Option<FieldValue> {
        let text = text.trim();
        match kind {
            FieldKind::U16 => text.parse().ok().map(FieldValue::U16),
            FieldKind::U32 => text.parse().ok().map(FieldValue::U32),
            FieldKind::U64 => text.parse().ok().map(FieldValue::U64),
            FieldKind::F32 => text.parse().ok().map(FieldValue::F32),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::U16(v) => write!(f, "{}", v),
            FieldValue::U32(v) => write!(f, "{}", v),
            FieldValue::U64(v) => write!(f, "{}", v),
            FieldValue::F32(v) => write!(f, "{}", v),
        }
    }
}

/// Location and encoding of one field inside the binary block.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub id: FieldId,
    /// Column name used in persisted tables
    pub column: &'static str,
    pub offset: usize,
    pub kind: FieldKind,
    pub endian: Endian,
}

impl FieldSpec {
    const fn le(id: FieldId, column: &'static str, offset: usize, kind: FieldKind) -> Self {
        Self {
            id,
            column,
            offset,
            kind,
            endian: Endian::Little,
        }
    }

    /// Byte range covered by this field.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.kind.width()
    }

    /// Reads the field from `block`, or `None` when the field runs past its end.
    pub fn read(&self, block: &[u8]) -> Option<FieldValue> {
        let bytes = block.get(self.range())?;
        let value = match self.kind {
            FieldKind::U16 => {
                let raw: [u8; 2] = bytes.try_into().ok()?;
                FieldValue::U16(match self.endian {
                    Endian::Little => u16::from_le_bytes(raw),
                    Endian::Big => u16::from_be_bytes(raw),
                })
            }
            FieldKind::U32 => {
                let raw: [u8; 4] = bytes.try_into().ok()?;
                FieldValue::U32(match self.endian {
                    Endian::Little => u32::from_le_bytes(raw),
                    Endian::Big => u32::from_be_bytes(raw),
                })
            }
            FieldKind::U64 => {
                let raw: [u8; 8] = bytes.try_into().ok()?;
                FieldValue::U64(match self.endian {
                    Endian::Little => u64::from_le_bytes(raw),
                    Endian::Big => u64::from_be_bytes(raw),
                })
            }
            FieldKind::F32 => {
                let raw: [u8; 4] = bytes.try_into().ok()?;
                FieldValue::F32(match self.endian {
                    Endian::Little => f32::from_le_bytes(raw),
                    Endian::Big => f32::from_be_bytes(raw),
                })
            }
        };
        Some(value)
    }

    /// Writes `value` at this field's position. Returns `false` when the
    /// value has the wrong kind or the field does not fit in `block`.
    pub fn write(&self, block: &mut [u8], value: FieldValue) -> bool {
        if value.kind() != self.kind {
            return false;
        }
        let Some(target) = block.get_mut(self.range()) else {
            return false;
        };
        let little = self.endian == Endian::Little;
        match value {
            FieldValue::U16(v) => {
                target.copy_from_slice(&if little { v.to_le_bytes() } else { v.to_be_bytes() })
            }
            FieldValue::U32(v) => {
                target.copy_from_slice(&if little { v.to_le_bytes() } else { v.to_be_bytes() })
            }
            FieldValue::U64(v) => {
                target.copy_from_slice(&if little { v.to_le_bytes() } else { v.to_be_bytes() })
            }
            FieldValue::F32(v) => {
                target.copy_from_slice(&if little { v.to_le_bytes() } else { v.to_be_bytes() })
            }
        }
        true
    }
}

use FieldId::*;
use FieldKind::{F32, U16, U32, U64};

/// Binary block layout (LISST-Holo manual v3, p.69). Bytes 44-115, 168-171
/// and 182-1023 are unassigned.
pub const BINARY_LAYOUT: &[FieldSpec] = &[
    FieldSpec::le(CaptureEpoch, "Capture epoch", 0, U64),
    FieldSpec::le(PressureCounts, "Pressure counts", 8, U64),
    FieldSpec::le(TemperatureCounts, "Temperature counts", 16, U16),
    FieldSpec::le(SupplyVoltageCounts, "Power supply voltage counts", 18, U16),
    FieldSpec::le(ExposureTime, "Exposure time in 600ns increments", 20, U16),
    FieldSpec::le(LaserPower, "Laser power counts", 22, U16),
    FieldSpec::le(LaserPhotodiode, "Laser photo diode reading counts", 24, U16),
    FieldSpec::le(CameraBrightness, "Camera brightness", 26, U16),
    FieldSpec::le(CameraBrightnessMin, "Camera brightness min", 28, U16),
    FieldSpec::le(CameraBrightnessMax, "Camera brightness max", 30, U16),
    FieldSpec::le(CameraShutter, "Camera shutter", 32, U16),
    FieldSpec::le(CameraShutterMin, "Camera shutter min", 34, U16),
    FieldSpec::le(CameraShutterMax, "Camera shutter max", 36, U16),
    FieldSpec::le(CameraGain, "Camera gain", 38, U16),
    FieldSpec::le(CameraGainMin, "Camera gain min", 40, U16),
    FieldSpec::le(CameraGainMax, "Camera gain max", 42, U16),
    FieldSpec::le(DepthCoefA, "Depth coef A", 116, F32),
    FieldSpec::le(DepthCoefB, "Depth coef B", 120, F32),
    FieldSpec::le(DepthCoefC, "Depth coef C", 124, F32),
    FieldSpec::le(TempCoefA, "Temp coef A", 128, F32),
    FieldSpec::le(TempCoefB, "Temp coef B", 132, F32),
    FieldSpec::le(TempCoefC, "Temp coef C", 136, F32),
    FieldSpec::le(TempCoefSlope, "Temp coef slope", 140, F32),
    FieldSpec::le(TempCoefOffset, "Temp coef offset", 144, F32),
    FieldSpec::le(AuxChannel2, "Aux channel 2", 148, U32),
    FieldSpec::le(AuxChannel3, "Aux channel 3", 152, U32),
    FieldSpec::le(AuxChannel4, "Aux channel 4", 156, U32),
    FieldSpec::le(AuxChannel5, "Aux channel 5", 160, U32),
    FieldSpec::le(AuxChannel6, "Aux channel 6", 164, U32),
    FieldSpec::le(InterFrameDelay, "Inter-frame delay msec", 172, U16),
    FieldSpec::le(TimestampMs, "Timestamp msec", 174, U64),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holo_pipeline::metadata::geometry::BINARY_BLOCK_LEN;

    #[test]
    fn layout_fits_block_without_overlap() {
        let mut claimed = vec![false; BINARY_BLOCK_LEN];
        for spec in BINARY_LAYOUT {
            for byte in spec.range() {
                assert!(!claimed[byte], "{} overlaps at byte {}", spec.column, byte);
                claimed[byte] = true;
            }
        }
    }

    #[test]
    fn read_reports_fields_past_end_of_buffer() {
        let spec = FieldSpec::le(TimestampMs, "Timestamp msec", 174, U64);
        assert!(spec.read(&[0u8; 181]).is_none());
        assert_eq!(spec.read(&[0u8; 182]), Some(FieldValue::U64(0)));
    }

    #[test]
    fn big_endian_fields_are_honoured() {
        let spec = FieldSpec {
            id: TemperatureCounts,
            column: "Temperature counts",
            offset: 0,
            kind: U16,
            endian: Endian::Big,
        };
        assert_eq!(spec.read(&[0x01, 0x02]), Some(FieldValue::U16(0x0102)));
    }

    #[test]
    fn write_rejects_mismatched_kind() {
        let spec = FieldSpec::le(DepthCoefB, "Depth coef B", 0, F32);
        let mut block = [0u8; 8];
        assert!(!spec.write(&mut block, FieldValue::U32(1)));
        assert!(spec.write(&mut block, FieldValue::F32(0.5)));
        assert_eq!(spec.read(&block), Some(FieldValue::F32(0.5)));
    }

    #[test]
    fn parse_reads_display_output() {
        let value = FieldValue::F32(0.012_345_6);
        assert_eq!(FieldValue::parse(F32, &value.to_string()), Some(value));
        assert_eq!(FieldValue::parse(U16, "70000"), None);
    }
}
