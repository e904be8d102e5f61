//! Reloads persisted metadata tables.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::holo_pipeline::common::error::{HoloError, Result};
use crate::holo_pipeline::metadata::{BINARY_LAYOUT, BinaryMetadata, FieldValue, MetadataRecord};
use crate::holo_pipeline::table::types::CastTable;

#[derive(Debug, Deserialize)]
struct IdentityColumns {
    #[serde(rename = "Cruise", default)]
    cruise: Option<String>,
    #[serde(rename = "Event", default)]
    event: Option<String>,
    #[serde(rename = "Image")]
    image: String,
    #[serde(rename = "Datetime", default)]
    datetime: Option<String>,
    #[serde(rename = "Depth")]
    depth: Option<f64>,
}

/// Reads a metadata table written by [`CsvTableWriter`](super::CsvTableWriter).
///
/// Only `Image` and `Depth` are required, and frame identifiers must be
/// unique. Binary layout columns are optional: an absent column or an empty
/// cell leaves that field at zero, which also admits tables written without
/// `Capture epoch`. Unknown columns such as `Temperature` are ignored. Empty
/// `Depth` cells load as undefined.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_cast_table(path: &Path) -> Result<CastTable> {
    let file = File::open(path)
        .map_err(|e| HoloError::InputReadError(format!("{}: {}", path.display(), e)))?;
    read_cast_table_from(file)
}

pub fn read_cast_table_from<R: Read>(input: R) -> Result<CastTable> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers()?.clone();

    let position = |column: &str| headers.iter().position(|h| h.trim() == column);
    for required in ["Image", "Depth"] {
        if position(required).is_none() {
            return Err(HoloError::MalformedTable(format!("missing column '{}'", required)));
        }
    }
    let binary_columns: Vec<_> = BINARY_LAYOUT
        .iter()
        .filter_map(|spec| position(spec.column).map(|index| (spec, index)))
        .collect();
    if binary_columns.len() < BINARY_LAYOUT.len() {
        debug!(
            present = binary_columns.len(),
            expected = BINARY_LAYOUT.len(),
            "Absent layout columns load as zero"
        );
    }

    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row?;
        let identity: IdentityColumns = row
            .deserialize(Some(&headers))
            .map_err(|e| HoloError::MalformedTable(format!("row {}: {}", line + 1, e)))?;

        let mut binary = BinaryMetadata::default();
        for (spec, index) in &binary_columns {
            let cell = row.get(*index).unwrap_or_default();
            if cell.trim().is_empty() {
                continue;
            }
            let value = FieldValue::parse(spec.kind, cell).ok_or_else(|| {
                HoloError::MalformedTable(format!(
                    "row {}: invalid {} value '{}'",
                    line + 1,
                    spec.column,
                    cell
                ))
            })?;
            binary.assign(spec.id, value);
        }

        if !seen.insert(identity.image.clone()) {
            return Err(HoloError::MalformedTable(format!(
                "duplicate frame identifier '{}'",
                identity.image
            )));
        }

        records.push(MetadataRecord {
            cruise: identity.cruise,
            event: identity.event,
            image: identity.image,
            datetime: identity.datetime,
            depth: identity.depth.filter(|d| d.is_finite()),
            binary,
        });
    }

    debug!("Loaded {} rows", records.len());
    Ok(CastTable::new(records))
}
