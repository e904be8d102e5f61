//! Cast table types

use crate::holo_pipeline::cast::phase::Phase;
use crate::holo_pipeline::common::error::{HoloError, Result};
use crate::holo_pipeline::metadata::MetadataRecord;

/// Records of one deployment, one per frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CastTable {
    records: Vec<MetadataRecord>,
}

impl CastTable {
    pub fn new(records: Vec<MetadataRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MetadataRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<MetadataRecord> {
        self.records
    }

    /// Orders rows by frame identifier. Ties keep their current order.
    pub fn sort_by_identifier(&mut self) {
        self.records.sort_by(|a, b| a.image.cmp(&b.image));
    }

    pub fn is_sorted_by_identifier(&self) -> bool {
        self.records.windows(2).all(|pair| pair[0].image <= pair[1].image)
    }

    /// Keeps every `n`-th row of the cast, starting with the first frame.
    /// The stride runs over rows ordered by frame identifier.
    pub fn every_nth(&self, n: usize) -> Result<CastTable> {
        if n == 0 {
            return Err(HoloError::InvalidParameter("stride must be at least 1".to_string()));
        }
        let mut ordered: Vec<&MetadataRecord> = self.records.iter().collect();
        ordered.sort_by(|a, b| a.image.cmp(&b.image));
        Ok(ordered.into_iter().step_by(n).cloned().collect())
    }

    pub fn depths(&self) -> Vec<Option<f64>> {
        self.records
            .iter()
            .map(|record| record.depth.filter(|d| d.is_finite()))
            .collect()
    }
}

impl FromIterator<MetadataRecord> for CastTable {
    fn from_iter<I: IntoIterator<Item = MetadataRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A cast table with the derived `Smoothed_Depth` and `Phase` columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentedCast {
    table: CastTable,
    smoothed_depth: Vec<Option<f64>>,
    phases: Vec<Phase>,
}

/// Borrowed view of one segmented row.
#[derive(Debug, Clone, Copy)]
pub struct SegmentedRow<'a> {
    pub record: &'a MetadataRecord,
    pub smoothed_depth: Option<f64>,
    pub phase: Phase,
}

impl SegmentedCast {
    pub const DERIVED_COLUMNS: [&'static str; 2] = ["Smoothed_Depth", "Phase"];

    /// Joins a table with its derived columns, which must have one entry per row.
    pub fn new(table: CastTable, smoothed_depth: Vec<Option<f64>>, phases: Vec<Phase>) -> Result<Self> {
        if smoothed_depth.len() != table.len() || phases.len() != table.len() {
            return Err(HoloError::MalformedTable(format!(
                "derived columns have {} smoothed depths and {} phases for {} rows",
                smoothed_depth.len(),
                phases.len(),
                table.len()
            )));
        }
        Ok(Self {
            table,
            smoothed_depth,
            phases,
        })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn table(&self) -> &CastTable {
        &self.table
    }

    pub fn smoothed_depth(&self) -> &[Option<f64>] {
        &self.smoothed_depth
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn rows(&self) -> impl Iterator<Item = SegmentedRow<'_>> {
        self.table
            .records()
            .iter()
            .zip(&self.smoothed_depth)
            .zip(&self.phases)
            .map(|((record, &smoothed_depth), &phase)| SegmentedRow {
                record,
                smoothed_depth,
                phase,
            })
    }

    /// Rows for which `keep` holds, in their original order.
    pub fn retain<F>(&self, mut keep: F) -> SegmentedCast
    where
        F: FnMut(&SegmentedRow<'_>) -> bool,
    {
        let mut records = Vec::new();
        let mut smoothed_depth = Vec::new();
        let mut phases = Vec::new();
        for row in self.rows().filter(|row| keep(row)) {
            records.push(row.record.clone());
            smoothed_depth.push(row.smoothed_depth);
            phases.push(row.phase);
        }
        SegmentedCast {
            table: CastTable::new(records),
            smoothed_depth,
            phases,
        }
    }

    /// Header of a persisted segmented table.
    pub fn columns() -> Vec<&'static str> {
        let mut columns = MetadataRecord::columns();
        columns.extend(Self::DERIVED_COLUMNS);
        columns
    }
}
