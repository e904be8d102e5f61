use std::iter;

use tracing::{debug, info, instrument};

use crate::holo_pipeline::cast::config::SegmentationConfig;
use crate::holo_pipeline::cast::phase::{Phase, Trend};
use crate::holo_pipeline::common::error::Result;
use crate::holo_pipeline::table::{CastTable, SegmentedCast};

/// Classifies the frames of one cast by smoothed depth trajectory.
///
/// Each row's phase depends on the previous row, so a single table is
/// always processed sequentially.
#[derive(Debug, Clone)]
pub struct DepthSegmenter {
    config: SegmentationConfig,
}

impl DepthSegmenter {
    pub fn new(config: SegmentationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Moving average of `depths` over the configured window.
    ///
    /// The window shrinks at the table edges instead of padding. Any
    /// undefined depth inside a window makes that row's average undefined.
    pub fn smooth(&self, depths: &[Option<f64>]) -> Vec<Option<f64>> {
        let window = self.config.window;
        let (before, after) = if self.config.centered {
            let after = (window - 1) / 2;
            (window - 1 - after, after)
        } else {
            (window - 1, 0)
        };

        (0..depths.len())
            .map(|i| {
                let start = i.saturating_sub(before);
                let end = (i + after + 1).min(depths.len());
                let span = &depths[start..end];
                let sum = span.iter().try_fold(0.0, |sum, depth| depth.map(|d| sum + d))?;
                Some(sum / span.len() as f64)
            })
            .collect()
    }

    /// Phase of every row given its smoothed depth.
    pub fn classify(&self, smoothed: &[Option<f64>]) -> Vec<Phase> {
        let tolerance = self.config.tolerance;
        let deltas = iter::once(None).chain(
            smoothed
                .windows(2)
                .map(|pair| pair[1].zip(pair[0]).map(|(current, previous)| current - previous)),
        );

        deltas
            .scan(Phase::Initial, |phase, delta| {
                *phase = phase.next(Trend::classify(delta, tolerance));
                Some(*phase)
            })
            .take(smoothed.len())
            .collect()
    }

    /// Sorts `table` by frame identifier and appends `Smoothed_Depth` and `Phase`.
    #[instrument(skip_all, fields(rows = table.len()))]
    pub fn segment(&self, mut table: CastTable) -> Result<SegmentedCast> {
        if !table.is_sorted_by_identifier() {
            debug!("Sorting cast table by frame identifier");
            table.sort_by_identifier();
        }

        let smoothed = self.smooth(&table.depths());
        let phases = self.classify(&smoothed);

        let usable = phases.iter().filter(|phase| phase.is_usable()).count();
        info!(
            window = self.config.window,
            tolerance = self.config.tolerance,
            usable,
            "Segmented cast"
        );

        SegmentedCast::new(table, smoothed, phases)
    }
}
