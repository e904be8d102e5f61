//! Segmentation parameters

use crate::holo_pipeline::common::error::{HoloError, Result};

/// Parameters for depth smoothing, phase detection and filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationConfig {
    /// Moving-average window in rows
    pub window: usize,
    /// Smoothed depth change (m) a row must exceed to count as movement
    pub tolerance: f64,
    /// Centre the window on each row instead of trailing it
    pub centered: bool,
    /// Shallowest smoothed depth (m) kept by the filter
    pub min_depth: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            window: 5,
            tolerance: 0.15,
            centered: true,
            min_depth: 5.0,
        }
    }
}

impl SegmentationConfig {
    pub fn builder() -> SegmentationConfigBuilder {
        SegmentationConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(HoloError::InvalidParameter("window must be at least 1 row".to_string()));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(HoloError::InvalidParameter(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        if !self.min_depth.is_finite() {
            return Err(HoloError::InvalidParameter(format!(
                "minimum depth must be finite, got {}",
                self.min_depth
            )));
        }
        Ok(())
    }
}

/// Builder for SegmentationConfig
#[derive(Default)]
pub struct SegmentationConfigBuilder {
    window: Option<usize>,
    tolerance: Option<f64>,
    centered: Option<bool>,
    min_depth: Option<f64>,
}

impl SegmentationConfigBuilder {
    pub fn window(mut self, window: usize) -> Self {
        self.window = Some(window);
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn centered(mut self, centered: bool) -> Self {
        self.centered = Some(centered);
        self
    }

    pub fn min_depth(mut self, min_depth: f64) -> Self {
        self.min_depth = Some(min_depth);
        self
    }

    pub fn build(self) -> SegmentationConfig {
        let default = SegmentationConfig::default();
        SegmentationConfig {
            window: self.window.unwrap_or(default.window),
            tolerance: self.tolerance.unwrap_or(default.tolerance),
            centered: self.centered.unwrap_or(default.centered),
            min_depth: self.min_depth.unwrap_or(default.min_depth),
        }
    }
}
