//! Common utilities module
//!
//! This module contains shared utilities used across the hologram pipeline.

pub mod error;

pub use error::{HoloError, Result};
