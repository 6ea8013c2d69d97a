//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Geometry value types (points, ground vectors, triangles)
//! - Colors
//! - Logging utilities

pub mod math;
pub mod color;
pub mod logging;
