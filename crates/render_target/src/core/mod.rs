//! # Core Module
//!
//! Shared settings used across the render target.
//!
//! ## Organization
//!
//! - **Config**: Renderer configuration (logging, text, debug drawing, tiling)

pub mod config;

pub use config::{DebugDrawConfig, LoggingConfig, RendererConfig, TextConfig, TilingConfig};
