//! # Renderer Configuration
//!
//! Groups the tunable settings of the render target into one serializable
//! structure. Every section has sensible defaults and files may specify only
//! the values they want to change.
//!
//! ## Configuration Categories
//!
//! - **Logging**: default log filter
//! - **Text**: font selection for the text rasterizer and world text scale
//! - **Debug drawing**: default line width and arrowhead heuristics
//! - **Tiling**: grid used when one image is rendered as several tiles

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};

/// # Logging Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log filter, used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// # Text Configuration
///
/// Parameters handed to the text rasterizer when the render context is set
/// up, plus the world-space scale of labels anchored in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Font family name
    pub font_family: String,
    /// Font size in points
    pub font_size: u32,
    /// World units per font pixel for text anchored in the scene
    pub world_scale: f32,
}

impl TextConfig {
    /// Scale used for world text unless configured otherwise
    pub const DEFAULT_WORLD_SCALE: f32 = 0.05;
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_family: "SansSerif".to_string(),
            font_size: 12,
            world_scale: Self::DEFAULT_WORLD_SCALE,
        }
    }
}

/// # Debug Drawing Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugDrawConfig {
    /// Line width restored after every explicit-width line draw
    pub default_line_width: f32,
    /// Squared ground-plane length below which an arrow shaft counts as vertical
    pub arrow_vertical_threshold: f64,
}

impl DebugDrawConfig {
    /// Width the device starts with and returns to
    pub const DEFAULT_LINE_WIDTH: f32 = 1.0;

    /// Default vertical-shaft cutoff for arrowheads
    pub const DEFAULT_ARROW_VERTICAL_THRESHOLD: f64 = 0.01;
}

impl Default for DebugDrawConfig {
    fn default() -> Self {
        Self {
            default_line_width: Self::DEFAULT_LINE_WIDTH,
            arrow_vertical_threshold: Self::DEFAULT_ARROW_VERTICAL_THRESHOLD,
        }
    }
}

/// # Tiling Configuration
///
/// Number of columns and rows an orthographic image is split into when
/// rendered piecewise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilingConfig {
    /// Tiles along the horizontal axis
    pub columns: u32,
    /// Tiles along the vertical axis
    pub rows: u32,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self { columns: 1, rows: 1 }
    }
}

/// # Complete Renderer Configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Text rendering configuration
    pub text: TextConfig,
    /// Debug drawing configuration
    pub debug_draw: DebugDrawConfig,
    /// Tiled rendering configuration
    pub tiling: TilingConfig,
}

impl RendererConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default log filter
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }

    /// Set the font used by the text rasterizer
    #[must_use]
    pub fn with_font(mut self, family: impl Into<String>, size: u32) -> Self {
        self.text.font_family = family.into();
        self.text.font_size = size;
        self
    }

    /// Set the world text scale
    #[must_use]
    pub fn with_world_text_scale(mut self, scale: f32) -> Self {
        self.text.world_scale = scale;
        self
    }

    /// Set the arrowhead vertical-shaft cutoff
    #[must_use]
    pub fn with_arrow_vertical_threshold(mut self, threshold: f64) -> Self {
        self.debug_draw.arrow_vertical_threshold = threshold;
        self
    }

    /// Set the tile grid
    #[must_use]
    pub fn with_tiles(mut self, columns: u32, rows: u32) -> Self {
        self.tiling = TilingConfig { columns, rows };
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid("log level cannot be empty".to_string()));
        }

        if self.text.font_family.trim().is_empty() {
            return Err(ConfigError::Invalid("font family cannot be empty".to_string()));
        }
        if self.text.font_size == 0 {
            return Err(ConfigError::Invalid("font size must be at least 1".to_string()));
        }
        if !(self.text.world_scale.is_finite() && self.text.world_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "world text scale must be positive, got {}",
                self.text.world_scale
            )));
        }

        let line_width = self.debug_draw.default_line_width;
        if !(line_width.is_finite() && line_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "default line width must be positive, got {line_width}"
            )));
        }
        let threshold = self.debug_draw.arrow_vertical_threshold;
        if !(threshold.is_finite() && threshold >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "arrow vertical threshold must be non-negative, got {threshold}"
            )));
        }

        if self.tiling.columns == 0 || self.tiling.rows == 0 {
            return Err(ConfigError::Invalid(
                "tile grid needs at least one column and one row".to_string(),
            ));
        }

        Ok(())
    }
}

impl Config for RendererConfig {}
