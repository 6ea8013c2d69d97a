//! Color values
//!
//! Colors are stored with unconstrained floating point components so that
//! callers can work in whatever range their data comes in (HDR values,
//! 8-bit channels scaled by hand, ...). Everything handed to a graphics device
//! goes through [`Color::to_rgba`], which clamps into the `[0, 1]` range the
//! device expects.

use serde::{Deserialize, Serialize};

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque red
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque green
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Opaque blue
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    /// Opaque yellow
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    /// Opaque mid gray
    pub const GRAY: Self = Self::rgb(0.5, 0.5, 0.5);

    /// Create an opaque color from floating point channels
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from floating point channels including alpha
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
    }

    /// Device representation with every channel clamped into `[0, 1]`
    pub fn to_rgba(&self) -> [f32; 4] {
        [unit(self.r), unit(self.g), unit(self.b), unit(self.a)]
    }

    /// Device representation of the RGB channels with alpha forced to 1
    pub fn to_opaque_rgba(&self) -> [f32; 4] {
        [unit(self.r), unit(self.g), unit(self.b), 1.0]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Clamp a channel into `[0, 1]`; NaN maps to 0
fn unit(channel: f32) -> f32 {
    if channel.is_nan() {
        0.0
    } else {
        channel.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rgb8_maps_into_unit_range() {
        let color = Color::from_rgb8(255, 0, 51);
        let [r, g, b, a] = color.to_rgba();

        assert_relative_eq!(r, 1.0);
        assert_relative_eq!(g, 0.0);
        assert_relative_eq!(b, 0.2);
        assert_relative_eq!(a, 1.0);
    }

    #[test]
    fn test_out_of_range_channels_are_clamped() {
        let hdr = Color::rgba(4.5, -0.3, 0.25, 2.0);
        assert_eq!(hdr.to_rgba(), [1.0, 0.0, 0.25, 1.0]);

        let broken = Color::rgb(f32::NAN, f32::INFINITY, f32::NEG_INFINITY);
        assert_eq!(broken.to_rgba(), [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_opaque_rgba_ignores_alpha() {
        let translucent = Color::rgba(0.2, 0.4, 0.6, 0.1);
        assert_eq!(translucent.to_opaque_rgba(), [0.2, 0.4, 0.6, 1.0]);
    }
}
