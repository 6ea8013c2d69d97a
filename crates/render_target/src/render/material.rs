//! Material and lighting state
//!
//! A [`Material`] describes how a lit primitive reflects light. Applying it
//! overwrites the device's shading mode and front-face reflectance, which stay
//! in effect until the next material is applied, so it has to happen right
//! before the primitive that needs it.

use serde::{Deserialize, Serialize};

use crate::foundation::color::Color;
use crate::render::device::{GraphicsDevice, MaterialChannel, MaterialFace, ShadeModel};

/// Lighting interpolation of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Lighting {
    /// Lighting interpolated across each primitive
    #[default]
    Smooth,
    /// Constant lighting per primitive
    Flat,
}

impl Lighting {
    /// Device shade model for this lighting mode
    pub const fn shade_model(self) -> ShadeModel {
        match self {
            Self::Smooth => ShadeModel::Smooth,
            Self::Flat => ShadeModel::Flat,
        }
    }
}

/// Reflectance and shading description of a primitive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Ambient reflectance
    pub ambient: Color,
    /// Diffuse reflectance
    pub diffuse: Color,
    /// Shading interpolation
    pub lighting: Lighting,
}

impl Material {
    /// Ambient share used by [`Material::from_color`]
    pub const AMBIENT_FACTOR: f32 = 0.5;

    /// Create a material from explicit colors
    pub const fn new(ambient: Color, diffuse: Color, lighting: Lighting) -> Self {
        Self { ambient, diffuse, lighting }
    }

    /// Create a material whose ambient color is a darkened copy of its diffuse color
    pub fn from_color(color: Color, lighting: Lighting) -> Self {
        let ambient = Color::rgba(
            color.r * Self::AMBIENT_FACTOR,
            color.g * Self::AMBIENT_FACTOR,
            color.b * Self::AMBIENT_FACTOR,
            color.a,
        );
        Self::new(ambient, color, lighting)
    }

    /// Set the lighting mode
    #[must_use]
    pub const fn with_lighting(mut self, lighting: Lighting) -> Self {
        self.lighting = lighting;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::from_color(Color::WHITE, Lighting::Smooth)
    }
}

/// Apply a material to the device's lighting state.
///
/// Sets the shade model from [`Material::lighting`], then the ambient and
/// diffuse reflectance of front faces.
pub fn apply_material<D: GraphicsDevice + ?Sized>(device: &mut D, material: &Material) {
    device.shade_model(material.lighting.shade_model());

    set_front_material_color(device, MaterialChannel::Ambient, material.ambient);
    set_front_material_color(device, MaterialChannel::Diffuse, material.diffuse);
}

/// Set one reflectance channel of front faces.
///
/// Only the RGB channels are used; they are clamped into `[0, 1]` and alpha
/// is fixed at 1.
pub fn set_front_material_color<D: GraphicsDevice + ?Sized>(
    device: &mut D,
    channel: MaterialChannel,
    color: Color,
) {
    device.material(MaterialFace::FRONT, channel, color.to_opaque_rgba());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{CommandRecorder, DeviceCommand};

    #[test]
    fn test_apply_material_sets_shading_then_colors() {
        let mut device = CommandRecorder::new();
        let material =
            Material::new(Color::rgb(0.1, 0.2, 0.3), Color::rgb(0.4, 0.5, 0.6), Lighting::Flat);

        apply_material(&mut device, &material);

        assert_eq!(
            device.commands(),
            &[
                DeviceCommand::ShadeModel(ShadeModel::Flat),
                DeviceCommand::Material {
                    face: MaterialFace::FRONT,
                    channel: MaterialChannel::Ambient,
                    rgba: [0.1, 0.2, 0.3, 1.0],
                },
                DeviceCommand::Material {
                    face: MaterialFace::FRONT,
                    channel: MaterialChannel::Diffuse,
                    rgba: [0.4, 0.5, 0.6, 1.0],
                },
            ]
        );
    }

    #[test]
    fn test_smooth_lighting_maps_to_smooth_shading() {
        let mut device = CommandRecorder::new();
        apply_material(&mut device, &Material::default());

        assert_eq!(device.state().shade_model, Some(ShadeModel::Smooth));
    }

    #[test]
    fn test_material_colors_are_clamped() {
        let mut device = CommandRecorder::new();
        let material = Material::new(
            Color::rgb(-1.0, 0.5, 300.0),
            Color::rgba(2.0, f32::NAN, 0.25, 0.0),
            Lighting::Smooth,
        );

        apply_material(&mut device, &material);

        let state = device.state();
        assert_eq!(state.front_ambient, Some([0.0, 0.5, 1.0, 1.0]));
        assert_eq!(state.front_diffuse, Some([1.0, 0.0, 0.25, 1.0]));

        for rgba in [state.front_ambient, state.front_diffuse].into_iter().flatten() {
            assert!(rgba.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }

    #[test]
    fn test_from_color_darkens_ambient() {
        let material = Material::from_color(Color::rgb(0.8, 0.6, 0.4), Lighting::Flat);

        assert_eq!(material.diffuse, Color::rgb(0.8, 0.6, 0.4));
        assert_eq!(material.ambient, Color::rgb(0.4, 0.3, 0.2));
        assert_eq!(material.with_lighting(Lighting::Smooth).lighting, Lighting::Smooth);
    }
}
