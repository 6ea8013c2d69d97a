//! Graphics device abstraction
//!
//! This module defines the trait that immediate-mode backends implement. The
//! operations mirror a fixed-function pipeline: draw batches framed by
//! `begin`/`end`, per-vertex submission, and global state setters that stay in
//! effect until overwritten.
//!
//! Implementations are bound to the thread that owns the device context. The
//! trait has no `Send`/`Sync` requirements and callers must not share a device
//! between threads.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat4, Vec3};

/// Backend draw modes for a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawMode {
    /// Isolated points
    Points,
    /// Independent line segments
    Lines,
    /// Connected line segments
    LineStrip,
    /// Connected line segments closed from last to first vertex
    LineLoop,
    /// Independent triangles
    Triangles,
    /// Triangles sharing an edge with their predecessor
    TriangleStrip,
    /// Triangles sharing the first vertex
    TriangleFan,
    /// A single convex polygon
    Polygon,
}

/// Shading interpolation across a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShadeModel {
    /// Lighting interpolated between vertices
    Smooth,
    /// One lighting value per primitive
    Flat,
}

/// Material reflectance channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialChannel {
    /// Ambient reflectance
    Ambient,
    /// Diffuse reflectance
    Diffuse,
}

bitflags! {
    /// Faces a material setting applies to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct MaterialFace: u8 {
        /// Front-facing polygons
        const FRONT = 0b01;
        /// Back-facing polygons
        const BACK = 0b10;
        /// Both faces
        const FRONT_AND_BACK = Self::FRONT.bits() | Self::BACK.bits();
    }
}

/// Immediate-mode graphics device
///
/// Coordinates handed to the device are already in backend convention; see
/// [`crate::render::coordinates`]. Colors are RGBA in `[0, 1]`.
pub trait GraphicsDevice {
    /// Start a draw batch
    fn begin(&mut self, mode: DrawMode);

    /// Finish the current draw batch
    fn end(&mut self);

    /// Submit a vertex position
    fn vertex(&mut self, position: Vec3);

    /// Set the normal used by subsequent vertices
    fn normal(&mut self, normal: Vec3);

    /// Set the flat color used by subsequent unlit vertices
    fn color(&mut self, rgba: [f32; 4]);

    /// Set the rasterized line width in pixels
    fn line_width(&mut self, width: f32);

    /// Set the shading interpolation mode
    fn shade_model(&mut self, model: ShadeModel);

    /// Set a material reflectance channel
    fn material(&mut self, face: MaterialFace, channel: MaterialChannel, rgba: [f32; 4]);

    /// Replace the view (model-view) transform
    fn load_view_matrix(&mut self, view: Mat4);

    /// Replace the projection transform
    fn load_projection_matrix(&mut self, projection: Mat4);
}
