//! # Render Target
//!
//! Immediate-mode rendering backend. Takes an abstract scene description
//! (camera, projection, primitives with materials, debug overlays and text
//! labels) and turns it into the commands of a fixed-function graphics device.
//!
//! ## Features
//!
//! - **Primitive rendering**: strips, fans, triangle lists and convex polygons
//!   with per-vertex normals and ambient/diffuse materials
//! - **Camera setup**: look-at view transforms, orthographic and perspective
//!   projections, and orthographic sub-rectangles for tiled rendering
//! - **Debug drawing**: flat-colored points, lines, arrows and helper surfaces
//! - **Text overlay**: labels anchored in the scene or on screen
//! - **Command recording**: a device that records and serializes everything it
//!   receives
//!
//! Scene coordinates are mirrored on the z axis before reaching the device;
//! see [`render::coordinates`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use render_target::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut context = RenderContext::recording(RendererConfig::default())?;
//!     let camera = Camera::new(Vec3::new(0.0, 100.0, -100.0), Vec3::zeros());
//!     let projection = Projection::orthographic(4.0 / 3.0, 200.0, 1.0, 1000.0);
//!
//!     let ground = Primitive::new(
//!         PrimitiveType::ConvexPolygon,
//!         vec![
//!             Vec3::new(-50.0, 0.0, -50.0),
//!             Vec3::new(50.0, 0.0, -50.0),
//!             Vec3::new(50.0, 0.0, 50.0),
//!         ],
//!         vec![Vec3::y(); 3],
//!         Material::from_color(Color::GREEN, Lighting::Flat),
//!     );
//!
//!     let mut target = context.frame(camera, &projection, &ViewportPart::FULL)?;
//!     target.render(&ground)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod debug;
pub mod foundation;
pub mod render;

/// Common imports for render target users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::config::{DebugDrawConfig, RendererConfig, TextConfig, TilingConfig},
        debug::{draw_arrow, draw_line_strip, draw_points, DebugShape},
        foundation::{
            color::Color,
            math::{Mat4, Triangle, Vec3, Vec3Ext, VecXZ},
        },
        render::{
            Camera, CommandRecorder, DeviceTarget, GraphicsDevice, Lighting, Material, Primitive,
            PrimitiveTarget, PrimitiveType, Projection, RecordedTextRasterizer, RenderContext,
            RenderError, RenderResult, RenderTarget, Renderable, TextLabel, TextRasterizer,
            ViewportPart,
        },
    };
}
