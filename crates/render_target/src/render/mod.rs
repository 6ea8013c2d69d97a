//! Rendering module
//!
//! Translates scene-level descriptions (camera, projection, primitives with
//! materials, text labels) into the commands of an immediate-mode graphics
//! device.
//!
//! # Architecture
//!
//! - [`device`]: the [`GraphicsDevice`] seam every backend implements
//! - [`coordinates`]: scene to backend coordinate convention adapter
//! - [`material`]: shading mode and reflectance state
//! - [`primitive`]: primitive types and the per-primitive draw path
//! - [`camera`]: view and projection transforms, including tiled projections
//! - [`text`]: world- and screen-anchored text through a [`TextRasterizer`]
//! - [`target`]: renderable/target traits and the render context
//! - [`recording`]: a device that records every command it receives
//!
//! Every operation is issued to the device immediately and synchronously. No
//! state is kept between primitives besides the device's own pipeline state.

pub mod camera;
pub mod coordinates;
pub mod device;
pub mod material;
pub mod primitive;
pub mod recording;
pub mod target;
pub mod text;

pub use camera::{
    set_camera_matrices, set_projection_matrices, set_projection_matrices_for_part, Camera,
    OrthoBounds, Projection, ViewportPart,
};
pub use coordinates::to_backend;
pub use device::{DrawMode, GraphicsDevice, MaterialChannel, MaterialFace, ShadeModel};
pub use material::{apply_material, set_front_material_color, Lighting, Material};
pub use primitive::{draw_mode, draw_primitive, Primitive, PrimitiveType};
pub use recording::{CommandRecorder, DeviceCommand, DrawBatch, RecordedTextRasterizer, TextCommand};
pub use target::{DeviceTarget, PrimitiveTarget, RenderContext, RenderTarget, Renderable};
pub use text::{draw_screen_text, draw_world_text, TextAnchor, TextLabel, TextRasterizer};

/// Errors raised by rendering operations
///
/// None of these are transient: each one means the caller asked for something
/// the render target does not support, and retrying with the same arguments
/// fails the same way. Operations report them before issuing any command.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Vertex and normal streams of a primitive have different lengths
    #[error("Contract violation: {vertices} vertices but {normals} normals")]
    VertexNormalMismatch {
        /// Number of vertices supplied
        vertices: usize,
        /// Number of normals supplied
        normals: usize,
    },

    /// A raw primitive type code outside the supported set
    #[error("Contract violation: unhandled primitive type code {0}")]
    UnsupportedPrimitiveType(u8),

    /// A filled primitive with fewer vertices than its type needs
    #[error("Contract violation: {kind:?} needs at least {required} vertices, got {actual}")]
    TooFewVertices {
        /// Primitive type
        kind: PrimitiveType,
        /// Minimum vertex count
        required: usize,
        /// Supplied vertex count
        actual: usize,
    },

    /// Arguments that are individually valid but not supported together
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
