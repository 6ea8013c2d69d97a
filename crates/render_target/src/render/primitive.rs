//! Primitive types and the per-primitive draw path

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::render::coordinates::to_backend;
use crate::render::device::{DrawMode, GraphicsDevice};
use crate::render::material::{apply_material, Material};
use crate::render::{RenderError, RenderResult};

/// Abstract primitive types produced by the scene layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PrimitiveType {
    /// Each vertex after the second forms a triangle with the previous two
    TriangleStrip = 0,
    /// Each vertex after the second forms a triangle with the first and previous vertex
    TriangleFan = 1,
    /// Every three vertices form an independent triangle
    Triangles = 2,
    /// All vertices form one convex polygon
    ConvexPolygon = 3,
}

impl PrimitiveType {
    /// All supported primitive types
    pub const ALL: [Self; 4] =
        [Self::TriangleStrip, Self::TriangleFan, Self::Triangles, Self::ConvexPolygon];

    /// Smallest vertex count that produces a filled surface
    pub const fn min_vertices(self) -> usize {
        3
    }
}

impl TryFrom<u8> for PrimitiveType {
    type Error = RenderError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::TriangleStrip),
            1 => Ok(Self::TriangleFan),
            2 => Ok(Self::Triangles),
            3 => Ok(Self::ConvexPolygon),
            other => Err(RenderError::UnsupportedPrimitiveType(other)),
        }
    }
}

/// Backend draw mode for a primitive type
pub const fn draw_mode(kind: PrimitiveType) -> DrawMode {
    match kind {
        PrimitiveType::TriangleStrip => DrawMode::TriangleStrip,
        PrimitiveType::TriangleFan => DrawMode::TriangleFan,
        PrimitiveType::Triangles => DrawMode::Triangles,
        PrimitiveType::ConvexPolygon => DrawMode::Polygon,
    }
}

/// One drawable unit of lit geometry
///
/// Vertices and normals are parallel sequences in scene coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    /// Primitive type
    pub kind: PrimitiveType,
    /// Vertex positions
    pub vertices: Vec<Vec3>,
    /// Per-vertex normals
    pub normals: Vec<Vec3>,
    /// Material applied before drawing
    pub material: Material,
}

impl Primitive {
    /// Create a primitive
    pub fn new(
        kind: PrimitiveType,
        vertices: Vec<Vec3>,
        normals: Vec<Vec3>,
        material: Material,
    ) -> Self {
        Self { kind, vertices, normals, material }
    }

    /// Check the vertex/normal parity and the minimum vertex count
    pub fn validate(&self) -> RenderResult<()> {
        check_parity(&self.vertices, &self.normals)?;

        let required = self.kind.min_vertices();
        if self.vertices.len() < required {
            return Err(RenderError::TooFewVertices {
                kind: self.kind,
                required,
                actual: self.vertices.len(),
            });
        }
        Ok(())
    }

    /// Draw this primitive
    ///
    /// # Errors
    /// See [`Primitive::validate`]. Nothing is issued to the device in that case.
    pub fn draw<D: GraphicsDevice + ?Sized>(&self, device: &mut D) -> RenderResult<()> {
        if let Err(err) = self.validate() {
            log::error!("Rejecting {:?} primitive: {err}", self.kind);
            return Err(err);
        }
        draw_primitive(device, self.kind, &self.material, &self.vertices, &self.normals)
    }
}

fn check_parity(vertices: &[Vec3], normals: &[Vec3]) -> RenderResult<()> {
    if vertices.len() == normals.len() {
        Ok(())
    } else {
        log::error!(
            "Rejecting primitive with {} vertices and {} normals",
            vertices.len(),
            normals.len()
        );
        Err(RenderError::VertexNormalMismatch {
            vertices: vertices.len(),
            normals: normals.len(),
        })
    }
}

/// Draw one lit primitive.
///
/// Applies `material`, then emits one batch in the mode mapped from `kind`.
/// For every index the normal is submitted before its vertex so the vertex is
/// lit with its own normal. Both are converted to backend coordinates.
///
/// # Errors
/// [`RenderError::VertexNormalMismatch`] if the streams differ in length; no
/// device command is issued in that case.
pub fn draw_primitive<D: GraphicsDevice + ?Sized>(
    device: &mut D,
    kind: PrimitiveType,
    material: &Material,
    vertices: &[Vec3],
    normals: &[Vec3],
) -> RenderResult<()> {
    check_parity(vertices, normals)?;

    apply_material(device, material);

    device.begin(draw_mode(kind));
    for (vertex, normal) in vertices.iter().zip(normals) {
        device.normal(to_backend(*normal));
        device.vertex(to_backend(*vertex));
    }
    device.end();

    log::trace!("Drew {:?} with {} vertices", kind, vertices.len());
    Ok(())
}
