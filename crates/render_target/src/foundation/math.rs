//! Math utilities and types
//!
//! Provides the geometry value types shared by every part of the render target:
//! 3D points/vectors (y is "up"), 2D ground-plane vectors and triangles.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

pub use nalgebra::{Matrix4, Vector3};

/// 3D point or vector type (y is "up")
pub type Vec3 = Vector3<f64>;

/// 4x4 matrix type used for view and projection transforms
pub type Mat4 = Matrix4<f64>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f64>;

/// Unit vector along +X
pub const X_UNIT: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// Unit vector along +Y (world up)
pub const Y_UNIT: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Unit vector along +Z
pub const Z_UNIT: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Vector on the ground plane, made of the x and z components of a 3D vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VecXZ {
    /// X component
    pub x: f64,
    /// Z component
    pub z: f64,
}

impl VecXZ {
    /// Ground vector along +X
    pub const X_UNIT: Self = Self { x: 1.0, z: 0.0 };

    /// Ground vector along +Z
    pub const Z_UNIT: Self = Self { x: 0.0, z: 1.0 };

    /// Create a new ground vector
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Squared length
    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.z * self.z
    }

    /// Length
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Unit vector with the same direction.
    ///
    /// Callers are responsible for not normalizing a (near) zero vector.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let length = self.length();
        Self::new(self.x / length, self.z / length)
    }

    /// Perpendicular vector rotated clockwise when looking down the y axis
    #[must_use]
    pub fn right_normal(&self) -> Self {
        Self::new(self.z, -self.x)
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.z * other.z
    }

    /// Lift back into 3D with the given height
    pub const fn xyz(&self, y: f64) -> Vec3 {
        Vec3::new(self.x, y, self.z)
    }
}

impl Add for VecXZ {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Sub for VecXZ {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl Mul<f64> for VecXZ {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.z * factor)
    }
}

impl Neg for VecXZ {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.z)
    }
}

/// Extension trait for [`Vec3`] with ground-plane helpers
pub trait Vec3Ext {
    /// Projection onto the ground plane (drops y)
    fn to_xz(&self) -> VecXZ;

    /// Adds a ground vector, leaving y untouched
    #[must_use]
    fn add_xz(&self, offset: VecXZ) -> Vec3;
}

impl Vec3Ext for Vec3 {
    fn to_xz(&self) -> VecXZ {
        VecXZ::new(self.x, self.z)
    }

    fn add_xz(&self, offset: VecXZ) -> Vec3 {
        Vec3::new(self.x + offset.x, self.y, self.z + offset.z)
    }
}

/// Triangle defined by three points; vertex order defines the facing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    /// First vertex
    pub v1: Vec3,
    /// Second vertex
    pub v2: Vec3,
    /// Third vertex
    pub v3: Vec3,
}

impl Triangle {
    /// Create a triangle from its vertices
    pub const fn new(v1: Vec3, v2: Vec3, v3: Vec3) -> Self {
        Self { v1, v2, v3 }
    }

    /// Vertices in winding order
    pub const fn vertices(&self) -> [Vec3; 3] {
        [self.v1, self.v2, self.v3]
    }

    /// Unit normal of the front face (counter-clockwise winding, right-handed).
    ///
    /// Degenerate triangles yield a zero vector.
    pub fn normal(&self) -> Vec3 {
        let cross = (self.v2 - self.v1).cross(&(self.v3 - self.v1));
        cross.try_normalize(f64::EPSILON).unwrap_or_else(Vec3::zeros)
    }

    /// Centroid of the three vertices
    pub fn center(&self) -> Vec3 {
        (self.v1 + self.v2 + self.v3) / 3.0
    }
}

/// Math utility functions
pub mod utils {
    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees.to_radians()
    }
}
