//! Coordinate system conversion
//!
//! Scene data uses a right-handed, y-up system with +z pointing forward. The
//! backend works in a left-handed frame, so every coordinate that crosses into
//! the device is mirrored along z. This module is the only place that
//! conversion happens; positions, normals, camera eye/target and text anchors
//! all go through [`to_backend`] exactly once.

use crate::foundation::math::Vec3;

/// Convert a scene-space point or vector into backend space.
///
/// The mapping is `(x, y, z) -> (x, y, -z)`. It is its own inverse, and it
/// applies to normals the same way as to positions so lighting stays
/// consistent with the mirrored geometry.
#[inline]
pub fn to_backend(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, -v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_backend_negates_z_only() {
        let p = Vec3::new(1.5, -2.0, 3.25);
        assert_eq!(to_backend(p), Vec3::new(1.5, -2.0, -3.25));
    }

    #[test]
    fn test_to_backend_is_an_involution() {
        let samples = [
            Vec3::zeros(),
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-7.5, 0.0, -0.125),
            Vec3::new(1e9, -1e-9, 42.0),
        ];

        for p in samples {
            assert_eq!(to_backend(to_backend(p)), p);
        }
    }
}
