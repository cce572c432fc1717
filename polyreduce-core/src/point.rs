//! Point and vector aliases

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Normalize `v`, returning the zero vector when it has no usable direction.
///
/// Collapsed and sliver triangles produce zero-length cross products; callers
/// compare normals with dot products, so a zero vector reads as "no
/// alignment" where `normalize()` would poison everything with NaN.
pub fn normalize_or_zero(v: Vector3f) -> Vector3f {
    v.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::zeros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_or_zero() {
        let n = normalize_or_zero(Vector3f::new(0.0, 3.0, 4.0));
        assert_relative_eq!(n, Vector3f::new(0.0, 0.6, 0.8), epsilon = 1e-6);
        assert_eq!(normalize_or_zero(Vector3f::zeros()), Vector3f::zeros());
    }
}
