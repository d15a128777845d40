#![warn(missing_docs)]

//! Math types for the sashimono assembly kernel.
//!
//! Thin wrappers around nalgebra providing domain-specific types for
//! furniture assembly geometry: points, vectors, directions, rigid
//! transforms, and tolerance constants. All lengths are millimeters.

use nalgebra::{Matrix3, Matrix4, Unit, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A rigid transform (rotation + translation) as a 4x4 affine matrix.
///
/// Poses, joint frames, and frame compositions in the assembly kernel are
/// all rigid: the upper-left 3x3 block is a rotation, never a scale or
/// shear. Constructors only build rigid matrices; [`Transform::then`] and
/// [`Transform::rigid_inverse`] preserve rigidity.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// Build a frame transform from an origin and three orthonormal basis
    /// vectors (the columns of the rotation block).
    ///
    /// The caller is responsible for `x`, `y`, `z` forming a right-handed
    /// orthonormal basis; joint-frame construction in the model layer
    /// guarantees this.
    pub fn from_frame(origin: &Point3, x: &Vec3, y: &Vec3, z: &Vec3) -> Self {
        let mut m = Matrix4::identity();
        for i in 0..3 {
            m[(i, 0)] = x[i];
            m[(i, 1)] = y[i];
            m[(i, 2)] = z[i];
            m[(i, 3)] = origin[i];
        }
        Self { matrix: m }
    }

    /// Compose: apply `other` first, then `self` (`self * other`).
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (rotation only, ignores translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// The translation component.
    pub fn translation_part(&self) -> Vec3 {
        Vec3::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }

    /// The rotation block as a 3x3 matrix.
    pub fn rotation_part(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Inverse of a rigid transform: `R^T` and `-R^T t`.
    ///
    /// Unlike a general matrix inverse this never fails and introduces no
    /// extra floating-point error beyond the transpose multiply.
    pub fn rigid_inverse(&self) -> Self {
        let r_t = self.rotation_part().transpose();
        let t = r_t * -self.translation_part();
        let mut m = Matrix4::identity();
        for i in 0..3 {
            for j in 0..3 {
                m[(i, j)] = r_t[(i, j)];
            }
            m[(i, 3)] = t[i];
        }
        Self { matrix: m }
    }

    /// Residual between two rigid transforms: translation distance in mm
    /// and rotation angle in radians of `self^-1 * other`.
    pub fn rigid_delta(&self, other: &Transform) -> RigidDelta {
        let d = self.rigid_inverse().then(other);
        let trace = d.matrix[(0, 0)] + d.matrix[(1, 1)] + d.matrix[(2, 2)];
        let cos = ((trace - 1.0) / 2.0).clamp(-1.0, 1.0);
        RigidDelta {
            translation: d.translation_part().norm(),
            rotation: cos.acos(),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Residual between two rigid transforms.
#[derive(Debug, Clone, Copy)]
pub struct RigidDelta {
    /// Translation distance in mm.
    pub translation: f64,
    /// Rotation angle in radians.
    pub rotation: f64,
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Coincidence tolerance in mm (anchor/pose agreement checks).
    pub coincidence: f64,
    /// Display tolerance in mm (geometry rounding for human output).
    pub display: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default assembly tolerances (1e-6 mm coincidence, 1e-3 mm display,
    /// 1e-9 rad angular).
    pub const DEFAULT: Self = Self {
        coincidence: 1e-6,
        display: 1e-3,
        angular: 1e-9,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.coincidence
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.coincidence
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        let p = Point3::new(1.0, 2.0, 3.0);
        let result = t.apply_point(&p);
        assert!((result - p).norm() < 1e-12);
    }

    #[test]
    fn test_translation() {
        let t = Transform::translation(10.0, 20.0, 30.0);
        let p = Point3::new(1.0, 2.0, 3.0);
        let result = t.apply_point(&p);
        assert!((result.x - 11.0).abs() < 1e-12);
        assert!((result.y - 22.0).abs() < 1e-12);
        assert!((result.z - 33.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_z_90() {
        let t = Transform::rotation_z(PI / 2.0);
        let p = Point3::new(1.0, 0.0, 0.0);
        let result = t.apply_point(&p);
        assert!(result.x.abs() < 1e-12);
        assert!((result.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_compose_order() {
        // then() applies the argument first: (t2 * t1) p = t2(t1(p))
        let t1 = Transform::translation(1.0, 0.0, 0.0);
        let t2 = Transform::rotation_z(PI / 2.0);
        let composed = t2.then(&t1);
        let p = Point3::origin();
        let result = composed.apply_point(&p);
        assert!(result.x.abs() < 1e-12);
        assert!((result.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_frame() {
        // Frame with axes rotated 90 degrees about Z, origin at (5, 0, 0).
        let t = Transform::from_frame(
            &Point3::new(5.0, 0.0, 0.0),
            &Vec3::new(0.0, 1.0, 0.0),
            &Vec3::new(-1.0, 0.0, 0.0),
            &Vec3::new(0.0, 0.0, 1.0),
        );
        let p = t.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p.x - 5.0).abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rigid_inverse_roundtrip() {
        let t = Transform::rotation_y(0.7).then(&Transform::translation(3.0, -2.0, 8.0));
        let roundtrip = t.rigid_inverse().then(&t);
        let p = Point3::new(5.0, 6.0, 7.0);
        let result = roundtrip.apply_point(&p);
        assert!((result - p).norm() < 1e-12);
    }

    #[test]
    fn test_rigid_delta_zero_for_equal() {
        let t = Transform::rotation_x(1.1).then(&Transform::translation(1.0, 2.0, 3.0));
        let d = t.rigid_delta(&t);
        assert!(d.translation < 1e-12);
        assert!(d.rotation < 1e-6);
    }

    #[test]
    fn test_rigid_delta_measures_offsets() {
        let a = Transform::identity();
        let b = Transform::translation(3.0, 4.0, 0.0);
        let d = a.rigid_delta(&b);
        assert!((d.translation - 5.0).abs() < 1e-12);
        assert!(d.rotation < 1e-12);

        let c = Transform::rotation_z(PI / 2.0);
        let d2 = a.rigid_delta(&c);
        assert!(d2.translation < 1e-12);
        assert!((d2.rotation - PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_tolerance_points_equal() {
        let tol = Tolerance::DEFAULT;
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(1.0 + 1e-7, 2.0, 3.0);
        assert!(tol.points_equal(&a, &b));
        let c = Point3::new(1.001, 2.0, 3.0);
        assert!(!tol.points_equal(&a, &c));
    }
}
