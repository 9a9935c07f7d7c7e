//! Math utilities and types
//!
//! Provides the 2D engine's math primitives on top of `nalgebra`. Matrices use
//! column vectors: translation lives in the last column (`M03`, `M13`, `M23`)
//! and a vector is transformed as `M * v`.

pub use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Tolerance used by [`is_equal`] and the engine's float assertions.
pub const EPSILON: f32 = 0.00001;

// Element (row, column) indices.
#[allow(missing_docs)]
pub mod elements {
    pub const M00: (usize, usize) = (0, 0);
    pub const M01: (usize, usize) = (0, 1);
    pub const M02: (usize, usize) = (0, 2);
    pub const M03: (usize, usize) = (0, 3);
    pub const M10: (usize, usize) = (1, 0);
    pub const M11: (usize, usize) = (1, 1);
    pub const M12: (usize, usize) = (1, 2);
    pub const M13: (usize, usize) = (1, 3);
    pub const M20: (usize, usize) = (2, 0);
    pub const M21: (usize, usize) = (2, 1);
    pub const M22: (usize, usize) = (2, 2);
    pub const M23: (usize, usize) = (2, 3);
    pub const M30: (usize, usize) = (3, 0);
    pub const M31: (usize, usize) = (3, 1);
    pub const M32: (usize, usize) = (3, 2);
    pub const M33: (usize, usize) = (3, 3);
}

pub use elements::*;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Convert degrees to radians
pub fn to_radians(degrees: f32) -> f32 {
    degrees * constants::DEG_TO_RAD
}

/// Convert radians to degrees
pub fn to_degrees(radians: f32) -> f32 {
    radians * constants::RAD_TO_DEG
}

/// Compares two floats within [`EPSILON`].
pub fn is_equal(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Builder and composition operations on [`Mat4`].
///
/// Every `set_*` method overwrites all sixteen elements. Only `scale_by`,
/// `rotate_by` and `post_multiply` compose with the current contents.
pub trait Mat4Ext {
    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Create an orthographic projection mapping the box to the canonical clip volume
    fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4;

    /// Reset to identity.
    fn set_identity(&mut self);

    /// Overwrite with a pure translation.
    fn set_translate(&mut self, x: f32, y: f32, z: f32);

    /// Overwrite with a pure translation taken from `v`.
    fn set_translate_vec(&mut self, v: &Vec3);

    /// Overwrite with a pure (non-uniform) scale.
    fn set_scale(&mut self, v: &Vec3);

    /// `this = this x S`: the scale applies before the current contents.
    fn scale_by(&mut self, v: &Vec3);

    /// Overwrite with a rotation about Z, in radians.
    fn set_rotation(&mut self, angle: f32);

    /// `this = this x Rz`: the rotation applies before the current contents.
    fn rotate_by(&mut self, angle: f32);

    /// Multiplies `other` into this matrix so `other` applies after the
    /// current transform. Walking from a child towards its ancestors, calling
    /// this with each ancestor's local matrix embeds the child in parent space.
    fn post_multiply(&mut self, other: &Mat4);

    /// Copy every element from `src`.
    fn set_from(&mut self, src: &Mat4);

    /// Overwrite with an orthographic projection.
    fn set_to_ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32);

    /// Translation column as a vector.
    fn get_translation(&self) -> Vec3;

    /// Transform a point (w = 1) through this matrix.
    fn transform_vec3(&self, v: &Vec3) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn rotation_z(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4::new(
            c, -s, 0.0, 0.0,
            s, c, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        let x = 2.0 / (right - left);
        let y = 2.0 / (top - bottom);
        let z = -2.0 / (far - near);
        let tx = -(right + left) / (right - left);
        let ty = -(top + bottom) / (top - bottom);
        let tz = -(far + near) / (far - near);

        Mat4::new(
            x, 0.0, 0.0, tx,
            0.0, y, 0.0, ty,
            0.0, 0.0, z, tz,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn set_identity(&mut self) {
        self.fill_with_identity();
    }

    fn set_translate(&mut self, x: f32, y: f32, z: f32) {
        *self = Mat4::new_translation(&Vec3::new(x, y, z));
    }

    fn set_translate_vec(&mut self, v: &Vec3) {
        *self = Mat4::new_translation(v);
    }

    fn set_scale(&mut self, v: &Vec3) {
        *self = Mat4::new_nonuniform_scaling(v);
    }

    fn scale_by(&mut self, v: &Vec3) {
        *self *= Mat4::new_nonuniform_scaling(v);
    }

    fn set_rotation(&mut self, angle: f32) {
        *self = Self::rotation_z(angle);
    }

    fn rotate_by(&mut self, angle: f32) {
        *self *= Self::rotation_z(angle);
    }

    fn post_multiply(&mut self, other: &Mat4) {
        *self = other * *self;
    }

    fn set_from(&mut self, src: &Mat4) {
        self.copy_from(src);
    }

    fn set_to_ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        *self = Self::ortho(left, right, bottom, top, near, far);
    }

    fn get_translation(&self) -> Vec3 {
        Vec3::new(self[M03], self[M13], self[M23])
    }

    fn transform_vec3(&self, v: &Vec3) -> Vec3 {
        let p = self * Vec4::new(v.x, v.y, v.z, 1.0);
        Vec3::new(p.x, p.y, p.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity() {
        let mut m = Mat4::new_translation(&Vec3::new(3.0, 4.0, 5.0));
        m.set_identity();
        assert_eq!(m[M00], 1.0);
        assert_eq!(m[M11], 1.0);
        assert_eq!(m[M22], 1.0);
        assert_eq!(m[M33], 1.0);
        assert_eq!(m[M03], 0.0);
        assert_eq!(m[M13], 0.0);
    }

    #[test]
    fn test_translate() {
        let mut m = Mat4::identity();
        m.set_translate_vec(&Vec3::new(5.0, 6.0, 0.0));
        assert_eq!(m[M03], 5.0);
        assert_eq!(m[M13], 6.0);
        assert_eq!(m[M23], 0.0);
    }

    #[test]
    fn test_rotate_unit_vector() {
        let mut m = Mat4::identity();
        m.set_rotation(to_radians(45.0));

        let v = m.transform_vec3(&Vec3::new(1.0, 0.0, 0.0));
        assert!(is_equal(v.x, 0.707_107));
        assert!(is_equal(v.y, 0.707_107));
        assert!(is_equal(v.z, 0.0));
    }

    #[test]
    fn test_setters_overwrite_previous_state() {
        let mut m = Mat4::identity();
        m.set_rotation(1.0);
        m.set_translate(1.0, 2.0, 3.0);
        assert_relative_eq!(m, Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0)));

        m.set_scale(&Vec3::new(2.0, 3.0, 1.0));
        assert_eq!(m[M03], 0.0);
        assert_eq!(m[M00], 2.0);
        assert_eq!(m[M11], 3.0);
    }

    #[test]
    fn test_post_multiply_applies_other_after() {
        // Child one unit along X, parent rotated a quarter turn.
        let mut world = Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0));
        let parent = Mat4::rotation_z(constants::PI / 2.0);
        world.post_multiply(&parent);

        let t = world.get_translation();
        assert_relative_eq!(t.x, 0.0, epsilon = EPSILON);
        assert_relative_eq!(t.y, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_ortho_maps_box_to_clip_volume() {
        let mut m = Mat4::identity();
        m.set_to_ortho(0.0, 800.0, 0.0, 600.0, 0.1, 100.0);

        let lo = m.transform_vec3(&Vec3::new(0.0, 0.0, -0.1));
        let hi = m.transform_vec3(&Vec3::new(800.0, 600.0, -100.0));
        assert_relative_eq!(lo, Vec3::new(-1.0, -1.0, -1.0), epsilon = 1e-4);
        assert_relative_eq!(hi, Vec3::new(1.0, 1.0, 1.0), epsilon = 1e-4);
    }

    #[test]
    fn test_radian_degree_conversion() {
        assert!(is_equal(to_radians(45.0), 0.785_398_2));
        assert!(is_equal(to_degrees(0.785_398_2), 45.0));
    }
}
