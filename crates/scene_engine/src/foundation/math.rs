//! Math utilities and types
//!
//! Provides the fundamental math types used by scene nodes and uniform data.

pub use nalgebra::{Matrix4, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Size in bytes of one 4x4 `f32` matrix as laid out in a uniform buffer
pub const MAT4_SIZE: usize = std::mem::size_of::<[f32; 16]>();

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}

/// Extension trait for Mat4 with the post-multiplying transform helpers
/// actors are built on
pub trait Mat4Ext {
    /// Rotation matrix of `angle` radians around an arbitrary axis.
    ///
    /// A zero-length axis yields the identity.
    fn rotation_axis(angle: f32, axis: &Vec3) -> Mat4;

    /// Right-handed perspective projection (depth in `[-1, 1]`) with the Y axis
    /// flipped for Vulkan clip space
    fn vulkan_perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Column-major `f32` view of the matrix, the layout shaders expect
    fn as_column_slice(&self) -> &[f32];
}

impl Mat4Ext for Mat4 {
    fn rotation_axis(angle: f32, axis: &Vec3) -> Mat4 {
        Unit::try_new(*axis, f32::EPSILON)
            .map_or_else(Mat4::identity, |axis| Mat4::from_axis_angle(&axis, angle))
    }

    fn vulkan_perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let projection = nalgebra::Perspective3::new(aspect, fov_y, near, far).to_homogeneous();

        // Vulkan's clip space Y points down
        let mut clip = Mat4::identity();
        clip[(1, 1)] = -1.0;

        clip * projection
    }

    fn as_column_slice(&self) -> &[f32] {
        self.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_axis_zero_axis_is_identity() {
        let m = Mat4::rotation_axis(1.0, &Vec3::zeros());
        assert_eq!(m, Mat4::identity());
    }

    #[test]
    fn test_rotation_axis_quarter_turn() {
        let m = Mat4::rotation_axis(constants::PI * 0.5, &Vec3::new(0.0, 0.0, 1.0));
        let p = m.transform_vector(&Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_vulkan_perspective_flips_y() {
        let gl = nalgebra::Perspective3::new(1.5, 1.0, 0.1, 100.0).to_homogeneous();
        let vk = Mat4::vulkan_perspective(1.0, 1.5, 0.1, 100.0);
        assert_relative_eq!(vk[(1, 1)], -gl[(1, 1)]);
        assert_relative_eq!(vk[(0, 0)], gl[(0, 0)]);
        assert_relative_eq!(vk[(2, 3)], gl[(2, 3)]);
    }

    #[test]
    fn test_column_slice_layout() {
        let m = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));
        let cols = m.as_column_slice();
        assert_eq!(cols.len(), 16);
        assert_eq!(&cols[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(MAT4_SIZE, 64);
    }
}
