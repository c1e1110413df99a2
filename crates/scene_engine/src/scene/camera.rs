//! # Perspective Camera
//!
//! A camera is an [`Actor`] whose model matrix acts as the view transform,
//! plus a projection matrix fixed at construction.

use std::sync::atomic::AtomicUsize;

use super::node::default_id;
use super::{Actor, ChangeTracking, NodeState, SceneError, SceneResult};
use crate::foundation::math::{utils, Mat4, Mat4Ext};

static DEFAULT_CAMERA_ID: AtomicUsize = AtomicUsize::new(0);

/// Perspective camera node
///
/// The projection is right-handed with depth in `[-1, 1]` and Y flipped for
/// Vulkan clip space. It never changes after construction; only the actor
/// transform moves the camera.
#[derive(Debug, Clone)]
pub struct Camera {
    actor: Actor,
    fov: f32,
    aspect_ratio: f32,
    znear: f32,
    zfar: f32,
    projection: Mat4,
}

impl Camera {
    /// Create a camera with an auto-generated `camera<N>` identifier
    ///
    /// # Arguments
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect_ratio` - Viewport width / height
    /// * `znear` - Near clipping plane distance (must be > 0)
    /// * `zfar` - Far clipping plane distance (must be > `znear`)
    ///
    /// # Errors
    /// [`SceneError::InvalidCamera`] for a degenerate projection.
    pub fn perspective(
        fov_degrees: f32,
        aspect_ratio: f32,
        znear: f32,
        zfar: f32,
    ) -> SceneResult<Self> {
        Self::with_id(
            default_id("camera", &DEFAULT_CAMERA_ID),
            utils::deg_to_rad(fov_degrees),
            aspect_ratio,
            znear,
            zfar,
        )
    }

    /// Create a camera with an explicit identifier; `fov` is in radians
    ///
    /// # Errors
    /// [`SceneError::InvalidCamera`] unless `0 < fov < π`, `aspect_ratio > 0`
    /// and `0 < znear < zfar`, all finite.
    pub fn with_id(
        id: impl Into<String>,
        fov: f32,
        aspect_ratio: f32,
        znear: f32,
        zfar: f32,
    ) -> SceneResult<Self> {
        let id = id.into();
        let invalid = |reason: String| SceneError::InvalidCamera {
            id: id.clone(),
            reason,
        };

        if !(fov.is_finite() && fov > 0.0 && fov < std::f32::consts::PI) {
            return Err(invalid(format!("field of view {fov} rad outside (0, π)")));
        }
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return Err(invalid(format!("aspect ratio {aspect_ratio} must be positive")));
        }
        if !(znear.is_finite() && zfar.is_finite() && znear > 0.0 && zfar > znear) {
            return Err(invalid(format!(
                "clip planes near {znear}, far {zfar} need 0 < near < far"
            )));
        }

        let projection = Mat4::vulkan_perspective(fov, aspect_ratio, znear, zfar);
        let actor = Actor::with_id(id);

        log::debug!(
            "Camera '{}' projection (fov {:.3} rad, aspect {:.3}, near {}, far {}): {:?}",
            actor.id(),
            fov,
            aspect_ratio,
            znear,
            zfar,
            projection
        );

        Ok(Self {
            actor,
            fov,
            aspect_ratio,
            znear,
            zfar,
            projection,
        })
    }

    /// Node identifier
    pub fn id(&self) -> &str {
        self.actor.id()
    }

    /// Underlying actor
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Mutable underlying actor
    pub fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    /// Projection matrix
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    /// View matrix: the camera actor's model matrix
    pub fn view_matrix(&self) -> &Mat4 {
        self.actor.model_matrix()
    }

    /// Vertical field of view in radians
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Aspect ratio (width / height)
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Near clipping plane distance
    pub fn znear(&self) -> f32 {
        self.znear
    }

    /// Far clipping plane distance
    pub fn zfar(&self) -> f32 {
        self.zfar
    }
}

impl ChangeTracking for Camera {
    fn node_state(&self) -> &NodeState {
        self.actor.node_state()
    }

    fn node_state_mut(&mut self) -> &mut NodeState {
        self.actor.node_state_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_perspective_converts_degrees() {
        let camera = Camera::perspective(90.0, 1.0, 0.1, 100.0).expect("camera");
        assert_relative_eq!(camera.fov(), std::f32::consts::FRAC_PI_2);
        // tan(45°) == 1, so the focal scale is 1 and Y is flipped
        assert_relative_eq!(camera.projection_matrix()[(0, 0)], 1.0, epsilon = 1e-6);
        assert_relative_eq!(camera.projection_matrix()[(1, 1)], -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_projection_is_fixed_when_moving() {
        let mut camera = Camera::with_id("main", 1.0, 1.5, 0.1, 50.0).expect("camera");
        let before = *camera.projection_matrix();
        camera.actor_mut().translate(&Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(before, *camera.projection_matrix());
        assert!(camera.is_changed());
        assert_relative_eq!(camera.view_matrix()[(2, 3)], -5.0);
    }

    #[test]
    fn test_accessors() {
        let camera = Camera::with_id("main", 1.0, 1.5, 0.1, 50.0).expect("camera");
        assert_eq!(camera.id(), "main");
        assert_relative_eq!(camera.aspect_ratio(), 1.5);
        assert_relative_eq!(camera.znear(), 0.1);
        assert_relative_eq!(camera.zfar(), 50.0);
    }

    #[test]
    fn test_degenerate_projection_is_rejected() {
        // Coincident clip planes and a zero aspect ratio
        let cases = [
            Camera::with_id("c", 1.0, 1.0, 1.0, 1.0),
            Camera::with_id("c", 1.0, 0.0, 0.1, 10.0),
            Camera::with_id("c", 1.0, 1.0, 0.0, 10.0),
            Camera::with_id("c", 1.0, 1.0, 5.0, 1.0),
            Camera::with_id("c", 0.0, 1.0, 0.1, 10.0),
            Camera::with_id("c", 1.0, f32::NAN, 0.1, 10.0),
            Camera::perspective(200.0, 1.0, 0.1, 10.0),
        ];
        for result in cases {
            assert!(matches!(result, Err(SceneError::InvalidCamera { .. })));
        }
    }
}
