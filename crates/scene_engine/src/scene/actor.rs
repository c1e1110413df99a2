//! Transformable scene node

use std::sync::atomic::AtomicUsize;

use super::node::default_id;
use super::{ChangeTracking, NodeState};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

static DEFAULT_ACTOR_ID: AtomicUsize = AtomicUsize::new(0);

/// A node with a 4x4 model matrix
///
/// Transform operations post-multiply the current matrix, so a translation
/// applied after a rotation moves along the rotated axes. Every mutator
/// raises the change flag.
#[derive(Debug, Clone)]
pub struct Actor {
    node: NodeState,
    model: Mat4,
}

impl Actor {
    /// Create an identity actor with an auto-generated `actor<N>` identifier
    pub fn new() -> Self {
        Self::with_id(default_id("actor", &DEFAULT_ACTOR_ID))
    }

    /// Create an identity actor with an explicit identifier
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            node: NodeState::with_id(id),
            model: Mat4::identity(),
        }
    }

    /// Builder: start from a given model matrix
    #[must_use]
    pub fn with_model_matrix(mut self, model: Mat4) -> Self {
        self.set_model_matrix(model);
        self
    }

    /// Node identifier
    pub fn id(&self) -> &str {
        self.node.id()
    }

    /// Current model matrix
    pub fn model_matrix(&self) -> &Mat4 {
        &self.model
    }

    /// Replace the model matrix
    pub fn set_model_matrix(&mut self, model: Mat4) {
        self.model = model;
        self.mark_changed();
    }

    /// Translate in the actor's local frame
    pub fn translate(&mut self, translation: &Vec3) {
        self.model *= Mat4::new_translation(translation);
        self.mark_changed();
    }

    /// Rotate `angle` radians around `axis` in the actor's local frame
    pub fn rotate(&mut self, angle: f32, axis: &Vec3) {
        self.model *= Mat4::rotation_axis(angle, axis);
        self.mark_changed();
    }

    /// Scale along each local axis
    pub fn scale(&mut self, factors: &Vec3) {
        self.model *= Mat4::new_nonuniform_scaling(factors);
        self.mark_changed();
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeTracking for Actor {
    fn node_state(&self) -> &NodeState {
        &self.node
    }

    fn node_state_mut(&mut self) -> &mut NodeState {
        &mut self.node
    }
}
