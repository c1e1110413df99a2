//! Keyboard/pointer style actor controller
//!
//! Input-to-movement mapping belongs to the windowing layer; the controller
//! only consumes the resulting [`Movement`] flags and pointer deltas.

use bitflags::bitflags;

use super::{NodeId, SceneGraph, SceneResult};
use crate::foundation::math::{utils, Vec3};

bitflags! {
    /// Active movement directions
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Movement: u32 {
        /// Along the movement direction
        const FORWARD = 0x1;
        /// Against the movement direction
        const BACKWARD = 0x2;
        /// Along the left vector
        const LEFT = 0x4;
        /// Against the left vector
        const RIGHT = 0x8;
    }
}

/// Drives the transform of one actor in a [`SceneGraph`]
#[derive(Debug, Clone)]
pub struct ActorController {
    actor: Option<NodeId>,
    movement: Movement,
    movement_direction: Vec3,
    movement_speed: f32,
    rotation_speed: f32,
}

impl ActorController {
    /// Create a controller with no actor attached
    ///
    /// # Arguments
    /// * `movement_speed` - Units per second
    /// * `rotation_speed` - Degrees per unit of pointer movement
    pub fn new(movement_speed: f32, rotation_speed: f32) -> Self {
        Self {
            actor: None,
            movement: Movement::empty(),
            movement_direction: Vec3::new(0.0, 0.0, 1.0),
            movement_speed,
            rotation_speed,
        }
    }

    /// Controlled actor
    pub fn actor(&self) -> Option<NodeId> {
        self.actor
    }

    /// Attach or detach the controlled actor
    pub fn set_actor(&mut self, actor: Option<NodeId>) {
        self.actor = actor;
    }

    /// Active movement flags
    pub fn movement(&self) -> Movement {
        self.movement
    }

    /// Replace the active movement flags
    pub fn set_movement(&mut self, movement: Movement) {
        self.movement = movement;
    }

    /// Local direction `FORWARD` moves along
    pub fn movement_direction(&self) -> &Vec3 {
        &self.movement_direction
    }

    /// Units per second
    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    /// Set units per second
    pub fn set_movement_speed(&mut self, speed: f32) {
        self.movement_speed = speed;
    }

    /// Degrees per unit of pointer movement
    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    /// Set degrees per unit of pointer movement
    pub fn set_rotation_speed(&mut self, speed: f32) {
        self.rotation_speed = speed;
    }

    /// Translate the actor according to the active movement flags
    ///
    /// No-op without an actor or without movement.
    ///
    /// # Errors
    /// [`SceneError::NodeNotFound`](super::SceneError::NodeNotFound) or
    /// [`SceneError::NotAnActor`](super::SceneError::NotAnActor) when the
    /// attached handle does not resolve to an actor.
    pub fn update(&self, graph: &mut SceneGraph, delta_time: f32) -> SceneResult<()> {
        let Some(id) = self.actor else {
            return Ok(());
        };
        if self.movement.is_empty() {
            return Ok(());
        }

        let speed = delta_time * self.movement_speed;
        let left = self.movement_direction.cross(&Vec3::y());

        let mut translation = Vec3::zeros();
        if self.movement.contains(Movement::FORWARD) {
            translation += self.movement_direction * speed;
        }
        if self.movement.contains(Movement::BACKWARD) {
            translation -= self.movement_direction * speed;
        }
        if self.movement.contains(Movement::LEFT) {
            translation += left * speed;
        }
        if self.movement.contains(Movement::RIGHT) {
            translation -= left * speed;
        }

        graph.actor_mut(id)?.translate(&translation);
        Ok(())
    }

    /// Apply a pointer delta: `yaw` turns around X, `pitch` around Y
    ///
    /// No-op without an actor.
    ///
    /// # Errors
    /// Same as [`ActorController::update`].
    pub fn rotate(&self, graph: &mut SceneGraph, pitch: f32, yaw: f32) -> SceneResult<()> {
        let Some(id) = self.actor else {
            return Ok(());
        };

        let actor = graph.actor_mut(id)?;
        actor.rotate(utils::deg_to_rad(yaw * self.rotation_speed), &Vec3::x());
        actor.rotate(utils::deg_to_rad(-pitch * self.rotation_speed), &Vec3::y());
        Ok(())
    }
}
