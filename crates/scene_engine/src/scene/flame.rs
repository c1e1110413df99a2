//! # Flame Particle Emitter
//!
//! A CPU-simulated particle system. Particles spawn at random points inside a
//! sphere around the emitter, drift along Y, fade in and shrink until their
//! alpha passes a threshold, then respawn.
//!
//! ## Design
//!
//! The random source is a seeded [`StdRng`] owned by the emitter, so two flames
//! built from the same [`FlameParams`] evolve identically.

use std::sync::atomic::AtomicUsize;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::node::default_id;
use super::{Actor, ChangeTracking, NodeState};
use crate::foundation::math::{constants, Vec3, Vec4};

static DEFAULT_FLAME_ID: AtomicUsize = AtomicUsize::new(0);

/// Vertical drift multiplier applied to particle velocity each update
const DRIFT_SCALE: f32 = 3.5;

/// Emitter tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlameParams {
    /// Number of simulated particles
    pub particle_count: usize,
    /// Radius of the spawn sphere
    pub flame_radius: f32,
    /// Alpha gained per second
    pub alpha_damping: f32,
    /// Size lost per second
    pub size_damping: f32,
    /// Alpha above which a particle respawns
    pub alpha_threshold: f32,
    /// Center of the spawn sphere
    pub emitter_position: Vec3,
    /// Lower velocity bound (only Y is used)
    pub min_velocity: Vec3,
    /// Upper velocity bound (only Y is used)
    pub max_velocity: Vec3,
    /// Random seed
    pub seed: u64,
}

impl Default for FlameParams {
    fn default() -> Self {
        Self {
            particle_count: 512,
            flame_radius: 0.5,
            alpha_damping: 0.6,
            size_damping: 0.3,
            alpha_threshold: 1.0,
            emitter_position: Vec3::zeros(),
            min_velocity: Vec3::new(0.0, 0.4, 0.0),
            max_velocity: Vec3::new(0.0, 1.2, 0.0),
            seed: 0x5EED,
        }
    }
}

/// One simulated particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position relative to the flame actor
    pub position: Vec3,
    /// RGBA tint
    pub color: Vec4,
    /// Opacity; grows over the particle's life
    pub alpha: f32,
    /// Billboard size
    pub size: f32,
    /// Billboard rotation in radians
    pub rotation: f32,
    /// Velocity; only Y is non-zero
    pub velocity: Vec3,
    /// Radians per second
    pub rotation_speed: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            color: Vec4::repeat(1.0),
            alpha: 0.0,
            size: 1.0,
            rotation: 0.0,
            velocity: Vec3::zeros(),
            rotation_speed: 0.0,
        }
    }
}

/// Particle flame node
#[derive(Debug, Clone)]
pub struct Flame {
    actor: Actor,
    params: FlameParams,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl Flame {
    /// Create a flame with an auto-generated `flame<N>` identifier
    pub fn new(params: FlameParams) -> Self {
        Self::with_id(default_id("flame", &DEFAULT_FLAME_ID), params)
    }

    /// Create a flame with an explicit identifier
    pub fn with_id(id: impl Into<String>, params: FlameParams) -> Self {
        let mut flame = Self {
            actor: Actor::with_id(id),
            particles: vec![Particle::default(); params.particle_count],
            rng: StdRng::seed_from_u64(params.seed),
            params,
        };

        // Particles near the vertical edges of the sphere start more faded
        for i in 0..flame.particles.len() {
            let mut particle = flame.spawn_particle();
            particle.alpha = if flame.params.flame_radius > 0.0 {
                1.0 - (particle.position.y.abs() / flame.params.flame_radius * 2.0)
            } else {
                1.0
            };
            flame.particles[i] = particle;
        }

        log::debug!(
            "Flame '{}' spawned {} particles (radius {})",
            flame.id(),
            flame.particles.len(),
            flame.params.flame_radius
        );

        flame
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

    /// Emitter parameters
    pub fn params(&self) -> &FlameParams {
        &self.params
    }

    /// Current particle states
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Advance the simulation by `delta_time` seconds
    ///
    /// Always marks the node changed, even for an empty emitter.
    pub fn update(&mut self, delta_time: f32) {
        let alpha_damping = self.params.alpha_damping;
        let size_damping = self.params.size_damping;
        let alpha_threshold = self.params.alpha_threshold;

        for i in 0..self.particles.len() {
            let particle = &mut self.particles[i];
            particle.position.y -= particle.velocity.y * delta_time * DRIFT_SCALE;
            particle.alpha += delta_time * alpha_damping;
            particle.size -= delta_time * size_damping;
            particle.rotation += delta_time * particle.rotation_speed;

            if particle.alpha > alpha_threshold {
                self.particles[i] = self.spawn_particle();
            }
        }

        self.mark_changed();
    }

    fn spawn_particle(&mut self) -> Particle {
        let min_y = self.params.min_velocity.y;
        let max_y = self.params.max_velocity.y;
        let radius = self.params.flame_radius;

        let velocity = Vec3::new(0.0, min_y + self.rnd(max_y - min_y), 0.0);
        let alpha = self.rnd(0.75);
        let size = 1.0 + self.rnd(0.5);
        let rotation = self.rnd(constants::TAU);
        let rotation_speed = self.rnd(2.0) - self.rnd(2.0);

        let theta = self.rnd(constants::TAU);
        let phi = self.rnd(constants::PI) - constants::PI / 2.0;
        let r = self.rnd(radius);

        let position = Vec3::new(
            r * theta.cos() * phi.cos(),
            r * phi.sin(),
            r * theta.sin() * phi.cos(),
        ) + self.params.emitter_position;

        Particle {
            position,
            color: Vec4::repeat(1.0),
            alpha,
            size,
            rotation,
            velocity,
            rotation_speed,
        }
    }

    /// Uniform sample in `[0, range)`; zero for an empty or negative range
    fn rnd(&mut self, range: f32) -> f32 {
        if range > 0.0 {
            self.rng.gen_range(0.0..range)
        } else {
            0.0
        }
    }
}

impl ChangeTracking for Flame {
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
    use approx::assert_relative_eq;

    fn params(count: usize) -> FlameParams {
        FlameParams {
            particle_count: count,
            ..FlameParams::default()
        }
    }

    #[test]
    fn test_particles_spawn_inside_sphere() {
        let params = FlameParams {
            emitter_position: Vec3::new(1.0, 2.0, 3.0),
            ..params(64)
        };
        let flame = Flame::with_id("flame", params.clone());
        assert_eq!(flame.particles().len(), 64);
        for particle in flame.particles() {
            let offset = particle.position - params.emitter_position;
            assert!(offset.norm() <= params.flame_radius + 1e-5);
            assert!(particle.size >= 1.0 && particle.size <= 1.5);
            assert!(particle.velocity.y >= params.min_velocity.y);
            assert!(particle.velocity.y <= params.max_velocity.y);
        }
    }

    #[test]
    fn test_update_marks_changed() {
        let mut flame = Flame::with_id("flame", params(0));
        flame.mark_unchanged();
        flame.update(0.016);
        assert!(flame.is_changed());
    }

    #[test]
    fn test_update_moves_and_fades() {
        let params = FlameParams {
            alpha_threshold: 100.0,
            ..params(8)
        };
        let mut flame = Flame::with_id("flame", params.clone());
        let before = flame.particles().to_vec();
        let dt = 0.1;
        flame.update(dt);

        for (old, new) in before.iter().zip(flame.particles()) {
            let drifted = old.position.y - old.velocity.y * dt * DRIFT_SCALE;
            assert_relative_eq!(new.position.y, drifted, epsilon = 1e-5);
            assert_relative_eq!(new.alpha, old.alpha + dt * params.alpha_damping, epsilon = 1e-5);
            assert_relative_eq!(new.size, old.size - dt * params.size_damping, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_particles_respawn_past_threshold() {
        let params = FlameParams {
            alpha_threshold: 0.0,
            alpha_damping: 10.0,
            ..params(16)
        };
        let mut flame = Flame::with_id("flame", params);
        flame.update(1.0);
        // A fresh particle's alpha comes from [0, 0.75)
        assert!(flame.particles().iter().all(|p| p.alpha < 0.75));
    }

    #[test]
    fn test_same_seed_same_simulation() {
        let mut a = Flame::with_id("a", params(32));
        let mut b = Flame::with_id("b", params(32));
        a.update(0.5);
        b.update(0.5);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_zero_radius_spawns_at_emitter() {
        let params = FlameParams {
            flame_radius: 0.0,
            ..params(4)
        };
        let flame = Flame::with_id("flame", params);
        for particle in flame.particles() {
            assert_eq!(particle.position, Vec3::zeros());
            assert_relative_eq!(particle.alpha, 1.0);
        }
    }
}
