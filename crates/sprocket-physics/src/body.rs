//! Bodies: anything with a position, velocity and size that the physics
//! engine advances each frame.
//!
//! Game objects embed a [`BodyState`] and implement [`Body`] by exposing it
//! and supplying an `update` step. Everything else (position accessors,
//! activation, center helpers) comes from provided trait methods.

use serde::{Deserialize, Serialize};

use crate::vector::Vector2D;

/// Kinematic state shared by all bodies.
///
/// Bodies are deactivated rather than destroyed; an inactive body stays in its
/// layer but is skipped by collision scans and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    /// Top-left corner.
    pub position: Vector2D,
    /// Units per millisecond.
    pub velocity: Vector2D,
    pub active: bool,
    pub width: f64,
    pub height: f64,
}

impl BodyState {
    /// A motionless, active body at `position`.
    pub fn new(position: Vector2D, width: f64, height: f64) -> Self {
        Self {
            position,
            velocity: Vector2D::ZERO,
            active: true,
            width,
            height,
        }
    }

    /// Builder: set the initial velocity.
    pub fn with_velocity(mut self, velocity: Vector2D) -> Self {
        self.velocity = velocity;
        self
    }
}

/// A simulated object.
pub trait Body {
    fn state(&self) -> &BodyState;

    fn state_mut(&mut self) -> &mut BodyState;

    /// Advance the body by `delta_ms` milliseconds of game time.
    fn update(&mut self, delta_ms: i64);

    fn position(&self) -> Vector2D {
        self.state().position
    }

    fn set_position(&mut self, position: Vector2D) {
        self.state_mut().position = position;
    }

    fn velocity(&self) -> Vector2D {
        self.state().velocity
    }

    fn set_velocity(&mut self, velocity: Vector2D) {
        self.state_mut().velocity = velocity;
    }

    fn is_active(&self) -> bool {
        self.state().active
    }

    fn set_activation(&mut self, active: bool) {
        self.state_mut().active = active;
    }

    fn width(&self) -> f64 {
        self.state().width
    }

    fn height(&self) -> f64 {
        self.state().height
    }

    /// Center of the body's extent.
    fn center_position(&self) -> Vector2D {
        let s = self.state();
        Vector2D::new(s.position.x + s.width / 2.0, s.position.y + s.height / 2.0)
    }

    /// Move the body so its center lands on `center`.
    fn set_center_position(&mut self, center: Vector2D) {
        let s = self.state_mut();
        s.position = Vector2D::new(center.x - s.width / 2.0, center.y - s.height / 2.0);
    }
}

impl<B: Body + ?Sized> Body for Box<B> {
    fn state(&self) -> &BodyState {
        (**self).state()
    }

    fn state_mut(&mut self) -> &mut BodyState {
        (**self).state_mut()
    }

    fn update(&mut self, delta_ms: i64) {
        (**self).update(delta_ms)
    }
}

/// A body that integrates its velocity and nothing else.
///
/// Useful for projectiles, scenery and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    pub state: BodyState,
}

impl KinematicBody {
    pub fn new(position: Vector2D, width: f64, height: f64) -> Self {
        Self {
            state: BodyState::new(position, width, height),
        }
    }
}

impl Body for KinematicBody {
    fn state(&self) -> &BodyState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BodyState {
        &mut self.state
    }

    fn update(&mut self, delta_ms: i64) {
        let step = self.state.velocity.scale(delta_ms as f64);
        self.state.position = self.state.position.translate(step);
    }
}
