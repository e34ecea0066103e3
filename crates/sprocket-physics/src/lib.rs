//! Sprocket Physics -- Axis-aligned bodies, layers, collision handlers and a
//! single-pass physics step.
//!
//! The physics core is deliberately small. Each call to
//! [`VanillaPhysicsEngine::apply_laws_of_physics`](engine::VanillaPhysicsEngine::apply_laws_of_physics)
//! integrates every body of every managed layer, then runs every registered
//! collision handler once. Handlers pair up two layers, find overlapping
//! bounding boxes, and hand each pair to a game-specific rule. Bodies the rule
//! spawns are staged and only committed after the scan.
//!
//! # Quick Start
//!
//! ```
//! use sprocket_physics::prelude::*;
//!
//! let mut engine = VanillaPhysicsEngine::new();
//!
//! let mut balls = BodyLayer::iterative_update();
//! let mut ball = KinematicBody::new(Vector2D::new(0.0, 0.0), 10.0, 10.0);
//! ball.set_velocity(Vector2D::new(1.0, 0.0));
//! balls.add(ball);
//! let balls = engine.manage_new_layer(balls);
//!
//! let mut walls = BodyLayer::no_update();
//! walls.add(KinematicBody::new(Vector2D::new(12.0, 0.0), 5.0, 10.0));
//! let walls = engine.manage_new_layer(walls);
//!
//! let handler = RectangleCollisionHandler::new(
//!     "ball-vs-wall",
//!     balls.clone(),
//!     walls,
//!     |ball: &mut KinematicBody,
//!      wall: &mut KinematicBody,
//!      _: &mut StagedAdditions<KinematicBody, KinematicBody>|
//!      -> anyhow::Result<()> {
//!         let back = ball.left_colliding_distance(&*wall);
//!         let p = ball.position();
//!         ball.set_position(Vector2D::new(p.x - back, p.y));
//!         ball.set_velocity(-ball.velocity());
//!         Ok(())
//!     },
//! )?;
//! engine.register_collision_handler(handler);
//!
//! let report = engine.apply_laws_of_physics(5)?;
//! assert_eq!(report.scan.collisions, 1);
//! assert!(balls.borrow().get(0).unwrap().velocity().x < 0.0);
//! # Ok::<(), PhysicsError>(())
//! ```

#![deny(unsafe_code)]

pub mod aabb;
pub mod body;
pub mod bounds;
pub mod collision;
pub mod engine;
pub mod geometry;
pub mod layer;
pub mod rectangle;
pub mod sphere;
pub mod vector;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by a physics step.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    /// A layer was already borrowed when the engine or a handler needed it,
    /// e.g. because the application held a `borrow()` across the step.
    #[error("layer already borrowed during {context}")]
    LayerBusy {
        /// What was trying to borrow the layer.
        context: String,
    },

    /// A collision handler was built over the same layer twice.
    #[error("collision handler `{handler}` was given the same layer twice")]
    AliasedLayers {
        /// Handler name.
        handler: String,
    },

    /// A collision rule returned an error; the rest of the scan was skipped.
    #[error("collision rule in handler `{handler}` failed: {source}")]
    CollisionRule {
        /// Handler name.
        handler: String,
        /// The rule's error.
        source: anyhow::Error,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::aabb::{min_separation, Axis, Quadrant, Separation};
    pub use crate::body::{Body, BodyState, KinematicBody};
    pub use crate::bounds::{Side, Sides, WorldBounds};
    pub use crate::collision::{
        CollisionHandler, CollisionRule, RectangleCollisionHandler, ScanReport, StagedAdditions,
    };
    pub use crate::engine::{StepReport, VanillaPhysicsEngine};
    pub use crate::geometry::Rect;
    pub use crate::layer::{BodyLayer, BodyRenderer, LayerHandle, ManagedLayer, UpdatePolicy};
    pub use crate::rectangle::{RectangleBody, RectangleTolerances};
    pub use crate::sphere::{SphereBody, SphereShape};
    pub use crate::vector::Vector2D;
    pub use crate::PhysicsError;
}
