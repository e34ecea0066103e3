//! Circular bodies.
//!
//! A sphere body is a [`Body`] whose collision shape is the circle centred in
//! its extent. [`SphereShape::fit`] squares the extent to the larger side, so
//! the radius is `max(width, height) / 2` and the unsquared art is recorded as
//! an offset inside the square. Contact between two spheres is a center
//! distance test and needs no bounding boxes.

use serde::{Deserialize, Serialize};

use crate::body::{Body, BodyState};
use crate::vector::Vector2D;

/// Radius, drawing offset and rotation of a circular body.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SphereShape {
    pub radius: f64,
    /// Where the unsquared extent sits inside the square one.
    pub offset: Vector2D,
    /// Radians, used by renderers only.
    pub rotation: f64,
}

impl SphereShape {
    /// Square `state`'s extent to its larger side and return the circle
    /// inscribed in it.
    pub fn fit(state: &mut BodyState) -> Self {
        let (half_w, half_h) = (state.width / 2.0, state.height / 2.0);
        let radius = half_w.max(half_h);
        let side = state.width.max(state.height);
        state.width = side;
        state.height = side;
        Self {
            radius,
            offset: Vector2D::new(radius - half_w, radius - half_h),
            rotation: 0.0,
        }
    }
}

/// A body that collides as a circle.
pub trait SphereBody: Body {
    fn shape(&self) -> &SphereShape;

    fn shape_mut(&mut self) -> &mut SphereShape;

    fn radius(&self) -> f64 {
        self.shape().radius
    }

    fn rotation(&self) -> f64 {
        self.shape().rotation
    }

    fn set_rotation(&mut self, radians: f64) {
        self.shape_mut().rotation = radians;
    }

    /// Centers no farther apart than the sum of the radii. Touching counts.
    fn intersects_sphere(&self, other: &dyn SphereBody) -> bool {
        let reach = self.radius() + other.radius();
        self.center_position().distance2(other.center_position()) <= reach * reach
    }
}

impl<S: SphereBody + ?Sized> SphereBody for Box<S> {
    fn shape(&self) -> &SphereShape {
        (**self).shape()
    }

    fn shape_mut(&mut self) -> &mut SphereShape {
        (**self).shape_mut()
    }
}
