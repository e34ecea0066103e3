//! Keeping bodies inside a rectangular world.
//!
//! [`WorldBounds`] answers "is this body visible?" and applies the two classic
//! edge behaviours: wrapping around to the opposite edge, and reflecting off
//! an edge (flipping the velocity component).

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::vector::Vector2D;

/// An edge of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    North,
    East,
    South,
    West,
}

/// A set of [`Side`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Sides(u8);

impl Sides {
    pub const NONE: Self = Self(0);
    pub const NORTH: Self = Self(1);
    pub const EAST: Self = Self(2);
    pub const SOUTH: Self = Self(4);
    pub const WEST: Self = Self(8);
    pub const ALL: Self = Self(15);

    pub fn contains(self, side: Side) -> bool {
        self.0 & Self::from(side).0 != 0
    }
}

impl From<Side> for Sides {
    fn from(side: Side) -> Self {
        match side {
            Side::North => Self::NORTH,
            Side::East => Self::EAST,
            Side::South => Self::SOUTH,
            Side::West => Self::WEST,
        }
    }
}

impl BitOr for Sides {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// World extent, with the origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f64,
    pub height: f64,
}

impl WorldBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Any part of the body is inside the world.
    pub fn is_onscreen(&self, body: &dyn Body) -> bool {
        let p = body.position();
        !(p.x > self.width || p.x < -body.width() || p.y > self.height || p.y < -body.height())
    }

    /// The whole body is inside the world.
    pub fn is_fully_onscreen(&self, body: &dyn Body) -> bool {
        let p = body.position();
        p.x >= 0.0
            && p.y >= 0.0
            && p.x + body.width() <= self.width
            && p.y + body.height() <= self.height
    }

    /// Wrap a body that has left the world entirely through one of `sides`
    /// to the opposite edge.
    ///
    /// Returns the side it escaped through, whether or not that side wraps.
    /// A vertical escape takes precedence in the returned value.
    pub fn wrap(&self, body: &mut dyn Body, sides: Sides) -> Option<Side> {
        let Vector2D { mut x, mut y } = body.position();
        let (w, h) = (body.width(), body.height());
        let mut event = None;
        let mut moved = false;

        if x < -w {
            if sides.contains(Side::West) {
                x = self.width;
                moved = true;
            }
            event = Some(Side::West);
        } else if x > self.width {
            if sides.contains(Side::East) {
                x = -w;
                moved = true;
            }
            event = Some(Side::East);
        }

        if y < -h {
            if sides.contains(Side::North) {
                y = self.height;
                moved = true;
            }
            event = Some(Side::North);
        } else if y > self.height {
            if sides.contains(Side::South) {
                y = -h;
                moved = true;
            }
            event = Some(Side::South);
        }

        if moved {
            body.set_position(Vector2D::new(x, y));
        }
        event
    }

    /// Wrap through `sides_to_wrap`; reflect off every other edge.
    ///
    /// Reflection clamps the body back inside and negates the matching
    /// velocity component as soon as it touches the edge. Wrapping waits until
    /// the body has left entirely. Returns the side of the last event.
    pub fn wrap_or_reflect(&self, body: &mut dyn Body, sides_to_wrap: Sides) -> Option<Side> {
        let Vector2D { mut x, mut y } = body.position();
        let Vector2D { x: mut vx, y: mut vy } = body.velocity();
        let (w, h) = (body.width(), body.height());
        let mut event = None;

        if x < 0.0 {
            if !sides_to_wrap.contains(Side::West) {
                x = 0.0;
                vx = -vx;
                event = Some(Side::West);
            } else if x < -w {
                x = self.width;
                event = Some(Side::West);
            }
        } else if x > self.width - w {
            if !sides_to_wrap.contains(Side::East) {
                x = self.width - w;
                vx = -vx;
                event = Some(Side::East);
            } else if x > self.width {
                x = -w;
                event = Some(Side::East);
            }
        }

        if y < 0.0 {
            if !sides_to_wrap.contains(Side::North) {
                y = 0.0;
                vy = -vy;
                event = Some(Side::North);
            } else if y < -h {
                y = self.height;
                event = Some(Side::North);
            }
        } else if y > self.height - h {
            if !sides_to_wrap.contains(Side::South) {
                y = self.height - h;
                vy = -vy;
                event = Some(Side::South);
            } else if y > self.height {
                y = -h;
                event = Some(Side::South);
            }
        }

        if event.is_some() {
            body.set_velocity(Vector2D::new(vx, vy));
            body.set_position(Vector2D::new(x, y));
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::KinematicBody;

    fn body_at(x: f64, y: f64) -> KinematicBody {
        let mut b = KinematicBody::new(Vector2D::new(x, y), 10.0, 10.0);
        b.state.velocity = Vector2D::new(1.0, 2.0);
        b
    }

    const WORLD: WorldBounds = WorldBounds {
        width: 100.0,
        height: 50.0,
    };

    #[test]
    fn visibility() {
        assert!(WORLD.is_onscreen(&body_at(-5.0, 0.0)));
        assert!(!WORLD.is_fully_onscreen(&body_at(-5.0, 0.0)));
        assert!(!WORLD.is_onscreen(&body_at(-11.0, 0.0)));
        assert!(WORLD.is_fully_onscreen(&body_at(90.0, 40.0)));
        assert!(!WORLD.is_onscreen(&body_at(0.0, 51.0)));
    }

    #[test]
    fn wrap_moves_escaped_bodies_to_the_far_edge() {
        let mut b = body_at(101.0, 10.0);
        assert_eq!(WORLD.wrap(&mut b, Sides::ALL), Some(Side::East));
        assert_eq!(b.position(), Vector2D::new(-10.0, 10.0));

        let mut b = body_at(10.0, -11.0);
        assert_eq!(WORLD.wrap(&mut b, Sides::ALL), Some(Side::North));
        assert_eq!(b.position(), Vector2D::new(10.0, 50.0));
    }

    #[test]
    fn wrap_reports_but_keeps_bodies_on_closed_sides() {
        let mut b = body_at(-20.0, 10.0);
        assert_eq!(WORLD.wrap(&mut b, Sides::EAST | Sides::NORTH), Some(Side::West));
        assert_eq!(b.position(), Vector2D::new(-20.0, 10.0));
        let mut inside = body_at(10.0, 10.0);
        assert_eq!(WORLD.wrap(&mut inside, Sides::ALL), None);
    }

    #[test]
    fn reflect_clamps_and_flips_velocity() {
        let mut b = body_at(95.0, 10.0);
        assert_eq!(WORLD.wrap_or_reflect(&mut b, Sides::NONE), Some(Side::East));
        assert_eq!(b.position(), Vector2D::new(90.0, 10.0));
        assert_eq!(b.velocity(), Vector2D::new(-1.0, 2.0));

        let mut b = body_at(10.0, -3.0);
        assert_eq!(WORLD.wrap_or_reflect(&mut b, Sides::EAST), Some(Side::North));
        assert_eq!(b.position(), Vector2D::new(10.0, 0.0));
        assert_eq!(b.velocity(), Vector2D::new(1.0, -2.0));
    }

    #[test]
    fn wrap_side_waits_until_fully_outside() {
        let mut b = body_at(95.0, 10.0);
        assert_eq!(WORLD.wrap_or_reflect(&mut b, Sides::EAST), None);
        assert_eq!(b.position(), Vector2D::new(95.0, 10.0));

        let mut b = body_at(101.0, 10.0);
        assert_eq!(WORLD.wrap_or_reflect(&mut b, Sides::EAST), Some(Side::East));
        assert_eq!(b.position(), Vector2D::new(-10.0, 10.0));
        assert_eq!(b.velocity(), Vector2D::new(1.0, 2.0));
    }
}
