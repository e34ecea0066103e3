//! Axis-aligned rectangular bodies and their contact helpers.
//!
//! The side predicates and colliding distances are the building blocks of
//! platformer-style collision rules: "is the player standing on this block?",
//! "how far must it move left to stop overlapping?". Distances carry a small
//! bias ([`RectangleTolerances`]) so a corrected body does not re-trigger the
//! same contact on the next frame.

use serde::{Deserialize, Serialize};

use crate::body::{Body, KinematicBody};
use crate::geometry::Rect;

/// Tolerances used by [`RectangleBody`] contact helpers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectangleTolerances {
    /// Maximum vertical overlap still treated as resting on top of (or
    /// hanging below) another body.
    pub contact_offset: f64,
    /// Bias added to horizontal colliding distances.
    pub side_bounce_off: f64,
    /// Bias added to vertical colliding distances.
    pub vertical_epsilon: f64,
}

impl Default for RectangleTolerances {
    fn default() -> Self {
        Self {
            contact_offset: 10.0,
            side_bounce_off: 0.2,
            vertical_epsilon: 1e-5,
        }
    }
}

/// A body whose collision shape is its axis-aligned extent.
///
/// All predicates are evaluated from `self`'s point of view against `other`,
/// using `self`'s tolerances.
pub trait RectangleBody: Body {
    fn tolerances(&self) -> RectangleTolerances {
        RectangleTolerances::default()
    }

    /// The body's current extent.
    fn bounding_box(&self) -> Rect {
        Rect::from_origin(self.position(), self.width(), self.height())
    }

    /// `self` straddles `other`'s left edge.
    ///
    /// This is an overlap test, not a side-of test: any overlap that crosses
    /// `other`'s left edge counts, however deep. `(0, 0, 10, 10)` against
    /// `(5, 0, 10, 10)` is on the left side. Use
    /// [`min_separation`](crate::aabb::min_separation) when the shallowest
    /// axis matters.
    fn is_on_left_side(&self, other: &dyn Body) -> bool {
        let (a, b) = (self.bounding_box(), extent(other));
        a.max_x() > b.x && a.x < b.x
    }

    /// `self` straddles `other`'s right edge. Same overlap semantics as
    /// [`is_on_left_side`](Self::is_on_left_side).
    fn is_on_right_side(&self, other: &dyn Body) -> bool {
        let (a, b) = (self.bounding_box(), extent(other));
        a.x < b.max_x() && a.max_x() > b.max_x()
    }

    /// `self` straddles `other`'s top edge by less than the contact offset.
    fn is_on_top_side(&self, other: &dyn Body) -> bool {
        let (a, b) = (self.bounding_box(), extent(other));
        a.max_y() > b.y && a.y < b.y && a.max_y() - b.y < self.tolerances().contact_offset
    }

    /// `self` straddles `other`'s bottom edge by less than the contact offset.
    fn is_on_bottom_side(&self, other: &dyn Body) -> bool {
        let (a, b) = (self.bounding_box(), extent(other));
        a.y < b.max_y() && a.max_y() > b.max_y() && b.max_y() - a.y < self.tolerances().contact_offset
    }

    /// How far `self` must move left to clear `other`.
    fn left_colliding_distance(&self, other: &dyn Body) -> f64 {
        let (a, b) = (self.bounding_box(), extent(other));
        a.max_x() - b.x + self.tolerances().side_bounce_off
    }

    /// How far `self` must move right to clear `other`.
    fn right_colliding_distance(&self, other: &dyn Body) -> f64 {
        let (a, b) = (self.bounding_box(), extent(other));
        b.max_x() - a.x + self.tolerances().side_bounce_off
    }

    /// How far `self` must move up to clear `other`.
    fn top_colliding_distance(&self, other: &dyn Body) -> f64 {
        let (a, b) = (self.bounding_box(), extent(other));
        a.max_y() - b.y + self.tolerances().vertical_epsilon
    }

    /// How far `self` must move down to clear `other`.
    fn bottom_colliding_distance(&self, other: &dyn Body) -> f64 {
        let (a, b) = (self.bounding_box(), extent(other));
        b.max_y() - a.y + self.tolerances().vertical_epsilon
    }
}

fn extent(body: &dyn Body) -> Rect {
    Rect::from_origin(body.position(), body.width(), body.height())
}

impl<R: RectangleBody + ?Sized> RectangleBody for Box<R> {
    fn tolerances(&self) -> RectangleTolerances {
        (**self).tolerances()
    }
}

impl RectangleBody for KinematicBody {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aabb::{min_separation, Axis};
    use crate::body::BodyState;
    use crate::vector::Vector2D;

    const EPS: f64 = 1e-9;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> KinematicBody {
        KinematicBody::new(Vector2D::new(x, y), w, h)
    }

    struct Tight {
        state: BodyState,
    }

    impl Body for Tight {
        fn state(&self) -> &BodyState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut BodyState {
            &mut self.state
        }
        fn update(&mut self, _delta_ms: i64) {}
    }

    impl RectangleBody for Tight {
        fn tolerances(&self) -> RectangleTolerances {
            RectangleTolerances {
                contact_offset: 1.0,
                ..RectangleTolerances::default()
            }
        }
    }

    // -- 1. horizontal contact ---------------------------------------------

    #[test]
    fn overlapping_from_the_left() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 0.0, 10.0, 10.0);
        assert!(a.is_on_left_side(&b));
        assert!(!b.is_on_left_side(&a));
        assert!(b.is_on_right_side(&a));
        assert!(!a.is_on_right_side(&b));
    }

    #[test]
    fn deep_overlap_still_reads_as_left_side() {
        // Side predicates report which edge is crossed, not the shallow axis.
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(1.0, 2.0, 10.0, 10.0);
        assert!(a.is_on_left_side(&b));
        assert!(b.is_on_right_side(&a));
        // The boxes overlap 9 across and 8 down, so the shallow axis is Y.
        let sep = min_separation(&a.bounding_box(), &b.bounding_box());
        assert_eq!(sep.axis, Axis::Y);
    }

    #[test]
    fn horizontal_correction_is_biased() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 0.0, 10.0, 10.0);
        assert!((a.left_colliding_distance(&b) - 5.2).abs() < EPS);
        assert!((a.right_colliding_distance(&b) - 15.2).abs() < EPS);
        assert!((b.right_colliding_distance(&a) - 5.2).abs() < EPS);
    }

    // -- 2. vertical contact -----------------------------------------------

    #[test]
    fn resting_on_top_within_offset() {
        let player = rect(0.0, 0.0, 10.0, 10.0);
        let floor = rect(0.0, 8.0, 100.0, 10.0);
        assert!(player.is_on_top_side(&floor));
        assert!(floor.is_on_bottom_side(&player));
        assert!((player.top_colliding_distance(&floor) - (2.0 + 1e-5)).abs() < EPS);
    }

    #[test]
    fn deep_vertical_overlap_is_not_a_top_contact() {
        let player = rect(0.0, 0.0, 20.0, 20.0);
        let floor = rect(0.0, 5.0, 100.0, 30.0);
        assert!(!player.is_on_top_side(&floor));
    }

    #[test]
    fn hitting_a_ceiling_from_below() {
        let head = rect(0.0, 18.0, 10.0, 10.0);
        let ceiling = rect(0.0, 0.0, 50.0, 20.0);
        assert!(head.is_on_bottom_side(&ceiling));
        assert!((head.bottom_colliding_distance(&ceiling) - (2.0 + 1e-5)).abs() < EPS);
    }

    #[test]
    fn tolerances_come_from_the_asking_body() {
        let tight = Tight {
            state: BodyState::new(Vector2D::ZERO, 10.0, 10.0),
        };
        let floor = rect(0.0, 8.0, 100.0, 10.0);
        assert!(!tight.is_on_top_side(&floor));
        assert!(rect(0.0, 0.0, 10.0, 10.0).is_on_top_side(&floor));
    }

    // -- 3. bounding box and config ----------------------------------------

    #[test]
    fn bounding_box_tracks_position() {
        let mut a = rect(1.0, 2.0, 3.0, 4.0);
        a.set_position(Vector2D::new(5.0, 6.0));
        assert_eq!(a.bounding_box(), Rect::new(5.0, 6.0, 3.0, 4.0));
    }

    #[test]
    fn tolerances_deserialize_with_defaults() {
        let t: RectangleTolerances = serde_json::from_str(r#"{"contact_offset": 4.0}"#).unwrap();
        assert_eq!(t.contact_offset, 4.0);
        assert_eq!(t.side_bounce_off, 0.2);
        assert_eq!(t.vertical_epsilon, 1e-5);
    }
}
