//! Property tests for the separating-axis test and rectangle overlap.
//!
//! Random boxes are generated on a coarse grid so that exact ties (touching
//! edges, concentric centers) come up often.

use proptest::prelude::*;
use sprocket_physics::prelude::*;

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-50i32..50, -50i32..50, 1i32..40, 1i32..40)
        .prop_map(|(x, y, w, h)| Rect::new(x as f64, y as f64, w as f64, h as f64))
}

fn mirror(q: Quadrant) -> Quadrant {
    match q {
        Quadrant::UpperLeft => Quadrant::LowerRight,
        Quadrant::LowerRight => Quadrant::UpperLeft,
        Quadrant::UpperRight => Quadrant::LowerLeft,
        Quadrant::LowerLeft => Quadrant::UpperRight,
        Quadrant::None => Quadrant::None,
    }
}

proptest! {
    /// Overlapping interiors always produce a collision.
    #[test]
    fn intersecting_boxes_collide(a in rect_strategy(), b in rect_strategy()) {
        if a.intersects(&b) {
            prop_assert!(min_separation(&a, &b).is_collision());
        }
    }

    /// A collision result never lacks a quadrant, and "no collision" never has one.
    #[test]
    fn quadrant_and_axis_agree(a in rect_strategy(), b in rect_strategy()) {
        let sep = min_separation(&a, &b);
        prop_assert_eq!(sep.quadrant == Quadrant::None, sep.axis == Axis::None);
    }

    /// Swapping the arguments keeps the axis and mirrors the quadrant
    /// whenever the centers differ on both axes.
    #[test]
    fn swapping_arguments_mirrors(a in rect_strategy(), b in rect_strategy()) {
        let ab = min_separation(&a, &b);
        let ba = min_separation(&b, &a);
        prop_assert_eq!(ab.is_collision(), ba.is_collision());
        if ab.is_collision() && a.center_x() != b.center_x() && a.center_y() != b.center_y() {
            prop_assert_eq!(mirror(ab.quadrant), ba.quadrant);
            prop_assert_eq!(ab.axis, ba.axis);
        }
    }

    /// Translating both boxes by the same amount changes nothing.
    #[test]
    fn translation_invariant(
        a in rect_strategy(),
        b in rect_strategy(),
        dx in -100i32..100,
        dy in -100i32..100,
    ) {
        let (dx, dy) = (dx as f64, dy as f64);
        let a2 = Rect::new(a.x + dx, a.y + dy, a.width, a.height);
        let b2 = Rect::new(b.x + dx, b.y + dy, b.width, b.height);
        prop_assert_eq!(min_separation(&a, &b), min_separation(&a2, &b2));
    }

    /// Bit codes survive packing.
    #[test]
    fn bit_codes_round_trip(a in rect_strategy(), b in rect_strategy()) {
        let sep = min_separation(&a, &b);
        prop_assert_eq!(Separation::from_bits(sep.to_bits()), Some(sep));
    }

    /// Overlap is symmetric.
    #[test]
    fn intersects_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
    }
}
