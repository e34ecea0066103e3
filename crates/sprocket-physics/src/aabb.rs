//! Separating-axis test for axis-aligned bounding boxes.
//!
//! [`min_separation`] reports which corner of `b` the overlap with `a` leans
//! toward, and along which axis the penetration is shallower. It is the
//! narrow-phase companion of [`Rect::intersects`]: a collision rule can use
//! the axis to decide whether to push a body out sideways or vertically.
//!
//! Coordinates are screen coordinates, so "upper" means smaller `y`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

/// Bit flag: the overlap is toward the top of `b`.
pub const QUAD_UPPER: u32 = 0x0100;
/// Bit flag: the overlap is toward the bottom of `b`.
pub const QUAD_LOWER: u32 = 0x0200;
/// Bit flag: the overlap is toward the right of `b`.
pub const QUAD_RIGHT: u32 = 0x0010;
/// Bit flag: the overlap is toward the left of `b`.
pub const QUAD_LEFT: u32 = 0x0020;
/// Mask selecting the quadrant bits.
pub const QUAD_MASK: u32 = 0x0ff0;
/// Bit flag: least penetration along X.
pub const AXIS_X: u32 = 0x1000;
/// Bit flag: least penetration along Y.
pub const AXIS_Y: u32 = 0x2000;
/// Mask selecting the axis bits.
pub const AXIS_MASK: u32 = 0xf000;

/// Corner of `b` the overlap with `a` leans toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    None,
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

/// Axis of smaller penetration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    None,
    X,
    Y,
}

/// Result of [`min_separation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Separation {
    pub quadrant: Quadrant,
    pub axis: Axis,
}

impl Separation {
    /// No overlap.
    pub const NONE: Self = Self {
        quadrant: Quadrant::None,
        axis: Axis::None,
    };

    /// `true` if the boxes overlap (touching edges count as overlap here).
    pub fn is_collision(&self) -> bool {
        self.axis != Axis::None
    }

    /// Pack into the quadrant/axis bit code.
    pub fn to_bits(&self) -> u32 {
        let quadrant = match self.quadrant {
            Quadrant::None => 0,
            Quadrant::UpperLeft => QUAD_UPPER | QUAD_LEFT,
            Quadrant::UpperRight => QUAD_UPPER | QUAD_RIGHT,
            Quadrant::LowerLeft => QUAD_LOWER | QUAD_LEFT,
            Quadrant::LowerRight => QUAD_LOWER | QUAD_RIGHT,
        };
        let axis = match self.axis {
            Axis::None => 0,
            Axis::X => AXIS_X,
            Axis::Y => AXIS_Y,
        };
        quadrant | axis
    }

    /// Unpack a bit code. Returns `None` for combinations no separation can
    /// produce (e.g. upper and lower at once).
    pub fn from_bits(bits: u32) -> Option<Self> {
        let quadrant = match bits & QUAD_MASK {
            0 => Quadrant::None,
            q if q == QUAD_UPPER | QUAD_LEFT => Quadrant::UpperLeft,
            q if q == QUAD_UPPER | QUAD_RIGHT => Quadrant::UpperRight,
            q if q == QUAD_LOWER | QUAD_LEFT => Quadrant::LowerLeft,
            q if q == QUAD_LOWER | QUAD_RIGHT => Quadrant::LowerRight,
            _ => return None,
        };
        let axis = match bits & AXIS_MASK {
            0 => Axis::None,
            AXIS_X => Axis::X,
            AXIS_Y => Axis::Y,
            _ => return None,
        };
        if bits & !(QUAD_MASK | AXIS_MASK) != 0 {
            return None;
        }
        Some(Self { quadrant, axis })
    }
}

impl fmt::Display for Separation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quadrant = match self.quadrant {
            Quadrant::None => "NO QUADRANT",
            Quadrant::UpperLeft => "UL",
            Quadrant::UpperRight => "UR",
            Quadrant::LowerLeft => "LL",
            Quadrant::LowerRight => "LR",
        };
        let axis = match self.axis {
            Axis::None => "NO AXIS",
            Axis::X => "X AXIS",
            Axis::Y => "Y AXIS",
        };
        write!(f, "SAT: {quadrant} {axis}")
    }
}

// ---------------------------------------------------------------------------
// Separation test
// ---------------------------------------------------------------------------

/// Minimum-separation test between two boxes.
///
/// Per axis, `separation = |center delta| - (half extent a + half extent b)`.
/// A positive separation on either axis means the boxes are apart and the
/// result is [`Separation::NONE`]. Otherwise the quadrant comes from the signs
/// of `a.center - b.center` (zero counts as left/upper) and the axis is the
/// one whose separation is closer to zero. Ties go to X.
///
/// ```
/// use sprocket_physics::aabb::{min_separation, Axis, Quadrant};
/// use sprocket_physics::geometry::Rect;
///
/// let a = Rect::new(0.0, 0.0, 4.0, 4.0);
/// let b = Rect::new(10.0, 10.0, 4.0, 4.0);
/// assert!(!min_separation(&a, &b).is_collision());
///
/// let a = Rect::new(0.0, 1.0, 10.0, 10.0);
/// let b = Rect::new(2.0, 10.0, 10.0, 10.0);
/// let sep = min_separation(&a, &b);
/// assert_eq!((sep.quadrant, sep.axis), (Quadrant::UpperLeft, Axis::Y));
/// ```
pub fn min_separation(a: &Rect, b: &Rect) -> Separation {
    let ahw = a.width / 2.0;
    let ahh = a.height / 2.0;
    let bhw = b.width / 2.0;
    let bhh = b.height / 2.0;

    let dcx = a.center_x() - b.center_x();
    let dcy = a.center_y() - b.center_y();

    let xsep = dcx.abs() - (ahw + bhw);
    if xsep > 0.0 {
        return Separation::NONE;
    }
    let ysep = dcy.abs() - (ahh + bhh);
    if ysep > 0.0 {
        return Separation::NONE;
    }

    let quadrant = match (dcx <= 0.0, dcy <= 0.0) {
        (true, true) => Quadrant::UpperLeft,
        (false, true) => Quadrant::UpperRight,
        (true, false) => Quadrant::LowerLeft,
        (false, false) => Quadrant::LowerRight,
    };
    // Separations are <= 0 here; the larger one is the shallower penetration.
    let axis = if xsep < ysep { Axis::Y } else { Axis::X };

    Separation { quadrant, axis }
}
