//! Immutable 2D vectors.
//!
//! [`Vector2D`] is a `Copy` value; every operation returns a new vector.
//! Coordinates follow screen convention: `x` grows to the right, `y` grows
//! downward.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A 2D point or displacement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2D {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component (downward positive).
    pub y: f64,
}

impl Vector2D {
    /// `(0, 0)`.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// `(1, 1)`.
    pub const ONE: Self = Self::new(1.0, 1.0);

    /// Create a vector.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` radians.
    pub fn unit_length(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// A vector drawn uniformly from `[lx, hx) x [ly, hy)`.
    pub fn random_xy<R: Rng + ?Sized>(rng: &mut R, lx: f64, hx: f64, ly: f64, hy: f64) -> Self {
        Self::new(
            lx + rng.gen::<f64>() * (hx - lx),
            ly + rng.gen::<f64>() * (hy - ly),
        )
    }

    /// Multiply both components by `f`.
    #[inline]
    pub fn scale(self, f: f64) -> Self {
        Self::new(self.x * f, self.y * f)
    }

    /// Component-wise product.
    #[inline]
    pub fn scale_by(self, s: Self) -> Self {
        Self::new(self.x * s.x, self.y * s.y)
    }

    /// `self + v`.
    #[inline]
    pub fn translate(self, v: Self) -> Self {
        Self::new(self.x + v.x, self.y + v.y)
    }

    /// `self - d`.
    #[inline]
    pub fn difference(self, d: Self) -> Self {
        Self::new(self.x - d.x, self.y - d.y)
    }

    /// Subtract `d` from both components.
    #[inline]
    pub fn difference_scalar(self, d: f64) -> Self {
        Self::new(self.x - d, self.y - d)
    }

    /// Squared length.
    #[inline]
    pub fn magnitude2(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Length.
    #[inline]
    pub fn magnitude(self) -> f64 {
        self.magnitude2().sqrt()
    }

    /// Squared distance to `b`.
    #[inline]
    pub fn distance2(self, b: Self) -> f64 {
        self.difference(b).magnitude2()
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, b: Self) -> f64 {
        self.x * b.x + self.y * b.y
    }

    /// Scalar (z-component) cross product.
    #[inline]
    pub fn cross(self, b: Self) -> f64 {
        self.x * b.y - self.y * b.x
    }

    /// Cross product of the scalar `s` (as a z-axis vector) with `self`.
    #[inline]
    pub fn d_cross_v(self, s: f64) -> Self {
        Self::new(-s * self.y, s * self.x)
    }

    /// Component-wise absolute value.
    #[inline]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }

    /// Angle in radians of the direction from `self` to `a`.
    pub fn angle_to(self, a: Self) -> f64 {
        (a.y - self.y).atan2(a.x - self.x)
    }

    /// Reflect off a surface whose tangent lies at angle `tangent`.
    pub fn bounce(self, tangent: f64) -> Self {
        let m = (2.0 * tangent).cos();
        let n = (2.0 * tangent).sin();
        Self::new(m * self.x + n * self.y, n * self.x - m * self.y)
    }

    /// Reflect across the unit normal `normal_unit`.
    pub fn reflect(self, normal_unit: Self) -> Self {
        self.difference(normal_unit.scale(2.0 * normal_unit.dot(self)))
    }

    /// Rotate counter-clockwise (in a y-up frame) by `theta` radians.
    pub fn rotate(self, theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Both components within `e` of `other`'s.
    pub fn epsilon_equals(self, other: Self, e: f64) -> bool {
        (self.x - other.x).abs() <= e && (self.y - other.y).abs() <= e
    }

    /// Clamp `x` into `[low, high]`.
    pub fn clamp_x(self, low: f64, high: f64) -> Self {
        Self::new(self.x.max(low).min(high), self.y)
    }

    /// Clamp `y` into `[low, high]`.
    pub fn clamp_y(self, low: f64, high: f64) -> Self {
        Self::new(self.x, self.y.max(low).min(high))
    }
}

impl Add for Vector2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.translate(rhs)
    }
}

impl Sub for Vector2D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.difference(rhs)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        self.scale(-1.0)
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "<{:.*}, {:.*}>", p, self.x, p, self.y),
            None => write!(f, "<{}, {}>", self.x, self.y),
        }
    }
}
