//! Strongly-typed numeric primitives (zero-cost newtypes).
//!
//! - Everything authored in a template is in inches (`Length`)
//! - Device units exist only after the single `Scaler` multiplication
//! - Angles are degrees, counter-clockwise in the y-up page frame

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

use glam::{DVec2, dvec2};

/// Points per inch, the unit stroke widths and font sizes are authored in.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Length in inches
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Length(pub f64);

impl Length {
    /// Get the raw value (use sparingly, prefer typed operations)
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    /// Check if this length is finite (not NaN or infinite)
    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl From<f64> for Length {
    fn from(val: f64) -> Self {
        Length(val)
    }
}

impl Add for Length {
    type Output = Length;
    fn add(self, rhs: Length) -> Length { Length(self.0 + rhs.0) }
}
impl Sub for Length {
    type Output = Length;
    fn sub(self, rhs: Length) -> Length { Length(self.0 - rhs.0) }
}
impl Mul<f64> for Length {
    type Output = Length;
    fn mul(self, rhs: f64) -> Length { Length(self.0 * rhs) }
}
impl Div<f64> for Length {
    type Output = Length;
    fn div(self, rhs: f64) -> Length { Length(self.0 / rhs) }
}

impl AddAssign for Length {
    fn add_assign(&mut self, rhs: Length) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Angle in degrees, counter-clockwise
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct Angle(pub f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    #[inline]
    pub fn degrees(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }

    /// Whether this angle lies in the canonical `[0, 360)` range
    #[inline]
    pub fn in_canonical_range(self) -> bool {
        self.0.is_finite() && (0.0..360.0).contains(&self.0)
    }

    /// Fold into `[0, 360)`.
    pub fn normalized(self) -> Angle {
        let folded = self.0.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if folded >= 360.0 { Angle(0.0) } else { Angle(folded) }
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0).normalized()
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Convert inches → device units (72 per inch unless configured otherwise).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scaler {
    pub units_per_inch: f64,
}

impl Scaler {
    /// Create a Scaler with validation (rejects NaN, infinite, zero, negative)
    pub fn try_new(units_per_inch: f64) -> Result<Self, NumericError> {
        if units_per_inch.is_nan() {
            Err(NumericError::NaN)
        } else if units_per_inch.is_infinite() {
            Err(NumericError::Infinite)
        } else if units_per_inch == 0.0 {
            Err(NumericError::Zero)
        } else if units_per_inch < 0.0 {
            Err(NumericError::Negative)
        } else {
            Ok(Scaler { units_per_inch })
        }
    }

    /// Convert a length in inches to device units.
    #[inline]
    pub fn len(&self, l: Length) -> f64 {
        l.0 * self.units_per_inch
    }

    /// Convert a width given in points to device units.
    #[inline]
    pub fn points(&self, pt: f64) -> f64 {
        pt / POINTS_PER_INCH * self.units_per_inch
    }

    /// Convert a raw inch-space vector to device units.
    #[inline]
    pub fn vec(&self, v: DVec2) -> DVec2 {
        v * self.units_per_inch
    }

    /// Convert a point in inches to device units.
    pub fn point(&self, p: PtIn) -> DVec2 {
        dvec2(self.len(p.x), self.len(p.y))
    }
}

impl Default for Scaler {
    fn default() -> Self {
        Scaler { units_per_inch: POINTS_PER_INCH }
    }
}

/// Generic 2D point
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Self { Point { x, y } }
}

impl Point<Length> {
    /// Build a point from raw inch values.
    pub fn inches(x: f64, y: f64) -> Self {
        Point { x: Length(x), y: Length(y) }
    }

    /// Calculate the midpoint between two points
    pub fn midpoint(self, other: Self) -> Self {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Multiply both coordinates about the origin.
    pub fn scaled(self, factor: f64) -> Self {
        Point { x: self.x * factor, y: self.y * factor }
    }

    /// Revolve this point about `pivot` by `angle`.
    pub fn rotated_about(self, pivot: PtIn, angle: Angle) -> Self {
        PtIn::from_dvec2(rotate_about(self.to_dvec2(), pivot.to_dvec2(), angle))
    }

    pub fn to_dvec2(self) -> DVec2 {
        dvec2(self.x.0, self.y.0)
    }

    pub fn from_dvec2(v: DVec2) -> Self {
        Point::inches(v.x, v.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox<T> {
    pub min: Point<T>,
    pub max: Point<T>,
}

impl BBox<f64> {
    /// Create an empty bounding box (will expand on first point)
    pub fn new() -> Self {
        BBox {
            min: Point::new(f64::MAX, f64::MAX),
            max: Point::new(f64::MIN, f64::MIN),
        }
    }

    /// Box spanning `origin` to `origin + size`.
    pub fn from_origin_size(origin: DVec2, size: DVec2) -> Self {
        let mut b = BBox::new();
        b.expand_point(origin);
        b.expand_point(origin + size);
        b
    }

    /// Check if the bbox is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Expand to include a point
    pub fn expand_point(&mut self, p: DVec2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn width(&self) -> f64 { self.max.x - self.min.x }

    pub fn height(&self) -> f64 { self.max.y - self.min.y }

    pub fn min_corner(&self) -> DVec2 { dvec2(self.min.x, self.min.y) }

    pub fn max_corner(&self) -> DVec2 { dvec2(self.max.x, self.max.y) }

    pub fn center(&self) -> DVec2 {
        (self.min_corner() + self.max_corner()) / 2.0
    }

    /// Length of the box diagonal.
    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }

    /// Whether two boxes share any area or edge.
    pub fn intersects(&self, other: &BBox<f64>) -> bool {
        !(self.is_empty() || other.is_empty())
            && self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &BBox<f64>) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }
}

impl Default for BBox<f64> {
    fn default() -> Self {
        BBox::new()
    }
}

/// A displacement/offset vector (not an absolute position)
/// Use this for translations; Point + Offset = Point
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Offset<T> {
    pub dx: T,
    pub dy: T,
}

/// Alias for offset in inch space
pub type OffsetIn = Offset<Length>;

impl Offset<Length> {
    pub fn to_dvec2(self) -> DVec2 {
        dvec2(self.dx.0, self.dy.0)
    }
}

/// Add an offset to a point to get a new point
impl Add<Offset<Length>> for Point<Length> {
    type Output = Point<Length>;
    fn add(self, rhs: Offset<Length>) -> Point<Length> {
        Point {
            x: self.x + rhs.dx,
            y: self.y + rhs.dy,
        }
    }
}

/// Subtract two points to get an offset
impl Sub<Point<Length>> for Point<Length> {
    type Output = Offset<Length>;
    fn sub(self, rhs: Point<Length>) -> Offset<Length> {
        Offset {
            dx: self.x - rhs.x,
            dy: self.y - rhs.y,
        }
    }
}

/// Rotate `p` about `pivot` counter-clockwise by `angle`.
pub fn rotate_about(p: DVec2, pivot: DVec2, angle: Angle) -> DVec2 {
    let (sin, cos) = angle.radians().sin_cos();
    let d = p - pivot;
    pivot + dvec2(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Point in inch space
pub type PtIn = Point<Length>;

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ==================== Length tests ====================

    #[test]
    fn length_arithmetic() {
        let a = Length(3.0);
        let b = Length(2.0);

        assert_eq!(a + b, Length(5.0));
        assert_eq!(a - b, Length(1.0));
        assert_eq!(a * 2.0, Length(6.0));
        assert_eq!(a / 2.0, Length(1.5));
    }

    // ==================== Angle tests ====================

    #[test]
    fn angle_addition_wraps() {
        assert_eq!(Angle(300.0) + Angle(90.0), Angle(30.0));
        assert_eq!(Angle(180.0) + Angle(180.0), Angle(0.0));
    }

    #[test]
    fn angle_canonical_range() {
        assert!(Angle(0.0).in_canonical_range());
        assert!(Angle(359.999).in_canonical_range());
        assert!(!Angle(360.0).in_canonical_range());
        assert!(!Angle(-0.5).in_canonical_range());
        assert!(!Angle(f64::NAN).in_canonical_range());
    }

    #[test]
    fn angle_normalizes_negative() {
        assert_eq!(Angle(-90.0).normalized(), Angle(270.0));
        assert_eq!(Angle(-1e-20).normalized(), Angle(0.0));
    }

    // ==================== Scaler tests ====================

    #[test]
    fn scaler_rejects_bad_values() {
        assert_eq!(Scaler::try_new(0.0), Err(NumericError::Zero));
        assert_eq!(Scaler::try_new(-1.0), Err(NumericError::Negative));
        assert_eq!(Scaler::try_new(f64::NAN), Err(NumericError::NaN));
    }

    #[test]
    fn scaler_converts_inches_and_points() {
        let scaler = Scaler::default();
        assert_eq!(scaler.len(Length(2.0)), 144.0);
        assert_eq!(scaler.points(1.0), 1.0);

        let print = Scaler::try_new(300.0).unwrap();
        assert!(close(print.points(72.0), 300.0));
        assert_eq!(print.point(PtIn::inches(1.0, 0.5)), dvec2(300.0, 150.0));
    }

    // ==================== Geometry tests ====================

    #[test]
    fn rotate_quarter_turn_counter_clockwise() {
        let p = rotate_about(dvec2(2.0, 1.0), dvec2(1.0, 1.0), Angle(90.0));
        assert!(close(p.x, 1.0));
        assert!(close(p.y, 2.0));
    }

    #[test]
    fn bbox_intersection() {
        let a = BBox::from_origin_size(dvec2(0.0, 0.0), dvec2(10.0, 10.0));
        let b = BBox::from_origin_size(dvec2(5.0, 5.0), dvec2(10.0, 10.0));
        let c = BBox::from_origin_size(dvec2(20.0, 20.0), dvec2(1.0, 1.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(!a.intersects(&BBox::new()));
        assert!(a.contains(&BBox::from_origin_size(dvec2(1.0, 1.0), dvec2(2.0, 2.0))));
    }

    #[test]
    fn point_offset_round_trip() {
        let a = PtIn::inches(1.0, 2.0);
        let b = PtIn::inches(4.0, 6.0);
        assert_eq!(a + (b - a), b);
        assert_eq!(a.midpoint(b), PtIn::inches(2.5, 4.0));
    }
}
