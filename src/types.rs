//! Points and rectangles over typed measurements.
//!
//! Geometry in a document is stored in [`Unit`]s; other measurement types
//! appear at the API edge and are converted with [`Point::to_base`].

use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use glam::DVec2;

use crate::units::{FixedMeasure, Measure, Unit};

/// Generic 2D point
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Point { x, y }
    }
}

impl<T: Measure> Point<T> {
    /// Convert both components into another fixed measurement type.
    pub fn convert<U: FixedMeasure>(self) -> Point<U> {
        Point {
            x: U::from_measure(self.x),
            y: U::from_measure(self.y),
        }
    }

    pub fn to_base(self) -> Point<Unit> {
        self.convert()
    }
}

impl Point<Unit> {
    pub const ORIGIN: Point<Unit> = Point {
        x: Unit(0.0),
        y: Unit(0.0),
    };

    /// Shorthand for building a point from raw base-unit values.
    pub const fn xy(x: f64, y: f64) -> Self {
        Point {
            x: Unit(x),
            y: Unit(y),
        }
    }

    pub fn distance_to(self, other: Self) -> Unit {
        Unit(self.to_dvec2().distance(other.to_dvec2()))
    }

    /// Calculate the midpoint between two points
    pub fn midpoint(self, other: Self) -> Self {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    pub fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.x.0, self.y.0)
    }

    pub fn from_dvec2(v: DVec2) -> Self {
        Point::xy(v.x, v.y)
    }
}

impl<T: Add<Output = T>> Add for Point<T> {
    type Output = Point<T>;
    fn add(self, rhs: Point<T>) -> Point<T> {
        Point {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<T: Add<Output = T> + Copy> AddAssign for Point<T> {
    fn add_assign(&mut self, rhs: Point<T>) {
        *self = *self + rhs;
    }
}

impl<T: Sub<Output = T>> Sub for Point<T> {
    type Output = Point<T>;
    fn sub(self, rhs: Point<T>) -> Point<T> {
        Point {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl<T: Neg<Output = T>> Neg for Point<T> {
    type Output = Point<T>;
    fn neg(self) -> Point<T> {
        Point {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl<T: Mul<f64, Output = T>> Mul<f64> for Point<T> {
    type Output = Point<T>;
    fn mul(self, rhs: f64) -> Point<T> {
        Point {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

fn normalized_bits(v: f64) -> u64 {
    // -0.0 and 0.0 compare equal, so they must hash equally
    if v == 0.0 { 0 } else { v.to_bits() }
}

/// Points hash their base-unit values; NaN coordinates never compare equal.
impl Eq for Point<Unit> {}

impl Hash for Point<Unit> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        normalized_bits(self.x.0).hash(state);
        normalized_bits(self.y.0).hash(state);
    }
}

/// Axis-aligned rectangle: top-left corner plus size (y grows downwards).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect<T> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

impl<T> Rect<T> {
    pub fn new(x: T, y: T, width: T, height: T) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

impl<T: Measure> Rect<T> {
    pub fn to_base(self) -> Rect<Unit> {
        Rect {
            x: Unit::from_measure(self.x),
            y: Unit::from_measure(self.y),
            width: Unit::from_measure(self.width),
            height: Unit::from_measure(self.height),
        }
    }
}

impl Rect<Unit> {
    pub fn origin(&self) -> Point<Unit> {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> Unit {
        self.x + self.width
    }

    pub fn bottom(&self) -> Unit {
        self.y + self.height
    }

    pub fn translated(self, by: Point<Unit>) -> Self {
        Rect {
            x: self.x + by.x,
            y: self.y + by.y,
            ..self
        }
    }

    /// The same area with non-negative width and height.
    pub fn normalized(self) -> Self {
        let (x, width) = if self.width < Unit::ZERO {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < Unit::ZERO {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle covering both.
    pub fn union(self, other: Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Whether `x` falls in the half-open span `[left, right)`.
    pub fn contains_x(&self, x: Unit) -> bool {
        x >= self.x && x < self.right()
    }

    /// Bounding rectangle of a set of points, `None` when empty.
    pub fn from_points<I: IntoIterator<Item = Point<Unit>>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Rect {
            x: min.x,
            y: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::units::{Inch, Mm};

    // ==================== Point tests ====================

    #[test]
    fn point_arithmetic_is_component_wise() {
        let a = Point::xy(1.0, 2.0);
        let b = Point::xy(3.0, 5.0);
        assert_eq!(a + b, Point::xy(4.0, 7.0));
        assert_eq!(b - a, Point::xy(2.0, 3.0));
        assert_eq!(-a, Point::xy(-1.0, -2.0));
        assert_eq!(a * 2.0, Point::xy(2.0, 4.0));
    }

    #[test]
    fn point_converts_between_units() {
        let p = Point::new(Inch(1.0), Inch(0.5));
        assert_eq!(p.to_base(), Point::xy(72.0, 36.0));
        let back: Point<Inch> = p.to_base().convert();
        assert_eq!(back, p);
        let mm: Point<Mm> = p.convert();
        assert!((mm.x.0 - 25.4).abs() < 1e-9);
    }

    #[test]
    fn point_distance_and_midpoint() {
        let a = Point::xy(0.0, 0.0);
        let b = Point::xy(3.0, 4.0);
        assert_eq!(a.distance_to(b), Unit(5.0));
        assert_eq!(a.midpoint(b), Point::xy(1.5, 2.0));
    }

    #[test]
    fn equal_points_hash_equally() {
        let mut set = HashSet::new();
        set.insert(Point::xy(0.0, 1.0));
        assert!(set.contains(&Point::xy(-0.0, 1.0)));
        assert!(!set.contains(&Point::xy(0.0, 2.0)));
    }

    // ==================== Rect tests ====================

    #[test]
    fn rect_edges() {
        let r = Rect::new(Unit(1.0), Unit(2.0), Unit(10.0), Unit(4.0));
        assert_eq!(r.right(), Unit(11.0));
        assert_eq!(r.bottom(), Unit(6.0));
        assert!(r.contains_x(Unit(1.0)));
        assert!(!r.contains_x(Unit(11.0)));
    }

    #[test]
    fn rect_union_and_translate() {
        let a = Rect::new(Unit(0.0), Unit(0.0), Unit(2.0), Unit(2.0));
        let b = Rect::new(Unit(5.0), Unit(-1.0), Unit(1.0), Unit(1.0));
        let u = a.union(b);
        assert_eq!(u, Rect::new(Unit(0.0), Unit(-1.0), Unit(6.0), Unit(3.0)));
        assert_eq!(
            a.translated(Point::xy(1.0, 1.0)).origin(),
            Point::xy(1.0, 1.0)
        );
    }

    #[test]
    fn rect_from_points() {
        assert_eq!(Rect::from_points(Vec::new()), None);
        let r = Rect::from_points([
            Point::xy(3.0, 1.0),
            Point::xy(-1.0, 4.0),
            Point::xy(2.0, 0.0),
        ]);
        assert_eq!(
            r,
            Some(Rect::new(Unit(-1.0), Unit(0.0), Unit(4.0), Unit(4.0)))
        );
    }
}
