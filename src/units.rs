//! Strongly-typed measurements (zero-cost newtypes with conversion ratios).
//!
//! Every measurement type knows how many base units (typographic points,
//! 1/72 inch) one of its own units is worth. Mixed arithmetic converts the
//! right operand into the left operand's type, so `Inch(1.0) + Mm(25.4)` is
//! `Inch(2.0)`.
//!
//! Dividing one measurement by another is dimensionless and therefore not an
//! operator: use `checked_div`, which returns a plain `f64`.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use crate::errors::NumericError;

/// A scalar measurement convertible to any other measurement.
pub trait Measure: Copy + fmt::Debug {
    /// The raw value in this measurement's own unit.
    fn value(self) -> f64;

    /// How many base units one of this measurement's units is worth.
    fn base_per_unit(self) -> f64;

    /// The value expressed in base units.
    #[inline]
    fn base_value(self) -> f64 {
        self.value() * self.base_per_unit()
    }
}

/// A measurement whose conversion ratio is fixed at compile time.
pub trait FixedMeasure: Measure {
    const BASE_PER_UNIT: f64;

    fn new(value: f64) -> Self;

    /// Convert any measurement into this type: `value * other_ratio / self_ratio`.
    #[inline]
    fn from_measure<M: Measure>(other: M) -> Self {
        Self::new(other.value() * other.base_per_unit() / Self::BASE_PER_UNIT)
    }
}

fn check_finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

macro_rules! fixed_measure {
    ($(#[$meta:meta])* $name:ident, $ratio:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        #[repr(transparent)]
        pub struct $name(pub f64);

        impl $name {
            pub const ZERO: $name = $name(0.0);

            /// Create a value with validation (rejects NaN/infinite)
            #[inline]
            pub fn try_new(val: f64) -> Result<$name, NumericError> {
                check_finite(val).map($name)
            }

            #[inline]
            pub fn abs(self) -> $name {
                $name(self.0.abs())
            }

            #[inline]
            pub fn min<M: Measure>(self, other: M) -> $name {
                $name(self.0.min($name::from_measure(other).0))
            }

            #[inline]
            pub fn max<M: Measure>(self, other: M) -> $name {
                $name(self.0.max($name::from_measure(other).0))
            }

            /// Get the raw value (use sparingly, prefer typed operations)
            #[inline]
            pub fn raw(self) -> f64 {
                self.0
            }

            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// Dimensionless ratio `self / rhs`, `None` if `rhs` is zero.
            #[inline]
            pub fn checked_div<M: Measure>(self, rhs: M) -> Option<f64> {
                let divisor = $name::from_measure(rhs).0;
                if divisor == 0.0 {
                    None
                } else {
                    Some(self.0 / divisor)
                }
            }

            /// Convert into another fixed measurement type.
            #[inline]
            pub fn convert<U: FixedMeasure>(self) -> U {
                U::from_measure(self)
            }
        }

        impl Measure for $name {
            #[inline]
            fn value(self) -> f64 {
                self.0
            }

            #[inline]
            fn base_per_unit(self) -> f64 {
                <$name as FixedMeasure>::BASE_PER_UNIT
            }
        }

        impl FixedMeasure for $name {
            const BASE_PER_UNIT: f64 = $ratio;

            #[inline]
            fn new(value: f64) -> Self {
                $name(value)
            }
        }

        impl<M: Measure> Add<M> for $name {
            type Output = $name;
            fn add(self, rhs: M) -> $name {
                $name(self.0 + $name::from_measure(rhs).0)
            }
        }

        impl<M: Measure> Sub<M> for $name {
            type Output = $name;
            fn sub(self, rhs: M) -> $name {
                $name(self.0 - $name::from_measure(rhs).0)
            }
        }

        impl<M: Measure> AddAssign<M> for $name {
            fn add_assign(&mut self, rhs: M) {
                self.0 += $name::from_measure(rhs).0;
            }
        }

        impl<M: Measure> SubAssign<M> for $name {
            fn sub_assign(&mut self, rhs: M) {
                self.0 -= $name::from_measure(rhs).0;
            }
        }

        impl Mul<f64> for $name {
            type Output = $name;
            fn mul(self, rhs: f64) -> $name {
                $name(self.0 * rhs)
            }
        }

        impl Mul<$name> for f64 {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self * rhs.0)
            }
        }

        impl Div<f64> for $name {
            type Output = $name;
            fn div(self, rhs: f64) -> $name {
                $name(self.0 / rhs)
            }
        }

        impl Neg for $name {
            type Output = $name;
            fn neg(self) -> $name {
                $name(-self.0)
            }
        }

        impl<M: Measure> PartialEq<M> for $name {
            fn eq(&self, other: &M) -> bool {
                self.0 == $name::from_measure(*other).0
            }
        }

        impl<M: Measure> PartialOrd<M> for $name {
            fn partial_cmp(&self, other: &M) -> Option<std::cmp::Ordering> {
                self.0.partial_cmp(&$name::from_measure(*other).0)
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = $name>>(iter: I) -> $name {
                $name(iter.map(|v| v.0).sum())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

fixed_measure!(
    /// Base unit: one typographic point (1/72 inch). All document geometry
    /// is stored in this unit.
    Unit,
    1.0
);

fixed_measure!(
    /// Inches (72 base units)
    Inch,
    72.0
);

fixed_measure!(
    /// Millimeters
    Mm,
    72.0 / 25.4
);

fixed_measure!(
    /// Centimeters
    Cm,
    720.0 / 25.4
);

impl FromStr for Unit {
    type Err = NumericError;

    /// Parse `"12"`, `"12pt"`, `"1.5in"`, `"20mm"` or `"2cm"` into base units.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let suffixes = [
            ("pt", Unit::BASE_PER_UNIT),
            ("in", Inch::BASE_PER_UNIT),
            ("mm", Mm::BASE_PER_UNIT),
            ("cm", Cm::BASE_PER_UNIT),
        ];
        let (number, ratio) = suffixes
            .iter()
            .find_map(|(suffix, ratio)| trimmed.strip_suffix(suffix).map(|n| (n, *ratio)))
            .unwrap_or((trimmed, Unit::BASE_PER_UNIT));
        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| NumericError::Unparseable {
                input: s.to_string(),
            })?;
        let value = check_finite(value)?;
        Ok(Unit(value * ratio))
    }
}

/// A staff-relative measurement: one unit is the distance between two
/// adjacent lines of a particular staff.
///
/// Unlike the fixed measurements, the ratio travels with each value, because
/// every staff has its own line spacing.
#[derive(Clone, Copy, Debug)]
pub struct StaffUnit {
    value: f64,
    /// Base units per staff unit (always positive and finite)
    space: f64,
}

impl StaffUnit {
    /// Create a staff unit value for a staff whose line spacing is `staff_space`.
    pub fn with_space<M: Measure>(value: f64, staff_space: M) -> Result<Self, NumericError> {
        let space = check_finite(staff_space.base_value())?;
        if space == 0.0 {
            return Err(NumericError::Zero);
        }
        if space < 0.0 {
            return Err(NumericError::Negative);
        }
        Ok(Self {
            value: check_finite(value)?,
            space,
        })
    }

    /// Unchecked constructor for callers that validated the spacing already.
    #[inline]
    pub(crate) fn from_space(value: f64, space: Unit) -> Self {
        Self {
            value,
            space: space.0,
        }
    }

    /// Convert any measurement into this staff unit's scale.
    #[inline]
    pub fn rescale<M: Measure>(self, other: M) -> StaffUnit {
        StaffUnit {
            value: other.value() * other.base_per_unit() / self.space,
            space: self.space,
        }
    }

    /// The line spacing this unit is relative to.
    #[inline]
    pub fn staff_space(self) -> Unit {
        Unit(self.space)
    }

    /// Dimensionless ratio `self / rhs`, `None` if `rhs` is zero.
    #[inline]
    pub fn checked_div<M: Measure>(self, rhs: M) -> Option<f64> {
        let divisor = self.rescale(rhs).value;
        if divisor == 0.0 {
            None
        } else {
            Some(self.value / divisor)
        }
    }
}

impl Measure for StaffUnit {
    #[inline]
    fn value(self) -> f64 {
        self.value
    }

    #[inline]
    fn base_per_unit(self) -> f64 {
        self.space
    }
}

impl<M: Measure> Add<M> for StaffUnit {
    type Output = StaffUnit;
    fn add(self, rhs: M) -> StaffUnit {
        StaffUnit {
            value: self.value + self.rescale(rhs).value,
            space: self.space,
        }
    }
}

impl<M: Measure> Sub<M> for StaffUnit {
    type Output = StaffUnit;
    fn sub(self, rhs: M) -> StaffUnit {
        StaffUnit {
            value: self.value - self.rescale(rhs).value,
            space: self.space,
        }
    }
}

impl Mul<f64> for StaffUnit {
    type Output = StaffUnit;
    fn mul(self, rhs: f64) -> StaffUnit {
        StaffUnit {
            value: self.value * rhs,
            space: self.space,
        }
    }
}

impl Div<f64> for StaffUnit {
    type Output = StaffUnit;
    fn div(self, rhs: f64) -> StaffUnit {
        StaffUnit {
            value: self.value / rhs,
            space: self.space,
        }
    }
}

impl Neg for StaffUnit {
    type Output = StaffUnit;
    fn neg(self) -> StaffUnit {
        StaffUnit {
            value: -self.value,
            space: self.space,
        }
    }
}

impl<M: Measure> PartialEq<M> for StaffUnit {
    fn eq(&self, other: &M) -> bool {
        self.value == self.rescale(*other).value
    }
}

impl<M: Measure> PartialOrd<M> for StaffUnit {
    fn partial_cmp(&self, other: &M) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&self.rescale(*other).value)
    }
}

impl fmt::Display for StaffUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StaffUnit({})", self.value)
    }
}
