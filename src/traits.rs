use std::{fmt, ops};

use crate::approx::ApproxEq;

/// Types that support the trigonometric functions needed for rotations.
pub trait Trig {
    /// Computes the sine of the angle `self` (in radians).
    fn sin(self) -> Self;
    /// Computes the cosine of the angle `self` (in radians).
    fn cos(self) -> Self;
    /// Computes the four-quadrant arctangent of `self / other`.
    fn atan2(self, other: Self) -> Self;
}

/// Types that support computing their square root.
pub trait Sqrt {
    fn sqrt(self) -> Self;
}

/// Types that support computing their absolute value.
pub trait Abs {
    fn abs(self) -> Self;
}

/// Types that support a `min` and `max` operation.
///
/// [`f32`] and [`f64`] implement this trait in terms of [`f32::min`] and
/// [`f32::max`] ([`f64::min`] and [`f64::max`] respectively), so `NaN`
/// operands are skipped where possible.
pub trait MinMax: Sized {
    fn min(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;
}

/// Types that have a "zero" value (an additive identity).
pub trait Zero {
    /// The *0* value of this type.
    const ZERO: Self;
}

/// Types that have a "one" value (a multiplicative identity).
pub trait One {
    /// The *1* value of this type.
    const ONE: Self;
}

/// A trait for numeric types that support basic arithmetic operations.
pub trait Number:
    Zero
    + One
    + ops::Neg<Output = Self>
    + ops::Add<Output = Self>
    + ops::Sub<Output = Self>
    + ops::Mul<Output = Self>
    + ops::Div<Output = Self>
    + PartialEq
    + Copy
{
}
impl<T> Number for T where
    T: Zero
        + One
        + ops::Neg<Output = Self>
        + ops::Add<Output = Self>
        + ops::Sub<Output = Self>
        + ops::Mul<Output = Self>
        + ops::Div<Output = Self>
        + PartialEq
        + Copy
{
}

/// The full capability set of an IEEE-754 element type.
///
/// This is the bound used wherever an operation needs "a float" rather than
/// one specific capability: hashing, the flat-buffer codecs, pivoted
/// elimination, and the rotation builder. The crate instantiates it for
/// [`f32`] and [`f64`].
pub trait Real:
    Number
    + Sqrt
    + Trig
    + Abs
    + MinMax
    + PartialOrd
    + ApproxEq<Tolerance = Self>
    + bytemuck::Pod
    + fmt::Debug
    + fmt::Display
{
    /// The machine epsilon of the underlying representation.
    const EPSILON: Self;

    /// Converts an angle in degrees to radians.
    fn to_radians(self) -> Self;

    /// The raw bit pattern, widened to 64 bits.
    ///
    /// Used for structural hashing, since the float types are not [`Hash`]
    /// themselves. Order- and value-sensitive: `-0.0` and `+0.0` hash
    /// differently, and every `NaN` payload hashes as itself.
    fn to_bits_u64(self) -> u64;
}

macro_rules! float_impls {
    ($($ty:ident),+) => {
        $(
            impl Trig for $ty {
                fn sin(self) -> Self {
                    self.sin()
                }

                fn cos(self) -> Self {
                    self.cos()
                }

                fn atan2(self, other: Self) -> Self {
                    self.atan2(other)
                }
            }

            impl Sqrt for $ty {
                fn sqrt(self) -> Self {
                    self.sqrt()
                }
            }

            impl Abs for $ty {
                fn abs(self) -> Self {
                    self.abs()
                }
            }

            impl MinMax for $ty {
                fn min(self, other: Self) -> Self {
                    self.min(other)
                }

                fn max(self, other: Self) -> Self {
                    self.max(other)
                }
            }

            impl Zero for $ty {
                const ZERO: Self = 0.0;
            }

            impl One for $ty {
                const ONE: Self = 1.0;
            }
        )+
    };
}
float_impls!(f32, f64);

impl Real for f32 {
    const EPSILON: Self = f32::EPSILON;

    fn to_radians(self) -> Self {
        self.to_radians()
    }

    fn to_bits_u64(self) -> u64 {
        u64::from(self.to_bits())
    }
}

impl Real for f64 {
    const EPSILON: Self = f64::EPSILON;

    fn to_radians(self) -> Self {
        self.to_radians()
    }

    fn to_bits_u64(self) -> u64 {
        self.to_bits()
    }
}
