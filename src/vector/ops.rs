//! Implementations of `std::ops` and the comparison traits.
//!
//! The arithmetic operators delegate to the checked methods and panic on a
//! length mismatch; callers that want a recoverable failure use
//! `checked_add` and friends directly.

use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Index, Mul, Neg, Sub};

use crate::{approx::ApproxEq, traits::Number, Real};

use super::Vector;

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

// More general impls than what a derive would generate: vectors compare
// against slices and arrays as well.
impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: PartialEq> PartialEq<[T]> for Vector<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.0 == other
    }
}

impl<T: PartialEq> PartialEq<&[T]> for Vector<T> {
    fn eq(&self, other: &&[T]) -> bool {
        self.0 == *other
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for Vector<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.0 == other
    }
}

/// Structural, order-sensitive hashing over the element bit patterns.
///
/// The float types are not [`Hash`] themselves, so the raw IEEE-754 bits are
/// hashed instead.
impl<T: Real> Hash for Vector<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
        for elem in &self.0 {
            elem.to_bits_u64().hash(state);
        }
    }
}

/// Vectors of differing lengths are never approximately equal.
impl<T: Real + crate::approx::DefaultTolerances> ApproxEq for Vector<T> {
    type Tolerance = T;

    fn abs_diff_eq(&self, other: &Self, abs_tolerance: Self::Tolerance) -> bool {
        self.0.abs_diff_eq(&other.0, abs_tolerance)
    }

    fn rel_diff_eq(&self, other: &Self, rel_tolerance: Self::Tolerance) -> bool {
        self.0.rel_diff_eq(&other.0, rel_tolerance)
    }

    fn ulps_diff_eq(&self, other: &Self, ulps_tolerance: u32) -> bool {
        self.0.ulps_diff_eq(&other.0, ulps_tolerance)
    }
}

/// Element-wise negation.
impl<T: Number> Neg for Vector<T> {
    type Output = Vector<T>;

    fn neg(self) -> Self::Output {
        self.map(|&elem| -elem)
    }
}

/// Element-wise negation.
impl<'a, T: Number> Neg for &'a Vector<T> {
    type Output = Vector<T>;

    fn neg(self) -> Self::Output {
        self.map(|&elem| -elem)
    }
}

macro_rules! elementwise_binop {
    ($trait:ident, $method:ident, $checked:ident, $doc:literal) => {
        #[doc = $doc]
        impl<T: Number> $trait for Vector<T> {
            type Output = Vector<T>;

            fn $method(self, rhs: Vector<T>) -> Self::Output {
                self.$checked(&rhs).unwrap_or_else(|e| panic!("{e}"))
            }
        }

        #[doc = $doc]
        impl<'a, 'b, T: Number> $trait<&'b Vector<T>> for &'a Vector<T> {
            type Output = Vector<T>;

            fn $method(self, rhs: &'b Vector<T>) -> Self::Output {
                self.$checked(rhs).unwrap_or_else(|e| panic!("{e}"))
            }
        }
    };
}

elementwise_binop!(Add, add, checked_add, "Element-wise addition.");
elementwise_binop!(Sub, sub, checked_sub, "Element-wise subtraction.");
elementwise_binop!(Mul, mul, checked_mul, "Element-wise multiplication.");
elementwise_binop!(Div, div, checked_div, "Element-wise division.");

macro_rules! scalar_binop {
    ($trait:ident, $method:ident, $op:tt, $doc:literal) => {
        #[doc = $doc]
        impl<T: Number> $trait<T> for Vector<T> {
            type Output = Vector<T>;

            fn $method(self, rhs: T) -> Self::Output {
                self.map(|&elem| elem $op rhs)
            }
        }

        #[doc = $doc]
        impl<'a, T: Number> $trait<T> for &'a Vector<T> {
            type Output = Vector<T>;

            fn $method(self, rhs: T) -> Self::Output {
                self.map(|&elem| elem $op rhs)
            }
        }
    };
}

scalar_binop!(Add, add, +, "Scalar broadcast addition.");
scalar_binop!(Sub, sub, -, "Scalar broadcast subtraction.");
scalar_binop!(Mul, mul, *, "Vector-scalar multiplication (scaling).");
scalar_binop!(Div, div, /, "Vector-scalar division (scaling).");
