//! Implementations of `std::ops` and the comparison traits.
//!
//! As with vectors, the operators delegate to the checked methods and panic
//! on incompatible shapes; `checked_add`, `checked_mul` and friends are the
//! recoverable API.

use std::hash::{Hash, Hasher};
use std::ops::{Add, Index, Mul, Sub};

use crate::{approx::ApproxEq, traits::Number, Matrix, Real, Vector};

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    /// Indexes the cell at `(row, column)`, 0-based.
    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(
            row < self.rows && col < self.cols,
            "matrix index ({row}, {col}) out of bounds"
        );
        &self.elems[row * self.cols + col]
    }
}

/// Structural equality: equal shape and equal cells.
impl<T: PartialEq> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.elems == other.elems
    }
}

impl<T: Eq> Eq for Matrix<T> {}

/// Structural, shape- and order-sensitive hashing over the element bit
/// patterns, consistent with the [`Vector`] impl.
impl<T: Real> Hash for Matrix<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rows.hash(state);
        self.cols.hash(state);
        for elem in &self.elems {
            elem.to_bits_u64().hash(state);
        }
    }
}

/// Matrices of differing shapes are never approximately equal.
impl<T: Real + crate::approx::DefaultTolerances> ApproxEq for Matrix<T> {
    type Tolerance = T;

    fn abs_diff_eq(&self, other: &Self, abs_tolerance: Self::Tolerance) -> bool {
        self.cols == other.cols && self.elems.abs_diff_eq(&other.elems, abs_tolerance)
    }

    fn rel_diff_eq(&self, other: &Self, rel_tolerance: Self::Tolerance) -> bool {
        self.cols == other.cols && self.elems.rel_diff_eq(&other.elems, rel_tolerance)
    }

    fn ulps_diff_eq(&self, other: &Self, ulps_tolerance: u32) -> bool {
        self.cols == other.cols && self.elems.ulps_diff_eq(&other.elems, ulps_tolerance)
    }
}

macro_rules! elementwise_binop {
    ($trait:ident, $method:ident, $checked:ident, $doc:literal) => {
        #[doc = $doc]
        impl<T: Number> $trait for Matrix<T> {
            type Output = Matrix<T>;

            fn $method(self, rhs: Matrix<T>) -> Self::Output {
                self.$checked(&rhs).unwrap_or_else(|e| panic!("{e}"))
            }
        }

        #[doc = $doc]
        impl<'a, 'b, T: Number> $trait<&'b Matrix<T>> for &'a Matrix<T> {
            type Output = Matrix<T>;

            fn $method(self, rhs: &'b Matrix<T>) -> Self::Output {
                self.$checked(rhs).unwrap_or_else(|e| panic!("{e}"))
            }
        }
    };
}

elementwise_binop!(Add, add, checked_add, "Element-wise addition.");
elementwise_binop!(Sub, sub, checked_sub, "Element-wise subtraction.");
elementwise_binop!(Mul, mul, checked_mul, "Matrix multiplication.");

/// Matrix * Scalar.
impl<T: Number> Mul<T> for Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: T) -> Self::Output {
        self.map(|&elem| elem * rhs)
    }
}

/// Matrix * Scalar.
impl<'a, T: Number> Mul<T> for &'a Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: T) -> Self::Output {
        self.map(|&elem| elem * rhs)
    }
}

/// Matrix * Column Vector.
impl<'a, 'b, T: Number> Mul<&'b Vector<T>> for &'a Matrix<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: &'b Vector<T>) -> Self::Output {
        self.mul_vector(rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}
