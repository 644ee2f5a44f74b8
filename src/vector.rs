use std::fmt;

use crate::{
    traits::{Abs, MinMax, Number, One, Real, Sqrt, Zero},
    Error, Matrix, Result,
};

mod ops;

/// A vector with [`f32`] elements.
pub type Vecf = Vector<f32>;
/// A vector with [`f64`] elements.
pub type Vecd = Vector<f64>;

/// An immutable vector with a length chosen at runtime.
///
/// The length is fixed at construction (and is always at least 1); every
/// operation returns a *new* vector and leaves its operands untouched, so
/// published values can be shared freely.
///
/// # Construction
///
/// - [`From`] impls create vectors from arrays, slices and `Vec`s (the
///   elements are copied; the vector never aliases caller-owned storage).
/// - [`Vector::splat`] repeats one value, [`Vector::from_fn`] invokes a
///   closure with each index, [`Vector::basis`] creates a unit axis vector.
/// - [`Vector::from_bytes`] decodes a flat native-endian buffer.
///
/// # Element access
///
/// Elements can be read through the [`Index`] impl or [`Vector::as_slice`];
/// there is deliberately no mutable access.
///
/// [`Index`]: std::ops::Index
#[derive(Clone)]
pub struct Vector<T>(Vec<T>);

impl<T> Vector<T> {
    /// Creates a vector by invoking a closure with the index of each element.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::Vector;
    /// let v = Vector::from_fn(3, |i| i as f64 + 100.0);
    /// assert_eq!(v, [100.0, 101.0, 102.0]);
    /// ```
    pub fn from_fn<F>(len: usize, cb: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        assert!(len > 0, "a vector must have at least one element");
        Self((0..len).map(cb).collect())
    }

    /// The number of elements (the dimension) of this vector.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the underlying elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Returns a reference to the element at `index`, or [`None`] if out of
    /// bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.0.get(index)
    }

    /// Applies a closure to each element, returning a new vector.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::Vector;
    /// let v = Vector::from([1.0, 2.0, 3.0]).map(|x| x * 10.0);
    /// assert_eq!(v, [10.0, 20.0, 30.0]);
    /// ```
    pub fn map<F, U>(&self, f: F) -> Vector<U>
    where
        F: FnMut(&T) -> U,
    {
        Vector(self.0.iter().map(f).collect())
    }

    /// Consumes the vector, returning its elements.
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T: Copy> Vector<T> {
    /// Creates a vector with each of the `len` elements set to `elem`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    pub fn splat(len: usize, elem: T) -> Self {
        Self::from_fn(len, |_| elem)
    }
}

impl<T: Zero + One + Copy> Vector<T> {
    /// Creates the unit vector pointing along `axis` in `len` dimensions.
    ///
    /// The runtime generalization of the usual `X`/`Y`/`Z` constants.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero or `axis` is not below `len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::Vector;
    /// assert_eq!(Vector::<f64>::basis(3, 1), [0.0, 1.0, 0.0]);
    /// ```
    pub fn basis(len: usize, axis: usize) -> Self {
        assert!(axis < len, "axis {axis} does not exist in {len} dimensions");
        Self::from_fn(len, |i| if i == axis { T::ONE } else { T::ZERO })
    }
}

impl<T: Number> Vector<T> {
    fn zip_with<F>(&self, other: &Self, mut f: F) -> Result<Self>
    where
        F: FnMut(T, T) -> T,
    {
        if self.len() != other.len() {
            return Err(Error::DimensionMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(Self(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        ))
    }

    /// Adds `other` elementwise.
    ///
    /// Fails with [`Error::DimensionMismatch`] when the lengths differ. The
    /// `+` operator performs the same operation but panics instead.
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Subtracts `other` elementwise.
    ///
    /// Fails with [`Error::DimensionMismatch`] when the lengths differ.
    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Multiplies by `other` elementwise.
    ///
    /// Fails with [`Error::DimensionMismatch`] when the lengths differ.
    pub fn checked_mul(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Divides by `other` elementwise.
    ///
    /// Fails with [`Error::DimensionMismatch`] when the lengths differ.
    pub fn checked_div(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a / b)
    }

    /// Computes the dot product of `self` and `other`.
    ///
    /// Fails with [`Error::DimensionMismatch`] when the lengths differ.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::Vector;
    /// let a = Vector::from([1.0, 3.0, -5.0]);
    /// let b = Vector::from([4.0, -2.0, -1.0]);
    /// assert_eq!(a.dot(&b).unwrap(), 3.0);
    /// ```
    pub fn dot(&self, other: &Self) -> Result<T> {
        if self.len() != other.len() {
            return Err(Error::DimensionMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(self
            .0
            .iter()
            .zip(&other.0)
            .fold(T::ZERO, |acc, (&a, &b)| acc + a * b))
    }

    /// Linearly interpolates towards `destination`.
    ///
    /// Computes `self + (destination - self) * t`. `t` is not clamped, so
    /// values outside `0..=1` extrapolate past the endpoints.
    ///
    /// Fails with [`Error::DimensionMismatch`] when the lengths differ.
    pub fn lerp(&self, destination: &Self, t: T) -> Result<Self> {
        self.zip_with(destination, |a, b| a + (b - a) * t)
    }

    /// Computes the cross product of `self` and `other`.
    ///
    /// The cross product only exists in 3 and 7 dimensions. The 3-dimensional
    /// case is the familiar one; the 7-dimensional case uses the fixed
    /// index table of the Fano-plane algebra generated by
    /// `e[i] × e[i+1] = e[i+3]` (indices taken modulo 7).
    ///
    /// Fails with [`Error::DimensionMismatch`] when the lengths differ and
    /// with [`Error::UnsupportedDimension`] for any length other than 3 or 7.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::Vector;
    /// let x = Vector::<f64>::basis(3, 0);
    /// let y = Vector::<f64>::basis(3, 1);
    /// assert_eq!(x.cross(&y).unwrap(), Vector::basis(3, 2));
    /// ```
    pub fn cross(&self, other: &Self) -> Result<Self> {
        if self.len() != other.len() {
            return Err(Error::DimensionMismatch {
                left: self.len(),
                right: other.len(),
            });
        }

        let a = self.as_slice();
        let b = other.as_slice();
        match self.len() {
            3 => Ok(Self(vec![
                a[1] * b[2] - a[2] * b[1],
                a[2] * b[0] - a[0] * b[2],
                a[0] * b[1] - a[1] * b[0],
            ])),
            7 => {
                // One row per output component: the three index pairs (i, j)
                // contributing `a[i]*b[j] - a[j]*b[i]`.
                const TABLE: [[(usize, usize); 3]; 7] = [
                    [(1, 3), (2, 6), (4, 5)],
                    [(2, 4), (3, 0), (5, 6)],
                    [(3, 5), (4, 1), (6, 0)],
                    [(4, 6), (5, 2), (0, 1)],
                    [(5, 0), (6, 3), (1, 2)],
                    [(6, 1), (0, 4), (2, 3)],
                    [(0, 2), (1, 5), (3, 4)],
                ];

                Ok(Self::from_fn(7, |k| {
                    TABLE[k].iter().fold(T::ZERO, |acc, &(i, j)| {
                        acc + a[i] * b[j] - a[j] * b[i]
                    })
                }))
            }
            n => Err(Error::UnsupportedDimension(n)),
        }
    }

    /// Converts this vector into a single-row matrix (shape `1 × len`).
    ///
    /// The matrix holds its own copy of the elements; it is a read-only
    /// projection, not a live view.
    pub fn as_row_matrix(&self) -> Matrix<T> {
        Matrix::from_rows(&[self.as_slice()])
    }

    /// Converts this vector into a single-column matrix (shape `len × 1`).
    pub fn as_column_matrix(&self) -> Matrix<T> {
        Matrix::from_fn(self.len(), 1, |row, _| self.0[row])
    }

    /// Applies `rotation` to this vector.
    ///
    /// Computes `rotation * self` with the vector treated as a column matrix
    /// and converts the result back. Fails with [`Error::ShapeMismatch`] when
    /// the matrix does not map this vector's dimension to a single column.
    pub fn rotated(&self, rotation: &Matrix<T>) -> Result<Self> {
        rotation
            .checked_mul(&self.as_column_matrix())?
            .to_vector()
    }
}

impl<T: Number + Sqrt> Vector<T> {
    /// Returns the magnitude of this vector, `sqrt(self · self)`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::Vector;
    /// assert_eq!(Vector::from([3.0, 4.0]).magnitude(), 5.0);
    /// ```
    pub fn magnitude(&self) -> T {
        self.dot(self).unwrap().sqrt()
    }

    /// Returns `sqrt(self · other)`.
    ///
    /// Note that this is *not* the Euclidean distance between two points,
    /// which would be `(self - other).magnitude()`: the value is taken from
    /// the dot product of the two operands directly, so the "distance" of a
    /// point to itself equals its magnitude, and the result is NaN whenever
    /// the dot product is negative. The behavior is kept for compatibility.
    ///
    /// Fails with [`Error::DimensionMismatch`] when the lengths differ.
    pub fn distance_to(&self, other: &Self) -> Result<T> {
        Ok(self.dot(other)?.sqrt())
    }

    /// Divides this vector by its magnitude, yielding a unit vector.
    ///
    /// A zero vector has magnitude zero, and the division then produces NaN
    /// elements; this follows IEEE-754 convention and is not special-cased.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::Vector;
    /// let v = Vector::from([0.0, 0.0, 4.0]).normalized();
    /// assert_eq!(v, [0.0, 0.0, 1.0]);
    /// ```
    pub fn normalized(&self) -> Self {
        let magnitude = self.magnitude();
        self.map(|&elem| elem / magnitude)
    }
}

impl<T: Number + Abs> Vector<T> {
    /// Returns a vector of the absolute values of the elements.
    pub fn abs(&self) -> Self {
        self.map(|elem| elem.abs())
    }
}

impl<T: Copy + MinMax> Vector<T> {
    /// Returns the largest element.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::Vector;
    /// assert_eq!(Vector::from([1.0, -2.0, 7.0, 3.0]).max(), 7.0);
    /// ```
    pub fn max(&self) -> T {
        let mut iter = self.0.iter().copied();
        let first = iter.next().expect("vectors are never empty");
        iter.fold(first, MinMax::max)
    }
}

impl<T: Real> Vector<T> {
    /// Decodes a vector from a flat buffer of native-endian elements.
    ///
    /// The buffer is read fully, in index order, with no header. Fails with
    /// [`Error::InvalidBufferShape`] when the byte count is not a positive
    /// multiple of the element size.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() || bytes.len() % std::mem::size_of::<T>() != 0 {
            return Err(Error::InvalidBufferShape { len: bytes.len() });
        }
        Ok(Self(bytemuck::pod_collect_to_vec(bytes)))
    }

    /// Encodes this vector as a flat buffer of native-endian elements in
    /// index order, with no header or length prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::Vector;
    /// let v = Vector::from([1.0f32, 2.0]);
    /// assert_eq!(Vector::<f32>::from_bytes(&v.to_bytes()).unwrap(), v);
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(self.as_slice()).to_vec()
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    /// Copies the slice contents; the vector does not alias the caller's
    /// storage.
    ///
    /// # Panics
    ///
    /// Panics if the slice is empty.
    fn from(value: &[T]) -> Self {
        assert!(!value.is_empty(), "a vector must have at least one element");
        Self(value.to_vec())
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    /// # Panics
    ///
    /// Panics if the array is empty.
    fn from(value: [T; N]) -> Self {
        assert!(N > 0, "a vector must have at least one element");
        Self(value.into())
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    /// Takes ownership of the elements.
    ///
    /// # Panics
    ///
    /// Panics if the `Vec` is empty.
    fn from(value: Vec<T>) -> Self {
        assert!(!value.is_empty(), "a vector must have at least one element");
        Self(value)
    }
}

impl<T> AsRef<[T]> for Vector<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tup = f.debug_tuple("");
        for elem in &self.0 {
            tup.field(elem);
        }
        tup.finish()
    }
}

impl<T: fmt::Display> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct DebugViaDisplay<D>(D);
        impl<D: fmt::Display> fmt::Debug for DebugViaDisplay<D> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        let mut tup = f.debug_tuple("");
        for elem in &self.0 {
            tup.field(&DebugViaDisplay(elem));
        }
        tup.finish()
    }
}
