use std::fmt;

use crate::{
    traits::{Abs, Number, One, Real, Trig, Zero},
    Error, Result, Vector,
};

mod ops;

/// A matrix with [`f32`] elements.
pub type Matf = Matrix<f32>;
/// A matrix with [`f64`] elements.
pub type Matd = Matrix<f64>;

/// An immutable matrix with a shape chosen at runtime.
///
/// Storage is row-major and the shape (`rows × cols`, both at least 1) is
/// fixed at construction: the matrix is always rectangular, never jagged, and
/// every operation returns a *new* matrix. Construction helpers that build a
/// result cell by cell do so in a local buffer that is frozen before it is
/// returned, so no intermediate state is ever observable.
///
/// # Construction
///
/// - [`Matrix::from_rows`] / [`Matrix::from_columns`] copy explicit row or
///   column data (slices, arrays, or [`Vector`]s).
/// - [`Matrix::zero`], [`Matrix::identity`] and [`Matrix::from_diagonal`]
///   create the usual blank matrices; [`Matrix::from_fn`] invokes a closure
///   with each cell position.
/// - [`Matrix::translation`], [`Matrix::scaling`] and
///   [`Matrix::plane_rotation`] build elementary transform matrices.
/// - [`Matrix::from_bytes`] and [`Matrix::from_bytes_square`] decode flat
///   native-endian buffers, with an explicit or inferred-square shape.
///
/// # Element access
///
/// The [`Index`] impl takes a `(row, column)` tuple, 0-based, matching
/// mathematical order. [`Matrix::get`] is the checked variant. There is
/// deliberately no mutable access.
///
/// [`Index`]: std::ops::Index
#[derive(Clone)]
pub struct Matrix<T> {
    /// Row-major cells, `rows * cols` of them.
    elems: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Matrix<T> {
    /// Creates a matrix by invoking a closure with the (row, column) position
    /// of each cell.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::Matrix;
    /// let mat = Matrix::from_fn(2, 3, |row, col| (row * 10 + col) as f64);
    /// assert_eq!(mat, Matrix::from_rows(&[
    ///     [0.0, 1.0, 2.0],
    ///     [10.0, 11.0, 12.0],
    /// ]));
    /// ```
    pub fn from_fn<F>(rows: usize, cols: usize, mut cb: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        assert!(
            rows > 0 && cols > 0,
            "a matrix must have at least one row and one column"
        );
        let mut elems = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                elems.push(cb(row, col));
            }
        }
        Self { elems, rows, cols }
    }

    /// The number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns a reference to the cell at `(row, col)`, or [`None`] if out of
    /// bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            Some(&self.elems[row * self.cols + col])
        } else {
            None
        }
    }

    /// Applies a closure to each cell, returning a new matrix.
    pub fn map<F, U>(&self, f: F) -> Matrix<U>
    where
        F: FnMut(&T) -> U,
    {
        Matrix {
            elems: self.elems.iter().map(f).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    fn shape_mismatch(&self, other: &Self) -> Error {
        Error::ShapeMismatch {
            left_rows: self.rows,
            left_cols: self.cols,
            right_rows: other.rows,
            right_cols: other.cols,
        }
    }

    fn check_row(&self, index: usize) -> Result<()> {
        if index < self.rows {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                bound: self.rows,
            })
        }
    }
}

impl<T: Copy> Matrix<T> {
    /// Creates a matrix from explicit row data.
    ///
    /// Accepts anything whose items can be viewed as element slices: nested
    /// arrays, slices of `Vec`s, or slices of [`Vector`]s. The data is
    /// copied; the matrix never aliases caller-owned storage.
    ///
    /// # Panics
    ///
    /// Panics if no rows are given, a row is empty, or the rows have
    /// differing lengths.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::Matrix;
    /// let mat = Matrix::from_rows(&[
    ///     [1.0, 2.0],
    ///     [3.0, 4.0],
    /// ]);
    /// assert_eq!(mat[(1, 0)], 3.0);
    /// ```
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Self {
        assert!(!rows.is_empty(), "a matrix must have at least one row");
        let cols = rows[0].as_ref().len();
        assert!(cols > 0, "a matrix must have at least one column");

        let mut elems = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            assert!(row.len() == cols, "all rows must have the same length");
            elems.extend_from_slice(row);
        }
        Self {
            elems,
            rows: rows.len(),
            cols,
        }
    }

    /// Creates a matrix from explicit column data.
    ///
    /// The transposed counterpart of [`Matrix::from_rows`], with the same
    /// copying behavior and preconditions.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::Matrix;
    /// let rows = Matrix::from_rows(&[
    ///     [0.0, 1.0],
    ///     [2.0, 3.0],
    /// ]);
    /// let columns = Matrix::from_columns(&[
    ///     [0.0, 2.0],
    ///     [1.0, 3.0],
    /// ]);
    /// assert_eq!(rows, columns);
    /// ```
    pub fn from_columns<C: AsRef<[T]>>(columns: &[C]) -> Self {
        Self::from_rows(columns).transpose()
    }

    /// Returns the row at `index` as a [`Vector`].
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn row(&self, index: usize) -> Vector<T> {
        assert!(index < self.rows, "row {index} out of bounds");
        Vector::from(&self.elems[index * self.cols..(index + 1) * self.cols])
    }

    /// Returns the column at `index` as a [`Vector`].
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn column(&self, index: usize) -> Vector<T> {
        assert!(index < self.cols, "column {index} out of bounds");
        Vector::from_fn(self.rows, |row| self.elems[row * self.cols + index])
    }

    /// Returns the first row as a [`Vector`].
    pub fn first_row(&self) -> Vector<T> {
        self.row(0)
    }

    /// Returns the first column as a [`Vector`].
    pub fn first_column(&self) -> Vector<T> {
        self.column(0)
    }

    /// Swaps the rows and columns of this matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::Matrix;
    /// let mat = Matrix::from_rows(&[
    ///     [0.0, 1.0, 2.0],
    ///     [3.0, 4.0, 5.0],
    /// ]).transpose();
    /// assert_eq!(mat, Matrix::from_rows(&[
    ///     [0.0, 3.0],
    ///     [1.0, 4.0],
    ///     [2.0, 5.0],
    /// ]));
    /// ```
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |row, col| {
            self.elems[col * self.cols + row]
        })
    }

    /// Returns a new matrix with rows `a` and `b` exchanged.
    ///
    /// Index validity includes distinctness: swapping a row with itself is
    /// rejected the same way an out-of-bounds index is.
    ///
    /// Fails with [`Error::IndexOutOfRange`] when either index is outside
    /// `0..rows` or when `a == b`.
    pub fn switch_rows(&self, a: usize, b: usize) -> Result<Self> {
        self.check_row(a)?;
        self.check_row(b)?;
        if a == b {
            return Err(Error::IndexOutOfRange {
                index: b,
                bound: self.rows,
            });
        }

        let mut elems = self.elems.clone();
        for col in 0..self.cols {
            elems.swap(a * self.cols + col, b * self.cols + col);
        }
        Ok(Self {
            elems,
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// Returns a new matrix grown by one row, with `row` inserted at `index`
    /// and subsequent rows shifted outward.
    ///
    /// # Panics
    ///
    /// Panics if `index > rows` or if `row` does not have exactly one element
    /// per column.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::Matrix;
    /// let mat = Matrix::from_rows(&[[1.0, 2.0]]).with_row(1, &[3.0, 4.0]);
    /// assert_eq!(mat, Matrix::from_rows(&[
    ///     [1.0, 2.0],
    ///     [3.0, 4.0],
    /// ]));
    /// ```
    pub fn with_row(&self, index: usize, row: &[T]) -> Self {
        assert!(index <= self.rows, "row insertion index out of bounds");
        assert!(
            row.len() == self.cols,
            "inserted row must have one element per column"
        );

        let mut elems = self.elems.clone();
        // Splice the new row into the flat storage at its row offset.
        let at = index * self.cols;
        elems.splice(at..at, row.iter().copied());
        Self {
            elems,
            rows: self.rows + 1,
            cols: self.cols,
        }
    }

    /// Returns a new matrix grown by one column, with `column` inserted at
    /// `index` and subsequent columns shifted outward.
    ///
    /// # Panics
    ///
    /// Panics if `index > cols` or if `column` does not have exactly one
    /// element per row.
    pub fn with_column(&self, index: usize, column: &[T]) -> Self {
        assert!(index <= self.cols, "column insertion index out of bounds");
        assert!(
            column.len() == self.rows,
            "inserted column must have one element per row"
        );

        Self::from_fn(self.rows, self.cols + 1, |r, c| {
            if c < index {
                self.elems[r * self.cols + c]
            } else if c == index {
                column[r]
            } else {
                self.elems[r * self.cols + c - 1]
            }
        })
    }

    /// Returns a new matrix with the listed rows and columns removed.
    ///
    /// The deletion sets hold **1-indexed** positions; values that do not
    /// name an existing row or column (`0`, or anything past the dimension)
    /// are silently ignored. Empty sets therefore return a matrix equal to
    /// the original.
    ///
    /// # Panics
    ///
    /// Panics if the deletions would leave no rows or no columns.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::Matrix;
    /// let mat = Matrix::from_rows(&[
    ///     [1.0, 2.0, 3.0],
    ///     [4.0, 5.0, 6.0],
    ///     [7.0, 8.0, 9.0],
    /// ]);
    /// assert_eq!(mat.submatrix(&[1], &[2]), Matrix::from_rows(&[
    ///     [4.0, 6.0],
    ///     [7.0, 9.0],
    /// ]));
    /// ```
    pub fn submatrix(&self, deleted_rows: &[usize], deleted_cols: &[usize]) -> Self {
        let kept_rows: Vec<usize> = (0..self.rows)
            .filter(|row| !deleted_rows.contains(&(row + 1)))
            .collect();
        let kept_cols: Vec<usize> = (0..self.cols)
            .filter(|col| !deleted_cols.contains(&(col + 1)))
            .collect();
        assert!(
            !kept_rows.is_empty() && !kept_cols.is_empty(),
            "a submatrix must keep at least one row and one column"
        );

        Self::from_fn(kept_rows.len(), kept_cols.len(), |r, c| {
            self.elems[kept_rows[r] * self.cols + kept_cols[c]]
        })
    }

    /// Converts a single-row or single-column matrix into a [`Vector`].
    ///
    /// Whichever dimension is the degenerate (size-1) one is dropped. Fails
    /// with [`Error::ShapeMismatch`] when both dimensions are greater
    /// than 1.
    pub fn to_vector(&self) -> Result<Vector<T>> {
        if self.rows == 1 {
            Ok(self.first_row())
        } else if self.cols == 1 {
            Ok(self.first_column())
        } else {
            Err(Error::ShapeMismatch {
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: 1,
                right_cols: 1,
            })
        }
    }

    /// Converts this matrix into a [`Vector`] by keeping only the first
    /// column.
    ///
    /// A lossy escape hatch: every other column is discarded, and unlike
    /// [`Matrix::to_vector`] this never fails.
    pub fn force_to_vector(&self) -> Vector<T> {
        self.first_column()
    }
}

impl<T: Zero + Copy> Matrix<T> {
    /// Creates a matrix with every cell set to 0.
    pub fn zero(rows: usize, cols: usize) -> Self {
        Self::from_fn(rows, cols, |_, _| T::ZERO)
    }

    /// Creates a square matrix with the given diagonal and 0 elsewhere.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::Matrix;
    /// assert_eq!(Matrix::from_diagonal(&[1.0, 2.0]), Matrix::from_rows(&[
    ///     [1.0, 0.0],
    ///     [0.0, 2.0],
    /// ]));
    /// ```
    pub fn from_diagonal(diag: &[T]) -> Self {
        Self::from_fn(diag.len(), diag.len(), |row, col| {
            if row == col {
                diag[row]
            } else {
                T::ZERO
            }
        })
    }

    /// Returns the diagonal of this square matrix as a [`Vector`].
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not square.
    pub fn diagonal(&self) -> Vector<T> {
        assert!(
            self.rows == self.cols,
            "the diagonal is only defined for square matrices"
        );
        Vector::from_fn(self.rows, |i| self.elems[i * self.cols + i])
    }
}

impl<T: Zero + One + Copy> Matrix<T> {
    /// Creates the `size × size` identity matrix.
    pub fn identity(size: usize) -> Self {
        Self::from_fn(size, size, |row, col| {
            if row == col {
                T::ONE
            } else {
                T::ZERO
            }
        })
    }

    /// Creates the homogeneous translation matrix for `offset`.
    ///
    /// The matrix is `(n+1) × (n+1)` for an `n`-dimensional offset, with the
    /// offset in the last column, so it applies to column vectors augmented
    /// with a trailing 1.
    pub fn translation(offset: &Vector<T>) -> Self {
        let n = offset.len();
        Self::from_fn(n + 1, n + 1, |row, col| {
            if row == col {
                T::ONE
            } else if col == n && row < n {
                offset[row]
            } else {
                T::ZERO
            }
        })
    }

    /// Creates the homogeneous scaling matrix for `factors`.
    ///
    /// The matrix is `(n+1) × (n+1)` for `n` factors: the factors on the
    /// diagonal, with the homogeneous coordinate left untouched.
    pub fn scaling(factors: &Vector<T>) -> Self {
        let n = factors.len();
        Self::from_fn(n + 1, n + 1, |row, col| {
            if row != col {
                T::ZERO
            } else if row < n {
                factors[row]
            } else {
                T::ONE
            }
        })
    }
}

impl<T: Number + Trig> Matrix<T> {
    /// Creates the elementary plane rotation in the plane of axes `a` and
    /// `b`, leaving all other axes fixed.
    ///
    /// The rotation maps axis `a` towards axis `b` for a positive angle (in
    /// radians) and applies to column vectors.
    ///
    /// # Panics
    ///
    /// Panics if `a` and `b` are not two distinct axes below `size`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::{assert_approx_eq, Matrix, Vector};
    /// use std::f64::consts::FRAC_PI_2;
    ///
    /// let rot = Matrix::plane_rotation(2, 0, 1, FRAC_PI_2);
    /// let x = Vector::basis(2, 0).rotated(&rot).unwrap();
    /// assert_approx_eq!(x, Vector::basis(2, 1));
    /// ```
    pub fn plane_rotation(size: usize, a: usize, b: usize, radians: T) -> Self {
        assert!(a < size && b < size, "rotation axes must exist in the matrix");
        assert!(a != b, "rotation axes must be distinct");

        let (sin, cos) = (radians.sin(), radians.cos());
        Self::from_fn(size, size, |row, col| {
            if (row, col) == (a, a) || (row, col) == (b, b) {
                cos
            } else if (row, col) == (b, a) {
                sin
            } else if (row, col) == (a, b) {
                -sin
            } else if row == col {
                T::ONE
            } else {
                T::ZERO
            }
        })
    }
}

impl<T: Number> Matrix<T> {
    /// Adds `other` elementwise.
    ///
    /// Fails with [`Error::ShapeMismatch`] when the shapes differ. The `+`
    /// operator performs the same operation but panics instead.
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        if (self.rows, self.cols) != (other.rows, other.cols) {
            return Err(self.shape_mismatch(other));
        }
        Ok(Self::from_fn(self.rows, self.cols, |r, c| {
            self.elems[r * self.cols + c] + other.elems[r * self.cols + c]
        }))
    }

    /// Subtracts `other` elementwise.
    ///
    /// Fails with [`Error::ShapeMismatch`] when the shapes differ.
    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        if (self.rows, self.cols) != (other.rows, other.cols) {
            return Err(self.shape_mismatch(other));
        }
        Ok(Self::from_fn(self.rows, self.cols, |r, c| {
            self.elems[r * self.cols + c] - other.elems[r * self.cols + c]
        }))
    }

    /// Computes the matrix product `self * other`.
    ///
    /// Fails with [`Error::ShapeMismatch`] unless `self.cols()` equals
    /// `other.rows()`; the result has shape `self.rows() × other.cols()`.
    pub fn checked_mul(&self, other: &Self) -> Result<Self> {
        if self.cols != other.rows {
            return Err(self.shape_mismatch(other));
        }
        Ok(Self::from_fn(self.rows, other.cols, |r, c| {
            (0..self.cols).fold(T::ZERO, |acc, k| {
                acc + self.elems[r * self.cols + k] * other.elems[k * other.cols + c]
            })
        }))
    }

    /// Computes `self * vector` with the vector treated as a column matrix.
    ///
    /// Fails with [`Error::ShapeMismatch`] unless `self.cols()` equals the
    /// vector's length.
    pub fn mul_vector(&self, vector: &Vector<T>) -> Result<Vector<T>> {
        self.checked_mul(&vector.as_column_matrix())?.to_vector()
    }

    /// Returns a new matrix with row `row` scaled by `scalar`.
    ///
    /// Scaling by zero is rejected: it is not an invertible elementary row
    /// operation.
    ///
    /// Fails with [`Error::IndexOutOfRange`] on a bad row index and with
    /// [`Error::InvalidArgument`] when `scalar` is zero.
    pub fn multiply_row(&self, row: usize, scalar: T) -> Result<Self> {
        self.check_row(row)?;
        if scalar == T::ZERO {
            return Err(Error::InvalidArgument("row scale factor must be nonzero"));
        }

        Ok(Self::from_fn(self.rows, self.cols, |r, c| {
            let elem = self.elems[r * self.cols + c];
            if r == row {
                elem * scalar
            } else {
                elem
            }
        }))
    }

    /// Returns a new matrix with `multiplier * row[from]` added into
    /// `row[to]`.
    ///
    /// Fails with [`Error::IndexOutOfRange`] when either index is outside
    /// `0..rows`.
    pub fn add_rows(&self, from: usize, to: usize, multiplier: T) -> Result<Self> {
        self.check_row(from)?;
        self.check_row(to)?;

        Ok(Self::from_fn(self.rows, self.cols, |r, c| {
            let elem = self.elems[r * self.cols + c];
            if r == to {
                elem + self.elems[from * self.cols + c] * multiplier
            } else {
                elem
            }
        }))
    }
}

impl<T: Number> Matrix<T> {
    /// Returns the trace (the sum of the diagonal) of this square matrix.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not square.
    pub fn trace(&self) -> T {
        assert!(
            self.rows == self.cols,
            "the trace is only defined for square matrices"
        );
        (0..self.rows).fold(T::ZERO, |acc, i| acc + self.elems[i * self.cols + i])
    }
}

impl<T: Real> Matrix<T> {
    fn require_square(&self) -> Result<usize> {
        if self.rows == self.cols {
            Ok(self.rows)
        } else {
            Err(Error::ShapeMismatch {
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: self.cols,
                right_cols: self.cols,
            })
        }
    }

    /// Returns the determinant of this square matrix.
    ///
    /// Computed by Gaussian elimination with partial pivoting; a singular
    /// matrix yields 0, which is a value, not an error.
    ///
    /// Fails with [`Error::ShapeMismatch`] when the matrix is not square.
    pub fn determinant(&self) -> Result<T> {
        let n = self.require_square()?;
        let mut a = self.elems.clone();
        let mut det = T::ONE;

        for col in 0..n {
            let Some(pivot) = pivot_row(&a, n, col) else {
                return Ok(T::ZERO);
            };
            if pivot != col {
                for j in 0..n {
                    a.swap(col * n + j, pivot * n + j);
                }
                det = -det;
            }
            let p = a[col * n + col];
            det = det * p;
            for r in col + 1..n {
                let factor = a[r * n + col] / p;
                for j in col..n {
                    a[r * n + j] = a[r * n + j] - factor * a[col * n + j];
                }
            }
        }
        Ok(det)
    }

    /// Returns the inverse of this square matrix.
    ///
    /// Computed by Gauss-Jordan elimination with partial pivoting. A zero
    /// pivot after the pivot search means the matrix has no inverse, and the
    /// operation reports that instead of producing a NaN-filled result.
    ///
    /// Fails with [`Error::ShapeMismatch`] when the matrix is not square and
    /// with [`Error::SingularMatrix`] when it is not invertible.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndim::{assert_approx_eq, Matrix};
    /// let mat = Matrix::from_rows(&[
    ///     [1.0, 2.0],
    ///     [3.0, 4.0],
    /// ]);
    /// let product = mat.invert().unwrap().checked_mul(&mat).unwrap();
    /// assert_approx_eq!(product, Matrix::identity(2)).abs(1e-12);
    /// ```
    pub fn invert(&self) -> Result<Self> {
        let n = self.require_square()?;
        let mut a = self.elems.clone();
        let mut inv = Self::identity(n).elems;

        for col in 0..n {
            let pivot = pivot_row(&a, n, col).ok_or(Error::SingularMatrix)?;
            if pivot != col {
                for j in 0..n {
                    a.swap(col * n + j, pivot * n + j);
                    inv.swap(col * n + j, pivot * n + j);
                }
            }

            let p = a[col * n + col];
            for j in 0..n {
                a[col * n + j] = a[col * n + j] / p;
                inv[col * n + j] = inv[col * n + j] / p;
            }

            for r in 0..n {
                if r == col {
                    continue;
                }
                let factor = a[r * n + col];
                if factor == T::ZERO {
                    continue;
                }
                for j in 0..n {
                    a[r * n + j] = a[r * n + j] - factor * a[col * n + j];
                    inv[r * n + j] = inv[r * n + j] - factor * inv[col * n + j];
                }
            }
        }

        Ok(Self {
            elems: inv,
            rows: n,
            cols: n,
        })
    }

    /// Decodes a matrix from a flat buffer of native-endian elements in
    /// row-major order.
    ///
    /// Fails with [`Error::InvalidBufferShape`] when the byte count does not
    /// hold exactly `rows * cols` elements (or either dimension is zero).
    pub fn from_bytes(bytes: &[u8], rows: usize, cols: usize) -> Result<Self> {
        let elem_size = std::mem::size_of::<T>();
        if rows == 0 || cols == 0 || bytes.len() != rows * cols * elem_size {
            return Err(Error::InvalidBufferShape { len: bytes.len() });
        }
        Ok(Self {
            elems: bytemuck::pod_collect_to_vec(bytes),
            rows,
            cols,
        })
    }

    /// Decodes a square matrix from a flat buffer of native-endian elements
    /// in row-major order, inferring the dimension.
    ///
    /// Fails with [`Error::InvalidBufferShape`] when the element count is
    /// not a (positive) perfect square.
    pub fn from_bytes_square(bytes: &[u8]) -> Result<Self> {
        let elem_size = std::mem::size_of::<T>();
        if bytes.len() % elem_size != 0 {
            return Err(Error::InvalidBufferShape { len: bytes.len() });
        }
        let count = bytes.len() / elem_size;
        let side = (count as f64).sqrt().round() as usize;
        if side == 0 || side * side != count {
            return Err(Error::InvalidBufferShape { len: bytes.len() });
        }
        Self::from_bytes(bytes, side, side)
    }

    /// Encodes this matrix as a flat buffer of native-endian elements in
    /// row-major order, with no header or length prefix.
    ///
    /// The element count alone encodes the shape; the caller is expected to
    /// know the dimensions when decoding (or to rely on
    /// [`Matrix::from_bytes_square`]).
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.elems).to_vec()
    }
}

/// Finds the row with the largest absolute value in `col`, at or below the
/// diagonal. `None` means every candidate pivot is zero.
fn pivot_row<T: Number + Abs + PartialOrd>(a: &[T], n: usize, col: usize) -> Option<usize> {
    let mut pivot = col;
    let mut best = a[col * n + col].abs();
    for row in col + 1..n {
        let mag = a[row * n + col].abs();
        if mag > best {
            best = mag;
            pivot = row;
        }
    }
    (best != T::ZERO).then_some(pivot)
}

impl<T: fmt::Debug> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct FormatRow<'a, T: fmt::Debug>(&'a Matrix<T>, usize);
        impl<'a, T: fmt::Debug> fmt::Debug for FormatRow<'a, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "[")?;
                for col in 0..self.0.cols {
                    if col != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", self.0.elems[self.1 * self.0.cols + col])?;
                }
                write!(f, "]")
            }
        }

        let mut list = f.debug_list();
        for row in 0..self.rows {
            list.entry(&FormatRow(self, row));
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;

    use super::*;

    fn m(rows: &[&[f64]]) -> Matrix<f64> {
        Matrix::from_rows(rows)
    }

    #[test]
    fn factories() {
        assert_eq!(Matrix::<f64>::zero(1, 2), m(&[&[0.0, 0.0]]));
        assert_eq!(
            Matrix::<f64>::identity(2),
            m(&[&[1.0, 0.0], &[0.0, 1.0]])
        );
        assert_eq!(
            Matrix::from_diagonal(&[1.0, 2.0]),
            m(&[&[1.0, 0.0], &[0.0, 2.0]])
        );
        assert_eq!(
            Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]),
            Matrix::from_columns(&[[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]),
        );

        // Row data can come from vectors as well as plain arrays.
        let from_vectors =
            Matrix::from_rows(&[Vector::from([1.0, 2.0]), Vector::from([3.0, 4.0])]);
        assert_eq!(from_vectors, m(&[&[1.0, 2.0], &[3.0, 4.0]]));
    }

    #[test]
    fn elementwise() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = m(&[&[0.5, 0.5], &[-1.0, 1.0]]);

        assert_eq!(&a + &b, m(&[&[1.5, 2.5], &[2.0, 5.0]]));
        assert_eq!(&a - &b, m(&[&[0.5, 1.5], &[4.0, 3.0]]));
        assert_eq!(&(&a + &b) - &b, a);

        let narrow = m(&[&[1.0], &[2.0]]);
        assert_eq!(
            a.checked_add(&narrow),
            Err(Error::ShapeMismatch {
                left_rows: 2,
                left_cols: 2,
                right_rows: 2,
                right_cols: 1,
            })
        );
    }

    #[test]
    fn matrix_product() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        let b = m(&[&[7.0, 8.0, 9.0], &[10.0, 11.0, 12.0]]);

        let c = a.checked_mul(&b).unwrap();
        assert_eq!((c.rows(), c.cols()), (3, 3));
        assert_eq!(c[(0, 0)], 1.0 * 7.0 + 2.0 * 10.0);
        assert_eq!(c[(2, 1)], 5.0 * 8.0 + 6.0 * 11.0);

        // Incompatible inner dimensions.
        assert!(matches!(
            a.checked_mul(&a),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn product_associativity() {
        let a = m(&[&[0.5, -1.5, 2.0], &[1.0, 0.25, -0.75]]);
        let b = m(&[&[3.0, 1.0], &[-2.0, 0.5], &[1.5, -1.0]]);
        let c = m(&[&[2.0, -0.5], &[0.75, 4.0]]);

        let left = a.checked_mul(&b).unwrap().checked_mul(&c).unwrap();
        let right = a.checked_mul(&b.checked_mul(&c).unwrap()).unwrap();
        assert_approx_eq!(left, right).rel(1e-12);
    }

    #[test]
    fn vector_product() {
        let mat = m(&[&[0.0, 1.0], &[2.0, 3.0]]);
        let out = mat.mul_vector(&[4.0, 5.0].into()).unwrap();
        assert_eq!(out, [4.0 * 0.0 + 5.0 * 1.0, 4.0 * 2.0 + 5.0 * 3.0]);

        assert!(matches!(
            mat.mul_vector(&[1.0, 2.0, 3.0].into()),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn scalar_product() {
        let a = m(&[&[1.0, -2.0], &[0.5, 4.0]]);
        assert_eq!(&a * 2.0, m(&[&[2.0, -4.0], &[1.0, 8.0]]));
    }

    #[test]
    fn transpose_involution() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        assert_eq!(a.transpose().transpose(), a);
        assert_eq!((a.transpose().rows(), a.transpose().cols()), (3, 2));
    }

    #[test]
    fn switch_rows() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        let swapped = a.switch_rows(0, 2).unwrap();
        assert_eq!(swapped, m(&[&[5.0, 6.0], &[3.0, 4.0], &[1.0, 2.0]]));

        // Self-inverse.
        assert_eq!(swapped.switch_rows(0, 2).unwrap(), a);

        assert_eq!(
            a.switch_rows(0, 3),
            Err(Error::IndexOutOfRange { index: 3, bound: 3 })
        );
        // Coincident indices are rejected like bad ones.
        assert_eq!(
            a.switch_rows(1, 1),
            Err(Error::IndexOutOfRange { index: 1, bound: 3 })
        );
    }

    #[test]
    fn row_scaling() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(
            a.multiply_row(1, 10.0).unwrap(),
            m(&[&[1.0, 2.0], &[30.0, 40.0]])
        );
        assert_eq!(
            a.multiply_row(2, 1.0),
            Err(Error::IndexOutOfRange { index: 2, bound: 2 })
        );
        assert_eq!(
            a.multiply_row(0, 0.0),
            Err(Error::InvalidArgument("row scale factor must be nonzero"))
        );
    }

    #[test]
    fn row_addition() {
        let a = m(&[&[1.0, 2.0], &[10.0, 20.0]]);
        assert_eq!(
            a.add_rows(0, 1, 1.0).unwrap(),
            m(&[&[1.0, 2.0], &[11.0, 22.0]])
        );
        assert_eq!(
            a.add_rows(1, 0, -0.5).unwrap(),
            m(&[&[-4.0, -8.0], &[10.0, 20.0]])
        );
        assert_eq!(
            a.add_rows(0, 2, 1.0),
            Err(Error::IndexOutOfRange { index: 2, bound: 2 })
        );
    }

    #[test]
    fn row_and_column_insertion() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);

        assert_eq!(
            a.with_row(0, &[9.0, 9.0]),
            m(&[&[9.0, 9.0], &[1.0, 2.0], &[3.0, 4.0]])
        );
        assert_eq!(
            a.with_row(2, &[9.0, 9.0]),
            m(&[&[1.0, 2.0], &[3.0, 4.0], &[9.0, 9.0]])
        );
        assert_eq!(
            a.with_column(1, &[9.0, 9.0]),
            m(&[&[1.0, 9.0, 2.0], &[3.0, 9.0, 4.0]])
        );
        assert_eq!(a.with_row(1, &[9.0, 9.0]).rows(), 3);
    }

    #[test]
    fn submatrix() {
        let a = m(&[
            &[1.0, 2.0, 3.0],
            &[4.0, 5.0, 6.0],
            &[7.0, 8.0, 9.0],
        ]);

        // Empty deletion sets keep everything.
        assert_eq!(a.submatrix(&[], &[]), a);

        // Positions are 1-indexed; 0 and anything past the dimension are
        // ignored without error.
        assert_eq!(a.submatrix(&[0, 4, 100], &[0, 7]), a);

        assert_eq!(
            a.submatrix(&[1], &[]),
            m(&[&[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]])
        );
        assert_eq!(
            a.submatrix(&[2], &[1, 3]),
            m(&[&[2.0], &[8.0]])
        );
    }

    #[test]
    fn vector_conversions() {
        let row = m(&[&[1.0, 2.0, 3.0]]);
        assert_eq!(row.to_vector().unwrap(), [1.0, 2.0, 3.0]);

        let col = row.transpose();
        assert_eq!(col.to_vector().unwrap(), [1.0, 2.0, 3.0]);

        let single = m(&[&[7.0]]);
        assert_eq!(single.to_vector().unwrap(), [7.0]);

        let square = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert!(matches!(
            square.to_vector(),
            Err(Error::ShapeMismatch { .. })
        ));

        // The forced conversion keeps the first column and never fails.
        assert_eq!(square.force_to_vector(), [1.0, 3.0]);
        assert_eq!(square.first_row(), [1.0, 2.0]);
        assert_eq!(square.first_column(), [1.0, 3.0]);
    }

    #[test]
    fn diagonal_and_trace() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(a.diagonal(), [1.0, 4.0]);
        assert_eq!(a.trace(), 5.0);
    }

    #[test]
    fn determinant() {
        assert_eq!(m(&[&[3.0]]).determinant().unwrap(), 3.0);
        assert_eq!(
            m(&[&[1.0, 2.0], &[3.0, 4.0]]).determinant().unwrap(),
            -2.0
        );

        let a = m(&[
            &[-2.0, -1.0, 2.0],
            &[2.0, 1.0, 4.0],
            &[-3.0, 3.0, -1.0],
        ]);
        assert_approx_eq!(a.determinant().unwrap(), 54.0).rel(1e-12);
        assert_approx_eq!(a.transpose().determinant().unwrap(), 54.0).rel(1e-12);

        // Linearly dependent rows.
        let singular = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
        assert_eq!(singular.determinant().unwrap(), 0.0);

        assert!(matches!(
            m(&[&[1.0, 2.0]]).determinant(),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn inversion() {
        let a = m(&[
            &[2.0, 0.0, 1.0],
            &[1.0, 3.0, -1.0],
            &[0.0, 1.0, 4.0],
        ]);
        let inv = a.invert().unwrap();
        assert_approx_eq!(a.checked_mul(&inv).unwrap(), Matrix::identity(3)).abs(1e-12);
        assert_approx_eq!(inv.checked_mul(&a).unwrap(), Matrix::identity(3)).abs(1e-12);

        // A zero pivot survives the pivot search only for a singular matrix,
        // and is reported rather than turned into NaN output.
        let singular = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
        assert_eq!(singular.invert(), Err(Error::SingularMatrix));

        assert!(matches!(
            m(&[&[1.0, 2.0]]).invert(),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn elementary_transforms() {
        use std::f64::consts::FRAC_PI_2;

        // Translation applies to homogeneous column vectors.
        let t = Matrix::translation(&[5.0, -1.0].into());
        let moved = t.mul_vector(&[2.0, 3.0, 1.0].into()).unwrap();
        assert_eq!(moved, [7.0, 2.0, 1.0]);

        let s = Matrix::scaling(&[2.0, 3.0].into());
        let scaled = s.mul_vector(&[1.0, 1.0, 1.0].into()).unwrap();
        assert_eq!(scaled, [2.0, 3.0, 1.0]);

        // A quarter turn maps the first axis onto the second.
        let r = Matrix::plane_rotation(2, 0, 1, FRAC_PI_2);
        let turned = r.mul_vector(&Vector::basis(2, 0)).unwrap();
        assert_approx_eq!(turned, Vector::basis(2, 1));
    }

    #[test]
    fn byte_round_trip() {
        let a = m(&[&[1.5, -2.0, 3.25], &[0.0, 1e-20, -7.5]]);
        let bytes = a.to_bytes();
        assert_eq!(bytes.len(), 48);
        assert_eq!(Matrix::<f64>::from_bytes(&bytes, 2, 3).unwrap(), a);

        // A square buffer can infer its own shape.
        let square = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(
            Matrix::<f64>::from_bytes_square(&square.to_bytes()).unwrap(),
            square
        );
    }

    #[test]
    fn bad_buffers() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let bytes = a.to_bytes();

        // Wrong explicit shape.
        assert_eq!(
            Matrix::<f64>::from_bytes(&bytes, 3, 2),
            Err(Error::InvalidBufferShape { len: 32 })
        );
        // Six elements are not a perfect square.
        let six = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]).to_bytes();
        assert_eq!(
            Matrix::<f64>::from_bytes_square(&six),
            Err(Error::InvalidBufferShape { len: 48 })
        );
        assert_eq!(
            Matrix::<f64>::from_bytes_square(&[]),
            Err(Error::InvalidBufferShape { len: 0 })
        );
    }

    #[test]
    fn equality_and_hash() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hash = |m: &Matrix<f64>| {
            let mut hasher = DefaultHasher::new();
            m.hash(&mut hasher);
            hasher.finish()
        };

        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(a, b);
        assert_eq!(hash(&a), hash(&b));

        // Same cells, different shape.
        let reshaped = m(&[&[1.0, 2.0, 3.0, 4.0]]);
        assert_ne!(a, reshaped);
        assert_ne!(hash(&a), hash(&reshaped));
    }

    #[test]
    fn fmt() {
        let mat = m(&[&[0.0, 1.0], &[2.0, 3.0]]);
        assert_eq!(format!("{mat:?}"), "[[0.0, 1.0], [2.0, 3.0]]");
    }
}
