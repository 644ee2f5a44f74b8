//! Construction of general n-dimensional rotation matrices.
//!
//! A rotation in n dimensions does not happen around an axis; it happens
//! around an (n-2)-dimensional subspace, described here by a simplex of n-1
//! points. The construction composes elementary plane rotations that align
//! the simplex with the leading coordinate axes, applies the requested
//! rotation in the plane of the two remaining axes, and transforms back
//! (after Aguilera & Pérez-Aguila, "General n-Dimensional Rotations").

use crate::{Error, Matrix, Real, Result};

/// Builds the `n × n` matrix rotating by `angle_degrees` about the subspace
/// spanned by `simplex`.
///
/// `simplex` holds one point per row: `n - 1` points in `n` dimensions
/// (so one point in 2D picks a center, two points in 3D span an axis line,
/// and so on). The returned matrix applies to column vectors, as in
/// [`Vector::rotated`][crate::Vector::rotated]; points in the simplex's span are left fixed. Note
/// that the homogeneous (affine) part of the construction is stripped from
/// the result, so the returned matrix is linear: a simplex that does not
/// pass through the origin yields the same matrix as its translate that
/// does.
///
/// Fails with [`Error::InvalidSimplex`] when the simplex does not have
/// exactly one point fewer than it has coordinates, and with
/// [`Error::SingularMatrix`] if the accumulated alignment transform cannot
/// be inverted (which only happens for degenerate input such as non-finite
/// coordinates; the failure is reported instead of producing NaN output).
///
/// # Examples
///
/// ```
/// # use ndim::{assert_approx_eq, rotation_about, Matrix, Vector};
/// // Rotating by 180° in the plane maps a point to its mirror image.
/// let rot = rotation_about(&Matrix::from_rows(&[[0.0, 0.0]]), 180.0).unwrap();
/// let image = Vector::from([1.0, 0.0]).rotated(&rot).unwrap();
/// assert_approx_eq!(image, Vector::from([-1.0, 0.0])).abs(1e-12);
/// ```
pub fn rotation_about<T: Real>(simplex: &Matrix<T>, angle_degrees: T) -> Result<Matrix<T>> {
    let n = simplex.cols();
    if simplex.rows() + 1 != n {
        return Err(Error::InvalidSimplex {
            points: simplex.rows(),
            dims: n,
        });
    }

    // Work in homogeneous row-vector form: each point becomes a row
    // `[p 1]`, and every transform multiplies on the right. The public
    // factories build column-vector matrices, hence the transposes.
    let mut points = Matrix::from_fn(n - 1, n + 1, |row, col| {
        if col < n {
            simplex[(row, col)]
        } else {
            T::ONE
        }
    });

    // Move the first simplex point to the origin.
    let offset = -&simplex.first_row();
    let mut aligned = Matrix::translation(&offset).transpose();
    points = points.checked_mul(&aligned)?;

    // Align the remaining points with the leading axes: sweep each point's
    // coordinates from the highest down, rotating coordinate `col` into
    // `col - 1` through the angle `atan2` reads off the (progressively
    // transformed) point. After point `row` is processed it lies in the
    // span of the first `row` axes.
    for row in 1..n - 1 {
        for col in (row..n).rev() {
            let theta = points[(row, col)].atan2(points[(row, col - 1)]);
            let elementary = Matrix::plane_rotation(n + 1, col - 1, col, theta);
            points = points.checked_mul(&elementary)?;
            aligned = aligned.checked_mul(&elementary)?;
        }
    }

    // The rotation itself happens in the plane of the two axes the simplex
    // was rotated away from. (Negated: `plane_rotation` is column-vector
    // counterclockwise, and this composition runs in row-vector form.)
    let main = Matrix::plane_rotation(n + 1, n - 2, n - 1, -angle_degrees.to_radians());

    let composed = aligned
        .checked_mul(&main)?
        .checked_mul(&aligned.invert()?)?;

    // Strip the homogeneous row and column and hand the result over in the
    // column-vector convention.
    Ok(composed.submatrix(&[n + 1], &[n + 1]).transpose())
}

#[cfg(test)]
mod tests {
    use crate::{approx::ApproxEq, assert_approx_eq, Vector};

    use super::*;

    fn rotate(rot: &Matrix<f64>, point: &[f64]) -> Vector<f64> {
        Vector::from(point).rotated(rot).unwrap()
    }

    #[test]
    fn invalid_simplex() {
        // Too few points for 3 dimensions.
        let flat = Matrix::from_rows(&[[0.0, 0.0, 0.0]]);
        assert_eq!(
            rotation_about(&flat, 90.0),
            Err(Error::InvalidSimplex { points: 1, dims: 3 })
        );

        // Too many.
        let overfull = Matrix::from_rows(&[[0.0, 0.0], [1.0, 0.0]]);
        assert_eq!(
            rotation_about(&overfull, 90.0),
            Err(Error::InvalidSimplex { points: 2, dims: 2 })
        );
    }

    #[test]
    fn half_turn_in_the_plane() {
        // One point in 2D: rotation about that point, with the affine part
        // stripped. 180° maps a point to its mirror image.
        let rot = rotation_about(&Matrix::from_rows(&[[0.0, 0.0]]), 180.0).unwrap();
        assert_eq!((rot.rows(), rot.cols()), (2, 2));
        assert_approx_eq!(rotate(&rot, &[1.0, 0.0]), Vector::from([-1.0, 0.0])).abs(1e-12);
        assert_approx_eq!(rotate(&rot, &[3.0, -2.0]), Vector::from([-3.0, 2.0])).abs(1e-12);
    }

    #[test]
    fn quarter_turn_is_counterclockwise() {
        let rot = rotation_about(&Matrix::from_rows(&[[0.0, 0.0]]), 90.0).unwrap();
        assert_approx_eq!(rotate(&rot, &[1.0, 0.0]), Vector::from([0.0, 1.0])).abs(1e-12);
        assert_approx_eq!(rotate(&rot, &[0.0, 1.0]), Vector::from([-1.0, 0.0])).abs(1e-12);
    }

    #[test]
    fn stripped_result_is_linear() {
        // The homogeneous part is stripped, so an offset simplex produces
        // the same matrix as its translate through the origin.
        let centered = rotation_about(&Matrix::from_rows(&[[0.0, 0.0]]), 65.0).unwrap();
        let offset = rotation_about(&Matrix::from_rows(&[[5.0, 3.0]]), 65.0).unwrap();
        assert_approx_eq!(centered, offset).abs(1e-12);
    }

    #[test]
    fn axis_rotation_in_3d() {
        // Two points spanning the z axis; 90° turns x into y.
        let axis = Matrix::from_rows(&[[0.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        let rot = rotation_about(&axis, 90.0).unwrap();

        assert_approx_eq!(rotate(&rot, &[1.0, 0.0, 0.0]), Vector::from([0.0, 1.0, 0.0]))
            .abs(1e-12);
        assert_approx_eq!(rotate(&rot, &[0.0, 1.0, 0.0]), Vector::from([-1.0, 0.0, 0.0]))
            .abs(1e-12);

        // Points on the axis stay put.
        assert_approx_eq!(rotate(&rot, &[0.0, 0.0, 5.0]), Vector::from([0.0, 0.0, 5.0]))
            .abs(1e-12);
    }

    #[test]
    fn tilted_axis_in_3d() {
        // Rotating about the diagonal (1,1,1)/sqrt(3) by 120° permutes the
        // coordinate axes.
        let axis = Matrix::from_rows(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        let rot = rotation_about(&axis, 120.0).unwrap();

        let image = rotate(&rot, &[1.0, 0.0, 0.0]);
        let (fwd, back) = (
            Vector::from([0.0, 1.0, 0.0]),
            Vector::from([0.0, 0.0, 1.0]),
        );
        // Which of the two cyclic permutations appears depends on the
        // rotation's sign convention; either way it must be one of them.
        assert!(
            image.abs_diff_eq(&fwd, 1e-12) || image.abs_diff_eq(&back, 1e-12),
            "unexpected image {image:?}"
        );

        // Applying the rotation three times is the identity.
        let thrice = rot
            .checked_mul(&rot)
            .unwrap()
            .checked_mul(&rot)
            .unwrap();
        assert_approx_eq!(thrice, Matrix::identity(3)).abs(1e-12);
    }

    #[test]
    fn inverse_angle_composes_to_identity() {
        let axis = Matrix::from_rows(&[[0.0, 0.0, 0.0], [0.3, -1.2, 0.7]]);
        let fwd = rotation_about(&axis, 37.5).unwrap();
        let back = rotation_about(&axis, -37.5).unwrap();
        assert_approx_eq!(
            fwd.checked_mul(&back).unwrap(),
            Matrix::identity(3)
        )
        .abs(1e-12);
    }

    #[test]
    fn plane_rotation_in_4d() {
        // Three points spanning the (z, w) plane: rotation happens in the
        // (x, y) plane and leaves the simplex's span fixed.
        let simplex = Matrix::from_rows(&[
            [0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let quarter = rotation_about(&simplex, 90.0).unwrap();
        assert_eq!((quarter.rows(), quarter.cols()), (4, 4));

        assert_approx_eq!(
            rotate(&quarter, &[0.0, 0.0, 2.0, -3.0]),
            Vector::from([0.0, 0.0, 2.0, -3.0])
        )
        .abs(1e-12);

        // The matrix is orthogonal...
        assert_approx_eq!(
            quarter.checked_mul(&quarter.transpose()).unwrap(),
            Matrix::identity(4)
        )
        .abs(1e-12);
        // ...with determinant +1 (a proper rotation, not a reflection).
        assert_approx_eq!(quarter.determinant().unwrap(), 1.0).abs(1e-12);

        // Two quarter turns reverse the rotating plane.
        let half = quarter.checked_mul(&quarter).unwrap();
        assert_approx_eq!(
            rotate(&half, &[1.0, 0.0, 0.0, 0.0]),
            Vector::from([-1.0, 0.0, 0.0, 0.0])
        )
        .abs(1e-12);
    }

    #[test]
    fn rotated_vector_magnitude_is_preserved() {
        let axis = Matrix::from_rows(&[[0.0, 0.0, 0.0], [2.0, 1.0, -1.0]]);
        let rot = rotation_about(&axis, 53.0).unwrap();
        let v = Vector::from([1.0, -4.0, 2.5]);
        assert_approx_eq!(v.rotated(&rot).unwrap().magnitude(), v.magnitude()).rel(1e-12);
    }
}
