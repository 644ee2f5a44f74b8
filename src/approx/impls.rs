use super::ApproxEq;

macro_rules! float_approx {
    ($($ty:ident),+) => {
        $(
            impl ApproxEq for $ty {
                type Tolerance = Self;

                fn abs_diff_eq(&self, other: &Self, abs_tolerance: Self::Tolerance) -> bool {
                    if !self.is_finite() || !other.is_finite() {
                        // `inf == inf`, `-inf == -inf`, `inf != -inf`.
                        return self == other;
                    }

                    (self - other).abs() <= abs_tolerance
                }

                fn rel_diff_eq(&self, other: &Self, rel_tolerance: Self::Tolerance) -> bool {
                    if !self.is_finite() || !other.is_finite() {
                        return self == other;
                    }

                    let largest = Self::max(self.abs(), other.abs());
                    (self - other).abs() <= largest * rel_tolerance
                }

                fn ulps_diff_eq(&self, other: &Self, ulps_tolerance: u32) -> bool {
                    if self.is_sign_negative() != other.is_sign_negative() {
                        return self == other; // `-0.0` == `+0.0`
                    }

                    if self.is_nan() || other.is_nan() {
                        return false;
                    }

                    let diff = self.to_bits().abs_diff(other.to_bits());
                    diff <= ulps_tolerance.into()
                }
            }
        )+
    };
}
float_approx!(f32, f64);

impl<'a, T: ApproxEq<U> + ?Sized, U: ?Sized> ApproxEq<U> for &'a T {
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &U, abs_tolerance: Self::Tolerance) -> bool {
        T::abs_diff_eq(self, other, abs_tolerance)
    }

    fn rel_diff_eq(&self, other: &U, rel_tolerance: Self::Tolerance) -> bool {
        T::rel_diff_eq(self, other, rel_tolerance)
    }

    fn ulps_diff_eq(&self, other: &U, ulps_tolerance: u32) -> bool {
        T::ulps_diff_eq(self, other, ulps_tolerance)
    }
}

/// Slices compare equal when their lengths match and every element pair does.
impl<T: ApproxEq<U>, U> ApproxEq<[U]> for [T] {
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &[U], abs_tolerance: Self::Tolerance) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|(a, b)| a.abs_diff_eq(b, abs_tolerance))
    }

    fn rel_diff_eq(&self, other: &[U], rel_tolerance: Self::Tolerance) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|(a, b)| a.rel_diff_eq(b, rel_tolerance))
    }

    fn ulps_diff_eq(&self, other: &[U], ulps_tolerance: u32) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|(a, b)| a.ulps_diff_eq(b, ulps_tolerance))
    }
}
