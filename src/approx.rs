//! Approximate equality for floating-point values and the compound types
//! built from them.

mod impls;

use std::{fmt, panic::Location};

/// Types that can be compared for *approximate equality*.
///
/// Compound types implementing this trait are considered equal if all of
/// their elements are. For the crate's [`Vector`][crate::Vector] and
/// [`Matrix`][crate::Matrix] types, values of differing shapes never compare
/// approximately equal, regardless of tolerance.
pub trait ApproxEq<Rhs: ?Sized = Self> {
    /// Type holding the tolerance for absolute and relative comparisons,
    /// [`f32`] or [`f64`] depending on the primitive being compared.
    type Tolerance: DefaultTolerances + Copy;

    /// Performs an *absolute comparison*: the values are equal if their
    /// absolute difference is at most `abs_tolerance`.
    fn abs_diff_eq(&self, other: &Rhs, abs_tolerance: Self::Tolerance) -> bool;

    /// Performs a *relative comparison*: the values are equal if their
    /// absolute difference is at most the larger magnitude times
    /// `rel_tolerance`.
    fn rel_diff_eq(&self, other: &Rhs, rel_tolerance: Self::Tolerance) -> bool;

    /// Compares by counting *units in the last place*: the values are equal
    /// if at most `ulps_tolerance` representable values fit between them.
    ///
    /// `NaN` is never equal to anything; `-0.0` and `+0.0` are equal; values
    /// of differing sign are otherwise never equal.
    fn ulps_diff_eq(&self, other: &Rhs, ulps_tolerance: u32) -> bool;
}

/// Default tolerances applied by [`assert_approx_eq!`][crate::assert_approx_eq]
/// and [`assert_approx_ne!`][crate::assert_approx_ne] when none are given.
pub trait DefaultTolerances {
    const DEFAULT_ABS_TOLERANCE: Self;
    const DEFAULT_REL_TOLERANCE: Self;
}

impl DefaultTolerances for f32 {
    const DEFAULT_ABS_TOLERANCE: Self = Self::EPSILON;
    const DEFAULT_REL_TOLERANCE: Self = Self::EPSILON;
}

impl DefaultTolerances for f64 {
    const DEFAULT_ABS_TOLERANCE: Self = Self::EPSILON;
    const DEFAULT_REL_TOLERANCE: Self = Self::EPSILON;
}

/// Assertion guard returned by [`assert_approx_eq!`][crate::assert_approx_eq]
/// and [`assert_approx_ne!`][crate::assert_approx_ne].
///
/// The comparison runs when the guard is dropped, so the comparison method
/// and tolerances can be configured first by calling [`Asserter::abs`],
/// [`Asserter::rel`] or [`Asserter::ulps`]. If more than one method is
/// configured, the values count as equal when *any* of them agrees. If none
/// is configured, an absolute and a relative comparison with the
/// [`DefaultTolerances`] are performed.
pub struct Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    left: &'a T,
    right: &'a T,
    kind: AssertionKind,
    location: &'static Location<'static>,
    msg: Option<fmt::Arguments<'a>>,
    abs: Option<T::Tolerance>,
    rel: Option<T::Tolerance>,
    ulps: Option<u32>,
}

impl<'a, T> Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    #[doc(hidden)]
    #[track_caller]
    pub fn new(
        left: &'a T,
        right: &'a T,
        kind: AssertionKind,
        msg: Option<fmt::Arguments<'a>>,
    ) -> Self {
        Self {
            left,
            right,
            kind,
            location: Location::caller(),
            msg,
            abs: None,
            rel: None,
            ulps: None,
        }
    }

    /// Compares the values absolutely, with tolerance `abs`.
    ///
    /// A good choice for values close to zero, where relative comparison
    /// degenerates.
    pub fn abs(&mut self, abs: T::Tolerance) -> &mut Self {
        self.abs = Some(abs);
        self
    }

    /// Compares the values relatively, with tolerance `rel`.
    ///
    /// A good default for values away from zero.
    pub fn rel(&mut self, rel: T::Tolerance) -> &mut Self {
        self.rel = Some(rel);
        self
    }

    /// Compares the values by the number of representable floats between
    /// them.
    pub fn ulps(&mut self, ulps: u32) -> &mut Self {
        self.ulps = Some(ulps);
        self
    }

    fn equal(&mut self) -> bool {
        if let Some(abs) = self.abs.take() {
            if T::abs_diff_eq(self.left, self.right, abs) {
                return true;
            }
        }
        if let Some(rel) = self.rel.take() {
            if T::rel_diff_eq(self.left, self.right, rel) {
                return true;
            }
        }
        if let Some(ulps) = self.ulps.take() {
            if T::ulps_diff_eq(self.left, self.right, ulps) {
                return true;
            }
        }

        false
    }
}

impl<'a, T> Drop for Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    fn drop(&mut self) {
        if self.abs.is_none() && self.rel.is_none() && self.ulps.is_none() {
            self.abs = Some(T::Tolerance::DEFAULT_ABS_TOLERANCE);
            self.rel = Some(T::Tolerance::DEFAULT_REL_TOLERANCE);
        }

        let equal = self.equal();
        if (!equal && self.kind == AssertionKind::Eq) || (equal && self.kind == AssertionKind::Ne) {
            assert_failed(self.left, self.right, self.kind, self.location, self.msg);
        }
    }
}

// `#[track_caller]` does not propagate through `drop`, so the assertion
// location is captured in `new` and printed manually.
fn assert_failed(
    left: &dyn fmt::Debug,
    right: &dyn fmt::Debug,
    kind: AssertionKind,
    location: &Location<'_>,
    args: Option<fmt::Arguments<'_>>,
) -> ! {
    let op = match kind {
        AssertionKind::Eq => "==",
        AssertionKind::Ne => "!=",
    };
    match args {
        Some(args) => panic!(
            r#"assertion `left {op} right` failed at {location}: {args}
  left: {left:?}
 right: {right:?}"#
        ),
        None => panic!(
            r#"assertion `left {op} right` failed at {location}
  left: {left:?}
 right: {right:?}"#
        ),
    }
}

#[doc(hidden)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum AssertionKind {
    Eq,
    Ne,
}

/// Asserts that two expressions are approximately equal (using [`ApproxEq`]).
///
/// Functions like [`assert_eq!`], except that it compares approximately and
/// returns an [`Asserter`] on which the comparison method and tolerances can
/// be configured.
///
/// # Examples
///
/// ```
/// # use ndim::assert_approx_eq;
/// let one = (0..10).fold(0.0, |acc, _| acc + 0.1);
/// assert_approx_eq!(one, 1.0);
/// assert_approx_eq!(100.0, 99.0).abs(1.0);
/// assert_approx_eq!(100.0, 99.0).rel(0.01);
/// assert_approx_eq!(1.0, 1.0 + f64::EPSILON).ulps(1);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Eq,
            ::core::option::Option::None,
        )
    };
    ($lhs:expr, $rhs:expr, $($arg:tt)+) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Eq,
            ::core::option::Option::Some(::core::format_args!($($arg)+)),
        )
    };
}

/// Asserts that two expressions are *not* approximately equal (using
/// [`ApproxEq`]).
///
/// The counterpart of [`assert_approx_eq!`][crate::assert_approx_eq].
///
/// # Examples
///
/// ```
/// # use ndim::assert_approx_ne;
/// assert_approx_ne!(100.0, 99.0).abs(0.5);
/// assert_approx_ne!(100.0, 99.0).rel(0.005);
/// ```
#[macro_export]
macro_rules! assert_approx_ne {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Ne,
            ::core::option::Option::None,
        )
    };
    ($lhs:expr, $rhs:expr, $($arg:tt)+) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Ne,
            ::core::option::Option::Some(::core::format_args!($($arg)+)),
        )
    };
}

#[cfg(test)]
mod tests {
    #[test]
    #[should_panic(expected = "assertion `left != right` failed")]
    fn fail_ne() {
        assert_approx_ne!(1.0, 1.0);
    }

    #[test]
    #[should_panic(expected = "assertion `left == right` failed")]
    fn fail_eq() {
        assert_approx_eq!(1.0, 2.0);
    }

    #[test]
    #[should_panic(expected = "my message")]
    fn assertion_message() {
        assert_approx_eq!(1.0, 2.0, "my message");
    }

    #[test]
    fn rel() {
        assert_approx_eq!(1.0, 1.001).rel(0.01);
        assert_approx_eq!(0.0, 0.00001).rel(1.0);
    }

    #[test]
    fn epsilon() {
        assert_approx_eq!(1.0, 1.0 + f32::EPSILON);
        assert_approx_eq!(1.0, 1.0 + f32::EPSILON).ulps(1);
        assert_approx_ne!(1.0, 1.0 + f32::EPSILON).ulps(0);
    }

    #[test]
    fn signs() {
        assert_approx_ne!(1.0, -1.0);
        assert_approx_ne!(1.0, -1.0).abs(1.0);
        assert_approx_eq!(1.0, -1.0).abs(2.0);
        assert_approx_eq!(-1.0, -1.0).ulps(0);
    }

    #[test]
    fn nan() {
        assert_approx_ne!(f32::NAN, f32::NAN).abs(1.0);
        assert_approx_ne!(f32::NAN, f32::NAN).rel(1.0);
        assert_approx_ne!(f32::NAN, f32::NAN).ulps(100);
        assert_approx_ne!(f32::NAN, 0.0).abs(1.0);
    }

    #[test]
    fn inf() {
        assert_approx_eq!(f64::INFINITY, f64::INFINITY).abs(0.0);
        assert_approx_eq!(f64::INFINITY, f64::INFINITY).rel(0.0);
        assert_approx_ne!(f64::INFINITY, f64::MAX).abs(10000.0);
        assert_approx_ne!(f64::MAX, f64::INFINITY).ulps(0);
        assert_approx_eq!(f64::MAX, f64::INFINITY).ulps(1);
    }
}
