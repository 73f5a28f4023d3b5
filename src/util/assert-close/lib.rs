/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! `assert_close!` and the [`CheckClose`] trait behind it.
//!
//! ```
//! # #[macro_use] extern crate lmat_assert_close;
//! # fn main() {
//! assert_close!(1.0, 1.0 + 1e-12);
//! assert_close!(abs=1e-3, [0.0, 1.0], [1e-4, 1.0]);
//! assert_close!(rel=1e-2, abs=0.0, 100.0f32, 100.5f32, "{} failed", "scaling");
//! # }
//! ```

use std::fmt;

/// Relative tolerance used when none is given.
pub const DEFAULT_NONZERO_TOL: f64 = 1e-9;

#[macro_export]
macro_rules! assert_close {
    ($($t:tt)*) => {
        $crate::assert_close_impl!{@parsing [$($t)*] [[@rel $crate::DEFAULT_NONZERO_TOL] [@abs 0.0]]}
    };
}

#[macro_export]
macro_rules! debug_assert_close {
    ($($t:tt)*) => {{
        #[cfg(debug_assertions)] {
            $crate::assert_close!{$($t)*}
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! assert_close_impl {
    (@parsing [rel=$tol:expr, $($rest:tt)*] [$($assignment:tt)*]) => {
        $crate::assert_close_impl!(@parsing [$($rest)*] [$($assignment)* [@rel $tol]]);
    };
    (@parsing [abs=$tol:expr, $($rest:tt)*] [$($assignment:tt)*]) => {
        $crate::assert_close_impl!(@parsing [$($rest)*] [$($assignment)* [@abs $tol]]);
    };
    (@parsing [$a:expr, $b:expr $(,)*] $assignments:tt) => {
        $crate::assert_close_impl!(@expand $assignments [@comp $a, $b] [@fmt "not nearly equal!"])
    };
    (@parsing [$a:expr, $b:expr, $($fmt:tt)+] $assignments:tt) => {
        $crate::assert_close_impl!(@expand $assignments [@comp $a, $b] [@fmt $($fmt)+])
    };
    (@expand [$($assignment:tt)*] [@comp $a:expr, $b:expr] [@fmt $($fmt:tt)+]) => {
        #[allow(unused_mut)]
        #[allow(unused_assignments)]
        {
            let a = $a;
            let b = $b;

            let mut tol = $crate::Tolerances::exact();
            $(
                $crate::assert_close_impl!{@stmt::assign tol $assignment}
            )*

            if let Err(e) = $crate::CheckClose::check_close(&a, &b, tol) {
                panic!(
                    "{} (tolerances: rel={}, abs={})\n left: {:?}\nright: {:?}\n{}",
                    format!($($fmt)*), tol.rel, tol.abs, a, b, e,
                );
            }
        }
    };
    (@stmt::assign $tol:ident [@abs $value:expr]) => { $tol.abs = $value as f64; };
    (@stmt::assign $tol:ident [@rel $value:expr]) => { $tol.rel = $value as f64; };
}

/// Absolute and relative tolerances.
///
/// Two values are close when their difference is below the larger of
/// `abs` and `rel` times either magnitude.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

impl Tolerances {
    /// Only exactly equal values are close.
    pub const fn exact() -> Self { Tolerances { abs: 0.0, rel: 0.0 } }
    pub const fn abs(abs: f64) -> Self { Tolerances { abs, rel: 0.0 } }
    pub const fn rel(rel: f64) -> Self { Tolerances { abs: 0.0, rel } }
    pub const fn new(abs: f64, rel: f64) -> Self { Tolerances { abs, rel } }
}

impl Default for Tolerances {
    fn default() -> Self { Tolerances::rel(DEFAULT_NONZERO_TOL) }
}

/// `isclose` in the manner of Python 3.5's `math.isclose`.
///
/// # Panics
///
/// Panics on a negative tolerance.
#[inline]
pub fn is_close(a: f64, b: f64, Tolerances { abs, rel }: Tolerances) -> bool {
    assert!(rel >= 0.0, "negative relative tolerance: {}", rel);
    assert!(abs >= 0.0, "negative absolute tolerance: {}", abs);

    // equal infinities
    if a == b { return true; }
    if a.is_infinite() || b.is_infinite() { return false; }

    // NaN falls through to false
    (a - b).abs() < abs.max(rel * a.abs()).max(rel * b.abs())
}

/// Where in a collection two values failed to be close.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Location {
    Scalar,
    Index(usize),
    Subscripts(usize, usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Location::Scalar => Ok(()),
            Location::Index(k) => write!(f, " at index {}", k),
            Location::Subscripts(i, j) => write!(f, " at ({}, {})", i, j),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CheckCloseError {
    #[error("failed{location}:\n  left: {left:?}\n right: {right:?}\n   tol: {tol:?}")]
    NotClose { location: Location, left: f64, right: f64, tol: Tolerances },

    #[error("lengths differ: {0} vs {1}")]
    LengthMismatch(usize, usize),

    #[error("shapes differ: {0}x{1} vs {2}x{3}")]
    ShapeMismatch(usize, usize, usize, usize),
}

impl CheckCloseError {
    /// Attach a location to an error produced by a scalar comparison.
    pub fn at(self, location: Location) -> Self {
        match self {
            CheckCloseError::NotClose { location: Location::Scalar, left, right, tol } => {
                CheckCloseError::NotClose { location, left, right, tol }
            },
            e => e,
        }
    }
}

pub trait CheckClose<Rhs: ?Sized = Self> {
    /// Test that all values of self and other are close.
    fn check_close(&self, other: &Rhs, tol: Tolerances) -> Result<(), CheckCloseError>;
}

macro_rules! impl_float {
    ($($float:ty),*) => {$(
        impl CheckClose for $float {
            #[inline]
            fn check_close(&self, other: &$float, tol: Tolerances) -> Result<(), CheckCloseError> {
                let (left, right) = (*self as f64, *other as f64);
                match is_close(left, right, tol) {
                    true => Ok(()),
                    false => Err(CheckCloseError::NotClose { location: Location::Scalar, left, right, tol }),
                }
            }
        }
    )*};
}

impl_float!(f32, f64);

impl<'a, T: ?Sized + CheckClose> CheckClose for &'a T {
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError>
    { CheckClose::check_close(*self, *other, tol) }
}

impl<T: CheckClose> CheckClose for [T] {
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError> {
        if self.len() != other.len() {
            return Err(CheckCloseError::LengthMismatch(self.len(), other.len()));
        }
        self.iter().zip(other).enumerate()
            .map(|(k, (a, b))| a.check_close(b, tol).map_err(|e| e.at(Location::Index(k))))
            .collect()
    }
}

impl<T: CheckClose> CheckClose for Vec<T> {
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError>
    { self[..].check_close(&other[..], tol) }
}

impl<T: CheckClose> CheckClose<[T]> for Vec<T> {
    fn check_close(&self, other: &[T], tol: Tolerances) -> Result<(), CheckCloseError>
    { self[..].check_close(other, tol) }
}

impl<T: CheckClose> CheckClose<Vec<T>> for [T] {
    fn check_close(&self, other: &Vec<T>, tol: Tolerances) -> Result<(), CheckCloseError>
    { self.check_close(&other[..], tol) }
}

impl<T: CheckClose, const N: usize> CheckClose for [T; N] {
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError>
    { self[..].check_close(&other[..], tol) }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn macro_output_can_compile() {
        assert_close!(1.0, 1.0);
        assert_close!(abs=1e-8, 1.0, 1.0);
        assert_close!(rel=1e-8, abs=1e-8, 1.0, 1.0);
        assert_close!(1.0, 1.0,);
        assert_close!(abs=1e-8, 1.0, 1.0,);
        assert_close!(rel=1e-8, abs=1e-8, 1.0f32, 1.0f32,);
    }

    #[test]
    fn bad_parse_regression() {
        #[derive(Debug)] struct S;
        impl S { fn x(self) -> S { self } }
        impl CheckClose for S {
            fn check_close(&self, _: &S, _: Tolerances) -> Result<(), CheckCloseError> { Ok(()) }
        }
        assert_close!(
            abs=1e-10,
            S.x().x().x(),
            S.x().x().x(),
        );
        debug_assert_close!(
            abs=1e-10,
            S.x().x().x(),
            S.x().x().x(),
        );
        assert_close!(
            abs=1e-10,
            S.x().x().x(),
            S.x().x().x(),
            "{}", "hello",
        );
    }

    #[test]
    #[should_panic(expected = "not nearly equal")]
    fn not_close() {
        assert_close!(abs=0.0, rel=0.0, 1.0, 1.1);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic)]
    fn debug_not_close() {
        debug_assert_close!(abs=0.0, rel=0.0, 1.0, 1.1);
    }

    #[test]
    fn is_close_edges() {
        let tol = Tolerances::new(1e-12, 1e-6);
        assert!(is_close(f64::INFINITY, f64::INFINITY, tol));
        assert!(!is_close(f64::INFINITY, -f64::INFINITY, tol));
        assert!(!is_close(f64::NAN, f64::NAN, tol));
        assert!(is_close(1e6, 1e6 + 0.5, tol));
        assert!(!is_close(1e-9, 2e-9, tol));
        assert!(is_close(1e-9, 2e-9, Tolerances::abs(1e-8)));
    }

    #[test]
    fn locations() {
        let tol = Tolerances::abs(1e-3);
        assert_eq!(
            [1.0, 2.0, 3.0].check_close(&[1.0, 2.5, 3.0], tol),
            Err(CheckCloseError::NotClose { location: Location::Index(1), left: 2.0, right: 2.5, tol }),
        );
        assert_eq!(
            vec![1.0f32].check_close(&vec![1.0, 2.0], tol),
            Err(CheckCloseError::LengthMismatch(1, 2)),
        );

        let err = 1.0f64.check_close(&2.0, tol).unwrap_err().at(Location::Subscripts(3, 4));
        assert!(err.to_string().starts_with("failed at (3, 4):"));
    }
}
