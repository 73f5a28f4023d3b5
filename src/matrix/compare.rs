/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{Scalar, Error, Result};
use crate::{DenseMatrix, Matrix, FixedMatrix, MatrixView, MatrixViewMut};
use crate::dispatch::test_with;
use crate::vecops::{Equal, Approx};

/// Whether every element of `a` equals the corresponding element of `b`.
///
/// Columns are scanned left to right and the scan stops at the first
/// column that differs.
pub fn all_equal<A, B>(a: &A, b: &B) -> Result<bool>
where
    A: DenseMatrix + ?Sized,
    B: DenseMatrix<Elem = A::Elem> + ?Sized,
{
    Error::check_shape(a.shape(), b.shape())?;
    Ok(test_with(a, b, Equal))
}

/// Whether `|a - b| <= tol` for every pair of corresponding elements.
///
/// The tolerance is absolute.  A negative (or NaN) tolerance is never
/// satisfied, not even by empty matrices.
pub fn all_approx<A, B>(a: &A, b: &B, tol: A::Elem) -> Result<bool>
where
    A: DenseMatrix + ?Sized,
    B: DenseMatrix<Elem = A::Elem> + ?Sized,
{
    Error::check_shape(a.shape(), b.shape())?;
    if !(tol >= ::num_traits::zero()) {
        return Ok(false);
    }
    Ok(test_with(a, b, Approx(tol)))
}

// Matrices of different shapes compare unequal.
fn eq_dense<A, B>(a: &A, b: &B) -> bool
where
    A: DenseMatrix + ?Sized,
    B: DenseMatrix<Elem = A::Elem> + ?Sized,
{
    all_equal(a, b).unwrap_or(false)
}

impl<T: Scalar, R: DenseMatrix<Elem = T>> PartialEq<R> for Matrix<T> {
    fn eq(&self, other: &R) -> bool { eq_dense(self, other) }
}

impl<T: Scalar, R: DenseMatrix<Elem = T>, const M: usize, const N: usize> PartialEq<R> for FixedMatrix<T, M, N> {
    fn eq(&self, other: &R) -> bool { eq_dense(self, other) }
}

impl<'a, T: Scalar, R: DenseMatrix<Elem = T>> PartialEq<R> for MatrixView<'a, T> {
    fn eq(&self, other: &R) -> bool { eq_dense(self, other) }
}

impl<'a, T: Scalar, R: DenseMatrix<Elem = T>> PartialEq<R> for MatrixViewMut<'a, T> {
    fn eq(&self, other: &R) -> bool { eq_dense(self, other) }
}
