/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! `CheckClose` for dense matrices, so that `assert_close!` works on them.

use lmat_assert_close::{CheckClose, CheckCloseError, Tolerances, Location, is_close};

use crate::{Scalar, DenseMatrix, Matrix, FixedMatrix, MatrixView, MatrixViewMut};

fn check_dense<A, B>(a: &A, b: &B, tol: Tolerances) -> Result<(), CheckCloseError>
where
    A: DenseMatrix + ?Sized,
    B: DenseMatrix<Elem = A::Elem> + ?Sized,
{
    let (sa, sb) = (a.shape(), b.shape());
    if sa != sb {
        return Err(CheckCloseError::ShapeMismatch(sa.nrows, sa.ncols, sb.nrows, sb.ncols));
    }
    for j in 0..sa.ncols {
        for i in 0..sa.nrows {
            let (left, right) = (a.elem(i, j).widen(), b.elem(i, j).widen());
            if !is_close(left, right, tol) {
                let location = Location::Subscripts(i, j);
                return Err(CheckCloseError::NotClose { location, left, right, tol });
            }
        }
    }
    Ok(())
}

impl<T: Scalar, R: DenseMatrix<Elem = T>> CheckClose<R> for Matrix<T> {
    fn check_close(&self, other: &R, tol: Tolerances) -> Result<(), CheckCloseError>
    { check_dense(self, other, tol) }
}

impl<T: Scalar, R: DenseMatrix<Elem = T>, const M: usize, const N: usize> CheckClose<R> for FixedMatrix<T, M, N> {
    fn check_close(&self, other: &R, tol: Tolerances) -> Result<(), CheckCloseError>
    { check_dense(self, other, tol) }
}

impl<'a, T: Scalar, R: DenseMatrix<Elem = T>> CheckClose<R> for MatrixView<'a, T> {
    fn check_close(&self, other: &R, tol: Tolerances) -> Result<(), CheckCloseError>
    { check_dense(self, other, tol) }
}

impl<'a, T: Scalar, R: DenseMatrix<Elem = T>> CheckClose<R> for MatrixViewMut<'a, T> {
    fn check_close(&self, other: &R, tol: Tolerances) -> Result<(), CheckCloseError>
    { check_dense(self, other, tol) }
}
