/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Determinants and inverses of positive-definite matrices.

use lmat_matrix::{Scalar, Shape, Uplo, Error, Result};
use lmat_matrix::{MatrixExpr, DenseMatrix, DenseMatrixMut};

use crate::{Lapack, Cholesky};

/// Determinant of a small matrix by cofactor expansion, in `f64`.
///
/// `None` for `n >= 4` and for `n == 0`.
fn small_det<A>(a: &A) -> Option<f64>
where A: DenseMatrix + ?Sized,
{
    let e = |i, j| a.elem(i, j).widen();
    let det2 = |r0, r1, c0, c1| e(r0, c0) * e(r1, c1) - e(r0, c1) * e(r1, c0);
    match a.nrows() {
        1 => Some(e(0, 0)),
        2 => Some(det2(0, 1, 0, 1)),
        3 => {
            // expansion along the last column
            let t0 = det2(0, 1, 0, 1) * e(2, 2);
            let t1 = det2(0, 2, 0, 1) * e(1, 2);
            let t2 = det2(1, 2, 0, 1) * e(0, 2);
            Some(t0 - t1 + t2)
        },
        _ => None,
    }
}

fn check_square<A>(a: &A) -> Result<usize>
where A: MatrixExpr + ?Sized,
{
    let n = a.nrows();
    Error::check_shape(Shape::new(n, n), a.shape())?;
    Ok(n)
}

/// Determinant of a symmetric positive-definite matrix.
///
/// Matrices up to `3x3` use a closed form; larger ones are factored.
pub fn pddet<T, A>(a: &A) -> Result<T>
where
    T: Lapack,
    A: DenseMatrix<Elem = T> + ?Sized,
{
    check_square(a)?;
    if let Some(det) = small_det(a) {
        return Ok(T::narrow(det));
    }
    let chol = Cholesky::with_matrix(a, 'L')?;
    let det = chol.diag_product();
    Ok(T::narrow(det * det))
}

/// Log of the determinant of a symmetric positive-definite matrix.
pub fn pdlogdet<T, A>(a: &A) -> Result<T>
where
    T: Lapack,
    A: DenseMatrix<Elem = T> + ?Sized,
{
    check_square(a)?;
    if let Some(det) = small_det(a) {
        return Ok(T::narrow(det.ln()));
    }
    let chol = Cholesky::with_matrix(a, 'L')?;
    Ok(T::narrow(2.0 * chol.diag_log_sum()))
}

/// The inverse of a symmetric positive-definite matrix, evaluated on
/// assignment.
///
/// ```
/// use lmat_matrix::{Matrix, DenseMatrixMut, all_approx};
/// use lmat_linalg::pdinv;
///
/// let a = Matrix::from_rows(&[[4.0, 2.0], [2.0, 3.0]]);
/// let mut inv = Matrix::empty();
/// inv.assign(&pdinv(&a, 'L')?)?;
/// let expected = Matrix::from_rows(&[[0.375, -0.25], [-0.25, 0.5]]);
/// assert!(all_approx(&inv, &expected, 1e-12)?);
/// # Ok::<(), lmat_matrix::Error>(())
/// ```
pub fn pdinv<A>(a: &A, uplo: char) -> Result<PdInvExpr<'_, A>>
where
    A: MatrixExpr + ?Sized,
    A::Elem: Lapack,
{
    let uplo = Uplo::from_char(uplo)?;
    check_square(a)?;
    Ok(PdInvExpr { arg: a, uplo })
}

#[derive(Debug)]
pub struct PdInvExpr<'a, A: ?Sized> {
    arg: &'a A,
    uplo: Uplo,
}

impl<'a, A: ?Sized> Clone for PdInvExpr<'a, A> {
    fn clone(&self) -> Self { *self }
}
impl<'a, A: ?Sized> Copy for PdInvExpr<'a, A> {}

impl<'a, A: ?Sized> PdInvExpr<'a, A> {
    pub fn uplo(&self) -> Uplo { self.uplo }
}

impl<'a, A> MatrixExpr for PdInvExpr<'a, A>
where
    A: MatrixExpr + ?Sized,
    A::Elem: Lapack,
{
    type Elem = A::Elem;

    const STATIC_ROWS: Option<usize> = A::STATIC_ROWS;
    const STATIC_COLS: Option<usize> = A::STATIC_COLS;

    fn nrows(&self) -> usize { self.arg.nrows() }
    fn ncols(&self) -> usize { self.arg.ncols() }

    fn eval_into<D>(&self, dst: &mut D) -> Result<()>
    where D: DenseMatrixMut<Elem = Self::Elem> + ?Sized,
    {
        Cholesky::inv_with(self.arg, dst, self.uplo)
    }
}
