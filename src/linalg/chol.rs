/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use lmat_matrix::{Shape, Uplo, Error, Result};
use lmat_matrix::{MatrixExpr, DenseMatrix, DenseMatrixMut, Matrix};
use lmat_matrix::{complete_sym, copy_tril, copy_triu};

use crate::lapack::{Lapack, check_info};

/// A Cholesky factorization of a symmetric positive-definite matrix.
///
/// The handle owns the factor.  It is empty until a matrix is [`set`],
/// and becomes empty again if a factorization fails.
///
/// [`set`]: Cholesky::set
#[derive(Debug, Clone)]
pub struct Cholesky<T> {
    uplo: Uplo,
    a: Matrix<T>,
}

impl<T: Lapack> Cholesky<T> {
    /// An empty handle.  `uplo` must be one of `'U'`, `'u'`, `'L'` or `'l'`.
    pub fn new(uplo: char) -> Result<Self> {
        Ok(Self::with_uplo(Uplo::from_char(uplo)?))
    }

    pub fn with_uplo(uplo: Uplo) -> Self {
        Cholesky { uplo, a: Matrix::empty() }
    }

    /// Factor `a` right away.
    pub fn with_matrix<E>(a: &E, uplo: char) -> Result<Self>
    where E: MatrixExpr<Elem = T> + ?Sized,
    {
        let mut chol = Self::new(uplo)?;
        chol.set(a)?;
        Ok(chol)
    }

    /// Replace the factor with that of `a`.
    ///
    /// A non-square `a` is rejected before the current factor is touched.
    /// If the factorization itself fails, the handle is left empty.
    pub fn set<E>(&mut self, a: &E) -> Result<()>
    where E: MatrixExpr<Elem = T> + ?Sized,
    {
        let n = a.nrows();
        Error::check_shape(Shape::new(n, n), a.shape())?;
        let mut a = a.eval()?;

        if n > 0 {
            debug!("{}: factoring {}x{} matrix (uplo = {})", T::POTRF, n, n, self.uplo);
            let (buf, lda) = a.col_major_mut()?;
            if let Err(e) = check_info(T::POTRF, T::potrf(self.uplo, n, buf, lda)) {
                self.a = Matrix::empty();
                return Err(e);
            }
        }
        self.a = a;
        Ok(())
    }

    pub fn is_empty(&self) -> bool { self.a.nelems() == 0 }
    pub fn is_lower(&self) -> bool { self.uplo.is_lower() }
    pub fn is_upper(&self) -> bool { self.uplo.is_upper() }
    pub fn uplo(&self) -> Uplo { self.uplo }
    pub fn dim(&self) -> usize { self.a.nrows() }

    /// The factor as computed in place.
    ///
    /// Only the selected triangle is meaningful; the other one still holds
    /// whatever the input had there.
    pub fn intern(&self) -> &Matrix<T> { &self.a }

    /// Write the factor into `dst`, with zeros in the other triangle.
    pub fn get<D>(&self, dst: &mut D) -> Result<()>
    where D: DenseMatrixMut<Elem = T> + ?Sized,
    {
        dst.require_shape(self.dim(), self.dim())?;
        dst.fill(T::zero());
        match self.uplo {
            Uplo::Lower => copy_tril(&self.a, dst),
            Uplo::Upper => copy_triu(&self.a, dst),
        }
    }

    /// Solve `A X = B` in place, where `A` is the factored matrix.
    ///
    /// `b` must have `dim()` rows and a row stride of 1.
    pub fn solve_inplace<B>(&self, b: &mut B) -> Result<()>
    where B: DenseMatrixMut<Elem = T> + ?Sized,
    {
        let (n, nrhs) = (self.dim(), b.ncols());
        Error::check_shape(Shape::new(n, nrhs), b.shape())?;
        let (a, lda) = self.a.col_major()?;
        let (b, ldb) = b.col_major_mut()?;
        if n == 0 || nrhs == 0 {
            return Ok(());
        }

        debug!("{}: solving with {} right-hand sides (n = {})", T::POTRS, nrhs, n);
        check_info(T::POTRS, T::potrs(self.uplo, n, nrhs, a, lda, b, ldb))
    }

    /// Solve `A X = B`, writing `X` into `x`.
    ///
    /// `x` is resized if its type allows it; otherwise it must already have
    /// the shape of `b`.  Either way it needs a row stride of 1.  Nothing is
    /// written to `x` when any of this fails.
    pub fn solve<B, X>(&self, b: &B, x: &mut X) -> Result<()>
    where
        B: MatrixExpr<Elem = T> + ?Sized,
        X: DenseMatrixMut<Elem = T> + ?Sized,
    {
        Error::check_shape(Shape::new(self.dim(), b.ncols()), b.shape())?;
        x.require_shape(b.nrows(), b.ncols())?;
        x.col_major()?;
        x.assign(b)?;
        self.solve_inplace(x)
    }

    /// Product of the diagonal of the factor.
    pub fn eval_det(&self) -> T { T::narrow(self.diag_product()) }

    /// Sum of the logs of the diagonal of the factor.
    pub fn eval_logdet(&self) -> T { T::narrow(self.diag_log_sum()) }

    pub(crate) fn diag_product(&self) -> f64 {
        (0..self.dim()).map(|i| self.a[(i, i)].widen()).product()
    }

    pub(crate) fn diag_log_sum(&self) -> f64 {
        (0..self.dim()).map(|i| self.a[(i, i)].widen().ln()).sum()
    }

    /// Invert a symmetric positive-definite matrix in place.
    ///
    /// The whole matrix is written, not just one triangle.
    pub fn inv_inplace<M>(a: &mut M, uplo: char) -> Result<()>
    where M: DenseMatrixMut<Elem = T> + ?Sized,
    {
        let uplo = Uplo::from_char(uplo)?;
        Self::invert(a, uplo)
    }

    /// Write the inverse of the symmetric positive-definite `src` into `dst`.
    pub fn inv<S, D>(src: &S, dst: &mut D, uplo: char) -> Result<()>
    where
        S: MatrixExpr<Elem = T> + ?Sized,
        D: DenseMatrixMut<Elem = T> + ?Sized,
    {
        let uplo = Uplo::from_char(uplo)?;
        Self::inv_with(src, dst, uplo)
    }

    pub(crate) fn inv_with<S, D>(src: &S, dst: &mut D, uplo: Uplo) -> Result<()>
    where
        S: MatrixExpr<Elem = T> + ?Sized,
        D: DenseMatrixMut<Elem = T> + ?Sized,
    {
        let n = src.nrows();
        Error::check_shape(Shape::new(n, n), src.shape())?;
        dst.require_shape(n, n)?;

        // LAPACK wants column-major storage, which dst need not have
        if dst.col_major().is_ok() {
            dst.assign(src)?;
            Self::invert(dst, uplo)
        } else {
            let mut tmp = src.eval()?;
            Self::invert(&mut tmp, uplo)?;
            dst.assign(&tmp)
        }
    }

    fn invert<M>(a: &mut M, uplo: Uplo) -> Result<()>
    where M: DenseMatrixMut<Elem = T> + ?Sized,
    {
        let n = a.nrows();
        Error::check_shape(Shape::new(n, n), a.shape())?;
        if n == 0 {
            return Ok(());
        }

        debug!("{}/{}: inverting {}x{} matrix (uplo = {})", T::POTRF, T::POTRI, n, n, uplo);
        {
            let (buf, lda) = a.col_major_mut()?;
            check_info(T::POTRF, T::potrf(uplo, n, buf, lda))?;
            check_info(T::POTRI, T::potri(uplo, n, buf, lda))?;
        }
        complete_sym(a, uplo)
    }
}

/// Solve `A X = B` in place, factoring `a` in place along the way.
///
/// On return `a` holds the factor in the triangle selected by `uplo` and
/// `b` holds `X`.
pub fn posv<T, A, B>(a: &mut A, b: &mut B, uplo: char) -> Result<()>
where
    T: Lapack,
    A: DenseMatrixMut<Elem = T> + ?Sized,
    B: DenseMatrixMut<Elem = T> + ?Sized,
{
    let uplo = Uplo::from_char(uplo)?;
    let (n, nrhs) = (a.nrows(), b.ncols());
    Error::check_shape(Shape::new(n, n), a.shape())?;
    Error::check_shape(Shape::new(n, nrhs), b.shape())?;
    if n == 0 {
        return Ok(());
    }

    let (a, lda) = a.col_major_mut()?;
    let (b, ldb) = b.col_major_mut()?;
    debug!("{}: n = {}, nrhs = {}", T::POSV, n, nrhs);
    check_info(T::POSV, T::posv(uplo, n, nrhs, a, lda, b, ldb))
}
