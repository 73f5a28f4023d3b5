/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::ops::{Index, IndexMut};

use crate::{Scalar, Shape, Error, Result};
use crate::{MatrixExpr, DenseMatrix, DenseMatrixMut, Operand};
use crate::expr::{eval_dense_into, out_of_range};

/// An owning matrix whose shape is part of its type.
///
/// Stored as `N` columns of `M` elements each.
#[derive(Debug, Copy, Clone)]
pub struct FixedMatrix<T, const M: usize, const N: usize> {
    cols: [[T; M]; N],
}

impl<T: Scalar, const M: usize, const N: usize> FixedMatrix<T, M, N> {
    pub fn zeros() -> Self { Self::from_elem(T::zero()) }

    pub fn from_elem(value: T) -> Self { FixedMatrix { cols: [[value; M]; N] } }

    pub fn from_columns(cols: [[T; M]; N]) -> Self { FixedMatrix { cols } }

    pub fn from_rows(rows: [[T; N]; M]) -> Self { Self::from_fn(|i, j| rows[i][j]) }

    pub fn from_fn(mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut out = Self::zeros();
        for j in 0..N {
            for i in 0..M {
                out.cols[j][i] = f(i, j);
            }
        }
        out
    }

    pub fn columns(&self) -> &[[T; M]; N] { &self.cols }
    pub fn into_columns(self) -> [[T; M]; N] { self.cols }
}

impl<T: Scalar> FixedMatrix<T, 1, 1> {
    pub fn from_scalar(x: T) -> Self { FixedMatrix { cols: [[x]] } }
    pub fn to_scalar(&self) -> T { self.cols[0][0] }
}

impl<T: Scalar, const M: usize, const N: usize> Default for FixedMatrix<T, M, N> {
    fn default() -> Self { Self::zeros() }
}

impl<T: Scalar, const M: usize, const N: usize> MatrixExpr for FixedMatrix<T, M, N> {
    type Elem = T;

    const STATIC_ROWS: Option<usize> = Some(M);
    const STATIC_COLS: Option<usize> = Some(N);

    #[inline(always)] fn nrows(&self) -> usize { M }
    #[inline(always)] fn ncols(&self) -> usize { N }

    fn eval_into<D>(&self, dst: &mut D) -> Result<()>
    where D: DenseMatrixMut<Elem = T> + ?Sized,
    { eval_dense_into(self, dst) }

    fn operand(&self) -> Result<Operand<'_, T>> { Ok(Operand::View(self.view())) }
}

unsafe impl<T: Scalar, const M: usize, const N: usize> DenseMatrix for FixedMatrix<T, M, N> {
    const STATIC_CONTIGUOUS: bool = true;

    #[inline(always)] fn row_stride(&self) -> usize { 1 }
    #[inline(always)] fn col_stride(&self) -> usize { M }
    #[inline(always)] fn ptr_data(&self) -> *const T { self.cols.as_ptr() as *const T }
}

impl<T: Scalar, const M: usize, const N: usize> DenseMatrixMut for FixedMatrix<T, M, N> {
    #[inline(always)] fn ptr_data_mut(&mut self) -> *mut T { self.cols.as_mut_ptr() as *mut T }

    fn require_shape(&mut self, nrows: usize, ncols: usize) -> Result<()> {
        Error::check_shape(Shape::new(M, N), Shape::new(nrows, ncols))
    }
}

impl<T: Scalar, const M: usize, const N: usize> Index<(usize, usize)> for FixedMatrix<T, M, N> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        match (i < M, j < N) {
            (true, true) => &self.cols[j][i],
            _ => out_of_range(i, j, Shape::new(M, N)),
        }
    }
}

impl<T: Scalar, const M: usize, const N: usize> IndexMut<(usize, usize)> for FixedMatrix<T, M, N> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        match (i < M, j < N) {
            (true, true) => &mut self.cols[j][i],
            _ => out_of_range(i, j, Shape::new(M, N)),
        }
    }
}
