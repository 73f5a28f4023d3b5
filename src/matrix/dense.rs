/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::ops::{Index, IndexMut};

use ndarray::{Array2, ArrayView2};
use slice_of_array::prelude::*;

use crate::{Scalar, Result};
use crate::{MatrixExpr, DenseMatrix, DenseMatrixMut, Operand};
use crate::expr::{eval_dense_into, out_of_range};

#[cfg(feature = "serde-support")]
use serde::{Serialize, Deserialize};

/// An owning, column-major, dynamically sized matrix.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(try_from = "RawMatrix<T>"))]
#[cfg_attr(feature = "serde-support", serde(bound(deserialize = "T: Deserialize<'de>")))]
pub struct Matrix<T> {
    nrows: usize,
    ncols: usize,
    data: Vec<T>,
}

impl<T: Scalar> Matrix<T> {
    /// A `0 x 0` matrix.
    pub fn empty() -> Self { Matrix { nrows: 0, ncols: 0, data: vec![] } }

    pub fn zeros(nrows: usize, ncols: usize) -> Self { Self::from_elem(nrows, ncols, T::zero()) }

    pub fn from_elem(nrows: usize, ncols: usize, value: T) -> Self {
        Matrix { nrows, ncols, data: vec![value; nrows * ncols] }
    }

    pub fn from_fn(nrows: usize, ncols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for j in 0..ncols {
            for i in 0..nrows {
                data.push(f(i, j));
            }
        }
        Matrix { nrows, ncols, data }
    }

    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() })
    }

    /// # Panics
    ///
    /// Panics if `data.len() != nrows * ncols`.
    pub fn from_col_major_vec(nrows: usize, ncols: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), nrows * ncols, "wrong number of elements for a {}x{} matrix", nrows, ncols);
        Matrix { nrows, ncols, data }
    }

    /// Build a matrix whose columns are the given arrays.
    pub fn from_columns<const M: usize>(cols: &[[T; M]]) -> Self {
        Matrix { nrows: M, ncols: cols.len(), data: cols.flat().to_vec() }
    }

    /// Build a matrix whose rows are the given arrays.
    pub fn from_rows<const N: usize>(rows: &[[T; N]]) -> Self {
        Self::from_fn(rows.len(), N, |i, j| rows[i][j])
    }

    pub fn as_slice(&self) -> &[T] { &self.data }
    pub fn as_mut_slice(&mut self) -> &mut [T] { &mut self.data }

    /// The column-major element buffer.
    pub fn into_vec(self) -> Vec<T> { self.data }

    pub fn to_ndarray(&self) -> Array2<T> {
        Array2::from_shape_fn((self.nrows, self.ncols), |(i, j)| self[(i, j)])
    }

    /// The columns, as fixed-size arrays.
    ///
    /// # Panics
    ///
    /// Panics if `nrows != M`.
    pub fn to_columns<const M: usize>(&self) -> Vec<[T; M]> {
        assert_eq!(self.nrows, M, "matrix has {} rows, not {}", self.nrows, M);
        self.data.nest().to_vec()
    }
}

impl<T: Scalar> Default for Matrix<T> {
    fn default() -> Self { Matrix::empty() }
}

impl<'a, T: Scalar> From<ArrayView2<'a, T>> for Matrix<T> {
    fn from(a: ArrayView2<'a, T>) -> Self {
        Matrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
    }
}

impl<T: Scalar> From<Array2<T>> for Matrix<T> {
    fn from(a: Array2<T>) -> Self { Matrix::from(a.view()) }
}

impl<T: Scalar> MatrixExpr for Matrix<T> {
    type Elem = T;

    #[inline(always)] fn nrows(&self) -> usize { self.nrows }
    #[inline(always)] fn ncols(&self) -> usize { self.ncols }

    fn eval_into<D>(&self, dst: &mut D) -> Result<()>
    where D: DenseMatrixMut<Elem = T> + ?Sized,
    { eval_dense_into(self, dst) }

    fn operand(&self) -> Result<Operand<'_, T>> { Ok(Operand::View(self.view())) }
}

unsafe impl<T: Scalar> DenseMatrix for Matrix<T> {
    const STATIC_CONTIGUOUS: bool = true;

    #[inline(always)] fn row_stride(&self) -> usize { 1 }
    #[inline(always)] fn col_stride(&self) -> usize { self.nrows }
    #[inline(always)] fn ptr_data(&self) -> *const T { self.data.as_ptr() }
}

impl<T: Scalar> DenseMatrixMut for Matrix<T> {
    #[inline(always)] fn ptr_data_mut(&mut self) -> *mut T { self.data.as_mut_ptr() }

    /// Reallocates only when the number of elements changes; the contents
    /// are unspecified afterwards.
    fn require_shape(&mut self, nrows: usize, ncols: usize) -> Result<()> {
        let len = nrows * ncols;
        if len != self.data.len() {
            trace!("reallocating {}x{} matrix as {}x{}", self.nrows, self.ncols, nrows, ncols);
            self.data = vec![T::zero(); len];
        }
        self.nrows = nrows;
        self.ncols = ncols;
        Ok(())
    }
}

impl<T: Scalar> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        match self.get(i, j) {
            Some(x) => x,
            None => out_of_range(i, j, self.shape()),
        }
    }
}

impl<T: Scalar> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        let shape = self.shape();
        match self.get_mut(i, j) {
            Some(x) => x,
            None => out_of_range(i, j, shape),
        }
    }
}

#[cfg(feature = "serde-support")]
#[derive(Deserialize)]
struct RawMatrix<T> {
    nrows: usize,
    ncols: usize,
    data: Vec<T>,
}

#[cfg(feature = "serde-support")]
impl<T> ::std::convert::TryFrom<RawMatrix<T>> for Matrix<T> {
    type Error = crate::Error;

    fn try_from(raw: RawMatrix<T>) -> Result<Self> {
        let needed = raw.nrows * raw.ncols;
        if raw.data.len() != needed {
            return Err(crate::Error::BufferTooSmall { len: raw.data.len(), needed });
        }
        Ok(Matrix { nrows: raw.nrows, ncols: raw.ncols, data: raw.data })
    }
}
