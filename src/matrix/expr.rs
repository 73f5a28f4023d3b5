/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::ops::Range;

use crate::{Scalar, Shape, Error, Result, LayoutClass};
use crate::{Matrix, MatrixView, MatrixViewMut};

/// Something with a shape that can be evaluated into a dense destination.
pub trait MatrixExpr {
    type Elem: Scalar;

    /// Number of rows, if every value of this type has the same number.
    const STATIC_ROWS: Option<usize> = None;
    /// Number of columns, if every value of this type has the same number.
    const STATIC_COLS: Option<usize> = None;

    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;

    #[inline(always)]
    fn shape(&self) -> Shape { Shape::new(self.nrows(), self.ncols()) }

    #[inline(always)]
    fn nelems(&self) -> usize { self.nrows() * self.ncols() }

    /// Write the value of the expression into `dst`.
    ///
    /// `dst` is resized if its type allows it; otherwise its shape must
    /// already match, or `Error::DimensionMismatch` is returned before
    /// anything is written.
    fn eval_into<D>(&self, dst: &mut D) -> Result<()>
    where D: DenseMatrixMut<Elem = Self::Elem> + ?Sized;

    /// Addressable storage holding the value of this expression.
    ///
    /// Dense matrices hand out a view of themselves.  Everything else is
    /// evaluated into a temporary.
    fn operand(&self) -> Result<Operand<'_, Self::Elem>> {
        let mut tmp = Matrix::zeros(self.nrows(), self.ncols());
        self.eval_into(&mut tmp)?;
        Ok(Operand::Owned(tmp))
    }

    /// Evaluate into a new matrix.
    fn eval(&self) -> Result<Matrix<Self::Elem>> {
        let mut out = Matrix::empty();
        self.eval_into(&mut out)?;
        Ok(out)
    }
}

impl<'a, E: MatrixExpr + ?Sized> MatrixExpr for &'a E {
    type Elem = E::Elem;

    const STATIC_ROWS: Option<usize> = E::STATIC_ROWS;
    const STATIC_COLS: Option<usize> = E::STATIC_COLS;

    #[inline(always)] fn nrows(&self) -> usize { (**self).nrows() }
    #[inline(always)] fn ncols(&self) -> usize { (**self).ncols() }

    #[inline]
    fn eval_into<D>(&self, dst: &mut D) -> Result<()>
    where D: DenseMatrixMut<Elem = Self::Elem> + ?Sized,
    { (**self).eval_into(dst) }

    #[inline]
    fn operand(&self) -> Result<Operand<'_, Self::Elem>> { (**self).operand() }
}

/// Storage backing an expression operand during evaluation.
#[derive(Debug)]
pub enum Operand<'a, T> {
    View(MatrixView<'a, T>),
    Owned(Matrix<T>),
}

impl<'a, T: Scalar> Operand<'a, T> {
    pub fn view(&self) -> MatrixView<'_, T> {
        match *self {
            Operand::View(v) => v,
            Operand::Owned(ref m) => m.view(),
        }
    }
}

/// An expression with addressable strided storage.
///
/// Element `(i, j)` lives at `ptr_data() + i * row_stride() + j * col_stride()`.
///
/// # Safety (for implementors)
///
/// Every `(i, j)` inside `shape()` must address a valid, initialized
/// element for as long as `self` is borrowed.
pub unsafe trait DenseMatrix: MatrixExpr {
    /// Whether every value of this type is laid out contiguously in
    /// column-major order.
    const STATIC_CONTIGUOUS: bool = false;

    fn row_stride(&self) -> usize;
    fn col_stride(&self) -> usize;
    fn ptr_data(&self) -> *const Self::Elem;

    #[inline(always)]
    fn ptr_col(&self, j: usize) -> *const Self::Elem {
        check_index(j, self.ncols(), "column");
        self.ptr_data().wrapping_add(j * self.col_stride())
    }

    #[inline(always)]
    fn ptr_row(&self, i: usize) -> *const Self::Elem {
        check_index(i, self.nrows(), "row");
        self.ptr_data().wrapping_add(i * self.row_stride())
    }

    #[inline(always)]
    fn view(&self) -> MatrixView<'_, Self::Elem> {
        // (sound by the trait's contract)
        unsafe { MatrixView::from_raw_parts(self.ptr_data(), self.shape(), (self.row_stride(), self.col_stride())) }
    }

    fn layout_class(&self) -> LayoutClass { LayoutClass::of(self) }

    /// `row_stride() == 1` and columns follow each other with no gaps.
    fn is_contiguous(&self) -> bool {
        crate::layout::is_packed(self.shape(), self.row_stride(), self.col_stride())
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> Option<&Self::Elem> {
        match self.shape().contains(i, j) {
            true => Some(unsafe { &*self.ptr_data().add(i * self.row_stride() + j * self.col_stride()) }),
            false => None,
        }
    }

    /// Element `(i, j)`, or `Error::OutOfRange`.
    #[inline]
    fn try_elem(&self, i: usize, j: usize) -> Result<Self::Elem> {
        match self.get(i, j) {
            Some(&x) => Ok(x),
            None => Err(Error::OutOfRange { i, j, shape: self.shape() }),
        }
    }

    /// Element `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if the subscripts are out of range.
    #[inline]
    fn elem(&self, i: usize, j: usize) -> Self::Elem {
        match self.get(i, j) {
            Some(&x) => x,
            None => out_of_range(i, j, self.shape()),
        }
    }

    /// Element `(i, j)` without a bounds check.
    ///
    /// With the `index-checking` feature the subscripts are checked anyway.
    ///
    /// # Safety
    ///
    /// `(i, j)` must lie inside `shape()`.
    #[inline(always)]
    unsafe fn get_unchecked(&self, i: usize, j: usize) -> &Self::Elem {
        if cfg!(feature = "index-checking") && !self.shape().contains(i, j) {
            out_of_range(i, j, self.shape());
        }
        &*self.ptr_data().add(i * self.row_stride() + j * self.col_stride())
    }

    /// Leading column-major storage and its leading dimension, in the form
    /// LAPACK expects.
    fn col_major(&self) -> Result<(&[Self::Elem], usize)> {
        let (len, ld) = col_major_extent(self.shape(), self.row_stride(), self.col_stride())?;
        Ok((unsafe { ::std::slice::from_raw_parts(self.ptr_data(), len) }, ld))
    }

    /// View of column `j`.
    #[inline]
    fn col(&self, j: usize) -> MatrixView<'_, Self::Elem> { self.view().into_col(j) }

    /// View of row `i`.
    #[inline]
    fn row(&self, i: usize) -> MatrixView<'_, Self::Elem> { self.view().into_row(i) }

    /// View of a rectangular block.
    #[inline]
    fn block(&self, rows: Range<usize>, cols: Range<usize>) -> MatrixView<'_, Self::Elem> {
        self.view().into_block(rows, cols)
    }

    /// The main diagonal, as a column.
    #[inline]
    fn diag(&self) -> MatrixView<'_, Self::Elem> { self.view().into_diag() }
}

/// A dense matrix that can be written to.
pub trait DenseMatrixMut: DenseMatrix {
    fn ptr_data_mut(&mut self) -> *mut Self::Elem;

    /// Make the shape of `self` equal to `(nrows, ncols)`.
    ///
    /// Types that own their storage may reallocate.  Types that cannot
    /// change shape return `Error::DimensionMismatch` if the shape differs.
    fn require_shape(&mut self, nrows: usize, ncols: usize) -> Result<()>;

    #[inline(always)]
    fn ptr_col_mut(&mut self, j: usize) -> *mut Self::Elem {
        check_index(j, self.ncols(), "column");
        let cs = self.col_stride();
        self.ptr_data_mut().wrapping_add(j * cs)
    }

    #[inline(always)]
    fn ptr_row_mut(&mut self, i: usize) -> *mut Self::Elem {
        check_index(i, self.nrows(), "row");
        let rs = self.row_stride();
        self.ptr_data_mut().wrapping_add(i * rs)
    }

    #[inline(always)]
    fn view_mut(&mut self) -> MatrixViewMut<'_, Self::Elem> {
        let shape = self.shape();
        let strides = (self.row_stride(), self.col_stride());
        unsafe { MatrixViewMut::from_raw_parts(self.ptr_data_mut(), shape, strides) }
    }

    /// Evaluate `expr` into `self`.
    #[inline]
    fn assign<E>(&mut self, expr: &E) -> Result<()>
    where E: MatrixExpr<Elem = Self::Elem> + ?Sized,
    { expr.eval_into(self) }

    #[inline]
    fn get_mut(&mut self, i: usize, j: usize) -> Option<&mut Self::Elem> {
        match self.shape().contains(i, j) {
            true => {
                let offset = i * self.row_stride() + j * self.col_stride();
                Some(unsafe { &mut *self.ptr_data_mut().add(offset) })
            },
            false => None,
        }
    }

    /// # Safety
    ///
    /// `(i, j)` must lie inside `shape()`.
    #[inline(always)]
    unsafe fn get_unchecked_mut(&mut self, i: usize, j: usize) -> &mut Self::Elem {
        if cfg!(feature = "index-checking") && !self.shape().contains(i, j) {
            out_of_range(i, j, self.shape());
        }
        let offset = i * self.row_stride() + j * self.col_stride();
        &mut *self.ptr_data_mut().add(offset)
    }

    /// Set element `(i, j)`, or return `Error::OutOfRange`.
    fn try_set(&mut self, i: usize, j: usize, value: Self::Elem) -> Result<()> {
        let shape = self.shape();
        match self.get_mut(i, j) {
            Some(x) => { *x = value; Ok(()) },
            None => Err(Error::OutOfRange { i, j, shape }),
        }
    }

    fn fill(&mut self, value: Self::Elem) {
        let mut v = self.view_mut();
        for j in 0..v.ncols() {
            for i in 0..v.nrows() {
                unsafe { *v.get_unchecked_mut(i, j) = value; }
            }
        }
    }

    fn col_major_mut(&mut self) -> Result<(&mut [Self::Elem], usize)> {
        let (len, ld) = col_major_extent(self.shape(), self.row_stride(), self.col_stride())?;
        Ok((unsafe { ::std::slice::from_raw_parts_mut(self.ptr_data_mut(), len) }, ld))
    }

    #[inline]
    fn col_mut(&mut self, j: usize) -> MatrixViewMut<'_, Self::Elem> { self.view_mut().into_col(j) }

    #[inline]
    fn row_mut(&mut self, i: usize) -> MatrixViewMut<'_, Self::Elem> { self.view_mut().into_row(i) }

    #[inline]
    fn block_mut(&mut self, rows: Range<usize>, cols: Range<usize>) -> MatrixViewMut<'_, Self::Elem> {
        self.view_mut().into_block(rows, cols)
    }

    #[inline]
    fn diag_mut(&mut self) -> MatrixViewMut<'_, Self::Elem> { self.view_mut().into_diag() }
}

/// Evaluation of a dense source: a layout-dispatched copy.
#[inline]
pub(crate) fn eval_dense_into<S, D>(src: &S, dst: &mut D) -> Result<()>
where
    S: DenseMatrix + ?Sized,
    D: DenseMatrixMut<Elem = S::Elem> + ?Sized,
{
    dst.require_shape(src.nrows(), src.ncols())?;
    crate::dispatch::copy(src, dst)
}

/// Length of the column-major span covering a matrix, and its leading dimension.
fn col_major_extent(shape: Shape, row_stride: usize, col_stride: usize) -> Result<(usize, usize)> {
    if shape.is_empty() {
        return Ok((0, usize::max(shape.nrows, 1)));
    }
    if row_stride != 1 && shape.nrows > 1 {
        return Err(Error::NotColumnContiguous { row_stride });
    }
    let ld = match shape.ncols {
        1 => shape.nrows,
        _ => col_stride,
    };
    if ld < shape.nrows {
        // overlapping columns; nothing LAPACK could make sense of
        return Err(Error::NotColumnContiguous { row_stride });
    }
    Ok(((shape.ncols - 1) * ld + shape.nrows, ld))
}

#[inline(always)]
fn check_index(k: usize, len: usize, what: &str) {
    if k >= len {
        panic!("{} index {} out of range (len {})", what, k, len);
    }
}

#[cold]
#[inline(never)]
pub(crate) fn out_of_range(i: usize, j: usize, shape: Shape) -> ! {
    panic!("subscripts ({}, {}) out of range for a {} matrix", i, j, shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_access() {
        let m = Matrix::from_fn(2, 3, |i, j| (10 * i + j) as f64);
        assert_eq!(m.elem(1, 2), 12.0);
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.try_elem(1, 0), Ok(10.0));
        assert_eq!(
            m.try_elem(0, 3),
            Err(Error::OutOfRange { i: 0, j: 3, shape: Shape::new(2, 3) }),
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn elem_panics() {
        Matrix::<f64>::zeros(2, 2).elem(2, 0);
    }

    #[test]
    fn try_set() {
        let mut m = Matrix::<f32>::zeros(2, 2);
        m.try_set(1, 0, 3.0).unwrap();
        assert_eq!(m[(1, 0)], 3.0);
        assert!(m.try_set(0, 2, 1.0).is_err());
    }

    #[test]
    fn col_major_extent_rules() {
        assert_eq!(col_major_extent(Shape::new(3, 4), 1, 3), Ok((12, 3)));
        assert_eq!(col_major_extent(Shape::new(3, 4), 1, 5), Ok((18, 5)));
        assert_eq!(col_major_extent(Shape::new(3, 1), 1, 0), Ok((3, 3)));
        assert_eq!(col_major_extent(Shape::new(0, 4), 7, 7), Ok((0, 1)));
        assert_eq!(
            col_major_extent(Shape::new(3, 4), 4, 1),
            Err(Error::NotColumnContiguous { row_stride: 4 }),
        );
    }

    #[test]
    fn eval_resizes_owned_destination() {
        let src = Matrix::from_fn(3, 2, |i, j| (i + j) as f64);
        let mut dst = Matrix::zeros(1, 1);
        dst.assign(&src).unwrap();
        assert_eq!(dst.shape(), Shape::new(3, 2));
        assert_eq!(dst, src);
    }

    #[test]
    fn eval_into_view_requires_exact_shape() {
        let src = Matrix::from_fn(3, 2, |i, j| (i + j) as f64);
        let mut buf = vec![0.0; 6];
        let mut view = MatrixViewMut::from_slice(&mut buf, (2, 3), (1, 2)).unwrap();
        assert_eq!(
            view.assign(&src),
            Err(Error::DimensionMismatch { expected: Shape::new(2, 3), actual: Shape::new(3, 2) }),
        );
        assert_eq!(buf, vec![0.0; 6]);
    }
}
