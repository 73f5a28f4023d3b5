/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::marker::PhantomData;
use std::ops::{Index, IndexMut, Range};

use crate::{Scalar, Shape, Error, Result};
use crate::{MatrixExpr, DenseMatrix, DenseMatrixMut, Operand};
use crate::expr::{eval_dense_into, out_of_range};

/// A borrowed, strided, read-only matrix.
#[derive(Debug)]
pub struct MatrixView<'a, T> {
    ptr: *const T,
    shape: Shape,
    row_stride: usize,
    col_stride: usize,
    _marker: PhantomData<&'a T>,
}

/// A borrowed, strided, writable matrix.
///
/// Assigning into one of these writes elements; the pointer, shape and
/// strides never change.
#[derive(Debug)]
pub struct MatrixViewMut<'a, T> {
    ptr: *mut T,
    shape: Shape,
    row_stride: usize,
    col_stride: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> Clone for MatrixView<'a, T> {
    fn clone(&self) -> Self { *self }
}
impl<'a, T> Copy for MatrixView<'a, T> {}

unsafe impl<'a, T: Sync> Send for MatrixView<'a, T> {}
unsafe impl<'a, T: Sync> Sync for MatrixView<'a, T> {}
unsafe impl<'a, T: Send> Send for MatrixViewMut<'a, T> {}

/// Number of elements a strided layout spans, from the first element
/// through the furthest one addressed.  `None` if that overflows.
fn span(shape: Shape, (row_stride, col_stride): (usize, usize)) -> Option<usize> {
    if shape.is_empty() {
        return Some(0);
    }
    let rows = (shape.nrows - 1).checked_mul(row_stride)?;
    let cols = (shape.ncols - 1).checked_mul(col_stride)?;
    rows.checked_add(cols)?.checked_add(1)
}

fn check_span(len: usize, shape: Shape, strides: (usize, usize)) -> Result<()> {
    match span(shape, strides) {
        Some(needed) if needed <= len => Ok(()),
        Some(needed) => Err(Error::BufferTooSmall { len, needed }),
        None => Err(Error::BufferTooSmall { len, needed: usize::MAX }),
    }
}

// Accepts the layouts where one dimension's stride steps over the whole
// extent of the other: column-major, row-major and padded variants of both.
// Interleaved layouts that happen to be injective are rejected too.
fn check_disjoint(shape: Shape, (rs, cs): (usize, usize)) -> Result<()> {
    let (r, c) = (shape.nrows, shape.ncols);
    let ok = match () {
        _ if shape.nelems() <= 1 => true,
        _ if c == 1 => rs > 0,
        _ if r == 1 => cs > 0,
        _ => {
            // span() already rejected overflow, so these products fit
            (rs > 0 && cs >= (r - 1) * rs + 1) || (cs > 0 && rs >= (c - 1) * cs + 1)
        },
    };
    match ok {
        true => Ok(()),
        false => Err(Error::OverlappingStrides { row_stride: rs, col_stride: cs }),
    }
}

#[inline]
fn check_range(range: &Range<usize>, len: usize, what: &str) {
    assert!(
        range.start <= range.end && range.end <= len,
        "{} range {:?} out of bounds (len {})", what, range, len,
    );
}

// Sub-view arithmetic shared by both view types.  Each returns the offset
// of the new first element along with the new shape and strides.
struct Sub {
    offset: usize,
    shape: Shape,
    strides: (usize, usize),
}

impl Sub {
    fn col(shape: Shape, (rs, cs): (usize, usize), j: usize) -> Sub {
        assert!(j < shape.ncols, "column index {} out of range (len {})", j, shape.ncols);
        Sub { offset: j * cs, shape: Shape::new(shape.nrows, 1), strides: (rs, cs) }
    }

    fn row(shape: Shape, (rs, cs): (usize, usize), i: usize) -> Sub {
        assert!(i < shape.nrows, "row index {} out of range (len {})", i, shape.nrows);
        Sub { offset: i * rs, shape: Shape::new(1, shape.ncols), strides: (rs, cs) }
    }

    fn block(shape: Shape, (rs, cs): (usize, usize), rows: Range<usize>, cols: Range<usize>) -> Sub {
        check_range(&rows, shape.nrows, "row");
        check_range(&cols, shape.ncols, "column");
        let offset = match rows.start < rows.end && cols.start < cols.end {
            true => rows.start * rs + cols.start * cs,
            false => 0,
        };
        Sub { offset, shape: Shape::new(rows.len(), cols.len()), strides: (rs, cs) }
    }

    fn diag(shape: Shape, (rs, cs): (usize, usize)) -> Sub {
        let len = usize::min(shape.nrows, shape.ncols);
        Sub { offset: 0, shape: Shape::new(len, 1), strides: (rs + cs, len) }
    }
}

impl<'a, T: Scalar> MatrixView<'a, T> {
    /// View `data` with the given shape and `(row_stride, col_stride)`.
    ///
    /// Fails with `Error::BufferTooSmall` unless every addressed element
    /// lies inside `data`.
    pub fn from_slice(data: &'a [T], shape: impl Into<Shape>, strides: (usize, usize)) -> Result<Self> {
        let shape = shape.into();
        check_span(data.len(), shape, strides)?;
        Ok(unsafe { Self::from_raw_parts(data.as_ptr(), shape, strides) })
    }

    /// View `data` as a packed column-major matrix.
    pub fn from_col_major_slice(data: &'a [T], nrows: usize, ncols: usize) -> Result<Self> {
        Self::from_slice(data, (nrows, ncols), (1, nrows))
    }

    /// # Safety
    ///
    /// For the lifetime `'a`, every element addressed by `shape` and
    /// `strides` must be valid for reads and must not be written through
    /// any other pointer.
    #[inline(always)]
    pub unsafe fn from_raw_parts(ptr: *const T, shape: Shape, (row_stride, col_stride): (usize, usize)) -> Self {
        MatrixView { ptr, shape, row_stride, col_stride, _marker: PhantomData }
    }

    #[inline(always)]
    fn sub(self, s: Sub) -> Self {
        unsafe { Self::from_raw_parts(self.ptr.wrapping_add(s.offset), s.shape, s.strides) }
    }

    #[inline(always)]
    fn strides(&self) -> (usize, usize) { (self.row_stride, self.col_stride) }

    pub fn into_col(self, j: usize) -> Self { self.sub(Sub::col(self.shape, self.strides(), j)) }
    pub fn into_row(self, i: usize) -> Self { self.sub(Sub::row(self.shape, self.strides(), i)) }
    pub fn into_diag(self) -> Self { self.sub(Sub::diag(self.shape, self.strides())) }

    pub fn into_block(self, rows: Range<usize>, cols: Range<usize>) -> Self {
        self.sub(Sub::block(self.shape, self.strides(), rows, cols))
    }

    /// Element `(i, j)` with the lifetime of the underlying data.
    pub fn at(self, i: usize, j: usize) -> &'a T {
        match self.shape.contains(i, j) {
            true => unsafe { &*self.ptr.add(i * self.row_stride + j * self.col_stride) },
            false => out_of_range(i, j, self.shape),
        }
    }
}

impl<'a, T: Scalar> MatrixViewMut<'a, T> {
    /// Mutable counterpart of [`MatrixView::from_slice`].
    ///
    /// Also fails with `Error::OverlappingStrides` if two subscripts could
    /// address the same element.
    pub fn from_slice(data: &'a mut [T], shape: impl Into<Shape>, strides: (usize, usize)) -> Result<Self> {
        let shape = shape.into();
        check_span(data.len(), shape, strides)?;
        check_disjoint(shape, strides)?;
        Ok(unsafe { Self::from_raw_parts(data.as_mut_ptr(), shape, strides) })
    }

    pub fn from_col_major_slice(data: &'a mut [T], nrows: usize, ncols: usize) -> Result<Self> {
        Self::from_slice(data, (nrows, ncols), (1, nrows))
    }

    /// # Safety
    ///
    /// For the lifetime `'a`, every element addressed by `shape` and
    /// `strides` must be valid for reads and writes and must not be accessed
    /// through any other pointer.  Distinct subscripts must address
    /// distinct elements.
    #[inline(always)]
    pub unsafe fn from_raw_parts(ptr: *mut T, shape: Shape, (row_stride, col_stride): (usize, usize)) -> Self {
        MatrixViewMut { ptr, shape, row_stride, col_stride, _marker: PhantomData }
    }

    #[inline(always)]
    fn sub(self, s: Sub) -> Self {
        unsafe { Self::from_raw_parts(self.ptr.wrapping_add(s.offset), s.shape, s.strides) }
    }

    #[inline(always)]
    fn strides(&self) -> (usize, usize) { (self.row_stride, self.col_stride) }

    /// A shorter-lived copy of this view.
    pub fn reborrow(&mut self) -> MatrixViewMut<'_, T> {
        unsafe { MatrixViewMut::from_raw_parts(self.ptr, self.shape, self.strides()) }
    }

    pub fn as_view(&self) -> MatrixView<'_, T> {
        unsafe { MatrixView::from_raw_parts(self.ptr, self.shape, self.strides()) }
    }

    pub fn into_view(self) -> MatrixView<'a, T> {
        unsafe { MatrixView::from_raw_parts(self.ptr, self.shape, self.strides()) }
    }

    pub fn into_col(self, j: usize) -> Self {
        let s = Sub::col(self.shape, self.strides(), j);
        self.sub(s)
    }

    pub fn into_row(self, i: usize) -> Self {
        let s = Sub::row(self.shape, self.strides(), i);
        self.sub(s)
    }

    pub fn into_diag(self) -> Self {
        let s = Sub::diag(self.shape, self.strides());
        self.sub(s)
    }

    pub fn into_block(self, rows: Range<usize>, cols: Range<usize>) -> Self {
        let s = Sub::block(self.shape, self.strides(), rows, cols);
        self.sub(s)
    }
}

macro_rules! impl_view_traits {
    ($View:ident) => {
        impl<'a, T: Scalar> MatrixExpr for $View<'a, T> {
            type Elem = T;

            #[inline(always)] fn nrows(&self) -> usize { self.shape.nrows }
            #[inline(always)] fn ncols(&self) -> usize { self.shape.ncols }

            fn eval_into<D>(&self, dst: &mut D) -> Result<()>
            where D: DenseMatrixMut<Elem = T> + ?Sized,
            { eval_dense_into(self, dst) }

            fn operand(&self) -> Result<Operand<'_, T>> { Ok(Operand::View(self.view())) }
        }

        unsafe impl<'a, T: Scalar> DenseMatrix for $View<'a, T> {
            #[inline(always)] fn row_stride(&self) -> usize { self.row_stride }
            #[inline(always)] fn col_stride(&self) -> usize { self.col_stride }
            #[inline(always)] fn ptr_data(&self) -> *const T { self.ptr as *const T }
        }

        impl<'a, T: Scalar> Index<(usize, usize)> for $View<'a, T> {
            type Output = T;

            #[inline]
            fn index(&self, (i, j): (usize, usize)) -> &T {
                match self.get(i, j) {
                    Some(x) => x,
                    None => out_of_range(i, j, self.shape),
                }
            }
        }
    };
}

impl_view_traits!(MatrixView);
impl_view_traits!(MatrixViewMut);

impl<'a, T: Scalar> DenseMatrixMut for MatrixViewMut<'a, T> {
    #[inline(always)] fn ptr_data_mut(&mut self) -> *mut T { self.ptr }

    fn require_shape(&mut self, nrows: usize, ncols: usize) -> Result<()> {
        Error::check_shape(self.shape, Shape::new(nrows, ncols))
    }
}

impl<'a, T: Scalar> IndexMut<(usize, usize)> for MatrixViewMut<'a, T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        let shape = self.shape;
        match self.get_mut(i, j) {
            Some(x) => x,
            None => out_of_range(i, j, shape),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Matrix;

    #[test]
    fn from_slice_checks_span() {
        let data = [0.0f64; 10];
        assert!(MatrixView::from_slice(&data, (5, 2), (1, 5)).is_ok());
        assert!(MatrixView::from_slice(&data, (5, 1), (2, 0)).is_ok());
        assert!(MatrixView::from_slice(&data, (5, 2), (2, 1)).is_ok());
        assert_eq!(
            MatrixView::from_slice(&data, (4, 3), (1, 4)).map(|_| ()),
            Err(Error::BufferTooSmall { len: 10, needed: 12 }),
        );
        assert!(MatrixView::from_slice(&data[..0], (0, 3), (1, 0)).is_ok());
    }

    #[test]
    fn from_slice_rejects_overflowing_strides() {
        let data = [1.0f64, 2.0];
        let huge: Result<()> = Err(Error::BufferTooSmall { len: 2, needed: usize::MAX });
        assert_eq!(MatrixView::from_slice(&data, (2, 1), (usize::MAX, 0)).map(|_| ()), huge);
        assert_eq!(MatrixView::from_slice(&data, (1, 3), (0, usize::MAX / 2 + 1)).map(|_| ()), huge);
        // each product fits, the total does not
        assert_eq!(MatrixView::from_slice(&data, (2, 2), (usize::MAX / 2 + 1, usize::MAX / 2)).map(|_| ()), huge);

        let mut buf = [0.0f64; 2];
        assert_eq!(MatrixViewMut::from_slice(&mut buf, (2, 1), (usize::MAX, 0)).map(|_| ()), huge);
    }

    #[test]
    fn mutable_views_reject_aliasing_strides() {
        let mut buf = [0.0f64; 12];
        let overlap = |rs, cs| -> Result<()> { Err(Error::OverlappingStrides { row_stride: rs, col_stride: cs }) };

        assert_eq!(MatrixViewMut::from_slice(&mut buf, (2, 2), (0, 0)).map(|_| ()), overlap(0, 0));
        assert_eq!(MatrixViewMut::from_slice(&mut buf, (3, 1), (0, 5)).map(|_| ()), overlap(0, 5));
        assert_eq!(MatrixViewMut::from_slice(&mut buf, (1, 3), (4, 0)).map(|_| ()), overlap(4, 0));
        // column 1 starts inside column 0
        assert_eq!(MatrixViewMut::from_slice(&mut buf, (3, 2), (1, 2)).map(|_| ()), overlap(1, 2));

        assert!(MatrixViewMut::from_slice(&mut buf, (1, 1), (0, 0)).is_ok());
        assert!(MatrixViewMut::from_slice(&mut buf, (3, 2), (1, 3)).is_ok());
        assert!(MatrixViewMut::from_slice(&mut buf, (3, 2), (2, 1)).is_ok());
        assert!(MatrixViewMut::from_slice(&mut buf, (0, 4), (0, 0)).is_ok());

        // broadcasting reads are fine
        assert!(MatrixView::from_slice(&buf, (2, 2), (0, 0)).is_ok());
    }

    #[test]
    fn sub_views() {
        let m = Matrix::from_fn(4, 3, |i, j| (10 * i + j) as f64);

        let c = m.col(2);
        assert_eq!(c.shape(), Shape::new(4, 1));
        assert_eq!(c[(3, 0)], 32.0);

        let r = m.row(1);
        assert_eq!(r.shape(), Shape::new(1, 3));
        assert_eq!((r[(0, 0)], r[(0, 2)]), (10.0, 12.0));

        let b = m.block(1..3, 1..3);
        assert_eq!(b, Matrix::from_rows(&[[11.0, 12.0], [21.0, 22.0]]));

        let d = m.diag();
        assert_eq!(d, Matrix::from_columns(&[[0.0, 11.0, 22.0]]));

        let e = m.block(4..4, 0..3);
        assert!(e.shape().is_empty());
    }

    #[test]
    #[should_panic(expected = "range")]
    fn block_checks_bounds() {
        Matrix::<f64>::zeros(2, 2).block(0..3, 0..1);
    }

    #[test]
    fn write_through_views() {
        let mut m = Matrix::<f64>::zeros(3, 3);
        m.diag_mut().fill(1.0);
        assert_eq!(m, Matrix::identity(3));

        {
            let mut col = m.col_mut(0);
            col[(2, 0)] = 7.0;
        }
        assert_eq!(m[(2, 0)], 7.0);

        let src = Matrix::from_rows(&[[5.0, 6.0]]);
        m.row_mut(1).block_mut(0..1, 1..3).assign(&src).unwrap();
        assert_eq!((m[(1, 1)], m[(1, 2)]), (5.0, 6.0));
    }

    #[test]
    fn strided_view_over_slice() {
        let mut buf: Vec<f32> = (0..12).map(|x| x as f32).collect();
        let mut v = MatrixViewMut::from_slice(&mut buf, (2, 3), (3, 1)).unwrap();
        assert_eq!(v[(1, 2)], 5.0);
        v[(1, 0)] = -1.0;
        assert_eq!(v.as_view().elem(1, 0), -1.0);
        assert_eq!(buf[3], -1.0);
    }
}
