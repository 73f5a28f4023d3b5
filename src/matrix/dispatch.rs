/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Layout-specialized traversal of two matrices of equal shape.

use crate::{Shape, Error, Result};
use crate::{DenseMatrix, DenseMatrixMut};
use crate::layout::{common_dim, is_packed};
use crate::vecops::{VecKernel, Stride, Unit, Step, RawPtr};
use crate::vecops::{CopyKernel, MapKernel, UpdateKernel};

/// Loop shape used to walk a pair of matrices.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Both sides are a single element.
    Scalar,
    /// Both sides are packed column-major; one flat loop.
    Contiguous,
    /// A single column; one loop over rows.
    Column,
    /// A single row; one loop over columns.
    Row,
    /// One column loop per column, left to right.
    General,
}

impl Strategy {
    /// The strategy implied by the types alone.
    #[inline(always)]
    pub fn select<A, B>() -> Strategy
    where A: DenseMatrix + ?Sized, B: DenseMatrix + ?Sized,
    {
        let rows = common_dim(A::STATIC_ROWS, B::STATIC_ROWS);
        let cols = common_dim(A::STATIC_COLS, B::STATIC_COLS);
        match (rows, cols) {
            (Some(1), Some(1)) => Strategy::Scalar,
            _ if A::STATIC_CONTIGUOUS && B::STATIC_CONTIGUOUS => Strategy::Contiguous,
            (_, Some(1)) => Strategy::Column,
            (Some(1), _) => Strategy::Row,
            _ => Strategy::General,
        }
    }

    /// The strategy for a particular pair of equally shaped matrices.
    ///
    /// Only a `General` selection is refined using runtime information.
    #[inline]
    pub fn resolve<A, B>(a: &A, b: &B) -> Strategy
    where A: DenseMatrix + ?Sized, B: DenseMatrix + ?Sized,
    {
        match Self::select::<A, B>() {
            Strategy::General => {},
            s => return s,
        }

        let shape = a.shape();
        debug_assert_eq!(shape, b.shape());
        match (shape.nrows, shape.ncols) {
            (1, 1) => Strategy::Scalar,
            (_, 1) => Strategy::Column,
            (1, _) => Strategy::Row,
            _ if is_packed(shape, a.row_stride(), a.col_stride())
                && is_packed(shape, b.row_stride(), b.col_stride()) => Strategy::Contiguous,
            _ => Strategy::General,
        }
    }
}

/// Pointer and strides of one side of a traversal.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Side<P> {
    ptr: P,
    rs: usize,
    cs: usize,
}

impl<T> Side<*const T> {
    #[inline(always)]
    pub(crate) fn of<M: DenseMatrix<Elem = T> + ?Sized>(m: &M) -> Self {
        Side { ptr: m.ptr_data(), rs: m.row_stride(), cs: m.col_stride() }
    }
}

impl<T> Side<*mut T> {
    #[inline(always)]
    pub(crate) fn of_mut<M: DenseMatrixMut<Elem = T> + ?Sized>(m: &mut M) -> Self {
        let (rs, cs) = (m.row_stride(), m.col_stride());
        Side { ptr: m.ptr_data_mut(), rs, cs }
    }
}

/// Run `kernel` over every element pair.  Returns `false` as soon as the
/// kernel does.
///
/// # Safety
///
/// Both sides must address valid elements for every subscript in `shape`,
/// and `strategy` must be valid for them (see [`Strategy::resolve`]).
pub(crate) unsafe fn execute<T, K>(
    kernel: &mut K,
    strategy: Strategy,
    shape: Shape,
    a: Side<*const T>,
    b: Side<K::Rhs>,
) -> bool
where K: VecKernel<T>,
{
    match strategy {
        Strategy::Scalar => kernel.run(1, a.ptr, Unit, b.ptr, Unit),
        Strategy::Contiguous => kernel.run(shape.nelems(), a.ptr, Unit, b.ptr, Unit),
        Strategy::Column => strided(kernel, shape.nrows, a.ptr, a.rs, b.ptr, b.rs),
        Strategy::Row => strided(kernel, shape.ncols, a.ptr, a.cs, b.ptr, b.cs),
        Strategy::General => match (a.rs == 1, b.rs == 1) {
            (true, true) => columns(kernel, shape, a, Unit, b, Unit),
            (true, false) => columns(kernel, shape, a, Unit, b, Step(b.rs)),
            (false, true) => columns(kernel, shape, a, Step(a.rs), b, Unit),
            (false, false) => columns(kernel, shape, a, Step(a.rs), b, Step(b.rs)),
        },
    }
}

#[inline(always)]
unsafe fn strided<T, K>(kernel: &mut K, n: usize, a: *const T, sa: usize, b: K::Rhs, sb: usize) -> bool
where K: VecKernel<T>,
{
    match (sa == 1, sb == 1) {
        (true, true) => kernel.run(n, a, Unit, b, Unit),
        (true, false) => kernel.run(n, a, Unit, b, Step(sb)),
        (false, true) => kernel.run(n, a, Step(sa), b, Unit),
        (false, false) => kernel.run(n, a, Step(sa), b, Step(sb)),
    }
}

#[inline(always)]
unsafe fn columns<T, K, SA, SB>(
    kernel: &mut K,
    shape: Shape,
    a: Side<*const T>,
    sa: SA,
    b: Side<K::Rhs>,
    sb: SB,
) -> bool
where K: VecKernel<T>, SA: Stride, SB: Stride,
{
    for j in 0..shape.ncols {
        let a_col = a.ptr.offset_by(j * a.cs);
        let b_col = b.ptr.offset_by(j * b.cs);
        if !kernel.run(shape.nrows, a_col, sa, b_col, sb) {
            return false;
        }
    }
    true
}

/// Drive a writing kernel from `src` into `dst`.
fn write_with<S, D, K>(src: &S, dst: &mut D, mut kernel: K) -> Result<()>
where
    S: DenseMatrix + ?Sized,
    D: DenseMatrixMut<Elem = S::Elem> + ?Sized,
    K: VecKernel<S::Elem, Rhs = *mut S::Elem>,
{
    Error::check_shape(dst.shape(), src.shape())?;
    let strategy = Strategy::resolve(src, &*dst);
    let shape = src.shape();
    unsafe {
        execute(&mut kernel, strategy, shape, Side::of(src), Side::of_mut(dst));
    }
    Ok(())
}

/// Copy the elements of `src` into `dst`, which must have the same shape.
pub fn copy<S, D>(src: &S, dst: &mut D) -> Result<()>
where
    S: DenseMatrix + ?Sized,
    D: DenseMatrixMut<Elem = S::Elem> + ?Sized,
{ write_with(src, dst, CopyKernel) }

/// `dst[i, j] = f(src[i, j])` for two matrices of the same shape.
pub fn map<S, D, F>(src: &S, dst: &mut D, f: F) -> Result<()>
where
    S: DenseMatrix + ?Sized,
    D: DenseMatrixMut<Elem = S::Elem> + ?Sized,
    F: FnMut(S::Elem) -> S::Elem,
{ write_with(src, dst, MapKernel(f)) }

/// `dst[i, j] = f(dst[i, j], src[i, j])` for two matrices of the same shape.
pub fn update<S, D, F>(src: &S, dst: &mut D, f: F) -> Result<()>
where
    S: DenseMatrix + ?Sized,
    D: DenseMatrixMut<Elem = S::Elem> + ?Sized,
    F: FnMut(S::Elem, S::Elem) -> S::Elem,
{ write_with(src, dst, UpdateKernel(f)) }

/// Drive a read-only kernel over two matrices; shapes must already agree.
pub(crate) fn test_with<A, B, K>(a: &A, b: &B, mut kernel: K) -> bool
where
    A: DenseMatrix + ?Sized,
    B: DenseMatrix<Elem = A::Elem> + ?Sized,
    K: VecKernel<A::Elem, Rhs = *const A::Elem>,
{
    debug_assert_eq!(a.shape(), b.shape());
    let strategy = Strategy::resolve(a, b);
    unsafe { execute(&mut kernel, strategy, a.shape(), Side::of(a), Side::of(b)) }
}
