/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Strided vector kernels.
//!
//! A kernel walks `n` elements of a source and a second operand, each with
//! its own stride.  The stride types are generic so that the unit-stride
//! case gets its own monomorphized loop.

use std::ptr;

use lmat_simd::{SimdElem, NumPack, BoolPack};

use crate::Scalar;

pub(crate) trait Stride: Copy {
    const UNIT: bool;
    fn get(self) -> usize;
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct Unit;

#[derive(Debug, Copy, Clone)]
pub(crate) struct Step(pub(crate) usize);

impl Stride for Unit {
    const UNIT: bool = true;
    #[inline(always)] fn get(self) -> usize { 1 }
}

impl Stride for Step {
    const UNIT: bool = false;
    #[inline(always)] fn get(self) -> usize { self.0 }
}

pub(crate) trait RawPtr: Copy {
    fn offset_by(self, count: usize) -> Self;
}

impl<T> RawPtr for *const T {
    #[inline(always)] fn offset_by(self, count: usize) -> Self { self.wrapping_add(count) }
}

impl<T> RawPtr for *mut T {
    #[inline(always)] fn offset_by(self, count: usize) -> Self { self.wrapping_add(count) }
}

/// One pass over a pair of strided vectors.
pub(crate) trait VecKernel<T> {
    /// Pointer type of the second operand.
    type Rhs: RawPtr;

    /// Process `n` elements.  Returns `false` to stop the traversal early.
    ///
    /// # Safety
    ///
    /// `a + k * sa` and `b + k * sb` must be valid for every `k < n`, and
    /// must not overlap when `b` is written.
    unsafe fn run<SA: Stride, SB: Stride>(&mut self, n: usize, a: *const T, sa: SA, b: Self::Rhs, sb: SB) -> bool;
}

/// Exact equality.
pub(crate) struct Equal;

/// `|a - b| <= tol` for every element.
pub(crate) struct Approx<T>(pub(crate) T);

/// `b = a`.
pub(crate) struct CopyKernel;

/// `b = f(a)`.
pub(crate) struct MapKernel<F>(pub(crate) F);

/// `b = f(b, a)`.
pub(crate) struct UpdateKernel<F>(pub(crate) F);

impl<T: Scalar> VecKernel<T> for Equal {
    type Rhs = *const T;

    #[inline]
    unsafe fn run<SA: Stride, SB: Stride>(&mut self, n: usize, a: *const T, sa: SA, b: *const T, sb: SB) -> bool {
        if n == 0 {
            return true;
        }
        if SA::UNIT && SB::UNIT {
            return packed_equal(std::slice::from_raw_parts(a, n), std::slice::from_raw_parts(b, n));
        }
        let (sa, sb) = (sa.get(), sb.get());
        (0..n).all(|k| *a.add(k * sa) == *b.add(k * sb))
    }
}

impl<T: Scalar> VecKernel<T> for Approx<T> {
    type Rhs = *const T;

    #[inline]
    unsafe fn run<SA: Stride, SB: Stride>(&mut self, n: usize, a: *const T, sa: SA, b: *const T, sb: SB) -> bool {
        if n == 0 {
            return true;
        }
        let tol = self.0;
        if SA::UNIT && SB::UNIT {
            return packed_approx(std::slice::from_raw_parts(a, n), std::slice::from_raw_parts(b, n), tol);
        }
        let (sa, sb) = (sa.get(), sb.get());
        (0..n).all(|k| (*a.add(k * sa) - *b.add(k * sb)).abs() <= tol)
    }
}

impl<T: Scalar> VecKernel<T> for CopyKernel {
    type Rhs = *mut T;

    #[inline]
    unsafe fn run<SA: Stride, SB: Stride>(&mut self, n: usize, a: *const T, sa: SA, b: *mut T, sb: SB) -> bool {
        if n == 0 {
            return true;
        }
        if SA::UNIT && SB::UNIT {
            ptr::copy_nonoverlapping(a, b, n);
        } else {
            let (sa, sb) = (sa.get(), sb.get());
            for k in 0..n {
                *b.add(k * sb) = *a.add(k * sa);
            }
        }
        true
    }
}

impl<T: Scalar, F: FnMut(T) -> T> VecKernel<T> for MapKernel<F> {
    type Rhs = *mut T;

    #[inline]
    unsafe fn run<SA: Stride, SB: Stride>(&mut self, n: usize, a: *const T, sa: SA, b: *mut T, sb: SB) -> bool {
        let (sa, sb) = (sa.get(), sb.get());
        for k in 0..n {
            *b.add(k * sb) = (self.0)(*a.add(k * sa));
        }
        true
    }
}

impl<T: Scalar, F: FnMut(T, T) -> T> VecKernel<T> for UpdateKernel<F> {
    type Rhs = *mut T;

    #[inline]
    unsafe fn run<SA: Stride, SB: Stride>(&mut self, n: usize, a: *const T, sa: SA, b: *mut T, sb: SB) -> bool {
        let (sa, sb) = (sa.get(), sb.get());
        for k in 0..n {
            let d = b.add(k * sb);
            *d = (self.0)(*d, *a.add(k * sa));
        }
        true
    }
}

fn packed_equal<T: Scalar>(a: &[T], b: &[T]) -> bool {
    let width = <T as SimdElem>::WIDTH;
    let (a_chunks, b_chunks) = (a.chunks_exact(width), b.chunks_exact(width));
    let (a_tail, b_tail) = (a_chunks.remainder(), b_chunks.remainder());
    for (x, y) in a_chunks.zip(b_chunks) {
        if !T::Pack::load(x).cmp_eq(T::Pack::load(y)).all() {
            return false;
        }
    }
    a_tail.iter().zip(b_tail).all(|(x, y)| x == y)
}

fn packed_approx<T: Scalar>(a: &[T], b: &[T], tol: T) -> bool {
    let width = <T as SimdElem>::WIDTH;
    let tols = T::Pack::splat(tol);
    let (a_chunks, b_chunks) = (a.chunks_exact(width), b.chunks_exact(width));
    let (a_tail, b_tail) = (a_chunks.remainder(), b_chunks.remainder());
    for (x, y) in a_chunks.zip(b_chunks) {
        let diff = T::Pack::load(x).sub(T::Pack::load(y)).abs();
        if !diff.cmp_le(tols).all() {
            return false;
        }
    }
    a_tail.iter().zip(b_tail).all(|(&x, &y)| (x - y).abs() <= tol)
}
