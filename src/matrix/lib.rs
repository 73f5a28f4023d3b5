/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Dense matrices and lazily evaluated matrix expressions.
//!
//! Everything that has a shape and can be written into a destination is a
//! [`MatrixExpr`].  Expressions that are backed by addressable, strided
//! storage are additionally [`DenseMatrix`] (and [`DenseMatrixMut`] when
//! they can be written to).  Composite expressions (`&a + &b`, `sqrt(&a)`,
//! ...) only borrow their operands, and nothing is computed until the
//! expression is assigned into a destination.
//!
//! Assignment and comparison go through [`Strategy`], which picks one of
//! five loop shapes from the layouts of the two sides.  Most of that choice
//! is made from associated consts, so the compiler folds it away; only the
//! general case looks at strides at runtime.

#[macro_use]
extern crate log;

pub use crate::errors::{Error, Result};
mod errors;

pub use crate::layout::{Shape, LayoutClass};
mod layout;

pub use crate::expr::{MatrixExpr, DenseMatrix, DenseMatrixMut, Operand};
mod expr;

pub use crate::dense::Matrix;
mod dense;

pub use crate::fixed::FixedMatrix;
mod fixed;

pub use crate::view::{MatrixView, MatrixViewMut};
mod view;

pub use crate::dispatch::{Strategy, copy, map, update};
mod dispatch;
mod vecops;

pub use crate::compare::{all_equal, all_approx};
mod compare;

pub mod ewise;
pub use crate::ewise::{add, sub, mul, div, neg, abs, sqr, sqrt, rcp, rsqrt};

pub use crate::tri::{Uplo, complete_sym, copy_tril, copy_triu};
mod tri;

mod close;

/// Element types of matrices.
///
/// This trait is sealed; it is implemented for `f32` and `f64`.
pub trait Scalar
    : ::num_traits::Float
    + ::lmat_simd::SimdElem
    + ::std::fmt::Debug
    + ::std::fmt::Display
    + Default
    + Send + Sync
    + private::Sealed
{
    /// Lossless conversion to `f64`.
    fn widen(self) -> f64;
    /// Conversion from `f64`, rounding if necessary.
    fn narrow(x: f64) -> Self;
}

impl Scalar for f32 {
    #[inline(always)] fn widen(self) -> f64 { self as f64 }
    #[inline(always)] fn narrow(x: f64) -> f32 { x as f32 }
}

impl Scalar for f64 {
    #[inline(always)] fn widen(self) -> f64 { self }
    #[inline(always)] fn narrow(x: f64) -> f64 { x }
}

mod private {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
