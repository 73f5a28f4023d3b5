/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Dense column-major matrices for `f32` and `f64`.
//!
//! Storage, views and lazy elementwise expressions live in [`lmat_matrix`];
//! the positive-definite routines live in [`lmat_linalg`]. Everything users
//! normally need is re-exported here.

pub use lmat_matrix::{
    Scalar,
    Error, Result,
    Shape, LayoutClass,
    MatrixExpr, DenseMatrix, DenseMatrixMut, Operand,
    Matrix, FixedMatrix, MatrixView, MatrixViewMut,
    Strategy, copy, map, update,
    all_equal, all_approx,
    add, sub, mul, div, neg, abs, sqr, sqrt, rcp, rsqrt,
    Uplo, complete_sym, copy_tril, copy_triu,
};

pub use lmat_linalg::{
    Cholesky, posv,
    pddet, pdlogdet, pdinv, PdInvExpr,
    Lapack,
};

/// Elementwise expression nodes and operator tags.
pub mod ewise {
    pub use lmat_matrix::ewise::*;
}

/// Reference routines used when the system LAPACK is not linked.
pub mod native {
    pub use lmat_linalg::native::*;
}

/// Fixed-width lane packs used by the contiguous kernels.
pub mod simd {
    pub use lmat_simd::*;
}

pub use lmat_assert_close::{CheckClose, CheckCloseError, Tolerances};
