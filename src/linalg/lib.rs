/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Cholesky-based operations on symmetric positive-definite matrices.
//!
//! Factorization goes through the [`Lapack`] trait.  By default it is
//! backed by the routines in [`native`]; the `lapacke-support` feature
//! switches to the system LAPACKe.

#[macro_use]
extern crate log;
#[cfg(feature = "lapacke-support")]
extern crate lapack_src;

pub use lmat_matrix::{Uplo, Error, Result};

pub use crate::lapack::Lapack;
mod lapack;

pub mod native;

pub use crate::chol::{Cholesky, posv};
mod chol;

pub use crate::pd::{pddet, pdlogdet, pdinv, PdInvExpr};
mod pd;
