/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! The boundary to the Cholesky routine family.
//!
//! With the default `lapacke-support` feature, calls go to the system LAPACKe.
//! Built without it, they go to the column-major routines in `native`, which
//! follow the same argument and `info` conventions.

use lmat_matrix::{Scalar, Uplo, Error, Result};

#[cfg(any(test, not(feature = "lapacke-support")))]
use crate::native;

/// Element types with Cholesky routines.
///
/// All buffers are column-major with an explicit leading dimension.  Only
/// the triangle selected by `uplo` is read or written.  The return value is
/// LAPACK's `info`: zero on success, `-k` if argument `k` was bad, and `k`
/// when the leading minor of order `k` is not positive-definite.
pub trait Lapack: Scalar {
    const POTRF: &'static str;
    const POTRS: &'static str;
    const POTRI: &'static str;
    const POSV: &'static str;

    fn potrf(uplo: Uplo, n: usize, a: &mut [Self], lda: usize) -> i32;

    fn potrs(uplo: Uplo, n: usize, nrhs: usize, a: &[Self], lda: usize, b: &mut [Self], ldb: usize) -> i32;

    fn potri(uplo: Uplo, n: usize, a: &mut [Self], lda: usize) -> i32;

    fn posv(uplo: Uplo, n: usize, nrhs: usize, a: &mut [Self], lda: usize, b: &mut [Self], ldb: usize) -> i32;
}

macro_rules! impl_lapack {
    ($T:ty, $potrf:ident, $potrs:ident, $potri:ident, $posv:ident) => {
        #[cfg(feature = "lapacke-support")]
        impl Lapack for $T {
            const POTRF: &'static str = stringify!($potrf);
            const POTRS: &'static str = stringify!($potrs);
            const POTRI: &'static str = stringify!($potri);
            const POSV: &'static str = stringify!($posv);

            fn potrf(uplo: Uplo, n: usize, a: &mut [$T], lda: usize) -> i32 {
                let layout = ::lapacke::Layout::ColumnMajor;
                unsafe { ::lapacke::$potrf(layout, uplo.as_lapack(), n as i32, a, lda as i32) }
            }

            fn potrs(uplo: Uplo, n: usize, nrhs: usize, a: &[$T], lda: usize, b: &mut [$T], ldb: usize) -> i32 {
                let layout = ::lapacke::Layout::ColumnMajor;
                unsafe {
                    ::lapacke::$potrs(
                        layout, uplo.as_lapack(), n as i32, nrhs as i32,
                        a, lda as i32, b, ldb as i32,
                    )
                }
            }

            fn potri(uplo: Uplo, n: usize, a: &mut [$T], lda: usize) -> i32 {
                let layout = ::lapacke::Layout::ColumnMajor;
                unsafe { ::lapacke::$potri(layout, uplo.as_lapack(), n as i32, a, lda as i32) }
            }

            fn posv(uplo: Uplo, n: usize, nrhs: usize, a: &mut [$T], lda: usize, b: &mut [$T], ldb: usize) -> i32 {
                let layout = ::lapacke::Layout::ColumnMajor;
                unsafe {
                    ::lapacke::$posv(
                        layout, uplo.as_lapack(), n as i32, nrhs as i32,
                        a, lda as i32, b, ldb as i32,
                    )
                }
            }
        }

        #[cfg(not(feature = "lapacke-support"))]
        impl Lapack for $T {
            const POTRF: &'static str = stringify!($potrf);
            const POTRS: &'static str = stringify!($potrs);
            const POTRI: &'static str = stringify!($potri);
            const POSV: &'static str = stringify!($posv);

            fn potrf(uplo: Uplo, n: usize, a: &mut [$T], lda: usize) -> i32 {
                native::potrf(uplo, n, a, lda)
            }

            fn potrs(uplo: Uplo, n: usize, nrhs: usize, a: &[$T], lda: usize, b: &mut [$T], ldb: usize) -> i32 {
                native::potrs(uplo, n, nrhs, a, lda, b, ldb)
            }

            fn potri(uplo: Uplo, n: usize, a: &mut [$T], lda: usize) -> i32 {
                native::potri(uplo, n, a, lda)
            }

            fn posv(uplo: Uplo, n: usize, nrhs: usize, a: &mut [$T], lda: usize, b: &mut [$T], ldb: usize) -> i32 {
                native::posv(uplo, n, nrhs, a, lda, b, ldb)
            }
        }
    };
}

impl_lapack!(f32, spotrf, spotrs, spotri, sposv);
impl_lapack!(f64, dpotrf, dpotrs, dpotri, dposv);

/// Turn a routine's `info` into a `Result`.
///
/// # Panics
///
/// A negative `info` means this crate passed a bad argument, and panics.
pub(crate) fn check_info(routine: &'static str, info: i32) -> Result<()> {
    match info {
        0 => Ok(()),
        info if info < 0 => panic!("bad arg number {} to {}", -info, routine),
        info => {
            warn!("{} failed with info = {}", routine, info);
            Err(Error::Factorization { routine, info })
        },
    }
}
