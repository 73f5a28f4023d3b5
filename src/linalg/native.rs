/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Column-major Cholesky routines in plain Rust.
//!
//! These take the same arguments as their LAPACK namesakes and report
//! problems the same way through `info`.

use lmat_matrix::{Scalar, Uplo};

// Element (i, j) of a column-major buffer with leading dimension `ld`.
macro_rules! at {
    ($buf:expr, $ld:expr, $i:expr, $j:expr) => { $buf[$i + $j * $ld] };
}

fn check_ld(n: usize, ld: usize) -> bool { ld >= usize::max(1, n) }

/// Factor `A = L L^T` (lower) or `A = U^T U` (upper) in place.
pub fn potrf<T: Scalar>(uplo: Uplo, n: usize, a: &mut [T], lda: usize) -> i32 {
    if !check_ld(n, lda) {
        return -4;
    }

    for j in 0..n {
        let mut d = at!(a, lda, j, j);
        for k in 0..j {
            let x = match uplo {
                Uplo::Lower => at!(a, lda, j, k),
                Uplo::Upper => at!(a, lda, k, j),
            };
            d = d - x * x;
        }
        if !(d > T::zero()) {
            return (j + 1) as i32;
        }
        let d = d.sqrt();
        at!(a, lda, j, j) = d;

        for i in (j + 1)..n {
            match uplo {
                Uplo::Lower => {
                    let mut s = at!(a, lda, i, j);
                    for k in 0..j {
                        s = s - at!(a, lda, i, k) * at!(a, lda, j, k);
                    }
                    at!(a, lda, i, j) = s / d;
                },
                Uplo::Upper => {
                    let mut s = at!(a, lda, j, i);
                    for k in 0..j {
                        s = s - at!(a, lda, k, j) * at!(a, lda, k, i);
                    }
                    at!(a, lda, j, i) = s / d;
                },
            }
        }
    }
    0
}

/// Solve `A X = B` using a factor from [`potrf`].  `B` is overwritten by `X`.
pub fn potrs<T: Scalar>(
    uplo: Uplo,
    n: usize,
    nrhs: usize,
    a: &[T],
    lda: usize,
    b: &mut [T],
    ldb: usize,
) -> i32 {
    if !check_ld(n, lda) {
        return -5;
    }
    if !check_ld(n, ldb) {
        return -7;
    }

    // the factor, read as the lower triangle of L
    let l = |i: usize, j: usize| match uplo {
        Uplo::Lower => at!(a, lda, i, j),
        Uplo::Upper => at!(a, lda, j, i),
    };

    for c in 0..nrhs {
        let x = &mut b[c * ldb..];

        // L y = b
        for i in 0..n {
            let mut s = x[i];
            for k in 0..i {
                s = s - l(i, k) * x[k];
            }
            x[i] = s / l(i, i);
        }

        // L^T x = y
        for i in (0..n).rev() {
            let mut s = x[i];
            for k in (i + 1)..n {
                s = s - l(k, i) * x[k];
            }
            x[i] = s / l(i, i);
        }
    }
    0
}

/// Overwrite a factor from [`potrf`] with the same triangle of `A^-1`.
pub fn potri<T: Scalar>(uplo: Uplo, n: usize, a: &mut [T], lda: usize) -> i32 {
    if !check_ld(n, lda) {
        return -4;
    }
    for i in 0..n {
        if at!(a, lda, i, i) == T::zero() {
            return (i + 1) as i32;
        }
    }

    // w = inverse of the triangular factor, same triangle, packed
    let mut w = vec![T::zero(); n * n];
    match uplo {
        Uplo::Lower => {
            for j in 0..n {
                at!(w, n, j, j) = at!(a, lda, j, j).recip();
                for i in (j + 1)..n {
                    let mut s = T::zero();
                    for k in j..i {
                        s = s + at!(a, lda, i, k) * at!(w, n, k, j);
                    }
                    at!(w, n, i, j) = -s / at!(a, lda, i, i);
                }
            }
            // A^-1 = W^T W
            for j in 0..n {
                for i in j..n {
                    let mut s = T::zero();
                    for k in i..n {
                        s = s + at!(w, n, k, i) * at!(w, n, k, j);
                    }
                    at!(a, lda, i, j) = s;
                }
            }
        },
        Uplo::Upper => {
            for j in 0..n {
                at!(w, n, j, j) = at!(a, lda, j, j).recip();
                for i in (0..j).rev() {
                    let mut s = T::zero();
                    for k in (i + 1)..=j {
                        s = s + at!(a, lda, i, k) * at!(w, n, k, j);
                    }
                    at!(w, n, i, j) = -s / at!(a, lda, i, i);
                }
            }
            // A^-1 = V V^T
            for j in 0..n {
                for i in 0..=j {
                    let mut s = T::zero();
                    for k in j..n {
                        s = s + at!(w, n, i, k) * at!(w, n, j, k);
                    }
                    at!(a, lda, i, j) = s;
                }
            }
        },
    }
    0
}

/// [`potrf`] followed by [`potrs`].
pub fn posv<T: Scalar>(
    uplo: Uplo,
    n: usize,
    nrhs: usize,
    a: &mut [T],
    lda: usize,
    b: &mut [T],
    ldb: usize,
) -> i32 {
    if !check_ld(n, lda) {
        return -5;
    }
    if !check_ld(n, ldb) {
        return -7;
    }
    match potrf(uplo, n, a, lda) {
        0 => potrs(uplo, n, nrhs, a, lda, b, ldb),
        info => info,
    }
}
