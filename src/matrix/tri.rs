/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;

use crate::{Shape, Error, Result};
use crate::{MatrixExpr, DenseMatrix, DenseMatrixMut};

#[cfg(feature = "serde-support")]
use serde::{Serialize, Deserialize};

/// Which triangle of a symmetric or triangular matrix is referenced.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum Uplo {
    Upper,
    Lower,
}

impl Uplo {
    /// Parse one of `'U'`, `'u'`, `'L'` or `'l'`.
    pub fn from_char(c: char) -> Result<Uplo> {
        match c {
            'U' | 'u' => Ok(Uplo::Upper),
            'L' | 'l' => Ok(Uplo::Lower),
            _ => Err(Error::InvalidUplo(c)),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Uplo::Upper => 'U',
            Uplo::Lower => 'L',
        }
    }

    /// The byte LAPACK routines take for this triangle.
    pub fn as_lapack(self) -> u8 { self.as_char() as u8 }

    pub fn is_upper(self) -> bool { self == Uplo::Upper }
    pub fn is_lower(self) -> bool { self == Uplo::Lower }

    /// Whether element `(i, j)` lies in this triangle, diagonal included.
    #[inline(always)]
    pub fn contains(self, i: usize, j: usize) -> bool {
        match self {
            Uplo::Upper => i <= j,
            Uplo::Lower => i >= j,
        }
    }
}

impl fmt::Display for Uplo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Overwrite the triangle opposite to `uplo` with the mirror of `uplo`'s.
pub fn complete_sym<M>(m: &mut M, uplo: Uplo) -> Result<()>
where M: DenseMatrixMut + ?Sized,
{
    let n = m.nrows();
    Error::check_shape(Shape::new(n, n), m.shape())?;

    let mut v = m.view_mut();
    for j in 0..n {
        for i in (j + 1)..n {
            unsafe {
                match uplo {
                    Uplo::Lower => *v.get_unchecked_mut(j, i) = *v.get_unchecked(i, j),
                    Uplo::Upper => *v.get_unchecked_mut(i, j) = *v.get_unchecked(j, i),
                }
            }
        }
    }
    Ok(())
}

fn copy_triangle<S, D>(src: &S, dst: &mut D, uplo: Uplo) -> Result<()>
where
    S: DenseMatrix + ?Sized,
    D: DenseMatrixMut<Elem = S::Elem> + ?Sized,
{
    Error::check_shape(dst.shape(), src.shape())?;

    let (src, mut dst) = (src.view(), dst.view_mut());
    for j in 0..src.ncols() {
        let rows = match uplo {
            Uplo::Lower => j..src.nrows(),
            Uplo::Upper => 0..usize::min(j + 1, src.nrows()),
        };
        for i in rows {
            unsafe { *dst.get_unchecked_mut(i, j) = *src.get_unchecked(i, j); }
        }
    }
    Ok(())
}

/// Copy the lower triangle of `src`, diagonal included, into `dst`.
///
/// Elements of `dst` above the diagonal are left alone.
pub fn copy_tril<S, D>(src: &S, dst: &mut D) -> Result<()>
where
    S: DenseMatrix + ?Sized,
    D: DenseMatrixMut<Elem = S::Elem> + ?Sized,
{ copy_triangle(src, dst, Uplo::Lower) }

/// Copy the upper triangle of `src`, diagonal included, into `dst`.
pub fn copy_triu<S, D>(src: &S, dst: &mut D) -> Result<()>
where
    S: DenseMatrix + ?Sized,
    D: DenseMatrixMut<Elem = S::Elem> + ?Sized,
{ copy_triangle(src, dst, Uplo::Upper) }
