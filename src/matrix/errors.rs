/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::Shape;

pub type Result<T> = ::std::result::Result<T, Error>;

/// Failures reported by matrix operations.
///
/// Every check that produces one of these runs before any element of a
/// destination is written.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("dimension mismatch: expected a {expected} matrix, got {actual}")]
    DimensionMismatch { expected: Shape, actual: Shape },

    #[error("invalid value for uplo: {0:?} (expected one of 'U', 'u', 'L', 'l')")]
    InvalidUplo(char),

    #[error("{routine} failed (info = {info}); the matrix is not positive-definite or is singular")]
    Factorization { routine: &'static str, info: i32 },

    #[error("subscripts ({i}, {j}) out of range for a {shape} matrix")]
    OutOfRange { i: usize, j: usize, shape: Shape },

    #[error("buffer of {len} elements is too small for the requested view (needs {needed})")]
    BufferTooSmall { len: usize, needed: usize },

    #[error("strides ({row_stride}, {col_stride}) make distinct subscripts share an element")]
    OverlappingStrides { row_stride: usize, col_stride: usize },

    #[error("storage must be column-contiguous (row stride 1), got row stride {row_stride}")]
    NotColumnContiguous { row_stride: usize },
}

impl Error {
    /// `Err(DimensionMismatch)` unless the two shapes are equal.
    pub fn check_shape(expected: Shape, actual: Shape) -> Result<()> {
        match expected == actual {
            true => Ok(()),
            false => Err(Error::DimensionMismatch { expected, actual }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = Error::DimensionMismatch { expected: Shape::new(2, 3), actual: Shape::new(3, 2) };
        assert_eq!(err.to_string(), "dimension mismatch: expected a 2x3 matrix, got 3x2");

        let err = Error::Factorization { routine: "dpotrf", info: 2 };
        assert!(err.to_string().starts_with("dpotrf failed (info = 2)"));
    }

    #[test]
    fn check_shape() {
        assert_eq!(Error::check_shape(Shape::new(4, 1), Shape::new(4, 1)), Ok(()));
        assert!(Error::check_shape(Shape::new(4, 1), Shape::new(1, 4)).is_err());
    }
}
