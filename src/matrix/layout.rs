/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;

use crate::DenseMatrix;

#[cfg(feature = "serde-support")]
use serde::{Serialize, Deserialize};

/// Number of rows and columns.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct Shape {
    pub nrows: usize,
    pub ncols: usize,
}

impl Shape {
    #[inline(always)]
    pub fn new(nrows: usize, ncols: usize) -> Self { Shape { nrows, ncols } }

    #[inline(always)]
    pub fn nelems(self) -> usize { self.nrows * self.ncols }

    #[inline(always)]
    pub fn is_square(self) -> bool { self.nrows == self.ncols }

    #[inline(always)]
    pub fn is_empty(self) -> bool { self.nelems() == 0 }

    #[inline(always)]
    pub fn contains(self, i: usize, j: usize) -> bool { i < self.nrows && j < self.ncols }
}

impl From<(usize, usize)> for Shape {
    fn from((nrows, ncols): (usize, usize)) -> Self { Shape { nrows, ncols } }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.nrows, self.ncols)
    }
}

/// Merge two static dimensions that are known to agree at runtime.
#[inline(always)]
pub(crate) const fn common_dim(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match a {
        Some(x) => Some(x),
        None => b,
    }
}

/// Runtime test for a fully packed column-major layout.
#[inline(always)]
pub(crate) fn is_packed(shape: Shape, row_stride: usize, col_stride: usize) -> bool {
    row_stride == 1 && (col_stride == shape.nrows || shape.ncols <= 1)
}

/// Coarse description of how a dense matrix is laid out in memory.
///
/// This only ever selects an evaluation strategy; it has no effect on the
/// values any operation produces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum LayoutClass {
    /// A single element.
    Scalar,
    /// `row_stride == 1` and `col_stride == nrows`.
    Contiguous,
    /// One column, any row stride.
    Column,
    /// One row, any column stride.
    Row,
    General,
}

impl LayoutClass {
    /// Classify a dense matrix.
    ///
    /// Static dimensions are consulted first; a type whose shape is
    /// statically `1 x 1` is a scalar no matter what its strides say.
    /// A statically contiguous type (such as an owned `Matrix`) is
    /// `Contiguous` even when its runtime shape is `1 x 1` or `n x 1`;
    /// this picks a different kernel but never changes the result.
    pub fn of<M: DenseMatrix + ?Sized>(m: &M) -> LayoutClass {
        match (M::STATIC_ROWS, M::STATIC_COLS) {
            (Some(1), Some(1)) => return LayoutClass::Scalar,
            _ if M::STATIC_CONTIGUOUS => return LayoutClass::Contiguous,
            (_, Some(1)) => return LayoutClass::Column,
            (Some(1), _) => return LayoutClass::Row,
            _ => {},
        }

        let shape = m.shape();
        if shape.nrows == 1 && shape.ncols == 1 {
            LayoutClass::Scalar
        } else if is_packed(shape, m.row_stride(), m.col_stride()) {
            LayoutClass::Contiguous
        } else if shape.ncols == 1 {
            LayoutClass::Column
        } else if shape.nrows == 1 {
            LayoutClass::Row
        } else {
            LayoutClass::General
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Matrix, FixedMatrix, MatrixView};

    #[test]
    fn shape_basics() {
        let s = Shape::new(3, 4);
        assert_eq!(s.nelems(), 12);
        assert!(!s.is_square());
        assert!(s.contains(2, 3));
        assert!(!s.contains(3, 0));
        assert_eq!(s.to_string(), "3x4");
        assert!(Shape::new(0, 5).is_empty());
    }

    #[test]
    fn classify_static() {
        assert_eq!(LayoutClass::of(&FixedMatrix::<f64, 1, 1>::zeros()), LayoutClass::Scalar);
        assert_eq!(LayoutClass::of(&FixedMatrix::<f64, 3, 3>::zeros()), LayoutClass::Contiguous);
        assert_eq!(LayoutClass::of(&Matrix::<f64>::zeros(3, 1)), LayoutClass::Contiguous);
        assert_eq!(LayoutClass::of(&Matrix::<f64>::zeros(1, 1)), LayoutClass::Contiguous);
    }

    #[test]
    fn classify_views() {
        let data = (0..24).map(|x| x as f64).collect::<Vec<_>>();

        let v = MatrixView::from_slice(&data, (4, 3), (1, 4)).unwrap();
        assert_eq!(LayoutClass::of(&v), LayoutClass::Contiguous);

        let v = MatrixView::from_slice(&data, (4, 3), (1, 6)).unwrap();
        assert_eq!(LayoutClass::of(&v), LayoutClass::General);

        let v = MatrixView::from_slice(&data, (5, 1), (2, 0)).unwrap();
        assert_eq!(LayoutClass::of(&v), LayoutClass::Column);

        let v = MatrixView::from_slice(&data, (1, 5), (0, 3)).unwrap();
        assert_eq!(LayoutClass::of(&v), LayoutClass::Row);

        let v = MatrixView::from_slice(&data[7..], (1, 1), (5, 5)).unwrap();
        assert_eq!(LayoutClass::of(&v), LayoutClass::Scalar);
    }
}
