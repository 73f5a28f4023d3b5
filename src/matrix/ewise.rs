/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Elementwise expressions.
//!
//! Nodes hold their operands by value; dense matrices enter as references
//! (`&a + &b`) or as views, so building an expression never copies data.
//! The `*` operator is elementwise.

use std::ops::{Add, Sub, Mul, Div, Neg};

use crate::{Scalar, Error, Result};
use crate::{MatrixExpr, DenseMatrixMut, Matrix, FixedMatrix, MatrixView};
use crate::layout::common_dim;
use crate::dispatch;

/// A function of two elements.
pub trait BinaryOp<T>: Copy {
    fn apply(self, a: T, b: T) -> T;
}

/// A function of one element.
pub trait UnaryOp<T>: Copy {
    fn apply(self, x: T) -> T;
}

macro_rules! binary_ops {
    ($($Op:ident => |$a:ident, $b:ident| $body:expr;)+) => {$(
        #[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
        pub struct $Op;

        impl<T: Scalar> BinaryOp<T> for $Op {
            #[inline(always)]
            fn apply(self, $a: T, $b: T) -> T { $body }
        }
    )+};
}

macro_rules! unary_ops {
    ($($Op:ident => |$x:ident| $body:expr;)+) => {$(
        #[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
        pub struct $Op;

        impl<T: Scalar> UnaryOp<T> for $Op {
            #[inline(always)]
            fn apply(self, $x: T) -> T { $body }
        }
    )+};
}

binary_ops! {
    AddOp => |a, b| a + b;
    SubOp => |a, b| a - b;
    MulOp => |a, b| a * b;
    DivOp => |a, b| a / b;
}

unary_ops! {
    NegOp => |x| -x;
    AbsOp => |x| x.abs();
    SqrOp => |x| x * x;
    SqrtOp => |x| x.sqrt();
    RcpOp => |x| x.recip();
    RsqrtOp => |x| x.sqrt().recip();
}

/// `op(lhs, rhs)` elementwise over two expressions of equal shape.
#[derive(Debug, Copy, Clone)]
pub struct BinaryExpr<L, R, Op> {
    lhs: L,
    rhs: R,
    op: Op,
}

/// `op(c, x)` for a scalar `c` and every element `x` of an expression.
#[derive(Debug, Copy, Clone)]
pub struct ScalarLhsExpr<T, R, Op> {
    lhs: T,
    rhs: R,
    op: Op,
}

/// `op(x, c)` for every element `x` of an expression and a scalar `c`.
#[derive(Debug, Copy, Clone)]
pub struct ScalarRhsExpr<L, T, Op> {
    lhs: L,
    rhs: T,
    op: Op,
}

/// `op(x)` for every element `x` of an expression.
#[derive(Debug, Copy, Clone)]
pub struct UnaryExpr<E, Op> {
    arg: E,
    op: Op,
}

impl<L, R, Op> BinaryExpr<L, R, Op> {
    pub fn new(lhs: L, rhs: R, op: Op) -> Self { BinaryExpr { lhs, rhs, op } }
}

impl<T, R, Op> ScalarLhsExpr<T, R, Op> {
    pub fn new(lhs: T, rhs: R, op: Op) -> Self { ScalarLhsExpr { lhs, rhs, op } }
}

impl<L, T, Op> ScalarRhsExpr<L, T, Op> {
    pub fn new(lhs: L, rhs: T, op: Op) -> Self { ScalarRhsExpr { lhs, rhs, op } }
}

impl<E, Op> UnaryExpr<E, Op> {
    pub fn new(arg: E, op: Op) -> Self { UnaryExpr { arg, op } }
}

impl<L, R, Op> MatrixExpr for BinaryExpr<L, R, Op>
where
    L: MatrixExpr,
    R: MatrixExpr<Elem = L::Elem>,
    Op: BinaryOp<L::Elem>,
{
    type Elem = L::Elem;

    const STATIC_ROWS: Option<usize> = common_dim(L::STATIC_ROWS, R::STATIC_ROWS);
    const STATIC_COLS: Option<usize> = common_dim(L::STATIC_COLS, R::STATIC_COLS);

    #[inline] fn nrows(&self) -> usize { self.lhs.nrows() }
    #[inline] fn ncols(&self) -> usize { self.lhs.ncols() }

    fn eval_into<D>(&self, dst: &mut D) -> Result<()>
    where D: DenseMatrixMut<Elem = Self::Elem> + ?Sized,
    {
        Error::check_shape(self.lhs.shape(), self.rhs.shape())?;
        let lhs = self.lhs.operand()?;
        let rhs = self.rhs.operand()?;
        dst.require_shape(self.nrows(), self.ncols())?;

        let op = self.op;
        dispatch::copy(&lhs.view(), dst)?;
        dispatch::update(&rhs.view(), dst, |d, s| op.apply(d, s))
    }
}

impl<T, R, Op> MatrixExpr for ScalarLhsExpr<T, R, Op>
where
    T: Scalar,
    R: MatrixExpr<Elem = T>,
    Op: BinaryOp<T>,
{
    type Elem = T;

    const STATIC_ROWS: Option<usize> = R::STATIC_ROWS;
    const STATIC_COLS: Option<usize> = R::STATIC_COLS;

    #[inline] fn nrows(&self) -> usize { self.rhs.nrows() }
    #[inline] fn ncols(&self) -> usize { self.rhs.ncols() }

    fn eval_into<D>(&self, dst: &mut D) -> Result<()>
    where D: DenseMatrixMut<Elem = T> + ?Sized,
    {
        let arg = self.rhs.operand()?;
        dst.require_shape(self.nrows(), self.ncols())?;

        let (c, op) = (self.lhs, self.op);
        dispatch::map(&arg.view(), dst, |x| op.apply(c, x))
    }
}

impl<L, T, Op> MatrixExpr for ScalarRhsExpr<L, T, Op>
where
    T: Scalar,
    L: MatrixExpr<Elem = T>,
    Op: BinaryOp<T>,
{
    type Elem = T;

    const STATIC_ROWS: Option<usize> = L::STATIC_ROWS;
    const STATIC_COLS: Option<usize> = L::STATIC_COLS;

    #[inline] fn nrows(&self) -> usize { self.lhs.nrows() }
    #[inline] fn ncols(&self) -> usize { self.lhs.ncols() }

    fn eval_into<D>(&self, dst: &mut D) -> Result<()>
    where D: DenseMatrixMut<Elem = T> + ?Sized,
    {
        let arg = self.lhs.operand()?;
        dst.require_shape(self.nrows(), self.ncols())?;

        let (c, op) = (self.rhs, self.op);
        dispatch::map(&arg.view(), dst, |x| op.apply(x, c))
    }
}

impl<E, Op> MatrixExpr for UnaryExpr<E, Op>
where
    E: MatrixExpr,
    Op: UnaryOp<E::Elem>,
{
    type Elem = E::Elem;

    const STATIC_ROWS: Option<usize> = E::STATIC_ROWS;
    const STATIC_COLS: Option<usize> = E::STATIC_COLS;

    #[inline] fn nrows(&self) -> usize { self.arg.nrows() }
    #[inline] fn ncols(&self) -> usize { self.arg.ncols() }

    fn eval_into<D>(&self, dst: &mut D) -> Result<()>
    where D: DenseMatrixMut<Elem = Self::Elem> + ?Sized,
    {
        let arg = self.arg.operand()?;
        dst.require_shape(self.nrows(), self.ncols())?;

        let op = self.op;
        dispatch::map(&arg.view(), dst, |x| op.apply(x))
    }
}

macro_rules! binary_fns {
    ($($func:ident => $Op:ident;)+) => {$(
        pub fn $func<L, R>(lhs: L, rhs: R) -> BinaryExpr<L, R, $Op>
        where L: MatrixExpr, R: MatrixExpr<Elem = L::Elem>,
        { BinaryExpr::new(lhs, rhs, $Op) }
    )+};
}

macro_rules! unary_fns {
    ($($func:ident => $Op:ident;)+) => {$(
        pub fn $func<E: MatrixExpr>(arg: E) -> UnaryExpr<E, $Op> { UnaryExpr::new(arg, $Op) }
    )+};
}

binary_fns! {
    add => AddOp;
    sub => SubOp;
    mul => MulOp;
    div => DivOp;
}

unary_fns! {
    neg => NegOp;
    abs => AbsOp;
    sqr => SqrOp;
    sqrt => SqrtOp;
    rcp => RcpOp;
    rsqrt => RsqrtOp;
}

// Operator overloads.
//
// Scalars get concrete impls for f32 and f64; these cannot overlap with the
// impl for `Rhs: MatrixExpr` because neither float type is an expression.
macro_rules! impl_ops {
    (impl[$($gen:tt)*] for $Self:ty) => {
        impl_ops!(@each [$($gen)*] $Self; Add add AddOp, Sub sub SubOp, Mul mul MulOp, Div div DivOp);

        impl<$($gen)*> Neg for $Self
        where $Self: MatrixExpr,
        {
            type Output = UnaryExpr<$Self, NegOp>;
            fn neg(self) -> Self::Output { UnaryExpr::new(self, NegOp) }
        }
    };

    (@each $gen:tt $Self:ty; $($Trait:ident $method:ident $Op:ident),+) => {$(
        impl_ops!(@one $gen $Self; $Trait $method $Op);
    )+};

    (@one [$($gen:tt)*] $Self:ty; $Trait:ident $method:ident $Op:ident) => {
        impl<$($gen)* Rhs> $Trait<Rhs> for $Self
        where
            $Self: MatrixExpr,
            Rhs: MatrixExpr<Elem = <$Self as MatrixExpr>::Elem>,
        {
            type Output = BinaryExpr<$Self, Rhs, $Op>;
            fn $method(self, rhs: Rhs) -> Self::Output { BinaryExpr::new(self, rhs, $Op) }
        }

        impl_ops!(@scalar [$($gen)*] $Self; $Trait $method $Op; f32);
        impl_ops!(@scalar [$($gen)*] $Self; $Trait $method $Op; f64);
    };

    (@scalar [$($gen:tt)*] $Self:ty; $Trait:ident $method:ident $Op:ident; $float:ty) => {
        impl<$($gen)*> $Trait<$float> for $Self
        where $Self: MatrixExpr<Elem = $float>,
        {
            type Output = ScalarRhsExpr<$Self, $float, $Op>;
            fn $method(self, rhs: $float) -> Self::Output { ScalarRhsExpr::new(self, rhs, $Op) }
        }

        impl<$($gen)*> $Trait<$Self> for $float
        where $Self: MatrixExpr<Elem = $float>,
        {
            type Output = ScalarLhsExpr<$float, $Self, $Op>;
            fn $method(self, rhs: $Self) -> Self::Output { ScalarLhsExpr::new(self, rhs, $Op) }
        }
    };
}

impl_ops!(impl['a, T: Scalar,] for &'a Matrix<T>);
impl_ops!(impl['a, T: Scalar, const M: usize, const N: usize,] for &'a FixedMatrix<T, M, N>);
impl_ops!(impl['a, T: Scalar,] for MatrixView<'a, T>);
impl_ops!(impl[L, R, Op,] for BinaryExpr<L, R, Op>);
impl_ops!(impl[T, R, Op,] for ScalarLhsExpr<T, R, Op>);
impl_ops!(impl[L, T, Op,] for ScalarRhsExpr<L, T, Op>);
impl_ops!(impl[E, Op,] for UnaryExpr<E, Op>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Shape, DenseMatrix, MatrixViewMut};

    fn sample() -> (Matrix<f64>, Matrix<f64>) {
        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let b = Matrix::from_rows(&[[6.0, 5.0, 4.0], [3.0, 2.0, 1.0]]);
        (a, b)
    }

    #[test]
    fn binary_operators() {
        let (a, b) = sample();
        assert_eq!((&a + &b).eval().unwrap(), Matrix::from_elem(2, 3, 7.0));
        assert_eq!((&a - &b).eval().unwrap(), Matrix::from_rows(&[[-5.0, -3.0, -1.0], [1.0, 3.0, 5.0]]));
        assert_eq!((&a * &b).eval().unwrap(), Matrix::from_rows(&[[6.0, 10.0, 12.0], [12.0, 10.0, 6.0]]));
        assert_eq!((&a / &b).elem_eval(1, 0), 4.0 / 3.0);
    }

    #[test]
    fn scalar_broadcast_both_sides() {
        let (a, _) = sample();
        assert_eq!((&a * 2.0f64).eval().unwrap(), Matrix::from_rows(&[[2.0, 4.0, 6.0], [8.0, 10.0, 12.0]]));
        assert_eq!((10.0f64 - &a).eval().unwrap(), Matrix::from_rows(&[[9.0, 8.0, 7.0], [6.0, 5.0, 4.0]]));
        assert_eq!((&a - 1.0f64).elem_eval(0, 0), 0.0);
        assert_eq!((12.0f64 / &a).elem_eval(1, 2), 2.0);

        let f = FixedMatrix::<f32, 2, 2>::from_elem(3.0);
        let mut out = FixedMatrix::<f32, 2, 2>::zeros();
        out.assign(&(1.0f32 + &f)).unwrap();
        assert_eq!(out, FixedMatrix::<f32, 2, 2>::from_elem(4.0));
    }

    #[test]
    fn nested_expressions() {
        let (a, b) = sample();
        let expr = (&a + &b) * 0.5f64 - sqr(&a);
        assert_eq!(expr.shape(), Shape::new(2, 3));
        let m = expr.eval().unwrap();
        assert_eq!(m, Matrix::from_fn(2, 3, |i, j| 3.5 - a[(i, j)] * a[(i, j)]));

        let neg = -(&a - &b);
        assert_eq!(neg.eval().unwrap(), (&b - &a).eval().unwrap());
    }

    #[test]
    fn unary_functions() {
        let a = Matrix::from_rows(&[[4.0f64, -16.0]]);
        assert_eq!(abs(&a).eval().unwrap(), Matrix::from_rows(&[[4.0, 16.0]]));
        assert_eq!(sqrt(abs(&a)).eval().unwrap(), Matrix::from_rows(&[[2.0, 4.0]]));
        assert_eq!(rcp(&a).eval().unwrap(), Matrix::from_rows(&[[0.25, -0.0625]]));
        assert_eq!(rsqrt(abs(&a)).eval().unwrap(), Matrix::from_rows(&[[0.5, 0.25]]));
        assert_eq!(neg(sqr(&a)).eval().unwrap(), Matrix::from_rows(&[[-16.0, -256.0]]));
        assert_eq!(add(&a, mul(&a, &a)).eval().unwrap(), Matrix::from_rows(&[[20.0, 240.0]]));
        assert_eq!(div(sub(&a, &a), &a).eval().unwrap(), Matrix::from_rows(&[[0.0, -0.0]]));
    }

    #[test]
    fn views_as_operands() {
        let (a, b) = sample();
        let sum = (a.row(0) + b.row(1)).eval().unwrap();
        assert_eq!(sum, Matrix::from_rows(&[[4.0, 4.0, 4.0]]));

        let mut buf = vec![0.0; 12];
        let mut dst = MatrixViewMut::from_slice(&mut buf, (2, 3), (3, 4)).unwrap();
        dst.assign(&(a.view() * &b)).unwrap();
        assert_eq!(dst, (&a * &b).eval().unwrap());
        assert_eq!(buf[3], 12.0);
    }

    #[test]
    fn mismatch_is_reported_before_writing() {
        let (a, _) = sample();
        let c = Matrix::<f64>::from_elem(3, 2, 1.0);
        let mut dst = Matrix::from_elem(1, 1, -1.0);

        let err = dst.assign(&(&a + &c)).unwrap_err();
        assert_eq!(err, Error::DimensionMismatch { expected: Shape::new(2, 3), actual: Shape::new(3, 2) });
        assert_eq!(dst, Matrix::from_elem(1, 1, -1.0));

        let mut fixed = FixedMatrix::<f64, 3, 3>::zeros();
        assert!(fixed.assign(&(&a * 3.0f64)).is_err());
        assert_eq!(fixed, FixedMatrix::<f64, 3, 3>::zeros());
    }

    #[test]
    fn static_dims_propagate() {
        type F = FixedMatrix<f64, 3, 1>;
        type Sum<'a> = BinaryExpr<&'a F, &'a Matrix<f64>, AddOp>;
        assert_eq!(<Sum<'static> as MatrixExpr>::STATIC_ROWS, Some(3));
        assert_eq!(<Sum<'static> as MatrixExpr>::STATIC_COLS, Some(1));
        assert_eq!(<UnaryExpr<&'static Matrix<f64>, SqrtOp> as MatrixExpr>::STATIC_ROWS, None);
    }

    trait ElemEval: MatrixExpr {
        fn elem_eval(&self, i: usize, j: usize) -> Self::Elem {
            self.eval().unwrap().elem(i, j)
        }
    }
    impl<E: MatrixExpr> ElemEval for E {}
}
