// Not every test binary uses every helper.
#![allow(dead_code)]

use lmat::{Matrix, MatrixView, MatrixViewMut, MatrixExpr, DenseMatrix, Shape};
use rand::Rng;

/// A matrix stored in a buffer of its own with arbitrary strides.
#[derive(Debug, Clone)]
pub struct Strided {
    pub data: Vec<f64>,
    pub shape: Shape,
    pub strides: (usize, usize),
}

impl Strided {
    /// Copy `m` into a fresh buffer using the given strides.
    ///
    /// Unaddressed slots are filled with NaN so that reading one shows up
    /// as a failed comparison.
    pub fn new(m: &Matrix<f64>, (rs, cs): (usize, usize)) -> Strided {
        let shape = m.shape();
        let len = match shape.nelems() {
            0 => 0,
            _ => (shape.nrows - 1) * rs + (shape.ncols - 1) * cs + 1,
        };
        let mut data = vec![::std::f64::NAN; len];
        for j in 0..shape.ncols {
            for i in 0..shape.nrows {
                data[i * rs + j * cs] = m[(i, j)];
            }
        }
        Strided { data, shape, strides: (rs, cs) }
    }

    pub fn view(&self) -> MatrixView<'_, f64> {
        MatrixView::from_slice(&self.data, self.shape, self.strides).unwrap()
    }

    pub fn view_mut(&mut self) -> MatrixViewMut<'_, f64> {
        MatrixViewMut::from_slice(&mut self.data, self.shape, self.strides).unwrap()
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        let (rs, cs) = self.strides;
        self.data[i * rs + j * cs] = value;
    }
}

/// The same logical matrix in every layout family the kernels distinguish.
pub fn layouts(m: &Matrix<f64>) -> Vec<Strided> {
    let (r, c) = (m.nrows(), m.ncols());
    vec![
        // packed
        Strided::new(m, (1, r)),
        // padded leading dimension
        Strided::new(m, (1, r + 3)),
        // row-major storage
        Strided::new(m, (c, 1)),
        // neither stride is 1
        Strided::new(m, (2, 2 * r + 1)),
    ]
}

/// Random matrix with small integer entries, so that equality is exact.
pub fn random_int_matrix(nrows: usize, ncols: usize) -> Matrix<f64> {
    let mut rng = rand::thread_rng();
    Matrix::from_fn(nrows, ncols, |_, _| rng.gen_range(-5i32, 6) as f64)
}

/// Random symmetric positive-definite matrix, `B B^T + n I`.
pub fn random_spd(n: usize) -> Matrix<f64> {
    let mut rng = rand::thread_rng();
    let b = ndarray::Array2::from_shape_fn((n, n), |_| 1.0 - 2.0 * rng.gen::<f64>());
    let a = b.dot(&b.t()) + ndarray::Array2::<f64>::eye(n) * n as f64;
    Matrix::from(a)
}

pub fn naive_equal<A, B>(a: &A, b: &B) -> bool
where A: DenseMatrix<Elem = f64>, B: DenseMatrix<Elem = f64>,
{
    assert_eq!(a.shape(), b.shape());
    (0..a.ncols()).all(|j| (0..a.nrows()).all(|i| a.elem(i, j) == b.elem(i, j)))
}

pub fn naive_approx<A, B>(a: &A, b: &B, tol: f64) -> bool
where A: DenseMatrix<Elem = f64>, B: DenseMatrix<Elem = f64>,
{
    assert_eq!(a.shape(), b.shape());
    (0..a.ncols()).all(|j| (0..a.nrows()).all(|i| (a.elem(i, j) - b.elem(i, j)).abs() <= tol))
}

/// Largest absolute elementwise difference.
pub fn max_abs_diff<A, B>(a: &A, b: &B) -> f64
where A: DenseMatrix<Elem = f64>, B: DenseMatrix<Elem = f64>,
{
    let mut out = 0.0f64;
    for j in 0..a.ncols() {
        for i in 0..a.nrows() {
            out = out.max((a.elem(i, j) - b.elem(i, j)).abs());
        }
    }
    out
}
