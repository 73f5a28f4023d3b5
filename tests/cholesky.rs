use lmat::{
    Matrix, MatrixView, MatrixExpr, DenseMatrix, DenseMatrixMut,
    Cholesky, Uplo, Error, pddet, pdlogdet, pdinv, posv, all_approx,
};
use lmat_assert_close::assert_close;

mod shared;
use self::shared::{layouts, random_spd};

fn example() -> Matrix<f64> {
    Matrix::from_rows(&[[4.0, 2.0], [2.0, 3.0]])
}

#[test]
fn two_by_two_scenario() {
    let _ = env_logger::try_init();
    let a = example();

    let chol = Cholesky::with_matrix(&a, 'L').unwrap();
    assert!(chol.is_lower());
    assert_eq!(chol.dim(), 2);

    let mut l = Matrix::empty();
    chol.get(&mut l).unwrap();
    let expected = Matrix::from_rows(&[[2.0, 0.0], [1.0, 2f64.sqrt()]]);
    assert_close!(abs=1e-14, l, expected);
    assert_close!(rel=1e-14, chol.eval_det(), 2.0 * 2f64.sqrt());

    assert_close!(rel=1e-14, pddet(&a).unwrap(), 8.0);
    assert_close!(rel=1e-14, pdlogdet(&a).unwrap(), 8f64.ln());

    let inv = pdinv(&a, 'L').unwrap().eval().unwrap();
    let expected = Matrix::from_rows(&[[0.375, -0.25], [-0.25, 0.5]]);
    assert_eq!(all_approx(&inv, &expected, 1e-14), Ok(true));

    let mut x = Matrix::empty();
    chol.solve(&Matrix::from_rows(&[[8.0], [7.0]]), &mut x).unwrap();
    assert_close!(abs=1e-14, x, Matrix::from_rows(&[[1.25], [1.5]]));
}

#[test]
fn upper_and_lower_agree() {
    for n in 1..=6 {
        let a = random_spd(n);
        let lower = Cholesky::with_matrix(&a, 'l').unwrap();
        let upper = Cholesky::with_matrix(&a, 'u').unwrap();
        assert_eq!(upper.uplo(), Uplo::Upper);

        let mut l = Matrix::empty();
        let mut u = Matrix::empty();
        lower.get(&mut l).unwrap();
        upper.get(&mut u).unwrap();
        let lt = Matrix::from_fn(n, n, |i, j| l[(j, i)]);
        assert_close!(abs=1e-12, lt.clone(), u);

        // L L^T reproduces A
        let llt = Matrix::from(l.to_ndarray().dot(&lt.to_ndarray()));
        assert_close!(rel=1e-12, abs=1e-12, llt, a);

        assert_close!(rel=1e-12, lower.eval_logdet(), upper.eval_logdet());
    }
}

#[test]
fn inverse_into_every_layout() {
    let a = random_spd(4);
    let expected = pdinv(&a, 'U').unwrap().eval().unwrap();

    for mut dst in layouts(&Matrix::zeros(4, 4)) {
        Cholesky::inv(&a, &mut dst.view_mut(), 'L').unwrap();
        assert_eq!(all_approx(&dst.view(), &expected, 1e-12), Ok(true));
    }

    let mut inplace = a.clone();
    Cholesky::inv_inplace(&mut inplace, 'U').unwrap();
    assert_eq!(all_approx(&inplace, &expected, 1e-12), Ok(true));

    // the expression form also writes into views
    let mut buf = vec![0.0; 16];
    let mut view = lmat::MatrixViewMut::from_col_major_slice(&mut buf, 4, 4).unwrap();
    view.assign(&pdinv(&a, 'L').unwrap()).unwrap();
    assert_eq!(all_approx(&view, &expected, 1e-12), Ok(true));
}

#[test]
fn solve_in_place_with_padded_rhs() {
    let a = random_spd(5);
    let b = shared::random_int_matrix(5, 3);
    let chol = Cholesky::with_matrix(&a, 'U').unwrap();

    let mut padded = shared::Strided::new(&b, (1, 8));
    chol.solve_inplace(&mut padded.view_mut()).unwrap();
    let ax = Matrix::from(a.to_ndarray().dot(&Matrix::from_fn(5, 3, |i, j| padded.view().elem(i, j)).to_ndarray()));
    assert_close!(abs=1e-10, ax, b.clone());

    let mut row_major = shared::Strided::new(&b, (3, 1));
    assert_eq!(
        chol.solve_inplace(&mut row_major.view_mut()),
        Err(Error::NotColumnContiguous { row_stride: 3 }),
    );
}

#[test]
fn posv_overwrites_both_arguments() {
    let mut a = example();
    let mut b = Matrix::from_rows(&[[8.0, 4.0], [7.0, 2.0]]);
    posv(&mut a, &mut b, 'L').unwrap();
    assert_close!(abs=1e-14, b, Matrix::from_rows(&[[1.25, 1.0], [1.5, 0.0]]));
    assert_close!(abs=1e-14, a[(1, 1)], 2f64.sqrt());
}

#[test]
fn bad_arguments() {
    assert_eq!(Cholesky::<f64>::new('x').map(|_| ()), Err(Error::InvalidUplo('x')));
    assert_eq!(pdinv(&example(), 'q').map(|_| ()), Err(Error::InvalidUplo('q')));

    let mut dst = Matrix::empty();
    assert_eq!(Cholesky::inv(&example(), &mut dst, 'Z'), Err(Error::InvalidUplo('Z')));

    let rect = Matrix::<f64>::zeros(2, 3);
    assert!(matches!(pddet(&rect), Err(Error::DimensionMismatch { .. })));
    assert!(matches!(Cholesky::with_matrix(&rect, 'L'), Err(Error::DimensionMismatch { .. })));

    let not_pd = Matrix::from_rows(&[[1.0, 2.0], [2.0, 1.0]]);
    let mut chol = Cholesky::with_matrix(&example(), 'L').unwrap();
    assert!(matches!(chol.set(&not_pd), Err(Error::Factorization { .. })));
    assert!(chol.is_empty());
}

#[test]
fn single_precision() {
    let a = Matrix::<f32>::from_rows(&[[4.0, 2.0], [2.0, 3.0]]);
    assert_close!(rel=1e-6, pddet(&a).unwrap(), 8.0f32);

    let big = Matrix::<f32>::from_fn(5, 5, |i, j| if i == j { 6.0 } else { 1.0 });
    // eigenvalues are 10 and 5 (four times)
    assert_close!(rel=1e-5, pddet(&big).unwrap(), 6250.0f32);

    let view = MatrixView::from_col_major_slice(a.as_slice(), 2, 2).unwrap();
    let inv = pdinv(&view, 'U').unwrap().eval().unwrap();
    assert_close!(abs=1e-6, inv.as_slice(), &[0.375f32, -0.25, -0.25, 0.5][..]);
}
