use super::*;
use approx::assert_abs_diff_eq;
use control::Control;
use symops::{spinor_rotation, IDENTITY_ROTATION};

const TOL: f64 = 1.0e-10;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn cubic() -> Lattice {
    Lattice::new(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0], &[0.0, 0.0, 1.0]).reciprocal()
}

fn gamma_table() -> GVectorTable {
    GVectorTable::new(&Vector3f64::zeros(), &cubic(), &Control::new(600.0)).unwrap()
}

fn c4z() -> SymOp {
    SymOp::new([[0, -1, 0], [1, 0, 0], [0, 0, 1]], Vector3f64::zeros())
        .unwrap()
        .with_spinor(spinor_rotation(0.5 * PI, &Vector3f64::new(0.0, 0.0, 1.0)))
}

fn c2z() -> SymOp {
    SymOp::new([[-1, 0, 0], [0, -1, 0], [0, 0, 1]], Vector3f64::zeros())
        .unwrap()
        .with_spinor(spinor_rotation(PI, &Vector3f64::new(0.0, 0.0, 1.0)))
}

fn assert_c64_eq(a: c64, b: c64) {
    assert_abs_diff_eq!(a.re, b.re, epsilon = TOL);
    assert_abs_diff_eq!(a.im, b.im, epsilon = TOL);
}

// normalized coefficients f(G) in the order of the table
fn orbital(table: &GVectorTable, f: impl Fn(Vector3i32) -> f64) -> Vec<c64> {
    let mut v: Vec<c64> = table
        .entries()
        .iter()
        .map(|e| c64::new(f(e.get_miller()), 0.0))
        .collect();

    utility::normalize_vector_c64(&mut v);

    v
}

#[test]
fn test_identity_gives_overlap_matrix() {
    init();

    let blatt = cubic();
    let table = gamma_table();
    let k = Vector3f64::zeros();

    for &spinor in [false, true].iter() {
        let nrow = if spinor { 2 * table.len() } else { table.len() };
        let evc = utility::make_orthonormal_rand_matrix(nrow, 5);

        let op = SymOp::identity();

        let mat = symm_matrix(&k, &blatt, &evc, &table, &op, spinor).unwrap();
        assert!(mat.max_abs_diff(&Matrix::<c64>::identity(5)) < TOL);

        let vals = symm_eigenvalues(&k, &blatt, &evc, &table, &op, spinor).unwrap();
        vals.iter().for_each(|&v| assert_c64_eq(v, ONE_C64));
    }
}

#[test]
fn test_trace_matches_matrix_diagonal() {
    init();

    let blatt = cubic();
    let table = gamma_table();
    let k = Vector3f64::zeros();

    // A^-1 T = A T for a twofold screw axis along z
    let screw = SymOp::new(*c2z().rotation(), Vector3f64::new(0.0, 0.0, 0.5))
        .unwrap()
        .with_spinor(*c2z().spinor());

    for op in [c4z(), c2z(), screw].iter() {
        for &spinor in [false, true].iter() {
            let nrow = if spinor { 2 * table.len() } else { table.len() };
            let evc = utility::make_orthonormal_rand_matrix(nrow, 4);

            let vals = symm_eigenvalues(&k, &blatt, &evc, &table, op, spinor).unwrap();
            let mat = symm_matrix(&k, &blatt, &evc, &table, op, spinor).unwrap();

            for (v, d) in vals.iter().zip(mat.diagonal().iter()) {
                assert_c64_eq(*v, *d);
            }
        }
    }
}

#[test]
fn test_trace_and_matrix_use_different_translations() {
    init();

    let blatt = cubic();
    let table = gamma_table();
    let k = Vector3f64::zeros();

    // A^-1 T = (0, -1/4, 0) and A T = (0, 1/4, 0)
    let op = SymOp::new(*c4z().rotation(), Vector3f64::new(0.25, 0.0, 0.0)).unwrap();

    let position = |g: Vector3i32| table.entries().iter().position(|e| e.get_miller() == g).unwrap();

    // only G = (0,1,0) has a nonzero partner, B G = (-1,0,0)
    let mut psi = vec![ZERO_C64; table.len()];
    psi[position(Vector3i32::new(0, 1, 0))] = ONE_C64;
    psi[position(Vector3i32::new(-1, 0, 0))] = ONE_C64;
    utility::normalize_vector_c64(&mut psi);

    let evc = Matrix::from_cols(table.len(), &[psi]);

    let vals = symm_eigenvalues(&k, &blatt, &evc, &table, &op, false).unwrap();
    let diag = symm_matrix(&k, &blatt, &evc, &table, &op, false).unwrap().diagonal();

    // exp(-2 pi i tau.G) / 2
    assert_c64_eq(vals[0], c64::new(0.0, 0.5));
    assert_c64_eq(diag[0], c64::new(0.0, -0.5));
    assert!((vals[0] - diag[0]).norm() > 0.5);
}

#[test]
fn test_orbital_characters() {
    init();

    let blatt = cubic();
    let table = gamma_table();
    let k = Vector3f64::zeros();

    let s = orbital(&table, |g| (-(g.l1_norm() as f64)).exp());
    let px = orbital(&table, |g| g.x as f64);
    let py = orbital(&table, |g| g.y as f64);

    let evc = Matrix::from_cols(table.len(), &[s, px, py]);

    let inversion = SymOp::inversion();

    let vals = symm_eigenvalues(&k, &blatt, &evc, &table, &inversion, false).unwrap();
    assert_c64_eq(vals[0], ONE_C64);
    assert_c64_eq(vals[1], -ONE_C64);
    assert_c64_eq(vals[2], -ONE_C64);

    let vals = symm_eigenvalues(&k, &blatt, &evc, &table, &c2z(), false).unwrap();
    assert_c64_eq(vals[1], -ONE_C64);

    // (px, py) carry the two-dimensional representation of C4z
    let mat = symm_matrix(&k, &blatt, &evc, &table, &c4z(), false).unwrap();

    assert_c64_eq(mat[[0, 0]], ONE_C64);
    assert_c64_eq(mat[[1, 1]] + mat[[2, 2]], ZERO_C64);
    assert!((mat[[1, 2]].norm() - 1.0).abs() < TOL);
    assert!((mat[[2, 1]].norm() - 1.0).abs() < TOL);
    assert_c64_eq(mat[[0, 1]], ZERO_C64);

    for i in 0..3 {
        for j in 0..3 {
            let dot: c64 = (0..3).map(|l| mat[[i, l]] * mat[[j, l]].conj()).sum();
            let expected = if i == j { ONE_C64 } else { ZERO_C64 };
            assert_c64_eq(dot, expected);
        }
    }
}

#[test]
fn test_translation_phase() {
    init();

    let blatt = cubic();
    let table = gamma_table();
    let k = Vector3f64::zeros();

    let ig = table
        .entries()
        .iter()
        .position(|e| e.get_miller() == Vector3i32::new(1, 0, 0))
        .unwrap();

    let mut psi = vec![ZERO_C64; table.len()];
    psi[ig] = ONE_C64;

    let evc = Matrix::from_cols(table.len(), &[psi]);

    let half = SymOp::new(IDENTITY_ROTATION, Vector3f64::new(0.5, 0.0, 0.0)).unwrap();

    let vals = symm_eigenvalues(&k, &blatt, &evc, &table, &half, false).unwrap();
    assert_c64_eq(vals[0], -ONE_C64);

    let mat = symm_matrix(&k, &blatt, &evc, &table, &half, false).unwrap();
    assert_c64_eq(mat[[0, 0]], -ONE_C64);
}

#[test]
fn test_lattice_translation_at_zone_boundary() {
    init();

    let blatt = cubic();
    let k = Vector3f64::new(0.5, 0.0, 0.0);
    let table = GVectorTable::new(&k, &blatt, &Control::new(600.0)).unwrap();

    // exp(-2 pi i K.T) = -1, T is not reduced to the unit cell
    let op = SymOp::new(IDENTITY_ROTATION, Vector3f64::new(1.0, 0.0, 0.0)).unwrap();
    let evc = utility::make_orthonormal_rand_matrix(table.len(), 3);

    let vals = symm_eigenvalues(&k, &blatt, &evc, &table, &op, false).unwrap();
    vals.iter().for_each(|&v| assert_c64_eq(v, -ONE_C64));
}

#[test]
fn test_spinor_part() {
    init();

    let blatt = cubic();
    let table = gamma_table();
    let k = Vector3f64::zeros();

    let s = orbital(&table, |g| (-(g.l1_norm() as f64)).exp());

    let mut up = s.clone();
    up.extend(vec![ZERO_C64; table.len()]);

    let mut dn = vec![ZERO_C64; table.len()];
    dn.extend(s);

    let evc = Matrix::from_cols(2 * table.len(), &[up, dn]);

    // S(C2z) = -i sigma_z
    let vals = symm_eigenvalues(&k, &blatt, &evc, &table, &c2z(), true).unwrap();
    assert_c64_eq(vals[0], c64::new(0.0, -1.0));
    assert_c64_eq(vals[1], c64::new(0.0, 1.0));

    let mat = symm_matrix(&k, &blatt, &evc, &table, &c2z(), true).unwrap();
    assert_c64_eq(mat[[0, 1]], ZERO_C64);
    assert_c64_eq(mat[[1, 0]], ZERO_C64);
    assert_c64_eq(mat.trace(), ZERO_C64);

    // a spin flip about x mixes the two components
    let c2x = SymOp::new([[1, 0, 0], [0, -1, 0], [0, 0, -1]], Vector3f64::zeros())
        .unwrap()
        .with_spinor(spinor_rotation(PI, &Vector3f64::new(1.0, 0.0, 0.0)));

    let mat = symm_matrix(&k, &blatt, &evc, &table, &c2x, true).unwrap();
    assert_c64_eq(mat[[0, 0]], ZERO_C64);
    assert_c64_eq(mat[[0, 1]], c64::new(0.0, -1.0));
    assert_c64_eq(mat[[1, 0]], c64::new(0.0, -1.0));
}

#[test]
fn test_errors() {
    init();

    let blatt = cubic();
    let table = gamma_table();
    let k = Vector3f64::zeros();

    let evc = utility::make_orthonormal_rand_matrix(table.len(), 2);

    assert!(matches!(
        symm_eigenvalues(&k, &blatt, &evc, &table, &SymOp::identity(), true),
        Err(PWSymmError::DimensionMismatch { expected, found }) if expected == 2 * table.len() && found == table.len()
    ));

    let k = Vector3f64::new(0.25, 0.0, 0.0);
    let table = GVectorTable::new(&k, &blatt, &Control::new(300.0)).unwrap();
    let evc = utility::make_orthonormal_rand_matrix(table.len(), 2);

    assert!(matches!(
        symm_matrix(&k, &blatt, &evc, &table, &SymOp::inversion(), false),
        Err(PWSymmError::Transform(GTransformError::NotSymmetry { .. }))
    ));
}

#[test]
fn test_inputs_are_not_modified() {
    init();

    let blatt = cubic();
    let table = gamma_table();
    let k = Vector3f64::zeros();

    let evc = utility::make_orthonormal_rand_matrix(2 * table.len(), 3);
    let saved = evc.as_slice().to_vec();
    let energies = table.energies().to_vec();

    symm_matrix(&k, &blatt, &evc, &table, &c4z(), true).unwrap();
    symm_eigenvalues(&k, &blatt, &evc, &table, &c4z(), true).unwrap();

    assert_eq!(evc.as_slice(), saved.as_slice());
    assert_eq!(table.energies(), energies.as_slice());
}
