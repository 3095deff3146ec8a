//! Integration tests for flexion-math.

use flexion_math::faer_solver::FaerSolver;
use flexion_math::{
    BlockSparseMatrix, CsrMatrix, DataTypes, Mat3, Quat, Rigid3Types, RigidCoord, RigidDeriv,
    Vec3, Vec3Types,
};

fn diagonal_operator(blocks: &[Mat3]) -> BlockSparseMatrix {
    let n = blocks.len();
    let mut m = BlockSparseMatrix::for_types::<Vec3Types>();
    m.resize_blocks(n, n);
    for (i, b) in blocks.iter().enumerate() {
        m.begin_block_row(i).unwrap();
        m.create_block(i, b).unwrap();
        m.end_block_row().unwrap();
    }
    m.compress().unwrap();
    m
}

// ─── Representation Tests ─────────────────────────────────────

#[test]
fn vec3_projections_are_identity() {
    let x = Vec3::new(1.0, 2.0, 3.0);
    assert_eq!(Vec3Types::cpos(&x), x);
    assert_eq!(Vec3Types::dpos(&x), x);
    assert_eq!(Vec3Types::DERIV_DIM, 3);
}

#[test]
fn rigid_projections_extract_linear_parts() {
    let x = RigidCoord::new(Vec3::new(1.0, 0.0, 0.0), Quat::from_rotation_z(0.5));
    let v = RigidDeriv::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.0, 7.0));
    assert_eq!(Rigid3Types::cpos(&x), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(Rigid3Types::dpos(&v), Vec3::new(0.0, 2.0, 0.0));
}

#[test]
fn rigid_deriv_components_round_trip() {
    let v = RigidDeriv::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
    let mut buf = [0.0; 6];
    Rigid3Types::write_deriv(&v, &mut buf);
    assert_eq!(buf, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(Rigid3Types::read_deriv(&buf), v);
}

#[test]
fn rigid_coord_default_is_identity_frame() {
    let x = RigidCoord::default();
    assert_eq!(x.center, Vec3::ZERO);
    assert_eq!(x.orientation, Quat::IDENTITY);
}

// ─── Block-Sparse Build Protocol ──────────────────────────────

#[test]
fn new_operator_is_empty_and_compressed() {
    let m = BlockSparseMatrix::new(3);
    assert_eq!(m.block_rows(), 0);
    assert_eq!(m.nnz_blocks(), 0);
    assert!(m.is_compressed());
}

#[test]
fn diagonal_assembly_stores_one_block_per_row() {
    let m = diagonal_operator(&[Mat3::from_diagonal(Vec3::splat(2.0)), Mat3::IDENTITY]);
    assert_eq!(m.block_rows(), 2);
    assert_eq!(m.block_cols(), 2);
    assert_eq!(m.nnz_blocks(), 2);
    let b0 = m.block(0, 0).unwrap();
    assert_eq!(b0, &[2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 2.0]);
    assert!(m.block(0, 1).is_none());
}

#[test]
fn blocks_are_stored_row_major() {
    // Column-major input: first column (1, 2, 3)
    let block = Mat3::from_cols(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::ZERO);
    let m = diagonal_operator(&[block]);
    let b = m.block(0, 0).unwrap();
    assert_eq!(b[0], 1.0);
    assert_eq!(b[3], 2.0);
    assert_eq!(b[6], 3.0);
}

#[test]
fn resize_discards_previous_blocks() {
    let mut m = diagonal_operator(&[Mat3::IDENTITY; 3]);
    m.resize_blocks(1, 1);
    assert_eq!(m.nnz_blocks(), 0);
    assert!(!m.is_compressed());
    m.compress().unwrap();
    assert!(m.block(0, 0).is_none());
}

#[test]
fn skipped_rows_are_empty() {
    let mut m = BlockSparseMatrix::new(1);
    m.resize_blocks(4, 4);
    m.begin_block_row(2).unwrap();
    m.create_block(1, &5.0f32).unwrap();
    m.end_block_row().unwrap();
    m.compress().unwrap();
    assert!(m.block(0, 0).is_none());
    assert_eq!(m.block(2, 1).unwrap(), &[5.0]);
    assert!(m.block(3, 3).is_none());
}

#[test]
fn rows_out_of_order_are_rejected() {
    let mut m = BlockSparseMatrix::new(1);
    m.resize_blocks(3, 3);
    m.begin_block_row(1).unwrap();
    m.end_block_row().unwrap();
    assert!(m.begin_block_row(0).is_err());
    assert!(m.begin_block_row(1).is_err());
}

#[test]
fn block_without_open_row_is_rejected() {
    let mut m = BlockSparseMatrix::new(1);
    m.resize_blocks(2, 2);
    assert!(m.create_block(0, &1.0f32).is_err());
    assert!(m.end_block_row().is_err());
}

#[test]
fn wrong_block_size_is_rejected() {
    let mut m = BlockSparseMatrix::new(3);
    m.resize_blocks(1, 1);
    m.begin_block_row(0).unwrap();
    assert!(m.create_block(0, &1.0f32).is_err());
}

#[test]
fn column_out_of_range_and_duplicates_are_rejected() {
    let mut m = BlockSparseMatrix::new(1);
    m.resize_blocks(2, 2);
    m.begin_block_row(0).unwrap();
    assert!(m.create_block(2, &1.0f32).is_err());
    m.create_block(1, &1.0f32).unwrap();
    assert!(m.create_block(1, &1.0f32).is_err());
    assert!(m.create_block(0, &1.0f32).is_err());
}

#[test]
fn compress_with_open_row_is_rejected() {
    let mut m = BlockSparseMatrix::new(1);
    m.resize_blocks(1, 1);
    m.begin_block_row(0).unwrap();
    assert!(m.compress().is_err());
}

#[test]
fn six_by_six_array_blocks() {
    let mut block = [[0.0f32; 6]; 6];
    for (i, row) in block.iter_mut().enumerate() {
        row[i] = (i + 1) as f32;
    }
    let mut m = BlockSparseMatrix::for_types::<Rigid3Types>();
    m.resize_blocks(1, 1);
    m.begin_block_row(0).unwrap();
    m.create_block(0, &block).unwrap();
    m.end_block_row().unwrap();
    m.compress().unwrap();

    let mut out = [RigidDeriv::default()];
    let x = [RigidDeriv::new(Vec3::ONE, Vec3::ONE)];
    m.add_mult::<Rigid3Types>(&mut out, &x, 1.0).unwrap();
    assert_eq!(out[0].linear, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(out[0].angular, Vec3::new(4.0, 5.0, 6.0));
}

// ─── Operator Application ─────────────────────────────────────

#[test]
fn add_mult_accumulates_scaled_product() {
    let m = diagonal_operator(&[Mat3::from_diagonal(Vec3::new(1.0, 2.0, 3.0)), Mat3::IDENTITY]);
    let x = [Vec3::ONE, Vec3::new(0.0, 0.0, 4.0)];
    let mut out = [Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO];
    m.add_mult::<Vec3Types>(&mut out, &x, 0.5).unwrap();
    assert_eq!(out[0], Vec3::new(10.5, 1.0, 1.5));
    assert_eq!(out[1], Vec3::new(0.0, 0.0, 2.0));
}

#[test]
fn add_mult_on_empty_operator_is_noop() {
    let m = diagonal_operator(&[]);
    let mut out: [Vec3; 0] = [];
    m.add_mult::<Vec3Types>(&mut out, &[], 1.0).unwrap();
}

#[test]
fn add_mult_rejects_mismatched_lengths() {
    let m = diagonal_operator(&[Mat3::IDENTITY; 2]);
    let mut out = [Vec3::ZERO; 2];
    assert!(m.add_mult::<Vec3Types>(&mut out, &[Vec3::ONE], 1.0).is_err());
}

#[test]
fn add_mult_rejects_other_representation() {
    let m = diagonal_operator(&[Mat3::IDENTITY]);
    let mut out = [RigidDeriv::default()];
    assert!(m.add_mult::<Rigid3Types>(&mut out, &[RigidDeriv::default()], 1.0).is_err());
}

#[test]
fn add_mult_requires_compress() {
    let mut m = BlockSparseMatrix::new(3);
    m.resize_blocks(1, 1);
    let mut out = [Vec3::ZERO];
    assert!(m.add_mult::<Vec3Types>(&mut out, &[Vec3::ONE], 1.0).is_err());
}

// ─── CSR Tests ────────────────────────────────────────────────

#[test]
fn csr_empty() {
    let m = CsrMatrix::new(10, 10);
    assert_eq!(m.nnz(), 0);
    assert_eq!(m.row_ptr.len(), 11);
}

#[test]
fn csr_from_triplets_sums_duplicates() {
    let m = CsrMatrix::from_triplets(2, 2, &[(1, 1, 2.0), (0, 0, 1.0), (1, 1, 3.0), (0, 1, 4.0)]);
    assert_eq!(m.nnz(), 3);
    assert_eq!(m.get(0, 0), 1.0);
    assert_eq!(m.get(0, 1), 4.0);
    assert_eq!(m.get(1, 1), 5.0);
    assert_eq!(m.get(1, 0), 0.0);
}

#[test]
fn to_csr_expands_blocks() {
    let m = diagonal_operator(&[Mat3::from_diagonal(Vec3::new(1.0, 2.0, 3.0)), Mat3::IDENTITY]);
    let csr = m.to_csr().unwrap();
    assert_eq!(csr.rows, 6);
    assert_eq!(csr.cols, 6);
    assert_eq!(csr.nnz(), 6);
    assert_eq!(csr.get(2, 2), 3.0);
    assert_eq!(csr.get(4, 4), 1.0);
    assert_eq!(csr.mul_vec(&[1.0; 6]), vec![1.0, 2.0, 3.0, 1.0, 1.0, 1.0]);
}

// ─── Solver Tests ─────────────────────────────────────────────

#[test]
fn faer_solves_assembled_compliance() {
    let c = diagonal_operator(&[Mat3::from_diagonal(Vec3::new(2.0, 4.0, 8.0))]);

    let mut solver = FaerSolver::new();
    assert!(!solver.is_factorized());
    solver.factorize_operator(&c, 1.0).unwrap();
    assert!(solver.is_factorized());

    let mut x = [Vec3::ZERO];
    solver
        .solve_derivs::<Vec3Types>(&[Vec3::new(2.0, 4.0, 8.0)], &mut x)
        .unwrap();
    assert!((x[0] - Vec3::ONE).length() < 1e-5);
}

#[test]
fn faer_rejects_empty_and_unfactorized() {
    let mut solver = FaerSolver::default();
    let mut out = [Vec3::ZERO];
    assert!(solver.solve_derivs::<Vec3Types>(&[Vec3::X], &mut out).is_err());

    let mut empty = BlockSparseMatrix::for_types::<Vec3Types>();
    empty.compress().unwrap();
    assert!(solver.factorize_operator(&empty, 1.0).is_err());
}

#[test]
fn faer_rejects_mismatched_buffers() {
    let c = diagonal_operator(&[Mat3::IDENTITY, Mat3::IDENTITY]);
    let mut solver = FaerSolver::new();
    solver.factorize_operator(&c, 1.0).unwrap();
    let mut out = [Vec3::ZERO];
    assert!(solver.solve_derivs::<Vec3Types>(&[Vec3::X], &mut out).is_err());
}

#[test]
fn faer_solves_negated_stiffness_on_derivs() {
    let k = diagonal_operator(&[
        Mat3::from_diagonal(Vec3::splat(-2.0)),
        Mat3::from_diagonal(Vec3::splat(-4.0)),
    ]);
    let mut solver = FaerSolver::new();
    solver.factorize_operator(&k, -1.0).unwrap();
    assert_eq!(solver.dimension(), 6);

    let mut out = [Vec3::ZERO; 2];
    solver
        .solve_derivs::<Vec3Types>(&[Vec3::splat(2.0), Vec3::splat(4.0)], &mut out)
        .unwrap();
    for v in out {
        assert!((v - Vec3::ONE).length() < 1e-5);
    }

    assert!(solver.factorize_operator(&k, 1.0).is_err());
    assert!(!solver.is_factorized());
}

#[test]
fn faer_rejects_uncompressed_operator() {
    let mut m = BlockSparseMatrix::for_types::<Vec3Types>();
    m.resize_blocks(1, 1);
    assert!(FaerSolver::new().factorize_operator(&m, 1.0).is_err());
}
