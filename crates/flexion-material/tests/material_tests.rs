//! Integration tests for flexion-material.

use flexion_material::{
    CubicHardeningMaterial, IsotropicHookeMaterial, MaterialBlock, MaterialDatabase,
    MaterialProperties, OrthotropicHookeMaterial,
};
use flexion_math::{Mat3, Vec3};

fn assert_vec_close(a: Vec3, b: Vec3) {
    assert!((a - b).length() < 1e-4, "{a} != {b}");
}

// ─── Isotropic Hooke Tests ────────────────────────────────────

#[test]
fn isotropic_force_opposes_strain_and_velocity() {
    let mut m = IsotropicHookeMaterial::new(10.0, 2.0).unwrap();
    let mut f = Vec3::ZERO;
    m.add_force(&mut f, &Vec3::new(1.0, 0.0, 0.0), &Vec3::new(0.0, 1.0, 0.0));
    assert_vec_close(f, Vec3::new(-10.0, -2.0, 0.0));
}

#[test]
fn isotropic_force_accumulates() {
    let mut m = IsotropicHookeMaterial::new(1.0, 0.0).unwrap();
    let mut f = Vec3::new(5.0, 5.0, 5.0);
    m.add_force(&mut f, &Vec3::ONE, &Vec3::ZERO);
    assert_vec_close(f, Vec3::splat(4.0));
}

#[test]
fn unweighted_block_uses_unit_volume() {
    let m = IsotropicHookeMaterial::new(3.0, 0.0).unwrap();
    assert!(m.volume().is_none());
    assert_eq!(m.effective_volume(), 1.0);
    assert_eq!(m.stiffness_block(), Mat3::from_diagonal(Vec3::splat(-3.0)));
}

#[test]
fn volume_scales_every_contribution() {
    let mut m = IsotropicHookeMaterial::new(3.0, 1.0).unwrap();
    m.set_volume(Some(0.5));
    assert_eq!(m.stiffness_block(), Mat3::from_diagonal(Vec3::splat(-1.5)));
    assert_eq!(m.damping_block(), Mat3::from_diagonal(Vec3::splat(-0.5)));
    assert_eq!(m.compliance_block(), Mat3::from_diagonal(Vec3::splat(1.0 / 1.5)));
    assert!((m.potential_energy(&Vec3::X) - 0.75).abs() < 1e-6);
}

#[test]
fn isotropic_dforce_matches_blocks() {
    let mut m = IsotropicHookeMaterial::new(4.0, 2.0).unwrap();
    m.set_volume(Some(2.0));
    let dx = Vec3::new(1.0, -2.0, 0.5);
    let (kf, bf) = (0.3, 0.7);

    let mut df = Vec3::ZERO;
    m.add_dforce(&mut df, &dx, kf, bf);

    let expected = kf * (m.stiffness_block() * dx) + bf * (m.damping_block() * dx);
    assert_vec_close(df, expected);
}

#[test]
fn zero_modulus_gives_zero_compliance() {
    let m = IsotropicHookeMaterial::new(0.0, 1.0).unwrap();
    assert_eq!(m.compliance_block(), Mat3::ZERO);
}

#[test]
fn negative_parameters_rejected() {
    assert!(IsotropicHookeMaterial::new(-1.0, 0.0).is_err());
    assert!(OrthotropicHookeMaterial::new(Vec3::new(1.0, -1.0, 1.0), 0.0).is_err());
    assert!(CubicHardeningMaterial::new(1.0, -2.0, 0.0).is_err());
}

// ─── Orthotropic Hooke Tests ──────────────────────────────────

#[test]
fn orthotropic_blocks_are_per_axis() {
    let m = OrthotropicHookeMaterial::new(Vec3::new(1.0, 2.0, 4.0), 0.0).unwrap();
    assert_eq!(m.stiffness_block(), Mat3::from_diagonal(Vec3::new(-1.0, -2.0, -4.0)));
    assert_eq!(m.compliance_block(), Mat3::from_diagonal(Vec3::new(1.0, 0.5, 0.25)));
    assert!((m.anisotropy_ratio() - 4.0).abs() < 1e-6);
}

#[test]
fn orthotropic_dforce_matches_blocks() {
    let m = OrthotropicHookeMaterial::new(Vec3::new(1.0, 2.0, 4.0), 0.5).unwrap();
    let dx = Vec3::new(1.0, 1.0, 1.0);
    let mut df = Vec3::ZERO;
    m.add_dforce(&mut df, &dx, 2.0, 1.0);
    let expected = 2.0 * (m.stiffness_block() * dx) + m.damping_block() * dx;
    assert_vec_close(df, expected);
}

// ─── Cubic Hardening Tests ────────────────────────────────────

#[test]
fn hardening_is_not_constant_stiffness() {
    assert!(!CubicHardeningMaterial::CONSTANT_STIFFNESS);
    assert!(IsotropicHookeMaterial::CONSTANT_STIFFNESS);
    assert!(OrthotropicHookeMaterial::CONSTANT_STIFFNESS);
}

#[test]
fn hardening_at_rest_behaves_linearly() {
    let m = CubicHardeningMaterial::new(2.0, 10.0, 0.0).unwrap();
    assert_eq!(m.stiffness_block(), Mat3::from_diagonal(Vec3::splat(-2.0)));
}

#[test]
fn hardening_stiffness_tracks_last_force_evaluation() {
    let mut m = CubicHardeningMaterial::new(1.0, 1.0, 0.0).unwrap();
    let mut f = Vec3::ZERO;
    let x = Vec3::new(2.0, 0.0, 0.0);
    m.add_force(&mut f, &x, &Vec3::ZERO);

    // f = -(1 + 4) * 2
    assert_vec_close(f, Vec3::new(-10.0, 0.0, 0.0));
    assert_eq!(m.last_strain(), x);

    // K = -(I + (4·I + 2·x·xᵀ)) → diag(-13, -5, -5)
    let k = m.stiffness_block();
    assert!((k.x_axis.x + 13.0).abs() < 1e-5);
    assert!((k.y_axis.y + 5.0).abs() < 1e-5);
    assert!((k.z_axis.z + 5.0).abs() < 1e-5);
}

#[test]
fn hardening_tangent_matches_finite_difference() {
    let mut m = CubicHardeningMaterial::new(1.5, 0.8, 0.0).unwrap();
    let x = Vec3::new(0.3, -0.2, 0.4);
    let mut f0 = Vec3::ZERO;
    m.add_force(&mut f0, &x, &Vec3::ZERO);

    let dx = Vec3::new(1e-3, 2e-3, -1e-3);
    let mut probe = m.clone();
    let mut f1 = Vec3::ZERO;
    probe.add_force(&mut f1, &(x + dx), &Vec3::ZERO);

    let mut df = Vec3::ZERO;
    m.add_dforce(&mut df, &dx, 1.0, 0.0);
    assert!((df - (f1 - f0)).length() < 1e-4);
}

#[test]
fn hardening_compliance_inverts_restoring_stiffness() {
    let mut m = CubicHardeningMaterial::new(2.0, 1.0, 0.0).unwrap();
    let mut f = Vec3::ZERO;
    m.add_force(&mut f, &Vec3::new(0.5, 0.5, 0.0), &Vec3::ZERO);
    let product = m.compliance_block() * (m.stiffness_block() * -1.0);
    assert!(product.abs_diff_eq(Mat3::IDENTITY, 1e-4));
}

#[test]
fn hardening_energy_is_quartic() {
    let m = CubicHardeningMaterial::new(2.0, 4.0, 0.0).unwrap();
    // 0.5·2·1 + 0.25·4·1
    assert!((m.potential_energy(&Vec3::X) - 2.0).abs() < 1e-6);
}

// ─── Properties & Database Tests ──────────────────────────────

#[test]
fn default_database_has_four_materials() {
    let db = MaterialDatabase::with_defaults();
    assert_eq!(db.len(), 4);
    assert_eq!(
        db.names(),
        vec!["natural_rubber", "polyurethane_foam", "soft_tissue", "tendon"]
    );
}

#[test]
fn missing_material_returns_none() {
    let db = MaterialDatabase::with_defaults();
    assert!(db.get("unobtainium").is_none());
}

#[test]
fn every_preset_builds_every_block_type() {
    let db = MaterialDatabase::with_defaults();
    for name in db.names() {
        let props = db.get(name).unwrap();
        assert!(IsotropicHookeMaterial::from_properties(props).is_ok());
        assert!(OrthotropicHookeMaterial::from_properties(props).is_ok());
        assert!(CubicHardeningMaterial::from_properties(props).is_ok());
    }
}

#[test]
fn tendon_is_anisotropic_and_foam_is_linear() {
    let db = MaterialDatabase::with_defaults();
    assert!(db.get("tendon").unwrap().is_anisotropic());
    assert!(!db.get("soft_tissue").unwrap().is_anisotropic());
    assert!(db.get("polyurethane_foam").unwrap().is_linear());
    assert!(!db.get("natural_rubber").unwrap().is_linear());
}

#[test]
fn custom_material_and_validation() {
    let mut db = MaterialDatabase::empty();
    assert!(db.is_empty());
    let bad = MaterialProperties {
        name: "broken".into(),
        youngs_modulus: f32::NAN,
        anisotropy: [1.0; 3],
        viscosity: 0.0,
        hardening: 0.0,
    };
    assert!(bad.validate().is_err());
    assert!(IsotropicHookeMaterial::from_properties(&bad).is_err());
    db.register(bad);
    assert_eq!(db.len(), 1);
}

#[test]
fn properties_serialization() {
    let db = MaterialDatabase::with_defaults();
    let tendon = db.get("tendon").unwrap();
    let json = serde_json::to_string(tendon).unwrap();
    let recovered: MaterialProperties = serde_json::from_str(&json).unwrap();
    assert_eq!(&recovered, tendon);
    assert_vec_close(recovered.axis_moduli() / 1.2e9, Vec3::new(1.0, 0.01, 0.01));
}
