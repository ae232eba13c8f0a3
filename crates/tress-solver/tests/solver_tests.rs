//! Integration tests for tress-solver.

use approx::assert_relative_eq;
use tress_material::database::test_rod;
use tress_math::DVec3;
use tress_solver::energy::{bending_energy, stretching_energy, twisting_energy};
use tress_solver::forces::{add_bending_forces, add_stretching_forces, add_twisting_forces};
use tress_solver::{
    substep_retention, ExplicitEuler, HairSimulation, Integrator, IntegratorKind, Pinning, Rod,
    RodForces, SolverConfig, SymplecticEuler, TwistMode,
};
use tress_strand::generators::{bundle_roots, helix, straight};
use tress_strand::{RestState, Strand};
use tress_types::constants::FRAME_TOLERANCE;
use tress_types::{StrandId, TressError};

fn curly_rod(pinning: Pinning) -> Rod {
    let points = helix(20, 0.05, 0.1, 1.5, DVec3::ZERO);
    Rod::new(StrandId(0), points, &test_rod(), &pinning).unwrap()
}

/// Moves every vertex off its rest position and twists the edges.
fn deform(rod: &mut Rod) {
    let s = rod.strand_mut();
    for (i, p) in s.positions.iter_mut().enumerate() {
        let x = i as f64;
        *p += DVec3::new((1.3 * x).sin(), (0.7 * x).cos(), (2.1 * x).sin()) * 2e-3;
    }
    s.update_kinematics();
    for (j, theta) in s.thetas.iter_mut().enumerate() {
        *theta = 0.2 * (0.9 * j as f64).sin();
    }
    s.update_material_frames();
}

/// Debug settings with enough substeps for the short edges of the test helices.
fn fine_config() -> SolverConfig {
    SolverConfig {
        substeps: 80,
        ..SolverConfig::debug()
    }
}

fn no_gravity(substeps: u32, twist_mode: TwistMode) -> SolverConfig {
    SolverConfig {
        gravity: [0.0; 3],
        substeps,
        twist_mode,
        ..Default::default()
    }
}

/// `(E(x) − E(x + εF)) / (ε|F|²)` for a position-space force field.
fn position_descent_ratio(
    rod: &Rod,
    energy: impl Fn(&Strand) -> f64,
    forces: &RodForces,
) -> f64 {
    let max = forces.max_force();
    assert!(max > 0.0);
    let eps = 1e-7 / max;
    let mut moved = rod.strand().clone();
    for (p, f) in moved.positions.iter_mut().zip(&forces.vertex) {
        *p += *f * eps;
    }
    moved.update_kinematics();
    let norm2: f64 = forces.vertex.iter().map(|f| f.length_squared()).sum();
    (energy(rod.strand()) - energy(&moved)) / (eps * norm2)
}

// ─── Construction Tests ───────────────────────────────────────

#[test]
fn rod_rejects_short_strand() {
    let result = Rod::new(StrandId(0), vec![DVec3::ZERO], &test_rod(), &Pinning::None);
    assert!(matches!(result, Err(TressError::InvalidStrand(_))));
}

#[test]
fn rod_rejects_bad_pin_index() {
    let points = straight(4, 1.0, DVec3::ZERO, DVec3::NEG_Y);
    let result = Rod::new(StrandId(0), points, &test_rod(), &Pinning::Indices(vec![9]));
    assert!(matches!(result, Err(TressError::InvalidConfig(_))));
}

#[test]
fn lumped_masses() {
    let material = test_rod();
    let points = straight(3, 2.0, DVec3::ZERO, DVec3::X);
    let rod = Rod::new(StrandId(0), points, &material, &Pinning::None).unwrap();
    let edge_mass = material.linear_density() * 1.0;
    assert_relative_eq!(rod.masses()[0], 0.5 * edge_mass);
    assert_relative_eq!(rod.masses()[1], edge_mass);
    assert_relative_eq!(rod.masses()[2], 0.5 * edge_mass);
    assert!(rod.inv_masses().iter().all(|&w| w > 0.0));
}

#[test]
fn pinned_vertices_have_zero_inverse_mass() {
    let rod = curly_rod(Pinning::RootEdge);
    assert_eq!(rod.inv_masses()[0], 0.0);
    assert_eq!(rod.inv_masses()[1], 0.0);
    assert!(rod.inv_masses()[2] > 0.0);
    assert_eq!(rod.pinned().iter().filter(|&&p| p).count(), 2);
}

#[test]
fn rest_state_is_idempotent() {
    let rod = curly_rod(Pinning::Root);
    assert_eq!(&RestState::compute(rod.strand()), rod.rest());
}

// ─── Energy Tests ─────────────────────────────────────────────

#[test]
fn rest_configuration_has_no_elastic_energy() {
    let rod = curly_rod(Pinning::Root);
    let e = rod.energy();
    assert!(e.elastic() < 1e-20, "elastic energy {}", e.elastic());
    assert_eq!(e.kinetic, 0.0);
}

#[test]
fn stretch_only_scenario() {
    let material = test_rod();
    let points = vec![DVec3::ZERO, DVec3::X, DVec3::X * 2.0];
    let mut rod = Rod::new(StrandId(0), points, &material, &Pinning::None).unwrap();
    let s = rod.strand_mut();
    s.positions = vec![DVec3::ZERO, DVec3::X * 1.1, DVec3::X * 2.2];
    s.update_kinematics();

    let k = rod.stiffness().stretching[0];
    assert_relative_eq!(k, material.youngs_modulus * std::f64::consts::PI * 1e-6, max_relative = 1e-12);

    let e = rod.energy();
    assert_relative_eq!(e.stretching, 2.0 * 0.5 * k * 0.01, max_relative = 1e-9);
    assert!(e.bending.abs() < 1e-20);
    assert!(e.twisting.abs() < 1e-20);
}

#[test]
fn kinetic_energy_ignores_pinned() {
    let mut rod = curly_rod(Pinning::Root);
    let m1 = rod.masses()[1];
    let s = rod.strand_mut();
    s.velocities[0] = DVec3::X * 10.0;
    s.velocities[1] = DVec3::Y * 2.0;
    assert_relative_eq!(rod.energy().kinetic, 0.5 * m1 * 4.0);
}

// ─── Force Tests ──────────────────────────────────────────────

#[test]
fn straight_strand_is_in_equilibrium() {
    let points = straight(8, 0.4, DVec3::ZERO, DVec3::new(1.0, -2.0, 0.5));
    let rod = Rod::new(StrandId(0), points, &test_rod(), &Pinning::None).unwrap();
    let f = rod.forces();
    assert!(f.max_force() < 1e-12);
    assert!(f.twist.iter().all(|m| m.abs() < 1e-18));
}

#[test]
fn curved_rest_shape_is_in_equilibrium() {
    let f = curly_rod(Pinning::Root).forces();
    assert!(f.max_force() < 1e-12, "max force {}", f.max_force());
}

#[test]
fn stretching_forces_match_finite_differences() {
    let mut rod = curly_rod(Pinning::None);
    deform(&mut rod);
    let mut forces = RodForces::zeros(rod.strand().vertex_count());
    add_stretching_forces(rod.strand(), rod.rest(), rod.stiffness(), &mut forces);

    let h = 1e-6;
    let energy = |s: &Strand| stretching_energy(s, rod.rest(), rod.stiffness());
    for i in 0..rod.strand().vertex_count() {
        for axis in [DVec3::X, DVec3::Y, DVec3::Z] {
            let mut plus = rod.strand().clone();
            plus.positions[i] += axis * h;
            plus.update_kinematics();
            let mut minus = rod.strand().clone();
            minus.positions[i] -= axis * h;
            minus.update_kinematics();

            let fd = (energy(&plus) - energy(&minus)) / (2.0 * h);
            let analytic = -forces.vertex[i].dot(axis);
            assert!(
                (fd - analytic).abs() < 1e-7 + 1e-5 * analytic.abs(),
                "vertex {i}: fd={fd}, analytic={analytic}"
            );
        }
    }
}

#[test]
fn bending_forces_are_descent_direction() {
    let mut rod = curly_rod(Pinning::None);
    deform(&mut rod);
    let mut forces = RodForces::zeros(rod.strand().vertex_count());
    add_bending_forces(rod.strand(), rod.rest(), rod.stiffness(), &mut forces);

    let ratio = position_descent_ratio(
        &rod,
        |s| bending_energy(s, rod.rest(), rod.stiffness()),
        &forces,
    );
    assert!((0.9..1.1).contains(&ratio), "ratio {ratio}");
}

#[test]
fn twisting_forces_are_descent_direction() {
    let mut rod = curly_rod(Pinning::None);
    deform(&mut rod);
    let mut forces = RodForces::zeros(rod.strand().vertex_count());
    add_twisting_forces(rod.strand(), rod.rest(), rod.stiffness(), &mut forces);

    let ratio = position_descent_ratio(
        &rod,
        |s| twisting_energy(s, rod.rest(), rod.stiffness()),
        &forces,
    );
    assert!((0.9..1.1).contains(&ratio), "ratio {ratio}");
}

#[test]
fn twist_moments_are_descent_direction() {
    let mut rod = curly_rod(Pinning::None);
    deform(&mut rod);
    let forces = rod.forces();
    let elastic = |s: &Strand| {
        bending_energy(s, rod.rest(), rod.stiffness()) + twisting_energy(s, rod.rest(), rod.stiffness())
    };

    let max = forces.twist.iter().fold(0.0_f64, |m, t| m.max(t.abs()));
    let eps = 1e-6 / max;
    let mut turned = rod.strand().clone();
    for (theta, m) in turned.thetas.iter_mut().zip(&forces.twist) {
        *theta += m * eps;
    }
    turned.update_material_frames();

    let norm2: f64 = forces.twist.iter().map(|m| m * m).sum();
    let ratio = (elastic(rod.strand()) - elastic(&turned)) / (eps * norm2);
    assert!((0.9..1.1).contains(&ratio), "ratio {ratio}");
}

#[test]
fn forces_sum_to_zero() {
    let mut rod = curly_rod(Pinning::None);
    deform(&mut rod);
    let total: DVec3 = rod.forces().vertex.iter().copied().sum();
    assert!(total.length() < 1e-12, "net force {total}");
}

// ─── Integrator Tests ─────────────────────────────────────────

#[test]
fn symplectic_uses_new_velocity() {
    let (mut x, mut v) = (DVec3::ZERO, DVec3::ZERO);
    SymplecticEuler.advance(&mut x, &mut v, DVec3::X, 0.5);
    assert_eq!(v, DVec3::X * 0.5);
    assert_eq!(x, DVec3::X * 0.25);
}

#[test]
fn explicit_uses_old_velocity() {
    let (mut x, mut v) = (DVec3::ZERO, DVec3::ZERO);
    ExplicitEuler.advance(&mut x, &mut v, DVec3::X, 0.5);
    assert_eq!(x, DVec3::ZERO);
    assert_eq!(v, DVec3::X * 0.5);
}

// ─── Stepping Tests ───────────────────────────────────────────

#[test]
fn pinned_root_stays_fixed_under_gravity() {
    let points = straight(10, 0.5, DVec3::new(0.0, 1.0, 0.0), DVec3::X);
    let root = points[0];
    let tip = points[9];
    let mut rod = Rod::new(StrandId(0), points, &test_rod(), &Pinning::Root).unwrap();
    let config = SolverConfig::debug();

    for _ in 0..30 {
        let report = rod.step(&config);
        assert!(report.is_stable());
        assert_eq!(rod.strand().positions[0], root);
        assert_eq!(rod.strand().velocities[0], DVec3::ZERO);
    }
    assert!(rod.strand().positions[9].y < tip.y - 0.01);
    assert_eq!(rod.step_count(), 30);
}

#[test]
fn free_strand_falls() {
    let mut rod = curly_rod(Pinning::None);
    let config = fine_config();
    let before: DVec3 = rod.strand().positions.iter().copied().sum();
    rod.step(&config);
    let after: DVec3 = rod.strand().positions.iter().copied().sum();
    assert!(after.y < before.y);
    assert_relative_eq!(after.x, before.x, epsilon = 1e-9);
}

#[test]
fn damping_per_tick_ignores_substep_count() {
    let v0 = DVec3::new(0.3, 0.0, -0.2);
    let expected = v0 * (1.0 - 0.05) * (1.0 - test_rod().damping);
    for substeps in [10, 40] {
        let points = straight(6, 0.5, DVec3::ZERO, DVec3::NEG_Y);
        let mut rod = Rod::new(StrandId(0), points, &test_rod(), &Pinning::None).unwrap();
        rod.strand_mut().velocities.fill(v0);
        let config = SolverConfig {
            damping: 0.05,
            ..no_gravity(substeps, TwistMode::Frozen)
        };
        assert!(rod.step(&config).is_stable());
        for v in &rod.strand().velocities {
            assert_relative_eq!(v.x, expected.x, max_relative = 1e-9);
            assert_relative_eq!(v.z, expected.z, max_relative = 1e-9);
        }
    }
}

#[test]
fn substep_retention_compounds_to_tick_factor() {
    for substeps in [1, 7, 200] {
        let r = substep_retention(0.01, 0.02, substeps);
        assert_relative_eq!(r.powi(substeps as i32), 0.99 * 0.98, max_relative = 1e-12);
    }
    assert_eq!(substep_retention(0.0, 0.0, 50), 1.0);
}

#[test]
fn frames_stay_orthonormal_while_stepping() {
    let mut rod = curly_rod(Pinning::Root);
    let config = SolverConfig {
        substeps: 40,
        ..Default::default()
    };
    for _ in 0..10 {
        let report = rod.step(&config);
        assert!(report.is_stable());
        assert!(report.max_frame_error < FRAME_TOLERANCE);
    }
}

#[test]
fn frozen_twist_keeps_thetas() {
    let mut rod = curly_rod(Pinning::Root);
    deform(&mut rod);
    let thetas = rod.strand().thetas.clone();
    rod.step(&no_gravity(80, TwistMode::Frozen));
    assert_eq!(rod.strand().thetas, thetas);
}

#[test]
fn quasi_static_twist_relaxes() {
    let points = straight(11, 0.5, DVec3::ZERO, DVec3::NEG_Y);
    let mut rod = Rod::new(StrandId(0), points, &test_rod(), &Pinning::RootEdge).unwrap();
    let s = rod.strand_mut();
    for (j, theta) in s.thetas.iter_mut().enumerate() {
        *theta = 0.1 * j as f64;
    }
    s.update_material_frames();
    let initial = rod.energy().twisting;
    assert!(initial > 0.0);

    let config = no_gravity(20, TwistMode::QuasiStatic);
    for _ in 0..5 {
        assert!(rod.step(&config).is_stable());
    }
    assert_eq!(rod.strand().thetas[0], 0.0);
    assert!(rod.energy().twisting < 0.1 * initial);
}

#[test]
fn dynamic_twist_locks_clamped_edge() {
    let mut rod = curly_rod(Pinning::RootEdge);
    deform(&mut rod);
    let theta0 = rod.strand().thetas[0];
    let config = SolverConfig {
        substeps: 40,
        twist_mode: TwistMode::Dynamic,
        ..Default::default()
    };
    for _ in 0..3 {
        assert!(rod.step(&config).is_stable());
    }
    assert_eq!(rod.strand().thetas[0], theta0);
    assert_eq!(rod.strand().theta_rates[0], 0.0);
}

#[test]
fn explicit_euler_steps() {
    let mut rod = curly_rod(Pinning::Root);
    let config = SolverConfig {
        integrator: IntegratorKind::ExplicitEuler,
        ..fine_config()
    };
    assert!(rod.step(&config).is_stable());
    assert!(rod.strand().is_finite());
}

#[test]
fn moved_pin_target_is_followed() {
    let mut rod = curly_rod(Pinning::Root);
    let target = DVec3::new(0.01, 0.02, 0.0);
    rod.set_pin_target(0, target).unwrap();
    rod.step(&fine_config());
    assert_eq!(rod.strand().positions[0], target);
    assert!(rod.set_pin_target(5, target).is_err());
}

// ─── Instability Tests ────────────────────────────────────────

#[test]
fn nan_is_reported_and_reset_recovers() {
    let points = helix(20, 0.05, 0.1, 1.5, DVec3::ZERO);
    let mut rod = Rod::new(StrandId(7), points.clone(), &test_rod(), &Pinning::Root).unwrap();
    let config = fine_config();
    rod.step(&config);

    rod.strand_mut().positions[3] = DVec3::NAN;
    let report = rod.step(&config);
    assert!(!report.is_stable());
    assert_eq!(report.step, 1);
    match report.check() {
        Err(TressError::NumericalInstability { strand, step }) => {
            assert_eq!(strand, 7);
            assert_eq!(step, 1);
        }
        other => panic!("expected instability, got {other:?}"),
    }
    assert_eq!(rod.step_count(), 1);

    rod.reset();
    assert!(rod.strand().is_finite());
    assert_eq!(rod.strand().positions, points);
    assert_eq!(rod.step_count(), 0);
    assert!(rod.step(&config).check().is_ok());
}

// ─── Config Tests ─────────────────────────────────────────────

#[test]
fn config_defaults() {
    let config = SolverConfig::default();
    assert_eq!(config.gravity, [0.0, -9.81, 0.0]);
    assert_eq!(config.substeps, 200);
    assert_eq!(config.integrator, IntegratorKind::SymplecticEuler);
    assert_eq!(config.twist_mode, TwistMode::QuasiStatic);
    assert!(config.validate().is_ok());
    assert_relative_eq!(config.substep_dt(), 1.0 / 12000.0);
}

#[test]
fn config_presets() {
    assert!(SolverConfig::debug().substeps < SolverConfig::default().substeps);
    assert!(SolverConfig::high_quality().substeps > SolverConfig::default().substeps);
}

#[test]
fn config_validation() {
    let bad_substeps = SolverConfig { substeps: 0, ..Default::default() };
    assert!(bad_substeps.validate().is_err());
    let bad_damping = SolverConfig { damping: 1.0, ..Default::default() };
    assert!(bad_damping.validate().is_err());
    let bad_dt = SolverConfig { dt: -1.0, ..Default::default() };
    assert!(bad_dt.validate().is_err());
    assert!(HairSimulation::new(bad_dt).is_err());
}

#[test]
fn config_json_roundtrip() {
    let config = SolverConfig::high_quality();
    let json = serde_json::to_string(&config).unwrap();
    let back: SolverConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn config_partial_toml() {
    let config: SolverConfig = toml::from_str(
        r#"
        dt = 0.01
        substeps = 10
        integrator = "explicit_euler"
        twist_mode = "dynamic"
        "#,
    )
    .unwrap();
    assert_eq!(config.dt, 0.01);
    assert_eq!(config.substeps, 10);
    assert_eq!(config.integrator, IntegratorKind::ExplicitEuler);
    assert_eq!(config.twist_mode, TwistMode::Dynamic);
    assert_eq!(config.gravity, SolverConfig::default().gravity);
}

#[test]
fn pinning_serde() {
    let json = serde_json::to_string(&Pinning::Indices(vec![0, 4])).unwrap();
    assert_eq!(json, r#"{"indices":[0,4]}"#);
    let root: Pinning = serde_json::from_str(r#""root_edge""#).unwrap();
    assert_eq!(root, Pinning::RootEdge);
}

// ─── Simulation Tests ─────────────────────────────────────────

fn bundle() -> HairSimulation {
    let strands = bundle_roots(2, 0.02, DVec3::ZERO)
        .into_iter()
        .map(|root| helix(12, 0.02, 0.05, 1.0, root))
        .collect();
    HairSimulation::from_strands(strands, &test_rod(), &Pinning::Root, fine_config()).unwrap()
}

#[test]
fn simulation_steps_every_rod() {
    let mut sim = bundle();
    assert_eq!(sim.rod_count(), 4);
    assert_eq!(sim.vertex_count(), 48);

    for _ in 0..3 {
        let tick = sim.step();
        assert_eq!(tick.strands.len(), 4);
        assert!(tick.check().is_ok());
        assert!(tick.unstable_strands().is_empty());
    }
    assert_eq!(sim.timestep(), 3);
    assert_relative_eq!(sim.sim_time(), 3.0 * sim.config().dt);
    assert!(sim.rods().iter().all(|r| r.step_count() == 3));
}

#[test]
fn parallel_step_matches_sequential() {
    let mut sim = bundle();
    let mut rods: Vec<Rod> = sim.rods().to_vec();
    let config = sim.config().clone();

    sim.step();
    for rod in &mut rods {
        rod.step(&config);
    }
    for (a, b) in sim.rods().iter().zip(&rods) {
        assert_eq!(a.strand().positions, b.strand().positions);
    }
}

#[test]
fn simulation_reset() {
    let mut sim = bundle();
    let initial = sim.positions();
    sim.step();
    assert_ne!(sim.positions(), initial);

    sim.reset_strand(StrandId(2)).unwrap();
    assert_eq!(sim.positions()[2], initial[2]);
    assert!(sim.reset_strand(StrandId(99)).is_err());

    sim.reset();
    assert_eq!(sim.positions(), initial);
    assert_eq!(sim.timestep(), 0);
}

#[test]
fn simulation_energy_sums_rods() {
    let mut sim = bundle();
    sim.step();
    let total = sim.energy();
    let manual: f64 = sim.rods().iter().map(|r| r.energy().total()).sum();
    assert_relative_eq!(total.total(), manual, max_relative = 1e-12);
}
