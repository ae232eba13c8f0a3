//! Integration tests for tress-strand.

use std::f64::consts::{PI, TAU};

use approx::assert_relative_eq;
use tress_material::CrossSection;
use tress_math::{DVec2, DVec3, Frame};
use tress_strand::curvature::curvature_binormal;
use tress_strand::generators::{bundle_roots, helix, straight, wavy};
use tress_strand::subdivide::subdivide;
use tress_strand::{EdgeGeometry, RestState, Stiffness, Strand};
use tress_types::constants::FRAME_TOLERANCE;

fn wrap_angle(a: f64) -> f64 {
    let w = (a + PI).rem_euclid(TAU) - PI;
    if w <= -PI { w + TAU } else { w }
}

fn curly() -> Strand {
    Strand::new(helix(24, 0.05, 0.08, 2.5, DVec3::ZERO)).unwrap()
}

// ─── Construction Tests ───────────────────────────────────────

#[test]
fn single_vertex_rejected() {
    assert!(Strand::new(vec![DVec3::ZERO]).is_err());
}

#[test]
fn empty_rejected() {
    assert!(Strand::new(Vec::new()).is_err());
}

#[test]
fn non_finite_rejected() {
    let pts = vec![DVec3::ZERO, DVec3::new(f64::NAN, 0.0, 0.0)];
    assert!(Strand::new(pts).is_err());
}

#[test]
fn two_vertex_strand() {
    let s = Strand::new(vec![DVec3::ZERO, DVec3::Y]).unwrap();
    assert_eq!(s.vertex_count(), 2);
    assert_eq!(s.edge_count(), 1);
    assert_eq!(s.curvatures(), vec![DVec2::ZERO; 2]);
    assert_eq!(s.twists(), vec![0.0; 2]);
}

#[test]
fn starts_at_rest_untwisted() {
    let s = curly();
    assert!(s.velocities.iter().all(|v| *v == DVec3::ZERO));
    assert!(s.thetas.iter().all(|&t| t == 0.0));
    for i in 0..s.vertex_count() {
        assert!(s.twist(i).abs() < 1e-10, "twist at {i} = {}", s.twist(i));
    }
}

// ─── Geometry Tests ───────────────────────────────────────────

#[test]
fn edges_lengths_tangents() {
    let g = EdgeGeometry::from_positions(&[DVec3::ZERO, DVec3::new(3.0, 4.0, 0.0)]);
    assert_eq!(g.edges[0], DVec3::new(3.0, 4.0, 0.0));
    assert_relative_eq!(g.lengths[0], 5.0);
    assert_relative_eq!(g.tangents[0].x, 0.6);
    assert_relative_eq!(g.tangents[0].y, 0.8);
}

#[test]
fn degenerate_edge_keeps_previous_tangent() {
    let mut g = EdgeGeometry::from_positions(&[DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0)]);
    g.update(&[DVec3::ZERO, DVec3::X, DVec3::X]);
    assert!(g.is_degenerate(1));
    assert_eq!(g.tangents[1], DVec3::Y);
    assert!(g.tangents.iter().all(|t| t.is_finite()));
}

#[test]
fn degenerate_edge_at_construction_inherits_neighbor() {
    let g = EdgeGeometry::from_positions(&[DVec3::ZERO, DVec3::X, DVec3::X]);
    assert_eq!(g.tangents[1], DVec3::X);
}

#[test]
fn coincident_points_do_not_produce_nan() {
    let s = Strand::new(vec![DVec3::ZERO; 4]).unwrap();
    assert!(s.is_finite());
    assert_eq!(s.curvature(1), DVec2::ZERO);
}

// ─── Frame Tests ──────────────────────────────────────────────

#[test]
fn initial_frames_are_orthonormal() {
    for pts in [
        curly().positions.clone(),
        straight(10, 1.0, DVec3::ZERO, DVec3::X),
        wavy(30, 0.3, 0.02, 3.0, DVec3::ZERO),
    ] {
        let s = Strand::new(pts).unwrap();
        assert!(s.max_frame_error() < FRAME_TOLERANCE);
        for (f, t) in s.reference_frames().iter().zip(&s.geometry().tangents) {
            assert_eq!(f.tangent, *t);
        }
    }
}

#[test]
fn frames_stay_orthonormal_after_motion() {
    let mut s = curly();
    for step in 0..50 {
        for (i, p) in s.positions.iter_mut().enumerate() {
            let phase = 0.1 * step as f64 + 0.3 * i as f64;
            *p += DVec3::new(phase.sin(), phase.cos(), (2.0 * phase).sin()) * 2e-3;
        }
        s.thetas.iter_mut().for_each(|t| *t += 0.01);
        s.update_kinematics();
        assert!(s.max_frame_error() < FRAME_TOLERANCE, "step {step}: {}", s.max_frame_error());
    }
}

#[test]
fn time_transport_uses_own_frame() {
    // Rotating the whole strand rigidly carries every frame along.
    let mut s = Strand::new(straight(4, 1.0, DVec3::ZERO, DVec3::Z)).unwrap();
    let before = s.reference_frames()[2];
    for p in s.positions.iter_mut() {
        *p = DVec3::new(p.z, p.y, -p.x); // quarter turn about Y
    }
    s.update_kinematics();
    let after = s.reference_frames()[2];
    assert!((after.tangent - DVec3::X).length() < 1e-12);
    assert!((after.d1 - DVec3::new(before.d1.z, before.d1.y, -before.d1.x)).length() < 1e-12);
}

#[test]
fn installed_frames_replace_transport() {
    let mut moved = curly();
    for (i, p) in moved.positions.iter_mut().enumerate() {
        *p += DVec3::new(0.0, 0.01 * i as f64, 0.0);
    }
    moved.thetas[2] = 0.3;
    moved.update_kinematics();
    let saved = moved.reference_frames().to_vec();
    let twists = moved.twists();

    let mut restored = curly();
    restored.positions = moved.positions.clone();
    restored.thetas = moved.thetas.clone();
    restored.set_reference_frames(saved.clone()).unwrap();

    assert_eq!(restored.reference_frames(), saved.as_slice());
    assert_eq!(restored.geometry().tangents, moved.geometry().tangents);
    for (a, b) in restored.twists().iter().zip(&twists) {
        assert_relative_eq!(*a, *b, epsilon = 1e-12);
    }
    assert!(restored.max_frame_error() < FRAME_TOLERANCE);
}

#[test]
fn installing_bad_frames_is_rejected() {
    let mut s = curly();
    let mut frames = s.reference_frames().to_vec();
    frames.pop();
    assert!(s.set_reference_frames(frames).is_err());

    let mut frames = s.reference_frames().to_vec();
    frames[1] = Frame::new(frames[1].tangent, frames[1].d1 * 1.01, frames[1].d2);
    assert!(s.set_reference_frames(frames).is_err());
}

#[test]
fn material_frame_rotates_by_theta() {
    let mut s = curly();
    s.thetas[3] = 0.4;
    s.update_material_frames();
    let f = s.reference_frames()[3];
    let m = s.material_frames();
    assert_relative_eq!(m.m1[3].dot(f.d1), 0.4f64.cos(), epsilon = 1e-12);
    assert_relative_eq!(m.m1[3].dot(f.d2), 0.4f64.sin(), epsilon = 1e-12);
    assert_relative_eq!(m.m2[3].dot(f.d1), -0.4f64.sin(), epsilon = 1e-12);
}

// ─── Curvature and Twist Tests ────────────────────────────────

#[test]
fn straight_strand_has_no_curvature() {
    let s = Strand::new(straight(6, 1.0, DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0))).unwrap();
    for k in s.curvatures() {
        assert!(k.length() < 1e-12);
    }
}

#[test]
fn right_angle_curvature_binormal() {
    // 2·(X × Y)/(1 + 0) = 2Z
    let kb = curvature_binormal(DVec3::X, DVec3::Y);
    assert!((kb - DVec3::Z * 2.0).length() < 1e-12);
}

#[test]
fn folded_vertex_has_zero_binormal() {
    assert_eq!(curvature_binormal(DVec3::X, -DVec3::X), DVec3::ZERO);
}

#[test]
fn endpoint_quantities_are_zero() {
    let s = curly();
    let last = s.vertex_count() - 1;
    assert_eq!(s.curvature_binormal(0), DVec3::ZERO);
    assert_eq!(s.curvature_binormal(last), DVec3::ZERO);
    assert_eq!(s.twist(0), 0.0);
    assert_eq!(s.twist(last), 0.0);
}

#[test]
fn twist_tracks_theta_at_one_edge() {
    let mut s = curly();
    let i = 7;
    let before = s.twist(i);
    for delta in [0.3, -1.1, 2.5] {
        s.thetas[i] += delta;
        s.update_material_frames();
        let after = s.twist(i);
        assert_relative_eq!(wrap_angle(after - before - delta), 0.0, epsilon = 1e-9);
        s.thetas[i] -= delta;
        s.update_material_frames();
    }
}

#[test]
fn twist_decreases_with_previous_theta() {
    let mut s = curly();
    let i = 5;
    let before = s.twist(i);
    s.thetas[i - 1] += 0.25;
    s.update_material_frames();
    assert_relative_eq!(wrap_angle(s.twist(i) - before + 0.25), 0.0, epsilon = 1e-9);
}

// ─── Rest State Tests ─────────────────────────────────────────

#[test]
fn rest_state_lengths_and_voronoi() {
    let pts = vec![DVec3::ZERO, DVec3::X, DVec3::new(3.0, 0.0, 0.0), DVec3::new(3.0, 1.0, 0.0)];
    let s = Strand::new(pts).unwrap();
    let rest = RestState::compute(&s);
    assert_eq!(rest.lengths, vec![1.0, 2.0, 1.0]);
    assert_eq!(rest.voronoi_lengths, vec![0.0, 1.5, 1.5, 0.0]);
    assert_eq!(rest.twists, vec![0.0; 4]);
    assert_eq!(rest.vertex_count(), 4);
    assert_relative_eq!(rest.total_length(), 4.0);
}

#[test]
fn rest_curvature_matches_current() {
    let s = curly();
    let rest = RestState::compute(&s);
    assert_eq!(rest.curvatures, s.curvatures());
    assert_eq!(rest.curvatures[0], DVec2::ZERO);
    assert!(rest.curvatures[5].length() > 0.0);
}

// ─── Stiffness Tests ──────────────────────────────────────────

#[test]
fn stiffness_formulas() {
    let cs = CrossSection::new(vec![1.0, 3.0], vec![2.0, 2.0]).unwrap();
    let k = Stiffness::compute(&cs, 10.0, 4.0, 3).unwrap();

    assert_relative_eq!(k.stretching[0], 10.0 * PI * 2.0);
    assert_relative_eq!(k.stretching[1], 10.0 * PI * 6.0);

    // vertex 1: ā = 2, b̄ = 2, A = 4π
    let area = 4.0 * PI;
    assert_relative_eq!(k.bending[1].x_axis.x, 10.0 * area * 4.0 / 4.0);
    assert_relative_eq!(k.bending[1].y_axis.y, 10.0 * area * 4.0 / 4.0);
    assert_eq!(k.bending[1].x_axis.y, 0.0);
    assert_relative_eq!(k.twisting[1], 4.0 * area * 8.0 / 4.0);

    assert_eq!(k.twisting[0], 0.0);
    assert_eq!(k.twisting[2], 0.0);
}

#[test]
fn stiffness_rejects_wrong_edge_count() {
    let cs = CrossSection::uniform(3, 1.0, 1.0);
    assert!(Stiffness::compute(&cs, 1.0, 1.0, 3).is_err());
}

// ─── Subdivision Tests ────────────────────────────────────────

#[test]
fn subdivide_keeps_endpoints_and_count() {
    let pts = vec![DVec3::ZERO, DVec3::new(0.0, -0.1, 0.0), DVec3::new(0.0, -1.0, 0.0)];
    let out = subdivide(&pts, 11).unwrap();
    assert_eq!(out.len(), 11);
    assert_eq!(out[0], pts[0]);
    assert_eq!(out[10], pts[2]);
    for w in out.windows(2) {
        assert_relative_eq!((w[1] - w[0]).length(), 0.1, epsilon = 1e-12);
    }
}

#[test]
fn subdivide_follows_corners() {
    let pts = vec![DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0)];
    let out = subdivide(&pts, 3).unwrap();
    assert!((out[1] - DVec3::X).length() < 1e-12);
}

#[test]
fn subdivide_rejects_bad_counts() {
    assert!(subdivide(&[DVec3::ZERO, DVec3::X], 1).is_err());
    assert!(subdivide(&[DVec3::ZERO], 5).is_err());
}

#[test]
fn subdivide_zero_length() {
    let out = subdivide(&[DVec3::ONE, DVec3::ONE], 4).unwrap();
    assert_eq!(out, vec![DVec3::ONE; 4]);
}

// ─── Generator Tests ──────────────────────────────────────────

#[test]
fn helix_has_uniform_edges() {
    let s = curly();
    let g = s.geometry();
    let first = g.lengths[0];
    for &l in &g.lengths {
        assert_relative_eq!(l, first, epsilon = 1e-12);
    }
}

#[test]
fn wavy_spans_requested_length() {
    let pts = wavy(41, 0.5, 0.01, 2.0, DVec3::ZERO);
    assert_relative_eq!(pts[40].y, -0.5, epsilon = 1e-12);
}

#[test]
fn bundle_is_centered() {
    let roots = bundle_roots(3, 0.01, DVec3::new(0.0, 1.0, 0.0));
    assert_eq!(roots.len(), 9);
    let mean = roots.iter().copied().sum::<DVec3>() / 9.0;
    assert!((mean - DVec3::new(0.0, 1.0, 0.0)).length() < 1e-12);
}
