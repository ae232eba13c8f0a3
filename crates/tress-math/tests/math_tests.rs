//! Integration tests for tress-math.

use std::f64::consts::{FRAC_PI_2, PI};

use approx::assert_relative_eq;
use tress_math::transport::antiparallel_axis;
use tress_math::{minimal_rotation, parallel_transport, signed_angle, DQuat, DVec3, Frame};

fn assert_vec_eq(a: DVec3, b: DVec3, eps: f64) {
    assert!((a - b).length() < eps, "{a:?} != {b:?}");
}

// ─── Minimal Rotation Tests ───────────────────────────────────

#[test]
fn rotation_maps_from_onto_to() {
    let from = DVec3::new(1.0, 2.0, 3.0).normalize();
    let to = DVec3::new(-2.0, 0.5, 1.0).normalize();
    let q = minimal_rotation(from, to);
    assert_vec_eq(q * from, to, 1e-12);
}

#[test]
fn rotation_fixes_the_axis() {
    let from = DVec3::X;
    let to = DVec3::Y;
    let q = minimal_rotation(from, to);
    // Binormal of the turn is untouched.
    assert_vec_eq(q * DVec3::Z, DVec3::Z, 1e-12);
}

#[test]
fn parallel_tangents_give_identity() {
    let t = DVec3::new(0.3, -0.4, 0.5).normalize();
    let q = minimal_rotation(t, t);
    assert_eq!(q, DQuat::IDENTITY);
}

#[test]
fn antiparallel_is_half_turn() {
    let from = DVec3::Z;
    let q = minimal_rotation(from, -from);
    assert_vec_eq(q * from, -from, 1e-12);
    let axis = antiparallel_axis(from);
    // The rotation axis is fixed, everything orthogonal to it flips.
    assert_vec_eq(q * axis, axis, 1e-12);
}

#[test]
fn antiparallel_is_deterministic() {
    let from = DVec3::new(0.2, 0.9, -0.1).normalize();
    let a = minimal_rotation(from, -from);
    let b = minimal_rotation(from, -from);
    assert_eq!(a, b);
}

#[test]
fn antiparallel_axis_is_perpendicular() {
    for from in [DVec3::X, DVec3::Y, DVec3::Z, DVec3::new(1.0, 1.0, 1.0).normalize()] {
        let axis = antiparallel_axis(from);
        assert_relative_eq!(axis.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(axis.dot(from), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn antiparallel_axis_prefers_x() {
    // Z is equally far from X and Y; X wins the tie.
    let axis = antiparallel_axis(DVec3::Z);
    assert_relative_eq!(axis.dot(DVec3::Y).abs(), 1.0, epsilon = 1e-12);
}

// ─── Frame Tests ──────────────────────────────────────────────

#[test]
fn default_frame_is_right_handed() {
    assert!(Frame::default().orthonormality_error() < 1e-15);
}

#[test]
fn frame_seed_falls_back_to_y() {
    let f = Frame::from_tangent(DVec3::X);
    assert!(f.orthonormality_error() < 1e-12);
    assert_relative_eq!(f.d1.dot(DVec3::Y).abs(), 1.0, epsilon = 1e-12);
}

#[test]
fn frame_rotated_quarter_turn() {
    let (m1, m2) = Frame::default().rotated(FRAC_PI_2);
    assert_relative_eq!(m1.y, 1.0, epsilon = 1e-12);
    assert_relative_eq!(m2.x, -1.0, epsilon = 1e-12);
}

// ─── Parallel Transport Tests ─────────────────────────────────

#[test]
fn transport_round_trip_restores_vector() {
    let t0 = DVec3::Z;
    let t1 = DVec3::X; // rotate 90°
    let v = DVec3::new(0.0, 1.0, 0.0);
    let there = parallel_transport(v, t0, t1);
    let back = parallel_transport(there, t1, t0);
    assert_vec_eq(back, v, 1e-12);
}

#[test]
fn frame_round_trip_through_closed_loop() {
    let frame = Frame::from_tangent(DVec3::new(0.0, 0.0, 1.0));
    let turned = DVec3::new(1.0, 0.0, 0.0);
    let restored = frame.transported(turned).transported(frame.tangent);
    assert_vec_eq(restored.d1, frame.d1, 1e-12);
    assert_vec_eq(restored.d2, frame.d2, 1e-12);
    assert_vec_eq(restored.tangent, frame.tangent, 1e-12);
}

#[test]
fn transported_frame_stays_orthonormal() {
    let mut frame = Frame::from_tangent(DVec3::new(0.1, 0.2, 0.97).normalize());
    for k in 0..200 {
        let s = k as f64 * 0.07;
        let t = DVec3::new(s.cos(), s.sin(), 0.3 * (2.0 * s).sin()).normalize();
        frame = frame.transported(t);
        assert!(frame.orthonormality_error() < 1e-9);
    }
}

#[test]
fn antiparallel_transport_keeps_right_handedness() {
    let frame = Frame::from_tangent(DVec3::Y);
    let flipped = frame.transported(-DVec3::Y);
    assert!(flipped.orthonormality_error() < 1e-12);
    assert_vec_eq(flipped.tangent, -DVec3::Y, 1e-15);
}

// ─── Signed Angle Tests ───────────────────────────────────────

#[test]
fn signed_angle_follows_right_hand_rule() {
    assert_relative_eq!(signed_angle(DVec3::X, DVec3::Y, DVec3::Z), FRAC_PI_2, epsilon = 1e-12);
    assert_relative_eq!(signed_angle(DVec3::Y, DVec3::X, DVec3::Z), -FRAC_PI_2, epsilon = 1e-12);
    assert_relative_eq!(signed_angle(DVec3::X, -DVec3::X, DVec3::Z), PI, epsilon = 1e-12);
}

#[test]
fn material_rotation_matches_signed_angle() {
    let frame = Frame::from_tangent(DVec3::new(1.0, -1.0, 0.5).normalize());
    let theta = 0.73;
    let (m1, _m2) = frame.rotated(theta);
    assert_relative_eq!(signed_angle(frame.d1, m1, frame.tangent), theta, epsilon = 1e-12);
}
