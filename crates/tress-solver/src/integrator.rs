//! Integrator trait: the velocity/position update rule.
//!
//! An integrator advances one degree of freedom given its acceleration.
//! The rod calls it once per free vertex (and once per free edge angle in
//! dynamic twist mode) every substep:
//!
//! ```text
//! a = F / m + g
//! integrator.advance(&mut x, &mut v, a, h);
//! ```

use tress_math::DVec3;

/// Per-substep update of a position/velocity pair.
pub trait Integrator: Send + Sync {
    /// Advances a vertex position and velocity by `h` under acceleration `a`.
    fn advance(&self, position: &mut DVec3, velocity: &mut DVec3, acceleration: DVec3, h: f64);

    /// Advances a twist angle and its rate by `h` under angular acceleration `alpha`.
    fn advance_angle(&self, theta: &mut f64, rate: &mut f64, alpha: f64, h: f64);

    /// Returns the integrator's name.
    fn name(&self) -> &str;
}

/// Semi-implicit (symplectic) Euler: `v += h·a; x += h·v`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymplecticEuler;

impl Integrator for SymplecticEuler {
    #[inline]
    fn advance(&self, position: &mut DVec3, velocity: &mut DVec3, acceleration: DVec3, h: f64) {
        *velocity += acceleration * h;
        *position += *velocity * h;
    }

    #[inline]
    fn advance_angle(&self, theta: &mut f64, rate: &mut f64, alpha: f64, h: f64) {
        *rate += alpha * h;
        *theta += *rate * h;
    }

    fn name(&self) -> &str {
        "symplectic_euler"
    }
}

/// Forward (explicit) Euler: `x += h·v; v += h·a`.
///
/// Gains energy on oscillatory systems; useful as a baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitEuler;

impl Integrator for ExplicitEuler {
    #[inline]
    fn advance(&self, position: &mut DVec3, velocity: &mut DVec3, acceleration: DVec3, h: f64) {
        *position += *velocity * h;
        *velocity += acceleration * h;
    }

    #[inline]
    fn advance_angle(&self, theta: &mut f64, rate: &mut f64, alpha: f64, h: f64) {
        *theta += *rate * h;
        *rate += alpha * h;
    }

    fn name(&self) -> &str {
        "explicit_euler"
    }
}
