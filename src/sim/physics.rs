//! Per-tick integration of board bodies
//!
//! The tick is the unit of time: velocities are pixels per tick and there is
//! no dt scaling. Friction damps each axis, small components snap to zero, and
//! walls reflect each axis independently.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;

/// Coefficients shared by the integrator and the collision resolver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsParams {
    /// Per-tick velocity multiplier in (0, 1)
    pub friction: f32,
    /// Velocity components below this snap to zero
    pub min_velocity: f32,
    /// Fraction of velocity kept on impact, in (0, 1)
    pub restitution: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            friction: 0.98,
            min_velocity: 0.1,
            restitution: 0.85,
        }
    }
}

/// Axis-aligned playable rectangle (body centres stay `radius` inside it)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square area spanning `min..max` on both axes
    pub fn square(min: f32, max: f32) -> Self {
        Self::new(Vec2::splat(min), Vec2::splat(max))
    }

    /// No walls at all
    pub fn unbounded() -> Self {
        Self::new(Vec2::splat(f32::NEG_INFINITY), Vec2::splat(f32::INFINITY))
    }
}

/// Advance one body by one tick
pub fn integrate_body(body: &mut Body, params: &PhysicsParams, bounds: &Bounds) {
    if body.captured {
        return;
    }

    body.vel *= params.friction;
    if body.vel.x.abs() < params.min_velocity {
        body.vel.x = 0.0;
    }
    if body.vel.y.abs() < params.min_velocity {
        body.vel.y = 0.0;
    }

    body.pos += body.vel;

    let lo = bounds.min + Vec2::splat(body.radius);
    let hi = bounds.max - Vec2::splat(body.radius);
    let e = params.restitution;

    if body.pos.x < lo.x {
        body.pos.x = lo.x;
        body.vel.x *= -e;
    }
    if body.pos.x > hi.x {
        body.pos.x = hi.x;
        body.vel.x *= -e;
    }
    if body.pos.y < lo.y {
        body.pos.y = lo.y;
        body.vel.y *= -e;
    }
    if body.pos.y > hi.y {
        body.pos.y = hi.y;
        body.vel.y *= -e;
    }
}

/// Advance every body on the table by one tick
pub fn integrate(bodies: &mut [Body], params: &PhysicsParams, bounds: &Bounds) {
    for body in bodies.iter_mut() {
        integrate_body(body, params, bounds);
    }
}

/// True once every body still on the table has both velocity components
/// below `min_velocity`
pub fn all_stopped(bodies: &[Body], min_velocity: f32) -> bool {
    bodies
        .iter()
        .filter(|b| b.is_active())
        .all(|b| b.vel.x.abs() < min_velocity && b.vel.y.abs() < min_velocity)
}

/// Total kinetic energy of the bodies on the table
pub fn total_energy(bodies: &[Body]) -> f32 {
    bodies.iter().filter(|b| b.is_active()).map(Body::energy).sum()
}
