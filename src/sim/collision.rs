//! Disc-on-disc collision detection and response
//!
//! Pairs are resolved one after another in ascending index order, so a body
//! touched by two others in the same tick sees the first response before the
//! second. Response is the 1D elastic formula along the contact normal with
//! the tangential components left alone.

use glam::Vec2;

use super::body::{Body, Pocket};

/// Centres closer than this use the fallback normal
const DEGENERATE_DISTANCE: f32 = 1e-6;

/// Contact normal used when two centres coincide
pub const FALLBACK_NORMAL: Vec2 = Vec2::X;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the discs overlap
    pub hit: bool,
    /// Unit normal pointing from the first disc toward the second
    pub normal: Vec2,
    /// Overlap depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check two circles for overlap. Touching circles do not collide.
pub fn circle_collision(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    let delta = b_pos - a_pos;
    let distance = delta.length();
    let min_distance = a_radius + b_radius;

    if distance >= min_distance {
        return CollisionResult::miss();
    }

    let normal = if distance <= DEGENERATE_DISTANCE {
        FALLBACK_NORMAL
    } else {
        delta / distance
    };

    CollisionResult {
        hit: true,
        normal,
        penetration: min_distance - distance,
    }
}

/// Rotate a vector into the frame whose x axis is `normal`
#[inline]
fn to_normal_frame(v: Vec2, normal: Vec2) -> Vec2 {
    Vec2::new(v.x * normal.x + v.y * normal.y, v.y * normal.x - v.x * normal.y)
}

#[inline]
fn from_normal_frame(v: Vec2, normal: Vec2) -> Vec2 {
    Vec2::new(v.x * normal.x - v.y * normal.y, v.y * normal.x + v.x * normal.y)
}

/// Resolve a single pair in place. Returns whether they collided.
pub fn resolve_pair(a: &mut Body, b: &mut Body, restitution: f32) -> bool {
    if a.captured || b.captured {
        return false;
    }

    let contact = circle_collision(a.pos, a.radius, b.pos, b.radius);
    if !contact.hit {
        return false;
    }
    let n = contact.normal;

    let mut v1 = to_normal_frame(a.vel, n);
    let mut v2 = to_normal_frame(b.vel, n);

    let (m1, m2) = (a.mass, b.mass);
    let total = m1 + m2;
    let new_v1 = ((m1 - m2) * v1.x + 2.0 * m2 * v2.x) / total;
    let new_v2 = ((m2 - m1) * v2.x + 2.0 * m1 * v1.x) / total;
    v1.x = new_v1 * restitution;
    v2.x = new_v2 * restitution;

    a.vel = from_normal_frame(v1, n);
    b.vel = from_normal_frame(v2, n);

    let separation = n * (contact.penetration / 2.0);
    a.pos -= separation;
    b.pos += separation;

    true
}

/// Mutable borrows of two distinct arena slots, `i < j`
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert!(i < j);
    let (head, tail) = bodies.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Resolve every overlapping pair, ascending `(i, j)` order.
/// Returns the number of contacts resolved.
pub fn resolve_collisions(bodies: &mut [Body], restitution: f32) -> usize {
    let mut contacts = 0;
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (a, b) = pair_mut(bodies, i, j);
            if resolve_pair(a, b, restitution) {
                contacts += 1;
            }
        }
    }
    contacts
}

/// Whether a body's centre lies inside a pocket
#[inline]
pub fn body_in_pocket(body: &Body, pocket: &Pocket) -> bool {
    body.pos.distance(pocket.pos) < pocket.radius
}
