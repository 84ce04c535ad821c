//! Board entities
//!
//! Every disc on the board, the striker included, is a `Body` stored in one
//! flat arena. Captured bodies stay in the arena for bookkeeping.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::BoardTuning;

/// What a body is, which decides how its capture is scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    /// The player's discs
    White,
    /// The opponent's discs
    Black,
    /// Bonus disc, scores for whoever pockets it
    Queen,
    /// The mover; created per shot, pocketing it is a foul
    Striker,
}

/// A movable circular body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub kind: BodyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    /// Pocketed; excluded from integration and collision
    pub captured: bool,
}

impl Body {
    pub fn new(id: u32, kind: BodyKind, pos: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            radius,
            mass,
            captured: false,
        }
    }

    /// Still on the table
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.captured
    }

    /// Take the body off the table
    pub fn capture(&mut self) {
        self.captured = true;
        self.vel = Vec2::ZERO;
    }

    /// Kinetic energy
    #[inline]
    pub fn energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }
}

/// A capture hole
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pocket {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
}

/// The four corner pockets, on the inner corners of the frame
pub fn corner_pockets(tuning: &BoardTuning) -> [Pocket; 4] {
    let near = tuning.board_padding;
    let far = tuning.board_size - tuning.board_padding;
    let radius = tuning.pocket_radius;
    [
        Pocket { id: 0, pos: Vec2::new(near, near), radius },
        Pocket { id: 1, pos: Vec2::new(far, near), radius },
        Pocket { id: 2, pos: Vec2::new(near, far), radius },
        Pocket { id: 3, pos: Vec2::new(far, far), radius },
    ]
}

/// Offsets of the starting formation in units of the formation spacing
const FORMATION: [(BodyKind, f32, f32); 19] = [
    (BodyKind::Queen, 0.0, 0.0),
    (BodyKind::Black, -1.0, -1.0),
    (BodyKind::Black, 1.0, -1.0),
    (BodyKind::Black, -1.0, 1.0),
    (BodyKind::Black, 1.0, 1.0),
    (BodyKind::Black, 0.0, -1.8),
    (BodyKind::Black, 0.0, 1.8),
    (BodyKind::Black, -1.8, 0.0),
    (BodyKind::Black, 1.8, 0.0),
    (BodyKind::Black, -0.6, 0.0),
    (BodyKind::White, 0.6, 0.0),
    (BodyKind::White, -1.3, -1.3),
    (BodyKind::White, 1.3, -1.3),
    (BodyKind::White, -1.3, 1.3),
    (BodyKind::White, 1.3, 1.3),
    (BodyKind::White, 0.0, -0.6),
    (BodyKind::White, 0.0, 0.6),
    (BodyKind::White, -0.6, -1.3),
    (BodyKind::White, 0.6, 1.3),
];

/// Queen, nine black and nine white discs around the board centre.
///
/// Some neighbours start slightly overlapping; the first collision pass
/// pushes them apart.
pub fn rack(tuning: &BoardTuning) -> Vec<Body> {
    let centre = Vec2::splat(tuning.board_size / 2.0);
    let spacing = tuning.piece_radius * tuning.formation_spacing;

    FORMATION
        .iter()
        .enumerate()
        .map(|(i, &(kind, dx, dy))| {
            Body::new(
                i as u32,
                kind,
                centre + Vec2::new(dx, dy) * spacing,
                tuning.piece_radius,
                tuning.piece_mass,
            )
        })
        .collect()
}

/// Count the discs of a kind still on the table
pub fn remaining(bodies: &[Body], kind: BodyKind) -> usize {
    bodies
        .iter()
        .filter(|b| b.kind == kind && b.is_active())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rack_composition() {
        let bodies = rack(&BoardTuning::default());
        assert_eq!(bodies.len(), 19);
        assert_eq!(remaining(&bodies, BodyKind::White), 9);
        assert_eq!(remaining(&bodies, BodyKind::Black), 9);
        assert_eq!(remaining(&bodies, BodyKind::Queen), 1);
        assert_eq!(bodies[0].pos, Vec2::new(300.0, 300.0));
    }

    #[test]
    fn test_rack_ids_unique() {
        let bodies = rack(&BoardTuning::default());
        for (i, body) in bodies.iter().enumerate() {
            assert_eq!(body.id, i as u32);
        }
    }

    #[test]
    fn test_capture_zeroes_velocity() {
        let mut body = Body::new(0, BodyKind::White, Vec2::ZERO, 15.0, 1.0);
        body.vel = Vec2::new(3.0, -2.0);
        body.capture();
        assert!(!body.is_active());
        assert_eq!(body.vel, Vec2::ZERO);
        assert_eq!(body.energy(), 0.0);
    }

    #[test]
    fn test_corner_pockets() {
        let pockets = corner_pockets(&BoardTuning::default());
        assert_eq!(pockets[0].pos, Vec2::new(80.0, 80.0));
        assert_eq!(pockets[3].pos, Vec2::new(520.0, 520.0));
        assert!(pockets.iter().all(|p| p.radius == 25.0));
    }
}
