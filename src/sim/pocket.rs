//! Pocket capture
//!
//! Runs after integration and collision. A body whose centre falls inside a
//! pocket is taken off the table and reported once; the first matching pocket
//! wins.

use serde::{Deserialize, Serialize};

use super::body::{Body, BodyKind, Pocket};
use super::collision::body_in_pocket;
use super::turn::Side;

/// A body dropped into a pocket this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureEvent {
    pub body_id: u32,
    pub kind: BodyKind,
    pub pocket_id: u32,
    /// Whose shot was in flight
    pub side: Side,
}

/// Capture every body sitting in a pocket, in arena order
pub fn capture_bodies(bodies: &mut [Body], pockets: &[Pocket], side: Side) -> Vec<CaptureEvent> {
    let mut events = Vec::new();

    for body in bodies.iter_mut().filter(|b| b.is_active()) {
        if let Some(pocket) = pockets.iter().find(|p| body_in_pocket(body, p)) {
            body.capture();
            log::debug!(
                "{:?} {} dropped into pocket {} on {:?}'s shot",
                body.kind,
                body.id,
                pocket.id,
                side
            );
            events.push(CaptureEvent {
                body_id: body.id,
                kind: body.kind,
                pocket_id: pocket.id,
                side,
            });
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::corner_pockets;
    use crate::tuning::BoardTuning;
    use glam::Vec2;

    fn bodies() -> Vec<Body> {
        vec![
            Body::new(0, BodyKind::White, Vec2::new(90.0, 90.0), 15.0, 1.0),
            Body::new(1, BodyKind::Black, Vec2::new(300.0, 300.0), 15.0, 1.0),
            Body::new(2, BodyKind::Striker, Vec2::new(510.0, 515.0), 18.0, 1.5),
        ]
    }

    #[test]
    fn test_captures_in_arena_order() {
        let pockets = corner_pockets(&BoardTuning::default());
        let mut bodies = bodies();
        bodies[0].vel = Vec2::new(-1.0, -1.0);

        let events = capture_bodies(&mut bodies, &pockets, Side::Player);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, BodyKind::White);
        assert_eq!(events[0].pocket_id, 0);
        assert_eq!(events[1].kind, BodyKind::Striker);
        assert_eq!(events[1].pocket_id, 3);

        assert!(bodies[0].captured);
        assert_eq!(bodies[0].vel, Vec2::ZERO);
        assert!(!bodies[1].captured);
    }

    #[test]
    fn test_capture_is_idempotent() {
        let pockets = corner_pockets(&BoardTuning::default());
        let mut bodies = bodies();

        let first = capture_bodies(&mut bodies, &pockets, Side::Opponent);
        let after_first = bodies.clone();
        let second = capture_bodies(&mut bodies, &pockets, Side::Opponent);

        assert_eq!(first.len(), 2);
        assert!(second.is_empty());
        assert_eq!(bodies, after_first);
    }

    #[test]
    fn test_first_pocket_wins() {
        // Two overlapping pockets; the earlier one claims the body
        let pockets = [
            Pocket { id: 7, pos: Vec2::new(100.0, 100.0), radius: 25.0 },
            Pocket { id: 8, pos: Vec2::new(110.0, 100.0), radius: 25.0 },
        ];
        let mut bodies = vec![Body::new(0, BodyKind::Queen, Vec2::new(105.0, 100.0), 15.0, 1.0)];
        let events = capture_bodies(&mut bodies, &pockets, Side::Player);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].pocket_id, 7);
    }
}
