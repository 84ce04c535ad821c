//! Scripted board opponent
//!
//! No tactics: pick one of its own discs at random, aim at it from a jittered
//! spot on its baseline with some jitter on the aim point, and fire at a
//! random power.

use glam::Vec2;
use rand::Rng;

use super::body::Body;
use super::turn::Side;
use crate::tuning::BoardTuning;

/// A shot ready to be fired
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Where the striker is placed
    pub origin: Vec2,
    /// Radians, screen coordinates (y down)
    pub angle: f32,
    /// Percent of maximum striker speed
    pub power: f32,
}

impl Shot {
    /// Initial striker velocity for this shot
    pub fn velocity(&self, tuning: &BoardTuning) -> Vec2 {
        let speed = self.power / 100.0 * tuning.max_striker_power;
        crate::direction_from_angle(self.angle) * speed
    }
}

/// Plan the opponent's next shot. `None` once it has no discs left.
pub fn plan_shot<R: Rng>(bodies: &[Body], rng: &mut R, tuning: &BoardTuning) -> Option<Shot> {
    let own = Side::Opponent.own_kind();
    let targets: Vec<&Body> = bodies
        .iter()
        .filter(|b| b.kind == own && b.is_active())
        .collect();
    if targets.is_empty() {
        return None;
    }

    let target = targets[rng.random_range(0..targets.len())];

    let centre_x = tuning.board_size / 2.0;
    let origin = Vec2::new(
        centre_x + (rng.random::<f32>() - 0.5) * tuning.opponent_origin_spread,
        tuning.board_padding + tuning.opponent_origin_inset,
    );

    let jitter = tuning.opponent_aim_jitter;
    let aim = target.pos - origin
        + Vec2::new(
            (rng.random::<f32>() - 0.5) * jitter,
            (rng.random::<f32>() - 0.5) * jitter,
        );

    let power = tuning.opponent_power_min + rng.random::<f32>() * tuning.opponent_power_range;

    log::debug!(
        "Opponent targets disc {} at ({:.0}, {:.0}) with {:.0}% power",
        target.id,
        target.pos.x,
        target.pos.y,
        power
    );

    Some(Shot {
        origin,
        angle: aim.y.atan2(aim.x),
        power,
    })
}
