//! Carrom board round
//!
//! One writer owns the whole table: `BoardGame::tick` runs, in order, shot
//! charging, the opponent's scheduled shot, integration, collision, pocket
//! capture, and finally settling the turn once everything has stopped.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::body::{Body, BodyKind, Pocket, corner_pockets, rack, remaining};
use super::collision::resolve_collisions;
use super::opponent::{Shot, plan_shot};
use super::physics::{Bounds, PhysicsParams, all_stopped, integrate};
use super::pocket::capture_bodies;
use super::schedule::{Delay, IntervalTimer};
use super::session::Session;
use super::turn::{Side, TurnPhase, TurnState};
use crate::consts::BOARD_TICK_MS;
use crate::tuning::BoardTuning;

/// Highest charge level (percent)
pub const MAX_POWER: f32 = 100.0;

/// Player's striker placement and charge
#[derive(Debug, Clone, PartialEq)]
pub struct Aim {
    pub striker_pos: Vec2,
    /// Radians, screen coordinates (y down)
    pub angle: f32,
    /// Percent, 0..=100
    pub power: f32,
    pub charging: bool,
}

/// A carrom round against the scripted opponent
#[derive(Debug, Clone)]
pub struct BoardGame {
    tuning: BoardTuning,
    physics: PhysicsParams,
    bounds: Bounds,
    pub bodies: Vec<Body>,
    pub pockets: [Pocket; 4],
    pub turn: TurnState,
    pub target_score: u32,
    pub aim: Aim,
    charge_timer: IntervalTimer,
    opponent_delay: Delay,
    pub shots_fired: u32,
    rng: Pcg32,
    next_id: u32,
}

impl BoardGame {
    pub fn new(target_score: u32, tuning: BoardTuning, seed: u64) -> Self {
        let bodies = rack(&tuning);
        let next_id = bodies.len() as u32;
        Self {
            physics: tuning.physics(),
            bounds: tuning.bounds(),
            pockets: corner_pockets(&tuning),
            aim: Self::home_aim(&tuning),
            charge_timer: IntervalTimer::new(tuning.charge_interval_ms),
            bodies,
            turn: TurnState::new(),
            target_score,
            opponent_delay: Delay::Idle,
            shots_fired: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id,
            tuning,
        }
    }

    /// Striker centred on the player's baseline, aiming straight up
    fn home_aim(tuning: &BoardTuning) -> Aim {
        Aim {
            striker_pos: Vec2::new(
                tuning.board_size / 2.0,
                tuning.board_size - tuning.baseline_offset,
            ),
            angle: -FRAC_PI_2,
            power: 0.0,
            charging: false,
        }
    }

    pub fn tuning(&self) -> &BoardTuning {
        &self.tuning
    }

    pub fn player_score(&self) -> u32 {
        self.turn.score(Side::Player)
    }

    pub fn opponent_score(&self) -> u32 {
        self.turn.score(Side::Opponent)
    }

    /// The in-flight striker, if any
    pub fn striker(&self) -> Option<&Body> {
        self.bodies.iter().find(|b| b.kind == BodyKind::Striker)
    }

    pub fn opponent_pending(&self) -> bool {
        self.opponent_delay.is_pending()
    }

    /// Horizontal range the player's striker may occupy
    fn baseline_range(&self) -> (f32, f32) {
        let inset = self.tuning.board_padding + self.tuning.striker_radius + self.tuning.striker_margin;
        (inset, self.tuning.board_size - inset)
    }

    /// Pointer moved. Slides the striker along the baseline (unless charging)
    /// and aims it at the pointer.
    pub fn aim_at(&mut self, pointer: Vec2) {
        if !self.turn.awaiting(Side::Player) {
            return;
        }
        if !self.aim.charging {
            let (min_x, max_x) = self.baseline_range();
            self.aim.striker_pos.x = pointer.x.clamp(min_x, max_x);
        }
        let d = pointer - self.aim.striker_pos;
        self.aim.angle = d.y.atan2(d.x);
    }

    /// Pointer pressed: start charging power
    pub fn begin_charge(&mut self) {
        if !self.turn.awaiting(Side::Player) || self.aim.charging {
            return;
        }
        self.aim.charging = true;
        self.aim.power = 0.0;
        self.charge_timer.reset();
    }

    /// Pointer released. Fires if the charge reached the minimum power.
    pub fn release(&mut self) -> Option<Shot> {
        if !self.aim.charging {
            return None;
        }
        self.aim.charging = false;

        if self.aim.power < self.tuning.min_shot_power {
            log::debug!("Discarding weak shot ({:.0}%)", self.aim.power);
            self.aim.power = 0.0;
            return None;
        }

        let shot = Shot {
            origin: self.aim.striker_pos,
            angle: self.aim.angle,
            power: self.aim.power,
        };
        self.fire(Side::Player, shot).then_some(shot)
    }

    /// Put a striker on the table for `side`. Returns false out of turn.
    pub fn fire(&mut self, side: Side, shot: Shot) -> bool {
        if !self.turn.begin_shot(side) {
            return false;
        }

        let mut striker = Body::new(
            self.next_id,
            BodyKind::Striker,
            shot.origin,
            self.tuning.striker_radius,
            self.tuning.striker_mass,
        );
        striker.vel = shot.velocity(&self.tuning);
        self.next_id += 1;
        self.bodies.push(striker);

        self.shots_fired += 1;
        self.aim.power = 0.0;
        log::debug!(
            "{:?} fires at {:.2} rad, {:.0}% power",
            side,
            shot.angle,
            shot.power
        );
        true
    }

    /// Advance one 60 Hz tick
    pub fn tick(&mut self, session: &mut Session) {
        if !session.is_running() {
            return;
        }

        if self.aim.charging {
            let steps = self.charge_timer.advance(BOARD_TICK_MS);
            self.aim.power = (self.aim.power + steps as f32 * self.tuning.power_step).min(MAX_POWER);
        }

        if self.opponent_delay.advance(BOARD_TICK_MS) {
            match plan_shot(&self.bodies, &mut self.rng, &self.tuning) {
                Some(shot) => {
                    self.fire(Side::Opponent, shot);
                }
                None => log::warn!("Opponent has no discs left to target"),
            }
        }

        integrate(&mut self.bodies, &self.physics, &self.bounds);
        resolve_collisions(&mut self.bodies, self.physics.restitution);

        let events = capture_bodies(&mut self.bodies, &self.pockets, self.turn.current_side);
        for event in &events {
            let outcome = self.turn.record(event, &self.tuning);
            log::info!("{:?} pocketed {:?}: {:?}", event.side, event.kind, outcome);
        }

        if self.turn.phase == TurnPhase::BodiesMoving
            && all_stopped(&self.bodies, self.physics.min_velocity)
        {
            self.settle(session);
        }
    }

    fn settle(&mut self, session: &mut Session) {
        self.bodies.retain(|b| b.kind != BodyKind::Striker);

        let whites = remaining(&self.bodies, BodyKind::White);
        let blacks = remaining(&self.bodies, BodyKind::Black);
        let score = self.player_score();

        if whites == 0 || blacks == 0 || score >= self.target_score {
            self.turn.end_round();
            self.opponent_delay.cancel();
            session.finish(true, score, self.stars());
            return;
        }

        match self.turn.settle() {
            Side::Opponent => self.opponent_delay.schedule(self.tuning.opponent_delay_ms),
            Side::Player => self.aim = Self::home_aim(&self.tuning),
        }
    }

    /// Round clock ran out: a loss, still rated by score
    pub fn expire(&mut self, session: &mut Session) {
        self.turn.end_round();
        self.opponent_delay.cancel();
        self.aim.charging = false;
        session.finish(false, self.player_score(), self.stars());
    }

    pub fn stars(&self) -> u8 {
        stars_for(self.player_score(), self.target_score)
    }
}

/// Star rating of a board score against its target
pub fn stars_for(score: u32, target: u32) -> u8 {
    let score = score as f64;
    let target = target as f64;
    if score >= target * 1.5 {
        3
    } else if score >= target {
        2
    } else if score >= target * 0.5 {
        1
    } else {
        0
    }
}
