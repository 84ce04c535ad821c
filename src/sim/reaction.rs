//! Ant smasher: strike walking actors before they cross the field
//!
//! Actors enter just outside a random edge and walk straight at a point just
//! outside the opposite edge. Some are hazards that cost points when struck.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arcade::{ArcadeRules, ArcadeVerdict, Scoreboard, Spawner, Target, hit_test};
use super::session::Session;
use crate::tuning::ArcadeTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorState {
    Live,
    Struck,
    Escaped,
}

/// A walking target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: u32,
    pub pos: Vec2,
    /// Exit point just outside the far edge
    pub target: Vec2,
    /// Pixels per tick
    pub speed: f32,
    pub radius: f32,
    /// Facing, radians
    pub heading: f32,
    pub hazard: bool,
    pub state: ActorState,
}

impl Target for Actor {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn hit_radius(&self) -> f32 {
        self.radius
    }

    fn is_live(&self) -> bool {
        self.state == ActorState::Live
    }
}

/// What a pointer tap did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeOutcome {
    Missed,
    Hit { points: u32 },
    Hazard { penalty: u32 },
}

/// Reaction round state
#[derive(Debug, Clone)]
pub struct ReactionGame {
    tuning: ArcadeTuning,
    /// Actors to strike to win
    pub goal: u32,
    actor_speed: f32,
    /// Live actors only; struck and escaped ones are dropped each tick
    pub actors: Vec<Actor>,
    pub smashed: u32,
    /// Escapes plus hazard strikes
    pub missed: u32,
    pub board: Scoreboard,
    spawner: Spawner,
    pending_strikes: Vec<Vec2>,
    rng: Pcg32,
    next_id: u32,
}

impl ReactionGame {
    pub fn new(goal: u32, actor_speed: f32, spawn_interval_ms: u32, tuning: ArcadeTuning, seed: u64) -> Self {
        Self {
            tuning,
            goal,
            actor_speed,
            actors: Vec::new(),
            smashed: 0,
            missed: 0,
            board: Scoreboard::default(),
            spawner: Spawner::new(spawn_interval_ms as f64),
            pending_strikes: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.board.score
    }

    pub fn combo(&self) -> u32 {
        self.board.combo
    }

    /// Smashed share of everything resolved, in percent
    pub fn accuracy(&self) -> f64 {
        let total = self.smashed + self.missed;
        if total == 0 {
            0.0
        } else {
            self.smashed as f64 / total as f64 * 100.0
        }
    }

    /// Queue a tap; resolved on the next tick
    pub fn queue_strike(&mut self, point: Vec2) {
        self.pending_strikes.push(point);
    }

    /// Resolve a tap immediately against the first live actor under it
    pub fn strike(&mut self, point: Vec2) -> StrikeOutcome {
        let Some(index) = hit_test(&self.actors, point) else {
            self.board.break_combo();
            return StrikeOutcome::Missed;
        };

        let actor = &mut self.actors[index];
        actor.state = ActorState::Struck;

        if actor.hazard {
            let penalty = self.tuning.hazard_penalty;
            self.board.penalize(penalty);
            self.board.break_combo();
            self.missed += 1;
            log::debug!("Hazard {} struck, -{}", actor.id, penalty);
            StrikeOutcome::Hazard { penalty }
        } else {
            let points = self.board.hit(self.tuning.hit_points, self.tuning.combo_cap);
            self.smashed += 1;
            StrikeOutcome::Hit { points }
        }
    }

    /// Place a new actor on a random edge, heading for the opposite one
    pub fn spawn_actor(&mut self) -> &Actor {
        let (w, h) = (self.tuning.field_width, self.tuning.field_height);
        let off = self.tuning.actor_size;
        let rng = &mut self.rng;

        let (start, target) = match rng.random_range(0..4) {
            0 => (
                Vec2::new(rng.random::<f32>() * w, -off),
                Vec2::new(rng.random::<f32>() * w, h + off),
            ),
            1 => (
                Vec2::new(w + off, rng.random::<f32>() * h),
                Vec2::new(-off, rng.random::<f32>() * h),
            ),
            2 => (
                Vec2::new(rng.random::<f32>() * w, h + off),
                Vec2::new(rng.random::<f32>() * w, -off),
            ),
            _ => (
                Vec2::new(-off, rng.random::<f32>() * h),
                Vec2::new(w + off, rng.random::<f32>() * h),
            ),
        };
        let hazard = rng.random::<f32>() < self.tuning.hazard_chance;
        let d = target - start;

        let actor = Actor {
            id: self.next_id,
            pos: start,
            target,
            speed: self.actor_speed,
            radius: self.tuning.actor_size,
            heading: d.y.atan2(d.x),
            hazard,
            state: ActorState::Live,
        };
        self.next_id += 1;
        self.actors.push(actor);
        &self.actors[self.actors.len() - 1]
    }

    /// Round clock ran out: a loss, no stars
    pub fn expire(&mut self, session: &mut Session) {
        session.finish(false, self.score(), 0);
    }
}

impl ArcadeRules for ReactionGame {
    fn tick_ms(&self) -> f64 {
        self.tuning.reaction_tick_ms
    }

    fn spawner(&mut self) -> &mut Spawner {
        &mut self.spawner
    }

    fn live_count(&self) -> usize {
        self.actors.iter().filter(|a| a.is_live()).count()
    }

    fn population_cap(&self) -> usize {
        self.tuning.population_cap
    }

    fn spawn_goal_met(&self) -> bool {
        self.smashed + self.missed >= self.goal
    }

    fn spawn(&mut self) {
        self.spawn_actor();
    }

    fn advance(&mut self) {
        let escape = self.tuning.escape_distance;
        let mut escaped = 0;

        for actor in self.actors.iter_mut().filter(|a| a.state == ActorState::Live) {
            let d = actor.target - actor.pos;
            let distance = d.length();
            if distance < escape {
                actor.state = ActorState::Escaped;
                escaped += 1;
                continue;
            }
            actor.pos += d / distance * actor.speed.min(distance);
        }

        if escaped > 0 {
            self.missed += escaped;
            self.board.break_combo();
        }
    }

    fn resolve(&mut self) {
        let strikes = std::mem::take(&mut self.pending_strikes);
        for point in strikes {
            self.strike(point);
        }

        self.board
            .decay(self.tuning.reaction_tick_ms, self.tuning.combo_timeout_ms);
        self.actors.retain(|a| a.state == ActorState::Live);
    }

    fn verdict(&self) -> ArcadeVerdict {
        if self.smashed >= self.goal {
            ArcadeVerdict::Won
        } else {
            ArcadeVerdict::Continue
        }
    }

    fn score(&self) -> u32 {
        self.board.score
    }

    fn stars(&self, won: bool) -> u8 {
        if !won {
            return 0;
        }
        let accuracy = self.accuracy();
        if accuracy >= 90.0 {
            3
        } else if accuracy >= 75.0 {
            2
        } else {
            1
        }
    }
}
