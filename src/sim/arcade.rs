//! Generic fixed-interval arcade loop
//!
//! Snake and the reaction game share one tick shape:
//!
//! 1. spawn when the spawn timer has elapsed, the live population is under
//!    its cap and the spawn goal isn't met
//! 2. advance every live actor
//! 3. resolve terminations (escapes, crashes, queued pointer hits) and
//!    update score/combo
//! 4. evaluate win/loss and end the round
//!
//! Games implement `ArcadeRules`; `arcade_tick` drives them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::session::Session;

/// Spawn generator: fires when more than `interval_ms` has passed since the
/// last spawn. Starts primed so the first spawn is immediate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    pub interval_ms: f64,
    since_last_ms: f64,
}

impl Spawner {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            since_last_ms: f64::INFINITY,
        }
    }

    pub fn advance(&mut self, elapsed_ms: f64) {
        self.since_last_ms += elapsed_ms;
    }

    pub fn ready(&self) -> bool {
        self.since_last_ms > self.interval_ms
    }

    pub fn reset(&mut self) {
        self.since_last_ms = 0.0;
    }
}

/// Running score with a combo multiplier that decays after a quiet spell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u32,
    pub combo: u32,
    since_hit_ms: f64,
}

impl Scoreboard {
    /// Score a hit worth `base × min(combo + 1, cap)` and extend the combo.
    /// Returns the points awarded.
    pub fn hit(&mut self, base: u32, cap: u32) -> u32 {
        let points = base.saturating_mul(self.combo.saturating_add(1).min(cap));
        self.score = self.score.saturating_add(points);
        self.combo = self.combo.saturating_add(1);
        self.since_hit_ms = 0.0;
        points
    }

    pub fn add(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Deduct a penalty, clamped at zero
    pub fn penalize(&mut self, points: u32) {
        self.score = self.score.saturating_sub(points);
    }

    pub fn break_combo(&mut self) {
        self.combo = 0;
    }

    /// Let time pass; drops the combo after `timeout_ms` without a hit
    pub fn decay(&mut self, elapsed_ms: f64, timeout_ms: f64) {
        if self.combo == 0 {
            return;
        }
        self.since_hit_ms += elapsed_ms;
        if self.since_hit_ms >= timeout_ms {
            self.combo = 0;
        }
    }
}

/// Result of evaluating a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcadeVerdict {
    Continue,
    Won,
    Lost,
}

/// The game-specific parts of the arcade loop
pub trait ArcadeRules {
    /// Milliseconds per tick
    fn tick_ms(&self) -> f64;

    fn spawner(&mut self) -> &mut Spawner;
    fn live_count(&self) -> usize;
    fn population_cap(&self) -> usize;
    /// No more spawns are needed
    fn spawn_goal_met(&self) -> bool;
    fn spawn(&mut self);

    fn advance(&mut self);
    fn resolve(&mut self);
    fn verdict(&self) -> ArcadeVerdict;

    fn score(&self) -> u32;
    fn stars(&self, won: bool) -> u8;
}

/// Run one tick of an arcade game. A no-op once the round is over.
pub fn arcade_tick<G: ArcadeRules>(game: &mut G, session: &mut Session) -> ArcadeVerdict {
    if !session.is_running() {
        return ArcadeVerdict::Continue;
    }

    let dt = game.tick_ms();
    game.spawner().advance(dt);
    if game.spawner().ready()
        && game.live_count() < game.population_cap()
        && !game.spawn_goal_met()
    {
        game.spawn();
        game.spawner().reset();
    }

    game.advance();
    game.resolve();

    let verdict = game.verdict();
    match verdict {
        ArcadeVerdict::Continue => {}
        ArcadeVerdict::Won => {
            session.finish(true, game.score(), game.stars(true));
        }
        ArcadeVerdict::Lost => {
            session.finish(false, game.score(), game.stars(false));
        }
    }
    verdict
}

/// Something a pointer can strike
pub trait Target {
    fn position(&self) -> Vec2;
    fn hit_radius(&self) -> f32;
    fn is_live(&self) -> bool;
}

/// Index of the first live target strictly within its radius of `point`
pub fn hit_test<T: Target>(targets: &[T], point: Vec2) -> Option<usize> {
    targets
        .iter()
        .position(|t| t.is_live() && t.position().distance(point) < t.hit_radius())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dot {
        pos: Vec2,
        live: bool,
    }

    impl Target for Dot {
        fn position(&self) -> Vec2 {
            self.pos
        }
        fn hit_radius(&self) -> f32 {
            10.0
        }
        fn is_live(&self) -> bool {
            self.live
        }
    }

    /// Spawns one counter per tick and wins after `goal` spawns
    struct Counter {
        spawner: Spawner,
        live: usize,
        cap: usize,
        spawned: u32,
        goal: u32,
    }

    impl ArcadeRules for Counter {
        fn tick_ms(&self) -> f64 {
            10.0
        }
        fn spawner(&mut self) -> &mut Spawner {
            &mut self.spawner
        }
        fn live_count(&self) -> usize {
            self.live
        }
        fn population_cap(&self) -> usize {
            self.cap
        }
        fn spawn_goal_met(&self) -> bool {
            self.spawned >= self.goal
        }
        fn spawn(&mut self) {
            self.live += 1;
            self.spawned += 1;
        }
        fn advance(&mut self) {}
        fn resolve(&mut self) {}
        fn verdict(&self) -> ArcadeVerdict {
            if self.spawned >= self.goal {
                ArcadeVerdict::Won
            } else {
                ArcadeVerdict::Continue
            }
        }
        fn score(&self) -> u32 {
            self.spawned
        }
        fn stars(&self, _won: bool) -> u8 {
            1
        }
    }

    #[test]
    fn test_spawner_first_spawn_immediate() {
        let mut spawner = Spawner::new(500.0);
        assert!(spawner.ready());
        spawner.reset();
        spawner.advance(500.0);
        assert!(!spawner.ready(), "needs strictly more than the interval");
        spawner.advance(1.0);
        assert!(spawner.ready());
    }

    #[test]
    fn test_combo_multiplier_caps() {
        let mut board = Scoreboard::default();
        let points: Vec<u32> = (0..12).map(|_| board.hit(10, 10)).collect();
        assert_eq!(points[0], 10);
        assert_eq!(points[1], 20);
        assert_eq!(points[9], 100);
        assert_eq!(points[11], 100);
    }

    #[test]
    fn test_huge_tuning_saturates() {
        let mut board = Scoreboard::default();
        board.hit(u32::MAX, u32::MAX);
        assert_eq!(board.hit(u32::MAX / 2 + 1, u32::MAX), u32::MAX);
        assert_eq!(board.score, u32::MAX);
        assert_eq!(board.combo, 2);
    }

    #[test]
    fn test_penalty_clamps_at_zero() {
        let mut board = Scoreboard::default();
        board.add(30);
        board.penalize(50);
        assert_eq!(board.score, 0);
    }

    #[test]
    fn test_combo_decays() {
        let mut board = Scoreboard::default();
        board.hit(10, 10);
        board.decay(1999.0, 2000.0);
        assert_eq!(board.combo, 1);
        board.decay(1.0, 2000.0);
        assert_eq!(board.combo, 0);
    }

    #[test]
    fn test_hit_test_first_live_wins() {
        let dots = [
            Dot { pos: Vec2::new(0.0, 0.0), live: false },
            Dot { pos: Vec2::new(5.0, 0.0), live: true },
            Dot { pos: Vec2::new(6.0, 0.0), live: true },
        ];
        assert_eq!(hit_test(&dots, Vec2::new(2.0, 0.0)), Some(1));
        assert_eq!(hit_test(&dots, Vec2::new(15.0, 0.0)), Some(2));
        assert_eq!(hit_test(&dots, Vec2::new(100.0, 0.0)), None);
    }

    #[test]
    fn test_population_cap_throttles_spawns() {
        let mut game = Counter {
            spawner: Spawner::new(0.0),
            live: 0,
            cap: 3,
            spawned: 0,
            goal: 100,
        };
        let mut session = Session::new(None, 0.0);
        session.start();
        for _ in 0..10 {
            arcade_tick(&mut game, &mut session);
        }
        assert_eq!(game.live, 3);
    }

    #[test]
    fn test_verdict_finishes_session_once() {
        let mut game = Counter {
            spawner: Spawner::new(0.0),
            live: 0,
            cap: 10,
            spawned: 0,
            goal: 2,
        };
        let mut session = Session::new(None, 0.0);
        session.start();

        assert_eq!(arcade_tick(&mut game, &mut session), ArcadeVerdict::Continue);
        assert_eq!(arcade_tick(&mut game, &mut session), ArcadeVerdict::Won);
        assert!(session.is_over());
        // Stopped: further ticks do nothing
        assert_eq!(arcade_tick(&mut game, &mut session), ArcadeVerdict::Continue);
        assert_eq!(game.spawned, 2);
    }
}
