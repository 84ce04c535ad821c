//! Grid snake on the arcade loop
//!
//! The snake steps one cell per tick. Food is the only spawned entity: one
//! piece at a time, on a random free cell.

use std::collections::VecDeque;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arcade::{ArcadeRules, ArcadeVerdict, Scoreboard, Spawner};
use crate::tuning::ArcadeTuning;

/// Movement direction (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub fn delta(self) -> IVec2 {
        match self {
            Heading::Up => IVec2::new(0, -1),
            Heading::Down => IVec2::new(0, 1),
            Heading::Left => IVec2::new(-1, 0),
            Heading::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Heading {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }
}

/// Snake round state
#[derive(Debug, Clone)]
pub struct SnakeGame {
    grid: IVec2,
    food_points: u32,
    interval_ms: f64,
    pub food_target: u32,
    /// Head first
    pub body: VecDeque<IVec2>,
    pub heading: Heading,
    /// Applied on the next step
    pub pending: Heading,
    pub food: Option<IVec2>,
    pub eaten: u32,
    pub crashed: bool,
    ate_this_tick: bool,
    board: Scoreboard,
    food_spawner: Spawner,
    rng: Pcg32,
}

impl SnakeGame {
    pub fn new(food_target: u32, interval_ms: u32, tuning: &ArcadeTuning, seed: u64) -> Self {
        let grid = IVec2::new(tuning.grid_width, tuning.grid_height);
        let head = grid / 2;
        let body = (0..3).map(|i| head - IVec2::new(i, 0)).collect();

        Self {
            grid,
            food_points: tuning.food_points,
            interval_ms: interval_ms as f64,
            food_target,
            body,
            heading: Heading::Right,
            pending: Heading::Right,
            food: None,
            eaten: 0,
            crashed: false,
            ate_this_tick: false,
            board: Scoreboard::default(),
            food_spawner: Spawner::new(0.0),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn head(&self) -> IVec2 {
        self.body[0]
    }

    pub fn score(&self) -> u32 {
        self.board.score
    }

    /// Change direction. Reversing either the pending direction or the one
    /// last moved in is ignored, so two quick turns can't fold onto the neck.
    pub fn steer(&mut self, heading: Heading) -> bool {
        if heading == self.pending.opposite() || heading == self.heading.opposite() {
            return false;
        }
        self.pending = heading;
        true
    }

    fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.grid.x && cell.y < self.grid.y
    }

    /// Put food on a random free cell; `None` when the snake fills the grid
    pub fn place_food(&mut self) -> Option<IVec2> {
        let free: Vec<IVec2> = (0..self.grid.y)
            .flat_map(|y| (0..self.grid.x).map(move |x| IVec2::new(x, y)))
            .filter(|cell| !self.body.contains(cell))
            .collect();
        if free.is_empty() {
            self.food = None;
        } else {
            self.food = Some(free[self.rng.random_range(0..free.len())]);
        }
        self.food
    }
}

impl ArcadeRules for SnakeGame {
    fn tick_ms(&self) -> f64 {
        self.interval_ms
    }

    fn spawner(&mut self) -> &mut Spawner {
        &mut self.food_spawner
    }

    fn live_count(&self) -> usize {
        usize::from(self.food.is_some())
    }

    fn population_cap(&self) -> usize {
        1
    }

    fn spawn_goal_met(&self) -> bool {
        self.eaten >= self.food_target
    }

    fn spawn(&mut self) {
        self.place_food();
    }

    fn advance(&mut self) {
        self.ate_this_tick = false;
        self.heading = self.pending;
        let next = self.head() + self.heading.delta();

        // The whole current body counts, tail included
        if !self.in_bounds(next) || self.body.contains(&next) {
            log::debug!("Snake crashed at ({}, {})", next.x, next.y);
            self.crashed = true;
            return;
        }

        self.body.push_front(next);
        if self.food == Some(next) {
            self.food = None;
            self.ate_this_tick = true;
        } else {
            self.body.pop_back();
        }
    }

    fn resolve(&mut self) {
        if self.ate_this_tick {
            self.eaten += 1;
            self.board.add(self.food_points);
        }
    }

    fn verdict(&self) -> ArcadeVerdict {
        if self.crashed {
            ArcadeVerdict::Lost
        } else if self.eaten >= self.food_target {
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
        let eaten = self.eaten as f64;
        let target = self.food_target as f64;
        if eaten >= target * 1.5 {
            3
        } else if eaten >= target {
            2
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::arcade::arcade_tick;
    use crate::sim::session::Session;

    fn snake(target: u32) -> SnakeGame {
        SnakeGame::new(target, 150, &ArcadeTuning::default(), 4)
    }

    fn running() -> Session {
        let mut session = Session::new(None, 2000.0);
        session.start();
        session
    }

    #[test]
    fn test_initial_body() {
        let game = snake(5);
        let body: Vec<IVec2> = game.body.iter().copied().collect();
        assert_eq!(body, vec![IVec2::new(10, 10), IVec2::new(9, 10), IVec2::new(8, 10)]);
        assert_eq!(game.heading, Heading::Right);
    }

    #[test]
    fn test_reversal_ignored() {
        let mut game = snake(5);
        assert!(!game.steer(Heading::Left));
        assert!(game.steer(Heading::Up));
        // Now down would reverse the pending direction
        assert!(!game.steer(Heading::Down));
        // Still moving right: left would turn back onto the neck
        assert!(!game.steer(Heading::Left));
        assert_eq!(game.pending, Heading::Up);
    }

    #[test]
    fn test_quick_double_turn_cannot_hit_neck() {
        let mut game = snake(5);
        game.food = Some(IVec2::new(0, 0));
        assert!(game.steer(Heading::Up));
        assert!(!game.steer(Heading::Left));

        game.advance();
        assert!(!game.crashed);
        assert_eq!(game.head(), IVec2::new(10, 9));

        // Once the turn has happened, left is a legal move
        assert!(game.steer(Heading::Left));
        game.advance();
        assert!(!game.crashed);
        assert_eq!(game.head(), IVec2::new(9, 9));
    }

    #[test]
    fn test_food_never_on_body() {
        let mut game = snake(5);
        for _ in 0..200 {
            let food = game.place_food().unwrap();
            assert!(!game.body.contains(&food));
        }
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut game = snake(5);
        let mut session = running();
        game.food = Some(IVec2::new(11, 10));

        arcade_tick(&mut game, &mut session);
        assert_eq!(game.eaten, 1);
        assert_eq!(game.score(), 10);
        assert_eq!(game.body.len(), 4);
        assert_eq!(game.head(), IVec2::new(11, 10));

        // Food respawns on the next tick (and may be eaten straight away)
        assert!(game.food.is_none());
        arcade_tick(&mut game, &mut session);
        assert!(game.food.is_some() || game.eaten == 2);
    }

    #[test]
    fn test_wall_crash_loses() {
        let mut game = snake(5);
        let mut session = running();
        let mut ticks = 0;
        while session.is_running() {
            // Keep food out of the way
            game.food = Some(IVec2::new(0, 0));
            arcade_tick(&mut game, &mut session);
            ticks += 1;
            assert!(ticks < 50);
        }
        assert!(game.crashed);
        assert_eq!(game.head(), IVec2::new(19, 10));
        let outcome = session.outcome().unwrap();
        assert!(!outcome.won);
        assert_eq!(outcome.stars, 0);
    }

    #[test]
    fn test_self_crash_counts_tail() {
        let mut game = snake(50);
        game.body = [
            IVec2::new(5, 5),
            IVec2::new(6, 5),
            IVec2::new(6, 6),
            IVec2::new(5, 6),
        ]
        .into_iter()
        .collect();
        game.heading = Heading::Down;
        game.pending = Heading::Down;
        game.food = Some(IVec2::new(0, 0));

        game.advance();
        assert!(game.crashed);
        assert_eq!(game.verdict(), ArcadeVerdict::Lost);
    }

    #[test]
    fn test_reaching_target_wins_with_two_stars() {
        let mut game = snake(1);
        let mut session = running();
        game.food = Some(IVec2::new(11, 10));
        assert_eq!(arcade_tick(&mut game, &mut session), ArcadeVerdict::Won);
        let outcome = session.outcome().unwrap();
        assert!(outcome.won);
        assert_eq!(outcome.score, 10);
        assert_eq!(outcome.stars, 2);
    }
}
