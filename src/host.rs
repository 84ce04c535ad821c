//! Host contract
//!
//! The platform shell mounts a game with `GameHost::start`, forwards input,
//! calls `frame` once per animation frame and hears about the result exactly
//! once through the completion callback. `back` tears the round down without
//! reporting.

use glam::Vec2;

use crate::consts::{BOARD_TICK_MS, COUNTDOWN_MS, MAX_FRAME_MS};
use crate::error::ConfigResult;
use crate::levels::{GameKind, LevelData, LevelParams};
use crate::sim::{
    ArcadeRules, BoardGame, Completion, Heading, IntervalTimer, MemoryGame, ReactionGame, Session,
    SnakeGame, arcade_tick,
};
use crate::tuning::Tuning;

/// Input events from the shell, already mapped to game coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostInput {
    PointerMove(Vec2),
    PointerDown(Vec2),
    PointerUp,
    Steer(Heading),
    /// Memory card index
    Select(usize),
}

/// The mounted game, chosen by the level payload
#[derive(Debug, Clone)]
pub enum MiniGame {
    Memory(MemoryGame),
    Board(BoardGame),
    Snake(SnakeGame),
    Reaction(ReactionGame),
}

impl MiniGame {
    fn build(params: &LevelParams, tuning: &Tuning, seed: u64) -> Self {
        match params.data {
            LevelData::Memory { pairs } => {
                MiniGame::Memory(MemoryGame::new(pairs, tuning.memory.clone(), seed))
            }
            LevelData::Board { target_score } => {
                MiniGame::Board(BoardGame::new(target_score, tuning.board.clone(), seed))
            }
            LevelData::Snake {
                food_target,
                interval_ms,
            } => MiniGame::Snake(SnakeGame::new(food_target, interval_ms, &tuning.arcade, seed)),
            LevelData::Reaction {
                goal,
                actor_speed,
                spawn_interval_ms,
            } => MiniGame::Reaction(ReactionGame::new(
                goal,
                actor_speed,
                spawn_interval_ms,
                tuning.arcade.clone(),
                seed,
            )),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            MiniGame::Memory(_) => GameKind::Memory,
            MiniGame::Board(_) => GameKind::Board,
            MiniGame::Snake(_) => GameKind::Snake,
            MiniGame::Reaction(_) => GameKind::Reaction,
        }
    }

    fn tick_ms(&self, tuning: &Tuning) -> f64 {
        match self {
            MiniGame::Memory(_) => tuning.memory.tick_ms,
            MiniGame::Board(_) => BOARD_TICK_MS,
            MiniGame::Snake(game) => game.tick_ms(),
            MiniGame::Reaction(game) => game.tick_ms(),
        }
    }

    fn tick(&mut self, session: &mut Session) {
        match self {
            MiniGame::Memory(game) => game.tick(session),
            MiniGame::Board(game) => game.tick(session),
            MiniGame::Snake(game) => {
                arcade_tick(game, session);
            }
            MiniGame::Reaction(game) => {
                arcade_tick(game, session);
            }
        }
    }

    /// Round clock ran out
    fn expire(&mut self, session: &mut Session) {
        match self {
            MiniGame::Memory(game) => game.expire(session),
            MiniGame::Board(game) => game.expire(session),
            // Snake rounds are untimed; a clock can't run out
            MiniGame::Snake(_) => {}
            MiniGame::Reaction(game) => game.expire(session),
        }
    }

    fn input(&mut self, input: HostInput) {
        match (self, input) {
            (MiniGame::Board(game), HostInput::PointerMove(p)) => game.aim_at(p),
            (MiniGame::Board(game), HostInput::PointerDown(p)) => {
                game.aim_at(p);
                game.begin_charge();
            }
            (MiniGame::Board(game), HostInput::PointerUp) => {
                game.release();
            }
            (MiniGame::Reaction(game), HostInput::PointerDown(p)) => game.queue_strike(p),
            (MiniGame::Snake(game), HostInput::Steer(heading)) => {
                game.steer(heading);
            }
            (MiniGame::Memory(game), HostInput::Select(index)) => {
                game.select(index);
            }
            _ => {}
        }
    }

    /// Score shown in the HUD
    pub fn score(&self) -> u32 {
        match self {
            MiniGame::Memory(game) => game.matches,
            MiniGame::Board(game) => game.player_score(),
            MiniGame::Snake(game) => game.score(),
            MiniGame::Reaction(game) => game.score(),
        }
    }
}

/// Called once per round with the final result
pub type CompletionCallback = Box<dyn FnMut(Completion)>;

/// One mounted round and its timers
pub struct GameHost {
    params: LevelParams,
    tuning: Tuning,
    seed: u64,
    game: MiniGame,
    session: Session,
    loop_timer: IntervalTimer,
    countdown: IntervalTimer,
    on_complete: Option<CompletionCallback>,
}

impl GameHost {
    /// Validate everything, mount the game and start its clock
    pub fn start(params: LevelParams, tuning: Tuning, seed: u64) -> ConfigResult<Self> {
        tuning.validate()?;
        params.validate()?;

        let game = MiniGame::build(&params, &tuning, seed);
        let mut session = Session::new(params.time_limit(), tuning.result_display_ms);
        session.start();
        let loop_timer = IntervalTimer::new(game.tick_ms(&tuning));

        log::info!(
            "Starting {} ({}, seed {})",
            params.level_id,
            params.difficulty.as_str(),
            seed
        );

        Ok(Self {
            params,
            tuning,
            seed,
            game,
            session,
            loop_timer,
            countdown: IntervalTimer::new(COUNTDOWN_MS),
            on_complete: None,
        })
    }

    pub fn set_on_complete(&mut self, callback: CompletionCallback) {
        self.on_complete = Some(callback);
    }

    pub fn params(&self) -> &LevelParams {
        &self.params
    }

    pub fn game(&self) -> &MiniGame {
        &self.game
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn input(&mut self, input: HostInput) {
        if self.session.is_running() {
            self.game.input(input);
        }
    }

    /// Advance all timers by one animation frame. Returns the completion on
    /// the frame it is reported (and invokes the callback then).
    pub fn frame(&mut self, elapsed_ms: f64) -> Option<Completion> {
        let elapsed_ms = elapsed_ms.clamp(0.0, MAX_FRAME_MS);
        let displaying = self.session.is_over();

        if self.session.is_running() {
            for _ in 0..self.loop_timer.advance(elapsed_ms) {
                self.game.tick(&mut self.session);
                if !self.session.is_running() {
                    break;
                }
            }
        }

        if self.session.is_running() {
            for _ in 0..self.countdown.advance(elapsed_ms) {
                if self.session.countdown_tick() {
                    log::info!("{} ran out of time", self.params.level_id);
                    self.game.expire(&mut self.session);
                    break;
                }
            }
        }

        if !displaying {
            return None;
        }
        let completion = self.session.advance_display(elapsed_ms)?;
        if let Some(callback) = self.on_complete.as_mut() {
            callback(completion);
        }
        Some(completion)
    }

    /// Leave the round; the completion callback will not fire
    pub fn back(&mut self) {
        log::info!("Leaving {}", self.params.level_id);
        self.session.cancel();
    }

    /// Cancel the current round and start over with a new seed
    pub fn restart(&mut self, seed: u64) {
        self.session.cancel();
        self.seed = seed;
        self.game = MiniGame::build(&self.params, &self.tuning, seed);
        self.session = Session::new(self.params.time_limit(), self.tuning.result_display_ms);
        self.session.start();
        self.loop_timer.reset();
        self.countdown.reset();
        log::info!("Restarted {} (seed {})", self.params.level_id, seed);
    }
}
