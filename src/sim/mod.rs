//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Fixed ticks only (the caller owns the clock)
//! - Seeded RNG only
//! - Stable iteration order (arena index order)
//! - No rendering or platform dependencies

pub mod arcade;
pub mod board;
pub mod body;
pub mod collision;
pub mod memory;
pub mod opponent;
pub mod physics;
pub mod pocket;
pub mod reaction;
pub mod schedule;
pub mod session;
pub mod snake;
pub mod turn;

pub use arcade::{ArcadeRules, ArcadeVerdict, Scoreboard, Spawner, Target, arcade_tick, hit_test};
pub use board::{Aim, BoardGame};
pub use body::{Body, BodyKind, Pocket};
pub use collision::{CollisionResult, circle_collision, resolve_collisions, resolve_pair};
pub use memory::{Card, Flip, MemoryGame};
pub use opponent::{Shot, plan_shot};
pub use physics::{Bounds, PhysicsParams, all_stopped, integrate, integrate_body};
pub use pocket::{CaptureEvent, capture_bodies};
pub use reaction::{Actor, ActorState, ReactionGame, StrikeOutcome};
pub use schedule::{Delay, IntervalTimer};
pub use session::{Completion, RoundPhase, Session};
pub use snake::{Heading, SnakeGame};
pub use turn::{CaptureOutcome, Side, TurnPhase, TurnState};
