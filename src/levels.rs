//! Level parameters
//!
//! Each mini-game ships 100 levels in four difficulty tiers. The per-game
//! payload is a tagged union so a board level can never be handed snake
//! parameters.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, ensure_positive};

/// Levels per game
pub const LEVELS_PER_GAME: u32 = 100;

/// Memory pairs are drawn from a 50-card catalogue
pub const MAX_MEMORY_PAIRS: u32 = 25;

/// Difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

/// The playable mini-games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Memory,
    Board,
    Snake,
    Reaction,
}

impl GameKind {
    pub const ALL: [GameKind; 4] = [
        GameKind::Memory,
        GameKind::Board,
        GameKind::Snake,
        GameKind::Reaction,
    ];

    /// Library id used by the platform shell
    pub fn id(&self) -> &'static str {
        match self {
            GameKind::Memory => "memory_master",
            GameKind::Board => "carrom_master",
            GameKind::Snake => "snake_master",
            GameKind::Reaction => "ant_smasher",
        }
    }

    pub fn from_id(id: &str) -> ConfigResult<Self> {
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.id() == id)
            .ok_or_else(|| ConfigError::UnknownGame(id.to_string()))
    }

    fn level_prefix(&self) -> &'static str {
        match self {
            GameKind::Memory => "memory_level",
            GameKind::Board => "carrom_level",
            GameKind::Snake => "snake_level",
            GameKind::Reaction => "ant_level",
        }
    }
}

/// Game-specific level payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum LevelData {
    Memory {
        pairs: u32,
    },
    Board {
        target_score: u32,
    },
    Snake {
        food_target: u32,
        /// Milliseconds per snake step
        interval_ms: u32,
    },
    Reaction {
        /// Actors to strike to win
        goal: u32,
        /// Pixels per tick
        actor_speed: f32,
        spawn_interval_ms: u32,
    },
}

impl LevelData {
    pub fn kind(&self) -> GameKind {
        match self {
            LevelData::Memory { .. } => GameKind::Memory,
            LevelData::Board { .. } => GameKind::Board,
            LevelData::Snake { .. } => GameKind::Snake,
            LevelData::Reaction { .. } => GameKind::Reaction,
        }
    }

    /// Target score or goal count
    pub fn target(&self) -> u32 {
        match *self {
            LevelData::Memory { pairs } => pairs,
            LevelData::Board { target_score } => target_score,
            LevelData::Snake { food_target, .. } => food_target,
            LevelData::Reaction { goal, .. } => goal,
        }
    }
}

/// Everything the host needs to start a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    pub level_id: String,
    pub number: u32,
    pub difficulty: Difficulty,
    /// Round time limit; 0 means untimed (snake only)
    pub time_limit_secs: u32,
    pub data: LevelData,
}

impl LevelParams {
    pub fn kind(&self) -> GameKind {
        self.data.kind()
    }

    /// Timed games need a time limit; untimed snake rounds use 0
    pub fn time_limit(&self) -> Option<u32> {
        (self.time_limit_secs > 0).then_some(self.time_limit_secs)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let params: LevelParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let game = self.kind().id();
        if self.kind() != GameKind::Snake && self.time_limit_secs == 0 {
            return Err(ConfigError::MissingTimeLimit { game });
        }
        ensure_positive("target", self.data.target() as f64)?;

        match self.data {
            LevelData::Memory { pairs } => {
                if pairs > MAX_MEMORY_PAIRS {
                    return Err(ConfigError::OutOfRange {
                        name: "pairs",
                        value: pairs as f64,
                        range: "[1, 25]",
                    });
                }
            }
            LevelData::Board { .. } => {}
            LevelData::Snake { interval_ms, .. } => {
                ensure_positive("interval_ms", interval_ms as f64)?;
            }
            LevelData::Reaction {
                actor_speed,
                spawn_interval_ms,
                ..
            } => {
                ensure_positive("actor_speed", actor_speed as f64)?;
                ensure_positive("spawn_interval_ms", spawn_interval_ms as f64)?;
            }
        }
        Ok(())
    }
}

/// `edges` holds the last level number of the easy, medium and hard tiers
fn tier(number: u32, edges: [u32; 3]) -> (Difficulty, &'static str) {
    if number <= edges[0] {
        (Difficulty::Easy, "Beginner")
    } else if number <= edges[1] {
        (Difficulty::Medium, "Intermediate")
    } else if number <= edges[2] {
        (Difficulty::Hard, "Advanced")
    } else {
        (Difficulty::Expert, "Master")
    }
}

/// Look up a level (1-based)
pub fn level(kind: GameKind, number: u32) -> ConfigResult<LevelParams> {
    if number == 0 || number > LEVELS_PER_GAME {
        return Err(ConfigError::UnknownLevel {
            game: kind.id(),
            number,
        });
    }
    let i = number;

    let (difficulty, time_limit_secs, data) = match kind {
        GameKind::Memory => {
            let (difficulty, _) = tier(i, [10, 30, 60]);
            let (pairs, time) = match difficulty {
                Difficulty::Easy => (6 + (i - 1) / 5, 60 + (i - 1) * 5),
                Difficulty::Medium => (8 + (i - 11) / 5, 90 + (i - 11) * 3),
                Difficulty::Hard => (12 + (i - 31) / 5, 120 + (i - 31) * 2),
                Difficulty::Expert => (18 + (i - 61) / 6, 180 + (i - 61) * 2),
            };
            let pairs = pairs.min(MAX_MEMORY_PAIRS);
            (difficulty, time, LevelData::Memory { pairs })
        }
        GameKind::Board => {
            let (difficulty, _) = tier(i, [15, 40, 70]);
            let (target_score, time) = match difficulty {
                Difficulty::Easy => (30 + (i - 1) * 5, 300),
                Difficulty::Medium => (105 + (i - 16) * 8, 360),
                Difficulty::Hard => (305 + (i - 41) * 12, 420),
                Difficulty::Expert => (665 + (i - 71) * 15, 480),
            };
            (difficulty, time, LevelData::Board { target_score })
        }
        GameKind::Snake => {
            let (difficulty, _) = tier(i, [15, 40, 70]);
            let (food_target, interval_ms) = match difficulty {
                Difficulty::Easy => (5 + i, 150 - (i - 1) * 3),
                Difficulty::Medium => (20 + (i - 15), 105 - (i - 16) * 6 / 5),
                Difficulty::Hard => (45 + (i - 40), 75 - (i - 41) * 4 / 5),
                Difficulty::Expert => (75 + (i - 70) * 2, 50u32.saturating_sub(i - 71).max(30)),
            };
            (
                difficulty,
                0,
                LevelData::Snake {
                    food_target,
                    interval_ms,
                },
            )
        }
        GameKind::Reaction => {
            let (difficulty, _) = tier(i, [15, 40, 70]);
            let (goal, time, actor_speed, spawn_interval_ms) = match difficulty {
                Difficulty::Easy => (
                    10 + (i - 1) * 2,
                    60,
                    1.0 + (i - 1) as f32 * 0.08,
                    2000 - (i - 1) * 80,
                ),
                Difficulty::Medium => (
                    38 + (i - 16) * 2,
                    55 - (i - 16) / 5,
                    1.8 + (i - 16) as f32 * 0.06,
                    850 - (i - 16) * 15,
                ),
                Difficulty::Hard => (
                    88 + (i - 41) * 2,
                    50 - (i - 41) / 6,
                    3.3 + (i - 41) as f32 * 0.05,
                    450 - (i - 41) * 8,
                ),
                Difficulty::Expert => (
                    148 + (i - 71) * 3,
                    45 - (i - 71) / 10,
                    4.8 + (i - 71) as f32 * 0.07,
                    200u32.saturating_sub((i - 71) * 3).max(100),
                ),
            };
            (
                difficulty,
                time,
                LevelData::Reaction {
                    goal,
                    actor_speed,
                    spawn_interval_ms,
                },
            )
        }
    };

    Ok(LevelParams {
        level_id: format!("{}_{}", kind.level_prefix(), i),
        number: i,
        difficulty,
        time_limit_secs,
        data,
    })
}

/// Human-readable level title, e.g. "Advanced 45"
pub fn level_title(kind: GameKind, number: u32) -> String {
    let edges = match kind {
        GameKind::Memory => [10, 30, 60],
        _ => [15, 40, 70],
    };
    let (_, title) = tier(number, edges);
    format!("{} {}", title, number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_level_validates() {
        for kind in GameKind::ALL {
            for n in 1..=LEVELS_PER_GAME {
                let params = level(kind, n).unwrap();
                assert!(params.validate().is_ok(), "{} level {}", kind.id(), n);
            }
        }
    }

    #[test]
    fn test_board_tiers() {
        let first = level(GameKind::Board, 1).unwrap();
        assert_eq!(first.data, LevelData::Board { target_score: 30 });
        assert_eq!(first.time_limit_secs, 300);
        assert_eq!(first.level_id, "carrom_level_1");

        let last = level(GameKind::Board, 100).unwrap();
        assert_eq!(last.difficulty, Difficulty::Expert);
        assert_eq!(last.data, LevelData::Board { target_score: 665 + 29 * 15 });
    }

    #[test]
    fn test_snake_interval_floor() {
        let params = level(GameKind::Snake, 100).unwrap();
        match params.data {
            LevelData::Snake { interval_ms, food_target } => {
                assert_eq!(interval_ms, 30);
                assert_eq!(food_target, 135);
            }
            other => panic!("unexpected payload {:?}", other),
        }
        assert_eq!(params.time_limit(), None);
    }

    #[test]
    fn test_memory_pairs_capped() {
        let params = level(GameKind::Memory, 100).unwrap();
        assert_eq!(params.data, LevelData::Memory { pairs: 24 });
        assert_eq!(params.time_limit_secs, 180 + 39 * 2);
    }

    #[test]
    fn test_reaction_spawn_floor() {
        let params = level(GameKind::Reaction, 100).unwrap();
        match params.data {
            LevelData::Reaction {
                spawn_interval_ms,
                goal,
                ..
            } => {
                assert_eq!(spawn_interval_ms, 113);
                assert_eq!(goal, 148 + 29 * 3);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_unknown_level() {
        assert!(matches!(
            level(GameKind::Snake, 0),
            Err(ConfigError::UnknownLevel { number: 0, .. })
        ));
        assert!(level(GameKind::Snake, 101).is_err());
    }

    #[test]
    fn test_timed_game_without_limit_rejected() {
        let mut params = level(GameKind::Reaction, 3).unwrap();
        params.time_limit_secs = 0;
        assert_eq!(
            params.validate(),
            Err(ConfigError::MissingTimeLimit {
                game: "ant_smasher"
            })
        );
    }

    #[test]
    fn test_json_tagged_payload() {
        let json = r#"{
            "level_id": "carrom_level_7",
            "number": 7,
            "difficulty": "easy",
            "time_limit_secs": 300,
            "data": { "game": "board", "target_score": 60 }
        }"#;
        let params = LevelParams::from_json(json).unwrap();
        assert_eq!(params.kind(), GameKind::Board);
        assert_eq!(params.data.target(), 60);
    }

    #[test]
    fn test_game_ids_round_trip() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_id(kind.id()).unwrap(), kind);
        }
        assert!(GameKind::from_id("heart_puzzle").is_err());
    }

    #[test]
    fn test_level_title() {
        assert_eq!(level_title(GameKind::Memory, 11), "Intermediate 11");
        assert_eq!(level_title(GameKind::Board, 71), "Master 71");
    }
}
