//! Data-driven game balance
//!
//! Every physics and arcade constant lives here with its default. Overrides
//! are partial JSON documents (missing keys keep their defaults) and can be
//! persisted in LocalStorage so balance tweaks don't need a rebuild.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigResult, ensure_positive, ensure_probability, ensure_unit_open};
use crate::sim::physics::{Bounds, PhysicsParams};

/// Carrom board geometry, physics and scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardTuning {
    // === Geometry ===
    /// Full board edge length (pixels)
    pub board_size: f32,
    /// Frame width around the playable area; pockets sit on its inner corners
    pub board_padding: f32,
    pub piece_radius: f32,
    pub striker_radius: f32,
    pub pocket_radius: f32,
    /// Distance of the player's baseline from the bottom edge
    pub baseline_offset: f32,
    /// Extra inset keeping the striker off the side walls while placing it
    pub striker_margin: f32,
    /// Formation spacing as a multiple of the piece radius
    pub formation_spacing: f32,

    // === Physics ===
    /// Per-tick velocity multiplier
    pub friction: f32,
    /// Velocity components below this snap to zero
    pub min_velocity: f32,
    /// Fraction of velocity kept after a wall or disc impact
    pub restitution: f32,
    pub piece_mass: f32,
    pub striker_mass: f32,
    /// Striker speed (pixels/tick) at 100% power
    pub max_striker_power: f32,

    // === Shot charging ===
    /// Power gained per charge step (percent)
    pub power_step: f32,
    pub charge_interval_ms: f64,
    /// Releases below this power are discarded
    pub min_shot_power: f32,

    // === Scoring ===
    pub queen_points: u32,
    pub piece_points: u32,
    pub striker_foul_penalty: u32,
    pub wrong_piece_penalty: u32,

    // === Opponent ===
    /// Delay between the turn passing and the opponent firing
    pub opponent_delay_ms: f64,
    /// Horizontal spread of the opponent's striker placement
    pub opponent_origin_spread: f32,
    /// Opponent baseline distance from the top of the playable area
    pub opponent_origin_inset: f32,
    /// Aim point jitter on each axis (pixels)
    pub opponent_aim_jitter: f32,
    pub opponent_power_min: f32,
    pub opponent_power_range: f32,
}

impl Default for BoardTuning {
    fn default() -> Self {
        Self {
            board_size: 600.0,
            board_padding: 80.0,
            piece_radius: 15.0,
            striker_radius: 18.0,
            pocket_radius: 25.0,
            baseline_offset: 100.0,
            striker_margin: 20.0,
            formation_spacing: 2.3,

            friction: 0.98,
            min_velocity: 0.1,
            restitution: 0.85,
            piece_mass: 1.0,
            striker_mass: 1.5,
            max_striker_power: 25.0,

            power_step: 2.0,
            charge_interval_ms: 50.0,
            min_shot_power: 10.0,

            queen_points: 50,
            piece_points: 10,
            striker_foul_penalty: 10,
            wrong_piece_penalty: 5,

            opponent_delay_ms: 3500.0,
            opponent_origin_spread: 100.0,
            opponent_origin_inset: 50.0,
            opponent_aim_jitter: 40.0,
            opponent_power_min: 50.0,
            opponent_power_range: 40.0,
        }
    }
}

impl BoardTuning {
    pub fn physics(&self) -> PhysicsParams {
        PhysicsParams {
            friction: self.friction,
            min_velocity: self.min_velocity,
            restitution: self.restitution,
        }
    }

    /// The playable rectangle inside the frame
    pub fn bounds(&self) -> Bounds {
        Bounds::square(self.board_padding, self.board_size - self.board_padding)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        ensure_positive("board_size", self.board_size as f64)?;
        ensure_positive("piece_radius", self.piece_radius as f64)?;
        ensure_positive("striker_radius", self.striker_radius as f64)?;
        ensure_positive("pocket_radius", self.pocket_radius as f64)?;
        ensure_positive("piece_mass", self.piece_mass as f64)?;
        ensure_positive("striker_mass", self.striker_mass as f64)?;
        ensure_positive("min_velocity", self.min_velocity as f64)?;
        ensure_positive("max_striker_power", self.max_striker_power as f64)?;
        ensure_positive("charge_interval_ms", self.charge_interval_ms)?;
        ensure_unit_open("friction", self.friction as f64)?;
        ensure_unit_open("restitution", self.restitution as f64)?;
        ensure_positive(
            "playable_size",
            (self.board_size - 2.0 * self.board_padding) as f64,
        )?;
        Ok(())
    }
}

/// Ant smasher and snake balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeTuning {
    // === Reaction (ant smasher) ===
    pub field_width: f32,
    pub field_height: f32,
    /// Actor hit radius; actors also spawn this far outside the field
    pub actor_size: f32,
    /// Hard cap on simultaneously live actors
    pub population_cap: usize,
    pub hazard_chance: f32,
    pub hazard_penalty: u32,
    pub hit_points: u32,
    /// Highest combo multiplier
    pub combo_cap: u32,
    /// Combo resets after this long without a hit
    pub combo_timeout_ms: f64,
    /// Distance from its exit point at which an actor has escaped
    pub escape_distance: f32,
    pub reaction_tick_ms: f64,

    // === Snake ===
    pub grid_width: i32,
    pub grid_height: i32,
    pub food_points: u32,
}

impl Default for ArcadeTuning {
    fn default() -> Self {
        Self {
            field_width: 600.0,
            field_height: 600.0,
            actor_size: 30.0,
            population_cap: 15,
            hazard_chance: 0.15,
            hazard_penalty: 50,
            hit_points: 10,
            combo_cap: 10,
            combo_timeout_ms: 2000.0,
            escape_distance: 5.0,
            reaction_tick_ms: 1000.0 / 60.0,

            grid_width: 20,
            grid_height: 20,
            food_points: 10,
        }
    }
}

impl ArcadeTuning {
    pub fn validate(&self) -> ConfigResult<()> {
        ensure_positive("field_width", self.field_width as f64)?;
        ensure_positive("field_height", self.field_height as f64)?;
        ensure_positive("actor_size", self.actor_size as f64)?;
        ensure_positive("population_cap", self.population_cap as f64)?;
        ensure_positive("combo_cap", self.combo_cap as f64)?;
        ensure_positive("escape_distance", self.escape_distance as f64)?;
        ensure_positive("reaction_tick_ms", self.reaction_tick_ms)?;
        ensure_probability("hazard_chance", self.hazard_chance as f64)?;
        // Snake needs room for its three-segment start at the centre
        ensure_positive("grid_width", (self.grid_width - 3) as f64)?;
        ensure_positive("grid_height", (self.grid_height - 1) as f64)?;
        Ok(())
    }
}

/// Memory match delays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryTuning {
    /// How long a matched pair stays face up before it is removed
    pub match_delay_ms: f64,
    /// How long a mismatched pair stays face up before flipping back
    pub mismatch_delay_ms: f64,
    pub tick_ms: f64,
}

impl Default for MemoryTuning {
    fn default() -> Self {
        Self {
            match_delay_ms: 500.0,
            mismatch_delay_ms: 1000.0,
            tick_ms: 50.0,
        }
    }
}

/// Complete balance set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub board: BoardTuning,
    pub arcade: ArcadeTuning,
    pub memory: MemoryTuning,
    /// End-of-round overlay time before the host hears the result
    pub result_display_ms: f64,
}

impl Tuning {
    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.board.validate()?;
        self.arcade.validate()?;
        ensure_positive("memory.tick_ms", self.memory.tick_ms)?;
        Ok(())
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pocket_arcade_tuning";

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning overrides from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("{} not available natively, using defaults", Self::STORAGE_KEY);
        Self::default()
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            board: BoardTuning::default(),
            arcade: ArcadeTuning::default(),
            memory: MemoryTuning::default(),
            result_display_ms: 2000.0,
        }
    }
}
