//! Best result per level
//!
//! Persisted to LocalStorage, keyed by level id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::Completion;

/// Best result for one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelRecord {
    pub best_score: u32,
    pub best_stars: u8,
    pub plays: u32,
    pub wins: u32,
}

/// All level records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelRecords {
    pub levels: BTreeMap<String, LevelRecord>,
}

impl LevelRecords {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pocket_arcade_records";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, level_id: &str) -> Option<&LevelRecord> {
        self.levels.get(level_id)
    }

    /// Fold a finished round into the level's record.
    /// Returns true when the score or stars improved.
    pub fn record(&mut self, level_id: &str, completion: Completion) -> bool {
        let entry = self.levels.entry(level_id.to_string()).or_default();
        entry.plays += 1;
        if completion.won {
            entry.wins += 1;
        }

        let improved = completion.score > entry.best_score || completion.stars > entry.best_stars;
        entry.best_score = entry.best_score.max(completion.score);
        entry.best_stars = entry.best_stars.max(completion.stars);
        if improved {
            log::info!(
                "New best on {}: {} pts, {} stars",
                level_id,
                entry.best_score,
                entry.best_stars
            );
        }
        improved
    }

    /// Stars collected across every level
    pub fn total_stars(&self) -> u32 {
        self.levels.values().map(|r| r.best_stars as u32).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Load records from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<LevelRecords>(&json) {
                    Ok(records) => {
                        log::info!("Loaded records for {} levels", records.levels.len());
                        return records;
                    }
                    Err(e) => log::warn!("Discarding unreadable records: {}", e),
                }
            }
        }

        Self::new()
    }

    /// Save records to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::debug!("Records saved ({} levels)", self.levels.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}
