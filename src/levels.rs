//! Per-level configuration
//!
//! The table is immutable and injected wherever it is needed; nothing in the
//! crate reaches for a global. Lookups are 1-based and fall back to level 1
//! for unknown level numbers rather than failing.

use serde::{Deserialize, Serialize};

/// Static configuration for one level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    pub difficulty: String,
    /// Horizontal formation speed, pixels per tick
    pub enemy_speed: f32,
    /// Probability that a selected shooter actually fires
    pub enemy_shoot_chance: f32,
    /// Minimum interval between enemy shot attempts
    pub enemy_shoot_interval_ms: u64,
    pub rows: u32,
    pub cols: u32,
    /// Probability that a formation member is the advanced variant
    pub advanced_enemy_chance: f32,
    #[serde(default)]
    pub boss_fight: bool,
}

/// The ordered level table. Index 0 holds level 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelTable {
    levels: Vec<LevelConfig>,
}

impl LevelTable {
    /// The four built-in levels: three escalating formations, then the boss.
    pub fn builtin() -> Self {
        let level = |name: &str,
                     difficulty: &str,
                     enemy_speed: f32,
                     enemy_shoot_chance: f32,
                     enemy_shoot_interval_ms: u64,
                     rows: u32,
                     cols: u32,
                     advanced_enemy_chance: f32,
                     boss_fight: bool| LevelConfig {
            name: name.to_string(),
            difficulty: difficulty.to_string(),
            enemy_speed,
            enemy_shoot_chance,
            enemy_shoot_interval_ms,
            rows,
            cols,
            advanced_enemy_chance,
            boss_fight,
        };

        Self {
            levels: vec![
                level("Opening Invasion", "Easy", 1.0, 0.1, 1_500, 3, 6, 0.0, false),
                level("Alien Surge", "Normal", 1.5, 0.2, 1_200, 4, 7, 0.2, false),
                level("Advanced Threat", "Hard", 2.0, 0.3, 1_000, 4, 8, 0.3, false),
                level("Mothership", "Very Hard", 2.5, 0.4, 800, 0, 0, 0.0, true),
            ],
        }
    }

    /// Load a custom table from JSON text. The only fallible constructor;
    /// hosts that don't supply one use `builtin()`. An empty table is
    /// rejected so level lookups always have a level 1 to fall back on.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        use serde::de::Error;
        let table: Self = serde_json::from_str(json)?;
        if table.levels.is_empty() {
            return Err(serde_json::Error::custom("level table must not be empty"));
        }
        Ok(table)
    }

    /// Look up a level's config. Unknown level numbers (including 0) fall
    /// back to level 1.
    pub fn get(&self, level: u32) -> &LevelConfig {
        self.levels
            .get(level.saturating_sub(1) as usize)
            .unwrap_or(&self.levels[0])
    }

    /// Highest playable level number.
    pub fn max_level(&self) -> u32 {
        self.levels.len() as u32
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::builtin()
    }
}
