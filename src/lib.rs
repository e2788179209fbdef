//! Gesture Invaders - a vertically scrolling shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state)
//! - `levels`: Immutable per-level configuration table
//! - `input`: Hand-tracker capability and per-frame input snapshots
//! - `audio`: Fire-and-forget audio event sink
//! - `settings`: Control mode and preferences
//! - `highscores`: In-memory session leaderboard

pub mod audio;
pub mod highscores;
pub mod input;
pub mod levels;
pub mod settings;
pub mod sim;

pub use audio::{AudioSink, NullAudio};
pub use highscores::HighScores;
pub use input::{FrameInput, HandReading, HandTracker, NullTracker};
pub use levels::{LevelConfig, LevelTable};
pub use settings::{ControlMode, Settings};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// Nominal frame rate the host loop is expected to drive
    pub const FPS: u32 = 60;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 8.0;
    pub const PLAYER_LIVES: u32 = 3;
    /// Invulnerability window after a shield absorbs a hit (ticks)
    pub const SHIELD_INVULN_TICKS: u32 = 60;
    /// Invulnerability window after losing a life (ticks)
    pub const HIT_INVULN_TICKS: u32 = 120;

    /// Enemy formation
    pub const ENEMY_WIDTH: f32 = 40.0;
    pub const ENEMY_HEIGHT: f32 = 30.0;
    /// Vertical distance the whole formation drops on an edge hit
    pub const ENEMY_DROP_DISTANCE: f32 = 30.0;
    /// Grid origin and spacing for formation placement
    pub const FORMATION_START_X: f32 = 100.0;
    pub const FORMATION_START_Y: f32 = 80.0;
    pub const FORMATION_SPACING_X: f32 = 60.0;
    pub const FORMATION_SPACING_Y: f32 = 50.0;
    /// Formation defeat line: any enemy's lower edge past this loses the game
    pub const ENEMY_BOTTOM_LINE: f32 = SCREEN_HEIGHT - 100.0;
    /// Per-call inclusion probability for common enemies in shooter sampling
    pub const COMMON_SHOOTER_CHANCE: f32 = 0.3;

    /// Boss
    pub const BOSS_WIDTH: f32 = 150.0;
    pub const BOSS_HEIGHT: f32 = 100.0;
    pub const BOSS_HEALTH: u32 = 20;
    pub const BOSS_SPEED: f32 = 2.0;
    /// Horizontal margin where the boss reverses direction
    pub const BOSS_TURN_MARGIN: f32 = 50.0;
    pub const BOSS_START_Y: f32 = 100.0;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 15.0;
    pub const PLAYER_BULLET_SPEED: f32 = 10.0;
    pub const ENEMY_BULLET_SPEED: f32 = 5.0;

    /// Scoring
    pub const POINTS_COMMON_ENEMY: u64 = 10;
    pub const POINTS_ADVANCED_ENEMY: u64 = 20;
    pub const POINTS_BOSS: u64 = 100;

    /// Power-ups
    pub const POWERUP_DROP_CHANCE: f32 = 0.15;
    pub const POWERUP_FALL_SPEED: f32 = 3.0;
    pub const POWERUP_WIDTH: f32 = 30.0;
    pub const POWERUP_HEIGHT: f32 = 30.0;
    /// Lifetime of a timed power-up effect (ms)
    pub const POWERUP_DURATION_MS: u64 = 10_000;

    /// Minimum interval between two gesture-triggered shots (ms)
    pub const GESTURE_DEBOUNCE_MS: u64 = 300;
    /// Global cooldown between any two shots (ms)
    pub const SHOT_COOLDOWN_MS: u64 = 150;
    /// Horizontal inset of the twin muzzles while double shot is active
    pub const DOUBLE_SHOT_INSET: f32 = 8.0;

    /// Coarse state timers (ms)
    pub const SPLASH_MS: u64 = 3_000;
    pub const LEVEL_TRANSITION_MS: u64 = 1_800;
    pub const GAME_OVER_MS: u64 = 3_000;
}
