//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-stepped only, one update pass per tick
//! - Seeded RNG only
//! - Structural changes to entity collections happen synchronously within
//!   the update pass, in a fixed documented order
//! - No rendering or platform dependencies

pub mod bullet;
pub mod machine;
pub mod player;
pub mod powerup;
pub mod rect;
pub mod session;
pub mod wave;

pub use bullet::{Bullet, BulletSource};
pub use machine::{Command, GameMachine, GameState};
pub use player::Player;
pub use powerup::{PowerUp, PowerUpKind, PowerUpManager};
pub use rect::Rect;
pub use session::{GameSession, SessionOutcome};
pub use wave::{Boss, Enemy, EnemyKind, EnemyWave};
