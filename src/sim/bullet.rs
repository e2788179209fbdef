//! Bullet entity
//!
//! A bullet's source encodes both its travel direction and its speed: player
//! bullets fly upward fast, enemy bullets fall slower. Bullets live in one of
//! two separate collections owned by the session and are never shared.

use glam::Vec2;

use super::rect::Rect;
use crate::consts::*;

/// Which side fired a bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletSource {
    Player,
    Enemy,
}

impl BulletSource {
    /// Signed vertical velocity in pixels per tick (negative is up-screen).
    fn velocity(&self) -> f32 {
        match self {
            BulletSource::Player => -PLAYER_BULLET_SPEED,
            BulletSource::Enemy => ENEMY_BULLET_SPEED,
        }
    }
}

/// A projectile. Position is the top-left of its bounding box.
#[derive(Debug, Clone, Copy)]
pub struct Bullet {
    pub pos: Vec2,
    pub source: BulletSource,
}

impl Bullet {
    /// Create a bullet whose horizontal center sits at `center_x`.
    pub fn new(center_x: f32, y: f32, source: BulletSource) -> Self {
        Self {
            pos: Vec2::new(center_x - BULLET_WIDTH / 2.0, y),
            source,
        }
    }

    /// Advance one tick along the source's travel direction.
    pub fn advance(&mut self) {
        self.pos.y += self.source.velocity();
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.y < 0.0 || self.pos.y > SCREEN_HEIGHT
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT))
    }
}
