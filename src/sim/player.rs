//! Player ship entity
//!
//! Pure state plus per-tick transition rules. All inputs arrive pre-clamped,
//! so nothing here can fail.

use glam::Vec2;

use super::rect::Rect;
use crate::consts::*;

/// The player's ship.
///
/// `double_shot_until_ms` is always present and defaults to 0, i.e. "never
/// active"; the double-shot power-up overwrites it with a wall-clock expiry.
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub lives: u32,
    pub has_shield: bool,
    pub invulnerable_ticks: u32,
    pub double_shot_until_ms: u64,
}

impl Player {
    /// Spawn at the level-start position: horizontally centered, near the
    /// bottom of the screen.
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(
                SCREEN_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
                SCREEN_HEIGHT - 80.0,
            ),
            lives: PLAYER_LIVES,
            has_shield: false,
            invulnerable_ticks: 0,
            double_shot_until_ms: 0,
        }
    }

    pub fn move_left(&mut self) {
        self.pos.x = (self.pos.x - PLAYER_SPEED).max(0.0);
    }

    pub fn move_right(&mut self) {
        self.pos.x = (self.pos.x + PLAYER_SPEED).min(SCREEN_WIDTH - PLAYER_WIDTH);
    }

    /// Map a normalized horizontal position (0 = left edge, 1 = right edge)
    /// directly onto the ship's x coordinate.
    pub fn set_position_normalized(&mut self, normalized_x: f32) {
        let span = SCREEN_WIDTH - PLAYER_WIDTH;
        self.pos.x = (normalized_x * span).clamp(0.0, span);
    }

    /// Advance per-tick timers.
    pub fn tick(&mut self) {
        self.invulnerable_ticks = self.invulnerable_ticks.saturating_sub(1);
    }

    /// Take a hit. The shield absorbs one hit and is consumed; an active
    /// invulnerability window makes the hit a no-op. Otherwise a life is
    /// lost and a longer invulnerability window starts.
    ///
    /// Returns true when the hit was fatal (no lives remain).
    pub fn hit(&mut self) -> bool {
        if self.has_shield {
            self.has_shield = false;
            self.invulnerable_ticks = SHIELD_INVULN_TICKS;
            return false;
        }
        if self.invulnerable_ticks > 0 {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        self.invulnerable_ticks = HIT_INVULN_TICKS;
        self.lives == 0
    }

    pub fn add_life(&mut self) {
        self.lives += 1;
    }

    pub fn activate_shield(&mut self) {
        self.has_shield = true;
    }

    pub fn deactivate_shield(&mut self) {
        self.has_shield = false;
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ticks > 0
    }

    pub fn double_shot_active(&self, now_ms: u64) -> bool {
        self.double_shot_until_ms > now_ms
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT))
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_clamps_to_screen() {
        let mut p = Player::new();
        for _ in 0..200 {
            p.move_left();
        }
        assert_eq!(p.pos.x, 0.0);
        for _ in 0..200 {
            p.move_right();
        }
        assert_eq!(p.pos.x, SCREEN_WIDTH - PLAYER_WIDTH);
    }

    #[test]
    fn normalized_position_maps_full_span() {
        let mut p = Player::new();
        p.set_position_normalized(0.0);
        assert_eq!(p.pos.x, 0.0);
        p.set_position_normalized(1.0);
        assert_eq!(p.pos.x, SCREEN_WIDTH - PLAYER_WIDTH);
        p.set_position_normalized(0.5);
        assert_eq!(p.pos.x, (SCREEN_WIDTH - PLAYER_WIDTH) / 2.0);
    }

    #[test]
    fn shield_absorbs_exactly_one_hit() {
        let mut p = Player::new();
        p.activate_shield();
        assert!(!p.hit());
        assert!(!p.has_shield);
        assert_eq!(p.lives, PLAYER_LIVES);
        assert_eq!(p.invulnerable_ticks, SHIELD_INVULN_TICKS);
    }

    #[test]
    fn hit_is_noop_while_invulnerable() {
        let mut p = Player::new();
        assert!(!p.hit());
        assert_eq!(p.lives, PLAYER_LIVES - 1);
        // Still inside the invulnerability window
        assert!(!p.hit());
        assert_eq!(p.lives, PLAYER_LIVES - 1);
    }

    #[test]
    fn three_spaced_hits_are_fatal() {
        let mut p = Player::new();
        for life in (1..=PLAYER_LIVES).rev() {
            let died = p.hit();
            assert_eq!(died, life == 1);
            // Let the invulnerability window lapse between hits
            for _ in 0..HIT_INVULN_TICKS {
                p.tick();
            }
        }
        assert_eq!(p.lives, 0);
    }

    #[test]
    fn double_shot_expiry_is_wall_clock() {
        let mut p = Player::new();
        assert!(!p.double_shot_active(0));
        p.double_shot_until_ms = 5_000;
        assert!(p.double_shot_active(4_999));
        assert!(!p.double_shot_active(5_000));
    }

    #[test]
    fn tick_floors_invulnerability_at_zero() {
        let mut p = Player::new();
        p.tick();
        assert_eq!(p.invulnerable_ticks, 0);
    }
}
