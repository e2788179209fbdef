//! Power-up drops and active-effect bookkeeping
//!
//! Destroyed enemies may drop a falling power-up. Timed effects (double
//! shot, shield) live in a kind -> expiry table; an extra life is applied
//! immediately and never enters the table.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;

use super::rect::Rect;
use crate::consts::*;

/// The three power-up kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PowerUpKind {
    DoubleShot,
    Shield,
    ExtraLife,
}

impl PowerUpKind {
    const ALL: [PowerUpKind; 3] = [
        PowerUpKind::DoubleShot,
        PowerUpKind::Shield,
        PowerUpKind::ExtraLife,
    ];

    /// True for kinds whose effect has a duration and therefore an entry in
    /// the active-effects table.
    pub fn is_timed(&self) -> bool {
        !matches!(self, PowerUpKind::ExtraLife)
    }
}

/// A falling power-up capsule.
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
}

impl PowerUp {
    fn advance(&mut self) {
        self.pos.y += POWERUP_FALL_SPEED;
    }

    fn is_off_screen(&self) -> bool {
        self.pos.y > SCREEN_HEIGHT
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(POWERUP_WIDTH, POWERUP_HEIGHT))
    }
}

/// Owns the falling capsules and the kind -> expiry-timestamp table for
/// timed effects. A `BTreeMap` keeps expiry scans in a fixed order, so two
/// effects expiring on the same timestamp always resolve identically.
#[derive(Debug, Clone, Default)]
pub struct PowerUpManager {
    pub(crate) falling: Vec<PowerUp>,
    active: BTreeMap<PowerUpKind, u64>,
}

impl PowerUpManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn falling(&self) -> &[PowerUp] {
        &self.falling
    }

    /// Kinds currently in the active-effects table, for HUD display.
    pub fn active_kinds(&self) -> impl Iterator<Item = PowerUpKind> + '_ {
        self.active.keys().copied()
    }

    /// Roll the drop chance once and, on success, spawn a uniformly random
    /// capsule at the kill position. Callers invoke this on every kill; the
    /// probability gate lives here and nowhere else.
    pub fn spawn<R: Rng>(&mut self, pos: Vec2, rng: &mut R) {
        if rng.random::<f32>() >= POWERUP_DROP_CHANCE {
            return;
        }
        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        self.falling.push(PowerUp { pos, kind });
    }

    /// Advance falling capsules, drop the ones that left the screen, and
    /// expire table entries whose timestamp has passed. Expiry only removes
    /// the table entry; an armed shield on the player persists until it is
    /// consumed by a hit.
    pub fn update(&mut self, now_ms: u64) {
        for p in &mut self.falling {
            p.advance();
        }
        self.falling.retain(|p| !p.is_off_screen());
        self.active.retain(|_, expiry| now_ms < *expiry);
    }

    /// Consume the first falling capsule intersecting the player and return
    /// its kind. Timed kinds get `now + duration` written into the table,
    /// overwriting any existing expiry (durations never stack); an extra
    /// life is returned as-is for immediate application.
    pub fn check_collision(&mut self, player_rect: &Rect, now_ms: u64) -> Option<PowerUpKind> {
        let idx = self
            .falling
            .iter()
            .position(|p| p.rect().intersects(player_rect))?;
        let kind = self.falling.remove(idx).kind;
        if kind.is_timed() {
            self.active.insert(kind, now_ms + POWERUP_DURATION_MS);
        }
        Some(kind)
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active.contains_key(&kind)
    }

    /// Whole seconds until the effect expires, floored at 0.
    pub fn remaining_secs(&self, kind: PowerUpKind, now_ms: u64) -> u64 {
        self.active
            .get(&kind)
            .map(|expiry| expiry.saturating_sub(now_ms) / 1_000)
            .unwrap_or(0)
    }

    /// Drop everything: falling capsules and active effects.
    pub fn clear(&mut self) {
        self.falling.clear();
        self.active.clear();
    }
}
