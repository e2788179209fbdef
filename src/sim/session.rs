//! GameSession - the per-frame orchestrator
//!
//! Owns every entity and runs the fixed-order update pass: input and player
//! timers, debounced firing, wave advance and enemy fire, the two bullet
//! collision sweeps, power-up bookkeeping, then terminal checks. All
//! structural changes to the entity collections happen here, synchronously,
//! in this order.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::bullet::{Bullet, BulletSource};
use super::player::Player;
use super::powerup::{PowerUpKind, PowerUpManager};
use super::wave::EnemyWave;
use crate::audio::AudioSink;
use crate::consts::*;
use crate::input::FrameInput;
use crate::levels::LevelTable;
use crate::settings::ControlMode;

/// What a frame's update decided. The machine maps these to coarse state
/// transitions; `Continue` means keep playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Continue,
    /// Wave cleared with more levels remaining; the level counter has
    /// already been advanced.
    LevelCleared,
    /// Final level cleared.
    Victory,
    /// Player died or the formation reached the bottom.
    Defeat,
}

/// One run of the game, from level 1 until victory or defeat. Survives
/// level changes; score and RNG carry across them.
#[derive(Debug, Clone)]
pub struct GameSession {
    table: LevelTable,
    control_mode: ControlMode,
    pub(crate) player: Player,
    pub(crate) wave: EnemyWave,
    pub(crate) player_bullets: Vec<Bullet>,
    pub(crate) enemy_bullets: Vec<Bullet>,
    pub(crate) powerups: PowerUpManager,
    score: u64,
    pub(crate) level: u32,
    last_shot_ms: u64,
    last_enemy_shot_ms: u64,
    prev_hand_closed: bool,
    rng: Pcg32,
}

impl GameSession {
    pub fn new(table: LevelTable, control_mode: ControlMode, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let wave = EnemyWave::new(table.get(1), &mut rng);
        Self {
            table,
            control_mode,
            player: Player::new(),
            wave,
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            powerups: PowerUpManager::new(),
            score: 0,
            level: 1,
            last_shot_ms: 0,
            last_enemy_shot_ms: 0,
            prev_hand_closed: false,
            rng,
        }
    }

    /// Reinitialize for the current level number: player back to default
    /// lives and position, bullets and power-ups cleared, wave rebuilt from
    /// the level's config. Score and RNG are kept.
    pub fn start_level(&mut self) {
        let cfg = self.table.get(self.level).clone();
        log::info!("level {} start: {} ({})", self.level, cfg.name, cfg.difficulty);
        self.player = Player::new();
        self.wave = EnemyWave::new(&cfg, &mut self.rng);
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.powerups.clear();
        self.last_shot_ms = 0;
        self.last_enemy_shot_ms = 0;
        self.prev_hand_closed = false;
    }

    // Read-only accessors for the render sink.

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn wave(&self) -> &EnemyWave {
        &self.wave
    }

    pub fn player_bullets(&self) -> &[Bullet] {
        &self.player_bullets
    }

    pub fn enemy_bullets(&self) -> &[Bullet] {
        &self.enemy_bullets
    }

    pub fn powerups(&self) -> &PowerUpManager {
        &self.powerups
    }

    /// Advance the session one frame. `now_ms` is a monotonic wall-clock
    /// timestamp. The first terminal outcome decided in a frame wins; later
    /// terminal checks in the same frame are skipped.
    pub fn update(
        &mut self,
        now_ms: u64,
        input: &FrameInput,
        audio: &dyn AudioSink,
    ) -> SessionOutcome {
        // Player timers, then movement from the configured source. An
        // absent hand reading falls back to the discrete controls.
        self.player.tick();
        let hand = match self.control_mode {
            ControlMode::Gesture => input.hand,
            ControlMode::Keyboard => None,
        };
        if let Some(hand) = hand {
            self.player.set_position_normalized(hand.x);
        } else {
            if input.move_left {
                self.player.move_left();
            }
            if input.move_right {
                self.player.move_right();
            }
        }

        // Edge-triggered gesture fire behind its own debounce; discrete
        // fire requests share the debounced shot path.
        let hand_closed = hand.map(|h| h.closed).unwrap_or(false);
        if hand_closed
            && !self.prev_hand_closed
            && now_ms.saturating_sub(self.last_shot_ms) > GESTURE_DEBOUNCE_MS
        {
            self.try_shoot(now_ms, audio);
        }
        self.prev_hand_closed = hand_closed;
        if input.fire {
            self.try_shoot(now_ms, audio);
        }

        // Advance the wave, then let it fire on the level's cadence. The
        // shooter is sampled before the chance roll, so a selection that
        // fails the roll still consumed the attempt.
        self.wave.update();
        let shoot_interval_ms = self.table.get(self.level).enemy_shoot_interval_ms;
        let shoot_chance = self.table.get(self.level).enemy_shoot_chance;
        if now_ms.saturating_sub(self.last_enemy_shot_ms) > shoot_interval_ms {
            self.last_enemy_shot_ms = now_ms;
            if let Some(muzzle) = self.wave.pick_shooter(&mut self.rng) {
                if self.rng.random::<f32>() < shoot_chance {
                    self.enemy_bullets
                        .push(Bullet::new(muzzle.x, muzzle.y, BulletSource::Enemy));
                }
            }
        }

        let mut outcome = SessionOutcome::Continue;

        // Player bullets: advance, drop off-screen ones, then collide -
        // boss first, else first matching enemy wins.
        let mut i = 0;
        while i < self.player_bullets.len() {
            self.player_bullets[i].advance();
            if self.player_bullets[i].is_off_screen() {
                self.player_bullets.remove(i);
                continue;
            }

            let rect = self.player_bullets[i].rect();
            let boss_hit = self.wave.boss().is_some_and(|b| rect.intersects(&b.rect()));
            if boss_hit {
                let (defeated, points) = self.wave.damage_boss();
                self.score += points;
                audio.on_explosion();
                self.powerups.spawn(rect.origin, &mut self.rng);
                self.player_bullets.remove(i);
                if defeated {
                    outcome = if self.level < self.table.max_level() {
                        self.level += 1;
                        SessionOutcome::LevelCleared
                    } else {
                        audio.on_victory();
                        SessionOutcome::Victory
                    };
                }
                continue;
            }

            let enemy_hit = self
                .wave
                .enemies()
                .iter()
                .find(|e| rect.intersects(&e.rect()))
                .map(|e| (e.id, e.pos));
            if let Some((id, pos)) = enemy_hit {
                self.score += self.wave.remove_enemy(id);
                audio.on_explosion();
                self.powerups.spawn(pos, &mut self.rng);
                self.player_bullets.remove(i);
                continue;
            }

            i += 1;
        }

        // Enemy bullets: advance, drop off-screen ones, resolve player
        // hits through the shield/invulnerability cascade.
        let player_rect = self.player.rect();
        let mut i = 0;
        while i < self.enemy_bullets.len() {
            self.enemy_bullets[i].advance();
            if self.enemy_bullets[i].is_off_screen() {
                self.enemy_bullets.remove(i);
                continue;
            }
            if self.enemy_bullets[i].rect().intersects(&player_rect) {
                self.enemy_bullets.remove(i);
                audio.on_hit();
                if self.player.hit() && outcome == SessionOutcome::Continue {
                    audio.on_game_over();
                    outcome = SessionOutcome::Defeat;
                }
                continue;
            }
            i += 1;
        }

        // Power-ups: falling motion, effect expiry, pickup activation.
        self.powerups.update(now_ms);
        if let Some(kind) = self.powerups.check_collision(&self.player.rect(), now_ms) {
            match kind {
                PowerUpKind::ExtraLife => self.player.add_life(),
                PowerUpKind::Shield => self.player.activate_shield(),
                PowerUpKind::DoubleShot => {
                    self.player.double_shot_until_ms = now_ms + POWERUP_DURATION_MS;
                }
            }
            audio.on_explosion();
        }

        // Terminal checks, skipped once this frame already decided.
        if outcome == SessionOutcome::Continue {
            if self.wave.reached_bottom() {
                audio.on_game_over();
                outcome = SessionOutcome::Defeat;
            } else if self.wave.is_empty() {
                audio.on_victory();
                outcome = if self.level < self.table.max_level() {
                    self.level += 1;
                    SessionOutcome::LevelCleared
                } else {
                    SessionOutcome::Victory
                };
            }
        }

        outcome
    }

    /// Debounced shot creation. While double shot is active two bullets
    /// spawn just inside the ship's edges; otherwise one spawns centered.
    fn try_shoot(&mut self, now_ms: u64, audio: &dyn AudioSink) {
        if now_ms.saturating_sub(self.last_shot_ms) < SHOT_COOLDOWN_MS {
            return;
        }
        self.last_shot_ms = now_ms;

        let y = self.player.pos.y;
        if self.player.double_shot_active(now_ms) {
            let left = self.player.pos.x + DOUBLE_SHOT_INSET;
            let right = self.player.pos.x + PLAYER_WIDTH - DOUBLE_SHOT_INSET;
            self.player_bullets
                .push(Bullet::new(left, y, BulletSource::Player));
            self.player_bullets
                .push(Bullet::new(right, y, BulletSource::Player));
        } else {
            let center = self.player.pos.x + PLAYER_WIDTH / 2.0;
            self.player_bullets
                .push(Bullet::new(center, y, BulletSource::Player));
        }
        audio.on_shoot();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use glam::Vec2;
    use proptest::prelude::*;
    use std::cell::Cell;

    /// Sink that counts events, for asserting audio notifications.
    #[derive(Default)]
    struct CountingAudio {
        shots: Cell<u32>,
        explosions: Cell<u32>,
        hits: Cell<u32>,
        victories: Cell<u32>,
        game_overs: Cell<u32>,
    }

    impl AudioSink for CountingAudio {
        fn on_shoot(&self) {
            self.shots.set(self.shots.get() + 1);
        }
        fn on_explosion(&self) {
            self.explosions.set(self.explosions.get() + 1);
        }
        fn on_hit(&self) {
            self.hits.set(self.hits.get() + 1);
        }
        fn on_victory(&self) {
            self.victories.set(self.victories.get() + 1);
        }
        fn on_game_over(&self) {
            self.game_overs.set(self.game_overs.get() + 1);
        }
    }

    fn session(mode: ControlMode) -> GameSession {
        GameSession::new(LevelTable::builtin(), mode, 1234)
    }

    /// Drop a player bullet onto every current enemy (or the boss) and step
    /// one frame.
    fn volley(s: &mut GameSession, now_ms: u64) -> SessionOutcome {
        let targets: Vec<Vec2> = if let Some(boss) = s.wave.boss() {
            vec![boss.rect().center()]
        } else {
            s.wave.enemies().iter().map(|e| e.rect().center()).collect()
        };
        for t in targets {
            s.player_bullets
                .push(Bullet::new(t.x, t.y, BulletSource::Player));
        }
        s.update(now_ms, &FrameInput::default(), &NullAudio)
    }

    #[test]
    fn clearing_level_one_advances_to_level_two() {
        let mut s = session(ControlMode::Keyboard);
        assert_eq!(s.wave.enemies().len(), 18);

        let mut outcomes = Vec::new();
        for round in 0..20 {
            let outcome = volley(&mut s, 10_000 + round);
            outcomes.push(outcome);
            if s.wave.is_empty() {
                break;
            }
        }

        let cleared = outcomes
            .iter()
            .filter(|o| **o == SessionOutcome::LevelCleared)
            .count();
        assert_eq!(cleared, 1, "level advance fired exactly once");
        assert_eq!(s.level(), 2);
        assert_eq!(s.score(), 18 * POINTS_COMMON_ENEMY);
    }

    #[test]
    fn boss_fight_ends_in_victory_on_final_level() {
        let mut s = session(ControlMode::Keyboard);
        s.level = 4;
        s.start_level();
        assert!(s.wave.boss().is_some());

        let audio = CountingAudio::default();
        let mut victories = 0;
        for round in 0..BOSS_HEALTH as u64 {
            if let Some(center) = s.wave.boss().map(|b| b.rect().center()) {
                s.player_bullets
                    .push(Bullet::new(center.x, center.y, BulletSource::Player));
            }
            if s.update(10_000 + round, &FrameInput::default(), &audio) == SessionOutcome::Victory {
                victories += 1;
            }
        }

        assert_eq!(victories, 1, "victory fired exactly once");
        assert!(s.wave.is_empty());
        assert_eq!(s.score(), POINTS_BOSS);
        assert_eq!(audio.victories.get(), 1);
        assert_eq!(audio.explosions.get(), BOSS_HEALTH);
    }

    #[test]
    fn double_shot_spawns_two_edge_offset_bullets() {
        let mut s = session(ControlMode::Keyboard);
        s.player.double_shot_until_ms = 20_000;
        let input = FrameInput {
            fire: true,
            ..FrameInput::default()
        };
        s.update(10_000, &input, &NullAudio);

        assert_eq!(s.player_bullets.len(), 2);
        let xs: Vec<f32> = s
            .player_bullets
            .iter()
            .map(|b| b.rect().center().x)
            .collect();
        assert_eq!(xs[0], s.player.pos.x + DOUBLE_SHOT_INSET);
        assert_eq!(xs[1], s.player.pos.x + PLAYER_WIDTH - DOUBLE_SHOT_INSET);
    }

    #[test]
    fn expired_double_shot_spawns_one_centered_bullet() {
        let mut s = session(ControlMode::Keyboard);
        s.player.double_shot_until_ms = 9_000; // already expired
        let input = FrameInput {
            fire: true,
            ..FrameInput::default()
        };
        s.update(10_000, &input, &NullAudio);

        assert_eq!(s.player_bullets.len(), 1);
        assert_eq!(
            s.player_bullets[0].rect().center().x,
            s.player.rect().center().x
        );
    }

    #[test]
    fn shot_cooldown_limits_fire_rate() {
        let mut s = session(ControlMode::Keyboard);
        let input = FrameInput {
            fire: true,
            ..FrameInput::default()
        };
        s.update(10_000, &input, &NullAudio);
        s.update(10_100, &input, &NullAudio); // inside the 150 ms cooldown
        assert_eq!(s.player_bullets.len(), 1);
        s.update(10_200, &input, &NullAudio);
        assert_eq!(s.player_bullets.len(), 2);
    }

    #[test]
    fn gesture_fire_is_edge_triggered() {
        let mut s = session(ControlMode::Gesture);
        let closed = FrameInput {
            hand: Some(crate::input::HandReading {
                x: 0.5,
                closed: true,
                detected: true,
            }),
            ..FrameInput::default()
        };
        let open = FrameInput {
            hand: Some(crate::input::HandReading::neutral()),
            ..FrameInput::default()
        };

        // Holding the fist closed fires once, not every frame
        let mut now = 10_000;
        for _ in 0..10 {
            s.update(now, &closed, &NullAudio);
            now += 16;
        }
        assert_eq!(s.player_bullets.len(), 1);

        // Reopen and close again after the debounce window
        s.update(now, &open, &NullAudio);
        s.update(now + GESTURE_DEBOUNCE_MS + 1, &closed, &NullAudio);
        assert_eq!(s.player_bullets.len(), 2);
    }

    #[test]
    fn off_screen_bullet_is_removed_before_it_can_collide() {
        let mut s = session(ControlMode::Keyboard);
        s.player_bullets
            .push(Bullet::new(400.0, 5.0, BulletSource::Player));
        s.update(10_000, &FrameInput::default(), &NullAudio);
        assert!(s.player_bullets.is_empty());
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn enemy_bullet_hit_runs_player_damage_cascade() {
        let mut s = session(ControlMode::Keyboard);
        let audio = CountingAudio::default();
        let target = s.player.rect().center();
        s.enemy_bullets
            .push(Bullet::new(target.x, target.y - 10.0, BulletSource::Enemy));
        s.update(10_000, &FrameInput::default(), &audio);

        assert_eq!(s.player.lives, PLAYER_LIVES - 1);
        assert!(s.player.is_invulnerable());
        assert_eq!(audio.hits.get(), 1);
        assert_eq!(audio.game_overs.get(), 0);
    }

    #[test]
    fn formation_reaching_bottom_is_defeat() {
        let mut s = session(ControlMode::Keyboard);
        for enemy in &mut s.wave.enemies {
            enemy.pos.y = ENEMY_BOTTOM_LINE;
        }
        let audio = CountingAudio::default();
        let outcome = s.update(10_000, &FrameInput::default(), &audio);
        assert_eq!(outcome, SessionOutcome::Defeat);
        assert_eq!(audio.game_overs.get(), 1);
    }

    #[test]
    fn shield_pickup_arms_player_and_absorbs_next_hit() {
        let mut s = session(ControlMode::Keyboard);
        let target = s.player.rect().center();
        s.powerups.falling.push(crate::sim::PowerUp {
            pos: Vec2::new(target.x, target.y - 1.0),
            kind: PowerUpKind::Shield,
        });
        s.update(10_000, &FrameInput::default(), &NullAudio);
        assert!(s.player.has_shield);

        // Shield absorbs the next bullet without costing a life
        s.enemy_bullets
            .push(Bullet::new(target.x, target.y - 10.0, BulletSource::Enemy));
        s.update(11_000, &FrameInput::default(), &NullAudio);
        assert!(!s.player.has_shield);
        assert_eq!(s.player.lives, PLAYER_LIVES);
    }

    #[test]
    fn extra_life_pickup_applies_immediately() {
        let mut s = session(ControlMode::Keyboard);
        let target = s.player.rect().center();
        s.powerups.falling.push(crate::sim::PowerUp {
            pos: Vec2::new(target.x, target.y - 1.0),
            kind: PowerUpKind::ExtraLife,
        });
        s.update(10_000, &FrameInput::default(), &NullAudio);
        assert_eq!(s.player.lives, PLAYER_LIVES + 1);
        assert!(!s.powerups.is_active(PowerUpKind::ExtraLife));
    }

    proptest! {
        /// Score never decreases, whatever the input stream does.
        #[test]
        fn score_is_monotonic(seed in 0u64..1000, fires in proptest::collection::vec(any::<bool>(), 0..200)) {
            let mut s = GameSession::new(LevelTable::builtin(), ControlMode::Keyboard, seed);
            let mut now = 10_000;
            let mut last_score = 0;
            for fire in fires {
                let input = FrameInput { fire, ..FrameInput::default() };
                s.update(now, &input, &NullAudio);
                prop_assert!(s.score() >= last_score);
                last_score = s.score();
                now += 16;
            }
        }
    }
}
