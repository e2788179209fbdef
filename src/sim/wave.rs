//! Enemy formation and boss
//!
//! A wave owns either a grid formation of enemies or exactly one boss, never
//! both. The formation sweeps laterally and drops down as a unit when any
//! member touches a horizontal screen edge.

use glam::Vec2;
use rand::Rng;

use super::rect::Rect;
use crate::consts::*;
use crate::levels::LevelConfig;

/// Enemy variants. Points and shoot eligibility derive from the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Common,
    Advanced,
}

impl EnemyKind {
    pub fn points(&self) -> u64 {
        match self {
            EnemyKind::Common => POINTS_COMMON_ENEMY,
            EnemyKind::Advanced => POINTS_ADVANCED_ENEMY,
        }
    }

    /// Advanced enemies are always eligible shooters; common enemies are
    /// sampled per selection.
    pub fn always_shoots(&self) -> bool {
        matches!(self, EnemyKind::Advanced)
    }
}

/// One formation member. Identity is the wave-allocated `id`.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT))
    }

    /// Where this enemy's bullets spawn: lower-center of its box.
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + ENEMY_WIDTH / 2.0, self.pos.y + ENEMY_HEIGHT)
    }
}

/// The final-level boss. Sweeps horizontally, reversing inside fixed margins.
#[derive(Debug, Clone)]
pub struct Boss {
    pub pos: Vec2,
    pub health: u32,
    pub direction: f32,
}

impl Boss {
    fn new() -> Self {
        Self {
            pos: Vec2::new(SCREEN_WIDTH / 2.0 - BOSS_WIDTH / 2.0, BOSS_START_Y),
            health: BOSS_HEALTH,
            direction: 1.0,
        }
    }

    fn update(&mut self) {
        self.pos.x += BOSS_SPEED * self.direction;
        if self.pos.x <= BOSS_TURN_MARGIN
            || self.pos.x >= SCREEN_WIDTH - BOSS_WIDTH - BOSS_TURN_MARGIN
        {
            self.direction = -self.direction;
        }
    }

    /// Apply one unit of damage; true when this was the killing blow.
    fn take_damage(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }

    /// Remaining health as a fraction of the maximum, for health bars.
    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / BOSS_HEALTH as f32
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(BOSS_WIDTH, BOSS_HEIGHT))
    }

    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + BOSS_WIDTH / 2.0, self.pos.y + BOSS_HEIGHT)
    }
}

/// The collective enemy force for one level.
#[derive(Debug, Clone)]
pub struct EnemyWave {
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) boss: Option<Boss>,
    direction: f32,
    speed: f32,
    next_id: u32,
}

impl EnemyWave {
    /// Build the wave a level config describes: a centered boss for boss
    /// fights, otherwise a rows x cols grid where each member is
    /// independently advanced with the configured probability.
    pub fn new<R: Rng>(cfg: &LevelConfig, rng: &mut R) -> Self {
        let mut wave = Self {
            enemies: Vec::new(),
            boss: None,
            direction: 1.0,
            speed: cfg.enemy_speed,
            next_id: 1,
        };

        if cfg.boss_fight {
            wave.boss = Some(Boss::new());
            log::info!("wave \"{}\": boss fight, {} hp", cfg.name, BOSS_HEALTH);
        } else {
            for row in 0..cfg.rows {
                for col in 0..cfg.cols {
                    let pos = Vec2::new(
                        FORMATION_START_X + col as f32 * FORMATION_SPACING_X,
                        FORMATION_START_Y + row as f32 * FORMATION_SPACING_Y,
                    );
                    let kind = if rng.random::<f32>() < cfg.advanced_enemy_chance {
                        EnemyKind::Advanced
                    } else {
                        EnemyKind::Common
                    };
                    let id = wave.next_id;
                    wave.next_id += 1;
                    wave.enemies.push(Enemy { id, pos, kind });
                }
            }
            log::info!(
                "wave \"{}\": {}x{} formation, {} enemies",
                cfg.name,
                cfg.rows,
                cfg.cols,
                wave.enemies.len()
            );
        }

        wave
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn boss(&self) -> Option<&Boss> {
        self.boss.as_ref()
    }

    /// Advance one tick. The formation drop is an all-or-nothing event: one
    /// member at an edge flips the sweep and drops every member together.
    pub fn update(&mut self) {
        if let Some(boss) = &mut self.boss {
            boss.update();
            return;
        }

        let at_edge = self
            .enemies
            .iter()
            .any(|e| e.pos.x <= 0.0 || e.pos.x >= SCREEN_WIDTH - ENEMY_WIDTH);
        if at_edge {
            self.direction = -self.direction;
            for enemy in &mut self.enemies {
                enemy.pos.y += ENEMY_DROP_DISTANCE;
            }
        }

        for enemy in &mut self.enemies {
            enemy.pos.x += self.speed * self.direction;
        }
    }

    /// Pick a shooter and return its muzzle position.
    ///
    /// The boss always shoots. In a formation the eligible set is every
    /// advanced enemy plus a fresh ~30% sample of the common ones - the
    /// sample is re-rolled on every call, so a common enemy's eligibility is
    /// not stable across calls. Returns `None` when the set comes up empty.
    pub fn pick_shooter<R: Rng>(&self, rng: &mut R) -> Option<Vec2> {
        if let Some(boss) = &self.boss {
            return Some(boss.muzzle());
        }

        let eligible: Vec<&Enemy> = self
            .enemies
            .iter()
            .filter(|e| e.kind.always_shoots() || rng.random::<f32>() < COMMON_SHOOTER_CHANCE)
            .collect();
        if eligible.is_empty() {
            return None;
        }
        let pick = rng.random_range(0..eligible.len());
        Some(eligible[pick].muzzle())
    }

    /// Remove an enemy by identity and credit its points. Removing an id
    /// that is already gone is a no-op worth 0 points.
    pub fn remove_enemy(&mut self, id: u32) -> u64 {
        match self.enemies.iter().position(|e| e.id == id) {
            Some(idx) => self.enemies.remove(idx).kind.points(),
            None => 0,
        }
    }

    /// Apply one unit of damage to the boss. On the killing blow the boss is
    /// cleared and its points returned as `(true, points)`; otherwise
    /// `(false, 0)`.
    pub fn damage_boss(&mut self) -> (bool, u64) {
        match &mut self.boss {
            Some(boss) => {
                if boss.take_damage() {
                    self.boss = None;
                    (true, POINTS_BOSS)
                } else {
                    (false, 0)
                }
            }
            None => (false, 0),
        }
    }

    /// True only when no boss remains and the formation list is empty.
    pub fn is_empty(&self) -> bool {
        self.boss.is_none() && self.enemies.is_empty()
    }

    /// True when any formation member's lower edge has crossed the defeat
    /// line near the bottom of the screen. The boss never triggers this.
    pub fn reached_bottom(&self) -> bool {
        self.enemies
            .iter()
            .any(|e| e.pos.y + ENEMY_HEIGHT >= ENEMY_BOTTOM_LINE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelTable;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    fn formation_cfg() -> LevelConfig {
        LevelTable::builtin().get(1).clone()
    }

    fn boss_cfg() -> LevelConfig {
        LevelTable::builtin().get(4).clone()
    }

    #[test]
    fn formation_has_rows_times_cols_enemies() {
        let table = LevelTable::builtin();
        for level in 1..=table.max_level() {
            let cfg = table.get(level);
            let wave = EnemyWave::new(cfg, &mut rng());
            if cfg.boss_fight {
                assert!(wave.boss().is_some());
                assert!(wave.enemies().is_empty());
            } else {
                assert!(wave.boss().is_none());
                assert_eq!(wave.enemies().len(), (cfg.rows * cfg.cols) as usize);
            }
        }
    }

    #[test]
    fn edge_contact_flips_and_drops_whole_formation() {
        let mut wave = EnemyWave::new(&formation_cfg(), &mut rng());
        let before: Vec<f32> = wave.enemies().iter().map(|e| e.pos.y).collect();

        // Park the leftmost enemy on the edge
        wave.enemies[0].pos.x = 0.0;
        wave.update();

        assert_eq!(wave.direction, -1.0);
        // Every member dropped, not just the edge one
        for (enemy, y_before) in wave.enemies().iter().zip(before) {
            assert_eq!(enemy.pos.y, y_before + ENEMY_DROP_DISTANCE);
        }
    }

    #[test]
    fn remove_enemy_is_idempotent() {
        let mut wave = EnemyWave::new(&formation_cfg(), &mut rng());
        let id = wave.enemies()[0].id;
        let kind = wave.enemies()[0].kind;
        assert_eq!(wave.remove_enemy(id), kind.points());
        assert_eq!(wave.remove_enemy(id), 0);
    }

    #[test]
    fn boss_takes_twenty_hits() {
        let mut wave = EnemyWave::new(&boss_cfg(), &mut rng());
        for _ in 0..BOSS_HEALTH - 1 {
            assert_eq!(wave.damage_boss(), (false, 0));
        }
        assert_eq!(wave.damage_boss(), (true, POINTS_BOSS));
        assert!(wave.boss().is_none());
        assert!(wave.is_empty());
        // Further damage is a no-op
        assert_eq!(wave.damage_boss(), (false, 0));
    }

    #[test]
    fn boss_reverses_at_margins() {
        let mut wave = EnemyWave::new(&boss_cfg(), &mut rng());
        wave.boss.as_mut().unwrap().pos.x = BOSS_TURN_MARGIN;
        wave.boss.as_mut().unwrap().direction = -1.0;
        wave.update();
        assert_eq!(wave.boss().unwrap().direction, 1.0);
    }

    #[test]
    fn boss_always_shoots_and_never_reaches_bottom() {
        let wave = EnemyWave::new(&boss_cfg(), &mut rng());
        assert!(wave.pick_shooter(&mut rng()).is_some());
        assert!(!wave.reached_bottom());
    }

    #[test]
    fn empty_only_without_boss_and_enemies() {
        let mut wave = EnemyWave::new(&formation_cfg(), &mut rng());
        assert!(!wave.is_empty());
        let ids: Vec<u32> = wave.enemies().iter().map(|e| e.id).collect();
        for id in ids {
            wave.remove_enemy(id);
        }
        assert!(wave.is_empty());
    }

    #[test]
    fn reached_bottom_at_defeat_line() {
        let mut wave = EnemyWave::new(&formation_cfg(), &mut rng());
        assert!(!wave.reached_bottom());
        wave.enemies[0].pos.y = ENEMY_BOTTOM_LINE - ENEMY_HEIGHT;
        assert!(wave.reached_bottom());
    }

    #[test]
    fn advanced_chance_zero_yields_all_common() {
        let wave = EnemyWave::new(&formation_cfg(), &mut rng());
        assert!(wave.enemies().iter().all(|e| e.kind == EnemyKind::Common));
    }
}
