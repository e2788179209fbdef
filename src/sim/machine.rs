//! Coarse game states and the timers between them
//!
//! The machine wraps a session and decides which screen the game is on:
//! splash, menu, instructions, the timed level transition, play, pause, and
//! the game-over display. Discrete UI commands arrive from the external
//! window layer; per-frame input only matters while playing.

use super::session::{GameSession, SessionOutcome};
use crate::audio::{AudioSink, NullAudio};
use crate::consts::*;
use crate::highscores::HighScores;
use crate::input::FrameInput;
use crate::levels::LevelTable;
use crate::settings::Settings;

/// The coarse game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Splash,
    Menu,
    Instructions,
    /// Timed interstitial before a level starts
    LevelTransition,
    Playing,
    Paused,
    GameOver { won: bool },
}

/// Discrete UI commands from the window layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Any-key skip of the splash screen
    SkipSplash,
    /// Menu: start a new game
    Start,
    /// Menu: open the instructions screen
    ShowInstructions,
    /// Instructions: back to the menu
    Back,
    TogglePause,
    ToggleAudio,
}

/// The top-level game object a host drives: one `handle` per UI command,
/// one `update` per frame.
#[derive(Debug)]
pub struct GameMachine {
    state: GameState,
    session: Option<GameSession>,
    settings: Settings,
    table: LevelTable,
    high_scores: HighScores,
    /// Timestamp the current state was entered; None until first observed
    state_entered_ms: Option<u64>,
    next_seed: u64,
}

impl GameMachine {
    pub fn new(settings: Settings, table: LevelTable, seed: u64) -> Self {
        Self {
            state: GameState::Splash,
            session: None,
            settings,
            table,
            high_scores: HighScores::new(),
            state_entered_ms: None,
            next_seed: seed,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Apply a discrete UI command. Commands that don't apply to the
    /// current state are ignored.
    pub fn handle(&mut self, cmd: Command, now_ms: u64) {
        match (cmd, self.state) {
            (Command::SkipSplash, GameState::Splash) => self.enter(GameState::Menu, now_ms),
            (Command::Start, GameState::Menu) => {
                let seed = self.next_seed;
                self.next_seed = self.next_seed.wrapping_add(1);
                self.session = Some(GameSession::new(
                    self.table.clone(),
                    self.settings.control_mode,
                    seed,
                ));
                self.enter(GameState::LevelTransition, now_ms);
            }
            (Command::ShowInstructions, GameState::Menu) => {
                self.enter(GameState::Instructions, now_ms)
            }
            (Command::Back, GameState::Instructions) => self.enter(GameState::Menu, now_ms),
            (Command::TogglePause, GameState::Playing) => self.enter(GameState::Paused, now_ms),
            (Command::TogglePause, GameState::Paused) => self.enter(GameState::Playing, now_ms),
            (Command::ToggleAudio, _) => {
                self.settings.audio_enabled = !self.settings.audio_enabled;
            }
            _ => {}
        }
    }

    /// Advance one frame. While paused the session is left untouched, so
    /// entity positions and timers freeze; only commands are observed.
    pub fn update(&mut self, now_ms: u64, input: &FrameInput, audio: &dyn AudioSink) {
        let entered = *self.state_entered_ms.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(entered);

        match self.state {
            GameState::Splash => {
                if elapsed >= SPLASH_MS {
                    self.enter(GameState::Menu, now_ms);
                }
            }
            GameState::Menu | GameState::Instructions | GameState::Paused => {}
            GameState::LevelTransition => {
                if elapsed >= LEVEL_TRANSITION_MS {
                    if let Some(session) = &mut self.session {
                        session.start_level();
                    }
                    self.enter(GameState::Playing, now_ms);
                }
            }
            GameState::Playing => {
                let sink: &dyn AudioSink = if self.settings.audio_enabled {
                    audio
                } else {
                    &NullAudio
                };
                let outcome = match &mut self.session {
                    Some(session) => session.update(now_ms, input, sink),
                    None => SessionOutcome::Continue,
                };
                match outcome {
                    SessionOutcome::Continue => {}
                    SessionOutcome::LevelCleared => {
                        self.enter(GameState::LevelTransition, now_ms)
                    }
                    SessionOutcome::Victory => self.finish(true, now_ms),
                    SessionOutcome::Defeat => self.finish(false, now_ms),
                }
            }
            GameState::GameOver { .. } => {
                if elapsed >= GAME_OVER_MS {
                    self.enter(GameState::Menu, now_ms);
                }
            }
        }
    }

    /// Record the run on the leaderboard and show the game-over screen.
    fn finish(&mut self, won: bool, now_ms: u64) {
        if let Some(session) = &self.session {
            log::info!(
                "game over: won={}, score={}, level={}",
                won,
                session.score(),
                session.level()
            );
            self.high_scores
                .add_score(session.score(), session.level(), won);
        }
        self.enter(GameState::GameOver { won }, now_ms);
    }

    fn enter(&mut self, state: GameState, now_ms: u64) {
        log::debug!("state {:?} -> {:?}", self.state, state);
        self.state = state;
        self.state_entered_ms = Some(now_ms);
    }
}
