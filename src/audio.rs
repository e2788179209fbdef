//! Audio capability boundary
//!
//! The core never synthesizes or plays sound; it emits fire-and-forget
//! event notifications. Sinks are best-effort: a failing audio device is the
//! sink's problem and must never surface here.

/// Receiver for gameplay audio events. Every handler defaults to a no-op so
/// sinks implement only what they voice.
pub trait AudioSink {
    /// A player shot was fired.
    fn on_shoot(&self) {}
    /// An enemy or the boss took a hit.
    fn on_explosion(&self) {}
    /// The player was hit.
    fn on_hit(&self) {}
    /// A level was cleared or the run was won.
    fn on_victory(&self) {}
    /// The run ended in defeat.
    fn on_game_over(&self) {}
}

/// The silent sink.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {}
