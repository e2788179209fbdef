//! Gesture Invaders entry point
//!
//! Thin launcher: initializes logging and drives the simulation headless as
//! a smoke run. Windowed play needs a renderer/input integration on top of
//! the library; the core itself never draws.

use gesture_invaders::consts::*;
use gesture_invaders::sim::{Command, GameMachine, GameState};
use gesture_invaders::{FrameInput, LevelTable, NullAudio, NullTracker, Settings};

fn main() {
    env_logger::init();

    println!("GESTURE INVADERS");
    println!("Controls (with a windowed front end):");
    println!("- move your hand to steer the ship, close your fist to fire");
    println!("- or use the arrow keys and SPACE");
    println!("- P pauses, M mutes");
    println!();

    log::info!("no renderer integration in this binary; running a headless smoke demo");

    let mut machine = GameMachine::new(Settings::default(), LevelTable::builtin(), 0xC0FFEE);
    let mut tracker = NullTracker;
    let audio = NullAudio;

    machine.handle(Command::SkipSplash, 0);
    machine.handle(Command::Start, 0);

    // Ten simulated seconds at the nominal frame rate
    let frame_ms = 1_000 / FPS as u64;
    let mut now = 0;
    for _ in 0..FPS * 10 {
        now += frame_ms;
        let input = FrameInput::from_tracker(&mut tracker, machine.settings().hand_sensitivity);
        machine.update(now, &input, &audio);
    }

    match machine.session() {
        Some(session) => log::info!(
            "smoke demo done: state={:?}, level={}, score={}, lives={}",
            machine.state(),
            session.level(),
            session.score(),
            session.player().lives
        ),
        None => log::info!("smoke demo done: state={:?}", machine.state()),
    }

    if let GameState::GameOver { won } = machine.state() {
        println!("demo run ended early: {}", if won { "victory" } else { "defeat" });
    }
}
