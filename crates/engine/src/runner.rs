//! Frame runner - the caller side of a session.
//!
//! Owns the held-frame tracker and bindings, feeds a [`GameSession`] once per
//! frame and reports the finished-mode hand-off exactly once.

use log::info;

use crate::core::{GameMode, GameSession};
use crate::input::{HeldFrames, Key, KeyBindings};
use crate::settings::{Settings, SettingsError};
use crate::types::{GameEvent, InputSnapshot, ModeResult};

#[derive(Debug, Clone)]
pub struct Runner {
    session: GameSession<GameMode>,
    input: HeldFrames,
    bindings: KeyBindings,
    frames: u64,
    handed_off: bool,
}

impl Runner {
    pub fn new(session: GameSession<GameMode>, bindings: KeyBindings) -> Self {
        Self {
            session,
            input: HeldFrames::new(),
            bindings,
            frames: 0,
            handed_off: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        let bindings = settings.key_bindings()?;
        let session = GameSession::new(settings.mode, settings.session_config());
        Ok(Self::new(session, bindings))
    }

    pub fn session(&self) -> &GameSession<GameMode> {
        &self.session
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame from the set of keys currently down.
    pub fn frame(&mut self, elapsed_ms: f64, keys_down: &[Key]) -> Vec<GameEvent> {
        let input = self.input.update_keys(&self.bindings, keys_down);
        self.frame_input(elapsed_ms, &input)
    }

    /// Run one frame from an already built snapshot.
    pub fn frame_input(&mut self, elapsed_ms: f64, input: &InputSnapshot) -> Vec<GameEvent> {
        self.frames += 1;
        self.session.advance(elapsed_ms, input);
        self.session.take_events()
    }

    /// Drop all held keys, e.g. on focus loss.
    pub fn release_keys(&mut self) {
        self.input.release_all();
    }

    /// The value for the leaderboard, returned once after the mode finishes.
    pub fn handoff(&mut self) -> Option<ModeResult> {
        if self.handed_off {
            return None;
        }
        let result = self.session.result()?;
        self.handed_off = true;
        info!(
            "{} finished after {} frames: {:?}",
            self.session.mode().as_str(),
            self.frames,
            result
        );
        Some(result)
    }
}
