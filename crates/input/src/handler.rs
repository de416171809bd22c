//! Held-frame tracking.
//!
//! Turns "which keys are down this frame" into the per-action frame counters
//! the session consumes. A counter is 1 on the first frame of a press, grows by
//! one per frame while held, and drops to 0 on release.

use crate::map::{Key, KeyBindings};
use crate::types::{Action, InputSnapshot};

#[derive(Debug, Clone, Default)]
pub struct HeldFrames {
    held: [u32; Action::COUNT],
}

impl HeldFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame. `is_down` reports whether each action's control is down.
    pub fn update(&mut self, mut is_down: impl FnMut(Action) -> bool) -> InputSnapshot {
        for action in Action::ALL {
            let count = &mut self.held[action.index()];
            *count = if is_down(action) {
                count.saturating_add(1)
            } else {
                0
            };
        }
        self.snapshot()
    }

    /// Advance one frame from a set of physical keys.
    pub fn update_keys(&mut self, bindings: &KeyBindings, keys_down: &[Key]) -> InputSnapshot {
        self.update(|action| keys_down.contains(&bindings.key_for(action)))
    }

    /// Counters as of the last update.
    pub fn snapshot(&self) -> InputSnapshot {
        Action::ALL
            .iter()
            .fold(InputSnapshot::new(), |snap, &action| {
                snap.with(action, self.held[action.index()])
            })
    }

    pub fn held(&self, action: Action) -> u32 {
        self.held[action.index()]
    }

    /// Treat every control as released, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held = [0; Action::COUNT];
    }
}
