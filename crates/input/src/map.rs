//! Key mapping from physical keys to game actions.

use std::fmt;

use arrayvec::ArrayVec;

use crate::types::Action;

/// A physical key, as reported by whatever polls the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
    Enter,
    Space,
    /// Letter or digit keys, stored uppercase.
    Char(char),
}

impl Key {
    /// Parse a key name (case-insensitive): arrow names, `Escape`/`Esc`,
    /// `Enter`, `Space`, or a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use monomino_input::Key;
    ///
    /// assert_eq!(Key::from_name("left"), Some(Key::Left));
    /// assert_eq!(Key::from_name("z"), Some(Key::Char('Z')));
    /// assert_eq!(Key::from_name("F13"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return c
                .is_ascii_alphanumeric()
                .then(|| Key::Char(c.to_ascii_uppercase()));
        }

        match name.to_lowercase().as_str() {
            "left" => Some(Key::Left),
            "right" => Some(Key::Right),
            "up" => Some(Key::Up),
            "down" => Some(Key::Down),
            "escape" | "esc" => Some(Key::Escape),
            "enter" | "return" => Some(Key::Enter),
            "space" => Some(Key::Space),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Left => f.write_str("Left"),
            Key::Right => f.write_str("Right"),
            Key::Up => f.write_str("Up"),
            Key::Down => f.write_str("Down"),
            Key::Escape => f.write_str("Escape"),
            Key::Enter => f.write_str("Enter"),
            Key::Space => f.write_str("Space"),
            Key::Char(c) => write!(f, "{}", c),
        }
    }
}

/// Built-in binding sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BindingPreset {
    /// Arrows, Up = hard drop, C = hold, Z/X = rotate
    #[default]
    Default,
    /// A/S/D, W = hard drop, L = hold, J/K = rotate
    Wasd,
}

impl BindingPreset {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(BindingPreset::Default),
            "wasd" => Some(BindingPreset::Wasd),
            _ => None,
        }
    }

    pub fn bindings(&self) -> KeyBindings {
        match self {
            BindingPreset::Default => KeyBindings::from_pairs([
                (Action::MoveLeft, Key::Left),
                (Action::MoveRight, Key::Right),
                (Action::MoveDown, Key::Down),
                (Action::HardDrop, Key::Up),
                (Action::Hold, Key::Char('C')),
                (Action::RotateCw, Key::Char('Z')),
                (Action::RotateCcw, Key::Char('X')),
                (Action::Pause, Key::Escape),
            ]),
            BindingPreset::Wasd => KeyBindings::from_pairs([
                (Action::MoveLeft, Key::Char('A')),
                (Action::MoveRight, Key::Char('D')),
                (Action::MoveDown, Key::Char('S')),
                (Action::HardDrop, Key::Char('W')),
                (Action::Hold, Key::Char('L')),
                (Action::RotateCw, Key::Char('J')),
                (Action::RotateCcw, Key::Char('K')),
                (Action::Pause, Key::Escape),
            ]),
        }
    }
}

/// One key per action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBindings {
    keys: [Key; Action::COUNT],
}

impl KeyBindings {
    fn from_pairs(pairs: [(Action, Key); Action::COUNT]) -> Self {
        let mut keys = [Key::Escape; Action::COUNT];
        for (action, key) in pairs {
            keys[action.index()] = key;
        }
        Self { keys }
    }

    pub fn key_for(&self, action: Action) -> Key {
        self.keys[action.index()]
    }

    /// Rebind a single action.
    pub fn bind(&mut self, action: Action, key: Key) {
        self.keys[action.index()] = key;
    }

    /// Every action bound to `key`.
    pub fn actions_for(&self, key: Key) -> ArrayVec<Action, { Action::COUNT }> {
        Action::ALL
            .iter()
            .copied()
            .filter(|&action| self.key_for(action) == key)
            .collect()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        BindingPreset::Default.bindings()
    }
}
