//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no required dependencies, so they can be used
//! from the simulation core, the input tracker, and any presentation layer.
//!
//! # Field Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top)
//! - Rows above the field (negative row indices) are open spawn space.
//!
//! # Timing Constants
//!
//! Simulated time is measured in milliseconds and accumulated from the
//! per-frame elapsed time handed to the session; nothing reads a wall clock.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `LOCK_DELAY_MS` | 2000 | Grace period before a grounded piece locks |
//! | `SOFT_DROP_INTERVAL_MS` | 50 | Descent interval while soft dropping |
//! | `BANNER_MS` | 2000 | How long a line-clear banner stays visible |
//!
//! # DAS/ARR
//!
//! Horizontal auto-repeat is counted in frames, not milliseconds:
//!
//! - `DEFAULT_DAS`: 8 frames held before auto-repeat starts
//! - `DEFAULT_ARR`: 3 frames between auto-repeated moves
//!
//! # Examples
//!
//! ```
//! use monomino_types::{Action, InputSnapshot, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//!
//! let input = InputSnapshot::new().with(Action::HardDrop, 1);
//! assert!(input.pressed(Action::HardDrop));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Field width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Field height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Lock delay for a grounded piece.
pub const LOCK_DELAY_MS: f64 = 2000.0;

/// Descent interval while the soft-drop control is held (20 rows per second).
pub const SOFT_DROP_INTERVAL_MS: f64 = 1000.0 / 20.0;

/// Line-clear banner visibility.
pub const BANNER_MS: f64 = 2000.0;

/// Default delayed auto-shift, in frames.
pub const DEFAULT_DAS: u32 = 8;

/// Default auto-repeat rate, in frames.
pub const DEFAULT_ARR: u32 = 3;

/// Default number of upcoming pieces the bag keeps visible.
pub const DEFAULT_BAG_LOOKAHEAD: usize = 5;

/// Lines needed per level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Highest reachable level.
pub const MAX_LEVEL: u32 = 14;

/// Line clear scoring table, multiplied by the current level.
///
/// - 1 line: 100
/// - 2 lines: 300
/// - 3 lines: 500
/// - 4 lines: 800
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// T-Spin Double base points (multiplied by level).
pub const TSPIN_DOUBLE_SCORE: u32 = 1200;

/// T-Spin Triple base points (multiplied by level).
pub const TSPIN_TRIPLE_SCORE: u32 = 1600;

/// Points per row for a hard drop.
pub const HARD_DROP_POINTS_PER_ROW: u32 = 2;

/// Points per row for a soft drop.
pub const SOFT_DROP_POINTS_PER_ROW: u32 = 1;


/// The seven piece kinds
///
/// Each kind has a fixed color:
/// - **O**: Yellow
/// - **T**: Purple
/// - **S**: Green
/// - **Z**: Red
/// - **L**: Orange
/// - **J**: Blue
/// - **I**: Cyan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PieceKind {
    O,
    T,
    S,
    Z,
    L,
    J,
    I,
}

impl PieceKind {
    /// All kinds, in catalog order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::L,
        PieceKind::J,
        PieceKind::I,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use monomino_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "l" => Some(PieceKind::L),
            "j" => Some(PieceKind::J),
            "i" => Some(PieceKind::I),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::L => "l",
            PieceKind::J => "j",
            PieceKind::I => "i",
        }
    }
}

/// Tile colors. `None` marks an empty tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileColor {
    #[default]
    None,
    Blue,
    Orange,
    Yellow,
    Green,
    Cyan,
    Red,
    Purple,
}

/// A single field cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub color: TileColor,
    pub solid: bool,
}

impl Tile {
    pub const EMPTY: Tile = Tile {
        color: TileColor::None,
        solid: false,
    };

    /// A solid tile of the given color.
    pub const fn solid(color: TileColor) -> Self {
        Tile { color, solid: true }
    }
}

/// Rotation states
///
/// - **North**: Spawn orientation (index 0)
/// - **East**: Rotated 90° clockwise (index 1)
/// - **South**: Rotated 180° (index 2)
/// - **West**: Rotated 270° clockwise (index 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use monomino_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    ///
    /// # Examples
    ///
    /// ```
    /// use monomino_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotation index in `0..4`.
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Rotation for an index, taken modulo 4.
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// Add a number of clockwise quarter turns.
    pub fn turned(&self, quarter_turns: u8) -> Self {
        Self::from_index(self.index() + quarter_turns % 4)
    }
}

/// Direction of a rotation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// Clockwise quarter turns needed to reach the target.
    pub fn quarter_turns(&self) -> u8 {
        match self {
            RotationDirection::Clockwise => 1,
            RotationDirection::CounterClockwise => 3,
        }
    }
}

/// Logical player actions.
///
/// The core only sees these; physical keys are mapped onto them by the
/// input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Shift piece one cell left (auto-repeats)
    MoveLeft,
    /// Shift piece one cell right (auto-repeats)
    MoveRight,
    /// Soft drop while held
    MoveDown,
    /// Drop to the ghost row and lock
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Swap with the hold slot
    Hold,
    /// Toggle pause
    Pause,
}

impl Action {
    pub const COUNT: usize = 8;

    pub const ALL: [Action; Action::COUNT] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveDown,
        Action::HardDrop,
        Action::RotateCw,
        Action::RotateCcw,
        Action::Hold,
        Action::Pause,
    ];

    /// Stable position of the action in [`Action::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Action::MoveLeft => 0,
            Action::MoveRight => 1,
            Action::MoveDown => 2,
            Action::HardDrop => 3,
            Action::RotateCw => 4,
            Action::RotateCcw => 5,
            Action::Hold => 6,
            Action::Pause => 7,
        }
    }

    /// Parse action from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use monomino_types::Action;
    ///
    /// assert_eq!(Action::from_str("moveLeft"), Some(Action::MoveLeft));
    /// assert_eq!(Action::from_str("hardDrop"), Some(Action::HardDrop));
    /// assert_eq!(Action::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Action::MoveLeft),
            "moveright" => Some(Action::MoveRight),
            "movedown" | "softdrop" => Some(Action::MoveDown),
            "harddrop" => Some(Action::HardDrop),
            "rotatecw" => Some(Action::RotateCw),
            "rotateccw" => Some(Action::RotateCcw),
            "hold" => Some(Action::Hold),
            "pause" => Some(Action::Pause),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::MoveLeft => "moveLeft",
            Action::MoveRight => "moveRight",
            Action::MoveDown => "moveDown",
            Action::HardDrop => "hardDrop",
            Action::RotateCw => "rotateCw",
            Action::RotateCcw => "rotateCcw",
            Action::Hold => "hold",
            Action::Pause => "pause",
        }
    }
}

/// Frames-held counters for every action, as seen by one simulation step.
///
/// A counter is 0 while the control is released, 1 on the first frame it is
/// down, and increases by one per frame while it stays down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputSnapshot {
    held: [u32; Action::COUNT],
}

impl InputSnapshot {
    /// All controls released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, action: Action, frames: u32) -> Self {
        self.set(action, frames);
        self
    }

    pub fn set(&mut self, action: Action, frames: u32) {
        self.held[action.index()] = frames;
    }

    /// Frames the control has been held.
    pub fn held(&self, action: Action) -> u32 {
        self.held[action.index()]
    }

    pub fn is_down(&self, action: Action) -> bool {
        self.held(action) > 0
    }

    /// True only on the first frame of a press.
    pub fn pressed(&self, action: Action) -> bool {
        self.held(action) == 1
    }
}

/// Delayed auto-shift / auto-repeat rate, both in frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutoShift {
    das: u32,
    arr: u32,
}

impl AutoShift {
    /// Values below 1 are raised to 1.
    pub fn new(das: u32, arr: u32) -> Self {
        Self {
            das: das.max(1),
            arr: arr.max(1),
        }
    }

    pub fn das(&self) -> u32 {
        self.das
    }

    pub fn arr(&self) -> u32 {
        self.arr
    }

    /// Whether a control held for `frames` frames should shift this frame.
    ///
    /// The first frame always shifts; after that, shifting resumes once the
    /// control has been held `das` frames and repeats every `arr` frames.
    pub fn fires(&self, frames: u32) -> bool {
        frames == 1 || (frames >= self.das && (frames - self.das) % self.arr == 0)
    }
}

impl Default for AutoShift {
    fn default() -> Self {
        Self::new(DEFAULT_DAS, DEFAULT_ARR)
    }
}

/// Line-clear labels shown by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Banner {
    Single,
    Double,
    Triple,
    Tetris,
    TSpinDouble,
    TSpinTriple,
}

impl Banner {
    pub fn label(&self) -> &'static str {
        match self {
            Banner::Single => "Single",
            Banner::Double => "Double",
            Banner::Triple => "Triple",
            Banner::Tetris => "Tetris",
            Banner::TSpinDouble => "T-Spin Double",
            Banner::TSpinTriple => "T-Spin Triple",
        }
    }
}

/// Value handed to the leaderboard once a mode finishes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModeResult {
    /// Final score (Marathon, Ultra).
    Score(u32),
    /// Completion time in simulated milliseconds (Sprint).
    Time(f64),
}

/// Discrete events emitted by the session, drained by observers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    /// A piece was written into the field.
    PieceLocked {
        kind: PieceKind,
        x: i8,
        y: i8,
        rotation: Rotation,
    },
    /// One lock cleared at least one row.
    LinesCleared {
        rows: u8,
        banner: Banner,
        points: u32,
    },
    /// The hold slot was used.
    PieceHeld { held: PieceKind, active: PieceKind },
    /// A piece locked above the visible field.
    GameFailed,
    /// The mode's finish predicate became true.
    Finished(ModeResult),
}
