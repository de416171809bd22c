use crate::field::Row;
use crate::piece::ActivePiece;
use crate::types::{
    Banner, PieceKind, Rotation, Tile, BOARD_HEIGHT, BOARD_WIDTH, DEFAULT_BAG_LOOKAHEAD,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimersSnapshot {
    pub drop_ms: f64,
    pub lock_ms: f64,
    pub game_ms: f64,
    pub pause_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSnapshot {
    pub field: [Row; BOARD_HEIGHT as usize],
    pub active: ActiveSnapshot,
    pub ghost_y: i8,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub next_queue: Vec<PieceKind>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub paused: bool,
    pub game_failed: bool,
    pub finished: bool,
    pub banner: Option<Banner>,
    pub timers: TimersSnapshot,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.field = [[Tile::EMPTY; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.active = ActiveSnapshot::from(ActivePiece::spawn(PieceKind::O));
        self.ghost_y = 0;
        self.hold = None;
        self.can_hold = true;
        self.next_queue.clear();
        self.score = 0;
        self.level = 0;
        self.lines = 0;
        self.paused = false;
        self.game_failed = false;
        self.finished = false;
        self.banner = None;
        self.timers = TimersSnapshot::default();
    }

    /// Neither paused nor over.
    pub fn playable(&self) -> bool {
        !self.game_failed && !self.finished && !self.paused
    }

    /// Solid tiles of the field, for quick assertions and checksums.
    pub fn solid_count(&self) -> usize {
        self.field
            .iter()
            .flat_map(|row| row.iter())
            .filter(|tile| tile.solid)
            .count()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            field: [[Tile::EMPTY; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: ActiveSnapshot::from(ActivePiece::spawn(PieceKind::O)),
            ghost_y: 0,
            hold: None,
            can_hold: true,
            next_queue: Vec::with_capacity(DEFAULT_BAG_LOOKAHEAD),
            score: 0,
            level: 0,
            lines: 0,
            paused: false,
            game_failed: false,
            finished: false,
            banner: None,
            timers: TimersSnapshot::default(),
        };
        s.clear();
        s
    }
}
