//! Pieces module - shape catalog and SRS kick tables
//!
//! Every kind stores a single base layout. The other three rotation states are
//! read through a coordinate transform, so the catalog stays small and the
//! rotations can never drift out of sync with the base grid.
//!
//! Kick offsets follow the SRS convention with y pointing up; the row delta
//! applied to a piece is `-dy`.
//! Reference: https://tetris.wiki/SRS

use arrayvec::ArrayVec;

use crate::types::{PieceKind, Rotation, RotationDirection, TileColor};

/// Offset of a single cell relative to the piece's bounding box, as `(x, y)`.
pub type CellOffset = (i8, i8);

/// Kick table class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KickClass {
    Jlstz,
    I,
    O,
}

/// Static shape definition for one piece kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceLayout {
    /// Side length of the square layout grid (2, 3 or 4).
    pub size: u8,
    /// Base grid, row 0 first. Only the top-left `size`x`size` block is used.
    pub cells: [[u8; 4]; 4],
    pub color: TileColor,
    pub kick_class: KickClass,
}

const O_LAYOUT: PieceLayout = PieceLayout {
    size: 2,
    cells: [[1, 1, 0, 0], [1, 1, 0, 0], [0; 4], [0; 4]],
    color: TileColor::Yellow,
    kick_class: KickClass::O,
};

const T_LAYOUT: PieceLayout = PieceLayout {
    size: 3,
    cells: [[0, 1, 0, 0], [1, 1, 1, 0], [0; 4], [0; 4]],
    color: TileColor::Purple,
    kick_class: KickClass::Jlstz,
};

const Z_LAYOUT: PieceLayout = PieceLayout {
    size: 3,
    cells: [[1, 1, 0, 0], [0, 1, 1, 0], [0; 4], [0; 4]],
    color: TileColor::Red,
    kick_class: KickClass::Jlstz,
};

const S_LAYOUT: PieceLayout = PieceLayout {
    size: 3,
    cells: [[0, 1, 1, 0], [1, 1, 0, 0], [0; 4], [0; 4]],
    color: TileColor::Green,
    kick_class: KickClass::Jlstz,
};

const L_LAYOUT: PieceLayout = PieceLayout {
    size: 3,
    cells: [[0, 0, 1, 0], [1, 1, 1, 0], [0; 4], [0; 4]],
    color: TileColor::Orange,
    kick_class: KickClass::Jlstz,
};

const J_LAYOUT: PieceLayout = PieceLayout {
    size: 3,
    cells: [[1, 0, 0, 0], [1, 1, 1, 0], [0; 4], [0; 4]],
    color: TileColor::Blue,
    kick_class: KickClass::Jlstz,
};

const I_LAYOUT: PieceLayout = PieceLayout {
    size: 4,
    cells: [[0; 4], [0; 4], [1, 1, 1, 1], [0; 4]],
    color: TileColor::Cyan,
    kick_class: KickClass::I,
};

/// Get the static layout for a piece kind
pub fn layout(kind: PieceKind) -> &'static PieceLayout {
    match kind {
        PieceKind::O => &O_LAYOUT,
        PieceKind::T => &T_LAYOUT,
        PieceKind::Z => &Z_LAYOUT,
        PieceKind::S => &S_LAYOUT,
        PieceKind::L => &L_LAYOUT,
        PieceKind::J => &J_LAYOUT,
        PieceKind::I => &I_LAYOUT,
    }
}

pub fn color(kind: PieceKind) -> TileColor {
    layout(kind).color
}

/// Whether local cell `(x, y)` is filled for `kind` in `rotation`.
///
/// Coordinates outside the layout grid are empty. O is rotation-invariant.
pub fn cell_at(kind: PieceKind, rotation: Rotation, x: u8, y: u8) -> bool {
    let layout = layout(kind);
    let n = layout.size;
    if x >= n || y >= n {
        return false;
    }

    let rotation = if kind == PieceKind::O {
        Rotation::North
    } else {
        rotation
    };

    let (row, col) = match rotation {
        Rotation::North => (y, x),
        Rotation::East => (n - 1 - x, y),
        Rotation::South => (n - 1 - y, n - 1 - x),
        Rotation::West => (x, n - 1 - y),
    };
    layout.cells[row as usize][col as usize] == 1
}

/// Filled cells of `kind` in `rotation`, relative to the bounding box,
/// in row-major order.
pub fn filled_cells(kind: PieceKind, rotation: Rotation) -> ArrayVec<CellOffset, 4> {
    let n = layout(kind).size;
    let mut cells = ArrayVec::new();
    for y in 0..n {
        for x in 0..n {
            if cell_at(kind, rotation, x, y) {
                cells.push((x as i8, y as i8));
            }
        }
    }
    cells
}

/// Spawn position `(x, y)` of the bounding box.
///
/// Every kind spawns with its filled cells above row 0.
pub fn spawn_position(kind: PieceKind) -> (i8, i8) {
    match kind {
        PieceKind::I => (3, -3),
        PieceKind::O => (4, -2),
        _ => (3, -2),
    }
}

/// Ordered rotation transitions, named `from` then `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KickTransition {
    ZeroOne,
    OneZero,
    OneTwo,
    TwoOne,
    TwoThree,
    ThreeTwo,
    ThreeZero,
    ZeroThree,
}

impl KickTransition {
    /// Transition taken when rotating out of `from` in `direction`.
    pub fn from_rotation(from: Rotation, direction: RotationDirection) -> Self {
        match (from, direction) {
            (Rotation::North, RotationDirection::Clockwise) => KickTransition::ZeroOne,
            (Rotation::East, RotationDirection::CounterClockwise) => KickTransition::OneZero,
            (Rotation::East, RotationDirection::Clockwise) => KickTransition::OneTwo,
            (Rotation::South, RotationDirection::CounterClockwise) => KickTransition::TwoOne,
            (Rotation::South, RotationDirection::Clockwise) => KickTransition::TwoThree,
            (Rotation::West, RotationDirection::CounterClockwise) => KickTransition::ThreeTwo,
            (Rotation::West, RotationDirection::Clockwise) => KickTransition::ThreeZero,
            (Rotation::North, RotationDirection::CounterClockwise) => KickTransition::ZeroThree,
        }
    }

    fn table_index(&self) -> usize {
        match self {
            KickTransition::ZeroOne => 0,
            KickTransition::OneZero => 1,
            KickTransition::OneTwo => 2,
            KickTransition::TwoOne => 3,
            KickTransition::TwoThree => 4,
            KickTransition::ThreeTwo => 5,
            KickTransition::ThreeZero => 6,
            KickTransition::ZeroThree => 7,
        }
    }
}

/// SRS wall kick data
/// Each entry is a (dx, dy) candidate, y up, tried in order
pub type KickTable = [[(i8, i8); 5]; 8];

/// JLSTZ kick table (shared by J, L, S, T, Z), indexed by [`KickTransition`]
const JLSTZ_KICKS: KickTable = [
    // 0->1
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 1->0
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 1->2
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 2->1
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 2->3
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 3->2
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 3->0
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 0->3
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
];

/// I kick table
const I_KICKS: KickTable = [
    // 0->1
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 1->0
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 1->2
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 2->1
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 2->3
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 3->2
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 3->0
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 0->3
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
];

/// O never kicks
const O_KICKS: [(i8, i8); 1] = [(0, 0)];

/// Candidate offsets for a class and transition, in trial order.
pub fn kick_offsets(class: KickClass, transition: KickTransition) -> &'static [(i8, i8)] {
    match class {
        KickClass::Jlstz => &JLSTZ_KICKS[transition.table_index()],
        KickClass::I => &I_KICKS[transition.table_index()],
        KickClass::O => &O_KICKS,
    }
}

/// Candidate offsets for rotating `kind` out of `from`.
pub fn kicks_for(
    kind: PieceKind,
    from: Rotation,
    direction: RotationDirection,
) -> &'static [(i8, i8)] {
    kick_offsets(
        layout(kind).kick_class,
        KickTransition::from_rotation(from, direction),
    )
}
