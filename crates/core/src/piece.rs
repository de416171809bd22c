//! Active piece - the falling piece and its collision queries
//!
//! `will_collide` is the single primitive behind shifting, rotating,
//! gravity, the ghost row and hard drop: it checks a hypothetical offset
//! against the field without touching the piece.

use arrayvec::ArrayVec;

use crate::field::Field;
use crate::pieces::{filled_cells, kicks_for, spawn_position};
use crate::types::{PieceKind, Rotation, RotationDirection};

/// A piece instance on (or above) the field.
///
/// `x`/`y` address the top-left corner of the layout's bounding box; `y` is
/// negative while the piece is still above the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub x: i8,
    pub y: i8,
    pub rotation: Rotation,
}

impl ActivePiece {
    pub fn new(kind: PieceKind, x: i8, y: i8, rotation: Rotation) -> Self {
        Self {
            kind,
            x,
            y,
            rotation,
        }
    }

    /// A piece at its kind's spawn position, rotation 0.
    pub fn spawn(kind: PieceKind) -> Self {
        let (x, y) = spawn_position(kind);
        Self::new(kind, x, y, Rotation::North)
    }

    /// Field coordinates `(x, y)` of the filled cells.
    pub fn cells(&self) -> ArrayVec<(i8, i8), 4> {
        self.cells_at(0, 0, self.rotation)
    }

    fn cells_at(&self, dx: i8, dy: i8, rotation: Rotation) -> ArrayVec<(i8, i8), 4> {
        filled_cells(self.kind, rotation)
            .into_iter()
            .map(|(cx, cy)| (self.x + dx + cx, self.y + dy + cy))
            .collect()
    }

    /// Would the piece collide if moved by `(dx, dy)` and turned
    /// `rotation_offset` quarter turns clockwise?
    pub fn will_collide(&self, field: &Field, dx: i8, dy: i8, rotation_offset: u8) -> bool {
        let rotation = self.rotation.turned(rotation_offset);
        self.cells_at(dx, dy, rotation)
            .into_iter()
            .any(|(x, y)| field.blocks(x, y))
    }

    /// Does the piece collide where it is?
    pub fn collides(&self, field: &Field) -> bool {
        self.will_collide(field, 0, 0, 0)
    }

    pub fn can_move_down(&self, field: &Field) -> bool {
        !self.will_collide(field, 0, 1, 0)
    }

    /// Shift horizontally by `dx`. Returns false and leaves the piece alone on collision.
    pub fn try_shift(&mut self, field: &Field, dx: i8) -> bool {
        if self.will_collide(field, dx, 0, 0) {
            return false;
        }
        self.x += dx;
        true
    }

    /// Move down one row if possible.
    pub fn try_move_down(&mut self, field: &Field) -> bool {
        if !self.can_move_down(field) {
            return false;
        }
        self.y += 1;
        true
    }

    /// Rotate with SRS kicks.
    ///
    /// Candidates are tried in table order; the first that fits is applied
    /// together with the new rotation and returned as its `(dx, dy)` table
    /// entry. Returns None with no state change when every candidate collides.
    pub fn try_rotate(&mut self, field: &Field, direction: RotationDirection) -> Option<(i8, i8)> {
        let turns = direction.quarter_turns();
        let kicks = kicks_for(self.kind, self.rotation, direction);

        let offset = kicks
            .iter()
            .copied()
            .find(|&(dx, dy)| !self.will_collide(field, dx, -dy, turns))?;

        self.x += offset.0;
        self.y -= offset.1;
        self.rotation = self.rotation.turned(turns);
        Some(offset)
    }

    /// Lowest row the piece can fall to from its current position.
    pub fn ghost_row(&self, field: &Field) -> i8 {
        let mut dy = 0;
        while !self.will_collide(field, 0, dy + 1, 0) {
            dy += 1;
        }
        self.y + dy
    }

    /// A copy of this piece moved to its ghost row.
    pub fn ghost(&self, field: &Field) -> Self {
        Self {
            y: self.ghost_row(field),
            ..*self
        }
    }
}
