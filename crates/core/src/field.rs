//! Field module - the 10x20 playing grid
//!
//! Tiles are addressed `[row][col]` with row 0 at the top. Callers use signed
//! `(x, y)` coordinates (`x` = column, `y` = row) because pieces may sit above
//! the field while spawning; anything with a negative row is open space.

use arrayvec::ArrayVec;

use crate::types::{Tile, TileColor, BOARD_HEIGHT, BOARD_WIDTH};

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// One row of tiles.
pub type Row = [Tile; WIDTH];

/// The playing field - 10 columns x 20 rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    tiles: [Row; HEIGHT],
}

impl Field {
    /// Create a new empty field
    pub fn new() -> Self {
        Self {
            tiles: [[Tile::EMPTY; WIDTH]; HEIGHT],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<(usize, usize)> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize, x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get tile at column `x`, row `y`.
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Tile> {
        Self::index(x, y).map(|(row, col)| self.tiles[row][col])
    }

    /// Set tile at column `x`, row `y`.
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, tile: Tile) -> bool {
        match Self::index(x, y) {
            Some((row, col)) => {
                self.tiles[row][col] = tile;
                true
            }
            None => false,
        }
    }

    /// Fill a tile with a solid block of `color`.
    pub fn fill(&mut self, x: i8, y: i8, color: TileColor) -> bool {
        self.set(x, y, Tile::solid(color))
    }

    /// In bounds and solid.
    pub fn is_solid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(tile) if tile.solid)
    }

    /// Collision rule for a single piece cell.
    ///
    /// A cell is blocked below the last row or outside the side walls. Above
    /// the field (negative rows) nothing blocks; inside it, solid tiles do.
    pub fn blocks(&self, x: i8, y: i8) -> bool {
        if y >= BOARD_HEIGHT as i8 {
            return true;
        }
        if x < 0 || x >= BOARD_WIDTH as i8 {
            return true;
        }
        y >= 0 && self.is_solid(x, y)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        match self.tiles.get(y) {
            Some(row) => row.iter().all(|tile| tile.solid),
            None => false,
        }
    }

    /// Remove row `y`, shift every row above it down by one and insert an
    /// empty row at the top.
    /// Returns false if `y` is out of bounds
    pub fn clear_row(&mut self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        self.tiles.copy_within(0..y, 1);
        self.tiles[0] = [Tile::EMPTY; WIDTH];
        true
    }

    /// Clear full rows inside `[top, top + height)`, scanning top to bottom.
    ///
    /// The range is clamped to the field. Returns the cleared row indices in
    /// scan order. Because clearing shifts rows downward, a row below a cleared
    /// one keeps its index, so a single top-to-bottom pass sees every row.
    pub fn clear_full_rows_in(&mut self, top: i8, height: u8) -> ArrayVec<usize, 4> {
        let mut cleared = ArrayVec::new();
        let start = top.max(0) as usize;
        let end = (top as i16 + height as i16).clamp(0, HEIGHT as i16) as usize;

        for y in start..end {
            if self.is_row_full(y) && cleared.try_push(y).is_ok() {
                self.clear_row(y);
            }
        }
        cleared
    }

    /// All rows, top first.
    pub fn rows(&self) -> &[Row; HEIGHT] {
        &self.tiles
    }

    /// Number of solid tiles on the field.
    pub fn solid_count(&self) -> usize {
        self.tiles
            .iter()
            .flat_map(|row| row.iter())
            .filter(|tile| tile.solid)
            .count()
    }

    /// Reset every tile to empty.
    pub fn clear(&mut self) {
        self.tiles = [[Tile::EMPTY; WIDTH]; HEIGHT];
    }

    /// Fill a whole row except the listed columns.
    ///
    /// Convenience for building garbage and test setups.
    pub fn fill_row_except(&mut self, y: i8, holes: &[i8], color: TileColor) {
        for x in 0..BOARD_WIDTH as i8 {
            if !holes.contains(&x) {
                self.fill(x, y, color);
            }
        }
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}
