//! Board module - the locked-cell grid
//!
//! The board is a 10x20 grid where each cell can be empty or filled with a piece kind.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//! Cells with y < 0 sit above the visible field: they never collide and are
//! discarded when a piece locks.

use arrayvec::ArrayVec;

use crate::types::{Field, EMPTY_CELL, FIELD_HEIGHT, FIELD_WIDTH};

use super::pieces::{PieceKind, Tetromino};

/// Total number of cells on the board
const BOARD_SIZE: usize = FIELD_WIDTH * FIELD_HEIGHT;

/// A cell on the board - `None` when empty
pub type Cell = Option<PieceKind>;

/// Rows removed by one clear, bottom to top
pub type ClearedRows = ArrayVec<usize, FIELD_HEIGHT>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= FIELD_WIDTH as i8 || y < 0 || y >= FIELD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * FIELD_WIDTH + (x as usize))
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Whether a mino at (x, y) would be illegal
    ///
    /// Walls and the floor block; rows above the field never do.
    pub fn blocks(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= FIELD_WIDTH as i8 || y >= FIELD_HEIGHT as i8 {
            return true;
        }
        y >= 0 && self.is_occupied(x, y)
    }

    /// Whether any mino of `piece` is blocked
    pub fn collides(&self, piece: &Tetromino) -> bool {
        piece.cells().iter().any(|&(x, y)| self.blocks(x, y))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= FIELD_HEIGHT {
            return false;
        }
        let start = y * FIELD_WIDTH;
        self.cells[start..start + FIELD_WIDTH]
            .iter()
            .all(|cell| cell.is_some())
    }

    /// Clear all full rows and return the row indices that were cleared (sorted bottom to top)
    ///
    /// Surviving rows are compacted downward in a single pass and the
    /// vacated rows at the top are emptied.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared_rows = ClearedRows::new();
        let mut write_y = FIELD_HEIGHT;

        // Scan from bottom to top
        for read_y in (0..FIELD_HEIGHT).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * FIELD_WIDTH;
                    let dst_start = write_y * FIELD_WIDTH;
                    self.cells
                        .copy_within(src_start..src_start + FIELD_WIDTH, dst_start);
                }
            }
        }

        // Clear the remaining rows at the top
        for cell in &mut self.cells[..write_y * FIELD_WIDTH] {
            *cell = None;
        }

        cleared_rows
    }

    /// Burn a piece's minos into the board
    ///
    /// Minos outside the field are dropped. Returns how many were written.
    pub fn lock_piece(&mut self, piece: &Tetromino) -> usize {
        piece
            .cells()
            .iter()
            .filter(|&&(x, y)| self.set(x, y, Some(piece.kind)))
            .count()
    }

    /// Number of filled cells
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells = [None; BOARD_SIZE];
    }

    /// Copy the board into a field matrix as piece codes
    pub fn write_field(&self, out: &mut Field) {
        for (row, cells) in out.iter_mut().zip(self.cells.chunks_exact(FIELD_WIDTH)) {
            for (dst, cell) in row.iter_mut().zip(cells) {
                *dst = cell.map_or(EMPTY_CELL, PieceKind::code);
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
