//! Playfield grid, collision detection and line clearing

use crate::tetromino::{Rgb, Tetromino};
use std::fmt;

/// Standard playfield dimensions
pub const PLAYFIELD_WIDTH: usize = 10;
pub const PLAYFIELD_HEIGHT: usize = 20;

/// A cell on the playfield - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Rgb),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// Cell access outside the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    pub x: i32,
    pub y: i32,
}

impl fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cell ({}, {}) is outside the {}x{} playfield",
            self.x, self.y, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT
        )
    }
}

impl std::error::Error for OutOfBounds {}

type Row = [Cell; PLAYFIELD_WIDTH];

const EMPTY_ROW: Row = [Cell::Empty; PLAYFIELD_WIDTH];

/// The playfield
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playfield {
    /// Grid stored as [row][col], row 0 is the top, row increases downward
    cells: [Row; PLAYFIELD_HEIGHT],
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new()
    }
}

impl Playfield {
    /// Create a new empty playfield
    pub fn new() -> Self {
        Self {
            cells: [EMPTY_ROW; PLAYFIELD_HEIGHT],
        }
    }

    pub fn width(&self) -> usize {
        PLAYFIELD_WIDTH
    }

    pub fn height(&self) -> usize {
        PLAYFIELD_HEIGHT
    }

    /// Convert (x, y) to grid indices if inside the playfield
    fn index(x: i32, y: i32) -> Option<(usize, usize)> {
        let col = usize::try_from(x).ok().filter(|&c| c < PLAYFIELD_WIDTH)?;
        let row = usize::try_from(y).ok().filter(|&r| r < PLAYFIELD_HEIGHT)?;
        Some((row, col))
    }

    /// Get the cell at column `x`, row `y`
    pub fn get_cell(&self, x: i32, y: i32) -> Result<Cell, OutOfBounds> {
        let (row, col) = Self::index(x, y).ok_or(OutOfBounds { x, y })?;
        Ok(self.cells[row][col])
    }

    /// Set the cell at column `x`, row `y`
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) -> Result<(), OutOfBounds> {
        let (row, col) = Self::index(x, y).ok_or(OutOfBounds { x, y })?;
        self.cells[row][col] = cell;
        Ok(())
    }

    /// Check that every block of the tetromino is inside the grid and on an
    /// empty cell. There is no hidden area above row 0.
    pub fn is_valid_position(&self, tetromino: &Tetromino) -> bool {
        tetromino
            .absolute_blocks()
            .iter()
            .all(|&(x, y)| matches!(self.get_cell(x, y), Ok(Cell::Empty)))
    }

    /// Bake a tetromino into the grid. Blocks outside the grid are skipped;
    /// the caller validates the position beforehand.
    pub fn add_tetromino(&mut self, tetromino: &Tetromino) {
        let cell = Cell::Filled(tetromino.color());
        for (x, y) in tetromino.absolute_blocks() {
            if let Some((row, col)) = Self::index(x, y) {
                self.cells[row][col] = cell;
            }
        }
    }

    /// Indices of completely filled rows, ascending
    pub fn get_complete_rows(&self) -> Vec<usize> {
        (0..PLAYFIELD_HEIGHT)
            .filter(|&row| self.is_row_full(row))
            .collect()
    }

    /// Remove the given rows and shift everything above them down.
    ///
    /// The result is the removed-row count of empty rows on top, followed by
    /// the surviving rows in their original order. Duplicate and out-of-range
    /// indices are ignored.
    pub fn clear_rows(&mut self, rows: &[usize]) {
        let mut remove = [false; PLAYFIELD_HEIGHT];
        for &row in rows {
            if row < PLAYFIELD_HEIGHT {
                remove[row] = true;
            }
        }

        // Compact surviving rows towards the bottom
        let mut write_row = PLAYFIELD_HEIGHT;
        for read_row in (0..PLAYFIELD_HEIGHT).rev() {
            if !remove[read_row] {
                write_row -= 1;
                if write_row != read_row {
                    self.cells[write_row] = self.cells[read_row];
                }
            }
        }

        for row in &mut self.cells[..write_row] {
            *row = EMPTY_ROW;
        }
    }

    /// Check if the top row holds any block
    pub fn is_game_over(&self) -> bool {
        self.cells[0].iter().any(|cell| cell.is_filled())
    }

    /// Check if the playfield holds no blocks at all
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.cells.iter().enumerate()
    }

    fn is_row_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }
}
