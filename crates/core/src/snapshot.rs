//! Snapshots handed to the host after each state change

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::matrix::Matrix;
use crate::types::{Cell, CellState};

/// The playable region of the board, row-major, `(0, 0)` top-left
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardSnapshot {
    width: u8,
    height: u8,
    cells: Vec<Cell>,
}

impl BoardSnapshot {
    pub fn new(width: u8, height: u8, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), width as usize * height as usize);
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.width as usize || y >= self.height as usize {
            return None;
        }
        self.cells.get(y * self.width as usize + x).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state == state).count()
    }
}

/// A message for the host, queued by the game and drained with
/// [`Game::take_outbound`](crate::Game::take_outbound)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "data", rename_all = "camelCase"))]
pub enum Outbound {
    /// Full board after a change
    Board(BoardSnapshot),
    /// The piece that will spawn next
    Preview(Matrix),
}
