//! Board module - the persistent cell grid
//!
//! Storage is a flat row-major array covering the playable region plus a
//! hidden buffer margin of `buffer` cells on every side. Coordinates are
//! storage coordinates: `x` ranges `0..cols`, `y` ranges `0..rows`, `y`
//! increasing downward. The playable region is
//! `left_border()..=right_border()` by `top()..=bottom_border()`.
//!
//! Access outside the storage is an invariant violation and is reported as
//! [`CoreError::OutOfBounds`], never clamped.

use crate::error::{CoreError, Result};
use crate::snapshot::BoardSnapshot;
use crate::types::{Cell, CellState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    buffer: u8,
    /// Flat array of cells, row-major order (y * cols + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board with a `width` x `height` playable region.
    pub fn new(width: u8, height: u8, buffer: u8) -> Self {
        let cols = width as usize + 2 * buffer as usize;
        let rows = height as usize + 2 * buffer as usize;
        Self {
            width,
            height,
            buffer,
            cells: vec![Cell::EMPTY; cols * rows],
        }
    }

    /// Playable width in cells
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Playable height in cells
    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn buffer_size(&self) -> u8 {
        self.buffer
    }

    /// Storage width, margin included
    pub fn cols(&self) -> usize {
        self.width as usize + 2 * self.buffer as usize
    }

    /// Storage height, margin included
    pub fn rows(&self) -> usize {
        self.height as usize + 2 * self.buffer as usize
    }

    /// Leftmost playable column
    pub fn left_border(&self) -> i16 {
        self.buffer as i16
    }

    /// Rightmost playable column (`cols - buffer - 1`)
    pub fn right_border(&self) -> i16 {
        (self.cols() - self.buffer as usize - 1) as i16
    }

    /// Topmost playable row
    pub fn top(&self) -> i16 {
        self.buffer as i16
    }

    /// Bottommost playable row (`rows - buffer - 1`)
    pub fn bottom_border(&self) -> i16 {
        (self.rows() - self.buffer as usize - 1) as i16
    }

    #[inline(always)]
    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.cols() || y as usize >= self.rows() {
            return None;
        }
        Some(y as usize * self.cols() + x as usize)
    }

    fn out_of_bounds(&self, x: i16, y: i16) -> CoreError {
        tracing::error!(x, y, cols = self.cols(), rows = self.rows(), "board access out of bounds");
        CoreError::OutOfBounds {
            x,
            y,
            cols: self.cols(),
            rows: self.rows(),
        }
    }

    pub fn get(&self, x: i16, y: i16) -> Result<Cell> {
        match self.index(x, y) {
            Some(idx) => Ok(self.cells[idx]),
            None => Err(self.out_of_bounds(x, y)),
        }
    }

    pub fn set(&mut self, x: i16, y: i16, cell: Cell) -> Result<()> {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                Ok(())
            }
            None => Err(self.out_of_bounds(x, y)),
        }
    }

    /// Whether `(x, y)` lies inside the playable region
    pub fn is_playable(&self, x: i16, y: i16) -> bool {
        (self.left_border()..=self.right_border()).contains(&x)
            && (self.top()..=self.bottom_border()).contains(&y)
    }

    /// Storage row `y` as a slice
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        let cols = self.cols();
        self.cells.get(y * cols..(y + 1) * cols)
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> Option<&mut [Cell]> {
        let cols = self.cols();
        self.cells.get_mut(y * cols..(y + 1) * cols)
    }

    /// Replace a storage row with empty cells.
    pub fn clear_row(&mut self, y: i16) -> Result<()> {
        match usize::try_from(y).ok().and_then(|y| self.row_mut(y)) {
            Some(row) => {
                row.fill(Cell::EMPTY);
                Ok(())
            }
            None => Err(self.out_of_bounds(0, y)),
        }
    }

    /// Erase every window cell left over from the previous paint of the
    /// active piece. Locked and player cells are untouched.
    pub fn clear_window_tiles(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| c.is_window()) {
            *cell = Cell::EMPTY;
        }
    }

    /// Promote every player cell to a locked cell of the same color.
    ///
    /// Returns how many cells were locked; a second call without a new
    /// piece in between locks nothing.
    pub fn lock_player_cells(&mut self) -> usize {
        let mut locked = 0;
        for cell in self.cells.iter_mut().filter(|c| c.is_player()) {
            cell.state = CellState::Locked;
            locked += 1;
        }
        locked
    }

    /// Whether every playable cell of row `y` is locked
    pub fn is_row_full(&self, y: i16) -> bool {
        if !(self.top()..=self.bottom_border()).contains(&y) {
            return false;
        }
        let Some(row) = self.row(y as usize) else {
            return false;
        };
        let (l, r) = (self.left_border() as usize, self.right_border() as usize);
        row[l..=r].iter().all(Cell::is_locked)
    }

    /// Count cells in a given state across the whole storage
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state == state).count()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy of the playable region for a renderer
    pub fn snapshot(&self) -> BoardSnapshot {
        let (l, r) = (self.left_border() as usize, self.right_border() as usize);
        let mut cells = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in self.top() as usize..=self.bottom_border() as usize {
            if let Some(row) = self.row(y) {
                cells.extend_from_slice(&row[l..=r]);
            }
        }
        BoardSnapshot::new(self.width, self.height, cells)
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColorTag;

    #[test]
    fn test_board_dimensions_include_margin() {
        let board = Board::new(10, 20, 4);
        assert_eq!(board.cols(), 18);
        assert_eq!(board.rows(), 28);
        assert_eq!(board.cells().len(), 18 * 28);
        assert_eq!(board.left_border(), 4);
        assert_eq!(board.right_border(), 13);
        assert_eq!(board.top(), 4);
        assert_eq!(board.bottom_border(), 23);
    }

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new(10, 20, 4);
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(17, 0), Some(17));
        assert_eq!(board.index(0, 1), Some(18));
        assert_eq!(board.index(17, 27), Some(18 * 28 - 1));
        assert_eq!(board.index(-1, 0), None);
        assert_eq!(board.index(18, 0), None);
        assert_eq!(board.index(0, 28), None);
    }

    #[test]
    fn test_out_of_bounds_is_an_error() {
        let mut board = Board::new(10, 20, 4);
        assert!(matches!(
            board.get(-1, 5),
            Err(CoreError::OutOfBounds { x: -1, y: 5, .. })
        ));
        assert!(board.set(0, 28, Cell::locked(ColorTag::Red)).is_err());
        assert!(board.clear_row(28).is_err());
        assert!(board.clear_row(-1).is_err());
    }

    #[test]
    fn test_clear_row_empties_margin_too() {
        let mut board = Board::new(10, 20, 4);
        for x in 0..board.cols() as i16 {
            board.set(x, 10, Cell::locked(ColorTag::Blue)).unwrap();
        }
        board.clear_row(10).unwrap();
        assert!(board.row(10).unwrap().iter().all(Cell::is_empty));
    }

    #[test]
    fn test_clear_window_tiles_keeps_settled_cells() {
        let mut board = Board::new(10, 20, 4);
        board.set(5, 5, Cell::window(true)).unwrap();
        board.set(6, 5, Cell::locked(ColorTag::Red)).unwrap();
        board.set(7, 5, Cell::player(ColorTag::Cyan)).unwrap();

        board.clear_window_tiles();

        assert_eq!(board.get(5, 5).unwrap(), Cell::EMPTY);
        assert!(board.get(6, 5).unwrap().is_locked());
        assert!(board.get(7, 5).unwrap().is_player());
    }

    #[test]
    fn test_lock_player_cells_is_idempotent() {
        let mut board = Board::new(10, 20, 4);
        board.set(5, 5, Cell::player(ColorTag::Cyan)).unwrap();
        board.set(6, 5, Cell::player(ColorTag::Cyan)).unwrap();

        assert_eq!(board.lock_player_cells(), 2);
        let after_first = board.clone();
        assert_eq!(board.lock_player_cells(), 0);
        assert_eq!(board, after_first);
        assert_eq!(board.get(5, 5).unwrap(), Cell::locked(ColorTag::Cyan));
    }

    #[test]
    fn test_row_full_ignores_margin() {
        let mut board = Board::new(10, 20, 4);
        for x in board.left_border()..=board.right_border() {
            board.set(x, 23, Cell::locked(ColorTag::Green)).unwrap();
        }
        assert!(board.is_row_full(23));
        // Hidden rows never count.
        for x in board.left_border()..=board.right_border() {
            board.set(x, 24, Cell::locked(ColorTag::Green)).unwrap();
        }
        assert!(!board.is_row_full(24));
        board.set(9, 23, Cell::player(ColorTag::Green)).unwrap();
        assert!(!board.is_row_full(23));
    }

    #[test]
    fn test_snapshot_is_playable_region() {
        let mut board = Board::new(10, 20, 4);
        board.set(4, 4, Cell::locked(ColorTag::Red)).unwrap();
        board.set(13, 23, Cell::locked(ColorTag::Blue)).unwrap();
        board.set(0, 0, Cell::locked(ColorTag::Cyan)).unwrap();

        let snap = board.snapshot();
        assert_eq!(snap.width(), 10);
        assert_eq!(snap.height(), 20);
        assert_eq!(snap.get(0, 0), Some(Cell::locked(ColorTag::Red)));
        assert_eq!(snap.get(9, 19), Some(Cell::locked(ColorTag::Blue)));
        assert_eq!(snap.count(CellState::Locked), 2);
    }
}
