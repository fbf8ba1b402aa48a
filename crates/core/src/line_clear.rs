//! Line clear - removing full rows and collapsing the stack
//!
//! A row is full when every playable column holds a locked cell. Each full
//! row is wiped and everything above it shifts down one row. Cells painted
//! by the active piece (player and window cells) are not part of the stack:
//! they stay where they are and the piece is re-painted after the collapse.

use crate::board::Board;
use crate::error::Result;
use crate::types::Cell;

/// Whether a cell belongs to the active piece's painted footprint
#[inline]
fn is_footprint(cell: &Cell) -> bool {
    cell.is_player() || cell.is_window()
}

impl Board {
    /// Clear every full row and collapse the rows above it.
    ///
    /// Rows are scanned from the top of the playable region down, so several
    /// full rows in one pass each drop the stack by one. Returns the number
    /// of rows cleared.
    pub fn handle_full_rows(&mut self) -> Result<usize> {
        let mut cleared = 0;
        for y in self.top()..=self.bottom_border() {
            if self.is_row_full(y) {
                self.clear_row(y)?;
                self.collapse_above(y)?;
                cleared += 1;
            }
        }
        if cleared > 0 {
            tracing::debug!(cleared, "cleared full rows");
        }
        Ok(cleared)
    }

    /// Shift every settled cell in rows `0..y` down by one, overwriting row `y`.
    fn collapse_above(&mut self, y: i16) -> Result<()> {
        let cols = self.cols() as i16;
        for r in (1..=y).rev() {
            for x in 0..cols {
                let src = self.get(x, r - 1)?;
                let dst = self.get(x, r)?;
                let next = if is_footprint(&src) {
                    if is_footprint(&dst) {
                        dst
                    } else {
                        Cell::EMPTY
                    }
                } else if is_footprint(&dst) {
                    // The piece keeps its slot; the settled cell moving in
                    // only survives if it is a real block.
                    if src.is_locked() {
                        src
                    } else {
                        dst
                    }
                } else {
                    src
                };
                self.set(x, r, next)?;
            }
        }
        for x in 0..cols {
            if !is_footprint(&self.get(x, 0)?) {
                self.set(x, 0, Cell::EMPTY)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellState, ColorTag};

    fn fill_row(board: &mut Board, y: i16, color: ColorTag) {
        for x in board.left_border()..=board.right_border() {
            board.set(x, y, Cell::locked(color)).unwrap();
        }
    }

    #[test]
    fn test_no_full_rows_is_a_no_op() {
        let mut board = Board::new(10, 20, 4);
        board.set(5, 23, Cell::locked(ColorTag::Red)).unwrap();
        let before = board.clone();
        assert_eq!(board.handle_full_rows().unwrap(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_single_full_row_drops_stack() {
        let mut board = Board::new(10, 20, 4);
        fill_row(&mut board, 23, ColorTag::Cyan);
        board.set(6, 22, Cell::locked(ColorTag::Red)).unwrap();
        board.set(7, 21, Cell::locked(ColorTag::Blue)).unwrap();

        assert_eq!(board.handle_full_rows().unwrap(), 1);

        assert_eq!(board.get(6, 23).unwrap(), Cell::locked(ColorTag::Red));
        assert_eq!(board.get(7, 22).unwrap(), Cell::locked(ColorTag::Blue));
        assert_eq!(board.count(CellState::Locked), 2);
        assert!(!board.is_row_full(23));
    }

    #[test]
    fn test_two_full_rows_clear_together() {
        let mut board = Board::new(10, 20, 4);
        fill_row(&mut board, 23, ColorTag::Cyan);
        fill_row(&mut board, 22, ColorTag::Cyan);
        board.set(4, 21, Cell::locked(ColorTag::Orange)).unwrap();

        assert_eq!(board.handle_full_rows().unwrap(), 2);
        assert_eq!(board.get(4, 23).unwrap(), Cell::locked(ColorTag::Orange));
        assert_eq!(board.count(CellState::Locked), 1);
    }

    #[test]
    fn test_non_adjacent_full_rows() {
        let mut board = Board::new(10, 20, 4);
        fill_row(&mut board, 23, ColorTag::Cyan);
        board.set(8, 22, Cell::locked(ColorTag::Red)).unwrap();
        fill_row(&mut board, 21, ColorTag::Cyan);
        board.set(9, 20, Cell::locked(ColorTag::Blue)).unwrap();

        assert_eq!(board.handle_full_rows().unwrap(), 2);
        assert_eq!(board.get(8, 23).unwrap(), Cell::locked(ColorTag::Red));
        assert_eq!(board.get(9, 22).unwrap(), Cell::locked(ColorTag::Blue));
        assert_eq!(board.count(CellState::Locked), 2);
    }

    #[test]
    fn test_active_piece_cells_stay_put() {
        let mut board = Board::new(10, 20, 4);
        fill_row(&mut board, 23, ColorTag::Cyan);
        board.set(8, 10, Cell::player(ColorTag::Yellow)).unwrap();
        board.set(9, 10, Cell::window(false)).unwrap();
        board.set(8, 9, Cell::locked(ColorTag::Red)).unwrap();

        assert_eq!(board.handle_full_rows().unwrap(), 1);

        assert_eq!(board.get(8, 10).unwrap(), Cell::locked(ColorTag::Red));
        assert!(board.get(9, 10).unwrap().is_window());
        assert_eq!(board.get(8, 11).unwrap(), Cell::EMPTY);
    }

    #[test]
    fn test_player_cells_do_not_make_row_full() {
        let mut board = Board::new(10, 20, 4);
        fill_row(&mut board, 23, ColorTag::Cyan);
        board.set(13, 23, Cell::player(ColorTag::Cyan)).unwrap();
        assert_eq!(board.handle_full_rows().unwrap(), 0);
    }
}
