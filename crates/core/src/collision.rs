//! Collision detection for the active piece
//!
//! Only solid cells are tested. A side is blocked when a solid cell sits on
//! (or past) the matching playable border, or when the neighbouring cell on
//! that side is locked.

use core::fmt;

use crate::board::Board;
use crate::error::Result;
use crate::matrix::Matrix;
use crate::types::Direction;

/// Set of blocked sides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Collisions(u8);

impl Collisions {
    pub const NONE: Self = Self(0);

    #[inline]
    const fn bit(dir: Direction) -> u8 {
        match dir {
            Direction::Left => 1,
            Direction::Right => 1 << 1,
            Direction::Bottom => 1 << 2,
        }
    }

    pub fn insert(&mut self, dir: Direction) {
        self.0 |= Self::bit(dir);
    }

    pub fn contains(&self, dir: Direction) -> bool {
        self.0 & Self::bit(dir) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        [Direction::Left, Direction::Right, Direction::Bottom]
            .into_iter()
            .filter(|d| self.contains(*d))
    }
}

impl fmt::Display for Collisions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, dir) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", dir.as_str())?;
        }
        write!(f, "]")
    }
}

/// Compute which sides of `matrix` are blocked on `board`.
///
/// Neighbour lookups go through [`Board::get`], so a piece whose box has run
/// past the storage margin surfaces as an out-of-bounds error.
pub fn collisions(matrix: &Matrix, board: &Board) -> Result<Collisions> {
    let mut found = Collisions::NONE;
    for cell in matrix.cells().iter().filter(|c| c.is_solid()) {
        let (x, y) = (cell.x, cell.y);

        if !found.contains(Direction::Left)
            && (x <= board.left_border() || board.get(x - 1, y)?.is_obstacle())
        {
            found.insert(Direction::Left);
        }
        if !found.contains(Direction::Right)
            && (x >= board.right_border() || board.get(x + 1, y)?.is_obstacle())
        {
            found.insert(Direction::Right);
        }
        if !found.contains(Direction::Bottom)
            && (y >= board.bottom_border() || board.get(x, y + 1)?.is_obstacle())
        {
            found.insert(Direction::Bottom);
        }
    }
    Ok(found)
}
