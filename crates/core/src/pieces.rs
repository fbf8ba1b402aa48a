//! Pieces module - tetromino definitions and the spawn table
//!
//! Definitions are `0/1` shape strings. They are parsed once, when the table
//! is built, so a bad definition fails at load time instead of mid-game.

use crate::board::Board;
use crate::error::{CoreError, Result};
use crate::matrix::Matrix;
use crate::rng::SimpleRng;
use crate::types::{ColorTag, PieceKind};

/// A piece definition before parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceDef<'a> {
    pub kind: PieceKind,
    pub color: ColorTag,
    pub shape: &'a str,
}

impl<'a> PieceDef<'a> {
    pub const fn new(kind: PieceKind, shape: &'a str) -> Self {
        Self {
            kind,
            color: kind.color(),
            shape,
        }
    }
}

/// The seven canonical tetrominoes
pub const STANDARD_PIECES: [PieceDef<'static>; 7] = [
    PieceDef::new(
        PieceKind::I,
        "0 0 0 0
         1 1 1 1
         0 0 0 0
         0 0 0 0",
    ),
    PieceDef::new(
        PieceKind::J,
        "1 0 0
         1 1 1
         0 0 0",
    ),
    PieceDef::new(
        PieceKind::L,
        "0 0 1
         1 1 1
         0 0 0",
    ),
    PieceDef::new(
        PieceKind::O,
        "1 1
         1 1",
    ),
    PieceDef::new(
        PieceKind::S,
        "0 1 1
         1 1 0
         0 0 0",
    ),
    PieceDef::new(
        PieceKind::T,
        "0 1 0
         1 1 1
         0 0 0",
    ),
    PieceDef::new(
        PieceKind::Z,
        "1 1 0
         0 1 1
         0 0 0",
    ),
];

/// Parsed piece prototypes, anchored at `(0, 0)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceTable {
    prototypes: Vec<Matrix>,
}

impl PieceTable {
    pub fn standard() -> Result<Self> {
        Self::from_definitions(&STANDARD_PIECES)
    }

    /// Parse every definition up front.
    ///
    /// Kinds may repeat; each entry is one equally likely outcome of
    /// [`PieceTable::random`].
    pub fn from_definitions(defs: &[PieceDef<'_>]) -> Result<Self> {
        if defs.is_empty() {
            return Err(CoreError::InvalidConfig {
                field: "pieces",
                reason: "piece table is empty".to_string(),
            });
        }
        let prototypes = defs
            .iter()
            .map(|def| Matrix::build(def.kind, def.shape, def.color, 0))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { prototypes })
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    pub fn prototypes(&self) -> &[Matrix] {
        &self.prototypes
    }

    /// First prototype of the given kind
    pub fn get(&self, kind: PieceKind) -> Option<&Matrix> {
        self.prototypes.iter().find(|m| m.kind() == kind)
    }

    /// Uniform choice among the table entries
    pub fn random(&self, rng: &mut SimpleRng) -> &Matrix {
        let idx = rng.next_range(self.prototypes.len() as u32) as usize;
        &self.prototypes[idx]
    }
}

/// Column of a spawned box's left edge: centered on the playable width.
pub fn spawn_x(size: usize, board: &Board) -> i16 {
    board.left_border() + (board.width() as i16) / 2 - (size as i16) / 2
}

/// Materialize a prototype at the spawn position (top of the hidden buffer).
pub fn matrix_from_piece(prototype: &Matrix, board: &Board) -> Matrix {
    let mut matrix = prototype.clone();
    let (x, y) = matrix.origin();
    matrix.translate(spawn_x(matrix.size(), board) - x, -y);
    matrix
}
