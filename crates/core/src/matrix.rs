//! Shape matrix - a piece's bounding box materialized on the board
//!
//! A matrix is a square, row-major grid of [`PieceCell`]s. Every cell carries
//! its absolute board position, so moving the piece means translating each
//! cell in place. Rotation is the opposite: positions stay fixed and only the
//! occupancy bits are redistributed, which rotates the piece inside a box
//! that never moves or resizes.

use core::fmt;

use arrayvec::ArrayVec;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::{ColorTag, PieceKind, MAX_PIECE_CELLS, MAX_PIECE_SIZE};

/// One sub-cell of a piece's bounding box, in board coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PieceCell {
    pub x: i16,
    pub y: i16,
    pub color: ColorTag,
    /// 1 for an occupied sub-cell, 0 for a transparent one
    pub value: u8,
}

impl PieceCell {
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.value == 1
    }
}

/// The occupied cells of a matrix ("solid body")
pub type SolidBody = ArrayVec<PieceCell, MAX_PIECE_CELLS>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix {
    kind: PieceKind,
    size: usize,
    cells: ArrayVec<PieceCell, MAX_PIECE_CELLS>,
}

impl Matrix {
    /// Parse a `0/1` definition into a matrix anchored at `(x_offset, 0)`.
    ///
    /// Rows are separated by newlines; tokens within a row may be separated
    /// by whitespace or written back to back (`"1 1 0"` and `"110"` are the
    /// same row). Blank lines are ignored. Rectangular definitions are padded
    /// with transparent cells on the right or bottom to a square box.
    pub fn build(kind: PieceKind, definition: &str, color: ColorTag, x_offset: i16) -> Result<Self> {
        let malformed = |reason: String| CoreError::MalformedPiece { kind, reason };

        let mut rows: ArrayVec<ArrayVec<u8, MAX_PIECE_SIZE>, MAX_PIECE_SIZE> = ArrayVec::new();
        for line in definition.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let mut row = ArrayVec::new();
            for ch in line.chars().filter(|c| !c.is_whitespace()) {
                let value = match ch {
                    '0' => 0,
                    '1' => 1,
                    other => return Err(malformed(format!("unexpected token `{other}`"))),
                };
                row.try_push(value)
                    .map_err(|_| malformed(format!("row wider than {MAX_PIECE_SIZE}")))?;
            }
            rows.try_push(row)
                .map_err(|_| malformed(format!("more than {MAX_PIECE_SIZE} rows")))?;
        }

        let Some(first) = rows.first() else {
            return Err(malformed("empty definition".to_string()));
        };
        let width = first.len();
        if let Some((y, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(malformed(format!(
                "row {y} has {} cells, expected {width}",
                row.len()
            )));
        }
        if !rows.iter().flatten().any(|&v| v == 1) {
            return Err(malformed("no occupied cell".to_string()));
        }

        let size = width.max(rows.len());
        let mut cells = ArrayVec::new();
        for ly in 0..size {
            for lx in 0..size {
                let value = rows.get(ly).and_then(|r| r.get(lx)).copied().unwrap_or(0);
                cells.push(PieceCell {
                    x: x_offset + lx as i16,
                    y: ly as i16,
                    color,
                    value,
                });
            }
        }

        Ok(Self { kind, size, cells })
    }

    /// Rotate the occupancy 90° clockwise inside the fixed box.
    ///
    /// The cell at local `(x, y)` takes the value found at local
    /// `(y, size - 1 - x)` in `self`. Positions and colors do not move.
    pub fn rotate90(&self) -> Self {
        let n = self.size;
        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let (x, y) = (i % n, i / n);
                let (src_x, src_y) = (y, n - 1 - x);
                PieceCell {
                    value: self.cells[src_y * n + src_x].value,
                    ..*cell
                }
            })
            .collect();

        Self {
            kind: self.kind,
            size: n,
            cells,
        }
    }

    /// Move every cell of the box by `(dx, dy)`.
    pub fn translate(&mut self, dx: i16, dy: i16) {
        for cell in &mut self.cells {
            cell.x += dx;
            cell.y += dy;
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Edge length of the square bounding box
    pub fn size(&self) -> usize {
        self.size
    }

    /// All cells of the bounding box, row-major
    pub fn cells(&self) -> &[PieceCell] {
        &self.cells
    }

    /// Cell at local position `(x, y)` inside the box
    pub fn cell(&self, x: usize, y: usize) -> Option<&PieceCell> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.cells.get(y * self.size + x)
    }

    pub fn solid_body(&self) -> SolidBody {
        self.cells.iter().filter(|c| c.is_solid()).copied().collect()
    }

    /// Board position of the top-left cell
    pub fn origin(&self) -> (i16, i16) {
        self.cells.first().map(|c| (c.x, c.y)).unwrap_or((0, 0))
    }

    /// Occupancy as a row-major bitmask (bit `y * size + x`)
    pub fn occupancy(&self) -> u16 {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_solid())
            .fold(0u16, |mask, (i, _)| mask | (1 << i))
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cells.chunks(self.size).enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for (x, cell) in row.iter().enumerate() {
                if x > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", cell.value)?;
            }
        }
        Ok(())
    }
}
