//! Error types for the simulation core.
//!
//! Every variant is a programmer or configuration error. Nothing here is
//! recoverable mid-game: callers surface it and stop the failing step.

use core::fmt;

use crate::types::PieceKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// A board read or write landed outside the allocated grid (margin included).
    OutOfBounds {
        x: i16,
        y: i16,
        cols: usize,
        rows: usize,
    },
    /// A piece definition could not be parsed into a shape matrix.
    MalformedPiece { kind: PieceKind, reason: String },
    /// Session configuration rejected by [`GameConfig::validate`](crate::GameConfig::validate).
    InvalidConfig { field: &'static str, reason: String },
    /// A loop that must terminate did not.
    Invariant(&'static str),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { x, y, cols, rows } => write!(
                f,
                "board access out of bounds at ({x}, {y}); grid is {cols}x{rows}"
            ),
            Self::MalformedPiece { kind, reason } => {
                write!(f, "malformed piece definition for {}: {reason}", kind.as_str())
            }
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid config field `{field}`: {reason}")
            }
            Self::Invariant(what) => write!(f, "invariant violated: {what}"),
        }
    }
}

impl std::error::Error for CoreError {}

pub type Result<T> = core::result::Result<T, CoreError>;
