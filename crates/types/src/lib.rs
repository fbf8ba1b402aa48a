//! Core types module - shared data structures and constants
//!
//! This module defines the plain data types exchanged between the simulation
//! core and its collaborators (renderers, input hosts). Nothing in here owns
//! behavior beyond parsing and naming.
//!
//! # Board Geometry
//!
//! The default playable region is 10 columns by 20 rows. The board storage is
//! wider and taller than that: a hidden buffer margin of `DEFAULT_BUFFER_SIZE`
//! cells surrounds the playable region on every side. Pieces spawn inside the
//! top margin, and a piece's bounding box may hang into the side or bottom
//! margins while its occupied cells stay inside the playable region.
//!
//! Coordinates are `(x, y)` with `x` the storage column and `y` the storage
//! row, `y` increasing downward.
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_TICK_MS` | 500 | Interval between gravity ticks |
//! | `DEFAULT_CELL_SIZE` | 25 | Renderer cell size hint |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Command, Direction, PieceKind, DEFAULT_HEIGHT, DEFAULT_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Command::from_str("hardDrop"), Some(Command::HardDrop));
//! assert_eq!(Command::ShiftLeft.direction(), Some(Direction::Left));
//!
//! assert_eq!(DEFAULT_WIDTH, 10);
//! assert_eq!(DEFAULT_HEIGHT, 20);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Playable board width in cells (10 columns)
pub const DEFAULT_WIDTH: u8 = 10;

/// Playable board height in cells (20 rows)
pub const DEFAULT_HEIGHT: u8 = 20;

/// Hidden margin around the playable region, in cells
pub const DEFAULT_BUFFER_SIZE: u8 = 4;

/// Renderer cell size hint (ignored by the core)
pub const DEFAULT_CELL_SIZE: u16 = 25;

/// Gravity tick interval in milliseconds
pub const DEFAULT_TICK_MS: u32 = 500;

/// Largest bounding box edge a piece definition may use
pub const MAX_PIECE_SIZE: usize = 4;

/// Number of cells in the largest piece bounding box
pub const MAX_PIECE_CELLS: usize = MAX_PIECE_SIZE * MAX_PIECE_SIZE;


/// The seven tetromino piece kinds
///
/// Each piece has a fixed color tag:
/// - **I**: Cyan
/// - **J**: Blue
/// - **L**: Orange
/// - **O**: Yellow
/// - **S**: Green
/// - **T**: Purple
/// - **Z**: Red
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All kinds in table order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to uppercase letter
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::J => "J",
            PieceKind::L => "L",
            PieceKind::O => "O",
            PieceKind::S => "S",
            PieceKind::T => "T",
            PieceKind::Z => "Z",
        }
    }

    /// Color tag painted for this piece's occupied cells
    pub const fn color(&self) -> ColorTag {
        match self {
            PieceKind::I => ColorTag::Cyan,
            PieceKind::J => ColorTag::Blue,
            PieceKind::L => ColorTag::Orange,
            PieceKind::O => ColorTag::Yellow,
            PieceKind::S => ColorTag::Green,
            PieceKind::T => ColorTag::Purple,
            PieceKind::Z => ColorTag::Red,
        }
    }
}

/// Color associated with a board cell.
///
/// The core only carries the tag; mapping a tag to pixels or terminal colors
/// is the renderer's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColorTag {
    /// Background of an empty cell
    #[default]
    Black,
    Cyan,
    Blue,
    Orange,
    Yellow,
    Green,
    Purple,
    Red,
    /// Debug highlight for a piece's transparent bounding-box cells
    Window,
}

impl ColorTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTag::Black => "black",
            ColorTag::Cyan => "cyan",
            ColorTag::Blue => "blue",
            ColorTag::Orange => "orange",
            ColorTag::Yellow => "yellow",
            ColorTag::Green => "green",
            ColorTag::Purple => "purple",
            ColorTag::Red => "red",
            ColorTag::Window => "window",
        }
    }
}

/// Occupancy state of a board cell
///
/// - **Empty**: nothing here
/// - **Player**: covered by the currently falling piece
/// - **Locked**: settled, permanent until its row clears
/// - **Ghost**: a transparent cell of the falling piece's bounding box;
///   erased and repainted every step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CellState {
    #[default]
    Empty,
    Player,
    Locked,
    Ghost,
}

/// A single board cell: state plus color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub state: CellState,
    pub color: ColorTag,
}

impl Cell {
    /// The empty cell every board starts with
    pub const EMPTY: Cell = Cell {
        state: CellState::Empty,
        color: ColorTag::Black,
    };

    pub const fn player(color: ColorTag) -> Self {
        Self {
            state: CellState::Player,
            color,
        }
    }

    pub const fn locked(color: ColorTag) -> Self {
        Self {
            state: CellState::Locked,
            color,
        }
    }

    /// Transient marker for a transparent bounding-box cell.
    ///
    /// Debug sessions give it a visible color; otherwise it looks empty.
    pub const fn window(debug: bool) -> Self {
        Self {
            state: CellState::Ghost,
            color: if debug {
                ColorTag::Window
            } else {
                ColorTag::Black
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.state == CellState::Empty
    }

    pub fn is_locked(&self) -> bool {
        self.state == CellState::Locked
    }

    pub fn is_player(&self) -> bool {
        self.state == CellState::Player
    }

    pub fn is_window(&self) -> bool {
        self.state == CellState::Ghost
    }

    /// Only settled cells block movement; the falling piece never blocks itself.
    pub fn is_obstacle(&self) -> bool {
        self.is_locked()
    }
}

/// Direction of a one-cell shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Left,
    Right,
    Bottom,
}

impl Direction {
    /// Cell offset `(dx, dy)` of one step in this direction
    pub fn offset(&self) -> (i8, i8) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Bottom => (0, 1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Bottom => "bottom",
        }
    }
}

/// Commands a host can send to a running session
///
/// Each command is zero-argument and applied immediately, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Command {
    /// Shift the piece one cell left
    ShiftLeft,
    /// Shift the piece one cell right
    ShiftRight,
    /// Shift the piece one cell down
    SoftDrop,
    /// Rotate the piece 90° clockwise
    Rotate,
    /// Drop the piece until it lands
    HardDrop,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::ShiftLeft,
        Command::ShiftRight,
        Command::SoftDrop,
        Command::Rotate,
        Command::HardDrop,
    ];

    /// Parse a command from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Command;
    ///
    /// assert_eq!(Command::from_str("shiftLeft"), Some(Command::ShiftLeft));
    /// assert_eq!(Command::from_str("SOFTDROP"), Some(Command::SoftDrop));
    /// assert_eq!(Command::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "shiftleft" => Some(Command::ShiftLeft),
            "shiftright" => Some(Command::ShiftRight),
            "softdrop" => Some(Command::SoftDrop),
            "rotate" => Some(Command::Rotate),
            "harddrop" => Some(Command::HardDrop),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::ShiftLeft => "shiftLeft",
            Command::ShiftRight => "shiftRight",
            Command::SoftDrop => "softDrop",
            Command::Rotate => "rotate",
            Command::HardDrop => "hardDrop",
        }
    }

    /// The single-step shift this command performs, if it is one
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Command::ShiftLeft => Some(Direction::Left),
            Command::ShiftRight => Some(Direction::Right),
            Command::SoftDrop => Some(Direction::Bottom),
            Command::Rotate | Command::HardDrop => None,
        }
    }
}

/// Game loop driver state
///
/// `NotStarted → WaitingForPiece ⇄ Dropping`. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Phase {
    #[default]
    NotStarted,
    /// A piece has landed (or none exists yet); the next tick spawns.
    WaitingForPiece,
    /// The active piece is still falling.
    Dropping,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::NotStarted => "notStarted",
            Phase::WaitingForPiece => "waitingForPiece",
            Phase::Dropping => "dropping",
        }
    }
}
