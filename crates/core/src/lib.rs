//! Simulation core for a falling-block puzzle game - pure and deterministic
//!
//! This crate owns the grid, the falling piece, and the rules that tie them
//! together. It has no dependency on rendering, input devices, or timers: a
//! host drives it with [`Game::update`] once per tick and [`Game::apply`] for
//! each input command, then drains [`Game::take_outbound`] for snapshots.
//!
//! # Module Structure
//!
//! - [`matrix`]: piece bounding boxes in board coordinates, with in-box rotation
//! - [`board`]: the cell grid, including its hidden buffer margin
//! - [`collision`]: which sides of a piece are blocked
//! - [`line_clear`]: full-row detection and collapse
//! - [`pieces`]: shape definitions, the piece table, spawn placement
//! - [`rng`]: seeded piece selection
//! - [`game`]: movement, locking, and the tick state machine
//! - [`snapshot`]: what the host receives after each change
//!
//! # Rules
//!
//! - The board keeps a hidden margin of `buffer_size` cells around the
//!   playable region. Pieces spawn at the top of that margin.
//! - Gravity moves the active piece down one row per tick.
//! - A piece that reports a bottom collision locks when the next piece
//!   spawns, one tick later.
//! - A row clears when every playable cell in it is locked. Everything above
//!   it drops by one row.
//! - Rotation is clockwise inside the piece's box and is never rejected.
//! - There is no game-over state.
//!
//! # Example
//!
//! ```
//! use blockfall_core::{Game, GameConfig, Outbound};
//! use blockfall_core::types::Command;
//!
//! let mut game = Game::new(GameConfig::default(), 12345).unwrap();
//! game.setup();
//! game.update().unwrap();
//!
//! game.apply(Command::ShiftLeft).unwrap();
//! game.apply(Command::Rotate).unwrap();
//! game.apply(Command::HardDrop).unwrap();
//!
//! let latest = game
//!     .take_outbound()
//!     .into_iter()
//!     .rev()
//!     .find_map(|msg| match msg {
//!         Outbound::Board(snapshot) => Some(snapshot),
//!         Outbound::Preview(_) => None,
//!     })
//!     .unwrap();
//! assert_eq!(latest.width(), 10);
//! ```

pub mod board;
pub mod collision;
pub mod config;
pub mod error;
pub mod game;
pub mod line_clear;
pub mod matrix;
pub mod pieces;
pub mod rng;
pub mod snapshot;

pub use blockfall_types as types;

pub use board::Board;
pub use collision::{collisions, Collisions};
pub use config::GameConfig;
pub use error::{CoreError, Result};
pub use game::Game;
pub use matrix::{Matrix, PieceCell, SolidBody};
pub use pieces::{matrix_from_piece, spawn_x, PieceDef, PieceTable, STANDARD_PIECES};
pub use rng::SimpleRng;
pub use snapshot::{BoardSnapshot, Outbound};
