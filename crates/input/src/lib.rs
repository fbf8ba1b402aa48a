//! Terminal input (host-facing).
//!
//! Maps `crossterm` key events onto [`crate::types::Command`]. The game core
//! never sees raw key events; the host translates them here and applies the
//! resulting commands in arrival order, without queueing or coalescing.

pub mod map;

pub use blockfall_types as types;

pub use map::{handle_key_event, is_actionable, should_quit};
