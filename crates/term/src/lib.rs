//! Terminal renderer for the game.
//!
//! Published snapshots are drawn into a plain framebuffer and flushed to the
//! terminal with `crossterm`, rewriting only the glyphs that changed. Each
//! board cell spans a fixed number of terminal columns (2 by default) so the
//! grid keeps a square-ish aspect ratio.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{color_rgb, AnchorY, Frame, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
