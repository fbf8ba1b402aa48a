//! Session configuration.
//!
//! Supplied once at session construction. `cell_size` is a renderer hint and
//! `debug` only changes the color painted for window cells; neither affects
//! the simulation.

use std::time::Duration;

use crate::error::{CoreError, Result};
use crate::types::{
    DEFAULT_BUFFER_SIZE, DEFAULT_CELL_SIZE, DEFAULT_HEIGHT, DEFAULT_TICK_MS, DEFAULT_WIDTH,
    MAX_PIECE_SIZE,
};

/// Upper bound on the buffer margin.
pub const MAX_BUFFER_SIZE: u8 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Playable width in cells
    pub width: u8,
    /// Playable height in cells
    pub height: u8,
    pub cell_size: u16,
    /// Hidden margin on every side of the playable region
    pub buffer_size: u8,
    /// Gravity tick interval
    pub tick_ms: u32,
    pub debug: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            buffer_size: DEFAULT_BUFFER_SIZE,
            tick_ms: DEFAULT_TICK_MS,
            debug: false,
        }
    }
}

impl GameConfig {
    /// Read overrides from environment variables, falling back to defaults.
    ///
    /// - `BLOCKFALL_WIDTH`, `BLOCKFALL_HEIGHT`, `BLOCKFALL_BUFFER`
    /// - `BLOCKFALL_CELL_SIZE`, `BLOCKFALL_TICK_MS`
    /// - `BLOCKFALL_DEBUG`: `1` or `true`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            width: read_env("BLOCKFALL_WIDTH", defaults.width),
            height: read_env("BLOCKFALL_HEIGHT", defaults.height),
            cell_size: read_env("BLOCKFALL_CELL_SIZE", defaults.cell_size),
            buffer_size: read_env("BLOCKFALL_BUFFER", defaults.buffer_size),
            tick_ms: read_env("BLOCKFALL_TICK_MS", defaults.tick_ms),
            debug: std::env::var("BLOCKFALL_DEBUG")
                .map(|v| v == "1" || v.to_lowercase() == "true")
                .unwrap_or(defaults.debug),
        }
    }

    /// Reject geometries the core cannot simulate without leaving the grid.
    ///
    /// The buffer must hold a whole spawn box above the playable region, and a
    /// bounding box may hang up to `MAX_PIECE_SIZE - 1` cells past a border.
    pub fn validate(&self) -> Result<()> {
        let min = MAX_PIECE_SIZE as u8;
        if self.width < min {
            return Err(invalid("width", format!("must be at least {min}, got {}", self.width)));
        }
        if self.height < min {
            return Err(invalid(
                "height",
                format!("must be at least {min}, got {}", self.height),
            ));
        }
        if self.buffer_size < min || self.buffer_size > MAX_BUFFER_SIZE {
            return Err(invalid(
                "buffer_size",
                format!(
                    "must be in [{min}..={MAX_BUFFER_SIZE}], got {}",
                    self.buffer_size
                ),
            ));
        }
        if self.tick_ms == 0 {
            return Err(invalid("tick_ms", "must be non-zero".to_string()));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms as u64)
    }
}

fn invalid(field: &'static str, reason: String) -> CoreError {
    CoreError::InvalidConfig { field, reason }
}

fn read_env<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("{key}={raw:?} is not a valid value; using {default}");
                default
            }
        },
        Err(_) => default,
    }
}
