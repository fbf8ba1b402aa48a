//! Terminal runner (default binary).
//!
//! Drives one game session at a fixed tick, reads keys between ticks, and
//! draws every published snapshot. The terminal owns stdout, so logs go to
//! the file named by `BLOCKFALL_LOG_PATH` (filtered by `BLOCKFALL_LOG`) and
//! are off when it is unset.

use std::fs::File;
use std::sync::Mutex;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tracing_subscriber::filter::EnvFilter;

use blockfall::core::{BoardSnapshot, Game, GameConfig, Matrix, Outbound};
use blockfall::input::{handle_key_event, is_actionable, should_quit};
use blockfall::term::{Frame, FrameBuffer, GameView, TerminalRenderer, Viewport};

fn main() -> Result<()> {
    init_tracing()?;

    let config = GameConfig::from_env();
    let seed = session_seed();
    let mut game = Game::new(config, seed).context("invalid game configuration")?;
    tracing::info!(seed, ?config, "session configured");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut game);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(err) = &result {
        tracing::error!(error = %err, "session aborted");
    }
    result
}

fn init_tracing() -> Result<()> {
    let Ok(path) = std::env::var("BLOCKFALL_LOG_PATH") else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("creating log file {path}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("BLOCKFALL_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// `BLOCKFALL_SEED` when set, otherwise the clock.
fn session_seed() -> u32 {
    if let Some(seed) = std::env::var("BLOCKFALL_SEED")
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
    {
        return seed;
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, game: &mut Game) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let tick = game.config().tick_interval();

    let mut board: BoardSnapshot = game.board_snapshot();
    let mut preview: Option<Matrix> = None;
    let mut dirty = true;

    game.setup();
    let mut last_tick = Instant::now();

    loop {
        for msg in game.take_outbound() {
            match msg {
                Outbound::Board(snapshot) => board = snapshot,
                Outbound::Preview(next) => preview = Some(next),
            }
            dirty = true;
        }

        if dirty {
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            let coords = game.config().debug.then(|| game.active_coordinates());
            let frame = Frame {
                board: &board,
                preview: preview.as_ref(),
                phase: game.phase(),
                ticks: game.ticks(),
                debug_coords: coords.as_deref(),
            };
            view.render_into(&frame, Viewport::new(w, h), &mut fb);
            term.draw_swap(&mut fb)?;
            dirty = false;
        }

        // Input with timeout until next tick.
        let timeout = tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if is_actionable(&key) => {
                    if should_quit(key) {
                        game.stop();
                        return Ok(());
                    }
                    if let Some(command) = handle_key_event(key) {
                        game.apply(command)
                            .with_context(|| format!("applying {}", command.as_str()))?;
                    }
                }
                Event::Resize(..) => {
                    term.invalidate();
                    dirty = true;
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
            game.update().context("advancing game tick")?;
        }
    }
}
