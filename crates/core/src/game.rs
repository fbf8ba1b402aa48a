//! Game session - the movement controller and the tick-driven loop
//!
//! A [`Game`] owns the board, the active piece, and the one-piece preview.
//! The host calls [`Game::update`] once per tick and [`Game::apply`] for
//! every command, in arrival order. Each call runs to completion.
//!
//! Every public mutating call is a transaction. If a step hits an invariant
//! violation (a board access outside the grid), the session is restored to
//! the state it had before the call and nothing from that step is published.

use std::mem;

use crate::board::Board;
use crate::collision::{collisions, Collisions};
use crate::config::GameConfig;
use crate::error::{CoreError, Result};
use crate::matrix::Matrix;
use crate::pieces::{self, PieceTable};
use crate::rng::SimpleRng;
use crate::snapshot::{BoardSnapshot, Outbound};
use crate::types::{Cell, Command, Direction, Phase};

#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    board: Board,
    pieces: PieceTable,
    rng: SimpleRng,
    phase: Phase,
    active: Option<Matrix>,
    next: Option<Matrix>,
    ticks: u64,
    outbound: Vec<Outbound>,
}

impl Game {
    /// Create a session with the seven standard pieces.
    pub fn new(config: GameConfig, seed: u32) -> Result<Self> {
        Self::with_pieces(config, PieceTable::standard()?, seed)
    }

    /// Create a session drawing from a custom piece table.
    pub fn with_pieces(config: GameConfig, pieces: PieceTable, seed: u32) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            width = config.width,
            height = config.height,
            buffer = config.buffer_size,
            seed,
            pieces = pieces.len(),
            "creating game"
        );
        Ok(Self {
            board: Board::new(config.width, config.height, config.buffer_size),
            config,
            pieces,
            rng: SimpleRng::new(seed),
            phase: Phase::NotStarted,
            active: None,
            next: None,
            ticks: 0,
            outbound: Vec::new(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access, for scripted setups and tests.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn pieces(&self) -> &PieceTable {
        &self.pieces
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active(&self) -> Option<&Matrix> {
        self.active.as_ref()
    }

    /// The preview piece
    pub fn next(&self) -> Option<&Matrix> {
        self.next.as_ref()
    }

    /// Ticks processed since setup
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Board coordinates of the active piece's occupied cells
    pub fn active_coordinates(&self) -> Vec<(i16, i16)> {
        self.active
            .as_ref()
            .map(|m| m.solid_body().iter().map(|c| (c.x, c.y)).collect())
            .unwrap_or_default()
    }

    pub fn board_snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    /// Drain the messages published since the last call, oldest first.
    pub fn take_outbound(&mut self) -> Vec<Outbound> {
        mem::take(&mut self.outbound)
    }

    /// Start the session: draw the first preview and wait for a spawn.
    ///
    /// Only valid from [`Phase::NotStarted`]; later calls are ignored.
    pub fn setup(&mut self) {
        if self.phase != Phase::NotStarted {
            tracing::debug!(phase = self.phase.as_str(), "setup ignored");
            return;
        }
        self.draw_next();
        self.phase = Phase::WaitingForPiece;
        self.publish_board();
        tracing::info!("game started");
    }

    /// Stop the session. Further ticks and commands are no-ops until the
    /// next [`Game::setup`].
    pub fn stop(&mut self) {
        tracing::info!(ticks = self.ticks, "game stopped");
        self.phase = Phase::NotStarted;
    }

    /// Advance one gravity tick.
    ///
    /// When waiting for a piece, the preview is promoted first (locking the
    /// previous piece) and a new preview is drawn. Then the active piece is
    /// shifted down once.
    pub fn update(&mut self) -> Result<()> {
        self.transact("update", |game| {
            if game.phase == Phase::NotStarted {
                return Ok(());
            }
            game.ticks += 1;
            tracing::trace!(tick = game.ticks, phase = game.phase.as_str(), "tick");
            if game.phase == Phase::WaitingForPiece {
                game.spawn_next()?;
            }
            game.step(Direction::Bottom)?;
            Ok(())
        })
    }

    /// Apply one input command immediately.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        tracing::debug!(command = command.as_str(), "apply");
        match command {
            Command::ShiftLeft => self.shift(Direction::Left).map(drop),
            Command::ShiftRight => self.shift(Direction::Right).map(drop),
            Command::SoftDrop => self.shift(Direction::Bottom).map(drop),
            Command::Rotate => self.rotate(),
            Command::HardDrop => self.plunge().map(drop),
        }
    }

    /// Move the active piece one cell, unless that side is blocked.
    ///
    /// Returns the collisions found before the move. A bottom collision
    /// puts the session in [`Phase::WaitingForPiece`]; the piece locks on
    /// the next tick's spawn.
    pub fn shift(&mut self, dir: Direction) -> Result<Collisions> {
        if self.is_stopped() {
            return Ok(Collisions::NONE);
        }
        self.transact("shift", |game| game.step(dir))
    }

    /// Hard drop: shift down until the piece lands.
    ///
    /// Returns how many rows the piece fell.
    pub fn plunge(&mut self) -> Result<u32> {
        if self.is_stopped() {
            return Ok(0);
        }
        self.transact("plunge", |game| {
            let limit = game.board.rows();
            let mut fallen = 0u32;
            for _ in 0..=limit {
                if game.active.is_none() {
                    return Ok(fallen);
                }
                if game.step(Direction::Bottom)?.contains(Direction::Bottom) {
                    return Ok(fallen);
                }
                fallen += 1;
            }
            Err(CoreError::Invariant("hard drop did not land"))
        })
    }

    /// Rotate the active piece clockwise inside its box.
    ///
    /// No collision check is made: the rotated piece may overlap a border or
    /// the stack. Cells already locked keep their state and are not painted.
    pub fn rotate(&mut self) -> Result<()> {
        if self.is_stopped() {
            return Ok(());
        }
        self.transact("rotate", |game| {
            let Some(active) = game.active.as_ref() else {
                return Ok(());
            };
            game.active = Some(active.rotate90());
            game.board.clear_window_tiles();
            game.render_active_piece()?;
            game.publish_board();
            Ok(())
        })
    }

    /// Lock the current footprint and make `matrix` the active piece.
    ///
    /// Ignored while the session is not started.
    pub fn insert_piece(&mut self, matrix: Matrix) -> Result<()> {
        if self.is_stopped() {
            tracing::debug!(kind = matrix.kind().as_str(), "insert ignored");
            return Ok(());
        }
        self.transact("insert_piece", |game| {
            game.place(matrix)?;
            game.publish_board();
            Ok(())
        })
    }

    /// Lock the active piece where it stands and retire it.
    ///
    /// Returns how many cells were locked. Calling it again before a new
    /// piece is inserted locks nothing and leaves the board unchanged.
    pub fn lock_active(&mut self) -> usize {
        let locked = self.board.lock_player_cells();
        self.active = None;
        if self.phase != Phase::NotStarted {
            self.phase = Phase::WaitingForPiece;
        }
        if locked > 0 {
            self.publish_board();
        }
        locked
    }

    /// Paint the active piece's whole box onto the board.
    ///
    /// Occupied cells become player cells, transparent cells become window
    /// cells. Targets that are already locked are skipped.
    pub fn render_active_piece(&mut self) -> Result<()> {
        let Some(active) = self.active.as_ref() else {
            return Ok(());
        };
        let window = Cell::window(self.config.debug);
        for cell in active.cells() {
            if self.board.get(cell.x, cell.y)?.is_locked() {
                continue;
            }
            let paint = if cell.is_solid() {
                Cell::player(cell.color)
            } else {
                window
            };
            self.board.set(cell.x, cell.y, paint)?;
        }
        Ok(())
    }

    /// Uniform draw from the piece table (a prototype anchored at the origin)
    pub fn random_piece(&mut self) -> Matrix {
        self.pieces.random(&mut self.rng).clone()
    }

    /// Place a prototype at the spawn position of this session's board.
    pub fn matrix_from_piece(&self, prototype: &Matrix) -> Matrix {
        pieces::matrix_from_piece(prototype, &self.board)
    }

    fn draw_next(&mut self) {
        let prototype = self.random_piece();
        let next = self.matrix_from_piece(&prototype);
        self.outbound.push(Outbound::Preview(next.clone()));
        self.next = Some(next);
    }

    fn spawn_next(&mut self) -> Result<()> {
        let next = match self.next.take() {
            Some(next) => next,
            None => {
                let prototype = self.random_piece();
                self.matrix_from_piece(&prototype)
            }
        };
        tracing::debug!(kind = next.kind().as_str(), "spawning piece");
        self.place(next)?;
        self.draw_next();
        Ok(())
    }

    fn place(&mut self, matrix: Matrix) -> Result<()> {
        let locked = self.board.lock_player_cells();
        if locked > 0 {
            tracing::debug!(locked, "locked previous piece");
        }
        self.active = Some(matrix);
        self.render_active_piece()
    }

    fn step(&mut self, dir: Direction) -> Result<Collisions> {
        let Some(active) = self.active.as_ref() else {
            return Ok(Collisions::NONE);
        };
        let found = collisions(active, &self.board)?;
        self.phase = if found.contains(Direction::Bottom) {
            Phase::WaitingForPiece
        } else {
            Phase::Dropping
        };
        if !found.contains(dir) {
            self.move_active(dir)?;
        }
        self.refresh()?;
        Ok(found)
    }

    /// Vacate the piece's old slots, then translate the whole box one cell.
    fn move_active(&mut self, dir: Direction) -> Result<()> {
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };
        for cell in active.cells() {
            if !self.board.get(cell.x, cell.y)?.is_locked() {
                self.board.set(cell.x, cell.y, Cell::EMPTY)?;
            }
        }
        let (dx, dy) = dir.offset();
        active.translate(dx as i16, dy as i16);
        Ok(())
    }

    /// Re-paint the active piece, clear full rows, and publish the board.
    fn refresh(&mut self) -> Result<()> {
        self.board.clear_window_tiles();
        self.render_active_piece()?;
        if self.board.handle_full_rows()? > 0 {
            self.board.clear_window_tiles();
            self.render_active_piece()?;
        }
        self.publish_board();
        Ok(())
    }

    fn is_stopped(&self) -> bool {
        self.phase == Phase::NotStarted
    }

    fn publish_board(&mut self) {
        self.outbound.push(Outbound::Board(self.board.snapshot()));
    }

    fn transact<T>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let pending = mem::take(&mut self.outbound);
        let backup = Checkpoint::of(self);
        match f(self) {
            Ok(value) => {
                let mut fresh = mem::replace(&mut self.outbound, pending);
                self.outbound.append(&mut fresh);
                Ok(value)
            }
            Err(err) => {
                backup.restore(self);
                self.outbound = pending;
                tracing::error!(op, error = %err, "step aborted, state restored");
                Err(err)
            }
        }
    }
}

/// Session state a failed step may have touched.
///
/// The config and piece table never change after construction, so they are
/// left out of the copy.
struct Checkpoint {
    board: Board,
    rng: SimpleRng,
    phase: Phase,
    active: Option<Matrix>,
    next: Option<Matrix>,
    ticks: u64,
}

impl Checkpoint {
    fn of(game: &Game) -> Self {
        Self {
            board: game.board.clone(),
            rng: game.rng.clone(),
            phase: game.phase,
            active: game.active.clone(),
            next: game.next.clone(),
            ticks: game.ticks,
        }
    }

    fn restore(self, game: &mut Game) {
        game.board = self.board;
        game.rng = self.rng;
        game.phase = self.phase;
        game.active = self.active;
        game.next = self.next;
        game.ticks = self.ticks;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::PieceDef;
    use crate::types::{CellState, ColorTag, PieceKind};

    fn only(kind: PieceKind, shape: &str) -> Game {
        let table = PieceTable::from_definitions(&[PieceDef::new(kind, shape)]).unwrap();
        Game::with_pieces(GameConfig::default(), table, 7).unwrap()
    }

    fn o_game() -> Game {
        only(PieceKind::O, "1 1\n1 1")
    }

    fn bottom_row(game: &Game) -> i16 {
        game.active_coordinates().iter().map(|&(_, y)| y).max().unwrap()
    }

    #[test]
    fn test_update_before_setup_is_a_no_op() {
        let mut game = o_game();
        game.update().unwrap();
        assert_eq!(game.phase(), Phase::NotStarted);
        assert_eq!(game.ticks(), 0);
        assert!(game.active().is_none());
        assert!(game.take_outbound().is_empty());
    }

    #[test]
    fn test_setup_publishes_preview_then_board() {
        let mut game = o_game();
        game.setup();
        assert_eq!(game.phase(), Phase::WaitingForPiece);
        let out = game.take_outbound();
        assert_eq!(out.len(), 2);
        assert!(matches!(out[0], Outbound::Preview(ref m) if m.kind() == PieceKind::O));
        assert!(matches!(out[1], Outbound::Board(_)));
        assert!(game.take_outbound().is_empty());

        game.setup();
        assert!(game.take_outbound().is_empty());
    }

    #[test]
    fn test_first_tick_spawns_and_drops() {
        let mut game = o_game();
        game.setup();
        game.update().unwrap();

        assert_eq!(game.phase(), Phase::Dropping);
        assert_eq!(game.ticks(), 1);
        assert_eq!(game.active_coordinates(), vec![(8, 1), (9, 1), (8, 2), (9, 2)]);
        assert!(game.next().is_some());
        assert_eq!(game.board().count(CellState::Player), 4);
    }

    #[test]
    fn test_soft_drop_lands_on_bottom_border() {
        let mut game = o_game();
        game.setup();
        game.update().unwrap();

        let mut guard = 0;
        while !game.shift(Direction::Bottom).unwrap().contains(Direction::Bottom) {
            guard += 1;
            assert!(guard < 64);
        }
        assert_eq!(bottom_row(&game), 23);
        assert_eq!(bottom_row(&game), game.board().bottom_border());
        assert_eq!(game.phase(), Phase::WaitingForPiece);
    }

    #[test]
    fn test_walls_stop_horizontal_shifts() {
        let mut game = o_game();
        game.setup();
        game.update().unwrap();

        for _ in 0..10 {
            game.apply(Command::ShiftLeft).unwrap();
        }
        let min_x = game.active_coordinates().iter().map(|&(x, _)| x).min().unwrap();
        assert_eq!(min_x, game.board().left_border());

        for _ in 0..10 {
            game.apply(Command::ShiftRight).unwrap();
        }
        let max_x = game.active_coordinates().iter().map(|&(x, _)| x).max().unwrap();
        assert_eq!(max_x, game.board().right_border());
    }

    #[test]
    fn test_plunge_lands_and_reports_bottom() {
        let mut game = o_game();
        game.setup();
        game.update().unwrap();

        let fallen = game.plunge().unwrap();
        assert_eq!(fallen, 21);
        assert!((fallen as usize) <= game.board().rows());
        assert_eq!(bottom_row(&game), 23);

        let active = game.active().unwrap();
        assert!(collisions(active, game.board()).unwrap().contains(Direction::Bottom));
        assert_eq!(game.phase(), Phase::WaitingForPiece);
    }

    #[test]
    fn test_landed_piece_locks_on_next_spawn() {
        let mut game = o_game();
        game.setup();
        game.update().unwrap();
        game.plunge().unwrap();
        assert_eq!(game.board().count(CellState::Locked), 0);

        game.update().unwrap();
        assert_eq!(game.board().count(CellState::Locked), 4);
        assert_eq!(game.board().count(CellState::Player), 4);
        assert_eq!(game.board().get(8, 23).unwrap(), Cell::locked(ColorTag::Yellow));
    }

    #[test]
    fn test_locking_into_a_gap_clears_the_row() {
        let mut game = o_game();
        {
            let board = game.board_mut();
            for x in board.left_border()..12 {
                board.set(x, 23, Cell::locked(ColorTag::Red)).unwrap();
            }
            board.set(4, 22, Cell::locked(ColorTag::Blue)).unwrap();
        }
        game.setup();
        game.update().unwrap();
        for _ in 0..4 {
            game.apply(Command::ShiftRight).unwrap();
        }
        game.apply(Command::HardDrop).unwrap();
        game.update().unwrap();

        let board = game.board();
        assert!(!board.is_row_full(23));
        assert_eq!(board.get(4, 23).unwrap(), Cell::locked(ColorTag::Blue));
        assert_eq!(board.get(12, 23).unwrap(), Cell::locked(ColorTag::Yellow));
        assert_eq!(board.get(13, 23).unwrap(), Cell::locked(ColorTag::Yellow));
        assert_eq!(board.get(5, 23).unwrap(), Cell::EMPTY);
        assert_eq!(board.count(CellState::Locked), 3);
        assert_eq!(board.count(CellState::Player), 4);
    }

    #[test]
    fn test_lock_active_is_idempotent() {
        let mut game = o_game();
        game.setup();
        game.update().unwrap();

        assert_eq!(game.lock_active(), 4);
        let board = game.board().clone();
        assert_eq!(game.lock_active(), 0);
        assert_eq!(game.board(), &board);
        assert_eq!(game.phase(), Phase::WaitingForPiece);
    }

    #[test]
    fn test_rotate_keeps_box_in_place() {
        let mut game = only(PieceKind::T, "0 1 0\n1 1 1\n0 0 0");
        game.setup();
        game.update().unwrap();
        let origin = game.active().unwrap().origin();

        game.apply(Command::Rotate).unwrap();

        let active = game.active().unwrap();
        assert_eq!(active.origin(), origin);
        assert_eq!(active.to_string(), "0 1 0\n0 1 1\n0 1 0");
        assert_eq!(game.board().count(CellState::Player), 4);
    }

    #[test]
    fn test_rotate_does_not_paint_over_locked_cells() {
        let mut game = only(PieceKind::T, "0 1 0\n1 1 1\n0 0 0");
        game.setup();
        game.update().unwrap();
        // The T box spans x 8..=10, y 1..=3; the rotated stem reaches (9, 3).
        game.board_mut().set(9, 3, Cell::locked(ColorTag::Red)).unwrap();

        game.rotate().unwrap();

        assert_eq!(game.board().get(9, 3).unwrap(), Cell::locked(ColorTag::Red));
        assert_eq!(game.board().count(CellState::Player), 3);
    }

    #[test]
    fn test_failed_step_restores_state() {
        let mut game = o_game();
        game.setup();
        game.update().unwrap();
        game.take_outbound();
        let before = game.board().clone();

        let mut stray = game.pieces().prototypes()[0].clone();
        stray.translate(40, 5);
        let err = game.insert_piece(stray).unwrap_err();

        assert!(matches!(err, CoreError::OutOfBounds { .. }));
        assert_eq!(game.board(), &before);
        assert_eq!(game.board().count(CellState::Player), 4);
        assert!(game.take_outbound().is_empty());
    }

    #[test]
    fn test_stop_freezes_the_session() {
        let mut game = o_game();
        game.setup();
        game.update().unwrap();
        game.stop();
        let before = game.board().clone();
        game.update().unwrap();
        assert_eq!(game.board(), &before);
        assert_eq!(game.phase(), Phase::NotStarted);
    }

    #[test]
    fn test_commands_after_stop_do_not_restart() {
        let mut game = o_game();
        game.setup();
        game.update().unwrap();
        game.stop();
        game.take_outbound();
        let board = game.board().clone();
        let coords = game.active_coordinates();

        for command in Command::ALL {
            game.apply(command).unwrap();
        }
        let stray = game.pieces().prototypes()[0].clone();
        game.insert_piece(stray).unwrap();
        game.update().unwrap();

        assert_eq!(game.phase(), Phase::NotStarted);
        assert_eq!(game.ticks(), 1);
        assert_eq!(game.board(), &board);
        assert_eq!(game.active_coordinates(), coords);
        assert!(game.take_outbound().is_empty());
    }

    #[test]
    fn test_failed_tick_restores_rng_and_preview() {
        let mut game = o_game();
        game.setup();
        game.update().unwrap();
        game.plunge().unwrap();
        // Push the preview far outside the grid so the next spawn fails.
        let mut stray = game.next().cloned().unwrap();
        stray.translate(40, 0);
        game.next = Some(stray.clone());
        let rng = game.rng.clone();

        assert!(game.update().is_err());
        assert_eq!(game.next(), Some(&stray));
        assert_eq!(game.rng, rng);
        assert_eq!(game.ticks(), 1);
        assert_eq!(game.phase(), Phase::WaitingForPiece);
    }

    #[test]
    fn test_same_seed_same_game() {
        let config = GameConfig::default();
        let mut a = Game::new(config, 42).unwrap();
        let mut b = Game::new(config, 42).unwrap();
        a.setup();
        b.setup();
        for _ in 0..40 {
            a.update().unwrap();
            b.update().unwrap();
        }
        assert_eq!(a.board(), b.board());
        assert_eq!(a.take_outbound(), b.take_outbound());
    }

    #[test]
    fn test_debug_mode_tags_window_cells() {
        let config = GameConfig {
            debug: true,
            ..GameConfig::default()
        };
        let table = PieceTable::from_definitions(&[PieceDef::new(PieceKind::T, "0 1 0\n1 1 1\n0 0 0")])
            .unwrap();
        let mut game = Game::with_pieces(config, table, 1).unwrap();
        game.setup();
        game.update().unwrap();
        assert!(game
            .board()
            .cells()
            .iter()
            .any(|c| c.is_window() && c.color == ColorTag::Window));
    }
}
