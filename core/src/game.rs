use rand::Rng;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Session state. `Active` is the initial state; both terminal states are
/// only left through [`Game::restart`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Active,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Active
    }
}

/// One play session: a board plus the rules the board itself does not
/// know about.
///
/// The game is the sole judge of win and loss, enforces that flags block
/// direct reveals and that nothing moves after the game ends, and keeps
/// the outstanding-flag counter and the session clock. Every player
/// intent funnels through [`reveal_cell`](Self::reveal_cell) and
/// [`flag_cell`](Self::flag_cell); refusals come back as values, never as
/// panics.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    board: Board,
    mines_remaining: i32,
    state: GameState,
    started_at: Instant,
}

impl Game {
    /// Starts a session on a freshly generated board.
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, &mut rand::rng())
    }

    /// Starts a session drawing the mine layout from `rng`.
    pub fn with_rng(config: GameConfig, rng: &mut impl Rng) -> Self {
        Self::with_board(Board::generate(config, rng))
    }

    /// Starts a session on a prebuilt board, typically one from
    /// [`Board::from_mine_coords`].
    pub fn with_board(board: Board) -> Self {
        let config = GameConfig::new_unchecked(board.rows(), board.cols(), board.num_mines());
        Self {
            config,
            mines_remaining: i32::from(board.num_mines()),
            board,
            state: GameState::default(),
            started_at: Instant::now(),
        }
    }

    /// Reveals a cell, cascading through its zero region when it has no
    /// adjacent mines.
    ///
    /// Revealing a mine loses the game and leaves the rest of the board
    /// untouched; how much to uncover afterwards is the caller's choice.
    /// A flagged target is refused until unflagged. Out-of-bounds or
    /// already-revealed targets report [`RevealOutcome::NoChange`].
    pub fn reveal_cell(&mut self, row: Coord, col: Coord) -> RevealOutcome {
        use RevealOutcome::*;

        if self.state.is_finished() {
            return Rejected(RejectReason::GameOver);
        }

        let Some(cell) = self.board.cell(row, col) else {
            return NoChange;
        };

        if cell.is_flagged() {
            return Rejected(RejectReason::Flagged);
        }

        if cell.is_mine() {
            self.state = GameState::Lost;
            log::debug!("mine hit at ({row}, {col})");
            return HitMine;
        }

        if !self.board.reveal_cell(row, col) {
            return NoChange;
        }

        self.check_win_condition();
        if self.state.is_finished() { Won } else { Revealed }
    }

    /// Toggles the flag at `(row, col)` and adjusts the outstanding-flag
    /// counter.
    ///
    /// The counter is pure flag arithmetic against the original mine
    /// count: it goes negative when the player over-flags and is never
    /// validated against where the mines actually are.
    pub fn flag_cell(&mut self, row: Coord, col: Coord) -> FlagOutcome {
        use FlagOutcome::*;

        if self.state.is_finished() {
            return Rejected(RejectReason::GameOver);
        }

        if !self.board.is_valid_position(row, col) {
            return Rejected(RejectReason::OutOfBounds);
        }

        if !self.board.toggle_flag(row, col) {
            return NoChange;
        }

        if self.board[(row, col)].is_flagged() {
            self.mines_remaining -= 1;
            Set
        } else {
            self.mines_remaining += 1;
            Removed
        }
    }

    /// Ends the game as won when no safe cell is left hidden. Mines never
    /// need to be revealed or flagged to win.
    fn check_win_condition(&mut self) {
        let all_safe_revealed = self
            .board
            .cells()
            .all(|cell| cell.is_mine() || cell.is_revealed());
        if all_safe_revealed {
            self.state = GameState::Won;
            log::debug!("all safe cells revealed, game won");
        }
    }

    /// Replaces the board with a fresh layout of the same geometry and
    /// mine count, and rewinds the session to its initial state. Nothing
    /// of the previous board survives.
    pub fn restart(&mut self) {
        self.restart_with_rng(&mut rand::rng());
    }

    /// Like [`restart`](Self::restart), drawing the new layout from `rng`.
    pub fn restart_with_rng(&mut self, rng: &mut impl Rng) {
        self.board = Board::generate(self.config, rng);
        self.mines_remaining = i32::from(self.config.mines);
        self.state = GameState::default();
        self.started_at = Instant::now();
        log::debug!("game restarted");
    }

    pub const fn config(&self) -> GameConfig {
        self.config
    }

    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Cell state at `(row, col)` for redraws, `None` out of bounds.
    pub fn cell(&self, row: Coord, col: Coord) -> Option<Cell> {
        self.board.cell(row, col)
    }

    /// Original mine count minus outstanding flags. Negative when the
    /// player has placed more flags than there are mines.
    pub const fn mines_remaining(&self) -> i32 {
        self.mines_remaining
    }

    pub const fn state(&self) -> GameState {
        self.state
    }

    pub const fn is_game_over(&self) -> bool {
        self.state.is_finished()
    }

    pub const fn is_winner(&self) -> bool {
        matches!(self.state, GameState::Won)
    }

    /// Whole seconds since this session's board was created. Display
    /// only; game logic never reads the clock.
    pub fn elapsed_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
