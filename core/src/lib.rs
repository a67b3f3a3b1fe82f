use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use game::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod game;
mod types;

/// Board geometry and mine count for a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    /// Validates the geometry: both dimensions at least 1 and strictly
    /// fewer mines than cells. Random placement needs at least one free
    /// cell, so a full board is rejected rather than clamped.
    pub const fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::EmptyBoard);
        }
        if mines >= mult(rows, cols) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(rows, cols, mines))
    }

    pub const fn size(&self) -> Pos {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

/// Why a player intent was refused without touching any state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// The session is in a terminal state; only a restart accepts moves.
    GameOver,
    /// The targeted cell is flagged and flags block direct reveals.
    Flagged,
    /// The coordinates are outside the board.
    OutOfBounds,
}

impl RejectReason {
    pub const fn message(self) -> &'static str {
        match self {
            Self::GameOver => "The game is over! Start a new game.",
            Self::Flagged => "Cell is flagged. Unflag it first to reveal.",
            Self::OutOfBounds => "Position is outside the board.",
        }
    }
}

/// Outcome of a reveal intent. One tagged result covers the whole state
/// machine: the continuing case, both terminal cases, and refusals.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Out-of-bounds target or nothing left to reveal there.
    NoChange,
    /// Cells were revealed and play continues.
    Revealed,
    /// The target was a mine; the session is lost.
    HitMine,
    /// Every safe cell is now revealed; the session is won.
    Won,
    /// The intent was refused.
    Rejected(RejectReason),
}

impl RevealOutcome {
    /// Whether the session is in a terminal state after this outcome.
    pub const fn is_game_over(self) -> bool {
        matches!(
            self,
            Self::HitMine | Self::Won | Self::Rejected(RejectReason::GameOver)
        )
    }

    /// Whether this outcome could have changed the board.
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Revealed | Self::HitMine | Self::Won)
    }

    /// Player-facing description, when there is something to say.
    pub const fn message(self) -> Option<&'static str> {
        match self {
            Self::NoChange | Self::Revealed => None,
            Self::HitMine => Some("You hit a mine! Game over."),
            Self::Won => Some("You Win!"),
            Self::Rejected(reason) => Some(reason.message()),
        }
    }
}

/// Outcome of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    /// The target is revealed; revealed cells cannot be flagged.
    NoChange,
    /// A flag was placed.
    Set,
    /// An existing flag was removed.
    Removed,
    /// The intent was refused.
    Rejected(RejectReason),
}

impl FlagOutcome {
    /// Whether this outcome changed a marker.
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Set | Self::Removed)
    }

    pub const fn message(self) -> Option<&'static str> {
        match self {
            Self::NoChange => None,
            Self::Set => Some("Flag set."),
            Self::Removed => Some("Flag removed."),
            Self::Rejected(reason) => Some(reason.message()),
        }
    }
}
