use std::fmt;

use serde::{Deserialize, Serialize};

/// Play state of a single grid position.
///
/// Mine placement and the adjacency count are fixed when the board is
/// built; only the flag and reveal markers change during play. A revealed
/// cell is never flagged: revealing drops the flag, and a revealed cell
/// refuses new flags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    is_mine: bool,
    is_flagged: bool,
    is_revealed: bool,
    adjacent_mines: u8,
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        self.is_mine
    }

    pub const fn is_flagged(self) -> bool {
        self.is_flagged
    }

    pub const fn is_revealed(self) -> bool {
        self.is_revealed
    }

    /// Number of mines among the in-bounds Moore neighbors. Zero for mine
    /// cells, where the count is never computed.
    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    pub(crate) fn place_mine(&mut self) {
        self.is_mine = true;
    }

    pub(crate) fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent_mines = count;
    }

    /// Marks the cell revealed. One-way; any flag is dropped so the two
    /// markers stay mutually exclusive even for cells a cascade reaches.
    pub(crate) fn reveal(&mut self) {
        self.is_revealed = true;
        self.is_flagged = false;
    }

    /// Toggles the player flag, refusing once the cell is revealed.
    /// Returns whether the marker changed.
    pub(crate) fn toggle_flag(&mut self) -> bool {
        if self.is_revealed {
            return false;
        }
        self.is_flagged = !self.is_flagged;
        true
    }
}

/// Display symbol consumed by text front ends: `F` flagged, `?` hidden,
/// `*` revealed mine, blank for a revealed zero, the digit otherwise.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_flagged {
            write!(f, "F")
        } else if !self.is_revealed {
            write!(f, "?")
        } else if self.is_mine {
            write!(f, "*")
        } else if self.adjacent_mines == 0 {
            write!(f, " ")
        } else {
            write!(f, "{}", self.adjacent_mines)
        }
    }
}
