use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::ops::Index;

use ndarray::Array2;
use rand::Rng;
use rand::RngExt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed-size grid of cells with mines placed at construction.
///
/// The board owns placement, adjacency counting, and the cascade reveal.
/// It has no notion of win or loss and no flag rules; session semantics
/// live in [`Game`](crate::Game). Geometry and mine count never change in
/// place, a resize builds a new board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    rows: Coord,
    cols: Coord,
    num_mines: CellCount,
    grid: Array2<Cell>,
}

impl Board {
    /// Builds a board with `config.mines` mines placed uniformly at random
    /// without replacement, drawing positions from `rng`.
    ///
    /// The mine budget precondition (`mines < rows * cols`) is the
    /// caller's; [`GameConfig::new`] enforces it. Placement draws until
    /// enough distinct positions are hit and would never terminate on a
    /// board with no free cell left.
    pub fn generate(config: GameConfig, rng: &mut impl Rng) -> Self {
        debug_assert!(config.mines < config.total_cells());

        let mut board = Self {
            rows: config.rows,
            cols: config.cols,
            num_mines: config.mines,
            grid: Array2::default(config.size().to_nd_index()),
        };
        board.place_mines(rng);
        board.count_adjacent_mines();
        log::debug!(
            "generated {}x{} board with {} mines",
            board.rows,
            board.cols,
            board.num_mines
        );
        board
    }

    /// Builds a board with mines at exactly the given positions. Duplicate
    /// positions collapse; the mine count is the number of distinct ones.
    pub fn from_mine_coords(rows: Coord, cols: Coord, mine_coords: &[Pos]) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::EmptyBoard);
        }

        let mut grid: Array2<Cell> = Array2::default((rows, cols).to_nd_index());
        let mut num_mines: CellCount = 0;
        for &pos in mine_coords {
            if pos.0 >= rows || pos.1 >= cols {
                return Err(GameError::InvalidCoords);
            }
            let cell = &mut grid[pos.to_nd_index()];
            if !cell.is_mine() {
                cell.place_mine();
                num_mines += 1;
            }
        }

        let mut board = Self {
            rows,
            cols,
            num_mines,
            grid,
        };
        board.count_adjacent_mines();
        Ok(board)
    }

    fn place_mines(&mut self, rng: &mut impl Rng) {
        let mut placed: CellCount = 0;
        while placed < self.num_mines {
            let pos = (
                rng.random_range(0..self.rows),
                rng.random_range(0..self.cols),
            );
            let cell = &mut self.grid[pos.to_nd_index()];
            if !cell.is_mine() {
                cell.place_mine();
                placed += 1;
            }
        }
    }

    fn count_adjacent_mines(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let pos = (row, col);
                if self.grid[pos.to_nd_index()].is_mine() {
                    continue;
                }
                let count: u8 = self
                    .grid
                    .iter_neighbors(pos)
                    .filter(|&neighbor| self.grid[neighbor.to_nd_index()].is_mine())
                    .count()
                    .try_into()
                    .unwrap();
                self.grid[pos.to_nd_index()].set_adjacent_mines(count);
            }
        }
    }

    pub const fn rows(&self) -> Coord {
        self.rows
    }

    pub const fn cols(&self) -> Coord {
        self.cols
    }

    pub const fn num_mines(&self) -> CellCount {
        self.num_mines
    }

    pub const fn size(&self) -> Pos {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.num_mines
    }

    pub const fn is_valid_position(&self, row: Coord, col: Coord) -> bool {
        row < self.rows && col < self.cols
    }

    /// Cell state at `(row, col)`, `None` out of bounds.
    pub fn cell(&self, row: Coord, col: Coord) -> Option<Cell> {
        self.is_valid_position(row, col)
            .then(|| self.grid[(row, col).to_nd_index()])
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.iter()
    }

    /// Toggles the flag on a cell. Returns `false` when the position is
    /// out of bounds or the cell is already revealed.
    pub fn toggle_flag(&mut self, row: Coord, col: Coord) -> bool {
        if !self.is_valid_position(row, col) {
            return false;
        }
        self.grid[(row, col).to_nd_index()].toggle_flag()
    }

    /// Reveals the cell at `(row, col)`; a zero-count cell opens its whole
    /// connected zero region plus the numbered boundary around it.
    ///
    /// Returns `false` without touching the board when the position is out
    /// of bounds or already revealed. Flags are not consulted here: a
    /// flagged cell reached by the cascade (or targeted directly) is
    /// revealed and its flag dropped. Callers that want flags to block a
    /// reveal must check the targeted cell first, as
    /// [`Game::reveal_cell`](crate::Game::reveal_cell) does.
    pub fn reveal_cell(&mut self, row: Coord, col: Coord) -> bool {
        if !self.is_valid_position(row, col) || self.grid[(row, col).to_nd_index()].is_revealed() {
            return false;
        }

        // Breadth-first with an explicit queue so a large empty region
        // cannot overflow the stack. `queued` filters duplicate enqueues in
        // O(1); the revealed check on pop keeps the result correct even if
        // a position slips in twice.
        let mut queued = HashSet::from([(row, col)]);
        let mut queue = VecDeque::from([(row, col)]);

        while let Some(pos) = queue.pop_front() {
            let cell = &mut self.grid[pos.to_nd_index()];
            if cell.is_revealed() {
                continue;
            }
            cell.reveal();
            let is_mine = cell.is_mine();
            let adjacent_mines = cell.adjacent_mines();
            log::trace!("revealed {pos:?}, adjacent mines: {adjacent_mines}");

            // Mine cells carry no meaningful count, so never spread from one.
            if is_mine || adjacent_mines > 0 {
                continue;
            }

            for neighbor in self.grid.iter_neighbors(pos) {
                if !self.grid[neighbor.to_nd_index()].is_revealed() && queued.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        true
    }
}

impl Index<Pos> for Board {
    type Output = Cell;

    fn index(&self, pos: Pos) -> &Self::Output {
        &self.grid[pos.to_nd_index()]
    }
}

/// Indexed text rendering: a column header row, then one row per grid row
/// prefixed with its index, one cell symbol per column.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for col in 0..self.cols {
            write!(f, " {col}")?;
        }
        writeln!(f)?;
        for row in 0..self.rows {
            write!(f, "{row} ")?;
            for col in 0..self.cols {
                write!(f, "{} ", self.grid[(row, col).to_nd_index()])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn mine_positions(board: &Board) -> Vec<Pos> {
        let mut positions = Vec::new();
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                if board[(row, col)].is_mine() {
                    positions.push((row, col));
                }
            }
        }
        positions
    }

    #[test]
    fn generate_places_exact_mine_count() {
        let config = GameConfig::new(9, 9, 10).unwrap();
        for seed in 0..8 {
            let board = Board::generate(config, &mut SmallRng::seed_from_u64(seed));
            assert_eq!(mine_positions(&board).len(), 10);
            assert_eq!(board.num_mines(), 10);
            assert_eq!(board.safe_cells(), 71);
        }
    }

    #[test]
    fn adjacency_counts_match_neighborhood() {
        let board = Board::from_mine_coords(3, 3, &[(1, 1)]).unwrap();
        for row in 0..3 {
            for col in 0..3 {
                if (row, col) == (1, 1) {
                    continue;
                }
                assert_eq!(board[(row, col)].adjacent_mines(), 1, "at ({row}, {col})");
            }
        }

        let board = Board::from_mine_coords(3, 3, &[(0, 0), (2, 2)]).unwrap();
        assert_eq!(board[(1, 1)].adjacent_mines(), 2);
        assert_eq!(board[(0, 1)].adjacent_mines(), 1);
        assert_eq!(board[(2, 1)].adjacent_mines(), 1);
        assert_eq!(board[(0, 2)].adjacent_mines(), 0);
        assert_eq!(board[(2, 0)].adjacent_mines(), 0);
    }

    #[test]
    fn duplicate_mine_coords_collapse() {
        let board = Board::from_mine_coords(2, 2, &[(0, 0), (0, 0)]).unwrap();
        assert_eq!(board.num_mines(), 1);
    }

    #[test]
    fn from_mine_coords_rejects_out_of_bounds() {
        assert_eq!(
            Board::from_mine_coords(2, 2, &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
        assert_eq!(
            Board::from_mine_coords(0, 3, &[]),
            Err(GameError::EmptyBoard)
        );
    }

    #[test]
    fn cascade_opens_zero_region_and_numbered_boundary() {
        let mut board = Board::from_mine_coords(4, 4, &[(3, 3)]).unwrap();
        assert!(board.reveal_cell(0, 0));

        for row in 0..4 {
            for col in 0..4 {
                let cell = board[(row, col)];
                if (row, col) == (3, 3) {
                    assert!(!cell.is_revealed(), "mine must stay hidden");
                } else {
                    assert!(cell.is_revealed(), "({row}, {col}) should be open");
                }
            }
        }
        assert_eq!(board[(2, 2)].adjacent_mines(), 1);
    }

    #[test]
    fn cascade_stops_at_numbered_boundary() {
        // Column of 5 with a mine in the middle: the cascade from the top
        // opens the zero cell and the numbered cell next to the mine, and
        // nothing on the far side.
        let mut board = Board::from_mine_coords(5, 1, &[(2, 0)]).unwrap();
        assert!(board.reveal_cell(0, 0));

        assert!(board[(0, 0)].is_revealed());
        assert!(board[(1, 0)].is_revealed());
        assert!(!board[(2, 0)].is_revealed());
        assert!(!board[(3, 0)].is_revealed());
        assert!(!board[(4, 0)].is_revealed());
    }

    #[test]
    fn reveal_out_of_bounds_is_refused() {
        let mut board = Board::from_mine_coords(2, 2, &[(0, 0)]).unwrap();
        let before = board.clone();
        assert!(!board.reveal_cell(2, 0));
        assert!(!board.reveal_cell(0, 5));
        assert_eq!(board, before);
    }

    #[test]
    fn second_reveal_is_a_noop() {
        let mut board = Board::from_mine_coords(3, 3, &[(2, 2)]).unwrap();
        assert!(board.reveal_cell(0, 0));
        let after_first = board.clone();
        assert!(!board.reveal_cell(0, 0));
        assert_eq!(board, after_first);
    }

    #[test]
    fn cascade_reveals_flagged_neighbors_and_drops_their_flags() {
        let mut board = Board::from_mine_coords(4, 4, &[(3, 3)]).unwrap();
        assert!(board.toggle_flag(1, 1));

        assert!(board.reveal_cell(0, 0));

        let cell = board[(1, 1)];
        assert!(cell.is_revealed());
        assert!(!cell.is_flagged());
    }

    #[test]
    fn toggle_flag_refused_on_revealed_or_out_of_bounds() {
        let mut board = Board::from_mine_coords(2, 2, &[(0, 0)]).unwrap();
        assert!(!board.toggle_flag(5, 5));
        assert!(board.reveal_cell(1, 1));
        assert!(!board.toggle_flag(1, 1));
    }

    #[test]
    fn display_renders_indexed_grid() {
        let mut board = Board::from_mine_coords(2, 2, &[(0, 0)]).unwrap();
        assert!(board.toggle_flag(0, 1));
        assert!(board.reveal_cell(1, 1));

        assert_eq!(board.to_string(), "  0 1\n0 ? F \n1 ? 1 \n");
    }

    #[test]
    fn serde_round_trips_mid_game_state() {
        let mut board = Board::from_mine_coords(3, 3, &[(2, 2)]).unwrap();
        board.toggle_flag(2, 2);
        board.reveal_cell(0, 0);

        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, board);
    }
}
