use crate::board::{Board, Mark};

/// Width and height of the board.
pub const BOARD_SIZE: usize = 3;

const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Every row, column and diagonal as `(x, y)` triples.
const LINES: [[(usize, usize); BOARD_SIZE]; 8] = [
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// A single square of the board.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    /// `None` while the cell is free.
    pub mark: Option<Mark>,
}

impl Cell {
    fn new(x: usize, y: usize) -> Self {
        Self { x, y, mark: None }
    }

    pub fn is_played(&self) -> bool {
        self.mark.is_some()
    }
}

/// A 3x3 noughts and crosses board.
///
/// Cells are stored by value, so `clone` is a cheap, fully independent copy. A move is an
/// `(x, y)` coordinate pair.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct NoughtsAndCrossesBoard {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    free_cells: usize,
    last_played: Option<Cell>,
}

impl Default for NoughtsAndCrossesBoard {
    /// Creates an empty board.
    fn default() -> Self {
        let mut cells = [[Cell::new(0, 0); BOARD_SIZE]; BOARD_SIZE];
        for (x, column) in cells.iter_mut().enumerate() {
            for (y, cell) in column.iter_mut().enumerate() {
                *cell = Cell::new(x, y);
            }
        }

        Self {
            cells,
            free_cells: CELL_COUNT,
            last_played: None,
        }
    }
}

impl NoughtsAndCrossesBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is outside the board.
    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        assert_in_bounds(x, y);
        &self.cells[x][y]
    }

    /// Iterates over all cells, column by column.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub fn free_cells(&self) -> usize {
        self.free_cells
    }

    pub fn played_cells(&self) -> usize {
        CELL_COUNT - self.free_cells
    }

    /// The most recently played cell.
    pub fn last_played(&self) -> Option<&Cell> {
        self.last_played.as_ref()
    }

    /// Marks `(x, y)` for `mark`. Returns `false` and leaves the board untouched if the cell is
    /// already played.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is outside the board.
    pub fn play_cell(&mut self, x: usize, y: usize, mark: Mark) -> bool {
        assert_in_bounds(x, y);
        let cell = &mut self.cells[x][y];
        if cell.is_played() {
            return false;
        }

        cell.mark = Some(mark);
        self.last_played = Some(*cell);
        self.free_cells -= 1;
        true
    }

    /// Returns the mark owning a completed line, if there is one.
    pub fn winning_mark(&self) -> Option<Mark> {
        // nobody can own a line before a full line's worth of moves has been played
        if self.played_cells() < BOARD_SIZE {
            return None;
        }

        LINES.iter().find_map(|line| self.line_owner(line))
    }

    /// True if a row, column or diagonal is held entirely by one mark.
    pub fn check_win(&self) -> bool {
        self.winning_mark().is_some()
    }

    /// True if the board is full and nobody has won.
    pub fn check_draw(&self) -> bool {
        self.free_cells == 0 && !self.check_win()
    }

    pub fn check_end(&self) -> bool {
        self.check_win() || self.check_draw()
    }

    /// Scores the board from the side opposite to `human`: `1` for a line owned by the other
    /// side, `-1` for a line owned by `human`, `0` when no line is complete.
    pub fn evaluate(&self, human: Mark) -> i32 {
        match self.winning_mark() {
            None => 0,
            Some(mark) if mark == human => -1,
            Some(_) => 1,
        }
    }

    fn line_owner(&self, line: &[(usize, usize); BOARD_SIZE]) -> Option<Mark> {
        let first = self.cells[line[0].0][line[0].1].mark?;
        line[1..]
            .iter()
            .all(|&(x, y)| self.cells[x][y].mark == Some(first))
            .then_some(first)
    }
}

impl Board for NoughtsAndCrossesBoard {
    type Move = (usize, usize);

    fn get_available_moves(&self) -> Vec<Self::Move> {
        if self.check_end() {
            return Vec::new();
        }

        // row-major, matching how a player scans the board
        let mut moves = Vec::with_capacity(self.free_cells);
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                if !self.cells[x][y].is_played() {
                    moves.push((x, y));
                }
            }
        }
        moves
    }

    fn perform_move(&mut self, b_move: Self::Move, mark: Mark) -> bool {
        self.play_cell(b_move.0, b_move.1, mark)
    }

    fn get_last_move(&self) -> Option<Self::Move> {
        self.last_played.map(|cell| (cell.x, cell.y))
    }

    fn check_end(&self) -> bool {
        NoughtsAndCrossesBoard::check_end(self)
    }

    fn evaluate(&self, human: Mark) -> i32 {
        NoughtsAndCrossesBoard::evaluate(self, human)
    }
}

fn assert_in_bounds(x: usize, y: usize) {
    assert!(
        x < BOARD_SIZE && y < BOARD_SIZE,
        "cell ({x}, {y}) is outside the {BOARD_SIZE}x{BOARD_SIZE} board"
    );
}
