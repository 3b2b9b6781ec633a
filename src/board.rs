use std::fmt::Debug;

/// The interface a game state must provide for the minimax search.
///
/// The search never inspects the board directly. It asks for legal moves, applies them to
/// clones, and scores the finished positions.
pub trait Board: Clone {
    /// The type representing a move in the game, e.g. a cell coordinate.
    type Move: Copy + Debug + PartialEq;

    /// Returns every legal move from the current state. Empty once the game has ended.
    fn get_available_moves(&self) -> Vec<Self::Move>;

    /// Plays `b_move` for `mark`. Returns `false` without touching the board if the move is
    /// not legal.
    fn perform_move(&mut self, b_move: Self::Move, mark: Mark) -> bool;

    /// The move that produced this board, if any move has been played.
    fn get_last_move(&self) -> Option<Self::Move>;

    /// Whether the game is over, either by a win or a draw.
    fn check_end(&self) -> bool;

    /// Scores the board for the side that is *not* `human`: `1` if it owns a completed line,
    /// `-1` if `human` does, `0` otherwise.
    fn evaluate(&self, human: Mark) -> i32;
}

/// One of the two symbols a player can play.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Mark {
    Nought,
    Cross,
}

impl Mark {
    /// The mark of the other player.
    pub fn opponent(self) -> Mark {
        match self {
            Mark::Nought => Mark::Cross,
            Mark::Cross => Mark::Nought,
        }
    }
}

/// The mark that always opens a round.
pub const FIRST_MARK: Mark = Mark::Cross;
