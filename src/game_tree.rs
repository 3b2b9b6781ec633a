use crate::board::{Board, Mark};

/// A single position in the minimax game tree.
///
/// The tree itself is an `ego_tree` arena, so a node only stores its own board snapshot; its
/// children live in the arena and are reached through `NodeRef::children`.
#[derive(Debug, Clone)]
pub struct GameTreeNode<T: Board> {
    /// The game state this node represents.
    pub board: T,
    /// The mark that plays next from this position.
    pub to_move: Mark,
    /// The distance from the root. The root is at height 0.
    pub height: u32,
}

impl<T: Board> GameTreeNode<T> {
    /// Creates a root node for `board` with `to_move` about to play.
    pub fn new(board: T, to_move: Mark) -> Self {
        GameTreeNode {
            board,
            to_move,
            height: 0,
        }
    }

    /// The move that led to this node from its parent. `None` for a root built from an empty
    /// board.
    pub fn prev_move(&self) -> Option<T::Move> {
        self.board.get_last_move()
    }

    /// Builds the child reached by playing `b_move` from this position.
    ///
    /// Returns `None` if the board rejects the move.
    pub fn child(&self, b_move: T::Move) -> Option<Self> {
        let mut board = self.board.clone();
        if !board.perform_move(b_move, self.to_move) {
            return None;
        }

        Some(GameTreeNode {
            board,
            to_move: self.to_move.opponent(),
            height: self.height + 1,
        })
    }
}
