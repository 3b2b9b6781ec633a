use crate::board::{Board, Mark};
use crate::game_tree::GameTreeNode;
use crate::random::{RandomGenerator, StandardRandomGenerator};
use ego_tree::{NodeId, NodeMut, NodeRef, Tree};
use log::debug;

/// Look-ahead used when no depth is configured. A 3x3 board never lasts more than 9 moves,
/// so this is an exhaustive search.
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// The outcome of resolving one node with minimax.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Evaluation<M> {
    /// The minimax value of the node, from the searching side's point of view.
    pub score: i32,
    /// The move leading to the child that produced `score`. `None` for leaves.
    pub best_move: Option<M>,
}

/// Exhaustive game-tree search with a minimax driver.
///
/// The whole tree below the current position is built up front into an `ego_tree` arena,
/// the children of every node are shuffled, and `minimax` then resolves it. The shuffle makes
/// the choice between equally valued moves vary from one search to the next.
pub struct MinimaxSearch<T: Board, K: RandomGenerator> {
    tree: Tree<GameTreeNode<T>>,
    ai_mark: Mark,
    max_depth: u32,
    random: K,
}

/// A builder for creating instances of `MinimaxSearch`.
pub struct MinimaxSearchBuilder<T: Board, K: RandomGenerator> {
    board: T,
    ai_mark: Mark,
    max_depth: u32,
    random_generator: K,
}

impl<T: Board, K: RandomGenerator> MinimaxSearchBuilder<T, K> {
    /// Creates a new builder searching for `ai_mark`, which is about to play on `board`.
    pub fn new(board: T, ai_mark: Mark) -> Self {
        Self {
            board,
            ai_mark,
            max_depth: DEFAULT_MAX_DEPTH,
            random_generator: K::default(),
        }
    }

    /// Sets the random number generator used to shuffle the tree.
    pub fn with_random_generator(mut self, rg: K) -> Self {
        self.random_generator = rg;
        self
    }

    /// Limits how many moves ahead the tree is expanded.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builds the search and its game tree.
    pub fn build(self) -> MinimaxSearch<T, K> {
        MinimaxSearch::new(
            self.board,
            self.ai_mark,
            self.max_depth,
            self.random_generator,
        )
    }
}

impl<T: Board, K: RandomGenerator> MinimaxSearch<T, K> {
    /// Returns a new builder for `MinimaxSearch`.
    pub fn builder(board: T, ai_mark: Mark) -> MinimaxSearchBuilder<T, K> {
        MinimaxSearchBuilder::new(board, ai_mark)
    }

    /// Creates the search and immediately builds the game tree for `board`.
    ///
    /// It is recommended to use the builder pattern via `MinimaxSearch::builder()` instead.
    pub fn new(board: T, ai_mark: Mark, max_depth: u32, rg: K) -> Self {
        let mut search = Self {
            tree: Tree::new(GameTreeNode::new(board, ai_mark)),
            ai_mark,
            max_depth,
            random: rg,
        };
        search.build_game_tree();
        search
    }

    /// Returns an immutable reference to the underlying game tree.
    pub fn get_tree(&self) -> &Tree<GameTreeNode<T>> {
        &self.tree
    }

    /// Returns the root node, which holds a copy of the position being searched.
    pub fn get_root(&self) -> NodeRef<'_, GameTreeNode<T>> {
        self.tree.root()
    }

    /// Hands the random generator back, so its state carries over to the next search.
    pub fn into_random_generator(self) -> K {
        self.random
    }

    /// Rebuilds the game tree below the root, then shuffles every node's children.
    pub fn build_game_tree(&mut self) {
        let root = GameTreeNode::new(self.tree.root().value().board.clone(), self.ai_mark);
        self.tree = Tree::new(root);
        Self::expand_node(&mut self.tree.root_mut(), self.max_depth);
        self.shuffle_child_nodes();
        debug!(
            "built game tree with {} nodes (max depth {})",
            self.tree.nodes().count(),
            self.max_depth
        );
    }

    /// Resolves `node` with minimax.
    ///
    /// Leaves (finished boards, or nodes at the depth limit) score with `Board::evaluate`.
    /// Otherwise the children are resolved with the opposite flag and the maximum (when
    /// `maximizing`) or minimum is kept. Among equal scores the first child wins, which is
    /// why the children are shuffled.
    pub fn minimax(
        &self,
        node: NodeRef<'_, GameTreeNode<T>>,
        maximizing: bool,
    ) -> Evaluation<T::Move> {
        let game_node = node.value();
        if game_node.board.check_end() || !node.has_children() {
            return Evaluation {
                score: game_node.board.evaluate(self.ai_mark.opponent()),
                best_move: None,
            };
        }

        let mut best = Evaluation {
            score: if maximizing { i32::MIN } else { i32::MAX },
            best_move: None,
        };
        for child in node.children() {
            let score = self.minimax(child, !maximizing).score;
            let improves = if maximizing {
                score > best.score
            } else {
                score < best.score
            };
            if improves {
                best.score = score;
                best.best_move = child.value().prev_move();
            }
        }

        best
    }

    /// Returns the move the AI should play from the root position.
    ///
    /// The root is maximised for the AI. `None` only when the root has no children, which
    /// callers must never let happen: a finished board has no move to search for.
    pub fn get_best_move(&self) -> Option<T::Move> {
        let root = self.tree.root();
        debug_assert!(
            !root.value().board.check_end(),
            "search invoked on a finished board"
        );

        let evaluation = self.minimax(root, true);
        debug!(
            "minimax picked {:?} with score {}",
            evaluation.best_move, evaluation.score
        );
        evaluation.best_move
    }

    /// Adds a child for every legal move and recurses until the game ends or `max_depth` is hit.
    fn expand_node(node: &mut NodeMut<'_, GameTreeNode<T>>, max_depth: u32) {
        let game_node = node.value().clone();
        if game_node.board.check_end() || game_node.height >= max_depth {
            return;
        }

        for possible_move in game_node.board.get_available_moves() {
            if let Some(child) = game_node.child(possible_move) {
                let mut child_node = node.append(child);
                Self::expand_node(&mut child_node, max_depth);
            }
        }
    }

    /// Gives the children of every node an independent uniform random order.
    fn shuffle_child_nodes(&mut self) {
        let parents: Vec<NodeId> = self
            .tree
            .root()
            .descendants()
            .filter(|node| node.has_children())
            .map(|node| node.id())
            .collect();

        for parent_id in parents {
            let mut children: Vec<NodeId> = match self.tree.get(parent_id) {
                Some(parent) => parent.children().map(|child| child.id()).collect(),
                None => continue,
            };
            self.random.shuffle(&mut children);

            if let Some(mut parent) = self.tree.get_mut(parent_id) {
                // re-appending in shuffled order leaves the children in that order
                for child_id in children {
                    parent.append_id(child_id);
                }
            }
        }
    }
}

impl<T: Board> MinimaxSearch<T, StandardRandomGenerator> {
    pub fn from_board(board: T, ai_mark: Mark) -> Self {
        MinimaxSearchBuilder::new(board, ai_mark).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Mark::{Cross, Nought};
    use crate::boards::noughts_and_crosses::NoughtsAndCrossesBoard;
    use crate::random::CustomNumberGenerator;

    fn board_from(moves: &[(usize, usize, Mark)]) -> NoughtsAndCrossesBoard {
        let mut board = NoughtsAndCrossesBoard::default();
        for &(x, y, mark) in moves {
            assert!(board.play_cell(x, y, mark));
        }
        board
    }

    fn search_for(
        board: NoughtsAndCrossesBoard,
        ai_mark: Mark,
        seed: i64,
    ) -> MinimaxSearch<NoughtsAndCrossesBoard, CustomNumberGenerator> {
        MinimaxSearch::builder(board, ai_mark)
            .with_random_generator(CustomNumberGenerator::new(seed))
            .build()
    }

    #[test]
    fn full_tree_from_empty_board_has_every_game() {
        // arrange
        let board = NoughtsAndCrossesBoard::default();

        // act
        let search = search_for(board, Cross, 1);

        // assert
        let tree = search.get_tree();
        let leaves: Vec<_> = tree.root().descendants().filter(|n| !n.has_children()).collect();
        assert_eq!(leaves.len(), 255_168);
        assert!(leaves.iter().all(|leaf| leaf.value().board.check_end()));
        assert!(leaves.iter().all(|leaf| leaf.value().height <= 9));
        assert_eq!(tree.root().children().count(), 9);
    }

    #[test]
    fn depth_limit_cuts_the_tree() {
        let search = MinimaxSearch::builder(NoughtsAndCrossesBoard::default(), Cross)
            .with_random_generator(CustomNumberGenerator::default())
            .with_max_depth(2)
            .build();

        let leaves: Vec<_> = search
            .get_root()
            .descendants()
            .filter(|n| !n.has_children())
            .collect();
        assert_eq!(leaves.len(), 72);
        assert!(leaves.iter().all(|leaf| leaf.value().height == 2));
    }

    #[test]
    fn children_alternate_marks() {
        let search = MinimaxSearch::builder(NoughtsAndCrossesBoard::default(), Nought)
            .with_random_generator(CustomNumberGenerator::default())
            .with_max_depth(2)
            .build();

        for child in search.get_root().children() {
            let (x, y) = child.value().prev_move().unwrap();
            assert_eq!(child.value().board.cell(x, y).mark, Some(Nought));
            for grandchild in child.children() {
                let (x, y) = grandchild.value().prev_move().unwrap();
                assert_eq!(grandchild.value().board.cell(x, y).mark, Some(Cross));
            }
        }
    }

    #[test]
    fn terminal_board_yields_a_lone_root() {
        let board = board_from(&[
            (0, 0, Cross),
            (0, 1, Nought),
            (1, 0, Cross),
            (1, 1, Nought),
            (2, 0, Cross),
        ]);
        let search = search_for(board, Nought, 3);

        assert!(!search.get_root().has_children());
        assert_eq!(search.get_tree().nodes().count(), 1);
    }

    #[test]
    fn shuffling_changes_child_order_between_builds() {
        let board = NoughtsAndCrossesBoard::default();
        let mut rg = CustomNumberGenerator::new(11);
        let mut orders = Vec::new();
        for _ in 0..5 {
            let search = MinimaxSearch::builder(board, Cross)
                .with_random_generator(rg)
                .with_max_depth(1)
                .build();
            let order: Vec<_> = search
                .get_root()
                .children()
                .map(|child| child.value().prev_move())
                .collect();
            orders.push(order);
            rg = search.into_random_generator();
        }

        assert!(orders.windows(2).any(|pair| pair[0] != pair[1]));
    }

    #[test]
    fn winning_position_is_converted() {
        // X at (0,0) and (1,1), O at (0,1) and (1,0); X to play
        let mut board =
            board_from(&[(0, 0, Cross), (0, 1, Nought), (1, 1, Cross), (1, 0, Nought)]);
        let search = search_for(board, Cross, 5);
        assert_eq!(search.minimax(search.get_root(), true).score, 1);

        let mut to_move = Cross;
        let mut seed = 5;
        while !board.check_end() {
            let (x, y) = search_for(board, to_move, seed).get_best_move().unwrap();
            assert!(board.play_cell(x, y, to_move));
            to_move = to_move.opponent();
            seed += 1;
        }

        assert_eq!(board.winning_mark(), Some(Cross));
    }

    #[test]
    fn blocks_the_opponents_line() {
        // O threatens the top row; X must take (2, 0)
        let board = board_from(&[(0, 0, Nought), (1, 1, Cross), (1, 0, Nought)]);
        for seed in 1..6 {
            let search = search_for(board, Cross, seed);
            assert_eq!(search.get_best_move(), Some((2, 0)), "seed {seed}");
        }
    }

    #[test]
    fn minimax_scores_forced_positions() {
        // X threatens (0, 1), (1, 0) and (1, 1) at once; O to move cannot block them all
        let board = board_from(&[
            (0, 0, Cross),
            (2, 2, Nought),
            (2, 0, Cross),
            (1, 2, Nought),
            (0, 2, Cross),
        ]);
        let search = search_for(board, Nought, 9);

        let root_value = search.minimax(search.get_root(), true);

        assert_eq!(root_value.score, -1);
        assert!(root_value.best_move.is_some());
    }

    #[test]
    fn self_play_from_empty_board_is_a_draw() {
        let mut board = NoughtsAndCrossesBoard::default();
        let mut to_move = Cross;
        let mut rg = CustomNumberGenerator::new(2024);

        while !board.check_end() {
            let search = MinimaxSearch::builder(board, to_move)
                .with_random_generator(rg)
                .build();
            let (x, y) = search.get_best_move().unwrap();
            rg = search.into_random_generator();

            assert!(board.play_cell(x, y, to_move));
            to_move = to_move.opponent();
        }

        assert!(board.check_draw());
    }

    #[test]
    fn never_loses_to_random_play() {
        for seed in 1..4 {
            let mut opponent = CustomNumberGenerator::new(seed * 97);
            let mut rg = CustomNumberGenerator::new(seed);
            let mut board = NoughtsAndCrossesBoard::default();
            let mut to_move = Cross;
            let ai_mark = Nought;

            while !board.check_end() {
                let (x, y) = if to_move == ai_mark {
                    let search = MinimaxSearch::builder(board, ai_mark)
                        .with_random_generator(rg)
                        .build();
                    let best = search.get_best_move().unwrap();
                    rg = search.into_random_generator();
                    best
                } else {
                    let moves = board.get_available_moves();
                    moves[opponent.next_range(0, moves.len() as i32) as usize]
                };
                assert!(board.play_cell(x, y, to_move));
                to_move = to_move.opponent();
            }

            assert_ne!(board.winning_mark(), Some(ai_mark.opponent()), "seed {seed}");
        }
    }
}
