//! Two small tree-driven games: noughts and crosses against a minimax AI, and a twenty
//! questions guesser that learns from every game it loses.
//!
//! The noughts and crosses AI builds the full game tree below the current position in an
//! arena, shuffles every node's children so equal moves are picked without positional bias,
//! and resolves it with minimax. The twenty questions program walks a binary tree of yes/no
//! questions and grafts a new question onto the leaf it guessed wrong.
//!
//! Neither game renders anything. They talk to the host through small display traits and are
//! driven by explicit input and time calls.
//!
//! # Example
//!
//! ```rust
//! use treespire::board::Mark;
//! use treespire::boards::noughts_and_crosses::NoughtsAndCrossesBoard;
//! use treespire::random::CustomNumberGenerator;
//! use treespire::search::{MinimaxSearch, DEFAULT_MAX_DEPTH};
//!
//! // Cross has played the centre; find Nought's reply
//! let mut board = NoughtsAndCrossesBoard::default();
//! board.play_cell(1, 1, Mark::Cross);
//!
//! let search = MinimaxSearch::builder(board, Mark::Nought)
//!     .with_random_generator(CustomNumberGenerator::default())
//!     .with_max_depth(DEFAULT_MAX_DEPTH)
//!     .build();
//!
//! let best_move = search.get_best_move();
//! println!("The best move is: {:?}", best_move);
//! ```

/// Contains the `Board` trait and the `Mark` players play with.
pub mod board;
/// Contains pre-made implementations of the `Board` trait.
pub mod boards;
/// Configuration for both programs.
pub mod config;
/// The crate error type.
pub mod error;
/// Contains the `GameTreeNode` struct, which represents a position in the search tree.
pub mod game_tree;
/// The twenty questions knowledge tree and its storage.
pub mod knowledge;
/// The noughts and crosses turn state machine.
pub mod noughts_and_crosses;
/// The twenty questions dialogue.
pub mod questions;
/// Contains traits and implementations for random number generation.
pub mod random;
/// A single-threaded timer queue with cancellation.
pub mod schedule;
/// The game-tree builder and minimax driver.
pub mod search;

pub use error::{Error, Result};
