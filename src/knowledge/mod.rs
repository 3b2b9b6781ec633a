//! The twenty questions knowledge base: a binary tree of yes/no questions with guesses at its
//! leaves, a cursor for walking it, and storage for keeping it between rounds.

/// `KnowledgeNode` and the `Answer` branch selector.
pub mod node;
/// The `KnowledgeStore` port and the JSON file adapter.
pub mod store;
/// `KnowledgeTree`: traversal, learning and validation.
pub mod tree;

pub use node::{Answer, KnowledgeNode};
pub use store::{JsonFileStore, KnowledgeStore, load_knowledge};
pub use tree::{Correction, KnowledgeTree, Resolution};
