//! Contains pre-made implementations of the `Board` trait.

/// A `Board` implementation for noughts and crosses.
pub mod noughts_and_crosses;
