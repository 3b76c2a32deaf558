//! Roll Table — procedural flavor text from indented outlines.
//!
//! Compiles an indentation-structured outline of nested choices into a set
//! of named roll tables. Rolling a table picks one root-to-leaf branch
//! uniformly at random and expands inline `[...]` expressions (dice-style
//! ranges, pipe-delimited alternatives, references to other tables) into a
//! final string.

pub mod core;
