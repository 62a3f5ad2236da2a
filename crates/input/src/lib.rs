//! Input: logical keys mapped to driving actions.
//!
//! # Invariants
//! - The world core consumes actions, never raw window events.
//! - Lane selection is last-write-wins; repeating a key is harmless.

pub mod action;

pub use action::{Action, Key};
