//! Shared types used across the roadstream crates.

mod types;

pub use types::{Color, EntityId, RenderHandle, Transform};
