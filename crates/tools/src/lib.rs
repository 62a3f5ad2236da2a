//! Developer tooling: read-only world inspection for the CLI and the HUD.
//!
//! # Invariants
//! - Tools never mutate the world.

mod inspector;

pub use inspector::{SegmentInfo, WorldInspector, WorldSummary};

pub fn crate_info() -> &'static str {
    "roadstream-tools v0.1.0"
}
