//! Streaming: keeps a finite window of procedurally generated road around the
//! moving vehicle.
//!
//! # Invariants
//! - Road segments are appended only at the frontier: no gaps, no overlaps.
//! - After an update the frontier is at least `lookahead` ahead of the
//!   vehicle, unless the per-frame segment budget ran out.
//! - Every entity removed from the world is removed from the scene in the
//!   same call.

mod budget;
mod spawn;

pub use budget::{CostHistory, FrameCost, StreamConfig, StreamController, StreamStats};
pub use spawn::{
    despawn_lamp, spawn_building, spawn_decoration, spawn_lamp, spawn_pedestrian, spawn_segment,
};

pub fn crate_info() -> &'static str {
    "roadstream-stream v0.1.0"
}
