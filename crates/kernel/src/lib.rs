//! World Kernel: the explicit world state owned by the frame driver.
//!
//! # Invariants
//! - Road segments form one contiguous, strictly increasing run along +Z.
//! - Every entity owns exactly one render handle; removing the entity from
//!   the registry hands the handle back to the caller.
//! - All mutations flow through explicit operations and are recorded in the
//!   event log.
//! - Longitudinal coordinates are local to a floating origin; `rebase` moves
//!   all of them together and `distance` is unaffected.

pub mod entities;
pub mod vehicle;
pub mod world;

pub use entities::{
    Building, CrosswalkPedestrian, Decoration, DecorationKind, EntityKind, LampHandles, LightMode,
    Pedestrian, RoadSegment, SidewalkPedestrian, StreetLamp,
};
pub use vehicle::{Lane, Vehicle, VehicleConfig};
pub use world::{EntityCounts, InvariantBounds, InvariantViolation, World, WorldEvent};
