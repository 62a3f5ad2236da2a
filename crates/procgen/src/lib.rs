//! Procedural generators.
//!
//! Every generator is a plain function over an explicit random source
//! (`&mut R where R: rand::Rng`). Seed the source to replay a world exactly.
//! Generators return *blueprints*: the data the registry keeps plus the scene
//! subtree to hand to the renderer. Nothing here touches the world or a scene.
//!
//! # Invariants
//! - Generators have no fallible inputs; nonsensical dimensions are a caller
//!   bug, not a runtime error.
//! - Every blueprint positions its scene node at the entity's own position.

mod backdrop;
mod building;
mod config;
mod decoration;
mod lamp;
mod palette;
mod pedestrian;
mod road;

pub use backdrop::{Backdrop, generate_backdrop, vehicle_body};
pub use building::{BuildingBlueprint, generate_building, generate_building_rows};
pub use config::GenConfig;
pub use decoration::{
    DecorationBlueprint, generate_decoration, sidewalk_decorations, timed_decorations,
};
pub use lamp::{LampBlueprint, generate_lamp, pool_transform, sidewalk_lamps};
pub use pedestrian::{
    PedestrianBlueprint, generate_crosswalk_pedestrian, generate_sidewalk_pedestrian,
    sidewalk_pedestrians,
};
pub use road::{SegmentBlueprint, generate_segment};

pub fn crate_info() -> &'static str {
    "roadstream-procgen v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("procgen"));
    }
}
