//! Per-frame animation of live entities: street lamp lighting and
//! pedestrian movement.
//!
//! # Invariants
//! - After an update every sidewalk pedestrian is within
//!   `[vehicle.z - walk_behind, vehicle.z + walk_ahead]`.
//! - A crossing pedestrian is removed from the world and the scene on the
//!   frame its lateral position first leaves the road.

mod lamp;
mod pedestrian;

pub use lamp::{blink_intensity, pool_pulse, update_lamp};
pub use pedestrian::{bob_height, step_crossing, step_sidewalk};

use std::f64::consts::PI;

use roadstream_common::{EntityId, Transform};
use roadstream_kernel::{Pedestrian, World};
use roadstream_render::Scene;
use serde::Deserialize;

/// Movement bounds and cosmetic constants for the animator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimConfig {
    /// Sidewalk pedestrians further behind the vehicle than this wrap ahead.
    pub walk_behind: f32,
    /// Sidewalk pedestrians further ahead than this wrap behind.
    pub walk_ahead: f32,
    /// Distance ahead of the vehicle a pedestrian wrapping forward lands at.
    pub respawn_ahead: f32,
    /// Crossing pedestrians beyond this lateral distance have left the road.
    pub crossing_half_width: f32,
    pub bob_height: f32,
    /// Radians per millisecond.
    pub bob_rate: f32,
}

impl Default for AnimConfig {
    fn default() -> Self {
        Self {
            walk_behind: 40.0,
            walk_ahead: 200.0,
            respawn_ahead: 180.0,
            crossing_half_width: 3.5,
            bob_height: 0.1,
            bob_rate: 0.01,
        }
    }
}

/// What one animation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimStats {
    pub lamps_updated: usize,
    pub pedestrians_wrapped: usize,
    pub pedestrians_evicted: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Animator {
    pub config: AnimConfig,
}

impl Animator {
    pub fn new(config: AnimConfig) -> Self {
        Self { config }
    }

    /// Animate every lamp and pedestrian for `elapsed` seconds since start.
    pub fn update(&self, world: &mut World, scene: &mut dyn Scene, elapsed: f64) -> AnimStats {
        let mut stats = AnimStats::default();

        for (_, lamp) in world.lamps_mut() {
            update_lamp(lamp, scene, elapsed);
            stats.lamps_updated += 1;
        }

        let vehicle_z = world.vehicle().z();
        // |sin| repeats every pi radians.
        let bob_period_ms = PI / f64::from(self.config.bob_rate);
        let bob = bob_height(((elapsed * 1000.0) % bob_period_ms) as f32, &self.config);
        let mut off_road: Vec<EntityId> = Vec::new();
        for (id, pedestrian) in world.pedestrians_mut() {
            let (position, handle) = match pedestrian {
                Pedestrian::Sidewalk(walker) => {
                    if step_sidewalk(walker, vehicle_z, &self.config) {
                        stats.pedestrians_wrapped += 1;
                    }
                    (&mut walker.position, &walker.handle)
                }
                Pedestrian::Crosswalk(crosser) => {
                    if step_crossing(crosser, &self.config) {
                        off_road.push(*id);
                        continue;
                    }
                    (&mut crosser.position, &crosser.handle)
                }
            };
            position.y = bob;
            scene.set_transform(handle, Transform::from_translation(*position));
        }

        for id in off_road {
            if let Some(pedestrian) = world.remove_pedestrian(id) {
                tracing::debug!(%id, "pedestrian finished crossing");
                scene.remove(pedestrian.into_handle());
                stats.pedestrians_evicted += 1;
            }
        }

        tracing::trace!(
            lamps = stats.lamps_updated,
            wrapped = stats.pedestrians_wrapped,
            evicted = stats.pedestrians_evicted,
            "animation pass complete"
        );
        stats
    }
}

pub fn crate_info() -> &'static str {
    "roadstream-animate v0.1.0"
}
