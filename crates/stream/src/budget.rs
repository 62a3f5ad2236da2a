use std::time::{Duration, Instant};

use rand::Rng;
use roadstream_kernel::World;
use roadstream_procgen::{GenConfig, PedestrianBlueprint, generate_segment};
use roadstream_render::Scene;
use serde::Deserialize;

use crate::spawn::{despawn_lamp, spawn_segment};

/// Streaming configuration: how far ahead the road must reach, how long
/// passed content survives, and how much may be generated per frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Road must reach at least this far ahead of the vehicle.
    pub lookahead: f32,
    /// Segments ending further than this behind the vehicle are evicted.
    pub segment_trailing: f32,
    /// Buildings, decorations and lamps further than this behind are evicted.
    pub prop_trailing: f32,
    /// Crosswalk pedestrians further than this behind are evicted.
    pub crosswalk_trailing: f32,
    /// Segments laid down before the first frame.
    pub initial_segments: usize,
    /// Start of the first segment.
    pub origin: f32,
    /// Maximum number of segments generated in one frame.
    pub max_segments_per_frame: usize,
    /// Sidewalk pedestrians wrap around the vehicle and are never evicted, so
    /// new ones are only added while the population is below this cap.
    pub max_sidewalk_pedestrians: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            lookahead: 200.0,
            segment_trailing: 50.0,
            prop_trailing: 10.0,
            crosswalk_trailing: 50.0,
            initial_segments: 10,
            origin: 0.0,
            max_segments_per_frame: 4,
            max_sidewalk_pedestrians: 50,
        }
    }
}

/// Per-frame streaming statistics for instrumentation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamStats {
    pub segments_generated: usize,
    pub segments_evicted: usize,
    pub buildings_evicted: usize,
    pub decorations_evicted: usize,
    pub lamps_evicted: usize,
    pub pedestrians_evicted: usize,
    /// Entities created this frame, segments included.
    pub entities_spawned: usize,
    /// The segment budget ran out before the lookahead was covered.
    pub budget_exhausted: bool,
    pub frontier: f32,
    pub frame_time: Duration,
}

impl StreamStats {
    pub fn entities_evicted(&self) -> usize {
        self.segments_evicted
            + self.buildings_evicted
            + self.decorations_evicted
            + self.lamps_evicted
            + self.pedestrians_evicted
    }

    /// Entities created or destroyed this frame.
    pub fn entities_touched(&self) -> usize {
        self.entities_spawned + self.entities_evicted()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Extension {
    segments: usize,
    entities: usize,
    exhausted: bool,
}

/// Keeps the road covered ahead of the vehicle and clears what it has
/// passed.
///
/// Stateless apart from its configuration and the stats of the last update;
/// everything else lives in the [`World`].
#[derive(Debug, Clone)]
pub struct StreamController {
    pub config: StreamConfig,
    pub generation: GenConfig,
    stats: StreamStats,
}

impl StreamController {
    pub fn new(config: StreamConfig, generation: GenConfig) -> Self {
        Self {
            config,
            generation,
            stats: StreamStats::default(),
        }
    }

    /// Lay down the initial stretch of road, from `origin` onward (or from
    /// the frontier if the world already has road). Not budgeted.
    pub fn seed_initial<R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        scene: &mut dyn Scene,
        rng: &mut R,
    ) -> usize {
        let mut spawned = 0;
        for _ in 0..self.config.initial_segments {
            spawned += self.append_segment(world, scene, rng);
        }
        tracing::debug!(
            segments = self.config.initial_segments,
            spawned,
            frontier = world.frontier(),
            "seeded initial road"
        );
        spawned
    }

    fn append_segment<R: Rng + ?Sized>(
        &self,
        world: &mut World,
        scene: &mut dyn Scene,
        rng: &mut R,
    ) -> usize {
        let start = world.frontier().unwrap_or(self.config.origin);
        let mut blueprint = generate_segment(start, &self.generation, rng);
        let mut room = self
            .config
            .max_sidewalk_pedestrians
            .saturating_sub(world.counts().sidewalk_pedestrians);
        blueprint.pedestrians.retain(|p| match p {
            PedestrianBlueprint::Crosswalk { .. } => true,
            PedestrianBlueprint::Sidewalk { .. } if room > 0 => {
                room -= 1;
                true
            }
            PedestrianBlueprint::Sidewalk { .. } => false,
        });
        spawn_segment(world, scene, blueprint)
    }

    fn extend<R: Rng + ?Sized>(
        &self,
        world: &mut World,
        scene: &mut dyn Scene,
        rng: &mut R,
    ) -> Extension {
        let target = world.vehicle().z() + self.config.lookahead;
        let mut ext = Extension::default();
        while world.frontier().is_none_or(|frontier| frontier < target) {
            if ext.segments == self.config.max_segments_per_frame {
                ext.exhausted = true;
                tracing::warn!(
                    frontier = world.frontier(),
                    target,
                    budget = self.config.max_segments_per_frame,
                    "segment budget exhausted before reaching lookahead"
                );
                break;
            }
            ext.entities += self.append_segment(world, scene, rng);
            ext.segments += 1;
        }
        ext
    }

    fn evict(&self, world: &mut World, scene: &mut dyn Scene, stats: &mut StreamStats) {
        let z = world.vehicle().z();

        let segment_limit = z - self.config.segment_trailing;
        while world
            .earliest_segment()
            .is_some_and(|s| s.end < segment_limit)
        {
            let Some((id, segment)) = world.pop_earliest_segment() else {
                break;
            };
            tracing::debug!(%id, start = segment.start, "evicting segment");
            scene.remove(segment.handle);
            stats.segments_evicted += 1;
        }

        let prop_limit = z - self.config.prop_trailing;
        for (_, building) in world.evict_buildings_before(prop_limit) {
            scene.remove(building.handle);
            stats.buildings_evicted += 1;
        }
        for (_, decoration) in world.evict_decorations_before(prop_limit) {
            scene.remove(decoration.handle);
            stats.decorations_evicted += 1;
        }
        for (_, lamp) in world.evict_lamps_before(prop_limit) {
            despawn_lamp(scene, lamp);
            stats.lamps_evicted += 1;
        }

        let crossing_limit = z - self.config.crosswalk_trailing;
        for (_, pedestrian) in world.evict_crosswalk_pedestrians_before(crossing_limit) {
            scene.remove(pedestrian.into_handle());
            stats.pedestrians_evicted += 1;
        }
    }

    /// Extend the road ahead of the vehicle, then evict what is behind it.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        scene: &mut dyn Scene,
        rng: &mut R,
    ) -> &StreamStats {
        let _span = tracing::info_span!("stream_update").entered();
        let frame_start = Instant::now();

        let ext = self.extend(world, scene, rng);
        let mut stats = StreamStats {
            segments_generated: ext.segments,
            entities_spawned: ext.entities,
            budget_exhausted: ext.exhausted,
            ..StreamStats::default()
        };
        self.evict(world, scene, &mut stats);
        stats.frontier = world.frontier().unwrap_or(self.config.origin);
        stats.frame_time = frame_start.elapsed();

        tracing::trace!(
            generated = stats.segments_generated,
            evicted = stats.entities_evicted(),
            frontier = stats.frontier,
            "stream update complete"
        );

        self.stats = stats;
        &self.stats
    }

    /// Statistics from the last update.
    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }
}

/// Cost of one streaming update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCost {
    pub duration: Duration,
    pub entities: usize,
}

impl From<&StreamStats> for FrameCost {
    fn from(stats: &StreamStats) -> Self {
        Self {
            duration: stats.frame_time,
            entities: stats.entities_touched(),
        }
    }
}

/// Ring buffer of recent streaming costs.
#[derive(Debug)]
pub struct CostHistory {
    history: Vec<FrameCost>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl CostHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![FrameCost::default(); capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, cost: FrameCost) {
        self.history[self.index] = cost;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    fn recorded(&self) -> &[FrameCost] {
        &self.history[..self.count()]
    }

    pub fn average_duration(&self) -> Duration {
        let count = self.count();
        if count == 0 {
            return Duration::ZERO;
        }
        self.recorded().iter().map(|c| c.duration).sum::<Duration>() / count as u32
    }

    pub fn max_duration(&self) -> Duration {
        self.recorded()
            .iter()
            .map(|c| c.duration)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    pub fn average_entities(&self) -> f32 {
        let count = self.count();
        if count == 0 {
            return 0.0;
        }
        self.recorded().iter().map(|c| c.entities).sum::<usize>() as f32 / count as f32
    }

    pub fn max_entities(&self) -> usize {
        self.recorded().iter().map(|c| c.entities).max().unwrap_or(0)
    }

    pub fn count(&self) -> usize {
        if self.filled {
            self.capacity
        } else {
            self.index
        }
    }
}
