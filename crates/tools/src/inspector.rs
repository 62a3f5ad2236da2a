use roadstream_common::EntityId;
use roadstream_kernel::{EntityCounts, Lane, World};
use serde::Serialize;

/// World inspector for developer tooling.
///
/// Provides read-only queries against the world state for debugging,
/// soak runs and the desktop HUD.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        let vehicle = world.vehicle();
        WorldSummary {
            tick: world.tick(),
            vehicle_z: vehicle.z(),
            distance: world.distance(),
            vehicle_x: vehicle.x(),
            speed: vehicle.speed(),
            lane: vehicle.lane(),
            frontier: world.frontier(),
            road_start: world.earliest_segment().map(|s| s.start),
            counts: world.counts(),
            pending_events: world.events().len(),
            state_hash: world.state_hash(),
        }
    }

    /// The segment covering `z`, if it is loaded.
    pub fn segment_at(world: &World, z: f32) -> Option<SegmentInfo> {
        world
            .segments()
            .find(|(_, s)| s.contains(z))
            .map(|(id, s)| SegmentInfo {
                id: *id,
                start: s.start,
                end: s.end,
                crosswalk_z: s.crosswalk_z,
            })
    }

    /// All loaded segments in travel order.
    pub fn list_segments(world: &World) -> Vec<SegmentInfo> {
        world
            .segments()
            .map(|(id, s)| SegmentInfo {
                id: *id,
                start: s.start,
                end: s.end,
                crosswalk_z: s.crosswalk_z,
            })
            .collect()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSummary {
    pub tick: u64,
    /// Position in the current local frame.
    pub vehicle_z: f32,
    /// Distance driven since the start, across rebases.
    pub distance: f64,
    pub vehicle_x: f32,
    pub speed: f32,
    pub lane: Lane,
    pub frontier: Option<f32>,
    pub road_start: Option<f32>,
    pub counts: EntityCounts,
    pub pending_events: usize,
    pub state_hash: u64,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = &self.counts;
        writeln!(
            f,
            "World: tick={} distance={:.1} z={:.1} x={:.2} speed={:.2} lane={} hash={:016x}",
            self.tick,
            self.distance,
            self.vehicle_z,
            self.vehicle_x,
            self.speed,
            self.lane.index(),
            self.state_hash
        )?;
        match (self.road_start, self.frontier) {
            (Some(start), Some(end)) => writeln!(f, "Road: [{start:.0}, {end:.0})")?,
            _ => writeln!(f, "Road: empty")?,
        }
        write!(
            f,
            "Entities: {} (segments={} buildings={} decorations={} walkers={} crossers={} lamps={})",
            c.total(),
            c.road_segments,
            c.buildings,
            c.decorations,
            c.sidewalk_pedestrians,
            c.crosswalk_pedestrians,
            c.street_lamps
        )
    }
}

/// One loaded road segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentInfo {
    pub id: EntityId,
    pub start: f32,
    pub end: f32,
    pub crosswalk_z: Option<f32>,
}

impl std::fmt::Display for SegmentInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Segment {} [{:.0}, {:.0})", self.id, self.start, self.end)?;
        if let Some(z) = self.crosswalk_z {
            write!(f, " crosswalk at {z:.1}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadstream_common::RenderHandle;
    use roadstream_kernel::RoadSegment;

    fn world_with_road(segments: usize) -> World {
        let mut world = World::default();
        for i in 0..segments {
            let start = i as f32 * 50.0;
            world.push_segment(RoadSegment {
                start,
                end: start + 50.0,
                crosswalk_z: (i % 2 == 0).then_some(start + 25.0),
                handle: RenderHandle::from_raw(i as u64),
            });
        }
        world
    }

    #[test]
    fn summary_empty_world() {
        let world = World::default();
        let summary = WorldInspector::summary(&world);
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.counts.total(), 0);
        assert_eq!(summary.frontier, None);
        assert!(summary.to_string().contains("Road: empty"));
    }

    #[test]
    fn summary_with_road() {
        let mut world = world_with_road(3);
        world.step();

        let summary = WorldInspector::summary(&world);
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.counts.road_segments, 3);
        assert_eq!(summary.pending_events, 4); // 3 spawns + 1 step
        assert_eq!(summary.road_start, Some(0.0));
        assert_eq!(summary.frontier, Some(150.0));
        let text = summary.to_string();
        assert!(text.contains("Road: [0, 150)"));
        assert!(text.contains("segments=3"));
    }

    #[test]
    fn summary_reports_distance_across_rebases() {
        let mut world = world_with_road(3);
        world.rebase(100.0);
        let summary = WorldInspector::summary(&world);
        assert_eq!(summary.vehicle_z, -75.0);
        assert_eq!(summary.distance, 25.0);
        assert_eq!(summary.road_start, Some(-100.0));
        assert!(summary.to_string().contains("distance=25.0"));
    }

    #[test]
    fn summary_serializes() {
        let summary = WorldInspector::summary(&world_with_road(1));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["counts"]["road_segments"], 1);
        assert_eq!(json["lane"], "left");
    }

    #[test]
    fn segment_lookup() {
        let world = world_with_road(4);
        let seg = WorldInspector::segment_at(&world, 75.0).unwrap();
        assert_eq!((seg.start, seg.end), (50.0, 100.0));
        assert_eq!(seg.crosswalk_z, None);
        assert!(WorldInspector::segment_at(&world, 200.0).is_none());

        let first = WorldInspector::segment_at(&world, 0.0).unwrap();
        assert!(first.to_string().contains("crosswalk at 25.0"));
    }

    #[test]
    fn list_segments_in_order() {
        let world = world_with_road(4);
        let starts: Vec<f32> = WorldInspector::list_segments(&world)
            .iter()
            .map(|s| s.start)
            .collect();
        assert_eq!(starts, vec![0.0, 50.0, 100.0, 150.0]);
    }
}
