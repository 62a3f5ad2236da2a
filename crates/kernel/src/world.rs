use std::collections::BTreeMap;

use roadstream_common::EntityId;
use serde::{Deserialize, Serialize};

use crate::entities::{Building, Decoration, EntityKind, Pedestrian, RoadSegment, StreetLamp};
use crate::vehicle::{Vehicle, VehicleConfig};

/// An event record produced by every mutation of the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Entity was created at longitudinal position `z`.
    Spawned { id: EntityId, kind: EntityKind, z: f32 },
    /// Entity was removed; `z` is where it was last seen.
    Despawned { id: EntityId, kind: EntityKind, z: f32 },
    /// Every longitudinal coordinate moved back by `shift`.
    Rebased { shift: f32 },
    /// One frame completed.
    Stepped { tick: u64 },
}

/// Broken structural invariant of the world. Always a bug in the streaming
/// logic, never a recoverable condition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("road is empty")]
    NoRoad,
    #[error("gap or overlap between segments: {previous_end} then {next_start}")]
    Discontinuous { previous_end: f32, next_start: f32 },
    #[error("segment [{start}, {end}) does not have length {expected}")]
    WrongLength { start: f32, end: f32, expected: f32 },
    #[error("frontier {frontier} is short of the lookahead target {required}")]
    LookaheadShort { frontier: f32, required: f32 },
    #[error("stale segment ending at {end} is behind the trailing limit {limit}")]
    StaleSegment { end: f32, limit: f32 },
    #[error("sidewalk pedestrian {id} at z={z} is outside [{min}, {max}]")]
    WalkerOutOfWindow { id: EntityId, z: f32, min: f32, max: f32 },
}

/// Distances the invariant check measures against, relative to the vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvariantBounds {
    pub segment_length: f32,
    pub lookahead: f32,
    pub segment_trailing: f32,
    pub walk_behind: f32,
    pub walk_ahead: f32,
}

/// Live entity counts, per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub road_segments: usize,
    pub buildings: usize,
    pub decorations: usize,
    pub sidewalk_pedestrians: usize,
    pub crosswalk_pedestrians: usize,
    pub street_lamps: usize,
}

impl EntityCounts {
    pub fn total(&self) -> usize {
        self.road_segments
            + self.buildings
            + self.decorations
            + self.sidewalk_pedestrians
            + self.crosswalk_pedestrians
            + self.street_lamps
    }
}

/// The authoritative world state.
///
/// Owned by the frame driver and lent to the streaming controller and the
/// animator. Collections are `BTreeMap`s keyed by sequential ids, so iteration
/// follows creation order; for road segments that is also increasing `z`.
#[derive(Debug)]
pub struct World {
    segments: BTreeMap<EntityId, RoadSegment>,
    buildings: BTreeMap<EntityId, Building>,
    decorations: BTreeMap<EntityId, Decoration>,
    pedestrians: BTreeMap<EntityId, Pedestrian>,
    lamps: BTreeMap<EntityId, StreetLamp>,
    /// End of the furthest segment ever appended. Survives eviction of the
    /// whole road so a vehicle that outran generation resumes at the right
    /// place.
    frontier: Option<f32>,
    /// Sum of every rebase shift. Local `z` plus this is the distance from
    /// the start of the run.
    origin: f64,
    vehicle: Vehicle,
    tick: u64,
    next_id: u64,
    /// Append-only event log, drained by the frame driver each frame.
    event_log: Vec<WorldEvent>,
}

impl Default for World {
    fn default() -> Self {
        Self::new(&VehicleConfig::default())
    }
}

impl World {
    /// An empty world with the vehicle at its configured start.
    pub fn new(vehicle: &VehicleConfig) -> Self {
        Self::with_vehicle(Vehicle::new(vehicle))
    }

    pub fn with_vehicle(vehicle: Vehicle) -> Self {
        Self {
            segments: BTreeMap::new(),
            buildings: BTreeMap::new(),
            decorations: BTreeMap::new(),
            pedestrians: BTreeMap::new(),
            lamps: BTreeMap::new(),
            frontier: None,
            origin: 0.0,
            vehicle,
            tick: 0,
            next_id: 0,
            event_log: Vec::new(),
        }
    }

    /// Frames completed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn vehicle_mut(&mut self) -> &mut Vehicle {
        &mut self.vehicle
    }

    /// Longitudinal offset of the local frame from the start of the run.
    pub fn origin(&self) -> f64 {
        self.origin
    }

    /// Distance of the vehicle from the start of the run. Keeps growing
    /// across rebases.
    pub fn distance(&self) -> f64 {
        self.origin + f64::from(self.vehicle.z())
    }

    /// Move every longitudinal coordinate back by `shift`, keeping `f32`
    /// positions near zero however far the vehicle has driven.
    ///
    /// A shift that is a multiple of the segment length keeps segment bounds
    /// on the same grid; while coordinates stay below 2^24 the subtraction is
    /// exact, so segment continuity is preserved bit for bit.
    pub fn rebase(&mut self, shift: f32) {
        self.vehicle.shift_back(shift);
        self.frontier = self.frontier.map(|f| f - shift);
        for segment in self.segments.values_mut() {
            segment.start -= shift;
            segment.end -= shift;
            segment.crosswalk_z = segment.crosswalk_z.map(|z| z - shift);
        }
        for building in self.buildings.values_mut() {
            building.position.z -= shift;
        }
        for decoration in self.decorations.values_mut() {
            decoration.position.z -= shift;
        }
        for lamp in self.lamps.values_mut() {
            lamp.position.z -= shift;
        }
        for pedestrian in self.pedestrians.values_mut() {
            match pedestrian {
                Pedestrian::Sidewalk(p) => p.position.z -= shift,
                Pedestrian::Crosswalk(p) => p.position.z -= shift,
            }
        }
        self.origin += f64::from(shift);
        self.event_log.push(WorldEvent::Rebased { shift });
    }

    /// Mark the end of a frame.
    pub fn step(&mut self) {
        self.tick += 1;
        self.event_log.push(WorldEvent::Stepped { tick: self.tick });
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    fn allocate(&mut self, kind: EntityKind, z: f32) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.event_log.push(WorldEvent::Spawned { id, kind, z });
        id
    }

    fn record_despawn(&mut self, id: EntityId, kind: EntityKind, z: f32) {
        self.event_log.push(WorldEvent::Despawned { id, kind, z });
    }

    // --- Road segments ---

    /// Append a segment at the frontier.
    ///
    /// # Panics
    /// If `segment.start` is not the current frontier. Segments are only ever
    /// appended, so this is a caller bug.
    pub fn push_segment(&mut self, segment: RoadSegment) -> EntityId {
        if let Some(frontier) = self.frontier() {
            assert!(
                segment.start == frontier,
                "segment must start at the frontier {frontier}, got {}",
                segment.start
            );
        }
        let id = self.allocate(EntityKind::RoadSegment, segment.start);
        self.frontier = Some(segment.end);
        self.segments.insert(id, segment);
        id
    }

    /// End of the furthest segment appended so far.
    pub fn frontier(&self) -> Option<f32> {
        self.frontier
    }

    pub fn earliest_segment(&self) -> Option<&RoadSegment> {
        self.segments.first_key_value().map(|(_, s)| s)
    }

    /// Remove the earliest segment.
    pub fn pop_earliest_segment(&mut self) -> Option<(EntityId, RoadSegment)> {
        let (id, segment) = self.segments.pop_first()?;
        self.record_despawn(id, EntityKind::RoadSegment, segment.start);
        Some((id, segment))
    }

    pub fn segments(&self) -> impl Iterator<Item = (&EntityId, &RoadSegment)> {
        self.segments.iter()
    }

    // --- Buildings ---

    pub fn spawn_building(&mut self, building: Building) -> EntityId {
        let id = self.allocate(EntityKind::Building, building.position.z);
        self.buildings.insert(id, building);
        id
    }

    pub fn buildings(&self) -> impl Iterator<Item = (&EntityId, &Building)> {
        self.buildings.iter()
    }

    /// Remove every building with `z < limit`.
    pub fn evict_buildings_before(&mut self, limit: f32) -> Vec<(EntityId, Building)> {
        let evicted = drain_where(&mut self.buildings, |b| b.position.z < limit);
        for (id, b) in &evicted {
            self.record_despawn(*id, EntityKind::Building, b.position.z);
        }
        evicted
    }

    // --- Decorations ---

    pub fn spawn_decoration(&mut self, decoration: Decoration) -> EntityId {
        let id = self.allocate(EntityKind::Decoration, decoration.position.z);
        self.decorations.insert(id, decoration);
        id
    }

    pub fn decorations(&self) -> impl Iterator<Item = (&EntityId, &Decoration)> {
        self.decorations.iter()
    }

    pub fn evict_decorations_before(&mut self, limit: f32) -> Vec<(EntityId, Decoration)> {
        let evicted = drain_where(&mut self.decorations, |d| d.position.z < limit);
        for (id, d) in &evicted {
            self.record_despawn(*id, EntityKind::Decoration, d.position.z);
        }
        evicted
    }

    // --- Street lamps ---

    pub fn spawn_lamp(&mut self, lamp: StreetLamp) -> EntityId {
        let id = self.allocate(EntityKind::StreetLamp, lamp.position.z);
        self.lamps.insert(id, lamp);
        id
    }

    pub fn lamps(&self) -> impl Iterator<Item = (&EntityId, &StreetLamp)> {
        self.lamps.iter()
    }

    pub fn lamps_mut(&mut self) -> impl Iterator<Item = (&EntityId, &mut StreetLamp)> {
        self.lamps.iter_mut()
    }

    pub fn evict_lamps_before(&mut self, limit: f32) -> Vec<(EntityId, StreetLamp)> {
        let evicted = drain_where(&mut self.lamps, |l| l.position.z < limit);
        for (id, l) in &evicted {
            self.record_despawn(*id, EntityKind::StreetLamp, l.position.z);
        }
        evicted
    }

    // --- Pedestrians ---

    pub fn spawn_pedestrian(&mut self, pedestrian: Pedestrian) -> EntityId {
        let id = self.allocate(pedestrian.kind(), pedestrian.position().z);
        self.pedestrians.insert(id, pedestrian);
        id
    }

    pub fn pedestrians(&self) -> impl Iterator<Item = (&EntityId, &Pedestrian)> {
        self.pedestrians.iter()
    }

    pub fn pedestrians_mut(&mut self) -> impl Iterator<Item = (&EntityId, &mut Pedestrian)> {
        self.pedestrians.iter_mut()
    }

    pub fn remove_pedestrian(&mut self, id: EntityId) -> Option<Pedestrian> {
        let pedestrian = self.pedestrians.remove(&id)?;
        self.record_despawn(id, pedestrian.kind(), pedestrian.position().z);
        Some(pedestrian)
    }

    /// Remove crosswalk pedestrians with `z < limit`. Sidewalk pedestrians
    /// wrap around the vehicle instead and are never evicted by position.
    pub fn evict_crosswalk_pedestrians_before(
        &mut self,
        limit: f32,
    ) -> Vec<(EntityId, Pedestrian)> {
        let evicted = drain_where(&mut self.pedestrians, |p| {
            matches!(p, Pedestrian::Crosswalk(c) if c.position.z < limit)
        });
        for (id, p) in &evicted {
            self.record_despawn(*id, p.kind(), p.position().z);
        }
        evicted
    }

    // --- Whole-world queries ---

    pub fn counts(&self) -> EntityCounts {
        let sidewalk = self
            .pedestrians
            .values()
            .filter(|p| matches!(p, Pedestrian::Sidewalk(_)))
            .count();
        EntityCounts {
            road_segments: self.segments.len(),
            buildings: self.buildings.len(),
            decorations: self.decorations.len(),
            sidewalk_pedestrians: sidewalk,
            crosswalk_pedestrians: self.pedestrians.len() - sidewalk,
            street_lamps: self.lamps.len(),
        }
    }

    pub fn entity_count(&self) -> usize {
        self.counts().total()
    }

    /// Check the structural invariants against the vehicle's current position.
    pub fn check_invariants(&self, bounds: &InvariantBounds) -> Result<(), InvariantViolation> {
        let z = self.vehicle.z();
        let mut previous_end: Option<f32> = None;
        for segment in self.segments.values() {
            if let Some(previous_end) = previous_end {
                if segment.start != previous_end {
                    return Err(InvariantViolation::Discontinuous {
                        previous_end,
                        next_start: segment.start,
                    });
                }
            }
            if (segment.length() - bounds.segment_length).abs() > 1e-3 {
                return Err(InvariantViolation::WrongLength {
                    start: segment.start,
                    end: segment.end,
                    expected: bounds.segment_length,
                });
            }
            previous_end = Some(segment.end);
        }

        if self.segments.is_empty() {
            return Err(InvariantViolation::NoRoad);
        }
        let frontier = self.frontier().ok_or(InvariantViolation::NoRoad)?;
        if frontier < z + bounds.lookahead {
            return Err(InvariantViolation::LookaheadShort {
                frontier,
                required: z + bounds.lookahead,
            });
        }
        if let Some(earliest) = self.earliest_segment() {
            if earliest.end < z - bounds.segment_trailing {
                return Err(InvariantViolation::StaleSegment {
                    end: earliest.end,
                    limit: z - bounds.segment_trailing,
                });
            }
        }

        let (min, max) = (z - bounds.walk_behind, z + bounds.walk_ahead);
        for (id, pedestrian) in &self.pedestrians {
            if let Pedestrian::Sidewalk(walker) = pedestrian {
                let pz = walker.position.z;
                if pz < min || pz > max {
                    return Err(InvariantViolation::WalkerOutOfWindow {
                        id: *id,
                        z: pz,
                        min,
                        max,
                    });
                }
            }
        }
        Ok(())
    }

    /// Deterministic FNV-1a hash of the vehicle and every entity position.
    /// Two runs with the same seed and inputs produce the same hash.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let mix_vec = |h: &mut u64, v: glam::Vec3| {
            mix(h, &v.x.to_le_bytes());
            mix(h, &v.y.to_le_bytes());
            mix(h, &v.z.to_le_bytes());
        };
        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &self.origin.to_le_bytes());
        mix(&mut h, &self.vehicle.z().to_le_bytes());
        mix(&mut h, &self.vehicle.x().to_le_bytes());
        for (id, s) in &self.segments {
            mix(&mut h, &id.0.to_le_bytes());
            mix(&mut h, &s.start.to_le_bytes());
            mix(&mut h, &s.crosswalk_z.unwrap_or(f32::NAN).to_le_bytes());
        }
        for (id, b) in &self.buildings {
            mix(&mut h, &id.0.to_le_bytes());
            mix_vec(&mut h, b.position);
            mix_vec(&mut h, b.size);
        }
        for (id, d) in &self.decorations {
            mix(&mut h, &id.0.to_le_bytes());
            mix_vec(&mut h, d.position);
        }
        for (id, p) in &self.pedestrians {
            mix(&mut h, &id.0.to_le_bytes());
            mix_vec(&mut h, p.position());
        }
        for (id, l) in &self.lamps {
            mix(&mut h, &id.0.to_le_bytes());
            mix_vec(&mut h, l.position);
            mix(&mut h, &l.intensity.to_le_bytes());
        }
        h
    }
}

fn drain_where<T>(
    map: &mut BTreeMap<EntityId, T>,
    pred: impl Fn(&T) -> bool,
) -> Vec<(EntityId, T)> {
    let ids: Vec<EntityId> = map
        .iter()
        .filter(|(_, v)| pred(v))
        .map(|(id, _)| *id)
        .collect();
    ids.into_iter()
        .filter_map(|id| map.remove(&id).map(|v| (id, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CrosswalkPedestrian, LampHandles, LightMode, SidewalkPedestrian};
    use glam::Vec3;
    use roadstream_common::RenderHandle;

    fn handle() -> RenderHandle {
        RenderHandle::from_raw(0)
    }

    fn segment(start: f32) -> RoadSegment {
        RoadSegment {
            start,
            end: start + 50.0,
            crosswalk_z: None,
            handle: handle(),
        }
    }

    fn building(z: f32) -> Building {
        Building {
            position: Vec3::new(9.0, 5.0, z),
            size: Vec3::new(3.0, 10.0, 4.0),
            handle: handle(),
        }
    }

    fn walker(z: f32) -> Pedestrian {
        Pedestrian::Sidewalk(SidewalkPedestrian {
            position: Vec3::new(4.0, 0.0, z),
            side: 1.0,
            speed: 0.05,
            direction: 1.0,
            handle: handle(),
        })
    }

    fn crosser(z: f32) -> Pedestrian {
        Pedestrian::Crosswalk(CrosswalkPedestrian {
            position: Vec3::new(-3.5, 0.0, z),
            direction: 1.0,
            speed: 0.03,
            waiting: false,
            handle: handle(),
        })
    }

    fn bounds() -> InvariantBounds {
        InvariantBounds {
            segment_length: 50.0,
            lookahead: 200.0,
            segment_trailing: 50.0,
            walk_behind: 40.0,
            walk_ahead: 200.0,
        }
    }

    fn world_with_road(segments: usize) -> World {
        let mut world = World::default();
        for i in 0..segments {
            world.push_segment(segment(i as f32 * 50.0));
        }
        world
    }

    #[test]
    fn world_starts_empty() {
        let w = World::default();
        assert_eq!(w.tick(), 0);
        assert_eq!(w.entity_count(), 0);
        assert_eq!(w.frontier(), None);
        assert_eq!(w.vehicle().z(), 25.0);
    }

    #[test]
    fn segments_append_at_frontier() {
        let w = world_with_road(10);
        assert_eq!(w.frontier(), Some(500.0));
        assert_eq!(w.earliest_segment().map(|s| s.start), Some(0.0));
        assert_eq!(w.counts().road_segments, 10);
    }

    #[test]
    #[should_panic(expected = "frontier")]
    fn gap_in_road_panics() {
        let mut w = world_with_road(2);
        w.push_segment(segment(150.0));
    }

    #[test]
    fn frontier_survives_emptying_the_road() {
        let mut w = world_with_road(2);
        while w.pop_earliest_segment().is_some() {}
        assert_eq!(w.frontier(), Some(100.0));
        w.push_segment(segment(100.0));
        assert_eq!(w.frontier(), Some(150.0));
    }

    #[test]
    fn pop_earliest_follows_travel_order() {
        let mut w = world_with_road(3);
        let (_, first) = w.pop_earliest_segment().unwrap();
        assert_eq!(first.start, 0.0);
        assert_eq!(w.earliest_segment().unwrap().start, 50.0);
        assert!(matches!(
            w.events().last(),
            Some(WorldEvent::Despawned {
                kind: EntityKind::RoadSegment,
                ..
            })
        ));
    }

    #[test]
    fn building_eviction_is_strictly_behind() {
        let mut w = World::default();
        w.spawn_building(building(10.0));
        w.spawn_building(building(15.0));
        w.spawn_building(building(40.0));
        let evicted = w.evict_buildings_before(15.0);
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].1.position.z, 10.0);
        assert_eq!(w.counts().buildings, 2);
    }

    #[test]
    fn crosswalk_eviction_leaves_sidewalk_walkers() {
        let mut w = World::default();
        w.spawn_pedestrian(walker(-100.0));
        w.spawn_pedestrian(crosser(-100.0));
        w.spawn_pedestrian(crosser(100.0));
        let evicted = w.evict_crosswalk_pedestrians_before(0.0);
        assert_eq!(evicted.len(), 1);
        let counts = w.counts();
        assert_eq!(counts.sidewalk_pedestrians, 1);
        assert_eq!(counts.crosswalk_pedestrians, 1);
    }

    #[test]
    fn lamps_and_decorations_evict() {
        let mut w = World::default();
        w.spawn_lamp(StreetLamp {
            position: Vec3::new(3.6, 0.0, 5.0),
            mode: LightMode::AlwaysOn,
            intensity: 1.0,
            frequency: 1.0,
            handles: LampHandles {
                root: handle(),
                light: handle(),
                pool: handle(),
            },
        });
        w.spawn_decoration(Decoration {
            kind: crate::entities::DecorationKind::Bench,
            position: Vec3::new(5.0, 0.0, 5.0),
            handle: handle(),
        });
        assert_eq!(w.evict_lamps_before(6.0).len(), 1);
        assert_eq!(w.evict_decorations_before(4.0).len(), 0);
        assert_eq!(w.evict_decorations_before(6.0).len(), 1);
        assert_eq!(w.entity_count(), 0);
    }

    #[test]
    fn events_record_spawns_and_steps() {
        let mut w = World::default();
        let id = w.spawn_building(building(30.0));
        w.step();
        let events = w.drain_events();
        assert_eq!(
            events,
            vec![
                WorldEvent::Spawned {
                    id,
                    kind: EntityKind::Building,
                    z: 30.0
                },
                WorldEvent::Stepped { tick: 1 },
            ]
        );
        assert!(w.events().is_empty());
    }

    #[test]
    fn invariants_hold_for_initial_road() {
        let w = world_with_road(10);
        assert_eq!(w.check_invariants(&bounds()), Ok(()));
    }

    #[test]
    fn invariants_detect_short_lookahead() {
        let w = world_with_road(4);
        assert!(matches!(
            w.check_invariants(&bounds()),
            Err(InvariantViolation::LookaheadShort { .. })
        ));
    }

    #[test]
    fn invariants_detect_walker_outside_window() {
        let mut w = world_with_road(10);
        w.spawn_pedestrian(walker(400.0));
        assert!(matches!(
            w.check_invariants(&bounds()),
            Err(InvariantViolation::WalkerOutOfWindow { .. })
        ));
    }

    #[test]
    fn invariants_detect_stale_segment() {
        let mut w = World::with_vehicle(
            Vehicle::new(&VehicleConfig {
                start_z: 120.0,
                ..VehicleConfig::default()
            }),
        );
        for i in 0..10 {
            w.push_segment(segment(i as f32 * 50.0));
        }
        assert!(matches!(
            w.check_invariants(&bounds()),
            Err(InvariantViolation::StaleSegment { .. })
        ));
    }

    #[test]
    fn empty_world_has_no_road() {
        let w = World::default();
        assert_eq!(w.check_invariants(&bounds()), Err(InvariantViolation::NoRoad));
    }

    #[test]
    fn rebase_moves_everything_and_keeps_distance() {
        let mut w = world_with_road(10);
        w.spawn_building(building(130.0));
        w.spawn_pedestrian(walker(60.0));
        w.spawn_pedestrian(crosser(125.0));
        for _ in 0..200 {
            w.vehicle_mut().advance();
        }
        let before = w.distance();
        assert_eq!(before, 125.0);

        w.rebase(100.0);
        assert_eq!(w.vehicle().z(), 25.0);
        assert_eq!(w.distance(), before);
        assert_eq!(w.origin(), 100.0);
        assert_eq!(w.frontier(), Some(400.0));
        assert_eq!(w.earliest_segment().map(|s| s.start), Some(-100.0));
        assert_eq!(w.buildings().next().map(|(_, b)| b.position.z), Some(30.0));
        let zs: Vec<f32> = w.pedestrians().map(|(_, p)| p.position().z).collect();
        assert_eq!(zs, vec![-40.0, 25.0]);
        assert_eq!(w.events().last(), Some(&WorldEvent::Rebased { shift: 100.0 }));
        // Segments shift on their own grid, so the road stays continuous.
        assert!(matches!(
            w.check_invariants(&bounds()),
            Err(InvariantViolation::StaleSegment { .. })
        ));
        let starts: Vec<f32> = w.segments().map(|(_, s)| s.start).collect();
        assert!(starts.windows(2).all(|p| p[1] - p[0] == 50.0));
    }

    #[test]
    fn vehicle_keeps_moving_far_from_the_start() {
        // 2^23: one ulp of f32 is a whole unit, so 0.5 per frame rounds away.
        let far = 8_388_608.0;
        let mut w = World::new(&VehicleConfig {
            start_z: far,
            ..VehicleConfig::default()
        });
        w.vehicle_mut().advance();
        assert_eq!(w.vehicle().z(), far);

        w.rebase(far);
        let start = w.distance();
        for _ in 0..1000 {
            w.vehicle_mut().advance();
        }
        assert_eq!(w.vehicle().z(), 500.0);
        assert_eq!(w.distance() - start, 500.0);
    }

    #[test]
    fn state_hash_deterministic() {
        let w1 = world_with_road(5);
        let w2 = world_with_road(5);
        assert_eq!(w1.state_hash(), w2.state_hash());

        let mut w3 = world_with_road(5);
        w3.step();
        assert_ne!(w1.state_hash(), w3.state_hash());
    }
}
