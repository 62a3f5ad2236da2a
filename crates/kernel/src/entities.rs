use glam::Vec3;
use roadstream_common::RenderHandle;
use serde::{Deserialize, Serialize};

/// Kind tag used by the event log and instrumentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    RoadSegment,
    Building,
    Decoration,
    SidewalkPedestrian,
    CrosswalkPedestrian,
    StreetLamp,
}

/// One stretch of road covering `[start, end)` along the travel axis.
///
/// The handle owns the whole segment subtree: road surface, sidewalks, curbs,
/// lane markings and the optional crosswalk.
#[derive(Debug)]
pub struct RoadSegment {
    pub start: f32,
    pub end: f32,
    pub crosswalk_z: Option<f32>,
    pub handle: RenderHandle,
}

impl RoadSegment {
    pub fn length(&self) -> f32 {
        self.end - self.start
    }

    pub fn contains(&self, z: f32) -> bool {
        z >= self.start && z < self.end
    }
}

#[derive(Debug)]
pub struct Building {
    /// Centre of the building footprint; `y` is half the height.
    pub position: Vec3,
    /// Width, height, depth.
    pub size: Vec3,
    pub handle: RenderHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorationKind {
    Tree,
    Bush,
    Bench,
}

impl DecorationKind {
    pub const ALL: [Self; 3] = [Self::Tree, Self::Bush, Self::Bench];
}

#[derive(Debug)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub position: Vec3,
    pub handle: RenderHandle,
}

/// Pedestrian walking up and down a sidewalk forever.
#[derive(Debug)]
pub struct SidewalkPedestrian {
    pub position: Vec3,
    /// -1 for the left sidewalk, +1 for the right one.
    pub side: f32,
    pub speed: f32,
    /// +1 walks with traffic, -1 against it.
    pub direction: f32,
    pub handle: RenderHandle,
}

/// Pedestrian crossing the road at a crosswalk.
#[derive(Debug)]
pub struct CrosswalkPedestrian {
    /// `x` is the lateral position, `z` the crosswalk location.
    pub position: Vec3,
    pub direction: f32,
    pub speed: f32,
    /// Always false for now: nothing makes pedestrians stop at the curb yet.
    pub waiting: bool,
    pub handle: RenderHandle,
}

#[derive(Debug)]
pub enum Pedestrian {
    Sidewalk(SidewalkPedestrian),
    Crosswalk(CrosswalkPedestrian),
}

impl Pedestrian {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Sidewalk(_) => EntityKind::SidewalkPedestrian,
            Self::Crosswalk(_) => EntityKind::CrosswalkPedestrian,
        }
    }

    pub fn position(&self) -> Vec3 {
        match self {
            Self::Sidewalk(p) => p.position,
            Self::Crosswalk(p) => p.position,
        }
    }

    pub fn handle(&self) -> &RenderHandle {
        match self {
            Self::Sidewalk(p) => &p.handle,
            Self::Crosswalk(p) => &p.handle,
        }
    }

    pub fn into_handle(self) -> RenderHandle {
        match self {
            Self::Sidewalk(p) => p.handle,
            Self::Crosswalk(p) => p.handle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightMode {
    Blinking,
    AlwaysOn,
    AlwaysOff,
}

impl LightMode {
    pub const ALL: [Self; 3] = [Self::Blinking, Self::AlwaysOn, Self::AlwaysOff];
}

/// Scene nodes of a street lamp. `light` and `pool` are children of `root`.
#[derive(Debug)]
pub struct LampHandles {
    pub root: RenderHandle,
    pub light: RenderHandle,
    pub pool: RenderHandle,
}

impl LampHandles {
    /// Handles in removal order: children before their parent.
    pub fn into_removal_order(self) -> [RenderHandle; 3] {
        [self.pool, self.light, self.root]
    }
}

#[derive(Debug)]
pub struct StreetLamp {
    pub position: Vec3,
    pub mode: LightMode,
    pub intensity: f32,
    /// Radians per second for the blink and the light-pool pulse.
    pub frequency: f32,
    pub handles: LampHandles,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(raw: u64) -> RenderHandle {
        RenderHandle::from_raw(raw)
    }

    #[test]
    fn segment_span() {
        let seg = RoadSegment {
            start: 50.0,
            end: 100.0,
            crosswalk_z: None,
            handle: handle(1),
        };
        assert_eq!(seg.length(), 50.0);
        assert!(seg.contains(50.0));
        assert!(!seg.contains(100.0));
    }

    #[test]
    fn pedestrian_variants_report_kind_and_position() {
        let walker = Pedestrian::Sidewalk(SidewalkPedestrian {
            position: Vec3::new(-4.0, 0.0, 12.0),
            side: -1.0,
            speed: 0.06,
            direction: 1.0,
            handle: handle(3),
        });
        assert_eq!(walker.kind(), EntityKind::SidewalkPedestrian);
        assert_eq!(walker.position().z, 12.0);

        let crosser = Pedestrian::Crosswalk(CrosswalkPedestrian {
            position: Vec3::new(3.5, 0.0, 25.0),
            direction: -1.0,
            speed: 0.04,
            waiting: false,
            handle: handle(4),
        });
        assert_eq!(crosser.kind(), EntityKind::CrosswalkPedestrian);
        assert_eq!(crosser.handle().raw(), 4);
        assert_eq!(crosser.into_handle().raw(), 4);
    }

    #[test]
    fn lamp_handles_remove_children_first() {
        let handles = LampHandles {
            root: handle(10),
            light: handle(11),
            pool: handle(12),
        };
        let order: Vec<u64> = handles
            .into_removal_order()
            .iter()
            .map(RenderHandle::raw)
            .collect();
        assert_eq!(order, vec![12, 11, 10]);
    }
}
