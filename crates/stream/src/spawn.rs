//! Instantiating blueprints into the world and the scene, and tearing them
//! back down. Every registry insert here is paired with a `Scene::add`, every
//! registry removal with a `Scene::remove`.

use roadstream_common::EntityId;
use roadstream_kernel::{
    Building, CrosswalkPedestrian, Decoration, LampHandles, Pedestrian, RoadSegment,
    SidewalkPedestrian, StreetLamp, World,
};
use roadstream_procgen::{
    BuildingBlueprint, DecorationBlueprint, LampBlueprint, PedestrianBlueprint, SegmentBlueprint,
};
use roadstream_render::Scene;

pub fn spawn_building(world: &mut World, scene: &mut dyn Scene, b: BuildingBlueprint) -> EntityId {
    let handle = scene.add(None, &b.node);
    world.spawn_building(Building {
        position: b.position,
        size: b.size,
        handle,
    })
}

pub fn spawn_decoration(
    world: &mut World,
    scene: &mut dyn Scene,
    d: DecorationBlueprint,
) -> EntityId {
    let handle = scene.add(None, &d.node);
    world.spawn_decoration(Decoration {
        kind: d.kind,
        position: d.position,
        handle,
    })
}

pub fn spawn_lamp(world: &mut World, scene: &mut dyn Scene, l: LampBlueprint) -> EntityId {
    let root = scene.add(None, &l.body);
    let light = scene.add(Some(&root), &l.light);
    let pool = scene.add(Some(&root), &l.pool);
    world.spawn_lamp(StreetLamp {
        position: l.position,
        mode: l.mode,
        intensity: l.intensity,
        frequency: l.frequency,
        handles: LampHandles { root, light, pool },
    })
}

pub fn spawn_pedestrian(
    world: &mut World,
    scene: &mut dyn Scene,
    p: PedestrianBlueprint,
) -> EntityId {
    let handle = scene.add(None, p.node());
    let pedestrian = match p {
        PedestrianBlueprint::Sidewalk {
            position,
            side,
            speed,
            direction,
            ..
        } => Pedestrian::Sidewalk(SidewalkPedestrian {
            position,
            side,
            speed,
            direction,
            handle,
        }),
        PedestrianBlueprint::Crosswalk {
            position,
            direction,
            speed,
            ..
        } => Pedestrian::Crosswalk(CrosswalkPedestrian {
            position,
            direction,
            speed,
            waiting: false,
            handle,
        }),
    };
    world.spawn_pedestrian(pedestrian)
}

/// Append a segment at the frontier together with all of its props.
/// Returns the number of entities created.
pub fn spawn_segment(world: &mut World, scene: &mut dyn Scene, seg: SegmentBlueprint) -> usize {
    let SegmentBlueprint {
        start,
        end,
        crosswalk_z,
        node,
        buildings,
        decorations,
        lamps,
        pedestrians,
    } = seg;
    let spawned = 1 + buildings.len() + decorations.len() + lamps.len() + pedestrians.len();

    let handle = scene.add(None, &node);
    world.push_segment(RoadSegment {
        start,
        end,
        crosswalk_z,
        handle,
    });
    for b in buildings {
        spawn_building(world, scene, b);
    }
    for d in decorations {
        spawn_decoration(world, scene, d);
    }
    for l in lamps {
        spawn_lamp(world, scene, l);
    }
    for p in pedestrians {
        spawn_pedestrian(world, scene, p);
    }
    spawned
}

pub fn despawn_lamp(scene: &mut dyn Scene, lamp: StreetLamp) {
    for handle in lamp.handles.into_removal_order() {
        scene.remove(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use roadstream_procgen::{GenConfig, generate_lamp, generate_segment};
    use roadstream_render::HeadlessScene;

    #[test]
    fn segment_and_props_share_one_root_each() {
        let mut world = World::default();
        let mut scene = HeadlessScene::new();
        let mut rng = Pcg64::seed_from_u64(7);
        let seg = generate_segment(0.0, &GenConfig::default(), &mut rng);
        let spawned = spawn_segment(&mut world, &mut scene, seg);

        assert_eq!(spawned, world.entity_count());
        assert_eq!(scene.root_count(), world.entity_count());
        assert_eq!(world.frontier(), Some(50.0));
    }

    #[test]
    fn lamp_nodes_come_and_go_together() {
        let mut world = World::default();
        let mut scene = HeadlessScene::new();
        let mut rng = Pcg64::seed_from_u64(7);
        spawn_lamp(&mut world, &mut scene, generate_lamp(3.6, 5.0, &mut rng));
        assert_eq!(scene.root_count(), 1);
        let before = scene.node_count();
        assert!(before >= 5);

        for (_, lamp) in world.evict_lamps_before(100.0) {
            despawn_lamp(&mut scene, lamp);
        }
        assert_eq!(scene.node_count(), 0);
    }
}
