use rand::Rng;
use roadstream_render::{Material, Primitive, SceneNode};
use tracing::debug;

use crate::building::{BuildingBlueprint, generate_building_rows};
use crate::config::GenConfig;
use crate::decoration::{DecorationBlueprint, sidewalk_decorations};
use crate::lamp::{LampBlueprint, sidewalk_lamps};
use crate::palette;
use crate::pedestrian::{PedestrianBlueprint, generate_crosswalk_pedestrian, sidewalk_pedestrians};

const ROAD_WIDTH: f32 = 6.0;
const SIDEWALK_WIDTH: f32 = 2.0;
const SIDEWALK_X: f32 = 4.0;
const CURB_X: f32 = 3.0;
const CURB_SIZE: f32 = 0.15;
const DASH_COUNT: usize = 10;
const DASH_LENGTH: f32 = 2.0;
const LINE_WIDTH: f32 = 0.2;
const SIDE_LINE_X: f32 = 2.5;
const STRIPE_COUNT: usize = 6;
const STRIPE_WIDTH: f32 = 0.4;
const STRIPE_GAP: f32 = 0.4;
const STRIPE_LENGTH: f32 = 6.0;

/// Everything one road segment brings into the world.
///
/// `node` holds the road surface, sidewalks, curbs, markings and crosswalk,
/// positioned at the segment centre. Props are independent subtrees with
/// their own lifetimes.
#[derive(Debug, Clone)]
pub struct SegmentBlueprint {
    pub start: f32,
    pub end: f32,
    pub crosswalk_z: Option<f32>,
    pub node: SceneNode,
    pub buildings: Vec<BuildingBlueprint>,
    pub decorations: Vec<DecorationBlueprint>,
    pub lamps: Vec<LampBlueprint>,
    pub pedestrians: Vec<PedestrianBlueprint>,
}

fn flat(width: f32, length: f32, material: Material) -> SceneNode {
    SceneNode::mesh(
        Primitive::Plane {
            width,
            height: length,
        },
        material,
    )
}

fn surface(length: f32) -> SceneNode {
    let mut node = SceneNode::group();
    node.push(flat(ROAD_WIDTH, length, Material::phong(palette::ROAD)).flat_on_ground());
    for side in [-1.0f32, 1.0] {
        node.push(
            flat(SIDEWALK_WIDTH, length, Material::phong(palette::SIDEWALK))
                .at(side * SIDEWALK_X, 0.05, 0.0)
                .flat_on_ground(),
        );
        node.push(
            SceneNode::mesh(
                Primitive::Box {
                    width: CURB_SIZE,
                    height: CURB_SIZE,
                    depth: length,
                },
                Material::phong(palette::CURB),
            )
            .at(side * CURB_X, CURB_SIZE / 2.0, 0.0),
        );
    }
    node
}

fn markings(length: f32) -> SceneNode {
    let paint = Material::unlit(palette::MARKING);
    let mut node = SceneNode::group();
    let gap = (length - DASH_COUNT as f32 * DASH_LENGTH) / (DASH_COUNT + 1) as f32;
    for i in 0..DASH_COUNT {
        let z = -length / 2.0 + gap * (i + 1) as f32 + DASH_LENGTH * (i as f32 + 0.5);
        node.push(
            flat(LINE_WIDTH, DASH_LENGTH, paint)
                .at(0.0, 0.01, z)
                .flat_on_ground(),
        );
    }
    for side in [-1.0f32, 1.0] {
        node.push(
            flat(LINE_WIDTH, length, paint)
                .at(side * SIDE_LINE_X, 0.01, 0.0)
                .flat_on_ground(),
        );
    }
    node
}

fn crosswalk() -> SceneNode {
    let paint = Material::unlit(palette::MARKING);
    let pitch = STRIPE_WIDTH + STRIPE_GAP;
    let first = -(STRIPE_COUNT as f32 * pitch - STRIPE_GAP) / 2.0;
    let mut node = SceneNode::group();
    for i in 0..STRIPE_COUNT {
        let x = first + i as f32 * pitch;
        node.push(
            flat(STRIPE_WIDTH, STRIPE_LENGTH, paint)
                .at(x, 0.02, 0.0)
                .flat_on_ground(),
        );
    }
    node
}

/// Generate the segment covering `[start, start + segment_length)` and all
/// of its props.
pub fn generate_segment<R: Rng + ?Sized>(
    start: f32,
    config: &GenConfig,
    rng: &mut R,
) -> SegmentBlueprint {
    let length = config.segment_length;
    let end = start + length;
    let centre = start + length / 2.0;

    let mut node = SceneNode::group()
        .at(0.0, 0.0, centre)
        .with_child(surface(length))
        .with_child(markings(length));

    let mut pedestrians = Vec::new();
    let crosswalk_z = if rng.random_bool(config.crosswalk_probability) {
        node.push(crosswalk());
        pedestrians.push(generate_crosswalk_pedestrian(centre, rng));
        Some(centre)
    } else {
        None
    };

    let buildings = generate_building_rows(start, config, rng);
    let decorations = sidewalk_decorations(start, config, rng);
    let lamps = sidewalk_lamps(start, config, rng);
    pedestrians.extend(sidewalk_pedestrians(start, config, rng));

    debug!(
        start,
        crosswalk = crosswalk_z.is_some(),
        buildings = buildings.len(),
        decorations = decorations.len(),
        pedestrians = pedestrians.len(),
        "generated segment"
    );

    SegmentBlueprint {
        start,
        end,
        crosswalk_z,
        node,
        buildings,
        decorations,
        lamps,
        pedestrians,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn covers_one_segment_length() {
        let mut rng = Pcg64::seed_from_u64(1);
        let seg = generate_segment(150.0, &GenConfig::default(), &mut rng);
        assert_eq!(seg.start, 150.0);
        assert_eq!(seg.end, 200.0);
        assert_eq!(seg.node.transform.position.z, 175.0);
    }

    #[test]
    fn surface_and_markings_layout() {
        let surface = surface(50.0);
        // road + (sidewalk, curb) per side
        assert_eq!(surface.children.len(), 5);

        let markings = markings(50.0);
        assert_eq!(markings.children.len(), DASH_COUNT + 2);
        // gaps of 30/11 between dashes and at both ends
        let first = markings.children[0].transform.position.z;
        let last = markings.children[DASH_COUNT - 1].transform.position.z;
        let gap = 30.0 / 11.0;
        assert!((first - (-25.0 + gap + 1.0)).abs() < 1e-4);
        assert!((last - (25.0 - gap - 1.0)).abs() < 1e-4);
    }

    #[test]
    fn crosswalk_stripe_offsets() {
        let stripes = crosswalk();
        let xs: Vec<f32> = stripes
            .children
            .iter()
            .map(|s| s.transform.position.x)
            .collect();
        assert_eq!(xs.len(), 6);
        assert!((xs[0] + 2.2).abs() < 1e-5);
        assert!((xs[5] - 1.8).abs() < 1e-5);
    }

    #[test]
    fn crosswalk_brings_one_crossing_pedestrian() {
        let always = GenConfig {
            crosswalk_probability: 1.0,
            pedestrian_probability: 0.0,
            ..GenConfig::default()
        };
        let seg = generate_segment(0.0, &always, &mut Pcg64::seed_from_u64(3));
        assert_eq!(seg.crosswalk_z, Some(25.0));
        assert_eq!(seg.pedestrians.len(), 1);
        assert!(matches!(seg.pedestrians[0], PedestrianBlueprint::Crosswalk { .. }));
        assert_eq!(seg.node.children.len(), 3);

        let never = GenConfig {
            crosswalk_probability: 0.0,
            ..always
        };
        let seg = generate_segment(0.0, &never, &mut Pcg64::seed_from_u64(3));
        assert_eq!(seg.crosswalk_z, None);
        assert!(seg.pedestrians.is_empty());
        assert_eq!(seg.node.children.len(), 2);
    }

    #[test]
    fn crosswalk_rate_is_roughly_a_fifth() {
        let mut rng = Pcg64::seed_from_u64(99);
        let config = GenConfig::default();
        let hits = (0..1000)
            .filter(|i| {
                generate_segment(*i as f32 * 50.0, &config, &mut rng)
                    .crosswalk_z
                    .is_some()
            })
            .count();
        assert!((140..260).contains(&hits), "{hits} crosswalks in 1000");
    }
}
