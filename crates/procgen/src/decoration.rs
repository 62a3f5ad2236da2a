use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Quat, Vec3};
use rand::Rng;
use roadstream_kernel::DecorationKind;
use roadstream_render::{Material, Primitive, SceneNode};

use crate::config::GenConfig;
use crate::palette;

/// Lateral offset of decorations, just outside each sidewalk.
const DECORATION_X: f32 = 5.0;

#[derive(Debug, Clone)]
pub struct DecorationBlueprint {
    pub kind: DecorationKind,
    pub position: Vec3,
    pub node: SceneNode,
}

fn tree<R: Rng + ?Sized>(rng: &mut R) -> SceneNode {
    let mut node = SceneNode::group().with_child(
        SceneNode::mesh(
            Primitive::Cylinder {
                radius_top: 0.15,
                radius_bottom: 0.2,
                height: 1.2,
            },
            Material::phong(palette::TRUNK),
        )
        .at(0.0, 0.6, 0.0),
    );
    for (i, color) in palette::FOLIAGE.iter().enumerate() {
        let layer = i as f32;
        node.push(
            SceneNode::mesh(
                Primitive::Cone {
                    radius: 0.6 - layer * 0.1,
                    height: 1.0,
                },
                Material::phong(*color),
            )
            .at(0.0, 1.2 + layer * 0.4, 0.0)
            .rotated(Quat::from_rotation_y(rng.random::<f32>() * TAU)),
        );
    }
    node
}

fn bush<R: Rng + ?Sized>(rng: &mut R) -> SceneNode {
    let material = Material::phong(palette::BUSH);
    let mut node = SceneNode::group()
        .with_child(SceneNode::mesh(Primitive::Sphere { radius: 0.3 }, material).at(0.0, 0.3, 0.0));
    for _ in 0..3 {
        let x = (rng.random::<f32>() - 0.5) * 0.4;
        let y = 0.25 + rng.random::<f32>() * 0.1;
        let z = (rng.random::<f32>() - 0.5) * 0.4;
        node.push(SceneNode::mesh(Primitive::Sphere { radius: 0.2 }, material).at(x, y, z));
    }
    node
}

fn bench() -> SceneNode {
    let leg = Primitive::Box {
        width: 0.1,
        height: 0.4,
        depth: 0.1,
    };
    let mut node = SceneNode::group()
        .rotated(Quat::from_rotation_y(FRAC_PI_2))
        .with_child(
            SceneNode::mesh(
                Primitive::Box {
                    width: 0.8,
                    height: 0.1,
                    depth: 0.3,
                },
                Material::phong(palette::BENCH_SEAT),
            )
            .at(0.0, 0.5, 0.0),
        );
    for (x, z) in [(-0.35, -0.1), (0.35, -0.1), (-0.35, 0.1), (0.35, 0.1)] {
        node.push(SceneNode::mesh(leg, Material::phong(palette::BENCH_LEG)).at(x, 0.3, z));
    }
    node
}

/// A tree, bush or bench (uniformly chosen) standing at `(x, 0, z)`.
pub fn generate_decoration<R: Rng + ?Sized>(x: f32, z: f32, rng: &mut R) -> DecorationBlueprint {
    let kind = DecorationKind::ALL[rng.random_range(0..DecorationKind::ALL.len())];
    let shape = match kind {
        DecorationKind::Tree => tree(rng),
        DecorationKind::Bush => bush(rng),
        DecorationKind::Bench => bench(),
    };
    DecorationBlueprint {
        kind,
        position: Vec3::new(x, 0.0, z),
        node: SceneNode::group().at(x, 0.0, z).with_child(shape),
    }
}

/// Decorations along both sidewalks of the segment starting at `start`.
///
/// One slot every `decoration_spacing` units; an occupied slot gets one
/// decoration on each side, each jittered forward by up to 2 units.
pub fn sidewalk_decorations<R: Rng + ?Sized>(
    start: f32,
    config: &GenConfig,
    rng: &mut R,
) -> Vec<DecorationBlueprint> {
    let mut decorations = Vec::new();
    for slot in 0..config.slots(config.decoration_spacing) {
        if !rng.random_bool(config.decoration_probability) {
            continue;
        }
        let base = start + slot as f32 * config.decoration_spacing;
        for x in [-DECORATION_X, DECORATION_X] {
            let z = base + rng.random::<f32>() * 2.0;
            decorations.push(generate_decoration(x, z, rng));
        }
    }
    decorations
}

/// The extra pair the periodic timer drops on both sidewalks at `z`.
pub fn timed_decorations<R: Rng + ?Sized>(z: f32, rng: &mut R) -> [DecorationBlueprint; 2] {
    [
        generate_decoration(-DECORATION_X, z, rng),
        generate_decoration(DECORATION_X, z, rng),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn every_kind_shows_up() {
        let mut rng = Pcg64::seed_from_u64(3);
        let kinds: Vec<DecorationKind> = (0..60)
            .map(|_| generate_decoration(5.0, 0.0, &mut rng).kind)
            .collect();
        for kind in DecorationKind::ALL {
            assert!(kinds.contains(&kind), "{kind:?} never generated");
        }
    }

    #[test]
    fn shapes_have_expected_parts() {
        let mut rng = Pcg64::seed_from_u64(3);
        assert_eq!(tree(&mut rng).children.len(), 4);
        assert_eq!(bush(&mut rng).children.len(), 4);
        assert_eq!(bench().children.len(), 5);
    }

    #[test]
    fn sidewalk_slots_come_in_pairs() {
        let mut rng = Pcg64::seed_from_u64(9);
        let config = GenConfig::default();
        let decorations = sidewalk_decorations(200.0, &config, &mut rng);
        assert_eq!(decorations.len() % 2, 0);
        assert!(decorations.len() <= 10);
        for d in &decorations {
            assert_eq!(d.position.x.abs(), DECORATION_X);
            assert!(d.position.z >= 200.0 && d.position.z < 250.0);
            assert_eq!(d.node.transform.position, d.position);
        }
    }

    #[test]
    fn probability_bounds() {
        let mut rng = Pcg64::seed_from_u64(1);
        let never = GenConfig {
            decoration_probability: 0.0,
            ..GenConfig::default()
        };
        assert!(sidewalk_decorations(0.0, &never, &mut rng).is_empty());

        let always = GenConfig {
            decoration_probability: 1.0,
            ..GenConfig::default()
        };
        assert_eq!(sidewalk_decorations(0.0, &always, &mut rng).len(), 10);
    }

    #[test]
    fn timed_pair_straddles_the_road() {
        let mut rng = Pcg64::seed_from_u64(1);
        let [left, right] = timed_decorations(125.0, &mut rng);
        assert_eq!(left.position, Vec3::new(-5.0, 0.0, 125.0));
        assert_eq!(right.position, Vec3::new(5.0, 0.0, 125.0));
    }
}
