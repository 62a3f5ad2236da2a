use glam::Vec3;
use rand::Rng;
use roadstream_render::{Material, Primitive, SceneNode};

use crate::config::GenConfig;
use crate::palette;

/// Lateral position of sidewalk pedestrians.
const SIDEWALK_X: f32 = 4.0;
/// Lateral position a crossing starts from; leaving this band ends it.
const CROSSING_HALF_WIDTH: f32 = 3.5;

#[derive(Debug, Clone)]
pub enum PedestrianBlueprint {
    Sidewalk {
        position: Vec3,
        side: f32,
        speed: f32,
        direction: f32,
        node: SceneNode,
    },
    Crosswalk {
        position: Vec3,
        direction: f32,
        speed: f32,
        node: SceneNode,
    },
}

impl PedestrianBlueprint {
    pub fn position(&self) -> Vec3 {
        match self {
            Self::Sidewalk { position, .. } | Self::Crosswalk { position, .. } => *position,
        }
    }

    pub fn node(&self) -> &SceneNode {
        match self {
            Self::Sidewalk { node, .. } | Self::Crosswalk { node, .. } => node,
        }
    }
}

fn figure<R: Rng + ?Sized>(position: Vec3, rng: &mut R) -> SceneNode {
    let clothing = palette::CLOTHING[rng.random_range(0..palette::CLOTHING.len())];
    SceneNode::group()
        .at(position.x, position.y, position.z)
        .with_child(
            SceneNode::mesh(
                Primitive::Cylinder {
                    radius_top: 0.2,
                    radius_bottom: 0.2,
                    height: 1.2,
                },
                Material::phong(clothing),
            )
            .at(0.0, 0.6, 0.0),
        )
        .with_child(
            SceneNode::mesh(Primitive::Sphere { radius: 0.2 }, Material::phong(palette::SKIN))
                .at(0.0, 1.4, 0.0),
        )
}

fn random_side<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.random::<f32>() > 0.5 { -1.0 } else { 1.0 }
}

/// A pedestrian pacing the sidewalk on `side` (-1 left, +1 right) at `z`.
pub fn generate_sidewalk_pedestrian<R: Rng + ?Sized>(
    side: f32,
    z: f32,
    rng: &mut R,
) -> PedestrianBlueprint {
    let position = Vec3::new(side * SIDEWALK_X, 0.0, z);
    let speed = 0.05 + rng.random::<f32>() * 0.03;
    let direction = random_side(rng);
    PedestrianBlueprint::Sidewalk {
        position,
        side,
        speed,
        direction,
        node: figure(position, rng),
    }
}

/// A pedestrian starting to cross at the crosswalk located at `z`, from a
/// random curb toward the opposite one.
pub fn generate_crosswalk_pedestrian<R: Rng + ?Sized>(z: f32, rng: &mut R) -> PedestrianBlueprint {
    let side = random_side(rng);
    let position = Vec3::new(side * CROSSING_HALF_WIDTH, 0.0, z);
    let speed = 0.03 + rng.random::<f32>() * 0.02;
    PedestrianBlueprint::Crosswalk {
        position,
        direction: -side,
        speed,
        node: figure(position, rng),
    }
}

/// Sidewalk pedestrians for the segment starting at `start`: each
/// `pedestrian_spacing` slot is occupied with `pedestrian_probability`.
pub fn sidewalk_pedestrians<R: Rng + ?Sized>(
    start: f32,
    config: &GenConfig,
    rng: &mut R,
) -> Vec<PedestrianBlueprint> {
    let mut pedestrians = Vec::new();
    for slot in 0..config.slots(config.pedestrian_spacing) {
        if !rng.random_bool(config.pedestrian_probability) {
            continue;
        }
        let side = random_side(rng);
        let z = start + slot as f32 * config.pedestrian_spacing
            + rng.random::<f32>() * config.pedestrian_spacing;
        pedestrians.push(generate_sidewalk_pedestrian(side, z, rng));
    }
    pedestrians
}
