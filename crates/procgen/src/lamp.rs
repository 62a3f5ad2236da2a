use glam::{Quat, Vec3};
use rand::Rng;
use roadstream_common::Transform;
use roadstream_kernel::LightMode;
use roadstream_render::{Light, Material, Primitive, SceneNode};

use crate::config::GenConfig;
use crate::palette;

/// Lateral offset of lamps, on the road side of each sidewalk.
const LAMP_X: f32 = 3.6;
const HEAD_Y: f32 = 1.55;
const LIGHT_RANGE: f32 = 5.0;
const POOL_OPACITY: f32 = 0.5;
const BLINK_FREQUENCY: f32 = 3.0;

/// Local transform of a lamp's light pool at the given uniform scale.
pub fn pool_transform(scale: f32) -> Transform {
    Transform::from_xyz(0.0, 0.05, 0.0)
        .with_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2))
        .with_scale(Vec3::splat(scale))
}

/// A street lamp split into the three nodes the animator drives.
///
/// `body` is the root (post and head). `light` and `pool` are added as
/// children of it, so their transforms are relative to `position`.
#[derive(Debug, Clone)]
pub struct LampBlueprint {
    pub position: Vec3,
    pub mode: LightMode,
    pub intensity: f32,
    pub frequency: f32,
    pub body: SceneNode,
    pub light: SceneNode,
    pub pool: SceneNode,
}

pub fn generate_lamp<R: Rng + ?Sized>(x: f32, z: f32, rng: &mut R) -> LampBlueprint {
    let mode = LightMode::ALL[rng.random_range(0..LightMode::ALL.len())];
    let (intensity, frequency) = match mode {
        LightMode::Blinking => (0.0, BLINK_FREQUENCY),
        LightMode::AlwaysOn => (1.0, 1.0),
        LightMode::AlwaysOff => (0.0, 1.0),
    };

    let post = Material::phong(palette::LAMP_POST);
    let body = SceneNode::group()
        .at(x, 0.0, z)
        .with_child(
            SceneNode::mesh(
                Primitive::Cylinder {
                    radius_top: 0.05,
                    radius_bottom: 0.05,
                    height: 1.5,
                },
                post,
            )
            .at(0.0, 0.75, 0.0),
        )
        .with_child(
            SceneNode::mesh(
                Primitive::Sphere { radius: 0.15 },
                Material::phong(palette::LAMP_LIGHT),
            )
            .at(0.0, HEAD_Y, 0.0),
        );

    let light = SceneNode::light(Light::Point {
        color: palette::LAMP_LIGHT,
        intensity,
        range: LIGHT_RANGE,
    })
    .at(0.0, HEAD_Y, 0.0);

    let mut pool = SceneNode::mesh(
        Primitive::Circle { radius: 0.5 },
        Material::unlit(palette::LAMP_LIGHT).with_opacity(POOL_OPACITY),
    );
    pool.transform = pool_transform(1.0);

    LampBlueprint {
        position: Vec3::new(x, 0.0, z),
        mode,
        intensity,
        frequency,
        body,
        light,
        pool,
    }
}

/// One lamp on each sidewalk every `lamp_spacing` units.
pub fn sidewalk_lamps<R: Rng + ?Sized>(
    start: f32,
    config: &GenConfig,
    rng: &mut R,
) -> Vec<LampBlueprint> {
    let mut lamps = Vec::new();
    for slot in 0..config.slots(config.lamp_spacing) {
        let z = start + slot as f32 * config.lamp_spacing;
        for x in [-LAMP_X, LAMP_X] {
            lamps.push(generate_lamp(x, z, rng));
        }
    }
    lamps
}
