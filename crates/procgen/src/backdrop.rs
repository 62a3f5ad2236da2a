use std::f32::consts::{FRAC_PI_2, TAU};

use rand::Rng;
use roadstream_common::Color;
use roadstream_render::{Environment, Light, Material, Primitive, SceneNode};

use crate::config::GenConfig;
use crate::palette;

const GROUND_SIZE: f32 = 1000.0;
const GROUND_Y: f32 = -0.1;
const STAR_RADIUS: f32 = 1.5;
const STAR_LIFT: f32 = 200.0;

/// The static surroundings: night sky, lighting and ground.
///
/// `sky` and `ground` are expected to follow the vehicle along the road so
/// they never run out; `lights` stays put.
#[derive(Debug, Clone)]
pub struct Backdrop {
    pub environment: Environment,
    pub sky: SceneNode,
    pub lights: SceneNode,
    pub ground: SceneNode,
}

fn star_dome<R: Rng + ?Sized>(count: usize, rng: &mut R) -> SceneNode {
    let star = Material::unlit(Color::WHITE);
    let mut node = SceneNode::group();
    for _ in 0..count {
        let theta = rng.random::<f32>() * TAU;
        let phi = rng.random::<f32>() * FRAC_PI_2;
        let radius = 500.0 + rng.random::<f32>() * 500.0;
        node.push(
            SceneNode::mesh(Primitive::Sphere { radius: STAR_RADIUS }, star).at(
                radius * phi.sin() * theta.cos(),
                radius * phi.cos() + STAR_LIFT,
                radius * phi.sin() * theta.sin(),
            ),
        );
    }
    node
}

pub fn generate_backdrop<R: Rng + ?Sized>(config: &GenConfig, rng: &mut R) -> Backdrop {
    let lights = SceneNode::group()
        .with_child(SceneNode::light(Light::Ambient {
            color: Color::WHITE,
            intensity: 0.6,
        }))
        .with_child(
            SceneNode::light(Light::Directional {
                color: Color::WHITE,
                intensity: 0.8,
            })
            .at(0.0, 50.0, 50.0),
        );

    let ground = SceneNode::mesh(
        Primitive::Plane {
            width: GROUND_SIZE,
            height: GROUND_SIZE,
        },
        Material::phong(palette::GROUND),
    )
    .at(0.0, GROUND_Y, 0.0)
    .flat_on_ground();

    Backdrop {
        environment: Environment::default(),
        sky: star_dome(config.star_count, rng),
        lights,
        ground,
    }
}

/// The player's car: a red box resting on the road.
pub fn vehicle_body() -> SceneNode {
    SceneNode::mesh(
        Primitive::Box {
            width: 2.0,
            height: 1.0,
            depth: 4.0,
        },
        Material::phong(palette::VEHICLE),
    )
    .at(0.0, 0.5, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn stars_sit_on_a_lifted_dome() {
        let mut rng = Pcg64::seed_from_u64(12);
        let backdrop = generate_backdrop(&GenConfig::default(), &mut rng);
        assert_eq!(backdrop.sky.children.len(), 500);
        for star in &backdrop.sky.children {
            let mut p = star.transform.position;
            assert!(p.y >= STAR_LIFT);
            p.y -= STAR_LIFT;
            let r = p.length();
            assert!((499.9..1000.1).contains(&r), "radius {r}");
        }
    }

    #[test]
    fn night_environment() {
        let mut rng = Pcg64::seed_from_u64(12);
        let config = GenConfig {
            star_count: 0,
            ..GenConfig::default()
        };
        let backdrop = generate_backdrop(&config, &mut rng);
        assert!(backdrop.environment.background.is_black());
        assert_eq!(backdrop.environment.fog_density, 0.002);
        assert!(backdrop.sky.children.is_empty());
        assert_eq!(backdrop.lights.children.len(), 2);
        assert_eq!(backdrop.ground.transform.position.y, GROUND_Y);
    }

    #[test]
    fn car_rests_on_the_road() {
        let body = vehicle_body();
        assert_eq!(body.transform.position.y, 0.5);
    }
}
