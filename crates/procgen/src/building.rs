use std::f32::consts::PI;

use glam::{Quat, Vec3};
use rand::Rng;
use roadstream_common::Color;
use roadstream_render::{Material, Primitive, SceneNode};

use crate::config::GenConfig;
use crate::palette;

const WINDOW_SIZE: f32 = 0.3;
const WINDOW_SPACING_X: f32 = 0.8;
const WINDOW_SPACING_Y: f32 = 1.0;
const WINDOW_EMISSIVE: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct BuildingBlueprint {
    /// Footprint centre; `y` is half the height so the base sits on the ground.
    pub position: Vec3,
    /// Width, height, depth.
    pub size: Vec3,
    pub node: SceneNode,
}

impl BuildingBlueprint {
    /// Window columns and rows on each face.
    pub fn window_grid(&self) -> (usize, usize) {
        window_grid(self.size.x, self.size.y)
    }
}

fn window_grid(width: f32, height: f32) -> (usize, usize) {
    let cols = ((width / WINDOW_SPACING_X).floor() as i32 - 1).max(0) as usize;
    let rows = ((height / WINDOW_SPACING_Y).floor() as i32 - 1).max(0) as usize;
    (cols, rows)
}

fn window<R: Rng + ?Sized>(rng: &mut R, lit_probability: f64) -> Material {
    if rng.random_bool(lit_probability) {
        let color = palette::WINDOW_LIT[rng.random_range(0..palette::WINDOW_LIT.len())];
        Material::phong(color).with_emissive(color, WINDOW_EMISSIVE)
    } else {
        Material::phong(Color::BLACK)
    }
}

/// One building with a random footprint and a tiled window grid on its front
/// and back faces. `x` and `z` place the footprint; the base sits at y = 0.
pub fn generate_building<R: Rng + ?Sized>(
    x: f32,
    z: f32,
    config: &GenConfig,
    rng: &mut R,
) -> BuildingBlueprint {
    let width = rng.random_range(2.0..5.0);
    let height = rng.random_range(8.0..23.0);
    let depth = rng.random_range(3.0..7.0);
    let body = palette::BUILDING_BODY[rng.random_range(0..palette::BUILDING_BODY.len())];

    let mut node = SceneNode::group().at(x, height / 2.0, z);
    node.push(SceneNode::mesh(
        Primitive::Box {
            width,
            height,
            depth,
        },
        Material::flat(body),
    ));

    let pane = Primitive::Plane {
        width: WINDOW_SIZE,
        height: WINDOW_SIZE,
    };
    let (cols, rows) = window_grid(width, height);
    for row in 0..rows {
        for col in 0..cols {
            let wx = col as f32 * WINDOW_SPACING_X - width / 2.0 + WINDOW_SPACING_X;
            let wy = row as f32 * WINDOW_SPACING_Y - height / 2.0 + WINDOW_SPACING_Y;

            let front = window(rng, config.window_lit_probability);
            node.push(SceneNode::mesh(pane, front).at(wx, wy, depth / 2.0 + 0.01));

            let back = window(rng, config.window_lit_probability);
            node.push(
                SceneNode::mesh(pane, back)
                    .at(wx, wy, -depth / 2.0 - 0.01)
                    .rotated(Quat::from_rotation_y(PI)),
            );
        }
    }

    BuildingBlueprint {
        position: Vec3::new(x, height / 2.0, z),
        size: Vec3::new(width, height, depth),
        node,
    }
}

/// Rows of buildings flanking one road segment.
///
/// Row count (2-3) and buildings per row (3-5) are drawn once per segment and
/// shared by both sides. Each row sits 3 units further out than the previous.
pub fn generate_building_rows<R: Rng + ?Sized>(
    start: f32,
    config: &GenConfig,
    rng: &mut R,
) -> Vec<BuildingBlueprint> {
    let per_row = rng.random_range(3..=5usize);
    let rows = rng.random_range(2..=3usize);
    let spacing = config.segment_length / per_row as f32;

    let mut buildings = Vec::with_capacity(2 * rows * per_row);
    for side in [-1.0f32, 1.0] {
        for row in 0..rows {
            let base_offset = 6.0 + row as f32 * 3.0;
            for i in 0..per_row {
                let jitter = (rng.random::<f32>() - 0.5) * (spacing / 2.0);
                let z = start + spacing * (i as f32 + 0.5) + jitter;
                let x = side * (base_offset + 2.0 + rng.random_range(0.0..2.0));
                buildings.push(generate_building(x, z, config, rng));
            }
        }
    }
    buildings
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use roadstream_render::NodeKind;

    fn rng() -> Pcg64 {
        Pcg64::seed_from_u64(11)
    }

    #[test]
    fn dimensions_stay_in_range() {
        let mut rng = rng();
        let config = GenConfig::default();
        for _ in 0..200 {
            let b = generate_building(8.0, 10.0, &config, &mut rng);
            assert!((2.0..5.0).contains(&b.size.x));
            assert!((8.0..23.0).contains(&b.size.y));
            assert!((3.0..7.0).contains(&b.size.z));
            assert_eq!(b.position.y, b.size.y / 2.0);
        }
    }

    #[test]
    fn window_grid_derives_from_size() {
        assert_eq!(window_grid(4.0, 10.0), (4, 9));
        assert_eq!(window_grid(2.0, 8.0), (1, 7));
        assert_eq!(window_grid(0.5, 0.5), (0, 0));
    }

    #[test]
    fn windows_cover_front_and_back() {
        let mut rng = rng();
        let b = generate_building(8.0, 10.0, &GenConfig::default(), &mut rng);
        let (cols, rows) = b.window_grid();
        // body + two panes per grid cell
        assert_eq!(b.node.children.len(), 1 + 2 * cols * rows);
    }

    #[test]
    fn window_lighting_follows_probability() {
        let mut rng = rng();
        let dark = GenConfig {
            window_lit_probability: 0.0,
            ..GenConfig::default()
        };
        let b = generate_building(8.0, 10.0, &dark, &mut rng);
        for pane in b.node.children.iter().skip(1) {
            match pane.kind {
                NodeKind::Mesh(mesh) => {
                    assert!(mesh.material.color.is_black());
                    assert_eq!(mesh.material.emissive_intensity, 0.0);
                }
                _ => panic!("window should be a mesh"),
            }
        }

        let lit = GenConfig {
            window_lit_probability: 1.0,
            ..GenConfig::default()
        };
        let b = generate_building(8.0, 10.0, &lit, &mut rng);
        for pane in b.node.children.iter().skip(1) {
            match pane.kind {
                NodeKind::Mesh(mesh) => {
                    assert!(palette::WINDOW_LIT.contains(&mesh.material.color));
                    assert_eq!(mesh.material.emissive_intensity, WINDOW_EMISSIVE);
                }
                _ => panic!("window should be a mesh"),
            }
        }
    }

    #[test]
    fn rows_flank_both_sides() {
        let mut rng = rng();
        let config = GenConfig::default();
        for _ in 0..50 {
            let rows = generate_building_rows(100.0, &config, &mut rng);
            assert!((12..=30).contains(&rows.len()));
            let left = rows.iter().filter(|b| b.position.x < 0.0).count();
            assert_eq!(left * 2, rows.len());
            for b in &rows {
                assert!(b.position.x.abs() >= 8.0);
                assert!(b.position.z > 100.0 - 50.0 / 3.0 / 4.0);
                assert!(b.position.z < 150.0 + 50.0 / 3.0 / 4.0);
            }
        }
    }

    #[test]
    fn same_seed_same_buildings() {
        let config = GenConfig::default();
        let a = generate_building_rows(0.0, &config, &mut Pcg64::seed_from_u64(5));
        let b = generate_building_rows(0.0, &config, &mut Pcg64::seed_from_u64(5));
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.node, y.node);
        }
    }
}
