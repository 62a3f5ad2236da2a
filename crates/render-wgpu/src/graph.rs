use std::collections::BTreeMap;

use glam::{Mat4, Vec3};
use roadstream_common::{RenderHandle, Transform};
use roadstream_render::{Light, NodeKind, SceneNode};

use crate::frame::{FrameData, Instance, LightSet, PointLight, srgb_to_linear};
use crate::mesh::MeshKey;

#[derive(Debug, Clone)]
struct GraphNode {
    parent: Option<u64>,
    kind: NodeKind,
    transform: Transform,
    children: Vec<u64>,
}

/// CPU side of the wgpu scene: the live node tree, flattened once per frame.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: BTreeMap<u64, GraphNode>,
    next_id: u64,
}

fn light_rgb(color: roadstream_common::Color, intensity: f32) -> Vec3 {
    let c = srgb_to_linear(color);
    Vec3::new(c.r, c.g, c.b) * intensity
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, parent: Option<&RenderHandle>, node: &SceneNode) -> RenderHandle {
        let parent = parent.map(RenderHandle::raw).filter(|p| self.nodes.contains_key(p));
        RenderHandle::from_raw(self.insert(parent, node))
    }

    fn insert(&mut self, parent: Option<u64>, node: &SceneNode) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            GraphNode {
                parent,
                kind: node.kind,
                transform: node.transform,
                children: Vec::new(),
            },
        );
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.push(id);
        }
        for child in &node.children {
            self.insert(Some(id), child);
        }
        id
    }

    pub fn remove(&mut self, handle: RenderHandle) {
        let id = handle.raw();
        let Some(parent) = self.nodes.get(&id).map(|n| n.parent) else {
            tracing::warn!(id, "remove of unknown scene node");
            return;
        };
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.retain(|c| *c != id);
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children);
            }
        }
    }

    pub fn set_transform(&mut self, handle: &RenderHandle, transform: Transform) {
        if let Some(node) = self.nodes.get_mut(&handle.raw()) {
            node.transform = transform;
        }
    }

    pub fn set_light_intensity(&mut self, handle: &RenderHandle, intensity: f32) {
        if let Some(NodeKind::Light(light)) = self.nodes.get_mut(&handle.raw()).map(|n| &mut n.kind)
        {
            light.set_intensity(intensity);
        }
    }

    pub fn set_opacity(&mut self, handle: &RenderHandle, opacity: f32) {
        if let Some(NodeKind::Mesh(mesh)) = self.nodes.get_mut(&handle.raw()).map(|n| &mut n.kind) {
            mesh.material.opacity = opacity;
        }
    }

    /// Translate every root node by `-offset`.
    pub fn shift_roots(&mut self, offset: Vec3) {
        for node in self.nodes.values_mut().filter(|n| n.parent.is_none()) {
            node.transform.position -= offset;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve world matrices and collect drawable meshes and lights.
    pub fn flatten(&self) -> FrameData {
        let mut frame = FrameData::default();
        let mut stack: Vec<(u64, Mat4)> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(id, _)| (*id, Mat4::IDENTITY))
            .collect();

        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let world = parent_world * node.transform.matrix();
            match node.kind {
                NodeKind::Group => {}
                NodeKind::Mesh(mesh) => {
                    let (key, scale) = MeshKey::for_primitive(&mesh.primitive);
                    let m = mesh.material;
                    frame.instances.push(Instance {
                        mesh: key,
                        model: world * Mat4::from_scale(scale),
                        color: m.color,
                        opacity: m.opacity,
                        emissive: light_rgb(m.emissive, m.emissive_intensity),
                        shading: m.shading,
                    });
                }
                NodeKind::Light(light) => {
                    collect_light(&mut frame.lights, light, world, parent_world)
                }
            }
            stack.extend(node.children.iter().map(|c| (*c, world)));
        }
        frame
    }
}

fn collect_light(lights: &mut LightSet, light: Light, world: Mat4, parent_world: Mat4) {
    match light {
        Light::Ambient { color, intensity } => lights.ambient += light_rgb(color, intensity),
        Light::Directional { color, intensity } => {
            let toward = world.w_axis.truncate() - parent_world.w_axis.truncate();
            let dir = toward.try_normalize().unwrap_or(Vec3::Y);
            lights.directional.push((dir, light_rgb(color, intensity)));
        }
        Light::Point {
            color,
            intensity,
            range,
        } => {
            if intensity > 0.0 {
                lights.points.push(PointLight {
                    position: world.w_axis.truncate(),
                    color: light_rgb(color, intensity),
                    range,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use roadstream_common::Color;
    use roadstream_render::{Material, Primitive};

    fn lamp() -> SceneNode {
        SceneNode::group()
            .at(3.6, 0.0, 10.0)
            .with_child(
                SceneNode::mesh(Primitive::Sphere { radius: 0.15 }, Material::phong(Color::WHITE))
                    .at(0.0, 1.55, 0.0),
            )
            .with_child(
                SceneNode::light(Light::Point {
                    color: Color::WHITE,
                    intensity: 1.0,
                    range: 5.0,
                })
                .at(0.0, 1.55, 0.0),
            )
    }

    #[test]
    fn children_inherit_parent_transform() {
        let mut graph = SceneGraph::new();
        let _root = graph.add(None, &lamp());
        let frame = graph.flatten();
        assert_eq!(frame.instances.len(), 1);
        let p = frame.instances[0].model.w_axis.truncate();
        assert_relative_eq!(p.x, 3.6);
        assert_relative_eq!(p.y, 1.55);
        assert_relative_eq!(p.z, 10.0);
        assert_eq!(frame.lights.points.len(), 1);
        assert_relative_eq!(frame.lights.points[0].position.z, 10.0);
    }

    #[test]
    fn moving_root_moves_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.add(None, &lamp());
        graph.set_transform(&root, Transform::from_xyz(0.0, 0.0, 100.0));
        let frame = graph.flatten();
        assert_relative_eq!(frame.instances[0].model.w_axis.z, 100.0);
    }

    #[test]
    fn shifting_roots_keeps_light_directions() {
        let mut graph = SceneGraph::new();
        let _lamp = graph.add(None, &lamp());
        let _sun = graph.add(
            None,
            &SceneNode::group().with_child(
                SceneNode::light(Light::Directional {
                    color: Color::WHITE,
                    intensity: 1.0,
                })
                .at(0.0, 10.0, 0.0),
            ),
        );
        graph.shift_roots(Vec3::new(0.0, 0.0, 4000.0));
        let frame = graph.flatten();
        assert_relative_eq!(frame.instances[0].model.w_axis.z, -3990.0);
        assert_relative_eq!(frame.lights.points[0].position.z, -3990.0);
        assert_relative_eq!(frame.lights.directional[0].0.y, 1.0);
    }

    #[test]
    fn primitive_scale_applied() {
        let mut graph = SceneGraph::new();
        let _car = graph.add(
            None,
            &SceneNode::mesh(
                Primitive::Box {
                    width: 2.0,
                    height: 1.0,
                    depth: 4.0,
                },
                Material::phong(Color::WHITE),
            ),
        );
        let model = graph.flatten().instances[0].model;
        assert_relative_eq!(model.transform_point3(Vec3::splat(0.5)).z, 2.0);
    }

    #[test]
    fn dark_lights_skipped_and_mutations_apply() {
        let mut graph = SceneGraph::new();
        let root = graph.add(None, &SceneNode::group());
        let light = graph.add(
            Some(&root),
            &SceneNode::light(Light::Point {
                color: Color::WHITE,
                intensity: 0.0,
                range: 5.0,
            }),
        );
        assert!(graph.flatten().lights.points.is_empty());
        graph.set_light_intensity(&light, 1.0);
        assert_eq!(graph.flatten().lights.points.len(), 1);

        let pool = graph.add(
            Some(&root),
            &SceneNode::mesh(Primitive::Circle { radius: 0.5 }, Material::unlit(Color::WHITE)),
        );
        graph.set_opacity(&pool, 0.5);
        assert!(graph.flatten().instances[0].is_transparent());

        assert_eq!(graph.len(), 3);
        graph.remove(root);
        assert!(graph.is_empty());
    }

    #[test]
    fn directional_points_toward_light() {
        let mut graph = SceneGraph::new();
        let _lights = graph.add(
            None,
            &SceneNode::group()
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
                ),
        );
        let lights = graph.flatten().lights;
        assert_relative_eq!(lights.ambient.x, 0.6);
        let (dir, color) = lights.directional[0];
        assert_relative_eq!(dir.y, dir.z);
        assert!(dir.y > 0.0);
        assert_relative_eq!(color.x, 0.8);
    }
}
