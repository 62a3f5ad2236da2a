use std::collections::BTreeMap;

use glam::Vec3;
use roadstream_common::{RenderHandle, Transform};

use crate::scene::{Environment, NodeKind, RenderView, Scene, SceneNode};

#[derive(Debug, Clone)]
struct HeadlessNode {
    parent: Option<u64>,
    kind: NodeKind,
    transform: Transform,
    children: Vec<u64>,
}

/// In-memory scene graph with no display.
///
/// Keeps every node it is given, applies mutations, and counts submitted
/// frames. Useful for the CLI, logging, and for asserting on what the world
/// core asked the renderer to do.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    nodes: BTreeMap<u64, HeadlessNode>,
    next_id: u64,
    view: RenderView,
    environment: Environment,
    viewport: (u32, u32),
    frames: u64,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self {
            viewport: (1280, 720),
            ..Self::default()
        }
    }

    fn insert(&mut self, parent: Option<u64>, node: &SceneNode) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            HeadlessNode {
                parent,
                kind: node.kind,
                transform: node.transform,
                children: Vec::new(),
            },
        );
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.push(id);
        }
        for child in &node.children {
            self.insert(Some(id), child);
        }
        id
    }

    fn remove_subtree(&mut self, id: u64) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.remove_subtree(child);
            }
        }
    }

    pub fn contains(&self, handle: &RenderHandle) -> bool {
        self.nodes.contains_key(&handle.raw())
    }

    pub fn transform(&self, handle: &RenderHandle) -> Option<Transform> {
        self.nodes.get(&handle.raw()).map(|n| n.transform)
    }

    pub fn kind(&self, handle: &RenderHandle) -> Option<NodeKind> {
        self.nodes.get(&handle.raw()).map(|n| n.kind)
    }

    /// Light intensity of a light node.
    pub fn light_intensity(&self, handle: &RenderHandle) -> Option<f32> {
        match self.kind(handle)? {
            NodeKind::Light(light) => Some(light.intensity()),
            _ => None,
        }
    }

    /// Material opacity of a mesh node.
    pub fn opacity(&self, handle: &RenderHandle) -> Option<f32> {
        match self.kind(handle)? {
            NodeKind::Mesh(mesh) => Some(mesh.material.opacity),
            _ => None,
        }
    }

    pub fn view(&self) -> RenderView {
        self.view
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn frames_submitted(&self) -> u64 {
        self.frames
    }

    /// Number of nodes attached directly to the scene root.
    pub fn root_count(&self) -> usize {
        self.nodes.values().filter(|n| n.parent.is_none()).count()
    }

    /// Human-readable dump of the root nodes.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene (frames={}, nodes={}, roots={}) ===\n",
            self.frames,
            self.nodes.len(),
            self.root_count()
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            self.view.eye.x,
            self.view.eye.y,
            self.view.eye.z,
            self.view.target.x,
            self.view.target.y,
            self.view.target.z,
            self.view.fov_degrees
        ));
        for (id, node) in self.nodes.iter().filter(|(_, n)| n.parent.is_none()) {
            let p = node.transform.position;
            let kind = match node.kind {
                NodeKind::Group => "group",
                NodeKind::Mesh(_) => "mesh",
                NodeKind::Light(_) => "light",
            };
            out.push_str(&format!(
                "  [{id:>6}] {kind:<5} children={:<3} pos=({:.2}, {:.2}, {:.2})\n",
                node.children.len(),
                p.x,
                p.y,
                p.z
            ));
        }
        out
    }
}

impl Scene for HeadlessScene {
    fn add(&mut self, parent: Option<&RenderHandle>, node: &SceneNode) -> RenderHandle {
        let parent = parent.map(RenderHandle::raw);
        RenderHandle::from_raw(self.insert(parent, node))
    }

    fn remove(&mut self, handle: RenderHandle) {
        let id = handle.raw();
        let Some(parent) = self.nodes.get(&id).map(|n| n.parent) else {
            tracing::warn!(id, "remove of unknown scene node");
            return;
        };
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != id);
        }
        self.remove_subtree(id);
    }

    fn set_transform(&mut self, handle: &RenderHandle, transform: Transform) {
        if let Some(node) = self.nodes.get_mut(&handle.raw()) {
            node.transform = transform;
        }
    }

    fn set_light_intensity(&mut self, handle: &RenderHandle, intensity: f32) {
        if let Some(NodeKind::Light(light)) = self.nodes.get_mut(&handle.raw()).map(|n| &mut n.kind)
        {
            light.set_intensity(intensity);
        }
    }

    fn set_opacity(&mut self, handle: &RenderHandle, opacity: f32) {
        if let Some(NodeKind::Mesh(mesh)) = self.nodes.get_mut(&handle.raw()).map(|n| &mut n.kind) {
            mesh.material.opacity = opacity;
        }
    }

    fn set_view(&mut self, view: RenderView) {
        self.view = view;
    }

    fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
    }

    fn shift_origin(&mut self, offset: Vec3) {
        for node in self.nodes.values_mut().filter(|n| n.parent.is_none()) {
            node.transform.position -= offset;
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
    }

    fn submit(&mut self) {
        self.frames += 1;
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
