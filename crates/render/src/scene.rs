use glam::{Quat, Vec3};
use roadstream_common::{Color, RenderHandle, Transform};

/// Mesh primitive, dimensions in world units.
///
/// Planes and circles lie in their local XY plane facing +Z; rotate them to
/// lay them on the ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32 },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32 },
    Cone { radius: f32, height: f32 },
    Plane { width: f32, height: f32 },
    Circle { radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// Per-vertex normals, phong-like lighting.
    #[default]
    Smooth,
    /// Faceted lighting.
    Flat,
    /// Colour is written as-is; lights are ignored.
    Unlit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub shading: Shading,
}

impl Material {
    pub fn phong(color: Color) -> Self {
        Self {
            color,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
            opacity: 1.0,
            shading: Shading::Smooth,
        }
    }

    pub fn flat(color: Color) -> Self {
        Self {
            shading: Shading::Flat,
            ..Self::phong(color)
        }
    }

    pub fn unlit(color: Color) -> Self {
        Self {
            shading: Shading::Unlit,
            ..Self::phong(color)
        }
    }

    pub fn with_emissive(self, emissive: Color, intensity: f32) -> Self {
        Self {
            emissive,
            emissive_intensity: intensity,
            ..self
        }
    }

    pub fn with_opacity(self, opacity: f32) -> Self {
        Self { opacity, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mesh {
    pub primitive: Primitive,
    pub material: Material,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient { color: Color, intensity: f32 },
    /// Shines from the node's position toward the origin of its parent.
    Directional { color: Color, intensity: f32 },
    Point { color: Color, intensity: f32, range: f32 },
}

impl Light {
    pub fn intensity(&self) -> f32 {
        match self {
            Self::Ambient { intensity, .. }
            | Self::Directional { intensity, .. }
            | Self::Point { intensity, .. } => *intensity,
        }
    }

    pub fn set_intensity(&mut self, value: f32) {
        match self {
            Self::Ambient { intensity, .. }
            | Self::Directional { intensity, .. }
            | Self::Point { intensity, .. } => *intensity = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    Group,
    Mesh(Mesh),
    Light(Light),
}

/// Descriptor of a scene subtree. Generators build these; a [`Scene`] turns
/// them into live nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub transform: Transform,
    pub kind: NodeKind,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn group() -> Self {
        Self {
            transform: Transform::default(),
            kind: NodeKind::Group,
            children: Vec::new(),
        }
    }

    pub fn mesh(primitive: Primitive, material: Material) -> Self {
        Self {
            transform: Transform::default(),
            kind: NodeKind::Mesh(Mesh {
                primitive,
                material,
            }),
            children: Vec::new(),
        }
    }

    pub fn light(light: Light) -> Self {
        Self {
            transform: Transform::default(),
            kind: NodeKind::Light(light),
            children: Vec::new(),
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Vec3::new(x, y, z);
        self
    }

    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    /// Rotation that lays a plane or circle flat on the ground, facing up.
    pub fn flat_on_ground(self) -> Self {
        self.rotated(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2))
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// Number of nodes in this subtree, including the root.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::count).sum::<usize>()
    }
}

/// Camera configuration for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 2.0, 0.0),
            target: Vec3::new(0.0, 2.0, 10.0),
            fov_degrees: 75.0,
        }
    }
}

/// Global look of the scene: clear colour and exponential fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub background: Color,
    pub fog_color: Color,
    pub fog_density: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            fog_color: Color::BLACK,
            fog_density: 0.002,
        }
    }
}

/// What the world core needs from a rendering library.
///
/// All calls happen on the frame thread between two `submit` calls.
pub trait Scene {
    /// Instantiate `node` and its descendants under `parent` (or the root).
    /// Returns the handle of `node` itself.
    fn add(&mut self, parent: Option<&RenderHandle>, node: &SceneNode) -> RenderHandle;

    /// Remove a node together with all of its descendants.
    fn remove(&mut self, handle: RenderHandle);

    /// Replace the local transform of a node.
    fn set_transform(&mut self, handle: &RenderHandle, transform: Transform);

    /// Set the intensity of a light node. Ignored for other node kinds.
    fn set_light_intensity(&mut self, handle: &RenderHandle, intensity: f32);

    /// Set the material opacity of a mesh node. Ignored for other node kinds.
    fn set_opacity(&mut self, handle: &RenderHandle, opacity: f32);

    fn set_view(&mut self, view: RenderView);

    fn set_environment(&mut self, environment: Environment);

    /// Translate every root node by `-offset`. Follows a rebase of the
    /// world's coordinates so nodes stay where the world thinks they are.
    fn shift_origin(&mut self, offset: Vec3);

    /// Viewport size changed.
    fn resize(&mut self, width: u32, height: u32);

    /// Draw the current scene.
    fn submit(&mut self);

    /// Number of live nodes, for instrumentation.
    fn node_count(&self) -> usize;
}
