//! wgpu backend for the roadstream [`Scene`] interface.
//!
//! Every primitive is an instance of a shared unit mesh. The scene graph lives
//! on the CPU and is flattened into instance data once per `submit`.
//!
//! [`Scene`]: roadstream_render::Scene

mod camera;
mod frame;
mod gpu;
mod graph;
mod mesh;
mod scene;
mod shaders;

pub use camera::ChaseCamera;
pub use frame::{DrawBatch, FrameData, Instance, LightSet, PointLight};
pub use gpu::{MAX_INSTANCES, WgpuRenderer};
pub use graph::SceneGraph;
pub use mesh::{MeshData, MeshKey, Vertex};
pub use scene::WgpuScene;
