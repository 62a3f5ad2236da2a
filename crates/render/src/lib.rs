//! Rendering Adapter: renderer-agnostic scene interface.
//!
//! # Invariants
//! - The core world never talks to a GPU; it only describes nodes and hands
//!   them to a [`Scene`].
//! - A node lives in the scene exactly as long as its [`RenderHandle`] owner
//!   keeps the handle.
//!
//! [`HeadlessScene`] records the scene graph in memory. It backs the tests and
//! the CLI; the wgpu backend implements the same trait.
//!
//! [`RenderHandle`]: roadstream_common::RenderHandle

mod clock;
mod headless;
mod scene;

pub use clock::{Clock, ManualClock, SystemClock};
pub use headless::HeadlessScene;
pub use scene::{
    Environment, Light, Material, Mesh, NodeKind, Primitive, RenderView, Scene, SceneNode,
    Shading,
};

pub fn crate_info() -> &'static str {
    "roadstream-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
