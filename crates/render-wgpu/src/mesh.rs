//! Unit meshes for the scene primitives.
//!
//! Every primitive is drawn as an instance of a unit mesh scaled by its
//! dimensions, so only a handful of vertex buffers ever exist on the GPU.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use roadstream_render::Primitive;

const SPHERE_SEGMENTS: u16 = 16;
const SPHERE_RINGS: u16 = 12;
const ROUND_SEGMENTS: u16 = 20;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    fn push(&mut self, position: Vec3, normal: Vec3) -> u16 {
        self.vertices.push(Vertex::new(position, normal));
        (self.vertices.len() - 1) as u16
    }

    fn triangle(&mut self, a: u16, b: u16, c: u16) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    fn quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let [a, b, c, d] = corners.map(|p| self.push(p, normal));
        self.triangle(a, b, c);
        self.triangle(a, c, d);
    }

    /// Triangle fan around `center`, ring in counter-clockwise order seen
    /// from `normal`.
    fn disc(&mut self, center: Vec3, ring: impl Iterator<Item = Vec3>, normal: Vec3) {
        let hub = self.push(center, normal);
        let first = self.vertices.len() as u16;
        let mut count = 0;
        for p in ring {
            self.push(p, normal);
            count += 1;
        }
        for i in 0..count {
            self.triangle(hub, first + i, first + (i + 1) % count);
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Which unit mesh a primitive is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeshKey {
    Box,
    Sphere,
    /// Height 1, bottom radius 1, top radius `taper / 100`. A cone is taper 0.
    Cylinder { taper: u8 },
    Plane,
    Circle,
}

impl MeshKey {
    /// Unit mesh and the scale that maps it onto `primitive`.
    pub fn for_primitive(primitive: &Primitive) -> (Self, Vec3) {
        match *primitive {
            Primitive::Box {
                width,
                height,
                depth,
            } => (Self::Box, Vec3::new(width, height, depth)),
            Primitive::Sphere { radius } => (Self::Sphere, Vec3::splat(radius)),
            Primitive::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => {
                if radius_bottom <= 0.0 {
                    // Upside-down cone.
                    let r = radius_top;
                    return (Self::Cylinder { taper: 0 }, Vec3::new(r, -height, r));
                }
                let taper = (radius_top / radius_bottom * 100.0).round().clamp(0.0, 255.0) as u8;
                (
                    Self::Cylinder { taper },
                    Vec3::new(radius_bottom, height, radius_bottom),
                )
            }
            Primitive::Cone { radius, height } => {
                (Self::Cylinder { taper: 0 }, Vec3::new(radius, height, radius))
            }
            Primitive::Plane { width, height } => (Self::Plane, Vec3::new(width, height, 1.0)),
            Primitive::Circle { radius } => (Self::Circle, Vec3::new(radius, radius, 1.0)),
        }
    }

    pub fn build(self) -> MeshData {
        match self {
            Self::Box => unit_box(),
            Self::Sphere => unit_sphere(),
            Self::Cylinder { taper } => unit_cylinder(f32::from(taper) / 100.0),
            Self::Plane => unit_plane(),
            Self::Circle => unit_circle(),
        }
    }
}

fn unit_box() -> MeshData {
    let p = 0.5;
    let mut mesh = MeshData::default();
    for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
        for normal in [axis, -axis] {
            // Two tangents spanning the face, oriented so (u, v, normal) is right-handed.
            let u = normal.any_orthonormal_vector();
            let v = normal.cross(u);
            let c = normal * p;
            mesh.quad(
                [
                    c - u * p - v * p,
                    c + u * p - v * p,
                    c + u * p + v * p,
                    c - u * p + v * p,
                ],
                normal,
            );
        }
    }
    mesh
}

fn unit_sphere() -> MeshData {
    let mut mesh = MeshData::default();
    for ring in 0..=SPHERE_RINGS {
        let phi = f32::from(ring) / f32::from(SPHERE_RINGS) * std::f32::consts::PI;
        for seg in 0..SPHERE_SEGMENTS {
            let theta = f32::from(seg) / f32::from(SPHERE_SEGMENTS) * TAU;
            let n = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            mesh.push(n, n);
        }
    }
    for ring in 0..SPHERE_RINGS {
        for seg in 0..SPHERE_SEGMENTS {
            let next = (seg + 1) % SPHERE_SEGMENTS;
            let i0 = ring * SPHERE_SEGMENTS + seg;
            let i1 = ring * SPHERE_SEGMENTS + next;
            let i2 = (ring + 1) * SPHERE_SEGMENTS + seg;
            let i3 = (ring + 1) * SPHERE_SEGMENTS + next;
            mesh.triangle(i0, i1, i3);
            mesh.triangle(i0, i3, i2);
        }
    }
    mesh
}

fn ring(radius: f32, y: f32) -> impl Iterator<Item = Vec3> {
    (0..ROUND_SEGMENTS).map(move |i| {
        let theta = f32::from(i) / f32::from(ROUND_SEGMENTS) * TAU;
        Vec3::new(radius * theta.cos(), y, radius * theta.sin())
    })
}

fn unit_cylinder(top: f32) -> MeshData {
    let bottom = 1.0;
    let mut mesh = MeshData::default();
    // Side normals lean outward by the slope of the wall.
    let slope = bottom - top;
    for i in 0..ROUND_SEGMENTS {
        let t0 = f32::from(i) / f32::from(ROUND_SEGMENTS) * TAU;
        let t1 = f32::from(i + 1) / f32::from(ROUND_SEGMENTS) * TAU;
        let n0 = Vec3::new(t0.cos(), slope, t0.sin()).normalize();
        let n1 = Vec3::new(t1.cos(), slope, t1.sin()).normalize();
        let b0 = mesh.push(Vec3::new(bottom * t0.cos(), -0.5, bottom * t0.sin()), n0);
        let b1 = mesh.push(Vec3::new(bottom * t1.cos(), -0.5, bottom * t1.sin()), n1);
        let a0 = mesh.push(Vec3::new(top * t0.cos(), 0.5, top * t0.sin()), n0);
        let a1 = mesh.push(Vec3::new(top * t1.cos(), 0.5, top * t1.sin()), n1);
        mesh.triangle(b0, a0, a1);
        if top > 0.0 {
            mesh.triangle(b0, a1, b1);
        } else {
            mesh.triangle(b0, a0, b1);
        }
    }
    mesh.disc(Vec3::new(0.0, -0.5, 0.0), ring(bottom, -0.5), Vec3::NEG_Y);
    if top > 0.0 {
        let mut cap: Vec<Vec3> = ring(top, 0.5).collect();
        cap.reverse();
        mesh.disc(Vec3::new(0.0, 0.5, 0.0), cap.into_iter(), Vec3::Y);
    }
    mesh
}

fn unit_plane() -> MeshData {
    let mut mesh = MeshData::default();
    mesh.quad(
        [
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(-0.5, 0.5, 0.0),
        ],
        Vec3::Z,
    );
    mesh
}

fn unit_circle() -> MeshData {
    let mut mesh = MeshData::default();
    let ring = (0..ROUND_SEGMENTS).map(|i| {
        let theta = f32::from(i) / f32::from(ROUND_SEGMENTS) * TAU;
        Vec3::new(theta.cos(), theta.sin(), 0.0)
    });
    mesh.disc(Vec3::ZERO, ring, Vec3::Z);
    mesh
}
