use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use roadstream_common::Color;
use roadstream_render::Shading;

use crate::mesh::MeshKey;

/// Most point lights the shader evaluates per frame; the nearest win.
pub const MAX_POINT_LIGHTS: usize = 32;
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

/// One mesh to draw, flattened to world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    pub mesh: MeshKey,
    pub model: Mat4,
    pub color: Color,
    pub opacity: f32,
    pub emissive: Vec3,
    pub shading: Shading,
}

impl Instance {
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }

    pub fn to_gpu(&self) -> InstanceData {
        let cols = self.model.to_cols_array_2d();
        let shading = match self.shading {
            Shading::Smooth => 0.0,
            Shading::Flat => 1.0,
            Shading::Unlit => 2.0,
        };
        InstanceData {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: srgb_to_linear(self.color).to_array(self.opacity),
            emissive: [self.emissive.x, self.emissive.y, self.emissive.z, shading],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    /// Linear rgb, alpha is opacity.
    pub color: [f32; 4],
    /// Linear emissive rgb, w encodes shading (0 smooth, 1 flat, 2 unlit).
    pub emissive: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub range: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightSet {
    pub ambient: Vec3,
    /// Direction toward the light, and its colour times intensity.
    pub directional: Vec<(Vec3, Vec3)>,
    pub points: Vec<PointLight>,
}

impl LightSet {
    /// Keep the point lights closest to `eye`, at most [`MAX_POINT_LIGHTS`].
    pub fn nearest_points(&self, eye: Vec3) -> Vec<PointLight> {
        let mut points = self.points.clone();
        points.sort_by(|a, b| {
            a.position
                .distance_squared(eye)
                .total_cmp(&b.position.distance_squared(eye))
        });
        points.truncate(MAX_POINT_LIGHTS);
        points
    }
}

/// Everything the GPU needs for one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameData {
    pub instances: Vec<Instance>,
    pub lights: LightSet,
}

/// A run of consecutive instances sharing one mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawBatch {
    pub mesh: MeshKey,
    pub start: u32,
    pub count: u32,
    pub transparent: bool,
}

/// Order instances for drawing and pack them into one buffer.
///
/// Opaque instances come first, grouped by mesh. Transparent ones follow,
/// sorted far to near from `eye`. At most `capacity` instances are packed;
/// the rest are dropped, transparent first.
pub fn pack(
    instances: &[Instance],
    eye: Vec3,
    capacity: usize,
) -> (Vec<InstanceData>, Vec<DrawBatch>) {
    let (mut opaque, mut transparent): (Vec<&Instance>, Vec<&Instance>) =
        instances.iter().partition(|i| !i.is_transparent());
    opaque.sort_by_key(|i| i.mesh);
    transparent.sort_by(|a, b| {
        let da = a.model.w_axis.truncate().distance_squared(eye);
        let db = b.model.w_axis.truncate().distance_squared(eye);
        db.total_cmp(&da)
    });

    let mut data = Vec::with_capacity(instances.len().min(capacity));
    let mut batches: Vec<DrawBatch> = Vec::new();
    let ordered = opaque
        .into_iter()
        .map(|i| (i, false))
        .chain(transparent.into_iter().map(|i| (i, true)))
        .take(capacity);
    for (instance, is_transparent) in ordered {
        let index = data.len() as u32;
        data.push(instance.to_gpu());
        match batches.last_mut() {
            Some(last) if last.mesh == instance.mesh && last.transparent == is_transparent => {
                last.count += 1;
            }
            _ => batches.push(DrawBatch {
                mesh: instance.mesh,
                start: index,
                count: 1,
                transparent: is_transparent,
            }),
        }
    }
    (data, batches)
}

fn channel_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Palette colours are authored in sRGB; lighting happens in linear space.
pub fn srgb_to_linear(color: Color) -> Color {
    Color::rgb(
        channel_to_linear(color.r),
        channel_to_linear(color.g),
        channel_to_linear(color.b),
    )
}
