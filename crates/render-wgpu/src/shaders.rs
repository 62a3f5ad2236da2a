/// WGSL shader for instanced primitives: phong, flat or unlit shading with
/// ambient, directional and point lights, emissive and exponential fog.
pub const SCENE_SHADER: &str = r#"
const MAX_DIRECTIONAL: u32 = 4u;
const MAX_POINTS: u32 = 32u;

struct Globals {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    // rgb fog colour, w density
    fog: vec4<f32>,
    ambient: vec4<f32>,
    // x directional count, y point count
    counts: vec4<u32>,
    dir_direction: array<vec4<f32>, 4>,
    dir_color: array<vec4<f32>, 4>,
    // xyz position, w range
    point_position: array<vec4<f32>, 32>,
    point_color: array<vec4<f32>, 32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) emissive: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) emissive: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    // Inverse-transpose of a rotation-scale matrix is R * S^-1.
    let basis = mat3x3<f32>(model[0].xyz, model[1].xyz, model[2].xyz);
    let scale_sq = vec3<f32>(
        max(dot(basis[0], basis[0]), 1e-8),
        max(dot(basis[1], basis[1]), 1e-8),
        max(dot(basis[2], basis[2]), 1e-8),
    );

    var out: VertexOutput;
    out.clip_position = globals.view_proj * world_pos;
    out.world_position = world_pos.xyz;
    out.world_normal = basis * (vertex.normal / scale_sq);
    out.color = instance.color;
    out.emissive = instance.emissive;
    return out;
}

fn lighting(position: vec3<f32>, normal: vec3<f32>, view_dir: vec3<f32>, flat_shaded: bool) -> vec3<f32> {
    var diffuse = globals.ambient.rgb;
    var specular = vec3<f32>(0.0);

    for (var i = 0u; i < min(globals.counts.x, MAX_DIRECTIONAL); i++) {
        let l = normalize(globals.dir_direction[i].xyz);
        let c = globals.dir_color[i].rgb;
        diffuse += c * max(dot(normal, l), 0.0);
        if !flat_shaded {
            let h = normalize(l + view_dir);
            specular += c * pow(max(dot(normal, h), 0.0), 30.0) * 0.1;
        }
    }

    for (var i = 0u; i < min(globals.counts.y, MAX_POINTS); i++) {
        let to_light = globals.point_position[i].xyz - position;
        let range = globals.point_position[i].w;
        let dist = length(to_light);
        var falloff = 1.0;
        if range > 0.0 {
            let f = clamp(1.0 - dist / range, 0.0, 1.0);
            falloff = f * f;
        }
        if falloff <= 0.0 {
            continue;
        }
        let l = to_light / max(dist, 1e-4);
        let c = globals.point_color[i].rgb * falloff;
        diffuse += c * max(dot(normal, l), 0.0);
        if !flat_shaded {
            let h = normalize(l + view_dir);
            specular += c * pow(max(dot(normal, h), 0.0), 30.0) * 0.1;
        }
    }

    return diffuse + specular;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let view_dir = normalize(globals.eye.xyz - in.world_position);
    let shading = u32(in.emissive.w + 0.5);
    // Derivatives must be taken in uniform control flow.
    let facet = normalize(cross(dpdx(in.world_position), dpdy(in.world_position)));

    var rgb = in.color.rgb;
    if shading != 2u {
        var n = normalize(in.world_normal);
        if shading == 1u {
            n = facet;
        }
        // Two-sided: planes and discs are seen from either face.
        if dot(n, view_dir) < 0.0 {
            n = -n;
        }
        rgb = rgb * lighting(in.world_position, n, view_dir, shading == 1u) + in.emissive.rgb;
    }

    let dist = length(globals.eye.xyz - in.world_position);
    let density = globals.fog.w;
    let fog = 1.0 - exp(-density * density * dist * dist);
    rgb = mix(rgb, globals.fog.rgb, clamp(fog, 0.0, 1.0));

    return vec4<f32>(rgb, in.color.a);
}
"#;
