/// WGSL shader for instanced wireframe shapes.
pub const LINE_SHADER: &str = r#"
struct LineUniforms {
    view_proj: mat4x4<f32>,
    ambient: vec4<f32>,
    light_position: vec4<f32>,
    light_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: LineUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
};

struct InstanceInput {
    @location(1) model_0: vec4<f32>,
    @location(2) model_1: vec4<f32>,
    @location(3) model_2: vec4<f32>,
    @location(4) model_3: vec4<f32>,
    @location(5) color: vec4<f32>,
    @location(6) emissive: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) emissive: vec3<f32>,
};

@vertex
fn vs_line(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world;
    out.world_position = world.xyz;
    out.color = instance.color;
    out.emissive = instance.emissive.rgb;
    return out;
}

@fragment
fn fs_line(in: VertexOutput) -> @location(0) vec4<f32> {
    let d = distance(in.world_position, uniforms.light_position.xyz);
    let falloff = 1.0 / (1.0 + 0.02 * d * d);
    let light = uniforms.ambient.rgb + uniforms.light_color.rgb * falloff;
    let rgb = in.color.rgb * light + in.emissive;
    return vec4<f32>(min(rgb, vec3<f32>(1.0)), in.color.a);
}
"#;

/// WGSL shader for camera-facing point sprites.
///
/// `params.w` selects the motion: 0 keeps points fixed under `model`
/// (starfield), 1 flows them through the tunnel driven by time, scroll and
/// pointer (particle field).
pub const POINT_SHADER: &str = r#"
struct PointUniforms {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    pointer: vec4<f32>,
    // time, scroll, tunnel depth, mode
    params: vec4<f32>,
    // projection x and y scale
    scale: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: PointUniforms;

struct InstanceInput {
    @location(0) position: vec3<f32>,
    @location(1) size: f32,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) corner: vec2<f32>,
    @location(1) color: vec4<f32>,
};

fn flow(position: vec3<f32>) -> vec3<f32> {
    let time = uniforms.params.x;
    let scroll = uniforms.params.y;
    let depth = max(uniforms.params.z, 0.001);
    var p = position;

    let travel = time * 0.6 + scroll * depth;
    p.z = (fract((p.z + depth * 0.5 + travel) / depth) - 0.5) * depth;

    let angle = time * 0.05 + scroll * 3.14159265;
    let c = cos(angle);
    let s = sin(angle);
    p = vec3<f32>(p.x * c - p.y * s, p.x * s + p.y * c, p.z);

    let away = p.xy - uniforms.pointer.xy;
    let reach = length(away);
    let push = max(0.0, 1.0 - reach / 1.5) * 0.6;
    if reach > 0.0001 {
        p = vec3<f32>(p.xy + away / reach * push, p.z);
    }
    return p;
}

@vertex
fn vs_point(@builtin(vertex_index) index: u32, instance: InstanceInput) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-0.5, -0.5),
        vec2<f32>(0.5, -0.5),
        vec2<f32>(0.5, 0.5),
        vec2<f32>(-0.5, -0.5),
        vec2<f32>(0.5, 0.5),
        vec2<f32>(-0.5, 0.5),
    );
    let corner = corners[index];

    var position = instance.position;
    if uniforms.params.w > 0.5 {
        position = flow(position);
    }
    var clip = uniforms.view_proj * uniforms.model * vec4<f32>(position, 1.0);
    clip = vec4<f32>(clip.xy + corner * instance.size * uniforms.scale.xy, clip.zw);

    var out: VertexOutput;
    out.clip_position = clip;
    out.corner = corner;
    out.color = instance.color;
    return out;
}

@fragment
fn fs_point(in: VertexOutput) -> @location(0) vec4<f32> {
    let r = length(in.corner);
    if r > 0.5 {
        discard;
    }
    let edge = 1.0 - smoothstep(0.35, 0.5, r);
    return vec4<f32>(in.color.rgb, in.color.a * edge);
}
"#;
