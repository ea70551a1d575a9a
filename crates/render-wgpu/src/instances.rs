//! CPU-side packing of scene state into GPU buffer layouts.

use backdrop_common::CameraRig;
use backdrop_scene::{Light, ParticleField, Scene, SceneContent, Shape, ShapeKind};
use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct LineUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub ambient: [f32; 4],
    pub light_position: [f32; 4],
    pub light_color: [f32; 4],
}

impl LineUniforms {
    /// Sum of ambient lights plus the first point light.
    pub fn new(camera: &CameraRig, lights: &[Light]) -> Self {
        let mut ambient = Vec3::ZERO;
        let mut point = None;
        for light in lights {
            match *light {
                Light::Ambient { color, intensity } => ambient += color.to_vec3() * intensity,
                Light::Point {
                    color,
                    intensity,
                    position,
                } => {
                    point.get_or_insert((position, color.to_vec3() * intensity));
                }
            }
        }
        let (light_position, light_color) = point.unwrap_or((Vec3::ZERO, Vec3::ZERO));
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            ambient: ambient.extend(1.0).to_array(),
            light_position: light_position.extend(1.0).to_array(),
            light_color: light_color.extend(1.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct ShapeInstance {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    pub color: [f32; 4],
    pub emissive: [f32; 4],
}

impl ShapeInstance {
    pub fn new(shape: &Shape) -> Self {
        let mut model = shape.transform.matrix();
        if let ShapeKind::Icosahedron { radius } = shape.kind {
            model *= Mat4::from_scale(Vec3::splat(radius));
        }
        let cols = model.to_cols_array_2d();
        let material = shape.material();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: material.color.to_vec3().extend(1.0).to_array(),
            emissive: material
                .emissive
                .scaled(material.emissive_intensity)
                .to_vec3()
                .extend(1.0)
                .to_array(),
        }
    }
}

/// Shape instances grouped by mesh: icosahedra first, then torus knots.
/// Returns the instances and the number of icosahedra.
pub(crate) fn shape_instances(shapes: &[Shape]) -> (Vec<ShapeInstance>, u32) {
    let (icosahedra, knots): (Vec<&Shape>, Vec<&Shape>) = shapes
        .iter()
        .partition(|s| matches!(s.kind, ShapeKind::Icosahedron { .. }));
    let split = icosahedra.len() as u32;
    let instances = icosahedra
        .into_iter()
        .chain(knots)
        .map(ShapeInstance::new)
        .collect();
    (instances, split)
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct PointInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

pub(crate) fn point_instances(field: &ParticleField) -> Vec<PointInstance> {
    let opacity = field.opacity();
    field
        .positions()
        .iter()
        .zip(field.colors())
        .zip(field.sizes())
        .map(|((position, color), size)| PointInstance {
            position: position.to_array(),
            size: *size,
            color: color.to_vec3().extend(opacity).to_array(),
        })
        .collect()
}

/// Depth of the tunnel the field flows through: twice the furthest |z|.
pub(crate) fn field_depth(field: &ParticleField) -> f32 {
    let reach = field
        .positions()
        .iter()
        .fold(0.0_f32, |acc, p| acc.max(p.z.abs()));
    (reach * 2.0).max(1.0)
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct PointUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub pointer: [f32; 4],
    pub params: [f32; 4],
    pub scale: [f32; 4],
}

impl PointUniforms {
    pub const MODE_FIXED: f32 = 0.0;
    pub const MODE_FLOW: f32 = 1.0;

    pub fn new(scene: &Scene, depth: f32) -> Self {
        let camera = &scene.camera;
        let projection = camera.projection_matrix();
        let scale = [projection.x_axis.x, projection.y_axis.y, 0.0, 0.0];

        let (model, pointer, params) = match &scene.content {
            SceneContent::Wireframe { starfield, .. } => {
                let r = starfield.rotation;
                (
                    Mat4::from_quat(Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z)),
                    [0.0; 4],
                    [0.0, 0.0, depth, Self::MODE_FIXED],
                )
            }
            SceneContent::Field { uniforms, .. } => (
                Mat4::IDENTITY,
                uniforms.pointer.extend(0.0).to_array(),
                [uniforms.time, uniforms.scroll, depth, Self::MODE_FLOW],
            ),
        };

        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            pointer,
            params,
            scale,
        }
    }
}
