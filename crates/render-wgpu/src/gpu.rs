use backdrop_common::CameraRig;
use backdrop_scene::{Scene, SceneContent, ShapeKind};
use bytemuck::Zeroable;
use wgpu::util::DeviceExt;

use crate::instances::{
    LineUniforms, PointInstance, PointUniforms, ShapeInstance, field_depth, point_instances,
    shape_instances,
};
use crate::mesh::{LineVertex, WireMesh};
use crate::shaders;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.008,
    g: 0.012,
    b: 0.03,
    a: 1.0,
};

/// Vertex and index buffers of one wire mesh.
struct MeshBuffers {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn upload(device: &wgpu::Device, label: &str, mesh: &WireMesh) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vertex_buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_index_buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertices,
            indices,
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// Per-scene buffers, rebuilt by [`WgpuRenderer::load_scene`].
struct SceneBuffers {
    shape_instances: Option<wgpu::Buffer>,
    shape_capacity: usize,
    points: Option<wgpu::Buffer>,
    point_count: u32,
    depth: f32,
}

/// wgpu renderer for background scenes: wireframe shapes as instanced line
/// lists, particle layers as instanced point sprites.
pub struct WgpuRenderer {
    line_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    line_uniforms: wgpu::Buffer,
    line_bind_group: wgpu::BindGroup,
    point_uniforms: wgpu::Buffer,
    point_bind_group: wgpu::BindGroup,
    icosahedron: MeshBuffers,
    torus_knot: MeshBuffers,
    knot_kind: ShapeKind,
    scene: SceneBuffers,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn uniform_binding<T: bytemuck::Pod>(
    device: &wgpu::Device,
    label: &str,
    initial: &T,
) -> (wgpu::Buffer, wgpu::BindGroupLayout, wgpu::BindGroup) {
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label}_buffer")),
        contents: bytemuck::bytes_of(initial),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let layout = uniform_layout(device, &format!("{label}_layout"));
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label}_bind_group")),
        layout: &layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    (buffer, layout, bind_group)
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let (line_uniforms, line_layout, line_bind_group) = uniform_binding(
            device,
            "line_uniforms",
            &LineUniforms::new(&CameraRig::default(), &[]),
        );
        let (point_uniforms, point_layout, point_bind_group) =
            uniform_binding(device, "point_uniforms", &PointUniforms::zeroed());

        // Line pipeline
        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("line_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::LINE_SHADER.into()),
        });
        let line_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("line_pipeline_layout"),
            bind_group_layouts: &[&line_layout],
            push_constant_ranges: &[],
        });
        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("line_pipeline"),
            layout: Some(&line_layout),
            vertex: wgpu::VertexState {
                module: &line_shader,
                entry_point: Some("vs_line"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<LineVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<ShapeInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            1 => Float32x4,
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &line_shader,
                entry_point: Some("fs_line"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Point pipeline: six vertices per instance, expanded in the shader.
        let point_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("point_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::POINT_SHADER.into()),
        });
        let point_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("point_pipeline_layout"),
            bind_group_layouts: &[&point_layout],
            push_constant_ranges: &[],
        });
        let point_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("point_pipeline"),
            layout: Some(&point_layout),
            vertex: wgpu::VertexState {
                module: &point_shader,
                entry_point: Some("vs_point"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<PointInstance>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32,
                        2 => Float32x4,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &point_shader,
                entry_point: Some("fs_point"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let knot_kind = ShapeKind::TORUS_KNOT;
        let icosahedron = MeshBuffers::upload(
            device,
            "icosahedron",
            &WireMesh::for_kind(&ShapeKind::icosahedron(0.0)),
        );
        let torus_knot = MeshBuffers::upload(device, "torus_knot", &WireMesh::for_kind(&knot_kind));

        Self {
            line_pipeline,
            point_pipeline,
            line_uniforms,
            line_bind_group,
            point_uniforms,
            point_bind_group,
            icosahedron,
            torus_knot,
            knot_kind,
            scene: SceneBuffers {
                shape_instances: None,
                shape_capacity: 0,
                points: None,
                point_count: 0,
                depth: 1.0,
            },
            depth_texture: Self::create_depth_texture(device, width, height),
            surface_format,
        }
    }

    /// Upload the parts of `scene` that never change after build: particle
    /// attributes and shape instance storage. Call once per built scene.
    pub fn load_scene(&mut self, device: &wgpu::Device, scene: &Scene) {
        let shapes = scene.shapes();
        if let Some(knot) = shapes
            .iter()
            .map(|s| s.kind)
            .find(|k| matches!(k, ShapeKind::TorusKnot { .. }))
        {
            if knot != self.knot_kind {
                self.torus_knot =
                    MeshBuffers::upload(device, "torus_knot", &WireMesh::for_kind(&knot));
                self.knot_kind = knot;
            }
        }

        self.scene.shape_capacity = shapes.len();
        self.scene.shape_instances = (!shapes.is_empty()).then(|| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("shape_instance_buffer"),
                size: (shapes.len() * std::mem::size_of::<ShapeInstance>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });

        let particles = scene.particles();
        let points = point_instances(particles);
        self.scene.point_count = points.len() as u32;
        self.scene.depth = field_depth(particles);
        self.scene.points = (!points.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("point_instance_buffer"),
                contents: bytemuck::cast_slice(&points),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        tracing::debug!(
            shapes = shapes.len(),
            points = self.scene.point_count,
            "scene uploaded"
        );
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame of `scene` into `view`: shapes, then points.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        scene: &Scene,
    ) {
        queue.write_buffer(
            &self.line_uniforms,
            0,
            bytemuck::bytes_of(&LineUniforms::new(&scene.camera, &scene.lights)),
        );
        queue.write_buffer(
            &self.point_uniforms,
            0,
            bytemuck::bytes_of(&PointUniforms::new(scene, self.scene.depth)),
        );

        let (instances, icosahedra) = match &scene.content {
            SceneContent::Wireframe { shapes, .. } => {
                let take = shapes.len().min(self.scene.shape_capacity);
                if take < shapes.len() {
                    tracing::warn!(
                        shapes = shapes.len(),
                        capacity = take,
                        "scene has more shapes than were loaded"
                    );
                }
                shape_instances(&shapes[..take])
            }
            SceneContent::Field { .. } => (Vec::new(), 0),
        };
        if let (Some(buffer), false) = (&self.scene.shape_instances, instances.is_empty()) {
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("background_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if let (Some(buffer), false) = (&self.scene.shape_instances, instances.is_empty()) {
                let total = instances.len() as u32;
                pass.set_pipeline(&self.line_pipeline);
                pass.set_bind_group(0, &self.line_bind_group, &[]);
                pass.set_vertex_buffer(1, buffer.slice(..));

                for (mesh, range) in [
                    (&self.icosahedron, 0..icosahedra),
                    (&self.torus_knot, icosahedra..total),
                ] {
                    if range.is_empty() {
                        continue;
                    }
                    pass.set_vertex_buffer(0, mesh.vertices.slice(..));
                    pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint16);
                    pass.draw_indexed(0..mesh.index_count, 0, range);
                }
            }

            if let Some(points) = &self.scene.points {
                pass.set_pipeline(&self.point_pipeline);
                pass.set_bind_group(0, &self.point_bind_group, &[]);
                pass.set_vertex_buffer(0, points.slice(..));
                pass.draw(0..6, 0..self.scene.point_count);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}
