use std::collections::HashMap;

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::device::Gpu;
use crate::scene::{Geometry, NodeId, Scene};
use crate::viewport::PerspectiveCamera;

use super::{RenderOutput, Renderer};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// MSAA sample count. 4 is supported for every renderable format.
const SAMPLE_COUNT: u32 = 4;

/// wgpu scene renderer.
///
/// - meshes are shaded by their view-space normal
/// - grids are drawn as vertex-colored line lists
/// - GPU buffers are uploaded lazily per node and re-uploaded when the node's
///   geometry description changes
/// - drawing goes to a 4x multisampled target resolved into the surface
pub struct GpuRenderer {
    gpu: Gpu,

    bind_group_layout: wgpu::BindGroupLayout,
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,

    targets: Targets,

    nodes: HashMap<NodeId, GpuNode>,
}

struct GpuNode {
    geometry: Geometry,
    vertices: wgpu::Buffer,
    indices: Option<wgpu::Buffer>,
    count: u32,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl GpuRenderer {
    pub fn new(gpu: Gpu) -> Self {
        let device = gpu.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orrery scene shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orrery node bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<NodeUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("orrery scene pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let format = gpu.surface_format();
        let mesh_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            format,
            PipelineKind::Mesh,
        );
        let line_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            format,
            PipelineKind::Lines,
        );

        let size = gpu.size();
        let targets = Targets::new(device, format, size.width, size.height);

        Self {
            gpu,
            bind_group_layout,
            mesh_pipeline,
            line_pipeline,
            targets,
            nodes: HashMap::new(),
        }
    }

    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    fn sync_nodes(&mut self, scene: &Scene) {
        self.nodes
            .retain(|id, _| scene.node(*id).is_some_and(|n| n.geometry.is_some()));

        for (id, node) in scene.iter() {
            let Some(geometry) = node.geometry.as_ref() else { continue };
            let stale = self
                .nodes
                .get(&id)
                .is_none_or(|uploaded| uploaded.geometry != *geometry);
            if stale {
                log::debug!("uploading geometry for node '{}'", node.name);
                let uploaded = self.upload(geometry);
                self.nodes.insert(id, uploaded);
            }
        }
    }

    fn upload(&self, geometry: &Geometry) -> GpuNode {
        let device = self.gpu.device();

        let (vertices, indices, count) = match geometry {
            Geometry::TorusKnot(knot) => {
                let mesh = knot.build();
                let verts: Vec<MeshVertex> = mesh
                    .positions
                    .iter()
                    .zip(&mesh.normals)
                    .map(|(&position, &normal)| MeshVertex { position, normal })
                    .collect();

                let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("orrery mesh vbo"),
                    contents: bytemuck::cast_slice(&verts),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("orrery mesh ibo"),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                (vbo, Some(ibo), mesh.indices.len() as u32)
            }
            Geometry::Grid(grid) => {
                let lines = grid.build();
                let verts: Vec<LineVertex> = lines
                    .positions
                    .iter()
                    .zip(&lines.colors)
                    .map(|(&position, &color)| LineVertex { position, color })
                    .collect();

                let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("orrery line vbo"),
                    contents: bytemuck::cast_slice(&verts),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                (vbo, None, verts.len() as u32)
            }
        };

        let uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("orrery node ubo"),
            size: std::mem::size_of::<NodeUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orrery node bind group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });

        GpuNode {
            geometry: geometry.clone(),
            vertices,
            indices,
            count,
            uniform,
            bind_group,
        }
    }
}

impl RenderOutput for GpuRenderer {
    fn set_output_size(&mut self, width: u32, height: u32) -> Result<()> {
        self.gpu.resize(PhysicalSize::new(width, height));
        if width > 0 && height > 0 {
            let format = self.gpu.surface_format();
            self.targets = Targets::new(self.gpu.device(), format, width, height);
        }
        Ok(())
    }
}

impl Renderer for GpuRenderer {
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            // Minimized; nothing to present.
            return Ok(());
        }

        self.sync_nodes(scene);

        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => return self.gpu.handle_surface_error(&err).frame_result(&err),
        };

        let view = camera.view_matrix();
        let view_proj = camera.projection_matrix() * view;

        let mut draws: Vec<NodeId> = Vec::new();
        for (id, node) in scene.iter() {
            if node.geometry.is_none() || !scene.is_visible(id) {
                continue;
            }
            let Some(uploaded) = self.nodes.get(&id) else { continue };
            let uniform = NodeUniform::new(view_proj, view, scene.world_matrix(id));
            self.gpu
                .queue()
                .write_buffer(&uploaded.uniform, 0, bytemuck::bytes_of(&uniform));
            draws.push(id);
        }

        {
            let bg = scene.background;
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("orrery scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.color,
                    resolve_target: Some(&frame.view),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.r as f64,
                            g: bg.g as f64,
                            b: bg.b as f64,
                            a: 1.0,
                        }),
                        // Only the resolved surface texture is presented.
                        store: wgpu::StoreOp::Discard,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for id in &draws {
                let Some(node) = self.nodes.get(id) else { continue };
                rpass.set_bind_group(0, &node.bind_group, &[]);
                rpass.set_vertex_buffer(0, node.vertices.slice(..));
                match node.indices.as_ref() {
                    Some(indices) => {
                        rpass.set_pipeline(&self.mesh_pipeline);
                        rpass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                        rpass.draw_indexed(0..node.count, 0, 0..1);
                    }
                    None => {
                        rpass.set_pipeline(&self.line_pipeline);
                        rpass.draw(0..node.count, 0..1);
                    }
                }
            }
        }

        self.gpu.submit(frame);
        Ok(())
    }
}

#[derive(Copy, Clone)]
enum PipelineKind {
    Mesh,
    Lines,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    kind: PipelineKind,
) -> wgpu::RenderPipeline {
    let (label, vs, fs, buffers, topology) = match kind {
        PipelineKind::Mesh => (
            "orrery mesh pipeline",
            "vs_mesh",
            "fs_mesh",
            MeshVertex::layout(),
            wgpu::PrimitiveTopology::TriangleList,
        ),
        PipelineKind::Lines => (
            "orrery line pipeline",
            "vs_line",
            "fs_line",
            LineVertex::layout(),
            wgpu::PrimitiveTopology::LineList,
        ),
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs),
            compilation_options: Default::default(),
            buffers: &[buffers],
        },

        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Generated meshes do not guarantee a consistent winding.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: multisample_state(),

        multiview_mask: None,
        cache: None,
    })
}

/// Shared by both pipelines; must agree with [`Targets`].
fn multisample_state() -> wgpu::MultisampleState {
    wgpu::MultisampleState {
        count: SAMPLE_COUNT,
        mask: !0,
        alpha_to_coverage_enabled: false,
    }
}

/// Multisampled color and depth attachments sized to the output.
struct Targets {
    color: wgpu::TextureView,
    depth: wgpu::TextureView,
}

impl Targets {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        Self {
            color: create_target(device, "orrery msaa color", format, width, height),
            depth: create_target(device, "orrery depth", DEPTH_FORMAT, width, height),
        }
    }
}

fn create_target(
    device: &wgpu::Device,
    label: &str,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: SAMPLE_COUNT,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct NodeUniform {
    mvp: [[f32; 4]; 4],
    model_view: [[f32; 4]; 4],
}

impl NodeUniform {
    fn new(view_proj: Mat4, view: Mat4, model: Mat4) -> Self {
        Self {
            mvp: (view_proj * model).to_cols_array_2d(),
            model_view: (view * model).to_cols_array_2d(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MeshVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // normal
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LineVertex {
    position: [f32; 3],
    color: [f32; 4],
}

impl LineVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
