use std::collections::HashSet;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::canvas::CanvasView;
use crate::pattern::{field, LayerId, PatternLayer, PatternParams};

use super::ctx::{RenderCtx, RenderTarget};
use super::pipeline::{PipelineCache, ShaderFamily};

/// Draws the visible layer stack, bottom to top, over the already-cleared
/// frame.
///
/// One full-viewport quad per layer; each layer's canonical uniform block is
/// written at its own dynamic offset in a grow-on-demand uniform buffer, so
/// the whole stack renders in a single pass with one bind group.
///
/// Layer failures are fault-isolated: invalid parameters and failed shader
/// builds skip the layer (logged once) and never abort the frame.
#[derive(Default)]
pub struct PatternCompositor {
    cache: PipelineCache,
    pipeline_format: Option<wgpu::TextureFormat>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    uniform_buf: Option<wgpu::Buffer>,
    uniform_stride: u64,
    uniform_capacity: usize,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    /// Layers already reported for invalid parameters; avoids per-frame spam.
    warned_layers: HashSet<LayerId>,
}

impl PatternCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders one frame of the layer stack.
    ///
    /// The frame is expected to be cleared to `view.background` already (the
    /// frame context owns the clear pass); this pass loads and composites.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        layers: &[PatternLayer],
        view: &CanvasView,
    ) {
        self.ensure_gpu_state(ctx);

        // Phase 1: validate + pack uniforms, ensure pipelines exist.
        let mut batch: Vec<(ShaderFamily, PatternUniforms)> = Vec::with_capacity(layers.len());
        for layer in layers.iter().filter(|l| l.visible) {
            if let Err(e) = layer.params.validate() {
                if self.warned_layers.insert(layer.id) {
                    log::warn!("{}: skipped, {e}", layer.id);
                }
                continue;
            }
            self.warned_layers.remove(&layer.id);

            let family = ShaderFamily::of(&layer.params);
            let layout = self
                .bind_group_layout
                .as_ref()
                .expect("bind group layout created in ensure_gpu_state");
            // Failure is cached and logged by the cache; the layer skips below.
            let _ = self
                .cache
                .get_or_create(ctx.device, ctx.surface_format, layout, family);

            batch.push((family, pack_uniforms(layer, view, ctx.scale_factor)));
        }

        if batch.is_empty() {
            return;
        }

        self.ensure_uniform_capacity(ctx, batch.len());
        let Some(uniform_buf) = self.uniform_buf.as_ref() else { return };
        for (i, (_, uniforms)) in batch.iter().enumerate() {
            ctx.queue.write_buffer(
                uniform_buf,
                i as u64 * self.uniform_stride,
                bytemuck::bytes_of(uniforms),
            );
        }

        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        // Phase 2: one pass, list order = paint order.
        let mut rpass = target
            .encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("guilloche pattern pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        for (i, (family, _)) in batch.iter().enumerate() {
            let Some(pipeline) = self.cache.get(*family) else {
                continue; // shader build failed; background already cleared
            };
            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(
                0,
                bind_group,
                &[(i as u64 * self.uniform_stride) as u32],
            );
            rpass.draw_indexed(0..6, 0, 0..1);
        }
    }

    /// Releases every GPU resource this compositor owns.
    ///
    /// Called on teardown; the owning controller also calls it after a
    /// context loss before recreating the device. Everything is rebuilt on
    /// demand by the next `render`.
    pub fn release_gpu_resources(&mut self) {
        self.cache.clear();
        self.pipeline_format = None;
        self.bind_group_layout = None;
        self.bind_group = None;
        self.uniform_buf = None;
        // Stride depends on the device's offset alignment limit; a recreated
        // device may report a different one, so it is re-derived next frame.
        self.uniform_stride = 0;
        self.uniform_capacity = 0;
        self.quad_vbo = None;
        self.quad_ibo = None;
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_gpu_state(&mut self, ctx: &RenderCtx<'_>) {
        // Surface format change invalidates compiled pipelines.
        if self.pipeline_format != Some(ctx.surface_format) {
            self.cache.clear();
            self.pipeline_format = Some(ctx.surface_format);
        }

        if self.uniform_stride == 0 {
            let min_align = ctx.device.limits().min_uniform_buffer_offset_alignment as u64;
            self.uniform_stride =
                (std::mem::size_of::<PatternUniforms>() as u64).next_multiple_of(min_align);
        }

        if self.bind_group_layout.is_none() {
            let layout = ctx
                .device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("guilloche pattern bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: true,
                            min_binding_size: Some(uniform_min_binding_size()),
                        },
                        count: None,
                    }],
                });
            self.bind_group_layout = Some(layout);
            self.bind_group = None;
            self.uniform_buf = None;
        }

        if self.quad_vbo.is_none() || self.quad_ibo.is_none() {
            self.quad_vbo = Some(ctx.device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some("guilloche quad vbo"),
                    contents: bytemuck::cast_slice(&QUAD_VERTICES),
                    usage: wgpu::BufferUsages::VERTEX,
                },
            ));
            self.quad_ibo = Some(ctx.device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some("guilloche quad ibo"),
                    contents: bytemuck::cast_slice(&QUAD_INDICES),
                    usage: wgpu::BufferUsages::INDEX,
                },
            ));
        }
    }

    fn ensure_uniform_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.uniform_capacity && self.uniform_buf.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(16);

        let uniform_buf = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("guilloche pattern ubo"),
            size: new_cap as u64 * self.uniform_stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let layout = self
            .bind_group_layout
            .as_ref()
            .expect("bind group layout created in ensure_gpu_state");
        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("guilloche pattern bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buf,
                    offset: 0,
                    size: Some(uniform_min_binding_size()),
                }),
            }],
        }));

        self.uniform_buf = Some(uniform_buf);
        self.uniform_capacity = new_cap;
    }
}

// ── blend ─────────────────────────────────────────────────────────────────

/// Standard alpha-over: `src * srcAlpha + dst * (1 - srcAlpha)`.
///
/// The only blend equation the compositor implements; declared layer blend
/// modes beyond `Normal` are inert data.
pub(super) fn alpha_over_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── uniform block ─────────────────────────────────────────────────────────

/// Canonical uniform set shared by every shader family, one fixed typed
/// block bound at a dynamic offset per layer. Field order matches the WGSL
/// `PatternUniforms` struct; keep the two in lockstep.
///
/// Units: `pan`/`resolution`/`zoom` are pre-scaled to device pixels so the
/// fragment shader maps `@builtin(position)` straight into world space;
/// angles are radians.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct PatternUniforms {
    resolution: [f32; 2],
    pan: [f32; 2],
    zoom: f32,
    spacing: f32,
    thickness: f32,
    phase: f32,
    position: [f32; 2],
    rotation: f32,
    opacity: f32,
    color: [f32; 4],
    offset: [f32; 2],
    rotation_offset: f32,
    angle: f32,
    shape_type: u32,
    sides: u32,
    amplitude: f32,
    wavelength: f32,
    ring_count: u32,
    ring_limit: u32,
    use_ring_offset: u32,
    _pad: u32,
}

fn uniform_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<PatternUniforms>() as u64)
        .expect("PatternUniforms has non-zero size by construction")
}

fn pack_uniforms(layer: &PatternLayer, view: &CanvasView, scale_factor: f32) -> PatternUniforms {
    let t = view.transform;
    let mut u = PatternUniforms {
        resolution: [
            view.viewport.width * scale_factor,
            view.viewport.height * scale_factor,
        ],
        pan: [t.pan.x * scale_factor, t.pan.y * scale_factor],
        zoom: t.zoom * scale_factor,
        spacing: layer.params.spacing(),
        thickness: layer.params.thickness(),
        phase: 0.0,
        position: [layer.position.x, layer.position.y],
        rotation: layer.rotation.to_radians(),
        opacity: layer.opacity.clamp(0.0, 1.0),
        color: layer.color.clamped().to_array(),
        offset: [0.0; 2],
        rotation_offset: 0.0,
        angle: 0.0,
        shape_type: 0,
        sides: 0,
        amplitude: 0.0,
        wavelength: 1.0,
        ring_count: 0,
        ring_limit: 0,
        use_ring_offset: 0,
        _pad: 0,
    };

    match &layer.params {
        PatternParams::Line(p) => {
            u.angle = p.angle.to_radians();
            u.phase = p.phase;
        }
        PatternParams::Concentric(p) => {
            let (shape_type, sides) = p.shape.uniform_encoding();
            u.shape_type = shape_type;
            u.sides = sides;
            u.phase = p.phase;
            u.offset = [p.offset.x, p.offset.y];
            u.rotation_offset = p.rotation_offset.to_radians();
            u.ring_count = p.count;
            u.ring_limit = field::ring_scan_limit(view.world_radius(), p.spacing, p.count);
            u.use_ring_offset = p.has_ring_offset() as u32;
        }
        PatternParams::Tile(p) => {
            u.angle = p.angle.to_radians();
            u.phase = p.phase;
        }
        PatternParams::Curve(p) => {
            u.angle = p.angle.to_radians();
            u.phase = p.phase;
            u.amplitude = p.amplitude;
            u.wavelength = p.wavelength;
        }
    }

    u
}

// ── quad geometry ─────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    pos: [f32; 2], // 0..1, covers the viewport
}

const QUAD_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

pub(super) fn quad_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<QuadVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &QUAD_ATTRS,
    }
}

const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Vec2, Viewport};
    use crate::paint::Color;
    use crate::pattern::{ConcentricParams, ConcentricShape, LineParams};

    fn view() -> CanvasView {
        CanvasView::new(Viewport::new(800.0, 600.0), Color::BLACK)
    }

    #[test]
    fn uniform_block_is_16_byte_aligned() {
        let size = std::mem::size_of::<PatternUniforms>();
        assert_eq!(size % 16, 0, "uniform block size {size} not std140-friendly");
    }

    #[test]
    fn uniform_field_offsets_match_wgsl_layout() {
        use std::mem::offset_of;
        assert_eq!(offset_of!(PatternUniforms, resolution), 0);
        assert_eq!(offset_of!(PatternUniforms, pan), 8);
        assert_eq!(offset_of!(PatternUniforms, zoom), 16);
        assert_eq!(offset_of!(PatternUniforms, position), 32);
        assert_eq!(offset_of!(PatternUniforms, color), 48);
        assert_eq!(offset_of!(PatternUniforms, offset), 64);
        assert_eq!(offset_of!(PatternUniforms, shape_type), 80);
        assert_eq!(offset_of!(PatternUniforms, ring_count), 96);
    }

    #[test]
    fn pack_prescales_view_to_device_pixels() {
        let mut v = view();
        v.transform = crate::coords::ViewTransform::new(2.0, Vec2::new(10.0, -4.0));
        let layer = PatternLayer::new(
            LayerId(1),
            "lines",
            PatternParams::Line(LineParams {
                angle: 90.0,
                spacing: 20.0,
                thickness: 1.0,
                phase: 2.0,
            }),
        );

        let u = pack_uniforms(&layer, &v, 2.0);
        assert_eq!(u.zoom, 4.0);
        assert_eq!(u.pan, [20.0, -8.0]);
        assert_eq!(u.resolution, [1600.0, 1200.0]);
        assert!((u.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn pack_concentric_sets_ring_bounds_and_offset_flag() {
        let layer = PatternLayer::new(
            LayerId(2),
            "rings",
            PatternParams::Concentric(ConcentricParams {
                shape: ConcentricShape::Polygon { sides: 5 },
                spacing: 10.0,
                thickness: 1.5,
                phase: 0.0,
                count: 1000,
                offset: Vec2::new(1.0, 0.0),
                rotation_offset: 0.0,
            }),
        );

        let u = pack_uniforms(&layer, &view(), 1.0);
        assert_eq!(u.shape_type, 2);
        assert_eq!(u.sides, 5);
        assert_eq!(u.use_ring_offset, 1);
        assert_eq!(u.ring_count, 1000);
        // 800x600 viewport at zoom 1: world radius 500, so the visibility
        // bound (500/10 rings + margin) binds before the cap.
        assert_eq!(u.ring_limit, 52);

        // Zoomed far out the visible radius covers hundreds of rings and the
        // hard cap binds instead.
        let mut far = view();
        far.transform.zoom = 0.1;
        let u = pack_uniforms(&layer, &far, 1.0);
        assert_eq!(u.ring_limit, field::MAX_RINGS);
    }

    // The stride is derived from the device's offset-alignment limit, so it
    // must not survive a device teardown: a replacement device may report a
    // different alignment.
    #[test]
    fn release_resets_device_derived_state() {
        let mut c = PatternCompositor::new();
        c.uniform_stride = 256;
        c.uniform_capacity = 8;
        c.release_gpu_resources();
        assert_eq!(c.uniform_stride, 0);
        assert_eq!(c.uniform_capacity, 0);
        assert!(c.uniform_buf.is_none());
    }

    // Composited result of the configured blend factors, folded on the CPU:
    // an opaque top layer must fully hide whatever is beneath it.
    #[test]
    fn alpha_over_blend_is_src_alpha_over() {
        let blend = alpha_over_blend();
        assert_eq!(blend.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(blend.color.dst_factor, wgpu::BlendFactor::OneMinusSrcAlpha);
        assert_eq!(blend.color.operation, wgpu::BlendOperation::Add);

        fn over(src: [f32; 4], dst: [f32; 3]) -> [f32; 3] {
            [
                src[0] * src[3] + dst[0] * (1.0 - src[3]),
                src[1] * src[3] + dst[1] * (1.0 - src[3]),
                src[2] * src[3] + dst[2] * (1.0 - src[3]),
            ]
        }

        let b = over([0.0, 0.0, 1.0, 1.0], [0.2, 0.2, 0.2]); // opaque B over bg
        let a = over([1.0, 0.0, 0.0, 1.0], b); // opaque A over B
        assert_eq!(a, [1.0, 0.0, 0.0]);

        // Half-transparent source mixes.
        let m = over([1.0, 1.0, 1.0, 0.5], [0.0, 0.0, 0.0]);
        assert_eq!(m, [0.5, 0.5, 0.5]);
    }
}
