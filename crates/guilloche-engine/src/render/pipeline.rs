use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::pattern::PatternParams;

use super::error::ShaderError;

/// Shader family selected per layer category.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderFamily {
    Line,
    Concentric,
    Tile,
    Curve,
}

impl ShaderFamily {
    pub fn of(params: &PatternParams) -> Self {
        match params {
            PatternParams::Line(_) => ShaderFamily::Line,
            PatternParams::Concentric(_) => ShaderFamily::Concentric,
            PatternParams::Tile(_) => ShaderFamily::Tile,
            PatternParams::Curve(_) => ShaderFamily::Curve,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            ShaderFamily::Line => "line",
            ShaderFamily::Concentric => "concentric",
            ShaderFamily::Tile => "tile",
            ShaderFamily::Curve => "curve",
        }
    }

    pub(crate) fn source(self) -> &'static str {
        match self {
            ShaderFamily::Line => include_str!("shaders/line.wgsl"),
            ShaderFamily::Concentric => include_str!("shaders/concentric.wgsl"),
            ShaderFamily::Tile => include_str!("shaders/tile.wgsl"),
            ShaderFamily::Curve => include_str!("shaders/curve.wgsl"),
        }
    }
}

/// Entry points shared by every family module.
const VS_ENTRY: &str = "vs_main";
const FS_ENTRY: &str = "fs_main";

/// Compiled-pipeline cache keyed by shader source identity.
///
/// Each entry is built once: module creation and pipeline creation are each
/// wrapped in a validation error scope, and a captured diagnostic is stored
/// in place of the pipeline so repeated requests stay O(1) with zero
/// recompilation, success or failure. `clear()` drops everything (explicit
/// teardown or surface-format change).
#[derive(Default)]
pub struct PipelineCache {
    entries: HashMap<u64, Result<wgpu::RenderPipeline, ShaderError>>,
}

impl PipelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stable key derived from the shader source text and entry points, not
    /// from reference identity.
    pub fn key(source: &str, vs_entry: &str, fs_entry: &str) -> u64 {
        let mut h = DefaultHasher::new();
        source.hash(&mut h);
        vs_entry.hash(&mut h);
        fs_entry.hash(&mut h);
        h.finish()
    }

    /// Returns the cached pipeline for `family`, building it on first use.
    ///
    /// A build failure is logged once, cached, and returned as `Err` on every
    /// subsequent request; it aborts only this entry, never the cache.
    pub fn get_or_create(
        &mut self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        layout: &wgpu::BindGroupLayout,
        family: ShaderFamily,
    ) -> Result<&wgpu::RenderPipeline, ShaderError> {
        let key = Self::key(family.source(), VS_ENTRY, FS_ENTRY);

        if !self.entries.contains_key(&key) {
            let built = build_pipeline(device, format, layout, family);
            if let Err(e) = &built {
                log::error!("{e}");
            }
            self.entries.insert(key, built);
        }

        // Entry guaranteed above.
        self.entries
            .get(&key)
            .expect("pipeline cache entry just inserted")
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Immutable lookup for the draw loop; `None` for unbuilt or failed
    /// entries.
    pub fn get(&self, family: ShaderFamily) -> Option<&wgpu::RenderPipeline> {
        let key = Self::key(family.source(), VS_ENTRY, FS_ENTRY);
        self.entries.get(&key).and_then(|r| r.as_ref().ok())
    }

    /// Releases all compiled programs. Called on teardown and when the
    /// surface format changes (context loss recovery recreates entries on
    /// demand next frame).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    layout: &wgpu::BindGroupLayout,
    family: ShaderFamily,
) -> Result<wgpu::RenderPipeline, ShaderError> {
    // Compile stage: module validation errors surface through the scope.
    // The guard must stay alive until popped; dropping it pops the scope.
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(family.label()),
        source: wgpu::ShaderSource::Wgsl(family.source().into()),
    });
    if let Some(e) = pollster::block_on(scope.pop()) {
        return Err(ShaderError::Compile {
            family: family.label(),
            log: e.to_string(),
        });
    }

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("guilloche pattern pipeline layout"),
        bind_group_layouts: &[layout],
        immediate_size: 0,
    });

    // Link stage: entry-point interfaces and target state are checked here.
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(family.label()),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some(VS_ENTRY),
            compilation_options: Default::default(),
            buffers: &[super::compositor::quad_vertex_layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some(FS_ENTRY),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(super::compositor::alpha_over_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });
    if let Some(e) = pollster::block_on(scope.pop()) {
        return Err(ShaderError::Link {
            family: family.label(),
            log: e.to_string(),
        });
    }

    Ok(pipeline)
}
