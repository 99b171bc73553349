use thiserror::Error;

/// Shader build failures, scoped to one pipeline-cache entry.
///
/// A failed entry never poisons the cache or other programs; layers needing
/// the failed family simply do not draw while the frame continues.
#[derive(Debug, Clone, Error)]
pub enum ShaderError {
    /// WGSL module validation failed (covers both entry points; wgpu
    /// validates the module as a whole).
    #[error("{family} shader module failed to compile: {log}")]
    Compile { family: &'static str, log: String },

    /// Pipeline creation failed — stage interfaces, formats or blend state
    /// did not link up.
    #[error("{family} pipeline failed to link: {log}")]
    Link { family: &'static str, log: String },
}
