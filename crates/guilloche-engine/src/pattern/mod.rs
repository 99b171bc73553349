//! Pattern layer data model and distance-field math.
//!
//! Responsibilities:
//! - layer records as read from the external project store (snapshot per frame)
//! - category-tagged parameter variants (no shared optional-field bag)
//! - the CPU reference evaluation of each family's distance field; the WGSL
//!   under `render/shaders/` mirrors this math term for term

pub mod field;
mod layer;
mod params;

pub use layer::{BlendMode, LayerId, LayerPatch, PatternLayer};
pub use params::{
    ConcentricParams, ConcentricShape, CurveParams, LineParams, ParamError, PatternParams,
    TileParams,
};
