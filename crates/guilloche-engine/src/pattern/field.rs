//! Distance-field evaluation for the pattern families.
//!
//! This is the canonical statement of the math; the WGSL fragment shaders
//! under `render/shaders/` mirror it term for term. The compositor uses the
//! ring-cap and anti-aliasing helpers when packing uniforms; the unit tests
//! below pin the shader semantics on the CPU.
//!
//! All functions take points already mapped into layer-local space
//! (translated by `-position`, rotated by `-rotation`).

use std::f32::consts::TAU;

use crate::coords::Vec2;

use super::params::{ConcentricParams, ConcentricShape, CurveParams, LineParams, TileParams};

/// Half-width of the stroke-edge falloff band in device pixels. World-space
/// AA width is `AA_DEVICE_PIXELS / (zoom * scale_factor)`, keeping edges
/// ~1–2 device pixels wide regardless of zoom.
pub const AA_DEVICE_PIXELS: f32 = 1.0;

/// Hard cap on rings visited by the offset scan path.
pub const MAX_RINGS: u32 = 64;

/// Index window tested around the analytic nearest ring on the fast path.
pub const FAST_PATH_WINDOW: i64 = 2;

/// Offsets with magnitude at or below this count as zero (fast path stays valid).
pub const OFFSET_EPSILON: f32 = 1e-4;

#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 >= edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Anti-aliased stroke coverage for a feature distance.
///
/// `aa` is the half-width of the falloff band in the same units as
/// `distance` (world units when evaluating layer fields). The band is
/// clamped to the stroke's half-width so the centerline always reads as
/// full coverage, even for sub-pixel thicknesses.
#[inline]
pub fn stroke_alpha(distance: f32, thickness: f32, aa: f32) -> f32 {
    let half = 0.5 * thickness;
    let aa = aa.min(half).max(1e-6);
    1.0 - smoothstep(half - aa, half + aa, distance)
}

/// World-space AA half-width for the current view scale.
#[inline]
pub fn aa_world(zoom_device_px: f32) -> f32 {
    AA_DEVICE_PIXELS / zoom_device_px.max(1e-6)
}

/// Distance from `proj` to the nearest multiple of `spacing`.
#[inline]
fn periodic_distance(proj: f32, spacing: f32) -> f32 {
    (proj - (proj / spacing).round() * spacing).abs()
}

/// Line family: distance to the nearest stripe centerline.
pub fn line_distance(p: Vec2, params: &LineParams) -> f32 {
    let angle = params.angle.to_radians();
    let dir = Vec2::new(angle.cos(), angle.sin());
    let proj = p.dot(dir) + params.phase;
    periodic_distance(proj, params.spacing)
}

/// Tile family: grid formed by two perpendicular stripe fields.
pub fn tile_distance(p: Vec2, params: &TileParams) -> f32 {
    let along = LineParams {
        angle: params.angle,
        spacing: params.spacing,
        thickness: params.thickness,
        phase: params.phase,
    };
    let across = LineParams {
        angle: params.angle + 90.0,
        ..along
    };
    line_distance(p, &along).min(line_distance(p, &across))
}

/// Curve family: stripes displaced by a sine along the pattern axis.
///
/// The vertical displacement makes this an approximation of the true
/// Euclidean distance; accurate enough for the thin strokes it draws.
pub fn curve_distance(p: Vec2, params: &CurveParams) -> f32 {
    let q = p.rotated(-params.angle.to_radians());
    let wave = params.amplitude * (TAU * q.x / params.wavelength).sin();
    periodic_distance(q.y - wave + params.phase, params.spacing)
}

/// Per-shape radius metric: how far `p` sits from the shape's center, in the
/// units ring radii are expressed in.
pub fn shape_metric(p: Vec2, shape: ConcentricShape) -> f32 {
    match shape {
        ConcentricShape::Circle => p.length(),
        ConcentricShape::Square => p.x.abs().max(p.y.abs()),
        ConcentricShape::Triangle => polygon_metric(p, 3),
        ConcentricShape::Polygon { sides } => polygon_metric(p, sides.max(3)),
    }
}

/// Regular-polygon metric: radial distance scaled so the value at the
/// apothem equals the ring radius. Equivalent to `r * cos(wrapped angle)`.
fn polygon_metric(p: Vec2, sides: u32) -> f32 {
    let r = p.length();
    if r <= 0.0 {
        return 0.0;
    }
    let seg = TAU / sides as f32;
    let ang = p.y.atan2(p.x);
    let wrapped = ang.rem_euclid(seg) - 0.5 * seg;
    r * wrapped.cos()
}

/// Ring count actually worth scanning: bounded by the implementation cap,
/// by what fits in the visible radius, and by the layer's own ring count.
pub fn ring_scan_limit(viewport_radius_world: f32, spacing: f32, count: u32) -> u32 {
    let visible = (viewport_radius_world / spacing).ceil() as u32 + 2;
    MAX_RINGS.min(visible).min(count)
}

/// Concentric family distance, dispatching between the analytic fast path
/// and the linear offset scan.
pub fn concentric_distance(p: Vec2, params: &ConcentricParams, viewport_radius_world: f32) -> f32 {
    if params.has_ring_offset() {
        concentric_distance_scan(p, params, viewport_radius_world)
    } else {
        concentric_distance_fast(p, params)
    }
}

/// Zero-offset fast path: rings are evenly spaced in the shape metric, so the
/// nearest index is `round((metric - phase) / spacing)`. A small window of
/// neighbors is tested to absorb rounding at the metric's seams; cost is
/// O(window), independent of ring count.
pub fn concentric_distance_fast(p: Vec2, params: &ConcentricParams) -> f32 {
    if params.count == 0 {
        return f32::INFINITY;
    }
    let metric = shape_metric(p, params.shape);
    let nearest = (((metric - params.phase) / params.spacing).round() as i64)
        .clamp(0, params.count as i64 - 1);

    let mut best = f32::INFINITY;
    for dk in -FAST_PATH_WINDOW..=FAST_PATH_WINDOW {
        let k = nearest + dk;
        if k < 0 || k >= params.count as i64 {
            continue;
        }
        let ring = params.phase + k as f32 * params.spacing;
        best = best.min((metric - ring).abs());
    }
    best
}

/// Offset scan path: each ring has its own center (`index * offset`) and
/// orientation (`index * rotation_offset`), so rings are not evenly spaced in
/// screen distance and the analytic shortcut is invalid. Scans linearly,
/// keeping the running minimum, and exits early once the minimum is inside
/// half the stroke width (coverage is already 1 there).
pub fn concentric_distance_scan(
    p: Vec2,
    params: &ConcentricParams,
    viewport_radius_world: f32,
) -> f32 {
    let limit = ring_scan_limit(viewport_radius_world, params.spacing, params.count);
    let half_thickness = 0.5 * params.thickness;
    let rot_step = params.rotation_offset.to_radians();

    let mut best = f32::INFINITY;
    for k in 0..limit {
        let kf = k as f32;
        let mut q = p - params.offset * kf;
        if rot_step != 0.0 {
            q = q.rotated(-kf * rot_step);
        }
        let ring = params.phase + kf * params.spacing;
        let d = (shape_metric(q, params.shape) - ring).abs();
        if d < best {
            best = d;
        }
        if best < half_thickness {
            break;
        }
    }
    best
}

/// Distance field of a whole layer at a world-space point.
///
/// Maps into layer-local space, then dispatches on the parameter variant.
pub fn layer_distance(
    world: Vec2,
    position: Vec2,
    rotation_deg: f32,
    params: &super::params::PatternParams,
    viewport_radius_world: f32,
) -> f32 {
    let local = (world - position).rotated(-rotation_deg.to_radians());
    match params {
        super::params::PatternParams::Line(p) => line_distance(local, p),
        super::params::PatternParams::Concentric(p) => {
            concentric_distance(local, p, viewport_radius_world)
        }
        super::params::PatternParams::Tile(p) => tile_distance(local, p),
        super::params::PatternParams::Curve(p) => curve_distance(local, p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::params::PatternParams;

    const TOL: f32 = 1e-3;

    fn concentric(spacing: f32, count: u32, shape: ConcentricShape) -> ConcentricParams {
        ConcentricParams {
            shape,
            spacing,
            thickness: 1.5,
            phase: 0.0,
            count,
            offset: Vec2::zero(),
            rotation_offset: 0.0,
        }
    }

    /// Reference evaluation: every ring tested, no windowing, no early exit.
    fn concentric_distance_brute(p: Vec2, params: &ConcentricParams) -> f32 {
        let rot_step = params.rotation_offset.to_radians();
        let mut best = f32::INFINITY;
        for k in 0..params.count {
            let kf = k as f32;
            let q = (p - params.offset * kf).rotated(-kf * rot_step);
            let ring = params.phase + kf * params.spacing;
            best = best.min((shape_metric(q, params.shape) - ring).abs());
        }
        best
    }

    #[test]
    fn fast_path_matches_brute_force() {
        let shapes = [
            ConcentricShape::Circle,
            ConcentricShape::Square,
            ConcentricShape::Triangle,
            ConcentricShape::Polygon { sides: 6 },
        ];
        let spacings = [1.0f32, 7.5, 20.0, 100.0];

        for shape in shapes {
            for spacing in spacings {
                let params = concentric(spacing, 200, shape);
                // Sample a grid of points spanning many rings, plus off-axis ones.
                for i in 0..60 {
                    for j in 0..5 {
                        let p = Vec2::new(
                            i as f32 * spacing * 0.83 + 0.37,
                            j as f32 * spacing * 0.41 - 11.0,
                        );
                        let fast = concentric_distance_fast(p, &params);
                        let brute = concentric_distance_brute(p, &params);
                        assert!(
                            (fast - brute).abs() < TOL,
                            "fast {fast} vs brute {brute} at {p:?}, spacing {spacing}, {shape:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn fast_path_respects_ring_count() {
        // Point far outside the last ring: nearest ring is count-1, not the
        // analytic round() index.
        let params = concentric(10.0, 3, ConcentricShape::Circle);
        let p = Vec2::new(100.0, 0.0);
        let d = concentric_distance_fast(p, &params);
        assert!((d - 80.0).abs() < TOL); // last ring at r=20
    }

    #[test]
    fn scan_path_matches_brute_force_with_offsets() {
        let params = ConcentricParams {
            shape: ConcentricShape::Circle,
            spacing: 12.0,
            thickness: 0.0, // disable early exit so the scan is exhaustive
            phase: 0.0,
            count: 40,
            offset: Vec2::new(3.0, 1.5),
            rotation_offset: 4.0,
        };
        // Viewport radius large enough that the visibility bound exceeds count.
        let radius = 12.0 * 70.0;
        for i in 0..40 {
            let p = Vec2::new(i as f32 * 9.7 - 30.0, i as f32 * 3.1);
            let scan = concentric_distance_scan(p, &params, radius);
            let brute = concentric_distance_brute(p, &params);
            assert!(
                (scan - brute).abs() < TOL,
                "scan {scan} vs brute {brute} at {p:?}"
            );
        }
    }

    #[test]
    fn scan_early_exit_still_covers_stroke() {
        // Early exit only triggers once distance < half thickness, where
        // coverage is already saturated; alpha must still be ~1.
        let params = ConcentricParams {
            thickness: 4.0,
            ..concentric(20.0, 50, ConcentricShape::Circle)
        };
        let mut params = params;
        params.offset = Vec2::new(1.0, 0.0);
        let p = Vec2::new(20.0 + 1.0, 0.0); // on ring 1, center offset (1, 0)
        let d = concentric_distance_scan(p, &params, 20.0 * 60.0);
        assert!(stroke_alpha(d, params.thickness, 0.1) > 0.99);
    }

    #[test]
    fn ring_scan_limit_bounds() {
        assert_eq!(ring_scan_limit(1000.0, 10.0, 1000), MAX_RINGS);
        assert_eq!(ring_scan_limit(100.0, 10.0, 1000), 12); // 10 visible + margin
        assert_eq!(ring_scan_limit(1000.0, 10.0, 5), 5);
    }

    // Scenario: concentric circles, spacing 20, thickness 1.5, no transform.
    #[test]
    fn concentric_alpha_on_and_between_rings() {
        let params = concentric(20.0, 100, ConcentricShape::Circle);
        let aa = aa_world(1.0); // zoom 1, scale 1

        // Exactly on ring 1 (radius 20): distance 0, full coverage.
        let on_ring = concentric_distance_fast(Vec2::new(20.0, 0.0), &params);
        assert!(on_ring.abs() < TOL);
        assert!(stroke_alpha(on_ring, 1.5, aa) > 0.99);

        // Halfway between rings 0 and 1: distance 10, no coverage.
        let between = concentric_distance_fast(Vec2::new(10.0, 0.0), &params);
        assert!((between - 10.0).abs() < TOL);
        assert!(stroke_alpha(between, 1.5, aa) < 0.01);
    }

    // Scenario: straight lines, angle 0, spacing 20, thickness 1.
    #[test]
    fn line_alpha_on_and_between_stripes() {
        let params = LineParams {
            angle: 0.0,
            spacing: 20.0,
            thickness: 1.0,
            phase: 0.0,
        };
        let aa = aa_world(1.0);

        let on_line = line_distance(Vec2::new(0.0, 5.0), &params);
        assert!(on_line.abs() < TOL);
        assert!(stroke_alpha(on_line, 1.0, aa) > 0.99);

        let between = line_distance(Vec2::new(10.0, 5.0), &params);
        assert!((between - 10.0).abs() < TOL);
        assert!(stroke_alpha(between, 1.0, aa) < 0.01);
    }

    #[test]
    fn line_phase_shifts_stripes() {
        let params = LineParams {
            angle: 0.0,
            spacing: 20.0,
            thickness: 1.0,
            phase: 5.0,
        };
        // proj = x + 5; stripe centers where proj is a multiple of 20.
        assert!(line_distance(Vec2::new(15.0, 0.0), &params).abs() < TOL);
    }

    #[test]
    fn square_metric_is_chebyshev() {
        assert!((shape_metric(Vec2::new(3.0, -7.0), ConcentricShape::Square) - 7.0).abs() < TOL);
    }

    #[test]
    fn polygon_metric_at_apothem_equals_radius() {
        // Midpoint of a hexagon edge lies at the apothem; the metric is
        // normalized so that point reads as the ring radius.
        let sides = 6u32;
        let seg = TAU / sides as f32;
        let apothem_dir = Vec2::new((0.5 * seg).cos(), (0.5 * seg).sin());
        let m = shape_metric(apothem_dir * 12.0, ConcentricShape::Polygon { sides });
        assert!((m - 12.0).abs() < TOL);
    }

    #[test]
    fn tile_distance_is_min_of_both_axes() {
        let params = TileParams {
            angle: 0.0,
            spacing: 20.0,
            thickness: 1.0,
            phase: 0.0,
        };
        // (3, 9): 3 from the vertical stripe field, 9 from the horizontal.
        let d = tile_distance(Vec2::new(3.0, 9.0), &params);
        assert!((d - 3.0).abs() < TOL);
    }

    #[test]
    fn curve_zero_amplitude_degenerates_to_lines() {
        let curve = CurveParams {
            angle: 0.0,
            spacing: 20.0,
            thickness: 1.0,
            phase: 0.0,
            amplitude: 0.0,
            wavelength: 50.0,
        };
        let line = LineParams {
            angle: 90.0, // curve stripes run along x; distance is measured in y
            spacing: 20.0,
            thickness: 1.0,
            phase: 0.0,
        };
        for i in 0..20 {
            let p = Vec2::new(i as f32 * 3.3, i as f32 * 7.1 - 40.0);
            assert!((curve_distance(p, &curve) - line_distance(p, &line)).abs() < TOL);
        }
    }

    #[test]
    fn layer_distance_applies_transform() {
        let params = PatternParams::Concentric(concentric(20.0, 10, ConcentricShape::Circle));
        // Layer centered at (100, 50); world point 20 to its right sits on ring 1.
        let d = layer_distance(Vec2::new(120.0, 50.0), Vec2::new(100.0, 50.0), 33.0, &params, 1e4);
        assert!(d.abs() < TOL); // circle metric is rotation-invariant
    }
}
