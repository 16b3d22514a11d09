//! Face lighting and scanline rasterization of projected triangles

use std::f32::consts::PI;

use super::depth::DepthBuffer;
use super::framebuffer::PixelSink;
use super::span::{fill_span, SpanEnd, SpanShading};
use super::types::{Color, ScreenPoint, Triangle};

/// Faces whose normal is this far (or further) from the view axis are culled
pub const CULL_ANGLE: f32 = 3.0 * PI / 4.0;

/// Flat lighting for one triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceLighting {
    /// Angle between the face normal and the direction back to the viewer
    pub angle: f32,
    /// 1.0 facing the viewer, falling linearly to 0.0 at PI
    pub intensity: f32,
    /// Vertex 0's color scaled by `intensity`
    pub color: Color,
}

/// Outcome of the facing test
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Facing {
    Visible(FaceLighting),
    BackFacing,
    /// Zero-area triangle; there is no normal to test
    Degenerate,
}

/// Facing test and flat lighting from the camera-space face normal
/// `(v0 - v2) x (v1 - v2)`
pub fn face_lighting(tri: &Triangle) -> Facing {
    let [a, b, c] = &tri.vertices;
    let Some(normal) = (a.pos - c.pos).cross(b.pos - c.pos).try_normalize() else {
        return Facing::Degenerate;
    };

    let angle = (-normal.z).clamp(-1.0, 1.0).acos();
    if angle >= CULL_ANGLE {
        return Facing::BackFacing;
    }

    let intensity = 1.0 - angle / PI;
    Facing::Visible(FaceLighting {
        angle,
        intensity,
        color: a.color.shade(intensity),
    })
}

/// Closed-form edge between two projected points, evaluated per row
struct Edge {
    x: f32,
    y: f32,
    depth: f32,
    u: f32,
    v: f32,
    mx: f32,
    mz: f32,
    mu: f32,
    mv: f32,
}

impl Edge {
    fn new(from: &ScreenPoint, to: &ScreenPoint) -> Self {
        let dy = to.y as f32 - from.y as f32;
        let slope = |d: f32| if dy != 0.0 { d / dy } else { 0.0 };
        Self {
            x: from.x as f32,
            y: from.y as f32,
            depth: from.depth as f32,
            u: from.u,
            v: from.v,
            mx: slope(to.x as f32 - from.x as f32),
            mz: slope(to.depth as f32 - from.depth as f32),
            mu: slope(to.u - from.u),
            mv: slope(to.v - from.v),
        }
    }

    fn at(&self, row: i32) -> SpanEnd {
        let t = row as f32 - self.y;
        SpanEnd {
            x: self.mx * t + self.x,
            depth: self.mz * t + self.depth,
            u: self.mu * t + self.u,
            v: self.mv * t + self.v,
        }
    }
}

/// Scan-convert three projected points. Rows run from the top vertex
/// (inclusive) to the bottom vertex (exclusive); rows outside the depth
/// buffer or the sink are skipped. Returns the number of pixels written.
pub fn rasterize_triangle<S: PixelSink>(
    points: [ScreenPoint; 3],
    shading: SpanShading,
    depth: &mut DepthBuffer,
    sink: &mut S,
) -> usize {
    let mut sorted = points;
    // Stable: equal rows keep submission order
    sorted.sort_by_key(|p| p.y);
    let [top, mid, bottom] = sorted;

    let long = Edge::new(&top, &bottom);
    let upper = Edge::new(&top, &mid);
    let lower = Edge::new(&mid, &bottom);

    let first = top.y.max(0);
    let end = bottom.y.min(depth.height().min(sink.height()) as i32);

    let mut written = 0;
    for row in first..end {
        let far_side = long.at(row);
        let near_side = if row < mid.y { upper.at(row) } else { lower.at(row) };
        written += fill_span(row, near_side, far_side, shading, depth, sink);
    }
    written
}
