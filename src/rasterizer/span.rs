//! Span filling: one scanline between two edge endpoints

use super::depth::DepthBuffer;
use super::framebuffer::PixelSink;
use super::types::{Color, Texture};
use super::DEPTH_EMPTY;

/// One end of a span: screen x, depth (fixed-point scale, unrounded) and u,v
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanEnd {
    pub x: f32,
    pub depth: f32,
    pub u: f32,
    pub v: f32,
}

impl SpanEnd {
    pub fn new(x: f32, depth: f32, u: f32, v: f32) -> Self {
        Self { x, depth, u, v }
    }

    fn clamp_uv(self) -> Self {
        Self {
            u: self.u.clamp(0.0, 1.0),
            v: self.v.clamp(0.0, 1.0),
            ..self
        }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.depth.is_finite() && self.u.is_finite() && self.v.is_finite()
    }
}

/// Where span pixels get their color from
#[derive(Debug, Clone, Copy)]
pub enum SpanShading<'a> {
    /// Texel lookup; replaces any lighting color
    Textured(&'a Texture),
    /// Flat lit color for untextured triangles
    Flat(Color),
}

/// Fill the pixels of `row` between `a` and `b` (either order) that pass the
/// depth test. Returns the number of pixels written.
///
/// Endpoint u,v are clamped to [0,1] before interpolation. Values are
/// evaluated from the right endpoint, `value(x) = slope * (x - x1) + value1`,
/// with slopes measured from the floored left x.
pub fn fill_span<S: PixelSink>(
    row: i32,
    a: SpanEnd,
    b: SpanEnd,
    shading: SpanShading,
    depth: &mut DepthBuffer,
    sink: &mut S,
) -> usize {
    // Only pixels both buffers hold
    let width = depth.width().min(sink.width());
    let height = depth.height().min(sink.height());

    if row < 0 || row as usize >= height {
        return 0;
    }
    if !a.is_finite() || !b.is_finite() {
        return 0;
    }
    let row = row as usize;

    let a = a.clamp_uv();
    let b = b.clamp_uv();
    let (left, right) = if a.x > b.x { (b, a) } else { (a, b) };

    let start = left.x.floor();
    let dx = right.x - start;
    let (mz, mu, mv) = if dx != 0.0 {
        (
            (right.depth - left.depth) / dx,
            (right.u - left.u) / dx,
            (right.v - left.v) / dx,
        )
    } else {
        (0.0, 0.0, 0.0)
    };

    // Columns outside [0, width) are skipped, not drawn
    let first = start.max(0.0);
    let last = right.x.floor().min(width as f32 - 1.0);
    if last < first {
        return 0;
    }

    let mut written = 0;
    for col in first as usize..=last as usize {
        let x = col as f32;
        let z = (mz * (x - right.x) + right.depth).round().clamp(0.0, DEPTH_EMPTY as f32) as u16;

        if depth.test_and_set(col, row, z) {
            let color = match shading {
                SpanShading::Textured(tex) => {
                    let u = mu * (x - right.x) + right.u;
                    let v = mv * (x - right.x) + right.v;
                    tex.sample(u, v)
                }
                SpanShading::Flat(color) => color,
            };
            sink.put_pixel(col, row, color);
            written += 1;
        }
    }

    written
}
