//! Frame driver: clip, project and rasterize a stream of triangles

use super::clip::{clip_against_planes_into, ClipPlane, ClipWorklist};
use super::depth::DepthBuffer;
use super::error::RasterError;
use super::framebuffer::PixelSink;
use super::project::{focal_length, Projector};
use super::scanline::{face_lighting, rasterize_triangle, Facing};
use super::span::SpanShading;
use super::types::Triangle;
use crate::config::RenderConfig;

/// Per-frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Triangles handed to `draw_triangle`
    pub submitted: usize,
    /// Submitted triangles with nothing left after near/far clipping
    pub clipped_away: usize,
    /// Triangles that came out of clipping (unsplit ones included)
    pub clip_pieces: usize,
    /// Clipped pieces rejected by the facing test (back-facing or degenerate)
    pub culled: usize,
    /// Clipped pieces that reached the scanline rasterizer
    pub rasterized: usize,
    pub pixels_written: usize,
}

/// Owns everything that persists between frames: the projector, the two
/// clip planes and the depth buffer.
pub struct Renderer {
    config: RenderConfig,
    projector: Projector,
    planes: [ClipPlane; 2],
    depth: DepthBuffer,
    stats: FrameStats,
    // Clip buffers kept across triangles and frames
    clip_work: ClipWorklist,
    clip_out: Vec<Triangle>,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Result<Self, RasterError> {
        config
            .validate()
            .map_err(|e| RasterError::InvalidConfig(e.to_string()))?;

        let projector = Projector::new(
            focal_length(config.fov_degrees),
            config.width,
            config.height,
            config.far,
        );

        log::debug!(
            "Renderer {}x{} near={} far={} fov={} focal={:.4}",
            config.width,
            config.height,
            config.near,
            config.far,
            config.fov_degrees,
            projector.focal_length
        );

        Ok(Self {
            projector,
            planes: [ClipPlane::near(config.near), ClipPlane::far(config.far)],
            depth: DepthBuffer::new(config.width, config.height),
            stats: FrameStats::default(),
            clip_work: Vec::with_capacity(4),
            clip_out: Vec::with_capacity(4),
            config,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Counters since the last `begin_frame`
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Reset the depth buffer and counters. Call before the first triangle
    /// of every frame.
    pub fn begin_frame(&mut self) {
        self.depth.clear();
        self.stats = FrameStats::default();
    }

    /// Clip against near then far, and rasterize every surviving piece
    pub fn draw_triangle<S: PixelSink>(&mut self, tri: &Triangle, sink: &mut S) {
        self.stats.submitted += 1;

        let mut pieces = std::mem::take(&mut self.clip_out);
        clip_against_planes_into(tri, &self.planes, &mut self.clip_work, &mut pieces);

        if pieces.is_empty() {
            self.stats.clipped_away += 1;
        } else {
            self.stats.clip_pieces += pieces.len();
            for piece in &pieces {
                self.draw_clipped(piece, sink);
            }
        }
        self.clip_out = pieces;
    }

    fn draw_clipped<S: PixelSink>(&mut self, tri: &Triangle, sink: &mut S) {
        let lighting = match face_lighting(tri) {
            Facing::Visible(lighting) => lighting,
            Facing::BackFacing | Facing::Degenerate => {
                self.stats.culled += 1;
                return;
            }
        };

        let projector = self.projector;
        let points = tri.vertices.map(|v| projector.project(&v));

        // A bound texture overrides the lighting color entirely
        let shading = match &tri.texture {
            Some(tex) => SpanShading::Textured(tex),
            None => SpanShading::Flat(lighting.color),
        };

        self.stats.pixels_written += rasterize_triangle(points, shading, &mut self.depth, sink);
        self.stats.rasterized += 1;
    }

    /// Render one complete frame
    pub fn render<'a, S, I>(&mut self, triangles: I, sink: &mut S) -> FrameStats
    where
        S: PixelSink,
        I: IntoIterator<Item = &'a Triangle>,
    {
        self.begin_frame();
        for tri in triangles {
            self.draw_triangle(tri, sink);
        }

        log::debug!(
            "Frame: {} submitted, {} clipped away, {} pieces, {} culled, {} rasterized, {} pixels",
            self.stats.submitted,
            self.stats.clipped_away,
            self.stats.clip_pieces,
            self.stats.culled,
            self.stats.rasterized,
            self.stats.pixels_written
        );

        self.stats
    }
}
