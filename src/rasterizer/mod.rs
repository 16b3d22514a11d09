//! Scanline software rasterizer
//!
//! Features:
//! - Near/far z-plane clipping that preserves winding
//! - Perspective projection with 16-bit fixed-point depth
//! - Closed-form per-row edge interpolation
//! - Affine texture mapping (no perspective correction)
//! - Flat, whole-triangle lighting from the face normal
//! - Z-buffer with strict nearer-wins test

mod clip;
mod depth;
mod error;
mod framebuffer;
mod math;
mod project;
mod render;
mod scanline;
mod span;
mod types;

pub use clip::*;
pub use depth::*;
pub use error::*;
pub use framebuffer::*;
pub use math::*;
pub use project::*;
pub use render::*;
pub use scanline::*;
pub use span::*;
pub use types::*;

/// Default viewport
pub const DEFAULT_WIDTH: usize = 640;
pub const DEFAULT_HEIGHT: usize = 480;

/// Depth of an empty pixel, and of anything at or past the far plane
pub const DEPTH_EMPTY: u16 = u16::MAX;
