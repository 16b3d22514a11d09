//! Lester: a scanline software rasterizer
//!
//! Camera-space triangles are clipped against the near and far z-planes,
//! projected with a pinhole camera, and filled row by row into any
//! [`rasterizer::PixelSink`] behind a 16-bit z-buffer:
//! - Winding-preserving near/far clipping
//! - Flat lighting from the face normal, with back-face culling
//! - Affine texture mapping
//! - RON configs and scene files

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod rasterizer;
pub mod scene;
