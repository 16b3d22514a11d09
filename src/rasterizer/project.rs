//! Perspective projection and fixed-point depth encoding

use super::types::{ScreenPoint, Vertex};
use super::DEPTH_EMPTY;

/// Focal length for a vertical field of view given in degrees
pub fn focal_length(fov_degrees: f32) -> f32 {
    1.0 / (2.0 * (fov_degrees.to_radians() / 2.0).tan())
}

/// Map camera-space z from [0, far] onto [0, 65535]. Anything behind the
/// viewer or past the far plane encodes as `DEPTH_EMPTY`.
pub fn encode_depth(z: f32, far: f32) -> u16 {
    if z > far || z < 0.0 || z.is_nan() {
        DEPTH_EMPTY
    } else {
        (z * DEPTH_EMPTY as f32 / far) as u16
    }
}

/// Camera space to screen space for a fixed viewport
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    pub focal_length: f32,
    pub width: usize,
    pub height: usize,
    pub far: f32,
}

impl Projector {
    pub fn new(focal_length: f32, width: usize, height: usize, far: f32) -> Self {
        Self { focal_length, width, height, far }
    }

    /// Perspective scale for a camera-space depth. z == 0 uses 1.0 instead of
    /// dividing by zero.
    pub fn scale(&self, z: f32) -> f32 {
        if z == 0.0 {
            1.0
        } else {
            self.focal_length / z
        }
    }

    /// Normalized x to pixel column. Scaled by the viewport height so
    /// horizontal scale stays independent of aspect ratio.
    pub fn to_screen_x(&self, x: f32) -> i32 {
        ((self.width as f32 + x * self.height as f32) / 2.0) as i32
    }

    /// Normalized y (up) to pixel row (down)
    pub fn to_screen_y(&self, y: f32) -> i32 {
        ((self.height as f32 - y * self.height as f32) / 2.0) as i32
    }

    pub fn project(&self, v: &Vertex) -> ScreenPoint {
        let s = self.scale(v.pos.z);
        ScreenPoint {
            x: self.to_screen_x(v.pos.x * s),
            y: self.to_screen_y(v.pos.y * s),
            depth: encode_depth(v.pos.z, self.far),
            u: v.uv.x,
            v: v.uv.y,
        }
    }
}
