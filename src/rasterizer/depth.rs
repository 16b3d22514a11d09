//! Fixed-point depth buffer

use super::DEPTH_EMPTY;

/// One `u16` depth per pixel; smaller is nearer.
pub struct DepthBuffer {
    depths: Vec<u16>,
    width: usize,
    height: usize,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            depths: vec![DEPTH_EMPTY; width * height],
            width,
            height,
        }
    }

    /// Reset every entry to `DEPTH_EMPTY`. Must run before the first
    /// triangle of each frame.
    pub fn clear(&mut self) {
        self.depths.fill(DEPTH_EMPTY);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u16> {
        if x < self.width && y < self.height {
            Some(self.depths[y * self.width + x])
        } else {
            None
        }
    }

    /// Store `depth` at (x, y) if it is strictly nearer than what is there.
    /// Ties keep the existing value. Returns true when the entry was written.
    pub fn test_and_set(&mut self, x: usize, y: usize, depth: u16) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let slot = &mut self.depths[y * self.width + x];
        if depth < *slot {
            *slot = depth;
            true
        } else {
            false
        }
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.depths
    }
}
