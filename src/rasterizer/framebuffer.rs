//! Framebuffer and the pixel sink the rasterizer writes through

use super::error::RasterError;
use super::types::Color;

/// Destination for rasterized pixels.
///
/// The rasterizer only calls `put_pixel` inside both the sink's
/// `width` x `height` and its own depth buffer.
pub trait PixelSink {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn put_pixel(&mut self, x: usize, y: usize, color: Color);
}

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            let p = &self.pixels[idx..idx + 4];
            Some(Color::with_alpha(p[0], p[1], p[2], p[3]))
        } else {
            None
        }
    }

    /// Number of pixels that differ from `color`
    pub fn count_not(&self, color: Color) -> usize {
        let bytes = color.to_bytes();
        self.pixels.chunks_exact(4).filter(|px| **px != bytes[..]).count()
    }

    /// Write the framebuffer to an image file; the format follows the
    /// extension (PNG in practice)
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), RasterError> {
        let img = image::RgbaImage::from_raw(self.width as u32, self.height as u32, self.pixels.clone())
            .ok_or(RasterError::InvalidTexture {
                width: self.width,
                height: self.height,
                texels: self.pixels.len() / 4,
            })?;
        img.save(path)?;
        Ok(())
    }
}

impl PixelSink for Framebuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn put_pixel(&mut self, x: usize, y: usize, color: Color) {
        self.set_pixel(x, y, color);
    }
}
