//! Core types for the rasterizer

use std::sync::Arc;

use super::error::RasterError;
use super::math::{Vec2, Vec3};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const YELLOW: Color = Color { r: 255, g: 255, b: 0, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from a packed `0xRRGGBB` texel
    pub fn from_rgb_u32(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
            a: 255,
        }
    }

    /// Pack into `0xRRGGBB`, dropping alpha
    pub fn to_rgb_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Apply shading (multiply by intensity 0.0-1.0)
    pub fn shade(self, intensity: f32) -> Self {
        let i = if intensity.is_nan() { 0.0 } else { intensity.clamp(0.0, 1.0) };
        Self {
            r: (self.r as f32 * i) as u8,
            g: (self.g as f32 * i) as u8,
            b: (self.b as f32 * i) as u8,
            a: self.a,
        }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A camera-space vertex: position, texture coordinate and color
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec3,
    pub uv: Vec2,
    pub color: Color,
}

impl Vertex {
    pub fn new(pos: Vec3, uv: Vec2, color: Color) -> Self {
        Self { pos, uv, color }
    }

    pub fn from_pos(x: f32, y: f32, z: f32) -> Self {
        Self {
            pos: Vec3::new(x, y, z),
            uv: Vec2::default(),
            color: Color::WHITE,
        }
    }

    pub fn with_uv(mut self, u: f32, v: f32) -> Self {
        self.uv = Vec2::new(u, v);
        self
    }
}

/// Three vertices in a fixed winding order plus an optional shared texture.
///
/// Winding is never corrected: it decides the sign of the face normal and
/// therefore whether the triangle survives back-face culling.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    pub texture: Option<Arc<Texture>>,
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
            texture: None,
        }
    }

    pub fn with_texture(v0: Vertex, v1: Vertex, v2: Vertex, texture: Arc<Texture>) -> Self {
        Self {
            vertices: [v0, v1, v2],
            texture: Some(texture),
        }
    }

    /// Camera-space area (half the cross product magnitude)
    pub fn area(&self) -> f32 {
        let [a, b, c] = &self.vertices;
        (b.pos - a.pos).cross(c.pos - a.pos).len() * 0.5
    }
}

/// Row-major packed `0xRRGGBB` texels.
///
/// Only the checked constructors can build one, so width and height are
/// always non-zero and match the texel count.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<u32>,
    name: String,
}

/// 10x10 palette used by the demo scene: hue bands fading left to right
const TEST_PATTERN: [u32; 100] = [
    0xFF8080, 0xFF6060, 0xFF4040, 0xFF2020, 0xFF0000, 0xD00000, 0xB00000, 0x900000, 0x700000, 0x500000,
    0xFFFF80, 0xFFE060, 0xFFC040, 0xFFA020, 0xFF8000, 0xD06000, 0xB04000, 0x902000, 0x700000, 0x500000,
    0xFFFF80, 0xFFFF60, 0xFFFF40, 0xFFFF20, 0xFFFF00, 0xD0D000, 0xB0B000, 0x909000, 0x707000, 0x505000,
    0x80FF80, 0x60FF60, 0x40FF40, 0x20FF20, 0x00FF00, 0x00D000, 0x00B000, 0x009000, 0x007000, 0x005000,
    0x8080FF, 0x6060FF, 0x4040FF, 0x2020FF, 0x0000FF, 0x0000D0, 0x0000B0, 0x000090, 0x000070, 0x000050,
    0xFF80FF, 0xE060FF, 0xC040FF, 0xA020FF, 0x8000FF, 0x6000D0, 0x4000B0, 0x200090, 0x000070, 0x000050,
    0xFFFFFF, 0xE0E0E0, 0xC0C0C0, 0xA0A0A0, 0x808080, 0x606060, 0x505050, 0x404040, 0x303030, 0x202020,
    0xFFFFFF, 0xE0E0E0, 0xC0C0C0, 0xA0A0A0, 0x808080, 0x606060, 0x505050, 0x404040, 0x303030, 0x202020,
    0xFFFFFF, 0xE0E0E0, 0xC0C0C0, 0xA0A0A0, 0x808080, 0x606060, 0x505050, 0x404040, 0x303030, 0x202020,
    0xFFFFFF, 0xE0E0E0, 0xC0C0C0, 0xA0A0A0, 0x808080, 0x606060, 0x505050, 0x404040, 0x303030, 0x202020,
];

/// Largest texel count a texture may hold (4096x4096)
pub const MAX_TEXELS: usize = 1 << 24;

/// Texel count for `width` x `height`, or `InvalidTexture` when either side is
/// zero or the product overflows or exceeds `MAX_TEXELS`
fn texel_count(width: usize, height: usize, texels: usize) -> Result<usize, RasterError> {
    match width.checked_mul(height) {
        Some(n) if width > 0 && height > 0 && n <= MAX_TEXELS => Ok(n),
        _ => Err(RasterError::InvalidTexture { width, height, texels }),
    }
}

impl Texture {
    pub fn new(width: usize, height: usize, texels: Vec<u32>) -> Result<Self, RasterError> {
        Self::named(width, height, texels, String::new())
    }

    pub fn named(width: usize, height: usize, texels: Vec<u32>, name: String) -> Result<Self, RasterError> {
        if texel_count(width, height, texels.len())? != texels.len() {
            return Err(RasterError::InvalidTexture {
                width,
                height,
                texels: texels.len(),
            });
        }
        Ok(Self { width, height, texels, name })
    }

    /// Built-in 10x10 test palette
    pub fn test_pattern() -> Self {
        Self {
            width: 10,
            height: 10,
            texels: TEST_PATTERN.to_vec(),
            name: "test_pattern".to_string(),
        }
    }

    /// Create a checkerboard test texture with 4x4 cells
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Result<Self, RasterError> {
        let mut texels = Vec::with_capacity(texel_count(width, height, 0)?);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                let color = if checker { color1 } else { color2 };
                texels.push(color.to_rgb_u32());
            }
        }
        Self::named(width, height, texels, "checkerboard".to_string())
    }

    /// Single-texel texture, handy for solid fills and tests
    pub fn solid(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            texels: vec![color.to_rgb_u32()],
            name: "solid".to_string(),
        }
    }

    /// Load texture from an image file (PNG, JPEG or BMP)
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, RasterError> {
        let path = path.as_ref();
        let img = image::open(path)?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let tex = Self::from_image(img, name)?;
        log::info!("Loaded texture: {} ({}x{})", tex.name, tex.width, tex.height);
        Ok(tex)
    }

    /// Load texture from raw encoded image bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self, RasterError> {
        let img = image::load_from_memory(bytes)?;
        Self::from_image(img, name)
    }

    fn from_image(img: image::DynamicImage, name: String) -> Result<Self, RasterError> {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        let texels: Vec<u32> = rgb
            .pixels()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | (p[2] as u32))
            .collect();

        Self::named(width as usize, height as usize, texels, name)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn texels(&self) -> &[u32] {
        &self.texels
    }

    /// Get texel at x,y (black outside the texture)
    pub fn get_texel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            Color::from_rgb_u32(self.texels[y * self.width + x])
        } else {
            Color::BLACK
        }
    }

    /// Nearest texel for u,v in [0,1]: each axis scales by (size - 1) and
    /// rounds. Out-of-range input lands on the border texel.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let tx = ((u * (self.width - 1) as f32).round() as usize).min(self.width - 1);
        let ty = ((v * (self.height - 1) as f32).round() as usize).min(self.height - 1);
        Color::from_rgb_u32(self.texels[ty * self.width + tx])
    }
}

/// Output of the projector: pixel position, fixed-point depth and the
/// vertex's u,v carried through unclamped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
    pub depth: u16,
    pub u: f32,
    pub v: f32,
}
