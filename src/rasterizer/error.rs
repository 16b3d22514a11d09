//! Error type for rasterizer setup and texture handling
//!
//! Nothing on the per-pixel path returns these: every check happens when a
//! texture or renderer is created.

/// Error type for texture creation, renderer setup and image I/O
#[derive(Debug)]
pub enum RasterError {
    /// Texture dimensions are zero or do not match the texel count
    InvalidTexture { width: usize, height: usize, texels: usize },
    /// Render configuration rejected at renderer creation
    InvalidConfig(String),
    ImageError(image::ImageError),
    IoError(std::io::Error),
}

impl From<image::ImageError> for RasterError {
    fn from(e: image::ImageError) -> Self {
        RasterError::ImageError(e)
    }
}

impl From<std::io::Error> for RasterError {
    fn from(e: std::io::Error) -> Self {
        RasterError::IoError(e)
    }
}

impl std::fmt::Display for RasterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterError::InvalidTexture { width, height, texels } => write!(
                f,
                "Invalid texture: {}x{} with {} texels",
                width, height, texels
            ),
            RasterError::InvalidConfig(msg) => write!(f, "Invalid render config: {}", msg),
            RasterError::ImageError(e) => write!(f, "Image error: {}", e),
            RasterError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for RasterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RasterError::ImageError(e) => Some(e),
            RasterError::IoError(e) => Some(e),
            _ => None,
        }
    }
}
