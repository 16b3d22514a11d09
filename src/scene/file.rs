//! Scene loading
//!
//! Uses RON for human-readable scene files. Colors and textures are declared
//! once and referenced by index from triangle vertices, so several
//! triangles share one texture allocation.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::object::{Scene, SceneObject};
use crate::rasterizer::{Color, RasterError, Texture, Triangle, Vec2, Vec3, Vertex};

fn opaque() -> u8 {
    255
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorDef {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

/// Where a texture comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TextureDef {
    /// Built-in 10x10 palette
    TestPattern,
    /// Checkerboard of two scene colors (by index)
    Checkerboard { width: usize, height: usize, color1: usize, color2: usize },
    /// One-texel texture of a scene color
    Solid(usize),
    /// Image file, relative to the scene file's directory
    File(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexDef {
    pub pos: Vec3,
    #[serde(default)]
    pub uv: Vec2,
    /// Index into `SceneFile::colors`
    pub color: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleDef {
    pub vertices: [VertexDef; 3],
    /// Index into `SceneFile::textures`; untextured when absent
    #[serde(default)]
    pub texture: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDef {
    pub name: String,
    #[serde(default)]
    pub origin: Vec3,
    pub triangles: Vec<TriangleDef>,
}

/// On-disk scene description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub colors: Vec<ColorDef>,
    #[serde(default)]
    pub textures: Vec<TextureDef>,
    #[serde(default)]
    pub objects: Vec<ObjectDef>,
}

/// Error type for scene loading
#[derive(Debug)]
pub enum SceneError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    BadColorIndex { index: usize, count: usize },
    BadTextureIndex { index: usize, count: usize },
    TextureError(RasterError),
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::ParseError(e)
    }
}

impl From<RasterError> for SceneError {
    fn from(e: RasterError) -> Self {
        SceneError::TextureError(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::IoError(e) => write!(f, "IO error: {}", e),
            SceneError::ParseError(e) => write!(f, "Parse error: {}", e),
            SceneError::BadColorIndex { index, count } => {
                write!(f, "Color index {} out of range ({} colors)", index, count)
            }
            SceneError::BadTextureIndex { index, count } => {
                write!(f, "Texture index {} out of range ({} textures)", index, count)
            }
            SceneError::TextureError(e) => write!(f, "Texture error: {}", e),
        }
    }
}

impl std::error::Error for SceneError {}

impl SceneFile {
    /// Resolve indices and load textures. Relative texture paths resolve
    /// against `base_dir`.
    pub fn build(&self, base_dir: &Path) -> Result<Scene, SceneError> {
        let colors: Vec<Color> = self
            .colors
            .iter()
            .map(|c| Color::with_alpha(c.r, c.g, c.b, c.a))
            .collect();

        let color_at = |index: usize| {
            colors
                .get(index)
                .copied()
                .ok_or(SceneError::BadColorIndex { index, count: colors.len() })
        };

        let mut textures = Vec::with_capacity(self.textures.len());
        for def in &self.textures {
            let tex = match def {
                TextureDef::TestPattern => Texture::test_pattern(),
                TextureDef::Checkerboard { width, height, color1, color2 } => {
                    Texture::checkerboard(*width, *height, color_at(*color1)?, color_at(*color2)?)?
                }
                TextureDef::Solid(color) => Texture::solid(color_at(*color)?),
                TextureDef::File(rel) => Texture::from_file(base_dir.join(rel))?,
            };
            textures.push(Arc::new(tex));
        }

        let mut scene = Scene::new();
        for obj in &self.objects {
            let mut object = SceneObject::new(obj.name.clone());
            object.origin = obj.origin;

            for tri in &obj.triangles {
                let [a, b, c] = &tri.vertices;
                let vertex = |v: &VertexDef| -> Result<Vertex, SceneError> {
                    Ok(Vertex::new(v.pos, v.uv, color_at(v.color)?))
                };
                let mut triangle = Triangle::new(vertex(a)?, vertex(b)?, vertex(c)?);

                if let Some(index) = tri.texture {
                    let tex = textures
                        .get(index)
                        .ok_or(SceneError::BadTextureIndex { index, count: textures.len() })?;
                    triangle.texture = Some(Arc::clone(tex));
                }
                object.push(triangle);
            }
            scene.add(object);
        }

        Ok(scene)
    }
}

/// Load a scene from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let scene = load_scene_from_str(&contents, base_dir)?;
    if scene.triangle_count() == 0 {
        log::warn!("Scene {} has no triangles", path.display());
    }

    log::info!(
        "Loaded scene {}: {} objects, {} triangles",
        path.display(),
        scene.objects.len(),
        scene.triangle_count()
    );
    Ok(scene)
}

/// Load a scene from a RON string (for embedded scenes or testing)
pub fn load_scene_from_str(s: &str, base_dir: &Path) -> Result<Scene, SceneError> {
    let file: SceneFile = ron::from_str(s)?;
    file.build(base_dir)
}
