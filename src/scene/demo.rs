//! Built-in demo scene
//!
//! A textured quad one unit in front of the camera whose left-hand corners
//! drift back and forth in depth, and an untextured floor long enough to be
//! cut by both the near and the far plane.

use std::sync::Arc;

use super::object::{Scene, SceneObject};
use crate::rasterizer::{Color, Texture, Triangle, Vec2, Vec3, Vertex};

pub const QUAD: &str = "quad";
pub const FLOOR: &str = "floor";

fn vertex(x: f32, y: f32, z: f32, u: f32, v: f32, color: Color) -> Vertex {
    Vertex::new(Vec3::new(x, y, z), Vec2::new(u, v), color)
}

pub fn demo_scene() -> Scene {
    let tint = Color::new(50, 200, 255);
    let tex = Arc::new(Texture::test_pattern());

    let quad = SceneObject::with_triangles(
        QUAD,
        vec![
            Triangle::with_texture(
                vertex(0.5, 0.5, 1.0, 1.0, 0.0, tint),
                vertex(0.5, -0.5, 1.0, 1.0, 1.0, tint),
                vertex(-0.5, -0.5, 1.0, 0.0, 1.0, tint),
                tex.clone(),
            ),
            Triangle::with_texture(
                vertex(-0.5, 0.5, 1.0, 0.0, 0.0, tint),
                vertex(0.5, 0.5, 1.0, 1.0, 0.0, tint),
                vertex(-0.5, -0.5, 1.0, 0.0, 1.0, tint),
                tex,
            ),
        ],
    );

    let gray = Color::new(160, 160, 160);
    let floor = SceneObject::with_triangles(
        FLOOR,
        vec![
            Triangle::new(
                vertex(-2.0, -1.0, -1.0, 0.0, 0.0, gray),
                vertex(-2.0, -1.0, 30.0, 0.0, 0.0, gray),
                vertex(2.0, -1.0, 30.0, 0.0, 0.0, gray),
            ),
            Triangle::new(
                vertex(-2.0, -1.0, -1.0, 0.0, 0.0, gray),
                vertex(2.0, -1.0, 30.0, 0.0, 0.0, gray),
                vertex(2.0, -1.0, -1.0, 0.0, 0.0, gray),
            ),
        ],
    );

    let mut scene = Scene::new();
    scene.add(floor);
    scene.add(quad);
    scene
}

/// Ping-pong depth animation for the demo quad's left-hand corners
#[derive(Debug, Clone, Copy)]
pub struct DemoAnimation {
    /// Accumulated offset, kept within [0, 1]
    pub offset: f32,
    pub step: f32,
}

impl Default for DemoAnimation {
    fn default() -> Self {
        Self { offset: 0.0, step: 0.01 }
    }
}

impl DemoAnimation {
    pub fn new(step: f32) -> Self {
        Self { offset: 0.0, step }
    }

    /// Advance one frame. Bottom-left is shared by both triangles; top-left
    /// belongs to the second only.
    pub fn advance(&mut self, scene: &mut Scene) {
        let Some(quad) = scene.find(QUAD).and_then(|i| scene.object_mut(i)) else {
            return;
        };

        let step = self.step;
        if let Some(tri) = quad.triangles.get_mut(0) {
            tri.vertices[2].pos.z += step;
        }
        if let Some(tri) = quad.triangles.get_mut(1) {
            tri.vertices[0].pos.z += step;
            tri.vertices[2].pos.z += step;
        }

        self.offset += step;
        if (self.step < 0.0 && self.offset <= 0.0) || (self.step > 0.0 && self.offset >= 1.0) {
            self.step = -self.step;
        }
    }
}
