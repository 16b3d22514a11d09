//! Scene objects: owned, contiguous triangle lists with rigid transforms

use crate::rasterizer::{rotate_x, rotate_y, rotate_z, Triangle, Vec3};

/// A named group of camera-space triangles with a tracked origin.
///
/// Transforms mutate the triangles in place. "Global" rotations pivot on the
/// camera origin; "local" ones pivot on the object's own origin.
#[derive(Debug, Clone, Default)]
pub struct SceneObject {
    pub name: String,
    pub origin: Vec3,
    pub triangles: Vec<Triangle>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: Vec3::ZERO,
            triangles: Vec::new(),
        }
    }

    pub fn with_triangles(name: impl Into<String>, triangles: Vec<Triangle>) -> Self {
        Self {
            name: name.into(),
            origin: Vec3::ZERO,
            triangles,
        }
    }

    pub fn push(&mut self, tri: Triangle) -> usize {
        self.triangles.push(tri);
        self.triangles.len() - 1
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.origin = self.origin + offset;
        self.map_positions(|p| p + offset);
    }

    pub fn rotate_x_global(&mut self, degrees: f32) {
        let r = degrees.to_radians();
        self.map_positions(|p| rotate_x(p, r));
    }

    pub fn rotate_y_global(&mut self, degrees: f32) {
        let r = degrees.to_radians();
        self.map_positions(|p| rotate_y(p, r));
    }

    pub fn rotate_z_global(&mut self, degrees: f32) {
        let r = degrees.to_radians();
        self.map_positions(|p| rotate_z(p, r));
    }

    pub fn rotate_x_local(&mut self, degrees: f32) {
        let r = degrees.to_radians();
        let o = self.origin;
        self.map_positions(|p| rotate_x(p - o, r) + o);
    }

    pub fn rotate_y_local(&mut self, degrees: f32) {
        let r = degrees.to_radians();
        let o = self.origin;
        self.map_positions(|p| rotate_y(p - o, r) + o);
    }

    pub fn rotate_z_local(&mut self, degrees: f32) {
        let r = degrees.to_radians();
        let o = self.origin;
        self.map_positions(|p| rotate_z(p - o, r) + o);
    }

    fn map_positions(&mut self, f: impl Fn(Vec3) -> Vec3) {
        for tri in &mut self.triangles {
            for v in &mut tri.vertices {
                v.pos = f(v.pos);
            }
        }
    }
}

/// Ordered collection of objects; render order is object order, then
/// triangle order within each object
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its index
    pub fn add(&mut self, object: SceneObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn object(&self, idx: usize) -> Option<&SceneObject> {
        self.objects.get(idx)
    }

    pub fn object_mut(&mut self, idx: usize) -> Option<&mut SceneObject> {
        self.objects.get_mut(idx)
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.objects.iter().position(|o| o.name == name)
    }

    pub fn triangles(&self) -> impl Iterator<Item = &Triangle> {
        self.objects.iter().flat_map(|o| o.triangles.iter())
    }

    pub fn triangle_count(&self) -> usize {
        self.objects.iter().map(|o| o.triangles.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Vertex;

    fn unit_tri() -> Triangle {
        Triangle::new(
            Vertex::from_pos(1.0, 0.0, 0.0),
            Vertex::from_pos(0.0, 1.0, 0.0),
            Vertex::from_pos(0.0, 0.0, 1.0),
        )
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).len() < 1e-5
    }

    #[test]
    fn test_translate_moves_vertices_and_origin() {
        let mut obj = SceneObject::with_triangles("t", vec![unit_tri()]);
        obj.translate(Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(obj.origin, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(obj.triangles[0].vertices[0].pos, Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_local_rotation_pivots_on_origin() {
        let mut obj = SceneObject::with_triangles("t", vec![unit_tri()]);
        obj.translate(Vec3::new(0.0, 0.0, 5.0));
        obj.rotate_y_local(90.0);
        // (1, 0, 0) relative to the origin turns to (0, 0, -1)
        assert!(close(obj.triangles[0].vertices[0].pos, Vec3::new(0.0, 0.0, 4.0)));
        assert_eq!(obj.origin, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_global_rotation_pivots_on_camera() {
        let mut obj = SceneObject::with_triangles("t", vec![unit_tri()]);
        obj.translate(Vec3::new(0.0, 0.0, 5.0));
        obj.rotate_z_global(180.0);
        assert!(close(obj.triangles[0].vertices[0].pos, Vec3::new(-1.0, 0.0, 5.0)));
        obj.rotate_x_global(90.0);
        assert!(close(obj.triangles[0].vertices[0].pos, Vec3::new(-1.0, -5.0, 0.0)));
    }

    #[test]
    fn test_full_turn_is_identity() {
        let mut obj = SceneObject::with_triangles("t", vec![unit_tri()]);
        obj.translate(Vec3::new(1.0, 2.0, 3.0));
        let before = obj.triangles[0].clone();
        for _ in 0..4 {
            obj.rotate_x_local(90.0);
        }
        for (a, b) in before.vertices.iter().zip(&obj.triangles[0].vertices) {
            assert!(close(a.pos, b.pos));
        }
    }

    #[test]
    fn test_scene_iterates_in_order() {
        let mut scene = Scene::new();
        let mut a = SceneObject::new("a");
        a.push(unit_tri());
        let mut b = SceneObject::new("b");
        b.push(unit_tri());
        b.push(unit_tri());
        scene.add(a);
        let idx = scene.add(b);

        assert_eq!(scene.triangle_count(), 3);
        assert_eq!(scene.triangles().count(), 3);
        assert_eq!(scene.find("b"), Some(idx));
        assert!(scene.object(5).is_none());
    }
}
