// End-to-end checks of the clip -> project -> rasterize pipeline at the
// default 640x480 viewport (fov 50, near 0.1, far 20).

use std::sync::Arc;

use lester::config::RenderConfig;
use lester::rasterizer::{
    clip_against_planes, clip_triangle, encode_depth, focal_length, ClipPlane, Clipped, Color,
    Framebuffer, PixelSink, Renderer, Texture, Triangle, Vec3, Vertex, DEPTH_EMPTY,
};
use lester::scene::{demo_scene, QUAD};

fn renderer() -> Renderer {
    Renderer::new(RenderConfig::default()).unwrap()
}

fn framebuffer() -> Framebuffer {
    let mut fb = Framebuffer::new(640, 480);
    fb.clear(Color::BLACK);
    fb
}

/// Pixels with a depth written this frame
fn coverage(renderer: &Renderer) -> Vec<(usize, usize)> {
    let db = renderer.depth_buffer();
    let mut out = Vec::new();
    for y in 0..db.height() {
        for x in 0..db.width() {
            if db.get(x, y) != Some(DEPTH_EMPTY) {
                out.push((x, y));
            }
        }
    }
    out
}

fn signed_area(poly: &[(f32, f32)]) -> f32 {
    let mut sum = 0.0;
    for i in 0..poly.len() {
        let (x0, y0) = poly[i];
        let (x1, y1) = poly[(i + 1) % poly.len()];
        sum += x0 * y1 - x1 * y0;
    }
    sum * 0.5
}

/// True when `p` is at least `margin` pixels inside every edge of the
/// convex polygon. A negative margin is a tolerance outside the edges.
fn inside_convex(poly: &[(f32, f32)], p: (f32, f32), margin: f32) -> bool {
    let sign = signed_area(poly).signum();
    (0..poly.len()).all(|i| {
        let a = poly[i];
        let b = poly[(i + 1) % poly.len()];
        let (ex, ey) = (b.0 - a.0, b.1 - a.1);
        let len = (ex * ex + ey * ey).sqrt();
        let d = sign * (ex * (p.1 - a.1) - ey * (p.0 - a.0)) / len;
        d >= margin
    })
}

fn screen_polygon(renderer: &Renderer, camera: &[Vec3]) -> Vec<(f32, f32)> {
    camera
        .iter()
        .map(|&pos| {
            let p = renderer.projector().project(&Vertex { pos, ..Vertex::default() });
            (p.x as f32, p.y as f32)
        })
        .collect()
}

/// Check rasterized coverage against a convex screen polygon: nothing more
/// than a pixel and a half outside, and every pixel well inside covered
fn assert_footprint(renderer: &Renderer, poly: &[(f32, f32)]) {
    let covered = coverage(renderer);
    assert!(!covered.is_empty(), "nothing rasterized");

    for &(x, y) in &covered {
        assert!(
            inside_convex(poly, (x as f32, y as f32), -1.5),
            "pixel ({}, {}) outside footprint {:?}",
            x,
            y,
            poly
        );
    }

    let db = renderer.depth_buffer();
    let mut interior = 0;
    for y in 0..db.height() {
        for x in 0..db.width() {
            if inside_convex(poly, (x as f32, y as f32), 2.0) {
                interior += 1;
                assert_ne!(db.get(x, y), Some(DEPTH_EMPTY), "interior hole at ({}, {})", x, y);
            }
        }
    }
    assert!(interior > 0, "footprint has no interior");
}

// Sutherland-Hodgman against one z plane
fn clip_polygon(poly: &[Vec3], plane: ClipPlane) -> Vec<Vec3> {
    let mut out = Vec::new();
    for i in 0..poly.len() {
        let cur = poly[i];
        let next = poly[(i + 1) % poly.len()];
        let cur_in = !plane.is_outside(cur.z);
        let next_in = !plane.is_outside(next.z);
        if cur_in {
            out.push(cur);
        }
        if cur_in != next_in {
            let t = (plane.threshold - cur.z) / (next.z - cur.z);
            let mut p = cur.lerp(next, t);
            p.z = plane.threshold;
            out.push(p);
        }
    }
    out
}

fn polygon_area(poly: &[Vec3]) -> f32 {
    let mut n = Vec3::ZERO;
    for i in 0..poly.len() {
        n = n + poly[i].cross(poly[(i + 1) % poly.len()]);
    }
    n.len() * 0.5
}

fn positions(tri: &Triangle) -> Vec<Vec3> {
    tri.vertices.iter().map(|v| v.pos).collect()
}

#[test]
fn test_projection_matches_closed_form() {
    let renderer = renderer();
    let scene = demo_scene();
    let quad = scene.object(scene.find(QUAD).unwrap()).unwrap();
    let f = focal_length(50.0);

    for v in &quad.triangles[0].vertices {
        let p = renderer.projector().project(v);
        let s = f / v.pos.z;
        assert_eq!(p.x, ((640.0 + v.pos.x * s * 480.0) / 2.0) as i32);
        assert_eq!(p.y, ((480.0 - v.pos.y * s * 480.0) / 2.0) as i32);
        assert_eq!(p.depth, (v.pos.z * 65535.0 / 20.0) as u16);
        assert_eq!((p.u, p.v), (v.uv.x, v.uv.y));
    }
}

#[test]
fn test_coverage_matches_projected_footprint() {
    let mut renderer = renderer();
    let mut fb = framebuffer();
    let scene = demo_scene();
    let quad = scene.object(scene.find(QUAD).unwrap()).unwrap();
    let tri = &quad.triangles[0];

    let stats = renderer.render([tri], &mut fb);
    assert_eq!(stats.rasterized, 1);
    assert_eq!(stats.pixels_written, coverage(&renderer).len());

    let poly = screen_polygon(&renderer, &positions(tri));
    assert_footprint(&renderer, &poly);
}

#[test]
fn test_nearer_texel_wins_in_either_order() {
    let red = Color::new(255, 0, 0);
    let blue = Color::new(0, 0, 255);

    // Same screen footprint: the far copy is twice the size at twice the depth
    let tri_at = |z: f32, color: Color| {
        Triangle::with_texture(
            Vertex::from_pos(-0.3 * z, 0.3 * z, z),
            Vertex::from_pos(0.3 * z, -0.3 * z, z),
            Vertex::from_pos(-0.3 * z, -0.3 * z, z),
            Arc::new(Texture::solid(color)),
        )
    };
    let near = tri_at(1.0, red);
    let far = tri_at(2.0, blue);

    for order in [[&near, &far], [&far, &near]] {
        let mut renderer = renderer();
        let mut fb = framebuffer();
        renderer.render(order, &mut fb);

        let projector = renderer.projector();
        let s = projector.scale(1.0);
        let cx = projector.to_screen_x(-0.1 * s) as usize;
        let cy = projector.to_screen_y(-0.1 * s) as usize;

        assert_eq!(fb.get_pixel(cx, cy), Some(red));
        let depth = renderer.depth_buffer().get(cx, cy).unwrap();
        assert!(depth.abs_diff(encode_depth(1.0, 20.0)) <= 1);
    }
}

#[test]
fn test_vertex_behind_near_plane_splits_in_two() {
    let tri = Triangle::new(
        Vertex::from_pos(0.5, 0.5, 1.0),
        Vertex::from_pos(0.5, -0.5, 1.0),
        Vertex::from_pos(-0.5, -0.5, -0.5),
    );
    let near = ClipPlane::near(0.1);

    let pieces = clip_triangle(&tri, near);
    assert!(matches!(pieces, Clipped::Two(_, _)));

    let mut renderer = renderer();
    let mut fb = framebuffer();
    let stats = renderer.render([&tri], &mut fb);
    assert_eq!(stats.clip_pieces, 2);
    assert_eq!(stats.culled, 0);
    assert_eq!(stats.rasterized, 2);

    let clipped = clip_polygon(&positions(&tri), near);
    assert_eq!(clipped.len(), 4);
    let poly = screen_polygon(&renderer, &clipped);
    assert_footprint(&renderer, &poly);
}

#[test]
fn test_piece_areas_sum_to_clipped_polygon() {
    let planes = [ClipPlane::near(0.1), ClipPlane::far(20.0)];
    let cases = [
        // one vertex past near
        [(0.5, 0.5, 1.0), (0.5, -0.5, 3.0), (-0.5, -0.5, -2.0)],
        // two vertices past near
        [(0.5, 0.5, -1.0), (0.5, -0.5, 4.0), (-0.5, -0.5, -0.5)],
        // one vertex past far
        [(1.0, 1.0, 10.0), (1.0, -1.0, 25.0), (-1.0, -1.0, 12.0)],
        // straddles both planes
        [(-2.0, -1.0, -1.0), (-2.0, -1.0, 30.0), (2.0, -1.0, 30.0)],
    ];

    for case in cases {
        let tri = Triangle::new(
            Vertex::from_pos(case[0].0, case[0].1, case[0].2),
            Vertex::from_pos(case[1].0, case[1].1, case[1].2),
            Vertex::from_pos(case[2].0, case[2].1, case[2].2),
        );

        let pieces = clip_against_planes(&tri, &planes);
        assert!(!pieces.is_empty() && pieces.len() <= 4);
        let piece_area: f32 = pieces.iter().map(Triangle::area).sum();

        let mut poly = positions(&tri);
        for plane in planes {
            poly = clip_polygon(&poly, plane);
        }
        let expected = polygon_area(&poly);

        assert!(
            (piece_area - expected).abs() <= expected * 1e-4,
            "{:?}: pieces {} vs polygon {}",
            case,
            piece_area,
            expected
        );
        for piece in &pieces {
            assert!(piece.vertices.iter().all(|v| v.pos.z >= 0.1 && v.pos.z <= 20.0));
        }
    }
}

#[test]
fn test_back_facing_triangle_writes_nothing() {
    let tri = Triangle::new(
        Vertex::from_pos(0.5, -0.5, 1.0),
        Vertex::from_pos(0.5, 0.5, 1.0),
        Vertex::from_pos(-0.5, -0.5, 1.0),
    );

    let mut renderer = renderer();
    let mut fb = framebuffer();
    let stats = renderer.render([&tri], &mut fb);

    assert_eq!(stats.culled, 1);
    assert_eq!(stats.pixels_written, 0);
    assert_eq!(fb.count_not(Color::BLACK), 0);
    assert!(coverage(&renderer).is_empty());
}

/// Sink that only records where it was written
struct Recorder {
    width: usize,
    height: usize,
    writes: Vec<(usize, usize)>,
}

impl PixelSink for Recorder {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn put_pixel(&mut self, x: usize, y: usize, _color: Color) {
        self.writes.push((x, y));
    }
}

#[test]
fn test_accepted_depth_writes_strictly_decrease() {
    let config = RenderConfig { width: 64, height: 48, ..RenderConfig::default() };
    let mut renderer = Renderer::new(config).unwrap();
    let mut sink = Recorder { width: 64, height: 48, writes: Vec::new() };

    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut rand = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 40) as f32 / (1u64 << 24) as f32
    };

    renderer.begin_frame();
    let mut accepted = 0;
    for _ in 0..300 {
        let x = rand() - 0.6;
        let y = rand() - 0.6;
        let h = 0.1 + rand() * 0.5;
        let tri = Triangle::new(
            Vertex::from_pos(x, y + h, 0.5 + rand() * 15.0),
            Vertex::from_pos(x + h, y, 0.5 + rand() * 15.0),
            Vertex::from_pos(x, y, 0.5 + rand() * 15.0),
        );

        let before = renderer.depth_buffer().as_slice().to_vec();
        sink.writes.clear();
        renderer.draw_triangle(&tri, &mut sink);
        let after = renderer.depth_buffer().as_slice();

        for (old, new) in before.iter().zip(after) {
            assert!(new <= old);
        }
        for &(x, y) in &sink.writes {
            let idx = y * 64 + x;
            assert!(after[idx] < before[idx], "write at ({}, {}) did not get nearer", x, y);
        }
        accepted += sink.writes.len();
    }
    assert!(accepted > 0);
    assert_eq!(renderer.stats().pixels_written, accepted);
}

#[test]
fn test_demo_scene_frame() {
    let mut renderer = renderer();
    let mut fb = framebuffer();
    let scene = demo_scene();

    let stats = renderer.render(scene.triangles(), &mut fb);
    assert_eq!(stats.submitted, 4);
    assert_eq!(stats.clipped_away, 0);
    // The floor is cut by both planes
    assert!(stats.clip_pieces > stats.submitted);
    assert_eq!(stats.culled, 0);
    assert_eq!(fb.count_not(Color::BLACK), coverage(&renderer).len());

    // Rendering again clears the depth buffer first
    let again = renderer.render(scene.triangles(), &mut fb);
    assert_eq!(again, stats);
}
