//! Half-space clipping against the near and far z planes
//!
//! A triangle against one plane yields 0, 1 or 2 triangles on the kept side.
//! Split vertices are placed exactly on the plane with x, y, u, v
//! interpolated along the crossed edge. Slot order is preserved so the
//! winding (and therefore the face normal) of every piece matches the
//! source triangle.

use super::types::{Triangle, Vertex};

/// Which side of the threshold survives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keep {
    /// z >= threshold (near plane)
    Beyond,
    /// z <= threshold (far plane)
    Within,
}

/// Axis-aligned clip plane on z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlane {
    pub threshold: f32,
    pub keep: Keep,
}

impl ClipPlane {
    pub fn near(z: f32) -> Self {
        Self { threshold: z, keep: Keep::Beyond }
    }

    pub fn far(z: f32) -> Self {
        Self { threshold: z, keep: Keep::Within }
    }

    /// True when `z` is on the discarded side
    pub fn is_outside(&self, z: f32) -> bool {
        match self.keep {
            Keep::Beyond => z < self.threshold,
            Keep::Within => z > self.threshold,
        }
    }

    /// Point where the edge `inside -> outside` meets the plane.
    ///
    /// The new vertex copies its color from `color_from`; colors are never
    /// interpolated. A flat edge can't straddle the plane; if one arrives
    /// anyway the inside vertex is returned rather than dividing by zero.
    pub fn crossing(&self, inside: &Vertex, outside: &Vertex, color_from: &Vertex) -> Vertex {
        let dz = outside.pos.z - inside.pos.z;
        let t = (self.threshold - inside.pos.z) / dz;
        if dz == 0.0 || !t.is_finite() {
            return Vertex { color: color_from.color, ..*inside };
        }

        let mut pos = inside.pos.lerp(outside.pos, t);
        pos.z = self.threshold;

        Vertex {
            pos,
            uv: inside.uv.lerp(outside.uv, t),
            color: color_from.color,
        }
    }
}

/// Result of clipping one triangle against one plane
#[derive(Debug, Clone, PartialEq)]
pub enum Clipped {
    /// All three vertices outside
    Discarded,
    /// No vertex outside; the input passes through untouched
    Whole(Triangle),
    /// Two vertices outside
    One(Triangle),
    /// One vertex outside: the kept quad as two triangles
    Two(Triangle, Triangle),
}

impl Clipped {
    pub fn len(&self) -> usize {
        match self {
            Clipped::Discarded => 0,
            Clipped::Whole(_) | Clipped::One(_) => 1,
            Clipped::Two(_, _) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Clipped::Discarded)
    }

    /// True if the plane cut the triangle
    pub fn was_split(&self) -> bool {
        matches!(self, Clipped::One(_) | Clipped::Two(_, _))
    }

    pub fn into_vec(self) -> Vec<Triangle> {
        match self {
            Clipped::Discarded => Vec::new(),
            Clipped::Whole(t) | Clipped::One(t) => vec![t],
            Clipped::Two(a, b) => vec![a, b],
        }
    }
}

/// Clip `tri` against a single plane
pub fn clip_triangle(tri: &Triangle, plane: ClipPlane) -> Clipped {
    let v = &tri.vertices;
    let out = [
        plane.is_outside(v[0].pos.z),
        plane.is_outside(v[1].pos.z),
        plane.is_outside(v[2].pos.z),
    ];

    match out.iter().filter(|&&o| o).count() {
        0 => Clipped::Whole(tri.clone()),
        1 => {
            let (o, [f0, f1]) = split_slots(out, true);
            let n0 = plane.crossing(&v[f0], &v[o], &v[f0]);
            let n1 = plane.crossing(&v[f1], &v[o], &v[f1]);

            let mut first = tri.clone();
            first.vertices[o] = n0;

            let mut second = tri.clone();
            second.vertices[o] = n1;
            second.vertices[f0] = n0;

            Clipped::Two(first, second)
        }
        2 => {
            let (i, [f0, f1]) = split_slots(out, false);
            let n0 = plane.crossing(&v[i], &v[f0], &v[f0]);
            let n1 = plane.crossing(&v[i], &v[f1], &v[f1]);

            let mut kept = tri.clone();
            kept.vertices[f0] = n0;
            kept.vertices[f1] = n1;

            Clipped::One(kept)
        }
        _ => Clipped::Discarded,
    }
}

/// Slot of the lone vertex whose outside flag equals `lone_outside`, and the
/// other two slots in ascending order
fn split_slots(out: [bool; 3], lone_outside: bool) -> (usize, [usize; 2]) {
    let lone = out.iter().position(|&o| o == lone_outside).unwrap_or(0);
    let others = match lone {
        0 => [1, 2],
        1 => [0, 2],
        _ => [0, 1],
    };
    (lone, others)
}

/// Clip against every plane in order using an explicit worklist.
///
/// Pieces are emitted depth-first in the order a recursive
/// clip-then-draw would visit them. With two planes a source triangle fans
/// out to at most four pieces.
pub fn clip_against_planes(tri: &Triangle, planes: &[ClipPlane]) -> Vec<Triangle> {
    let mut out = Vec::new();
    clip_against_planes_into(tri, planes, &mut Vec::new(), &mut out);
    out
}

/// Pending pieces and the index of the next plane each one meets
pub type ClipWorklist = Vec<(Triangle, usize)>;

/// `clip_against_planes` into caller-owned buffers, so a renderer can keep
/// them between triangles. Both buffers are cleared first.
pub fn clip_against_planes_into(
    tri: &Triangle,
    planes: &[ClipPlane],
    work: &mut ClipWorklist,
    out: &mut Vec<Triangle>,
) {
    out.clear();
    work.clear();
    work.push((tri.clone(), 0));

    while let Some((piece, plane_idx)) = work.pop() {
        let Some(&plane) = planes.get(plane_idx) else {
            out.push(piece);
            continue;
        };

        match clip_triangle(&piece, plane) {
            Clipped::Discarded => {}
            Clipped::Whole(t) | Clipped::One(t) => work.push((t, plane_idx + 1)),
            Clipped::Two(a, b) => {
                // Stack: push second first so the first piece is finished first
                work.push((b, plane_idx + 1));
                work.push((a, plane_idx + 1));
            }
        }
    }
}
