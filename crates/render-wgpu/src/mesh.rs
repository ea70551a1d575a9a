use std::collections::BTreeSet;
use std::f32::consts::TAU;

use backdrop_scene::ShapeKind;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct LineVertex {
    pub position: [f32; 3],
}

/// Indexed line list: every edge of the source triangles, once.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WireMesh {
    pub vertices: Vec<LineVertex>,
    pub indices: Vec<u16>,
}

impl WireMesh {
    fn from_triangles(positions: &[Vec3], triangles: &[[u16; 3]]) -> Self {
        let vertices = positions
            .iter()
            .map(|p| LineVertex {
                position: p.to_array(),
            })
            .collect();
        let indices = wire_edges(triangles)
            .into_iter()
            .flat_map(|[a, b]| [a, b])
            .collect();
        Self { vertices, indices }
    }

    /// Wire mesh for `kind`. Icosahedra are built at unit radius and scaled
    /// per instance.
    pub fn for_kind(kind: &ShapeKind) -> Self {
        match *kind {
            ShapeKind::Icosahedron { .. } => icosahedron(),
            ShapeKind::TorusKnot {
                radius,
                tube,
                tubular_segments,
                radial_segments,
                p,
                q,
            } => torus_knot(radius, tube, tubular_segments, radial_segments, p, q),
        }
    }

    pub fn edge_count(&self) -> usize {
        self.indices.len() / 2
    }
}

/// Unique undirected edges of a triangle list.
fn wire_edges(triangles: &[[u16; 3]]) -> Vec<[u16; 2]> {
    let mut edges = BTreeSet::new();
    for &[a, b, c] in triangles {
        for (u, v) in [(a, b), (b, c), (c, a)] {
            edges.insert([u.min(v), u.max(v)]);
        }
    }
    edges.into_iter().collect()
}

/// Detail-0 icosahedron on the unit sphere.
pub(crate) fn icosahedron() -> WireMesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    #[rustfmt::skip]
    let corners = [
        [-1.0,  t, 0.0], [ 1.0,  t, 0.0], [-1.0, -t, 0.0], [ 1.0, -t, 0.0],
        [0.0, -1.0,  t], [0.0,  1.0,  t], [0.0, -1.0, -t], [0.0,  1.0, -t],
        [ t, 0.0, -1.0], [ t, 0.0,  1.0], [-t, 0.0, -1.0], [-t, 0.0,  1.0],
    ];
    let positions: Vec<Vec3> = corners
        .iter()
        .map(|c| Vec3::from_array(*c).normalize())
        .collect();
    #[rustfmt::skip]
    let faces = [
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];
    WireMesh::from_triangles(&positions, &faces)
}

/// Point on the (p, q) knot's center curve at parameter `u`.
fn knot_curve(u: f32, p: f32, q: f32, radius: f32) -> Vec3 {
    let qu = q / p * u;
    let ring = radius * (2.0 + qu.cos()) * 0.5;
    Vec3::new(ring * u.cos(), ring * u.sin(), radius * qu.sin() * 0.5)
}

/// Tube of radius `tube` swept along a (p, q) torus knot.
pub(crate) fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> WireMesh {
    let (p, q) = (p.max(1) as f32, q as f32);
    let rings = tubular_segments.max(3);
    let sides = radial_segments.max(3);

    let mut positions = Vec::with_capacity(((rings + 1) * (sides + 1)) as usize);
    for i in 0..=rings {
        let u = i as f32 / rings as f32 * p * TAU;
        let here = knot_curve(u, p, q, radius);
        let ahead = knot_curve(u + 0.01, p, q, radius);

        // Frame around the curve: tangent, binormal, normal.
        let tangent = ahead - here;
        let binormal = tangent.cross(ahead + here).normalize();
        let normal = binormal.cross(tangent).normalize();

        for j in 0..=sides {
            let v = j as f32 / sides as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            positions.push(here + normal * cx + binormal * cy);
        }
    }

    let stride = (sides + 1) as u16;
    let mut triangles = Vec::with_capacity((rings * sides * 2) as usize);
    for j in 1..=rings as u16 {
        for i in 1..=sides as u16 {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            triangles.push([a, b, d]);
            triangles.push([b, c, d]);
        }
    }
    WireMesh::from_triangles(&positions, &triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(mesh: &WireMesh) -> impl Iterator<Item = Vec3> + '_ {
        mesh.vertices.iter().map(|v| Vec3::from_array(v.position))
    }

    #[test]
    fn icosahedron_has_thirty_edges() {
        let mesh = icosahedron();
        assert_eq!(mesh.vertices.len(), 12);
        assert_eq!(mesh.edge_count(), 30);
        for p in positions(&mesh) {
            assert!((p.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn icosahedron_vertices_have_five_neighbours() {
        let mesh = icosahedron();
        let mut degree = [0; 12];
        for &i in &mesh.indices {
            degree[i as usize] += 1;
        }
        assert!(degree.iter().all(|&d| d == 5));
    }

    #[test]
    fn torus_knot_grid_counts() {
        let mesh = WireMesh::for_kind(&ShapeKind::TORUS_KNOT);
        assert_eq!(mesh.vertices.len(), 101 * 17);
        // Edges along the tube, around the tube, and one diagonal per quad.
        assert_eq!(mesh.edge_count(), 101 * 16 + 100 * 17 + 100 * 16);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn torus_knot_stays_within_its_bounds() {
        let mesh = WireMesh::for_kind(&ShapeKind::TORUS_KNOT);
        // Curve reaches at most 1.5 * radius from the axis, plus the tube.
        let bound = 1.5 * 0.4 + 0.12 + 1e-4;
        for p in positions(&mesh) {
            assert!(p.is_finite());
            assert!(p.length() <= bound, "{p:?} outside {bound}");
        }
    }

    #[test]
    fn icosahedron_kind_ignores_radius() {
        let a = WireMesh::for_kind(&ShapeKind::icosahedron(0.0));
        let b = WireMesh::for_kind(&ShapeKind::icosahedron(1.0));
        assert_eq!(a, b);
    }
}
