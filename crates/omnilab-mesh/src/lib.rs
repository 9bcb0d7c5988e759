#![warn(missing_docs)]

//! Triangle meshes and procedural primitive generators for omnilab.
//!
//! Assemblies are built from display meshes, not solids: each generator
//! samples a parametric surface into a grid of vertices with analytic
//! normals and stitches the grid into triangles. Primitives follow CAD
//! axis conventions — cylinders and tori are aligned with the Z axis and
//! recipes orient them with node transforms.

use omnilab_math::{Point3, Vec3};
use std::f64::consts::PI;

/// Output triangle mesh for rendering and export.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
    /// Flat array of vertex normals: `[nx0, ny0, nz0, ...]` (f32). Same length as vertices.
    pub normals: Vec<f32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Axis-aligned bounding box as `(min, max)`. `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        if self.vertices.is_empty() {
            return None;
        }
        let mut min = Point3::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point3::new(f64::MIN, f64::MIN, f64::MIN);
        for chunk in self.vertices.chunks_exact(3) {
            let (x, y, z) = (chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        }
        Some((min, max))
    }

    fn push_vertex(&mut self, p: Point3, n: Vec3) {
        self.vertices.push(p.x as f32);
        self.vertices.push(p.y as f32);
        self.vertices.push(p.z as f32);
        self.normals.push(n.x as f32);
        self.normals.push(n.y as f32);
        self.normals.push(n.z as f32);
    }

    /// Stitch a `(rows+1) x (cols+1)` vertex grid (row-major, already pushed)
    /// into quads split as two triangles each, starting at `base`.
    fn stitch_grid(&mut self, base: u32, rows: usize, cols: usize) {
        let stride = (cols + 1) as u32;
        for j in 0..rows {
            for i in 0..cols {
                let bl = base + j as u32 * stride + i as u32;
                let br = bl + 1;
                let tl = bl + stride;
                let tr = tl + 1;
                self.indices.extend_from_slice(&[bl, br, tl, br, tr, tl]);
            }
        }
    }
}

/// Build a torus in the XY plane, centered at origin, hole along Z.
///
/// `major_radius` is the distance from the origin to the tube center,
/// `tube_radius` the radius of the tube cross-section.
pub fn torus(
    major_radius: f64,
    tube_radius: f64,
    radial_segments: u32,
    tubular_segments: u32,
) -> TriangleMesh {
    let n_u = tubular_segments.max(3) as usize;
    let n_v = radial_segments.max(3) as usize;
    let mut mesh = TriangleMesh::new();

    // Seam vertices are duplicated at u = 2*pi and v = 2*pi.
    for j in 0..=n_v {
        let v = j as f64 / n_v as f64 * 2.0 * PI;
        let (sv, cv) = v.sin_cos();
        for i in 0..=n_u {
            let u = i as f64 / n_u as f64 * 2.0 * PI;
            let (su, cu) = u.sin_cos();
            let p = Point3::new(
                (major_radius + tube_radius * cv) * cu,
                (major_radius + tube_radius * cv) * su,
                tube_radius * sv,
            );
            let n = Vec3::new(cv * cu, cv * su, sv);
            mesh.push_vertex(p, n);
        }
    }
    mesh.stitch_grid(0, n_v, n_u);
    mesh
}

/// Build a cylinder along the Z axis, centered at origin, with end caps.
pub fn cylinder(radius: f64, height: f64, segments: u32) -> TriangleMesh {
    let n = segments.max(3) as usize;
    let half = height / 2.0;
    let mut mesh = TriangleMesh::new();

    // Side wall: one grid row from bottom to top.
    for &z in &[-half, half] {
        for i in 0..=n {
            let u = i as f64 / n as f64 * 2.0 * PI;
            let (su, cu) = u.sin_cos();
            let p = Point3::new(radius * cu, radius * su, z);
            mesh.push_vertex(p, Vec3::new(cu, su, 0.0));
        }
    }
    mesh.stitch_grid(0, 1, n);

    // Caps: a center vertex fanned to the rim, flat normals.
    for &(z, nz) in &[(-half, -1.0), (half, 1.0)] {
        let base = mesh.num_vertices() as u32;
        let normal = Vec3::new(0.0, 0.0, nz);
        mesh.push_vertex(Point3::new(0.0, 0.0, z), normal);
        for i in 0..=n {
            let u = i as f64 / n as f64 * 2.0 * PI;
            let (su, cu) = u.sin_cos();
            mesh.push_vertex(Point3::new(radius * cu, radius * su, z), normal);
        }
        for i in 0..n {
            let rim = base + 1 + i as u32;
            if nz > 0.0 {
                mesh.indices.extend_from_slice(&[base, rim, rim + 1]);
            } else {
                mesh.indices.extend_from_slice(&[base, rim + 1, rim]);
            }
        }
    }
    mesh
}

/// Build a full UV sphere centered at origin.
pub fn uv_sphere(radius: f64, segments: u32) -> TriangleMesh {
    sphere_patch(radius, 0.0, 2.0 * PI, 0.0, PI, segments, segments / 2)
}

/// Build an upper-hemisphere dome (open rim) centered at origin, pole on +Z.
pub fn dome(radius: f64, segments: u32) -> TriangleMesh {
    sphere_patch(radius, 0.0, 2.0 * PI, 0.0, PI / 2.0, segments, segments / 2)
}

/// Build a rectangular patch of a sphere surface centered at origin.
///
/// `theta` is the azimuth around Z starting from +X; `phi` is the polar
/// angle from the +Z pole. Partial ranges produce open shells — the
/// helmet faceplate is a patch like this.
pub fn sphere_patch(
    radius: f64,
    theta_start: f64,
    theta_len: f64,
    phi_start: f64,
    phi_len: f64,
    lon_segments: u32,
    lat_segments: u32,
) -> TriangleMesh {
    let n_u = lon_segments.max(3) as usize;
    let n_v = lat_segments.max(2) as usize;
    let mut mesh = TriangleMesh::new();

    for j in 0..=n_v {
        let phi = phi_start + j as f64 / n_v as f64 * phi_len;
        let (sp, cp) = phi.sin_cos();
        for i in 0..=n_u {
            let theta = theta_start + i as f64 / n_u as f64 * theta_len;
            let (st, ct) = theta.sin_cos();
            let n = Vec3::new(sp * ct, sp * st, cp);
            let p = Point3::from(n * radius);
            mesh.push_vertex(p, n);
        }
    }
    mesh.stitch_grid(0, n_v, n_u);
    mesh
}

/// Build an axis-aligned cuboid centered at origin with flat face normals.
pub fn cuboid(sx: f64, sy: f64, sz: f64) -> TriangleMesh {
    let (hx, hy, hz) = (sx / 2.0, sy / 2.0, sz / 2.0);
    let mut mesh = TriangleMesh::new();

    // Each face: 4 vertices in CCW order viewed from outside, fanned into
    // 2 triangles, normal shared by the whole face.
    let faces: [([Point3; 4], Vec3); 6] = [
        (
            [
                Point3::new(-hx, -hy, hz),
                Point3::new(hx, -hy, hz),
                Point3::new(hx, hy, hz),
                Point3::new(-hx, hy, hz),
            ],
            Vec3::new(0.0, 0.0, 1.0),
        ),
        (
            [
                Point3::new(hx, -hy, -hz),
                Point3::new(-hx, -hy, -hz),
                Point3::new(-hx, hy, -hz),
                Point3::new(hx, hy, -hz),
            ],
            Vec3::new(0.0, 0.0, -1.0),
        ),
        (
            [
                Point3::new(hx, -hy, hz),
                Point3::new(hx, -hy, -hz),
                Point3::new(hx, hy, -hz),
                Point3::new(hx, hy, hz),
            ],
            Vec3::new(1.0, 0.0, 0.0),
        ),
        (
            [
                Point3::new(-hx, -hy, -hz),
                Point3::new(-hx, -hy, hz),
                Point3::new(-hx, hy, hz),
                Point3::new(-hx, hy, -hz),
            ],
            Vec3::new(-1.0, 0.0, 0.0),
        ),
        (
            [
                Point3::new(-hx, hy, hz),
                Point3::new(hx, hy, hz),
                Point3::new(hx, hy, -hz),
                Point3::new(-hx, hy, -hz),
            ],
            Vec3::new(0.0, 1.0, 0.0),
        ),
        (
            [
                Point3::new(-hx, -hy, -hz),
                Point3::new(hx, -hy, -hz),
                Point3::new(hx, -hy, hz),
                Point3::new(-hx, -hy, hz),
            ],
            Vec3::new(0.0, -1.0, 0.0),
        ),
    ];

    for (corners, normal) in faces.iter() {
        let base = mesh.num_vertices() as u32;
        for corner in corners {
            mesh.push_vertex(*corner, *normal);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Build a tube of circular cross-section swept along a quadratic arc.
///
/// The arc runs from `start` to `end` through a control point at the
/// midpoint offset by `lift`. Used for the cosmetic wires connecting a
/// time band's chips to its core. The tube ends are open.
pub fn arc_tube(
    start: Point3,
    end: Point3,
    lift: Vec3,
    tube_radius: f64,
    path_segments: u32,
    radial_segments: u32,
) -> TriangleMesh {
    let n_path = path_segments.max(2) as usize;
    let n_rad = radial_segments.max(3) as usize;
    let control = Point3::from((start.coords + end.coords) / 2.0 + lift);

    let eval = |t: f64| -> Point3 {
        // Quadratic Bezier: (1-t)^2 P0 + 2t(1-t) C + t^2 P1
        let mt = 1.0 - t;
        Point3::from(
            start.coords * (mt * mt) + control.coords * (2.0 * t * mt) + end.coords * (t * t),
        )
    };
    let tangent = |t: f64| -> Vec3 {
        let mt = 1.0 - t;
        (control - start) * (2.0 * mt) + (end - control) * (2.0 * t)
    };

    let mut mesh = TriangleMesh::new();
    for j in 0..=n_path {
        let t = j as f64 / n_path as f64;
        let center = eval(t);
        let tan = tangent(t);
        let tan = if tan.norm() < 1e-12 {
            Vec3::z()
        } else {
            tan.normalize()
        };

        // Frame the cross-section with an arbitrary but consistent normal,
        // the straight-segment fallback of a Frenet frame.
        let arbitrary = if tan.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
        let side = arbitrary.cross(&tan).normalize();
        let up = tan.cross(&side);

        for i in 0..=n_rad {
            let a = i as f64 / n_rad as f64 * 2.0 * PI;
            let (sa, ca) = a.sin_cos();
            let n = side * ca + up * sa;
            mesh.push_vertex(center + n * tube_radius, n);
        }
    }
    mesh.stitch_grid(0, n_path, n_rad);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_unit_normals(mesh: &TriangleMesh) {
        for chunk in mesh.normals.chunks_exact(3) {
            let len =
                ((chunk[0] as f64).powi(2) + (chunk[1] as f64).powi(2) + (chunk[2] as f64).powi(2))
                    .sqrt();
            assert_relative_eq!(len, 1.0, epsilon = 1e-5);
        }
    }

    fn assert_indices_in_range(mesh: &TriangleMesh) {
        let n = mesh.num_vertices() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        assert_eq!(mesh.indices.len() % 3, 0);
        assert_eq!(mesh.vertices.len(), mesh.normals.len());
    }

    #[test]
    fn torus_bounds_and_normals() {
        let mesh = torus(1.5, 0.4, 16, 48);
        assert_indices_in_range(&mesh);
        assert_unit_normals(&mesh);

        let (min, max) = mesh.bounds().unwrap();
        assert_relative_eq!(max.x, 1.9, epsilon = 1e-3);
        assert_relative_eq!(min.x, -1.9, epsilon = 1e-3);
        assert_relative_eq!(max.z, 0.4, epsilon = 1e-3);
    }

    #[test]
    fn cylinder_has_caps() {
        let mesh = cylinder(0.8, 0.5, 32);
        assert_indices_in_range(&mesh);
        // Side quads plus two cap fans.
        assert_eq!(mesh.num_triangles(), 32 * 2 + 32 * 2);

        let (min, max) = mesh.bounds().unwrap();
        assert_relative_eq!(max.z, 0.25, epsilon = 1e-6);
        assert_relative_eq!(min.z, -0.25, epsilon = 1e-6);
    }

    #[test]
    fn sphere_radius() {
        let mesh = uv_sphere(2.0, 24);
        assert_indices_in_range(&mesh);
        assert_unit_normals(&mesh);
        for chunk in mesh.vertices.chunks_exact(3) {
            let r = ((chunk[0] as f64).powi(2)
                + (chunk[1] as f64).powi(2)
                + (chunk[2] as f64).powi(2))
            .sqrt();
            assert_relative_eq!(r, 2.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn dome_stays_above_equator() {
        let mesh = dome(1.0, 16);
        let (min, _) = mesh.bounds().unwrap();
        assert!(min.z >= -1e-6);
    }

    #[test]
    fn sphere_patch_partial_coverage() {
        // A quarter-azimuth band should stay in the +X/+Y quadrant.
        let mesh = sphere_patch(1.0, 0.0, PI / 2.0, 0.3, 0.8, 12, 6);
        assert_indices_in_range(&mesh);
        let (min, _) = mesh.bounds().unwrap();
        assert!(min.x >= -1e-6);
        assert!(min.y >= -1e-6);
    }

    #[test]
    fn cuboid_extents() {
        let mesh = cuboid(2.0, 4.0, 6.0);
        assert_eq!(mesh.num_vertices(), 24);
        assert_eq!(mesh.num_triangles(), 12);
        let (min, max) = mesh.bounds().unwrap();
        assert_relative_eq!(min.y, -2.0, epsilon = 1e-6);
        assert_relative_eq!(max.z, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn arc_tube_spans_endpoints() {
        let mesh = arc_tube(
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.5),
            0.05,
            10,
            8,
        );
        assert_indices_in_range(&mesh);
        assert_unit_normals(&mesh);
        let (min, max) = mesh.bounds().unwrap();
        assert!(min.x <= -0.9 && max.x >= 0.9);
        // The lift bows the tube out of the XY plane.
        assert!(max.z > 0.2);
    }

    #[test]
    fn merge_offsets_indices() {
        let mut a = cuboid(1.0, 1.0, 1.0);
        let b = cuboid(1.0, 1.0, 1.0);
        let verts_before = a.num_vertices() as u32;
        a.merge(&b);
        assert_eq!(a.num_vertices(), 48);
        assert_eq!(a.num_triangles(), 24);
        assert!(a.indices[36..].iter().all(|&i| i >= verts_before));
    }
}
