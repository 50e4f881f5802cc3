//! Unit meshes for the ornaments: a UV sphere and a box.

use std::f32::consts::PI;
use crate::math::Vec3;
use super::{Mesh, Vertex};

/// Latitude/longitude segments of the ornament sphere
pub const SPHERE_SEGMENTS: (usize, usize) = (64, 32);

impl Mesh {
    /// Radius-1 sphere with an equirectangular UV layout.
    ///
    /// `u` runs once around the equator starting at -X, `v` runs from the
    /// north pole (uv.y = 1) to the south pole (uv.y = 0), so a 2:1 label
    /// texture wraps the sphere once with its centre (u = 0.5) facing +X
    /// and its left quarter (u = 0.25) facing +Z.
    pub fn uv_sphere(width_segments: usize, height_segments: usize) -> Mesh {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let mut mesh = Mesh::new();

        let mut grid: Vec<Vec<u32>> = Vec::with_capacity(height_segments + 1);
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let (sin_v, cos_v) = (v * PI).sin_cos();

            let row = (0..=width_segments)
                .map(|ix| {
                    let u = ix as f32 / width_segments as f32;
                    let (sin_u, cos_u) = (u * 2.0 * PI).sin_cos();
                    let position = Vec3::new(-cos_u * sin_v, cos_v, sin_u * sin_v);
                    mesh.add_vertices([Vertex::new(position, position.normalize(), [u, 1.0 - v])])
                })
                .collect();
            grid.push(row);
        }

        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];

                // The pole rows collapse to a point, so each only needs one triangle
                if iy != 0 {
                    mesh.add_triangle(a, b, d);
                }
                if iy != height_segments - 1 {
                    mesh.add_triangle(b, c, d);
                }
            }
        }

        mesh
    }

    /// Unit cube centred on the origin, four vertices per face
    pub fn cube() -> Mesh {
        // (normal, tangent, bitangent) with tangent x bitangent = normal
        let faces = [
            (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), Vec3::UP),
            (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::UP),
            (Vec3::UP, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
            (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
            (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::UP),
            (Vec3::new(0.0, 0.0, -1.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::UP),
        ];
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let mut mesh = Mesh::new();
        for (normal, tangent, bitangent) in faces {
            let start = mesh.add_vertices(corners.iter().map(|&(s, t)| {
                let position = (normal + tangent * s + bitangent * t) * 0.5;
                Vertex::new(position, normal, [(s + 1.0) * 0.5, (t + 1.0) * 0.5])
            }));
            mesh.add_quad(start, start + 1, start + 2, start + 3);
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangles(mesh: &Mesh) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        mesh.indices.chunks(3).map(|t| {
            [
                mesh.vertices[t[0] as usize],
                mesh.vertices[t[1] as usize],
                mesh.vertices[t[2] as usize],
            ]
        })
    }

    #[test]
    fn test_sphere_counts() {
        let (w, h) = SPHERE_SEGMENTS;
        let mesh = Mesh::uv_sphere(w, h);
        assert_eq!(mesh.vertex_count(), (w + 1) * (h + 1));
        assert_eq!(mesh.triangle_count(), 2 * w * (h - 1));
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn test_sphere_is_unit_with_radial_normals() {
        let mesh = Mesh::uv_sphere(16, 8);
        for v in &mesh.vertices {
            assert!((v.position.length() - 1.0).abs() < 1e-5);
            assert!(v.normal.distance(&v.position) < 1e-5);
            assert!(v.uv[0] >= 0.0 && v.uv[0] <= 1.0);
            assert!(v.uv[1] >= 0.0 && v.uv[1] <= 1.0);
        }
        // Top of the texture maps to the north pole
        assert_eq!(mesh.vertices[0].uv[1], 1.0);
        assert!((mesh.vertices[0].position.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_texture_centre_faces_plus_x() {
        let (w, h) = (16, 8);
        let mesh = Mesh::uv_sphere(w, h);
        // u = 0.5 on the equator row
        let v = mesh.vertices[(h / 2) * (w + 1) + w / 2];
        assert!((v.uv[0] - 0.5).abs() < 1e-6);
        assert!((v.position.x - 1.0).abs() < 1e-5);

        // u = 0.25 sits at +Z
        let v = mesh.vertices[(h / 2) * (w + 1) + w / 4];
        assert!((v.position.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_winding_faces_outward() {
        for [a, b, c] in triangles(&Mesh::uv_sphere(16, 8)) {
            let face = (b.position - a.position).cross(&(c.position - a.position));
            let centroid = (a.position + b.position + c.position) * (1.0 / 3.0);
            assert!(face.dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn test_cube_faces() {
        let mesh = Mesh::cube();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);

        for v in &mesh.vertices {
            for c in v.position.to_array() {
                assert!((c.abs() - 0.5).abs() < 1e-6);
            }
            // Each vertex lies on the face its normal points at
            assert!((v.position.dot(&v.normal) - 0.5).abs() < 1e-6);
        }

        for [a, b, c] in triangles(&mesh) {
            let face = (b.position - a.position).cross(&(c.position - a.position));
            assert!(face.dot(&a.normal) > 0.0);
        }
    }
}
