//! Procedural meshes: subdivided planes, UV spheres, flat rings and the unit
//! quad used for instanced sprites.

use std::f32::consts::{PI, TAU};

use crate::buffer::{BufferAllocator, IndexData, MeshBuffer, VertexPositionNormalUv};

/// CPU-side mesh before upload.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<VertexPositionNormalUv>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn upload(&self, allocator: &BufferAllocator, label: &str) -> MeshBuffer {
        allocator.create_mesh(
            label,
            bytemuck::cast_slice(&self.vertices),
            IndexData::U32(&self.indices),
        )
    }
}

/// Flat plane in XY facing +Z, centered on the origin, split into
/// `segments x segments` quads. UV (0, 0) is the bottom-left corner.
pub fn plane_grid(width: f32, height: f32, segments: u32) -> MeshData {
    let segments = segments.max(1);
    let row = segments + 1;
    let mut vertices = Vec::with_capacity((row * row) as usize);

    for iy in 0..row {
        let v = iy as f32 / segments as f32;
        for ix in 0..row {
            let u = ix as f32 / segments as f32;
            vertices.push(VertexPositionNormalUv {
                position: [(u - 0.5) * width, (0.5 - v) * height, 0.0],
                normal: [0.0, 0.0, 1.0],
                uv: [u, 1.0 - v],
            });
        }
    }

    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
    for iy in 0..segments {
        for ix in 0..segments {
            let a = iy * row + ix;
            let b = a + row;
            let c = b + 1;
            let d = a + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    MeshData { vertices, indices }
}

/// Latitude/longitude sphere. `uv.y` runs from 0 at the south pole to 1 at the
/// north pole, so it doubles as a latitude coordinate for band shading.
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let mut vertices = Vec::new();

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let normal = [
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            ];
            vertices.push(VertexPositionNormalUv {
                position: normal.map(|n| n * radius),
                normal,
                uv: [u, 1.0 - v],
            });
        }
    }

    let row = width_segments + 1;
    let mut indices = Vec::new();
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // The pole rows collapse to points; skip their degenerate halves.
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    MeshData { vertices, indices }
}

/// Flat annulus in XY between `inner` and `outer` radius.
pub fn ring(inner: f32, outer: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity(((segments + 1) * 2) as usize);

    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let (sin, cos) = (t * TAU).sin_cos();
        for (radius, v) in [(inner, 0.0), (outer, 1.0)] {
            vertices.push(VertexPositionNormalUv {
                position: [cos * radius, sin * radius, 0.0],
                normal: [0.0, 0.0, 1.0],
                uv: [t, v],
            });
        }
    }

    let mut indices = Vec::with_capacity((segments * 6) as usize);
    for i in 0..segments {
        let a = i * 2;
        indices.extend_from_slice(&[a, a + 1, a + 2, a + 1, a + 3, a + 2]);
    }

    MeshData { vertices, indices }
}

/// Two-triangle quad spanning [-1, 1] in XY, for instanced billboards.
pub fn unit_quad() -> MeshData {
    let corner = |x: f32, y: f32| VertexPositionNormalUv {
        position: [x, y, 0.0],
        normal: [0.0, 0.0, 1.0],
        uv: [(x + 1.0) * 0.5, (y + 1.0) * 0.5],
    };
    MeshData {
        vertices: vec![
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(-1.0, 1.0),
            corner(1.0, 1.0),
        ],
        indices: vec![0, 1, 2, 2, 1, 3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_valid(mesh: &MeshData) {
        let n = mesh.vertices.len() as u32;
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(
            mesh.indices.iter().all(|&i| i < n),
            "index out of range for {n} vertices"
        );
    }

    #[test]
    fn test_plane_grid_counts_and_extent() {
        let mesh = plane_grid(15_000.0, 15_000.0, 128);
        assert_eq!(mesh.vertices.len(), 129 * 129);
        assert_eq!(mesh.triangle_count(), 128 * 128 * 2);
        assert_indices_valid(&mesh);

        let max_x = mesh
            .vertices
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        assert!((max_x - 7500.0).abs() < 1e-2);
    }

    #[test]
    fn test_plane_uv_origin_is_bottom_left() {
        let mesh = plane_grid(2.0, 2.0, 1);
        for v in &mesh.vertices {
            assert!((v.uv[0] - (v.position[0] + 1.0) * 0.5).abs() < 1e-6);
            assert!((v.uv[1] - (v.position[1] + 1.0) * 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_plane_faces_positive_z() {
        let mesh = plane_grid(2.0, 2.0, 1);
        let [a, b, c] =
            [0, 1, 2].map(|i| glam::Vec3::from(mesh.vertices[mesh.indices[i] as usize].position));
        assert!((b - a).cross(c - a).z > 0.0);
    }

    #[test]
    fn test_sphere_vertices_on_radius_and_uv_latitude() {
        let mesh = uv_sphere(35.0, 64, 64);
        assert_indices_valid(&mesh);
        for v in &mesh.vertices {
            let p = glam::Vec3::from(v.position);
            assert!((p.length() - 35.0).abs() < 1e-3);
            // uv.y tracks height: 0 at the bottom, 1 at the top.
            let expected = 0.5 + (p.y / 35.0).clamp(-1.0, 1.0).asin() / PI;
            assert!((v.uv[1] - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_ring_radii() {
        let mesh = ring(40.0, 70.0, 128);
        assert_indices_valid(&mesh);
        assert_eq!(mesh.triangle_count(), 256);
        for v in &mesh.vertices {
            let r = glam::Vec2::new(v.position[0], v.position[1]).length();
            assert!((r - 40.0).abs() < 1e-3 || (r - 70.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_unit_quad() {
        let quad = unit_quad();
        assert_eq!(quad.vertices.len(), 4);
        assert_eq!(quad.triangle_count(), 2);
        assert_indices_valid(&quad);
    }
}
