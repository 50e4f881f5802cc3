use crate::math::Vec3;

/// Floats per packed vertex: position(3) + normal(3) + uv(2)
pub const VERTEX_STRIDE: usize = 8;

/// A lit, textured vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }

    /// Convert to flat array for WebGL buffer
    pub fn to_array(&self) -> [f32; VERTEX_STRIDE] {
        [
            self.position.x, self.position.y, self.position.z,
            self.normal.x, self.normal.y, self.normal.z,
            self.uv[0], self.uv[1],
        ]
    }
}

/// Indexed triangle mesh shared by every instance of an ornament kind
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add vertices and return the starting index
    pub fn add_vertices(&mut self, verts: impl IntoIterator<Item = Vertex>) -> u32 {
        let start = self.vertices.len() as u32;
        self.vertices.extend(verts);
        start
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Add a quad as two triangles (CCW winding)
    pub fn add_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.add_triangle(a, b, c);
        self.add_triangle(a, c, d);
    }

    pub fn vertex_data(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.to_array()).collect()
    }

    pub fn index_data(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_to_array() {
        let v = Vertex::new(Vec3::new(1.0, 2.0, 3.0), Vec3::UP, [0.25, 0.75]);
        assert_eq!(v.to_array(), [1.0, 2.0, 3.0, 0.0, 1.0, 0.0, 0.25, 0.75]);
    }

    #[test]
    fn test_add_quad() {
        let mut mesh = Mesh::new();
        let start = mesh.add_vertices((0..4).map(|i| Vertex::new(Vec3::new(i as f32, 0.0, 0.0), Vec3::UP, [0.0, 0.0])));
        assert_eq!(start, 0);
        let next = mesh.add_vertices([Vertex::new(Vec3::ZERO, Vec3::UP, [0.0, 0.0])]);
        assert_eq!(next, 4);

        mesh.add_quad(0, 1, 2, 3);
        assert_eq!(mesh.index_data(), &[0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_data().len(), 5 * VERTEX_STRIDE);
    }
}
