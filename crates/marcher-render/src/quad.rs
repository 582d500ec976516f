//! Full-screen quad with corner-tagged vertices
//!
//! The pass is orthographic, so the z channel carries no depth. Each vertex
//! stores the index of its frustum corner there instead; the vertex stage
//! looks the corner ray up and the rasterizer interpolates it per pixel.

use bytemuck::{Pod, Zeroable};
use marcher_scene::Corner;

/// One quad vertex
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    /// xy on the unit square, z = frustum corner index
    pub position: [f32; 3],
    /// Texture coordinate, origin bottom-left
    pub uv: [f32; 2],
}

impl QuadVertex {
    const fn at(x: f32, y: f32, corner: Corner) -> Self {
        Self {
            position: [x, y, corner as u32 as f32],
            uv: [x, y],
        }
    }

    /// The frustum corner tagged on this vertex
    pub fn corner_index(&self) -> u32 {
        self.position[2] as u32
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Emission order: bottom-left, bottom-right, top-right, top-left
pub const FULL_SCREEN_QUAD: [QuadVertex; 4] = [
    QuadVertex::at(0.0, 0.0, Corner::BottomLeft),
    QuadVertex::at(1.0, 0.0, Corner::BottomRight),
    QuadVertex::at(1.0, 1.0, Corner::TopRight),
    QuadVertex::at(0.0, 1.0, Corner::TopLeft),
];

/// Two counter-clockwise triangles over [`FULL_SCREEN_QUAD`]
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_indices_are_distinct() {
        let mut seen: Vec<u32> = FULL_SCREEN_QUAD.iter().map(QuadVertex::corner_index).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_vertices_tag_their_screen_corner() {
        let expected = [
            ([0.0, 0.0], Corner::BottomLeft),
            ([1.0, 0.0], Corner::BottomRight),
            ([1.0, 1.0], Corner::TopRight),
            ([0.0, 1.0], Corner::TopLeft),
        ];

        for (vertex, (xy, corner)) in FULL_SCREEN_QUAD.iter().zip(expected) {
            assert_eq!([vertex.position[0], vertex.position[1]], xy);
            assert_eq!(vertex.uv, xy);
            assert_eq!(vertex.corner_index(), corner.index());
        }
    }

    #[test]
    fn test_indices_cover_quad() {
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < FULL_SCREEN_QUAD.len()));
        assert_eq!(QuadVertex::layout().array_stride, 20);
    }
}
