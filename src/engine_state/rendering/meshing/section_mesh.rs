//! Mesh data for a single section.
//!
//! A section mesh is a flat list of quads; each quad is four vertices and six
//! indices forming two triangles.

use super::face::Face;
use crate::engine_state::rendering::Vertex;

/// Vertex and index data for one section.
#[derive(Debug, Default, Clone)]
pub struct SectionMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    faces: u32,
}

impl SectionMesh {
    pub fn new() -> Self {
        SectionMesh::default()
    }

    /// Appends one quad.
    pub fn add_face(&mut self, face: &Face) {
        self.vertices
            .extend_from_slice(&Self::generate_face_vertices(face));
        self.indices
            .extend_from_slice(&Self::generate_face_indices(self.faces));
        self.faces += 1;
    }

    pub fn face_count(&self) -> u32 {
        self.faces
    }

    pub fn is_empty(&self) -> bool {
        self.faces == 0
    }

    /// Generates vertex data for a single face.
    ///
    /// The vertices are ordered so that the indices from
    /// `generate_face_indices` form two counter-clockwise triangles.
    pub fn generate_face_vertices(face: &Face) -> [Vertex; 4] {
        let width = ((face.lr - face.ll).x.abs()
            + (face.lr - face.ll).y.abs()
            + (face.lr - face.ll).z.abs()) as u8;
        let height = ((face.ul - face.ll).x.abs()
            + (face.ul - face.ll).y.abs()
            + (face.ul - face.ll).z.abs()) as u8;

        [
            Vertex::new(face.ll, face.texture_index, 0, height),
            Vertex::new(face.lr, face.texture_index, width, height),
            Vertex::new(face.ul, face.texture_index, 0, 0),
            Vertex::new(face.ur, face.texture_index, width, 0),
        ]
    }

    /// Generates index data for a face, offset by the number of faces
    /// already in the mesh.
    pub fn generate_face_indices(num_faces_generated: u32) -> [u32; 6] {
        [
            num_faces_generated * 4,
            1 + num_faces_generated * 4,
            3 + num_faces_generated * 4,
            num_faces_generated * 4,
            3 + num_faces_generated * 4,
            2 + num_faces_generated * 4,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_side::BlockSide;

    #[test]
    fn test_indices_follow_face_count() {
        let mut mesh = SectionMesh::new();
        mesh.add_face(&Face::new(0, 0, 0, 3, BlockSide::TOP));
        mesh.add_face(&Face::new(0, 0, 0, 3, BlockSide::BOTTOM));

        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(&mesh.indices[6..], &[4, 5, 7, 4, 7, 6]);
    }

    #[test]
    fn test_top_face_sits_above_block() {
        let vertices = SectionMesh::generate_face_vertices(&Face::new(2, 5, 7, 0, BlockSide::TOP));
        assert!(vertices.iter().all(|v| v.position().y == 6));
    }
}
