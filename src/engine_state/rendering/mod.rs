//! # Rendering Module
//!
//! The world does not talk to a graphics API itself. Sections build their
//! meshes into a [`SectionMesh`], "upload" them into a [`BufferedMesh`] (the
//! byte payload a GPU backend copies into its buffers), and the draw pass hands
//! every buffered mesh to a [`ChunkRenderer`] supplied by the caller.
//!
//! [`FrameRenderer`] is the renderer used by the headless driver: it records
//! what would have been submitted so frame statistics can be logged.

use crate::engine_state::voxels::chunk::SectionPosition;

pub mod meshing;
mod vertex;

pub use meshing::{SectionMesh, SectionNeighbours};
pub use vertex::Vertex;

/// A section mesh in its uploaded form: raw vertex and index bytes.
#[derive(Debug, Clone, Default)]
pub struct BufferedMesh {
    pub vertex_data: Vec<u8>,
    pub index_data: Vec<u8>,
    pub index_count: u32,
    pub face_count: u32,
}

impl BufferedMesh {
    /// Copies a built mesh into upload form.
    pub fn upload(mesh: &SectionMesh) -> Self {
        BufferedMesh {
            vertex_data: bytemuck::cast_slice(&mesh.vertices).to_vec(),
            index_data: bytemuck::cast_slice(&mesh.indices).to_vec(),
            index_count: mesh.indices.len() as u32,
            face_count: mesh.face_count(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_data.len() / std::mem::size_of::<Vertex>()
    }
}

/// Receives the sections drawn each frame.
pub trait ChunkRenderer {
    /// Queues one section's buffered mesh for drawing.
    fn draw_section(&mut self, position: SectionPosition, mesh: &BufferedMesh);
}

/// Per-frame submission counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrameRenderer {
    pub sections_drawn: usize,
    pub faces_drawn: usize,
    pub bytes_submitted: usize,
}

impl FrameRenderer {
    pub fn new() -> Self {
        FrameRenderer::default()
    }

    /// Resets the counters at the start of a frame.
    pub fn begin_frame(&mut self) {
        *self = FrameRenderer::default();
    }
}

impl ChunkRenderer for FrameRenderer {
    fn draw_section(&mut self, _position: SectionPosition, mesh: &BufferedMesh) {
        self.sections_drawn += 1;
        self.faces_drawn += mesh.face_count as usize;
        self.bytes_submitted += mesh.vertex_data.len() + mesh.index_data.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_side::BlockSide;
    use cgmath::Point3;
    use meshing::Face;

    #[test]
    fn test_upload_keeps_counts() {
        let mut mesh = SectionMesh::new();
        mesh.add_face(&Face::new(0, 0, 0, 1, BlockSide::TOP));

        let buffered = BufferedMesh::upload(&mesh);

        assert_eq!(buffered.vertex_count(), 4);
        assert_eq!(buffered.index_count, 6);
        assert_eq!(buffered.index_data.len(), 6 * 4);
        assert_eq!(buffered.face_count, 1);
    }

    #[test]
    fn test_frame_renderer_counts_and_resets() {
        let mut mesh = SectionMesh::new();
        mesh.add_face(&Face::new(0, 0, 0, 1, BlockSide::TOP));
        let buffered = BufferedMesh::upload(&mesh);

        let mut renderer = FrameRenderer::new();
        renderer.draw_section(Point3::new(0, 0, 0), &buffered);
        renderer.draw_section(Point3::new(1, 0, 0), &buffered);
        assert_eq!(renderer.sections_drawn, 2);
        assert_eq!(renderer.faces_drawn, 2);

        renderer.begin_frame();
        assert_eq!(renderer, FrameRenderer::default());
    }
}
