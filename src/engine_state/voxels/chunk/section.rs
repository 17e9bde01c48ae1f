//! # Section
//!
//! A `CHUNK_SIZE`³ block grid with its mesh. Alongside the blocks the section
//! keeps a bit vector marking which blocks are opaque, so the mesher can test
//! neighbour visibility without a catalog lookup per face.
//!
//! The mesh goes through two stages: [`Section::make_mesh`] builds vertex data
//! (safe on any thread), [`Section::buffer_mesh`] turns the latest built mesh
//! into the uploaded [`BufferedMesh`] the draw pass submits.

use std::sync::Arc;

use bitvec::vec::BitVec;
use cgmath::Point3;

use super::{local_index, Section, SectionPosition, CHUNK_AREA, CHUNK_VOLUME};
use crate::engine_state::rendering::{
    meshing::{build_section_mesh, edge_position},
    BufferedMesh, ChunkRenderer, SectionMesh, SectionNeighbours,
};
use crate::engine_state::voxels::block::{
    block_catalog::BlockCatalog, block_side::BlockSide, Block,
};

pub struct ChunkSection {
    position: SectionPosition,
    blocks: Vec<Block>,
    /// One bit per block, set when the block is opaque.
    opaque: BitVec,
    catalog: Arc<BlockCatalog>,
    /// Built but not yet uploaded.
    mesh: Option<SectionMesh>,
    buffered: Option<BufferedMesh>,
    mesh_builds: u32,
    uploads: u32,
}

impl ChunkSection {
    /// Creates a section full of air.
    pub fn new(position: SectionPosition, catalog: Arc<BlockCatalog>) -> Self {
        ChunkSection {
            position,
            blocks: vec![Block::AIR; CHUNK_VOLUME],
            opaque: BitVec::repeat(false, CHUNK_VOLUME),
            catalog,
            mesh: None,
            buffered: None,
            mesh_builds: 0,
            uploads: 0,
        }
    }

    pub fn position(&self) -> SectionPosition {
        self.position
    }

    /// Whether a mesh has been built and is waiting for upload.
    pub fn has_pending_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn buffered_mesh(&self) -> Option<&BufferedMesh> {
        self.buffered.as_ref()
    }

    /// How many times the mesh has been rebuilt.
    pub fn mesh_builds(&self) -> u32 {
        self.mesh_builds
    }

    /// How many times a mesh has been uploaded.
    pub fn uploads(&self) -> u32 {
        self.uploads
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(Block::is_air)
    }

    /// Submits the uploaded mesh, if any. Returns the face count submitted.
    pub fn draw(&self, renderer: &mut dyn ChunkRenderer) -> usize {
        match &self.buffered {
            Some(mesh) if mesh.face_count > 0 => {
                renderer.draw_section(self.position, mesh);
                mesh.face_count as usize
            }
            _ => 0,
        }
    }
}

impl Section for ChunkSection {
    fn get_block(&self, local: Point3<i32>) -> Block {
        self.blocks[local_index(local)]
    }

    fn set_block(&mut self, local: Point3<i32>, block: Block) {
        let index = local_index(local);
        self.blocks[index] = block;
        self.opaque.set(index, self.catalog.is_opaque(block));
    }

    fn edge_layer(&self, side: BlockSide) -> BitVec {
        (0..CHUNK_AREA as i32)
            .map(|index| self.opaque[local_index(edge_position(side, index))])
            .collect()
    }

    fn make_mesh(&mut self, neighbours: &SectionNeighbours) {
        self.mesh = Some(build_section_mesh(
            self.position,
            &self.blocks,
            &self.opaque,
            neighbours,
            &self.catalog,
        ));
        self.mesh_builds += 1;
    }

    fn buffer_mesh(&mut self) {
        if let Some(mesh) = self.mesh.take() {
            self.buffered = Some(BufferedMesh::upload(&mesh));
            self.uploads += 1;
        }
    }
}
