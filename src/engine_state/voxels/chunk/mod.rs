//! # Chunk Module
//!
//! The world is a grid of columns. A column covers one `CHUNK_SIZE` x
//! `CHUNK_SIZE` tile of the ground and is a vertical stack of sections; a
//! section is a `CHUNK_SIZE`³ cube of blocks and is the unit a mesh is built
//! for.
//!
//! The world only talks to columns and sections through the [`Column`] and
//! [`Section`] traits. [`StackedColumn`] and [`ChunkSection`] are the stock
//! implementations.
//!
//! ## Growth
//! Columns grow upwards one section at a time and never sparsely: section `n`
//! exists only if sections `0..n` exist. Writing above the top section grows
//! the column first.

use std::sync::Arc;

use bitvec::vec::BitVec;
use cgmath::{Point2, Point3};

use super::block::{block_catalog::BlockCatalog, block_side::BlockSide, Block};
use super::world::settings::WorldSettings;
use crate::core::WorldError;
use crate::engine_state::rendering::{ChunkRenderer, SectionNeighbours};

pub mod column;
pub mod position;
pub mod section;
pub mod terrain;

pub use column::StackedColumn;
pub use section::ChunkSection;

/// The dimension (width, height, depth) of a section in blocks.
pub const CHUNK_SIZE: i32 = 16;
/// The number of blocks in one horizontal layer of a section.
pub const CHUNK_AREA: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;
/// The number of blocks in a section.
pub const CHUNK_VOLUME: usize = CHUNK_AREA * CHUNK_SIZE as usize;

/// Identifies a column: `x` is the world x tile, `y` is the world z tile.
pub type ColumnPosition = Point2<i32>;
/// Identifies a section: column `x`/`z` plus the vertical section index `y`.
pub type SectionPosition = Point3<i32>;

/// Index of a local block coordinate into a section's block array.
///
/// Blocks are stored x fastest, then z, then y.
pub fn local_index(local: Point3<i32>) -> usize {
    local.x as usize + local.z as usize * CHUNK_SIZE as usize + local.y as usize * CHUNK_AREA
}

/// A `CHUNK_SIZE`³ cube of blocks with a mesh.
pub trait Section: Send + Sync {
    /// Block at a local coordinate (each axis in `0..CHUNK_SIZE`).
    fn get_block(&self, local: Point3<i32>) -> Block;

    /// Sets the block at a local coordinate. Does not touch the mesh.
    fn set_block(&mut self, local: Point3<i32>, block: Block);

    /// Opacity of the section's own boundary layer on `side`, one bit per
    /// block, indexed by [`edge_index`](crate::engine_state::rendering::meshing::edge_index).
    fn edge_layer(&self, side: BlockSide) -> BitVec;

    /// Rebuilds the mesh from the current blocks. Boundary faces are culled
    /// against `neighbours`.
    fn make_mesh(&mut self, neighbours: &SectionNeighbours);

    /// Uploads the most recently built mesh to the rendering backend.
    fn buffer_mesh(&mut self);
}

/// A vertical stack of sections covering one tile of the world.
///
/// Block coordinates passed to a column are local on `x`/`z` (in
/// `0..CHUNK_SIZE`) and absolute on `y`.
pub trait Column: Send + Sync + Sized + 'static {
    type Section: Section;

    /// Creates an empty, ungenerated column.
    fn new(position: ColumnPosition, settings: &WorldSettings, catalog: Arc<BlockCatalog>) -> Self;

    fn position(&self) -> ColumnPosition;

    /// Block at a column-local coordinate; air above the top section.
    fn get_block(&self, local: Point3<i32>) -> Block;

    /// Writes a block, growing the column if needed. Does not remesh.
    fn set_block(&mut self, local: Point3<i32>, block: Block);

    /// Generates terrain if the column has none yet. Meshing is left to the
    /// caller, which can see the neighbouring columns.
    ///
    /// Returns `Ok(true)` only on the call that produced new content.
    fn try_generate(&mut self) -> Result<bool, WorldError>;

    /// Appends one empty section on top of the stack.
    fn add_section(&mut self);

    fn section_count(&self) -> usize;

    fn section(&self, index: i32) -> Option<&Self::Section>;

    fn section_mut(&mut self, index: i32) -> Option<&mut Self::Section>;

    /// The y coordinate of the highest non-air block at a local `x`/`z`,
    /// or 0 for an empty column.
    fn height_at(&self, x: i32, z: i32) -> u32;

    /// Per-frame work on the main thread.
    fn tick(&mut self);

    /// Submits every buffered section mesh and returns the number of faces
    /// submitted.
    fn draw(&self, renderer: &mut dyn ChunkRenderer) -> usize;

    fn has_delete_flag(&self) -> bool;

    /// Marks the column as queued for eviction. The flag is never cleared.
    fn set_delete_flag(&mut self);

    /// Whether terrain has been generated; only such columns are drawn.
    fn has_generated_block_data(&self) -> bool;
}

/// Grows `column` until section `index` exists.
pub fn ensure_section<C: Column>(column: &mut C, index: i32) {
    if index < 0 {
        return;
    }
    while column.section_count() <= index as usize {
        column.add_section();
    }
}
