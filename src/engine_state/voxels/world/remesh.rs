//! # Remeshing
//!
//! A section's mesh depends on the blocks just outside it: a boundary face
//! is hidden when the block across the boundary is opaque. Before a section
//! is meshed, the world reads the facing boundary layer of each of its six
//! neighbour sections, which may live in other columns.
//!
//! Columns are locked one at a time. The neighbour layers are read first,
//! each under a short read lock, and only then is the section's own column
//! locked for writing, so the worker and the main thread never wait on each
//! other while holding a column.

use cgmath::Point2;

use super::WorldShared;
use crate::engine_state::rendering::SectionNeighbours;
use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::chunk::position::section_to_column_pos;
use crate::engine_state::voxels::chunk::{Column, ColumnPosition, Section, SectionPosition};

impl<C: Column> WorldShared<C> {
    /// Boundary layers of the loaded sections around `position`.
    pub(super) fn section_neighbours(&self, position: SectionPosition) -> SectionNeighbours {
        let mut neighbours = SectionNeighbours::open();
        for side in BlockSide::all() {
            let adjacent = position + side.normal();
            if adjacent.y < 0 {
                continue;
            }
            let Some(column) = self.chunks.get(section_to_column_pos(adjacent)) else {
                continue;
            };
            let layer = column
                .get()
                .section(adjacent.y)
                .map(|section| section.edge_layer(side.opposite()));
            if let Some(layer) = layer {
                neighbours.set(side, layer);
            }
        }
        neighbours
    }

    /// Rebuilds the mesh of the section at `position` against its current
    /// neighbours. With `upload`, the mesh is buffered straight away;
    /// otherwise the owning column's next tick uploads it.
    ///
    /// # Returns
    /// `false` if the column or the section does not exist.
    pub(super) fn remesh_section(&self, position: SectionPosition, upload: bool) -> bool {
        let Some(column) = self.chunks.get(section_to_column_pos(position)) else {
            return false;
        };
        let neighbours = self.section_neighbours(position);

        let mut column = column.get_mut();
        let Some(section) = column.section_mut(position.y) else {
            return false;
        };
        section.make_mesh(&neighbours);
        if upload {
            section.buffer_mesh();
        }
        true
    }

    /// Meshes a freshly generated column, then remeshes the generated
    /// columns beside it, whose faces towards it may now be hidden.
    ///
    /// # Returns
    /// The number of sections meshed.
    pub(super) fn mesh_generated_column(&self, position: ColumnPosition) -> usize {
        let mut meshed = self.mesh_column(position);

        for (dx, dz) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            let beside = Point2::new(position.x + dx, position.y + dz);
            let generated = self
                .chunks
                .get(beside)
                .map_or(false, |column| column.get().has_generated_block_data());
            if generated {
                meshed += self.mesh_column(beside);
            }
        }
        meshed
    }

    fn mesh_column(&self, position: ColumnPosition) -> usize {
        let Some(column) = self.chunks.get(position) else {
            return 0;
        };
        let sections = column.get().section_count() as i32;

        (0..sections)
            .map(|y| SectionPosition::new(position.x, y, position.y))
            .filter(|&section| self.remesh_section(section, false))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cgmath::Point3;

    use super::*;
    use crate::core::MtResource;
    use crate::engine_state::voxels::block::{
        block_catalog::BlockCatalog, block_type::BlockType, Block,
    };
    use crate::engine_state::voxels::chunk::StackedColumn;
    use crate::engine_state::voxels::world::{World, WorldSettings};

    fn world() -> World<StackedColumn> {
        World::without_worker(
            WorldSettings {
                world_size: 3,
                is_infinite_terrain: false,
                seed: 0,
            },
            Arc::new(BlockCatalog::builtin()),
            MtResource::new(Point3::new(24.0, 40.0, 24.0)),
        )
        .unwrap()
    }

    #[test]
    fn test_neighbours_read_across_columns() {
        let world = world();
        world.set_block(Point3::new(16.0, 5.0, 40.0), Block::new(BlockType::STONE));
        world.set_block(Point3::new(15.0, 21.0, 40.0), Block::new(BlockType::STONE));
        world.update_chunks();

        let neighbours = world.shared.section_neighbours(Point3::new(0, 0, 2));

        let back = neighbours.layer(BlockSide::BACK).unwrap();
        assert_eq!(back.count_ones(), 1);
        let top = neighbours.layer(BlockSide::TOP).unwrap();
        assert_eq!(top.count_ones(), 0);
        assert!(neighbours.layer(BlockSide::BOTTOM).is_none());
        assert!(neighbours.layer(BlockSide::LEFT).is_none());
    }

    #[test]
    fn test_missing_section_is_not_remeshed() {
        let world = world();

        assert!(!world.shared.remesh_section(Point3::new(1, 0, 1), true));
        assert!(!world.shared.remesh_section(Point3::new(40, 0, 40), true));
    }
}
