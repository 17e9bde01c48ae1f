//! # Stacked Column
//!
//! The stock [`Column`]: a `Vec` of [`ChunkSection`]s from `y = 0` upwards.
//!
//! Generation runs on the streaming worker and only fills the column from the
//! terrain generator. The world meshes the new sections afterwards, once it
//! can read the neighbouring columns' boundary layers, and [`Column::tick`]
//! uploads finished meshes on the main thread, which is where a real graphics
//! backend needs buffer writes to happen.

use std::sync::Arc;

use cgmath::Point3;
use log::debug;

use super::terrain::TerrainGenerator;
use super::{
    ensure_section, ChunkSection, Column, ColumnPosition, Section, CHUNK_SIZE,
};
use crate::core::WorldError;
use crate::engine_state::rendering::ChunkRenderer;
use crate::engine_state::voxels::block::{block_catalog::BlockCatalog, Block};
use crate::engine_state::voxels::world::settings::WorldSettings;

pub struct StackedColumn {
    position: ColumnPosition,
    sections: Vec<ChunkSection>,
    catalog: Arc<BlockCatalog>,
    terrain: TerrainGenerator,
    has_delete_flag: bool,
    has_generated_block_data: bool,
}

impl StackedColumn {
    pub fn sections(&self) -> &[ChunkSection] {
        &self.sections
    }

    fn section_index(y: i32) -> i32 {
        y.div_euclid(CHUNK_SIZE)
    }
}

impl Column for StackedColumn {
    type Section = ChunkSection;

    fn new(position: ColumnPosition, settings: &WorldSettings, catalog: Arc<BlockCatalog>) -> Self {
        StackedColumn {
            position,
            sections: Vec::new(),
            catalog,
            terrain: TerrainGenerator::new(settings.seed),
            has_delete_flag: false,
            has_generated_block_data: false,
        }
    }

    fn position(&self) -> ColumnPosition {
        self.position
    }

    fn get_block(&self, local: Point3<i32>) -> Block {
        if local.y < 0 {
            return Block::AIR;
        }
        match self.sections.get(Self::section_index(local.y) as usize) {
            Some(section) => {
                section.get_block(Point3::new(local.x, local.y.rem_euclid(CHUNK_SIZE), local.z))
            }
            None => Block::AIR,
        }
    }

    fn set_block(&mut self, local: Point3<i32>, block: Block) {
        if local.y < 0 {
            return;
        }
        let index = Self::section_index(local.y);
        ensure_section(self, index);
        self.sections[index as usize]
            .set_block(Point3::new(local.x, local.y.rem_euclid(CHUNK_SIZE), local.z), block);
    }

    fn try_generate(&mut self) -> Result<bool, WorldError> {
        if self.has_generated_block_data {
            return Ok(false);
        }

        let origin_x = self.position.x * CHUNK_SIZE;
        let origin_z = self.position.y * CHUNK_SIZE;

        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let surface = self.terrain.surface_height(origin_x + x, origin_z + z);
                let top = surface.max(super::terrain::WATER_LEVEL);
                for y in 0..=top {
                    let block = self.terrain.block_at(y, surface);
                    if !block.is_air() {
                        self.set_block(Point3::new(x, y, z), block);
                    }
                }
                if let Some(plant) = self.terrain.decoration(origin_x + x, origin_z + z, surface) {
                    self.set_block(Point3::new(x, surface + 1, z), plant);
                }
            }
        }

        self.has_generated_block_data = true;

        debug!(
            "Generated column ({}, {}) with {} sections",
            self.position.x,
            self.position.y,
            self.sections.len()
        );
        Ok(true)
    }

    fn add_section(&mut self) {
        let index = self.sections.len() as i32;
        self.sections.push(ChunkSection::new(
            Point3::new(self.position.x, index, self.position.y),
            self.catalog.clone(),
        ));
    }

    fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn section(&self, index: i32) -> Option<&ChunkSection> {
        if index < 0 {
            return None;
        }
        self.sections.get(index as usize)
    }

    fn section_mut(&mut self, index: i32) -> Option<&mut ChunkSection> {
        if index < 0 {
            return None;
        }
        self.sections.get_mut(index as usize)
    }

    fn height_at(&self, x: i32, z: i32) -> u32 {
        let top = self.sections.len() as i32 * CHUNK_SIZE;
        (0..top)
            .rev()
            .find(|&y| !self.get_block(Point3::new(x, y, z)).is_air())
            .unwrap_or(0) as u32
    }

    fn tick(&mut self) {
        for section in &mut self.sections {
            if section.has_pending_mesh() {
                section.buffer_mesh();
            }
        }
    }

    fn draw(&self, renderer: &mut dyn ChunkRenderer) -> usize {
        self.sections
            .iter()
            .map(|section| section.draw(renderer))
            .sum()
    }

    fn has_delete_flag(&self) -> bool {
        self.has_delete_flag
    }

    fn set_delete_flag(&mut self) {
        self.has_delete_flag = true;
    }

    fn has_generated_block_data(&self) -> bool {
        self.has_generated_block_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::{FrameRenderer, SectionNeighbours};
    use crate::engine_state::voxels::block::block_type::BlockType;
    use crate::engine_state::voxels::chunk::terrain::WATER_LEVEL;
    use cgmath::Point2;

    fn column() -> StackedColumn {
        StackedColumn::new(
            Point2::new(3, -2),
            &WorldSettings::default(),
            Arc::new(BlockCatalog::builtin()),
        )
    }

    #[test]
    fn test_set_block_grows_sections_contiguously() {
        let mut column = column();
        assert_eq!(column.section_count(), 0);

        column.set_block(Point3::new(1, 40, 1), Block::new(BlockType::STONE));

        assert_eq!(column.section_count(), 3);
        assert_eq!(
            column.get_block(Point3::new(1, 40, 1)).get_type(),
            BlockType::STONE
        );
        assert_eq!(column.sections()[2].position(), Point3::new(3, 2, -2));
        assert!(column.get_block(Point3::new(1, 200, 1)).is_air());
        assert!(column.get_block(Point3::new(1, -1, 1)).is_air());
    }

    #[test]
    fn test_generate_only_once() {
        let mut column = column();

        assert!(column.try_generate().unwrap());
        assert!(column.has_generated_block_data());
        assert!(!column.try_generate().unwrap());
    }

    #[test]
    fn test_generated_column_has_ground() {
        let mut column = column();
        column.try_generate().unwrap();

        for (x, z) in [(0, 0), (7, 9), (15, 15)] {
            let height = column.height_at(x, z) as i32;
            assert!(height >= WATER_LEVEL);
            assert!(!column.get_block(Point3::new(x, 0, z)).is_air());
        }
    }

    #[test]
    fn test_generation_leaves_meshing_to_the_world() {
        let mut column = column();
        column.try_generate().unwrap();

        assert!(column.section_count() > 0);
        assert!(column.sections().iter().all(|s| s.mesh_builds() == 0));
        assert!(column.section(column.section_count() as i32).is_none());
        assert!(column.section(-1).is_none());
    }

    #[test]
    fn test_meshes_upload_on_tick() {
        let mut column = column();
        column.try_generate().unwrap();
        for index in 0..column.section_count() as i32 {
            if let Some(section) = column.section_mut(index) {
                section.make_mesh(&SectionNeighbours::open());
            }
        }
        let mut renderer = FrameRenderer::new();

        assert_eq!(column.draw(&mut renderer), 0);

        column.tick();
        let faces = column.draw(&mut renderer);
        assert!(faces > 0);
        assert_eq!(faces, renderer.faces_drawn);
        assert!(column.sections().iter().all(|s| s.uploads() == 1));
    }

    #[test]
    fn test_delete_flag_is_one_shot() {
        let mut column = column();
        assert!(!column.has_delete_flag());
        column.set_delete_flag();
        column.set_delete_flag();
        assert!(column.has_delete_flag());
    }
}
