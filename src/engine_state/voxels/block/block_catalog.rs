//! # Block Catalog
//!
//! The catalog maps every [`BlockType`] to its [`BlockData`] and, for blocks
//! that react to their surroundings, to a [`BlockBehaviour`]. The world and its
//! columns only ever read it, so it is shared behind an `Arc` once built.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use cgmath::Vector2;
use log::info;

use super::behaviour::{BlockBehaviour, FallingBlock, SupportedBlock};
use super::block_data::BlockData;
use super::block_type::{BlockState, BlockType, MeshStyle, MeshType};
use super::Block;
use crate::core::CatalogError;

/// File names (without extension) of the stock block definitions.
pub const DEFAULT_BLOCK_NAMES: [&str; 12] = [
    "Air",
    "Grass",
    "Dirt",
    "Stone",
    "OakBark",
    "OakLeaf",
    "Sand",
    "Water",
    "Cactus",
    "Rose",
    "TallGrass",
    "DeadShrub",
];

/// Typed block properties indexed by block type.
#[derive(Default)]
pub struct BlockCatalog {
    data: HashMap<BlockType, BlockData>,
    behaviours: HashMap<BlockType, Arc<dyn BlockBehaviour>>,
}

impl fmt::Debug for BlockCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockCatalog")
            .field("blocks", &self.data.len())
            .field("behaviours", &self.behaviours.len())
            .finish()
    }
}

impl BlockCatalog {
    /// Loads every named definition from `directory`.
    ///
    /// The first file that fails to load aborts the whole catalog.
    /// Blocks flagged `Update` get their stock behaviour registered.
    pub fn load(directory: &Path, names: &[&str]) -> Result<Self, CatalogError> {
        let mut catalog = BlockCatalog::default();
        for name in names {
            catalog.insert(BlockData::load_from(directory, name)?);
        }
        catalog.register_default_behaviours();

        info!(
            "Loaded {} block definitions from {}",
            catalog.data.len(),
            directory.display()
        );
        Ok(catalog)
    }

    /// The stock block set, without touching the filesystem.
    pub fn builtin() -> Self {
        let mut catalog = BlockCatalog::default();
        for block_type in BlockType::ALL {
            catalog.insert(builtin_data(block_type));
        }
        catalog.register_default_behaviours();
        catalog
    }

    /// Adds or replaces the definition for `data.id`.
    pub fn insert(&mut self, data: BlockData) {
        self.data.insert(data.id, data);
    }

    /// Attaches a behaviour to a block type, replacing any previous one.
    pub fn register_behaviour(&mut self, block_type: BlockType, behaviour: Arc<dyn BlockBehaviour>) {
        self.behaviours.insert(block_type, behaviour);
    }

    /// Registers the stock behaviours for blocks whose definition asks for
    /// updates: sand falls, plants need support.
    pub fn register_default_behaviours(&mut self) {
        let updating: Vec<BlockType> = self
            .data
            .values()
            .filter(|data| data.can_update)
            .map(|data| data.id)
            .collect();

        for block_type in updating {
            match block_type {
                BlockType::SAND => self.register_behaviour(block_type, Arc::new(FallingBlock)),
                BlockType::ROSE | BlockType::TALL_GRASS | BlockType::DEAD_SHRUB | BlockType::CACTUS => {
                    self.register_behaviour(block_type, Arc::new(SupportedBlock))
                }
                _ => {}
            }
        }
    }

    pub fn get(&self, block_type: BlockType) -> Option<&BlockData> {
        self.data.get(&block_type)
    }

    pub fn behaviour(&self, block_type: BlockType) -> Option<&Arc<dyn BlockBehaviour>> {
        self.behaviours.get(&block_type)
    }

    /// Opaque blocks hide their neighbours' faces. A block without a
    /// definition is treated as opaque unless it is air.
    pub fn is_opaque(&self, block: Block) -> bool {
        match self.get(block.get_type()) {
            Some(data) => data.is_opaque,
            None => !block.is_air(),
        }
    }

    /// Obstacles stop movement and hold up falling blocks and plants.
    pub fn is_obstacle(&self, block: Block) -> bool {
        match self.get(block.get_type()) {
            Some(data) => data.is_obstacle,
            None => !block.is_air(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn builtin_data(block_type: BlockType) -> BlockData {
    let name = DEFAULT_BLOCK_NAMES[block_type as usize];
    let mut data = BlockData::new(name, block_type);

    let (top, side, bottom) = match block_type {
        BlockType::AIR => ((0, 0), (0, 0), (0, 0)),
        BlockType::GRASS => ((0, 0), (1, 0), (2, 0)),
        BlockType::DIRT => ((2, 0), (2, 0), (2, 0)),
        BlockType::STONE => ((3, 0), (3, 0), (3, 0)),
        BlockType::OAK_BARK => ((5, 0), (4, 0), (5, 0)),
        BlockType::OAK_LEAF => ((6, 0), (6, 0), (6, 0)),
        BlockType::SAND => ((7, 0), (7, 0), (7, 0)),
        BlockType::WATER => ((8, 0), (8, 0), (8, 0)),
        BlockType::CACTUS => ((9, 0), (10, 0), (9, 0)),
        BlockType::ROSE => ((11, 0), (11, 0), (11, 0)),
        BlockType::TALL_GRASS => ((12, 0), (12, 0), (12, 0)),
        BlockType::DEAD_SHRUB => ((13, 0), (13, 0), (13, 0)),
    };
    data.top_texture_coords = Vector2::new(top.0, top.1);
    data.side_texture_coords = Vector2::new(side.0, side.1);
    data.bottom_texture_coords = Vector2::new(bottom.0, bottom.1);

    match block_type {
        BlockType::AIR => {
            data.state = BlockState::GAS;
        }
        BlockType::WATER => {
            data.mesh_type = MeshType::LIQUID;
            data.state = BlockState::LIQUID;
        }
        BlockType::ROSE | BlockType::TALL_GRASS | BlockType::DEAD_SHRUB => {
            data.mesh_type = MeshType::FLORA;
            data.mesh_style = MeshStyle::X_STYLE;
            data.can_update = true;
        }
        BlockType::CACTUS => {
            data.mesh_type = MeshType::FLORA;
            data.is_obstacle = true;
            data.can_update = true;
        }
        BlockType::OAK_LEAF => {
            data.is_obstacle = true;
        }
        BlockType::SAND => {
            data.is_opaque = true;
            data.is_obstacle = true;
            data.can_update = true;
        }
        BlockType::GRASS | BlockType::DIRT | BlockType::STONE | BlockType::OAK_BARK => {
            data.is_opaque = true;
            data.is_obstacle = true;
        }
    }

    data
}
