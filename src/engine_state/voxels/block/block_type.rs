//! # Block Type Module
//!
//! This module defines the identifiers of every block in the voxel world
//! together with the enumerated properties a block definition file selects by
//! number (`Mesht`, `Style` and `State`).

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminants are the numbers written after `ID` in a block definition
/// file, and are what a [`Block`](super::Block) stores. The `FromPrimitive`
/// derive turns those numbers back into the enum.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Unloaded parts of the world read as this.
    AIR = 0,
    GRASS = 1,
    DIRT = 2,
    STONE = 3,
    OAK_BARK = 4,
    OAK_LEAF = 5,
    SAND = 6,
    WATER = 7,
    CACTUS = 8,
    ROSE = 9,
    TALL_GRASS = 10,
    DEAD_SHRUB = 11,
}

impl BlockType {
    /// Every block type, in identifier order.
    pub const ALL: [BlockType; 12] = [
        BlockType::AIR,
        BlockType::GRASS,
        BlockType::DIRT,
        BlockType::STONE,
        BlockType::OAK_BARK,
        BlockType::OAK_LEAF,
        BlockType::SAND,
        BlockType::WATER,
        BlockType::CACTUS,
        BlockType::ROSE,
        BlockType::TALL_GRASS,
        BlockType::DEAD_SHRUB,
    ];

    /// Converts a stored `BlockTypeSize` back into a `BlockType`.
    ///
    /// Unknown values decode as `AIR`, so corrupt block data shows up as a
    /// hole rather than taking the process down.
    pub fn from_int(btype: BlockTypeSize) -> Self {
        BlockType::from_u8(btype).unwrap_or(BlockType::AIR)
    }

    /// Looks up a block type by the number used in definition files.
    pub fn from_id(id: i64) -> Option<Self> {
        BlockType::from_i64(id)
    }
}

/// How the mesher should treat a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum MeshType {
    SOLID = 0,
    FLORA = 1,
    LIQUID = 2,
}

/// Geometry emitted for a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum MeshStyle {
    /// A full cube, one quad per visible side.
    BLOCK = 0,
    /// Two crossed diagonal quads, used for plants.
    X_STYLE = 1,
}

/// Physical state of a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockState {
    SOLID = 0,
    LIQUID = 1,
    GAS = 2,
}
