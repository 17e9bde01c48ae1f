//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel world.
//! It includes block identifiers, block face handling, block definition
//! parsing, the catalog of block properties, and block behaviours.

use block_type::BlockType;

pub mod behaviour;
pub mod block_catalog;
pub mod block_data;
pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Represents a single voxel block in the world.
///
/// This is a lightweight structure that stores only the block identifier.
/// Properties such as opacity are looked up in the
/// [`BlockCatalog`](block_catalog::BlockCatalog).
///
/// # Memory Layout
/// `#[repr(C)]` keeps the layout stable so section block arrays can be viewed
/// as raw bytes.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq, Eq, Hash, Default)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
}

impl Block {
    /// The empty block. Unloaded space reads as this.
    pub const AIR: Block = Block {
        block_type: BlockType::AIR as BlockTypeSize,
    };

    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
        }
    }

    /// The rich type of this block.
    pub fn get_type(&self) -> BlockType {
        BlockType::from_int(self.block_type)
    }

    pub fn is_air(&self) -> bool {
        *self == Block::AIR
    }
}

impl From<BlockType> for Block {
    fn from(block_type: BlockType) -> Self {
        Block::new(block_type)
    }
}
