//! # Block Behaviours
//!
//! Blocks can react when something next to them changes. Whenever a block is
//! placed, every block in the 3x3x3 cube around it (the placed block
//! included) has its behaviour's [`BlockBehaviour::on_neighbour_changed`]
//! called straight away, before the edit has been applied to any section.
//!
//! Behaviours see the world through a [`BlockAccess`]. Reads through it
//! include edits still waiting in the pending queue, so a behaviour reacting to
//! a removal sees the block as already gone. Edits a behaviour makes are queued
//! for the next batch and the blocks around them are notified on the tick
//! after that batch lands, which keeps chains of reactions (sand falling one
//! block per tick) from recursing inside a single call.

use cgmath::{Point3, Vector3};

use super::{block_type::BlockType, Block};

/// The view of the world handed to block behaviours.
pub trait BlockAccess {
    /// The block at a world position. Unloaded space reads as air.
    fn get_block(&self, position: Point3<f32>) -> Block;

    /// Queues a block placement.
    fn set_block(&self, position: Point3<f32>, block: Block);

    /// Whether the block at `position` stops movement.
    fn is_obstacle(&self, position: Point3<f32>) -> bool;
}

/// Reaction of a block type to changes around it.
pub trait BlockBehaviour: Send + Sync {
    /// Called for the block at `position` when a block in its 3x3x3
    /// neighbourhood (or the block itself) is set.
    fn on_neighbour_changed(&self, world: &dyn BlockAccess, position: Point3<i32>);
}

/// Converts an integer block coordinate to the world position of the block's
/// minimum corner.
pub fn block_to_world(position: Point3<i32>) -> Point3<f32> {
    Point3::new(position.x as f32, position.y as f32, position.z as f32)
}

/// Falls one block per tick while there is nothing solid underneath.
pub struct FallingBlock;

impl BlockBehaviour for FallingBlock {
    fn on_neighbour_changed(&self, world: &dyn BlockAccess, position: Point3<i32>) {
        let below = position + Vector3::new(0, -1, 0);
        if below.y < 0 {
            return;
        }

        let here = block_to_world(position);
        let below_world = block_to_world(below);
        if world.is_obstacle(below_world) {
            return;
        }

        let block = world.get_block(here);
        world.set_block(here, Block::AIR);
        world.set_block(below_world, block);
    }
}

/// Breaks (turns to air) when the block underneath stops being an obstacle.
/// Used for plants.
pub struct SupportedBlock;

impl BlockBehaviour for SupportedBlock {
    fn on_neighbour_changed(&self, world: &dyn BlockAccess, position: Point3<i32>) {
        let below = block_to_world(position + Vector3::new(0, -1, 0));
        if !world.is_obstacle(below) {
            world.set_block(block_to_world(position), Block::new(BlockType::AIR));
        }
    }
}
