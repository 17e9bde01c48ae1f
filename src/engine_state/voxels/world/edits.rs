//! # Block Edits
//!
//! Block placements are not written straight into sections. [`World::set_block`]
//! queues a [`PendingEdit`] and notifies the surrounding blocks; once per tick
//! [`World::regenerate_chunks`] applies the whole queue and rebuilds each
//! touched section's mesh exactly once.
//!
//! ## Boundary propagation
//! A block on the face of a section is part of the neighbouring section's
//! visible surface too. For each axis independently, an edit at local
//! coordinate 0 also remeshes the section one step negative on that axis, and
//! an edit at `CHUNK_SIZE - 1` the section one step positive. Neighbour
//! sections that do not exist yet are created first. There are no sections
//! below `y = 0`. Each section is meshed against the boundary layers of its
//! neighbours, so a block placed on one side of a boundary changes the faces
//! of the section on the other side.

use std::collections::HashSet;
use std::mem;
use std::sync::{MutexGuard, PoisonError};

use cgmath::{Point3, Vector3};
use log::{debug, warn};

use super::World;
use crate::engine_state::voxels::block::behaviour::{block_to_world, BlockAccess};
use crate::engine_state::voxels::block::Block;
use crate::engine_state::voxels::chunk::position::{
    block_to_column_local_pos, block_to_local_pos, block_to_section_pos, section_to_column_pos,
    world_to_block_pos,
};
use crate::engine_state::voxels::chunk::{ensure_section, Column, SectionPosition, CHUNK_SIZE};

/// A block placement waiting for the next batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingEdit {
    pub block: Block,
    pub position: Point3<f32>,
}

/// The world as seen by block behaviours during a notification.
///
/// Reads see queued edits; writes are queued and their neighbours are
/// notified on the next tick instead of straight away.
struct NeighbourAccess<'a, C: Column> {
    world: &'a World<C>,
}

impl<C: Column> BlockAccess for NeighbourAccess<'_, C> {
    fn get_block(&self, position: Point3<f32>) -> Block {
        let target = world_to_block_pos(position);
        let pending = self
            .world
            .lock_pending_edits()
            .iter()
            .rev()
            .find(|edit| world_to_block_pos(edit.position) == target)
            .map(|edit| edit.block);

        pending.unwrap_or_else(|| self.world.get_block(position))
    }

    fn set_block(&self, position: Point3<f32>, block: Block) {
        self.world.lock_pending_edits().push(PendingEdit { block, position });
        self.world
            .deferred_notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(world_to_block_pos(position));
    }

    fn is_obstacle(&self, position: Point3<f32>) -> bool {
        self.world.catalog().is_obstacle(self.get_block(position))
    }
}

impl<C: Column> World<C> {
    fn lock_pending_edits(&self) -> MutexGuard<'_, Vec<PendingEdit>> {
        self.pending_edits.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues a block placement and notifies the 3x3x3 blocks around it.
    ///
    /// The block is written into its section by the next
    /// [`update_chunks`](World::update_chunks).
    ///
    /// # Arguments
    /// * `position` - World position inside the target block
    /// * `block` - The block to place (`Block::AIR` removes)
    pub fn set_block(&self, position: Point3<f32>, block: Block) {
        self.lock_pending_edits().push(PendingEdit { block, position });
        self.notify_neighbours(&[world_to_block_pos(position)]);
    }

    pub fn pending_edit_count(&self) -> usize {
        self.lock_pending_edits().len()
    }

    /// Runs the behaviours of every block in the 3x3x3 cubes around
    /// `centres`.
    ///
    /// Which blocks react is decided before any behaviour runs, so a block
    /// moved by one behaviour is not picked up again in the same pass.
    fn notify_neighbours(&self, centres: &[Point3<i32>]) {
        let access = NeighbourAccess { world: self };

        let mut seen = HashSet::new();
        let mut reactions = Vec::new();
        for &centre in centres {
            for y in -1..=1 {
                for x in -1..=1 {
                    for z in -1..=1 {
                        let position = centre + Vector3::new(x, y, z);
                        if !seen.insert(position) {
                            continue;
                        }
                        let block = access.get_block(block_to_world(position));
                        if let Some(behaviour) = self.catalog().behaviour(block.get_type()) {
                            reactions.push((behaviour.clone(), position));
                        }
                    }
                }
            }
        }

        for (behaviour, position) in reactions {
            behaviour.on_neighbour_changed(&access, position);
        }
    }

    /// Notifies the neighbours of blocks that behaviours changed during the
    /// previous tick.
    pub(super) fn flush_deferred_notifications(&self) {
        let centres = mem::take(
            &mut *self
                .deferred_notifications
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        if !centres.is_empty() {
            self.notify_neighbours(&centres);
        }
    }

    /// Applies every pending edit and remeshes the affected sections.
    ///
    /// The queue is taken as a whole, so edits queued while this runs are
    /// applied on the next call. Edits in unloaded columns or below `y = 0`
    /// are dropped.
    ///
    /// # Returns
    /// The positions of the sections that were remeshed.
    pub(super) fn regenerate_chunks(&self) -> HashSet<SectionPosition> {
        let edits = mem::take(&mut *self.lock_pending_edits());
        let mut to_update = HashSet::new();
        if edits.is_empty() {
            return to_update;
        }

        for edit in &edits {
            let block_position = world_to_block_pos(edit.position);
            let section_position = block_to_section_pos(block_position);
            if section_position.y < 0 {
                debug!("Dropping edit below the world at {:?}", block_position);
                continue;
            }

            let Some(column) = self.shared.chunks.get(section_to_column_pos(section_position)) else {
                warn!("Dropping edit in unloaded column at {:?}", block_position);
                continue;
            };
            column
                .get_mut()
                .set_block(block_to_column_local_pos(block_position), edit.block);
            to_update.insert(section_position);

            let local = block_to_local_pos(block_position);
            for (coordinate, step) in [
                (local.x, Vector3::unit_x()),
                (local.y, Vector3::unit_y()),
                (local.z, Vector3::unit_z()),
            ] {
                if coordinate == 0 {
                    self.queue_section(&mut to_update, section_position - step);
                } else if coordinate == CHUNK_SIZE - 1 {
                    self.queue_section(&mut to_update, section_position + step);
                }
            }
        }

        for position in &to_update {
            self.shared.remesh_section(*position, true);
        }

        debug!(
            "Applied {} edits, remeshed {} sections",
            edits.len(),
            to_update.len()
        );
        to_update
    }

    /// Adds a neighbouring section to the remesh set, growing its column if
    /// the section does not exist yet.
    fn queue_section(&self, to_update: &mut HashSet<SectionPosition>, position: SectionPosition) {
        if position.y < 0 {
            return;
        }
        let Some(column) = self.shared.chunks.get(section_to_column_pos(position)) else {
            return;
        };
        ensure_section(&mut *column.get_mut(), position.y);
        to_update.insert(position);
    }
}

impl<C: Column> BlockAccess for World<C> {
    fn get_block(&self, position: Point3<f32>) -> Block {
        World::get_block(self, position)
    }

    fn set_block(&self, position: Point3<f32>, block: Block) {
        World::set_block(self, position, block)
    }

    fn is_obstacle(&self, position: Point3<f32>) -> bool {
        self.catalog().is_obstacle(World::get_block(self, position))
    }
}
