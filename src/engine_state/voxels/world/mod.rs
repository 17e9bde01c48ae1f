//! # World Module
//!
//! The `World` owns every loaded column and coordinates the two threads that
//! touch them:
//!
//! - the **streaming worker** (see [`streaming`]) generates columns in a ring
//!   that grows outwards from the camera, and flags far-away columns for
//!   removal on infinite worlds;
//! - the **main thread** calls [`World::update_chunks`] once per frame to apply
//!   queued block edits (see [`edits`]), tick every column and remove the
//!   flagged ones, then [`World::draw`] to submit meshes.
//!
//! ## Shared state
//! Everything the worker needs lives in a [`WorldShared`] behind an `Arc`: the
//! settings, the block catalog, the column store, the camera position and the
//! streaming state (loading distance and delete queue) guarded by one mutex.
//! The pending edit queue belongs to the main-thread side.
//!
//! ## Unloaded space
//! Reads from columns that are not loaded return air. Edits aimed at them are
//! dropped when the batch is applied.
//!
//! ## Teardown
//! Dropping the world clears the running flag and joins the worker. The
//! worker finishes its current iteration first.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use cgmath::{Point2, Point3};
use log::{debug, info, warn};

use super::block::{block_catalog::BlockCatalog, Block};
use super::chunk::position::{block_to_column_local_pos, world_to_block_pos, world_to_column_pos};
use super::chunk::{Column, ColumnPosition, SectionPosition, StackedColumn, CHUNK_SIZE};
use crate::core::{MtResource, WorldError};
use crate::engine_state::rendering::ChunkRenderer;

pub mod chunk_map;
pub mod edits;
mod remesh;
pub mod settings;
pub mod streaming;

pub use chunk_map::ChunkMap;
pub use edits::PendingEdit;
pub use settings::WorldSettings;
pub use streaming::StreamingStep;

/// Streaming bookkeeping shared by the worker and the deletion drain.
pub(crate) struct StreamingState {
    loading_distance: i32,
    delete_queue: Vec<ColumnPosition>,
}

/// The part of the world the streaming worker holds on to.
pub struct WorldShared<C: Column> {
    settings: WorldSettings,
    catalog: Arc<BlockCatalog>,
    chunks: ChunkMap<C>,
    camera: MtResource<Point3<f32>>,
    is_running: AtomicBool,
    streaming: Mutex<StreamingState>,
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

/// What one [`World::update_chunks`] call did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Sections whose mesh was rebuilt from pending edits.
    pub remeshed_sections: HashSet<SectionPosition>,
    /// Columns removed from the store.
    pub evicted_columns: usize,
}

/// A streamed voxel world made of columns of type `C`.
pub struct World<C: Column = StackedColumn> {
    shared: Arc<WorldShared<C>>,
    pending_edits: Mutex<Vec<PendingEdit>>,
    /// Blocks changed by behaviours; their neighbours are notified next tick.
    deferred_notifications: Mutex<Vec<Point3<i32>>>,
    faces_drawn: AtomicUsize,
    worker: Option<JoinHandle<()>>,
}

impl<C: Column> World<C> {
    /// Creates a world and starts its streaming worker.
    ///
    /// The 3x3 columns around the world centre are created up front so there
    /// is something to stand on straight away; the worker generates them
    /// first.
    ///
    /// # Arguments
    /// * `settings` - World size, terrain mode and seed
    /// * `catalog` - Block properties and behaviours
    /// * `camera` - Camera position the worker centres its scan on
    ///
    /// # Returns
    /// The running world, or a `WorldError` if the settings are invalid or
    /// the worker thread cannot be started.
    pub fn new(
        settings: WorldSettings,
        catalog: Arc<BlockCatalog>,
        camera: MtResource<Point3<f32>>,
    ) -> Result<Self, WorldError> {
        let mut world = Self::without_worker(settings, catalog, camera)?;
        let worker = streaming::spawn_worker(world.shared.clone()).map_err(WorldError::Worker)?;
        world.worker = Some(worker);
        Ok(world)
    }

    /// Creates a world without a streaming thread. Streaming only advances
    /// through [`World::step_streaming`].
    pub fn without_worker(
        settings: WorldSettings,
        catalog: Arc<BlockCatalog>,
        camera: MtResource<Point3<f32>>,
    ) -> Result<Self, WorldError> {
        settings.validate()?;

        let shared = Arc::new(WorldShared {
            chunks: ChunkMap::new(),
            catalog,
            camera,
            is_running: AtomicBool::new(true),
            streaming: Mutex::new(StreamingState {
                loading_distance: 1,
                delete_queue: Vec::new(),
            }),
            settings,
        });

        let centre = shared.settings.half_size();
        for x in -1..=1 {
            for z in -1..=1 {
                let position = Point2::new(centre + x, centre + z);
                shared.chunks.get_or_insert_with(position, || {
                    C::new(position, &shared.settings, shared.catalog.clone())
                });
            }
        }

        info!(
            "Created world: size {}, infinite terrain {}, seed {}",
            shared.settings.world_size, shared.settings.is_infinite_terrain, shared.settings.seed
        );

        Ok(World {
            shared,
            pending_edits: Mutex::new(Vec::new()),
            deferred_notifications: Mutex::new(Vec::new()),
            faces_drawn: AtomicUsize::new(0),
            worker: None,
        })
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.shared.settings
    }

    pub fn catalog(&self) -> &BlockCatalog {
        &self.shared.catalog
    }

    /// Runs one streaming iteration on the calling thread.
    pub fn step_streaming(&self) -> Result<StreamingStep, WorldError> {
        self.shared.step_streaming()
    }

    pub fn loading_distance(&self) -> i32 {
        self.shared.lock_streaming().loading_distance
    }

    /// Number of columns waiting in the delete queue.
    pub fn queued_deletions(&self) -> usize {
        self.shared.lock_streaming().delete_queue.len()
    }

    pub fn loaded_columns(&self) -> usize {
        self.shared.chunks.len()
    }

    pub fn exists_at(&self, position: ColumnPosition) -> bool {
        self.shared.chunks.exists_at(position)
    }

    pub fn column(&self, position: ColumnPosition) -> Option<MtResource<C>> {
        self.shared.chunks.get(position)
    }

    /// Faces submitted by the last [`World::draw`].
    pub fn faces_drawn(&self) -> usize {
        self.faces_drawn.load(Ordering::Relaxed)
    }

    /// The block at a world position, or air if its column is not loaded.
    pub fn get_block(&self, position: Point3<f32>) -> Block {
        let block = world_to_block_pos(position);
        match self.shared.chunks.get(world_to_column_pos(position)) {
            Some(column) => column.get().get_block(block_to_column_local_pos(block)),
            None => Block::AIR,
        }
    }

    /// The height of the highest non-air block at a world `x`/`z`.
    ///
    /// # Returns
    /// `None` if the column holding `position` is not loaded.
    pub fn get_height_at(&self, position: Point3<f32>) -> Option<u32> {
        let local = block_to_column_local_pos(world_to_block_pos(position));
        self.shared
            .chunks
            .get(world_to_column_pos(position))
            .map(|column| column.get().height_at(local.x, local.z))
    }

    /// Keeps a player position inside a bounded world. Does nothing on
    /// infinite worlds.
    pub fn check_player_bounds(&self, position: &mut Point3<f32>) {
        if self.shared.settings.is_infinite_terrain {
            return;
        }

        let limit = (self.shared.settings.world_size * CHUNK_SIZE) as f32;
        for coordinate in [&mut position.x, &mut position.z] {
            if *coordinate < 0.2 {
                *coordinate = 0.2;
            }
            if *coordinate + 0.2 > limit - 0.2 {
                *coordinate = limit - 0.3;
            }
        }
    }

    /// The unit box occupied by the block at `position`.
    pub fn block_aabb(position: Point3<i32>) -> Aabb {
        let min = Point3::new(position.x as f32, position.y as f32, position.z as f32);
        Aabb {
            min,
            max: Point3::new(min.x + 1.0, min.y + 1.0, min.z + 1.0),
        }
    }

    /// The main-thread tick.
    ///
    /// Applies the pending edits, notifies neighbours of blocks changed by
    /// behaviours last tick, ticks every column and removes the columns
    /// queued for deletion. Columns the worker is generating at that moment
    /// are not ticked this frame.
    pub fn update_chunks(&self) -> UpdateSummary {
        let remeshed_sections = self.regenerate_chunks();
        self.flush_deferred_notifications();

        for column in self.shared.chunks.snapshot() {
            if let Some(mut column) = column.try_get_mut() {
                column.tick();
            }
        }

        let evicted_columns = self.shared.drain_deletions();

        UpdateSummary {
            remeshed_sections,
            evicted_columns,
        }
    }

    /// Submits every generated column to `renderer`.
    ///
    /// # Returns
    /// The number of faces submitted, also kept for [`World::faces_drawn`].
    pub fn draw(&self, renderer: &mut dyn ChunkRenderer) -> usize {
        let mut faces = 0;
        for column in self.shared.chunks.snapshot() {
            let Some(column) = column.try_get() else {
                continue;
            };
            if column.has_generated_block_data() {
                faces += column.draw(renderer);
            }
        }
        self.faces_drawn.store(faces, Ordering::Relaxed);
        faces
    }

    #[cfg(test)]
    pub(crate) fn set_loading_distance(&self, distance: i32) {
        self.shared.lock_streaming().loading_distance = distance;
    }
}

impl<C: Column> Drop for World<C> {
    fn drop(&mut self) {
        self.shared.is_running.store(false, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Streaming worker panicked");
            }
        }
        debug!("World dropped with {} columns loaded", self.shared.chunks.len());
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use cgmath::Point3;

    use crate::core::WorldError;
    use crate::engine_state::rendering::ChunkRenderer;
    use crate::engine_state::voxels::block::{block_catalog::BlockCatalog, Block};
    use crate::engine_state::voxels::chunk::{
        Column, ColumnPosition, StackedColumn,
    };
    use crate::engine_state::voxels::world::WorldSettings;

    /// Seed that makes [`MockColumn`] generation fail.
    pub const FAILING_SEED: u32 = 13;

    /// A column whose generation only flips a flag, for fast scheduler tests.
    pub struct MockColumn {
        inner: StackedColumn,
        fails: bool,
        generated: bool,
        pub generate_calls: u32,
    }

    impl Column for MockColumn {
        type Section = <StackedColumn as Column>::Section;

        fn new(position: ColumnPosition, settings: &WorldSettings, catalog: Arc<BlockCatalog>) -> Self {
            MockColumn {
                inner: StackedColumn::new(position, settings, catalog),
                fails: settings.seed == FAILING_SEED,
                generated: false,
                generate_calls: 0,
            }
        }

        fn position(&self) -> ColumnPosition {
            self.inner.position()
        }

        fn get_block(&self, local: Point3<i32>) -> Block {
            self.inner.get_block(local)
        }

        fn set_block(&mut self, local: Point3<i32>, block: Block) {
            self.inner.set_block(local, block)
        }

        fn try_generate(&mut self) -> Result<bool, WorldError> {
            self.generate_calls += 1;
            if self.fails {
                return Err(WorldError::Generation {
                    position: self.position(),
                    reason: "mock failure".to_string(),
                });
            }
            if self.generated {
                return Ok(false);
            }
            self.generated = true;
            Ok(true)
        }

        fn add_section(&mut self) {
            self.inner.add_section()
        }

        fn section_count(&self) -> usize {
            self.inner.section_count()
        }

        fn section(&self, index: i32) -> Option<&Self::Section> {
            self.inner.section(index)
        }

        fn section_mut(&mut self, index: i32) -> Option<&mut Self::Section> {
            self.inner.section_mut(index)
        }

        fn height_at(&self, x: i32, z: i32) -> u32 {
            self.inner.height_at(x, z)
        }

        fn tick(&mut self) {
            self.inner.tick()
        }

        fn draw(&self, renderer: &mut dyn ChunkRenderer) -> usize {
            self.inner.draw(renderer)
        }

        fn has_delete_flag(&self) -> bool {
            self.inner.has_delete_flag()
        }

        fn set_delete_flag(&mut self) {
            self.inner.set_delete_flag()
        }

        fn has_generated_block_data(&self) -> bool {
            self.generated
        }
    }
}
