//! # Streaming
//!
//! The background half of the world. One dedicated thread repeatedly calls
//! [`WorldShared::step_streaming`], which grows a square ring of generated
//! columns outwards and, on infinite worlds, flags columns that drifted too
//! far from the camera for removal.
//!
//! ## Ring expansion
//! Each step scans the window `[centre - d, centre + d)` on both axes, where
//! `d` is the loading distance and the centre is the camera's column (infinite
//! worlds) or the middle of the world (bounded worlds). Missing columns are
//! created on the way. The scan stops at the first column whose generation
//! produced new content, so each step generates at most one column. The new
//! column is meshed after its lock is released, together with the generated
//! columns beside it. Only a
//! step that generated nothing grows `d`; once `d` reaches
//! `world_size / 2 + 1` the next step starts the sweep again from 1.
//!
//! ## Eviction
//! Under the streaming lock, every loaded column outside
//! `camera ± (world_size / 2 + 1)` on either axis gets its delete flag set and
//! is pushed onto the delete queue. The flag makes this happen once per
//! column. The main thread drains the queue in
//! [`World::update_chunks`](super::World::update_chunks), taking the same lock.

use std::io;
use std::sync::atomic::Ordering;
use std::sync::{Arc, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use cgmath::Point2;
use log::{debug, info, trace, warn};

use super::{StreamingState, WorldShared};
use crate::core::WorldError;
use crate::engine_state::voxels::chunk::{position::world_to_column_pos, Column, ColumnPosition};

/// Pause between two scheduler iterations.
pub const WORKER_SLEEP: Duration = Duration::from_micros(10);

/// What one scheduler iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamingStep {
    /// The column generated this iteration, if any.
    pub generated: Option<ColumnPosition>,
    /// The loading distance after the iteration.
    pub loading_distance: i32,
    /// Columns newly queued for deletion.
    pub newly_flagged: usize,
}

impl<C: Column> WorldShared<C> {
    pub(super) fn lock_streaming(&self) -> MutexGuard<'_, StreamingState> {
        self.streaming.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs one scheduler iteration.
    ///
    /// # Returns
    /// What the iteration did, or the error of a column whose generation
    /// failed. A failed iteration leaves the loading distance as it was and
    /// skips the eviction scan; the column is retried on a later iteration.
    pub(super) fn step_streaming(&self) -> Result<StreamingStep, WorldError> {
        let camera = world_to_column_pos(*self.camera.get());
        let half = self.settings.half_size();

        let distance = {
            let mut state = self.lock_streaming();
            if state.loading_distance >= half + 1 {
                trace!("Loading distance reached {}, restarting sweep", state.loading_distance);
                state.loading_distance = 1;
            }
            state.loading_distance
        };

        let centre = if self.settings.is_infinite_terrain {
            camera
        } else {
            Point2::new(half, half)
        };
        let generated = self.generate_next(centre, distance)?;

        let mut state = self.lock_streaming();
        if generated.is_none() {
            state.loading_distance += 1;
            trace!("Ring {} complete, loading distance now {}", distance, state.loading_distance);
        }

        let newly_flagged = if self.settings.is_infinite_terrain {
            self.flag_out_of_range(camera, &mut state)
        } else {
            0
        };

        Ok(StreamingStep {
            generated,
            loading_distance: state.loading_distance,
            newly_flagged,
        })
    }

    /// Scans the window around `centre` and generates the first column that
    /// still needs it.
    fn generate_next(
        &self,
        centre: ColumnPosition,
        distance: i32,
    ) -> Result<Option<ColumnPosition>, WorldError> {
        for x in centre.x - distance..centre.x + distance {
            for z in centre.y - distance..centre.y + distance {
                let position = Point2::new(x, z);
                let column = self.chunks.get_or_insert_with(position, || {
                    C::new(position, &self.settings, self.catalog.clone())
                });

                let generated = column.get_mut().try_generate()?;
                if generated {
                    self.mesh_generated_column(position);
                    return Ok(Some(position));
                }
            }
        }
        Ok(None)
    }

    fn flag_out_of_range(&self, camera: ColumnPosition, state: &mut StreamingState) -> usize {
        let reach = self.settings.half_size() + 1;
        let (min_x, max_x) = (camera.x - reach, camera.x + reach);
        let (min_z, max_z) = (camera.y - reach, camera.y + reach);

        let mut flagged = 0;
        for column in self.chunks.snapshot() {
            let mut column = column.get_mut();
            let position = column.position();
            let outside = position.x <= min_x
                || position.x >= max_x
                || position.y <= min_z
                || position.y >= max_z;

            if outside && !column.has_delete_flag() {
                column.set_delete_flag();
                state.delete_queue.push(position);
                flagged += 1;
            }
        }

        if flagged > 0 {
            debug!("Queued {} columns for deletion", flagged);
        }
        flagged
    }

    /// Removes every queued column from the store and clears the queue.
    ///
    /// # Returns
    /// The number of columns removed.
    pub(super) fn drain_deletions(&self) -> usize {
        let mut state = self.lock_streaming();
        if state.delete_queue.is_empty() {
            return 0;
        }

        let removed = state
            .delete_queue
            .drain(..)
            .filter(|&position| self.chunks.delete_chunk(position))
            .count();
        debug!("Evicted {} columns", removed);
        removed
    }
}

/// Starts the streaming thread. It runs until the world's running flag is
/// cleared.
pub(super) fn spawn_worker<C: Column>(shared: Arc<WorldShared<C>>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("world-streaming".to_string())
        .spawn(move || {
            info!("Streaming worker started");
            while shared.is_running.load(Ordering::Acquire) {
                if let Err(error) = shared.step_streaming() {
                    warn!("Streaming iteration aborted: {}", error);
                }
                thread::sleep(WORKER_SLEEP);
            }
            info!("Streaming worker stopped");
        })
}
