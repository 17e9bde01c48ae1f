//! # Engine State Module
//!
//! The per-frame driver around the voxel world.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the world, the shared camera position and the
//!   renderer, and runs one frame at a time
//! * `rendering` - Section meshes, their upload form and the renderer seam
//! * `voxels` - Blocks, chunks and the streamed world
//!
//! ## Frame
//!
//! A frame is the main-thread half of the world's work: apply pending edits
//! and tick the columns ([`World::update_chunks`]), then submit every
//! generated column to the renderer ([`World::draw`]). The streaming worker
//! runs independently and follows the camera position shared with it.

use std::sync::Arc;

use cgmath::{Point3, Vector3};
use log::debug;

use crate::core::{MtResource, WorldError};
use rendering::FrameRenderer;
use voxels::block::{block_catalog::BlockCatalog, Block};
use voxels::chunk::CHUNK_SIZE;
use voxels::world::{World, WorldSettings};

pub mod rendering;
pub mod voxels;

/// Height the camera starts at before the ground below it is known.
pub const SPAWN_HEIGHT: f32 = 64.0;

/// Eye height above the ground when the camera is snapped to the terrain.
pub const EYE_HEIGHT: f32 = 2.0;

/// Statistics for one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,
    pub remeshed_sections: usize,
    pub evicted_columns: usize,
    pub sections_drawn: usize,
    pub faces_drawn: usize,
    pub loaded_columns: usize,
    pub loading_distance: i32,
}

/// The main state container for the headless engine.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use cgmath::Vector3;
/// use voxel_world::engine_state::EngineState;
/// use voxel_world::engine_state::voxels::block::block_catalog::BlockCatalog;
/// use voxel_world::engine_state::voxels::world::WorldSettings;
///
/// let mut engine = EngineState::new(
///     WorldSettings::default(),
///     Arc::new(BlockCatalog::builtin()),
/// )
/// .unwrap();
///
/// loop {
///     engine.move_camera(Vector3::new(0.1, 0.0, 0.0));
///     let report = engine.frame();
///     println!("{} faces", report.faces_drawn);
/// }
/// ```
pub struct EngineState {
    /// The streamed voxel world
    pub world: World,
    /// Camera position, shared with the streaming worker
    camera: MtResource<Point3<f32>>,
    renderer: FrameRenderer,
    frame_count: u64,
}

impl EngineState {
    /// Creates the world and starts streaming around a camera placed above the
    /// world centre.
    ///
    /// # Arguments
    /// * `settings` - World configuration
    /// * `catalog` - Block definitions and behaviours
    ///
    /// # Returns
    /// The engine, or a `WorldError` if the world cannot be created.
    pub fn new(settings: WorldSettings, catalog: Arc<BlockCatalog>) -> Result<Self, WorldError> {
        let centre = (settings.half_size() * CHUNK_SIZE + CHUNK_SIZE / 2) as f32;
        let camera = MtResource::new(Point3::new(centre, SPAWN_HEIGHT, centre));
        let world = World::new(settings, catalog, camera.clone())?;

        Ok(EngineState {
            world,
            camera,
            renderer: FrameRenderer::new(),
            frame_count: 0,
        })
    }

    pub fn camera_position(&self) -> Point3<f32> {
        *self.camera.get()
    }

    /// Moves the camera, keeping it inside bounded worlds.
    pub fn move_camera(&mut self, delta: Vector3<f32>) {
        let mut position = self.camera_position() + delta;
        self.world.check_player_bounds(&mut position);
        *self.camera.get_mut() = position;
    }

    /// Puts the camera `EYE_HEIGHT` above the ground below it, if that ground
    /// is loaded.
    ///
    /// # Returns
    /// `false` if the column under the camera is not loaded yet.
    pub fn snap_camera_to_ground(&mut self) -> bool {
        let position = self.camera_position();
        match self.world.get_height_at(position) {
            Some(height) => {
                self.camera.get_mut().y = height as f32 + 1.0 + EYE_HEIGHT;
                true
            }
            None => false,
        }
    }

    /// Queues a block `offset` away from the camera.
    pub fn place_block_near_camera(&self, offset: Vector3<f32>, block: Block) {
        self.world.set_block(self.camera_position() + offset, block);
    }

    /// Runs one frame: the world update tick, then the draw pass.
    pub fn frame(&mut self) -> FrameReport {
        let update = self.world.update_chunks();

        self.renderer.begin_frame();
        let faces_drawn = self.world.draw(&mut self.renderer);
        self.frame_count += 1;

        if !update.remeshed_sections.is_empty() || update.evicted_columns > 0 {
            debug!(
                "Frame {}: remeshed {} sections, evicted {} columns",
                self.frame_count,
                update.remeshed_sections.len(),
                update.evicted_columns
            );
        }

        FrameReport {
            frame: self.frame_count,
            remeshed_sections: update.remeshed_sections.len(),
            evicted_columns: update.evicted_columns,
            sections_drawn: self.renderer.sections_drawn,
            faces_drawn,
            loaded_columns: self.world.loaded_columns(),
            loading_distance: self.world.loading_distance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn engine(world_size: i32) -> EngineState {
        EngineState::new(
            WorldSettings {
                world_size,
                is_infinite_terrain: false,
                seed: 5,
            },
            Arc::new(BlockCatalog::builtin()),
        )
        .unwrap()
    }

    #[test]
    fn test_camera_starts_above_centre() {
        let engine = engine(4);
        assert_eq!(engine.camera_position(), Point3::new(40.0, SPAWN_HEIGHT, 40.0));
    }

    #[test]
    fn test_camera_stays_in_bounds() {
        let mut engine = engine(4);

        engine.move_camera(Vector3::new(-100.0, 0.0, 100.0));

        let position = engine.camera_position();
        assert_eq!(position.x, 0.2);
        assert_eq!(position.z, 64.0 - 0.3);
    }

    #[test]
    fn test_frames_stream_and_draw() {
        let mut engine = engine(2);

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(20);
        let mut report = engine.frame();
        while report.faces_drawn == 0 && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(5));
            report = engine.frame();
        }

        assert!(report.faces_drawn > 0);
        assert!(report.sections_drawn > 0);
        assert!(report.frame >= 1);
        assert_eq!(engine.world.faces_drawn(), report.faces_drawn);
    }

    #[test]
    fn test_placed_block_lands_after_frame() {
        let mut engine = engine(2);
        let offset = Vector3::new(0.0, 10.0, 0.0);
        let target = engine.camera_position() + offset;

        engine.place_block_near_camera(offset, Block::new(BlockType::STONE));
        let report = engine.frame();

        assert!(report.remeshed_sections >= 1);
        assert_eq!(engine.world.get_block(target).get_type(), BlockType::STONE);
    }
}
