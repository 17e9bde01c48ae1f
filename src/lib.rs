#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A streamed voxel world: columns of 16³ sections generated on a background
//! thread in a ring that follows the camera, with block edits batched into
//! per-section remeshes once per frame.
//!
//! ## Key Modules
//!
//! * `core` - The thread-safe resource handle and the error types
//! * `engine_state` - The frame driver, the voxel world and the rendering seam
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     if let Err(error) = voxel_world::run() {
//!         eprintln!("{error}");
//!     }
//! }
//! ```
//!
//! The first command line argument, if given, is a JSON settings file:
//!
//! ```json
//! { "world_size": 21, "is_infinite_terrain": true, "seed": 1337 }
//! ```
//!
//! Block definitions are read from `Data/Blocks/<Name>.block`. When that
//! directory is missing the built-in definitions are used.

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cgmath::Vector3;
use log::{info, warn};

use crate::core::{CatalogError, WorldError};
use engine_state::voxels::block::block_catalog::{BlockCatalog, DEFAULT_BLOCK_NAMES};
use engine_state::voxels::block::block_data::BLOCK_DATA_DIRECTORY;
use engine_state::voxels::block::{block_type::BlockType, Block};
use engine_state::voxels::world::WorldSettings;
use engine_state::EngineState;

pub mod core;
pub mod engine_state;

/// Frames the demo walk runs for.
pub const DEMO_FRAMES: u64 = 1200;

/// Target frame time of the demo walk.
pub const FRAME_TIME: Duration = Duration::from_millis(16);

/// How far the camera moves each frame.
const CAMERA_STEP: Vector3<f32> = Vector3 {
    x: 0.3,
    y: 0.0,
    z: 0.12,
};

/// Loads the block catalog, falling back to the built-in definitions only
/// when the data directory itself does not exist. A missing or malformed
/// definition file inside an existing directory is fatal.
pub fn load_catalog(directory: &Path) -> Result<BlockCatalog, CatalogError> {
    if !directory.is_dir() {
        warn!(
            "Block directory {} not found; using built-in block definitions",
            directory.display()
        );
        return Ok(BlockCatalog::builtin());
    }
    BlockCatalog::load(directory, &DEFAULT_BLOCK_NAMES)
}

/// Runs the headless demo: streams a world around a camera walking across
/// it, drops sand now and then, and logs frame statistics.
pub fn run() -> Result<(), WorldError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let settings = match std::env::args().nth(1) {
        Some(path) => WorldSettings::from_json_file(path)?,
        None => WorldSettings::default(),
    };
    let catalog = load_catalog(Path::new(BLOCK_DATA_DIRECTORY))?;

    let mut engine = EngineState::new(settings, Arc::new(catalog))?;

    for frame in 0..DEMO_FRAMES {
        engine.move_camera(CAMERA_STEP);
        engine.snap_camera_to_ground();

        if frame % 120 == 60 {
            engine.place_block_near_camera(Vector3::new(2.0, 6.0, 0.0), Block::new(BlockType::SAND));
        }

        let report = engine.frame();
        if report.frame % 60 == 0 {
            let camera = engine.camera_position();
            info!(
                "Frame {}: camera ({:.1}, {:.1}, {:.1}), {} columns loaded, loading distance {}, {} sections / {} faces drawn",
                report.frame,
                camera.x,
                camera.y,
                camera.z,
                report.loaded_columns,
                report.loading_distance,
                report.sections_drawn,
                report.faces_drawn
            );
        }

        thread::sleep(FRAME_TIME);
    }

    info!("Demo finished after {} frames", DEMO_FRAMES);
    Ok(())
}
