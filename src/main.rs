//! # Voxel World Entry Point
//!
//! Calls into the library's `run()` function and turns its error into a
//! non-zero exit code.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- world.json
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    match voxel_world::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{}", error);
            eprintln!("voxel-world: {}", error);
            ExitCode::FAILURE
        }
    }
}
