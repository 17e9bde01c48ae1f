//! # Core Module
//!
//! Fundamental types shared by every part of the world: the thread-safe
//! resource handle used to hand columns and the camera between the main thread
//! and the streaming worker, and the crate's error types.
//!
//! ## Usage
//! ```rust
//! use voxel_world::core::MtResource;
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//! ```

pub mod error;
pub mod mt_resource;

pub use error::{CatalogError, WorldError};
pub use mt_resource::MtResource;
