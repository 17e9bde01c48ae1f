//! # Voxel World
//!
//! Everything that represents and streams the voxel world.
//!
//! ## Architecture
//!
//! * **Block**: block identifiers, definitions loaded from data files, the
//!   catalog of block properties and the behaviours that react to edits
//! * **Chunk**: sections (16³ blocks, the unit of meshing), columns (vertical
//!   stacks of sections) and terrain generation
//! * **World**: the column store, the streaming worker that generates columns
//!   around the camera, and the batched edit pipeline that keeps meshes up to
//!   date
//!
//! ## Data Flow
//!
//! 1. The streaming worker creates and generates columns around the camera
//! 2. Gameplay queues block edits through the world
//! 3. Once per frame the world applies the edits and remeshes only the
//!    sections they touched
//! 4. Buffered section meshes are submitted to the renderer
//!
//! ## Thread Safety
//!
//! Columns are shared between the main thread and the worker through
//! [`MtResource`](crate::core::MtResource) handles. The column store has its
//! own lock; the loading distance and the delete queue share another.

pub mod block;
pub mod chunk;
pub mod world;
