use cgmath::Point3;

use crate::engine_state::voxels::block::block_side::BlockSide;

/// Represents a single quad of a section mesh.
///
/// A face is defined by four corner points (lower-left, lower-right,
/// upper-right, upper-left) in world block coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-right corner of the face
    pub lr: Point3<i32>,
    /// Lower-left corner of the face
    pub ll: Point3<i32>,
    /// Upper-right corner of the face
    pub ur: Point3<i32>,
    /// Upper-left corner of the face
    pub ul: Point3<i32>,
    /// Atlas cell of the texture drawn on this face
    pub texture_index: u32,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face of the block at `(i, j, k)` on the given side.
    ///
    /// The corners are wound so every face is seen from outside the block.
    pub fn new(i: i32, j: i32, k: i32, texture_index: u32, block_side: BlockSide) -> Self {
        match block_side {
            BlockSide::FRONT => Face {
                ll: Point3::new(i, j, k),
                lr: Point3::new(i, j, k + 1),
                ul: Point3::new(i, j + 1, k),
                ur: Point3::new(i, j + 1, k + 1),
                texture_index,
                block_side,
            },

            BlockSide::BACK => Face {
                ll: Point3::new(i + 1, j, k + 1),
                lr: Point3::new(i + 1, j, k),
                ul: Point3::new(i + 1, j + 1, k + 1),
                ur: Point3::new(i + 1, j + 1, k),
                texture_index,
                block_side,
            },

            BlockSide::BOTTOM => Face {
                ll: Point3::new(i, j, k + 1),
                lr: Point3::new(i, j, k),
                ul: Point3::new(i + 1, j, k + 1),
                ur: Point3::new(i + 1, j, k),
                texture_index,
                block_side,
            },

            BlockSide::TOP => Face {
                ll: Point3::new(i, j + 1, k),
                lr: Point3::new(i, j + 1, k + 1),
                ul: Point3::new(i + 1, j + 1, k),
                ur: Point3::new(i + 1, j + 1, k + 1),
                texture_index,
                block_side,
            },

            BlockSide::LEFT => Face {
                ll: Point3::new(i + 1, j, k),
                lr: Point3::new(i, j, k),
                ul: Point3::new(i + 1, j + 1, k),
                ur: Point3::new(i, j + 1, k),
                texture_index,
                block_side,
            },

            BlockSide::RIGHT => Face {
                ll: Point3::new(i, j, k + 1),
                lr: Point3::new(i + 1, j, k + 1),
                ul: Point3::new(i, j + 1, k + 1),
                ur: Point3::new(i + 1, j + 1, k + 1),
                texture_index,
                block_side,
            },
        }
    }

    /// The two diagonal quads of a plant-style block at `(i, j, k)`.
    pub fn cross(i: i32, j: i32, k: i32, texture_index: u32) -> [Face; 2] {
        [
            Face {
                ll: Point3::new(i, j, k),
                lr: Point3::new(i + 1, j, k + 1),
                ul: Point3::new(i, j + 1, k),
                ur: Point3::new(i + 1, j + 1, k + 1),
                texture_index,
                block_side: BlockSide::FRONT,
            },
            Face {
                ll: Point3::new(i, j, k + 1),
                lr: Point3::new(i + 1, j, k),
                ul: Point3::new(i, j + 1, k + 1),
                ur: Point3::new(i + 1, j + 1, k),
                texture_index,
                block_side: BlockSide::BACK,
            },
        ]
    }
}
