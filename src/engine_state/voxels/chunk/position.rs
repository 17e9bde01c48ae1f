//! Conversions between world, block, column and section coordinates.
//!
//! World positions are continuous; a block covers `[n, n + 1)` on each axis.
//! Division and remainder are Euclidean so negative coordinates on infinite
//! worlds land in the right column.

use cgmath::{Point2, Point3};

use super::{ColumnPosition, SectionPosition, CHUNK_SIZE};

pub fn world_to_block_pos(position: Point3<f32>) -> Point3<i32> {
    Point3::new(
        position.x.floor() as i32,
        position.y.floor() as i32,
        position.z.floor() as i32,
    )
}

pub fn block_to_column_pos(block: Point3<i32>) -> ColumnPosition {
    Point2::new(block.x.div_euclid(CHUNK_SIZE), block.z.div_euclid(CHUNK_SIZE))
}

pub fn world_to_column_pos(position: Point3<f32>) -> ColumnPosition {
    block_to_column_pos(world_to_block_pos(position))
}

pub fn block_to_section_pos(block: Point3<i32>) -> SectionPosition {
    Point3::new(
        block.x.div_euclid(CHUNK_SIZE),
        block.y.div_euclid(CHUNK_SIZE),
        block.z.div_euclid(CHUNK_SIZE),
    )
}

pub fn world_to_section_pos(position: Point3<f32>) -> SectionPosition {
    block_to_section_pos(world_to_block_pos(position))
}

/// Block coordinate within its section, every axis in `0..CHUNK_SIZE`.
pub fn block_to_local_pos(block: Point3<i32>) -> Point3<i32> {
    Point3::new(
        block.x.rem_euclid(CHUNK_SIZE),
        block.y.rem_euclid(CHUNK_SIZE),
        block.z.rem_euclid(CHUNK_SIZE),
    )
}

/// Block coordinate within its column: local `x`/`z`, absolute `y`.
pub fn block_to_column_local_pos(block: Point3<i32>) -> Point3<i32> {
    Point3::new(
        block.x.rem_euclid(CHUNK_SIZE),
        block.y,
        block.z.rem_euclid(CHUNK_SIZE),
    )
}

pub fn section_to_column_pos(section: SectionPosition) -> ColumnPosition {
    Point2::new(section.x, section.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_world_position() {
        let position = Point3::new(32.5, 21.9, 35.0);

        assert_eq!(world_to_block_pos(position), Point3::new(32, 21, 35));
        assert_eq!(world_to_column_pos(position), Point2::new(2, 2));
        assert_eq!(world_to_section_pos(position), Point3::new(2, 1, 2));
        assert_eq!(
            block_to_local_pos(world_to_block_pos(position)),
            Point3::new(0, 5, 3)
        );
    }

    #[test]
    fn test_negative_world_position() {
        let position = Point3::new(-0.5, 3.0, -17.0);

        assert_eq!(world_to_block_pos(position), Point3::new(-1, 3, -17));
        assert_eq!(world_to_column_pos(position), Point2::new(-1, -2));
        assert_eq!(
            block_to_column_local_pos(world_to_block_pos(position)),
            Point3::new(15, 3, 15)
        );
    }
}
