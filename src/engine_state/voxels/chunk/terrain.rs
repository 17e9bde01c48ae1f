//! # Terrain Generation
//!
//! Height-map terrain from 2D Perlin noise. Each column of blocks is stone at
//! the bottom, a few layers of dirt, then grass; ground at or below the water
//! level is topped with sand and the gap up to the water level is filled with
//! water. Dry grass is sparsely decorated with plants, placed from a random
//! stream seeded by the world seed and the block position so the same seed
//! always gives the same world.

use noise::{NoiseFn, Perlin};

use crate::engine_state::voxels::block::{block_type::BlockType, Block};

/// Ground height where the noise is zero.
pub const BASE_HEIGHT: f64 = 32.0;
/// Maximum deviation from `BASE_HEIGHT`.
pub const HEIGHT_AMPLITUDE: f64 = 20.0;
/// Scaling factor applied to world coordinates when sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.015;
/// Water fills every gap up to this height.
pub const WATER_LEVEL: i32 = 26;
/// Layers of dirt between the surface and the stone.
pub const DIRT_DEPTH: i32 = 3;
/// One in this many grass tiles grows a plant.
pub const PLANT_RARITY: u32 = 24;

pub struct TerrainGenerator {
    perlin: Perlin,
    seed: u32,
}

impl TerrainGenerator {
    pub fn new(seed: u32) -> Self {
        TerrainGenerator {
            perlin: Perlin::new(seed),
            seed,
        }
    }

    /// The y of the surface block at a world block column.
    pub fn surface_height(&self, world_x: i32, world_z: i32) -> i32 {
        let sample = self.perlin.get([
            world_x as f64 * PERLIN_SCALE_FACTOR,
            world_z as f64 * PERLIN_SCALE_FACTOR,
        ]);
        (BASE_HEIGHT + sample * HEIGHT_AMPLITUDE).round().max(1.0) as i32
    }

    /// The block at height `y` of a column whose surface is at `surface`.
    pub fn block_at(&self, y: i32, surface: i32) -> Block {
        let block_type = if y > surface {
            if y <= WATER_LEVEL {
                BlockType::WATER
            } else {
                BlockType::AIR
            }
        } else if y == surface {
            if surface <= WATER_LEVEL {
                BlockType::SAND
            } else {
                BlockType::GRASS
            }
        } else if y > surface - DIRT_DEPTH {
            BlockType::DIRT
        } else {
            BlockType::STONE
        };
        Block::new(block_type)
    }

    /// A plant to place on top of a grass surface, if any.
    pub fn decoration(&self, world_x: i32, world_z: i32, surface: i32) -> Option<Block> {
        if surface <= WATER_LEVEL {
            return None;
        }

        let mut rng = fastrand::Rng::with_seed(self.position_seed(world_x, world_z));
        if rng.u32(0..PLANT_RARITY) != 0 {
            return None;
        }

        let plant = match rng.u8(0..3) {
            0 => BlockType::ROSE,
            1 => BlockType::DEAD_SHRUB,
            _ => BlockType::TALL_GRASS,
        };
        Some(Block::new(plant))
    }

    fn position_seed(&self, world_x: i32, world_z: i32) -> u64 {
        (self.seed as u64) << 32
            ^ (world_x as u32 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (world_z as u32 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_terrain() {
        let a = TerrainGenerator::new(7);
        let b = TerrainGenerator::new(7);
        for (x, z) in [(0, 0), (15, -3), (-200, 90)] {
            assert_eq!(a.surface_height(x, z), b.surface_height(x, z));
            assert_eq!(a.decoration(x, z, 40), b.decoration(x, z, 40));
        }
    }

    #[test]
    fn test_surface_height_in_range() {
        let generator = TerrainGenerator::new(3);
        for x in -64..64 {
            let height = generator.surface_height(x, x * 3);
            assert!(height >= 1);
            assert!(height as f64 <= BASE_HEIGHT + HEIGHT_AMPLITUDE + 1.0);
        }
    }

    #[test]
    fn test_block_layers() {
        let generator = TerrainGenerator::new(0);
        assert_eq!(generator.block_at(40, 40).get_type(), BlockType::GRASS);
        assert_eq!(generator.block_at(39, 40).get_type(), BlockType::DIRT);
        assert_eq!(generator.block_at(30, 40).get_type(), BlockType::STONE);
        assert_eq!(generator.block_at(41, 40).get_type(), BlockType::AIR);
        assert_eq!(generator.block_at(20, 20).get_type(), BlockType::SAND);
        assert_eq!(generator.block_at(WATER_LEVEL, 20).get_type(), BlockType::WATER);
        assert_eq!(generator.decoration(0, 0, 20), None);
    }
}
