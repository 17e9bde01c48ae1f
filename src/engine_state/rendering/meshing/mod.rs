//! Mesh generation for voxel sections.
//!
//! Sections are meshed face by face: every visible side of a block becomes one
//! quad. A side is hidden when the neighbouring block inside the same section is
//! opaque, or is the same block (so water bodies and leaf clusters have no
//! interior faces). Sides on the section boundary are tested against the
//! opacity of the adjacent layer of the neighbouring section, passed in as
//! [`SectionNeighbours`]. A side with no neighbour section is open.
//!
//! Plant-style blocks (`MeshStyle::X_STYLE`) are emitted as two crossed quads.

use bitvec::slice::BitSlice;
use bitvec::vec::BitVec;
use cgmath::Point3;

mod face;
mod section_mesh;

pub use face::Face;
pub use section_mesh::SectionMesh;

use crate::engine_state::voxels::{
    block::{
        block_catalog::BlockCatalog, block_data::BlockData, block_side::BlockSide,
        block_type::MeshStyle, Block,
    },
    chunk::{local_index, SectionPosition, CHUNK_SIZE},
};

/// Width, in cells, of the block texture atlas.
pub const TEXTURE_ATLAS_WIDTH: i32 = 16;

/// Opacity of the block layers just outside a section, one `CHUNK_AREA`
/// layer per side, indexed by [`edge_index`].
#[derive(Debug, Clone, Default)]
pub struct SectionNeighbours {
    layers: [Option<BitVec>; 6],
}

impl SectionNeighbours {
    /// No neighbours: every boundary face is emitted.
    pub fn open() -> Self {
        Self::default()
    }

    /// Sets the layer of the neighbour section on `side` of this one.
    pub fn set(&mut self, side: BlockSide, layer: BitVec) {
        self.layers[side as usize] = Some(layer);
    }

    pub fn layer(&self, side: BlockSide) -> Option<&BitSlice> {
        self.layers[side as usize].as_deref()
    }

    /// Whether the block at `outside`, one step past the section boundary on
    /// `side`, is opaque.
    fn is_opaque(&self, side: BlockSide, outside: Point3<i32>) -> bool {
        let wrapped = Point3::new(
            outside.x.rem_euclid(CHUNK_SIZE),
            outside.y.rem_euclid(CHUNK_SIZE),
            outside.z.rem_euclid(CHUNK_SIZE),
        );
        self.layer(side)
            .map_or(false, |layer| layer[edge_index(side, wrapped)])
    }
}

/// Index of a local coordinate within the boundary layer facing `side`.
///
/// The coordinate along the side's axis is ignored, so a block and the block
/// across the boundary from it share an index.
pub fn edge_index(side: BlockSide, local: Point3<i32>) -> usize {
    let (a, b) = match side {
        BlockSide::FRONT | BlockSide::BACK => (local.z, local.y),
        BlockSide::BOTTOM | BlockSide::TOP => (local.x, local.z),
        BlockSide::LEFT | BlockSide::RIGHT => (local.x, local.y),
    };
    (a + b * CHUNK_SIZE) as usize
}

/// The local coordinate of entry `index` of the section's own boundary
/// layer on `side`. Inverse of [`edge_index`].
pub fn edge_position(side: BlockSide, index: i32) -> Point3<i32> {
    let (a, b) = (index % CHUNK_SIZE, index / CHUNK_SIZE);
    let far = CHUNK_SIZE - 1;
    match side {
        BlockSide::FRONT => Point3::new(0, b, a),
        BlockSide::BACK => Point3::new(far, b, a),
        BlockSide::BOTTOM => Point3::new(a, 0, b),
        BlockSide::TOP => Point3::new(a, far, b),
        BlockSide::LEFT => Point3::new(a, b, 0),
        BlockSide::RIGHT => Point3::new(a, b, far),
    }
}

/// Builds the mesh for the section at `position`.
///
/// # Arguments
/// * `position` - Section coordinate, used to place vertices in world space
/// * `blocks` - The section's blocks, indexed by [`local_index`]
/// * `opaque` - One bit per block, set when the block is opaque
/// * `neighbours` - Opacity of the layers bordering the section
/// * `catalog` - Block properties (mesh style and textures)
pub fn build_section_mesh(
    position: SectionPosition,
    blocks: &[Block],
    opaque: &BitSlice,
    neighbours: &SectionNeighbours,
    catalog: &BlockCatalog,
) -> SectionMesh {
    let origin = position * CHUNK_SIZE;
    let mut mesh = SectionMesh::new();

    for y in 0..CHUNK_SIZE {
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let block = blocks[local_index(Point3::new(x, y, z))];
                if block.is_air() {
                    continue;
                }

                let data = catalog.get(block.get_type());
                let (i, j, k) = (origin.x + x, origin.y + y, origin.z + z);

                if data.map(|d| d.mesh_style) == Some(MeshStyle::X_STYLE) {
                    for face in Face::cross(i, j, k, texture_index(data, BlockSide::FRONT)) {
                        mesh.add_face(&face);
                    }
                    continue;
                }

                for side in BlockSide::all() {
                    let neighbour = Point3::new(x, y, z) + side.normal();
                    if is_local(neighbour) {
                        let index = local_index(neighbour);
                        if opaque[index] || blocks[index] == block {
                            continue;
                        }
                    } else if neighbours.is_opaque(side, neighbour) {
                        continue;
                    }
                    mesh.add_face(&Face::new(i, j, k, texture_index(data, side), side));
                }
            }
        }
    }

    mesh
}

fn is_local(position: Point3<i32>) -> bool {
    (0..CHUNK_SIZE).contains(&position.x)
        && (0..CHUNK_SIZE).contains(&position.y)
        && (0..CHUNK_SIZE).contains(&position.z)
}

/// Atlas cell for one side of a block.
fn texture_index(data: Option<&BlockData>, side: BlockSide) -> u32 {
    let Some(data) = data else {
        return 0;
    };
    let coords = match side {
        BlockSide::TOP => data.top_texture_coords,
        BlockSide::BOTTOM => data.bottom_texture_coords,
        _ => data.side_texture_coords,
    };
    (coords.y * TEXTURE_ATLAS_WIDTH + coords.x) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;
    use crate::engine_state::voxels::chunk::{CHUNK_AREA, CHUNK_VOLUME};

    fn section_with(blocks_at: &[(Point3<i32>, BlockType)]) -> (Vec<Block>, BitVec) {
        let catalog = BlockCatalog::builtin();
        let mut blocks = vec![Block::AIR; CHUNK_VOLUME];
        let mut opaque = BitVec::repeat(false, CHUNK_VOLUME);
        for (position, block_type) in blocks_at {
            let block = Block::new(*block_type);
            blocks[local_index(*position)] = block;
            opaque.set(local_index(*position), catalog.is_opaque(block));
        }
        (blocks, opaque)
    }

    #[test]
    fn test_single_block_has_six_faces() {
        let catalog = BlockCatalog::builtin();
        let (blocks, opaque) = section_with(&[(Point3::new(4, 4, 4), BlockType::STONE)]);

        let mesh = build_section_mesh(
            Point3::new(0, 0, 0),
            &blocks,
            &opaque,
            &SectionNeighbours::open(),
            &catalog,
        );

        assert_eq!(mesh.face_count(), 6);
    }

    #[test]
    fn test_shared_side_between_opaque_blocks_is_hidden() {
        let catalog = BlockCatalog::builtin();
        let (blocks, opaque) = section_with(&[
            (Point3::new(4, 4, 4), BlockType::STONE),
            (Point3::new(5, 4, 4), BlockType::DIRT),
        ]);

        let mesh = build_section_mesh(
            Point3::new(0, 0, 0),
            &blocks,
            &opaque,
            &SectionNeighbours::open(),
            &catalog,
        );

        assert_eq!(mesh.face_count(), 10);
    }

    #[test]
    fn test_boundary_side_hidden_by_opaque_neighbour_layer() {
        let catalog = BlockCatalog::builtin();
        let (blocks, opaque) = section_with(&[(Point3::new(15, 4, 9), BlockType::STONE)]);

        let mut layer = BitVec::repeat(false, CHUNK_AREA);
        layer.set(edge_index(BlockSide::FRONT, Point3::new(0, 4, 9)), true);
        let mut neighbours = SectionNeighbours::open();
        neighbours.set(BlockSide::BACK, layer);

        let mesh = build_section_mesh(
            Point3::new(0, 0, 0),
            &blocks,
            &opaque,
            &neighbours,
            &catalog,
        );
        assert_eq!(mesh.face_count(), 5);

        // A layer on the other side of the section does not hide anything.
        let mut layer = BitVec::repeat(false, CHUNK_AREA);
        layer.set(edge_index(BlockSide::BACK, Point3::new(15, 4, 9)), true);
        let mut neighbours = SectionNeighbours::open();
        neighbours.set(BlockSide::FRONT, layer);

        let mesh = build_section_mesh(
            Point3::new(0, 0, 0),
            &blocks,
            &opaque,
            &neighbours,
            &catalog,
        );
        assert_eq!(mesh.face_count(), 6);
    }

    #[test]
    fn test_edge_position_inverts_edge_index() {
        for side in BlockSide::all() {
            for index in [0, 17, 255] {
                let local = edge_position(side, index);
                assert_eq!(edge_index(side, local), index as usize);
                assert_eq!(edge_index(side.opposite(), local), index as usize);
            }
        }
    }

    #[test]
    fn test_plants_are_two_quads() {
        let catalog = BlockCatalog::builtin();
        let (blocks, opaque) = section_with(&[(Point3::new(0, 0, 0), BlockType::ROSE)]);

        let mesh = build_section_mesh(
            Point3::new(0, 0, 0),
            &blocks,
            &opaque,
            &SectionNeighbours::open(),
            &catalog,
        );

        assert_eq!(mesh.face_count(), 2);
    }

    #[test]
    fn test_vertices_are_in_world_space() {
        let catalog = BlockCatalog::builtin();
        let (blocks, opaque) = section_with(&[(Point3::new(0, 0, 0), BlockType::STONE)]);

        let mesh = build_section_mesh(
            Point3::new(2, 1, -1),
            &blocks,
            &opaque,
            &SectionNeighbours::open(),
            &catalog,
        );

        let min_x = mesh.vertices.iter().map(|v| v.position().x).min();
        let min_y = mesh.vertices.iter().map(|v| v.position().y).min();
        let min_z = mesh.vertices.iter().map(|v| v.position().z).min();
        assert_eq!(min_x, Some(32));
        assert_eq!(min_y, Some(16));
        assert_eq!(min_z, Some(-16));
    }
}
