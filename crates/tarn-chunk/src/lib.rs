//! Dense voxel storage: sections, chunks, and the fixed chunk grid.
#![forbid(unsafe_code)]

mod chunk;
mod grid;
mod lock;
mod section;

pub use chunk::Chunk;
pub use grid::ChunkGrid;
pub use lock::LightGuard;
pub use section::{
    BIOMES_PER_SECTION, LIGHT_BYTES_PER_SECTION, Section, VOXELS_PER_SECTION,
};
