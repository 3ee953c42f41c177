//! Fixed-layout chunk snapshot handed across the FFI boundary.
//!
//! Field order, sizes, and alignment are wire contract with the orchestrator;
//! any change here requires a version bump on both sides.

use std::alloc::{self, Layout};

use tarn_chunk::Chunk;
use tarn_world::SECTIONS_PER_CHUNK;

pub const PACKED_VOXELS: usize = 4096;
pub const PACKED_BIOMES: usize = 64;
pub const PACKED_LIGHT_BYTES: usize = 2048;

#[repr(C)]
pub struct PackedSection {
    pub block_count: i16,
    pub blocks: [i32; PACKED_VOXELS],
    pub biomes: [i32; PACKED_BIOMES],
    pub sky_light: [u8; PACKED_LIGHT_BYTES],
    pub block_light: [u8; PACKED_LIGHT_BYTES],
}

#[repr(C)]
pub struct PackedChunk {
    pub last_update: i32,
    pub sections: [PackedSection; SECTIONS_PER_CHUNK],
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct SetBlockRequest {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub state_id: i32,
}

impl PackedChunk {
    /// Heap-allocate a zeroed snapshot. The struct is ~500 KiB, far too big
    /// to pass through the stack, and all-zero bytes are a valid value.
    pub fn zeroed() -> Box<Self> {
        let layout = Layout::new::<PackedChunk>();
        unsafe {
            let ptr = alloc::alloc_zeroed(layout) as *mut PackedChunk;
            if ptr.is_null() {
                alloc::handle_alloc_error(layout);
            }
            Box::from_raw(ptr)
        }
    }

    /// Refresh the snapshot from live chunk state.
    pub fn fill_from(&mut self, chunk: &Chunk) {
        self.last_update = chunk.last_update();
        for (dst, src) in self.sections.iter_mut().zip(chunk.sections()) {
            dst.block_count = src.block_count();
            dst.blocks.copy_from_slice(src.blocks());
            dst.biomes.copy_from_slice(src.biomes());
            dst.sky_light.copy_from_slice(src.sky_light());
            src.copy_block_light_into(&mut dst.block_light);
        }
    }
}
