use tarn_blocks::BlockId;
use tarn_blocks::ids;
use tarn_world::{BlockPos, ChunkCoord, ChunkRect};

use crate::chunk::Chunk;

/// The fixed array of chunks covering the world window. Allocated once at
/// construction, never resized; lookups outside the window return no chunk.
pub struct ChunkGrid {
    window: ChunkRect,
    chunks: Vec<Chunk>,
}

impl ChunkGrid {
    pub fn new(window: ChunkRect) -> Self {
        Self {
            window,
            chunks: (0..window.chunk_count()).map(|_| Chunk::new()).collect(),
        }
    }

    #[inline]
    pub fn window(&self) -> ChunkRect {
        self.window
    }

    #[inline]
    fn index(&self, c: ChunkCoord) -> usize {
        (c.cx - self.window.min_cx) as usize * self.window.depth()
            + (c.cz - self.window.min_cz) as usize
    }

    #[inline]
    pub fn chunk(&self, c: ChunkCoord) -> Option<&Chunk> {
        if !self.window.contains(c) {
            return None;
        }
        Some(&self.chunks[self.index(c)])
    }

    #[inline]
    pub fn chunk_mut(&mut self, c: ChunkCoord) -> Option<&mut Chunk> {
        if !self.window.contains(c) {
            return None;
        }
        let idx = self.index(c);
        Some(&mut self.chunks[idx])
    }

    /// Block id at a world position; air when no chunk exists there.
    #[inline]
    pub fn block(&self, pos: BlockPos) -> BlockId {
        match self.chunk(ChunkCoord::from_block_pos(pos)) {
            Some(c) => c.block(pos.x & 0xF, pos.y, pos.z & 0xF),
            None => ids::AIR,
        }
    }

    /// Write a block id; no-op when no chunk exists there.
    #[inline]
    pub fn set_block(&mut self, pos: BlockPos, id: BlockId) {
        if let Some(c) = self.chunk_mut(ChunkCoord::from_block_pos(pos)) {
            c.set_block(pos.x & 0xF, pos.y, pos.z & 0xF, id);
        }
    }

    #[inline]
    pub fn block_light(&self, pos: BlockPos) -> u8 {
        match self.chunk(ChunkCoord::from_block_pos(pos)) {
            Some(c) => c.block_light(pos.x & 0xF, pos.y, pos.z & 0xF),
            None => 0,
        }
    }

    /// Lock-guarded single-voxel light write.
    pub fn set_block_light(&self, pos: BlockPos, level: u8) {
        if !pos.in_vertical_range() {
            return;
        }
        if let Some(c) = self.chunk(ChunkCoord::from_block_pos(pos)) {
            let (x, z) = (pos.x & 0xF, pos.z & 0xF);
            let _guard = c.lock_light(x, pos.y, z);
            c.set_block_light(x, pos.y, z, level);
        }
    }

    /// Bump every chunk's change counter.
    pub fn bump_all(&mut self) {
        for c in &mut self.chunks {
            c.bump_last_update();
        }
    }
}
