//! The dimension: one fixed-window world advancing in discrete steps.
#![forbid(unsafe_code)]

use std::sync::Arc;
use std::time::Instant;

use tarn_blocks::{BlockCatalog, BlockId};
use tarn_chunk::{Chunk, ChunkGrid};
use tarn_fluids::BehaviorTable;
use tarn_ticks::{SENTINEL, TickAction, TickQueue};
use tarn_world::{BlockPos, ChunkCoord, ChunkRect, WorldConfig};

/// Owns the chunk grid, the scheduled-tick queue, and the behavior table.
/// Catalog and behaviors are constructed once and injected; nothing here is
/// process-global.
pub struct Dimension {
    grid: ChunkGrid,
    ticks: TickQueue,
    behaviors: BehaviorTable,
    catalog: Arc<BlockCatalog>,
    active: ChunkRect,
}

impl Dimension {
    pub fn new(config: WorldConfig, catalog: Arc<BlockCatalog>) -> Self {
        let active = config.effective_active();
        log::info!(
            target: "sim",
            "dimension window {:?}, active region {:?}",
            config.window,
            active
        );
        Self {
            grid: ChunkGrid::new(config.window),
            ticks: TickQueue::new(),
            behaviors: BehaviorTable::new(),
            catalog,
            active,
        }
    }

    #[inline]
    pub fn block(&self, pos: BlockPos) -> BlockId {
        self.grid.block(pos)
    }

    #[inline]
    pub fn block_light(&self, pos: BlockPos) -> u8 {
        self.grid.block_light(pos)
    }

    #[inline]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.grid.chunk(coord)
    }

    #[inline]
    pub fn grid(&self) -> &ChunkGrid {
        &self.grid
    }

    #[inline]
    pub fn time(&self) -> i64 {
        self.ticks.time()
    }

    #[inline]
    pub fn pending_ticks(&self) -> usize {
        self.ticks.pending_len()
    }

    /// Advance one step: drain due scheduled ticks, dispatch behaviors, then
    /// recompute light over the active region.
    pub fn step(&mut self) {
        let batch = self.ticks.advance();
        log::debug!(target: "tick", "step {}: {} positions due", self.ticks.time(), batch.len());
        self.run_batch(batch);
        let started = Instant::now();
        tarn_lighting::recompute(&self.grid, &self.catalog, self.active);
        log::debug!(target: "light", "recompute took {:?}", started.elapsed());
    }

    /// Resolve externally staged edits at the current step without advancing
    /// time. Light is untouched; it refreshes on the next `step`.
    pub fn flush_staged(&mut self) {
        let batch = self.ticks.run_staged();
        if !batch.is_empty() {
            log::debug!(target: "tick", "flush at {}: {} positions", self.ticks.time(), batch.len());
        }
        self.run_batch(batch);
    }

    fn run_batch(&mut self, batch: Vec<TickAction>) {
        // Apply all id writes before any behavior runs, so dispatch order
        // cannot observe half-applied state.
        for action in &batch {
            if let Some(id) = action.apply {
                self.grid.set_block(action.pos, id);
            }
        }
        for action in &batch {
            tarn_fluids::dispatch(
                &self.behaviors,
                &self.grid,
                &self.catalog,
                action.pos,
                &mut self.ticks,
            );
        }
    }

    /// Immediate external edit: write the id now, then queue the sentinel
    /// re-run entries for this position and current-id entries for its six
    /// neighbors, each both for the pending flush and for the next step.
    pub fn stage_edit(&mut self, pos: BlockPos, id: BlockId) {
        self.grid.set_block(pos, id);
        self.ticks.schedule(SENTINEL, pos, 0);
        self.ticks.schedule(SENTINEL, pos, 1);
        for neighbor in pos.neighbors6() {
            let neighbor_id = self.grid.block(neighbor);
            self.ticks.schedule(neighbor_id, neighbor, 0);
            self.ticks.schedule(neighbor_id, neighbor, 1);
        }
    }

    /// `stage_edit` plus an immediate flush.
    pub fn set_block(&mut self, pos: BlockPos, id: BlockId) {
        self.stage_edit(pos, id);
        self.flush_staged();
    }

    /// Drop every pending scheduled tick and reset the step counter.
    pub fn clear_ticks(&mut self) {
        self.ticks.clear();
    }

    /// Signal external consumers that every chunk may have changed.
    pub fn bump_counters(&mut self) {
        self.grid.bump_all();
    }
}
