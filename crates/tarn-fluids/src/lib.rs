//! Per-block behaviors: a closed set of variants dispatched by id.
//!
//! Behaviors read neighboring voxel state and enqueue scheduled ticks; they
//! never write block ids themselves. All id writes go through the tick
//! engine's apply phase, which keeps scheduling order-independent.
#![forbid(unsafe_code)]

mod lava;
mod search;
mod water;

use tarn_blocks::ids::{LAVA_SOURCE, WATER_SOURCE};
use tarn_blocks::{BlockCatalog, BlockId, MAX_BLOCK_ID};
use tarn_chunk::ChunkGrid;
use tarn_ticks::TickQueue;
use tarn_world::BlockPos;

/// Steps between a fluid cell's cause and its effect.
pub(crate) const FLUID_TICK_RATE: i64 = 1;
/// Maximum spread level; cells at this level stop spreading horizontally.
pub(crate) const MAX_SPREAD_LEVEL: i32 = 7;
/// Horizontal search depth for a descent point.
pub(crate) const DESCENT_SEARCH_DEPTH: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    Default,
    Water,
    Lava,
}

/// Id-indexed behavior lookup, populated once at construction. Ids without an
/// explicit registration fall back to the no-op default.
pub struct BehaviorTable {
    table: Vec<Behavior>,
}

impl BehaviorTable {
    pub fn new() -> Self {
        let mut table = vec![Behavior::Default; MAX_BLOCK_ID];
        for id in WATER_SOURCE..WATER_SOURCE + 16 {
            table[id as usize] = Behavior::Water;
        }
        for id in LAVA_SOURCE..LAVA_SOURCE + 16 {
            table[id as usize] = Behavior::Lava;
        }
        Self { table }
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Behavior {
        if id < 0 || id as usize >= self.table.len() {
            return Behavior::Default;
        }
        self.table[id as usize]
    }
}

impl Default for BehaviorTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the behavior of whatever currently occupies `pos`.
pub fn dispatch(
    table: &BehaviorTable,
    grid: &ChunkGrid,
    catalog: &BlockCatalog,
    pos: BlockPos,
    ticks: &mut TickQueue,
) {
    match table.get(grid.block(pos)) {
        Behavior::Default => {}
        Behavior::Water => water::tick(grid, catalog, pos, ticks),
        Behavior::Lava => lava::tick(grid, catalog, pos, ticks),
    }
}

#[inline]
pub(crate) fn is_solid(catalog: &BlockCatalog, id: BlockId) -> bool {
    catalog.get(id).is_solid()
}
