use std::collections::{HashSet, VecDeque};

use tarn_blocks::BlockCatalog;
use tarn_chunk::ChunkGrid;
use tarn_world::BlockPos;

use crate::is_solid;

/// No descent point reachable.
pub(crate) const NO_DESCENT: i32 = 999;

/// Breadth-first search from `start` through non-solid cells at the same
/// height, up to `max_depth` hops, for the nearest column whose cell below is
/// non-solid. Returns the hop count to that column, or [`NO_DESCENT`].
pub(crate) fn descent_cost(
    grid: &ChunkGrid,
    catalog: &BlockCatalog,
    start: BlockPos,
    max_depth: i32,
) -> i32 {
    let mut queue: VecDeque<(BlockPos, i32)> = VecDeque::new();
    let mut visited: HashSet<BlockPos> = HashSet::new();
    queue.push_back((start, 0));
    visited.insert(start);

    let mut best = NO_DESCENT;
    while let Some((cur, dist)) = queue.pop_front() {
        if dist > max_depth {
            continue;
        }
        if !is_solid(catalog, grid.block(cur.below())) {
            best = best.min(dist);
            continue;
        }
        for next in cur.horizontals() {
            if visited.contains(&next) {
                continue;
            }
            if !is_solid(catalog, grid.block(next)) {
                queue.push_back((next, dist + 1));
                visited.insert(next);
            }
        }
    }
    best
}
