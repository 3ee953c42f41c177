use tarn_blocks::ids::{self, FALLING_OFFSET, LAVA_SOURCE};
use tarn_blocks::{BlockCatalog, BlockId};
use tarn_chunk::ChunkGrid;
use tarn_ticks::TickQueue;
use tarn_world::BlockPos;

use crate::search::descent_cost;
use crate::{DESCENT_SEARCH_DEPTH, FLUID_TICK_RATE, MAX_SPREAD_LEVEL, is_solid};

#[inline]
fn outranks(catalog: &BlockCatalog, id: BlockId, compare: BlockId) -> bool {
    if !ids::is_lava(id) {
        return false;
    }
    if !ids::is_lava(compare) {
        return true;
    }
    catalog.get(id).stage < catalog.get(compare).stage
}

#[inline]
fn schedule_decay(ticks: &mut TickQueue, lava_type: BlockId, pos: BlockPos) {
    if lava_type >= LAVA_SOURCE + MAX_SPREAD_LEVEL {
        ticks.schedule(-(LAVA_SOURCE + FALLING_OFFSET), pos, FLUID_TICK_RATE);
    } else {
        ticks.schedule(-(lava_type + 1), pos, FLUID_TICK_RATE);
    }
}

/// Same flow skeleton as water, plus the water reaction: flowing lava touching
/// water hardens to cobblestone (stone when the water is directly below),
/// a lava source hardens to obsidian either way.
pub(crate) fn tick(grid: &ChunkGrid, catalog: &BlockCatalog, pos: BlockPos, ticks: &mut TickQueue) {
    let lava_type = grid.block(pos);
    if !ids::is_lava(lava_type) {
        return;
    }

    let up = pos.above();
    let down = pos.below();
    let left = pos.offset(-1, 0, 0);
    let right = pos.offset(1, 0, 0);
    let front = pos.offset(0, 0, -1);
    let back = pos.offset(0, 0, 1);

    let up_id = grid.block(up);
    let down_id = grid.block(down);
    let left_id = grid.block(left);
    let right_id = grid.block(right);
    let front_id = grid.block(front);
    let back_id = grid.block(back);

    let horizontals = [
        (left_id, left),
        (right_id, right),
        (front_id, front),
        (back_id, back),
    ];
    let unsupported = !ids::is_lava(up_id)
        && horizontals
            .iter()
            .all(|&(id, _)| !outranks(catalog, id, lava_type));

    if down_id == ids::AIR || (ids::is_lava(down_id) && !ids::is_lava_source(down_id)) {
        ticks.schedule(LAVA_SOURCE + FALLING_OFFSET, down, FLUID_TICK_RATE);
        if !ids::is_lava_source(lava_type) && unsupported {
            schedule_decay(ticks, lava_type, pos);
            for (id, p) in horizontals {
                ticks.schedule(id, p, FLUID_TICK_RATE);
            }
        }
        return;
    }

    spread_horizontally(grid, catalog, pos, lava_type, ticks);

    let mut decaying = false;
    if !ids::is_lava_source(lava_type) && unsupported {
        decaying = true;
        ticks.schedule(down_id, down, FLUID_TICK_RATE);
        for (id, p) in horizontals {
            ticks.schedule(id, p, FLUID_TICK_RATE);
        }
    }

    let wake_all = |ticks: &mut TickQueue| {
        ticks.schedule(up_id, up, FLUID_TICK_RATE);
        ticks.schedule(down_id, down, FLUID_TICK_RATE);
        for (id, p) in horizontals {
            ticks.schedule(id, p, FLUID_TICK_RATE);
        }
    };

    if ids::is_water(down_id) {
        let hardened = if ids::is_lava_source(lava_type) {
            ids::OBSIDIAN
        } else {
            ids::STONE
        };
        ticks.schedule(hardened, pos, FLUID_TICK_RATE);
        wake_all(ticks);
        return;
    }

    if [up_id, left_id, right_id, front_id, back_id]
        .into_iter()
        .any(ids::is_water)
    {
        let hardened = if ids::is_lava_source(lava_type) {
            ids::OBSIDIAN
        } else {
            ids::COBBLESTONE
        };
        ticks.schedule(hardened, pos, FLUID_TICK_RATE);
        wake_all(ticks);
        return;
    }

    if decaying {
        schedule_decay(ticks, lava_type, pos);
    }
}

fn spread_horizontally(
    grid: &ChunkGrid,
    catalog: &BlockCatalog,
    pos: BlockPos,
    lava_type: BlockId,
    ticks: &mut TickQueue,
) {
    let level = catalog.get(lava_type).stage as i32;
    let dirs = pos.horizontals();
    let mut weights = [crate::search::NO_DESCENT; 4];

    for (dir, &neighbor) in dirs.iter().enumerate() {
        let neighbor_id = grid.block(neighbor);
        let already_filled =
            ids::is_lava(neighbor_id) && (catalog.get(neighbor_id).stage as i32) <= level + 1;
        if !is_solid(catalog, neighbor_id) && !already_filled {
            weights[dir] = descent_cost(grid, catalog, neighbor, DESCENT_SEARCH_DEPTH);
        } else {
            weights[dir] = crate::search::NO_DESCENT + 1;
        }
    }

    let min_weight = weights
        .iter()
        .copied()
        .min()
        .unwrap_or(crate::search::NO_DESCENT)
        .min(crate::search::NO_DESCENT);

    if level < MAX_SPREAD_LEVEL {
        for (dir, &target) in dirs.iter().enumerate() {
            if weights[dir] == min_weight {
                ticks.schedule(LAVA_SOURCE + 1 + level, target, FLUID_TICK_RATE);
            }
        }
    }
}
