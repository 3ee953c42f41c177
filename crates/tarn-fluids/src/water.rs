use tarn_blocks::ids::{self, FALLING_OFFSET, WATER_SOURCE};
use tarn_blocks::{BlockCatalog, BlockId};
use tarn_chunk::ChunkGrid;
use tarn_ticks::TickQueue;
use tarn_world::BlockPos;

use crate::search::descent_cost;
use crate::{DESCENT_SEARCH_DEPTH, FLUID_TICK_RATE, MAX_SPREAD_LEVEL, is_solid};

/// True when `id` is water strictly closer to a source than `compare`
/// (the "father" a flowing cell needs to stay alive).
#[inline]
fn outranks(catalog: &BlockCatalog, id: BlockId, compare: BlockId) -> bool {
    if !ids::is_water(id) {
        return false;
    }
    if !ids::is_water(compare) {
        return true;
    }
    catalog.get(id).stage < catalog.get(compare).stage
}

/// Queue the decay of a flowing cell: bottom-level flows vanish outright,
/// anything else drops one level via the negated-id encoding.
#[inline]
fn schedule_decay(ticks: &mut TickQueue, water_type: BlockId, pos: BlockPos) {
    if water_type >= WATER_SOURCE + MAX_SPREAD_LEVEL {
        ticks.schedule(-(WATER_SOURCE + FALLING_OFFSET), pos, FLUID_TICK_RATE);
    } else {
        ticks.schedule(-(water_type + 1), pos, FLUID_TICK_RATE);
    }
}

pub(crate) fn tick(grid: &ChunkGrid, catalog: &BlockCatalog, pos: BlockPos, ticks: &mut TickQueue) {
    let water_type = grid.block(pos);
    if !ids::is_water(water_type) {
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

    // Infinite-water rule: a flowing cell over a source or solid, flanked by
    // at least two sources, becomes a source itself next step.
    if !ids::is_water_source(water_type)
        && (ids::is_water_source(down_id) || is_solid(catalog, down_id))
    {
        let sources = [left_id, right_id, front_id, back_id]
            .into_iter()
            .filter(|&id| ids::is_water_source(id))
            .count();
        if sources >= 2 {
            ticks.schedule(WATER_SOURCE, pos, FLUID_TICK_RATE);
            return;
        }
    }

    let horizontals = [
        (left_id, left),
        (right_id, right),
        (front_id, front),
        (back_id, back),
    ];
    let unsupported = |cell: BlockId| {
        !ids::is_water(up_id)
            && horizontals
                .iter()
                .all(|&(id, _)| !outranks(catalog, id, cell))
    };

    // Downward flow: air or a flowing cell below receives the falling variant.
    if down_id == ids::AIR || (ids::is_water(down_id) && !ids::is_water_source(down_id)) {
        ticks.schedule(WATER_SOURCE + FALLING_OFFSET, down, FLUID_TICK_RATE);
        if !ids::is_water_source(water_type) && unsupported(water_type) {
            schedule_decay(ticks, water_type, pos);
            for (id, p) in horizontals {
                ticks.schedule(id, p, FLUID_TICK_RATE);
            }
        }
        return;
    }
    // The cell below is occupied; let it re-evaluate (it may be lava).
    ticks.schedule(down_id, down, FLUID_TICK_RATE);

    spread_horizontally(grid, catalog, pos, water_type, ticks);

    if !ids::is_water_source(water_type) && unsupported(water_type) {
        schedule_decay(ticks, water_type, pos);
        // Wake the neighborhood so it re-evaluates its own support.
        ticks.schedule(down_id, down, FLUID_TICK_RATE);
        for (id, p) in horizontals {
            ticks.schedule(id, p, FLUID_TICK_RATE);
        }
    }
}

fn spread_horizontally(
    grid: &ChunkGrid,
    catalog: &BlockCatalog,
    pos: BlockPos,
    water_type: BlockId,
    ticks: &mut TickQueue,
) {
    let level = catalog.get(water_type).stage as i32;
    let dirs = pos.horizontals();
    let mut weights = [crate::search::NO_DESCENT; 4];

    for (dir, &neighbor) in dirs.iter().enumerate() {
        let neighbor_id = grid.block(neighbor);
        if ids::is_lava(neighbor_id) {
            // Wake the lava instead of pathing through it.
            ticks.schedule(neighbor_id, neighbor, FLUID_TICK_RATE);
            continue;
        }
        let already_filled =
            ids::is_water(neighbor_id) && (catalog.get(neighbor_id).stage as i32) <= level + 1;
        if !is_solid(catalog, neighbor_id) && !already_filled {
            weights[dir] = descent_cost(grid, catalog, neighbor, DESCENT_SEARCH_DEPTH);
        } else {
            weights[dir] = crate::search::NO_DESCENT + 1;
        }
    }

    // Blocked directions rank strictly worse than "no descent found", so a
    // fully landlocked cell still spreads into every open direction.
    let min_weight = weights
        .iter()
        .copied()
        .min()
        .unwrap_or(crate::search::NO_DESCENT)
        .min(crate::search::NO_DESCENT);

    if level < MAX_SPREAD_LEVEL {
        for (dir, &target) in dirs.iter().enumerate() {
            if weights[dir] == min_weight {
                ticks.schedule(WATER_SOURCE + 1 + level, target, FLUID_TICK_RATE);
                let below_target = target.below();
                ticks.schedule(grid.block(below_target), below_target, FLUID_TICK_RATE);
            }
        }
    }
}
