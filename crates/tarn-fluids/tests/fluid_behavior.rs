use tarn_blocks::{BlockCatalog, ids};
use tarn_chunk::ChunkGrid;
use tarn_fluids::{BehaviorTable, dispatch};
use tarn_ticks::TickQueue;
use tarn_world::{BlockPos, ChunkRect};

struct Harness {
    grid: ChunkGrid,
    catalog: BlockCatalog,
    table: BehaviorTable,
    ticks: TickQueue,
}

impl Harness {
    /// 3x3 chunk grid with a solid stone floor at y = 63.
    fn with_floor() -> Self {
        let mut grid = ChunkGrid::new(ChunkRect::new(-1, -1, 1, 1));
        for x in -16..32 {
            for z in -16..32 {
                grid.set_block(BlockPos::new(x, 63, z), ids::STONE);
            }
        }
        Self {
            grid,
            catalog: BlockCatalog::builtin(),
            table: BehaviorTable::new(),
            ticks: TickQueue::new(),
        }
    }

    fn set(&mut self, pos: BlockPos, id: i32) {
        self.grid.set_block(pos, id);
    }

    fn wake(&mut self, pos: BlockPos) {
        self.ticks.schedule(self.grid.block(pos), pos, 1);
    }

    fn step(&mut self) {
        let batch = self.ticks.advance();
        for a in &batch {
            if let Some(id) = a.apply {
                self.grid.set_block(a.pos, id);
            }
        }
        for a in &batch {
            dispatch(&self.table, &self.grid, &self.catalog, a.pos, &mut self.ticks);
        }
    }
}

#[test]
fn two_source_neighbors_regrow_a_source() {
    let mut h = Harness::with_floor();
    let center = BlockPos::new(0, 64, 0);
    h.set(center, ids::WATER_SOURCE + 2);
    h.set(BlockPos::new(-1, 64, 0), ids::WATER_SOURCE);
    h.set(BlockPos::new(1, 64, 0), ids::WATER_SOURCE);
    h.wake(center);
    h.step(); // behavior schedules the source transition
    h.step(); // transition applies
    assert_eq!(h.grid.block(center), ids::WATER_SOURCE);
}

#[test]
fn one_source_neighbor_does_not_regrow() {
    let mut h = Harness::with_floor();
    let center = BlockPos::new(0, 64, 0);
    h.set(center, ids::WATER_SOURCE + 2);
    h.set(BlockPos::new(-1, 64, 0), ids::WATER_SOURCE);
    h.wake(center);
    h.step();
    h.step();
    assert_ne!(h.grid.block(center), ids::WATER_SOURCE);
}

#[test]
fn water_over_air_becomes_falling_below() {
    let mut h = Harness::with_floor();
    let src = BlockPos::new(0, 70, 0);
    h.set(src, ids::WATER_SOURCE);
    h.wake(src);
    h.step();
    h.step();
    assert_eq!(
        h.grid.block(src.below()),
        ids::WATER_SOURCE + ids::FALLING_OFFSET
    );
}

#[test]
fn bottom_level_flow_without_support_decays_to_air() {
    let mut h = Harness::with_floor();
    let lone = BlockPos::new(0, 64, 0);
    h.set(lone, ids::WATER_SOURCE + 7);
    h.wake(lone);
    h.step(); // schedules the vanish entry
    h.step(); // applies it
    assert_eq!(h.grid.block(lone), ids::AIR);
}

#[test]
fn mid_level_flow_without_support_weakens_one_level() {
    let mut h = Harness::with_floor();
    let lone = BlockPos::new(0, 64, 0);
    h.set(lone, ids::WATER_SOURCE + 2);
    h.wake(lone);
    h.step();
    h.step();
    assert_eq!(h.grid.block(lone), ids::WATER_SOURCE + 3);
}

#[test]
fn flow_supported_by_a_stronger_neighbor_survives() {
    let mut h = Harness::with_floor();
    let cell = BlockPos::new(0, 64, 0);
    h.set(cell, ids::WATER_SOURCE + 2);
    h.set(BlockPos::new(1, 64, 0), ids::WATER_SOURCE + 1);
    h.wake(cell);
    h.step();
    h.step();
    assert_eq!(h.grid.block(cell), ids::WATER_SOURCE + 2);
}

#[test]
fn spread_prefers_the_nearest_descent_point() {
    let mut h = Harness::with_floor();
    let src = BlockPos::new(0, 64, 0);
    h.set(src, ids::WATER_SOURCE);
    // Hole in the floor two hops east of the eastern neighbor.
    h.set(BlockPos::new(3, 63, 0), ids::AIR);
    h.wake(src);
    h.step();
    h.step();
    assert_eq!(h.grid.block(BlockPos::new(1, 64, 0)), ids::WATER_SOURCE + 1);
    assert_eq!(h.grid.block(BlockPos::new(-1, 64, 0)), ids::AIR);
    assert_eq!(h.grid.block(BlockPos::new(0, 64, 1)), ids::AIR);
    assert_eq!(h.grid.block(BlockPos::new(0, 64, -1)), ids::AIR);
}

#[test]
fn landlocked_source_spreads_every_open_direction() {
    let mut h = Harness::with_floor();
    let src = BlockPos::new(0, 64, 0);
    h.set(src, ids::WATER_SOURCE);
    h.wake(src);
    h.step();
    h.step();
    for n in src.horizontals() {
        assert_eq!(h.grid.block(n), ids::WATER_SOURCE + 1);
    }
}

#[test]
fn level_seven_flow_does_not_spread() {
    let mut h = Harness::with_floor();
    let cell = BlockPos::new(0, 64, 0);
    h.set(cell, ids::WATER_SOURCE + 7);
    // Keep it alive with a stronger neighbor.
    h.set(BlockPos::new(1, 64, 0), ids::WATER_SOURCE + 6);
    h.wake(cell);
    h.step();
    h.step();
    assert_eq!(h.grid.block(BlockPos::new(-1, 64, 0)), ids::AIR);
    assert_eq!(h.grid.block(BlockPos::new(0, 64, 1)), ids::AIR);
}

#[test]
fn lava_source_beside_water_hardens_to_obsidian() {
    let mut h = Harness::with_floor();
    let lava = BlockPos::new(0, 64, 0);
    let water = BlockPos::new(1, 64, 0);
    h.set(lava, ids::LAVA_SOURCE);
    h.set(water, ids::WATER_SOURCE);
    h.wake(lava);
    h.step();
    h.step();
    assert_eq!(h.grid.block(lava), ids::OBSIDIAN);
    // The lava's own spread entry outranks the water re-tick at that cell.
    assert_eq!(h.grid.block(water), ids::LAVA_SOURCE + 1);
}

#[test]
fn flowing_lava_beside_water_hardens_to_cobblestone() {
    let mut h = Harness::with_floor();
    let lava = BlockPos::new(0, 64, 0);
    h.set(lava, ids::LAVA_SOURCE + 3);
    h.set(BlockPos::new(1, 64, 0), ids::WATER_SOURCE);
    // Keep the flow supported so decay does not race the reaction.
    h.set(BlockPos::new(-1, 64, 0), ids::LAVA_SOURCE + 2);
    h.wake(lava);
    h.step();
    h.step();
    assert_eq!(h.grid.block(lava), ids::COBBLESTONE);
}

#[test]
fn lava_over_water_hardens_downward_variant() {
    let mut h = Harness::with_floor();
    let lava = BlockPos::new(0, 64, 0);
    h.set(lava, ids::LAVA_SOURCE);
    h.set(lava.below(), ids::WATER_SOURCE);
    h.wake(lava);
    h.step();
    h.step();
    assert_eq!(h.grid.block(lava), ids::OBSIDIAN);
}

#[test]
fn lava_spreads_like_water_but_slower_ranked_ids() {
    let mut h = Harness::with_floor();
    let src = BlockPos::new(0, 64, 0);
    h.set(src, ids::LAVA_SOURCE);
    h.wake(src);
    h.step();
    h.step();
    for n in src.horizontals() {
        assert_eq!(h.grid.block(n), ids::LAVA_SOURCE + 1);
    }
}
