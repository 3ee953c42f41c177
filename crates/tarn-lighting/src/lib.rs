//! Block-light recomputation: per-step clear plus concurrent flood fill from
//! every emitting voxel.
#![forbid(unsafe_code)]

use std::collections::VecDeque;

use rayon::prelude::*;
use tarn_blocks::{BlockCatalog, ids};
use tarn_chunk::{Chunk, ChunkGrid};
use tarn_world::{ChunkCoord, ChunkRect, Y_MAX, Y_MIN};

/// Fully opaque blocks absorb light instead of passing it on.
const OPAQUE: u8 = 15;

struct LightNode {
    coord: ChunkCoord,
    x: i32,
    y: i32,
    z: i32,
    level: u8,
    from_above: bool,
}

/// Recompute block light for every chunk of `active` (clipped to the grid's
/// window). The previous field is discarded wholesale; light never carries
/// meaning across steps.
///
/// Both phases fan out across chunks with rayon. Fills race on shared voxels;
/// each read-modify-write holds the voxel's granule lock and only a higher
/// level ever overwrites, so concurrent fills converge to the per-voxel max.
pub fn recompute(grid: &ChunkGrid, catalog: &BlockCatalog, active: ChunkRect) {
    let Some(active) = active.intersect(&grid.window()) else {
        return;
    };
    let coords = active.coords();

    coords.par_iter().for_each(|c| {
        if let Some(chunk) = grid.chunk(*c) {
            chunk.clear_block_light();
        }
    });

    coords.par_iter().for_each(|c| {
        let Some(chunk) = grid.chunk(*c) else {
            return;
        };
        seed_chunk(grid, catalog, active, *c, chunk);
    });
}

fn seed_chunk(
    grid: &ChunkGrid,
    catalog: &BlockCatalog,
    active: ChunkRect,
    coord: ChunkCoord,
    chunk: &Chunk,
) {
    for x in 0..16 {
        for y in Y_MIN..Y_MAX {
            for z in 0..16 {
                let id = chunk.block(x, y, z);
                if id == ids::AIR {
                    continue;
                }
                let emission = catalog.get(id).emission;
                if emission == 0 {
                    continue;
                }
                flood_fill(grid, catalog, active, coord, x, y, z, emission);
            }
        }
    }
}

/// Breadth-first fill from one seed, decrementing a level per hop in the six
/// axis directions. Branches stop at level 0, outside the vertical range, or
/// outside the active rectangle. Opaque voxels absorb the light and stop the
/// branch unless it arrived from directly above; the seed itself always
/// writes and propagates.
fn flood_fill(
    grid: &ChunkGrid,
    catalog: &BlockCatalog,
    active: ChunkRect,
    coord: ChunkCoord,
    x: i32,
    y: i32,
    z: i32,
    emission: u8,
) {
    let mut queue: VecDeque<LightNode> = VecDeque::new();
    queue.push_back(LightNode {
        coord,
        x,
        y,
        z,
        level: emission,
        from_above: true,
    });
    let mut source = true;

    while let Some(node) = queue.pop_front() {
        let LightNode {
            mut coord,
            mut x,
            y,
            mut z,
            level,
            from_above,
        } = node;
        if level == 0 {
            continue;
        }
        // Steps are single-axis, so at most one wrap per hop.
        if x < 0 {
            x = 15;
            coord.cx -= 1;
        } else if x >= 16 {
            x = 0;
            coord.cx += 1;
        }
        if y < Y_MIN || y >= Y_MAX {
            continue;
        }
        if z < 0 {
            z = 15;
            coord.cz -= 1;
        } else if z >= 16 {
            z = 0;
            coord.cz += 1;
        }
        if !active.contains(coord) {
            continue;
        }
        let Some(chunk) = grid.chunk(coord) else {
            continue;
        };

        let id = chunk.block(x, y, z);
        if id == ids::AIR {
            let guard = chunk.lock_light(x, y, z);
            let current = chunk.block_light(x, y, z);
            if current >= level && !source {
                drop(guard);
                continue;
            }
            if current < level {
                chunk.set_block_light(x, y, z, level);
            }
            drop(guard);
        } else {
            let info = catalog.get(id);
            if info.opacity == OPAQUE && !from_above {
                continue;
            }
            let guard = chunk.lock_light(x, y, z);
            let current = chunk.block_light(x, y, z);
            if current >= level && !source {
                drop(guard);
                continue;
            }
            if current < level {
                chunk.set_block_light(x, y, z, level);
            }
            if info.opacity == OPAQUE && !source {
                drop(guard);
                continue;
            }
            drop(guard);
        }

        source = false;
        if level > 1 {
            let next = level - 1;
            let push = |queue: &mut VecDeque<LightNode>, dx: i32, dy: i32, dz: i32, above: bool| {
                queue.push_back(LightNode {
                    coord,
                    x: x + dx,
                    y: y + dy,
                    z: z + dz,
                    level: next,
                    from_above: above,
                });
            };
            push(&mut queue, 1, 0, 0, false);
            push(&mut queue, -1, 0, 0, false);
            push(&mut queue, 0, -1, 0, true);
            push(&mut queue, 0, 1, 0, false);
            push(&mut queue, 0, 0, -1, false);
            push(&mut queue, 0, 0, 1, false);
        }
    }
}
