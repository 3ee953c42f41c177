//! Deduplicated, time-ordered scheduled-tick queue with deterministic
//! intra-step ordering.
#![forbid(unsafe_code)]

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use hashbrown::HashSet;
use tarn_blocks::ids::{self, FALLING_OFFSET, LAVA_SOURCE, WATER_SOURCE};
use tarn_blocks::BlockId;
use tarn_world::BlockPos;

/// Entry type marking an externally edited position: the id write already
/// happened, only the behavior re-runs.
pub const SENTINEL: BlockId = -1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScheduledTick {
    pub pos: BlockPos,
    pub ty: BlockId,
    pub trigger: i64,
}

impl Ord for ScheduledTick {
    fn cmp(&self, other: &Self) -> Ordering {
        self.trigger
            .cmp(&other.trigger)
            .then_with(|| self.pos.cmp(&other.pos))
            .then_with(|| self.ty.cmp(&other.ty))
    }
}

impl PartialOrd for ScheduledTick {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One position's resolution for the current step. `apply` is the id to write
/// before behavior dispatch; `None` for sentinel entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickAction {
    pub pos: BlockPos,
    pub apply: Option<BlockId>,
}

/// Composite rank of an entry type at one position. Lower runs first:
/// solid/placed blocks, then lava decay, lava flow, water decay, water flow
/// (each fluid interleaving falling variants by level), then air.
fn priority_key(ty: BlockId) -> i32 {
    let water_level = if ids::is_water(ty) {
        ((ty - WATER_SOURCE) % 8) * 2 + ((ty - WATER_SOURCE) / 8) + 1
    } else {
        0
    };
    let lava_level = if ids::is_lava(ty) {
        ((ty - LAVA_SOURCE) % 8) * 2 + ((ty - LAVA_SOURCE) / 8) + 1
    } else {
        0
    };
    let water_done = ids::is_water_decay(ty) as i32;
    let lava_done = ids::is_lava_decay(ty) as i32;
    let air = (ty == ids::AIR) as i32;
    (lava_done << 1) | (lava_level << 2) | (water_done << 7) | (water_level << 8) | (air << 13)
}

/// Total order over a step's run-set: position-lexicographic between
/// positions; sentinel first, then the priority lattice within one position.
fn run_order(a: &ScheduledTick, b: &ScheduledTick) -> Ordering {
    match a.pos.cmp(&b.pos) {
        Ordering::Equal => match (a.ty == SENTINEL, b.ty == SENTINEL) {
            (true, true) => a.trigger.cmp(&b.trigger),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => priority_key(a.ty)
                .cmp(&priority_key(b.ty))
                .then_with(|| a.trigger.cmp(&b.trigger))
                .then_with(|| a.ty.cmp(&b.ty)),
        },
        ord => ord,
    }
}

/// Map an entry type to the id actually written. Negative types encode fluid
/// decay: the bottom-level falling ids become air, everything else flips to
/// the positive id one level weaker than what decayed.
fn resolve(ty: BlockId) -> Option<BlockId> {
    if ty == SENTINEL {
        None
    } else if ty < 0 {
        if ty == -(WATER_SOURCE + FALLING_OFFSET) || ty == -(LAVA_SOURCE + FALLING_OFFSET) {
            Some(ids::AIR)
        } else {
            Some(-ty)
        }
    } else {
        Some(ty)
    }
}

pub struct TickQueue {
    time: i64,
    pending: BinaryHeap<Reverse<ScheduledTick>>,
    scheduled: HashSet<ScheduledTick>,
}

impl TickQueue {
    pub fn new() -> Self {
        Self {
            time: 0,
            pending: BinaryHeap::new(),
            scheduled: HashSet::new(),
        }
    }

    #[inline]
    pub fn time(&self) -> i64 {
        self.time
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Queue `ty` at `pos` after `delay` steps. Exact duplicates of a pending
    /// (pos, ty, trigger) triple are silently dropped.
    pub fn schedule(&mut self, ty: BlockId, pos: BlockPos, delay: i64) {
        let tick = ScheduledTick {
            pos,
            ty,
            trigger: self.time + delay.max(0),
        };
        if self.scheduled.insert(tick) {
            self.pending.push(Reverse(tick));
        }
    }

    /// Advance one step and return the step's resolved run-set in dispatch
    /// order: exactly one action per distinct due position.
    pub fn advance(&mut self) -> Vec<TickAction> {
        self.time += 1;
        self.run_pass()
    }

    /// Resolve entries due at the current time without advancing it; used to
    /// flush externally staged edits between steps.
    pub fn run_staged(&mut self) -> Vec<TickAction> {
        self.run_pass()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.scheduled.clear();
        self.time = 0;
    }

    fn run_pass(&mut self) -> Vec<TickAction> {
        let mut due: Vec<ScheduledTick> = Vec::new();
        while let Some(&Reverse(next)) = self.pending.peek() {
            if next.trigger > self.time {
                break;
            }
            self.pending.pop();
            self.scheduled.remove(&next);
            due.push(next);
        }
        due.sort_by(run_order);

        let mut out = Vec::with_capacity(due.len());
        let mut i = 0;
        while i < due.len() {
            let winner = due[i];
            out.push(TickAction {
                pos: winner.pos,
                apply: resolve(winner.ty),
            });
            // Later entries at the same position lost the priority sort and
            // are dropped outright, not deferred.
            i += 1;
            while i < due.len() && due[i].pos == winner.pos {
                i += 1;
            }
        }
        out
    }
}

impl Default for TickQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: BlockPos = BlockPos::new(3, 64, -5);

    #[test]
    fn duplicate_schedules_collapse_to_one_entry() {
        let mut q = TickQueue::new();
        q.schedule(ids::WATER_SOURCE, P, 1);
        q.schedule(ids::WATER_SOURCE, P, 1);
        assert_eq!(q.pending_len(), 1);
        // A different trigger time is a distinct entry.
        q.schedule(ids::WATER_SOURCE, P, 2);
        assert_eq!(q.pending_len(), 2);
    }

    #[test]
    fn entries_run_at_their_trigger_time() {
        let mut q = TickQueue::new();
        q.schedule(ids::STONE, P, 2);
        assert!(q.advance().is_empty());
        let batch = q.advance();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0], TickAction { pos: P, apply: Some(ids::STONE) });
        assert_eq!(q.pending_len(), 0);
    }

    #[test]
    fn negative_delay_is_clamped_to_now() {
        let mut q = TickQueue::new();
        q.schedule(ids::STONE, P, -3);
        let batch = q.run_staged();
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn run_staged_does_not_advance_time() {
        let mut q = TickQueue::new();
        q.schedule(ids::STONE, P, 0);
        let _ = q.run_staged();
        assert_eq!(q.time(), 0);
        let _ = q.advance();
        assert_eq!(q.time(), 1);
    }

    #[test]
    fn same_position_resolves_once_by_priority() {
        let mut q = TickQueue::new();
        q.schedule(ids::AIR, P, 1);
        q.schedule(ids::WATER_SOURCE + 3, P, 1);
        q.schedule(ids::STONE, P, 1);
        let batch = q.advance();
        assert_eq!(batch.len(), 1);
        // The placed solid outranks the water flow and the air entry.
        assert_eq!(batch[0].apply, Some(ids::STONE));
    }

    #[test]
    fn sentinel_outranks_everything_and_skips_apply() {
        let mut q = TickQueue::new();
        q.schedule(ids::STONE, P, 0);
        q.schedule(SENTINEL, P, 0);
        let batch = q.run_staged();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].apply, None);
    }

    #[test]
    fn priority_lattice_matches_the_fixed_ranks() {
        // solid < lava decay < lava flow < water decay < water flow < air
        let ranks = [
            priority_key(ids::OBSIDIAN),
            priority_key(-(LAVA_SOURCE + 2)),
            priority_key(LAVA_SOURCE + 1),
            priority_key(-(WATER_SOURCE + 2)),
            priority_key(WATER_SOURCE + 1),
            priority_key(ids::AIR),
        ];
        for w in ranks.windows(2) {
            assert!(w[0] < w[1], "{} !< {}", w[0], w[1]);
        }
        // Within a fluid, falling variants interleave one rank above their level.
        assert!(priority_key(WATER_SOURCE) < priority_key(WATER_SOURCE + 8));
        assert!(priority_key(WATER_SOURCE + 8) < priority_key(WATER_SOURCE + 1));
        assert!(priority_key(WATER_SOURCE + 1) < priority_key(WATER_SOURCE + 9));
    }

    #[test]
    fn decay_entries_resolve_to_air_or_one_level_weaker() {
        assert_eq!(resolve(-(WATER_SOURCE + 8)), Some(ids::AIR));
        assert_eq!(resolve(-(LAVA_SOURCE + 8)), Some(ids::AIR));
        assert_eq!(resolve(-(WATER_SOURCE + 3)), Some(WATER_SOURCE + 3));
        assert_eq!(resolve(-(LAVA_SOURCE + 1)), Some(LAVA_SOURCE + 1));
        assert_eq!(resolve(SENTINEL), None);
        assert_eq!(resolve(ids::STONE), Some(ids::STONE));
    }

    #[test]
    fn distinct_positions_dispatch_in_lexicographic_order() {
        let mut q = TickQueue::new();
        let a = BlockPos::new(1, 0, 0);
        let b = BlockPos::new(0, 5, 0);
        let c = BlockPos::new(0, 0, 9);
        q.schedule(ids::STONE, a, 0);
        q.schedule(ids::STONE, b, 0);
        q.schedule(ids::STONE, c, 0);
        let batch = q.run_staged();
        let order: Vec<BlockPos> = batch.iter().map(|t| t.pos).collect();
        assert_eq!(order, vec![c, b, a]);
    }

    #[test]
    fn clear_empties_the_queue_and_resets_time() {
        let mut q = TickQueue::new();
        q.schedule(ids::STONE, P, 5);
        let _ = q.advance();
        q.clear();
        assert_eq!(q.time(), 0);
        assert_eq!(q.pending_len(), 0);
        // Re-scheduling the same triple works after clear.
        q.schedule(ids::STONE, P, 5);
        assert_eq!(q.pending_len(), 1);
    }
}
