//! Foreign-function boundary for the world-simulation core.
//!
//! The orchestrating process initializes a [`WorldHandle`] once and threads
//! the returned pointer through every call; there is no process-global state.
//! All calls are synchronous and non-reentrant.

mod packed;

use std::collections::HashMap;
use std::ptr;
use std::slice;
use std::sync::{Arc, Once};

pub use packed::{PackedChunk, PackedSection, SetBlockRequest};
use tarn_blocks::BlockCatalog;
use tarn_sim::Dimension;
use tarn_world::{BlockPos, ChunkCoord, ChunkRect, WORLD_WINDOW, WorldConfig};

/// Context object owning the dimension and the per-chunk snapshots handed out
/// to the orchestrator.
pub struct WorldHandle {
    dim: Dimension,
    snapshots: HashMap<(i32, i32), Box<PackedChunk>>,
}

impl WorldHandle {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            dim: Dimension::new(config, Arc::new(BlockCatalog::builtin())),
            snapshots: HashMap::new(),
        }
    }

    /// Snapshot one chunk, or `None` outside the world window. The returned
    /// reference stays valid until the next `load_chunk` for the same
    /// coordinate or the handle is dropped.
    pub fn load_chunk(&mut self, x: i32, z: i32) -> Option<&PackedChunk> {
        let chunk = self.dim.chunk(ChunkCoord::new(x, z))?;
        let snapshot = self
            .snapshots
            .entry((x, z))
            .or_insert_with(PackedChunk::zeroed);
        snapshot.fill_from(chunk);
        Some(snapshot)
    }

    /// Advance the world one step and mark every chunk changed.
    pub fn tick_chunk(&mut self) {
        self.dim.step();
        self.dim.bump_counters();
    }

    /// Immediate edit plus flush, per the external-edit contract.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, state_id: i32) {
        self.dim.stage_edit(BlockPos::new(x, y, z), state_id);
        self.dim.flush_staged();
        self.dim.bump_counters();
    }

    /// N edits sharing one flush.
    pub fn batch_set_block(&mut self, requests: &[SetBlockRequest]) {
        for r in requests {
            self.dim.stage_edit(BlockPos::new(r.x, r.y, r.z), r.state_id);
        }
        self.dim.flush_staged();
        self.dim.bump_counters();
    }

    /// Drop all pending scheduled ticks and reset the step counter.
    pub fn clear_ticks(&mut self) {
        self.dim.clear_ticks();
        self.dim.flush_staged();
        self.dim.bump_counters();
    }

    /// Flush edits staged without an immediate flush.
    pub fn tick_after_set_block(&mut self) {
        self.dim.flush_staged();
        self.dim.bump_counters();
    }

    pub fn dimension(&self) -> &Dimension {
        &self.dim
    }
}

static LOG_INIT: Once = Once::new();

fn init_logging() {
    LOG_INIT.call_once(|| {
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("info"),
        )
        .try_init();
    });
}

/// Create a world over the fixed window, recomputing light each step over the
/// given active region (pass an inverted rectangle to use the full window).
/// Returns an owned handle; release it with [`tarn_shutdown`].
#[unsafe(no_mangle)]
pub extern "C" fn tarn_init(
    active_min_cx: i32,
    active_min_cz: i32,
    active_max_cx: i32,
    active_max_cz: i32,
) -> *mut WorldHandle {
    init_logging();
    let active = if active_min_cx > active_max_cx || active_min_cz > active_max_cz {
        WORLD_WINDOW
    } else {
        ChunkRect::new(active_min_cx, active_min_cz, active_max_cx, active_max_cz)
    };
    log::info!(target: "bridge", "world initialized, active region {:?}", active);
    Box::into_raw(Box::new(WorldHandle::new(WorldConfig::with_active(active))))
}

/// # Safety
/// `handle` must come from [`tarn_init`] and not have been shut down.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tarn_shutdown(handle: *mut WorldHandle) {
    if handle.is_null() {
        return;
    }
    drop(unsafe { Box::from_raw(handle) });
}

/// # Safety
/// `handle` must be a live handle from [`tarn_init`]. The returned pointer is
/// invalidated by the next `tarn_load_chunk` for the same coordinate and by
/// `tarn_shutdown`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tarn_load_chunk(
    handle: *mut WorldHandle,
    x: i32,
    z: i32,
) -> *const PackedChunk {
    let h = unsafe { &mut *handle };
    match h.load_chunk(x, z) {
        Some(snapshot) => snapshot,
        None => ptr::null(),
    }
}

/// # Safety
/// `handle` must be a live handle from [`tarn_init`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tarn_tick_chunk(handle: *mut WorldHandle) {
    unsafe { &mut *handle }.tick_chunk();
}

/// # Safety
/// `handle` must be a live handle from [`tarn_init`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tarn_set_block(
    handle: *mut WorldHandle,
    x: i32,
    y: i32,
    z: i32,
    state_id: i32,
) {
    unsafe { &mut *handle }.set_block(x, y, z, state_id);
}

/// # Safety
/// `handle` must be a live handle from [`tarn_init`]; `requests` must point
/// to `len` valid records (or be null with `len` 0).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tarn_batch_set_block(
    handle: *mut WorldHandle,
    len: usize,
    requests: *const SetBlockRequest,
) {
    let h = unsafe { &mut *handle };
    let reqs = if len == 0 || requests.is_null() {
        &[]
    } else {
        unsafe { slice::from_raw_parts(requests, len) }
    };
    h.batch_set_block(reqs);
}

/// # Safety
/// `handle` must be a live handle from [`tarn_init`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tarn_clear_ticks(handle: *mut WorldHandle) {
    unsafe { &mut *handle }.clear_ticks();
}

/// # Safety
/// `handle` must be a live handle from [`tarn_init`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tarn_tick_after_set_block(handle: *mut WorldHandle) {
    unsafe { &mut *handle }.tick_after_set_block();
}
