//! World coordinates, the fixed chunk window, and world configuration.
#![forbid(unsafe_code)]

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Lowest valid block Y (inclusive).
pub const Y_MIN: i32 = -64;
/// One past the highest valid block Y.
pub const Y_MAX: i32 = 320;
/// Vertical sections per chunk column.
pub const SECTIONS_PER_CHUNK: usize = 24;
/// Edge length of a section (and of a chunk column in X/Z).
pub const SECTION_SIZE: usize = 16;

/// The fixed world window: chunk X and Z both span [-8, 31].
pub const WORLD_WINDOW: ChunkRect = ChunkRect {
    min_cx: -8,
    min_cz: -8,
    max_cx: 31,
    max_cz: 31,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    #[inline]
    pub fn above(self) -> Self {
        self.offset(0, 1, 0)
    }

    #[inline]
    pub fn below(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// The 4 horizontal neighbors, in the scan order fluids use.
    #[inline]
    pub fn horizontals(self) -> [Self; 4] {
        [
            self.offset(0, 0, -1),
            self.offset(1, 0, 0),
            self.offset(0, 0, 1),
            self.offset(-1, 0, 0),
        ]
    }

    /// All 6 axis-aligned neighbors.
    #[inline]
    pub fn neighbors6(self) -> [Self; 6] {
        [
            self.offset(1, 0, 0),
            self.offset(-1, 0, 0),
            self.offset(0, 1, 0),
            self.offset(0, -1, 0),
            self.offset(0, 0, 1),
            self.offset(0, 0, -1),
        ]
    }

    #[inline]
    pub fn in_vertical_range(self) -> bool {
        self.y >= Y_MIN && self.y < Y_MAX
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    #[inline]
    pub fn from_block_pos(pos: BlockPos) -> Self {
        Self {
            cx: pos.x >> 4,
            cz: pos.z >> 4,
        }
    }
}

/// Inclusive rectangle of chunk coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRect {
    pub min_cx: i32,
    pub min_cz: i32,
    pub max_cx: i32,
    pub max_cz: i32,
}

impl ChunkRect {
    #[inline]
    pub const fn new(min_cx: i32, min_cz: i32, max_cx: i32, max_cz: i32) -> Self {
        Self {
            min_cx,
            min_cz,
            max_cx,
            max_cz,
        }
    }

    #[inline]
    pub fn contains(&self, c: ChunkCoord) -> bool {
        c.cx >= self.min_cx && c.cx <= self.max_cx && c.cz >= self.min_cz && c.cz <= self.max_cz
    }

    #[inline]
    pub fn width(&self) -> usize {
        (self.max_cx - self.min_cx + 1).max(0) as usize
    }

    #[inline]
    pub fn depth(&self) -> usize {
        (self.max_cz - self.min_cz + 1).max(0) as usize
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.width() * self.depth()
    }

    /// All chunk coordinates inside the rectangle, row-major in (cx, cz).
    pub fn coords(&self) -> Vec<ChunkCoord> {
        let mut out = Vec::with_capacity(self.chunk_count());
        for cx in self.min_cx..=self.max_cx {
            for cz in self.min_cz..=self.max_cz {
                out.push(ChunkCoord::new(cx, cz));
            }
        }
        out
    }

    pub fn intersect(&self, other: &ChunkRect) -> Option<ChunkRect> {
        let r = ChunkRect {
            min_cx: self.min_cx.max(other.min_cx),
            min_cz: self.min_cz.max(other.min_cz),
            max_cx: self.max_cx.min(other.max_cx),
            max_cz: self.max_cz.min(other.max_cz),
        };
        if r.min_cx > r.max_cx || r.min_cz > r.max_cz {
            None
        } else {
            Some(r)
        }
    }
}

/// World construction parameters. The active region bounds per-step light
/// recomputation; it is explicit configuration, never inferred from the
/// coordinates the orchestrator happens to touch first.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_window")]
    pub window: ChunkRect,
    #[serde(default = "default_window")]
    pub active: ChunkRect,
}

fn default_window() -> ChunkRect {
    WORLD_WINDOW
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            window: WORLD_WINDOW,
            active: WORLD_WINDOW,
        }
    }
}

impl WorldConfig {
    /// Full window with a narrowed active region.
    pub fn with_active(active: ChunkRect) -> Self {
        Self {
            window: WORLD_WINDOW,
            active,
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: WorldConfig = toml::from_str(s)?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Active region clipped to the window; empty configs collapse to the window.
    pub fn effective_active(&self) -> ChunkRect {
        self.active.intersect(&self.window).unwrap_or(self.window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_pos_orders_lexicographically() {
        let a = BlockPos::new(0, 5, 9);
        let b = BlockPos::new(0, 6, -3);
        let c = BlockPos::new(1, -64, 0);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn chunk_coord_floors_negative_positions() {
        let c = ChunkCoord::from_block_pos(BlockPos::new(-1, 0, -16));
        assert_eq!(c, ChunkCoord::new(-1, -1));
        let d = ChunkCoord::from_block_pos(BlockPos::new(15, 0, 16));
        assert_eq!(d, ChunkCoord::new(0, 1));
    }

    #[test]
    fn world_window_matches_fixed_extent() {
        assert_eq!(WORLD_WINDOW.width(), 40);
        assert_eq!(WORLD_WINDOW.depth(), 40);
        assert_eq!(WORLD_WINDOW.chunk_count(), 1600);
        assert!(WORLD_WINDOW.contains(ChunkCoord::new(-8, 31)));
        assert!(!WORLD_WINDOW.contains(ChunkCoord::new(32, 0)));
    }

    #[test]
    fn config_defaults_and_toml_override() {
        let cfg = WorldConfig::default();
        assert_eq!(cfg.effective_active(), WORLD_WINDOW);

        let cfg = WorldConfig::from_toml_str(
            r#"
            [window]
            min_cx = -8
            min_cz = -8
            max_cx = 31
            max_cz = 31

            [active]
            min_cx = 0
            min_cz = 0
            max_cx = 3
            max_cz = 3
        "#,
        )
        .unwrap();
        assert_eq!(cfg.effective_active(), ChunkRect::new(0, 0, 3, 3));
    }

    #[test]
    fn active_region_is_clipped_to_window() {
        let cfg = WorldConfig {
            window: ChunkRect::new(0, 0, 3, 3),
            active: ChunkRect::new(2, 2, 9, 9),
        };
        assert_eq!(cfg.effective_active(), ChunkRect::new(2, 2, 3, 3));
        // Disjoint active falls back to the window rather than an empty sweep.
        let cfg = WorldConfig {
            window: ChunkRect::new(0, 0, 3, 3),
            active: ChunkRect::new(10, 10, 12, 12),
        };
        assert_eq!(cfg.effective_active(), ChunkRect::new(0, 0, 3, 3));
    }
}
