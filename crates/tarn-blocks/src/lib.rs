//! Static block catalog: per-id properties consulted by ticks, fluids, and light.
#![forbid(unsafe_code)]

pub mod config;
pub mod ids;

mod catalog;

pub use catalog::{BlockCatalog, BlockInfo, MAX_BLOCK_ID};

/// Numeric block-state id. Signed: the tick engine uses negative values as
/// decay/sentinel encodings, so the id domain must cover them.
pub type BlockId = i32;
