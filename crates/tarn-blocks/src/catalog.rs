use super::BlockId;
use super::ids;

/// Static properties of one block state. `stage` is the fluid spread level
/// (0 = source) for multi-state fluid registrations, 0 for everything else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockInfo {
    pub name: String,
    pub stage: u8,
    pub emission: u8,
    pub opacity: u8,
    pub can_place_on: bool,
    pub can_walk_through: bool,
}

impl BlockInfo {
    pub fn new(
        name: impl Into<String>,
        emission: u8,
        opacity: u8,
        can_place_on: bool,
        can_walk_through: bool,
    ) -> Self {
        Self {
            name: name.into(),
            stage: 0,
            emission,
            opacity,
            can_place_on,
            can_walk_through,
        }
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        !self.can_walk_through
    }
}

/// Immutable id-indexed property table. Built once at startup and passed into
/// the dimension; lookups for unregistered or out-of-range ids resolve to a
/// default opaque solid rather than failing.
#[derive(Clone, Debug)]
pub struct BlockCatalog {
    infos: Vec<Option<BlockInfo>>,
    default_info: BlockInfo,
}

/// Upper bound on registrable ids, matching the orchestrator's id space.
pub const MAX_BLOCK_ID: usize = 20000;

impl BlockCatalog {
    pub fn new() -> Self {
        Self {
            infos: vec![None; MAX_BLOCK_ID],
            default_info: BlockInfo::new("default", 0, 15, true, false),
        }
    }

    /// Register `stages` consecutive ids sharing `info`; each state's fluid
    /// stage is its index modulo 8 (levels, then falling variants).
    pub fn register(&mut self, id: BlockId, info: BlockInfo, stages: u16) {
        for i in 0..stages as i32 {
            let state = id + i;
            if state < 0 || state as usize >= MAX_BLOCK_ID {
                continue;
            }
            let mut entry = info.clone();
            entry.stage = (i % 8) as u8;
            self.infos[state as usize] = Some(entry);
        }
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> &BlockInfo {
        if id < 0 || id as usize >= MAX_BLOCK_ID {
            return &self.default_info;
        }
        self.infos[id as usize].as_ref().unwrap_or(&self.default_info)
    }

    #[inline]
    pub fn is_registered(&self, id: BlockId) -> bool {
        id >= 0 && (id as usize) < MAX_BLOCK_ID && self.infos[id as usize].is_some()
    }

    /// The catalog the FFI path uses: the fixed block set the orchestrator
    /// addresses by id, with water and lava registered as 16-state fluids.
    pub fn builtin() -> Self {
        let mut cat = Self::new();
        cat.register(ids::AIR, BlockInfo::new("air", 0, 0, false, true), 1);
        cat.register(ids::STONE, BlockInfo::new("stone", 0, 15, true, false), 1);
        cat.register(
            ids::GRASS_BLOCK,
            BlockInfo::new("grass_block", 0, 15, true, false),
            1,
        );
        cat.register(ids::DIRT, BlockInfo::new("dirt", 0, 15, true, false), 1);
        cat.register(
            ids::COBBLESTONE,
            BlockInfo::new("cobblestone", 0, 15, true, false),
            1,
        );
        cat.register(ids::BEDROCK, BlockInfo::new("bedrock", 0, 15, true, false), 1);
        cat.register(
            ids::WATER_SOURCE,
            BlockInfo::new("water", 0, 2, false, true),
            16,
        );
        cat.register(
            ids::LAVA_SOURCE,
            BlockInfo::new("lava", 15, 15, false, true),
            16,
        );
        cat.register(
            ids::OBSIDIAN,
            BlockInfo::new("obsidian", 0, 15, true, false),
            1,
        );
        cat.register(ids::TORCH, BlockInfo::new("torch", 14, 15, true, false), 1);
        cat.register(ids::FIRE, BlockInfo::new("fire", 15, 15, true, true), 1);
        cat.register(
            ids::REDSTONE_TORCH,
            BlockInfo::new("redstone_torch", 7, 15, true, false),
            1,
        );
        cat.register(
            ids::SOUL_TORCH,
            BlockInfo::new("soul_torch", 10, 15, true, false),
            1,
        );
        cat.register(
            ids::GLOWSTONE,
            BlockInfo::new("glowstone", 15, 15, true, false),
            1,
        );
        cat.register(
            ids::SEA_LANTERN,
            BlockInfo::new("sea_lantern", 15, 15, true, false),
            1,
        );
        cat.register(ids::END_ROD, BlockInfo::new("end_rod", 14, 15, true, false), 1);
        cat.register(ids::LANTERN, BlockInfo::new("lantern", 15, 15, true, false), 1);
        cat
    }
}

impl Default for BlockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_ids_resolve_to_default() {
        let cat = BlockCatalog::builtin();
        let info = cat.get(4242);
        assert_eq!(info.name, "default");
        assert!(info.is_solid());
        assert_eq!(info.opacity, 15);
        // Out-of-range ids too, including negatives.
        assert_eq!(cat.get(-7).name, "default");
        assert_eq!(cat.get(1_000_000).name, "default");
    }

    #[test]
    fn fluid_stages_wrap_at_falling_variants() {
        let cat = BlockCatalog::builtin();
        assert_eq!(cat.get(ids::WATER_SOURCE).stage, 0);
        assert_eq!(cat.get(ids::WATER_SOURCE + 7).stage, 7);
        // Falling source restarts the stage cycle.
        assert_eq!(cat.get(ids::WATER_SOURCE + 8).stage, 0);
        assert_eq!(cat.get(ids::WATER_SOURCE + 15).stage, 7);
        assert_eq!(cat.get(ids::LAVA_SOURCE + 9).stage, 1);
    }

    #[test]
    fn builtin_spot_checks() {
        let cat = BlockCatalog::builtin();
        assert!(cat.get(ids::AIR).can_walk_through);
        assert_eq!(cat.get(ids::AIR).opacity, 0);
        assert_eq!(cat.get(ids::WATER_SOURCE).opacity, 2);
        assert!(!cat.get(ids::WATER_SOURCE).is_solid());
        assert_eq!(cat.get(ids::LAVA_SOURCE).emission, 15);
        assert_eq!(cat.get(ids::GLOWSTONE).emission, 15);
        assert_eq!(cat.get(ids::END_ROD).emission, 14);
        assert_eq!(cat.get(ids::REDSTONE_TORCH).emission, 7);
        assert!(cat.get(ids::OBSIDIAN).is_solid());
        assert!(cat.is_registered(ids::LANTERN));
        assert!(!cat.is_registered(2));
    }
}
