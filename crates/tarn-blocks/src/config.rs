//! TOML-backed catalog definitions for embedding hosts that do not use the
//! builtin table.

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::catalog::{BlockCatalog, BlockInfo};

#[derive(Deserialize)]
pub struct CatalogConfig {
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize)]
pub struct BlockDef {
    pub name: String,
    pub id: i32,
    #[serde(default)]
    pub emission: u8,
    #[serde(default = "default_opacity")]
    pub opacity: u8,
    #[serde(default = "default_true")]
    pub can_place_on: bool,
    #[serde(default)]
    pub can_walk_through: bool,
    #[serde(default = "default_stages")]
    pub stages: u16,
}

fn default_opacity() -> u8 {
    15
}

fn default_true() -> bool {
    true
}

fn default_stages() -> u16 {
    1
}

impl BlockCatalog {
    pub fn from_config(cfg: CatalogConfig) -> Self {
        let mut cat = BlockCatalog::new();
        for def in cfg.blocks {
            let info = BlockInfo::new(
                def.name,
                def.emission,
                def.opacity,
                def.can_place_on,
                def.can_walk_through,
            );
            cat.register(def.id, info, def.stages);
        }
        cat
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: CatalogConfig = toml::from_str(s)?;
        Ok(Self::from_config(cfg))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
