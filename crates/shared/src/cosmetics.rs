//! Equipped appearance of the local user.

use std::path::{Path, PathBuf};

use bevy::prelude::{Component, Entity, Reflect, Resource};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marks the entity carrying the player's skinned visual model.
#[derive(Component, Reflect, Clone, Copy, Debug, Default)]
pub struct SkinnedModel;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Reflect, Serialize, Deserialize)]
pub enum CosmeticSlot {
    Hat,
    Hair,
    Face,
    Top,
    Bottom,
    Gloves,
    Footwear,
    Accessory,
}

#[derive(Clone, PartialEq, Debug, Reflect, Serialize, Deserialize)]
pub struct CosmeticItem {
    pub name: String,
    pub slot: CosmeticSlot,
    /// Asset path of the scene attached to the model.
    pub scene: String,
}

/// Ordered set of equipped items, at most one per slot.
#[derive(Clone, PartialEq, Debug, Default, Reflect, Serialize, Deserialize)]
pub struct CosmeticsSet {
    pub items: Vec<CosmeticItem>,
}

impl CosmeticsSet {
    pub fn from_items(items: impl IntoIterator<Item = CosmeticItem>) -> Self {
        let mut set = Self::default();
        for item in items {
            set.equip(item);
        }
        set
    }

    /// Equip `item`, replacing whatever occupied its slot.
    pub fn equip(&mut self, item: CosmeticItem) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.slot == item.slot) {
            *existing = item;
        } else {
            self.items.push(item);
        }
    }

    pub fn get(&self, slot: CosmeticSlot) -> Option<&CosmeticItem> {
        self.items.iter().find(|i| i.slot == slot)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum CosmeticsError {
    #[error("failed to read loadout {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed loadout: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Parse a RON loadout, resolving duplicate slots in file order.
pub fn parse_loadout(source: &str) -> Result<CosmeticsSet, CosmeticsError> {
    let raw: CosmeticsSet = ron::from_str(source)?;
    Ok(CosmeticsSet::from_items(raw.items))
}

pub fn load_loadout(path: &Path) -> Result<CosmeticsSet, CosmeticsError> {
    let source = std::fs::read_to_string(path).map_err(|source| CosmeticsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_loadout(&source)
}

/// Where the local user's loadout lives on disk.
#[derive(Resource, Clone, Debug, Default)]
pub struct LocalUserLoadout {
    pub path: Option<PathBuf>,
}

impl LocalUserLoadout {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

/// Cosmetics collaborator consumed by the player controller on start.
pub trait CosmeticsLoader {
    fn load_for_current_user(&mut self) -> CosmeticsSet;
    fn apply(&mut self, set: &CosmeticsSet, model: Entity);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, slot: CosmeticSlot) -> CosmeticItem {
        CosmeticItem {
            name: name.to_string(),
            slot,
            scene: format!("cosmetics/{name}.glb"),
        }
    }

    #[test]
    fn equip_replaces_same_slot() {
        let set = CosmeticsSet::from_items([
            item("beanie", CosmeticSlot::Hat),
            item("hoodie", CosmeticSlot::Top),
            item("cap", CosmeticSlot::Hat),
        ]);

        assert_eq!(set.items.len(), 2);
        assert_eq!(set.get(CosmeticSlot::Hat).map(|i| i.name.as_str()), Some("cap"));
        assert_eq!(set.items[0].slot, CosmeticSlot::Hat, "slot keeps its position");
    }

    #[test]
    fn parse_loadout_reads_ron() {
        let source = r#"(
            items: [
                (name: "beanie", slot: Hat, scene: "cosmetics/beanie.glb"),
                (name: "boots", slot: Footwear, scene: "cosmetics/boots.glb"),
            ],
        )"#;

        let set = parse_loadout(source).expect("loadout should parse");
        assert_eq!(set.items.len(), 2);
        assert_eq!(
            set.get(CosmeticSlot::Footwear).map(|i| i.scene.as_str()),
            Some("cosmetics/boots.glb")
        );
    }

    #[test]
    fn empty_loadout_equips_nothing() {
        let set = parse_loadout("(items: [])").expect("empty loadout should parse");
        assert!(set.is_empty());
        assert!(!CosmeticsSet::from_items([item("boots", CosmeticSlot::Footwear)]).is_empty());
    }

    #[test]
    fn parse_loadout_reports_malformed_input() {
        let result = parse_loadout("(items: [ (name: 3) ])");
        assert!(matches!(result, Err(CosmeticsError::Parse(_))));
    }

    #[test]
    fn missing_loadout_file_is_an_io_error() {
        let result = load_loadout(Path::new("/definitely/not/here/loadout.ron"));
        assert!(matches!(result, Err(CosmeticsError::Io { .. })));
    }
}
