//! Scene-backed cosmetics: equips the local user's loadout onto a skinned model.

use bevy::ecs::system::SystemParam;
use bevy::gltf::GltfAssetLabel;
use bevy::prelude::{
    AssetServer, ChildOf, Commands, Component, Entity, Name, Query, Res, SceneRoot, Transform,
    debug, info, warn,
};

use shared::cosmetics::{
    CosmeticSlot, CosmeticsLoader, CosmeticsSet, LocalUserLoadout, load_loadout,
};

/// A spawned cosmetic scene and the slot it fills on its parent model.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CosmeticAttachment {
    pub slot: CosmeticSlot,
}

#[derive(SystemParam)]
pub struct SceneCosmetics<'w, 's> {
    commands: Commands<'w, 's>,
    asset_server: Option<Res<'w, AssetServer>>,
    loadout: Option<Res<'w, LocalUserLoadout>>,
    attachments: Query<'w, 's, (Entity, &'static CosmeticAttachment, &'static ChildOf)>,
}

impl CosmeticsLoader for SceneCosmetics<'_, '_> {
    fn load_for_current_user(&mut self) -> CosmeticsSet {
        let Some(path) = self.loadout.as_ref().and_then(|loadout| loadout.path.clone()) else {
            debug!("No local user loadout configured");
            return CosmeticsSet::default();
        };

        match load_loadout(&path) {
            Ok(set) => {
                info!("Loaded {} cosmetic items from {}", set.items.len(), path.display());
                set
            }
            Err(error) => {
                warn!("Ignoring local user loadout: {}", error);
                CosmeticsSet::default()
            }
        }
    }

    fn apply(&mut self, set: &CosmeticsSet, model: Entity) {
        if set.is_empty() {
            debug!("Empty loadout, {:?} keeps its attachments", model);
            return;
        }

        for (entity, attachment, child_of) in self.attachments.iter() {
            let replaced = set.get(attachment.slot).is_some();
            if child_of.parent() == model && replaced {
                self.commands.entity(entity).despawn();
            }
        }

        for item in &set.items {
            let mut attachment = self.commands.spawn((
                Name::new(format!("Cosmetic:{:?}", item.slot)),
                CosmeticAttachment { slot: item.slot },
                Transform::default(),
                ChildOf(model),
            ));

            match self.asset_server.as_ref() {
                Some(asset_server) => {
                    let scene =
                        asset_server.load(GltfAssetLabel::Scene(0).from_asset(item.scene.clone()));
                    attachment.insert(SceneRoot(scene));
                }
                None => debug!("No asset server, {} stays empty", item.name),
            }
        }
    }
}
