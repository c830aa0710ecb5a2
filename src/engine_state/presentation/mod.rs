//! # Presentation Adapter
//!
//! The boundary between the gameplay core and whatever draws it. The core only talks
//! through [`Presenter`]: attach and detach notifications for blocks, damage opacity,
//! and one call per frame with the animation state and HUD snapshot.
//!
//! [`SceneMirror`] is the presenter the engine ships with. It mirrors the live blocks as
//! GPU-ready [`BlockInstance`] records, adds fading ghosts for destroyed blocks and
//! logs HUD changes.

use std::collections::HashMap;

use log::{debug, trace};

use super::{
    animation::AnimationFrame,
    session::HudSnapshot,
    voxels::{
        block::{Block, BlockId},
        world::WorldEvent,
    },
};

pub mod assets;
pub mod instance;

use assets::AssetCatalog;
use instance::BlockInstance;

/// Receives display updates from the gameplay core.
pub trait Presenter {
    /// A block entered the world.
    fn on_block_created(&mut self, block: &Block);

    /// A block left the world.
    fn on_block_destroyed(&mut self, block: &Block);

    /// A block's damage opacity changed.
    fn on_block_damaged(&mut self, id: BlockId, opacity: f32);

    /// Per-frame cosmetic state and HUD contents.
    fn present_frame(&mut self, frame: &AnimationFrame, hud: &HudSnapshot);

    /// Forwards queued world events in order.
    fn apply_events(&mut self, events: Vec<WorldEvent>) {
        for event in events {
            match event {
                WorldEvent::BlockCreated(block) => self.on_block_created(&block),
                WorldEvent::BlockDestroyed(block) => self.on_block_destroyed(&block),
                WorldEvent::BlockDamaged { id, opacity } => self.on_block_damaged(id, opacity),
            }
        }
    }
}

/// Instance-record mirror of the world plus cosmetic overlays.
pub struct SceneMirror {
    assets: AssetCatalog,
    blocks: HashMap<BlockId, BlockInstance>,
    ghosts: Vec<BlockInstance>,
    hand_rotation: f32,
    last_hud: Option<HudSnapshot>,
    instances_dirty: bool,
}

impl SceneMirror {
    /// Creates an empty mirror drawing with `assets`.
    pub fn new(assets: AssetCatalog) -> Self {
        Self {
            assets,
            blocks: HashMap::new(),
            ghosts: Vec::new(),
            hand_rotation: 0.0,
            last_hud: None,
            instances_dirty: true,
        }
    }

    /// The textures in use.
    pub fn assets(&self) -> &AssetCatalog {
        &self.assets
    }

    /// Instance of a live block.
    pub fn instance(&self, id: BlockId) -> Option<&BlockInstance> {
        self.blocks.get(&id)
    }

    /// Number of mirrored live blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Current hand rotation around x.
    pub fn hand_rotation(&self) -> f32 {
        self.hand_rotation
    }

    /// Last HUD snapshot presented.
    pub fn hud(&self) -> Option<&HudSnapshot> {
        self.last_hud.as_ref()
    }

    /// Every instance to draw this frame, live blocks first, then ghosts.
    pub fn instances(&self) -> Vec<BlockInstance> {
        self.blocks
            .values()
            .chain(self.ghosts.iter())
            .copied()
            .collect()
    }

    /// The instances as raw bytes for an instance buffer.
    pub fn instance_bytes(&self) -> Vec<u8> {
        let instances = self.instances();
        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        bytes.to_vec()
    }

    /// Instance bytes for an external renderer, built only when an instance changed
    /// since the last call.
    ///
    /// # Returns
    /// `None` when the previous upload is still current.
    pub fn take_instance_upload(&mut self) -> Option<Vec<u8>> {
        if !self.instances_dirty {
            return None;
        }
        self.instances_dirty = false;
        Some(self.instance_bytes())
    }
}

impl Presenter for SceneMirror {
    fn on_block_created(&mut self, block: &Block) {
        let instance = BlockInstance::new(
            block.cell,
            block.opacity(),
            1.0,
            self.assets.texture_index(block.kind),
        );
        self.blocks.insert(block.id, instance);
        self.instances_dirty = true;
    }

    fn on_block_destroyed(&mut self, block: &Block) {
        if self.blocks.remove(&block.id).is_some() {
            self.instances_dirty = true;
        }
    }

    fn on_block_damaged(&mut self, id: BlockId, opacity: f32) {
        // the block may already be gone
        if let Some(instance) = self.blocks.get_mut(&id) {
            instance.opacity = opacity;
            self.instances_dirty = true;
        }
    }

    fn present_frame(&mut self, frame: &AnimationFrame, hud: &HudSnapshot) {
        self.hand_rotation = frame.hand_rotation;
        if !(self.ghosts.is_empty() && frame.fades.is_empty()) {
            self.instances_dirty = true;
        }
        self.ghosts = frame
            .fades
            .iter()
            .map(|fade| {
                BlockInstance::new(
                    fade.cell,
                    fade.remaining,
                    fade.remaining,
                    self.assets.texture_index(fade.kind),
                )
            })
            .collect();

        if self.last_hud.as_ref() != Some(hud) {
            let items: Vec<String> = hud
                .inventory
                .iter()
                .map(|item| format!("{} x{}", item.kind, item.count))
                .collect();
            match &hud.selection {
                Some(selection) => debug!(
                    "HUD [{}] slot {} | {} at {} {:.0}%",
                    items.join(", "),
                    hud.selected_slot + 1,
                    selection.kind,
                    selection.cell,
                    selection.progress_ratio * 100.0
                ),
                None => debug!(
                    "HUD [{}] slot {}",
                    items.join(", "),
                    hud.selected_slot + 1
                ),
            }
            self.last_hud = Some(hud.clone());
        }

        trace!(
            "Frame: {} blocks, {} ghosts",
            self.blocks.len(),
            self.ghosts.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{
        animation::FadeFrame,
        voxels::{
            block::block_type::BlockKind,
            grid::{CellCoord, GridBounds, Layer},
            world::World,
        },
    };

    fn hud() -> HudSnapshot {
        HudSnapshot {
            inventory: Vec::new(),
            selected_slot: 0,
            selection: None,
        }
    }

    #[test]
    fn mirror_follows_world_events() {
        let mut world = World::new(GridBounds::from_grid_size(20));
        let mut mirror = SceneMirror::new(AssetCatalog::fallback_only());
        let keep = world
            .insert_block(CellCoord::new(1, Layer::GROUND, 1), BlockKind::Stone)
            .unwrap();
        let gone = world
            .insert_block(CellCoord::new(2, Layer::GROUND, 2), BlockKind::Wood)
            .unwrap();
        world.remove_block(gone);
        mirror.apply_events(world.drain_events());

        assert_eq!(mirror.block_count(), 1);
        assert_eq!(mirror.instance(keep).unwrap().texture_index, 1);

        mirror.on_block_damaged(keep, 0.25);
        mirror.on_block_damaged(gone, 0.5);
        assert_eq!(mirror.instance(keep).unwrap().opacity, 0.25);
    }

    #[test]
    fn fades_become_ghost_instances() {
        let mut mirror = SceneMirror::new(AssetCatalog::fallback_only());
        let frame = AnimationFrame {
            hand_rotation: 0.5,
            fades: vec![FadeFrame {
                cell: CellCoord::new(0, Layer::GROUND, 3),
                kind: BlockKind::Iron,
                remaining: 0.4,
            }],
        };
        mirror.present_frame(&frame, &hud());

        let instances = mirror.instances();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].scale, 0.4);
        assert_eq!(mirror.hand_rotation(), 0.5);
        assert_eq!(mirror.instance_bytes().len(), 32);
        assert_eq!(mirror.hud(), Some(&hud()));
    }

    #[test]
    fn upload_is_built_only_after_changes() {
        let mut world = World::new(GridBounds::from_grid_size(20));
        let mut mirror = SceneMirror::new(AssetCatalog::fallback_only());
        let id = world
            .insert_block(CellCoord::new(4, Layer::GROUND, 4), BlockKind::Wood)
            .unwrap();
        mirror.apply_events(world.drain_events());

        assert_eq!(mirror.take_instance_upload().map(|bytes| bytes.len()), Some(32));
        mirror.present_frame(&AnimationFrame::default(), &hud());
        assert!(mirror.take_instance_upload().is_none());

        mirror.on_block_damaged(id, 0.5);
        assert!(mirror.take_instance_upload().is_some());
        assert!(mirror.take_instance_upload().is_none());
    }
}
