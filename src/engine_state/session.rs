//! # Game Session
//!
//! The gameplay core behind the window: world, generator, inventory, breaking state and
//! animations, advanced together by [`GameSession::tick`]. It has no window, camera or
//! GPU dependency; the engine state feeds it a [`TickInput`] once per frame.
//!
//! ## Tick order
//!
//! 1. Breaking: accumulate damage on the selection; on destruction spawn a replacement,
//!    credit the loot and start a fade
//! 2. Placement: stack the selected inventory kind onto the resolved column
//! 3. Animations: sample and retire cosmetic records

use log::debug;
use web_time::Instant;

use crate::config::GameConfig;

use super::{
    animation::{AnimationFrame, Animator},
    interaction::{
        breaking::{BreakInput, BreakStep, BreakingStateMachine},
        raycast::{placement_column, Ray},
    },
    inventory::{Inventory, InventoryItem},
    voxels::{
        block::{block_type::BlockKind, BlockId},
        generation::{GenerationReport, WorldGenerator},
        grid::CellCoord,
        world::{World, WorldEvent},
    },
};

/// Signals gathered by the presentation adapter for one tick.
#[derive(Copy, Clone, Debug)]
pub struct TickInput {
    /// Break action is held
    pub break_held: bool,
    /// Place action fired this tick
    pub place_fired: bool,
    /// The view is locked to the game
    pub view_locked: bool,
    /// Current look ray
    pub look_ray: Ray,
    /// Frame time, used only for animations
    pub now: Instant,
}

/// What one tick changed.
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    /// A block broke this tick
    pub broken: Option<BlockId>,
    /// Block generated to replace the broken one
    pub replacement: Option<BlockId>,
    /// Block placed by the player
    pub placed: Option<BlockId>,
    /// Cosmetic state for this frame
    pub animation: AnimationFrame,
}

/// HUD view of the selection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SelectionHud {
    /// Selected block
    pub id: BlockId,
    /// Its cell
    pub cell: CellCoord,
    /// Its kind
    pub kind: BlockKind,
    /// Progress over durability
    pub progress_ratio: f32,
}

/// Everything the HUD shows.
#[derive(Clone, Debug, PartialEq)]
pub struct HudSnapshot {
    /// Inventory entries in slot order
    pub inventory: Vec<InventoryItem>,
    /// Selected slot ordinal
    pub selected_slot: usize,
    /// Current selection, if any
    pub selection: Option<SelectionHud>,
}

/// One running game.
pub struct GameSession {
    world: World,
    generator: WorldGenerator,
    inventory: Inventory,
    breaker: BreakingStateMachine,
    animator: Animator,
    reach: f32,
    generation_report: GenerationReport,
}

impl GameSession {
    /// Starts a session and runs the initial world generation.
    pub fn new(config: &GameConfig) -> Self {
        let mut session = Self::new_empty(config);
        session.generation_report = session.generator.generate_initial(&mut session.world);
        session
    }

    /// Starts a session with an empty world.
    pub fn new_empty(config: &GameConfig) -> Self {
        Self {
            world: World::new(config.bounds()),
            generator: WorldGenerator::new(config.generation_settings(), config.seed),
            inventory: Inventory::new(),
            breaker: BreakingStateMachine::new(config.break_rate),
            animator: Animator::new(config.swing_duration(), config.fade_duration()),
            reach: config.reach,
            generation_report: GenerationReport {
                placed: 0,
                attempts: 0,
            },
        }
    }

    /// The voxel world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the voxel world, for seeding fixed layouts.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The player's inventory.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Mutable access to the inventory.
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// The breaking state machine.
    pub fn breaker(&self) -> &BreakingStateMachine {
        &self.breaker
    }

    /// Result of the initial generation pass.
    pub fn generation_report(&self) -> GenerationReport {
        self.generation_report
    }

    /// Selects an inventory slot.
    pub fn select_slot(&mut self, index: usize) {
        self.inventory.select_slot(index);
    }

    /// Advances the game by one tick.
    pub fn tick(&mut self, input: &TickInput) -> TickReport {
        let mut report = TickReport::default();

        let step = self.breaker.tick(
            &mut self.world,
            BreakInput {
                held: input.break_held,
                view_locked: input.view_locked,
                ray: &input.look_ray,
                reach: self.reach,
            },
        );
        match step {
            BreakStep::Damaged { .. } => self.animator.start_swing(input.now),
            BreakStep::Broken(block) => {
                self.animator.start_swing(input.now);
                self.animator.start_fade(input.now, block.cell, block.kind);
                report.broken = Some(block.id);
                report.replacement = self.generator.generate_replacement(&mut self.world);
                self.inventory.add(block.kind);
            }
            BreakStep::Idle | BreakStep::NoTarget => {}
        }

        if input.place_fired && input.view_locked {
            report.placed = self.place(&input.look_ray);
        }

        report.animation = self.animator.advance(input.now);
        report
    }

    /// Stacks one unit of the selected kind onto the column the ray points at.
    ///
    /// Every failure is a silent no-op for the player and only logged.
    fn place(&mut self, ray: &Ray) -> Option<BlockId> {
        let Some(kind) = self.inventory.selected_kind() else {
            debug!(
                "Nothing to place in slot {}",
                self.inventory.selected_slot()
            );
            return None;
        };
        let Some(column) = placement_column(&self.world, ray, self.reach) else {
            debug!("Placement ray hit nothing");
            return None;
        };

        match self.world.stack_block(column, kind) {
            Ok(id) => {
                self.inventory.consume_one(kind);
                debug!("Placed {} block in column {}", kind, column);
                Some(id)
            }
            Err(err) => {
                debug!("Placement rejected: {}", err);
                None
            }
        }
    }

    /// Inventory, slot and selection for the HUD.
    pub fn hud(&self) -> HudSnapshot {
        let selection = self
            .breaker
            .selection()
            .and_then(|id| self.world.block(id))
            .map(|block| SelectionHud {
                id: block.id,
                cell: block.cell,
                kind: block.kind,
                progress_ratio: block.progress_ratio(),
            });
        HudSnapshot {
            inventory: self.inventory.items().to_vec(),
            selected_slot: self.inventory.selected_slot(),
            selection,
        }
    }

    /// Takes the pending world events for the presenter.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.world.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::grid::{ColumnKey, Layer};
    use cgmath::{Point3, Vector3};

    fn config() -> GameConfig {
        GameConfig {
            seed: Some(11),
            ..GameConfig::default()
        }
    }

    fn input(ray: Ray) -> TickInput {
        TickInput {
            break_held: false,
            place_fired: false,
            view_locked: true,
            look_ray: ray,
            now: Instant::now(),
        }
    }

    #[test]
    fn new_session_generates_world() {
        let session = GameSession::new(&config());
        assert_eq!(session.world().len(), session.generation_report().placed);
        assert!(!session.world().is_empty());
    }

    #[test]
    fn breaking_credits_loot_and_replaces() {
        let mut session = GameSession::new_empty(&config());
        session
            .world_mut()
            .insert_block(CellCoord::new(0, Layer::GROUND, -4), BlockKind::Wood)
            .unwrap();
        let ray = Ray::new(Point3::new(0.0, 0.5, 0.0), Vector3::new(0.0, 0.0, -1.0));
        let tick = TickInput {
            break_held: true,
            ..input(ray)
        };

        let mut report = session.tick(&tick);
        assert!(session.hud().selection.is_some());
        while report.broken.is_none() {
            report = session.tick(&tick);
        }

        assert_eq!(session.inventory().count(BlockKind::Wood), 1);
        assert_eq!(session.world().len(), 1);
        assert!(report.replacement.is_some());
        assert_eq!(report.animation.fades.len(), 1);
        assert!(session.hud().selection.is_none());
    }

    #[test]
    fn placement_needs_lock_and_inventory() {
        let mut session = GameSession::new_empty(&config());
        let ray = Ray::new(Point3::new(0.0, 2.0, 0.0), Vector3::new(3.0, -2.0, 5.0));
        let fire = TickInput {
            place_fired: true,
            ..input(ray)
        };

        assert!(session.tick(&fire).placed.is_none());

        session.inventory_mut().add(BlockKind::Stone);
        let unlocked = TickInput {
            view_locked: false,
            ..fire
        };
        assert!(session.tick(&unlocked).placed.is_none());

        let id = session.tick(&fire).placed.unwrap();
        let block = session.world().block(id).unwrap();
        assert_eq!(block.cell.column(), ColumnKey::new(3, 5));
        assert_eq!(block.kind, BlockKind::Stone);
        assert!(session.inventory().is_empty());
    }
}
