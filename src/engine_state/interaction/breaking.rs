//! # Breaking State Machine
//!
//! Accumulates damage on the targeted block while the break action is held and removes
//! the block once its durability is exceeded.
//!
//! ```text
//! Idle ──hold──▶ Targeting ──hit──▶ Accumulating ──floor(progress) >= durability──▶ Destroyed
//!   ▲                │                   │                                           │
//!   └────release─────┴─────release───────┘◀───────────────next tick──────────────────┘
//! ```
//!
//! Progress grows by a fixed amount per tick, independent of block level, so a level 3
//! block simply needs three times the ticks of a level 1 block. Progress lives on the
//! block itself: releasing the action or switching targets never resets it.

use log::debug;

use crate::engine_state::voxels::{
    block::{Block, BlockId},
    world::World,
};

use super::raycast::{break_target, Ray};

/// Default damage dealt per tick.
pub const DEFAULT_BREAK_RATE: f64 = 0.05;

/// Current phase of the breaking action.
#[derive(Clone, Debug, PartialEq)]
pub enum BreakState {
    /// The action is not held.
    Idle,
    /// The action is held but nothing is selected.
    Targeting,
    /// Damage is accumulating on the selected block.
    Accumulating {
        /// The selected block
        block: BlockId,
    },
    /// The selected block broke on the last tick.
    Destroyed {
        /// The removed block
        block: Block,
    },
}

/// Signals the state machine reads each tick.
#[derive(Copy, Clone, Debug)]
pub struct BreakInput<'a> {
    /// Whether the break action is held
    pub held: bool,
    /// Whether the view is locked to the game
    pub view_locked: bool,
    /// Current look ray
    pub ray: &'a Ray,
    /// Maximum ray distance
    pub reach: f32,
}

/// What a tick did.
#[derive(Clone, Debug, PartialEq)]
pub enum BreakStep {
    /// Nothing happened.
    Idle,
    /// The action is held but the ray hits no block.
    NoTarget,
    /// The selected block took damage and survived.
    Damaged {
        /// The damaged block
        block: BlockId,
        /// Progress over durability after this tick
        ratio: f32,
    },
    /// The selected block broke and left the world.
    Broken(Block),
}

/// Per-tick breaking logic.
#[derive(Debug)]
pub struct BreakingStateMachine {
    state: BreakState,
    selection: Option<BlockId>,
    rate: f64,
}

impl Default for BreakingStateMachine {
    fn default() -> Self {
        Self::new(DEFAULT_BREAK_RATE)
    }
}

impl BreakingStateMachine {
    /// Creates an idle state machine dealing `rate` damage per tick.
    pub fn new(rate: f64) -> Self {
        Self {
            state: BreakState::Idle,
            selection: None,
            rate,
        }
    }

    /// The current phase.
    pub fn state(&self) -> &BreakState {
        &self.state
    }

    /// The selected block, if any.
    pub fn selection(&self) -> Option<BlockId> {
        self.selection
    }

    /// Damage dealt per tick.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Advances one tick.
    ///
    /// While the action is held and the view is locked: re-run the break-target query
    /// if nothing is selected, then damage the selection. A selection whose block has
    /// vanished is dropped before anything touches it. When the damage breaks the
    /// block it is removed from the world and returned in [`BreakStep::Broken`]; loot
    /// and replacement are up to the caller.
    pub fn tick(&mut self, world: &mut World, input: BreakInput<'_>) -> BreakStep {
        if !(input.held && input.view_locked) {
            self.state = BreakState::Idle;
            self.selection = None;
            return BreakStep::Idle;
        }

        if let Some(id) = self.selection {
            if !world.contains(id) {
                self.selection = None;
            }
        }

        if self.selection.is_none() {
            self.selection = break_target(world, input.ray, input.reach).map(|hit| hit.id);
            if let Some(block) = self.selection.and_then(|id| world.block(id)) {
                debug!(
                    "Selected {} block at {} (progress {:.2}/{})",
                    block.kind, block.cell, block.breaking_progress, block.durability
                );
            }
        }

        let Some(id) = self.selection else {
            self.state = BreakState::Targeting;
            return BreakStep::NoTarget;
        };
        let Some(block) = world.block_mut(id) else {
            self.selection = None;
            self.state = BreakState::Targeting;
            return BreakStep::NoTarget;
        };

        block.apply_damage(self.rate);
        let broken = block.is_broken();
        let ratio = block.progress_ratio();
        let opacity = block.opacity();

        if !broken {
            world.notify_damaged(id, opacity);
            self.state = BreakState::Accumulating { block: id };
            return BreakStep::Damaged { block: id, ratio };
        }

        self.selection = None;
        match world.remove_block(id) {
            Some(removed) => {
                debug!("Broke {} block at {}", removed.kind, removed.cell);
                self.state = BreakState::Destroyed {
                    block: removed.clone(),
                };
                BreakStep::Broken(removed)
            }
            None => {
                self.state = BreakState::Targeting;
                BreakStep::NoTarget
            }
        }
    }
}
