//! # World Module
//!
//! This module provides the `World` struct, the registry of live blocks. It owns every
//! [`Block`] record, keeps the [`GridIndex`] in step with them and queues
//! [`WorldEvent`]s for the presentation side to drain once per tick.
//!
//! ## Architecture
//!
//! Blocks are stored by [`BlockId`] and the grid maps cells to ids. All mutation goes
//! through `insert_block` / `remove_block`, so the two maps can never disagree.
//! Everything here is single-threaded and owned by the tick loop.

use std::collections::{HashMap, VecDeque};

use thiserror::Error;

use super::block::{block_type::BlockKind, Block, BlockId};
use super::grid::{CellCoord, ColumnKey, GridBounds, GridIndex};

/// Why a block could not be put into a cell.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// The column lies outside the grid extent.
    #[error("cell {0} is outside the grid")]
    OutOfBounds(CellCoord),

    /// Another block already occupies the cell.
    #[error("cell {0} is already occupied")]
    Occupied(CellCoord),

    /// The column has reached the stacking cap.
    #[error("column {0} is full")]
    ColumnFull(ColumnKey),
}

/// Notifications for the presentation collaborator.
#[derive(Clone, Debug, PartialEq)]
pub enum WorldEvent {
    /// A block entered the world and should be attached to the display.
    BlockCreated(Block),
    /// A block left the world and should be detached from the display.
    BlockDestroyed(Block),
    /// A block took damage; its cosmetic opacity changed.
    BlockDamaged {
        /// The damaged block
        id: BlockId,
        /// New opacity, `1 - progress / durability`
        opacity: f32,
    },
}

/// Registry of every live block in the voxel world.
///
/// # Examples
///
/// ```
/// use voxel_miner::engine_state::voxels::{
///     block::block_type::BlockKind,
///     grid::{ColumnKey, GridBounds},
///     world::World,
/// };
///
/// let mut world = World::new(GridBounds::from_grid_size(20));
/// let id = world.stack_block(ColumnKey::new(3, 5), BlockKind::Stone).unwrap();
/// assert_eq!(world.block(id).unwrap().durability, 6.0);
/// assert_eq!(world.grid().height_at(ColumnKey::new(3, 5)), 0.5);
/// ```
pub struct World {
    bounds: GridBounds,
    grid: GridIndex,
    blocks: HashMap<BlockId, Block>,
    next_id: u64,
    events: VecDeque<WorldEvent>,
}

impl World {
    /// Creates a new, empty world.
    ///
    /// # Arguments
    ///
    /// * `bounds` - The horizontal extent blocks may occupy
    pub fn new(bounds: GridBounds) -> Self {
        World {
            bounds,
            grid: GridIndex::new(),
            blocks: HashMap::new(),
            next_id: 0,
            events: VecDeque::new(),
        }
    }

    /// The horizontal extent of the world.
    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Read access to the grid index.
    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    /// Looks up a live block by id.
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    /// Mutable access to a live block.
    ///
    /// Only the breaking state machine should change a block, and only its progress.
    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(&id)
    }

    /// Block occupying a cell, if any.
    pub fn block_at(&self, cell: CellCoord) -> Option<&Block> {
        self.grid.get(cell).and_then(|id| self.blocks.get(&id))
    }

    /// Whether the block is still alive.
    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    /// Iterates over all live blocks in no particular order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// Number of live blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the world holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Puts a new block into an exact cell.
    ///
    /// # Arguments
    ///
    /// * `cell` - Target cell
    /// * `kind` - Kind of the new block
    ///
    /// # Returns
    ///
    /// The id of the created block, or the reason the cell was rejected.
    pub fn insert_block(
        &mut self,
        cell: CellCoord,
        kind: BlockKind,
    ) -> Result<BlockId, PlacementError> {
        if !self.bounds.contains(cell.column()) {
            return Err(PlacementError::OutOfBounds(cell));
        }

        let id = BlockId(self.next_id);
        if !self.grid.insert(cell, id) {
            return Err(PlacementError::Occupied(cell));
        }
        self.next_id += 1;

        let block = Block::new(id, cell, kind);
        self.events.push_back(WorldEvent::BlockCreated(block.clone()));
        self.blocks.insert(id, block);
        Ok(id)
    }

    /// Stacks a new block on top of a column following the column-height rule.
    pub fn stack_block(
        &mut self,
        column: ColumnKey,
        kind: BlockKind,
    ) -> Result<BlockId, PlacementError> {
        let cell = self
            .grid
            .next_cell(column)
            .ok_or(PlacementError::ColumnFull(column))?;
        self.insert_block(cell, kind)
    }

    /// Removes a block from the registry and the grid.
    ///
    /// Blocks above the removed one stay where they are.
    ///
    /// # Returns
    ///
    /// The removed block, or `None` when the id is no longer alive.
    pub fn remove_block(&mut self, id: BlockId) -> Option<Block> {
        let block = self.blocks.remove(&id)?;
        self.grid.remove(block.cell);
        self.events
            .push_back(WorldEvent::BlockDestroyed(block.clone()));
        Some(block)
    }

    /// Queues a damage notification for a block.
    ///
    /// A block has at most one pending damage event; a newer one overwrites its opacity.
    pub(crate) fn notify_damaged(&mut self, id: BlockId, opacity: f32) {
        let pending = self.events.iter_mut().find_map(|event| match event {
            WorldEvent::BlockDamaged {
                id: pending_id,
                opacity: pending_opacity,
            } if *pending_id == id => Some(pending_opacity),
            _ => None,
        });
        match pending {
            Some(pending_opacity) => *pending_opacity = opacity,
            None => self
                .events
                .push_back(WorldEvent::BlockDamaged { id, opacity }),
        }
    }

    /// Takes every pending event in the order they happened.
    ///
    /// The queue only empties here, so whoever drives the ticks should drain it once
    /// per tick. Damage events are merged per block while they wait.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.events.drain(..).collect()
    }
}
