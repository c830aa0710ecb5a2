//! # Block Module
//!
//! This module provides the block record kept by the world registry, along with the
//! block kind table and the faces a look ray can hit.

use block_type::BlockKind;

use super::grid::CellCoord;

pub mod block_side;
pub mod block_type;

/// Unique id of a live block instance.
///
/// Ids are never reused, so a stale selection can be detected by a failed lookup
/// even when another block has since been placed in the same cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u64);

/// Represents a single minable block in the world.
///
/// # Invariants
/// - `durability == max_durability == level * 3` at creation.
/// - `0 <= breaking_progress <= durability`.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// Instance id
    pub id: BlockId,
    /// The cell this block occupies
    pub cell: CellCoord,
    /// Resource kind, dropped as loot when the block breaks
    pub kind: BlockKind,
    /// Damage the block absorbs before it breaks
    pub durability: f64,
    /// Durability at creation
    pub max_durability: f64,
    /// Damage accumulated so far
    pub breaking_progress: f64,
}

impl Block {
    /// Creates an undamaged block of the given kind.
    ///
    /// # Arguments
    /// * `id` - The instance id handed out by the registry
    /// * `cell` - The cell the block occupies
    /// * `kind` - The block kind, which fixes its level and durability
    ///
    /// # Returns
    /// A new `Block` with zero breaking progress.
    pub fn new(id: BlockId, cell: CellCoord, kind: BlockKind) -> Self {
        let durability = kind.durability();
        Block {
            id,
            cell,
            kind,
            durability,
            max_durability: durability,
            breaking_progress: 0.0,
        }
    }

    /// The block level, `1..=3`.
    pub fn level(&self) -> u8 {
        self.kind.level()
    }

    /// Adds damage, never going past durability.
    pub fn apply_damage(&mut self, amount: f64) {
        self.breaking_progress = (self.breaking_progress + amount).clamp(0.0, self.durability);
    }

    /// Whether enough damage has been dealt to break the block.
    pub fn is_broken(&self) -> bool {
        self.breaking_progress.floor() >= self.durability
    }

    /// Fraction of durability already dealt, `0.0..=1.0`.
    pub fn progress_ratio(&self) -> f32 {
        if self.durability <= 0.0 {
            return 1.0;
        }
        (self.breaking_progress / self.durability) as f32
    }

    /// Cosmetic opacity derived from damage: `1 - progress / durability`.
    pub fn opacity(&self) -> f32 {
        1.0 - self.progress_ratio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::grid::Layer;

    fn block(kind: BlockKind) -> Block {
        Block::new(BlockId(1), CellCoord::new(0, Layer::GROUND, 0), kind)
    }

    #[test]
    fn new_block_durability_matches_level() {
        let b = block(BlockKind::Stone);
        assert_eq!(b.level(), 2);
        assert_eq!(b.durability, 6.0);
        assert_eq!(b.max_durability, 6.0);
        assert_eq!(b.breaking_progress, 0.0);
        assert_eq!(b.opacity(), 1.0);
    }

    #[test]
    fn damage_is_clamped_to_durability() {
        let mut b = block(BlockKind::Wood);
        b.apply_damage(10.0);
        assert_eq!(b.breaking_progress, 3.0);
        assert!(b.is_broken());
        assert_eq!(b.opacity(), 0.0);
    }

    #[test]
    fn broken_uses_floor_of_progress() {
        let mut b = block(BlockKind::Wood);
        b.apply_damage(2.99);
        assert!(!b.is_broken());
        b.apply_damage(0.01);
        assert!(b.is_broken());
    }
}
