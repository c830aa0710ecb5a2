//! # Block Type Module
//!
//! This module defines the kinds of minable blocks in the voxel world.
//! A block's kind and its level are two views of the same thing: wood is level 1,
//! stone is level 2 and iron is level 3. The level drives durability.

use std::fmt;

use num_derive::FromPrimitive;

/// The lowest block level.
pub const MIN_LEVEL: u8 = 1;
/// The highest block level.
pub const MAX_LEVEL: u8 = 3;
/// Durability points granted per level.
pub const DURABILITY_PER_LEVEL: f64 = 3.0;

/// Enumerates all block kinds in the voxel world.
///
/// The discriminant of each variant is its level, which lets `FromPrimitive`
/// turn a rolled level straight into a kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive)]
pub enum BlockKind {
    /// Level 1 block, the quickest to break.
    Wood = 1,

    /// Level 2 block.
    Stone = 2,

    /// Level 3 block, the slowest to break.
    Iron = 3,
}

impl BlockKind {
    /// Every kind, in level order.
    pub const ALL: [BlockKind; 3] = [BlockKind::Wood, BlockKind::Stone, BlockKind::Iron];

    /// Converts a level into a block kind.
    ///
    /// # Arguments
    /// * `level` - The block level, expected in `1..=3`
    ///
    /// # Returns
    /// The matching `BlockKind`, or `None` when the level is out of range.
    pub fn from_level(level: u8) -> Option<Self> {
        num::FromPrimitive::from_u8(level)
    }

    /// The level of this kind.
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Total damage a freshly created block of this kind absorbs.
    pub fn durability(self) -> f64 {
        f64::from(self.level()) * DURABILITY_PER_LEVEL
    }

    /// Lowercase name, also used as the texture key.
    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Wood => "wood",
            BlockKind::Stone => "stone",
            BlockKind::Iron => "iron",
        }
    }

    /// Rolls a uniformly random kind using the given generator.
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::from_level(rng.u8(MIN_LEVEL..=MAX_LEVEL)).unwrap_or(BlockKind::Wood)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
