//! # Animation State
//!
//! Cosmetic animations as plain records of `(start, duration, kind)`, advanced once per
//! tick by [`Animator::advance`]. Nothing here reads or writes the world; a fade keeps
//! its own copy of the cell and kind so it survives the block it came from.

use std::f32::consts::{FRAC_PI_2, PI};

use web_time::{Duration, Instant};

use super::voxels::{block::block_type::BlockKind, grid::CellCoord};

/// What an animation record animates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AnimationKind {
    /// The hand swing played on every breaking tick.
    Swing,
    /// A destroyed block shrinking away at its old cell.
    Fade {
        /// Cell the block occupied
        cell: CellCoord,
        /// Kind of the destroyed block
        kind: BlockKind,
    },
}

/// A single running animation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnimationRecord {
    /// When the animation started
    pub start: Instant,
    /// Total length
    pub duration: Duration,
    /// What is animated
    pub kind: AnimationKind,
}

impl AnimationRecord {
    /// Normalized progress at `now`, clamped to `0.0..=1.0`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Whether the animation has run its course at `now`.
    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Hand rotation around x for swing progress `p`.
///
/// Rises to at most a quarter turn and settles back to zero at `p = 1`.
pub fn swing_rotation(p: f32) -> f32 {
    let p = p.clamp(0.0, 1.0);
    FRAC_PI_2 * (p * PI).sin() * (1.0 - p * 0.5)
}

/// Ghost of a destroyed block for one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FadeFrame {
    /// Cell the block occupied
    pub cell: CellCoord,
    /// Kind of the destroyed block
    pub kind: BlockKind,
    /// Remaining size and opacity, `1.0` down to `0.0`
    pub remaining: f32,
}

/// Everything the presenter needs to draw cosmetic state for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationFrame {
    /// Hand rotation around x in radians
    pub hand_rotation: f32,
    /// Running destruction fades
    pub fades: Vec<FadeFrame>,
}

/// Central updater for every running animation.
#[derive(Debug)]
pub struct Animator {
    swing: Option<AnimationRecord>,
    fades: Vec<AnimationRecord>,
    swing_duration: Duration,
    fade_duration: Duration,
}

impl Animator {
    /// Creates an animator with no running animations.
    pub fn new(swing_duration: Duration, fade_duration: Duration) -> Self {
        Self {
            swing: None,
            fades: Vec::new(),
            swing_duration,
            fade_duration,
        }
    }

    /// (Re)starts the hand swing at `now`. A running swing is replaced.
    pub fn start_swing(&mut self, now: Instant) {
        self.swing = Some(AnimationRecord {
            start: now,
            duration: self.swing_duration,
            kind: AnimationKind::Swing,
        });
    }

    /// Starts a destruction fade for a block that just left the world.
    pub fn start_fade(&mut self, now: Instant, cell: CellCoord, kind: BlockKind) {
        self.fades.push(AnimationRecord {
            start: now,
            duration: self.fade_duration,
            kind: AnimationKind::Fade { cell, kind },
        });
    }

    /// Whether any animation is still running.
    pub fn is_active(&self) -> bool {
        self.swing.is_some() || !self.fades.is_empty()
    }

    /// Running animation records, swing first.
    pub fn records(&self) -> impl Iterator<Item = &AnimationRecord> {
        self.swing.iter().chain(self.fades.iter())
    }

    /// Samples every animation at `now` and drops the finished ones.
    pub fn advance(&mut self, now: Instant) -> AnimationFrame {
        self.swing = self.swing.filter(|swing| !swing.is_finished(now));
        let hand_rotation = self
            .swing
            .map_or(0.0, |swing| swing_rotation(swing.progress(now)));

        self.fades.retain(|fade| !fade.is_finished(now));
        let fades = self
            .fades
            .iter()
            .filter_map(|record| match record.kind {
                AnimationKind::Fade { cell, kind } => Some(FadeFrame {
                    cell,
                    kind,
                    remaining: 1.0 - record.progress(now),
                }),
                AnimationKind::Swing => None,
            })
            .collect();

        AnimationFrame {
            hand_rotation,
            fades,
        }
    }
}
