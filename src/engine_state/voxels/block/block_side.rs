//! # Block Side Module
//!
//! This module defines the six faces of a unit block and the outward normal of each.
//! Ray hits report the face they entered through, which placement uses to step into
//! the neighbouring cell.

use cgmath::Vector3;

/// Represents the six possible faces of a block.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// Integer outward normal of the face.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
        }
    }

    /// Outward normal as a float vector.
    pub fn normal_f32(self) -> Vector3<f32> {
        let n = self.normal();
        Vector3::new(n.x as f32, n.y as f32, n.z as f32)
    }

    /// The face a ray enters through when it crosses the slab of `axis`
    /// (0 = x, 1 = y, 2 = z) travelling with the given direction sign.
    ///
    /// A ray moving towards +x enters through the -x face, and so on.
    pub fn entered_from(axis: usize, direction_positive: bool) -> BlockSide {
        match (axis, direction_positive) {
            (0, true) => BlockSide::LEFT,
            (0, false) => BlockSide::RIGHT,
            (1, true) => BlockSide::BOTTOM,
            (1, false) => BlockSide::TOP,
            (_, true) => BlockSide::BACK,
            (_, false) => BlockSide::FRONT,
        }
    }
}
