//! # Interaction
//!
//! Turns the viewer's look ray into gameplay: picking the block to break, accumulating
//! damage on it and resolving where a placed block would land.

pub mod breaking;
pub mod raycast;
