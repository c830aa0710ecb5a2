//! # Voxel World Core
//!
//! This module holds the voxel world model: where blocks are, how tall each column is,
//! and how the world is populated. Nothing in here knows about windows, input or
//! rendering, so the whole module can be driven directly from tests.
//!
//! ## Architecture
//!
//! * **Grid**: structural cell keys, the cell → block index and the column occupancy set
//! * **Block**: the block record, the kind/level table and block faces
//! * **World**: the registry of live blocks and the event queue for the presenter
//! * **Generation**: the initial random layout and per-destruction replacements
//!
//! ## Data Flow
//!
//! 1. The generator or a placement stacks a block onto a column
//! 2. The world records it in the grid and queues a `BlockCreated` event
//! 3. Breaking removes it again and queues `BlockDestroyed`
//! 4. The presentation adapter drains the events once per tick

pub mod block;
pub mod generation;
pub mod grid;
pub mod world;
