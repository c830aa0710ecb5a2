//! # Grid Index
//!
//! Maps discrete cell coordinates to the block occupying them and keeps track of
//! which columns hold at least one block.
//!
//! Cells are keyed structurally: `x` and `z` are integers on the unit grid and the
//! vertical position is a [`Layer`] index, so `y = layer + 0.5`. No float ever ends
//! up in a hash key.
//!
//! ## Invariants
//! - At most one block occupies a cell.
//! - A column key is present in the occupancy set iff at least one cell in that
//!   column is occupied.

use std::collections::{HashMap, HashSet};
use std::fmt;

use cgmath::Point3;

use super::block::BlockId;

/// Number of stackable layers in a column.
pub const MAX_LAYERS: u8 = 3;

/// A vertical block level. Layer 0 rests on the ground at `y = 0.5`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Layer(u8);

impl Layer {
    /// The layer resting on the ground.
    pub const GROUND: Layer = Layer(0);

    /// Creates a layer, or `None` when the index is above the stacking cap.
    pub fn new(index: u8) -> Option<Self> {
        (index < MAX_LAYERS).then_some(Layer(index))
    }

    /// Zero-based index of this layer.
    pub fn index(self) -> u8 {
        self.0
    }

    /// World-space y of the center of a block on this layer.
    pub fn center_y(self) -> f32 {
        f32::from(self.0) + 0.5
    }

    /// The layer directly above, if the cap allows it.
    pub fn above(self) -> Option<Self> {
        Layer::new(self.0 + 1)
    }

    /// Iterates all layers bottom to top.
    pub fn all() -> impl DoubleEndedIterator<Item = Layer> {
        (0..MAX_LAYERS).map(Layer)
    }
}

/// Identifies a column by its horizontal position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnKey {
    /// Grid x
    pub x: i32,
    /// Grid z
    pub z: i32,
}

impl ColumnKey {
    /// Creates a column key.
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The cell of this column on the given layer.
    pub fn cell(self, layer: Layer) -> CellCoord {
        CellCoord::new(self.x, layer, self.z)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// A discrete grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    /// Grid x
    pub x: i32,
    /// Stacking layer
    pub layer: Layer,
    /// Grid z
    pub z: i32,
}

impl CellCoord {
    /// Creates a cell coordinate.
    pub fn new(x: i32, layer: Layer, z: i32) -> Self {
        Self { x, layer, z }
    }

    /// The column containing this cell.
    pub fn column(self) -> ColumnKey {
        ColumnKey::new(self.x, self.z)
    }

    /// World-space center of the unit cube at this cell.
    pub fn center(self) -> Point3<f32> {
        Point3::new(self.x as f32, self.layer.center_y(), self.z as f32)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.layer.center_y(), self.z)
    }
}

/// Square horizontal extent of the playable grid, centered on the origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridBounds {
    half_extent: i32,
}

impl GridBounds {
    /// Bounds for a grid `grid_size` cells wide. Coordinates range over
    /// `[-grid_size / 2, grid_size / 2]` on both axes.
    pub fn from_grid_size(grid_size: u32) -> Self {
        Self {
            half_extent: (grid_size / 2) as i32,
        }
    }

    /// Largest absolute coordinate inside the bounds.
    pub fn half_extent(&self) -> i32 {
        self.half_extent
    }

    /// Whether the column lies inside the bounds.
    pub fn contains(&self, column: ColumnKey) -> bool {
        column.x.abs() <= self.half_extent && column.z.abs() <= self.half_extent
    }
}

/// Hash-backed index from cells to block ids plus the column occupancy set.
#[derive(Debug, Default)]
pub struct GridIndex {
    cells: HashMap<CellCoord, BlockId>,
    occupied_columns: HashSet<ColumnKey>,
}

impl GridIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Block occupying the cell, if any.
    pub fn get(&self, cell: CellCoord) -> Option<BlockId> {
        self.cells.get(&cell).copied()
    }

    /// Whether a block occupies the cell.
    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Columns holding at least one block.
    pub fn occupied_columns(&self) -> &HashSet<ColumnKey> {
        &self.occupied_columns
    }

    /// Whether the column holds at least one block.
    pub fn is_column_occupied(&self, column: ColumnKey) -> bool {
        self.occupied_columns.contains(&column)
    }

    /// Highest occupied layer of a column.
    pub fn top_layer(&self, column: ColumnKey) -> Option<Layer> {
        if !self.is_column_occupied(column) {
            return None;
        }
        Layer::all().rev().find(|layer| self.is_occupied(column.cell(*layer)))
    }

    /// Column height: the y of the highest block, or `0.0` for an empty column.
    pub fn height_at(&self, column: ColumnKey) -> f32 {
        self.top_layer(column).map_or(0.0, Layer::center_y)
    }

    /// Next cell a block stacked onto this column would occupy.
    ///
    /// An empty column yields the ground layer, otherwise the layer above the
    /// current top. Returns `None` once the column reaches the stacking cap.
    pub fn next_cell(&self, column: ColumnKey) -> Option<CellCoord> {
        let layer = match self.top_layer(column) {
            None => Layer::GROUND,
            Some(top) => top.above()?,
        };
        Some(column.cell(layer))
    }

    /// Number of indexed blocks.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the index holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Records a block at a cell. Returns `false` and leaves the index untouched
    /// when the cell is already taken.
    pub(crate) fn insert(&mut self, cell: CellCoord, id: BlockId) -> bool {
        if self.cells.contains_key(&cell) {
            return false;
        }
        self.cells.insert(cell, id);
        self.occupied_columns.insert(cell.column());
        true
    }

    /// Clears a cell, evicting its column key when no block is left in the column.
    pub(crate) fn remove(&mut self, cell: CellCoord) -> Option<BlockId> {
        let id = self.cells.remove(&cell)?;
        let column = cell.column();
        if !Layer::all().any(|layer| self.is_occupied(column.cell(layer))) {
            self.occupied_columns.remove(&column);
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(i: u8) -> Layer {
        Layer::new(i).unwrap()
    }

    #[test]
    fn layers_are_capped() {
        assert_eq!(Layer::new(2).map(Layer::center_y), Some(2.5));
        assert!(Layer::new(MAX_LAYERS).is_none());
        assert!(layer(2).above().is_none());
    }

    #[test]
    fn height_follows_stack() {
        let mut grid = GridIndex::new();
        let column = ColumnKey::new(4, -3);
        assert_eq!(grid.height_at(column), 0.0);
        assert_eq!(grid.next_cell(column), Some(column.cell(layer(0))));

        grid.insert(column.cell(layer(0)), BlockId(1));
        assert_eq!(grid.height_at(column), 0.5);
        assert_eq!(grid.next_cell(column), Some(column.cell(layer(1))));

        grid.insert(column.cell(layer(1)), BlockId(2));
        assert_eq!(grid.height_at(column), 1.5);
        assert_eq!(grid.next_cell(column), Some(column.cell(layer(2))));

        grid.insert(column.cell(layer(2)), BlockId(3));
        assert_eq!(grid.height_at(column), 2.5);
        assert_eq!(grid.next_cell(column), None);
    }

    #[test]
    fn rejects_second_block_in_cell() {
        let mut grid = GridIndex::new();
        let cell = CellCoord::new(0, Layer::GROUND, 0);
        assert!(grid.insert(cell, BlockId(1)));
        assert!(!grid.insert(cell, BlockId(2)));
        assert_eq!(grid.get(cell), Some(BlockId(1)));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn column_key_evicted_only_when_column_empties() {
        let mut grid = GridIndex::new();
        let column = ColumnKey::new(1, 1);
        grid.insert(column.cell(layer(0)), BlockId(1));
        grid.insert(column.cell(layer(1)), BlockId(2));

        grid.remove(column.cell(layer(0)));
        assert!(grid.is_column_occupied(column));
        // the upper block does not fall
        assert_eq!(grid.height_at(column), 1.5);

        grid.remove(column.cell(layer(1)));
        assert!(!grid.is_column_occupied(column));
        assert!(grid.occupied_columns().is_empty());
    }

    #[test]
    fn bounds_are_inclusive() {
        let bounds = GridBounds::from_grid_size(20);
        assert!(bounds.contains(ColumnKey::new(10, -10)));
        assert!(!bounds.contains(ColumnKey::new(11, 0)));
        assert!(!bounds.contains(ColumnKey::new(0, -11)));
    }
}
