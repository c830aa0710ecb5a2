//! # Inventory
//!
//! Counted collection of mined block kinds. Entries keep the order in which their kind
//! was first picked up, and the selected slot is an index into that order.

use log::debug;

use super::voxels::block::block_type::BlockKind;

/// One stack of collected blocks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InventoryItem {
    /// Kind of the collected blocks
    pub kind: BlockKind,
    /// Number held, always greater than zero
    pub count: u32,
}

/// The player's collected blocks.
///
/// # Invariants
/// - At most one entry per kind.
/// - Every entry has `count > 0`; an entry is removed as soon as it reaches zero.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    items: Vec<InventoryItem>,
    selected_slot: usize,
}

impl Inventory {
    /// Creates an empty inventory with slot 0 selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in first-pickup order.
    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    /// Number held of a kind.
    pub fn count(&self, kind: BlockKind) -> u32 {
        self.items
            .iter()
            .find(|item| item.kind == kind)
            .map_or(0, |item| item.count)
    }

    /// Whether nothing is held.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The selected slot ordinal. It may point past the last entry.
    pub fn selected_slot(&self) -> usize {
        self.selected_slot
    }

    /// Adds one unit of `kind`, creating its entry at the end if needed.
    pub fn add(&mut self, kind: BlockKind) {
        match self.items.iter_mut().find(|item| item.kind == kind) {
            Some(item) => item.count += 1,
            None => self.items.push(InventoryItem { kind, count: 1 }),
        }
        debug!("Inventory +1 {} (now {})", kind, self.count(kind));
    }

    /// Selects a slot by its position among the current entries.
    ///
    /// The index is stored as given; a slot without an entry just makes placement a
    /// no-op until something fills it.
    pub fn select_slot(&mut self, index: usize) {
        self.selected_slot = index;
    }

    /// Kind in the selected slot, if that slot holds anything.
    pub fn selected_kind(&self) -> Option<BlockKind> {
        self.items
            .get(self.selected_slot)
            .filter(|item| item.count > 0)
            .map(|item| item.kind)
    }

    /// Removes one unit of `kind`, deleting the entry when it runs out.
    ///
    /// # Returns
    /// `false` when no unit of `kind` was held.
    pub fn consume_one(&mut self, kind: BlockKind) -> bool {
        let Some(index) = self.items.iter().position(|item| item.kind == kind) else {
            return false;
        };
        let item = &mut self.items[index];
        item.count = item.count.saturating_sub(1);
        if item.count == 0 {
            self.items.remove(index);
            debug!("Inventory ran out of {}", kind);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_keeps_pickup_order() {
        let mut inventory = Inventory::new();
        inventory.add(BlockKind::Stone);
        inventory.add(BlockKind::Wood);
        inventory.add(BlockKind::Stone);

        assert_eq!(
            inventory.items(),
            &[
                InventoryItem {
                    kind: BlockKind::Stone,
                    count: 2
                },
                InventoryItem {
                    kind: BlockKind::Wood,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn consuming_last_unit_removes_entry() {
        let mut inventory = Inventory::new();
        inventory.add(BlockKind::Wood);
        assert!(inventory.consume_one(BlockKind::Wood));
        assert!(inventory.is_empty());
        assert_eq!(inventory.count(BlockKind::Wood), 0);
        assert!(!inventory.consume_one(BlockKind::Wood));
    }

    #[test]
    fn stale_slot_selects_nothing() {
        let mut inventory = Inventory::new();
        inventory.add(BlockKind::Wood);
        inventory.add(BlockKind::Iron);
        inventory.select_slot(1);
        assert_eq!(inventory.selected_kind(), Some(BlockKind::Iron));

        inventory.consume_one(BlockKind::Iron);
        assert_eq!(inventory.selected_kind(), None);

        inventory.select_slot(0);
        assert_eq!(inventory.selected_kind(), Some(BlockKind::Wood));
    }
}
