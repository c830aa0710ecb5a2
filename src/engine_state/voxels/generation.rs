//! # World Generation
//!
//! Populates the world with an initial random layout and tops it up each time a block
//! is destroyed.
//!
//! Both passes sample random columns inside the grid bounds, skip the keep-clear square
//! around spawn and stack onto the sampled column with the column-height rule. The
//! loops are bounded by fixed attempt budgets, so they always terminate; running out
//! of attempts just leaves the world with fewer blocks.

use log::{debug, info};

use super::block::{block_type::BlockKind, BlockId};
use super::grid::ColumnKey;
use super::world::World;

/// Tunables for world generation.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationSettings {
    /// Number of blocks the initial pass aims for
    pub initial_block_count: usize,
    /// Sample budget of the initial pass
    pub initial_max_attempts: u32,
    /// Columns with `|x| < r && |z| < r` are never populated
    pub keep_clear_radius: i32,
    /// Sample budget of a single replacement
    pub replacement_max_attempts: u32,
    /// Chance to stack a replacement onto a column that already holds blocks
    pub replacement_stack_chance: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            initial_block_count: 100,
            initial_max_attempts: 1000,
            keep_clear_radius: 2,
            replacement_max_attempts: 100,
            replacement_stack_chance: 0.3,
        }
    }
}

/// Outcome of the initial generation pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GenerationReport {
    /// Blocks placed by the pass
    pub placed: usize,
    /// Samples drawn
    pub attempts: u32,
}

/// Random world populator.
pub struct WorldGenerator {
    rng: fastrand::Rng,
    settings: GenerationSettings,
}

impl WorldGenerator {
    /// Creates a generator.
    ///
    /// # Arguments
    /// * `settings` - Generation tunables
    /// * `seed` - Fixed seed for reproducible worlds, or `None` for a random one
    pub fn new(settings: GenerationSettings, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self { rng, settings }
    }

    /// The settings in use.
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Whether a column lies in the keep-clear square around spawn.
    pub fn is_keep_clear(&self, column: ColumnKey) -> bool {
        let r = self.settings.keep_clear_radius;
        column.x.abs() < r && column.z.abs() < r
    }

    fn sample_column(&mut self, world: &World) -> ColumnKey {
        let half = world.bounds().half_extent();
        ColumnKey::new(self.rng.i32(-half..=half), self.rng.i32(-half..=half))
    }

    /// Fills the world until it holds `initial_block_count` blocks or the sample
    /// budget runs out.
    ///
    /// Each sample picks a random column; samples in the keep-clear zone or on a full
    /// column are spent without placing anything. Placed blocks get a uniformly random
    /// level.
    pub fn generate_initial(&mut self, world: &mut World) -> GenerationReport {
        let start = world.len();
        let mut attempts = 0;

        while world.len() < self.settings.initial_block_count
            && attempts < self.settings.initial_max_attempts
        {
            attempts += 1;
            let column = self.sample_column(world);
            if self.is_keep_clear(column) {
                continue;
            }
            let kind = BlockKind::random(&mut self.rng);
            // a full column is just a wasted sample
            let _ = world.stack_block(column, kind);
        }

        let report = GenerationReport {
            placed: world.len() - start,
            attempts,
        };
        info!(
            "Generated {} blocks in {} attempts (target {})",
            report.placed, report.attempts, self.settings.initial_block_count
        );
        report
    }

    /// Places one block to replace a destroyed one.
    ///
    /// An empty column always accepts the block; a column that already has blocks
    /// accepts it only with `replacement_stack_chance`, which keeps towers from
    /// growing without limit. Gives up after `replacement_max_attempts` samples.
    ///
    /// # Returns
    /// The id of the new block, or `None` when every sample was rejected.
    pub fn generate_replacement(&mut self, world: &mut World) -> Option<BlockId> {
        for _ in 0..self.settings.replacement_max_attempts {
            let column = self.sample_column(world);
            if self.is_keep_clear(column) {
                continue;
            }
            let Some(cell) = world.grid().next_cell(column) else {
                continue;
            };

            let column_empty = !world.grid().is_column_occupied(column);
            if column_empty || self.rng.f32() < self.settings.replacement_stack_chance {
                let kind = BlockKind::random(&mut self.rng);
                if let Ok(id) = world.insert_block(cell, kind) {
                    debug!("Replacement {} block at {}", kind, cell);
                    return Some(id);
                }
            }
        }
        debug!("No replacement block placed");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::grid::{CellCoord, GridBounds, Layer, MAX_LAYERS};

    fn generator(seed: u64) -> WorldGenerator {
        WorldGenerator::new(GenerationSettings::default(), Some(seed))
    }

    #[test]
    fn initial_pass_respects_rules() {
        let mut world = World::new(GridBounds::from_grid_size(20));
        let mut worldgen = generator(42);
        let report = worldgen.generate_initial(&mut world);

        assert_eq!(report.placed, world.len());
        assert!(world.len() <= 100);
        assert!(report.attempts <= 1000);
        for block in world.blocks() {
            assert!((1..=3).contains(&block.level()));
            assert_eq!(block.durability, f64::from(block.level()) * 3.0);
            assert!(!worldgen.is_keep_clear(block.cell.column()));
            assert!(world.bounds().contains(block.cell.column()));
            assert!(block.cell.layer.index() < MAX_LAYERS);
        }
    }

    #[test]
    fn same_seed_same_world() {
        let mut a = World::new(GridBounds::from_grid_size(20));
        let mut b = World::new(GridBounds::from_grid_size(20));
        generator(9).generate_initial(&mut a);
        generator(9).generate_initial(&mut b);

        let mut cells_a: Vec<_> = a.blocks().map(|bl| (bl.cell, bl.kind)).collect();
        let mut cells_b: Vec<_> = b.blocks().map(|bl| (bl.cell, bl.kind)).collect();
        cells_a.sort();
        cells_b.sort();
        assert_eq!(cells_a, cells_b);
    }

    #[test]
    fn budget_exhaustion_is_not_an_error() {
        // 5x5 grid minus the 3x3 spawn square leaves 16 columns of 3 layers
        let mut world = World::new(GridBounds::from_grid_size(4));
        let report = generator(3).generate_initial(&mut world);

        assert_eq!(report.attempts, 1000);
        assert!(world.len() <= 48);
        assert_eq!(report.placed, world.len());
    }

    #[test]
    fn replacement_fills_empty_world() {
        let mut world = World::new(GridBounds::from_grid_size(20));
        let id = generator(1).generate_replacement(&mut world).unwrap();
        let block = world.block(id).unwrap();
        assert_eq!(block.cell.layer.index(), 0);
    }

    /// A 5x5 world whose 16 columns outside the spawn square all hold one block.
    fn ground_filled_world(worldgen: &WorldGenerator) -> World {
        let mut world = World::new(GridBounds::from_grid_size(4));
        for x in -2..=2 {
            for z in -2..=2 {
                let column = ColumnKey::new(x, z);
                if !worldgen.is_keep_clear(column) {
                    world
                        .insert_block(column.cell(Layer::GROUND), BlockKind::Wood)
                        .unwrap();
                }
            }
        }
        world
    }

    fn stacking(chance: f32, attempts: u32, seed: u64) -> WorldGenerator {
        let settings = GenerationSettings {
            replacement_stack_chance: chance,
            replacement_max_attempts: attempts,
            ..GenerationSettings::default()
        };
        WorldGenerator::new(settings, Some(seed))
    }

    #[test]
    fn replacement_never_stacks_with_zero_chance() {
        let mut worldgen = stacking(0.0, 100, 11);
        let mut world = ground_filled_world(&worldgen);
        assert_eq!(world.len(), 16);

        assert!(worldgen.generate_replacement(&mut world).is_none());
        assert_eq!(world.len(), 16);
    }

    #[test]
    fn replacement_always_stacks_with_full_chance() {
        let mut worldgen = stacking(1.0, 100, 11);
        let mut world = ground_filled_world(&worldgen);

        let id = worldgen.generate_replacement(&mut world).unwrap();
        let cell = world.block(id).unwrap().cell;
        assert_eq!(cell.layer.index(), 1);
        assert_eq!(
            world.block_at(CellCoord::new(cell.x, Layer::GROUND, cell.z)).map(|b| b.kind),
            Some(BlockKind::Wood)
        );
    }

    #[test]
    fn single_replacement_attempt_stacks_at_configured_rate() {
        // 16 of 25 samples land outside spawn, then 0.3 of those stack
        let trials = 2000;
        let successes = (0..trials)
            .filter(|&seed| {
                let mut worldgen = stacking(0.3, 1, seed);
                let mut world = ground_filled_world(&worldgen);
                worldgen.generate_replacement(&mut world).is_some()
            })
            .count();

        let expected = trials as f64 * 16.0 / 25.0 * 0.3;
        assert!(
            (successes as f64 - expected).abs() < 80.0,
            "{successes} stacked, expected about {expected}"
        );
    }

    #[test]
    fn replacement_gives_up_when_everything_is_full() {
        // only the keep-clear square exists, so every sample is rejected
        let mut world = World::new(GridBounds::from_grid_size(2));
        assert!(generator(5).generate_replacement(&mut world).is_none());
        assert!(world.is_empty());
    }
}
