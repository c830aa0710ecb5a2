//! # Ray Queries
//!
//! Casts the viewer's look ray against live blocks and the ground plane.
//!
//! - The **break-target query** only sees blocks and returns the nearest one.
//! - The **placement query** also sees the ground and turns the nearest hit into
//!   the column a new block would be stacked onto.
//!
//! Blocks are unit cubes centered on their cell. A ray that starts inside a block does
//! not hit that block.

use cgmath::{InnerSpace, Point3, Vector3};

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, BlockId},
    grid::ColumnKey,
    world::World,
};

const PARALLEL_EPSILON: f32 = 1e-8;

/// A ray in world space. The direction is normalized on construction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// Start of the ray, the viewer's eye
    pub origin: Point3<f32>,
    /// Unit look direction
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        let direction = if direction.magnitude2() > 0.0 {
            direction.normalize()
        } else {
            direction
        };
        Self { origin, direction }
    }

    /// Point at ray parameter `t`.
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// Entry distance and entry face of an axis-aligned unit cube.
    pub fn intersect_unit_cube(&self, center: Point3<f32>) -> Option<(f32, BlockSide)> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        let mut side = BlockSide::TOP;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let direction = self.direction[axis];
            let min = center[axis] - 0.5;
            let max = center[axis] + 0.5;

            if direction.abs() < PARALLEL_EPSILON {
                if origin < min || origin > max {
                    return None;
                }
                continue;
            }

            let inverse = 1.0 / direction;
            let (t1, t2) = {
                let a = (min - origin) * inverse;
                let b = (max - origin) * inverse;
                if a <= b { (a, b) } else { (b, a) }
            };
            if t1 > t_near {
                t_near = t1;
                side = BlockSide::entered_from(axis, direction > 0.0);
            }
            t_far = t_far.min(t2);
            if t_near > t_far {
                return None;
            }
        }

        (t_near >= 0.0).then_some((t_near, side))
    }

    /// Distance to the ground plane `y = 0`, limited to the square `|x|, |z| <= half_size`.
    pub fn intersect_ground(&self, half_size: f32) -> Option<f32> {
        if self.direction.y.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = -self.origin.y / self.direction.y;
        if t < 0.0 {
            return None;
        }
        let point = self.at(t);
        (point.x.abs() <= half_size && point.z.abs() <= half_size).then_some(t)
    }
}

/// Nearest block along a ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlockHit {
    /// The block that was hit
    pub id: BlockId,
    /// Ray parameter of the hit
    pub distance: f32,
    /// Face the ray entered through
    pub side: BlockSide,
}

/// Nearest surface for the placement query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SurfaceHit {
    /// A live block
    Block(BlockHit),
    /// The static ground plane
    Ground {
        /// Ray parameter of the hit
        distance: f32,
        /// World-space hit point
        point: Point3<f32>,
    },
}

impl SurfaceHit {
    /// Ray parameter of the hit.
    pub fn distance(&self) -> f32 {
        match self {
            SurfaceHit::Block(hit) => hit.distance,
            SurfaceHit::Ground { distance, .. } => *distance,
        }
    }
}

/// JS-style rounding: halves go towards positive infinity.
fn round_half_up(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

/// Break-target query: the nearest live block within `reach`.
pub fn break_target(world: &World, ray: &Ray, reach: f32) -> Option<BlockHit> {
    world
        .blocks()
        .filter_map(|block| {
            let (distance, side) = ray.intersect_unit_cube(block.cell.center())?;
            (distance <= reach).then_some(BlockHit {
                id: block.id,
                distance,
                side,
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Nearest surface, block or ground, within `reach`.
pub fn surface_hit(world: &World, ray: &Ray, reach: f32) -> Option<SurfaceHit> {
    let block = break_target(world, ray, reach).map(SurfaceHit::Block);

    let ground_half_size = world.bounds().half_extent() as f32;
    let ground = ray
        .intersect_ground(ground_half_size)
        .filter(|t| *t <= reach)
        .map(|distance| SurfaceHit::Ground {
            distance,
            point: ray.at(distance),
        });

    match (block, ground) {
        (Some(b), Some(g)) => Some(if g.distance() < b.distance() { g } else { b }),
        (b, g) => b.or(g),
    }
}

/// Placement query: the column a new block would be stacked onto.
///
/// A block hit steps from that block's own column along the entered face's normal,
/// so hitting a top face targets the same column and a side face the neighbour.
/// A ground hit targets the column under the hit point.
///
/// The column is not checked against bounds, occupancy or the stacking cap here;
/// stacking into it does that.
pub fn placement_column(world: &World, ray: &Ray, reach: f32) -> Option<ColumnKey> {
    match surface_hit(world, ray, reach)? {
        SurfaceHit::Block(hit) => {
            let block = world.block(hit.id)?;
            let normal = hit.side.normal();
            let column = block.cell.column();
            Some(ColumnKey::new(column.x + normal.x, column.z + normal.z))
        }
        SurfaceHit::Ground { point, .. } => {
            // step half a cell off the surface, then snap
            let target = point + BlockSide::TOP.normal_f32() * 0.5;
            Some(ColumnKey::new(round_half_up(target.x), round_half_up(target.z)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{
        block::block_type::BlockKind,
        grid::{CellCoord, GridBounds, Layer},
    };

    fn world() -> World {
        World::new(GridBounds::from_grid_size(20))
    }

    fn looking(from: (f32, f32, f32), to: (f32, f32, f32)) -> Ray {
        let origin = Point3::new(from.0, from.1, from.2);
        let target = Point3::new(to.0, to.1, to.2);
        Ray::new(origin, target - origin)
    }

    #[test]
    fn cube_hit_reports_entry_face() {
        let ray = looking((0.0, 0.5, 5.0), (0.0, 0.5, 0.0));
        let (t, side) = ray.intersect_unit_cube(Point3::new(0.0, 0.5, 0.0)).unwrap();
        assert!((t - 4.5).abs() < 1e-5);
        assert_eq!(side, BlockSide::FRONT);
    }

    #[test]
    fn ray_starting_inside_cube_misses_it() {
        let ray = looking((0.0, 0.5, 0.0), (0.0, 0.5, -5.0));
        assert!(ray.intersect_unit_cube(Point3::new(0.0, 0.5, 0.0)).is_none());
    }

    #[test]
    fn break_target_picks_nearest_block() {
        let mut world = world();
        let near = world
            .insert_block(CellCoord::new(0, Layer::GROUND, -3), BlockKind::Wood)
            .unwrap();
        world
            .insert_block(CellCoord::new(0, Layer::GROUND, -6), BlockKind::Iron)
            .unwrap();

        let ray = looking((0.0, 0.5, 0.0), (0.0, 0.5, -10.0));
        let hit = break_target(&world, &ray, 1000.0).unwrap();
        assert_eq!(hit.id, near);
        assert_eq!(hit.side, BlockSide::FRONT);
    }

    #[test]
    fn break_target_ignores_ground_and_reach() {
        let mut world = world();
        world
            .insert_block(CellCoord::new(0, Layer::GROUND, -8), BlockKind::Wood)
            .unwrap();
        let down = looking((0.0, 2.0, 0.0), (0.0, 0.0, -1.0));
        assert!(break_target(&world, &down, 1000.0).is_none());

        let ahead = looking((0.0, 0.5, 0.0), (0.0, 0.5, -10.0));
        assert!(break_target(&world, &ahead, 5.0).is_none());
    }

    #[test]
    fn ground_hit_targets_column_under_point() {
        let world = world();
        let ray = looking((0.0, 2.0, 0.0), (3.0, 0.0, 5.0));
        assert_eq!(
            placement_column(&world, &ray, 1000.0),
            Some(ColumnKey::new(3, 5))
        );
    }

    #[test]
    fn ground_outside_extent_is_a_miss() {
        let world = world();
        let ray = looking((0.0, 2.0, 0.0), (30.0, 0.0, 0.0));
        assert!(placement_column(&world, &ray, 1000.0).is_none());
    }

    #[test]
    fn side_face_targets_neighbour_column() {
        let mut world = world();
        world
            .insert_block(CellCoord::new(4, Layer::GROUND, 0), BlockKind::Stone)
            .unwrap();
        // looking along -x at the +x face
        let ray = looking((8.0, 0.5, 0.0), (0.0, 0.5, 0.0));
        assert_eq!(
            placement_column(&world, &ray, 1000.0),
            Some(ColumnKey::new(5, 0))
        );
    }

    #[test]
    fn top_face_targets_same_column() {
        let mut world = world();
        world
            .insert_block(CellCoord::new(2, Layer::GROUND, 2), BlockKind::Stone)
            .unwrap();
        let ray = looking((2.0, 4.0, 2.0), (2.0, 0.0, 2.0));
        assert_eq!(
            placement_column(&world, &ray, 1000.0),
            Some(ColumnKey::new(2, 2))
        );
    }
}
