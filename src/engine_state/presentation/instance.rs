//! Per-block instance records in the layout a renderer uploads as an instance buffer.

use bytemuck::{Pod, Zeroable};

use crate::engine_state::voxels::grid::CellCoord;

/// One drawn unit cube.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct BlockInstance {
    /// Cube center in world space
    pub position: [f32; 3],
    /// Cosmetic opacity, `1.0` for an undamaged block
    pub opacity: f32,
    /// Uniform scale, `1.0` except for fading ghosts
    pub scale: f32,
    /// Texture slot in the asset catalog
    pub texture_index: u32,
    _padding: [u32; 2],
}

impl BlockInstance {
    /// Creates an instance centered on a cell.
    pub fn new(cell: CellCoord, opacity: f32, scale: f32, texture_index: u32) -> Self {
        let center = cell.center();
        Self {
            position: [center.x, center.y, center.z],
            opacity,
            scale,
            texture_index,
            _padding: [0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::grid::Layer;

    #[test]
    fn instance_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<BlockInstance>(), 32);
        let cell = CellCoord::new(2, Layer::new(1).unwrap(), -3);
        let instances = [BlockInstance::new(cell, 0.5, 1.0, 2)];
        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), 32);
        assert_eq!(instances[0].position, [2.0, 1.5, -3.0]);
    }
}
