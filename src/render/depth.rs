//! Depth formulas for the world pass's single unified sort.
//!
//! One `f32` depth value per render item, comparable across every kind of
//! item (parallax layer, tile, entity) and every projection, so Phase B can
//! be a single `sort_by` instead of per-kind ordering.

use crate::content::tiled::Orientation;

/// Depth offset applied to parallax background layers — always behind every
/// world tile/entity, ordered among themselves by `z_order`.
const PARALLAX_BACKGROUND_BASE: f32 = -1000.0;

/// Depth offset applied to parallax foreground layers — always in front of
/// every world tile/entity, ordered among themselves by `z_order`.
const PARALLAX_FOREGROUND_BASE: f32 = 10000.0;

/// Per-render-layer stride; keeps `RenderLayer::Ground` strictly behind
/// `RenderLayer::Characters` regardless of in-layer position.
const LAYER_STRIDE: f32 = 10000.0;

/// Depth of a world tile or entity at `(world_x, world_y)` on render layer
/// `layer_z`, under `projection`.
///
/// - Orthogonal: `layerZ * 10000 + worldY * tileH + microX`. `microX` is a
///   tiny tie-breaker (scaled well below one pixel row) so two items on the
///   same row sort left-to-right rather than by insertion order.
/// - Isometric: `layerZ * 10000 + (worldX + worldY) * 100 + worldX * 0.1`,
///   increasing strictly along the `X + Y` diagonal.
/// - Hexagonal shares the isometric formula — it's the same "sum of world
///   axes" diagonal ordering regardless of the flat/pointy-top variant.
pub fn world_depth(orientation: Orientation, layer_z: i32, world_x: f32, world_y: f32, tile_h: f32) -> f32 {
    let base = layer_z as f32 * LAYER_STRIDE;
    match orientation {
        Orientation::Orthogonal => base + world_y * tile_h + world_x * 0.001,
        Orientation::Isometric | Orientation::Hexagonal => {
            base + (world_x + world_y) * 100.0 + world_x * 0.1
        }
    }
}

/// Depth of a parallax image layer. `foreground` layers (in front of the
/// world) and background layers (behind it) each keep their own depth band
/// so neither can ever intersect world geometry's depth range.
pub fn parallax_depth(z_order: i32, foreground: bool) -> f32 {
    let base = if foreground { PARALLAX_FOREGROUND_BASE } else { PARALLAX_BACKGROUND_BASE };
    base + z_order as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orthogonal_depth_increases_with_world_y_within_a_layer() {
        let a = world_depth(Orientation::Orthogonal, 0, 0.0, 0.0, 16.0);
        let b = world_depth(Orientation::Orthogonal, 0, 0.0, 16.0, 16.0);
        assert!(b > a);
    }

    #[test]
    fn a_higher_render_layer_always_outranks_a_lower_one_regardless_of_position() {
        let ground_far = world_depth(Orientation::Orthogonal, 0, 0.0, 100000.0, 16.0);
        let characters_near = world_depth(Orientation::Orthogonal, 2, 0.0, 0.0, 16.0);
        assert!(characters_near > ground_far);
    }

    #[test]
    fn isometric_depth_increases_strictly_along_the_diagonal() {
        let a = world_depth(Orientation::Isometric, 0, 1.0, 1.0, 16.0);
        let b = world_depth(Orientation::Isometric, 0, 2.0, 2.0, 16.0);
        assert!(b > a);
    }

    #[test]
    fn parallax_background_is_always_behind_any_world_depth() {
        let bg = parallax_depth(999, false);
        let world = world_depth(Orientation::Orthogonal, 0, 0.0, 0.0, 16.0);
        assert!(bg < world);
    }

    #[test]
    fn parallax_foreground_is_always_in_front_of_any_world_depth() {
        let fg = parallax_depth(0, true);
        let world = world_depth(Orientation::Orthogonal, 5, 100000.0, 100000.0, 16.0);
        assert!(fg > world);
    }
}
