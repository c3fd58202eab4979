//! Bridges the CPU-side [`super::RenderOutput`] to the `wgpu` backend in
//! [`crate::renderer`]: per-viewport camera uniforms and the vertex batches
//! built from each [`super::RenderItem`].

pub mod camera;

use crate::renderer::pipeline::TileVertex;

/// Turns one viewport's culled, depth-sorted items into `TileVertex`
/// quads, sampling each item's pixel-space `SrcRect` against `atlas`'s
/// total pixel dimensions.
pub fn build_tile_vertices(
    items: &[super::RenderItem],
    atlas: &crate::renderer::atlas::Atlas,
) -> Vec<TileVertex> {
    let total_w = (atlas.cols * atlas.tile_w) as f32;
    let total_h = (atlas.rows * atlas.tile_h) as f32;
    let mut verts = Vec::with_capacity(items.len() * 6);
    for item in items {
        let w = item.src.w as f32;
        let h = item.src.h as f32;
        let uv_min = [item.src.x as f32 / total_w, item.src.y as f32 / total_h];
        let uv_max = [(item.src.x as f32 + w) / total_w, (item.src.y as f32 + h) / total_h];
        let positions = [
            [item.world_x, item.world_y],
            [item.world_x + w, item.world_y],
            [item.world_x + w, item.world_y + h],
            [item.world_x, item.world_y],
            [item.world_x + w, item.world_y + h],
            [item.world_x, item.world_y + h],
        ];
        let uvs = [
            [uv_min[0], uv_min[1]],
            [uv_max[0], uv_min[1]],
            [uv_max[0], uv_max[1]],
            [uv_min[0], uv_min[1]],
            [uv_max[0], uv_max[1]],
            [uv_min[0], uv_max[1]],
        ];
        for (position, uv) in positions.into_iter().zip(uvs) {
            verts.push(TileVertex {
                position,
                uv,
                fg_color: [1.0, 1.0, 1.0, 1.0],
                bg_color: [0.0, 0.0, 0.0, 0.0],
                entity_id: item.entity.id(),
                layer_id: 0.5,
            });
        }
    }
    verts
}
