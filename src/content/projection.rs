//! Tiled-space to screen-space coordinate pipeline: layer offset, pixel to
//! tile, chunk-origin normalization, render-order Y flip, then the
//! orientation-specific projection to screen pixels.

use glam::Vec2;

use super::tiled::{ChunkOrigin, Orientation, RenderOrder, TiledMap};

/// Converts a raw pixel position within a layer into tile coordinates,
/// accounting for the layer's own offset and the orientation's tile
/// footprint (isometric tiles are twice as wide as they are tall on-grid).
pub fn pixel_to_tile(map: &TiledMap, layer_offset: Vec2, pixel: Vec2) -> Vec2 {
    let local = pixel - layer_offset;
    match map.orientation {
        Orientation::Orthogonal | Orientation::Hexagonal => {
            Vec2::new(local.x / map.tile_w as f32, local.y / map.tile_h as f32)
        }
        Orientation::Isometric => Vec2::new(
            local.x / (map.tile_w as f32 / 2.0),
            local.y / map.tile_h as f32,
        ),
    }
}

/// Normalizes a tile coordinate against the infinite map's chunk origin so
/// coordinates are stable regardless of which chunks have streamed in.
pub fn normalize_chunk_origin(tile: Vec2, origin: ChunkOrigin) -> Vec2 {
    Vec2::new(tile.x - origin.x as f32, tile.y - origin.y as f32)
}

/// Flips the tile-space Y axis for the render orders that iterate bottom to
/// top, so screen-space Y always increases downward regardless of map
/// render order.
pub fn apply_render_order_flip(tile: Vec2, renderorder: RenderOrder, map_height: u32) -> Vec2 {
    if renderorder.flips_y() {
        Vec2::new(tile.x, map_height as f32 - 1.0 - tile.y)
    } else {
        tile
    }
}

/// Final projection from normalized tile-space to screen pixels.
pub fn tile_to_screen(map: &TiledMap, tile: Vec2) -> Vec2 {
    match map.orientation {
        Orientation::Orthogonal => Vec2::new(tile.x * map.tile_w as f32, tile.y * map.tile_h as f32),
        Orientation::Isometric => {
            let half_w = map.tile_w as f32 / 2.0;
            let half_h = map.tile_h as f32 / 2.0;
            Vec2::new((tile.x - tile.y) * half_w, (tile.x + tile.y) * half_h)
        }
        Orientation::Hexagonal => {
            // Flat-top hex grid: odd columns are pushed down by half a tile.
            let x = tile.x * (map.tile_w as f32 * 0.75);
            let odd_col_push = if (tile.x as i64) % 2 != 0 { map.tile_h as f32 / 2.0 } else { 0.0 };
            let y = tile.y * map.tile_h as f32 + odd_col_push;
            Vec2::new(x, y)
        }
    }
}

/// Runs the full pipeline: layer offset -> tile space -> chunk-origin
/// normalize -> render-order flip -> screen projection.
pub fn project_to_screen(map: &TiledMap, layer_offset: Vec2, pixel: Vec2) -> Vec2 {
    let tile = pixel_to_tile(map, layer_offset, pixel);
    let tile = normalize_chunk_origin(tile, map.chunk_origin);
    let tile = apply_render_order_flip(tile, map.renderorder, map.height);
    tile_to_screen(map, tile)
}

/// Inverts [`tile_to_screen`] for orthogonal and isometric maps, used by
/// the round-trip invertibility property.
pub fn screen_to_tile(map: &TiledMap, screen: Vec2) -> Vec2 {
    match map.orientation {
        Orientation::Orthogonal => Vec2::new(screen.x / map.tile_w as f32, screen.y / map.tile_h as f32),
        Orientation::Isometric => {
            let half_w = map.tile_w as f32 / 2.0;
            let half_h = map.tile_h as f32 / 2.0;
            let tx = (screen.x / half_w + screen.y / half_h) / 2.0;
            let ty = (screen.y / half_h - screen.x / half_w) / 2.0;
            Vec2::new(tx, ty)
        }
        Orientation::Hexagonal => screen,
    }
}
