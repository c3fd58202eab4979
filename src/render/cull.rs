//! Frustum culling: discards render items whose world-space bounds don't
//! intersect a viewport's visible world rectangle.

/// An axis-aligned world-space rectangle, either a viewport's visible region
/// or an item's bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl WorldRect {
    pub fn intersects(&self, other: &WorldRect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// The viewport's visible world rectangle given a camera centered at
    /// `(cam_x, cam_y)` with `zoom`, for a viewport of `(vp_w, vp_h)` pixels.
    pub fn visible_region(cam_x: f32, cam_y: f32, zoom: f32, vp_w: f32, vp_h: f32) -> WorldRect {
        let z = zoom.max(0.01);
        let half_w = vp_w / (2.0 * z);
        let half_h = vp_h / (2.0 * z);
        WorldRect { x: cam_x - half_w, y: cam_y - half_h, w: half_w * 2.0, h: half_h * 2.0 }
    }
}

/// Tile-coordinate range (inclusive start, exclusive end) covering a visible
/// world rectangle, clamped to `[0, map_width) x [0, map_height)`. Computed
/// once per viewport before per-tile visibility tests, per §4.3.6.
pub fn visible_tile_range(
    region: &WorldRect,
    tile_w: f32,
    tile_h: f32,
    map_width: u32,
    map_height: u32,
) -> (i32, i32, i32, i32) {
    let min_x = (region.x / tile_w).floor() as i32 - 1;
    let min_y = (region.y / tile_h).floor() as i32 - 1;
    let max_x = ((region.x + region.w) / tile_w).ceil() as i32 + 1;
    let max_y = ((region.y + region.h) / tile_h).ceil() as i32 + 1;

    (
        min_x.clamp(0, map_width as i32),
        min_y.clamp(0, map_height as i32),
        max_x.clamp(0, map_width as i32),
        max_y.clamp(0, map_height as i32),
    )
}

/// Whether an entity/tile's AABB at `(x, y, w, h)` is visible in `region`.
pub fn is_visible(region: &WorldRect, x: f32, y: f32, w: f32, h: f32) -> bool {
    region.intersects(&WorldRect { x, y, w, h })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_fully_inside_the_region_is_visible() {
        let region = WorldRect { x: 0.0, y: 0.0, w: 800.0, h: 600.0 };
        assert!(is_visible(&region, 100.0, 100.0, 16.0, 16.0));
    }

    #[test]
    fn item_entirely_past_the_right_edge_is_culled() {
        let region = WorldRect { x: 0.0, y: 0.0, w: 800.0, h: 600.0 };
        assert!(!is_visible(&region, 900.0, 100.0, 16.0, 16.0));
    }

    #[test]
    fn item_straddling_the_edge_is_still_visible() {
        let region = WorldRect { x: 0.0, y: 0.0, w: 800.0, h: 600.0 };
        assert!(is_visible(&region, 795.0, 100.0, 16.0, 16.0));
    }

    #[test]
    fn visible_region_centers_on_the_camera_and_shrinks_with_zoom() {
        let region = WorldRect::visible_region(100.0, 100.0, 2.0, 800.0, 600.0);
        assert!((region.w - 400.0).abs() < 1e-4);
        assert!((region.x - (100.0 - 200.0)).abs() < 1e-4);
    }

    #[test]
    fn tile_range_is_clamped_to_map_bounds_and_padded_by_one_tile() {
        let region = WorldRect { x: -100.0, y: -100.0, w: 50.0, h: 50.0 };
        let (min_x, min_y, max_x, max_y) = visible_tile_range(&region, 16.0, 16.0, 20, 20);
        assert_eq!(min_x, 0);
        assert_eq!(min_y, 0);
        assert!(max_x <= 20 && max_y <= 20);
    }

    #[test]
    fn tile_range_reduces_a_large_map_to_a_small_visible_window() {
        // A 2000-tile-ish map viewed through an 800x600 viewport at 1x zoom
        // should produce well under the full tile count (~2000 -> 200-400).
        let region = WorldRect::visible_region(320.0, 256.0, 1.0, 800.0, 600.0);
        let (min_x, min_y, max_x, max_y) = visible_tile_range(&region, 16.0, 16.0, 184, 128);
        let visible_tiles = (max_x - min_x) as u32 * (max_y - min_y) as u32;
        assert!(visible_tiles < 600);
    }
}
