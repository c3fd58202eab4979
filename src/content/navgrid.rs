//! 8-directional walkable grid built from a map's tile layers, for AI
//! pathfinding (see `ai::motion`'s `astar_8dir`).

use super::tiled::gid::resolve_gid;
use super::tiled::{Layer, TileData, TiledMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Walkable,
    Blocked,
}

/// A dense `width * height` walkability grid in tile coordinates.
#[derive(Debug, Clone)]
pub struct NavigationMap {
    pub width: u32,
    pub height: u32,
    /// Source map's tile size, carried along so callers can convert between
    /// world/pixel coordinates and this grid's tile coordinates without a
    /// separate reference to the [`TiledMap`] it was built from.
    pub tile_w: u32,
    pub tile_h: u32,
    cells: Vec<Cell>,
}

impl NavigationMap {
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(self.cells[(y as u32 * self.width + x as u32) as usize])
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Cell::Walkable))
    }

    /// World/pixel coordinates to this grid's tile coordinates.
    pub fn world_to_tile(&self, x: f32, y: f32) -> (i32, i32) {
        ((x / self.tile_w.max(1) as f32).floor() as i32, (y / self.tile_h.max(1) as f32).floor() as i32)
    }

    /// Tile coordinates to the world/pixel position of that tile's origin.
    pub fn tile_to_world(&self, x: i32, y: i32) -> (f32, f32) {
        ((x * self.tile_w as i32) as f32, (y * self.tile_h as i32) as f32)
    }

    /// Every orthogonally/diagonally adjacent walkable neighbor, in a fixed
    /// N, NE, E, SE, S, SW, W, NW order.
    pub fn neighbors_8dir(&self, x: i32, y: i32) -> Vec<(i32, i32)> {
        const OFFSETS: [(i32, i32); 8] = [
            (0, -1),
            (1, -1),
            (1, 0),
            (1, 1),
            (0, 1),
            (-1, 1),
            (-1, 0),
            (-1, -1),
        ];
        OFFSETS
            .iter()
            .map(|(dx, dy)| (x + dx, y + dy))
            .filter(|(nx, ny)| self.is_walkable(*nx, *ny))
            .collect()
    }
}

/// Whether any of a flat tile layer's 8 neighbors around `(x, y)` is a
/// non-empty gid. Used by `useTilesetBorder` to treat an empty cell
/// surrounded by painted tiles as walkable — i.e. a doorway cut into solid
/// ground rather than the void beyond the map edge.
fn has_nonempty_neighbor(data: &[u32], width: u32, height: u32, x: i32, y: i32) -> bool {
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (nx, ny) = (x + dx, y + dy);
            if nx < 0 || ny < 0 || nx as u32 >= width || ny as u32 >= height {
                continue;
            }
            if data[(ny as u32 * width + nx as u32) as usize] != 0 {
                return true;
            }
        }
    }
    false
}

/// Builds a [`NavigationMap`] by walking every tile layer in declaration
/// order, cumulative across layers. A layer lacking an `isTilesetWalkable`
/// custom property is graphic-only and skipped entirely. For a layer that
/// carries the property:
///
/// - A non-empty tile (gid != 0) marks its cell navigable when the layer's
///   `isTilesetWalkable` is `true`, or blocked when `false`.
/// - An empty tile (gid == 0) is left alone unless the layer also has
///   `useTilesetBorder = true` and the tile has at least one non-empty
///   8-neighbor within that same layer — the border of a painted region
///   implicitly continues through its gaps, and that gap is marked blocked.
///
/// Explicit "blocked" always wins: once a cell is blocked by any layer, no
/// later layer's `isTilesetWalkable = true` can reopen it.
pub fn build_navigation_map(map: &TiledMap) -> NavigationMap {
    let mut cells = vec![Cell::Walkable; (map.width * map.height) as usize];

    fn walk(layers: &[Layer], map: &TiledMap, cells: &mut [Cell]) {
        for layer in layers {
            match layer {
                Layer::Tile(tile_layer) => {
                    let Some(walkable) = tile_layer.properties.bool("isTilesetWalkable") else {
                        continue; // graphic-only layer
                    };
                    let use_tileset_border = tile_layer.properties.bool("useTilesetBorder").unwrap_or(false);
                    if let TileData::Csv(data) = &tile_layer.data {
                        for y in 0..map.height as i32 {
                            for x in 0..map.width as i32 {
                                let idx = (y as u32 * map.width + x as u32) as usize;
                                if cells[idx] == Cell::Blocked {
                                    continue; // sticky: nothing reopens a blocked cell
                                }
                                let gid = data.get(idx).copied().unwrap_or(0);
                                if gid != 0 {
                                    if walkable {
                                        if resolve_gid(map, gid).is_some() {
                                            cells[idx] = Cell::Walkable;
                                        }
                                    } else {
                                        cells[idx] = Cell::Blocked;
                                    }
                                } else if use_tileset_border
                                    && has_nonempty_neighbor(data, map.width, map.height, x, y)
                                {
                                    cells[idx] = Cell::Blocked;
                                }
                            }
                        }
                    }
                }
                Layer::Group(children) => walk(children, map, cells),
                _ => {}
            }
        }
    }

    walk(&map.layers, map, &mut cells);

    NavigationMap {
        width: map.width,
        height: map.height,
        tile_w: map.tile_w,
        tile_h: map.tile_h,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::tiled::tileset::Tileset;
    use crate::content::tiled::{ChunkOrigin, HexOrientation, Orientation, Properties, PropString, RenderOrder, TileLayer, TilesetRef};
    use std::collections::HashMap;

    fn tileset_ref() -> TilesetRef {
        TilesetRef {
            firstgid: 1,
            source: None,
            tileset: Tileset {
                tile_w: 16,
                tile_h: 16,
                tilecount: 4,
                columns: 2,
                margin: 0,
                spacing: 0,
                image: "a.png".into(),
                tileoffset_x: 0,
                tileoffset_y: 0,
            },
        }
    }

    fn map_with_layer(data: Vec<u32>, walkable: bool, use_tileset_border: bool) -> TiledMap {
        let mut props = HashMap::new();
        props.insert("isTilesetWalkable".to_string(), PropString::Bool(walkable));
        props.insert("useTilesetBorder".to_string(), PropString::Bool(use_tileset_border));

        TiledMap {
            orientation: Orientation::Orthogonal,
            renderorder: RenderOrder::RightDown,
            tile_w: 16,
            tile_h: 16,
            width: 3,
            height: 3,
            infinite: false,
            chunk_origin: ChunkOrigin::default(),
            hex_orientation: HexOrientation::default(),
            tilesets: vec![tileset_ref()],
            layers: vec![Layer::Tile(TileLayer {
                name: "ground".into(),
                offset_x: 0.0,
                offset_y: 0.0,
                properties: Properties(props),
                data: TileData::Csv(data),
            })],
        }
    }

    #[test]
    fn layer_without_the_property_is_graphic_only_and_skipped() {
        // Fully painted, but lacking `isTilesetWalkable` entirely -- should
        // never touch the grid, leaving the default walkable state.
        let mut map = map_with_layer(vec![0; 9], true, false);
        map.layers = vec![Layer::Tile(TileLayer {
            name: "decoration".into(),
            offset_x: 0.0,
            offset_y: 0.0,
            properties: Properties::default(),
            data: TileData::Csv(vec![1; 9]),
        })];
        let nav = build_navigation_map(&map);
        assert!((0..3).all(|x| (0..3).all(|y| nav.is_walkable(x, y))));
    }

    #[test]
    fn painted_gid_on_an_unwalkable_layer_blocks_that_cell() {
        #[rustfmt::skip]
        let data = vec![
            0, 0, 0,
            0, 1, 0,
            0, 0, 0,
        ];
        let map = map_with_layer(data, false, false);
        let nav = build_navigation_map(&map);
        assert!(!nav.is_walkable(1, 1));
        assert!(nav.is_walkable(0, 0));
    }

    #[test]
    fn tileset_border_closes_empty_gap_surrounded_by_painted_tiles() {
        #[rustfmt::skip]
        let data = vec![
            1, 1, 1,
            1, 0, 1,
            1, 1, 1,
        ];
        let map = map_with_layer(data, true, true);
        let nav = build_navigation_map(&map);
        assert!(!nav.is_walkable(1, 1));
        assert!(nav.is_walkable(0, 0));
    }

    #[test]
    fn neighbors_8dir_excludes_blocked_and_out_of_bounds() {
        let map = map_with_layer(vec![0; 9], true, false);
        let nav = build_navigation_map(&map);
        let neighbors = nav.neighbors_8dir(0, 0);
        assert_eq!(neighbors.len(), 3);
    }

    #[test]
    fn later_layer_cannot_reopen_a_cell_blocked_by_an_earlier_layer() {
        let mut map = map_with_layer(vec![1, 0, 0, 0, 0, 0, 0, 0, 0], false, false);
        let mut reopen_props = HashMap::new();
        reopen_props.insert("isTilesetWalkable".to_string(), PropString::Bool(true));
        map.layers.push(Layer::Tile(TileLayer {
            name: "deco".into(),
            offset_x: 0.0,
            offset_y: 0.0,
            properties: Properties(reopen_props),
            data: TileData::Csv(vec![1; 9]),
        }));
        let nav = build_navigation_map(&map);
        assert!(!nav.is_walkable(0, 0));
    }
}
