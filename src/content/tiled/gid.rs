//! Global Tile ID resolution: strips flip flags, locates the owning
//! tileset, and derives the atlas cell.

use super::{TiledMap, TilesetRef};

const FLIP_H: u32 = 1 << 31;
const FLIP_V: u32 = 1 << 30;
const FLIP_D: u32 = 1 << 29;
const GID_MASK: u32 = !(FLIP_H | FLIP_V | FLIP_D);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedGid {
    pub tileset_index: usize,
    pub local_id: u32,
    pub atlas_col: u32,
    pub atlas_row: u32,
    pub flip_h: bool,
    pub flip_v: bool,
    pub flip_d: bool,
}

/// Strips the three top flip bits, returning `(gid, flip_h, flip_v, flip_d)`.
pub fn split_flags(raw_gid: u32) -> (u32, bool, bool, bool) {
    (
        raw_gid & GID_MASK,
        raw_gid & FLIP_H != 0,
        raw_gid & FLIP_V != 0,
        raw_gid & FLIP_D != 0,
    )
}

/// Combines a bare gid with flip flags — the inverse of [`split_flags`],
/// used by round-trip tests.
pub fn make_gid(gid: u32, flip_h: bool, flip_v: bool, flip_d: bool) -> u32 {
    gid | if flip_h { FLIP_H } else { 0 }
        | if flip_v { FLIP_V } else { 0 }
        | if flip_d { FLIP_D } else { 0 }
}

fn tilecount(tileset: &TilesetRef) -> u32 {
    tileset.tileset.tilecount
}

fn lastgid(tileset: &TilesetRef) -> u32 {
    tileset.firstgid + tilecount(tileset) - 1
}

/// Resolves `raw_gid` (flags included) against `map`'s tileset list.
/// Returns `None` for `gid == 0` or a gid outside every tileset's range.
/// Tilesets are typically few (≤5), so a linear scan is used rather than a
/// sorted-range index.
pub fn resolve_gid(map: &TiledMap, raw_gid: u32) -> Option<ResolvedGid> {
    let (gid, flip_h, flip_v, flip_d) = split_flags(raw_gid);
    if gid == 0 {
        return None;
    }
    for (index, tileset) in map.tilesets.iter().enumerate() {
        if gid >= tileset.firstgid && gid <= lastgid(tileset) {
            let local_id = gid - tileset.firstgid;
            let columns = tileset.tileset.columns.max(1);
            return Some(ResolvedGid {
                tileset_index: index,
                local_id,
                atlas_col: local_id % columns,
                atlas_row: local_id / columns,
                flip_h,
                flip_v,
                flip_d,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::tiled::tileset::Tileset;
    use crate::content::tiled::{ChunkOrigin, HexOrientation, Orientation, RenderOrder};

    fn test_map() -> TiledMap {
        TiledMap {
            orientation: Orientation::Orthogonal,
            renderorder: RenderOrder::RightDown,
            tile_w: 16,
            tile_h: 16,
            width: 10,
            height: 10,
            infinite: false,
            chunk_origin: ChunkOrigin::default(),
            hex_orientation: HexOrientation::default(),
            tilesets: vec![
                TilesetRef {
                    firstgid: 1,
                    source: None,
                    tileset: Tileset {
                        tile_w: 16,
                        tile_h: 16,
                        tilecount: 20,
                        columns: 5,
                        margin: 0,
                        spacing: 0,
                        image: "a.png".into(),
                        tileoffset_x: 0,
                        tileoffset_y: 0,
                    },
                },
                TilesetRef {
                    firstgid: 21,
                    source: None,
                    tileset: Tileset {
                        tile_w: 16,
                        tile_h: 16,
                        tilecount: 10,
                        columns: 5,
                        margin: 0,
                        spacing: 0,
                        image: "b.png".into(),
                        tileoffset_x: 0,
                        tileoffset_y: 0,
                    },
                },
            ],
            layers: vec![],
        }
    }

    #[test]
    fn gid_zero_is_invalid() {
        let map = test_map();
        assert!(resolve_gid(&map, 0).is_none());
    }

    #[test]
    fn resolves_to_correct_tileset_and_local_id() {
        let map = test_map();
        let r = resolve_gid(&map, 22).unwrap();
        assert_eq!(r.tileset_index, 1);
        assert_eq!(r.local_id, 1);
        assert_eq!(r.atlas_col, 1);
        assert_eq!(r.atlas_row, 0);
    }

    #[test]
    fn out_of_range_gid_is_invalid() {
        let map = test_map();
        assert!(resolve_gid(&map, 1000).is_none());
    }

    #[test]
    fn resolve_roundtrips_for_every_local_id_and_every_flip_combination() {
        let map = test_map();
        for tileset in &map.tilesets {
            for local_id in 0..tilecount(tileset) {
                let gid = tileset.firstgid + local_id;
                for flip_h in [false, true] {
                    for flip_v in [false, true] {
                        for flip_d in [false, true] {
                            let raw = make_gid(gid, flip_h, flip_v, flip_d);
                            let resolved = resolve_gid(&map, raw).unwrap();
                            assert_eq!(resolved.local_id, local_id);
                            assert_eq!(resolved.flip_h, flip_h);
                            assert_eq!(resolved.flip_v, flip_v);
                            assert_eq!(resolved.flip_d, flip_d);
                        }
                    }
                }
            }
        }
    }
}
