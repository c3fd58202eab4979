//! TSJ/TSX external tileset parsing, with parse-once caching by canonical
//! path and circular-reference detection.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone)]
pub struct Tileset {
    pub tile_w: u32,
    pub tile_h: u32,
    pub tilecount: u32,
    pub columns: u32,
    pub margin: u32,
    pub spacing: u32,
    pub image: String,
    pub tileoffset_x: i32,
    pub tileoffset_y: i32,
}

#[derive(Debug, Deserialize)]
struct RawTileOffset {
    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
}

/// Public alias so map parsers can deserialize a tileset embedded inline in
/// a TMJ document with the same shape as a standalone TSJ file.
pub type RawInlineTsj = RawTsj;

#[derive(Debug, Deserialize)]
pub(crate) struct RawTsj {
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    tilecount: Option<u32>,
    #[serde(default)]
    columns: Option<u32>,
    #[serde(default)]
    margin: u32,
    #[serde(default)]
    spacing: u32,
    image: String,
    #[serde(default)]
    imagewidth: Option<u32>,
    #[serde(default)]
    imageheight: Option<u32>,
    #[serde(default)]
    tileoffset: Option<RawTileOffset>,
    /// Another tileset file this one forwards to, for circular-reference
    /// detection in pathological content.
    #[serde(default)]
    source: Option<String>,
}

/// Builds a [`RawInlineTsj`] from the attributes of a TMX `<tileset>`
/// element embedded directly in a map file (no `source` attribute).
#[allow(clippy::too_many_arguments)]
pub fn inline_from_xml(
    tilewidth: u32,
    tileheight: u32,
    tilecount: Option<u32>,
    columns: Option<u32>,
    margin: u32,
    spacing: u32,
    image: String,
) -> RawInlineTsj {
    RawTsj {
        tilewidth,
        tileheight,
        tilecount,
        columns,
        margin,
        spacing,
        image,
        imagewidth: None,
        imageheight: None,
        tileoffset: None,
        source: None,
    }
}

impl Tileset {
    pub fn from_inline(raw: RawInlineTsj) -> Self {
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawTsj) -> Self {
        let columns = raw.columns.unwrap_or_else(|| {
            raw.imagewidth
                .map(|w| (w - raw.margin) / (raw.tilewidth + raw.spacing))
                .unwrap_or(1)
        });
        let tilecount = raw.tilecount.unwrap_or_else(|| {
            let rows = raw
                .imageheight
                .map(|h| (h - raw.margin) / (raw.tileheight + raw.spacing))
                .unwrap_or(1);
            columns * rows
        });
        let (ox, oy) = raw
            .tileoffset
            .map(|t| (t.x, t.y))
            .unwrap_or((0, 0));
        Tileset {
            tile_w: raw.tilewidth,
            tile_h: raw.tileheight,
            tilecount,
            columns: columns.max(1),
            margin: raw.margin,
            spacing: raw.spacing,
            image: raw.image,
            tileoffset_x: ox,
            tileoffset_y: oy,
        }
    }
}

fn parse_tsj(text: &str, path: &Path) -> EngineResult<(Tileset, Option<String>)> {
    let raw: RawTsj = serde_json::from_str(text).map_err(|e| EngineError::MalformedContent {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let forward = raw.source.clone();
    Ok((Tileset::from_raw(raw), forward))
}

fn parse_tsx(text: &str, path: &Path) -> EngineResult<(Tileset, Option<String>)> {
    #[derive(Debug, Deserialize)]
    struct XmlImage {
        #[serde(rename = "@source")]
        source: String,
        #[serde(rename = "@width")]
        width: Option<u32>,
        #[serde(rename = "@height")]
        height: Option<u32>,
    }
    #[derive(Debug, Deserialize)]
    struct XmlTileOffset {
        #[serde(rename = "@x")]
        x: i32,
        #[serde(rename = "@y")]
        y: i32,
    }
    #[derive(Debug, Deserialize)]
    struct XmlTileset {
        #[serde(rename = "@tilewidth")]
        tilewidth: u32,
        #[serde(rename = "@tileheight")]
        tileheight: u32,
        #[serde(rename = "@tilecount")]
        tilecount: Option<u32>,
        #[serde(rename = "@columns")]
        columns: Option<u32>,
        #[serde(rename = "@margin", default)]
        margin: u32,
        #[serde(rename = "@spacing", default)]
        spacing: u32,
        image: XmlImage,
        tileoffset: Option<XmlTileOffset>,
        #[serde(rename = "@source")]
        source: Option<String>,
    }

    let xml: XmlTileset = quick_xml::de::from_str(text).map_err(|e| EngineError::MalformedContent {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let forward = xml.source.clone();
    let raw = RawTsj {
        tilewidth: xml.tilewidth,
        tileheight: xml.tileheight,
        tilecount: xml.tilecount,
        columns: xml.columns,
        margin: xml.margin,
        spacing: xml.spacing,
        image: xml.image.source,
        imagewidth: xml.image.width,
        imageheight: xml.image.height,
        tileoffset: xml.tileoffset.map(|t| RawTileOffset { x: t.x, y: t.y }),
        source: None,
    };
    Ok((Tileset::from_raw(raw), forward))
}

/// Parse-once cache keyed by canonical path, with cycle detection for
/// tilesets that forward to another tileset file.
#[derive(Default)]
pub struct TilesetCache {
    loaded: HashMap<PathBuf, Tileset>,
}

impl TilesetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: &Path) -> EngineResult<Tileset> {
        self.load_inner(path, &mut Vec::new())
    }

    fn load_inner(&mut self, path: &Path, visiting: &mut Vec<PathBuf>) -> EngineResult<Tileset> {
        let canonical = path.to_path_buf();
        if let Some(cached) = self.loaded.get(&canonical) {
            return Ok(cached.clone());
        }
        if visiting.contains(&canonical) {
            return Err(EngineError::CircularReference { path: canonical });
        }
        visiting.push(canonical.clone());

        let text = std::fs::read_to_string(&canonical)?;
        let is_xml = canonical
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("tsx"))
            .unwrap_or(false);
        let (tileset, forward) = if is_xml {
            parse_tsx(&text, &canonical)?
        } else {
            parse_tsj(&text, &canonical)?
        };

        let tileset = if let Some(forward_path) = forward {
            let resolved = canonical
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(forward_path);
            self.load_inner(&resolved, visiting)?
        } else {
            tileset
        };

        visiting.pop();
        self.loaded.insert(canonical, tileset.clone());
        Ok(tileset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_tilecount_from_image_dimensions_when_absent() {
        let raw = RawTsj {
            tilewidth: 16,
            tileheight: 16,
            tilecount: None,
            columns: None,
            margin: 0,
            spacing: 0,
            image: "atlas.png".into(),
            imagewidth: Some(160),
            imageheight: Some(32),
            tileoffset: None,
            source: None,
        };
        let ts = Tileset::from_raw(raw);
        assert_eq!(ts.columns, 10);
        assert_eq!(ts.tilecount, 20);
    }

    #[test]
    fn margin_and_spacing_factor_into_derived_columns() {
        let raw = RawTsj {
            tilewidth: 16,
            tileheight: 16,
            tilecount: None,
            columns: None,
            margin: 2,
            spacing: 1,
            image: "atlas.png".into(),
            imagewidth: Some(2 + 10 * 17 - 1),
            imageheight: Some(2 + 2 * 17 - 1),
            tileoffset: None,
            source: None,
        };
        let ts = Tileset::from_raw(raw);
        assert_eq!(ts.columns, 10);
    }
}
