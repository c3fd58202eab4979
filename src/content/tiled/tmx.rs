//! TMX (XML) map parser, producing the same [`TiledMap`] as [`super::tmj`].

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::decode::{decode_base64, decode_csv, Compression};
use super::tileset::{Tileset, TilesetCache};
use super::{
    ChunkOrigin, HexOrientation, ImageLayer, Layer, MapObject, Orientation, ObjectLayer,
    Properties, PropString, RenderOrder, TileData, TileLayer, TiledMap, TilesetRef,
};
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Deserialize, Default)]
struct XmlProperty {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@type", default)]
    ty: Option<String>,
    #[serde(rename = "@value", default)]
    value: String,
}

#[derive(Debug, Deserialize, Default)]
struct XmlProperties {
    #[serde(rename = "property", default)]
    items: Vec<XmlProperty>,
}

#[derive(Debug, Deserialize, Default)]
struct XmlData {
    #[serde(rename = "@encoding", default)]
    encoding: Option<String>,
    #[serde(rename = "@compression", default)]
    compression: Option<String>,
    #[serde(rename = "$text", default)]
    text: String,
    #[serde(rename = "chunk", default)]
    chunks: Vec<XmlChunk>,
}

#[derive(Debug, Deserialize, Default)]
struct XmlChunk {
    #[serde(rename = "@x")]
    x: i32,
    #[serde(rename = "@y")]
    y: i32,
    #[serde(rename = "@width")]
    width: u32,
    #[serde(rename = "@height")]
    height: u32,
    #[serde(rename = "$text", default)]
    text: String,
}

#[derive(Debug, Deserialize, Default)]
struct XmlObject {
    #[serde(rename = "@id", default)]
    id: u32,
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@type", default)]
    obj_type: String,
    #[serde(rename = "@x")]
    x: f32,
    #[serde(rename = "@y")]
    y: f32,
    #[serde(rename = "@width", default)]
    width: f32,
    #[serde(rename = "@height", default)]
    height: f32,
    properties: Option<XmlProperties>,
}

#[derive(Debug, Deserialize, Default)]
struct XmlImage {
    #[serde(rename = "@source", default)]
    source: String,
}

#[derive(Debug, Deserialize, Default)]
struct XmlLayer {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@offsetx", default)]
    offsetx: f32,
    #[serde(rename = "@offsety", default)]
    offsety: f32,
    properties: Option<XmlProperties>,
    data: Option<XmlData>,
}

#[derive(Debug, Deserialize, Default)]
struct XmlObjectGroup {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@offsetx", default)]
    offsetx: f32,
    #[serde(rename = "@offsety", default)]
    offsety: f32,
    #[serde(rename = "object", default)]
    objects: Vec<XmlObject>,
}

#[derive(Debug, Deserialize, Default)]
struct XmlImageLayer {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@offsetx", default)]
    offsetx: f32,
    #[serde(rename = "@offsety", default)]
    offsety: f32,
    #[serde(rename = "@parallaxx", default = "one")]
    parallaxx: f32,
    #[serde(rename = "@parallaxy", default = "one")]
    parallaxy: f32,
    #[serde(rename = "@repeatx", default)]
    repeatx: bool,
    #[serde(rename = "@repeaty", default)]
    repeaty: bool,
    #[serde(rename = "@opacity", default = "one")]
    opacity: f32,
    image: XmlImage,
}

fn one() -> f32 {
    1.0
}

#[derive(Debug, Deserialize, Default)]
struct XmlGroup {
    #[serde(rename = "layer", default)]
    tile_layers: Vec<XmlLayer>,
    #[serde(rename = "objectgroup", default)]
    object_groups: Vec<XmlObjectGroup>,
    #[serde(rename = "imagelayer", default)]
    image_layers: Vec<XmlImageLayer>,
    #[serde(rename = "group", default)]
    groups: Vec<XmlGroup>,
}

#[derive(Debug, Deserialize, Default)]
struct XmlTilesetRef {
    #[serde(rename = "@firstgid")]
    firstgid: u32,
    #[serde(rename = "@source", default)]
    source: Option<String>,
    #[serde(rename = "@tilewidth", default)]
    tilewidth: Option<u32>,
    #[serde(rename = "@tileheight", default)]
    tileheight: Option<u32>,
    #[serde(rename = "@tilecount", default)]
    tilecount: Option<u32>,
    #[serde(rename = "@columns", default)]
    columns: Option<u32>,
    #[serde(rename = "@margin", default)]
    margin: u32,
    #[serde(rename = "@spacing", default)]
    spacing: u32,
    image: Option<XmlImage>,
}

#[derive(Debug, Deserialize)]
struct XmlMap {
    #[serde(rename = "@orientation")]
    orientation: String,
    #[serde(rename = "@renderorder")]
    renderorder: String,
    #[serde(rename = "@tilewidth")]
    tilewidth: u32,
    #[serde(rename = "@tileheight")]
    tileheight: u32,
    #[serde(rename = "@width")]
    width: u32,
    #[serde(rename = "@height")]
    height: u32,
    #[serde(rename = "@infinite", default)]
    infinite: u32,
    #[serde(rename = "@hexsidelength", default)]
    _hexsidelength: Option<u32>,
    #[serde(rename = "tileset", default)]
    tilesets: Vec<XmlTilesetRef>,
    #[serde(flatten)]
    root_group: XmlGroup,
}

fn convert_properties(props: Option<XmlProperties>) -> Properties {
    let mut map = HashMap::new();
    for p in props.map(|p| p.items).unwrap_or_default() {
        let value = match p.ty.as_deref() {
            Some("bool") => PropString::Bool(p.value == "true"),
            Some("int") => PropString::Int(p.value.parse().unwrap_or_default()),
            Some("float") => PropString::Float(p.value.parse().unwrap_or_default()),
            Some("color") => PropString::Color(p.value.clone()),
            _ => PropString::String(p.value.clone()),
        };
        map.insert(p.name, value);
    }
    Properties(map)
}

fn parse_inline_data(data: &XmlData, path: &Path) -> EngineResult<TileData> {
    if !data.chunks.is_empty() {
        let mut out = Vec::with_capacity(data.chunks.len());
        for chunk in &data.chunks {
            out.push(super::Chunk {
                x: chunk.x,
                y: chunk.y,
                width: chunk.width,
                height: chunk.height,
                data: decode_text(&chunk.text, data.encoding.as_deref(), data.compression.as_deref(), path)?,
            });
        }
        return Ok(TileData::Chunks(out));
    }
    Ok(TileData::Csv(decode_text(
        &data.text,
        data.encoding.as_deref(),
        data.compression.as_deref(),
        path,
    )?))
}

fn decode_text(text: &str, encoding: Option<&str>, compression: Option<&str>, path: &Path) -> EngineResult<Vec<u32>> {
    let compression = match compression {
        None => Compression::None,
        Some("gzip") => Compression::Gzip,
        Some("zlib") => Compression::Zlib,
        Some(other) => {
            return Err(EngineError::DecodeError {
                path: path.to_path_buf(),
                reason: format!("unsupported compression '{other}'"),
            })
        }
    };
    match encoding {
        Some("csv") => decode_csv(text),
        Some("base64") | None => decode_base64(text, compression),
        Some(other) => Err(EngineError::DecodeError {
            path: path.to_path_buf(),
            reason: format!("unsupported encoding '{other}'"),
        }),
    }
}

fn convert_group(group: XmlGroup, path: &Path) -> EngineResult<Vec<Layer>> {
    let mut layers = Vec::new();
    for layer in group.tile_layers {
        let data = layer
            .data
            .as_ref()
            .ok_or_else(|| EngineError::MalformedContent {
                path: path.to_path_buf(),
                reason: format!("layer '{}' has no <data>", layer.name),
            })?;
        layers.push(Layer::Tile(TileLayer {
            name: layer.name,
            offset_x: layer.offsetx,
            offset_y: layer.offsety,
            properties: convert_properties(layer.properties),
            data: parse_inline_data(data, path)?,
        }));
    }
    for group_layer in group.object_groups {
        let objects = group_layer
            .objects
            .into_iter()
            .map(|o| MapObject {
                id: o.id,
                name: o.name,
                obj_type: o.obj_type,
                x: o.x,
                y: o.y,
                width: o.width,
                height: o.height,
                properties: convert_properties(o.properties),
            })
            .collect();
        layers.push(Layer::Object(ObjectLayer {
            name: group_layer.name,
            offset_x: group_layer.offsetx,
            offset_y: group_layer.offsety,
            objects,
        }));
    }
    for img in group.image_layers {
        layers.push(Layer::Image(ImageLayer {
            name: img.name,
            image: img.image.source,
            offset_x: img.offsetx,
            offset_y: img.offsety,
            parallax_x: img.parallaxx,
            parallax_y: img.parallaxy,
            repeat_x: img.repeatx,
            repeat_y: img.repeaty,
            opacity: img.opacity,
        }));
    }
    for nested in group.groups {
        layers.push(Layer::Group(convert_group(nested, path)?));
    }
    Ok(layers)
}

pub fn parse_tmx(text: &str, path: &Path, tileset_cache: &mut TilesetCache) -> EngineResult<TiledMap> {
    let raw: XmlMap = quick_xml::de::from_str(text).map_err(|e| EngineError::MalformedContent {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let orientation = match raw.orientation.as_str() {
        "orthogonal" => Orientation::Orthogonal,
        "isometric" => Orientation::Isometric,
        "hexagonal" => Orientation::Hexagonal,
        other => {
            return Err(EngineError::MalformedContent {
                path: path.to_path_buf(),
                reason: format!("unknown orientation '{other}'"),
            })
        }
    };
    let renderorder = match raw.renderorder.as_str() {
        "right-down" => RenderOrder::RightDown,
        "right-up" => RenderOrder::RightUp,
        "left-down" => RenderOrder::LeftDown,
        "left-up" => RenderOrder::LeftUp,
        other => {
            return Err(EngineError::MalformedContent {
                path: path.to_path_buf(),
                reason: format!("unknown renderorder '{other}'"),
            })
        }
    };

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tilesets = Vec::with_capacity(raw.tilesets.len());
    for raw_ts in raw.tilesets {
        let tileset = if let Some(source) = &raw_ts.source {
            tileset_cache.load(&base_dir.join(source))?
        } else {
            Tileset::from_inline(super::tileset::inline_from_xml(
                raw_ts.tilewidth.unwrap_or(0),
                raw_ts.tileheight.unwrap_or(0),
                raw_ts.tilecount,
                raw_ts.columns,
                raw_ts.margin,
                raw_ts.spacing,
                raw_ts.image.map(|i| i.source).unwrap_or_default(),
            ))
        };
        tilesets.push(TilesetRef {
            firstgid: raw_ts.firstgid,
            source: raw_ts.source.map(|s| base_dir.join(s)),
            tileset,
        });
    }

    let layers = convert_group(raw.root_group, path)?;

    Ok(TiledMap {
        orientation,
        renderorder,
        tile_w: raw.tilewidth,
        tile_h: raw.tileheight,
        width: raw.width,
        height: raw.height,
        infinite: raw.infinite != 0,
        chunk_origin: ChunkOrigin::default(),
        hex_orientation: HexOrientation::default(),
        tilesets,
        layers,
    })
}
