//! TMJ (JSON) map parser.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::decode::{decode_base64, decode_csv, Compression};
use super::tileset::{Tileset, TilesetCache};
use super::{
    ChunkOrigin, HexOrientation, ImageLayer, Layer, MapObject, Orientation, ObjectLayer,
    Properties, PropString, RenderOrder, TileData, TileLayer, TiledMap, TilesetRef,
};
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Deserialize)]
struct RawProperty {
    name: String,
    #[serde(rename = "type", default)]
    ty: Option<String>,
    value: Value,
}

#[derive(Debug, Deserialize, Default)]
struct RawChunk {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize, Default)]
struct RawObject {
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    obj_type: String,
    x: f32,
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    #[serde(default)]
    properties: Vec<RawProperty>,
}

#[derive(Debug, Deserialize)]
struct RawLayer {
    #[serde(rename = "type")]
    ty: String,
    name: String,
    #[serde(default)]
    offsetx: f32,
    #[serde(default)]
    offsety: f32,
    #[serde(default)]
    properties: Vec<RawProperty>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    compression: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    chunks: Option<Vec<RawChunk>>,
    #[serde(default)]
    objects: Option<Vec<RawObject>>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    parallaxx: Option<f32>,
    #[serde(default)]
    parallaxy: Option<f32>,
    #[serde(default)]
    repeatx: Option<bool>,
    #[serde(default)]
    repeaty: Option<bool>,
    #[serde(default)]
    opacity: Option<f32>,
    #[serde(default)]
    layers: Option<Vec<RawLayer>>,
}

#[derive(Debug, Deserialize)]
struct RawTilesetRef {
    firstgid: u32,
    #[serde(default)]
    source: Option<String>,
    #[serde(flatten)]
    inline: Value,
}

#[derive(Debug, Deserialize)]
struct RawMap {
    orientation: String,
    renderorder: String,
    tilewidth: u32,
    tileheight: u32,
    width: u32,
    height: u32,
    #[serde(default)]
    infinite: bool,
    #[serde(default)]
    hexorientation: Option<String>,
    tilesets: Vec<RawTilesetRef>,
    layers: Vec<RawLayer>,
}

fn parse_orientation(s: &str, path: &Path) -> EngineResult<Orientation> {
    Ok(match s {
        "orthogonal" => Orientation::Orthogonal,
        "isometric" => Orientation::Isometric,
        "hexagonal" => Orientation::Hexagonal,
        other => {
            return Err(EngineError::MalformedContent {
                path: path.to_path_buf(),
                reason: format!("unknown orientation '{other}'"),
            })
        }
    })
}

fn parse_renderorder(s: &str, path: &Path) -> EngineResult<RenderOrder> {
    Ok(match s {
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
    })
}

fn convert_properties(raw: Vec<RawProperty>) -> Properties {
    let mut map = HashMap::new();
    for p in raw {
        let v = match p.ty.as_deref() {
            Some("bool") => PropString::Bool(p.value.as_bool().unwrap_or_default()),
            Some("int") => PropString::Int(p.value.as_i64().unwrap_or_default()),
            Some("float") => PropString::Float(p.value.as_f64().unwrap_or_default()),
            Some("color") => PropString::Color(p.value.as_str().unwrap_or_default().to_string()),
            _ => match p.value {
                Value::Bool(b) => PropString::Bool(b),
                Value::Number(n) if n.is_i64() => PropString::Int(n.as_i64().unwrap()),
                Value::Number(n) => PropString::Float(n.as_f64().unwrap_or_default()),
                other => PropString::String(other.as_str().unwrap_or_default().to_string()),
            },
        };
        map.insert(p.name, v);
    }
    Properties(map)
}

fn parse_tile_data(raw: &RawLayer, path: &Path) -> EngineResult<TileData> {
    if let Some(chunks) = &raw.chunks {
        let mut out = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let data = parse_data_value(&chunk.data, raw.encoding.as_deref(), raw.compression.as_deref(), path)?;
            out.push(super::Chunk {
                x: chunk.x,
                y: chunk.y,
                width: chunk.width,
                height: chunk.height,
                data,
            });
        }
        return Ok(TileData::Chunks(out));
    }
    let data = raw
        .data
        .as_ref()
        .ok_or_else(|| EngineError::MalformedContent {
            path: path.to_path_buf(),
            reason: format!("tile layer '{}' has no data or chunks", raw.name),
        })?;
    Ok(TileData::Csv(parse_data_value(
        data,
        raw.encoding.as_deref(),
        raw.compression.as_deref(),
        path,
    )?))
}

fn parse_data_value(
    value: &Value,
    encoding: Option<&str>,
    compression: Option<&str>,
    path: &Path,
) -> EngineResult<Vec<u32>> {
    match value {
        Value::Array(items) => Ok(items
            .iter()
            .map(|v| v.as_u64().unwrap_or(0) as u32)
            .collect()),
        Value::String(text) => {
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
            if encoding == Some("csv") {
                decode_csv(text)
            } else {
                decode_base64(text, compression)
            }
        }
        other => Err(EngineError::MalformedContent {
            path: path.to_path_buf(),
            reason: format!("unsupported tile data shape: {other}"),
        }),
    }
}

fn convert_layer(mut raw: RawLayer, path: &Path) -> EngineResult<Layer> {
    match raw.ty.as_str() {
        "tilelayer" => {
            let offset_x = raw.offsetx;
            let offset_y = raw.offsety;
            let properties = convert_properties(std::mem::take(&mut raw.properties));
            let name = std::mem::take(&mut raw.name);
            let data = parse_tile_data(&raw, path)?;
            Ok(Layer::Tile(TileLayer {
                name,
                offset_x,
                offset_y,
                properties,
                data,
            }))
        }
        "objectgroup" => {
            let objects = raw
                .objects
                .unwrap_or_default()
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
            Ok(Layer::Object(ObjectLayer {
                name: raw.name,
                offset_x: raw.offsetx,
                offset_y: raw.offsety,
                objects,
            }))
        }
        "imagelayer" => Ok(Layer::Image(ImageLayer {
            name: raw.name,
            image: raw.image.unwrap_or_default(),
            offset_x: raw.offsetx,
            offset_y: raw.offsety,
            parallax_x: raw.parallaxx.unwrap_or(1.0),
            parallax_y: raw.parallaxy.unwrap_or(1.0),
            repeat_x: raw.repeatx.unwrap_or(false),
            repeat_y: raw.repeaty.unwrap_or(false),
            opacity: raw.opacity.unwrap_or(1.0),
        })),
        "group" => {
            let children = raw
                .layers
                .unwrap_or_default()
                .into_iter()
                .map(|l| convert_layer(l, path))
                .collect::<EngineResult<Vec<_>>>()?;
            Ok(Layer::Group(children))
        }
        other => Err(EngineError::MalformedContent {
            path: path.to_path_buf(),
            reason: format!("unknown layer type '{other}'"),
        }),
    }
}

pub fn parse_tmj(text: &str, path: &Path, tileset_cache: &mut TilesetCache) -> EngineResult<TiledMap> {
    let raw: RawMap = serde_json::from_str(text).map_err(|e| EngineError::MalformedContent {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let orientation = parse_orientation(&raw.orientation, path)?;
    let renderorder = parse_renderorder(&raw.renderorder, path)?;
    let hex_orientation = match raw.hexorientation.as_deref() {
        Some("pointy") => HexOrientation::PointyTop,
        _ => HexOrientation::FlatTop,
    };

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tilesets = Vec::with_capacity(raw.tilesets.len());
    for raw_ts in raw.tilesets {
        let tileset = if let Some(source) = &raw_ts.source {
            tileset_cache.load(&base_dir.join(source))?
        } else {
            let inline: super::tileset::RawInlineTsj =
                serde_json::from_value(raw_ts.inline).map_err(|e| EngineError::MalformedContent {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            Tileset::from_inline(inline)
        };
        tilesets.push(TilesetRef {
            firstgid: raw_ts.firstgid,
            source: raw_ts.source.map(|s| base_dir.join(s)),
            tileset,
        });
    }

    let layers = raw
        .layers
        .into_iter()
        .map(|l| convert_layer(l, path))
        .collect::<EngineResult<Vec<_>>>()?;

    Ok(TiledMap {
        orientation,
        renderorder,
        tile_w: raw.tilewidth,
        tile_h: raw.tileheight,
        width: raw.width,
        height: raw.height,
        infinite: raw.infinite,
        chunk_origin: ChunkOrigin::default(),
        hex_orientation,
        tilesets,
        layers,
    })
}
