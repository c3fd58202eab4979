//! In-memory representation shared by both Tiled dialects (TMJ/JSON and
//! TMX/XML parse into the same [`TiledMap`]).

pub mod decode;
pub mod gid;
pub mod tileset;
pub mod tmj;
pub mod tmx;

use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Orthogonal,
    Isometric,
    Hexagonal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderOrder {
    RightDown,
    RightUp,
    LeftDown,
    LeftUp,
}

impl RenderOrder {
    /// §4.2.4 step 4: these two orders flip the tile Y axis.
    pub fn flips_y(self) -> bool {
        matches!(self, RenderOrder::LeftUp | RenderOrder::RightUp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HexOrientation {
    #[default]
    FlatTop,
    PointyTop,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PropValue {
    pub bool_val: Option<bool>,
    pub int_val: Option<i64>,
    pub float_val: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct Properties(pub HashMap<String, PropString>);

#[derive(Debug, Clone, PartialEq)]
pub enum PropString {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Color(String),
}

impl Properties {
    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(PropString::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropString> {
        self.0.get(key)
    }
}

/// Converts a single custom-property value into the JSON shape
/// `substitute_params`/blueprint overrides expect.
pub fn prop_to_json(prop: &PropString) -> serde_json::Value {
    match prop {
        PropString::Bool(b) => serde_json::Value::Bool(*b),
        PropString::Int(i) => serde_json::Value::from(*i),
        PropString::Float(f) => serde_json::Value::from(*f),
        PropString::String(s) | PropString::Color(s) => serde_json::Value::String(s.clone()),
    }
}

#[derive(Debug, Clone)]
pub struct TilesetRef {
    pub firstgid: u32,
    /// `None` for tilesets embedded directly in the map document.
    pub source: Option<PathBuf>,
    pub tileset: tileset::Tileset,
}

#[derive(Debug, Clone)]
pub enum TileData {
    Csv(Vec<u32>),
    Chunks(Vec<Chunk>),
}

#[derive(Debug, Clone)]
pub struct Chunk {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u32>,
}

#[derive(Debug, Clone)]
pub struct TileLayer {
    pub name: String,
    pub offset_x: f32,
    pub offset_y: f32,
    pub properties: Properties,
    pub data: TileData,
}

#[derive(Debug, Clone, Default)]
pub struct ObjectShape;

#[derive(Debug, Clone)]
pub struct MapObject {
    pub id: u32,
    pub name: String,
    pub obj_type: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub properties: Properties,
}

#[derive(Debug, Clone)]
pub struct ObjectLayer {
    pub name: String,
    pub offset_x: f32,
    pub offset_y: f32,
    pub objects: Vec<MapObject>,
}

#[derive(Debug, Clone)]
pub struct ImageLayer {
    pub name: String,
    pub image: String,
    pub offset_x: f32,
    pub offset_y: f32,
    pub parallax_x: f32,
    pub parallax_y: f32,
    pub repeat_x: bool,
    pub repeat_y: bool,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub enum Layer {
    Tile(TileLayer),
    Object(ObjectLayer),
    Image(ImageLayer),
    Group(Vec<Layer>),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChunkOrigin {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone)]
pub struct TiledMap {
    pub orientation: Orientation,
    pub renderorder: RenderOrder,
    pub tile_w: u32,
    pub tile_h: u32,
    pub width: u32,
    pub height: u32,
    pub infinite: bool,
    pub chunk_origin: ChunkOrigin,
    pub hex_orientation: HexOrientation,
    pub tilesets: Vec<TilesetRef>,
    pub layers: Vec<Layer>,
}

impl TiledMap {
    /// Superset of image paths this map could sample while rendering: every
    /// tileset image plus every image layer's image.
    pub fn all_image_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .tilesets
            .iter()
            .map(|t| PathBuf::from(&t.tileset.image))
            .collect();
        fn walk(layers: &[Layer], out: &mut Vec<PathBuf>) {
            for layer in layers {
                match layer {
                    Layer::Image(img) => out.push(PathBuf::from(&img.image)),
                    Layer::Group(children) => walk(children, out),
                    _ => {}
                }
            }
        }
        walk(&self.layers, &mut paths);
        paths
    }
}
