//! Content pipeline: loading Tiled maps, resolving blueprints into
//! entities, and building the navigation grid used by AI pathfinding.

pub mod instantiate;
pub mod navgrid;
pub mod projection;
pub mod tiled;

use std::collections::HashMap;
use std::path::Path;

use crate::assets::blueprint::Blueprint;
use crate::ecs::{Entity, World};
use crate::error::{EngineError, EngineResult};

use instantiate::instantiate_object_layer;
use navgrid::{build_navigation_map, NavigationMap};
use tiled::tileset::TilesetCache;
use tiled::{Layer, TiledMap};

/// Owns the tileset cache shared across every map load so a tileset
/// referenced by more than one map is only parsed once per session.
#[derive(Default)]
pub struct ContentLoader {
    tileset_cache: TilesetCache,
}

impl ContentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a Tiled map, dispatching on file extension. `.tmx` is parsed as
    /// XML, `.tmj`/`.json` as JSON; any other extension is an error rather
    /// than a guess.
    pub fn load_map(&mut self, path: &Path) -> EngineResult<TiledMap> {
        let is_tmx = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("tmx"))
            .unwrap_or(false);
        let is_tmj = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("tmj") || e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if !is_tmx && !is_tmj {
            return Err(EngineError::MalformedContent {
                path: path.to_path_buf(),
                reason: "unrecognized map extension, expected .tmx/.tmj/.json".into(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        if is_tmx {
            tiled::tmx::parse_tmx(&text, path, &mut self.tileset_cache)
        } else {
            tiled::tmj::parse_tmj(&text, path, &mut self.tileset_cache)
        }
    }

    /// Capstone entry point: loads the map at `path`, instantiates every
    /// object-layer entity against `blueprints` into a fresh [`World`], and
    /// builds the [`NavigationMap`] AI pathfinding runs against. This is the
    /// single call a game loop needs to go from "map file" to "populated
    /// world ready to tick".
    pub fn load_world(
        &mut self,
        path: &Path,
        blueprints: &HashMap<String, Blueprint>,
    ) -> EngineResult<(World, NavigationMap, Vec<Entity>)> {
        let map = self.load_map(path)?;
        let mut world = World::new();
        let mut spawned = Vec::new();

        fn walk(
            layers: &[Layer],
            map: &TiledMap,
            world: &mut World,
            blueprints: &HashMap<String, Blueprint>,
            spawned: &mut Vec<Entity>,
        ) -> EngineResult<()> {
            for layer in layers {
                match layer {
                    Layer::Object(object_layer) => {
                        spawned.extend(instantiate_object_layer(world, map, object_layer, blueprints)?);
                    }
                    Layer::Group(children) => walk(children, map, world, blueprints, spawned)?,
                    Layer::Tile(_) | Layer::Image(_) => {}
                }
            }
            Ok(())
        }
        walk(&map.layers, &map, &mut world, blueprints, &mut spawned)?;

        let nav = build_navigation_map(&map);
        Ok((world, nav, spawned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extension_is_rejected_without_guessing() {
        let mut loader = ContentLoader::new();
        let err = loader.load_map(Path::new("map.level")).unwrap_err();
        assert!(matches!(err, EngineError::MalformedContent { .. }));
    }

    #[test]
    fn load_world_rejects_the_same_malformed_extension_as_load_map() {
        let mut loader = ContentLoader::new();
        let err = loader
            .load_world(Path::new("map.level"), &HashMap::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::MalformedContent { .. }));
    }
}
