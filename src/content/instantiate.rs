//! Turns a parsed [`Blueprint`] plus per-placement parameter overrides into
//! live entities, and expands a Tiled object layer into the entities it
//! describes.

use std::collections::HashMap;

use glam::Vec2;
use serde_json::Value;

use crate::assets::blueprint::{self, Blueprint, BlueprintType};
use crate::ecs::components::{BoundingBox, CollisionZone, EntityKind, Identity, Position, Rect, RenderLayer};
use crate::ecs::{Entity, World};
use crate::error::{EngineError, EngineResult};

use super::projection::project_to_screen;
use super::tiled::{MapObject, ObjectLayer, TiledMap};

/// Maps an entity's `Identity.kind` to the render layer its `Position.z`
/// should carry, per the content pipeline's entity-instantiation step that
/// derives `z` from `Identity.type` rather than leaving it to the blueprint.
fn render_layer_for_kind(kind: EntityKind) -> RenderLayer {
    match kind {
        EntityKind::Player | EntityKind::Npc => RenderLayer::Characters,
        EntityKind::UiElement => RenderLayer::Ui,
        EntityKind::Item | EntityKind::Static | EntityKind::Collision => RenderLayer::Objects,
    }
}

/// Scans a blueprint's component declarations for its `Identity` component's
/// `kind` property ahead of the main instantiation loop, so `Position`'s
/// render layer is correct regardless of declaration order within the
/// blueprint.
fn resolve_kind(decls: &[blueprint::ComponentDecl], instance_params: &HashMap<String, Value>) -> EntityKind {
    for decl in decls {
        if decl.kind.as_str() != "Identity" {
            continue;
        }
        let properties: HashMap<String, Value> = decl
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), blueprint::substitute_params(v, instance_params)))
            .collect();
        return match str_prop(&properties, "kind", "Static").as_str() {
            "Player" => EntityKind::Player,
            "Npc" => EntityKind::Npc,
            "Item" => EntityKind::Item,
            "UiElement" => EntityKind::UiElement,
            "Collision" => EntityKind::Collision,
            _ => EntityKind::Static,
        };
    }
    EntityKind::Static
}

/// Reads a property off a [`ComponentDecl`]'s JSON properties by name,
/// falling back to `default` when absent or of the wrong shape.
fn num_prop(properties: &HashMap<String, Value>, key: &str, default: f32) -> f32 {
    properties.get(key).and_then(Value::as_f64).map(|v| v as f32).unwrap_or(default)
}

fn str_prop(properties: &HashMap<String, Value>, key: &str, default: &str) -> String {
    properties
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}

/// `CreateEntityWithOverrides`: spawns an entity from an `EntityBlueprint`,
/// applying `$paramName` substitution from `instance_params` before any
/// component is attached.
pub fn create_entity_with_overrides(
    world: &mut World,
    blueprint: &Blueprint,
    instance_params: &HashMap<String, Value>,
    position: Vec2,
) -> EngineResult<Entity> {
    if blueprint.kind != BlueprintType::EntityBlueprint {
        return Err(EngineError::MalformedContent {
            path: blueprint.name.clone().into(),
            reason: "instantiate called on a non-EntityBlueprint".into(),
        });
    }

    let decls = blueprint::entity_components(blueprint)?;
    let entity = world.spawn();

    // Resolved ahead of the main loop so Position's render layer is correct
    // even when a blueprint declares Position before Identity.
    let mut kind = resolve_kind(&decls, instance_params);
    let layer = render_layer_for_kind(kind);

    for decl in &decls {
        let properties: HashMap<String, Value> = decl
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), blueprint::substitute_params(v, instance_params)))
            .collect();

        match decl.kind.as_str() {
            "Identity" => {
                let tag = str_prop(&properties, "tag", "");
                kind = match str_prop(&properties, "kind", "Static").as_str() {
                    "Player" => EntityKind::Player,
                    "Npc" => EntityKind::Npc,
                    "Item" => EntityKind::Item,
                    "UiElement" => EntityKind::UiElement,
                    "Collision" => EntityKind::Collision,
                    _ => EntityKind::Static,
                };
                world.add_component(
                    entity,
                    Identity {
                        name: blueprint.name.clone(),
                        tag,
                        kind,
                    },
                )?;
            }
            "Position" => {
                // x/y may be overridden by blueprint-declared defaults, but z
                // always follows Identity.type -- the world-space coordinate
                // conversion already happened before this function was called.
                world.add_component(
                    entity,
                    Position {
                        x: num_prop(&properties, "x", position.x),
                        y: num_prop(&properties, "y", position.y),
                        z: layer,
                    },
                )?;
            }
            "BoundingBox" => {
                world.add_component(
                    entity,
                    BoundingBox {
                        width: num_prop(&properties, "width", 16.0),
                        height: num_prop(&properties, "height", 16.0),
                    },
                )?;
            }
            other => {
                log::debug!("blueprint component '{other}' has no instantiation mapping, skipped");
            }
        }
    }

    if world.get_component::<Identity>(entity).is_none() {
        world.add_component(
            entity,
            Identity {
                name: blueprint.name.clone(),
                tag: String::new(),
                kind,
            },
        )?;
    }
    if world.get_component::<Position>(entity).is_none() {
        world.add_component(
            entity,
            Position {
                x: position.x,
                y: position.y,
                z: layer,
            },
        )?;
    }

    Ok(entity)
}

/// Spawns a bare `{Identity, Position, CollisionZone}` entity, used for a
/// Tiled object whose `type` is the reserved `"collision"` tag rather than a
/// blueprint reference. `world_pos` is the already-projected screen position;
/// the collision rectangle itself stays in the object's own pixel footprint.
fn spawn_collision_entity(world: &mut World, object: &MapObject, world_pos: Vec2) -> EngineResult<Entity> {
    let entity = world.spawn();
    world.add_component(
        entity,
        Identity {
            name: object.name.clone(),
            tag: "collision".into(),
            kind: EntityKind::Collision,
        },
    )?;
    world.add_component(
        entity,
        Position {
            x: world_pos.x,
            y: world_pos.y,
            z: RenderLayer::Objects,
        },
    )?;
    world.add_component(
        entity,
        CollisionZone {
            bounds: Rect {
                x: object.x,
                y: object.y,
                w: object.width,
                h: object.height,
            },
            blocking: true,
        },
    )?;
    Ok(entity)
}

/// Looks up `object`'s blueprint reference by its `type` (falling back to
/// `name` for hand-placed objects that left `type` blank), instantiates it,
/// and threads the object's custom properties through as override params.
/// A blueprint that can't be found produces a visible placeholder entity
/// rather than silently dropping the placement, so a missing asset shows up
/// in the level instead of vanishing.
///
/// `object.x`/`object.y` are Tiled pixel coordinates local to `layer_offset`;
/// they're run through the 5-step coordinate pipeline (layer offset, pixel
/// to tile, chunk-origin normalization, render-order flip, then the
/// orientation's screen projection) before becoming a `Position`.
pub fn instantiate_object(
    world: &mut World,
    map: &TiledMap,
    layer_offset: Vec2,
    object: &MapObject,
    blueprints: &HashMap<String, Blueprint>,
) -> EngineResult<Entity> {
    let position = project_to_screen(map, layer_offset, Vec2::new(object.x, object.y));

    if object.obj_type == "collision" {
        return spawn_collision_entity(world, object, position);
    }

    let lookup_key = if object.obj_type.is_empty() {
        &object.name
    } else {
        &object.obj_type
    };

    match blueprints.get(lookup_key) {
        Some(blueprint) => {
            let overrides: HashMap<String, Value> = object
                .properties
                .0
                .iter()
                .map(|(k, v)| (k.clone(), super::tiled::prop_to_json(v)))
                .collect();
            create_entity_with_overrides(world, blueprint, &overrides, position)
        }
        None => {
            log::warn!("object '{lookup_key}' references unknown blueprint, spawning placeholder");
            let entity = world.spawn();
            world.add_component(
                entity,
                Identity {
                    name: object.name.clone(),
                    tag: "missing_blueprint".into(),
                    kind: EntityKind::Static,
                },
            )?;
            world.add_component(
                entity,
                Position {
                    x: position.x,
                    y: position.y,
                    z: RenderLayer::Objects,
                },
            )?;
            Ok(entity)
        }
    }
}

/// Instantiates every object in `layer`, skipping none — callers that need
/// to separate static decoration from dynamic actors do so beforehand by
/// filtering on a Tiled custom property before calling this.
pub fn instantiate_object_layer(
    world: &mut World,
    map: &TiledMap,
    layer: &ObjectLayer,
    blueprints: &HashMap<String, Blueprint>,
) -> EngineResult<Vec<Entity>> {
    let layer_offset = Vec2::new(layer.offset_x, layer.offset_y);
    layer
        .objects
        .iter()
        .map(|object| instantiate_object(world, map, layer_offset, object, blueprints))
        .collect()
}
