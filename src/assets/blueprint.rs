//! Prefab/blueprint JSON schema v2 (`EntityBlueprint`, `BehaviorTree`, `HFSM`,
//! `AnimationBank`, …) and parameter-override substitution.
//!
//! Both flat (legacy) and `data`-wrapped (v2) placements are accepted;
//! normalization fills missing `schema_version`/`metadata`/`editorState`
//! with defaults rather than rejecting the file.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, EngineResult};

pub const SUPPORTED_SCHEMA_VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlueprintType {
    EntityBlueprint,
    BehaviorTree,
    Hfsm,
    AnimationGraph,
    ScriptedEvent,
    LevelDefinition,
    UiMenu,
    AnimationBank,
}

impl BlueprintType {
    fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "EntityBlueprint" => Self::EntityBlueprint,
            "BehaviorTree" => Self::BehaviorTree,
            "HFSM" => Self::Hfsm,
            "AnimationGraph" => Self::AnimationGraph,
            "ScriptedEvent" => Self::ScriptedEvent,
            "LevelDefinition" => Self::LevelDefinition,
            "UIMenu" => Self::UiMenu,
            "AnimationBank" => Self::AnimationBank,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Metadata {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub created: String,
    #[serde(default, rename = "lastModified")]
    pub last_modified: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EditorState {
    #[serde(default = "default_zoom")]
    pub zoom: f32,
}

fn default_zoom() -> f32 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDecl {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

/// A parsed, normalized blueprint document. `data` keeps the raw
/// type-specific payload since each `BlueprintType` shapes it differently;
/// callers (`instantiate`, the BT asset loader, the bank loader) pull out
/// what they need by type.
#[derive(Debug, Clone)]
pub struct Blueprint {
    pub schema_version: u32,
    pub kind: BlueprintType,
    pub name: String,
    pub description: String,
    pub metadata: Metadata,
    pub data: Value,
}

/// Parses a blueprint JSON document, applying the type-detection
/// precedence: explicit `type` field, then legacy `blueprintType`, then
/// structural heuristics.
pub fn parse_blueprint(text: &str) -> EngineResult<Blueprint> {
    let root: Value = serde_json::from_str(text).map_err(|e| EngineError::MalformedContent {
        path: "<blueprint>".into(),
        reason: e.to_string(),
    })?;

    let schema_version = root
        .get("schema_version")
        .and_then(Value::as_u64)
        .unwrap_or(2) as u32;
    if schema_version > SUPPORTED_SCHEMA_VERSION {
        return Err(EngineError::VersionMismatch {
            path: "<blueprint>".into(),
            found: schema_version,
            supported: SUPPORTED_SCHEMA_VERSION,
        });
    }

    let kind = detect_type(&root)?;
    let name = root
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let description = root
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let metadata = root
        .get("metadata")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default();

    // v2 wraps the payload under "data"; legacy placements keep it flat at
    // the document root. Either is accepted.
    let data = root.get("data").cloned().unwrap_or(root);

    Ok(Blueprint {
        schema_version,
        kind,
        name,
        description,
        metadata,
        data,
    })
}

fn detect_type(root: &Value) -> EngineResult<BlueprintType> {
    if let Some(tag) = root.get("type").and_then(Value::as_str) {
        if let Some(kind) = BlueprintType::from_tag(tag) {
            return Ok(kind);
        }
    }
    if let Some(tag) = root.get("blueprintType").and_then(Value::as_str) {
        log::warn!("blueprint uses deprecated 'blueprintType' field: {tag}");
        if let Some(kind) = BlueprintType::from_tag(tag) {
            return Ok(kind);
        }
    }

    let payload = root.get("data").unwrap_or(root);
    if payload.get("rootNodeId").is_some() && payload.get("nodes").is_some() {
        return Ok(BlueprintType::BehaviorTree);
    }
    if payload.get("components").is_some() {
        return Ok(BlueprintType::EntityBlueprint);
    }
    if payload.get("states").is_some() && payload.get("initialState").is_some() {
        return Ok(BlueprintType::Hfsm);
    }
    if payload.get("spritesheets").is_some() && payload.get("sequences").is_some() {
        return Ok(BlueprintType::AnimationBank);
    }

    Err(EngineError::MalformedContent {
        path: "<blueprint>".into(),
        reason: "could not determine blueprint type from tag or structure".into(),
    })
}

/// An entity blueprint's component list, extracted from an
/// `EntityBlueprint`-kind [`Blueprint::data`].
pub fn entity_components(blueprint: &Blueprint) -> EngineResult<Vec<ComponentDecl>> {
    let comps = blueprint
        .data
        .get("components")
        .ok_or_else(|| EngineError::MalformedContent {
            path: blueprint.name.clone().into(),
            reason: "EntityBlueprint missing 'components'".into(),
        })?;
    serde_json::from_value(comps.clone()).map_err(|e| EngineError::MalformedContent {
        path: blueprint.name.clone().into(),
        reason: e.to_string(),
    })
}

/// Substitutes `"$paramName"` string properties from `overrides`. Unknown
/// parameters referenced by the blueprint are logged and left as the
/// literal `$name` string, matching "unrecognized parameter → ignore with
/// warning".
pub fn substitute_params(value: &Value, overrides: &HashMap<String, Value>) -> Value {
    match value {
        Value::String(s) => {
            if let Some(param) = s.strip_prefix('$') {
                match overrides.get(param) {
                    Some(v) => v.clone(),
                    None => {
                        log::warn!("unrecognized blueprint parameter reference: ${param}");
                        value.clone()
                    }
                }
            } else {
                value.clone()
            }
        }
        Value::Array(items) => {
            Value::Array(items.iter().map(|v| substitute_params(v, overrides)).collect())
        }
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), substitute_params(v, overrides)))
                .collect(),
        ),
        other => other.clone(),
    }
}
