//! On-disk behavior-tree asset: a flat node table plus a root id.
//!
//! Nodes are tagged variants, not a trait-object tree — dispatch in the
//! interpreter is a `match`, never a virtual call, which keeps nodes
//! trivially copyable and serializable per the design notes.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::ecs::components::NodeId;
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    TargetVisible,
    TargetInRange,
    HealthBelow,
    HasMoveGoal,
    CanAttack,
    HeardNoise,
}

impl Condition {
    fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "TargetVisible" => Self::TargetVisible,
            "TargetInRange" => Self::TargetInRange,
            "HealthBelow" => Self::HealthBelow,
            "HasMoveGoal" => Self::HasMoveGoal,
            "CanAttack" => Self::CanAttack,
            "HeardNoise" => Self::HeardNoise,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveGoalSource {
    Target,
    LastKnown,
    PatrolPoint,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetMoveGoalTo(MoveGoalSource),
    MoveToGoal,
    AttackIfClose,
    PatrolPickNext,
    ClearTarget,
    Idle,
}

impl Action {
    fn from_str(s: &str, params: &HashMap<String, Value>) -> Option<Self> {
        Some(match s {
            "SetMoveGoalTo" => {
                let source = match params.get("source").and_then(Value::as_str) {
                    Some("Target") | None => MoveGoalSource::Target,
                    Some("LastKnown") => MoveGoalSource::LastKnown,
                    Some("PatrolPoint") => MoveGoalSource::PatrolPoint,
                    Some(_) => return None,
                };
                Self::SetMoveGoalTo(source)
            }
            "MoveToGoal" => Self::MoveToGoal,
            "AttackIfClose" => Self::AttackIfClose,
            "PatrolPickNext" => Self::PatrolPickNext,
            "ClearTarget" => Self::ClearTarget,
            "Idle" => Self::Idle,
            _ => return None,
        })
    }
}

/// A single node's content, independent of tree position. `Params` carries
/// per-condition thresholds (e.g. `HealthBelow`'s fraction) that the
/// interpreter reads out by key.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Selector,
    Sequence,
    Inverter,
    Repeater { times: Option<u32> },
    Condition(Condition),
    Action(Action),
    /// A condition/action whose type name wasn't recognized at load time;
    /// always ticks to `Failure`, logged once.
    Unknown { raw_type: String },
}

#[derive(Debug, Clone)]
pub struct BtNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub child_ids: Vec<NodeId>,
    pub params: HashMap<String, Value>,
}

#[derive(Debug, Clone)]
pub struct BehaviorTreeAsset {
    pub name: String,
    pub root: NodeId,
    pub nodes: HashMap<NodeId, BtNode>,
}

impl BehaviorTreeAsset {
    pub fn node(&self, id: NodeId) -> Option<&BtNode> {
        self.nodes.get(&id)
    }
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: u32,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    parameters: HashMap<String, Value>,
    #[serde(default, rename = "childIds")]
    child_ids: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct RawTree {
    #[serde(rename = "rootNodeId")]
    root_node_id: u32,
    nodes: Vec<RawNode>,
}

/// Parses a `BehaviorTree`-kind blueprint's `data` payload.
pub fn parse_behavior_tree(name: &str, data: &Value) -> EngineResult<BehaviorTreeAsset> {
    let raw: RawTree = serde_json::from_value(data.clone()).map_err(|e| EngineError::MalformedContent {
        path: name.into(),
        reason: e.to_string(),
    })?;

    let mut nodes = HashMap::new();
    for raw_node in raw.nodes {
        let id = NodeId(raw_node.id);
        let kind = classify(&raw_node.kind, &raw_node.parameters, name);
        nodes.insert(
            id,
            BtNode {
                id,
                kind,
                child_ids: raw_node.child_ids.into_iter().map(NodeId).collect(),
                params: raw_node.parameters,
            },
        );
    }

    Ok(BehaviorTreeAsset {
        name: name.to_string(),
        root: NodeId(raw.root_node_id),
        nodes,
    })
}

fn classify(tag: &str, params: &HashMap<String, Value>, asset_name: &str) -> NodeKind {
    match tag {
        "Selector" => NodeKind::Selector,
        "Sequence" => NodeKind::Sequence,
        "Inverter" => NodeKind::Inverter,
        "Repeater" => NodeKind::Repeater {
            times: params.get("times").and_then(Value::as_u64).map(|n| n as u32),
        },
        other => {
            if let Some(cond) = Condition::from_str(other) {
                NodeKind::Condition(cond)
            } else if let Some(action) = Action::from_str(other, params) {
                NodeKind::Action(action)
            } else {
                log::warn!("unknown behavior-tree node type '{other}' in asset '{asset_name}'");
                NodeKind::Unknown {
                    raw_type: other.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_selector_sequence_and_leaf_nodes() {
        let data = json!({
            "rootNodeId": 1,
            "nodes": [
                { "id": 1, "type": "Selector", "childIds": [2, 3] },
                { "id": 2, "type": "TargetVisible", "childIds": [] },
                { "id": 3, "type": "MoveToGoal", "childIds": [] }
            ]
        });
        let tree = parse_behavior_tree("guard_patrol", &data).unwrap();
        assert_eq!(tree.root, NodeId(1));
        assert_eq!(tree.node(NodeId(1)).unwrap().kind, NodeKind::Selector);
        assert_eq!(
            tree.node(NodeId(2)).unwrap().kind,
            NodeKind::Condition(Condition::TargetVisible)
        );
        assert_eq!(
            tree.node(NodeId(3)).unwrap().kind,
            NodeKind::Action(Action::MoveToGoal)
        );
    }

    #[test]
    fn unrecognized_type_name_becomes_unknown_not_an_error() {
        let data = json!({
            "rootNodeId": 1,
            "nodes": [{ "id": 1, "type": "DoTheImpossible", "childIds": [] }]
        });
        let tree = parse_behavior_tree("bad_tree", &data).unwrap();
        match &tree.node(NodeId(1)).unwrap().kind {
            NodeKind::Unknown { raw_type } => assert_eq!(raw_type, "DoTheImpossible"),
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn set_move_goal_to_reads_source_param() {
        let data = json!({
            "rootNodeId": 1,
            "nodes": [{
                "id": 1, "type": "SetMoveGoalTo", "childIds": [],
                "parameters": { "source": "PatrolPoint" }
            }]
        });
        let tree = parse_behavior_tree("t", &data).unwrap();
        assert_eq!(
            tree.node(NodeId(1)).unwrap().kind,
            NodeKind::Action(Action::SetMoveGoalTo(MoveGoalSource::PatrolPoint))
        );
    }
}
