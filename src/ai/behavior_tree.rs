//! Stage 4 of the AI pipeline: the behavior-tree interpreter.
//!
//! Ticks every entity's active tree at its own `tickHz`. A node that
//! returns `Running` records the path from root to itself in
//! [`BehaviorTreeRuntime::node_stack`] so the next tick resumes directly at
//! that leaf instead of re-evaluating siblings that already succeeded or
//! failed this pass.

use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use serde_json::Value;

use crate::assets::behavior_tree::{Action, BehaviorTreeAsset, BtNode, Condition, MoveGoalSource, NodeKind};
use crate::ecs::components::{
    AIBlackboard, AIState, AttackIntent, AttackIntentFlags, BehaviorTreeRuntime, MoveIntent, MoveIntentFlags,
    NodeId, Position,
};
use crate::ecs::signature::Signature;
use crate::ecs::system::System;
use crate::ecs::{Entity, World};
use crate::geometry::distance_euclidean;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Success,
    Failure,
    Running,
}

fn num_param(params: &HashMap<String, Value>, key: &str, default: f32) -> f32 {
    params.get(key).and_then(Value::as_f64).map(|v| v as f32).unwrap_or(default)
}

fn target_position(world: &World, bb: &AIBlackboard) -> Option<Vec2> {
    bb.target_entity
        .and_then(|t| world.get_component::<Position>(t))
        .map(|p| Vec2::new(p.x, p.y))
        .or(bb.last_known_pos)
}

fn evaluate_condition(node: &BtNode, cond: Condition, world: &World, entity: Entity) -> Status {
    let Some(bb) = world.get_component::<AIBlackboard>(entity) else {
        return Status::Failure;
    };
    let ok = match cond {
        Condition::TargetVisible => bb.flags.target_visible,
        Condition::HeardNoise => bb.flags.heard_noise,
        Condition::HealthBelow => bb.health_fraction < num_param(&node.params, "fraction", 0.3),
        Condition::HasMoveGoal => world
            .get_component::<MoveIntent>(entity)
            .map(|i| i.goal.is_some())
            .unwrap_or(false),
        Condition::TargetInRange => match (world.get_component::<Position>(entity), target_position(world, bb)) {
            (Some(pos), Some(target)) => {
                let range = num_param(&node.params, "range", 50.0);
                distance_euclidean(pos.x as i32, pos.y as i32, target.x as i32, target.y as i32) <= range
            }
            _ => false,
        },
        Condition::CanAttack => match (world.get_component::<Position>(entity), target_position(world, bb)) {
            (Some(pos), Some(target)) => {
                let range = num_param(&node.params, "range", 40.0);
                distance_euclidean(pos.x as i32, pos.y as i32, target.x as i32, target.y as i32) <= range
            }
            _ => false,
        },
    };
    if ok {
        Status::Success
    } else {
        Status::Failure
    }
}

fn evaluate_action(node: &BtNode, action: Action, world: &mut World, entity: Entity) -> Status {
    match action {
        Action::Idle => Status::Success,
        Action::ClearTarget => {
            if let Some(bb) = world.get_component_mut::<AIBlackboard>(entity) {
                bb.target_entity = None;
                bb.last_known_pos = None;
                bb.flags.target_visible = false;
            }
            Status::Success
        }
        Action::PatrolPickNext => {
            if let Some(bb) = world.get_component_mut::<AIBlackboard>(entity) {
                if bb.patrol_points.is_empty() {
                    return Status::Failure;
                }
                bb.patrol_index = (bb.patrol_index + 1) % bb.patrol_points.len();
                Status::Success
            } else {
                Status::Failure
            }
        }
        Action::SetMoveGoalTo(source) => {
            let Some(bb) = world.get_component::<AIBlackboard>(entity) else {
                return Status::Failure;
            };
            let goal = match source {
                MoveGoalSource::Target => target_position(world, bb),
                MoveGoalSource::LastKnown => bb.last_known_pos,
                MoveGoalSource::PatrolPoint => bb.patrol_points.get(bb.patrol_index).copied(),
            };
            match goal {
                Some(goal) => {
                    if world.has_component::<MoveIntent>(entity) {
                        if let Some(intent) = world.get_component_mut::<MoveIntent>(entity) {
                            intent.goal = Some(goal);
                        }
                    } else {
                        let _ = world.add_component(entity, MoveIntent { goal: Some(goal), flags: MoveIntentFlags::default() });
                    }
                    Status::Success
                }
                None => Status::Failure,
            }
        }
        Action::MoveToGoal => match world.get_component::<MoveIntent>(entity).and_then(|i| i.goal) {
            Some(_) => Status::Running,
            None => Status::Success,
        },
        Action::AttackIfClose => {
            let Some(bb) = world.get_component::<AIBlackboard>(entity) else {
                return Status::Failure;
            };
            let Some(target) = bb.target_entity else {
                return Status::Failure;
            };
            let Some(pos) = world.get_component::<Position>(entity) else {
                return Status::Failure;
            };
            let Some(target_pos) = world.get_component::<Position>(target) else {
                return Status::Failure;
            };
            let range = num_param(&node.params, "range", 40.0);
            if distance_euclidean(pos.x as i32, pos.y as i32, target_pos.x as i32, target_pos.y as i32) > range {
                return Status::Failure;
            }
            if world.has_component::<AttackIntent>(entity) {
                if let Some(intent) = world.get_component_mut::<AttackIntent>(entity) {
                    intent.target = Some(target);
                }
            } else {
                let _ = world.add_component(
                    entity,
                    AttackIntent { target: Some(target), flags: AttackIntentFlags::default() },
                );
            }
            Status::Success
        }
    }
}

/// Ticks `node_id`, resuming into `resume` (the tail of a previously
/// recorded root-to-leaf path, or empty for a fresh evaluation) and
/// returning the status plus the new root-to-leaf path to persist when the
/// result is `Running`.
fn tick_node(
    asset: &BehaviorTreeAsset,
    world: &mut World,
    entity: Entity,
    node_id: NodeId,
    resume: &[NodeId],
) -> (Status, Vec<NodeId>) {
    let Some(node) = asset.node(node_id) else {
        return (Status::Failure, Vec::new());
    };
    let child_resume: &[NodeId] = if resume.len() > 1 { &resume[1..] } else { &[] };

    match &node.kind {
        NodeKind::Selector => {
            let start = node
                .child_ids
                .iter()
                .position(|c| Some(c) == resume.get(1))
                .unwrap_or(0);
            for (idx, &child) in node.child_ids.iter().enumerate().skip(start) {
                let this_resume = if idx == start { child_resume } else { &[] };
                let (status, path) = tick_node(asset, world, entity, child, this_resume);
                match status {
                    Status::Running => {
                        let mut full = vec![node_id];
                        full.extend(path);
                        return (Status::Running, full);
                    }
                    Status::Success => return (Status::Success, Vec::new()),
                    Status::Failure => continue,
                }
            }
            (Status::Failure, Vec::new())
        }
        NodeKind::Sequence => {
            let start = node
                .child_ids
                .iter()
                .position(|c| Some(c) == resume.get(1))
                .unwrap_or(0);
            for (idx, &child) in node.child_ids.iter().enumerate().skip(start) {
                let this_resume = if idx == start { child_resume } else { &[] };
                let (status, path) = tick_node(asset, world, entity, child, this_resume);
                match status {
                    Status::Running => {
                        let mut full = vec![node_id];
                        full.extend(path);
                        return (Status::Running, full);
                    }
                    Status::Failure => return (Status::Failure, Vec::new()),
                    Status::Success => continue,
                }
            }
            (Status::Success, Vec::new())
        }
        NodeKind::Inverter => {
            let Some(&child) = node.child_ids.first() else {
                return (Status::Failure, Vec::new());
            };
            let (status, path) = tick_node(asset, world, entity, child, child_resume);
            match status {
                Status::Success => (Status::Failure, Vec::new()),
                Status::Failure => (Status::Success, Vec::new()),
                Status::Running => {
                    let mut full = vec![node_id];
                    full.extend(path);
                    (Status::Running, full)
                }
            }
        }
        NodeKind::Repeater { times } => {
            let Some(&child) = node.child_ids.first() else {
                return (Status::Failure, Vec::new());
            };
            match times {
                None => {
                    let (status, path) = tick_node(asset, world, entity, child, child_resume);
                    match status {
                        Status::Failure => (Status::Failure, Vec::new()),
                        Status::Running => {
                            let mut full = vec![node_id];
                            full.extend(path);
                            (Status::Running, full)
                        }
                        // Loops forever: a completed pass is still "in
                        // progress" from the decorator's point of view, and
                        // the empty child path means next tick starts fresh.
                        Status::Success => (Status::Running, vec![node_id]),
                    }
                }
                Some(n) => {
                    for _ in 0..*n {
                        let (status, _) = tick_node(asset, world, entity, child, &[]);
                        match status {
                            Status::Failure => return (Status::Failure, Vec::new()),
                            Status::Running => return (Status::Running, vec![node_id]),
                            Status::Success => continue,
                        }
                    }
                    (Status::Success, Vec::new())
                }
            }
        }
        NodeKind::Condition(cond) => (evaluate_condition(node, *cond, world, entity), Vec::new()),
        NodeKind::Action(action) => {
            let action = action.clone();
            let status = evaluate_action(node, action, world, entity);
            let path = if status == Status::Running { vec![node_id] } else { Vec::new() };
            (status, path)
        }
        NodeKind::Unknown { .. } => (Status::Failure, Vec::new()),
    }
}

pub struct BehaviorTreeSystem {
    trees: Rc<HashMap<String, BehaviorTreeAsset>>,
}

impl BehaviorTreeSystem {
    pub fn new(trees: Rc<HashMap<String, BehaviorTreeAsset>>) -> Self {
        Self { trees }
    }
}

impl System for BehaviorTreeSystem {
    fn name(&self) -> &str {
        "BehaviorTreeSystem"
    }

    fn process(&mut self, world: &mut World, dt: f32) {
        let runtime_bit = world.component_bit::<BehaviorTreeRuntime>();
        let state_bit = world.component_bit::<AIState>();
        let mut required = Signature::EMPTY;
        required.set(runtime_bit);
        required.set(state_bit);

        for entity in world.entities_matching(required) {
            let Some(runtime) = world.get_component::<BehaviorTreeRuntime>(entity) else {
                continue;
            };
            if !runtime.active {
                continue;
            }
            let tree_id = runtime.tree_asset_id.clone();
            let mut accumulator = runtime.accumulator + dt;
            let tick_hz = runtime.tick_hz;
            let resume = runtime.node_stack.clone();

            let period = 1.0 / tick_hz.max(0.001);
            if accumulator < period {
                if let Some(r) = world.get_component_mut::<BehaviorTreeRuntime>(entity) {
                    r.accumulator = accumulator;
                }
                continue;
            }
            accumulator -= period;

            let Some(asset) = self.trees.get(&tree_id) else {
                log::warn!("entity has no behavior tree asset named '{tree_id}', staying idle");
                if let Some(r) = world.get_component_mut::<BehaviorTreeRuntime>(entity) {
                    r.accumulator = accumulator;
                }
                continue;
            };
            let root = asset.root;
            let (_, path) = tick_node(asset, world, entity, root, &resume);

            if let Some(r) = world.get_component_mut::<BehaviorTreeRuntime>(entity) {
                r.accumulator = accumulator;
                r.node_stack = path;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::behavior_tree::parse_behavior_tree;
    use crate::ecs::components::RenderLayer;
    use serde_json::json;

    fn trees_with(name: &str, data: Value) -> Rc<HashMap<String, BehaviorTreeAsset>> {
        let asset = parse_behavior_tree(name, &data).unwrap();
        let mut map = HashMap::new();
        map.insert(name.to_string(), asset);
        Rc::new(map)
    }

    #[test]
    fn sequence_runs_move_to_goal_until_arrival_then_attacks() {
        let data = json!({
            "rootNodeId": 1,
            "nodes": [
                { "id": 1, "type": "Sequence", "childIds": [2, 3] },
                { "id": 2, "type": "SetMoveGoalTo", "childIds": [], "parameters": { "source": "Target" } },
                { "id": 3, "type": "AttackIfClose", "childIds": [], "parameters": { "range": 100.0 } }
            ]
        });
        let trees = trees_with("combat", data);

        let mut world = World::new();
        let target = world.spawn();
        world
            .add_component(target, Position { x: 5.0, y: 0.0, z: RenderLayer::Characters })
            .unwrap();

        let npc = world.spawn();
        world
            .add_component(npc, Position { x: 0.0, y: 0.0, z: RenderLayer::Characters })
            .unwrap();
        world.add_component(npc, AIState::default()).unwrap();
        let mut bb = AIBlackboard::new();
        bb.target_entity = Some(target);
        world.add_component(npc, bb).unwrap();
        world.add_component(npc, BehaviorTreeRuntime::new("combat", 60.0)).unwrap();

        let mut system = BehaviorTreeSystem::new(trees);
        system.process(&mut world, 1.0);

        assert_eq!(
            world.get_component::<AttackIntent>(npc).unwrap().target,
            Some(target)
        );
    }

    #[test]
    fn selector_falls_through_to_second_child_when_first_fails() {
        let data = json!({
            "rootNodeId": 1,
            "nodes": [
                { "id": 1, "type": "Selector", "childIds": [2, 3] },
                { "id": 2, "type": "TargetVisible", "childIds": [] },
                { "id": 3, "type": "Idle", "childIds": [] }
            ]
        });
        let trees = trees_with("idle_fallback", data);

        let mut world = World::new();
        let npc = world.spawn();
        world.add_component(npc, AIState::default()).unwrap();
        world.add_component(npc, AIBlackboard::new()).unwrap();
        world.add_component(npc, BehaviorTreeRuntime::new("idle_fallback", 60.0)).unwrap();

        let mut system = BehaviorTreeSystem::new(trees);
        system.process(&mut world, 1.0);

        assert!(world.get_component::<BehaviorTreeRuntime>(npc).unwrap().node_stack.is_empty());
    }

    #[test]
    fn missing_tree_asset_is_ignored_without_panicking() {
        let trees = Rc::new(HashMap::new());
        let mut world = World::new();
        let npc = world.spawn();
        world.add_component(npc, AIState::default()).unwrap();
        world.add_component(npc, AIBlackboard::new()).unwrap();
        world.add_component(npc, BehaviorTreeRuntime::new("nonexistent", 60.0)).unwrap();

        let mut system = BehaviorTreeSystem::new(trees);
        system.process(&mut world, 1.0);
    }
}
