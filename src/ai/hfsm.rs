//! Stage 3 of the AI pipeline: the high-level finite-state machine that
//! decides *which* behavior tree should be running.
//!
//! The behavior tree itself only ever answers "what do I do right now
//! inside this mode" — mode switches (and the tree swap that comes with
//! them) live here, one level up, so a tree author never has to encode
//! "and also check if I should flee" into every leaf.

use crate::ecs::components::{AIBlackboard, AIMode, AIState, BehaviorTreeRuntime};
use crate::ecs::signature::Signature;
use crate::ecs::system::System;
use crate::ecs::World;

/// Health fraction at or below which a `Combat` entity flees rather than
/// keeps fighting.
const FLEE_HEALTH_FRACTION: f32 = 0.25;

/// Behavior-tree asset id selected for each mode, by convention
/// `"<mode>"` lowercase — callers name their tree assets to match.
fn tree_for_mode(mode: AIMode) -> &'static str {
    match mode {
        AIMode::Idle => "idle",
        AIMode::Patrol => "patrol",
        AIMode::Combat => "combat",
        AIMode::Flee => "flee",
        AIMode::Investigate => "investigate",
        AIMode::Dead => "dead",
    }
}

/// Picks the next mode given the current one and the entity's blackboard.
/// Checked in priority order: death beats everything, a fight-or-flight
/// check only applies while already in `Combat`, freshly visible targets
/// pull any living entity into `Combat`, a fresh noise pulls a non-combat
/// entity into `Investigate`, and an assigned patrol route starts an idle
/// entity patrolling. Anything else holds its current mode.
fn next_mode(current: AIMode, bb: &AIBlackboard) -> AIMode {
    if bb.health_fraction <= 0.0 {
        return AIMode::Dead;
    }
    if current == AIMode::Dead {
        return AIMode::Dead;
    }
    if current == AIMode::Combat && bb.health_fraction <= FLEE_HEALTH_FRACTION {
        return AIMode::Flee;
    }
    if bb.flags.target_visible {
        return AIMode::Combat;
    }
    if bb.flags.heard_noise && current != AIMode::Combat {
        return AIMode::Investigate;
    }
    if current == AIMode::Idle && !bb.patrol_points.is_empty() {
        return AIMode::Patrol;
    }
    current
}

pub struct AiStateTransitionSystem;

impl AiStateTransitionSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AiStateTransitionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for AiStateTransitionSystem {
    fn name(&self) -> &str {
        "AIStateTransitionSystem"
    }

    fn process(&mut self, world: &mut World, _dt: f32) {
        let state_bit = world.component_bit::<AIState>();
        let bb_bit = world.component_bit::<AIBlackboard>();
        let mut required = Signature::EMPTY;
        required.set(state_bit);
        required.set(bb_bit);

        for entity in world.entities_matching(required) {
            let current = world.get_component::<AIState>(entity).map(|s| s.mode).unwrap_or(AIMode::Idle);
            let Some(bb) = world.get_component::<AIBlackboard>(entity) else {
                continue;
            };
            let new_mode = next_mode(current, bb);

            // A one-shot noise cue is consumed the moment it's acted on
            // (or ignored because combat outranks it), never re-fired.
            if bb.flags.heard_noise {
                if let Some(bb_mut) = world.get_component_mut::<AIBlackboard>(entity) {
                    bb_mut.flags.heard_noise = false;
                }
            }

            if new_mode == current {
                continue;
            }

            if let Some(state) = world.get_component_mut::<AIState>(entity) {
                state.mode = new_mode;
            }
            if let Some(runtime) = world.get_component_mut::<BehaviorTreeRuntime>(entity) {
                runtime.switch_tree(tree_for_mode(new_mode));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bb_with(target_visible: bool, heard_noise: bool, health_fraction: f32) -> AIBlackboard {
        let mut bb = AIBlackboard::new();
        bb.flags.target_visible = target_visible;
        bb.flags.heard_noise = heard_noise;
        bb.health_fraction = health_fraction;
        bb
    }

    #[test]
    fn idle_transitions_to_patrol_once_a_route_is_assigned() {
        let mut bb = bb_with(false, false, 1.0);
        bb.set_patrol_points(vec![glam::Vec2::ZERO]);
        assert_eq!(next_mode(AIMode::Idle, &bb), AIMode::Patrol);
    }

    #[test]
    fn patrol_transitions_to_combat_when_target_becomes_visible() {
        let bb = bb_with(true, false, 1.0);
        assert_eq!(next_mode(AIMode::Patrol, &bb), AIMode::Combat);
    }

    #[test]
    fn combat_flees_below_the_health_threshold() {
        let bb = bb_with(true, false, 0.1);
        assert_eq!(next_mode(AIMode::Combat, &bb), AIMode::Flee);
    }

    #[test]
    fn low_health_outside_combat_does_not_trigger_flee() {
        let bb = bb_with(false, false, 0.1);
        assert_eq!(next_mode(AIMode::Patrol, &bb), AIMode::Patrol);
    }

    #[test]
    fn fresh_noise_pulls_a_non_combat_entity_into_investigate() {
        let bb = bb_with(false, true, 1.0);
        assert_eq!(next_mode(AIMode::Idle, &bb), AIMode::Investigate);
    }

    #[test]
    fn combat_outranks_a_fresh_noise() {
        let bb = bb_with(true, true, 1.0);
        assert_eq!(next_mode(AIMode::Combat, &bb), AIMode::Combat);
    }

    #[test]
    fn zero_health_always_wins() {
        let bb = bb_with(true, true, 0.0);
        assert_eq!(next_mode(AIMode::Combat, &bb), AIMode::Dead);
    }

    #[test]
    fn dead_never_leaves_dead() {
        let bb = bb_with(true, true, 1.0);
        assert_eq!(next_mode(AIMode::Dead, &bb), AIMode::Dead);
    }

    #[test]
    fn system_switches_the_behavior_tree_asset_on_mode_change() {
        let mut world = World::new();
        let e = world.spawn();
        world.add_component(e, AIState::default()).unwrap();
        let mut bb = AIBlackboard::new();
        bb.set_patrol_points(vec![glam::Vec2::ZERO]);
        world.add_component(e, bb).unwrap();
        world.add_component(e, BehaviorTreeRuntime::new("idle", 10.0)).unwrap();

        let mut system = AiStateTransitionSystem::new();
        system.process(&mut world, 1.0 / 60.0);

        assert_eq!(world.get_component::<AIState>(e).unwrap().mode, AIMode::Patrol);
        assert_eq!(world.get_component::<BehaviorTreeRuntime>(e).unwrap().tree_asset_id, "patrol");
    }
}
