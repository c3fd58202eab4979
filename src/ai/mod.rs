//! Behavior-tree AI runtime: stimuli intake, time-sliced perception, HFSM
//! mode transitions, the BT interpreter, and intent-to-motion translation.
//!
//! Registers five systems against the canonical stage order; callers never
//! invoke them directly, only `World::process_systems`.

pub mod behavior_tree;
pub mod hfsm;
pub mod motion;
pub mod perception;

use std::collections::HashMap;

use crate::assets::behavior_tree::BehaviorTreeAsset;
use crate::content::navgrid::NavigationMap;
use crate::ecs::system::SystemStage;
use crate::ecs::World;
use crate::events::{EventConsumeSystem, EventQueue};

use behavior_tree::BehaviorTreeSystem;
use hfsm::AiStateTransitionSystem;
use motion::AiMotionSystem;
use perception::{AiPerceptionSystem, AiStimuliSystem};

/// Wires the event-queue swap and the five AI systems into `world` in one
/// call. The queue and nav map are shared, reference-counted handles so
/// later map loads or event sources can be swapped without re-registering
/// systems.
pub fn register_ai_systems(
    world: &mut World,
    events: std::rc::Rc<std::cell::RefCell<EventQueue>>,
    nav: std::rc::Rc<std::cell::RefCell<Option<NavigationMap>>>,
    trees: std::rc::Rc<HashMap<String, BehaviorTreeAsset>>,
) {
    world.register_system(SystemStage::EventConsume, Box::new(EventConsumeSystem::new(events.clone())));
    world.register_system(SystemStage::AiStimuli, Box::new(AiStimuliSystem::new(events)));
    world.register_system(SystemStage::AiPerception, Box::new(AiPerceptionSystem::new()));
    world.register_system(SystemStage::AiStateTransition, Box::new(AiStateTransitionSystem::new()));
    world.register_system(SystemStage::BehaviorTree, Box::new(BehaviorTreeSystem::new(trees)));
    world.register_system(SystemStage::AiMotion, Box::new(AiMotionSystem::new(nav)));
}
