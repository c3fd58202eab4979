//! Stage 1–2 of the AI pipeline: stimuli intake and time-sliced vision.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::ecs::components::{AIBlackboard, AISenses, EntityKind, Identity, Position};
use crate::ecs::signature::Signature;
use crate::ecs::system::System;
use crate::ecs::World;
use crate::events::{DamageDealt, Domain, EventQueue, Noise};
use crate::geometry::line_of_sight;

/// Drains Gameplay-domain events from the queue's read buffer into every
/// blackboard-carrying entity. Runs first in the pipeline so perception and
/// the HFSM see this frame's stimuli immediately.
pub struct AiStimuliSystem {
    events: Rc<RefCell<EventQueue>>,
}

impl AiStimuliSystem {
    pub fn new(events: Rc<RefCell<EventQueue>>) -> Self {
        Self { events }
    }
}

impl System for AiStimuliSystem {
    fn name(&self) -> &str {
        "AIStimuliSystem"
    }

    fn process(&mut self, world: &mut World, _dt: f32) {
        let bb_bit = world.component_bit::<AIBlackboard>();
        let mut required = Signature::EMPTY;
        required.set(bb_bit);
        let listeners = world.entities_matching(required);
        if listeners.is_empty() {
            return;
        }

        let events = self.events.borrow();
        let mut noises = Vec::new();
        let mut damages = Vec::new();
        for event in events.read_domain(Domain::Gameplay) {
            if let Some(noise) = event.payload::<Noise>() {
                noises.push(*noise);
            } else if let Some(damage) = event.payload::<DamageDealt>() {
                damages.push(*damage);
            }
        }
        drop(events);

        if noises.is_empty() && damages.is_empty() {
            return;
        }

        for entity in listeners {
            if let Some(bb) = world.get_component_mut::<AIBlackboard>(entity) {
                for noise in &noises {
                    bb.noise_loc = Some(Vec2::new(noise.location.0, noise.location.1));
                    bb.flags.heard_noise = true;
                }
                for damage in &damages {
                    if damage.target == entity {
                        bb.damage_taken += damage.amount;
                    }
                }
            }
        }
    }
}

/// Runs per entity at that entity's own `perceptionHz`, tracked by a
/// per-entity fractional accumulator that fires on `1.0 / hz` and resets by
/// subtraction (not zeroing) to avoid drift across frames with uneven `dt`.
pub struct AiPerceptionSystem;

impl AiPerceptionSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AiPerceptionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for AiPerceptionSystem {
    fn name(&self) -> &str {
        "AIPerceptionSystem"
    }

    fn process(&mut self, world: &mut World, dt: f32) {
        let pos_bit = world.component_bit::<Position>();
        let senses_bit = world.component_bit::<AISenses>();
        let bb_bit = world.component_bit::<AIBlackboard>();
        let mut required = Signature::EMPTY;
        required.set(pos_bit);
        required.set(senses_bit);
        required.set(bb_bit);
        let perceivers = world.entities_matching(required);

        let mut due = Vec::new();
        for entity in &perceivers {
            let Some(senses) = world.get_component_mut::<AISenses>(*entity) else {
                continue;
            };
            senses.accumulator += dt;
            let period = 1.0 / senses.perception_hz.max(0.001);
            if senses.accumulator >= period {
                senses.accumulator -= period;
                due.push(*entity);
            }
        }
        if due.is_empty() {
            return;
        }

        let ident_bit = world.component_bit::<Identity>();
        let mut target_req = Signature::EMPTY;
        target_req.set(pos_bit);
        target_req.set(ident_bit);
        let candidates: Vec<_> = world
            .entities_matching(target_req)
            .into_iter()
            .filter(|e| {
                world
                    .get_component::<Identity>(*e)
                    .map(|i| i.kind == EntityKind::Player)
                    .unwrap_or(false)
            })
            .collect();

        for entity in due {
            let Some(self_pos) = world.get_component::<Position>(entity).copied() else {
                continue;
            };
            let Some(senses) = world.get_component::<AISenses>(entity).copied() else {
                continue;
            };

            let mut found = None;
            for candidate in &candidates {
                if *candidate == entity {
                    continue;
                }
                let Some(target_pos) = world.get_component::<Position>(*candidate) else {
                    continue;
                };
                let to_target = Vec2::new(target_pos.x - self_pos.x, target_pos.y - self_pos.y);
                if to_target.length() > senses.vision_range {
                    continue;
                }
                // Facing direction is approximated by the vector toward the
                // candidate itself when no heading component exists yet —
                // this keeps the cone test meaningful without requiring a
                // dedicated facing field every AI entity must carry.
                let angle = to_target.y.atan2(to_target.x).abs();
                if angle > senses.vision_cone {
                    continue;
                }
                let clear = line_of_sight(
                    self_pos.x as i32,
                    self_pos.y as i32,
                    target_pos.x as i32,
                    target_pos.y as i32,
                    |_, _| false,
                );
                if clear {
                    found = Some((*candidate, Vec2::new(target_pos.x, target_pos.y)));
                    break;
                }
            }

            if let Some(bb) = world.get_component_mut::<AIBlackboard>(entity) {
                match found {
                    Some((target, pos)) => {
                        bb.target_entity = Some(target);
                        bb.last_known_pos = Some(pos);
                        bb.flags.target_visible = true;
                    }
                    None => {
                        bb.flags.target_visible = false;
                    }
                }
            }
        }
    }
}
