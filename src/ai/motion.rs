//! Stage 5 of the AI pipeline: turns a [`MoveIntent`] goal into an actual
//! [`Movement`] step, pathing through the navigation grid when one is
//! loaded and falling back to a straight line toward the goal otherwise.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::content::navgrid::NavigationMap;
use crate::ecs::components::{Movement, MoveIntent, PhysicsBody, Position};
use crate::ecs::signature::Signature;
use crate::ecs::system::System;
use crate::ecs::World;
use crate::pathfinding::prelude::astar_next_step;

/// Distance, in world units, within which a goal counts as reached and the
/// intent is cleared.
const ARRIVAL_RADIUS: f32 = 4.0;

const MAX_ASTAR_ITERATIONS: usize = 2048;

pub struct AiMotionSystem {
    nav: Rc<RefCell<Option<NavigationMap>>>,
}

impl AiMotionSystem {
    pub fn new(nav: Rc<RefCell<Option<NavigationMap>>>) -> Self {
        Self { nav }
    }

    /// Direction (not necessarily normalized) to step toward `goal` this
    /// frame: the next A* waypoint if a nav grid is loaded and a path
    /// exists, otherwise a straight line.
    fn step_toward(&self, from: Vec2, goal: Vec2) -> Vec2 {
        let nav_ref = self.nav.borrow();
        if let Some(nav) = nav_ref.as_ref() {
            let start = nav.world_to_tile(from.x, from.y);
            let end = nav.world_to_tile(goal.x, goal.y);
            if let Some(next) = astar_next_step(
                start,
                end,
                nav.width as i32,
                nav.height as i32,
                |x, y| nav.is_walkable(x, y),
                MAX_ASTAR_ITERATIONS,
            ) {
                let (wx, wy) = nav.tile_to_world(next.0, next.1);
                return Vec2::new(wx, wy) - from;
            }
        }
        goal - from
    }
}

impl System for AiMotionSystem {
    fn name(&self) -> &str {
        "AIMotionSystem"
    }

    fn process(&mut self, world: &mut World, _dt: f32) {
        let pos_bit = world.component_bit::<Position>();
        let intent_bit = world.component_bit::<MoveIntent>();
        let body_bit = world.component_bit::<PhysicsBody>();
        let mut required = Signature::EMPTY;
        required.set(pos_bit);
        required.set(intent_bit);
        required.set(body_bit);

        for entity in world.entities_matching(required) {
            let Some(pos) = world.get_component::<Position>(entity).copied() else {
                continue;
            };
            let Some(intent) = world.get_component::<MoveIntent>(entity).copied() else {
                continue;
            };
            let Some(body) = world.get_component::<PhysicsBody>(entity).copied() else {
                continue;
            };

            let Some(goal) = intent.goal else {
                if let Some(movement) = world.get_component_mut::<Movement>(entity) {
                    movement.dx = 0.0;
                    movement.dy = 0.0;
                }
                continue;
            };

            let from = Vec2::new(pos.x, pos.y);
            if from.distance(goal) <= ARRIVAL_RADIUS {
                if let Some(mi) = world.get_component_mut::<MoveIntent>(entity) {
                    mi.goal = None;
                }
                if let Some(movement) = world.get_component_mut::<Movement>(entity) {
                    movement.dx = 0.0;
                    movement.dy = 0.0;
                }
                continue;
            }

            let step = self.step_toward(from, goal);
            let velocity = if step.length_squared() > f32::EPSILON {
                step.normalize() * body.speed
            } else {
                Vec2::ZERO
            };

            let movement = Movement { dx: velocity.x, dy: velocity.y };
            if world.has_component::<Movement>(entity) {
                if let Some(existing) = world.get_component_mut::<Movement>(entity) {
                    *existing = movement;
                }
            } else {
                let _ = world.add_component(entity, movement);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::RenderLayer;

    fn spawn_mover(world: &mut World, goal: Option<Vec2>, speed: f32) -> crate::ecs::Entity {
        let e = world.spawn();
        world.add_component(e, Position { x: 0.0, y: 0.0, z: RenderLayer::Characters }).unwrap();
        world.add_component(e, MoveIntent { goal, flags: Default::default() }).unwrap();
        world.add_component(e, PhysicsBody { mass: 1.0, speed }).unwrap();
        e
    }

    #[test]
    fn moves_in_a_straight_line_without_a_nav_grid() {
        let mut world = World::new();
        let nav = Rc::new(RefCell::new(None));
        let e = spawn_mover(&mut world, Some(Vec2::new(100.0, 0.0)), 10.0);

        let mut system = AiMotionSystem::new(nav);
        system.process(&mut world, 1.0 / 60.0);

        let movement = world.get_component::<Movement>(e).unwrap();
        assert!(movement.dx > 0.0);
        assert_eq!(movement.dy, 0.0);
    }

    #[test]
    fn clears_the_intent_and_zeroes_movement_on_arrival() {
        let mut world = World::new();
        let nav = Rc::new(RefCell::new(None));
        let e = spawn_mover(&mut world, Some(Vec2::new(1.0, 0.0)), 10.0);

        let mut system = AiMotionSystem::new(nav);
        system.process(&mut world, 1.0 / 60.0);

        assert!(world.get_component::<MoveIntent>(e).unwrap().goal.is_none());
        let movement = world.get_component::<Movement>(e).unwrap();
        assert_eq!(movement.dx, 0.0);
        assert_eq!(movement.dy, 0.0);
    }

    #[test]
    fn an_absent_goal_zeroes_any_existing_movement() {
        let mut world = World::new();
        let nav = Rc::new(RefCell::new(None));
        let e = spawn_mover(&mut world, None, 10.0);
        world.add_component(e, Movement { dx: 5.0, dy: 5.0 }).unwrap();

        let mut system = AiMotionSystem::new(nav);
        system.process(&mut world, 1.0 / 60.0);

        let movement = world.get_component::<Movement>(e).unwrap();
        assert_eq!(movement.dx, 0.0);
        assert_eq!(movement.dy, 0.0);
    }
}
