//! Scene stack: push/pop/switch transitions layered on top of the fixed
//! per-tick `World` update that [`crate::engine`]'s `GameLoop` drives. A
//! scene owns no state the `World` doesn't already hold — it only decides
//! *which* world-level behavior runs this tick (gameplay vs. a modal
//! overlay) and when to transition to another one.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ecs::World;
use crate::events::EventQueue;
use crate::render::menu::MenuController;

/// Borrowed handles a [`Scene`] needs for one tick. Mirrors the shared
/// `Rc<RefCell<_>>` handoff the AI and render systems already use for the
/// event queue and menu controller.
pub struct SceneContext<'a> {
    pub world: &'a mut World,
    pub events: Rc<RefCell<EventQueue>>,
    pub menu: Rc<RefCell<MenuController>>,
}

pub enum SceneAction {
    None,
    Push(Box<dyn Scene>),
    Pop,
    Switch(Box<dyn Scene>),
    ReplaceAll(Box<dyn Scene>),
    Quit,
}

pub trait Scene {
    fn on_enter(&mut self, _ctx: &mut SceneContext) {}
    fn on_exit(&mut self, _ctx: &mut SceneContext) {}
    fn update(&mut self, ctx: &mut SceneContext, dt: f32) -> SceneAction;
    /// Whether the scene below this one in the stack should still update.
    /// A pause overlay returns `true`; a full-screen loading scene doesn't.
    fn is_transparent(&self) -> bool {
        false
    }
}

pub struct SceneStack {
    scenes: Vec<Box<dyn Scene>>,
    initialized: bool,
    quit_requested: bool,
}

impl SceneStack {
    pub fn new(initial: Box<dyn Scene>) -> Self {
        Self { scenes: vec![initial], initialized: false, quit_requested: false }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Runs every non-transparent scene from the top of the stack down to
    /// (and including) the first opaque one, in bottom-to-top order, so a
    /// paused gameplay scene underneath a transparent overlay still ticks.
    pub fn tick(&mut self, ctx: &mut SceneContext, dt: f32) {
        if !self.initialized {
            self.initialized = true;
            if let Some(scene) = self.scenes.first_mut() {
                scene.on_enter(ctx);
            }
        }

        let start = self.scenes.iter().rposition(|s| !s.is_transparent()).unwrap_or(0);
        for i in start..self.scenes.len() {
            let action = self.scenes[i].update(ctx, dt);
            // Only the topmost scene's action is honored per tick — a scene
            // further down the stack driving a transition out from under
            // the scene above it would leave that scene's `on_exit` unpaired.
            if i == self.scenes.len() - 1 {
                self.apply(ctx, action);
            }
        }
    }

    fn apply(&mut self, ctx: &mut SceneContext, action: SceneAction) {
        match action {
            SceneAction::None => {}
            SceneAction::Push(mut scene) => {
                scene.on_enter(ctx);
                self.scenes.push(scene);
            }
            SceneAction::Pop => {
                if let Some(mut top) = self.scenes.pop() {
                    top.on_exit(ctx);
                }
            }
            SceneAction::Switch(mut scene) => {
                if let Some(mut top) = self.scenes.pop() {
                    top.on_exit(ctx);
                }
                scene.on_enter(ctx);
                self.scenes.push(scene);
            }
            SceneAction::ReplaceAll(mut scene) => {
                while let Some(mut top) = self.scenes.pop() {
                    top.on_exit(ctx);
                }
                scene.on_enter(ctx);
                self.scenes.push(scene);
            }
            SceneAction::Quit => {
                self.quit_requested = true;
            }
        }
    }
}
