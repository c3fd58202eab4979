//! The in-game menu overlay's state machine (§4.3.7): `Hidden`, `Shown`,
//! `Closing`. Esc toggles `Hidden <-> Shown`; `Shown` gates gameplay input
//! (see [`crate::input`]) while the menu keeps drawing every frame in the UI
//! pass regardless of state.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ecs::system::System;
use crate::ecs::World;
use crate::input::InputState;
use winit::keyboard::KeyCode;

/// How long the `Closing` transition animation plays before fully hiding.
const CLOSE_DURATION: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Hidden,
    Shown,
    Closing,
}

/// Shared menu state, threaded by `Rc<RefCell<_>>` into both the system that
/// ticks it and anything that needs to gate on it (input routing, HUD
/// drawing) — the same pattern used for the nav grid and event queue
/// handles elsewhere in the AI pipeline.
#[derive(Debug, Clone, Copy)]
pub struct MenuController {
    state: MenuState,
    close_timer: f32,
}

impl Default for MenuController {
    fn default() -> Self {
        Self { state: MenuState::Hidden, close_timer: 0.0 }
    }
}

impl MenuController {
    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Esc toggles Hidden<->Shown; pressing it while Closing snaps straight
    /// back to Shown rather than waiting out the close animation.
    pub fn toggle(&mut self) {
        self.state = match self.state {
            MenuState::Hidden => MenuState::Shown,
            MenuState::Shown => {
                self.close_timer = CLOSE_DURATION;
                MenuState::Closing
            }
            MenuState::Closing => MenuState::Shown,
        };
    }

    pub fn tick(&mut self, dt: f32) {
        if self.state == MenuState::Closing {
            self.close_timer -= dt;
            if self.close_timer <= 0.0 {
                self.state = MenuState::Hidden;
                self.close_timer = 0.0;
            }
        }
    }

    /// Gameplay input (movement, actions) is suppressed only while fully
    /// `Shown` — `Closing` is already on its way out and shouldn't eat the
    /// player's first post-menu input.
    pub fn is_blocking_gameplay(&self) -> bool {
        self.state == MenuState::Shown
    }
}

pub struct MenuSystem {
    menu: Rc<RefCell<MenuController>>,
    input: Rc<RefCell<InputState>>,
}

impl MenuSystem {
    pub fn new(menu: Rc<RefCell<MenuController>>, input: Rc<RefCell<InputState>>) -> Self {
        Self { menu, input }
    }
}

impl System for MenuSystem {
    fn name(&self) -> &str {
        "MenuSystem"
    }

    fn process(&mut self, _world: &mut World, dt: f32) {
        let escape_pressed = self.input.borrow().is_key_pressed(KeyCode::Escape);
        let mut menu = self.menu.borrow_mut();
        if escape_pressed {
            menu.toggle();
        }
        menu.tick(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_shows_then_starts_closing_the_menu() {
        let mut menu = MenuController::default();
        menu.toggle();
        assert_eq!(menu.state(), MenuState::Shown);
        menu.toggle();
        assert_eq!(menu.state(), MenuState::Closing);
    }

    #[test]
    fn closing_settles_to_hidden_after_its_duration() {
        let mut menu = MenuController::default();
        menu.toggle();
        menu.toggle();
        menu.tick(CLOSE_DURATION + 0.01);
        assert_eq!(menu.state(), MenuState::Hidden);
    }

    #[test]
    fn only_shown_blocks_gameplay_not_closing_or_hidden() {
        let mut menu = MenuController::default();
        assert!(!menu.is_blocking_gameplay());
        menu.toggle();
        assert!(menu.is_blocking_gameplay());
        menu.toggle();
        assert!(!menu.is_blocking_gameplay());
    }

    #[test]
    fn pressing_escape_again_mid_close_reopens_the_menu() {
        let mut menu = MenuController::default();
        menu.toggle();
        menu.toggle();
        menu.toggle();
        assert_eq!(menu.state(), MenuState::Shown);
    }

    #[test]
    fn system_toggles_the_shared_controller_on_an_escape_keypress() {
        let mut world = World::new();
        let menu = Rc::new(RefCell::new(MenuController::default()));
        let input = Rc::new(RefCell::new(InputState::new()));
        input.borrow_mut().keys_held.insert(KeyCode::Escape);
        input.borrow_mut().keys_pressed.insert(KeyCode::Escape);

        let mut system = MenuSystem::new(menu.clone(), input);
        system.process(&mut world, 1.0 / 60.0);

        assert_eq!(menu.borrow().state(), MenuState::Shown);
    }
}
