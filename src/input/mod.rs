use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;
use std::collections::{HashSet, HashMap};

use glam::Vec2;
pub use winit::keyboard::KeyCode;
pub use winit::event::MouseButton;

use crate::ecs::components::{ActionFlags, Controller, PlayerBinding, PlayerController};
use crate::ecs::signature::Signature;
use crate::ecs::system::System;
use crate::ecs::World;
use crate::render::menu::MenuController;

/// Represents a raw input source that can be bound to an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Key(KeyCode),
    Mouse(MouseButton),
}

/// Raw hardware state for a single frame.
#[derive(Debug, Default)]
pub struct InputState {
    pub keys_held: HashSet<KeyCode>,
    pub keys_pressed: HashSet<KeyCode>,
    pub keys_released: HashSet<KeyCode>,
    
    pub mouse_pos: [f32; 2],
    pub mouse_wheel: f32,
    pub mouse_held: HashSet<MouseButton>,
    pub mouse_pressed: HashSet<MouseButton>,
    pub mouse_released: HashSet<MouseButton>,
    
    pub chars_typed: Vec<char>,
    /// Set to true if a UI element has consumed keyboard input this frame.
    pub key_consumed: bool,
    /// Set to true if a UI element has consumed mouse input this frame.
    pub mouse_consumed: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_frame_state(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_pressed.clear();
        self.mouse_released.clear();
        self.chars_typed.clear();
        self.mouse_wheel = 0.0;
        self.key_consumed = false;
        self.mouse_consumed = false;
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool { self.keys_held.contains(&key) }
    pub fn is_key_pressed(&self, key: KeyCode) -> bool { self.keys_pressed.contains(&key) }
    pub fn is_key_released(&self, key: KeyCode) -> bool { self.keys_released.contains(&key) }

    pub fn is_mouse_held(&self, button: MouseButton) -> bool { self.mouse_held.contains(&button) }
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool { self.mouse_pressed.contains(&button) }
    pub fn is_mouse_released(&self, button: MouseButton) -> bool { self.mouse_released.contains(&button) }

    /// Returns true if the mouse is currently within the given pixel bounds.
    pub fn is_mouse_over(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        let [mx, my] = self.mouse_pos;
        mx >= x && mx < x + w && my >= y && my < y + h
    }

    /// Returns true if the mouse was clicked (pressed) within the given bounds this frame.
    pub fn was_clicked(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        self.is_mouse_pressed(MouseButton::Left) && self.is_mouse_over(x, y, w, h)
    }
}

/// Maps logical actions (defined by the game) to one or more physical inputs.
#[derive(Debug, Clone)]
pub struct ActionMap<A: Hash + Eq + Copy> {
    bindings: HashMap<A, Vec<InputSource>>,
}

impl<A: Hash + Eq + Copy> ActionMap<A> {
    pub fn new() -> Self {
        Self { bindings: HashMap::new() }
    }

    pub fn bind(&mut self, action: A, source: InputSource) {
        self.bindings.entry(action).or_insert_with(Vec::new).push(source);
    }

    /// Returns true if the action was triggered this frame (pressed).
    pub fn is_pressed(&self, action: A, input: &InputState) -> bool {
        self.bindings.get(&action).map_or(false, |sources| {
            sources.iter().any(|s| match s {
                InputSource::Key(k) => !input.key_consumed && input.is_key_pressed(*k),
                InputSource::Mouse(b) => !input.mouse_consumed && input.is_mouse_pressed(*b),
            })
        })
    }

    /// Returns true if the action is currently being held.
    ///
    /// `key_consumed` does NOT suppress held queries — a focused text field blocks
    /// new presses but should not stop ongoing held movement or camera keys.
    pub fn is_held(&self, action: A, input: &InputState) -> bool {
        self.bindings.get(&action).map_or(false, |sources| {
            sources.iter().any(|s| match s {
                InputSource::Key(k) => input.is_key_held(*k),
                InputSource::Mouse(b) => input.is_mouse_held(*b),
            })
        })
    }

    /// Returns true if any bound source was released this frame.
    ///
    /// Like `is_held`, this does NOT check `key_consumed` — release events
    /// should always be observable regardless of UI focus state.
    pub fn is_released(&self, action: A, input: &InputState) -> bool {
        self.bindings.get(&action).map_or(false, |sources| {
            sources.iter().any(|s| match s {
                InputSource::Key(k) => input.is_key_released(*k),
                InputSource::Mouse(b) => input.is_mouse_released(*b),
            })
        })
    }
}

impl<A: Hash + Eq + Copy> Default for ActionMap<A> {
    fn default() -> Self { Self::new() }
}

/// Highest supported `player_index` + 1 (§4.5: "up to 8 players").
pub const MAX_PLAYERS: u32 = 8;

/// The `controller_id` reserved for the keyboard, never assigned to a
/// hot-plugged device.
pub const KEYBOARD_CONTROLLER_ID: i32 = -1;

/// Owns the `playerIndex -> controllerId` binding table and which
/// controller ids are currently connected. A disconnect does not clear the
/// binding — the player keeps their seat and regains input the moment the
/// same id reconnects, which is what makes "hot-plug" and "re-bind on
/// reconnect" the same code path.
#[derive(Debug, Default)]
pub struct InputRouter {
    bindings: HashMap<u32, i32>,
    connected: HashSet<i32>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `player_index` to `controller_id`, replacing any existing
    /// binding for that seat. `player_index` beyond [`MAX_PLAYERS`] is
    /// rejected rather than silently accepted.
    pub fn bind(&mut self, player_index: u32, controller_id: i32) -> bool {
        if player_index >= MAX_PLAYERS {
            return false;
        }
        self.bindings.insert(player_index, controller_id);
        true
    }

    pub fn unbind(&mut self, player_index: u32) {
        self.bindings.remove(&player_index);
    }

    pub fn controller_of(&self, player_index: u32) -> Option<i32> {
        self.bindings.get(&player_index).copied()
    }

    /// Hot-plug connect event. The keyboard is always considered connected
    /// and never needs to be reported here.
    pub fn on_connected(&mut self, controller_id: i32) {
        self.connected.insert(controller_id);
    }

    /// Hot-plug disconnect event. Bindings referencing `controller_id`
    /// survive so the seat re-binds automatically on reconnect.
    pub fn on_disconnected(&mut self, controller_id: i32) {
        self.connected.remove(&controller_id);
    }

    pub fn is_connected(&self, controller_id: i32) -> bool {
        controller_id == KEYBOARD_CONTROLLER_ID || self.connected.contains(&controller_id)
    }
}

/// Reads the keyboard's WASD/arrow cluster as a normalized movement
/// direction, ignoring it entirely while a UI element has consumed the
/// keyboard this frame.
fn keyboard_intent(input: &InputState) -> (Vec2, ActionFlags) {
    if input.key_consumed {
        return (Vec2::ZERO, ActionFlags::default());
    }
    let mut dir = Vec2::ZERO;
    if input.is_key_held(KeyCode::KeyW) || input.is_key_held(KeyCode::ArrowUp) {
        dir.y -= 1.0;
    }
    if input.is_key_held(KeyCode::KeyS) || input.is_key_held(KeyCode::ArrowDown) {
        dir.y += 1.0;
    }
    if input.is_key_held(KeyCode::KeyA) || input.is_key_held(KeyCode::ArrowLeft) {
        dir.x -= 1.0;
    }
    if input.is_key_held(KeyCode::KeyD) || input.is_key_held(KeyCode::ArrowRight) {
        dir.x += 1.0;
    }
    if dir != Vec2::ZERO {
        dir = dir.normalize();
    }
    let actions = ActionFlags {
        attack: input.is_key_pressed(KeyCode::Space),
        interact: input.is_key_pressed(KeyCode::KeyE),
        menu_toggle: input.is_key_pressed(KeyCode::Escape),
    };
    (dir, actions)
}

/// Reads a hot-plugged controller's first two axes as a joystick direction
/// and its first three held buttons as attack/interact/menu, mirroring
/// [`keyboard_intent`]'s field order.
fn controller_intent(controller: &Controller) -> (Vec2, ActionFlags) {
    let x = controller.axes.first().copied().unwrap_or(0.0);
    let y = controller.axes.get(1).copied().unwrap_or(0.0);
    let dir = Vec2::new(x, y);
    let dir = if dir.length() > 1.0 { dir.normalize() } else { dir };
    let actions = ActionFlags {
        attack: controller.buttons_held.first().copied().unwrap_or(false),
        interact: controller.buttons_held.get(1).copied().unwrap_or(false),
        menu_toggle: controller.buttons_held.get(2).copied().unwrap_or(false),
    };
    (dir, actions)
}

/// `SystemStage::PlayerControl`: for every entity carrying a [`PlayerBinding`],
/// translates that player's raw input (keyboard, or a hot-plugged
/// [`Controller`] component) into the gameplay-facing [`PlayerController`]
/// intent. Suppressed wholesale while the menu is [`MenuController::is_blocking_gameplay`]
/// — movement clears and actions go unset, per §4.5's gating rule.
pub struct PlayerControlSystem {
    input: Rc<RefCell<InputState>>,
    menu: Rc<RefCell<MenuController>>,
    router: Rc<RefCell<InputRouter>>,
}

impl PlayerControlSystem {
    pub fn new(
        input: Rc<RefCell<InputState>>,
        menu: Rc<RefCell<MenuController>>,
        router: Rc<RefCell<InputRouter>>,
    ) -> Self {
        Self { input, menu, router }
    }
}

impl System for PlayerControlSystem {
    fn name(&self) -> &str {
        "PlayerControlSystem"
    }

    fn process(&mut self, world: &mut World, _dt: f32) {
        let binding_bit = world.component_bit::<PlayerBinding>();
        let intent_bit = world.component_bit::<PlayerController>();
        let mut required = Signature::EMPTY;
        required.set(binding_bit);
        required.set(intent_bit);
        let players = world.entities_matching(required);
        if players.is_empty() {
            return;
        }

        let blocked = self.menu.borrow().is_blocking_gameplay();
        let input = self.input.borrow();
        let router = self.router.borrow();

        for entity in players {
            if blocked {
                if let Some(intent) = world.get_component_mut::<PlayerController>(entity) {
                    intent.joy_dir = Vec2::ZERO;
                    intent.actions = ActionFlags::default();
                }
                continue;
            }

            let Some(binding) = world.get_component::<PlayerBinding>(entity).copied() else {
                continue;
            };

            let (joy_dir, actions) = if binding.controller_id == KEYBOARD_CONTROLLER_ID {
                keyboard_intent(&input)
            } else if router.is_connected(binding.controller_id) {
                match world.get_component::<Controller>(entity) {
                    Some(controller) if controller.connected => controller_intent(controller),
                    _ => (Vec2::ZERO, ActionFlags::default()),
                }
            } else {
                (Vec2::ZERO, ActionFlags::default())
            };

            if let Some(intent) = world.get_component_mut::<PlayerController>(entity) {
                intent.joy_dir = joy_dir;
                intent.actions = actions;
            }
        }
    }
}

#[cfg(test)]
mod router_tests {
    use super::*;

    #[test]
    fn binding_beyond_max_players_is_rejected() {
        let mut router = InputRouter::new();
        assert!(!router.bind(MAX_PLAYERS, KEYBOARD_CONTROLLER_ID));
        assert_eq!(router.controller_of(MAX_PLAYERS), None);
    }

    #[test]
    fn disconnect_keeps_the_binding_for_reconnect() {
        let mut router = InputRouter::new();
        router.bind(0, 3);
        router.on_connected(3);
        assert!(router.is_connected(3));

        router.on_disconnected(3);
        assert!(!router.is_connected(3));
        assert_eq!(router.controller_of(0), Some(3));

        router.on_connected(3);
        assert!(router.is_connected(3));
    }

    #[test]
    fn keyboard_is_always_connected() {
        let router = InputRouter::new();
        assert!(router.is_connected(KEYBOARD_CONTROLLER_ID));
    }

    #[test]
    fn rebinding_a_seat_overwrites_the_previous_controller() {
        let mut router = InputRouter::new();
        router.bind(0, KEYBOARD_CONTROLLER_ID);
        router.bind(0, 1);
        assert_eq!(router.controller_of(0), Some(1));
    }
}

#[cfg(test)]
mod player_control_tests {
    use super::*;
    use crate::ecs::components::{EntityKind, Identity};

    fn spawn_player(world: &mut World, controller_id: i32) -> crate::ecs::Entity {
        let entity = world.spawn();
        world
            .add_component(entity, Identity { name: "p1".into(), tag: String::new(), kind: EntityKind::Player })
            .unwrap();
        world
            .add_component(entity, PlayerBinding { player_index: 0, controller_id })
            .unwrap();
        world.add_component(entity, PlayerController::default()).unwrap();
        entity
    }

    #[test]
    fn keyboard_bound_player_moves_from_held_wasd() {
        let mut world = World::new();
        let player = spawn_player(&mut world, KEYBOARD_CONTROLLER_ID);

        let input = Rc::new(RefCell::new(InputState::new()));
        input.borrow_mut().keys_held.insert(KeyCode::KeyD);
        let menu = Rc::new(RefCell::new(MenuController::default()));
        let router = Rc::new(RefCell::new(InputRouter::new()));

        let mut system = PlayerControlSystem::new(input, menu, router);
        system.process(&mut world, 1.0 / 60.0);

        let intent = world.get_component::<PlayerController>(player).unwrap();
        assert!(intent.joy_dir.x > 0.0);
    }

    #[test]
    fn menu_shown_clears_movement_and_actions() {
        let mut world = World::new();
        let player = spawn_player(&mut world, KEYBOARD_CONTROLLER_ID);
        world
            .get_component_mut::<PlayerController>(player)
            .unwrap()
            .joy_dir = Vec2::new(1.0, 0.0);

        let input = Rc::new(RefCell::new(InputState::new()));
        input.borrow_mut().keys_held.insert(KeyCode::KeyD);
        let menu = Rc::new(RefCell::new(MenuController::default()));
        menu.borrow_mut().toggle();
        let router = Rc::new(RefCell::new(InputRouter::new()));

        let mut system = PlayerControlSystem::new(input, menu, router);
        system.process(&mut world, 1.0 / 60.0);

        let intent = world.get_component::<PlayerController>(player).unwrap();
        assert_eq!(intent.joy_dir, Vec2::ZERO);
        assert_eq!(intent.actions, ActionFlags::default());
    }

    #[test]
    fn disconnected_controller_yields_a_neutral_intent() {
        let mut world = World::new();
        let player = spawn_player(&mut world, 2);
        world
            .add_component(
                player,
                Controller { connected: true, axes: vec![1.0, 0.0], buttons_held: vec![] },
            )
            .unwrap();

        let input = Rc::new(RefCell::new(InputState::new()));
        let menu = Rc::new(RefCell::new(MenuController::default()));
        let router = Rc::new(RefCell::new(InputRouter::new())); // controller 2 never connected

        let mut system = PlayerControlSystem::new(input, menu, router);
        system.process(&mut world, 1.0 / 60.0);

        let intent = world.get_component::<PlayerController>(player).unwrap();
        assert_eq!(intent.joy_dir, Vec2::ZERO);
    }

    #[test]
    fn connected_controller_drives_joy_dir_from_its_axes() {
        let mut world = World::new();
        let player = spawn_player(&mut world, 2);
        world
            .add_component(
                player,
                Controller { connected: true, axes: vec![0.0, -1.0], buttons_held: vec![true] },
            )
            .unwrap();

        let input = Rc::new(RefCell::new(InputState::new()));
        let menu = Rc::new(RefCell::new(MenuController::default()));
        let router = Rc::new(RefCell::new(InputRouter::new()));
        router.borrow_mut().bind(0, 2);
        router.borrow_mut().on_connected(2);

        let mut system = PlayerControlSystem::new(input, menu, router);
        system.process(&mut world, 1.0 / 60.0);

        let intent = world.get_component::<PlayerController>(player).unwrap();
        assert_eq!(intent.joy_dir, Vec2::new(0.0, -1.0));
        assert!(intent.actions.attack);
    }
}
