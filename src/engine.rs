//! Fixed-timestep game loop: owns the OS window, the GPU [`Renderer`], and
//! the simulation [`World`], and drives the per-tick order every other
//! module plugs into — event drain, then systems in [`SystemStage`] order,
//! then a render pass built from whatever `RenderWorld`/`RenderUi` produced.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::ai::register_ai_systems;
use crate::assets::bank::AnimationBank;
use crate::assets::behavior_tree::{parse_behavior_tree, BehaviorTreeAsset};
use crate::assets::blueprint::{parse_blueprint, Blueprint, BlueprintType};
use crate::assets::DataStore;
use crate::config::EngineConfig;
use crate::content::navgrid::NavigationMap;
use crate::content::ContentLoader;
use crate::ecs::components::{EntityKind, Identity, PlayerBinding, PlayerController};
use crate::ecs::system::{System, SystemStage};
use crate::ecs::{Entity, World};
use crate::events::EventQueue;
use crate::input::{InputRouter, InputState, PlayerControlSystem, KEYBOARD_CONTROLLER_ID};
use crate::render::gpu::camera::uniform_for;
use crate::render::gpu::build_tile_vertices;
use crate::render::menu::{MenuController, MenuSystem};
use crate::render::viewport::setup_split_screen;
use crate::render::{CameraSystem, GridDebugSystem, RenderOutput, RenderUiSystem, RenderWorldSystem};
use crate::renderer::utils::letterbox_viewport;
use crate::renderer::{Renderer, ViewportDraw};
use crate::scene::{Scene, SceneAction, SceneContext, SceneStack};
use crate::window::WindowConfig;

/// The only scene this loop ever pushes at startup: drives `World::process_systems`
/// every tick and resets the world when the stack tears it down. Map-to-map
/// transitions or a title/gameplay split would push further `Scene`s on top
/// rather than growing this one.
struct GameplayScene;

impl Scene for GameplayScene {
    fn on_exit(&mut self, ctx: &mut SceneContext) {
        ctx.world.reset();
    }

    fn update(&mut self, ctx: &mut SceneContext, dt: f32) -> SceneAction {
        ctx.world.process_systems(dt);
        SceneAction::None
    }
}

/// Scans `dir` for `*.json` assets, splitting behavior trees (keyed by the
/// tree's own `name`, the id [`crate::ai::behavior_tree::BehaviorTreeSystem`]
/// looks runtime components up by) from every other blueprint kind. A
/// missing directory or an individual malformed file is logged and skipped
/// rather than aborting startup — the same "never abort" rule
/// [`EngineConfig::load_or_default`] follows for its own config file.
fn load_assets_dir(dir: &Path) -> (HashMap<String, Blueprint>, HashMap<String, BehaviorTreeAsset>) {
    let mut blueprints = HashMap::new();
    let mut trees = HashMap::new();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("no asset directory at {} ({e}), starting with no blueprints", dir.display());
            return (blueprints, trees);
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("could not read asset {}: {e}", path.display());
                continue;
            }
        };
        let blueprint = match parse_blueprint(&text) {
            Ok(b) => b,
            Err(e) => {
                log::warn!("malformed asset {}: {e}", path.display());
                continue;
            }
        };
        if blueprint.kind == BlueprintType::BehaviorTree {
            match parse_behavior_tree(&blueprint.name, &blueprint.data) {
                Ok(tree) => {
                    trees.insert(blueprint.name.clone(), tree);
                }
                Err(e) => log::warn!("malformed behavior tree {}: {e}", path.display()),
            }
        } else {
            blueprints.insert(blueprint.name.clone(), blueprint);
        }
    }

    (blueprints, trees)
}

/// Decodes every spritesheet PNG an `AnimationBank` blueprint references
/// into `store`, so the handles are cached (and decode failures logged
/// once) before the first frame needs them, rather than stalling on first
/// use. GPU upload into the shared atlas is out of scope here — `store`
/// only owns the decoded-pixels cache the rest of `DataStore` already
/// provides for textures loaded outside the startup atlas.
fn preload_animation_bank_textures(store: &mut DataStore, assets_dir: &Path, blueprints: &HashMap<String, Blueprint>) {
    for blueprint in blueprints.values() {
        if blueprint.kind != BlueprintType::AnimationBank {
            continue;
        }
        let bank: AnimationBank = match serde_json::from_value(blueprint.data.clone()) {
            Ok(bank) => bank,
            Err(e) => {
                log::warn!("malformed animation bank {}: {e}", blueprint.name);
                continue;
            }
        };
        for sheet in &bank.spritesheets {
            store.load_texture(assets_dir.join(&sheet.path));
        }
    }
}

/// Everything the fixed-timestep loop owns once the window exists:
/// simulation state, shared handles the registered systems hold, and the
/// GPU renderer.
pub struct GameLoop {
    world: World,
    renderer: Renderer,
    engine_config: EngineConfig,
    window_config: WindowConfig,

    nav: Rc<RefCell<Option<NavigationMap>>>,
    render_output: Rc<RefCell<RenderOutput>>,
    events: Rc<RefCell<EventQueue>>,
    input: Rc<RefCell<InputState>>,
    menu: Rc<RefCell<MenuController>>,
    router: Rc<RefCell<InputRouter>>,
    menu_system: MenuSystem,
    scene_stack: SceneStack,
    data_store: DataStore,

    viewports: Vec<Entity>,
    dt: f32,
    tick: u64,
}

impl GameLoop {
    /// Loads `engine.json`/config, the map at `map_path`, and every `.json`
    /// blueprint under `assets_dir`, wires the registered systems in
    /// [`SystemStage`] order, and binds the keyboard to the first
    /// [`EntityKind::Player`] entity the map spawns.
    pub fn new(
        renderer: Renderer,
        window_config: WindowConfig,
        engine_config: EngineConfig,
        map_path: &Path,
        assets_dir: &Path,
    ) -> Self {
        let (blueprints, trees) = load_assets_dir(assets_dir);

        let mut data_store = DataStore::new();
        preload_animation_bank_textures(&mut data_store, assets_dir, &blueprints);

        let mut loader = ContentLoader::new();
        let (mut world, nav, spawned) = match loader.load_world(map_path, &blueprints) {
            Ok((world, nav, spawned)) => (world, Some(nav), spawned),
            Err(e) => {
                log::warn!("failed to load map {}: {e}, starting with an empty world", map_path.display());
                (World::new(), None, Vec::new())
            }
        };

        let events = Rc::new(RefCell::new(EventQueue::new()));
        let nav = Rc::new(RefCell::new(nav));
        let trees = Rc::new(trees);
        register_ai_systems(&mut world, events.clone(), nav.clone(), trees);

        let input = Rc::new(RefCell::new(InputState::new()));
        let menu = Rc::new(RefCell::new(MenuController::default()));
        let router = Rc::new(RefCell::new(InputRouter::new()));

        world.register_system(
            SystemStage::PlayerControl,
            Box::new(PlayerControlSystem::new(input.clone(), menu.clone(), router.clone())),
        );
        world.register_system(SystemStage::Camera, Box::new(CameraSystem));

        let render_output = Rc::new(RefCell::new(RenderOutput::default()));
        let debug_enabled = Rc::new(RefCell::new(engine_config.debug_overlay));
        world.register_system(
            SystemStage::GridDebug,
            Box::new(GridDebugSystem::new(render_output.clone(), nav.clone(), debug_enabled)),
        );
        world.register_system(
            SystemStage::RenderWorld,
            Box::new(RenderWorldSystem::new(render_output.clone(), crate::content::tiled::Orientation::Orthogonal, 16.0)),
        );
        world.register_system(SystemStage::RenderUi, Box::new(RenderUiSystem::new(render_output.clone())));

        let menu_system = MenuSystem::new(menu.clone(), input.clone());

        if let Some(&player) = spawned.iter().find(|&&e| {
            world.get_component::<Identity>(e).map(|i| i.kind == EntityKind::Player).unwrap_or(false)
        }) {
            if !world.has_component::<PlayerBinding>(player) {
                let _ = world.add_component(player, PlayerBinding { player_index: 0, controller_id: KEYBOARD_CONTROLLER_ID });
                let _ = world.add_component(player, PlayerController::default());
            }
        }

        let players = match engine_config.layout {
            crate::config::LayoutConfig::SplitScreen { players } => players,
            crate::config::LayoutConfig::MultiWindow { players, .. } => players,
        };
        let viewports = setup_split_screen(&mut world, players.max(1), engine_config.render_width as f32, engine_config.render_height as f32);

        Self {
            world,
            renderer,
            engine_config,
            window_config,
            nav,
            render_output,
            events,
            input,
            menu,
            router,
            menu_system,
            scene_stack: SceneStack::new(Box::new(GameplayScene)),
            data_store,
            viewports,
            dt: 0.0,
            tick: 0,
        }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The active split-screen/multi-window viewport entities, in the order
    /// [`crate::render::viewport::setup_split_screen`] created them.
    pub fn viewports(&self) -> &[Entity] {
        &self.viewports
    }

    /// Hot-plug connect/disconnect notifications and rebinding a player's
    /// seat to a different controller id both go through here.
    pub fn input_router(&self) -> &Rc<RefCell<InputRouter>> {
        &self.router
    }

    /// Lets glue code outside the tick (map triggers, scripted events, the
    /// platform layer) push a gameplay event for `EventConsumeSystem` to
    /// drain on the next tick.
    pub fn events(&self) -> &Rc<RefCell<EventQueue>> {
        &self.events
    }

    /// Set once the scene stack has torn down its last scene (e.g. a menu
    /// action pushed [`crate::scene::SceneAction::Quit`]).
    pub fn quit_requested(&self) -> bool {
        self.scene_stack.quit_requested()
    }

    /// The decoded-texture/audio cache, preloaded with every `AnimationBank`
    /// spritesheet under the assets directory. Scripted events and trigger
    /// handlers reach through here for anything loaded after startup.
    pub fn data_store(&mut self) -> &mut DataStore {
        &mut self.data_store
    }

    fn step(&mut self, dt: f32) {
        self.dt = dt;
        self.tick += 1;
        // `Menu` has no `SystemStage` of its own — it gates `PlayerControl`
        // rather than sitting in the tick order, so it runs as a direct call.
        self.menu_system.process(&mut self.world, dt);

        let mut ctx = SceneContext {
            world: &mut self.world,
            events: self.events.clone(),
            menu: self.menu.clone(),
        };
        self.scene_stack.tick(&mut ctx, dt);
    }

    /// Builds one [`ViewportDraw`] per active [`crate::ecs::components::Viewport`],
    /// scaling its logical rect into the letterboxed physical play area. Only
    /// the viewport with `order == 0` receives the screen-space UI batch —
    /// duplicating the HUD across every split-screen pane is out of scope.
    fn build_viewport_draws(&self) -> Vec<ViewportDraw> {
        let letterbox = letterbox_viewport(&self.window_config);
        let sx = letterbox.width / self.engine_config.render_width as f32;
        let sy = letterbox.height / self.engine_config.render_height as f32;

        let output = self.render_output.borrow();
        let mut draws = Vec::with_capacity(output.world_batches.len());

        for (viewport_entity, items) in &output.world_batches {
            let Some(vp) = self.world.get_component::<crate::ecs::components::Viewport>(*viewport_entity) else {
                continue;
            };
            let scissor = (
                (letterbox.x + vp.rect.x * sx) as u32,
                (letterbox.y + vp.rect.y * sy) as u32,
                (vp.rect.w * sx) as u32,
                (vp.rect.h * sy) as u32,
            );

            let camera = vp
                .camera_entity
                .and_then(|e| self.world.get_component::<crate::ecs::components::Camera>(e))
                .map(|cam| uniform_for(&self.world, cam, vp.rect.w, vp.rect.h))
                .unwrap_or_else(|| {
                    uniform_for(&self.world, &crate::ecs::components::Camera::default(), vp.rect.w, vp.rect.h)
                });

            let world_verts = build_tile_vertices(items, &self.renderer.atlas);
            let ui_verts = if vp.order == 0 {
                build_tile_vertices(&output.ui_items, &self.renderer.atlas)
            } else {
                Vec::new()
            };

            draws.push(ViewportDraw { scissor, camera, world_verts, ui_verts });
        }

        draws
    }

    fn render(&mut self) {
        let draws = self.build_viewport_draws();
        match self.renderer.render(&draws, &[], &[]) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) => {
                let size = self.renderer.window.inner_size();
                self.renderer.resize(size);
            }
            Err(e) => log::error!("render error: {e}"),
        }
    }

    fn handle_resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.window_config.physical_width = size.width;
        self.window_config.physical_height = size.height;
        self.renderer.resize(size);
    }
}

/// Startup parameters for [`run`] — everything the winit [`ApplicationHandler`]
/// needs before a window exists to create the [`Renderer`] against.
pub struct GameLoopConfig {
    pub title: String,
    pub window_config: WindowConfig,
    pub engine_config: EngineConfig,
    pub map_path: PathBuf,
    pub assets_dir: PathBuf,
    pub atlas_png: &'static [u8],
    pub tile_w: u32,
    pub tile_h: u32,
}

/// Runs the fixed-timestep loop until the window is closed. Mirrors the
/// platform layer's `resumed`/`window_event` split: the renderer can only be
/// created once a real window handle exists, so `game` stays `None` until
/// `resumed` fires.
pub fn run(config: GameLoopConfig) {
    let event_loop = EventLoop::new().unwrap();
    let fixed_dt = 1.0 / config.engine_config.target_ups.max(1) as f32;
    let mut app = App { config, game: None, last_instant: None, accumulator: 0.0, fixed_dt };
    event_loop.run_app(&mut app).unwrap();
}

struct App {
    config: GameLoopConfig,
    game: Option<GameLoop>,
    last_instant: Option<Instant>,
    accumulator: f32,
    fixed_dt: f32,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title(&self.config.title)
                        .with_inner_size(winit::dpi::PhysicalSize::new(
                            self.config.window_config.physical_width,
                            self.config.window_config.physical_height,
                        )),
                )
                .unwrap(),
        );
        crate::window::apply_window_settings(&window, &self.config.window_config);

        let renderer = pollster::block_on(Renderer::new(
            window,
            self.config.atlas_png,
            self.config.tile_w,
            self.config.tile_h,
        ));

        self.game = Some(GameLoop::new(
            renderer,
            self.config.window_config.clone(),
            self.config.engine_config.clone(),
            &self.config.map_path,
            &self.config.assets_dir,
        ));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(game) = self.game.as_ref() {
            game.renderer.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(game) = self.game.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => game.handle_resize(size),

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed = match self.last_instant {
                    Some(prev) => now.duration_since(prev).as_secs_f32().min(0.25),
                    None => self.fixed_dt,
                };
                self.last_instant = Some(now);
                self.accumulator += elapsed;

                while self.accumulator >= self.fixed_dt {
                    game.step(self.fixed_dt);
                    self.accumulator -= self.fixed_dt;
                }

                if game.quit_requested() {
                    event_loop.exit();
                    return;
                }

                game.input.borrow_mut().clear_frame_state();
                game.render();
            }

            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(code), state, .. },
                ..
            } => {
                let mut input = game.input.borrow_mut();
                match state {
                    ElementState::Pressed => {
                        if input.keys_held.insert(code) {
                            input.keys_pressed.insert(code);
                        }
                    }
                    ElementState::Released => {
                        input.keys_held.remove(&code);
                        input.keys_released.insert(code);
                    }
                }
            }

            _ => {}
        }
    }
}
