//! Core component families.
//!
//! Every entity's behavior is a combination of these plain-data structs;
//! systems are matched to entities purely by which of these types are
//! present (see [`super::Signature`]). None of these types hold logic.

use crate::ecs::Entity;
use glam::Vec2;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Coarse entity classifier used by render filtering (`UIElement` is
/// excluded from the world pass) and by prefab instantiation (`Player`
/// triggers input-router/camera registration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Npc,
    Item,
    UiElement,
    Static,
    Collision,
}

#[derive(Debug, Clone)]
pub struct Identity {
    pub name: String,
    pub tag: String,
    pub kind: EntityKind,
}

// ---------------------------------------------------------------------------
// Spatial
// ---------------------------------------------------------------------------

/// Render layer bucket stored in [`Position::z`]. Lower draws first within
/// a depth sort that otherwise orders by world Y (orthogonal) or the
/// isometric diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum RenderLayer {
    Ground = 0,
    Objects = 1,
    Characters = 2,
    Flying = 3,
    Effects = 4,
    Ui = 5,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: RenderLayer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Movement {
    pub dx: f32,
    pub dy: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    /// World-space AABB for an entity at `pos`, anchored at its top-left.
    pub fn rect_at(self, pos: Position) -> (f32, f32, f32, f32) {
        (pos.x, pos.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    pub mass: f32,
    pub speed: f32,
}

// ---------------------------------------------------------------------------
// Visual
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
    pub diagonal: bool,
}

impl Flip {
    pub const NONE: Flip = Flip {
        horizontal: false,
        vertical: false,
        diagonal: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SrcRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone)]
pub struct VisualSprite {
    pub atlas: String,
    pub src: SrcRect,
    pub anchor: Vec2,
    pub flip: Flip,
}

#[derive(Debug, Clone)]
pub struct VisualAnimation {
    pub bank_id: String,
    pub sequence_name: String,
    pub frame: u32,
    pub timer: f32,
    /// Ad hoc per-instance sequence parameters (e.g. a speed multiplier
    /// threaded through `$paramName` substitution at instantiation time).
    pub param_map: Vec<(String, f32)>,
}

// ---------------------------------------------------------------------------
// Camera / Viewport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub zoom: f32,
    pub rotation: f32,
    pub target_entity: Option<Entity>,
    pub viewport_entity: Option<Entity>,
    /// Smooth-zoom target; [`crate::render::gpu::camera`]'s tick interpolates
    /// `zoom` toward this each frame.
    pub target_zoom: f32,
    pub shake_timer: f32,
    pub shake_intensity: f32,
    pub shake_offset: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            rotation: 0.0,
            target_entity: None,
            viewport_entity: None,
            target_zoom: 1.0,
            shake_timer: 0.0,
            shake_intensity: 0.0,
            shake_offset: Vec2::ZERO,
        }
    }
}

impl Camera {
    pub fn shake(&mut self, intensity: f32, duration: f32) {
        self.shake_intensity = intensity;
        self.shake_timer = duration;
    }

    pub fn tick(&mut self, dt: f32) {
        self.zoom += (self.target_zoom - self.zoom) * (dt * 8.0).min(1.0);
        if self.shake_timer > 0.0 {
            self.shake_timer = (self.shake_timer - dt).max(0.0);
            let t = self.shake_timer * 40.0;
            self.shake_offset = Vec2::new(t.sin(), (t * 1.3).cos()) * self.shake_intensity;
            if self.shake_timer == 0.0 {
                self.shake_offset = Vec2::ZERO;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub rect: Rect,
    pub player_index: i32,
    pub camera_entity: Option<Entity>,
    pub render_target_entity: Option<Entity>,
    pub order: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTargetKind {
    PrimaryWindow,
    SecondaryWindow,
    Offscreen,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderTarget {
    pub kind: RenderTargetKind,
    pub index: u32,
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// `controller_id == -1` denotes the keyboard; all other values index a
/// hot-plugged joystick/gamepad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerBinding {
    pub player_index: u32,
    pub controller_id: i32,
}

#[derive(Debug, Clone, Default)]
pub struct Controller {
    pub connected: bool,
    pub axes: Vec<f32>,
    pub buttons_held: Vec<bool>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerController {
    pub joy_dir: Vec2,
    pub actions: ActionFlags,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionFlags {
    pub attack: bool,
    pub interact: bool,
    pub menu_toggle: bool,
}

// ---------------------------------------------------------------------------
// AI
// ---------------------------------------------------------------------------

pub const MAX_PATROL_POINTS: usize = 8;

#[derive(Debug, Clone, Copy, Default)]
pub struct BlackboardFlags {
    pub target_visible: bool,
    pub heard_noise: bool,
}

#[derive(Debug, Clone)]
pub struct AIBlackboard {
    pub target_entity: Option<Entity>,
    pub last_known_pos: Option<Vec2>,
    pub patrol_points: Vec<Vec2>,
    pub patrol_index: usize,
    pub noise_loc: Option<Vec2>,
    pub damage_taken: f32,
    pub health_fraction: f32,
    pub flags: BlackboardFlags,
}

impl AIBlackboard {
    pub fn new() -> Self {
        Self {
            target_entity: None,
            last_known_pos: None,
            patrol_points: Vec::new(),
            patrol_index: 0,
            noise_loc: None,
            damage_taken: 0.0,
            health_fraction: 1.0,
            flags: BlackboardFlags::default(),
        }
    }

    /// Truncates to [`MAX_PATROL_POINTS`], as the blueprint schema allows at
    /// most 8 authored waypoints per patrol route.
    pub fn set_patrol_points(&mut self, points: Vec<Vec2>) {
        self.patrol_points = points.into_iter().take(MAX_PATROL_POINTS).collect();
        self.patrol_index = 0;
    }
}

impl Default for AIBlackboard {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AISenses {
    pub vision_range: f32,
    /// Half-angle of the vision cone, radians, measured from facing direction.
    pub vision_cone: f32,
    pub hearing_radius: f32,
    pub perception_hz: f32,
    /// Per-entity accumulator (seconds); see `AIPerceptionSystem`.
    pub accumulator: f32,
}

impl Default for AISenses {
    fn default() -> Self {
        Self {
            vision_range: 200.0,
            vision_cone: std::f32::consts::FRAC_PI_2,
            hearing_radius: 100.0,
            perception_hz: 5.0,
            accumulator: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AIMode {
    Idle,
    Patrol,
    Combat,
    Flee,
    Investigate,
    Dead,
}

#[derive(Debug, Clone, Copy)]
pub struct AIState {
    pub mode: AIMode,
}

impl Default for AIState {
    fn default() -> Self {
        Self { mode: AIMode::Idle }
    }
}

/// Stable identifier for a behavior-tree node, taken verbatim from the
/// blueprint's `id` field (see the node-identifier decision in the design
/// notes) so save/load round-trips without renumbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone)]
pub struct BehaviorTreeRuntime {
    pub tree_asset_id: String,
    /// Stack of node ids currently `Running`, innermost last, so the next
    /// tick resumes at the same leaf per the state-preservation invariant.
    pub node_stack: Vec<NodeId>,
    pub tick_hz: f32,
    pub accumulator: f32,
    pub active: bool,
}

impl BehaviorTreeRuntime {
    pub fn new(tree_asset_id: impl Into<String>, tick_hz: f32) -> Self {
        Self {
            tree_asset_id: tree_asset_id.into(),
            node_stack: Vec::new(),
            tick_hz,
            accumulator: 0.0,
            active: true,
        }
    }

    /// Swaps to a new tree, clearing the resume stack — a mode change
    /// interrupts any `Running` node per §4.4.2.
    pub fn switch_tree(&mut self, tree_asset_id: impl Into<String>) {
        self.tree_asset_id = tree_asset_id.into();
        self.node_stack.clear();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntentFlags {
    pub run: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct MoveIntent {
    pub goal: Option<Vec2>,
    pub flags: MoveIntentFlags,
}

impl Default for MoveIntent {
    fn default() -> Self {
        Self {
            goal: None,
            flags: MoveIntentFlags::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttackIntentFlags {
    pub heavy: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AttackIntent {
    pub target: Option<Entity>,
    pub flags: AttackIntentFlags,
}

// ---------------------------------------------------------------------------
// Collision / Nav
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct CollisionZone {
    pub bounds: Rect,
    pub blocking: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerEventType {
    Damage,
    LevelExit,
    ScriptedEvent,
}

#[derive(Debug, Clone, Copy)]
pub struct Trigger {
    pub bounds: Rect,
    pub event_type: TriggerEventType,
}
