//! Two-pass depth-sorted renderer: Phase A collects every drawable entity's
//! world-space placement, Phase B sorts the collected items into a single
//! depth order and culls them against each active viewport. The systems in
//! this module own that CPU-side pipeline; the GPU-facing adapter that turns
//! a [`RenderOutput`] into vertex buffers lives in [`gpu`].

pub mod cull;
pub mod depth;
pub mod gpu;
pub mod menu;
pub mod viewport;

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::content::tiled::Orientation;
use crate::ecs::components::{Camera, EntityKind, Identity, Position, VisualSprite};
use crate::ecs::system::System;
use crate::ecs::{Entity, World};

/// Fallback footprint for entities with no [`crate::ecs::components::BoundingBox`],
/// used only for culling — sprites are usually close enough to a tile in size
/// that an exact miss just means one extra item survives culling.
const DEFAULT_FOOTPRINT: f32 = 16.0;

/// One drawable entity, placed and depth-sorted, ready for the GPU adapter to
/// turn into vertices.
#[derive(Debug, Clone)]
pub struct RenderItem {
    pub entity: Entity,
    pub depth: f32,
    pub world_x: f32,
    pub world_y: f32,
    pub atlas: String,
    pub src: crate::ecs::components::SrcRect,
    pub flip: crate::ecs::components::Flip,
}

/// Per-viewport batch of culled, depth-sorted world items, plus the
/// screen-space UI batch (shared across every viewport) and any debug
/// overlay line segments.
#[derive(Debug, Clone, Default)]
pub struct RenderOutput {
    pub world_batches: Vec<(Entity, Vec<RenderItem>)>,
    pub ui_items: Vec<RenderItem>,
    pub debug_lines: Vec<(Vec2, Vec2)>,
}

/// Phase A: gather every non-UI entity with a [`Position`] and [`VisualSprite`]
/// into unsorted, uncalled [`RenderItem`]s.
pub fn collect_phase_a(world: &World) -> Vec<RenderItem> {
    world
        .query::<VisualSprite>()
        .filter(|(entity, _)| {
            world
                .get_component::<Identity>(*entity)
                .map(|id| id.kind != EntityKind::UiElement)
                .unwrap_or(true)
        })
        .filter_map(|(entity, sprite)| {
            let pos = world.get_component::<Position>(entity)?;
            Some(RenderItem {
                entity,
                depth: 0.0,
                world_x: pos.x,
                world_y: pos.y,
                atlas: sprite.atlas.clone(),
                src: sprite.src,
                flip: sprite.flip,
            })
        })
        .collect()
}

/// Phase B: stamp each item's depth under `orientation` and sort ascending
/// (lowest depth draws first — furthest back).
pub fn sort_phase_b(world: &World, items: &mut Vec<RenderItem>, orientation: Orientation, tile_h: f32) {
    for item in items.iter_mut() {
        let layer_z = world
            .get_component::<Position>(item.entity)
            .map(|p| p.z as i32)
            .unwrap_or(0);
        item.depth = depth::world_depth(orientation, layer_z, item.world_x, item.world_y, tile_h);
    }
    items.sort_by(|a, b| a.depth.partial_cmp(&b.depth).unwrap_or(std::cmp::Ordering::Equal));
}

/// Drops items outside `region`, preserving sort order.
pub fn cull_phase(items: &[RenderItem], region: &cull::WorldRect) -> Vec<RenderItem> {
    items
        .iter()
        .filter(|item| cull::is_visible(region, item.world_x, item.world_y, DEFAULT_FOOTPRINT, DEFAULT_FOOTPRINT))
        .cloned()
        .collect()
}

/// Ticks every [`Camera`] component's smooth-zoom lerp and shake decay.
/// Registered at [`crate::ecs::system::SystemStage::Camera`].
pub struct CameraSystem;

impl System for CameraSystem {
    fn name(&self) -> &str {
        "CameraSystem"
    }

    fn process(&mut self, world: &mut World, dt: f32) {
        for (_, camera) in world.query_mut::<Camera>() {
            camera.tick(dt);
        }
    }
}

/// Runs Phase A/B and per-viewport culling, publishing the result into a
/// shared [`RenderOutput`] handle the GPU adapter reads from once per frame
/// — the same `Rc<RefCell<_>>` handoff used for the AI pipeline's nav grid
/// and event queue handles.
pub struct RenderWorldSystem {
    output: Rc<RefCell<RenderOutput>>,
    orientation: Orientation,
    tile_h: f32,
}

impl RenderWorldSystem {
    pub fn new(output: Rc<RefCell<RenderOutput>>, orientation: Orientation, tile_h: f32) -> Self {
        Self { output, orientation, tile_h }
    }
}

impl System for RenderWorldSystem {
    fn name(&self) -> &str {
        "RenderWorldSystem"
    }

    fn process(&mut self, world: &mut World, _dt: f32) {
        let mut items = collect_phase_a(world);
        sort_phase_b(world, &mut items, self.orientation, self.tile_h);

        let mut batches = Vec::new();
        for (viewport_entity, viewport) in world.query::<crate::ecs::components::Viewport>() {
            let Some(camera_entity) = viewport.camera_entity else { continue };
            let Some(camera) = world.get_component::<Camera>(camera_entity) else { continue };
            let center = camera
                .target_entity
                .and_then(|target| world.get_component::<Position>(target))
                .map(|p| Vec2::new(p.x, p.y) + camera.shake_offset)
                .unwrap_or(camera.shake_offset);

            let region =
                cull::WorldRect::visible_region(center.x, center.y, camera.zoom, viewport.rect.w, viewport.rect.h);
            batches.push((viewport_entity, cull_phase(&items, &region)));
        }

        self.output.borrow_mut().world_batches = batches;
    }
}

/// Collects screen-space UI sprites (no depth sort needed beyond render
/// layer — UI never reorders by world position).
pub struct RenderUiSystem {
    output: Rc<RefCell<RenderOutput>>,
}

impl RenderUiSystem {
    pub fn new(output: Rc<RefCell<RenderOutput>>) -> Self {
        Self { output }
    }
}

impl System for RenderUiSystem {
    fn name(&self) -> &str {
        "RenderUiSystem"
    }

    fn process(&mut self, world: &mut World, _dt: f32) {
        let mut items: Vec<RenderItem> = world
            .query::<VisualSprite>()
            .filter(|(entity, _)| {
                world
                    .get_component::<Identity>(*entity)
                    .map(|id| id.kind == EntityKind::UiElement)
                    .unwrap_or(false)
            })
            .filter_map(|(entity, sprite)| {
                let pos = world.get_component::<Position>(entity)?;
                Some(RenderItem {
                    entity,
                    depth: pos.z as i32 as f32,
                    world_x: pos.x,
                    world_y: pos.y,
                    atlas: sprite.atlas.clone(),
                    src: sprite.src,
                    flip: sprite.flip,
                })
            })
            .collect();
        items.sort_by(|a, b| a.depth.partial_cmp(&b.depth).unwrap_or(std::cmp::Ordering::Equal));
        self.output.borrow_mut().ui_items = items;
    }
}

/// Draws the nav-grid walkability overlay when enabled. Runs before the
/// world/UI passes in stage order, but its lines are composited on top of
/// `RenderWorld`'s own output — the stage ordering only guarantees this
/// system observes a stable nav grid, not draw order.
pub struct GridDebugSystem {
    output: Rc<RefCell<RenderOutput>>,
    nav: Rc<RefCell<Option<crate::content::navgrid::NavigationMap>>>,
    enabled: Rc<RefCell<bool>>,
}

impl GridDebugSystem {
    pub fn new(
        output: Rc<RefCell<RenderOutput>>,
        nav: Rc<RefCell<Option<crate::content::navgrid::NavigationMap>>>,
        enabled: Rc<RefCell<bool>>,
    ) -> Self {
        Self { output, nav, enabled }
    }
}

impl System for GridDebugSystem {
    fn name(&self) -> &str {
        "GridDebugSystem"
    }

    fn process(&mut self, _world: &mut World, _dt: f32) {
        if !*self.enabled.borrow() {
            self.output.borrow_mut().debug_lines.clear();
            return;
        }
        let nav = self.nav.borrow();
        let Some(nav) = nav.as_ref() else {
            self.output.borrow_mut().debug_lines.clear();
            return;
        };

        let mut lines = Vec::new();
        for y in 0..nav.height {
            for x in 0..nav.width {
                if !nav.is_walkable(x as i32, y as i32) {
                    let (wx, wy) = nav.tile_to_world(x as i32, y as i32);
                    lines.push((Vec2::new(wx, wy), Vec2::new(wx + nav.tile_w as f32, wy)));
                    lines.push((Vec2::new(wx, wy), Vec2::new(wx, wy + nav.tile_h as f32)));
                }
            }
        }
        self.output.borrow_mut().debug_lines = lines;
    }
}
