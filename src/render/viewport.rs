//! Quick-setup APIs that materialize [`RenderTarget`]/[`Viewport`]/[`Camera`]
//! entities for common multi-player layouts, and the runtime swap between
//! them. Both preserve every other entity in the world — only render-target
//! and viewport/camera entities are torn down and rebuilt.

use crate::ecs::components::{Camera, Rect, RenderTarget, RenderTargetKind, Viewport};
use crate::ecs::{Entity, World};

/// Per-layout tile counts for 1..8 players, row-major (cols, rows), matching
/// §4.3.1's named grids (1x1, 2x1, 3x1, 2x2, 3x2, 4x2 — 5 and 7 players round
/// up to the next grid with one cell left empty rather than inventing a new
/// layout shape).
fn grid_for(players: u32) -> (u32, u32) {
    match players.clamp(1, 8) {
        1 => (1, 1),
        2 => (2, 1),
        3 => (3, 1),
        4 => (2, 2),
        5 | 6 => (3, 2),
        _ => (4, 2),
    }
}

/// Despawns every existing `RenderTarget`/`Viewport`/`Camera` entity so a
/// layout switch starts from a clean slate. World state outside those three
/// component families is untouched.
fn clear_render_entities(world: &mut World) {
    let mut doomed = Vec::new();
    doomed.extend(world.query::<RenderTarget>().map(|(e, _)| e));
    doomed.extend(world.query::<Viewport>().map(|(e, _)| e));
    doomed.extend(world.query::<Camera>().map(|(e, _)| e));
    doomed.sort_unstable();
    doomed.dedup();
    for entity in doomed {
        world.despawn(entity);
    }
}

/// One primary render target, `players` viewports tiled across it.
///
/// `target_w`/`target_h` are the render target's pixel dimensions (normally
/// the window's logical size); each viewport gets an equal share of the
/// grid cell for its player index.
pub fn setup_split_screen(world: &mut World, players: u32, target_w: f32, target_h: f32) -> Vec<Entity> {
    clear_render_entities(world);
    let target = world.spawn();
    world
        .add_component(target, RenderTarget { kind: RenderTargetKind::PrimaryWindow, index: 0 })
        .expect("fresh entity always accepts its first component");

    let (cols, rows) = grid_for(players);
    let cell_w = target_w / cols as f32;
    let cell_h = target_h / rows as f32;

    let mut viewports = Vec::with_capacity(players as usize);
    for i in 0..players {
        let col = i % cols;
        let row = i / cols;
        let camera = world.spawn();
        world.add_component(camera, Camera::default()).unwrap();

        let viewport = world.spawn();
        world
            .add_component(
                viewport,
                Viewport {
                    rect: Rect { x: col as f32 * cell_w, y: row as f32 * cell_h, w: cell_w, h: cell_h },
                    player_index: i as i32,
                    camera_entity: Some(camera),
                    render_target_entity: Some(target),
                    order: i,
                },
            )
            .unwrap();
        viewports.push(viewport);
    }
    viewports
}

/// `players` render targets (secondary windows), one full-rect viewport
/// each.
pub fn setup_multi_window(world: &mut World, players: u32, window_w: f32, window_h: f32) -> Vec<Entity> {
    clear_render_entities(world);
    let mut viewports = Vec::with_capacity(players as usize);
    for i in 0..players {
        let kind = if i == 0 { RenderTargetKind::PrimaryWindow } else { RenderTargetKind::SecondaryWindow };
        let target = world.spawn();
        world.add_component(target, RenderTarget { kind, index: i }).unwrap();

        let camera = world.spawn();
        world.add_component(camera, Camera::default()).unwrap();

        let viewport = world.spawn();
        world
            .add_component(
                viewport,
                Viewport {
                    rect: Rect { x: 0.0, y: 0.0, w: window_w, h: window_h },
                    player_index: i as i32,
                    camera_entity: Some(camera),
                    render_target_entity: Some(target),
                    order: i,
                },
            )
            .unwrap();
        viewports.push(viewport);
    }
    viewports
}

/// Runtime swap to split-screen, preserving every non-render-entity's state.
pub fn switch_to_split_screen(world: &mut World, players: u32, target_w: f32, target_h: f32) -> Vec<Entity> {
    setup_split_screen(world, players, target_w, target_h)
}

/// Runtime swap to multi-window, preserving every non-render-entity's state.
pub fn switch_to_multi_window(world: &mut World, players: u32, window_w: f32, window_h: f32) -> Vec<Entity> {
    setup_multi_window(world, players, window_w, window_h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::Position;

    #[test]
    fn split_screen_for_one_player_fills_the_whole_target() {
        let mut world = World::new();
        let viewports = setup_split_screen(&mut world, 1, 800.0, 600.0);
        assert_eq!(viewports.len(), 1);
        let vp = world.get_component::<Viewport>(viewports[0]).unwrap();
        assert_eq!(vp.rect, Rect { x: 0.0, y: 0.0, w: 800.0, h: 600.0 });
    }

    #[test]
    fn split_screen_for_four_players_tiles_a_two_by_two_grid() {
        let mut world = World::new();
        let viewports = setup_split_screen(&mut world, 4, 800.0, 600.0);
        assert_eq!(viewports.len(), 4);
        let last = world.get_component::<Viewport>(viewports[3]).unwrap();
        assert_eq!(last.rect, Rect { x: 400.0, y: 300.0, w: 400.0, h: 300.0 });
    }

    #[test]
    fn multi_window_gives_each_player_its_own_full_rect_render_target() {
        let mut world = World::new();
        let viewports = setup_multi_window(&mut world, 2, 800.0, 600.0);
        assert_eq!(viewports.len(), 2);
        for vp_entity in &viewports {
            let vp = world.get_component::<Viewport>(*vp_entity).unwrap();
            assert_eq!(vp.rect, Rect { x: 0.0, y: 0.0, w: 800.0, h: 600.0 });
            let target = world.get_component::<RenderTarget>(vp.render_target_entity.unwrap()).unwrap();
            assert_eq!(target.kind == RenderTargetKind::PrimaryWindow, vp.player_index == 0);
        }
    }

    #[test]
    fn switching_layouts_preserves_unrelated_world_state() {
        let mut world = World::new();
        setup_split_screen(&mut world, 2, 800.0, 600.0);
        let player = world.spawn();
        world.add_component(player, Position { x: 5.0, y: 5.0, z: crate::ecs::components::RenderLayer::Characters }).unwrap();

        let viewports = switch_to_multi_window(&mut world, 2, 800.0, 600.0);
        assert_eq!(viewports.len(), 2);
        assert!(world.is_alive(player));
        assert_eq!(world.get_component::<Position>(player).unwrap().x, 5.0);
    }

    #[test]
    fn switching_layouts_tears_down_the_previous_viewports_and_cameras() {
        let mut world = World::new();
        let first = setup_split_screen(&mut world, 3, 800.0, 600.0);
        switch_to_split_screen(&mut world, 2, 800.0, 600.0);
        for vp in first {
            assert!(!world.is_alive(vp));
        }
    }
}
