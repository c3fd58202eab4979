//! Per-viewport camera uniform construction: looks up a [`Camera`]
//! component's target entity position, folds in zoom and shake, and hands
//! the result to [`crate::camera::build_view_proj`].

use glam::Vec2;

use crate::camera::{build_view_proj, CameraUniform};
use crate::ecs::components::{Camera, Position};
use crate::ecs::World;

/// Builds the `CameraUniform` a viewport of `(width, height)` pixels should
/// use this frame, following `camera`'s target entity. A camera with no
/// target (or a target that's been despawned) stays centered on the origin
/// — still a usable uniform, just one that doesn't track anything.
pub fn uniform_for(world: &World, camera: &Camera, width: f32, height: f32) -> CameraUniform {
    let center = camera
        .target_entity
        .and_then(|target| world.get_component::<Position>(target))
        .map(|pos| Vec2::new(pos.x, pos.y))
        .unwrap_or(Vec2::ZERO)
        + camera.shake_offset;

    build_view_proj(center, camera.zoom, width, height)
}
