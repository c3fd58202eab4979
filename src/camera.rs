use glam::Vec2;

/// Camera uniform uploaded to the GPU — contains the combined view-projection matrix.
///
/// Layout (column-major, matching WGSL `mat4x4<f32>`):
/// ```text
/// col0: [sx,  0,   0,  0]
/// col1: [0,   sy,  0,  0]
/// col2: [0,   0,   1,  0]
/// col3: [tx,  ty,  0,  1]
/// ```
/// where `sx = 2z/w`, `sy = -2z/h`, `tx = -sx*cx`, `ty = -sy*cy`.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Column-major 4×4 view-projection matrix sent to the vertex shader.
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Plain orthographic projection (no camera transform).
    /// Maps pixel coords [0..w] × [0..h] directly to clip space.
    /// Used for the UI pass so that UI is always screen-fixed.
    pub fn identity_ortho(width: f32, height: f32) -> Self {
        let sx = 2.0 / width;
        let sy = -2.0 / height;
        Self {
            view_proj: [
                [sx,   0.0,  0.0, 0.0], // col0
                [0.0,  sy,   0.0, 0.0], // col1
                [0.0,  0.0,  1.0, 0.0], // col2
                [-1.0, 1.0,  0.0, 1.0], // col3
            ],
        }
    }
}

/// Builds the GPU-ready `CameraUniform` for an [`crate::ecs::components::Camera`]
/// centered at `center` (its target entity's world position plus the
/// current shake offset), for a viewport of `width` x `height` pixels.
///
/// The resulting matrix maps world-space pixel coordinates so that `center`
/// lands at screen center, with the visible region scaled by `zoom`.
///
/// Derivation (y-down pixel space -> NDC):
/// ```text
/// x_ndc = sx * world_x + tx    (sx = 2z/w,  tx = -sx*cx)
/// y_ndc = sy * world_y + ty    (sy = -2z/h, ty = -sy*cy)
/// ```
/// At the camera center (cx, cy): x_ndc = 0, y_ndc = 0.
pub fn build_view_proj(center: Vec2, zoom: f32, width: f32, height: f32) -> CameraUniform {
    let z = zoom.max(0.01);
    let sx = 2.0 * z / width;
    let sy = -2.0 * z / height;
    let tx = -sx * center.x;
    let ty = -sy * center.y;

    CameraUniform {
        view_proj: [
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [tx, ty, 0.0, 1.0],
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_centered_at_origin_maps_origin_to_clip_space_center() {
        let uniform = build_view_proj(Vec2::ZERO, 1.0, 800.0, 600.0);
        assert_eq!(uniform.view_proj[3][0], 0.0);
        assert_eq!(uniform.view_proj[3][1], 0.0);
    }

    #[test]
    fn higher_zoom_increases_the_scale_factor() {
        let low = build_view_proj(Vec2::ZERO, 1.0, 800.0, 600.0);
        let high = build_view_proj(Vec2::ZERO, 2.0, 800.0, 600.0);
        assert!(high.view_proj[0][0] > low.view_proj[0][0]);
    }
}