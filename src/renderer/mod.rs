pub mod atlas;
pub mod pipeline;
pub mod sprite_atlas;
pub mod text;
pub mod text_pipeline;
pub mod utils;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use atlas::Atlas;
use pipeline::{TilePipeline, TileVertex, create_tile_pipeline, orthographic_projection};
use sprite_atlas::SpriteAtlas;
use text::Vertex as TextVertex;
use text_pipeline::{TextPipeline, create_text_pipeline};

use crate::camera::CameraUniform;

/// Capacity of the entity-offsets storage buffer — an upper bound on
/// simultaneously animated entities per frame, not a hard world limit.
const MAX_ANIMATED_ENTITIES: usize = 512;

/// Upper bound on concurrently active viewports (matches `InputRouter`'s
/// 8-player cap).
const MAX_VIEWPORTS: usize = 8;

// ── MtsdfParams ───────────────────────────────────────────────────────────────

/// Per-font parameters uploaded to the text shader's group(1) binding(2).
///
/// `distance_range` comes from the msdf-atlas-gen JSON (`atlas.distanceRange`).
/// `atlas_width` / `atlas_height` are read directly from the loaded PNG texture.
/// The shader uses these to compute the correct screen-pixel AA band at any scale.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MtsdfParams {
    distance_range: f32,
    atlas_width: f32,
    atlas_height: f32,
    _pad: f32,
}

// The MTSDF font atlas is baked in at compile time; `build.rs` generates a
// blank placeholder at this path if a real msdf-atlas-gen atlas hasn't been
// dropped in.
static MTSDF_FONT_PNG: &[u8] = include_bytes!("../../resources/font_atlas.png");

/// One viewport's worth of GPU-ready geometry and the camera it should be
/// drawn with, handed to [`Renderer::render`] by the game loop after it
/// collects a [`crate::render::RenderOutput`] and runs it through
/// [`crate::render::gpu::build_tile_vertices`].
pub struct ViewportDraw {
    /// Physical-pixel (x, y, w, h) region of the render target this
    /// viewport owns — becomes both the GPU viewport and scissor rect, so
    /// draws for other viewports can never bleed into it.
    pub scissor: (u32, u32, u32, u32),
    pub camera: CameraUniform,
    pub world_verts: Vec<TileVertex>,
    /// Screen-space UI items local to this viewport's own pixel rect
    /// (HUD, per-viewport menu panel) — drawn after `world_verts` with no
    /// depth sort, per the two-pass compositor's Pass 2.
    pub ui_verts: Vec<TileVertex>,
}

pub struct Renderer {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    tile_pipeline: TilePipeline,
    /// MTSDF text pipeline (separate shader, vertex format, and sampler).
    text_pipeline: TextPipeline,
    /// Static orthographic projection (no camera) — used by the global text pass.
    projection_buffer: wgpu::Buffer,
    text_projection_bind_group: wgpu::BindGroup,
    /// Per-viewport camera buffers/bind groups (world pass) and per-viewport
    /// local-orthographic buffers/bind groups (UI pass) — distinct GPU
    /// resources per viewport slot so writing viewport N's uniforms can
    /// never clobber viewport M's before the frame's single submit.
    viewport_camera_buffers: Vec<wgpu::Buffer>,
    viewport_camera_bind_groups: Vec<wgpu::BindGroup>,
    viewport_ui_proj_buffers: Vec<wgpu::Buffer>,
    viewport_ui_proj_bind_groups: Vec<wgpu::BindGroup>,
    /// Storage buffer for entity animation offsets [f32; 2], indexed by entity_id.
    entity_offsets_buffer: wgpu::Buffer,
    entity_offsets_bind_group: wgpu::BindGroup,
    /// Bind group for the character/glyph tile atlas (always present).
    atlas_bind_group: wgpu::BindGroup,
    /// Bind group for the optional sprite atlas (None until load_sprite_folder is called).
    sprite_atlas_bind_group: Option<wgpu::BindGroup>,
    /// Keeps the MTSDF font GPU texture alive (TextureView holds a ref-count
    /// internally, but storing the Texture here makes ownership unambiguous).
    #[allow(dead_code)]
    font_texture: wgpu::Texture,
    /// Bind group for the MTSDF font atlas (Linear sampler, Rgba8Unorm, + params).
    font_bind_group: wgpu::BindGroup,
    /// Cached MTSDF parameters (distance_range, atlas size) mirrored on the CPU
    /// so `set_mtsdf_distance_range` can patch only the range without re-reading
    /// the buffer from the GPU.
    mtsdf_params: MtsdfParams,
    /// GPU buffer for [`MtsdfParams`]; written via `queue.write_buffer`.
    mtsdf_params_buffer: wgpu::Buffer,
    // ── Persistent geometry buffers (capacity-doubling) ──────────────────
    // World and UI vertices from every viewport are concatenated into one
    // buffer per frame; each viewport's draw call slices its own byte
    // range out of it. Reallocated only when the combined count exceeds
    // capacity, avoiding a per-frame GPU allocation on the hot path.
    world_vertex_buffer: Option<wgpu::Buffer>,
    world_vertex_buffer_capacity: u32,
    ui_vertex_buffer: Option<wgpu::Buffer>,
    ui_vertex_buffer_capacity: u32,
    text_vertex_buffer: Option<wgpu::Buffer>,
    text_vertex_buffer_capacity: u32,
    text_index_buffer: Option<wgpu::Buffer>,
    text_index_buffer_capacity: u32,
    pub(crate) atlas: Atlas,
    /// Loaded sprite atlas metadata (UVs, tile spans, etc.).
    pub(crate) sprite_atlas: Option<SpriteAtlas>,
}

/// Load a PNG from raw bytes as an `Rgba8Unorm` texture (no gamma conversion).
/// Used for the MTSDF atlas where channel values are linear distance fields.
fn load_rgba8_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    png_bytes: &[u8],
    label: &str,
) -> (wgpu::Texture, wgpu::TextureView) {
    let img = image::load_from_memory(png_bytes)
        .expect("failed to load MTSDF font PNG")
        .to_rgba8();
    let (w, h) = img.dimensions();

    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            // Rgba8Unorm (not sRGB) — SDF values must not be gamma-corrected.
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &img,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn make_uniform_buffer(device: &wgpu::Device, label: &str, uniform: CameraUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(&[uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

fn make_uniform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry { binding: 0, resource: buffer.as_entire_binding() }],
    })
}

impl Renderer {
    pub async fn new(window: Arc<Window>, png_bytes: &[u8], tile_w: u32, tile_h: u32) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(Arc::clone(&window)).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .expect("no suitable GPU adapter found");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .expect("failed to create device");

        let caps = surface.get_capabilities(&adapter);
        let format = caps.formats[0];

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let atlas = Atlas::from_png(&device, &queue, png_bytes, tile_w, tile_h);

        // ── Entity Offsets Storage Buffer ──
        let initial_offsets = vec![[0.0f32, 0.0, 0.0, 0.0]; MAX_ANIMATED_ENTITIES];
        let entity_offsets_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("entity_offsets_buffer"),
            contents: bytemuck::cast_slice(&initial_offsets),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        let tile_pipeline = create_tile_pipeline(&device, format);

        let entity_offsets_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("entity_offsets_bg"),
            layout: &tile_pipeline.entity_offsets_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: entity_offsets_buffer.as_entire_binding(),
            }],
        });

        let text_pipeline = create_text_pipeline(&device, format);

        // ── Static screen projection buffer (global text pass) ────────────
        let proj = orthographic_projection(config.width as f32, config.height as f32);
        let projection_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("projection_buffer"),
            contents: bytemuck::cast_slice(&proj),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let text_projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("text_projection_bg"),
            layout: &text_pipeline.projection_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
        });

        // ── Per-viewport camera (world) and local-ortho (UI) uniforms ─────
        let identity = CameraUniform::identity_ortho(config.width as f32, config.height as f32);
        let mut viewport_camera_buffers = Vec::with_capacity(MAX_VIEWPORTS);
        let mut viewport_camera_bind_groups = Vec::with_capacity(MAX_VIEWPORTS);
        let mut viewport_ui_proj_buffers = Vec::with_capacity(MAX_VIEWPORTS);
        let mut viewport_ui_proj_bind_groups = Vec::with_capacity(MAX_VIEWPORTS);
        for i in 0..MAX_VIEWPORTS {
            let cam_buf = make_uniform_buffer(&device, &format!("viewport_camera_buffer_{i}"), identity);
            let cam_bg = make_uniform_bind_group(
                &device,
                &tile_pipeline.projection_bind_group_layout,
                &cam_buf,
                &format!("viewport_camera_bg_{i}"),
            );
            let ui_buf = make_uniform_buffer(&device, &format!("viewport_ui_proj_buffer_{i}"), identity);
            let ui_bg = make_uniform_bind_group(
                &device,
                &tile_pipeline.projection_bind_group_layout,
                &ui_buf,
                &format!("viewport_ui_proj_bg_{i}"),
            );
            viewport_camera_buffers.push(cam_buf);
            viewport_camera_bind_groups.push(cam_bg);
            viewport_ui_proj_buffers.push(ui_buf);
            viewport_ui_proj_bind_groups.push(ui_bg);
        }

        // ── Tile atlas bind group (Nearest sampler) ───────────────────────
        let atlas_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("atlas_bg"),
            layout: &tile_pipeline.atlas_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&atlas.texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&atlas.sampler),
                },
            ],
        });

        // ── MTSDF font atlas (Linear sampler, Rgba8Unorm) ─────────────────
        let (font_texture, font_view) =
            load_rgba8_texture(&device, &queue, MTSDF_FONT_PNG, "mtsdf_font_atlas");
        let font_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("mtsdf_font_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let mtsdf_params = MtsdfParams {
            distance_range: 4.0,
            atlas_width: font_texture.width() as f32,
            atlas_height: font_texture.height() as f32,
            _pad: 0.0,
        };
        let mtsdf_params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mtsdf_params_buffer"),
            contents: bytemuck::cast_slice(&[mtsdf_params]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let font_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("font_bg"),
            layout: &text_pipeline.font_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&font_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&font_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: mtsdf_params_buffer.as_entire_binding(),
                },
            ],
        });

        Self {
            window,
            surface,
            device,
            queue,
            config,
            tile_pipeline,
            text_pipeline,
            projection_buffer,
            text_projection_bind_group,
            viewport_camera_buffers,
            viewport_camera_bind_groups,
            viewport_ui_proj_buffers,
            viewport_ui_proj_bind_groups,
            entity_offsets_buffer,
            entity_offsets_bind_group,
            atlas_bind_group,
            sprite_atlas_bind_group: None,
            font_texture,
            font_bind_group,
            mtsdf_params,
            mtsdf_params_buffer,
            world_vertex_buffer: None,
            world_vertex_buffer_capacity: 0,
            ui_vertex_buffer: None,
            ui_vertex_buffer_capacity: 0,
            text_vertex_buffer: None,
            text_vertex_buffer_capacity: 0,
            text_index_buffer: None,
            text_index_buffer_capacity: 0,
            atlas,
            sprite_atlas: None,
        }
    }

    /// Load all `.png` files from `path` (recursively) into the sprite atlas.
    pub fn load_sprite_folder(&mut self, path: &str, tile_w: u32, tile_h: u32) {
        let atlas = SpriteAtlas::load_folder(&self.device, &self.queue, path, tile_w, tile_h);

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_atlas_bg"),
            layout: &self.tile_pipeline.atlas_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&atlas.texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&atlas.sampler),
                },
            ],
        });

        self.sprite_atlas_bind_group = Some(bind_group);
        self.sprite_atlas = Some(atlas);
    }

    /// Returns the metadata (UVs, spans) for a named sprite if it exists.
    pub fn get_sprite_data(&self, name: &str) -> Option<crate::renderer::sprite_atlas::SpriteData> {
        self.sprite_atlas.as_ref()?.get_data(name).cloned()
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);

        let proj = orthographic_projection(new_size.width as f32, new_size.height as f32);
        self.queue
            .write_buffer(&self.projection_buffer, 0, bytemuck::cast_slice(&proj));
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Update the MTSDF distance range used by the text shader.
    pub fn set_mtsdf_distance_range(&mut self, range: f32) {
        self.mtsdf_params.distance_range = range;
        self.queue.write_buffer(
            &self.mtsdf_params_buffer,
            0,
            bytemuck::cast_slice(&[self.mtsdf_params]),
        );
    }

    /// Render one frame: one world + UI pass per viewport (scissored and
    /// view-projected independently), then a single screen-global MTSDF
    /// text pass for debug/HUD labels on top of everything.
    pub fn render(
        &mut self,
        viewports: &[ViewportDraw],
        text_verts: &[TextVertex],
        text_indices: &[u32],
    ) -> Result<(), wgpu::SurfaceError> {
        assert!(viewports.len() <= MAX_VIEWPORTS, "more viewports than the renderer has GPU slots for");

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        // ── Upload per-viewport uniforms ──────────────────────────────────
        for (i, vp) in viewports.iter().enumerate() {
            self.queue.write_buffer(&self.viewport_camera_buffers[i], 0, bytemuck::cast_slice(&[vp.camera]));
            let (_, _, w, h) = vp.scissor;
            let local_ortho = orthographic_projection(w.max(1) as f32, h.max(1) as f32);
            self.queue.write_buffer(&self.viewport_ui_proj_buffers[i], 0, bytemuck::cast_slice(&local_ortho));
        }

        // ── Concatenate geometry and compute each viewport's byte range ───
        let mut world_all: Vec<TileVertex> = Vec::new();
        let mut ui_all: Vec<TileVertex> = Vec::new();
        let mut world_ranges = Vec::with_capacity(viewports.len());
        let mut ui_ranges = Vec::with_capacity(viewports.len());
        for vp in viewports {
            let w_start = world_all.len();
            world_all.extend_from_slice(&vp.world_verts);
            world_ranges.push((w_start, world_all.len()));

            let u_start = ui_all.len();
            ui_all.extend_from_slice(&vp.ui_verts);
            ui_ranges.push((u_start, ui_all.len()));
        }

        macro_rules! upload_vertex_buf {
            ($buf:expr, $cap:expr, $data:expr, $label:literal) => {
                if !$data.is_empty() {
                    let count = $data.len() as u32;
                    if count > $cap || $buf.is_none() {
                        let new_cap = count.next_power_of_two().max(256);
                        $buf = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                            label: Some($label),
                            size: new_cap as u64 * std::mem::size_of::<TileVertex>() as u64,
                            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                            mapped_at_creation: false,
                        }));
                        $cap = new_cap;
                    }
                    self.queue.write_buffer($buf.as_ref().unwrap(), 0, bytemuck::cast_slice($data));
                }
            };
        }

        upload_vertex_buf!(self.world_vertex_buffer, self.world_vertex_buffer_capacity, world_all.as_slice(), "world_vertex_buffer");
        upload_vertex_buf!(self.ui_vertex_buffer, self.ui_vertex_buffer_capacity, ui_all.as_slice(), "ui_vertex_buffer");

        if !text_indices.is_empty() {
            let vert_count = text_verts.len() as u32;
            if vert_count > self.text_vertex_buffer_capacity || self.text_vertex_buffer.is_none() {
                let cap = vert_count.next_power_of_two().max(256);
                self.text_vertex_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("text_vertex_buffer"),
                    size: cap as u64 * std::mem::size_of::<TextVertex>() as u64,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }));
                self.text_vertex_buffer_capacity = cap;
            }
            self.queue.write_buffer(self.text_vertex_buffer.as_ref().unwrap(), 0, bytemuck::cast_slice(text_verts));

            let idx_count = text_indices.len() as u32;
            if idx_count > self.text_index_buffer_capacity || self.text_index_buffer.is_none() {
                let cap = idx_count.next_power_of_two().max(256);
                self.text_index_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("text_index_buffer"),
                    size: cap as u64 * std::mem::size_of::<u32>() as u64,
                    usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }));
                self.text_index_buffer_capacity = cap;
            }
            self.queue.write_buffer(self.text_index_buffer.as_ref().unwrap(), 0, bytemuck::cast_slice(text_indices));
        }

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for (i, vp) in viewports.iter().enumerate() {
                let (x, y, w, h) = vp.scissor;
                if w == 0 || h == 0 {
                    continue;
                }
                pass.set_viewport(x as f32, y as f32, w as f32, h as f32, 0.0, 1.0);
                pass.set_scissor_rect(x, y, w, h);

                // ── World pass [per-viewport camera] ───────────────────────
                let (w_start, w_end) = world_ranges[i];
                if w_end > w_start {
                    if let (Some(vbuf), Some(sprite_bg)) = (&self.world_vertex_buffer, &self.sprite_atlas_bind_group) {
                        let stride = std::mem::size_of::<TileVertex>() as u64;
                        pass.set_pipeline(&self.tile_pipeline.render_pipeline);
                        pass.set_bind_group(0, &self.viewport_camera_bind_groups[i], &[]);
                        pass.set_bind_group(1, sprite_bg, &[]);
                        pass.set_bind_group(2, &self.entity_offsets_bind_group, &[]);
                        pass.set_vertex_buffer(0, vbuf.slice(w_start as u64 * stride..w_end as u64 * stride));
                        pass.draw(0..(w_end - w_start) as u32, 0..1);
                    } else if let Some(vbuf) = &self.world_vertex_buffer {
                        let stride = std::mem::size_of::<TileVertex>() as u64;
                        pass.set_pipeline(&self.tile_pipeline.render_pipeline);
                        pass.set_bind_group(0, &self.viewport_camera_bind_groups[i], &[]);
                        pass.set_bind_group(1, &self.atlas_bind_group, &[]);
                        pass.set_bind_group(2, &self.entity_offsets_bind_group, &[]);
                        pass.set_vertex_buffer(0, vbuf.slice(w_start as u64 * stride..w_end as u64 * stride));
                        pass.draw(0..(w_end - w_start) as u32, 0..1);
                    }
                }

                // ── UI pass [viewport-local screen projection, no depth sort] ─
                let (u_start, u_end) = ui_ranges[i];
                if u_end > u_start {
                    if let Some(vbuf) = &self.ui_vertex_buffer {
                        let stride = std::mem::size_of::<TileVertex>() as u64;
                        pass.set_pipeline(&self.tile_pipeline.render_pipeline);
                        pass.set_bind_group(0, &self.viewport_ui_proj_bind_groups[i], &[]);
                        pass.set_bind_group(1, &self.atlas_bind_group, &[]);
                        pass.set_bind_group(2, &self.entity_offsets_bind_group, &[]);
                        pass.set_vertex_buffer(0, vbuf.slice(u_start as u64 * stride..u_end as u64 * stride));
                        pass.draw(0..(u_end - u_start) as u32, 0..1);
                    }
                }
            }

            // ── Global MTSDF text pass (debug/HUD labels, screen-fixed) ───
            if !text_indices.is_empty() {
                pass.set_viewport(0.0, 0.0, self.config.width as f32, self.config.height as f32, 0.0, 1.0);
                pass.set_scissor_rect(0, 0, self.config.width, self.config.height);
                let vbyte_len = text_verts.len() as u64 * std::mem::size_of::<TextVertex>() as u64;
                let ibyte_len = text_indices.len() as u64 * std::mem::size_of::<u16>() as u64;
                pass.set_pipeline(&self.text_pipeline.render_pipeline);
                pass.set_bind_group(0, &self.text_projection_bind_group, &[]);
                pass.set_bind_group(1, &self.font_bind_group, &[]);
                pass.set_vertex_buffer(0, self.text_vertex_buffer.as_ref().unwrap().slice(..vbyte_len));
                pass.set_index_buffer(self.text_index_buffer.as_ref().unwrap().slice(..ibyte_len), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..text_indices.len() as u32, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
