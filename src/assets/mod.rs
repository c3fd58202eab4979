//! Reference-counted asset cache (texture/audio), loaded once per path.
//!
//! Mirrors the lifecycle in the data model: assets are loaded on demand,
//! cached by canonical path, and released on [`crate::ecs::World::reset`].
//! The decode step itself (bytes → GPU texture, bytes → audio buffer) is
//! the out-of-scope collaborator interface described in the engine
//! design notes — `DataStore` only owns the cache and ref-counting.

pub mod bank;
pub mod behavior_tree;
pub mod blueprint;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::RgbaImage;

use crate::audio::AudioContext;
use crate::error::{EngineError, EngineResult};

/// Opaque handle to a loaded texture. Cloning bumps the refcount; the
/// backing pixels are dropped once the last handle is dropped.
#[derive(Clone)]
pub struct TextureHandle(Rc<RgbaImage>);

impl TextureHandle {
    pub fn image(&self) -> &RgbaImage {
        &self.0
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Solid-color placeholder substituted for a missing/corrupt texture,
    /// per the `AssetNotFound` error kind's "magenta texture" policy.
    fn placeholder() -> Self {
        let mut img = RgbaImage::new(16, 16);
        for px in img.pixels_mut() {
            *px = image::Rgba([255, 0, 255, 255]);
        }
        Self(Rc::new(img))
    }
}

/// Opaque handle to a loaded sound name, registered with [`AudioContext`].
#[derive(Clone)]
pub struct AudioHandle(Rc<str>);

impl AudioHandle {
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Texture/audio asset cache with reference-counted handles, plus the
/// warn-once bookkeeping named in the error-handling design.
pub struct DataStore {
    textures: HashMap<PathBuf, TextureHandle>,
    audio: HashMap<PathBuf, AudioHandle>,
    warned_paths: std::collections::HashSet<PathBuf>,
    audio_ctx: AudioContext,
}

impl DataStore {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            audio: HashMap::new(),
            warned_paths: std::collections::HashSet::new(),
            audio_ctx: AudioContext::new(),
        }
    }

    /// Loads (or returns the cached handle for) a texture at `path`.
    /// Decode failure is non-fatal: logs once per path and returns the
    /// magenta placeholder so rendering can proceed.
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> TextureHandle {
        let path = path.as_ref();
        if let Some(handle) = self.textures.get(path) {
            return handle.clone();
        }
        let handle = match image::open(path) {
            Ok(img) => TextureHandle(Rc::new(img.to_rgba8())),
            Err(err) => {
                self.warn_once(path, &format!("texture decode failed: {err}"));
                TextureHandle::placeholder()
            }
        };
        self.textures.insert(path.to_path_buf(), handle.clone());
        handle
    }

    /// Loads (or returns the cached handle for) an audio clip at `path`.
    pub fn load_audio(&mut self, path: impl AsRef<Path>) -> EngineResult<AudioHandle> {
        let path = path.as_ref();
        if let Some(handle) = self.audio.get(path) {
            return Ok(handle.clone());
        }
        let name: Rc<str> = Rc::from(path.to_string_lossy().as_ref());
        self.audio_ctx.load_sound(&name, path);
        let handle = AudioHandle(name);
        self.audio.insert(path.to_path_buf(), handle.clone());
        Ok(handle)
    }

    pub fn audio_ctx_mut(&mut self) -> &mut AudioContext {
        &mut self.audio_ctx
    }

    /// Drops every cached handle, matching "released on world reset".
    pub fn reset(&mut self) {
        self.textures.clear();
        self.audio.clear();
        self.warned_paths.clear();
    }

    fn warn_once(&mut self, path: &Path, reason: &str) {
        if self.warned_paths.insert(path.to_path_buf()) {
            log::warn!("asset not found or unreadable: {} ({reason})", path.display());
        }
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Thin wrapper used by content loading to turn an io/format error into the
/// crate's `AssetNotFound` kind while preserving the path for diagnostics.
pub fn asset_not_found(path: impl Into<PathBuf>) -> EngineError {
    EngineError::AssetNotFound { path: path.into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_missing_texture_returns_placeholder_without_panicking() {
        let mut store = DataStore::new();
        let handle = store.load_texture("/nonexistent/path/does-not-exist.png");
        assert_eq!(handle.width(), 16);
        assert_eq!(handle.height(), 16);
    }

    #[test]
    fn repeated_loads_of_same_path_share_one_cache_entry() {
        let mut store = DataStore::new();
        let a = store.load_texture("/nonexistent/shared.png");
        let b = store.load_texture("/nonexistent/shared.png");
        assert!(Rc::ptr_eq(&a.0, &b.0));
    }

    #[test]
    fn reset_clears_cache() {
        let mut store = DataStore::new();
        store.load_texture("/nonexistent/shared.png");
        store.reset();
        assert!(store.textures.is_empty());
    }
}
