//! AnimationBank: named sequences of frames over one or more spritesheets.
//!
//! A spritesheet declares its grid once; the source rectangle for frame N
//! is always computed from that grid, never stored per frame, so adding a
//! frame to a sequence never requires touching per-frame data.

use std::collections::HashMap;

use serde::Deserialize;

use crate::ecs::components::SrcRect;

#[derive(Debug, Clone, Deserialize)]
pub struct Spritesheet {
    pub id: String,
    pub path: String,
    #[serde(rename = "frameW")]
    pub frame_w: u32,
    #[serde(rename = "frameH")]
    pub frame_h: u32,
    pub cols: u32,
    pub rows: u32,
    #[serde(default)]
    pub margin: u32,
    #[serde(default)]
    pub spacing: u32,
    #[serde(default)]
    pub hotspot: (f32, f32),
}

impl Spritesheet {
    /// Source rectangle for grid index `frame`, row-major.
    pub fn src_rect(&self, frame: u32) -> SrcRect {
        let col = frame % self.cols.max(1);
        let row = frame / self.cols.max(1);
        SrcRect {
            x: self.margin + col * (self.frame_w + self.spacing),
            y: self.margin + row * (self.frame_h + self.spacing),
            w: self.frame_w,
            h: self.frame_h,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sequence {
    #[serde(rename = "spritesheetId")]
    pub spritesheet_id: String,
    #[serde(rename = "startFrame")]
    pub start_frame: u32,
    pub count: u32,
    #[serde(rename = "frameDuration")]
    pub frame_duration: f32,
    #[serde(default)]
    pub r#loop: bool,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default, rename = "nextAnimation")]
    pub next_animation: Option<String>,
}

fn default_speed() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationBank {
    #[serde(rename = "bankId")]
    pub bank_id: String,
    pub spritesheets: Vec<Spritesheet>,
    pub sequences: HashMap<String, Sequence>,
}

impl AnimationBank {
    pub fn spritesheet(&self, id: &str) -> Option<&Spritesheet> {
        self.spritesheets.iter().find(|s| s.id == id)
    }

    /// Source rectangle for `sequence`'s local `frame_index` (0-based within
    /// the sequence, wrapping at `count` if the sequence loops).
    pub fn frame_src_rect(&self, sequence_name: &str, frame_index: u32) -> Option<SrcRect> {
        let seq = self.sequences.get(sequence_name)?;
        let sheet = self.spritesheet(&seq.spritesheet_id)?;
        let local = if seq.r#loop && seq.count > 0 {
            frame_index % seq.count
        } else {
            frame_index.min(seq.count.saturating_sub(1))
        };
        Some(sheet.src_rect(seq.start_frame + local))
    }
}
