use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::SetupError;
use crate::geom::Rect;
use crate::render::TextureId;

/// Serialized sprite-sheet definition, loaded from a JSON file next to
/// the texture it describes.
#[derive(Clone, Debug, Deserialize)]
pub struct SpriteSheetDef {
    pub texture: String,
    pub frame_width: i32,
    pub frame_height: i32,
    pub animations: HashMap<String, ClipDef>,
}

/// One animation clip: a run of frames on a single atlas row.
#[derive(Clone, Debug, Deserialize)]
pub struct ClipDef {
    pub row: i32,
    #[serde(default)]
    pub start_column: i32,
    pub frame_count: i32,
    pub frame_duration_ms: u64,
    #[serde(default)]
    pub looped: bool,
}

impl SpriteSheetDef {
    pub fn load(path: &Path) -> Result<Self, SetupError> {
        let file = File::open(path).map_err(|source| SetupError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_reader(file).map_err(|source| SetupError::SpriteSheet {
            path: path.display().to_string(),
            source,
        })
    }
}

#[derive(Clone, Debug)]
struct AnimationClip {
    frames: Vec<Rect>,
    frame_duration_ms: u64,
    looped: bool,
}

/// Animation state over a texture atlas. Tracks which clip is active
/// and which frame it is on; mutates nothing but its own frame index.
#[derive(Clone, Debug)]
pub struct SpriteAnimation {
    texture: TextureId,
    frame_width: i32,
    frame_height: i32,
    clips: HashMap<String, AnimationClip>,
    active: Option<String>,
    activated_at_ms: u64,
    current_frame: usize,
}

impl SpriteAnimation {
    pub fn from_def(def: &SpriteSheetDef, texture: TextureId) -> Self {
        let mut clips = HashMap::new();
        for (name, clip) in &def.animations {
            let mut frames = Vec::new();
            for i in 0..clip.frame_count {
                frames.push(Rect::new(
                    (clip.start_column + i) * def.frame_width,
                    clip.row * def.frame_height,
                    def.frame_width,
                    def.frame_height,
                ));
            }
            clips.insert(
                name.clone(),
                AnimationClip {
                    frames,
                    frame_duration_ms: clip.frame_duration_ms.max(1),
                    looped: clip.looped,
                },
            );
        }

        Self {
            texture,
            frame_width: def.frame_width,
            frame_height: def.frame_height,
            clips,
            active: None,
            activated_at_ms: 0,
            current_frame: 0,
        }
    }

    /// Start the named clip from frame 0. Unknown names are a silent
    /// no-op so a stale animation reference never takes down a frame.
    pub fn activate(&mut self, name: &str, now_ms: u64) {
        if !self.clips.contains_key(name) {
            debug!("unknown animation clip '{}', ignoring", name);
            return;
        }
        self.active = Some(name.to_string());
        self.activated_at_ms = now_ms;
        self.current_frame = 0;
    }

    pub fn active_clip(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Advance the frame index for the current time. Looping clips
    /// wrap, one-shot clips hold their last frame.
    pub fn update(&mut self, now_ms: u64) {
        let Some(name) = &self.active else { return };
        let clip = &self.clips[name];
        if clip.frames.is_empty() {
            return;
        }

        let elapsed = now_ms.saturating_sub(self.activated_at_ms);
        let index = (elapsed / clip.frame_duration_ms) as usize;
        self.current_frame = if clip.looped {
            index % clip.frames.len()
        } else {
            index.min(clip.frames.len() - 1)
        };
    }

    /// True once a one-shot clip has played through all its frames.
    /// Looping clips never finish.
    pub fn finished(&self, now_ms: u64) -> bool {
        let Some(name) = &self.active else { return true };
        let clip = &self.clips[name];
        if clip.looped {
            return false;
        }
        let elapsed = now_ms.saturating_sub(self.activated_at_ms);
        elapsed >= clip.frame_duration_ms * clip.frames.len() as u64
    }

    /// Source rectangle of the current frame, if a clip is active.
    pub fn frame_rect(&self) -> Option<Rect> {
        let name = self.active.as_ref()?;
        self.clips[name].frames.get(self.current_frame).copied()
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    pub fn frame_width(&self) -> i32 {
        self.frame_width
    }

    pub fn frame_height(&self) -> i32 {
        self.frame_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> SpriteSheetDef {
        let mut animations = HashMap::new();
        animations.insert(
            "Walk".to_string(),
            ClipDef {
                row: 1,
                start_column: 0,
                frame_count: 4,
                frame_duration_ms: 100,
                looped: true,
            },
        );
        animations.insert(
            "Swing".to_string(),
            ClipDef {
                row: 2,
                start_column: 2,
                frame_count: 3,
                frame_duration_ms: 100,
                looped: false,
            },
        );
        SpriteSheetDef {
            texture: "hero.png".to_string(),
            frame_width: 48,
            frame_height: 48,
            animations,
        }
    }

    #[test]
    fn activate_unknown_clip_is_a_noop() {
        let mut anim = SpriteAnimation::from_def(&sheet(), 0);
        anim.activate("Walk", 0);
        anim.activate("NoSuchClip", 500);
        assert_eq!(anim.active_clip(), Some("Walk"));
        assert_eq!(anim.frame_rect(), Some(Rect::new(0, 48, 48, 48)));
    }

    #[test]
    fn looping_clip_wraps() {
        let mut anim = SpriteAnimation::from_def(&sheet(), 0);
        anim.activate("Walk", 0);

        anim.update(250);
        assert_eq!(anim.frame_rect(), Some(Rect::new(96, 48, 48, 48)));

        // 4 frames x 100ms, so t=450 lands back on frame 0
        anim.update(450);
        assert_eq!(anim.frame_rect(), Some(Rect::new(0, 48, 48, 48)));
        assert!(!anim.finished(10_000));
    }

    #[test]
    fn one_shot_clip_holds_last_frame_and_finishes() {
        let mut anim = SpriteAnimation::from_def(&sheet(), 1);
        anim.activate("Swing", 1000);

        anim.update(1950);
        assert_eq!(anim.frame_rect(), Some(Rect::new(192, 96, 48, 48)));
        assert!(!anim.finished(1299));
        assert!(anim.finished(1300));

        // Holds on the last frame well past the end
        anim.update(5000);
        assert_eq!(anim.frame_rect(), Some(Rect::new(192, 96, 48, 48)));
    }

    #[test]
    fn frames_start_at_the_clip_start_column() {
        let mut anim = SpriteAnimation::from_def(&sheet(), 0);
        anim.activate("Swing", 0);
        assert_eq!(anim.frame_rect(), Some(Rect::new(96, 96, 48, 48)));
    }
}
