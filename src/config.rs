use std::path::PathBuf;
use std::time::Duration;

use image::imageops::FilterType;

use crate::effects::Effect;

/// How long each frame of the preview animation stays on screen.
pub const DEFAULT_ANIMATION_DELAY: Duration = Duration::from_millis(1500);
/// GIF quantizer speed, 1 (best) to 30 (fastest).
pub const DEFAULT_GIF_SPEED: i32 = 10;

/// Options for a photobooth session: where files live and what gets produced.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Root of the captured photos, one sub-directory per transaction.
    pub source_root: PathBuf,
    /// Root of the generated results, one sub-directory per transaction.
    pub result_root: PathBuf,
    /// Directory holding the `frame-<id>.png` templates.
    pub frame_dir: PathBuf,
    /// Effects to produce, in output order.
    pub effects: Vec<Effect>,
    /// Per-frame delay of the preview animation.
    pub animation_delay: Duration,
    /// GIF encoder speed.
    pub gif_speed: i32,
    /// Filter used to scale photos to the tile size.
    pub resize_filter: FilterType,
    /// File name of the compiled composite inside each effect directory.
    pub compiled_file_name: String,
    /// File name of the preview animation inside each effect directory.
    pub animation_file_name: String,
}

impl PipelineSettings {
    /// Create settings for the given directories with default values otherwise.
    pub fn new(
        source_root: impl Into<PathBuf>,
        result_root: impl Into<PathBuf>,
        frame_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            result_root: result_root.into(),
            frame_dir: frame_dir.into(),
            ..Self::default()
        }
    }

    /// Set the effects to produce.
    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects = effects.into_iter().collect();
        self
    }

    /// Set the per-frame delay of the preview animation.
    pub fn with_animation_delay(mut self, delay: Duration) -> Self {
        self.animation_delay = delay;
        self
    }

    /// Set the GIF encoder speed (clamped to 1..=30).
    pub fn with_gif_speed(mut self, speed: i32) -> Self {
        self.gif_speed = speed.clamp(1, 30);
        self
    }

    /// Set the filter used to scale photos to the tile size.
    pub fn with_resize_filter(mut self, filter: FilterType) -> Self {
        self.resize_filter = filter;
        self
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("captures"),
            result_root: PathBuf::from("results"),
            frame_dir: PathBuf::from("frames"),
            effects: vec![
                Effect::Original,
                Effect::LightGrayscale,
                Effect::Sepia,
                Effect::Summer,
            ],
            animation_delay: DEFAULT_ANIMATION_DELAY,
            gif_speed: DEFAULT_GIF_SPEED,
            resize_filter: FilterType::Lanczos3,
            compiled_file_name: "compiled.jpg".to_string(),
            animation_file_name: "compiled.gif".to_string(),
        }
    }
}
