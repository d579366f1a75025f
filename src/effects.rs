use std::fmt;
use std::str::FromStr;

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::{PhotoboothError, PhotoboothResult};

/// Named visual effect; also the name of the effect's result directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Original,
    LightGrayscale,
    Sepia,
    Summer,
    Winter,
    Invert,
}

impl Effect {
    pub const ALL: [Effect; 6] = [
        Effect::Original,
        Effect::LightGrayscale,
        Effect::Sepia,
        Effect::Summer,
        Effect::Winter,
        Effect::Invert,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Effect::Original => "original",
            Effect::LightGrayscale => "light_grayscale",
            Effect::Sepia => "sepia",
            Effect::Summer => "summer",
            Effect::Winter => "winter",
            Effect::Invert => "invert",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Effect {
    type Err = PhotoboothError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Effect::ALL
            .into_iter()
            .find(|effect| effect.name() == s)
            .ok_or_else(|| PhotoboothError::UnknownEffect(s.to_string()))
    }
}

/// Produces effect variants of a captured photo. Outputs keep the input dimensions.
pub trait EffectsProvider: Send + Sync {
    fn apply(&self, effect: Effect, photo: &RgbImage) -> PhotoboothResult<RgbImage>;
}

/// Deterministic per-pixel colour transforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEffects;

impl EffectsProvider for StandardEffects {
    fn apply(&self, effect: Effect, photo: &RgbImage) -> PhotoboothResult<RgbImage> {
        let out = match effect {
            Effect::Original => photo.clone(),
            Effect::LightGrayscale => map_pixels(photo, grayscale),
            Effect::Sepia => map_pixels(photo, sepia),
            Effect::Summer => {
                let (warm, cool) = (raise_curve(), lower_curve());
                map_pixels(photo, |[r, g, b]| {
                    [warm[r as usize], g, cool[b as usize]]
                })
            }
            Effect::Winter => {
                let (warm, cool) = (raise_curve(), lower_curve());
                map_pixels(photo, |[r, g, b]| {
                    [cool[r as usize], g, warm[b as usize]]
                })
            }
            Effect::Invert => map_pixels(photo, |[r, g, b]| [!r, !g, !b]),
        };
        Ok(out)
    }
}

fn map_pixels(photo: &RgbImage, f: impl Fn([u8; 3]) -> [u8; 3]) -> RgbImage {
    let (w, h) = photo.dimensions();
    let mut out = RgbImage::new(w, h);
    for (src, dst) in photo.pixels().zip(out.pixels_mut()) {
        *dst = Rgb(f(src.0));
    }
    out
}

fn grayscale([r, g, b]: [u8; 3]) -> [u8; 3] {
    // ITU-R BT.601 luma, fixed point
    let luma = (299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000;
    let luma = luma.min(255) as u8;
    [luma, luma, luma]
}

fn sepia([r, g, b]: [u8; 3]) -> [u8; 3] {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let channel = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    [
        channel(0.393 * r + 0.769 * g + 0.189 * b),
        channel(0.349 * r + 0.686 * g + 0.168 * b),
        channel(0.272 * r + 0.534 * g + 0.131 * b),
    ]
}

const CURVE_INPUTS: [f32; 4] = [0.0, 64.0, 128.0, 256.0];

fn raise_curve() -> [u8; 256] {
    lookup_table(&CURVE_INPUTS, &[0.0, 80.0, 160.0, 256.0])
}

fn lower_curve() -> [u8; 256] {
    lookup_table(&CURVE_INPUTS, &[0.0, 50.0, 100.0, 256.0])
}

/// Piecewise-linear tone curve through the given control points.
fn lookup_table(xs: &[f32], ys: &[f32]) -> [u8; 256] {
    let mut table = [0u8; 256];
    for (i, slot) in table.iter_mut().enumerate() {
        let x = i as f32;
        let segment = xs
            .windows(2)
            .position(|w| x >= w[0] && x <= w[1])
            .unwrap_or(xs.len().saturating_sub(2));
        let (x0, x1) = (xs[segment], xs[segment + 1]);
        let (y0, y1) = (ys[segment], ys[segment + 1]);
        let t = if x1 > x0 { (x - x0) / (x1 - x0) } else { 0.0 };
        *slot = (y0 + t * (y1 - y0)).round().clamp(0.0, 255.0) as u8;
    }
    table
}
