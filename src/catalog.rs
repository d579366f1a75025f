use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{PhotoboothError, PhotoboothResult};

/// Opaque key naming one decorative frame template.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(String);

impl FrameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FrameId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FrameId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Target size, in pixels, of every tile in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSize {
    pub width: u32,
    pub height: u32,
}

impl TileSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Geometry record that fully determines where photos land inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutParams {
    /// Size every source photo is cropped and scaled to.
    pub tile_size: TileSize,
    /// Vertical gap between stacked tiles within a column.
    pub inter_tile_padding: u32,
    /// Horizontal gap between the two columns.
    pub column_gutter: u32,
    /// Rows inserted above the tiled block before centering.
    pub top_padding: u32,
    /// Photo index separating the first column from the second, for dual-column layouts.
    #[serde(default)]
    pub split_index: Option<usize>,
}

impl LayoutParams {
    /// Reject parameter records that can never produce a canvas.
    pub fn validate(&self) -> PhotoboothResult<()> {
        if self.tile_size.width == 0 || self.tile_size.height == 0 {
            return Err(PhotoboothError::geometry(format!(
                "tile size must be non-zero, got {}x{}",
                self.tile_size.width, self.tile_size.height
            )));
        }
        if self.split_index == Some(0) {
            return Err(PhotoboothError::geometry(
                "split index 0 leaves the second column empty",
            ));
        }
        Ok(())
    }
}

/// The family of frame designs a frame identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", content = "params", rename_all = "snake_case")]
pub enum LayoutVariant {
    /// One stack of six-frame tiles, shown twice side by side.
    SingleColumnSix,
    /// Two stacks of three tiles, each built from a different half of the takes.
    DualColumnSixTakes,
    /// One stack of eight-frame tiles, shown twice side by side.
    SingleColumnEight,
    /// Eight-frame layout for templates with elliptical windows.
    SingleColumnEightEllipse,
    /// Any other geometry, described entirely by data.
    Custom(LayoutParams),
}

impl LayoutVariant {
    pub fn params(&self) -> LayoutParams {
        match self {
            LayoutVariant::SingleColumnSix => LayoutParams {
                tile_size: TileSize::new(993, 945),
                inter_tile_padding: 94,
                column_gutter: 188,
                top_padding: 83,
                split_index: None,
            },
            LayoutVariant::DualColumnSixTakes => LayoutParams {
                tile_size: TileSize::new(993, 945),
                inter_tile_padding: 94,
                column_gutter: 188,
                top_padding: 83,
                split_index: Some(3),
            },
            LayoutVariant::SingleColumnEight => LayoutParams {
                tile_size: TileSize::new(992, 781),
                inter_tile_padding: 22,
                column_gutter: 188,
                top_padding: 71,
                split_index: None,
            },
            LayoutVariant::SingleColumnEightEllipse => LayoutParams {
                tile_size: TileSize::new(1022, 716),
                inter_tile_padding: 87,
                column_gutter: 158,
                top_padding: 172,
                split_index: None,
            },
            LayoutVariant::Custom(params) => *params,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayoutVariant::SingleColumnSix => "single_column_six",
            LayoutVariant::DualColumnSixTakes => "dual_column_six_takes",
            LayoutVariant::SingleColumnEight => "single_column_eight",
            LayoutVariant::SingleColumnEightEllipse => "single_column_eight_ellipse",
            LayoutVariant::Custom(_) => "custom",
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    frames: BTreeMap<FrameId, LayoutVariant>,
}

/// Static table mapping each frame identifier to its layout variant.
#[derive(Debug, Clone, Default)]
pub struct LayoutCatalog {
    frames: BTreeMap<FrameId, LayoutVariant>,
}

impl LayoutCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from its JSON document form.
    pub fn from_json_str(json: &str) -> PhotoboothResult<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for (frame_id, variant) in document.frames {
            catalog.insert(frame_id, variant)?;
        }
        Ok(catalog)
    }

    /// Load a catalog from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> PhotoboothResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize the catalog back to its JSON document form.
    pub fn to_json_string(&self) -> PhotoboothResult<String> {
        let document = CatalogDocument {
            frames: self.frames.clone(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Register a frame, validating its geometry.
    pub fn insert(
        &mut self,
        frame_id: impl Into<FrameId>,
        variant: LayoutVariant,
    ) -> PhotoboothResult<()> {
        variant.params().validate()?;
        self.frames.insert(frame_id.into(), variant);
        Ok(())
    }

    /// Builder-style [`LayoutCatalog::insert`].
    pub fn with_frame(
        mut self,
        frame_id: impl Into<FrameId>,
        variant: LayoutVariant,
    ) -> PhotoboothResult<Self> {
        self.insert(frame_id, variant)?;
        Ok(self)
    }

    /// Look up the variant for a frame identifier.
    pub fn resolve(&self, frame_id: &FrameId) -> PhotoboothResult<LayoutVariant> {
        self.frames
            .get(frame_id)
            .copied()
            .ok_or_else(|| PhotoboothError::UnknownFrame {
                frame_id: frame_id.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FrameId, &LayoutVariant)> {
        self.frames.iter()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
