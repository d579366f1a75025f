use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{RgbImage, RgbaImage};

use crate::canvas::{hconcat, make_padding, vconcat};
use crate::catalog::{FrameId, LayoutCatalog, LayoutParams, LayoutVariant};
use crate::overlay::overlay_transparent;
use crate::tile::compile_column;
use crate::{PhotoboothError, PhotoboothResult};

/// Source of decoded frame templates.
pub trait FrameAssetStore: Send + Sync {
    fn load(&self, frame_id: &FrameId) -> PhotoboothResult<RgbaImage>;
}

/// Reads `frame-<id>.png` files from a directory.
#[derive(Debug, Clone)]
pub struct DirectoryFrameStore {
    root: PathBuf,
}

impl DirectoryFrameStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn asset_path(&self, frame_id: &FrameId) -> PathBuf {
        self.root.join(format!("frame-{frame_id}.png"))
    }
}

impl FrameAssetStore for DirectoryFrameStore {
    fn load(&self, frame_id: &FrameId) -> PhotoboothResult<RgbaImage> {
        let path = self.asset_path(frame_id);
        if !path.is_file() {
            return Err(PhotoboothError::FrameAssetNotFound { path });
        }
        let image = image::open(&path)
            .map_err(|source| PhotoboothError::DecodeFailure {
                path: path.clone(),
                source,
            })?
            .to_rgba8();
        Ok(image)
    }
}

/// Frame templates held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFrameStore {
    frames: HashMap<FrameId, RgbaImage>,
}

impl InMemoryFrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame(mut self, frame_id: impl Into<FrameId>, image: RgbaImage) -> Self {
        self.frames.insert(frame_id.into(), image);
        self
    }
}

impl FrameAssetStore for InMemoryFrameStore {
    fn load(&self, frame_id: &FrameId) -> PhotoboothResult<RgbaImage> {
        self.frames
            .get(frame_id)
            .cloned()
            .ok_or_else(|| PhotoboothError::FrameAssetNotFound {
                path: PathBuf::from(format!("memory://frame-{frame_id}")),
            })
    }
}

/// Steps a frame compilation walks through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStage {
    SelectVariant,
    BuildColumns,
    AssembleColumns,
    PadToCanvas,
    Overlay,
}

impl fmt::Display for CompileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompileStage::SelectVariant => "select-variant",
            CompileStage::BuildColumns => "build-columns",
            CompileStage::AssembleColumns => "assemble-columns",
            CompileStage::PadToCanvas => "pad-to-canvas",
            CompileStage::Overlay => "overlay",
        };
        f.write_str(name)
    }
}

/// Left and right padding widths that center a block in `width_diff` spare columns.
///
/// The left side takes the extra pixel when the remainder is odd.
pub fn side_padding(width_diff: i64) -> (i64, i64) {
    let right = width_diff.div_euclid(2);
    (width_diff - right, right)
}

/// Build the column buffers for one layout: one column, or two split at `split_index`.
///
/// The second part of the split becomes the left column.
pub fn build_columns(
    params: &LayoutParams,
    photos: &[RgbImage],
    filter: FilterType,
) -> PhotoboothResult<Vec<RgbImage>> {
    if photos.is_empty() {
        return Err(PhotoboothError::EmptyPhotoSet);
    }
    let tile = params.tile_size;
    let padding = params.inter_tile_padding;
    match params.split_index {
        Some(split) => {
            let (head, tail) = photos.split_at(split.min(photos.len()));
            let left = compile_column(tail, tile, padding, filter)?;
            let right = compile_column(head, tile, padding, filter)?;
            Ok(vec![left, right])
        }
        None => Ok(vec![compile_column(photos, tile, padding, filter)?]),
    }
}

/// Join columns with a black gutter. A lone column is placed twice.
pub fn assemble_columns(columns: &[RgbImage], gutter: u32) -> PhotoboothResult<RgbImage> {
    let (left, right) = match columns {
        [only] => (only, only),
        [left, right] => (left, right),
        _ => {
            return Err(PhotoboothError::geometry(format!(
                "expected one or two columns, got {}",
                columns.len()
            )));
        }
    };
    let strip = make_padding(gutter as i64, left.height() as i64)?;
    hconcat(&[left, &strip, right])
}

/// Pad the assembled block with black until it is exactly `target` sized.
pub fn pad_to_canvas(
    block: &RgbImage,
    top_padding: u32,
    target: (u32, u32),
) -> PhotoboothResult<RgbImage> {
    let (target_w, target_h) = target;
    let top = top_padding as i64;

    let height_diff = target_h as i64 - block.height() as i64;
    if height_diff < top {
        return Err(PhotoboothError::geometry(format!(
            "frame height {target_h} leaves {height_diff} spare rows for a {}-row block, \
             fewer than the {top} rows of top padding",
            block.height()
        )));
    }
    let top_strip = make_padding(block.width() as i64, top)?;
    let bottom_strip = make_padding(block.width() as i64, height_diff - top)?;
    let stacked = vconcat(&[&top_strip, block, &bottom_strip])?;

    let width_diff = target_w as i64 - stacked.width() as i64;
    if width_diff < 0 {
        return Err(PhotoboothError::geometry(format!(
            "frame width {target_w} is narrower than the {}-pixel block",
            stacked.width()
        )));
    }
    let (left, right) = side_padding(width_diff);
    let left_strip = make_padding(left, stacked.height() as i64)?;
    let right_strip = make_padding(right, stacked.height() as i64)?;
    let canvas = hconcat(&[&left_strip, &stacked, &right_strip])?;

    if canvas.dimensions() != target {
        return Err(PhotoboothError::DimensionMismatch {
            expected: target,
            found: canvas.dimensions(),
        });
    }
    Ok(canvas)
}

/// Tile, assemble and pad a photo set into a canvas of exactly `target` size, before any overlay.
pub fn build_canvas(
    params: &LayoutParams,
    photos: &[RgbImage],
    target: (u32, u32),
    filter: FilterType,
) -> PhotoboothResult<RgbImage> {
    tracing::debug!(stage = %CompileStage::BuildColumns, photos = photos.len());
    let columns = build_columns(params, photos, filter)?;

    tracing::debug!(stage = %CompileStage::AssembleColumns, columns = columns.len());
    let block = assemble_columns(&columns, params.column_gutter)?;

    tracing::debug!(
        stage = %CompileStage::PadToCanvas,
        block_width = block.width(),
        block_height = block.height(),
        target_width = target.0,
        target_height = target.1
    );
    pad_to_canvas(&block, params.top_padding, target)
}

/// A resolved frame: its template artwork and the geometry that fits it.
#[derive(Debug, Clone)]
pub struct FrameAsset {
    pub frame_id: FrameId,
    pub variant: LayoutVariant,
    pub image: RgbaImage,
}

/// Lays photo sets into frame templates.
#[derive(Clone)]
pub struct FrameCompiler<S> {
    catalog: LayoutCatalog,
    store: S,
    resize_filter: FilterType,
}

impl<S: FrameAssetStore> FrameCompiler<S> {
    pub fn new(catalog: LayoutCatalog, store: S) -> Self {
        Self {
            catalog,
            store,
            resize_filter: FilterType::Lanczos3,
        }
    }

    /// Set the filter used to scale photos to the tile size.
    pub fn with_resize_filter(mut self, filter: FilterType) -> Self {
        self.resize_filter = filter;
        self
    }

    /// Swap the frame asset store, keeping the catalog and filter.
    pub fn with_store<T: FrameAssetStore>(self, store: T) -> FrameCompiler<T> {
        FrameCompiler {
            catalog: self.catalog,
            store,
            resize_filter: self.resize_filter,
        }
    }

    pub fn catalog(&self) -> &LayoutCatalog {
        &self.catalog
    }

    /// Resolve a frame identifier to its variant and template.
    pub fn resolve(&self, frame_id: &FrameId) -> PhotoboothResult<FrameAsset> {
        let variant = self.catalog.resolve(frame_id)?;
        let image = self.store.load(frame_id)?;
        Ok(FrameAsset {
            frame_id: frame_id.clone(),
            variant,
            image,
        })
    }

    /// Compile an ordered photo set into the frame named by `frame_id`.
    #[tracing::instrument(skip(self, photos), fields(photos = photos.len()))]
    pub fn compile(&self, frame_id: &FrameId, photos: &[RgbImage]) -> PhotoboothResult<RgbImage> {
        tracing::debug!(stage = %CompileStage::SelectVariant);
        let asset = self.resolve(frame_id)?;
        self.compile_with_asset(&asset, photos)
    }

    /// Compile against an already resolved frame, so one template can serve many photo sets.
    pub fn compile_with_asset(
        &self,
        asset: &FrameAsset,
        photos: &[RgbImage],
    ) -> PhotoboothResult<RgbImage> {
        let params = asset.variant.params();
        let canvas = build_canvas(&params, photos, asset.image.dimensions(), self.resize_filter)?;

        tracing::debug!(stage = %CompileStage::Overlay, variant = asset.variant.name());
        overlay_transparent(&canvas, &asset.image)
    }
}
