use image::{GenericImage, RgbImage};

use crate::{PhotoboothError, PhotoboothResult};

/// Allocate a black RGB block of exactly `width` x `height` pixels.
///
/// Zero-sized blocks are legal. Negative sizes mean the layout does not fit
/// the frame asset and are reported as [`PhotoboothError::InvalidGeometry`].
pub fn make_padding(width: i64, height: i64) -> PhotoboothResult<RgbImage> {
    if width < 0 || height < 0 {
        return Err(PhotoboothError::geometry(format!(
            "padding block of {width}x{height} has a negative side"
        )));
    }
    let width = u32::try_from(width)
        .map_err(|_| PhotoboothError::geometry(format!("padding width {width} is too large")))?;
    let height = u32::try_from(height)
        .map_err(|_| PhotoboothError::geometry(format!("padding height {height} is too large")))?;
    Ok(RgbImage::new(width, height))
}

/// Place buffers of equal height next to each other, left to right.
pub fn hconcat(parts: &[&RgbImage]) -> PhotoboothResult<RgbImage> {
    let height = parts.first().map(|p| p.height()).unwrap_or(0);
    let mut width = 0u32;
    for part in parts {
        if part.height() != height {
            return Err(PhotoboothError::DimensionMismatch {
                expected: (part.width(), height),
                found: part.dimensions(),
            });
        }
        width = checked_extent(width, part.width())?;
    }

    let mut out = RgbImage::new(width, height);
    let mut x = 0;
    for part in parts {
        out.copy_from(*part, x, 0)?;
        x += part.width();
    }
    Ok(out)
}

/// Stack buffers of equal width on top of each other, top to bottom.
pub fn vconcat(parts: &[&RgbImage]) -> PhotoboothResult<RgbImage> {
    let width = parts.first().map(|p| p.width()).unwrap_or(0);
    let mut height = 0u32;
    for part in parts {
        if part.width() != width {
            return Err(PhotoboothError::DimensionMismatch {
                expected: (width, part.height()),
                found: part.dimensions(),
            });
        }
        height = checked_extent(height, part.height())?;
    }

    let mut out = RgbImage::new(width, height);
    let mut y = 0;
    for part in parts {
        out.copy_from(*part, 0, y)?;
        y += part.height();
    }
    Ok(out)
}

fn checked_extent(total: u32, add: u32) -> PhotoboothResult<u32> {
    total
        .checked_add(add)
        .ok_or_else(|| PhotoboothError::geometry("concatenated canvas exceeds u32 pixels"))
}
