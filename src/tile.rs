use image::imageops::{self, FilterType};
use image::{GenericImage, RgbImage};
use rayon::prelude::*;

use crate::catalog::TileSize;
use crate::{PhotoboothError, PhotoboothResult};

/// Region of the source image kept before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Centered crop of a `width` x `height` source whose aspect ratio matches `tile`.
///
/// The longer side (relative to the target aspect) is trimmed evenly from both ends.
pub fn center_crop_rect(width: u32, height: u32, tile: TileSize) -> PhotoboothResult<CropRect> {
    if width == 0 || height == 0 {
        return Err(PhotoboothError::geometry(format!(
            "cannot crop an empty {width}x{height} photo"
        )));
    }
    if tile.width == 0 || tile.height == 0 {
        return Err(PhotoboothError::geometry(format!(
            "tile size must be non-zero, got {}x{}",
            tile.width, tile.height
        )));
    }

    let (w, h) = (width as u64, height as u64);
    let (tw, th) = (tile.width as u64, tile.height as u64);

    let rect = if w * th > h * tw {
        // wider than the tile: trim left and right
        let crop_w = ((h * tw) / th) as u32;
        CropRect {
            x: (width - crop_w) / 2,
            y: 0,
            width: crop_w,
            height,
        }
    } else {
        // taller than (or as wide as) the tile: trim top and bottom
        let crop_h = ((w * th) / tw) as u32;
        CropRect {
            x: 0,
            y: (height - crop_h) / 2,
            width,
            height: crop_h,
        }
    };

    if rect.width == 0 || rect.height == 0 {
        return Err(PhotoboothError::geometry(format!(
            "{width}x{height} photo is too small for a {}x{} tile",
            tile.width, tile.height
        )));
    }
    Ok(rect)
}

/// Crop a photo to the tile aspect ratio around its center, then scale it to the exact tile size.
pub fn resize_to_tile(
    image: &RgbImage,
    tile: TileSize,
    filter: FilterType,
) -> PhotoboothResult<RgbImage> {
    let rect = center_crop_rect(image.width(), image.height(), tile)?;
    let cropped = imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image();
    if cropped.dimensions() == (tile.width, tile.height) {
        return Ok(cropped);
    }
    Ok(imageops::resize(&cropped, tile.width, tile.height, filter))
}

/// Height of a column of `count` tiles separated by `padding` rows.
pub fn column_height(count: usize, tile: TileSize, padding: u32) -> u64 {
    if count == 0 {
        return 0;
    }
    let count = count as u64;
    count * tile.height as u64 + (count - 1) * padding as u64
}

/// Resize every photo to `tile` and stack them top to bottom, `padding` black rows apart.
///
/// Tiles are resized in parallel; the stacking is a single pass in input order.
pub fn compile_column(
    images: &[RgbImage],
    tile: TileSize,
    padding: u32,
    filter: FilterType,
) -> PhotoboothResult<RgbImage> {
    if images.is_empty() {
        return Err(PhotoboothError::EmptyPhotoSet);
    }

    let tiles = images
        .par_iter()
        .map(|image| resize_to_tile(image, tile, filter))
        .collect::<PhotoboothResult<Vec<_>>>()?;

    let max_width = tiles.iter().map(|t| t.width()).max().unwrap_or(0);
    let total_height = u32::try_from(column_height(tiles.len(), tile, padding))
        .map_err(|_| PhotoboothError::geometry("column exceeds u32 pixels"))?;

    let mut column = RgbImage::new(max_width, total_height);
    let mut y = 0u32;
    for tile_image in &tiles {
        column.copy_from(tile_image, 0, y)?;
        y += tile_image.height() + padding;
    }

    tracing::trace!(
        tiles = tiles.len(),
        width = column.width(),
        height = column.height(),
        "column compiled"
    );
    Ok(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(w: u32, h: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb(color))
    }

    mod center_crop_rect {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn wide_source_is_trimmed_horizontally() {
                let rect = center_crop_rect(200, 100, TileSize::new(100, 100)).unwrap();
                assert_eq!(
                    rect,
                    CropRect {
                        x: 50,
                        y: 0,
                        width: 100,
                        height: 100
                    }
                );
            }

            #[test]
            fn tall_source_is_trimmed_vertically() {
                let rect = center_crop_rect(100, 300, TileSize::new(50, 100)).unwrap();
                assert_eq!(
                    rect,
                    CropRect {
                        x: 0,
                        y: 50,
                        width: 100,
                        height: 200
                    }
                );
            }

            #[test]
            fn matching_aspect_keeps_everything() {
                let rect = center_crop_rect(993, 945, TileSize::new(993, 945)).unwrap();
                assert_eq!(
                    rect,
                    CropRect {
                        x: 0,
                        y: 0,
                        width: 993,
                        height: 945
                    }
                );
            }

            #[test]
            fn empty_source_is_invalid() {
                let err = center_crop_rect(0, 10, TileSize::new(5, 5)).unwrap_err();
                assert!(matches!(err, PhotoboothError::InvalidGeometry(_)));
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                /// center_crop_rect: the crop stays inside the source and is centered
                #[test]
                fn crop_is_inside_and_centered(
                    w in 1u32..400,
                    h in 1u32..400,
                    tw in 1u32..50,
                    th in 1u32..50
                ) {
                    if let Ok(rect) = center_crop_rect(w, h, TileSize::new(tw, th)) {
                        prop_assert!(rect.x + rect.width <= w);
                        prop_assert!(rect.y + rect.height <= h);
                        let right = w - rect.x - rect.width;
                        let bottom = h - rect.y - rect.height;
                        prop_assert!(right == rect.x || right == rect.x + 1);
                        prop_assert!(bottom == rect.y || bottom == rect.y + 1);
                    }
                }
            }
        }
    }

    mod compile_column {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn empty_input_is_empty_photo_set() {
                let err =
                    compile_column(&[], TileSize::new(4, 4), 2, FilterType::Nearest).unwrap_err();
                assert!(matches!(err, PhotoboothError::EmptyPhotoSet));
            }

            #[test]
            fn tiles_keep_input_order_with_black_gaps() {
                let images = vec![
                    solid(8, 6, [255, 0, 0]),
                    solid(30, 20, [0, 255, 0]),
                    solid(5, 9, [0, 0, 255]),
                ];
                let tile = TileSize::new(4, 3);
                let column = compile_column(&images, tile, 2, FilterType::Nearest).unwrap();

                assert_eq!(column.dimensions(), (4, 3 * 3 + 2 * 2));
                assert_eq!(column.get_pixel(0, 0).0, [255, 0, 0]);
                assert_eq!(column.get_pixel(3, 2).0, [255, 0, 0]);
                // gap rows between the first and second tile
                assert_eq!(column.get_pixel(0, 3).0, [0, 0, 0]);
                assert_eq!(column.get_pixel(3, 4).0, [0, 0, 0]);
                assert_eq!(column.get_pixel(1, 5).0, [0, 255, 0]);
                assert_eq!(column.get_pixel(2, 7).0, [0, 255, 0]);
                assert_eq!(column.get_pixel(2, 9).0, [0, 0, 0]);
                assert_eq!(column.get_pixel(0, 10).0, [0, 0, 255]);
                assert_eq!(column.get_pixel(3, 12).0, [0, 0, 255]);
            }

            #[test]
            fn single_tile_has_no_padding() {
                let column = compile_column(
                    &[solid(10, 10, [1, 2, 3])],
                    TileSize::new(5, 5),
                    100,
                    FilterType::Triangle,
                )
                .unwrap();
                assert_eq!(column.dimensions(), (5, 5));
            }

            #[test]
            fn resize_keeps_center_content() {
                // left and right thirds red, middle third green; the square crop keeps only green
                let mut image = solid(30, 10, [255, 0, 0]);
                for y in 0..10 {
                    for x in 10..20 {
                        image.put_pixel(x, y, Rgb([0, 255, 0]));
                    }
                }
                let tile = resize_to_tile(&image, TileSize::new(5, 5), FilterType::Nearest).unwrap();
                assert_eq!(tile.dimensions(), (5, 5));
                assert!(tile.pixels().all(|p| p.0 == [0, 255, 0]));
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                #![proptest_config(ProptestConfig::with_cases(32))]

                /// compile_column: height is N*H + (N-1)*P and width is the tile width
                #[test]
                fn column_geometry(
                    count in 1usize..6,
                    tw in 1u32..12,
                    th in 1u32..12,
                    padding in 0u32..8,
                    src_w in 1u32..40,
                    src_h in 1u32..40
                ) {
                    let tile = TileSize::new(tw, th);
                    prop_assume!(center_crop_rect(src_w, src_h, tile).is_ok());
                    let images = vec![solid(src_w, src_h, [50, 60, 70]); count];
                    let column = compile_column(&images, tile, padding, FilterType::Triangle).unwrap();

                    prop_assert_eq!(column.width(), tw);
                    prop_assert_eq!(
                        column.height(),
                        count as u32 * th + (count as u32 - 1) * padding
                    );
                }
            }
        }
    }
}
