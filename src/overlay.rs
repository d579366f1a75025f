use image::{GrayImage, Luma, Rgb, RgbImage, RgbaImage};
use imageproc::filter::median_filter;

use crate::{PhotoboothError, PhotoboothResult};

/// Radius of the median window applied to the frame alpha (a 5x5 neighbourhood).
pub const MASK_MEDIAN_RADIUS: u32 = 2;

/// Extract the frame's alpha channel and median-filter it to drop single-pixel noise at cut-out edges.
pub fn frame_mask(frame: &RgbaImage) -> GrayImage {
    let (w, h) = frame.dimensions();
    let mut alpha = GrayImage::new(w, h);
    for (src, dst) in frame.pixels().zip(alpha.pixels_mut()) {
        *dst = Luma([src[3]]);
    }
    if w == 0 || h == 0 {
        return alpha;
    }
    median_filter(&alpha, MASK_MEDIAN_RADIUS, MASK_MEDIAN_RADIUS)
}

/// Lay the frame artwork over the photo canvas.
///
/// This is a mask selector, not linear alpha blending: the background is kept
/// wherever the smoothed mask is below 255, the frame colour is kept wherever
/// it is above 0, and the two contributions are added with saturation.
pub fn overlay_transparent(background: &RgbImage, frame: &RgbaImage) -> PhotoboothResult<RgbImage> {
    let expected = background.dimensions();
    let found = frame.dimensions();
    if expected != found {
        return Err(PhotoboothError::DimensionMismatch { expected, found });
    }

    let mask = frame_mask(frame);
    let (w, h) = expected;
    let mut out = RgbImage::new(w, h);

    for (((bg_px, fg_px), mask_px), out_px) in background
        .pixels()
        .zip(frame.pixels())
        .zip(mask.pixels())
        .zip(out.pixels_mut())
    {
        let m = mask_px[0];
        let keep_bg = m != u8::MAX;
        let keep_fg = m != 0;
        let mut rgb = [0u8; 3];
        for c in 0..3 {
            let bg = if keep_bg { bg_px[c] } else { 0 };
            let fg = if keep_fg { fg_px[c] } else { 0 };
            rgb[c] = bg.saturating_add(fg);
        }
        *out_px = Rgb(rgb);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn rgb_image(w: u32, h: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb(color))
    }

    fn rgba_image(w: u32, h: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(color))
    }

    mod overlay_transparent {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn opaque_frame_replaces_background() {
                let bg = rgb_image(6, 6, [10, 20, 30]);
                let frame = rgba_image(6, 6, [200, 100, 50, 255]);
                let out = overlay_transparent(&bg, &frame).unwrap();
                assert!(out.pixels().all(|p| p.0 == [200, 100, 50]));
            }

            #[test]
            fn transparent_frame_keeps_background() {
                let bg = rgb_image(6, 6, [10, 20, 30]);
                let frame = rgba_image(6, 6, [200, 100, 50, 0]);
                let out = overlay_transparent(&bg, &frame).unwrap();
                assert!(out.pixels().all(|p| p.0 == [10, 20, 30]));
            }

            #[test]
            fn window_shows_photo_and_border_shows_frame() {
                let bg = rgb_image(20, 20, [0, 0, 255]);
                let mut frame = rgba_image(20, 20, [255, 255, 255, 255]);
                for y in 5..15 {
                    for x in 5..15 {
                        frame.put_pixel(x, y, Rgba([0, 0, 0, 0]));
                    }
                }
                let out = overlay_transparent(&bg, &frame).unwrap();
                assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255]);
                assert_eq!(out.get_pixel(19, 19).0, [255, 255, 255]);
                assert_eq!(out.get_pixel(10, 10).0, [0, 0, 255]);
                assert_eq!(out.get_pixel(6, 13).0, [0, 0, 255]);
            }

            #[test]
            fn isolated_alpha_noise_is_filtered_out() {
                let bg = rgb_image(9, 9, [40, 40, 40]);
                let mut frame = rgba_image(9, 9, [255, 0, 0, 0]);
                frame.put_pixel(4, 4, Rgba([255, 0, 0, 255]));
                let out = overlay_transparent(&bg, &frame).unwrap();
                assert_eq!(out.get_pixel(4, 4).0, [40, 40, 40]);
            }

            #[test]
            fn partial_alpha_adds_both_layers_with_saturation() {
                let bg = rgb_image(5, 5, [100, 200, 10]);
                let frame = rgba_image(5, 5, [100, 100, 10, 128]);
                let out = overlay_transparent(&bg, &frame).unwrap();
                assert!(out.pixels().all(|p| p.0 == [200, 255, 20]));
            }

            #[test]
            fn size_mismatch_is_reported() {
                let bg = rgb_image(4, 4, [0, 0, 0]);
                let frame = rgba_image(4, 5, [0, 0, 0, 255]);
                let err = overlay_transparent(&bg, &frame).unwrap_err();
                match err {
                    PhotoboothError::DimensionMismatch { expected, found } => {
                        assert_eq!(expected, (4, 4));
                        assert_eq!(found, (4, 5));
                    }
                    other => panic!("unexpected error: {other:?}"),
                }
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                #![proptest_config(ProptestConfig::with_cases(32))]

                /// overlay_transparent: identical inputs give identical outputs
                #[test]
                fn deterministic(
                    w in 1u32..12,
                    h in 1u32..12,
                    seed in proptest::num::u8::ANY
                ) {
                    let mut bg = RgbImage::new(w, h);
                    let mut frame = RgbaImage::new(w, h);
                    for (i, (b, f)) in bg.pixels_mut().zip(frame.pixels_mut()).enumerate() {
                        let v = (i as u8).wrapping_mul(31).wrapping_add(seed);
                        *b = Rgb([v, v.wrapping_add(1), v.wrapping_add(2)]);
                        *f = Rgba([v.wrapping_mul(3), v, 255 - v, v.wrapping_mul(7)]);
                    }
                    let first = overlay_transparent(&bg, &frame).unwrap();
                    let second = overlay_transparent(&bg, &frame).unwrap();
                    prop_assert_eq!(first, second);
                }

                /// overlay_transparent: any size difference is a DimensionMismatch
                #[test]
                fn mismatch_always_errors(
                    bw in 1u32..10,
                    bh in 1u32..10,
                    fw in 1u32..10,
                    fh in 1u32..10
                ) {
                    prop_assume!(bw != fw || bh != fh);
                    let bg = RgbImage::new(bw, bh);
                    let frame = RgbaImage::new(fw, fh);
                    let result = overlay_transparent(&bg, &frame);
                    let is_mismatch = matches!(result, Err(PhotoboothError::DimensionMismatch { .. }));
                    prop_assert!(is_mismatch);
                }
            }
        }
    }
}
