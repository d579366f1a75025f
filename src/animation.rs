use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame};

use crate::config::DEFAULT_GIF_SPEED;
use crate::storage::{list_image_names, load_rgb};
use crate::{PhotoboothError, PhotoboothResult};

/// Files of `directory` to animate, sorted by name, leaving out anything named in `exclude`.
pub fn animation_frames(directory: &Path, exclude: &[&str]) -> PhotoboothResult<Vec<PathBuf>> {
    let names = list_image_names(directory)?;
    Ok(names
        .into_iter()
        .filter(|name| !exclude.contains(&name.as_str()))
        .map(|name| directory.join(name))
        .collect())
}

/// Encode `frames`, in the given order, as a looping GIF at `output`.
///
/// Returns the number of frames written. Every frame must share the first frame's size.
pub fn build_animation(
    frames: &[PathBuf],
    output: &Path,
    delay: Duration,
    speed: i32,
) -> PhotoboothResult<usize> {
    let Some(first) = frames.first() else {
        return Err(PhotoboothError::EmptyPhotoSet);
    };

    let delay = Delay::from_saturating_duration(delay);
    let mut encoded = Vec::with_capacity(frames.len());
    let mut expected = None;
    for path in frames {
        let rgba = DynamicImage::from(load_rgb(path)?).into_rgba8();
        let size = rgba.dimensions();
        match expected {
            None => expected = Some(size),
            Some(expected) if expected != size => {
                return Err(PhotoboothError::DimensionMismatch {
                    expected,
                    found: size,
                });
            }
            Some(_) => {}
        }
        encoded.push(Frame::from_parts(rgba, 0, 0, delay));
    }

    let writer = BufWriter::new(File::create(output)?);
    let mut encoder = GifEncoder::new_with_speed(writer, speed.clamp(1, 30));
    encoder.set_repeat(Repeat::Infinite)?;
    encoder.encode_frames(encoded)?;
    drop(encoder);

    tracing::debug!(
        first = %first.display(),
        frames = frames.len(),
        output = %output.display(),
        "animation written"
    );
    Ok(frames.len())
}

/// Animate every file of `directory` except the compiled composite and the output itself.
pub fn build_directory_animation(
    directory: &Path,
    output: &Path,
    compiled_name: &str,
    delay: Duration,
) -> PhotoboothResult<usize> {
    let output_name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let frames = animation_frames(directory, &[compiled_name, output_name.as_str()])?;
    build_animation(&frames, output, delay, DEFAULT_GIF_SPEED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, Rgb, RgbImage};
    use std::fs;
    use std::io::BufReader;

    fn write_photo(dir: &Path, name: &str, color: [u8; 3]) {
        RgbImage::from_pixel(8, 6, Rgb(color))
            .save(dir.join(name))
            .unwrap();
    }

    fn decode_frames(path: &Path) -> Vec<Frame> {
        let reader = BufReader::new(File::open(path).unwrap());
        GifDecoder::new(reader)
            .unwrap()
            .into_frames()
            .collect_frames()
            .unwrap()
    }

    mod unit {
        use super::*;

        #[test]
        fn compiled_composite_is_excluded() {
            let dir = tempfile::tempdir().unwrap();
            write_photo(dir.path(), "a.jpg", [200, 0, 0]);
            write_photo(dir.path(), "b.jpg", [0, 200, 0]);
            write_photo(dir.path(), "compiled.jpg", [0, 0, 200]);
            let output = dir.path().join("compiled.gif");

            let written = build_directory_animation(
                dir.path(),
                &output,
                "compiled.jpg",
                Duration::from_millis(700),
            )
            .unwrap();
            assert_eq!(written, 2);

            let frames = decode_frames(&output);
            assert_eq!(frames.len(), 2);
            let (numer, denom) = frames[0].delay().numer_denom_ms();
            assert_eq!(numer / denom, 700);
        }

        #[test]
        fn previous_animation_is_not_a_frame() {
            let dir = tempfile::tempdir().unwrap();
            write_photo(dir.path(), "a.jpg", [10, 10, 10]);
            let output = dir.path().join("compiled.gif");
            fs::write(&output, b"stale").unwrap();

            let written = build_directory_animation(
                dir.path(),
                &output,
                "compiled.jpg",
                Duration::from_millis(100),
            )
            .unwrap();
            assert_eq!(written, 1);
        }

        #[test]
        fn explicit_order_is_kept() {
            let dir = tempfile::tempdir().unwrap();
            write_photo(dir.path(), "1.png", [255, 0, 0]);
            write_photo(dir.path(), "2.png", [0, 0, 255]);
            let frames = vec![dir.path().join("2.png"), dir.path().join("1.png")];
            let output = dir.path().join("out.gif");

            build_animation(&frames, &output, Duration::from_millis(200), 10).unwrap();
            let decoded = decode_frames(&output);
            assert_eq!(decoded.len(), 2);
            let first = decoded[0].buffer().get_pixel(0, 0).0;
            assert!(first[2] > first[0], "first frame should be the blue one: {first:?}");
        }

        #[test]
        fn no_frames_is_an_error() {
            let dir = tempfile::tempdir().unwrap();
            let err = build_animation(&[], &dir.path().join("x.gif"), Duration::ZERO, 10)
                .unwrap_err();
            assert!(matches!(err, PhotoboothError::EmptyPhotoSet));
        }

        #[test]
        fn frames_of_different_sizes_are_rejected() {
            let dir = tempfile::tempdir().unwrap();
            write_photo(dir.path(), "a.png", [1, 1, 1]);
            RgbImage::new(3, 3).save(dir.path().join("b.png")).unwrap();
            let frames = animation_frames(dir.path(), &[]).unwrap();

            let err = build_animation(&frames, &dir.path().join("x.gif"), Duration::ZERO, 10)
                .unwrap_err();
            assert!(matches!(err, PhotoboothError::DimensionMismatch { .. }));
        }
    }
}
