use std::path::PathBuf;

use image::RgbImage;

use crate::animation::build_animation;
use crate::config::PipelineSettings;
use crate::effects::{Effect, EffectsProvider};
use crate::frame::{FrameAsset, FrameAssetStore, FrameCompiler};
use crate::storage::{EffectDirectory, save_rgb};
use crate::PhotoboothResult;

/// Files produced for one effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectOutput {
    pub effect: Effect,
    pub compiled: PathBuf,
    pub animation: PathBuf,
}

/// Run every effect over one captured photo and store each variant under `photo_name`.
///
/// The directories must already exist.
pub fn apply_all_effects<E>(
    provider: &E,
    photo: &RgbImage,
    photo_name: &str,
    directories: &[EffectDirectory],
) -> PhotoboothResult<()>
where
    E: EffectsProvider + ?Sized,
{
    for directory in directories {
        apply_effect(provider, photo, photo_name, directory)?;
    }
    Ok(())
}

/// Store the variant of `photo` for the effect of `directory` under `photo_name`.
pub fn apply_effect<E>(
    provider: &E,
    photo: &RgbImage,
    photo_name: &str,
    directory: &EffectDirectory,
) -> PhotoboothResult<()>
where
    E: EffectsProvider + ?Sized,
{
    let variant = provider.apply(directory.effect(), photo)?;
    save_rgb(&variant, &directory.photo_path(photo_name))
}

/// Compile the ordered photo set of one effect directory into its frame and animate it.
///
/// Any unreadable photo aborts the whole directory.
#[tracing::instrument(skip_all, fields(effect = %directory.effect(), frame = %asset.frame_id))]
pub fn finalize_effect<S>(
    compiler: &FrameCompiler<S>,
    asset: &FrameAsset,
    directory: &EffectDirectory,
    photo_names: &[String],
    settings: &PipelineSettings,
) -> PhotoboothResult<EffectOutput>
where
    S: FrameAssetStore,
{
    let photos = directory.load_photos(photo_names)?;
    let compiled = compiler.compile_with_asset(asset, &photos)?;
    let compiled_path = directory.compiled_path();
    save_rgb(&compiled, &compiled_path)?;
    tracing::info!(path = %compiled_path.display(), "compiled frame saved");

    let frames: Vec<PathBuf> = photo_names
        .iter()
        .map(|name| directory.photo_path(name))
        .collect();
    let animation_path = directory.animation_path();
    build_animation(
        &frames,
        &animation_path,
        settings.animation_delay,
        settings.gif_speed,
    )?;
    tracing::info!(path = %animation_path.display(), "animation saved");

    Ok(EffectOutput {
        effect: directory.effect(),
        compiled: compiled_path,
        animation: animation_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::StandardEffects;
    use crate::{PhotoboothError, PhotoboothResult};
    use image::Rgb;

    struct FailingEffects;

    impl EffectsProvider for FailingEffects {
        fn apply(&self, effect: Effect, _photo: &RgbImage) -> PhotoboothResult<RgbImage> {
            Err(PhotoboothError::UnknownEffect(effect.to_string()))
        }
    }

    mod unit {
        use super::*;

        #[test]
        fn every_effect_directory_gets_the_photo() {
            let root = tempfile::tempdir().unwrap();
            let directories: Vec<_> = [Effect::Original, Effect::Invert]
                .into_iter()
                .map(|effect| EffectDirectory::at(effect, root.path().join(effect.name())))
                .collect();
            for dir in &directories {
                dir.ensure().unwrap();
            }

            let photo = RgbImage::from_pixel(4, 4, Rgb([10, 20, 30]));
            apply_all_effects(&StandardEffects, &photo, "shot-1.png", &directories).unwrap();

            let original = image::open(directories[0].photo_path("shot-1.png"))
                .unwrap()
                .to_rgb8();
            let inverted = image::open(directories[1].photo_path("shot-1.png"))
                .unwrap()
                .to_rgb8();
            assert_eq!(original.get_pixel(0, 0).0, [10, 20, 30]);
            assert_eq!(inverted.get_pixel(0, 0).0, [245, 235, 225]);
        }

        #[test]
        fn provider_failure_is_propagated() {
            let root = tempfile::tempdir().unwrap();
            let dir = EffectDirectory::at(Effect::Sepia, root.path());
            let photo = RgbImage::new(2, 2);
            let err = apply_all_effects(&FailingEffects, &photo, "x.png", &[dir]).unwrap_err();
            assert!(matches!(err, PhotoboothError::UnknownEffect(name) if name == "sepia"));
        }
    }
}
