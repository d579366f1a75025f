use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::config::PipelineSettings;
use crate::effects::Effect;
use crate::{PhotoboothError, PhotoboothResult};

/// Source and result locations of one transaction.
#[derive(Debug, Clone)]
pub struct TransactionDirs {
    transaction: String,
    source: PathBuf,
    result: PathBuf,
    compiled_name: String,
    animation_name: String,
}

impl TransactionDirs {
    pub fn new(settings: &PipelineSettings, transaction: impl Into<String>) -> Self {
        let transaction = transaction.into();
        Self {
            source: settings.source_root.join(&transaction),
            result: settings.result_root.join(&transaction),
            compiled_name: settings.compiled_file_name.clone(),
            animation_name: settings.animation_file_name.clone(),
            transaction,
        }
    }

    pub fn transaction(&self) -> &str {
        &self.transaction
    }

    /// Directory holding the captured photos.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Directory holding one sub-directory per effect.
    pub fn result(&self) -> &Path {
        &self.result
    }

    pub fn effect_dir(&self, effect: Effect) -> EffectDirectory {
        EffectDirectory {
            effect,
            path: self.result.join(effect.name()),
            compiled_name: self.compiled_name.clone(),
            animation_name: self.animation_name.clone(),
        }
    }
}

/// Storage bucket of one effect: variant photos, the compiled composite and the animation.
#[derive(Debug, Clone)]
pub struct EffectDirectory {
    effect: Effect,
    path: PathBuf,
    compiled_name: String,
    animation_name: String,
}

impl EffectDirectory {
    /// Handle on an arbitrary directory, using the default output file names.
    pub fn at(effect: Effect, path: impl Into<PathBuf>) -> Self {
        let defaults = PipelineSettings::default();
        Self {
            effect,
            path: path.into(),
            compiled_name: defaults.compiled_file_name,
            animation_name: defaults.animation_file_name,
        }
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory unless it already exists.
    pub fn ensure(&self) -> PhotoboothResult<()> {
        fs::create_dir_all(&self.path)?;
        Ok(())
    }

    pub fn photo_path(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }

    pub fn compiled_path(&self) -> PathBuf {
        self.path.join(&self.compiled_name)
    }

    pub fn animation_path(&self) -> PathBuf {
        self.path.join(&self.animation_name)
    }

    /// Whether `file_name` is one of the outputs written after compilation.
    pub fn is_output(&self, file_name: &str) -> bool {
        file_name == self.compiled_name || file_name == self.animation_name
    }

    /// Variant photo names, sorted, without the compiled composite or the animation.
    pub fn list_photos(&self) -> PhotoboothResult<Vec<String>> {
        let mut names = list_image_names(&self.path)?;
        names.retain(|name| !self.is_output(name));
        Ok(names)
    }

    /// Load the photos named in `names`, in that order, failing on the first unreadable one.
    pub fn load_photos(&self, names: &[String]) -> PhotoboothResult<Vec<RgbImage>> {
        names
            .iter()
            .map(|name| load_rgb(&self.photo_path(name)))
            .collect()
    }
}

/// Names of the regular files in `dir`, sorted lexicographically.
pub fn list_file_names(dir: &Path) -> PhotoboothResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => tracing::warn!(name = ?raw, "skipping file with a non UTF-8 name"),
        }
    }
    names.sort();
    Ok(names)
}

/// Names of the files in `dir` with an image extension, sorted lexicographically.
pub fn list_image_names(dir: &Path) -> PhotoboothResult<Vec<String>> {
    let mut names = list_file_names(dir)?;
    names.retain(|name| {
        let image = ImageFormat::from_path(name).is_ok();
        if !image {
            tracing::warn!(dir = %dir.display(), %name, "skipping file that is not an image");
        }
        image
    });
    Ok(names)
}

/// Read an image from disk as 8-bit RGB.
pub fn load_rgb(path: &Path) -> PhotoboothResult<RgbImage> {
    let image = image::open(path).map_err(|source| PhotoboothError::DecodeFailure {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgb8())
}

/// Write an RGB image, choosing the encoder from the file extension.
pub fn save_rgb(image: &RgbImage, path: &Path) -> PhotoboothResult<()> {
    image.save(path)?;
    Ok(())
}
