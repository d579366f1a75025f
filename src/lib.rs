pub mod animation;
pub mod canvas;
pub mod catalog;
pub mod config;
pub mod effects;
pub mod error;
pub mod frame;
pub mod overlay;
pub mod pipeline;
pub mod storage;
pub mod tile;

pub use animation::{animation_frames, build_animation, build_directory_animation};
pub use canvas::make_padding;
pub use catalog::{FrameId, LayoutCatalog, LayoutParams, LayoutVariant, TileSize};
pub use config::PipelineSettings;
pub use effects::{Effect, EffectsProvider, StandardEffects};
pub use error::{PhotoboothError, PhotoboothResult};
pub use frame::{
    DirectoryFrameStore, FrameAsset, FrameAssetStore, FrameCompiler, InMemoryFrameStore,
    build_canvas,
};
pub use overlay::overlay_transparent;
pub use pipeline::{EffectOutput, apply_all_effects, apply_effect};
pub use storage::{EffectDirectory, TransactionDirs};
pub use tile::compile_column;

use rayon::prelude::*;

use crate::pipeline::finalize_effect;
use crate::storage::{list_image_names, load_rgb};

/// Entry point for running photobooth transactions.
pub struct Photobooth<E = StandardEffects, S = DirectoryFrameStore> {
    settings: PipelineSettings,
    effects: E,
    compiler: FrameCompiler<S>,
}

impl Photobooth {
    /// Photobooth reading frames from `settings.frame_dir` and using the built-in effects.
    pub fn new(settings: PipelineSettings, catalog: LayoutCatalog) -> Self {
        let compiler = FrameCompiler::new(catalog, DirectoryFrameStore::new(&settings.frame_dir))
            .with_resize_filter(settings.resize_filter);
        Self {
            settings,
            effects: StandardEffects,
            compiler,
        }
    }
}

impl<E, S> Photobooth<E, S>
where
    E: EffectsProvider,
    S: FrameAssetStore,
{
    /// Replace the effects provider.
    pub fn with_effects_provider<T: EffectsProvider>(self, effects: T) -> Photobooth<T, S> {
        Photobooth {
            settings: self.settings,
            effects,
            compiler: self.compiler,
        }
    }

    /// Replace the frame asset store.
    pub fn with_frame_store<T: FrameAssetStore>(self, store: T) -> Photobooth<E, T> {
        Photobooth {
            settings: self.settings,
            effects: self.effects,
            compiler: self.compiler.with_store(store),
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn compiler(&self) -> &FrameCompiler<S> {
        &self.compiler
    }

    pub fn transaction_dirs(&self, transaction: &str) -> TransactionDirs {
        TransactionDirs::new(&self.settings, transaction)
    }

    /// Process every photo captured for `transaction`, in file-name order.
    pub fn process_transaction(
        &self,
        transaction: &str,
        frame_id: &FrameId,
    ) -> PhotoboothResult<TransactionReport> {
        let dirs = self.transaction_dirs(transaction);
        let mut names = list_image_names(dirs.source())?;
        names.retain(|name| {
            let reserved = name == &self.settings.compiled_file_name
                || name == &self.settings.animation_file_name;
            if reserved {
                tracing::warn!(%name, "skipping capture named like a compiled output");
            }
            !reserved
        });
        self.process_photos(transaction, frame_id, &names)
    }

    /// Process the named photos of `transaction`; their order sets tile and animation order.
    #[tracing::instrument(skip(self, photo_names), fields(photos = photo_names.len()))]
    pub fn process_photos(
        &self,
        transaction: &str,
        frame_id: &FrameId,
        photo_names: &[String],
    ) -> PhotoboothResult<TransactionReport> {
        let asset = self.compiler.resolve(frame_id)?;
        if photo_names.is_empty() {
            return Err(PhotoboothError::EmptyPhotoSet);
        }

        let dirs = self.transaction_dirs(transaction);
        let directories: Vec<EffectDirectory> = self
            .settings
            .effects
            .iter()
            .map(|effect| dirs.effect_dir(*effect))
            .collect();
        for directory in &directories {
            directory
                .ensure()
                .map_err(|e| e.in_effect(transaction, directory.effect(), frame_id))?;
        }

        tracing::info!("applying effects");
        for name in photo_names {
            let photo = load_rgb(&dirs.source().join(name))
                .map_err(|e| e.in_transaction(transaction, frame_id))?;
            for directory in &directories {
                apply_effect(&self.effects, &photo, name, directory)
                    .map_err(|e| e.in_effect(transaction, directory.effect(), frame_id))?;
            }
        }

        tracing::info!(effects = directories.len(), "compiling frames");
        let outputs = directories
            .par_iter()
            .map(|directory| {
                finalize_effect(
                    &self.compiler,
                    &asset,
                    directory,
                    photo_names,
                    &self.settings,
                )
                .map_err(|e| e.in_effect(transaction, directory.effect(), frame_id))
            })
            .collect::<PhotoboothResult<Vec<_>>>()?;

        Ok(TransactionReport {
            transaction: transaction.to_string(),
            frame_id: frame_id.clone(),
            outputs,
        })
    }
}

/// Everything produced for one transaction, in configured effect order.
#[derive(Debug, Clone)]
pub struct TransactionReport {
    pub transaction: String,
    pub frame_id: FrameId,
    pub outputs: Vec<EffectOutput>,
}

impl TransactionReport {
    pub fn output(&self, effect: Effect) -> Option<&EffectOutput> {
        self.outputs.iter().find(|o| o.effect == effect)
    }
}
