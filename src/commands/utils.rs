use photobooth::{LayoutCatalog, Photobooth, PhotoboothResult, PipelineSettings};

use crate::cli::GlobalOptions;

/// Build pipeline settings from the global options.
pub fn build_settings(global: &GlobalOptions) -> PipelineSettings {
    let settings = PipelineSettings::new(
        global.source_dir.clone(),
        global.result_dir.clone(),
        global.frame_dir.clone(),
    )
    .with_resize_filter(global.resample_filter.into());

    if global.effects.is_empty() {
        settings
    } else {
        settings.with_effects(global.effects.iter().map(|&e| e.into()))
    }
}

/// Load the layout catalog named by the global options.
pub fn load_catalog(global: &GlobalOptions) -> PhotoboothResult<LayoutCatalog> {
    let catalog = LayoutCatalog::from_path(&global.catalog)?;
    tracing::debug!(
        path = %global.catalog.display(),
        frames = catalog.len(),
        "layout catalog loaded"
    );
    Ok(catalog)
}

/// The convenience function to build a Photobooth from the global options.
pub fn build_photobooth(global: &GlobalOptions) -> PhotoboothResult<Photobooth> {
    Ok(Photobooth::new(build_settings(global), load_catalog(global)?))
}
