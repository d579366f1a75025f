use photobooth::{DirectoryFrameStore, PhotoboothResult};

use crate::cli::GlobalOptions;

use super::utils::load_catalog;

/// Run the frames command.
pub fn run(global: &GlobalOptions) -> PhotoboothResult<()> {
    let catalog = load_catalog(global)?;
    let store = DirectoryFrameStore::new(&global.frame_dir);
    for (frame_id, variant) in catalog.iter() {
        let params = variant.params();
        println!(
            "{frame_id}\t{}\t{}x{} tiles\t{}",
            variant.name(),
            params.tile_size.width,
            params.tile_size.height,
            store.asset_path(frame_id).display()
        );
    }
    Ok(())
}
