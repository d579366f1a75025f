use photobooth::storage::save_rgb;
use photobooth::{Effect, FrameId, PhotoboothResult};

use crate::cli::{CompileCommand, GlobalOptions};

use super::utils::build_photobooth;

/// Run the compile command.
pub fn run(global: &GlobalOptions, cmd: CompileCommand) -> PhotoboothResult<()> {
    let booth = build_photobooth(global)?;
    let effect: Effect = cmd.effect.into();
    let directory = booth.transaction_dirs(&cmd.tx_id).effect_dir(effect);

    let names = directory.list_photos()?;
    let photos = directory.load_photos(&names)?;
    let compiled = booth
        .compiler()
        .compile(&FrameId::new(cmd.frame_id), &photos)?;

    let output_path = cmd.output.unwrap_or_else(|| directory.compiled_path());
    save_rgb(&compiled, &output_path)?;
    println!("Compiled frame saved to {}", output_path.display());
    Ok(())
}
