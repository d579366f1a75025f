use photobooth::{PhotoboothResult, build_directory_animation};

use crate::cli::{AnimateCommand, GlobalOptions};

use super::utils::build_settings;

/// Run the animate command.
pub fn run(global: &GlobalOptions, cmd: AnimateCommand) -> PhotoboothResult<()> {
    let settings = build_settings(global);
    let output_path = cmd
        .output
        .unwrap_or_else(|| cmd.input.join(&settings.animation_file_name));

    let frames = build_directory_animation(
        &cmd.input,
        &output_path,
        &settings.compiled_file_name,
        cmd.delay,
    )?;
    println!("{frames}-frame animation saved to {}", output_path.display());
    Ok(())
}
