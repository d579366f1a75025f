use photobooth::{FrameId, PhotoboothResult};

use crate::cli::{GenerateCommand, GlobalOptions};

use super::utils::build_photobooth;

/// Run the generate command.
pub fn run(global: &GlobalOptions, cmd: GenerateCommand) -> PhotoboothResult<()> {
    let booth = build_photobooth(global)?;
    let frame_id = FrameId::new(cmd.frame_id);
    let report = booth.process_transaction(&cmd.tx_id, &frame_id)?;

    for output in &report.outputs {
        println!(
            "{}: {} ({})",
            output.effect,
            output.compiled.display(),
            output.animation.display()
        );
    }
    Ok(())
}
