mod animate;
mod compile;
mod frames;
mod generate;
mod utils;

use crate::cli::{Cli, Commands, GlobalOptions};
use photobooth::PhotoboothResult;

/// The main function to run the command based on CLI input.
pub fn run(cli: Cli) -> PhotoboothResult<()> {
    let Cli { global, command } = cli;
    dispatch(&global, command)
}

/// Dispatch the command to the appropriate handler.
fn dispatch(global: &GlobalOptions, command: Commands) -> PhotoboothResult<()> {
    match command {
        Commands::Generate(cmd) => generate::run(global, cmd),
        Commands::Compile(cmd) => compile::run(global, cmd),
        Commands::Animate(cmd) => animate::run(global, cmd),
        Commands::Frames => frames::run(global),
    }
}
