//! Binary for the Descent dungeon generator.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

use clap::Parser as _;

use descent_cli::{RunParams, logging};

mod command_options;
use command_options::DescentArgs;

fn main() -> Result<(), anyhow::Error> {
    // Destructure as a check that we're using all the args
    let DescentArgs {
        templates,
        config,
        seed,
        output,
        logging: logging_args,
    } = DescentArgs::parse();

    logging::install(&logging_args)?;

    let seed = seed.unwrap_or_else(rand::random);
    log::info!("using seed {seed}");

    let dungeon = descent_cli::run(&RunParams {
        templates,
        config,
        seed,
    })?;
    descent_cli::write_structure(&dungeon.structure, output.as_deref())?;
    Ok(())
}
