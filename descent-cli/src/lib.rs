//! Command-line driver for [`descent`].
//!
//! Templates are read from a directory holding one JSON file per template, the
//! [`GenerationConfig`] from a JSON file, and the generated [`Structure`] is written
//! as JSON.
//!
//! This library crate holds everything the `descent` binary does apart from argument
//! parsing, so that it can be tested without spawning processes.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rand::SeedableRng as _;

use descent::{Dungeon, GenerationConfig, Structure};

pub mod logging;
mod source;
pub use source::DirectorySource;

/// Inputs of one generation run.
#[derive(Clone, Debug)]
#[expect(clippy::exhaustive_structs)]
pub struct RunParams {
    /// Directory of template files.
    pub templates: PathBuf,
    /// Path of the generation config file.
    pub config: PathBuf,
    /// Seed for the random number generator.
    pub seed: u64,
}

/// Reads and validates a generation config file.
pub fn read_config(path: &Path) -> Result<GenerationConfig, anyhow::Error> {
    let file = File::open(path)
        .with_context(|| format!("failed to open config file {}", path.display()))?;
    let config: GenerationConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config in {}", path.display()))?;
    Ok(config)
}

/// Generates a dungeon as described by `params`.
pub fn run(params: &RunParams) -> Result<Dungeon, anyhow::Error> {
    let config = read_config(&params.config)?;
    let mut source = DirectorySource::new(&params.templates);
    let mut rng = rand_xoshiro::Xoshiro256Plus::seed_from_u64(params.seed);

    let dungeon = descent::generate(&config, &mut source, &mut rng)
        .with_context(|| format!("failed to generate a dungeon with seed {}", params.seed))?;

    let report = &dungeon.report;
    log::info!(
        "generated {rooms} rooms and {corridors} corridor pieces \
        in {attempts} attempt(s); {loops} loop(s)",
        rooms = dungeon.rooms.len(),
        corridors = dungeon.corridors.len(),
        attempts = report.attempts,
        loops = report.back_edges,
    );
    log::debug!("{report:?}");
    Ok(dungeon)
}

/// Writes `structure` as JSON to the file at `output`, or to stdout if [`None`].
pub fn write_structure(structure: &Structure, output: Option<&Path>) -> Result<(), anyhow::Error> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            write_json(structure, BufWriter::new(file))
                .with_context(|| format!("failed to write output file {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => {
            write_json(structure, BufWriter::new(io::stdout().lock()))
                .context("failed to write to stdout")?;
        }
    }
    Ok(())
}

fn write_json(structure: &Structure, mut writer: impl io::Write) -> Result<(), anyhow::Error> {
    serde_json::to_writer_pretty(&mut writer, structure)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
