//! Logging to stderr.

use anyhow::Context as _;
use log::Log as _;

/// A [`clap::Args`] struct for options controlling log output to stderr.
#[derive(Clone, Debug, clap::Args)]
#[expect(clippy::module_name_repetitions)]
pub struct LoggingArgs {
    /// Additional logging to stderr, down to individual search steps.
    #[arg(long = "verbose", short = 'v')]
    pub verbose: bool,

    /// Remove timestamps from logs so that they are closer to deterministic.
    ///
    /// This option is intended for internal tests only.
    #[arg(long = "simplify-log-format", hide = true)]
    pub simplify_log_format: bool,
}

/// Install a [`log`] global logger based on user-provided `options`.
pub fn install(options: &LoggingArgs) -> Result<(), anyhow::Error> {
    use log::LevelFilter::{Error, Info, Off, Trace};

    let &LoggingArgs {
        verbose,
        simplify_log_format,
    } = options;

    let stderr_logger = *simplelog::WriteLogger::new(
        if verbose { Trace } else { Info },
        // Target filtering is done by `standard_filter` instead.
        simplelog::ConfigBuilder::new()
            .set_target_level(Off)
            .set_location_level(Off)
            .set_time_level(if simplify_log_format { Off } else { Error })
            .build(),
        std::io::stderr(),
    );
    let max_level = simplelog::SharedLogger::level(&stderr_logger);

    log::set_boxed_logger(Box::new(DescentLogger { stderr_logger }))
        .context("failed to initialize logging")?;
    log::set_max_level(max_level);
    Ok(())
}

/// Returns whether a message should be shown at all.
///
/// Messages from this workspace pass at any level; other crates are limited to
/// warnings and errors.
pub fn standard_filter(metadata: &log::Metadata<'_>) -> bool {
    metadata.target().starts_with("descent") || metadata.level() <= log::Level::Warn
}

/// [`log::Log`] implementation that [`install()`] registers globally.
struct DescentLogger {
    stderr_logger: simplelog::WriteLogger<std::io::Stderr>,
}

impl log::Log for DescentLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        standard_filter(metadata) && self.stderr_logger.enabled(metadata)
    }

    fn log(&self, record: &log::Record<'_>) {
        if standard_filter(record.metadata()) {
            self.stderr_logger.log(record);
        }
    }

    fn flush(&self) {
        self.stderr_logger.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(target: &str, level: log::Level) -> log::Metadata<'_> {
        log::Metadata::builder().target(target).level(level).build()
    }

    #[test]
    fn filter() {
        assert!(standard_filter(&metadata(
            "descent::pathfind",
            log::Level::Trace
        )));
        assert!(standard_filter(&metadata("descent_cli", log::Level::Debug)));
        assert!(standard_filter(&metadata("clap_builder", log::Level::Warn)));
        assert!(!standard_filter(&metadata("clap_builder", log::Level::Info)));
    }
}
