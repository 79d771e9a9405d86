//! Command line option parsing.

use std::path::PathBuf;

use clap::Parser;

use descent_cli::logging::LoggingArgs;

#[derive(Clone, Debug, Parser)]
#[command(name = "descent", author, about, version)]
pub(crate) struct DescentArgs {
    /// Directory containing the piece templates, one `<id>.json` file per template.
    #[arg(long = "templates", value_name = "DIR")]
    pub(crate) templates: PathBuf,

    /// Generation config file (JSON).
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub(crate) config: PathBuf,

    /// Seed value for the random choices made while generating.
    ///
    /// May be an integer between 0 and 18446744073709551615 (2⁶⁴ - 1).
    ///
    /// If not specified, a randomly chosen seed will be used and logged.
    #[arg(long = "seed")]
    pub(crate) seed: Option<u64>,

    /// File to write the generated structure to, as JSON.
    ///
    /// If not specified, the structure is written to standard output.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub(crate) output: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) logging: LoggingArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;
    use pretty_assertions::assert_eq;

    #[test]
    fn verify_cli() {
        DescentArgs::command().debug_assert();
    }

    #[test]
    fn minimal_args() {
        let args = DescentArgs::try_parse_from([
            "descent",
            "--templates",
            "pieces",
            "--config",
            "map.json",
        ])
        .unwrap();
        assert_eq!(args.templates, PathBuf::from("pieces"));
        assert_eq!(args.config, PathBuf::from("map.json"));
        assert_eq!(args.seed, None);
        assert_eq!(args.output, None);
        assert!(!args.logging.verbose);
    }

    #[test]
    fn all_args() {
        let args = DescentArgs::try_parse_from([
            "descent",
            "--templates=pieces",
            "-c",
            "map.json",
            "--seed",
            "18446744073709551615",
            "-o",
            "out.json",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(u64::MAX));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert!(args.logging.verbose);
    }

    #[test]
    fn config_is_required() {
        assert!(DescentArgs::try_parse_from(["descent", "--templates", "pieces"]).is_err());
    }
}
