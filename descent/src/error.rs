use crate::config::ConfigError;
use crate::pathfind::NoSolution;
use crate::steering::SteeringError;
use crate::template::{LoadError, TemplateId};

/// Failure of [`generate()`](crate::generate).
///
/// No partially built dungeon is returned alongside any of these.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GenerateError {
    /// The configuration was rejected before anything was loaded.
    #[error("invalid generation config")]
    Config(#[from] ConfigError),
    /// A template could not be obtained.
    #[error("failed to load templates")]
    Load(#[from] LoadError),
    /// A template has no footprint region, so it cannot be placed.
    #[error("template {0} has no dungeon region")]
    MissingDungeonRegion(TemplateId),
    /// A room template has no usable openings, so nothing could connect to it.
    #[error("room template {0} has no usable openings")]
    NoOpenings(TemplateId),
    /// Rooms could not be separated.
    #[error("failed to separate rooms")]
    Steering(#[from] SteeringError),
    /// Two rooms could not be joined by any corridor, in any placement attempt.
    #[error("failed to connect rooms in {attempts} placement attempts")]
    NoSolution {
        /// Number of times the rooms were placed.
        attempts: u32,
        /// Number of pairs of openings tried for the connection that failed last.
        pairs: u32,
        /// Why the last pair of openings could not be joined.
        #[source]
        last: NoSolution,
    },
}
