//! Descent assembles 3D dungeon layouts out of prefabricated pieces: rooms, and
//! corridor segments that join them.
//!
//! Pieces are described by [`Template`]s, which are block structures annotated with a
//! footprint (the "dungeon" region) and with openings, the one-cube-thick faces of the
//! footprint through which other pieces can attach. Given a [`GenerationConfig`] naming
//! which templates to use and a seeded random number generator, [`generate()`]
//! produces a [`Dungeon`]: every room and corridor piece in its final position, and all
//! of their blocks merged into one [`Structure`].
//!
//! ## How layouts are made
//!
//! 1. Rooms are chosen from weighted pools and stacked at the origin; [`steering`]
//!    pushes them apart until every pair keeps a minimum distance.
//! 2. The [Delaunay tetrahedralization](delaunay) of the room centers proposes which
//!    rooms are neighbors. The [minimum spanning tree](graph::minimum_spanning_tree)
//!    of those edges, with a few of the remaining edges added back to make loops,
//!    decides which rooms get connected.
//! 3. For each connection, an [A* search](pathfind) places corridor pieces, one
//!    translation at a time, so that they join an opening of one room to an opening of
//!    the other without intersecting anything. Corridors may join up with corridors
//!    placed for earlier connections.
//!
//! Generation is deterministic: the same templates, configuration, and generator state
//! produce the same dungeon. Everything happens synchronously on the calling thread.
//!
//! ## Coordinate system
//!
//! Positions are integer cube coordinates as in [`descent_base::math`]. Boxes are
//! inclusive of both corners. +Y is up; the finished dungeon is raised so that nothing
//! is below Y = 0.
//!
//! ## Logging
//!
//! This crate logs through the [`log`] facade: warnings for malformed templates and
//! for fallbacks, debug messages summarizing each stage, and trace messages for
//! individual search steps. It never installs a logger; the same information that
//! tests need is returned in [`GenerationReport`].

pub mod config;
pub mod delaunay;
mod error;
mod generator;
pub mod graph;
pub mod pathfind;
pub mod piece;
pub mod steering;
pub mod structure;
pub mod template;

pub use config::{ConfigError, GenerationConfig, PoolEntry};
pub use error::GenerateError;
pub use generator::{Dungeon, GenerationReport, MARKER_BLOCK, generate};
pub use pathfind::{NoSolution, NoSolutionReason, PathFinder};
pub use piece::{Opening, Piece};
pub use structure::{PieceRole, Structure};
pub use template::{LoadError, MemorySource, Template, TemplateId, TemplateSource};
