//! Sequencing the stages of generation into a finished [`Dungeon`].

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use descent_base::math::{
    AxisBox, GridCoordinate, GridPoint, GridRotation, GridVector, manhattan,
};
use itertools::Itertools as _;
use rand::Rng;
use rand::seq::SliceRandom as _;

use crate::config::{ConfigError, GenerationConfig, PoolEntry, choose_from};
use crate::delaunay::triangulate;
use crate::error::GenerateError;
use crate::graph::{Edge, gabriel_graph, minimum_spanning_tree};
use crate::pathfind::{NoSolution, PathFinder};
use crate::piece::{Opening, Piece, find_openings};
use crate::steering::steer;
use crate::structure::{PieceRole, Structure};
use crate::template::{LoadError, Template, TemplateId, TemplateSource};

/// Name of the block placed at the origin of every generated structure.
pub const MARKER_BLOCK: &str = "marker";

/// A generated dungeon.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Dungeon {
    /// All placed blocks, with the record of every placement.
    pub structure: Structure,
    /// The rooms, in final position: the middle rooms, then the start room, then the
    /// end room.
    pub rooms: Vec<Piece>,
    /// Corridor pieces, in the order they were placed.
    pub corridors: Vec<Piece>,
    /// What happened along the way.
    pub report: GenerationReport,
}

impl Dungeon {
    /// The room the dungeon is entered from.
    pub fn start(&self) -> &Piece {
        &self.rooms[self.rooms.len() - 2]
    }

    /// The room the dungeon is meant to be finished in.
    pub fn end(&self) -> &Piece {
        &self.rooms[self.rooms.len() - 1]
    }
}

/// Diagnostics from a successful [`generate()`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub struct GenerationReport {
    /// Number of times the rooms were placed; more than one if corridors could not
    /// be found for an earlier placement.
    pub attempts: u32,
    /// Room separation sweeps in the successful attempt.
    pub steering_sweeps: u32,
    /// Number of candidate connections between rooms.
    pub candidate_edges: usize,
    /// Whether the candidates had to be taken from the Gabriel graph because the
    /// tetrahedralization was unusable.
    pub used_fallback_graph: bool,
    /// Number of connections in the spanning tree.
    pub tree_edges: usize,
    /// Number of connections added back to form loops.
    pub back_edges: usize,
    /// Search expansions spent on each connection, in the order they were made.
    pub corridor_expansions: Vec<u32>,
    /// Number of template opening regions that were ignored because they were not
    /// flush with the template's footprint.
    pub malformed_openings: usize,
    /// Distance the whole dungeon was raised so that it lies at or above Y = 0.
    pub y_shift: GridCoordinate,
}

/// Generates a dungeon.
///
/// All templates named by `config` are loaded from `source` first. Then, until
/// corridors are found or [`GenerationConfig::placement_attempts`] runs out:
///
/// 1. Rooms are chosen from the pools and centered on the origin.
/// 2. Rooms are pushed apart until they keep [`GenerationConfig::min_separation`].
/// 3. The Delaunay tetrahedralization of the room centers gives candidate connections,
///    whose minimum spanning tree, plus a random selection of the rest, is the set
///    of connections to build.
/// 4. Each connection is built as a corridor, which may join corridors built before it.
///
/// Finally the result is moved so that it lies at or above Y = 0 and a
/// [`MARKER_BLOCK`] is put at the origin.
///
/// The same `config`, templates, and `rng` state always produce the same dungeon.
pub fn generate<S, R>(
    config: &GenerationConfig,
    source: &mut S,
    rng: &mut R,
) -> Result<Dungeon, GenerateError>
where
    S: TemplateSource + ?Sized,
    R: Rng + ?Sized,
{
    config.validate()?;
    let catalog = Catalog::load(config, source)?;
    let corridor_pieces: Vec<Piece> = config
        .paths
        .iter()
        .map(|id| catalog.piece(id).cloned())
        .collect::<Result<_, _>>()?;

    let mut attempt = 0;
    let (rooms, layout) = loop {
        attempt += 1;
        match attempt_layout(config, &catalog, &corridor_pieces, rng)? {
            Ok(result) => break result,
            Err(Unjoined { last, .. }) if attempt < config.placement_attempts => {
                log::info!(
                    "placement attempt {attempt} failed ({last}: {}); placing rooms again",
                    last.reason
                );
            }
            Err(Unjoined { pairs, last }) => {
                return Err(GenerateError::NoSolution {
                    attempts: attempt,
                    pairs,
                    last,
                });
            }
        }
    };

    let mut structure = Structure::new();
    for (index, room) in rooms.iter().enumerate() {
        let role = match rooms.len() - index {
            2 => PieceRole::Start,
            1 => PieceRole::End,
            _ => PieceRole::Room,
        };
        structure.place(catalog.template(room.template())?, room, role);
    }
    for corridor in &layout.corridors {
        structure.place(
            catalog.template(corridor.template())?,
            corridor,
            PieceRole::Corridor,
        );
    }

    let min_y = structure.bounds().map_or(0, |bounds| bounds.min().y);
    let y_shift = if min_y < 0 { -min_y } else { 0 };
    let lift = GridVector::new(0, y_shift, 0);
    if y_shift != 0 {
        log::debug!("raising dungeon by {y_shift}");
        structure = structure.translated(lift);
    }
    structure.set_block(GridPoint::origin(), MARKER_BLOCK);

    let report = GenerationReport {
        attempts: attempt,
        steering_sweeps: layout.steering_sweeps,
        candidate_edges: layout.candidate_edges,
        used_fallback_graph: layout.used_fallback_graph,
        tree_edges: layout.tree_edges,
        back_edges: layout.back_edges,
        corridor_expansions: layout.corridor_expansions,
        malformed_openings: catalog.malformed,
        y_shift,
    };
    log::debug!("{report:?}");

    Ok(Dungeon {
        structure,
        rooms: rooms.iter().map(|room| room.translated(lift)).collect(),
        corridors: layout
            .corridors
            .iter()
            .map(|corridor| corridor.translated(lift))
            .collect(),
        report,
    })
}

/// Loaded templates, with the pieces made from them.
#[derive(Debug)]
struct Catalog {
    entries: BTreeMap<TemplateId, (Template, Piece)>,
    malformed: usize,
}

impl Catalog {
    /// Loads every template `config` could use.
    fn load<S: TemplateSource + ?Sized>(
        config: &GenerationConfig,
        source: &mut S,
    ) -> Result<Self, GenerateError> {
        let mut catalog = Catalog {
            entries: BTreeMap::new(),
            malformed: 0,
        };

        let mut room_pools = vec![config.starts.as_slice(), config.ends.as_slice()];
        if config.number_of_rooms > 2 {
            room_pools.push(config.rooms.as_slice());
        }
        for entry in room_pools.into_iter().flatten() {
            if entry.weight == 0 {
                continue;
            }
            let piece = catalog.insert(&entry.id, source)?;
            if piece.openings().is_empty() {
                return Err(GenerateError::NoOpenings(entry.id.clone()));
            }
        }
        for id in &config.paths {
            let piece = catalog.insert(id, source)?;
            if piece.openings().is_empty() {
                log::warn!("corridor template {id} has no openings and will never be used");
            }
        }
        Ok(catalog)
    }

    fn insert<S: TemplateSource + ?Sized>(
        &mut self,
        id: &TemplateId,
        source: &mut S,
    ) -> Result<&Piece, GenerateError> {
        if !self.entries.contains_key(id) {
            let template = source.load(id)?;
            let dungeon = template
                .dungeon
                .ok_or_else(|| GenerateError::MissingDungeonRegion(id.clone()))?;
            let scan = find_openings(dungeon, &template.openings);
            for region in &scan.malformed {
                log::warn!(
                    "template {id}: opening region {region:?} is not flush with a face of \
                     the dungeon region {dungeon:?}; ignoring it"
                );
            }
            self.malformed += scan.malformed.len();
            let piece = Piece::new(id.clone(), dungeon, scan.openings);
            self.entries.insert(id.clone(), (template, piece));
        }
        self.piece(id)
    }

    fn piece(&self, id: &TemplateId) -> Result<&Piece, GenerateError> {
        self.entries
            .get(id)
            .map(|(_, piece)| piece)
            .ok_or_else(|| LoadError::NotFound(id.clone()).into())
    }

    fn template(&self, id: &TemplateId) -> Result<&Template, GenerateError> {
        self.entries
            .get(id)
            .map(|(template, _)| template)
            .ok_or_else(|| LoadError::NotFound(id.clone()).into())
    }

    /// Picks a piece from the pool named `name`.
    fn choose<R: Rng + ?Sized>(
        &self,
        name: &'static str,
        pool: &[PoolEntry],
        rng: &mut R,
    ) -> Result<&Piece, GenerateError> {
        let id = choose_from(pool, rng).ok_or(ConfigError::EmptyPool(name))?;
        self.piece(id)
    }
}

/// Everything one placement attempt produces besides the rooms.
#[derive(Debug)]
struct Layout {
    corridors: Vec<Piece>,
    steering_sweeps: u32,
    candidate_edges: usize,
    used_fallback_graph: bool,
    tree_edges: usize,
    back_edges: usize,
    corridor_expansions: Vec<u32>,
}

/// A connection for which no pair of openings could be joined.
#[derive(Debug)]
struct Unjoined {
    pairs: u32,
    last: NoSolution,
}

/// Places rooms and connects them. The inner error means this placement cannot be
/// completed, but another one might be.
fn attempt_layout<R: Rng + ?Sized>(
    config: &GenerationConfig,
    catalog: &Catalog,
    corridor_pieces: &[Piece],
    rng: &mut R,
) -> Result<Result<(Vec<Piece>, Layout), Unjoined>, GenerateError> {
    let mut rooms = place_rooms(config, catalog, rng)?;
    let steering_sweeps = steer(
        &mut rooms,
        config.separation(),
        config.max_steering_iterations,
        rng,
    )?;

    let (candidates, used_fallback_graph) = candidate_edges(&rooms);
    let tree = minimum_spanning_tree(&candidates, rng.random_range(0..rooms.len()));
    let back: BTreeSet<Edge> = candidates
        .iter()
        .filter(|edge| !tree.contains(edge))
        .filter(|_| rng.random_bool(config.back_edge_chance))
        .copied()
        .collect();
    log::debug!(
        "{} rooms, {} candidate connections, {} in tree, {} added back",
        rooms.len(),
        candidates.len(),
        tree.len(),
        back.len()
    );

    let connections: BTreeSet<Edge> = tree.union(&back).copied().collect();
    let mut corridors: Vec<Piece> = Vec::new();
    let mut occupied: Vec<AxisBox> = rooms.iter().map(Piece::bounds).collect();
    let mut corridor_expansions = Vec::with_capacity(connections.len());

    for edge in &connections {
        let (a, b) = (&rooms[edge.u()], &rooms[edge.v()]);
        let mut last_failure: Option<NoSolution> = None;
        let mut pairs = 0;
        let mut joined = false;
        for (start, end) in opening_pairs(a, b, rng)
            .into_iter()
            .take(config.opening_attempts as usize)
        {
            pairs += 1;
            let found = PathFinder::new(corridor_pieces)
                .with_placed(&corridors)
                .with_occupied(&occupied)
                .with_max_expansions(config.max_search_expansions)
                .find_path(&start, &end, rng);
            match found {
                Ok(path) => {
                    log::debug!(
                        "joined {} at {:?} to {} at {:?} with {} pieces",
                        a.template(),
                        start.center().to_array(),
                        b.template(),
                        end.center().to_array(),
                        path.pieces.len()
                    );
                    for piece in &path.pieces {
                        log::trace!("corridor piece at {:?}", piece.bounds());
                    }
                    corridor_expansions.push(path.expansions);
                    occupied.extend(path.pieces.iter().map(Piece::bounds));
                    corridors.extend(path.pieces);
                    joined = true;
                    break;
                }
                Err(failure) => {
                    log::debug!("{failure}: {}", failure.reason);
                    last_failure = Some(failure);
                }
            }
        }
        if !joined {
            return match last_failure {
                Some(last) => Ok(Err(Unjoined { pairs, last })),
                // Rooms always have openings, so there is always at least one pair.
                None => Err(GenerateError::NoOpenings(a.template().clone())),
            };
        }
    }

    Ok(Ok((
        rooms,
        Layout {
            corridors,
            steering_sweeps,
            candidate_edges: candidates.len(),
            used_fallback_graph,
            tree_edges: tree.len(),
            back_edges: back.len(),
            corridor_expansions,
        },
    )))
}

/// Chooses the rooms and centers them on the origin: the middle rooms, then the start
/// room, then the end room.
fn place_rooms<R: Rng + ?Sized>(
    config: &GenerationConfig,
    catalog: &Catalog,
    rng: &mut R,
) -> Result<Vec<Piece>, GenerateError> {
    let middle = config.number_of_rooms - 2;
    let mut rooms = Vec::with_capacity(config.number_of_rooms as usize);
    for _ in 0..middle {
        let mut room = catalog.choose("rooms", &config.rooms, rng)?.clone();
        if config.rotate_rooms {
            let turns = rng.random_range(0..GridRotation::ABOUT_Y.len());
            room = room.with_transform(GridRotation::ABOUT_Y[turns].into());
        }
        rooms.push(room.centered());
    }
    rooms.push(catalog.choose("starts", &config.starts, rng)?.centered());
    rooms.push(catalog.choose("ends", &config.ends, rng)?.centered());
    Ok(rooms)
}

/// Finds the connections that the spanning tree is chosen from, and whether the
/// fallback graph was needed.
fn candidate_edges(rooms: &[Piece]) -> (BTreeSet<Edge>, bool) {
    let centers: Vec<_> = rooms.iter().map(Piece::center).collect();
    match triangulate(&centers) {
        Ok(edges) if spans(&edges, rooms.len()) => (edges, false),
        Ok(_) => {
            log::warn!(
                "tetrahedralization of room centers is disconnected; using the Gabriel graph"
            );
            (gabriel_graph(&centers), true)
        }
        Err(error) => {
            log::warn!("{error}; using the Gabriel graph of room centers instead");
            (gabriel_graph(&centers), true)
        }
    }
}

fn spans(edges: &BTreeSet<Edge>, vertex_count: usize) -> bool {
    vertex_count == 0 || minimum_spanning_tree(edges, 0).len() + 1 == vertex_count
}

/// Every pairing of an opening of `a` with an opening of `b`, nearest first, in random
/// order among equally distant pairs.
fn opening_pairs<R: Rng + ?Sized>(
    a: &Piece,
    b: &Piece,
    rng: &mut R,
) -> Vec<(Opening, Opening)> {
    let mut pairs: Vec<(Opening, Opening)> = a
        .openings()
        .iter()
        .copied()
        .cartesian_product(b.openings().iter().copied())
        .collect();
    pairs.shuffle(rng);
    pairs.sort_by_key(|(x, y)| manhattan(x.center(), y.center()));
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::tests::{hall, room};
    use pretty_assertions::assert_eq;
    use rand::SeedableRng as _;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn opening_pairs_nearest_first() {
        let a = room();
        let b = room().translated(GridVector::new(10, 0, 0));
        let mut rng = Xoshiro256Plus::seed_from_u64(4);
        let pairs = opening_pairs(&a, &b, &mut rng);
        assert_eq!(pairs.len(), 36);
        let (start, end) = pairs[0];
        assert_eq!(start.center(), GridPoint::new(2, 1, 1));
        assert_eq!(end.center(), GridPoint::new(10, 1, 1));
    }

    #[test]
    fn spanning_check() {
        let connected = BTreeSet::from([Edge::new(0, 1, 1.0), Edge::new(1, 2, 1.0)]);
        assert!(spans(&connected, 3));
        assert!(!spans(&connected, 4));
    }

    #[test]
    fn collinear_rooms_use_fallback() {
        let rooms: Vec<Piece> = (0..4)
            .map(|i| hall().translated(GridVector::new(i * 3, 0, 0)))
            .collect();
        let (edges, fallback) = candidate_edges(&rooms);
        assert!(fallback);
        assert!(spans(&edges, rooms.len()));
        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn coplanar_rooms_use_fallback() {
        let rooms: Vec<Piece> = [(0, 0), (3, 0), (0, 3), (4, 5), (7, 2)]
            .into_iter()
            .map(|(x, z)| hall().translated(GridVector::new(x, 0, z)))
            .collect();
        let (edges, fallback) = candidate_edges(&rooms);
        assert!(fallback);
        assert!(spans(&edges, rooms.len()));
    }
}
