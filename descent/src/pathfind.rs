//! A* search for chains of corridor pieces that join two openings.
//!
//! The search state is an opening that has been reached. Expanding a state docks every
//! catalog piece against it in every way that fits, and each other opening of the
//! docked piece becomes a new state. Corridors placed by earlier searches are not
//! obstacles to route around but shortcuts: when a new piece's opening meets an existing
//! corridor, the search follows that corridor for free and continues from wherever it
//! leads.
//!
//! The heuristic is the Manhattan distance between opening centers. It is not admissible
//! for pieces larger than one cube, so paths are connected and collision-free but not
//! necessarily the shortest possible.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::iter;

use descent_base::math::{AxisBox, manhattan};
use hashbrown::{HashMap, HashSet};
use rand::Rng;
use rand::seq::IndexedRandom as _;

use crate::piece::{Opening, Piece};

/// Default limit on the number of states a single search may expand.
pub const DEFAULT_MAX_EXPANSIONS: u32 = 20_000;

/// Finds corridors between openings, given a catalog of corridor pieces and the
/// geometry already present.
#[derive(Clone, Copy, Debug)]
pub struct PathFinder<'a> {
    catalog: &'a [Piece],
    placed: &'a [Piece],
    occupied: &'a [AxisBox],
    max_expansions: u32,
}

/// A successful result of [`PathFinder::find_path()`].
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Path {
    /// The new pieces to place, ordered from the start opening to the end opening.
    /// Empty if the openings were already joined.
    pub pieces: Vec<Piece>,
    /// Number of search states expanded.
    pub expansions: u32,
}

/// Failure of [`PathFinder::find_path()`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error(
    "no corridor joins the opening at {:?} to the opening at {:?}",
    .start.center().to_array(),
    .end.center().to_array()
)]
#[non_exhaustive]
pub struct NoSolution {
    /// The opening the corridor was to start from.
    pub start: Opening,
    /// The opening the corridor was to reach.
    pub end: Opening,
    /// Why the search failed.
    #[source]
    pub reason: NoSolutionReason,
}

/// Why a corridor search failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, displaydoc::Display)]
#[non_exhaustive]
pub enum NoSolutionReason {
    /// the openings are one cube apart without facing each other
    Unreachable,
    /// every reachable placement was tried ({expansions} expansions)
    Exhausted {
        /// Number of search states expanded.
        expansions: u32,
    },
    /// the search was abandoned after {expansions} expansions
    BudgetExceeded {
        /// Number of search states expanded.
        expansions: u32,
    },
}

impl std::error::Error for NoSolutionReason {}

impl<'a> PathFinder<'a> {
    /// Constructs a path finder that builds corridors out of `catalog`, with nothing
    /// else placed yet.
    ///
    /// The catalog pieces should be unplaced; they are only ever translated.
    pub fn new(catalog: &'a [Piece]) -> Self {
        Self {
            catalog,
            placed: &[],
            occupied: &[],
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }

    /// Sets the corridor pieces placed by earlier searches, which new corridors may
    /// pass through.
    #[must_use]
    pub fn with_placed(mut self, placed: &'a [Piece]) -> Self {
        self.placed = placed;
        self
    }

    /// Sets the volumes no new piece may intersect. This should include the bounds
    /// of every room and every placed corridor piece.
    #[must_use]
    pub fn with_occupied(mut self, occupied: &'a [AxisBox]) -> Self {
        self.occupied = occupied;
        self
    }

    /// Sets the limit on the number of states a search may expand.
    #[must_use]
    pub fn with_max_expansions(mut self, max_expansions: u32) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Finds a sequence of new pieces that connects `start` to `end`.
    ///
    /// When several equally short paths are found at the same moment, `rng` picks
    /// among them; it is not consulted otherwise.
    pub fn find_path<R: Rng + ?Sized>(
        &self,
        start: &Opening,
        end: &Opening,
        rng: &mut R,
    ) -> Result<Path, NoSolution> {
        let fail = |reason| NoSolution {
            start: *start,
            end: *end,
            reason,
        };

        let distance = manhattan(start.center(), end.center());
        if start == end || distance == 0 || start.is_connected(end) {
            return Ok(Path::default());
        }
        if distance == 1 {
            return Err(fail(NoSolutionReason::Unreachable));
        }

        let mut search = Search::new(*end);
        let seed = self.splice(*start, end);
        if seed.reaches_end {
            log::trace!("start is already joined to end by placed corridors");
            return Ok(Path::default());
        }
        for leaf in seed.leaves {
            search.offer(leaf, None, 0, None);
        }

        let mut expansions = 0;
        while let Some(Reverse((_, _, index))) = search.open.pop() {
            if !search.closed.insert(search.nodes[index].opening) {
                // superseded by a cheaper visit
                continue;
            }
            if expansions >= self.max_expansions {
                return Err(fail(NoSolutionReason::BudgetExceeded { expansions }));
            }
            expansions += 1;

            let finishers = self.expand(&mut search, index);
            let Some(best) = finishers.iter().map(|&(g, _)| g).min() else {
                continue;
            };
            let tied: Vec<&Piece> = finishers
                .iter()
                .filter(|&&(g, _)| g == best)
                .map(|(_, piece)| piece)
                .collect();
            if let Some(&last) = tied.choose(rng) {
                let mut pieces: Vec<Piece> = search
                    .chain(index)
                    .filter_map(|node| node.piece.clone())
                    .collect();
                pieces.reverse();
                pieces.push(last.clone());
                log::trace!(
                    "found {} piece corridor of cost {best} after {expansions} expansions",
                    pieces.len()
                );
                return Ok(Path { pieces, expansions });
            }
        }

        Err(fail(NoSolutionReason::Exhausted { expansions }))
    }

    /// Generates the successors of the state at `index`, adding them to `search`, and
    /// returns the pieces that would reach the end together with their path costs.
    fn expand(&self, search: &mut Search, index: usize) -> Vec<(u32, Piece)> {
        let from = search.nodes[index].opening;
        let from_cost = search.nodes[index].g;
        let ancestors: Vec<AxisBox> = search
            .chain(index)
            .filter_map(|node| node.piece.as_ref().map(Piece::bounds))
            .collect();
        log::trace!(
            "expanding {:?} facing {:?}, g = {from_cost}",
            from.center(),
            from.direction()
        );

        let mut finishers = Vec::new();
        for template in self.catalog {
            for (candidate, entrance) in template.matched_with(&from) {
                let bounds = candidate.bounds();
                if self
                    .occupied
                    .iter()
                    .chain(&ancestors)
                    .any(|other| other.intersects(bounds))
                {
                    continue;
                }

                for exit in candidate.openings().iter().filter(|&&o| o != entrance) {
                    let g = from_cost + Piece::traversal_cost(&from, exit);
                    if exit.is_connected(&search.end) {
                        finishers.push((g, candidate.clone()));
                        continue;
                    }
                    let spliced = self.splice(*exit, &search.end);
                    if spliced.reaches_end {
                        finishers.push((g, candidate.clone()));
                        continue;
                    }
                    for leaf in spliced.leaves {
                        search.offer(leaf, Some(index), g, Some(candidate.clone()));
                    }
                }
            }
        }
        finishers
    }

    /// Follows placed corridors onward from `exit`, returning the openings at which
    /// they run out.
    ///
    /// If nothing is attached to `exit`, the only leaf is `exit` itself.
    fn splice(&self, exit: Opening, end: &Opening) -> Splice {
        let mut splice = Splice::default();
        self.splice_into(exit, end, &mut Vec::new(), &mut splice);
        splice
    }

    fn splice_into(&self, exit: Opening, end: &Opening, visited: &mut Vec<usize>, out: &mut Splice) {
        let attached = self.placed.iter().enumerate().find_map(|(i, piece)| {
            piece
                .openings()
                .iter()
                .find(|opening| opening.is_connected(&exit))
                .map(|&entry| (i, entry))
        });
        let Some((i, entry)) = attached else {
            out.leaves.push(exit);
            return;
        };
        if visited.contains(&i) {
            return;
        }
        visited.push(i);
        for &opening in self.placed[i].openings() {
            if opening == entry {
                continue;
            }
            if opening.is_connected(end) {
                out.reaches_end = true;
            } else {
                self.splice_into(opening, end, visited, out);
            }
        }
    }
}

/// Result of following placed corridors.
#[derive(Debug, Default)]
struct Splice {
    leaves: Vec<Opening>,
    reaches_end: bool,
}

#[derive(Debug)]
struct Node {
    opening: Opening,
    parent: Option<usize>,
    /// Cost of the path from the start to this opening.
    g: u32,
    /// The new piece through which this opening was reached, or [`None`] if it was
    /// reached from the start through placed corridors alone.
    piece: Option<Piece>,
}

#[derive(Debug)]
struct Search {
    end: Opening,
    nodes: Vec<Node>,
    /// Ordered by estimated total cost, then by estimated remaining cost, then by
    /// creation order.
    open: BinaryHeap<Reverse<(u32, u32, usize)>>,
    /// Lowest estimated total cost with which each opening has been offered.
    best: HashMap<Opening, u32>,
    closed: HashSet<Opening>,
}

impl Search {
    fn new(end: Opening) -> Self {
        Self {
            end,
            nodes: Vec::new(),
            open: BinaryHeap::new(),
            best: HashMap::new(),
            closed: HashSet::new(),
        }
    }

    /// Adds a state unless the same opening has already been expanded or offered at
    /// no greater cost.
    fn offer(&mut self, opening: Opening, parent: Option<usize>, g: u32, piece: Option<Piece>) {
        if self.closed.contains(&opening) {
            return;
        }
        let h = manhattan(opening.center(), self.end.center());
        let f = g + h;
        if self.best.get(&opening).is_some_and(|&best| best <= f) {
            return;
        }
        self.best.insert(opening, f);
        let index = self.nodes.len();
        self.nodes.push(Node {
            opening,
            parent,
            g,
            piece,
        });
        self.open.push(Reverse((f, h, index)));
    }

    /// The node at `index` and its ancestors, nearest first.
    fn chain(&self, index: usize) -> impl Iterator<Item = &Node> {
        iter::successors(Some(&self.nodes[index]), |node| {
            node.parent.map(|parent| &self.nodes[parent])
        })
    }
}
