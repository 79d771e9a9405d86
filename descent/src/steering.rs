//! Pushing overlapping rooms apart until they keep a minimum distance from each other.

use descent_base::math::{Axis, AxisBox, GridCoordinate, GridVector};
use rand::Rng;

use crate::piece::Piece;

/// How far a push is amplified relative to the overlap that caused it.
const PUSH_GAIN: GridCoordinate = 2;

/// Longest distance, in multiples of the margin, a room may be pushed along an axis
/// in one step.
const MAX_PUSH_MARGINS: GridCoordinate = 5;

/// Failure of [`steer()`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum SteeringError {
    /// Rooms still overlapped after the permitted number of sweeps.
    #[error("rooms were still overlapping after {iterations} sweeps")]
    DidNotSettle {
        /// Number of sweeps performed.
        iterations: u32,
    },
}

/// Moves `rooms` until no room comes within `margin` of another.
///
/// Each sweep visits every room in order. A room that intrudes on another room's
/// bounds, expanded by `margin`, is pushed away from that room by twice the overlap,
/// summed over all rooms it intrudes on and limited to five margins per axis; a room
/// whose pushes cancel out is nudged randomly instead. Moves take effect immediately,
/// so later rooms in the same sweep see them.
///
/// Returns the number of sweeps performed, including the final one in which nothing
/// moved.
pub fn steer<R: Rng + ?Sized>(
    rooms: &mut [Piece],
    margin: GridVector,
    max_sweeps: u32,
    rng: &mut R,
) -> Result<u32, SteeringError> {
    for sweep in 1..=max_sweeps {
        let mut moved = false;
        for i in 0..rooms.len() {
            let Some(push) = push_for(rooms, i, margin) else {
                continue;
            };
            moved = true;
            let offset = if push == GridVector::zero() {
                random_nudge(rooms[i].bounds(), rng)
            } else {
                push
            };
            rooms[i] = rooms[i].translated(offset);
        }
        if !moved {
            log::debug!("rooms settled after {sweep} sweeps");
            return Ok(sweep);
        }
    }
    Err(SteeringError::DidNotSettle {
        iterations: max_sweeps,
    })
}

/// Returns whether every room keeps at least `margin` away from every other.
pub fn is_separated(rooms: &[Piece], margin: GridVector) -> bool {
    rooms.iter().enumerate().all(|(i, a)| {
        rooms
            .iter()
            .enumerate()
            .all(|(j, b)| i == j || !a.bounds().intersects(b.bounds().expand(margin)))
    })
}

/// Computes the push on room `i`, or [`None`] if it does not intrude on any other room.
///
/// The whole margin is added to the other room's box and none to room `i`'s, which
/// leaves the same clearance as splitting it between the two.
fn push_for(rooms: &[Piece], i: usize, margin: GridVector) -> Option<GridVector> {
    let main = rooms[i].bounds();
    let mut total = GridVector::zero();
    let mut intrudes = false;

    for (j, other) in rooms.iter().enumerate() {
        if i == j {
            continue;
        }
        let avoid = other.bounds().expand(margin);
        let Some(overlap) = main.intersection(avoid) else {
            continue;
        };
        intrudes = true;
        let extent = overlap.size() + GridVector::new(1, 1, 1);
        let away = main.center() - avoid.center();
        for axis in Axis::ALL {
            total[axis] += if away[axis] >= 0.0 {
                extent[axis]
            } else {
                -extent[axis]
            };
        }
    }

    if !intrudes {
        return None;
    }
    for axis in Axis::ALL {
        let limit = margin[axis] * MAX_PUSH_MARGINS;
        total[axis] = (total[axis] * PUSH_GAIN).clamp(-limit, limit);
    }
    Some(total)
}

fn random_nudge<R: Rng + ?Sized>(bounds: AxisBox, rng: &mut R) -> GridVector {
    let size = bounds.size();
    let mut nudge = GridVector::zero();
    for axis in Axis::ALL {
        let reach = (size[axis] / 4).max(1);
        nudge[axis] = rng.random_range(-reach..=reach);
    }
    nudge
}
