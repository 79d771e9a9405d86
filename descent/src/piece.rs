//! Placed and unplaced instances of templates, and the openings that join them.

use std::sync::Arc;

use descent_base::math::{AxisBox, Face6, FreePoint, GridPoint, GridVector, Transform, manhattan};

use crate::template::TemplateId;

/// A one-cube-thick face of a [`Piece`] through which another piece may connect.
///
/// The center is derived from the bounds and kept alongside them so that the
/// adjacency test, which runs constantly during corridor search, does no arithmetic
/// beyond a subtraction.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Opening {
    bounds: AxisBox,
    direction: Face6,
    center: GridPoint,
}

impl Opening {
    /// Constructs an opening facing `direction` that covers `bounds`.
    pub fn new(bounds: AxisBox, direction: Face6) -> Self {
        Self {
            bounds,
            direction,
            center: bounds.center_cube(),
        }
    }

    /// The cubes of the owning piece that make up this opening.
    pub fn bounds(&self) -> AxisBox {
        self.bounds
    }

    /// The outward-facing normal.
    pub fn direction(&self) -> Face6 {
        self.direction
    }

    /// The cube at the middle of the opening, rounded toward negative coordinates.
    pub fn center(&self) -> GridPoint {
        self.center
    }

    /// Extent of the opening's bounds.
    pub fn size(&self) -> GridVector {
        self.bounds.size()
    }

    /// Returns whether `self` and `other` face each other across a single cube step:
    /// opposite directions, equal sizes, and `other` lies exactly one cube beyond `self`
    /// in the direction `self` faces.
    ///
    /// This relation is symmetric.
    pub fn is_connected(&self, other: &Opening) -> bool {
        self.direction == other.direction.opposite()
            && self.size() == other.size()
            && other.center - self.center == self.direction.normal_vector()
    }

    /// Returns the opening moved by `transform`.
    #[must_use]
    pub fn transform(&self, transform: Transform) -> Self {
        Self::new(
            self.bounds.transform(transform),
            transform.rotation.transform(self.direction),
        )
    }

    /// Returns the opening displaced by `offset`.
    #[must_use]
    pub fn translate(&self, offset: GridVector) -> Self {
        Self {
            bounds: self.bounds.translate(offset),
            direction: self.direction,
            center: self.center + offset,
        }
    }
}

/// Result of [`find_openings()`].
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct OpeningScan {
    /// Openings found, in the order of the regions that produced them.
    pub openings: Vec<Opening>,
    /// Regions that were not flush with any face of the footprint.
    pub malformed: Vec<AxisBox>,
}

/// Determines which faces of the footprint `dungeon` each of `regions` lies flush against.
///
/// A region is flush against a face when it is zero-sized along that face's axis and
/// its coordinate on that axis equals the footprint's coordinate for that face. A region
/// may be flush against several faces (a single-cube piece has one region that opens in
/// all six directions); each such face yields one [`Opening`]. Regions flush against no
/// face are returned in [`OpeningScan::malformed`] rather than failing.
pub fn find_openings(dungeon: AxisBox, regions: &[AxisBox]) -> OpeningScan {
    let mut scan = OpeningScan::default();
    for &region in regions {
        let before = scan.openings.len();
        if dungeon.intersection(region) == Some(region) {
            let size = region.size();
            for face in Face6::ALL {
                let axis = face.axis();
                if size[axis] == 0 && region.min()[axis] == dungeon.face_coordinate(face) {
                    scan.openings.push(Opening::new(region, face));
                }
            }
        }
        if scan.openings.len() == before {
            scan.malformed.push(region);
        }
    }
    scan
}

/// A template instance: its footprint and openings, positioned by a [`Transform`].
///
/// Pieces are values. Moving one produces a new piece; the template-space geometry is
/// shared and every placement is derived from it exactly, so any sequence of moves
/// followed by its inverse yields the original piece.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Piece {
    template: TemplateId,
    local: Arc<LocalShape>,
    transform: Transform,
    bounds: AxisBox,
    openings: Vec<Opening>,
}

#[derive(Debug, Eq, Hash, PartialEq)]
struct LocalShape {
    bounds: AxisBox,
    openings: Vec<Opening>,
}

impl Piece {
    /// Constructs an unplaced piece from template-space geometry.
    pub fn new(template: TemplateId, bounds: AxisBox, openings: Vec<Opening>) -> Self {
        Self {
            template,
            transform: Transform::IDENTITY,
            bounds,
            openings: openings.clone(),
            local: Arc::new(LocalShape { bounds, openings }),
        }
    }

    /// Name of the template this piece is an instance of.
    pub fn template(&self) -> &TemplateId {
        &self.template
    }

    /// The transform from template space to this placement.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// The volume this piece occupies.
    pub fn bounds(&self) -> AxisBox {
        self.bounds
    }

    /// The openings of this piece, in placement coordinates.
    pub fn openings(&self) -> &[Opening] {
        &self.openings
    }

    /// Center of [`bounds()`](Self::bounds).
    pub fn center(&self) -> FreePoint {
        self.bounds.center()
    }

    /// Returns this piece moved by `transform`, applied after its existing transform.
    #[must_use]
    pub fn with_transform(&self, transform: Transform) -> Self {
        let transform = self.transform.then(transform);
        Self {
            template: self.template.clone(),
            local: self.local.clone(),
            transform,
            bounds: self.local.bounds.transform(transform),
            openings: self
                .local
                .openings
                .iter()
                .map(|opening| opening.transform(transform))
                .collect(),
        }
    }

    /// Returns this piece displaced by `offset`.
    #[must_use]
    pub fn translated(&self, offset: GridVector) -> Self {
        self.with_transform(Transform::from_translation(offset))
    }

    /// Returns this piece translated so that its center cube is at the origin.
    #[must_use]
    pub fn centered(&self) -> Self {
        self.translated(-self.bounds.center_cube().to_vector())
    }

    /// Enumerates every translation of this piece that docks one of its openings
    /// against `target`.
    ///
    /// Each result is the moved piece together with the opening, in its new position,
    /// through which it is entered; that opening is connected to `target`.
    /// Rotations are not considered.
    pub fn matched_with(&self, target: &Opening) -> Vec<(Piece, Opening)> {
        let step: GridVector = target.direction().normal_vector();
        self.openings
            .iter()
            .filter(|own| {
                own.direction() == target.direction().opposite() && own.size() == target.size()
            })
            .map(|own| {
                let offset = target.bounds().min() - own.bounds().min() + step;
                (self.translated(offset), own.translate(offset))
            })
            .collect()
    }

    /// Cost of travelling from one opening to another: the Manhattan distance between
    /// their centers.
    pub(crate) fn traversal_cost(from: &Opening, to: &Opening) -> u32 {
        manhattan(from.center(), to.center())
    }
}
