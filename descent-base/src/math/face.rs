//! Axis-aligned unit vectors: the [`Face6`] type.
//! This module is private but reexported by its parent.

use core::ops;

use euclid::Vector3D;
use num_traits::{One, Zero};

use crate::math::{Axis, GridCoordinate, GridVector};

/// Identifies a face of a cube or an orthogonal unit vector.
///
/// Openings use this as the outward-facing normal of the face they are flush with.
#[expect(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd, exhaust::Exhaust)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Face6 {
    /// Negative X; the face whose normal vector is `(-1, 0, 0)`.
    NX = 1,
    /// Negative Y; the face whose normal vector is `(0, -1, 0)`; downward.
    NY = 2,
    /// Negative Z; the face whose normal vector is `(0, 0, -1)`.
    NZ = 3,
    /// Positive X; the face whose normal vector is `(1, 0, 0)`.
    PX = 4,
    /// Positive Y; the face whose normal vector is `(0, 1, 0)`; upward.
    PY = 5,
    /// Positive Z; the face whose normal vector is `(0, 0, 1)`.
    PZ = 6,
}

impl Face6 {
    /// All the values of [`Face6`].
    pub const ALL: [Face6; 6] = [
        Face6::NX,
        Face6::NY,
        Face6::NZ,
        Face6::PX,
        Face6::PY,
        Face6::PZ,
    ];

    /// Returns which axis this face's normal vector is parallel to.
    #[inline]
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::NX | Self::PX => Axis::X,
            Self::NY | Self::PY => Axis::Y,
            Self::NZ | Self::PZ => Axis::Z,
        }
    }

    /// Returns whether this face is a “positive” face: one whose unit vector's nonzero
    /// coordinate is positive.
    ///
    /// ```
    /// # extern crate descent_base;
    /// use descent_base::math::Face6;
    ///
    /// assert_eq!(Face6::PX.is_positive(), true);
    /// assert_eq!(Face6::NX.is_positive(), false);
    /// ```
    #[inline]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::PX | Self::PY | Self::PZ)
    }

    /// Returns whether this face is a negative face: one whose unit vector's nonzero
    /// coordinate is negative.
    #[inline]
    pub const fn is_negative(self) -> bool {
        matches!(self, Self::NX | Self::NY | Self::NZ)
    }

    /// Returns `1` for positive faces and `-1` for negative faces.
    #[inline]
    pub const fn signum(self) -> GridCoordinate {
        match self {
            Self::NX | Self::NY | Self::NZ => -1,
            Self::PX | Self::PY | Self::PZ => 1,
        }
    }

    /// Returns the opposite face (maps [`PX`](Self::PX) to [`NX`](Self::NX) and so on).
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Face6 {
        match self {
            Face6::NX => Face6::PX,
            Face6::NY => Face6::PY,
            Face6::NZ => Face6::PZ,
            Face6::PX => Face6::NX,
            Face6::PY => Face6::NY,
            Face6::PZ => Face6::NZ,
        }
    }

    /// Returns the face on the given axis with the given sign.
    #[inline]
    pub const fn from_axis(axis: Axis, positive: bool) -> Face6 {
        if positive {
            axis.positive_face()
        } else {
            axis.negative_face()
        }
    }

    /// Returns the axis-aligned unit vector normal to this face.
    #[inline]
    #[must_use]
    pub fn normal_vector<S, U>(self) -> Vector3D<S, U>
    where
        S: Zero + One + ops::Neg<Output = S>,
    {
        let mut v = Vector3D::new(S::zero(), S::zero(), S::zero());
        v[self.axis()] = if self.is_positive() {
            S::one()
        } else {
            -S::one()
        };
        v
    }

    /// Returns the face whose normal vector equals `vector`, if it is a unit vector
    /// along one axis.
    #[inline]
    pub fn from_unit_vector(vector: GridVector) -> Option<Face6> {
        Face6::ALL
            .into_iter()
            .find(|face| face.normal_vector::<GridCoordinate, _>() == vector)
    }
}

impl ops::Neg for Face6 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self::Output {
        self.opposite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exhaust::Exhaust as _;
    use pretty_assertions::assert_eq;

    #[test]
    fn opposite_is_involution() {
        for face in Face6::exhaust() {
            assert_eq!(face.opposite().opposite(), face);
            assert_ne!(face.opposite(), face);
            assert_eq!(face.opposite().axis(), face.axis());
        }
    }

    #[test]
    fn normal_vector_matches_signum() {
        for face in Face6::ALL {
            let n: GridVector = face.normal_vector();
            assert_eq!(n[face.axis()], face.signum(), "{face:?}");
            assert_eq!(n.x.abs() + n.y.abs() + n.z.abs(), 1, "{face:?}");
            assert_eq!(Face6::from_unit_vector(n), Some(face));
        }
    }

    #[test]
    fn from_unit_vector_rejects_others() {
        assert_eq!(Face6::from_unit_vector(GridVector::new(0, 0, 0)), None);
        assert_eq!(Face6::from_unit_vector(GridVector::new(1, 1, 0)), None);
        assert_eq!(Face6::from_unit_vector(GridVector::new(0, 2, 0)), None);
    }
}
