//! Axis-aligned integer-coordinate boxes with inclusive bounds ([`AxisBox`]).

use core::fmt;

use crate::math::{
    Axis, Face6, FreeCoordinate, FreePoint, GridCoordinate, GridPoint, GridVector, Transform,
    VectorOps,
};

/// An axis-aligned box of cubes, identified by its lowest and highest cube (both included).
///
/// Because both corners are cubes inside the box, a box one cube thick along some axis has
/// a [`size()`](Self::size) of zero on that axis; this is how the flat faces used as piece
/// openings are represented.
///
/// Invariant: `min <= max` on every axis.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct AxisBox {
    min: GridPoint,
    /// Constructor checks ensure this is not smaller than `min`.
    max: GridPoint,
}

impl AxisBox {
    /// Box containing only the cube at the origin.
    pub const ORIGIN_CUBE: Self = Self {
        min: GridPoint::new(0, 0, 0),
        max: GridPoint::new(0, 0, 0),
    };

    /// Constructs an [`AxisBox`] from its lowest and highest cubes.
    ///
    /// Returns an error if `max` is lower than `min` on any axis.
    ///
    /// ```
    /// # extern crate descent_base;
    /// use descent_base::math::AxisBox;
    ///
    /// assert!(AxisBox::new([0, 0, 0], [2, 2, 2]).is_ok());
    /// assert!(AxisBox::new([0, 3, 0], [2, 2, 2]).is_err());
    /// ```
    #[inline]
    pub fn new(
        min: impl Into<GridPoint>,
        max: impl Into<GridPoint>,
    ) -> Result<Self, InvertedBoxError> {
        let min = min.into();
        let max = max.into();
        if Axis::ALL.into_iter().any(|axis| max[axis] < min[axis]) {
            Err(InvertedBoxError { min, max })
        } else {
            Ok(Self { min, max })
        }
    }

    /// Constructs the smallest [`AxisBox`] containing both of the given cubes, which may be
    /// any two opposite corners.
    #[inline]
    pub fn from_corners(a: impl Into<GridPoint>, b: impl Into<GridPoint>) -> Self {
        let a = a.into();
        let b = b.into();
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Box containing exactly one cube.
    #[inline]
    pub fn single_cube(cube: GridPoint) -> Self {
        Self {
            min: cube,
            max: cube,
        }
    }

    /// The lowest cube in the box.
    #[inline]
    pub const fn min(&self) -> GridPoint {
        self.min
    }

    /// The highest cube in the box.
    #[inline]
    pub const fn max(&self) -> GridPoint {
        self.max
    }

    /// Difference between the highest and lowest cubes.
    ///
    /// This is one less than the number of cubes along each axis.
    ///
    /// ```
    /// # extern crate descent_base;
    /// use descent_base::math::{AxisBox, GridVector};
    ///
    /// let b = AxisBox::new([0, 0, 5], [2, 0, 5]).unwrap();
    /// assert_eq!(b.size(), GridVector::new(2, 0, 0));
    /// ```
    #[inline]
    pub fn size(&self) -> GridVector {
        self.max - self.min
    }

    /// The center of the enclosed volume. Returns [`FreeCoordinate`]s since the center
    /// may be at a half-block position.
    ///
    /// ```
    /// # extern crate descent_base;
    /// use descent_base::math::{AxisBox, FreePoint};
    ///
    /// let b = AxisBox::new([0, 0, -2], [9, 2, 1]).unwrap();
    /// assert_eq!(b.center(), FreePoint::new(5.0, 1.5, 0.0));
    /// ```
    #[inline]
    pub fn center(&self) -> FreePoint {
        VectorOps::zip(self.min, self.max, |lo, hi| {
            (FreeCoordinate::from(lo) + FreeCoordinate::from(hi) + 1.0) / 2.0
        })
    }

    /// The cube containing [`center()`](Self::center), rounding down on axes where the
    /// center lies between cubes.
    ///
    /// ```
    /// # extern crate descent_base;
    /// use descent_base::math::{AxisBox, GridPoint};
    ///
    /// let b = AxisBox::new([0, 0, -2], [9, 2, 1]).unwrap();
    /// assert_eq!(b.center_cube(), GridPoint::new(5, 1, 0));
    /// ```
    #[inline]
    pub fn center_cube(&self) -> GridPoint {
        VectorOps::zip(self.min, self.max, |lo, hi| (lo + hi + 1).div_euclid(2))
    }

    /// Returns whether the box includes the given cube in its volume.
    #[inline]
    pub fn contains_cube(&self, cube: GridPoint) -> bool {
        Axis::ALL
            .into_iter()
            .all(|axis| self.min[axis] <= cube[axis] && cube[axis] <= self.max[axis])
    }

    /// Returns whether the two boxes have at least one cube in common.
    ///
    /// ```
    /// # extern crate descent_base;
    /// use descent_base::math::AxisBox;
    ///
    /// let a = AxisBox::new([0, 0, 0], [2, 2, 2]).unwrap();
    /// assert!(a.intersects(AxisBox::new([2, 2, 2], [3, 3, 3]).unwrap()));
    /// assert!(!a.intersects(AxisBox::new([3, 0, 0], [4, 2, 2]).unwrap()));
    /// ```
    #[inline]
    pub fn intersects(&self, other: AxisBox) -> bool {
        Axis::ALL.into_iter().all(|axis| {
            other.min[axis] <= self.max[axis] && self.min[axis] <= other.max[axis]
        })
    }

    /// Returns the box of cubes shared by `self` and `other`, or [`None`] if there are none.
    #[inline]
    #[must_use]
    pub fn intersection(&self, other: AxisBox) -> Option<AxisBox> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        AxisBox::new(min, max).ok()
    }

    /// Returns the smallest box containing both `self` and `other`.
    #[inline]
    #[must_use]
    pub fn union(&self, other: AxisBox) -> AxisBox {
        AxisBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Enlarges the box by `margin` cubes in both directions along each axis.
    ///
    /// Margins are expected to be non-negative.
    ///
    /// ```
    /// # extern crate descent_base;
    /// use descent_base::math::{AxisBox, GridVector};
    ///
    /// assert_eq!(
    ///     AxisBox::ORIGIN_CUBE.expand(GridVector::new(1, 0, 2)),
    ///     AxisBox::new([-1, 0, -2], [1, 0, 2]).unwrap(),
    /// );
    /// ```
    #[inline]
    #[must_use]
    pub fn expand(&self, margin: GridVector) -> AxisBox {
        AxisBox::from_corners(self.min - margin, self.max + margin)
    }

    /// Displaces the box by the given `offset`, leaving its size unchanged.
    #[inline]
    #[must_use]
    pub fn translate(&self, offset: impl Into<GridVector>) -> AxisBox {
        let offset = offset.into();
        AxisBox {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Translate and rotate the box according to the given transform.
    ///
    /// The result covers exactly the images of the cubes in `self`.
    ///
    /// ```
    /// # extern crate descent_base;
    /// use descent_base::math::{AxisBox, GridRotation, Transform};
    ///
    /// let b = AxisBox::new([0, 0, 0], [3, 1, 0]).unwrap();
    /// let turned = b.transform(Transform::from_rotation_about_origin(GridRotation::CLOCKWISE));
    /// assert_eq!(turned, AxisBox::new([-1, 0, 0], [-1, 1, 3]).unwrap());
    /// ```
    #[inline]
    #[must_use]
    pub fn transform(&self, transform: Transform) -> AxisBox {
        // Work with the exclusive upper corner so that rotation about the origin point
        // maps cubes to cubes.
        let one = GridVector::new(1, 1, 1);
        let p1 = transform.transform_point(self.min);
        let p2 = transform.transform_point(self.max + one);
        AxisBox {
            min: p1.min(p2),
            max: p1.max(p2) - one,
        }
    }

    /// Returns the coordinate of the given face of the box along that face's axis:
    /// `min` for negative faces and `max` for positive ones.
    #[inline]
    pub fn face_coordinate(&self, face: Face6) -> GridCoordinate {
        if face.is_positive() {
            self.max[face.axis()]
        } else {
            self.min[face.axis()]
        }
    }
}

impl fmt::Debug for AxisBox {
    #[inline(never)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AxisBox({:?}..={:?}, {:?}..={:?}, {:?}..={:?})",
            self.min.x, self.max.x, self.min.y, self.max.y, self.min.z, self.max.z,
        )
    }
}

/// Error when an [`AxisBox`] cannot be constructed because its corners are inverted.
#[derive(Clone, Copy, Debug, Eq, PartialEq, displaydoc::Display)]
#[displaydoc("box maximum {max:?} is lower than minimum {min:?}")]
pub struct InvertedBoxError {
    min: GridPoint,
    max: GridPoint,
}

impl core::error::Error for InvertedBoxError {}
