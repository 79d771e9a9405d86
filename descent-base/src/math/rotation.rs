//! Rotations which exchange axes (thus not leaving the integer grid).
//! This module is private but reexported by its parent.

use core::fmt;
use core::ops::Mul;

use crate::math::{Axis, Face6, GridCoordinate, GridVector};

/// Represents a discrete (grid-aligned) rotation, or exchange of axes.
///
/// Compared to a general rotation matrix, this can only represent 90-degree turns, and
/// it may include a reflection. There are 48 such values; every one is fully described by
/// the faces that the three positive axes are sent to.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct GridRotation {
    /// Images of [`Face6::PX`], [`Face6::PY`], and [`Face6::PZ`].
    /// Constructor checks ensure these lie on three distinct axes.
    basis: [Face6; 3],
}

impl GridRotation {
    /// The identity rotation, also known as `RXYZ`.
    pub const IDENTITY: Self = Self {
        basis: [Face6::PX, Face6::PY, Face6::PZ],
    };

    /// The rotation that is clockwise in our Y-up right-handed coordinate system.
    ///
    /// ```
    /// # extern crate descent_base;
    /// use descent_base::math::{Face6::*, GridRotation};
    ///
    /// assert_eq!(GridRotation::CLOCKWISE.transform(PX), PZ);
    /// assert_eq!(GridRotation::CLOCKWISE.transform(PZ), NX);
    /// assert_eq!(GridRotation::CLOCKWISE.transform(NX), NZ);
    /// assert_eq!(GridRotation::CLOCKWISE.transform(NZ), PX);
    ///
    /// assert_eq!(GridRotation::CLOCKWISE.transform(PY), PY);
    /// ```
    pub const CLOCKWISE: Self = Self {
        basis: [Face6::PZ, Face6::PY, Face6::NX],
    };

    /// The rotation that is counterclockwise in our Y-up right-handed coordinate system.
    pub const COUNTERCLOCKWISE: Self = Self {
        basis: [Face6::NZ, Face6::PY, Face6::PX],
    };

    /// The half turn about the Y axis.
    pub const HALF_TURN_Y: Self = Self {
        basis: [Face6::NX, Face6::PY, Face6::NZ],
    };

    /// Constructs a rotation from the faces that the positive X, Y, and Z axes
    /// should be mapped to.
    ///
    /// Returns [`None`] if two of the faces lie on the same axis.
    ///
    /// ```
    /// # extern crate descent_base;
    /// use descent_base::math::{Face6::*, GridRotation};
    ///
    /// assert_eq!(GridRotation::from_basis([PX, PY, PZ]), Some(GridRotation::IDENTITY));
    /// assert_eq!(GridRotation::from_basis([PX, NX, PZ]), None);
    /// ```
    #[inline]
    pub const fn from_basis(basis: [Face6; 3]) -> Option<Self> {
        let [x, y, z] = basis;
        let (ax, ay, az) = (x.axis() as u8, y.axis() as u8, z.axis() as u8);
        if ax == ay || ay == az || ax == az {
            None
        } else {
            Some(Self { basis })
        }
    }

    /// Returns the faces that the positive X, Y, and Z axes are mapped to.
    #[inline]
    pub const fn to_basis(self) -> [Face6; 3] {
        self.basis
    }

    /// Returns every rotation and reflection, 48 in all, in a fixed order.
    #[inline]
    pub fn all() -> impl Iterator<Item = Self> {
        Face6::ALL.into_iter().flat_map(|x| {
            Face6::ALL.into_iter().flat_map(move |y| {
                Face6::ALL
                    .into_iter()
                    .filter_map(move |z| Self::from_basis([x, y, z]))
            })
        })
    }

    /// The four rotations about the Y axis, starting with the identity.
    pub const ABOUT_Y: [Self; 4] = [
        Self::IDENTITY,
        Self::CLOCKWISE,
        Self::HALF_TURN_Y,
        Self::COUNTERCLOCKWISE,
    ];

    /// Rotate the face by this rotation.
    #[inline]
    pub fn transform(self, face: Face6) -> Face6 {
        let p = self.basis[face.axis()];
        if face.is_negative() { p.opposite() } else { p }
    }

    /// Rotate the vector by this rotation.
    ///
    /// May panic or wrap if `vector` has any components equal to [`GridCoordinate::MIN`].
    #[inline]
    pub fn transform_vector(self, vector: GridVector) -> GridVector {
        let mut result = GridVector::zero();
        for axis in Axis::ALL {
            let image = self.basis[axis];
            result[image.axis()] = vector[axis] * image.signum();
        }
        result
    }

    /// Returns whether this is a reflection.
    ///
    /// ```
    /// # extern crate descent_base;
    /// use descent_base::math::{Face6::*, GridRotation};
    ///
    /// assert!(!GridRotation::IDENTITY.is_reflection());
    /// assert!(!GridRotation::from_basis([PX, PZ, NY]).unwrap().is_reflection());
    /// assert!(GridRotation::from_basis([PX, PZ, PY]).unwrap().is_reflection());
    /// ```
    #[inline]
    pub fn is_reflection(self) -> bool {
        let [x, y, z] = self.basis.map(|face| face.normal_vector::<GridCoordinate, ()>());
        x.cross(y).dot(z) < 0
    }

    /// Returns the inverse of this rotation; the one which undoes this.
    ///
    /// ```
    /// # extern crate descent_base;
    /// use descent_base::math::GridRotation;
    ///
    /// for rotation in GridRotation::all() {
    ///     assert_eq!(rotation * rotation.inverse(), GridRotation::IDENTITY);
    /// }
    /// ```
    #[must_use]
    #[inline]
    pub fn inverse(self) -> Self {
        let mut basis = Self::IDENTITY.basis;
        for axis in Axis::ALL {
            let image = self.basis[axis];
            basis[image.axis()] = Face6::from_axis(axis, image.is_positive());
        }
        Self { basis }
    }
}

impl Default for GridRotation {
    /// Returns the identity (no rotation).
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Self> for GridRotation {
    type Output = Self;

    /// Multiplication is concatenation: `self * rhs` is equivalent to
    /// applying `rhs` and then applying `self`.
    ///
    /// ```
    /// # extern crate descent_base;
    /// use descent_base::math::{Face6, Face6::*, GridRotation};
    ///
    /// let transform_1 = GridRotation::from_basis([NY, PX, PZ]).unwrap();
    /// let transform_2 = GridRotation::from_basis([PY, PZ, PX]).unwrap();
    ///
    /// // Demonstrate the directionality of concatenation.
    /// for face in Face6::ALL {
    ///     assert_eq!(
    ///         (transform_1 * transform_2).transform(face),
    ///         transform_1.transform(transform_2.transform(face)),
    ///     );
    /// }
    /// ```
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            basis: rhs.basis.map(|v| self.transform(v)),
        }
    }
}

impl fmt::Debug for GridRotation {
    /// Formats in the same compact notation as the constant names:
    /// `R` followed by the axes that +X, +Y, +Z map to, lowercase when negated.
    #[inline(never)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("R")?;
        for face in self.basis {
            let letter = match face.axis() {
                Axis::X => 'X',
                Axis::Y => 'Y',
                Axis::Z => 'Z',
            };
            let letter = if face.is_negative() {
                letter.to_ascii_lowercase()
            } else {
                letter
            };
            fmt::Write::write_char(f, letter)?;
        }
        Ok(())
    }
}
