use core::fmt;

use crate::math::{GridCoordinate, GridPoint, GridRotation, GridVector};

/// A [rigid transformation] that is composed of a [`GridRotation`] followed by an
/// integer-valued translation.
///
/// That is, mathematically, this may represent any transformation from ℤ³ to ℤ³ that
/// preserves distances between transformed points.
/// As [`GridRotation`] includes reflections, so too does this.
///
/// Pieces carry one of these to record how they were moved from template space to
/// their placement. Composition is exact integer arithmetic, so any sequence of moves
/// can be undone exactly by its inverse.
///
/// [rigid transformation]: https://en.wikipedia.org/wiki/Rigid_transformation
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Transform {
    /// Rotation component. Applied before the translation.
    pub rotation: GridRotation,
    /// Translation component. Applied after the rotation.
    pub translation: GridVector,
}

impl Transform {
    /// The identity transform, which leaves points unchanged.
    pub const IDENTITY: Self = Self {
        rotation: GridRotation::IDENTITY,
        translation: GridVector::new(0, 0, 0),
    };

    /// Constructs a [`Transform`] that only performs rotation.
    ///
    /// Note that this is a rotation about the origin _point_ `[0, 0, 0]`, not the _cube_
    /// that is identified by that point.
    #[inline]
    pub const fn from_rotation_about_origin(rotation: GridRotation) -> Self {
        Self {
            rotation,
            translation: GridVector::new(0, 0, 0),
        }
    }

    /// Constructs a [`Transform`] that only performs translation.
    #[inline]
    pub fn from_translation(translation: impl Into<GridVector>) -> Self {
        Self {
            rotation: GridRotation::IDENTITY,
            translation: translation.into(),
        }
    }

    /// Returns the transform that applies `self` and then `next`.
    ///
    /// This is the same as `next * self`, spelled in application order.
    #[inline]
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        next * self
    }

    /// Applies this transform to the given point.
    ///
    /// Note that a point is not a unit cube; if the point identifies a cube then use
    /// [`Transform::transform_cube()`] instead.
    #[inline]
    pub fn transform_point(self, point: GridPoint) -> GridPoint {
        self.rotation.transform_vector(point.to_vector()).to_point() + self.translation
    }

    /// Applies only the rotation part of this transform to the given vector.
    #[inline]
    pub fn transform_vector(self, vector: GridVector) -> GridVector {
        self.rotation.transform_vector(vector)
    }

    /// Transforms the unit cube whose lowest corner is `cube`, returning the lowest
    /// corner of the image.
    ///
    /// ```
    /// # extern crate descent_base;
    /// use descent_base::math::{GridPoint, GridRotation, GridVector, Transform};
    ///
    /// // Translation without rotation has the usual definition.
    /// let t = Transform::from_translation([10, 0, 0]);
    /// assert_eq!(t.transform_cube(GridPoint::new(1, 1, 1)), GridPoint::new(11, 1, 1));
    ///
    /// // A quarter turn moves the cube's lowest corner.
    /// let r = Transform::from_rotation_about_origin(GridRotation::CLOCKWISE);
    /// assert_eq!(r.transform_cube(GridPoint::new(1, 0, 0)), GridPoint::new(-1, 0, 1));
    /// assert_eq!(r.transform_cube(GridPoint::new(0, 0, 1)), GridPoint::new(-2, 0, 0));
    /// ```
    #[inline]
    pub fn transform_cube(self, cube: GridPoint) -> GridPoint {
        self.transform_point(cube)
            .min(self.transform_point(cube + GridVector::new(1, 1, 1)))
    }

    /// Returns the transform which maps the outputs of this one to the inputs of this one.
    ///
    /// May panic or wrap (as per the Rust `overflow-checks` compilation option)
    /// if `self.translation` has any components equal to [`GridCoordinate::MIN`].
    #[must_use]
    #[inline]
    pub fn inverse(self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            rotation,
            translation: rotation.transform_vector(-self.translation),
        }
    }
}

impl Default for Transform {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl core::ops::Mul for Transform {
    type Output = Self;

    /// Multiplication is concatenation: `self * rhs` is equivalent to
    /// applying `rhs` and then applying `self`.
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            rotation: self.rotation * rhs.rotation,
            translation: self.transform_point(rhs.translation.to_point()).to_vector(),
        }
    }
}

impl From<GridRotation> for Transform {
    #[inline]
    fn from(value: GridRotation) -> Self {
        Self::from_rotation_about_origin(value)
    }
}

impl fmt::Debug for Transform {
    #[inline(never)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::IDENTITY {
            f.pad("Transform::IDENTITY")
        } else {
            let &Self {
                rotation,
                translation,
            } = self;

            let mut ds = f.debug_struct("Transform");
            if rotation != GridRotation::IDENTITY {
                ds.field("rotation", &rotation);
            }
            if translation != GridVector::new(0, 0, 0) {
                let [x, y, z]: [GridCoordinate; 3] = translation.to_array();
                ds.field("translation", &format_args!("({x:+}, {y:+}, {z:+})"));
            }
            ds.finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::seq::IndexedRandom as _;
    use rand::{Rng, SeedableRng as _};
    use rand_xoshiro::Xoshiro256Plus;
    use std::vec::Vec;

    fn random_transform(rng: &mut impl Rng) -> Transform {
        let rotations: Vec<GridRotation> = GridRotation::all().collect();
        Transform {
            rotation: *rotations.choose(rng).unwrap(),
            translation: GridVector::new(
                rng.random_range(-100..=100),
                rng.random_range(-100..=100),
                rng.random_range(-100..=100),
            ),
        }
    }

    #[test]
    fn concat_is_sequential_application() {
        let mut rng = Xoshiro256Plus::seed_from_u64(2897358920346590823);
        for _ in 1..100 {
            let t1 = random_transform(&mut rng);
            let t2 = random_transform(&mut rng);
            let p = GridPoint::new(2, 300, -40);
            assert_eq!(
                (t1 * t2).transform_point(p),
                t1.transform_point(t2.transform_point(p))
            );
            assert_eq!(t2.then(t1), t1 * t2);
        }
    }

    #[test]
    fn concat_is_associative() {
        let mut rng = Xoshiro256Plus::seed_from_u64(5933089223468901296);
        for _ in 1..100 {
            let t1 = random_transform(&mut rng);
            let t2 = random_transform(&mut rng);
            let t3 = random_transform(&mut rng);
            assert_eq!((t1 * t2) * t3, t1 * (t2 * t3));
        }
    }

    #[test]
    fn inverse_undoes() {
        let mut rng = Xoshiro256Plus::seed_from_u64(5933089223468901296);
        for _ in 1..100 {
            let t = random_transform(&mut rng);
            assert_eq!(t * t.inverse(), Transform::IDENTITY, "{t:?}");
            assert_eq!(t.inverse() * t, Transform::IDENTITY, "{t:?}");
            let cube = GridPoint::new(-7, 3, 12);
            assert_eq!(t.inverse().transform_cube(t.transform_cube(cube)), cube);
        }
    }

    #[test]
    fn translation_round_trip() {
        let there = Transform::from_translation([3, -4, 5]);
        let back = Transform::from_translation([-3, 4, -5]);
        assert_eq!(there.then(back), Transform::IDENTITY);
    }

    #[test]
    fn debug() {
        assert_eq!(format!("{:?}", Transform::IDENTITY), "Transform::IDENTITY");
        assert_eq!(
            format!("{:?}", Transform::from_translation([1, 0, -2])),
            "Transform { translation: (+1, +0, -2) }"
        );
    }
}
