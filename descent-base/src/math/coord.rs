//! Numeric types used for coordinates and related quantities.

use euclid::{Point3D, Vector3D};

/// Unit-of-measure marker for [`euclid`] types whose coordinates count blocks.
///
/// This type has no values; it only distinguishes grid-space points and vectors
/// from other coordinate systems at compile time.
#[derive(Debug)]
pub enum Cube {}

/// Coordinates that are locked to the cube grid.
pub type GridCoordinate = i32;

/// Positions that are locked to the cube grid.
pub type GridPoint = Point3D<GridCoordinate, Cube>;

/// Vectors that are locked to the cube grid.
pub type GridVector = Vector3D<GridCoordinate, Cube>;

/// Coordinates that are not locked to the cube grid.
///
/// Note: Because `GridCoordinate = i32` and `FreeCoordinate = f64`, which has
/// more than 32 bits of mantissa, the infallible conversion
/// `From<GridCoordinate> for FreeCoordinate` exists, which is often convenient.
pub type FreeCoordinate = f64;

/// Positions that are not locked to the cube grid but may interact with it.
pub type FreePoint = Point3D<FreeCoordinate, Cube>;

/// Vectors that are not locked to the cube grid but may interact with it.
pub type FreeVector = Vector3D<FreeCoordinate, Cube>;

/// Squared distance below which two [`FreePoint`]s are considered the same point.
pub const ALMOST_EQ_SQUARED_DISTANCE: FreeCoordinate = 0.01;

/// Returns whether two real-valued points are equal up to accumulated floating-point error.
///
/// This is deliberately not [`PartialEq`]: it is not transitive, so it must never be
/// used as the equality of a set or map key.
///
/// ```
/// # extern crate descent_base;
/// use descent_base::math::{FreePoint, almost_eq};
///
/// assert!(almost_eq(FreePoint::new(1.0, 2.0, 3.0), FreePoint::new(1.05, 2.0, 3.0)));
/// assert!(!almost_eq(FreePoint::new(1.0, 2.0, 3.0), FreePoint::new(1.2, 2.0, 3.0)));
/// ```
#[inline]
pub fn almost_eq(a: FreePoint, b: FreePoint) -> bool {
    (a - b).square_length() < ALMOST_EQ_SQUARED_DISTANCE
}

/// Manhattan (taxicab) distance between two grid points.
///
/// ```
/// # extern crate descent_base;
/// use descent_base::math::{GridPoint, manhattan};
///
/// assert_eq!(manhattan(GridPoint::new(0, 0, 0), GridPoint::new(1, -2, 3)), 6);
/// ```
#[inline]
pub fn manhattan(a: GridPoint, b: GridPoint) -> u32 {
    let d = b - a;
    d.x.unsigned_abs() + d.y.unsigned_abs() + d.z.unsigned_abs()
}

/// Additional element-wise operations on `euclid` types.
pub trait VectorOps<O> {
    /// Input vector element type.
    type Elem;
    /// Output vector type.
    type Output;
    /// Apply the function to each element.
    fn map<F: FnMut(Self::Elem) -> O>(self, f: F) -> Self::Output;
    /// Apply the function to each element of the two inputs, pairwise.
    fn zip<F: FnMut(Self::Elem, Self::Elem) -> O>(self, rhs: Self, f: F) -> Self::Output;
}

mod impl_euclid {
    use super::*;

    macro_rules! impl_vector_ops {
        ($vec:ident, ($( $field:ident )*)) => {
            impl<T, O, U> VectorOps<O> for $vec<T, U> {
                type Elem = T;
                type Output = $vec<O, U>;

                #[inline]
                fn map<F: FnMut(Self::Elem) -> O>(self, mut f: F) -> Self::Output {
                    $vec::new($(f(self.$field),)*)
                }

                #[inline]
                fn zip<F: FnMut(Self::Elem, Self::Elem) -> O>(
                    self,
                    rhs: Self,
                    mut f: F,
                ) -> Self::Output {
                    $vec::new($(f(self.$field, rhs.$field),)*)
                }
            }
        };
    }

    impl_vector_ops!(Vector3D, (x y z));
    impl_vector_ops!(Point3D, (x y z));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn almost_eq_is_symmetric_and_tolerant() {
        let a = FreePoint::new(0.5, 0.5, 0.5);
        let b = FreePoint::new(0.55, 0.45, 0.5);
        assert!(almost_eq(a, b));
        assert!(almost_eq(b, a));
        assert!(!almost_eq(a, FreePoint::new(0.5, 0.5, 0.61)));
    }

    #[test]
    fn vector_ops_zip() {
        let v = GridVector::new(1, 2, 3).zip(GridVector::new(10, 20, 30), |a, b| a * b);
        assert_eq!(v, GridVector::new(10, 40, 90));
    }
}
