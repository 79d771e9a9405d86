//! Incremental 3D Delaunay tetrahedralization (Bowyer–Watson).
//!
//! Used to find which rooms are "near" each other: the edges of the tetrahedralization
//! of the room centers are the candidate connections that the spanning tree is then
//! chosen from.

use std::collections::BTreeSet;

use descent_base::math::{FreeCoordinate, FreePoint, FreeVector};

use crate::graph::Edge;

/// Relative size of the signed volume below which four points are treated as coplanar.
const DEGENERACY_TOLERANCE: FreeCoordinate = 1e-10;

/// How far, in multiples of the point cloud's largest extent, the enclosing
/// tetrahedron's corner is placed from the cloud.
const ENCLOSURE_MARGIN: FreeCoordinate = 10.0;

/// Length of the enclosing tetrahedron's legs, in multiples of the cloud's largest extent.
const ENCLOSURE_LEG: FreeCoordinate = 100.0;

/// Failure to tetrahedralize a point set.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum TriangulationError {
    /// Four points that would have formed a tetrahedron are coplanar or coincident,
    /// so its circumsphere does not exist or cannot be computed reliably.
    #[error("points {vertices:?} are too close to coplanar to form a tetrahedron")]
    DegenerateGeometry {
        /// Indices of the offending points. Indices past the end of the input refer to
        /// the enclosing tetrahedron.
        vertices: [usize; 4],
    },
}

/// A sphere given by its center and squared radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    center: FreePoint,
    radius_squared: FreeCoordinate,
}

impl Sphere {
    /// Constructs a sphere.
    pub fn new(center: FreePoint, radius_squared: FreeCoordinate) -> Self {
        Self {
            center,
            radius_squared,
        }
    }

    /// Computes the sphere passing through all four points, or [`None`] if they are
    /// (nearly) coplanar.
    ///
    /// With `u`, `v`, `w` the edges from `a` to the other three points, the center is
    /// `a + (|u|² (v × w) + |v|² (w × u) + |w|² (u × v)) / (2 u · (v × w))`, which is
    /// the expansion of the 4×4 circumsphere determinant relative to `a`.
    pub fn circumscribing([a, b, c, d]: [FreePoint; 4]) -> Option<Self> {
        let u = b - a;
        let v = c - a;
        let w = d - a;
        let v_cross_w = v.cross(w);
        let triple = u.dot(v_cross_w);
        if triple.abs() <= DEGENERACY_TOLERANCE * u.length() * v.length() * w.length() {
            return None;
        }
        let offset: FreeVector = (v_cross_w * u.square_length()
            + w.cross(u) * v.square_length()
            + u.cross(v) * w.square_length())
            / (2.0 * triple);
        Some(Self {
            center: a + offset,
            radius_squared: offset.square_length(),
        })
    }

    /// The center of the sphere.
    pub fn center(&self) -> FreePoint {
        self.center
    }

    /// The square of the radius.
    pub fn radius_squared(&self) -> FreeCoordinate {
        self.radius_squared
    }

    /// Returns whether `point` is inside or on the sphere.
    pub fn contains(&self, point: FreePoint) -> bool {
        (point - self.center).square_length() <= self.radius_squared
    }

    /// Returns whether `point` is inside the sphere by more than `tolerance`, measured
    /// relative to the squared radius.
    pub fn strictly_contains(&self, point: FreePoint, tolerance: FreeCoordinate) -> bool {
        let slack = tolerance * self.radius_squared.max(1.0);
        (point - self.center).square_length() < self.radius_squared - slack
    }
}

/// Four vertices, by index into a point list, and their circumsphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tetrahedron {
    vertices: [usize; 4],
    circumsphere: Sphere,
}

impl Tetrahedron {
    /// Constructs the tetrahedron whose corners are the given elements of `points`.
    ///
    /// Panics if any index is out of bounds.
    pub fn new(points: &[FreePoint], vertices: [usize; 4]) -> Result<Self, TriangulationError> {
        let circumsphere = Sphere::circumscribing(vertices.map(|i| points[i]))
            .ok_or(TriangulationError::DegenerateGeometry { vertices })?;
        Ok(Self {
            vertices,
            circumsphere,
        })
    }

    /// Indices of the corners.
    pub fn vertices(&self) -> [usize; 4] {
        self.vertices
    }

    /// The sphere through all four corners.
    pub fn circumsphere(&self) -> Sphere {
        self.circumsphere
    }

    fn faces(&self) -> [Triangle; 4] {
        let [a, b, c, d] = self.vertices;
        [
            Triangle::new([a, b, c]),
            Triangle::new([a, b, d]),
            Triangle::new([a, c, d]),
            Triangle::new([b, c, d]),
        ]
    }

    fn edges(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let [a, b, c, d] = self.vertices;
        [(a, b), (a, c), (a, d), (b, c), (b, d), (c, d)].into_iter()
    }
}

/// A face of a tetrahedron, used while re-triangulating the cavity around an inserted point.
///
/// The vertices are stored sorted, so two triangles over the same three points compare
/// equal however their corners were listed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Triangle {
    vertices: [usize; 3],
    /// Set when another cavity tetrahedron shares this face, so it is interior to the
    /// cavity and must not become part of a new tetrahedron.
    bad: bool,
}

impl Triangle {
    fn new(mut vertices: [usize; 3]) -> Self {
        vertices.sort_unstable();
        Self {
            vertices,
            bad: false,
        }
    }
}

/// The result of [`tetrahedralize()`].
///
/// Holds the input points followed by the four corners of the enclosing tetrahedron,
/// and every tetrahedron of the final triangulation, including those touching the
/// enclosing corners.
#[derive(Clone, Debug)]
pub struct Tetrahedralization {
    vertices: Vec<FreePoint>,
    tetrahedra: Vec<Tetrahedron>,
    input_len: usize,
}

impl Tetrahedralization {
    /// All vertices: the input points, then the four enclosing corners.
    pub fn vertices(&self) -> &[FreePoint] {
        &self.vertices
    }

    /// All tetrahedra.
    pub fn tetrahedra(&self) -> &[Tetrahedron] {
        &self.tetrahedra
    }

    /// Tetrahedra whose corners are all input points.
    pub fn interior_tetrahedra(&self) -> impl Iterator<Item = &Tetrahedron> + '_ {
        self.tetrahedra
            .iter()
            .filter(|t| t.vertices.iter().all(|&i| i < self.input_len))
    }

    /// The unique edges between input points, with Euclidean lengths.
    pub fn edges(&self) -> BTreeSet<Edge> {
        self.tetrahedra
            .iter()
            .flat_map(Tetrahedron::edges)
            .filter(|&(a, b)| a < self.input_len && b < self.input_len)
            .map(|(a, b)| Edge::between(&self.vertices, a, b))
            .collect()
    }

    /// Checks the empty-circumsphere property: no vertex lies strictly inside the
    /// circumsphere of a tetrahedron it is not a corner of.
    pub fn is_delaunay(&self) -> bool {
        self.tetrahedra.iter().all(|t| {
            self.vertices.iter().enumerate().all(|(i, &p)| {
                t.vertices.contains(&i) || !t.circumsphere.strictly_contains(p, 1e-9)
            })
        })
    }
}

/// Computes the Delaunay tetrahedralization of `points` by inserting them one at a time
/// into an enclosing tetrahedron.
///
/// Fewer than four points produce a tetrahedralization with no interior tetrahedra.
/// Four or more points that all lie in one plane have no tetrahedralization; they are
/// reported as [`TriangulationError::DegenerateGeometry`] naming the first four points.
pub fn tetrahedralize(points: &[FreePoint]) -> Result<Tetrahedralization, TriangulationError> {
    let input_len = points.len();
    if input_len >= 4 && non_coplanar_quadruple(points).is_none() {
        return Err(TriangulationError::DegenerateGeometry {
            vertices: [0, 1, 2, 3],
        });
    }
    let mut vertices = points.to_vec();
    vertices.extend(enclosing_corners(points));
    let mut tetrahedra = vec![Tetrahedron::new(
        &vertices,
        [input_len, input_len + 1, input_len + 2, input_len + 3],
    )?];

    for (index, &point) in points.iter().enumerate() {
        let mut faces: Vec<Triangle> = Vec::new();
        tetrahedra.retain(|t| {
            if t.circumsphere.contains(point) {
                faces.extend(t.faces());
                false
            } else {
                true
            }
        });

        for i in 0..faces.len() {
            for j in (i + 1)..faces.len() {
                if faces[i].vertices == faces[j].vertices {
                    faces[i].bad = true;
                    faces[j].bad = true;
                }
            }
        }

        for face in faces.iter().filter(|f| !f.bad) {
            let [a, b, c] = face.vertices;
            tetrahedra.push(Tetrahedron::new(&vertices, [a, b, c, index])?);
        }
    }

    Ok(Tetrahedralization {
        vertices,
        tetrahedra,
        input_len,
    })
}

/// Returns the edges of the Delaunay tetrahedralization of `points`.
///
/// Two points yield their single edge and three points the sides of their triangle;
/// zero or one point yields nothing.
pub fn triangulate(points: &[FreePoint]) -> Result<BTreeSet<Edge>, TriangulationError> {
    match points.len() {
        0 | 1 => Ok(BTreeSet::new()),
        2 => Ok(BTreeSet::from([Edge::between(points, 0, 1)])),
        3 => Ok([(0, 1), (0, 2), (1, 2)]
            .into_iter()
            .map(|(a, b)| Edge::between(points, a, b))
            .collect()),
        _ => Ok(tetrahedralize(points)?.edges()),
    }
}

/// Finds four of `points` that are not coplanar, by index.
fn non_coplanar_quadruple(points: &[FreePoint]) -> Option<[usize; 4]> {
    let &origin = points.first()?;
    let i = (1..points.len())
        .find(|&i| (points[i] - origin).square_length() > DEGENERACY_TOLERANCE)?;
    let u = points[i] - origin;
    let j = (i + 1..points.len()).find(|&j| {
        let v = points[j] - origin;
        u.cross(v).square_length()
            > DEGENERACY_TOLERANCE * u.square_length() * v.square_length()
    })?;
    let normal = u.cross(points[j] - origin);
    let k = (j + 1..points.len()).find(|&k| {
        let w = points[k] - origin;
        normal.dot(w).abs() > DEGENERACY_TOLERANCE * normal.length() * w.length()
    })?;
    Some([0, i, j, k])
}

/// Corners of a tetrahedron that comfortably encloses every point: a right-angled
/// corner placed well below the cloud's minimum, with long legs along each axis.
fn enclosing_corners(points: &[FreePoint]) -> [FreePoint; 4] {
    let (min, max) = match points.split_first() {
        Some((&first, rest)) => rest
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        None => (FreePoint::origin(), FreePoint::origin()),
    };
    let extent = max - min;
    let delta = extent.x.max(extent.y).max(extent.z).max(1.0);
    let corner = min - FreeVector::splat(ENCLOSURE_MARGIN * delta);
    let leg = ENCLOSURE_LEG * delta;
    [
        corner,
        corner + FreeVector::new(leg, 0.0, 0.0),
        corner + FreeVector::new(0.0, leg, 0.0),
        corner + FreeVector::new(0.0, 0.0, leg),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::{Rng as _, SeedableRng as _};
    use rand_xoshiro::Xoshiro256Plus;

    fn pairs(edges: &BTreeSet<Edge>) -> Vec<(usize, usize)> {
        edges.iter().map(|e| (e.u(), e.v())).collect()
    }

    fn corner_tetrahedron() -> Vec<FreePoint> {
        vec![
            FreePoint::new(0., 0., 0.),
            FreePoint::new(0., 0., 2.),
            FreePoint::new(0., 1., 0.),
            FreePoint::new(2., 0., 0.),
        ]
    }

    #[test]
    fn too_few_points() {
        assert_eq!(triangulate(&[]), Ok(BTreeSet::new()));
        assert_eq!(triangulate(&[FreePoint::new(1., 2., 3.)]), Ok(BTreeSet::new()));
    }

    #[test]
    fn two_points() {
        let points = [FreePoint::new(0., 0., 0.), FreePoint::new(3., 4., 0.)];
        let edges = triangulate(&points).unwrap();
        assert_eq!(pairs(&edges), vec![(0, 1)]);
        assert_eq!(edges.first().unwrap().length(), 5.0);
    }

    #[test]
    fn three_points() {
        let points = [
            FreePoint::new(0., 0., 0.),
            FreePoint::new(1., 0., 0.),
            FreePoint::new(0., 1., 0.),
        ];
        assert_eq!(
            pairs(&triangulate(&points).unwrap()),
            vec![(0, 1), (0, 2), (1, 2)]
        );
    }

    #[test]
    fn four_points() {
        let t = tetrahedralize(&corner_tetrahedron()).unwrap();
        assert_eq!(
            pairs(&t.edges()),
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
        assert_eq!(t.interior_tetrahedra().count(), 1);
        assert!(t.is_delaunay());
    }

    #[test]
    fn interior_point() {
        let mut points = corner_tetrahedron();
        points.push(FreePoint::new(0.4, 0.2, 0.4));
        let t = tetrahedralize(&points).unwrap();
        let edges = t.edges();
        assert_eq!(edges.len(), 10);
        for original in 0..4 {
            assert!(edges.contains(&Edge::new(original, 4, 0.0)));
        }
        assert_eq!(t.interior_tetrahedra().count(), 4);
        assert!(t.is_delaunay());
    }

    #[test]
    fn random_points_are_delaunay() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0x5eed);
        let points: Vec<FreePoint> = (0..40)
            .map(|_| {
                FreePoint::new(
                    rng.random_range(0.0..100.0),
                    rng.random_range(0.0..100.0),
                    rng.random_range(0.0..100.0),
                )
            })
            .collect();
        let t = tetrahedralize(&points).unwrap();
        assert!(t.is_delaunay());
        let edges = t.edges();
        for i in 0..points.len() {
            assert!(edges.iter().any(|e| e.touches(i)), "point {i} has no edges");
        }
    }

    #[test]
    fn enclosing_corners_contain_points() {
        let points = corner_tetrahedron();
        let corners = enclosing_corners(&points);
        let sphere = Sphere::circumscribing(corners).unwrap();
        assert!(points.iter().all(|&p| sphere.strictly_contains(p, 0.0)));
    }

    #[test]
    fn coplanar_points_are_degenerate() {
        let points = [
            FreePoint::new(0., 0., 0.),
            FreePoint::new(1., 0., 0.),
            FreePoint::new(0., 1., 0.),
            FreePoint::new(1., 1., 0.),
        ];
        assert_eq!(
            Tetrahedron::new(&points, [0, 1, 2, 3]),
            Err(TriangulationError::DegenerateGeometry {
                vertices: [0, 1, 2, 3]
            })
        );
    }

    #[test]
    fn flat_point_sets_are_degenerate() {
        let coplanar: Vec<FreePoint> = (0..3)
            .flat_map(|x| {
                (0..3).map(move |z| FreePoint::new(f64::from(x) * 4., 2., f64::from(z) * 4.))
            })
            .collect();
        let collinear: Vec<FreePoint> = (0..5)
            .map(|i| FreePoint::new(f64::from(i) * 3., 0., 0.))
            .collect();
        for points in [coplanar, collinear] {
            assert_eq!(
                triangulate(&points),
                Err(TriangulationError::DegenerateGeometry {
                    vertices: [0, 1, 2, 3]
                })
            );
        }
    }

    #[test]
    fn non_coplanar_quadruple_skips_flat_prefix() {
        let mut points = vec![
            FreePoint::new(0., 0., 0.),
            FreePoint::new(0., 0., 0.),
            FreePoint::new(1., 0., 0.),
            FreePoint::new(2., 0., 0.),
            FreePoint::new(0., 1., 0.),
            FreePoint::new(5., 5., 0.),
        ];
        assert_eq!(non_coplanar_quadruple(&points), None);
        points.push(FreePoint::new(0., 0., 1.));
        assert_eq!(non_coplanar_quadruple(&points), Some([0, 2, 4, 6]));
    }

    #[test]
    fn circumsphere_of_unit_corner() {
        let sphere = Sphere::circumscribing([
            FreePoint::new(0., 0., 0.),
            FreePoint::new(1., 0., 0.),
            FreePoint::new(0., 1., 0.),
            FreePoint::new(0., 0., 1.),
        ])
        .unwrap();
        assert_eq!(sphere.center(), FreePoint::new(0.5, 0.5, 0.5));
        assert_eq!(sphere.radius_squared(), 0.75);
        assert!(sphere.contains(FreePoint::new(1., 1., 1.)));
        assert!(!sphere.strictly_contains(FreePoint::new(1., 1., 1.), 1e-9));
    }

    #[test]
    fn triangle_order_does_not_matter() {
        assert_eq!(Triangle::new([3, 1, 2]), Triangle::new([2, 3, 1]));
    }
}
