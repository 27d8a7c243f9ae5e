use serde::{Serialize, Deserialize};

use crate::geo_3d::{Point, GeoVector};
use crate::coords::{Coords, ProcResult, shape_err, runtime_err};
use super::matrix::{self, Matrix3};

/// A coordinate system, stored as four points: the endpoints of the three
/// axis vectors followed by the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Coords", into = "Coords")]
pub struct CoordinateSystem {
    points: [Point; 4],
}

impl CoordinateSystem {
    /// The global cartesian axes at the origin.
    pub fn global() -> Self {
        CoordinateSystem::new(Point::zero(), &matrix::IDENTITY)
    }

    /// A coordinate system from its origin and axis vectors (as rows).
    pub fn new(origin: Point, axes: &Matrix3) -> Self {
        let endpoint = |i: usize| origin + GeoVector::from(axes[i]);
        CoordinateSystem{points: [endpoint(0), endpoint(1), endpoint(2), origin]}
    }

    /// A coordinate system from a `Coords` holding exactly 4 points.
    pub fn from_coords(coords: &Coords) -> ProcResult<Self> {
        if coords.npoints() != 4 {
            return shape_err(&format!("A coordinate system needs 4 points, got shape {:?}", coords.shape()));
        }
        Ok(CoordinateSystem{points: [coords.point(0), coords.point(1), coords.point(2), coords.point(3)]})
    }

    pub fn origin(&self) -> Point {
        self.points[3]
    }

    /// The axis vectors as matrix rows.
    pub fn axes(&self) -> Matrix3 {
        let origin = self.origin();
        let mut axes = [[0.0; 3]; 3];
        for (row, endpoint) in axes.iter_mut().zip(&self.points) {
            *row = (*endpoint - origin).to_array();
        }
        axes
    }

    /// The four defining points as a (4,3) `Coords`.
    pub fn coords(&self) -> Coords {
        Coords::from_points(self.points.iter().map(|p| p.to_array()).collect())
    }
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        CoordinateSystem::global()
    }
}

impl TryFrom<Coords> for CoordinateSystem {
    type Error = crate::coords::CoordsError;

    fn try_from(coords: Coords) -> ProcResult<Self> {
        CoordinateSystem::from_coords(&coords)
    }
}
impl From<CoordinateSystem> for Coords {
    fn from(cs: CoordinateSystem) -> Self {
        cs.coords()
    }
}

impl Coords {
    /// Apply the affine transformation that carries the `initial` coordinate
    /// system (default: the global axes) onto `current`.
    pub fn transform_cs(&self, current: &CoordinateSystem, initial: Option<&CoordinateSystem>) -> ProcResult<Coords> {
        let global = CoordinateSystem::global();
        let initial = initial.unwrap_or(&global);
        let Some(inv) = matrix::inverse(&initial.axes()) else {
            return runtime_err("Initial coordinate system has linearly dependent axes");
        };
        let mat = matrix::mat_mul(&inv, &current.axes());
        let shifted = matrix::apply(&initial.origin().to_array(), &mat);
        let vec = current.origin() - Point::from(shifted);
        Ok(self.affine(&mat, Some(vec)))
    }
}
