//! Affine transformations. Each returns a transformed copy; the `_in_place`
//! twin changes the receiver instead.

use serde::{Serialize, Deserialize};

use crate::geo_3d::{Point, GeoVector};
use crate::coords::{Coords, Direction, Matrix3, ProcResult, DIM, CoordsError, check_axis, shape_err};
use crate::coords::matrix::{apply, matrix_from_rows, rotation_matrix};

/// Scale factor: the same for all axes, or one per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleFactor {
    Uniform(f64),
    PerAxis([f64; 3]),
}
impl ScaleFactor {
    fn factors(&self) -> [f64; 3] {
        match self {
            ScaleFactor::Uniform(s) => [*s; 3],
            ScaleFactor::PerAxis(s) => *s,
        }
    }
}
impl From<f64> for ScaleFactor {
    fn from(s: f64) -> Self {
        ScaleFactor::Uniform(s)
    }
}
impl From<[f64; 3]> for ScaleFactor {
    fn from(s: [f64; 3]) -> Self {
        ScaleFactor::PerAxis(s)
    }
}

/// A rotation given by an angle in degrees (around some axis) or by a ready-made matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rotation {
    Angle(f64),
    Matrix(Matrix3),
}
impl Rotation {
    /// Rotation from a nested matrix. Anything but 3x3 is an argument error.
    pub fn from_rows(rows: &[Vec<f64>]) -> ProcResult<Self> {
        match matrix_from_rows(rows) {
            Ok(mat) => Ok(Rotation::Matrix(mat)),
            Err(CoordsError::Shape(error)) => Err(CoordsError::Argument(format!("Rotation matrix should be 3x3: {}", error))),
            Err(error) => Err(error),
        }
    }

    /// The rotation matrix, using `axis` if the rotation is an angle.
    pub fn to_matrix(&self, axis: Direction) -> ProcResult<Matrix3> {
        match self {
            Rotation::Angle(angle) => rotation_matrix(*angle, axis),
            Rotation::Matrix(mat) => Ok(*mat),
        }
    }
}
impl From<f64> for Rotation {
    fn from(angle: f64) -> Self {
        Rotation::Angle(angle)
    }
}
impl From<Matrix3> for Rotation {
    fn from(mat: Matrix3) -> Self {
        Rotation::Matrix(mat)
    }
}

impl Coords {
    /// Scale the coordinates. With `axis` set only that coordinate is scaled.
    pub fn scale(&self, factor: impl Into<ScaleFactor>, axis: Option<usize>) -> ProcResult<Coords> {
        let mut out = self.clone();
        out.scale_in_place(factor, axis)?;
        Ok(out)
    }

    pub fn scale_in_place(&mut self, factor: impl Into<ScaleFactor>, axis: Option<usize>) -> ProcResult<&mut Self> {
        let factors = factor.into().factors();
        let axes = match axis {
            Some(axis) => {
                check_axis(axis)?;
                axis..axis + 1
            },
            None => 0..DIM,
        };
        for xyz in self.points_mut() {
            for i in axes.clone() {
                xyz[i] *= factors[i];
            }
        }
        Ok(self)
    }

    /// Translate over `step` times the direction (`1` if no step given).
    /// An axis direction is the unit vector along that axis.
    pub fn translate(&self, dir: Direction, step: Option<f64>) -> ProcResult<Coords> {
        let mut out = self.clone();
        out.translate_in_place(dir, step)?;
        Ok(out)
    }

    pub fn translate_in_place(&mut self, dir: Direction, step: Option<f64>) -> ProcResult<&mut Self> {
        let vector = dir.to_vector()? * step.unwrap_or(1.0);
        Ok(self.shift_by(&vector))
    }

    /// Translate by a set of vectors broadcast against the points: the shape of `vectors`
    /// must equal the trailing part of `self.shape()`.
    pub fn translate_each(&self, vectors: &Coords) -> ProcResult<Coords> {
        let mut out = self.clone();
        out.translate_each_in_place(vectors)?;
        Ok(out)
    }

    pub fn translate_each_in_place(&mut self, vectors: &Coords) -> ProcResult<&mut Self> {
        if !self.pshape().ends_with(vectors.pshape()) {
            return shape_err(&format!("Cannot broadcast translations of shape {:?} against {:?}", vectors.shape(), self.shape()));
        }
        let period = vectors.as_slice().len();
        if period == 0 {
            return Ok(self);
        }
        for (idx, value) in self.as_mut_slice().iter_mut().enumerate() {
            *value += vectors.as_slice()[idx % period];
        }
        Ok(self)
    }

    fn shift_by(&mut self, vector: &GeoVector) -> &mut Self {
        let v = vector.to_array();
        for xyz in self.points_mut() {
            for i in 0..DIM {
                xyz[i] += v[i];
            }
        }
        self
    }

    /// Translate such that the bounding box center moves to the origin.
    pub fn centered(&self) -> Coords {
        let mut out = self.clone();
        out.centered_in_place();
        out
    }

    pub fn centered_in_place(&mut self) -> &mut Self {
        let center = GeoVector::from(self.center());
        self.shift_by(&-center)
    }

    /// Translate to align the bounding box on the origin, one code character per axis:
    /// `-` puts the minimum, `+` the maximum and `0` the middle on the origin.
    /// Any other character leaves that axis alone.
    pub fn align(&self, code: &str) -> Coords {
        let mut out = self.clone();
        out.align_in_place(code);
        out
    }

    pub fn align_in_place(&mut self, code: &str) -> &mut Self {
        let bb = self.bbox();
        let (lo, hi) = (bb.point(0), bb.point(1));
        let mut trl = [0.0; DIM];
        for (i, c) in code.chars().take(DIM).enumerate() {
            trl[i] = match c {
                '-' => -lo[i],
                '+' => -hi[i],
                '0' => -0.5 * (lo[i] + hi[i]),
                _ => 0.0,
            };
        }
        self.shift_by(&trl.into())
    }

    /// Rotate around `axis` through the origin, or through `around` if given.
    ///
    /// Angles are in degrees and turn counterclockwise looking down the axis. A
    /// matrix rotation ignores `axis`.
    pub fn rotate(&self, rotation: impl Into<Rotation>, axis: Direction, around: Option<Point>) -> ProcResult<Coords> {
        let mut out = self.clone();
        out.rotate_in_place(rotation, axis, around)?;
        Ok(out)
    }

    pub fn rotate_in_place(&mut self, rotation: impl Into<Rotation>, axis: Direction, around: Option<Point>) -> ProcResult<&mut Self> {
        let mat = rotation.into().to_matrix(axis)?;
        match around {
            Some(pivot) => {
                let pivot = GeoVector::from(pivot);
                self.shift_by(&-pivot);
                Ok(self.affine_in_place(&mat, Some(pivot)))
            },
            None => Ok(self.affine_in_place(&mat, None)),
        }
    }

    /// Shear: coordinate `dir` becomes `x[dir] + skew * x[dir1]`.
    pub fn shear(&self, dir: usize, dir1: usize, skew: f64) -> ProcResult<Coords> {
        let mut out = self.clone();
        out.shear_in_place(dir, dir1, skew)?;
        Ok(out)
    }

    pub fn shear_in_place(&mut self, dir: usize, dir1: usize, skew: f64) -> ProcResult<&mut Self> {
        check_axis(dir)?;
        check_axis(dir1)?;
        for xyz in self.points_mut() {
            xyz[dir] += skew * xyz[dir1];
        }
        Ok(self)
    }

    /// Mirror coordinate `dir` against the plane `x[dir] = pos`.
    pub fn reflect(&self, dir: usize, pos: f64) -> ProcResult<Coords> {
        let mut out = self.clone();
        out.reflect_in_place(dir, pos)?;
        Ok(out)
    }

    pub fn reflect_in_place(&mut self, dir: usize, pos: f64) -> ProcResult<&mut Self> {
        check_axis(dir)?;
        for xyz in self.points_mut() {
            xyz[dir] = 2.0 * pos - xyz[dir];
        }
        Ok(self)
    }

    /// General affine transformation `x·mat + vec`.
    pub fn affine(&self, mat: &Matrix3, vec: Option<GeoVector>) -> Coords {
        let mut out = self.clone();
        out.affine_in_place(mat, vec);
        out
    }

    pub fn affine_in_place(&mut self, mat: &Matrix3, vec: Option<GeoVector>) -> &mut Self {
        let v = vec.unwrap_or_else(GeoVector::zero).to_array();
        for xyz in self.points_mut() {
            let mapped = apply(xyz, mat);
            for i in 0..DIM {
                xyz[i] = mapped[i] + v[i];
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample() -> Coords {
        Coords::new(
            vec![0.5, -1.0, 2.0, 3.0, 0.25, -0.75, -2.0, 1.5, 4.0, 1.0, 1.0, 1.0],
            &[2, 2, 3],
        ).unwrap()
    }

    #[test]
    fn translate_round_trip() {
        let c = sample();
        let d = Direction::Vector(GeoVector::new(1.0, -2.0, 0.5));
        let back = c.translate(d, Some(2.0)).unwrap()
            .translate(d, Some(-2.0)).unwrap();
        assert_abs_diff_eq!(back, c, epsilon = 1e-12);

        let moved = Coords::from([1.0, 1.0, 1.0]).translate(Direction::Axis(1), None).unwrap();
        assert_eq!(moved.point(0), Point::new(1.0, 2.0, 1.0));
        let moved = Coords::from([1.0, 1.0, 1.0]).translate([0.0, 2.0, 0.0].into(), Some(0.5)).unwrap();
        assert_eq!(moved.point(0), Point::new(1.0, 2.0, 1.0));
    }

    #[test]
    fn translate_each_broadcasts() {
        let c = sample();
        let vectors = Coords::from_points(vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let moved = c.translate_each(&vectors).unwrap();
        assert_eq!(moved.point(0), c.point(0) + GeoVector::xhat());
        assert_eq!(moved.point(3), c.point(3) + GeoVector::yhat());
        let wrong = Coords::from_points(vec![[1.0, 0.0, 0.0]; 3]);
        assert!(c.translate_each(&wrong).is_err());
    }

    #[test]
    fn rotate_round_trip_and_full_turn() {
        let c = sample();
        for axis in [Direction::Axis(0), Direction::Axis(2), [1.0, 2.0, -1.0].into()] {
            let back = c.rotate(33.0, axis, None).unwrap().rotate(-33.0, axis, None).unwrap();
            assert_abs_diff_eq!(back, c, epsilon = 1e-12);
            let full = c.rotate(360.0, axis, None).unwrap();
            assert_abs_diff_eq!(full, c, epsilon = 1e-12);
        }
    }

    #[test]
    fn rotate_around_pivot() {
        let c = Coords::from([2.0, 1.0, 0.0]);
        let rotated = c.rotate(90.0, Direction::Axis(2), Some(Point::new(1.0, 1.0, 0.0))).unwrap();
        assert_abs_diff_eq!(rotated.point(0), Point::new(1.0, 2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn rotation_matrix_must_be_square() {
        assert!(matches!(
            Rotation::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]),
            Err(CoordsError::Argument(_))
        ));
    }

    #[test]
    fn scale_round_trip() {
        let c = sample();
        let back = c.scale([2.0, -4.0, 0.5], None).unwrap().scale([0.5, -0.25, 2.0], None).unwrap();
        assert_abs_diff_eq!(back, c, epsilon = 1e-12);
        let scaled = Coords::from([1.0, 1.0, 1.0]).scale(2.0, Some(1)).unwrap();
        assert_eq!(scaled.point(0), Point::new(1.0, 2.0, 1.0));
    }

    #[test]
    fn shear_reflect_affine() {
        let c = Coords::from([1.0, 2.0, 3.0]);
        assert_eq!(c.shear(0, 1, 0.5).unwrap().point(0), Point::new(2.0, 2.0, 3.0));
        assert_eq!(c.reflect(2, 1.0).unwrap().point(0), Point::new(1.0, 2.0, -1.0));
        let mat = [[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 2.0]];
        let mapped = c.affine(&mat, Some(GeoVector::new(0.0, 0.0, 1.0)));
        assert_eq!(mapped.point(0), Point::new(2.0, 1.0, 7.0));
        assert!(c.reflect(3, 0.0).is_err());
    }

    #[test]
    fn align_and_center() {
        let c = Coords::from_points(vec![[1.0, 2.0, 3.0], [3.0, 6.0, 4.0]]);
        let aligned = c.align("-+0");
        let bb = aligned.bbox();
        assert_abs_diff_eq!(bb.point(0), Point::new(0.0, -4.0, -0.5), epsilon = 1e-12);
        let untouched = c.align("x+?");
        assert_eq!(untouched.point(0).x, 1.0);
        assert_eq!(untouched.point(0).z, 3.0);
        assert_abs_diff_eq!(c.centered().center(), Point::zero(), epsilon = 1e-12);

        let mut in_place = c.clone();
        in_place.align_in_place("000");
        assert_abs_diff_eq!(in_place, c.centered(), epsilon = 1e-12);
    }
}
