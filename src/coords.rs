/*!
 * Structured collections of 3D point coordinates.
 *
 * A `Coords` owns a flat buffer of `f64` values plus the shape of the leading
 * axes (`pshape`). The trailing axis always has length 3: every consecutive
 * triple is one point. The leading axes carry whatever grouping the caller
 * needs, e.g. (nelems, nnodes) for per-element node coordinates.
 *
 * Transformations come in pairs: `op(&self, ..) -> Coords` returns a fresh
 * value, `op_in_place(&mut self, ..)` mutates the receiver.
 */

mod proc_errors;
mod field;
mod matrix;
mod query;
mod affine;
mod mapping;
mod project;
mod fuse;
mod reshape;
mod coordinate_system;
mod sweep;

use std::fmt;
use serde::{Serialize, Deserialize};
use approx::AbsDiffEq;

use crate::geo_3d::{Point, GeoVector, Bounded};

// Re-export errors
pub use proc_errors::{
    CoordsError,
    ProcResult,
    shape_err,
    arg_err,
    format_err,
    runtime_err,
};
pub use field::Field;
pub use matrix::{
    Matrix3,
    IDENTITY,
    matrix_from_rows,
    rotation_matrix,
    vector_rotation,
};
pub use query::Bound;
pub use affine::{
    ScaleFactor,
    Rotation,
};
pub use mapping::{
    CurvilinearAxes,
    FlareEnd,
};
pub use fuse::{
    FuseOptions,
    Fused,
    Matched,
};
pub use reshape::{
    Divisions,
    FloatWidth,
};
pub use coordinate_system::CoordinateSystem;
pub use sweep::{
    PolyLine,
    SweepOptions,
    sweep_coords,
};

/// Number of coordinates per point.
pub const DIM: usize = 3;

/// A structured collection of points in 3D cartesian space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoords", into = "RawCoords")]
pub struct Coords {
    /// Point coordinates, `DIM` values per point, row-major.
    data: Vec<f64>,
    /// Shape of the leading axes (the full shape minus the trailing 3).
    pshape: Vec<usize>,
}

/// Serialized form of `Coords`: the full shape and the flat data.
/// Deserialization goes through `Coords::new` so the invariants are re-checked.
#[derive(Debug, Serialize, Deserialize)]
struct RawCoords {
    shape: Vec<usize>,
    data: Vec<f64>,
}
impl TryFrom<RawCoords> for Coords {
    type Error = CoordsError;

    fn try_from(raw: RawCoords) -> ProcResult<Self> {
        Coords::new(raw.data, &raw.shape)
    }
}
impl From<Coords> for RawCoords {
    fn from(coords: Coords) -> Self {
        RawCoords{shape: coords.shape(), data: coords.data}
    }
}

/// A direction: one of the global axes, or an arbitrary vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Direction {
    /// Global axis 0, 1 or 2.
    Axis(usize),
    /// Arbitrary (not necessarily unit) vector.
    Vector(GeoVector),
}
impl Direction {
    /// The direction as a vector. Axis directions give unit vectors.
    pub fn to_vector(&self) -> ProcResult<GeoVector> {
        match self {
            Direction::Axis(axis) => match GeoVector::unit(*axis) {
                Some(vector) => Ok(vector),
                None => arg_err(&format!("Axis must be 0, 1 or 2, got {}", axis)),
            },
            Direction::Vector(vector) => Ok(*vector),
        }
    }

    /// The direction as a unit vector.
    pub fn to_unit_vector(&self) -> ProcResult<GeoVector> {
        let vector = self.to_vector()?;
        if vector.norm() == 0.0 {
            return arg_err("Direction vector must not be zero");
        }
        Ok(vector.normalize())
    }
}
impl From<usize> for Direction {
    fn from(axis: usize) -> Self {
        Direction::Axis(axis)
    }
}
impl From<GeoVector> for Direction {
    fn from(vector: GeoVector) -> Self {
        Direction::Vector(vector)
    }
}
impl From<[f64; 3]> for Direction {
    fn from(xyz: [f64; 3]) -> Self {
        Direction::Vector(xyz.into())
    }
}

/// Unit in which angles are given to or returned from the coordinate mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(strum::Display, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}
impl AngleUnit {
    /// Multiplier turning a value in this unit into radians.
    pub fn to_radians(&self) -> f64 {
        match self {
            AngleUnit::Degrees => std::f64::consts::PI / 180.0,
            AngleUnit::Radians => 1.0,
        }
    }
}

/// Check that an axis number designates one of the global axes.
pub(crate) fn check_axis(axis: usize) -> ProcResult<()> {
    if axis >= DIM {
        return arg_err(&format!("Axis must be 0, 1 or 2, got {}", axis));
    }
    Ok(())
}

impl Coords {
    /// Create a `Coords` from a flat buffer and the full array shape.
    ///
    /// The buffer is taken over without copying. The trailing axis is coerced to length 3:
    /// - length 3 is accepted unchanged,
    /// - length 1 or 2 is padded with zeros,
    /// - length 0 gives an empty (0,3) set,
    /// - any other length, or an empty (scalar) shape, is a `ShapeError`.
    pub fn new(data: Vec<f64>, shape: &[usize]) -> ProcResult<Self> {
        let Some((&ncoord, leading)) = shape.split_last() else {
            return shape_err("Expected array data, not a scalar");
        };
        let size: usize = shape.iter().product();
        if size != data.len() {
            return shape_err(&format!("Data length {} does not match shape {:?}", data.len(), shape));
        }

        match ncoord {
            DIM => Ok(Coords{data, pshape: leading.to_vec()}),
            1 | 2 => {
                let npoints = data.len() / ncoord;
                let mut padded = Vec::with_capacity(npoints * DIM);
                for chunk in data.chunks_exact(ncoord) {
                    padded.extend_from_slice(chunk);
                    padded.extend(std::iter::repeat(0.0).take(DIM - ncoord));
                }
                Ok(Coords{data: padded, pshape: leading.to_vec()})
            },
            0 => Ok(Coords::empty()),
            _ => shape_err(&format!("Expected a length 1, 2 or 3 for last array axis, got {}", ncoord)),
        }
    }

    /// Create a `Coords` by copying (and converting) a slice of numbers.
    /// Integer and `f32` input is coerced to `f64`.
    pub fn from_slice<T: Copy + Into<f64>>(data: &[T], shape: &[usize]) -> ProcResult<Self> {
        Coords::new(data.iter().map(|&v| v.into()).collect(), shape)
    }

    /// Create a (n,3) `Coords` from a list of points.
    pub fn from_points(points: Vec<[f64; 3]>) -> Self {
        let npoints = points.len();
        Coords{data: points.into_iter().flatten().collect(), pshape: vec![npoints]}
    }

    /// Create a `Coords` from nested rows, as read from a config file.
    /// All rows need the same length (1, 2 or 3).
    pub fn from_rows(rows: &[Vec<f64>]) -> ProcResult<Self> {
        let Some(first) = rows.first() else {
            return Ok(Coords::empty());
        };
        if rows.iter().any(|row| row.len() != first.len()) {
            return shape_err("All rows must have the same length");
        }
        Coords::new(rows.concat(), &[rows.len(), first.len()])
    }

    /// An empty (0,3) `Coords`.
    pub fn empty() -> Self {
        Coords{data: Vec::new(), pshape: vec![0]}
    }

    /// Crate-internal constructor for buffers that already satisfy the invariant.
    pub(crate) fn from_raw(data: Vec<f64>, pshape: Vec<usize>) -> Self {
        debug_assert_eq!(data.len(), DIM * pshape.iter().product::<usize>());
        Coords{data, pshape}
    }

    /// Full shape of the array, including the trailing axis of length 3.
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = self.pshape.clone();
        shape.push(DIM);
        shape
    }

    /// Shape of the leading axes (the full shape without the trailing axis).
    pub fn pshape(&self) -> &[usize] {
        &self.pshape
    }

    /// Number of axes, including the trailing one.
    pub fn ndim(&self) -> usize {
        self.pshape.len() + 1
    }

    /// Total number of points.
    pub fn npoints(&self) -> usize {
        self.data.len() / DIM
    }

    /// True if there are no points.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The flat coordinate buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// The flat coordinate buffer, mutable.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Give up the flat coordinate buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Point with flat index `idx`.
    ///
    /// # Panics
    /// Panics if `idx >= self.npoints()`.
    pub fn point(&self, idx: usize) -> Point {
        let xyz = &self.data[DIM * idx..DIM * idx + DIM];
        Point::new(xyz[0], xyz[1], xyz[2])
    }

    /// Overwrite the point with flat index `idx`.
    pub fn set_point(&mut self, idx: usize, point: Point) {
        self.data[DIM * idx..DIM * idx + DIM].copy_from_slice(&point.to_array());
    }

    /// Iterate over all points, in flat order.
    pub fn iter_points(&self) -> impl DoubleEndedIterator<Item = Point> + '_ {
        self.data.chunks_exact(DIM).map(|xyz| Point::new(xyz[0], xyz[1], xyz[2]))
    }

    /// Mutable access to every point as a `[x, y, z]` slice.
    pub(crate) fn points_mut(&mut self) -> std::slice::ChunksExactMut<'_, f64> {
        self.data.chunks_exact_mut(DIM)
    }

    /// The coordinates as a flat (npoints,3) set of points.
    pub fn points(&self) -> Coords {
        Coords{data: self.data.clone(), pshape: vec![self.npoints()]}
    }

    /// Same data with another leading shape.
    pub fn reshape(&self, pshape: &[usize]) -> ProcResult<Coords> {
        if pshape.iter().product::<usize>() != self.npoints() {
            return shape_err(&format!("Cannot reshape {:?} points to {:?}", self.pshape, pshape));
        }
        Ok(Coords{data: self.data.clone(), pshape: pshape.to_vec()})
    }

    /// The values along one coordinate axis, shaped as `pshape()`.
    pub fn component(&self, axis: usize) -> ProcResult<Field<f64>> {
        check_axis(axis)?;
        Ok(self.field(|xyz| xyz[axis]))
    }

    /// The X-coordinates of all points.
    pub fn x(&self) -> Field<f64> {
        self.field(|xyz| xyz[0])
    }

    /// The Y-coordinates of all points.
    pub fn y(&self) -> Field<f64> {
        self.field(|xyz| xyz[1])
    }

    /// The Z-coordinates of all points.
    pub fn z(&self) -> Field<f64> {
        self.field(|xyz| xyz[2])
    }

    /// Evaluate a function on every point, giving a field shaped as `pshape()`.
    pub(crate) fn field<T, F: Fn(&[f64]) -> T>(&self, f: F) -> Field<T> {
        Field::from_raw(self.pshape.clone(), self.data.chunks_exact(DIM).map(f).collect())
    }

    /// Set the coordinates from those of an equally shaped `Coords`.
    pub fn set(&mut self, other: &Coords) -> ProcResult<()> {
        if self.pshape != other.pshape {
            return shape_err(&format!("Cannot set {:?} points from {:?} points", self.pshape, other.pshape));
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// Check if any coordinate is NaN.
    pub fn has_nan(&self) -> bool {
        self.data.iter().any(|v| v.is_nan())
    }
}

impl From<[f64; 3]> for Coords {
    /// A single point, with shape (3,).
    fn from(xyz: [f64; 3]) -> Self {
        Coords{data: xyz.to_vec(), pshape: Vec::new()}
    }
}
impl From<Point> for Coords {
    fn from(point: Point) -> Self {
        point.to_array().into()
    }
}

impl fmt::Display for Coords {
    /// One point per line. The formatter precision sets the number of decimals (default 3).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(3);
        for (idx, point) in self.iter_points().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{:.*}", precision, point)?;
        }
        Ok(())
    }
}

impl AbsDiffEq for Coords {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.pshape == other.pshape
            && std::iter::zip(&self.data, &other.data).all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl Bounded for Coords {
    fn bbox(&self) -> Option<Coords> {
        Some(Coords::bbox(self))
    }
}

/// Compute the bounding box of a list of objects.
///
/// The result encloses all objects. Objects without a bounding box, or with
/// NaN in it, are ignored; if nothing remains, the box collapses on the origin.
pub fn bbox(objects: &[&dyn Bounded]) -> Coords {
    let bboxes: Vec<Coords> = objects.iter()
        .filter_map(|object| object.bbox())
        .filter(|bb| !bb.has_nan())
        .collect();
    if bboxes.is_empty() {
        return Coords::empty().bbox();
    }
    let corners: Vec<[f64; 3]> = bboxes.iter()
        .flat_map(|bb| bb.iter_points())
        .map(|p| p.to_array())
        .collect();
    Coords::from_points(corners).bbox()
}

/// A single point at the origin, with shape (3,).
pub fn origin() -> Coords {
    [0.0, 0.0, 0.0].into()
}
