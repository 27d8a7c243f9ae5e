//! Positioning copies of a `Coords` along a path.

use serde::{Serialize, Deserialize};

use crate::geo_3d::{Point, GeoVector, EPSILON};
use crate::coords::{Coords, Direction, Rotation, ProcResult, vector_rotation, shape_err, arg_err};

/// A path through a sequence of points, optionally closed.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyLine {
    points: Vec<Point>,
    closed: bool,
}

impl PolyLine {
    /// A polyline through the points of a (n,3) `Coords`, with `n >= 2`.
    pub fn new(points: &Coords, closed: bool) -> ProcResult<Self> {
        if points.pshape().len() != 1 || points.npoints() < 2 {
            return shape_err(&format!("A polyline needs a (n,3) set of at least 2 points, got shape {:?}", points.shape()));
        }
        Ok(PolyLine{points: points.iter_points().collect(), closed})
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn segments(&self) -> Vec<GeoVector> {
        let n = self.points.len();
        let nseg = if self.closed { n } else { n - 1 };
        (0..nseg)
            .map(|i| self.points[(i + 1) % n] - self.points[i])
            .collect()
    }

    /// Unit directions of the segments, each one pointing to the next point.
    /// An open polyline of `n` points has `n-1` of them, a closed one `n`.
    pub fn directions(&self) -> Vec<GeoVector> {
        self.segments().iter().map(|d| d.normalize()).collect()
    }

    /// Directions at the points, averaging the incoming and outgoing segment.
    /// An open polyline only gives them for its `n-2` interior points.
    pub fn avg_directions(&self) -> Vec<GeoVector> {
        let dirs = self.directions();
        let n = dirs.len();
        if self.closed {
            (0..n).map(|i| (dirs[(i + n - 1) % n] + dirs[i]).normalize()).collect()
        } else {
            dirs.windows(2).map(|w| (w[0] + w[1]).normalize()).collect()
        }
    }
}

/// How the copies in `sweep_coords` are placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepOptions {
    /// Point of the swept object that is put on the path.
    pub origin: Point,
    /// Direction of the swept object that is aligned with the path.
    pub normal: Direction,
    /// Direction fixing the rotation around the path.
    pub up: Direction,
    /// Use averaged directions at the interior points.
    pub avg_dir: bool,
    /// Explicit directions for all the path points.
    pub directions: Option<Vec<GeoVector>>,
    /// Directions at the first and last point, overriding the computed ones.
    pub end_dirs: [Option<GeoVector>; 2],
    /// Scale factors along the local x-axis, one per path point.
    pub scale_x: Option<Vec<f64>>,
    /// Scale factors along the local y-axis, one per path point.
    pub scale_y: Option<Vec<f64>>,
}
impl Default for SweepOptions {
    fn default() -> Self {
        SweepOptions{
            origin: Point::zero(),
            normal: Direction::Axis(0),
            up: Direction::Axis(2),
            avg_dir: false,
            directions: None,
            end_dirs: [None, None],
            scale_x: None,
            scale_y: None,
        }
    }
}

/// Sweep `coords` along `path`: one copy per path point, with the `origin` on the
/// point and the `normal` along the path direction there.
///
/// Open paths get their missing end directions from the first and last segment.
/// The result has an extra leading axis with the copies.
pub fn sweep_coords(coords: &Coords, path: &PolyLine, opts: &SweepOptions) -> ProcResult<Coords> {
    let points = path.points();
    let n = points.len();

    let mut directions = match (&opts.directions, opts.avg_dir) {
        (Some(directions), _) => directions.clone(),
        (None, true) => path.avg_directions(),
        (None, false) => path.directions(),
    };
    let first = points[1] - points[0];
    let last = points[n - 1] - points[n - 2];
    match n.checked_sub(directions.len()) {
        Some(0) => (),
        Some(1) => directions.push(last),
        Some(2) => {
            directions.insert(0, first);
            directions.push(last);
        },
        _ => {
            return arg_err(&format!("Got {} directions for a path of {} points", directions.len(), n));
        },
    }
    if let Some(d) = opts.end_dirs[0] {
        directions[0] = d;
    }
    if let Some(d) = opts.end_dirs[1] {
        directions[n - 1] = d;
    }
    if let Some(d) = directions.iter().find(|d| d.norm() < EPSILON) {
        return arg_err(&format!("Degenerate path direction {}", d));
    }

    let scale_values = |values: &Option<Vec<f64>>, name: &str| -> ProcResult<Vec<f64>> {
        match values {
            Some(values) if values.len() != n => arg_err(&format!(
                "Got {} scale values in {}-direction for a path of {} points", values.len(), name, n
            )),
            Some(values) => Ok(values.clone()),
            None => Ok(vec![1.0; n]),
        }
    };
    let scale_x = scale_values(&opts.scale_x, "x")?;
    let scale_y = scale_values(&opts.scale_y, "y")?;

    let normal = opts.normal.to_vector()?;
    let up = opts.up.to_vector()?;
    let base = coords.translate(Direction::Vector(-GeoVector::from(opts.origin)), None)?;

    let mut data = Vec::with_capacity(n * base.as_slice().len());
    for i in 0..n {
        let rotation = vector_rotation(normal, directions[i].normalize(), up)?;
        let mut copy = base.scale([scale_x[i], scale_y[i], 1.0], None)?;
        copy.rotate_in_place(Rotation::Matrix(rotation), Direction::Axis(0), None)?
            .translate_in_place(Direction::Vector(points[i].into()), None)?;
        data.extend_from_slice(copy.as_slice());
    }
    let mut pshape = vec![n];
    pshape.extend_from_slice(coords.pshape());
    Ok(Coords::from_raw(data, pshape))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::coords::CoordsError;

    fn path(points: Vec<[f64; 3]>, closed: bool) -> PolyLine {
        PolyLine::new(&Coords::from_points(points), closed).unwrap()
    }

    #[test]
    fn polyline_directions() {
        let open = path(vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 3.0, 0.0]], false);
        assert_eq!(open.directions(), vec![GeoVector::xhat(), GeoVector::yhat()]);
        let avg = open.avg_directions();
        assert_eq!(avg.len(), 1);
        assert_abs_diff_eq!(avg[0], GeoVector::new(1.0, 1.0, 0.0).normalize(), epsilon = 1e-12);

        let closed = path(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]], true);
        assert_eq!(closed.directions().len(), 4);
        assert_abs_diff_eq!(closed.directions()[3], -GeoVector::yhat(), epsilon = 1e-12);
        assert_abs_diff_eq!(closed.avg_directions()[0], GeoVector::new(1.0, -1.0, 0.0).normalize(), epsilon = 1e-12);

        assert!(matches!(PolyLine::new(&Coords::from([0.0; 3]), false), Err(CoordsError::Shape(_))));
    }

    #[test]
    fn sweep_along_straight_path() {
        let section = Coords::from_points(vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let line = path(vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 2.0, 0.0]], false);
        let swept = sweep_coords(&section, &line, &SweepOptions::default()).unwrap();
        assert_eq!(swept.shape(), vec![3, 2, 3]);
        // the local x-axis follows the path, which runs along y
        assert_abs_diff_eq!(swept.point(0), Point::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(swept.point(1), Point::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(swept.point(5), Point::new(-1.0, 2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn sweep_with_scaling() {
        let section = Coords::from_points(vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let line = path(vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 2.0, 0.0]], false);
        let opts = SweepOptions{
            scale_x: Some(vec![1.0, 2.0, 3.0]),
            scale_y: Some(vec![1.0, 1.0, 0.5]),
            ..Default::default()
        };
        let swept = sweep_coords(&section, &line, &opts).unwrap();
        assert_abs_diff_eq!(swept.point(4), Point::new(0.0, 5.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(swept.point(5), Point::new(-0.5, 2.0, 0.0), epsilon = 1e-12);

        let bad = SweepOptions{scale_y: Some(vec![1.0, 2.0]), ..Default::default()};
        assert!(matches!(sweep_coords(&section, &line, &bad), Err(CoordsError::Argument(_))));
    }

    #[test]
    fn sweep_end_directions_and_origin() {
        let section = Coords::from_points(vec![[5.0, 0.0, 0.0], [6.0, 0.0, 0.0]]);
        let line = path(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]], false);
        let opts = SweepOptions{
            origin: Point::new(5.0, 0.0, 0.0),
            avg_dir: true,
            end_dirs: [None, Some(GeoVector::new(-1.0, 0.0, 0.0))],
            ..Default::default()
        };
        let swept = sweep_coords(&section, &line, &opts).unwrap();
        // origin lands on the path points
        assert_abs_diff_eq!(swept.point(0), Point::new(0.0, 0.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(swept.point(2), Point::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        // first copy follows the first segment
        assert_abs_diff_eq!(swept.point(1), Point::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        // middle copy follows the averaged direction
        let d = GeoVector::new(1.0, 1.0, 0.0).normalize();
        assert_abs_diff_eq!(swept.point(3), Point::new(1.0, 0.0, 0.0) + d, epsilon = 1e-12);
        // last copy uses the given end direction
        assert_abs_diff_eq!(swept.point(5), Point::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn sweep_rejects_wrong_direction_count() {
        let section = Coords::from([1.0, 0.0, 0.0]);
        let line = path(vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 2.0, 0.0], [0.0, 3.0, 0.0]], false);
        let opts = SweepOptions{directions: Some(vec![GeoVector::yhat()]), ..Default::default()};
        assert!(matches!(sweep_coords(&section, &line, &opts), Err(CoordsError::Argument(_))));
    }
}
