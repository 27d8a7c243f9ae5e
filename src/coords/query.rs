use serde::{Serialize, Deserialize};

use crate::geo_3d::{Point, GeoVector};
use crate::coords::{Coords, Direction, Field, ProcResult, DIM, arg_err, check_axis};

/// One side of a `Coords::test` slab.
///
/// Axis tests compare a coordinate against a value, plane tests compare the
/// signed distance against a plane through a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Value(f64),
    Point(Point),
}

/// Minimum that propagates NaN instead of skipping it.
fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.min(b) }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.max(b) }
}

impl Coords {
    /// Bounding box as a (2,3) `Coords`: the min corner, then the max corner.
    /// An empty set gives two points at the origin. NaN coordinates propagate.
    pub fn bbox(&self) -> Coords {
        if self.is_empty() {
            return Coords::from_raw(vec![0.0; 2 * DIM], vec![2]);
        }
        let mut lo = [f64::INFINITY; DIM];
        let mut hi = [f64::NEG_INFINITY; DIM];
        for xyz in self.as_slice().chunks_exact(DIM) {
            for i in 0..DIM {
                lo[i] = nan_min(lo[i], xyz[i]);
                hi[i] = nan_max(hi[i], xyz[i]);
            }
        }
        Coords::from_points(vec![lo, hi])
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Point {
        let bb = self.bbox();
        let (lo, hi) = (bb.point(0), bb.point(1));
        Point::new(0.5 * (lo.x + hi.x), 0.5 * (lo.y + hi.y), 0.5 * (lo.z + hi.z))
    }

    /// Mean of all points. The origin for an empty set.
    pub fn centroid(&self) -> Point {
        if self.is_empty() {
            return Point::zero();
        }
        let mut sum = GeoVector::zero();
        for p in self.iter_points() {
            sum += GeoVector::from(p);
        }
        (sum / self.npoints() as f64).into()
    }

    /// Length of the bounding box along the three axes.
    pub fn sizes(&self) -> GeoVector {
        let bb = self.bbox();
        bb.point(1) - bb.point(0)
    }

    /// Length of the bounding box diagonal.
    pub fn dsize(&self) -> f64 {
        self.sizes().norm()
    }

    /// Radius of the smallest sphere around `center()` enclosing all points.
    pub fn bsphere(&self) -> f64 {
        self.distance_from_point(&self.center()).max().unwrap_or(0.0)
    }

    /// (Weighted) average of the points along leading axis `axis`.
    ///
    /// Without weights every point counts `1/n`. The result has that axis removed.
    pub fn average(&self, weights: Option<&[f64]>, axis: usize) -> ProcResult<Coords> {
        let pshape = self.pshape();
        if axis >= pshape.len() {
            return arg_err(&format!("Cannot average along axis {} of a Coords with shape {:?}", axis, self.shape()));
        }
        let n = pshape[axis];
        let weights: Vec<f64> = match weights {
            Some(w) if w.len() != n => {
                return arg_err(&format!("Expected {} weights, got {}", n, w.len()));
            },
            Some(w) => w.to_vec(),
            None => vec![1.0 / n as f64; n],
        };

        let outer: usize = pshape[..axis].iter().product();
        let inner: usize = pshape[axis + 1..].iter().product::<usize>() * DIM;
        let mut data = vec![0.0; outer * inner];
        let src = self.as_slice();
        for o in 0..outer {
            for (k, w) in weights.iter().enumerate() {
                let row = &src[(o * n + k) * inner..(o * n + k + 1) * inner];
                for (acc, v) in data[o * inner..(o + 1) * inner].iter_mut().zip(row) {
                    *acc += w * v;
                }
            }
        }
        let mut new_pshape = pshape.to_vec();
        new_pshape.remove(axis);
        Ok(Coords::from_raw(data, new_pshape))
    }

    /// Signed distance of every point from the plane through `p` with normal `n`.
    /// Positive on the side the normal points to.
    pub fn distance_from_plane(&self, p: &Point, n: Direction) -> ProcResult<Field<f64>> {
        let n = n.to_unit_vector()?;
        let offset = GeoVector::from(*p).dot(&n);
        Ok(self.field(|xyz| xyz[0] * n.x + xyz[1] * n.y + xyz[2] * n.z - offset))
    }

    /// Distance of every point from the line through `p` with direction `n`.
    pub fn distance_from_line(&self, p: &Point, n: Direction) -> ProcResult<Field<f64>> {
        let n = n.to_unit_vector()?;
        Ok(self.field(|xyz| (Point::new(xyz[0], xyz[1], xyz[2]) - *p).cross(&n).norm()))
    }

    /// Distance of every point from the point `p`.
    pub fn distance_from_point(&self, p: &Point) -> Field<f64> {
        self.field(|xyz| Point::new(xyz[0], xyz[1], xyz[2]).distance(p))
    }

    /// The point closest to `p` (the first one on ties). `None` if empty.
    pub fn closest_to_point(&self, p: &Point) -> Option<Point> {
        self.distance_from_point(p).argmin().map(|idx| self.point(idx))
    }

    /// Extreme signed distances of the points from the plane through `p` with normal `n`.
    /// `p` defaults to `center()`.
    pub fn directional_size(&self, n: Direction, p: Option<Point>) -> ProcResult<(f64, f64)> {
        let p = p.unwrap_or_else(|| self.center());
        let d = self.distance_from_plane(&p, n)?;
        Ok((d.min().unwrap_or(0.0), d.max().unwrap_or(0.0)))
    }

    /// Two points on the line (p,n) through which the extremal planes with normal `n` pass.
    pub fn directional_extremes(&self, n: Direction, p: Option<Point>) -> ProcResult<[Point; 2]> {
        let p = p.unwrap_or_else(|| self.center());
        let unit = n.to_unit_vector()?;
        let (dmin, dmax) = self.directional_size(n, Some(p))?;
        Ok([p + unit * dmin, p + unit * dmax])
    }

    /// Thickness of the point set in direction `n`.
    pub fn directional_width(&self, n: Direction) -> ProcResult<f64> {
        let (dmin, dmax) = self.directional_size(n, None)?;
        Ok(dmax - dmin)
    }

    /// Flag the points lying between `min` and `max`.
    ///
    /// With an axis direction the bounds are coordinate values, with a vector
    /// direction they are points on planes normal to that vector. Either bound
    /// may be left out, but not both. `atol` widens the accepted range.
    pub fn test(&self, dir: Direction, min: Option<Bound>, max: Option<Bound>, atol: f64) -> ProcResult<Field<bool>> {
        if min.is_none() && max.is_none() {
            return arg_err("At least one of min or max has to be specified");
        }
        let lower = min.map(|bound| self.signed_offsets(dir, bound)).transpose()?;
        let upper = max.map(|bound| self.signed_offsets(dir, bound)).transpose()?;

        let flags = (0..self.npoints())
            .map(|idx| {
                lower.as_ref().map_or(true, |d| d[idx] > -atol)
                    && upper.as_ref().map_or(true, |d| d[idx] < atol)
            })
            .collect();
        Ok(Field::from_raw(self.pshape().to_vec(), flags))
    }

    /// Offset of every point beyond a bound, measured along `dir`.
    fn signed_offsets(&self, dir: Direction, bound: Bound) -> ProcResult<Field<f64>> {
        match (dir, bound) {
            (Direction::Axis(axis), Bound::Value(value)) => {
                check_axis(axis)?;
                Ok(self.field(|xyz| xyz[axis] - value))
            },
            (Direction::Vector(_), Bound::Point(point)) => self.distance_from_plane(&point, dir),
            (Direction::Axis(_), Bound::Point(_)) => arg_err("An axis test needs value bounds"),
            (Direction::Vector(_), Bound::Value(_)) => arg_err("A plane test needs point bounds"),
        }
    }
}
