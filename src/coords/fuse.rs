//! Merging of (almost) coincident points by spatial bucketing.

use log::debug;
use serde::{Serialize, Deserialize};

use crate::coords::{Coords, Field, ProcResult, DIM, arg_err};

/// Parameters of `Coords::fuse`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FuseOptions {
    /// Mean number of points per bucket.
    pub points_per_box: usize,
    /// Offset of the bucket grid origin, as a fraction of the bucket size.
    pub shift: f64,
    /// Tolerance relative to the bounding box size.
    pub rtol: f64,
    /// Absolute tolerance.
    pub atol: f64,
    /// Run a second pass with a grid shifted over another quarter bucket.
    /// Close points split by a bucket boundary in both grids still stay apart.
    pub repeat: bool,
}
impl Default for FuseOptions {
    fn default() -> Self {
        FuseOptions{
            points_per_box: 1,
            shift: 0.5,
            rtol: 1e-5,
            atol: 1e-5,
            repeat: true,
        }
    }
}
impl FuseOptions {
    pub(crate) fn check(&self) -> ProcResult<()> {
        if self.points_per_box == 0 {
            return arg_err("points_per_box must be at least 1");
        }
        if !(self.rtol >= 0.0 && self.atol >= 0.0) {
            return arg_err(&format!("Tolerances must be non-negative, got rtol={} atol={}", self.rtol, self.atol));
        }
        Ok(())
    }
}

/// Result of `Coords::fuse`.
#[derive(Debug, Clone)]
pub struct Fused {
    /// The unique points, shape (nunique,3), in order of first occurrence.
    pub coords: Coords,
    /// For every original point the row of its representative in `coords`.
    /// Shaped as the `pshape()` of the fused `Coords`.
    pub index: Field<usize>,
}

/// Result of `Coords::match_points`.
#[derive(Debug, Clone)]
pub struct Matched {
    /// Pairs `(i, j)`: point `j` of the other set coincides with point `i` of this one.
    /// Every point of the other set appears at most once, paired with the first
    /// coinciding point of this set.
    pub matches: Vec<(usize, usize)>,
    /// The fused points of both sets.
    pub coords: Coords,
    /// Position of every point of this set in `coords`.
    pub index_self: Field<usize>,
    /// Position of every point of the other set in `coords`.
    pub index_other: Field<usize>,
}

impl Coords {
    /// Replace points lying closer than the tolerance by a single point.
    ///
    /// Space is divided in equally sized boxes holding on average
    /// `points_per_box` points. Only points in the same box are compared: two
    /// points coincide if every coordinate differs less than
    /// `max(rtol * max(sizes()), atol)`. Close points near a box boundary can end
    /// up in different boxes, which is why by default a second pass runs on a
    /// shifted grid. Even then some close pairs may be missed.
    pub fn fuse(&self, opts: &FuseOptions) -> ProcResult<Fused> {
        opts.check()?;
        if self.is_empty() {
            return Ok(Fused{
                coords: self.points(),
                index: Field::from_raw(self.pshape().to_vec(), Vec::new()),
            });
        }

        let (mut coords, mut index) = fuse_pass(&self.points(), opts, opts.shift);
        if opts.repeat {
            let (coords2, index2) = fuse_pass(&coords, opts, opts.shift + 0.25);
            index = index.into_iter().map(|k| index2[k]).collect();
            coords = coords2;
        }
        debug!("Fused {} points into {}", self.npoints(), coords.npoints());

        Ok(Fused{
            coords,
            index: Field::from_raw(self.pshape().to_vec(), index),
        })
    }

    /// Find the points of `other` that coincide with points of `self`.
    ///
    /// Both point sets are fused together; the fused index is then split back
    /// at `self.npoints()`.
    pub fn match_points(&self, other: &Coords, opts: &FuseOptions) -> ProcResult<Matched> {
        let nself = self.npoints();
        let mut data = Vec::with_capacity(self.as_slice().len() + other.as_slice().len());
        data.extend_from_slice(self.as_slice());
        data.extend_from_slice(other.as_slice());
        let all = Coords::from_raw(data, vec![nself + other.npoints()]);

        let fused = all.fuse(opts)?;
        let (index_self, index_other) = fused.index.as_slice().split_at(nself);

        let mut first_of = vec![None; fused.coords.npoints()];
        for (i, &k) in index_self.iter().enumerate() {
            first_of[k].get_or_insert(i);
        }
        let matches = index_other.iter()
            .enumerate()
            .filter_map(|(j, &k)| first_of[k].map(|i| (i, j)))
            .collect();

        Ok(Matched{
            matches,
            index_self: Field::from_raw(self.pshape().to_vec(), index_self.to_vec()),
            index_other: Field::from_raw(other.pshape().to_vec(), index_other.to_vec()),
            coords: fused.coords,
        })
    }
}

/// One fusing pass over a flat, non-empty point set.
fn fuse_pass(x: &Coords, opts: &FuseOptions, shift: f64) -> (Coords, Vec<usize>) {
    let npoints = x.npoints();
    let sizes = x.sizes().to_array();
    let lo = x.bbox().point(0).to_array();

    let extents: Vec<f64> = sizes.iter().copied().filter(|&s| s > 0.0).collect();
    if extents.is_empty() {
        // all points coincide
        return (Coords::from_points(vec![x.point(0).to_array()]), vec![0; npoints]);
    }

    // box size for the requested mean population, over the non-degenerate axes only
    let volume: f64 = extents.iter().product();
    let nboxes = (npoints / opts.points_per_box).max(1) as f64;
    let boxsz = (volume / nboxes).powf(1.0 / extents.len() as f64);

    let mut nx = [0i64; DIM];
    let mut dx = [0.0; DIM];
    let mut ox = [0.0; DIM];
    for i in 0..DIM {
        let count = (sizes[i] / boxsz) as i64;
        dx[i] = if count > 0 { sizes[i] / count as f64 } else { boxsz };
        nx[i] = count.saturating_add(1);
        ox[i] = lo[i] - dx[i] * shift;
    }
    // axis with most boxes is the most significant part of the key
    let mut order = [0, 1, 2];
    order.sort_by_key(|&i| nx[i]);
    debug!("Fuse pass: {} points, box size {:?}, box counts {:?}", npoints, dx, nx);

    let keys: Vec<[i64; DIM]> = x.as_slice()
        .chunks_exact(DIM)
        .map(|p| {
            let ind = |i: usize| ((p[i] - ox[i]) / dx[i]).floor() as i64;
            [ind(order[2]), ind(order[1]), ind(order[0])]
        })
        .collect();
    let mut sorted: Vec<usize> = (0..npoints).collect();
    sorted.sort_by_key(|&i| keys[i]);

    let tol = sizes.iter()
        .map(|s| (opts.rtol * s).abs())
        .fold(opts.atol, f64::max);
    let close = |a: usize, b: usize| {
        let (pa, pb) = (x.point(a), x.point(b));
        (0..DIM).all(|i| (pa[i] - pb[i]).abs() < tol)
    };

    // representative (original index) of every point, found by walking back
    // through the earlier points of the same box
    let mut rep = vec![0usize; npoints];
    for k in 0..npoints {
        let pk = sorted[k];
        rep[pk] = pk;
        for &pj in sorted[..k].iter().rev().take_while(|&&pj| keys[pj] == keys[pk]) {
            if close(pk, pj) {
                rep[pk] = rep[pj];
                break;
            }
        }
    }

    // number the unique points in order of first occurrence
    let mut new_id: Vec<Option<usize>> = vec![None; npoints];
    let mut unique = Vec::new();
    let index = (0..npoints)
        .map(|i| {
            let r = rep[i];
            *new_id[r].get_or_insert_with(|| {
                unique.push(x.point(r).to_array());
                unique.len() - 1
            })
        })
        .collect();

    (Coords::from_points(unique), index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::coords::Direction;

    /// Irregular 4x3x3 grid of well separated points.
    fn scattered() -> Coords {
        let xs = [0.0, 1.3, 2.9, 4.1];
        let ys = [-0.7, 0.45, 2.2];
        let zs = [0.1, 1.75, 3.05];
        let mut points = Vec::new();
        for &x in xs.iter() {
            for &y in ys.iter() {
                for &z in zs.iter() {
                    points.push([x + 0.01 * y, y - 0.02 * z, z + 0.03 * x]);
                }
            }
        }
        Coords::from_points(points)
    }

    #[test]
    fn exact_duplicates_collapse() {
        let c = Coords::from_points(vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);
        let fused = c.fuse(&FuseOptions::default()).unwrap();
        assert_eq!(fused.coords.npoints(), 3);
        assert_eq!(fused.index.as_slice(), &[0, 1, 0, 1, 2]);
        assert_eq!(fused.coords.point(2), c.point(4));
    }

    #[test]
    fn close_points_merge() {
        let base = scattered();
        let moved = base.translate([3e-6, -2e-6, 1e-6].into(), None).unwrap();
        let both = Coords::new([base.as_slice(), moved.as_slice()].concat(), &[2, base.npoints(), 3]).unwrap();
        let fused = both.fuse(&FuseOptions::default()).unwrap();
        assert_eq!(fused.coords.npoints(), base.npoints());
        assert_eq!(fused.index.shape(), &[2, base.npoints()]);
        let (first, second) = fused.index.as_slice().split_at(base.npoints());
        assert_eq!(first, second);
    }

    #[test]
    fn fuse_is_idempotent() {
        let c = scattered();
        let once = c.fuse(&FuseOptions::default()).unwrap();
        assert_eq!(once.coords.npoints(), c.npoints());
        let twice = once.coords.fuse(&FuseOptions::default()).unwrap();
        assert_eq!(twice.index.into_vec(), (0..c.npoints()).collect::<Vec<_>>());
        assert_abs_diff_eq!(twice.coords, once.coords);
    }

    #[test]
    fn single_pass_with_larger_boxes() {
        let c = scattered();
        let opts = FuseOptions{points_per_box: 8, repeat: false, ..Default::default()};
        let fused = c.fuse(&opts).unwrap();
        assert_eq!(fused.coords.npoints(), c.npoints());
        assert!(c.fuse(&FuseOptions{points_per_box: 0, ..Default::default()}).is_err());
    }

    #[test]
    fn second_pass_merges_across_box_boundary() {
        let c = Coords::from_points(vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.375 - 3e-6, 0.0, 0.0],
            [0.375 + 3e-6, 0.0, 0.0],
        ]);
        let single = FuseOptions{repeat: false, ..Default::default()};
        assert_eq!(c.fuse(&single).unwrap().coords.npoints(), 4);
        let fused = c.fuse(&FuseOptions::default()).unwrap();
        assert_eq!(fused.coords.npoints(), 3);
        assert_eq!(fused.index.as_slice()[2], fused.index.as_slice()[3]);
    }

    #[test]
    fn long_thin_cloud() {
        let c = Coords::from_points(vec![[0.0, 0.0, 0.0], [1e20, 1e-20, 1e-20]]);
        let fused = c.fuse(&FuseOptions::default()).unwrap();
        assert_eq!(fused.coords.npoints(), 2);
        assert_eq!(fused.index.as_slice(), &[0, 1]);
    }

    #[test]
    fn coincident_and_empty() {
        let c = Coords::from_points(vec![[1.0, 2.0, 3.0]; 4]);
        let fused = c.fuse(&FuseOptions::default()).unwrap();
        assert_eq!(fused.coords.npoints(), 1);
        assert_eq!(fused.index.as_slice(), &[0, 0, 0, 0]);

        let fused = Coords::empty().fuse(&FuseOptions::default()).unwrap();
        assert!(fused.coords.is_empty());
        assert!(fused.index.is_empty());
    }

    #[test]
    fn tolerance_is_relative_to_size() {
        let c = Coords::from_points(vec![[0.0, 0.0, 0.0], [1000.0, 0.0, 0.0], [1000.005, 0.0, 0.0]]);
        let fused = c.fuse(&FuseOptions::default()).unwrap();
        assert_eq!(fused.coords.npoints(), 2);
        let strict = FuseOptions{rtol: 0.0, atol: 1e-6, ..Default::default()};
        assert_eq!(c.fuse(&strict).unwrap().coords.npoints(), 3);
    }

    #[test]
    fn match_against_shifted_copy() {
        let c = scattered();
        let n = c.npoints();
        let reversed: Vec<[f64; 3]> = c.iter_points().rev().map(|p| p.to_array()).collect();
        let other = Coords::from_points(reversed)
            .translate(Direction::Vector([2e-6, 0.0, -1e-6].into()), None)
            .unwrap();
        let matched = c.match_points(&other, &FuseOptions::default()).unwrap();
        assert_eq!(matched.matches.len(), n);
        for (j, &(i, jj)) in matched.matches.iter().enumerate() {
            assert_eq!(jj, j);
            assert_eq!(i, n - 1 - j);
        }
        assert_eq!(matched.coords.npoints(), n);
        assert_eq!(matched.index_other.len(), n);
    }

    #[test]
    fn match_reports_only_coinciding_points() {
        let c = Coords::from_points(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let other = Coords::from_points(vec![[5.0, 5.0, 5.0], [0.0, 1.0, 0.0]]);
        let matched = c.match_points(&other, &FuseOptions::default()).unwrap();
        assert_eq!(matched.matches, vec![(2, 1)]);
        assert_eq!(matched.coords.npoints(), 4);
    }
}
