use log::warn;

use crate::geo_3d::{Point, Plane, PlaneSection};
use crate::coords::{Coords, Direction, ProcResult, DIM, check_axis, runtime_err};

impl Coords {
    /// Project all points on the plane through `p` with normal `n`.
    pub fn project_on_plane(&self, n: Direction, p: &Point) -> ProcResult<Coords> {
        let mut out = self.clone();
        match n {
            Direction::Axis(axis) => {
                check_axis(axis)?;
                for xyz in out.points_mut() {
                    xyz[axis] = p[axis];
                }
            },
            Direction::Vector(_) => {
                let plane = Plane::from_normal_and_point(n.to_unit_vector()?, *p);
                for xyz in out.points_mut() {
                    let projected = plane.project_point(&Point::new(xyz[0], xyz[1], xyz[2]));
                    xyz.copy_from_slice(&projected.to_array());
                }
            },
        }
        Ok(out)
    }

    /// Project all points radially on the sphere with given radius and center.
    /// A point at the center maps to NaN.
    pub fn project_on_sphere(&self, radius: f64, center: &Point) -> Coords {
        let mut out = self.clone();
        for xyz in out.points_mut() {
            let v = Point::new(xyz[0], xyz[1], xyz[2]) - *center;
            let projected = *center + v * (radius / v.norm());
            xyz.copy_from_slice(&projected.to_array());
        }
        out
    }

    /// Project all points radially on the cylinder with given radius whose axis
    /// runs through `center` parallel to global axis `dir`.
    /// Points on the axis map to NaN.
    pub fn project_on_cylinder(&self, radius: f64, dir: usize, center: &Point) -> ProcResult<Coords> {
        check_axis(dir)?;
        let mut out = self.clone();
        for xyz in out.points_mut() {
            let d = (0..DIM)
                .filter(|&i| i != dir)
                .map(|i| (xyz[i] - center[i]).powi(2))
                .sum::<f64>()
                .sqrt();
            let s = radius / d;
            for i in (0..DIM).filter(|&i| i != dir) {
                xyz[i] = center[i] + (xyz[i] - center[i]) * s;
            }
        }
        Ok(out)
    }

    /// Project all points along direction `n` on a surface.
    ///
    /// Each point is moved to the closest intersection of its projection line with
    /// the surface. A line missing the surface is an error, unless `ignore_errors`
    /// is set, in which case that point becomes NaN.
    pub fn project_on_surface(&self, surface: &dyn PlaneSection, n: Direction, ignore_errors: bool) -> ProcResult<Coords> {
        let n = n.to_unit_vector()?;
        // the projection line is the intersection of two planes through the point
        let v1 = n.any_perpendicular();
        let v2 = n.cross(&v1);

        let mut out = self.clone();
        let mut misses = 0;
        for xyz in out.points_mut() {
            let xi = Point::new(xyz[0], xyz[1], xyz[2]);
            let second = Plane::from_normal_and_point(v2, xi);
            let closest = surface.intersection_with_plane(&xi, &v1)
                .iter()
                .filter_map(|[a, b]| second.intersect_segment(a, b))
                .min_by(|p, q| p.distance(&xi).total_cmp(&q.distance(&xi)));
            match closest {
                Some(p) => xyz.copy_from_slice(&p.to_array()),
                None if ignore_errors => {
                    misses += 1;
                    xyz.fill(f64::NAN);
                },
                None => {
                    return runtime_err(&format!("Projection line through {} does not cut the surface", xi));
                },
            }
        }
        if misses > 0 {
            warn!("{} of {} points could not be projected on the surface", misses, self.npoints());
        }
        Ok(out)
    }
}
