//! Non-affine mappings. These always return a new `Coords`.

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::geo_3d::Point;
use crate::coords::{Coords, AngleUnit, ProcResult, DIM, arg_err, check_axis};

/// How the source axes of a curvilinear mapping are read.
///
/// `dir` names the source axes of the three curvilinear coordinates, e.g.
/// (radius, angle, height) for a cylindrical mapping. `scale` multiplies them
/// first, then angles are converted from `angle_unit`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurvilinearAxes {
    pub dir: [usize; 3],
    pub scale: [f64; 3],
    pub angle_unit: AngleUnit,
}
impl Default for CurvilinearAxes {
    fn default() -> Self {
        CurvilinearAxes{
            dir: [0, 1, 2],
            scale: [1.0, 1.0, 1.0],
            angle_unit: AngleUnit::Degrees,
        }
    }
}
impl CurvilinearAxes {
    fn check(&self) -> ProcResult<()> {
        check_dirs(&self.dir)
    }
}

/// End of the bounding box where `Coords::flare` acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlareEnd {
    #[default]
    Start,
    End,
}

fn check_dirs(dirs: &[usize]) -> ProcResult<()> {
    dirs.iter().try_for_each(|&axis| check_axis(axis))
}

/// `sign(cos o) * |cos o|^m`
fn signed_cos(o: f64, m: f64) -> f64 {
    let c = o.cos();
    c.signum() * c.abs().powf(m)
}

/// `sign(sin o) * |sin o|^m`
fn signed_sin(o: f64, m: f64) -> f64 {
    let s = o.sin();
    s.signum() * s.abs().powf(m)
}

impl Coords {
    /// Apply `f` to every point, producing the new `[x, y, z]`.
    fn map_points<F: Fn(&[f64]) -> [f64; 3]>(&self, f: F) -> Coords {
        let mut out = self.clone();
        for xyz in out.points_mut() {
            let mapped = f(&*xyz);
            xyz.copy_from_slice(&mapped);
        }
        out
    }

    /// Interpret the coordinates as cylindrical (r, theta, z) and convert to cartesian.
    pub fn cylindrical(&self, axes: &CurvilinearAxes) -> ProcResult<Coords> {
        self.hyper_cylindrical(axes, |_| 1.0, |_| 1.0)
    }

    /// Cylindrical mapping where radius and height are further multiplied by
    /// functions of the angle (in radians).
    pub fn hyper_cylindrical<R, Z>(&self, axes: &CurvilinearAxes, rfunc: R, zfunc: Z) -> ProcResult<Coords>
    where
        R: Fn(f64) -> f64,
        Z: Fn(f64) -> f64,
    {
        axes.check()?;
        let [dr, dt, dz] = axes.dir;
        let [sr, st, sz] = axes.scale;
        let unit = axes.angle_unit.to_radians();
        Ok(self.map_points(|xyz| {
            let theta = st * unit * xyz[dt];
            let r = sr * rfunc(theta) * xyz[dr];
            [r * theta.cos(), r * theta.sin(), sz * zfunc(theta) * xyz[dz]]
        }))
    }

    /// Convert cartesian coordinates to cylindrical (r, theta, z).
    /// `dir` gives the axes playing the role of x, y and z.
    pub fn to_cylindrical(&self, dir: [usize; 3], angle_unit: AngleUnit) -> ProcResult<Coords> {
        check_dirs(&dir)?;
        let unit = angle_unit.to_radians();
        Ok(self.map_points(|xyz| {
            let (x, y, z) = (xyz[dir[0]], xyz[dir[1]], xyz[dir[2]]);
            [x.hypot(y), y.atan2(x) / unit, z]
        }))
    }

    /// Interpret the coordinates as spherical (longitude, latitude, radius) and
    /// convert to cartesian. Latitude runs from -90 (south) to 90 (north);
    /// with `colat` it is measured from the north pole instead.
    pub fn spherical(&self, axes: &CurvilinearAxes, colat: bool) -> ProcResult<Coords> {
        self.super_spherical(axes, colat, 1.0, 1.0, 0.0)
    }

    /// Spherical mapping with the circle replaced by signed power curves.
    ///
    /// `n` shapes the latitude (pole to equator) and `e` the longitude. `k` in
    /// (-1, 1) makes it egg-shaped: positive values enlarge the southern
    /// hemisphere and shrink the northern one.
    pub fn super_spherical(&self, axes: &CurvilinearAxes, colat: bool, n: f64, e: f64, k: f64) -> ProcResult<Coords> {
        axes.check()?;
        let [dt, dp, dr] = axes.dir;
        let [st, sp, sr] = axes.scale;
        let unit = axes.angle_unit.to_radians();
        Ok(self.map_points(|xyz| {
            let theta = st * unit * xyz[dt];
            let mut phi = sp * unit * xyz[dp];
            let r = sr * xyz[dr];
            if colat {
                phi = 90.0 * unit - phi;
            }
            let mut rc = r * signed_cos(phi, n);
            if k != 0.0 {
                let x = phi.sin();
                rc *= (1.0 - k * x) / (1.0 + k * x);
            }
            [rc * signed_cos(theta, e), rc * signed_sin(theta, e), r * signed_sin(phi, n)]
        }))
    }

    /// Convert cartesian coordinates to spherical (longitude, latitude, distance).
    ///
    /// With `v` the point's coordinates along the `dir` axes, the longitude is
    /// measured in the (v2, v0) plane and the latitude towards v1.
    /// Points at the origin get latitude 0.
    pub fn to_spherical(&self, dir: [usize; 3], angle_unit: AngleUnit) -> ProcResult<Coords> {
        check_dirs(&dir)?;
        let unit = angle_unit.to_radians();
        Ok(self.map_points(|xyz| {
            let v = [xyz[dir[0]], xyz[dir[1]], xyz[dir[2]]];
            let dist = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            let long = v[0].atan2(v[2]) / unit;
            let lat = if dist <= 0.0 { 0.0 } else { (v[1] / dist).asin() / unit };
            [long, lat, dist]
        }))
    }

    /// Bump coordinate `dir` by `func(d) * a[dir] / func(0)`, with `d` the distance
    /// from `a` measured over the `dist` axes (default: all axes but `dir`).
    /// Over a single axis the distance is the absolute coordinate difference.
    ///
    /// `func(0)` must be finite and nonzero.
    pub fn bump<F: Fn(f64) -> f64>(&self, dir: usize, a: &Point, func: F, dist: Option<&[usize]>) -> ProcResult<Coords> {
        check_axis(dir)?;
        let f0 = func(0.0);
        if f0 == 0.0 || !f0.is_finite() {
            return arg_err(&format!("Bump function must be finite and nonzero at 0, got {}", f0));
        }
        let amplitude = a[dir] / f0;
        let default_dist: Vec<usize> = (0..DIM).filter(|&i| i != dir).collect();
        let dist = dist.unwrap_or(&default_dist);
        check_dirs(dist)?;

        let mut out = self.clone();
        for xyz in out.points_mut() {
            let d = distance_over(xyz, a, dist);
            xyz[dir] += func(d) * amplitude;
        }
        Ok(out)
    }

    /// Bump with the distance measured along a single axis.
    pub fn bump1<F: Fn(f64) -> f64>(&self, dir: usize, a: &Point, func: F, dist: usize) -> ProcResult<Coords> {
        self.bump(dir, a, func, Some(&[dist]))
    }

    /// Bump with the distance measured in the plane perpendicular to `dir`.
    pub fn bump2<F: Fn(f64) -> f64>(&self, dir: usize, a: &Point, func: F) -> ProcResult<Coords> {
        self.bump(dir, a, func, None)
    }

    /// Flare one end of the block.
    ///
    /// Points within `xf` of the bounding box `end` along axis `dir[0]` get
    /// `f * (1 - s/xf)^exp` added to coordinate `dir[1]`, where `s` is their
    /// distance from that end.
    pub fn flare(&self, xf: f64, f: f64, dir: [usize; 2], end: FlareEnd, exp: f64) -> ProcResult<Coords> {
        check_dirs(&dir)?;
        if xf <= 0.0 {
            return arg_err(&format!("Flare length must be positive, got {}", xf));
        }
        let [ix, iz] = dir;
        let bb = self.bbox();
        let mut out = self.clone();
        match end {
            FlareEnd::Start => {
                let xmin = bb.point(0)[ix];
                for xyz in out.points_mut() {
                    if xyz[ix] < xmin + xf {
                        xyz[iz] += f * (1.0 - (xyz[ix] - xmin) / xf).powf(exp);
                    }
                }
            },
            FlareEnd::End => {
                let xmax = bb.point(1)[ix];
                for xyz in out.points_mut() {
                    if xyz[ix] > xmax - xf {
                        xyz[iz] += f * (1.0 - (xmax - xyz[ix]) / xf).powf(exp);
                    }
                }
            },
        }
        Ok(out)
    }

    /// Map every point through `func(x, y, z)`.
    pub fn map<F: Fn(f64, f64, f64) -> [f64; 3]>(&self, func: F) -> Coords {
        self.map_points(|xyz| func(xyz[0], xyz[1], xyz[2]))
    }

    /// Replace coordinate `dir` by `func(x[src])`, `src` defaulting to `dir`.
    pub fn map1<F: Fn(f64) -> f64>(&self, dir: usize, func: F, src: Option<usize>) -> ProcResult<Coords> {
        let src = src.unwrap_or(dir);
        check_axis(dir)?;
        check_axis(src)?;
        let mut out = self.clone();
        for xyz in out.points_mut() {
            xyz[dir] = func(xyz[src]);
        }
        Ok(out)
    }

    /// Replace coordinate `dir` by `func(d)`, with `d` the distance to `point`
    /// measured over the `dist` axes (default: all three).
    pub fn mapd<F: Fn(f64) -> f64>(&self, dir: usize, func: F, point: &Point, dist: Option<&[usize]>) -> ProcResult<Coords> {
        check_axis(dir)?;
        let dist = dist.unwrap_or(&[0, 1, 2]);
        check_dirs(dist)?;
        let mut out = self.clone();
        for xyz in out.points_mut() {
            xyz[dir] = func(distance_over(xyz, point, dist));
        }
        Ok(out)
    }

    /// Map every coordinate `x` to `(1 - k x) / (1 + k x)`.
    pub fn egg(&self, k: f64) -> Coords {
        let data = self.as_slice().iter().map(|x| (1.0 - k * x) / (1.0 + k * x)).collect();
        Coords::from_raw(data, self.pshape().to_vec())
    }

    /// Replace the coordinates along axes `to` by those along axes `from`,
    /// taken from `other` if given (same shape required).
    pub fn replace(&self, to: &[usize], from: &[usize], other: Option<&Coords>) -> ProcResult<Coords> {
        if to.len() != from.len() {
            return arg_err(&format!("Cannot replace {} axes by {} axes", to.len(), from.len()));
        }
        check_dirs(to)?;
        check_dirs(from)?;
        let source = other.unwrap_or(self);
        if source.pshape() != self.pshape() {
            return crate::coords::shape_err(&format!("Cannot replace axes from a Coords with shape {:?} in {:?}", source.shape(), self.shape()));
        }
        let mut out = self.clone();
        for (xyz, src) in out.points_mut().zip(source.as_slice().chunks_exact(DIM)) {
            for (&i, &j) in to.iter().zip(from) {
                xyz[i] = src[j];
            }
        }
        Ok(out)
    }

    /// Swap coordinate axes `i` and `j`.
    pub fn swap_axes(&self, i: usize, j: usize) -> ProcResult<Coords> {
        self.replace(&[i, j], &[j, i], None)
    }

    /// Roll the coordinate axes over `n`: with `n = 1`, axis 0 becomes axis 1,
    /// 1 becomes 2 and 2 becomes 0.
    pub fn roll_axes(&self, n: i64) -> Coords {
        let n = n.rem_euclid(DIM as i64) as usize;
        self.map_points(|xyz| {
            let mut rolled = [0.0; 3];
            for i in 0..DIM {
                rolled[(i + n) % DIM] = xyz[i];
            }
            rolled
        })
    }

    /// Add uniform random noise of at most `asize + rsize * max(sizes())` to every coordinate.
    pub fn add_noise(&self, rsize: f64, asize: f64) -> ProcResult<Coords> {
        self.add_noise_with(rsize, asize, &mut rand::thread_rng())
    }

    /// Same as `add_noise`, drawing from the given random number generator.
    pub fn add_noise_with<R: Rng>(&self, rsize: f64, asize: f64, rng: &mut R) -> ProcResult<Coords> {
        let sizes = self.sizes();
        let max = asize + rsize * sizes.x.max(sizes.y).max(sizes.z);
        if !(max >= 0.0 && max.is_finite()) {
            return arg_err(&format!("Noise amplitude must be finite and non-negative, got {}", max));
        }
        let data = self.as_slice().iter().map(|x| x + rng.gen_range(-max..=max)).collect();
        Ok(Coords::from_raw(data, self.pshape().to_vec()))
    }
}

/// Distance between `xyz` and `p` over the given axes.
/// A single axis gives the absolute difference.
fn distance_over(xyz: &[f64], p: &Point, axes: &[usize]) -> f64 {
    match axes {
        [axis] => (xyz[*axis] - p[*axis]).abs(),
        _ => axes.iter().map(|&i| (xyz[i] - p[i]).powi(2)).sum::<f64>().sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;

    fn cylinder_grid() -> Coords {
        Coords::from_points(vec![
            [1.0, 0.0, 0.0],
            [2.0, 30.0, 1.0],
            [0.5, 135.0, -2.0],
            [3.0, -60.0, 4.0],
        ])
    }

    #[test]
    fn cylindrical_round_trip() {
        let c = cylinder_grid();
        let cart = c.cylindrical(&CurvilinearAxes::default()).unwrap();
        assert_abs_diff_eq!(cart.point(0), Point::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(cart.point(1), Point::new(3f64.sqrt(), 1.0, 1.0), epsilon = 1e-12);
        let back = cart.to_cylindrical([0, 1, 2], AngleUnit::Degrees).unwrap();
        assert_abs_diff_eq!(back, c, epsilon = 1e-10);
    }

    #[test]
    fn cylindrical_radians_and_axis_order() {
        let c = Coords::from([std::f64::consts::FRAC_PI_2, 2.0, 5.0]);
        let axes = CurvilinearAxes{dir: [1, 0, 2], angle_unit: AngleUnit::Radians, ..Default::default()};
        let cart = c.cylindrical(&axes).unwrap();
        assert_abs_diff_eq!(cart.point(0), Point::new(0.0, 2.0, 5.0), epsilon = 1e-12);
        let bad = CurvilinearAxes{dir: [0, 1, 3], ..Default::default()};
        assert!(c.cylindrical(&bad).is_err());
    }

    #[test]
    fn hyper_cylindrical_scales_radius() {
        let c = Coords::from([1.0, 90.0, 1.0]);
        let cart = c.hyper_cylindrical(&CurvilinearAxes::default(), |_| 2.0, |theta| theta.sin()).unwrap();
        assert_abs_diff_eq!(cart.point(0), Point::new(0.0, 2.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn spherical_and_colatitude() {
        let c = Coords::from_points(vec![[0.0, 0.0, 2.0], [90.0, 0.0, 1.0], [0.0, 90.0, 1.0]]);
        let cart = c.spherical(&CurvilinearAxes::default(), false).unwrap();
        assert_abs_diff_eq!(cart.point(0), Point::new(2.0, 0.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(cart.point(1), Point::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(cart.point(2), Point::new(0.0, 0.0, 1.0), epsilon = 1e-12);

        let colat = c.spherical(&CurvilinearAxes::default(), true).unwrap();
        assert_abs_diff_eq!(colat.point(0), Point::new(0.0, 0.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn super_spherical_defaults_to_sphere() {
        let c = Coords::from_points(vec![[20.0, 35.0, 1.5], [-100.0, -10.0, 2.0]]);
        let axes = CurvilinearAxes::default();
        let plain = c.spherical(&axes, false).unwrap();
        let sup = c.super_spherical(&axes, false, 1.0, 1.0, 0.0).unwrap();
        assert_abs_diff_eq!(plain, sup, epsilon = 1e-12);

        // egg shape: the northern hemisphere shrinks for k > 0
        let north = Coords::from([0.0, 30.0, 1.0]);
        let egg = north.super_spherical(&axes, false, 1.0, 1.0, 0.5).unwrap();
        assert!(egg.point(0).x < north.spherical(&axes, false).unwrap().point(0).x);
    }

    #[test]
    fn to_spherical_handles_origin() {
        let c = Coords::from_points(vec![[0.0, 0.0, 0.0], [0.0, 2.0, 0.0], [1.0, 0.0, 0.0]]);
        let sph = c.to_spherical([0, 1, 2], AngleUnit::Degrees).unwrap();
        assert!(!sph.has_nan());
        assert_abs_diff_eq!(sph.point(0), Point::zero(), epsilon = 1e-12);
        assert_abs_diff_eq!(sph.point(1), Point::new(0.0, 90.0, 2.0), epsilon = 1e-12);
        assert_abs_diff_eq!(sph.point(2), Point::new(90.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn bump_displaces_near_anchor() {
        let c = Coords::from_points(vec![[0.0, 0.0, 0.0], [3.0, 4.0, 0.0]]);
        let a = Point::new(0.0, 0.0, 2.0);
        let bumped = c.bump(2, &a, |d| 1.0 / (1.0 + d), None).unwrap();
        assert_abs_diff_eq!(bumped.point(0).z, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bumped.point(1).z, 2.0 / 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.bump2(2, &a, |d| 1.0 / (1.0 + d)).unwrap(), bumped, epsilon = 1e-12);

        let one_axis = c.bump1(2, &a, |d| 1.0 / (1.0 + d), 1).unwrap();
        assert_abs_diff_eq!(one_axis.point(1).z, 2.0 / 5.0, epsilon = 1e-12);
    }

    #[test]
    fn bump_rejects_zero_at_anchor() {
        let c = Coords::from([1.0, 0.0, 0.0]);
        assert!(c.bump(2, &Point::zero(), |d| d, None).is_err());
    }

    #[test]
    fn flare_both_ends() {
        let c = Coords::from_points(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [4.0, 0.0, 0.0]]);
        let start = c.flare(2.0, 1.0, [0, 2], FlareEnd::Start, 1.0).unwrap();
        assert_eq!(start.z().as_slice(), &[1.0, 0.5, 0.0]);
        let end = c.flare(2.0, 1.0, [0, 1], FlareEnd::End, 2.0).unwrap();
        assert_eq!(end.y().as_slice(), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn map_functions() {
        let c = Coords::from_points(vec![[1.0, 1.0, 1.0]]);
        let mapped = c.map(|x, y, z| [2.0 * x, 3.0 * y, 4.0 * z]);
        assert_eq!(mapped.point(0), Point::new(2.0, 3.0, 4.0));
        let mapped = c.map1(2, |x| x + 1.0, Some(0)).unwrap();
        assert_eq!(mapped.point(0), Point::new(1.0, 1.0, 2.0));

        // a sphere of radius 10 over the xy plane
        let grid = Coords::from_points(vec![[0.0, 0.0, 0.0], [6.0, 0.0, 0.0]]);
        let dome = grid.mapd(2, |d| (100.0 - d * d).sqrt(), &Point::zero(), Some(&[0, 1])).unwrap();
        assert_eq!(dome.z().as_slice(), &[10.0, 8.0]);
    }

    #[test]
    fn replace_swap_roll() {
        let c = Coords::from([1.0, 2.0, 3.0]);
        assert_eq!(c.swap_axes(0, 2).unwrap().point(0), Point::new(3.0, 2.0, 1.0));
        assert_eq!(c.roll_axes(1).point(0), Point::new(3.0, 1.0, 2.0));
        assert_eq!(c.roll_axes(-1).point(0), Point::new(2.0, 3.0, 1.0));
        assert_eq!(c.replace(&[0, 1, 2], &[1, 2, 0], None).unwrap().point(0), Point::new(2.0, 3.0, 1.0));
        let other = Coords::from([7.0, 8.0, 9.0]);
        assert_eq!(c.replace(&[1], &[2], Some(&other)).unwrap().point(0), Point::new(1.0, 9.0, 3.0));
        assert!(c.replace(&[0, 1], &[1], None).is_err());
    }

    #[test]
    fn egg_and_noise() {
        let c = Coords::from([0.0, 1.0, -1.0]);
        assert_abs_diff_eq!(c.egg(0.5).point(0), Point::new(1.0, 1.0 / 3.0, 3.0), epsilon = 1e-12);

        let grid = Coords::from_points(vec![[0.0, 0.0, 0.0], [10.0, 2.0, 0.0]]);
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let noisy = grid.add_noise_with(0.1, 0.5, &mut rng).unwrap();
        assert_eq!(noisy.shape(), grid.shape());
        for (a, b) in noisy.as_slice().iter().zip(grid.as_slice()) {
            assert!((a - b).abs() <= 1.5);
        }
        assert!(grid.add_noise(-1.0, 0.0).is_err());
    }
}
