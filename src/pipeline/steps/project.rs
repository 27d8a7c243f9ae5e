use log::debug;
use serde::{Serialize, Deserialize};

use crate::coords::{Coords, Direction};
use crate::geo_3d::Point;
use crate::io;
use crate::pipeline::{self, steps};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectOnPlane {
    #[serde(default = "ProjectOnPlane::default_normal")]
    normal: Direction,
    #[serde(default)]
    point: Point,
}
impl ProjectOnPlane {
    pub fn default_normal() -> Direction {
        Direction::Axis(2)
    }
}
impl Default for ProjectOnPlane {
    fn default() -> Self {
        ProjectOnPlane{normal: ProjectOnPlane::default_normal(), point: Point::zero()}
    }
}
impl steps::TransformStep for ProjectOnPlane {
    fn get_step_name(&self) -> &'static str {
        "Project On Plane"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.project_on_plane(self.normal, &self.point)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectOnSphere {
    #[serde(default = "default_radius")]
    radius: f64,
    #[serde(default)]
    center: Point,
}
impl Default for ProjectOnSphere {
    fn default() -> Self {
        ProjectOnSphere{radius: default_radius(), center: Point::zero()}
    }
}
impl steps::TransformStep for ProjectOnSphere {
    fn get_step_name(&self) -> &'static str {
        "Project On Sphere"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.project_on_sphere(self.radius, &self.center))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectOnCylinder {
    #[serde(default = "default_radius")]
    radius: f64,
    /// Global axis parallel to the cylinder axis.
    #[serde(default)]
    dir: usize,
    #[serde(default)]
    center: Point,
}
impl Default for ProjectOnCylinder {
    fn default() -> Self {
        ProjectOnCylinder{radius: default_radius(), dir: 0, center: Point::zero()}
    }
}
impl steps::TransformStep for ProjectOnCylinder {
    fn get_step_name(&self) -> &'static str {
        "Project On Cylinder"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.project_on_cylinder(self.radius, self.dir, &self.center)?)
    }
}

/// Project along a direction on a triangulated surface read from STL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectOnSurface {
    #[serde(alias = "stl")]
    surface: String,
    #[serde(default = "ProjectOnSurface::default_dir")]
    dir: Direction,
    /// Turn points that miss the surface into NaN instead of failing.
    #[serde(default)]
    ignore_errors: bool,
}
impl ProjectOnSurface {
    pub fn default_dir() -> Direction {
        Direction::Axis(2)
    }
}
impl Default for ProjectOnSurface {
    fn default() -> Self {
        ProjectOnSurface{
            surface: "PATH/TO/SURFACE.stl".to_string(),
            dir: ProjectOnSurface::default_dir(),
            ignore_errors: false,
        }
    }
}
impl steps::TransformStep for ProjectOnSurface {
    fn get_step_name(&self) -> &'static str {
        "Project On Surface"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        let surface = io::stl::load_stl(&self.surface)?;
        debug!("Loaded surface {} with {} faces", self.surface, surface.faces.len());
        Ok(coords.project_on_surface(&surface, self.dir, self.ignore_errors)?)
    }
}

fn default_radius() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use crate::coords::Coords;
    use crate::geo_3d::{Point, Surface};
    use crate::io;
    use crate::pipeline::{StepChoice, TransformStep, PipelineError};

    #[test]
    fn sphere_and_plane() {
        let c = Coords::from_points(vec![[3.0, 4.0, 0.0]]);
        let step: StepChoice = serde_yaml::from_str("op: project_on_sphere\nradius: 10\n").unwrap();
        assert_abs_diff_eq!(step.apply(&c).unwrap().point(0), Point::new(6.0, 8.0, 0.0), epsilon = 1e-12);

        let step: StepChoice = serde_yaml::from_str("op: project_on_plane\nnormal: 0\npoint: {x: 1, y: 0, z: 0}\n").unwrap();
        assert_eq!(step.apply(&c).unwrap().point(0), Point::new(1.0, 4.0, 0.0));
    }

    #[test]
    fn surface_from_stl() {
        let points = vec![
            Point::new(-2.0, -2.0, 1.0),
            Point::new(2.0, -2.0, 1.0),
            Point::new(2.0, 2.0, 1.0),
            Point::new(-2.0, 2.0, 1.0),
        ];
        let surface = Surface::from_triangles(points, &[[0, 1, 2], [0, 2, 3]]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plate.stl");
        let path = path.to_str().unwrap();
        io::stl::save_stl(&surface, path).unwrap();

        let c = Coords::from_points(vec![[0.5, 0.25, -4.0]]);
        let yaml = format!("op: project_on_surface\nsurface: {}\n", path);
        let step: StepChoice = serde_yaml::from_str(&yaml).unwrap();
        assert_abs_diff_eq!(step.apply(&c).unwrap().point(0), Point::new(0.5, 0.25, 1.0), epsilon = 1e-6);

        let missing: StepChoice = serde_yaml::from_str("op: project_on_surface\nsurface: does/not/exist.stl\n").unwrap();
        assert!(matches!(missing.apply(&c), Err(PipelineError::IoError(_))));
    }
}
