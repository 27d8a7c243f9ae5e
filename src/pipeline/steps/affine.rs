use log::debug;
use serde::{Serialize, Deserialize};

use crate::coords::{Coords, Direction, ScaleFactor, Rotation, matrix_from_rows};
use crate::geo_3d::{Point, GeoVector};
use crate::pipeline::{self, steps};

/// Translate over `step` times a direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Translate {
    #[serde(default = "Translate::default_dir", alias = "vector")]
    dir: Direction,
    #[serde(default)]
    step: Option<f64>,
}
impl Translate {
    pub fn default_dir() -> Direction {
        Direction::Axis(0)
    }
}
impl Default for Translate {
    fn default() -> Self {
        Translate{
            dir: Translate::default_dir(),
            step: Some(1.0),
        }
    }
}
impl steps::TransformStep for Translate {
    fn get_step_name(&self) -> &'static str {
        "Translate"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.translate(self.dir, self.step)?)
    }
}

/// Rotate over an angle (degrees) around an axis, or by an explicit matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rotate {
    #[serde(default)]
    angle: Option<f64>,
    #[serde(default)]
    matrix: Option<Vec<Vec<f64>>>,
    #[serde(default = "Rotate::default_axis")]
    axis: Direction,
    #[serde(default)]
    around: Option<Point>,
}
impl Rotate {
    pub fn default_axis() -> Direction {
        Direction::Axis(2)
    }
}
impl Default for Rotate {
    fn default() -> Self {
        Rotate{
            angle: Some(90.0),
            matrix: None,
            axis: Rotate::default_axis(),
            around: None,
        }
    }
}
impl steps::TransformStep for Rotate {
    fn get_step_name(&self) -> &'static str {
        "Rotate"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        let rotation = match (self.angle, &self.matrix) {
            (Some(angle), None) => Rotation::Angle(angle),
            (None, Some(rows)) => Rotation::from_rows(rows)?,
            (Some(_), Some(_)) => return pipeline::err_str("Rotate step takes either an angle or a matrix, not both"),
            (None, None) => return pipeline::err_str("Rotate step needs an angle or a matrix"),
        };
        debug!("Rotation: {:?}", rotation);
        Ok(coords.rotate(rotation, self.axis, self.around)?)
    }
}

/// Scale by a single factor or one factor per axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scale {
    factor: ScaleFactor,
    #[serde(default)]
    axis: Option<usize>,
}
impl Default for Scale {
    fn default() -> Self {
        Scale{
            factor: ScaleFactor::Uniform(2.0),
            axis: None,
        }
    }
}
impl steps::TransformStep for Scale {
    fn get_step_name(&self) -> &'static str {
        "Scale"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.scale(self.factor, self.axis)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Shear {
    dir: usize,
    dir1: usize,
    skew: f64,
}
impl Default for Shear {
    fn default() -> Self {
        Shear{dir: 0, dir1: 1, skew: 0.5}
    }
}
impl steps::TransformStep for Shear {
    fn get_step_name(&self) -> &'static str {
        "Shear"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.shear(self.dir, self.dir1, self.skew)?)
    }
}

/// Mirror in the plane `x[dir] = pos`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Reflect {
    #[serde(default)]
    dir: usize,
    #[serde(default)]
    pos: f64,
}
impl steps::TransformStep for Reflect {
    fn get_step_name(&self) -> &'static str {
        "Reflect"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.reflect(self.dir, self.pos)?)
    }
}

/// General affine transformation `x·M + v`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Affine {
    matrix: Vec<Vec<f64>>,
    #[serde(default)]
    translation: Option<GeoVector>,
}
impl Default for Affine {
    fn default() -> Self {
        Affine{
            matrix: vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]],
            translation: Some(GeoVector::zero()),
        }
    }
}
impl steps::TransformStep for Affine {
    fn get_step_name(&self) -> &'static str {
        "Affine"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        let mat = matrix_from_rows(&self.matrix)?;
        Ok(coords.affine(&mat, self.translation))
    }
}

/// Align the bounding box on the origin, see `Coords::align`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Align {
    #[serde(default = "Align::default_code")]
    code: String,
}
impl Align {
    pub fn default_code() -> String {
        "---".to_string()
    }
}
impl Default for Align {
    fn default() -> Self {
        Align{code: Align::default_code()}
    }
}
impl steps::TransformStep for Align {
    fn get_step_name(&self) -> &'static str {
        "Align"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.align(&self.code))
    }
}

/// Move the bounding box center to the origin.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Center {}
impl steps::TransformStep for Center {
    fn get_step_name(&self) -> &'static str {
        "Center"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.centered())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::pipeline::{StepChoice, TransformStep, PipelineError};
    use crate::coords::CoordsError;

    fn unit_x() -> Coords {
        Coords::from_points(vec![[1.0, 0.0, 0.0]])
    }

    #[test]
    fn rotate_by_angle_or_matrix() {
        let step: StepChoice = serde_yaml::from_str("op: rotate\nangle: 90\n").unwrap();
        assert_abs_diff_eq!(step.apply(&unit_x()).unwrap().point(0), Point::new(0.0, 1.0, 0.0), epsilon = 1e-12);

        let step: StepChoice = serde_yaml::from_str("op: rotate\nmatrix: [[0, 1, 0], [-1, 0, 0], [0, 0, 1]]\n").unwrap();
        assert_abs_diff_eq!(step.apply(&unit_x()).unwrap().point(0), Point::new(0.0, 1.0, 0.0), epsilon = 1e-12);

        let step: StepChoice = serde_yaml::from_str("op: rotate\nmatrix: [[0, 1], [-1, 0]]\n").unwrap();
        assert!(matches!(step.apply(&unit_x()), Err(PipelineError::CoordsError(CoordsError::Argument(_)))));

        let step: StepChoice = serde_yaml::from_str("op: rotate\n").unwrap();
        assert!(matches!(step.apply(&unit_x()), Err(PipelineError::StringOnly(_))));
    }

    #[test]
    fn affine_matrix_must_be_square() {
        let step: StepChoice = serde_json::from_str(r#"{"op": "affine", "matrix": [[1, 0, 0], [0, 1, 0]]}"#).unwrap();
        assert!(matches!(step.apply(&unit_x()), Err(PipelineError::CoordsError(CoordsError::Shape(_)))));

        let step: StepChoice = serde_json::from_str(
            r#"{"op": "affine", "matrix": [[2, 0, 0], [0, 1, 0], [0, 0, 1]], "translation": {"x": 0, "y": 1, "z": 0}}"#
        ).unwrap();
        assert_eq!(step.apply(&unit_x()).unwrap().point(0), Point::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn translate_scale_and_center() {
        let c = Coords::from_points(vec![[0.0, 0.0, 0.0], [2.0, 4.0, 0.0]]);
        let step: StepChoice = serde_yaml::from_str("op: translate\ndir: 1\nstep: 3\n").unwrap();
        assert_eq!(step.apply(&c).unwrap().point(1), Point::new(2.0, 7.0, 0.0));

        let step: StepChoice = serde_yaml::from_str("op: scale\nfactor: [1, 0.5, 1]\n").unwrap();
        assert_eq!(step.apply(&c).unwrap().point(1), Point::new(2.0, 2.0, 0.0));

        let step: StepChoice = serde_yaml::from_str("op: center\n").unwrap();
        assert_eq!(step.apply(&c).unwrap().point(0), Point::new(-1.0, -2.0, 0.0));
    }
}
