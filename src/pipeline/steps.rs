/*!
 * This is the pipeline steps module.
 * Adding new steps should be done here.
 *
 * New steps need:
 * - A struct implementing `TransformStep` (and `Default`, for the example configs)
 * - An enum variant containing that struct in `StepChoice`
 *
 */

mod affine;
mod mapping;
mod project;
mod shape;

use enum_dispatch::enum_dispatch;
use serde::{Serialize, Deserialize};

use crate::coords::{Coords, FuseOptions};
use crate::pipeline;

/// Transformation step trait.
/// This trait defines the functions that all pipeline steps must implement.
/// To add a new step:
/// implement this trait for it,
/// and include it in the `StepChoice` enum.
#[enum_dispatch] // enum dispatch allows us to use the enum as a kind of trait object
pub trait TransformStep {
    /// Get the display name of the step.
    fn get_step_name(&self) -> &'static str;

    /// Apply the step to a point set, returning the transformed set.
    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords>;
}

/// Pipeline steps enum.
/// The `op` field of a step in the config file selects the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[derive(strum::EnumIter, strum::IntoStaticStr)]
#[serde(tag = "op", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[enum_dispatch(TransformStep)]
pub enum StepChoice {
    Translate(affine::Translate),
    Rotate(affine::Rotate),
    Scale(affine::Scale),
    Shear(affine::Shear),
    Reflect(affine::Reflect),
    Affine(affine::Affine),
    Align(affine::Align),
    Center(affine::Center),
    Cylindrical(mapping::Cylindrical),
    ToCylindrical(mapping::ToCylindrical),
    Spherical(mapping::Spherical),
    SuperSpherical(mapping::SuperSpherical),
    ToSpherical(mapping::ToSpherical),
    Flare(mapping::Flare),
    Replace(mapping::Replace),
    RollAxes(mapping::RollAxes),
    ProjectOnPlane(project::ProjectOnPlane),
    ProjectOnSphere(project::ProjectOnSphere),
    ProjectOnCylinder(project::ProjectOnCylinder),
    ProjectOnSurface(project::ProjectOnSurface),
    Replicate(shape::Replicate),
    AddNoise(shape::AddNoise),
    Fuse(FuseOptions),
}

impl StepChoice {
    /// The name selecting this step in a config file.
    pub fn op_name(&self) -> &'static str {
        self.into()
    }
}

/// Fusing as a step: the point set is replaced by its unique points.
impl TransformStep for FuseOptions {
    fn get_step_name(&self) -> &'static str {
        "Fuse"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.fuse(self)?.coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn op_names_match_serde_tags() {
        for step in StepChoice::iter() {
            let value = serde_json::to_value(&step).unwrap();
            assert_eq!(value["op"], step.op_name(), "tag of {}", step.get_step_name());
        }
    }

    #[test]
    fn default_steps_survive_all_formats() {
        for step in StepChoice::iter() {
            let yaml = serde_yaml::to_string(&step).unwrap();
            assert_eq!(serde_yaml::from_str::<StepChoice>(&yaml).unwrap(), step, "yaml for {}", step.op_name());
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(serde_json::from_str::<StepChoice>(&json).unwrap(), step, "json for {}", step.op_name());
        }
    }

    #[test]
    fn unknown_step_is_rejected() {
        assert!(serde_yaml::from_str::<StepChoice>("op: explode\n").is_err());
        assert!(serde_yaml::from_str::<StepChoice>("op: translate\nwrong: 1\n").is_err());
        assert!(serde_yaml::from_str::<StepChoice>("op: fuse\nrepeet: false\n").is_err());
    }

    #[test]
    fn fuse_step() {
        let c = Coords::from_points(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
        let step: StepChoice = serde_yaml::from_str("op: fuse\nrepeat: false\n").unwrap();
        assert_eq!(step.apply(&c).unwrap().npoints(), 2);
    }
}
