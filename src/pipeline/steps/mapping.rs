use serde::{Serialize, Deserialize};

use crate::coords::{Coords, AngleUnit, CurvilinearAxes, FlareEnd};
use crate::pipeline::{self, steps};

/// Read the coordinates as (radius, angle, height) and map them to cartesian.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Cylindrical {
    #[serde(default)]
    axes: CurvilinearAxes,
}
impl steps::TransformStep for Cylindrical {
    fn get_step_name(&self) -> &'static str {
        "Cylindrical"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.cylindrical(&self.axes)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToCylindrical {
    #[serde(default = "default_dir")]
    dir: [usize; 3],
    #[serde(default)]
    angle_unit: AngleUnit,
}
impl Default for ToCylindrical {
    fn default() -> Self {
        ToCylindrical{dir: default_dir(), angle_unit: AngleUnit::default()}
    }
}
impl steps::TransformStep for ToCylindrical {
    fn get_step_name(&self) -> &'static str {
        "To Cylindrical"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.to_cylindrical(self.dir, self.angle_unit)?)
    }
}

/// Read the coordinates as (longitude, latitude, radius) and map them to cartesian.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Spherical {
    #[serde(default)]
    axes: CurvilinearAxes,
    /// Read the second angle as colatitude.
    #[serde(default)]
    colat: bool,
}
impl steps::TransformStep for Spherical {
    fn get_step_name(&self) -> &'static str {
        "Spherical"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.spherical(&self.axes, self.colat)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuperSpherical {
    #[serde(default)]
    axes: CurvilinearAxes,
    #[serde(default)]
    colat: bool,
    #[serde(default = "SuperSpherical::default_exponent")]
    n: f64,
    #[serde(default = "SuperSpherical::default_exponent")]
    e: f64,
    #[serde(default)]
    k: f64,
}
impl SuperSpherical {
    pub fn default_exponent() -> f64 {
        1.0
    }
}
impl Default for SuperSpherical {
    fn default() -> Self {
        SuperSpherical{
            axes: CurvilinearAxes::default(),
            colat: false,
            n: SuperSpherical::default_exponent(),
            e: SuperSpherical::default_exponent(),
            k: 0.0,
        }
    }
}
impl steps::TransformStep for SuperSpherical {
    fn get_step_name(&self) -> &'static str {
        "Super Spherical"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.super_spherical(&self.axes, self.colat, self.n, self.e, self.k)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToSpherical {
    #[serde(default = "default_dir")]
    dir: [usize; 3],
    #[serde(default)]
    angle_unit: AngleUnit,
}
impl Default for ToSpherical {
    fn default() -> Self {
        ToSpherical{dir: default_dir(), angle_unit: AngleUnit::default()}
    }
}
impl steps::TransformStep for ToSpherical {
    fn get_step_name(&self) -> &'static str {
        "To Spherical"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.to_spherical(self.dir, self.angle_unit)?)
    }
}

/// Flare one end of the structure, see `Coords::flare`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Flare {
    xf: f64,
    f: f64,
    #[serde(default = "Flare::default_dir")]
    dir: [usize; 2],
    #[serde(default)]
    end: FlareEnd,
    #[serde(default = "Flare::default_exp")]
    exp: f64,
}
impl Flare {
    pub fn default_dir() -> [usize; 2] {
        [0, 2]
    }
    pub fn default_exp() -> f64 {
        1.0
    }
}
impl Default for Flare {
    fn default() -> Self {
        Flare{
            xf: 1.0,
            f: 0.5,
            dir: Flare::default_dir(),
            end: FlareEnd::default(),
            exp: Flare::default_exp(),
        }
    }
}
impl steps::TransformStep for Flare {
    fn get_step_name(&self) -> &'static str {
        "Flare"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.flare(self.xf, self.f, self.dir, self.end, self.exp)?)
    }
}

/// Copy coordinate axes: `x[to[i]] = x[from[i]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Replace {
    to: Vec<usize>,
    from: Vec<usize>,
}
impl Default for Replace {
    fn default() -> Self {
        Replace{to: vec![0, 1], from: vec![1, 0]}
    }
}
impl steps::TransformStep for Replace {
    fn get_step_name(&self) -> &'static str {
        "Replace"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.replace(&self.to, &self.from, None)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RollAxes {
    #[serde(default = "RollAxes::default_n")]
    n: i64,
}
impl RollAxes {
    pub fn default_n() -> i64 {
        1
    }
}
impl Default for RollAxes {
    fn default() -> Self {
        RollAxes{n: RollAxes::default_n()}
    }
}
impl steps::TransformStep for RollAxes {
    fn get_step_name(&self) -> &'static str {
        "Roll Axes"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.roll_axes(self.n))
    }
}

fn default_dir() -> [usize; 3] {
    [0, 1, 2]
}
