use rand::SeedableRng;
use serde::{Serialize, Deserialize};

use crate::coords::{Coords, Direction};
use crate::pipeline::{self, steps};

/// Stack `n` translated copies along a new leading axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Replicate {
    n: usize,
    #[serde(default = "Replicate::default_dir")]
    dir: Direction,
    #[serde(default)]
    step: Option<f64>,
}
impl Replicate {
    pub fn default_dir() -> Direction {
        Direction::Axis(0)
    }
}
impl Default for Replicate {
    fn default() -> Self {
        Replicate{n: 2, dir: Replicate::default_dir(), step: Some(1.0)}
    }
}
impl steps::TransformStep for Replicate {
    fn get_step_name(&self) -> &'static str {
        "Replicate"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        Ok(coords.replicate(self.n, self.dir, self.step)?)
    }
}

/// Random noise on every coordinate. A `seed` makes it reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddNoise {
    #[serde(default = "AddNoise::default_rsize")]
    rsize: f64,
    #[serde(default)]
    asize: f64,
    #[serde(default)]
    seed: Option<u64>,
}
impl AddNoise {
    pub fn default_rsize() -> f64 {
        0.1
    }
}
impl Default for AddNoise {
    fn default() -> Self {
        AddNoise{rsize: AddNoise::default_rsize(), asize: 0.0, seed: None}
    }
}
impl steps::TransformStep for AddNoise {
    fn get_step_name(&self) -> &'static str {
        "Add Noise"
    }

    fn apply(&self, coords: &Coords) -> pipeline::ProcResult<Coords> {
        match self.seed {
            Some(seed) => {
                let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
                Ok(coords.add_noise_with(self.rsize, self.asize, &mut rng)?)
            },
            None => Ok(coords.add_noise(self.rsize, self.asize)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::coords::Coords;
    use crate::geo_3d::Point;
    use crate::pipeline::{StepChoice, TransformStep};

    #[test]
    fn replicate_step() {
        let c = Coords::from_points(vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let step: StepChoice = serde_yaml::from_str("op: replicate\nn: 3\ndir: 2\nstep: 0.5\n").unwrap();
        let r = step.apply(&c).unwrap();
        assert_eq!(r.shape(), vec![3, 2, 3]);
        assert_eq!(r.point(5), Point::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn seeded_noise_is_reproducible() {
        let c = Coords::from_points(vec![[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]]);
        let step: StepChoice = serde_yaml::from_str("op: add_noise\nrsize: 0.01\nseed: 7\n").unwrap();
        let a = step.apply(&c).unwrap();
        assert_eq!(a, step.apply(&c).unwrap());
        for (x, y) in a.as_slice().iter().zip(c.as_slice()) {
            assert!((x - y).abs() <= 0.1);
        }

        let step: StepChoice = serde_yaml::from_str("op: add_noise\nasize: -5\n").unwrap();
        assert!(step.apply(&c).is_err());
    }
}
