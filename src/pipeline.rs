/*!
 * Config driven transformation pipeline.
 *
 * A pipeline reads a point file, applies a list of steps in order and
 * optionally writes the result. Steps are the `Coords` operations that
 * make sense without code: affine transforms, curvilinear mappings,
 * projections, replication, noise and fusing.
 */

mod proc_errors;
mod cfg;
mod steps;

use log::debug;

use crate::coords::Coords;

// Re-export errors
pub use proc_errors::{
    PipelineError,
    ProcResult,
    err_str,
};
// Re-export cfg handling
pub use cfg::PipelineTarget;
// Re-export steps
pub use steps::{
    StepChoice,
    TransformStep,
};

/// Apply all the steps of a target to a point set.
pub fn do_pipeline(target: &PipelineTarget, coords: Coords) -> ProcResult<Coords> {
    let nsteps = target.steps.len();
    let mut coords = coords;
    for (step_n, step) in target.steps.iter().enumerate() {
        println!("Step {}/{}: {}...", step_n + 1, nsteps, step.get_step_name());
        debug!("{:?}", step);
        coords = step.apply(&coords)?;
        debug!("Result shape: {:?}", coords.shape());
        if coords.has_nan() {
            debug!("Result holds NaN coordinates");
        }
    }
    Ok(coords)
}
