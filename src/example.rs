use crate::{
    args,
    io,
    pipeline,
    Coords3dResult,
};
use strum::IntoEnumIterator;

/// Names of all the pipeline steps.
pub fn step_names() -> Vec<&'static str> {
    pipeline::StepChoice::iter().map(|step| step.op_name()).collect()
}

/// Build an example pipeline config for one step, in the requested format.
/// Returns an `ArgError` listing the available steps for unknown names.
pub fn example_config(step_name: &str, format: io::CfgFormat) -> Coords3dResult<String> {
    let Some(step) = pipeline::StepChoice::iter().find(|step| step.op_name() == step_name) else {
        let available = step_names().join("\n    ");
        let error_str = format!("Step \"{}\" not found. Available steps:\n    {}", step_name, available);
        return Err(args::ArgError::StringOnly(error_str).into());
    };
    Ok(io::to_cfg_string(&pipeline::PipelineTarget::example(step), format)?)
}

/// Display an example config file for a step, or the list of steps.
pub fn display_config(example_args: args::ExampleArgs) -> Coords3dResult<()> {
    match example_args.step {
        Some(step_name) => println!("{}", example_config(&step_name, example_args.format)?),
        None => {
            println!("Available steps:");
            for name in step_names() {
                println!("    {}", name);
            }
        },
    }
    Ok(())
}
