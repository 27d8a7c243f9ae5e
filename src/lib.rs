pub mod coords;
pub mod geo_3d;
pub mod pipeline;
pub mod args;
pub mod io;
pub mod example;
mod crate_errors;

pub use crate_errors::{
    Coords3dError,
    Coords3dResult,
    err_str,
};
pub use coords::Coords;

use itertools::Itertools;

/// Dispatch the parsed command line to the matching process.
/// Returns a `Coords3dResult` with `()` or an `Err`.
pub fn handle_cli(cli: args::Coords3dCli) -> Coords3dResult<()> {
    match cli.command {
        args::Command::Run(run_args) => run_pipeline(&run_args.cfg),
        args::Command::Info(info_args) => show_info(&info_args.input_path),
        args::Command::Fuse(fuse_args) => fuse_file(&fuse_args),
        args::Command::Example(example_args) => example::display_config(example_args),
    }
}

/// Load a pipeline config, run its steps on the input points and save the result.
pub fn run_pipeline(cfg_file: &str) -> Coords3dResult<()> {
    println!("Loading pipeline config file: {}...", cfg_file);
    let target = pipeline::PipelineTarget::from_cfg_file(cfg_file)?;

    println!("Loading points from {}...", target.input_path);
    let coords = io::read_points(&target.input_path)?;
    println!("Loaded {} points", coords.npoints());

    println!();
    println!("###################");
    println!("Running pipeline...");
    println!("###################");
    println!();
    let coords = pipeline::do_pipeline(&target, coords)?;

    match target.output_path.as_ref() {
        Some(output_path) => {
            println!("Saving {} points to {}...", coords.npoints(), output_path);
            io::write_points(output_path, &coords)?;
        },
        None => println!("No output path given, result not saved"),
    }
    Ok(())
}

/// Print the bounding box and sizes of a point file.
pub fn show_info(input_path: &str) -> Coords3dResult<()> {
    let coords = io::read_points(input_path)?;
    let bb = coords.bbox();
    println!("File: {}", input_path);
    println!("Points: {}", coords.npoints());
    println!("Shape: {}", coords.shape().iter().join(" x "));
    println!("Bounding box: {} - {}", bb.point(0), bb.point(1));
    println!("Center: {}", coords.center());
    println!("Centroid: {}", coords.centroid());
    println!("Sizes: {}", coords.sizes());
    println!("Diagonal size: {:.3}", coords.dsize());
    println!("Bounding sphere radius: {:.3}", coords.bsphere());
    Ok(())
}

/// Fuse the points of a file and save the unique points.
pub fn fuse_file(fuse_args: &args::FuseArgs) -> Coords3dResult<()> {
    let opts = fuse_args.to_options()?;
    println!("Loading points from {}...", fuse_args.input_path);
    let coords = io::read_points(&fuse_args.input_path)?;

    println!("Fusing {} points...", coords.npoints());
    let fused = coords.fuse(&opts)?;
    println!("Fused {} points into {} unique points", coords.npoints(), fused.coords.npoints());

    println!("Saving points to {}...", fuse_args.output_path);
    io::write_points(&fuse_args.output_path, &fused.coords)?;
    Ok(())
}

/// Top-level tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_from_file_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.txt");
        let cfg = dir.path().join("cfg.yaml");
        std::fs::write(&input, "0,0,0\n1,0,0\n1,0,0\n").unwrap();
        std::fs::write(&cfg, format!(
            "input: {}\noutput: {}\nsteps:\n  - op: fuse\n  - op: translate\n    dir: 2\n",
            input.display(), output.display(),
        )).unwrap();

        run_pipeline(cfg.to_str().unwrap()).unwrap();
        let out = io::read_points(output.to_str().unwrap()).unwrap();
        assert_eq!(out, Coords::from_points(vec![[0.0, 0.0, 1.0], [1.0, 0.0, 1.0]]));
    }

    #[test]
    fn missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("cfg.json");
        std::fs::write(&cfg, r#"{"input": "does/not/exist.txt"}"#).unwrap();
        assert!(matches!(run_pipeline(cfg.to_str().unwrap()), Err(Coords3dError::CoordsError(_))));
        assert!(show_info("does/not/exist.txt").is_err());
    }
}
