mod proc_errors;

use clap::{
    Args,
    Parser,
    Subcommand,
};

use crate::coords::FuseOptions;
use crate::io::CfgFormat;

// Re-export errors
pub use proc_errors::{
    ArgError,
    ProcResult,
    err_str,
};

/// Structured 3D point coordinate transformation tool.
#[derive(Debug, Parser)]
#[command(name = "coords3d")]
pub struct Coords3dCli {
    #[clap(subcommand)]
    pub command: Command,
}

/// Parser for the subcommands of the coords3d binary using clap.
#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(name = "run")]
    /// Run a transformation pipeline from a config file.
    Run(RunArgs),

    #[command(name = "info")]
    /// Print the bounding box and sizes of a point file.
    Info(InfoArgs),

    #[command(name = "fuse")]
    /// Merge coinciding points of a point file.
    Fuse(FuseArgs),

    #[command(name = "example")]
    /// Print an example pipeline config for a step, or list the steps.
    Example(ExampleArgs),
}

/// Arguments for the run command. Compiled with clap.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Path to the pipeline config file (.yaml, .yml, .json or .toml).
    pub cfg: String,
}

/// Arguments for the info command. Compiled with clap.
#[derive(Debug, Args)]
pub struct InfoArgs {
    #[arg(short, long = "input")]
    /// Path to the point file (.txt, .xyz, .csv, .bin, .json or .stl).
    pub input_path: String,
}

/// Arguments for the fuse command. Compiled with clap.
#[derive(Debug, Args)]
pub struct FuseArgs {
    #[arg(short, long = "input")]
    /// Path to the input point file.
    pub input_path: String,

    #[arg(short, long = "output")]
    /// Path to the output point file.
    pub output_path: String,

    #[arg(long, default_value_t = 1e-5)]
    /// Relative tolerance, with respect to the largest size of the point set.
    pub rtol: f64,

    #[arg(long, default_value_t = 1e-5)]
    /// Absolute tolerance.
    pub atol: f64,

    #[arg(long, default_value_t = 1)]
    /// Average number of points per box of the spatial grid.
    pub points_per_box: usize,

    #[arg(long)]
    /// Skip the second pass on a shifted grid.
    pub single_pass: bool,
}
impl FuseArgs {
    /// Fuse options from the command line values.
    pub fn to_options(&self) -> ProcResult<FuseOptions> {
        let opts = FuseOptions{
            points_per_box: self.points_per_box,
            rtol: self.rtol,
            atol: self.atol,
            repeat: !self.single_pass,
            ..Default::default()
        };
        opts.check()?;
        Ok(opts)
    }
}

/// Arguments for the example command. Compiled with clap.
#[derive(Debug, Args)]
pub struct ExampleArgs {
    /// Step to show an example config for. Lists the available steps if omitted.
    pub step: Option<String>,

    #[arg(short, long, value_enum, default_value_t = CfgFormat::Yaml)]
    /// Config file format.
    pub format: CfgFormat,
}

/// Parse the command line arguments for the coords3d binary.
/// Uses the `clap` crate.
pub fn parse_cli_args() -> Coords3dCli {
    Coords3dCli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuse_args_to_options() {
        let cli = Coords3dCli::try_parse_from(["coords3d", "fuse", "-i", "a.txt", "-o", "b.txt", "--single-pass", "--rtol", "0.01"]).unwrap();
        let Command::Fuse(fuse_args) = cli.command else {
            panic!("expected the fuse command");
        };
        let opts = fuse_args.to_options().unwrap();
        assert!(!opts.repeat);
        assert_eq!(opts.rtol, 0.01);
        assert_eq!(opts.atol, 1e-5);
        assert_eq!(opts.points_per_box, 1);
    }

    #[test]
    fn bad_fuse_args() {
        let cli = Coords3dCli::try_parse_from(["coords3d", "fuse", "-i", "a.txt", "-o", "b.txt", "--points-per-box", "0"]).unwrap();
        let Command::Fuse(fuse_args) = cli.command else {
            panic!("expected the fuse command");
        };
        assert!(matches!(fuse_args.to_options(), Err(ArgError::CoordsError(_))));
    }

    #[test]
    fn example_format() {
        let cli = Coords3dCli::try_parse_from(["coords3d", "example", "rotate", "--format", "toml"]).unwrap();
        let Command::Example(example_args) = cli.command else {
            panic!("expected the example command");
        };
        assert_eq!(example_args.step.as_deref(), Some("rotate"));
        assert_eq!(example_args.format, CfgFormat::Toml);
    }

    #[test]
    fn cli_is_consistent() {
        use clap::CommandFactory;
        Coords3dCli::command().debug_assert();
    }
}
