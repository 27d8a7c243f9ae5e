use serde::{Serialize, Deserialize};

use crate::io;
use crate::pipeline::{self, StepChoice};

/// Pipeline target struct.
/// Holds the point file to start from, the steps to apply in order, and where to save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineTarget {
    /// Input point file (format chosen by extension).
    #[serde(rename = "input", alias = "input_path", alias = "in", alias = "i")]
    pub input_path: String,

    /// Output point file (format chosen by extension).
    #[serde(default, rename = "output", alias = "output_path", alias = "out", alias = "o")]
    pub output_path: Option<String>,

    /// Transformation steps.
    #[serde(default)]
    pub steps: Vec<StepChoice>,
}
impl PipelineTarget {
    /// Construct a pipeline target from a config file (`.yaml`, `.yml`, `.json` or `.toml`).
    pub fn from_cfg_file(cfg_file: &str) -> pipeline::ProcResult<Self> {
        let target: PipelineTarget = io::read_cfg_file(cfg_file)?;

        // Check the point file types early, before any work is done
        io::PointFormat::from_path(&target.input_path)?;
        if let Some(output_path) = target.output_path.as_ref() {
            if io::PointFormat::from_path(output_path)? == io::PointFormat::Stl {
                return pipeline::err_str("Pipeline output cannot be written to STL");
            }
        }
        Ok(target)
    }

    /// An example target around a single step.
    pub fn example(step: StepChoice) -> Self {
        PipelineTarget{
            input_path: "PATH/TO/INPUT/FILE.txt".to_string(),
            output_path: Some("OPTIONAL/PATH/TO/OUTPUT/FILE.txt".to_string()),
            steps: vec![step],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn write_cfg(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn config_in_every_format() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = write_cfg(&dir, "cfg.yaml", concat!(
            "input: points.txt\n",
            "output: moved.csv\n",
            "steps:\n",
            "  - op: translate\n",
            "    dir: 1\n",
            "  - op: fuse\n",
        ));
        let json = write_cfg(&dir, "cfg.json", r#"{
            "input": "points.txt",
            "output": "moved.csv",
            "steps": [{"op": "translate", "dir": 1}, {"op": "fuse"}]
        }"#);
        let toml = write_cfg(&dir, "cfg.toml", concat!(
            "input = \"points.txt\"\n",
            "output = \"moved.csv\"\n",
            "[[steps]]\n",
            "op = \"translate\"\n",
            "dir = 1\n",
            "[[steps]]\n",
            "op = \"fuse\"\n",
        ));

        let target = PipelineTarget::from_cfg_file(&yaml).unwrap();
        assert_eq!(target.steps.len(), 2);
        assert_eq!(target.steps[1].op_name(), "fuse");
        assert_eq!(PipelineTarget::from_cfg_file(&json).unwrap(), target);
        assert_eq!(PipelineTarget::from_cfg_file(&toml).unwrap(), target);
    }

    #[test]
    fn bad_point_file_types() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = write_cfg(&dir, "cfg.yaml", "input: points.vtk\n");
        assert!(PipelineTarget::from_cfg_file(&cfg).is_err());
        let cfg = write_cfg(&dir, "cfg.yaml", "input: points.txt\noutput: out.stl\n");
        assert!(matches!(PipelineTarget::from_cfg_file(&cfg), Err(pipeline::PipelineError::StringOnly(_))));
    }

    #[test]
    fn examples_serialize() {
        for step in StepChoice::iter() {
            let target = PipelineTarget::example(step);
            for format in [io::CfgFormat::Yaml, io::CfgFormat::Json, io::CfgFormat::Toml] {
                assert!(io::to_cfg_string(&target, format).is_ok(), "{} as {}", target.steps[0].op_name(), format);
            }
        }
    }
}
