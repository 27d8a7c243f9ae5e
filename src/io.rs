use std::io::Write;
pub mod stl;

use crate::coords::{self, Coords, FloatWidth};

#[derive(Debug)]
pub enum IoErrorType {
    File(std::io::Error),
    SerdeJson(serde_json::Error),
    SerdeYaml(serde_yaml::Error),
    TomlSer(toml::ser::Error),
    TomlDe(toml::de::Error),
    StringOnly(String),
}
impl std::fmt::Display for IoErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoErrorType::File(error) => write!(f, "- File IO Error:\n{}", error),
            IoErrorType::SerdeJson(error) => write!(f, "- JSON Serialization/Deserialization Error:\n{}", error),
            IoErrorType::SerdeYaml(error) => write!(f, "- YAML Serialization/Deserialization Error:\n{}", error),
            IoErrorType::TomlSer(error) => write!(f, "- TOML Serialization Error:\n{}", error),
            IoErrorType::TomlDe(error) => write!(f, "- TOML Deserialization Error:\n{}", error),
            IoErrorType::StringOnly(error) => write!(f, "- {}", error),
        }
    }
}

/// Custom verbose IO error struct.
#[derive(Debug)]
pub struct IoError {
    /// Filepath facing an error.
    pub file: Option<String>,
    /// Error cause.
    pub cause: IoErrorType,
}
impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.file {
            Some(ref file) => write!(f, "- Error with file: {}\n- {}", file, self.cause),
            None => write!(f, "- {}", self.cause),
        }
    }
}
impl std::error::Error for IoError {}

pub type IoResult<T> = std::result::Result<T, IoError>;

/// Create an `IoError` for a file from a string.
fn file_err<T>(path: &str, error_str: &str) -> IoResult<T> {
    Err(IoError{file: Some(path.to_string()), cause: IoErrorType::StringOnly(error_str.to_string())})
}

/// Open a file with verbose errors.
pub fn open(path: &str) -> IoResult<std::fs::File> {
    std::fs::File::open(path)
        .map_err(|error| IoError{file: Some(path.to_string()), cause: IoErrorType::File(error)})
}

/// Create a file with verbose errors.
pub fn create(path: &str) -> IoResult<std::fs::File> {
    std::fs::File::create(path)
        .map_err(|error| IoError{file: Some(path.to_string()), cause: IoErrorType::File(error)})
}

/// Read from string with verbose errors
pub fn read_to_string(path: &str) -> IoResult<String> {
    std::fs::read_to_string(path)
        .map_err(|error| IoError{file: Some(path.to_string()), cause: IoErrorType::File(error)})
}

/// Read a whole file as raw bytes with verbose errors.
pub fn read_bytes(path: &str) -> IoResult<Vec<u8>> {
    std::fs::read(path)
        .map_err(|error| IoError{file: Some(path.to_string()), cause: IoErrorType::File(error)})
}

/// Write bytes to file with verbose errors.
pub fn write_bytes(path: &str, buffer: &[u8]) -> IoResult<()> {
    let mut f = create(path)?;
    f.write_all(buffer)
        .map_err(|error| IoError{file: Some(path.to_string()), cause: IoErrorType::File(error)})
}

/// Write string to file with verbose errors.
pub fn write_to_file(path: &str, buffer: &str) -> IoResult<()> {
    write_bytes(path, buffer.as_bytes())
}

/// File extension, lowercased.
fn extension(path: &str) -> Option<String> {
    std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Read in cfg files from the supported filetypes.
pub fn read_cfg_file<T>(path: &str) -> IoResult<T>
where T: serde::de::DeserializeOwned
{
    match extension(path).as_deref() {
        Some("json") => {
            serde_json::from_reader(open(path)?)
                .map_err(|error| IoError{file: Some(path.to_string()), cause: IoErrorType::SerdeJson(error)})
        },
        Some("toml") => {
            toml::from_str(&read_to_string(path)?)
                .map_err(|error| IoError{file: Some(path.to_string()), cause: IoErrorType::TomlDe(error)})
        },
        Some("yaml") | Some("yml") => {
            serde_yaml::from_reader(open(path)?)
                .map_err(|error| IoError{file: Some(path.to_string()), cause: IoErrorType::SerdeYaml(error)})
        },
        _ => {
            let supported_filetypes = vec!["json", "toml", "yaml", "yml"];
            let error_string = format!("Unsupported filetype for config file: {}\nSupported filetypes: {:?}", path, supported_filetypes);
            file_err(path, &error_string)
        },
    }
}

/// Config serialization formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum CfgFormat {
    #[default]
    Yaml,
    Json,
    Toml,
}

/// Serialize a config value to a string in the given format.
pub fn to_cfg_string<T>(value: &T, format: CfgFormat) -> IoResult<String>
where T: serde::Serialize
{
    match format {
        CfgFormat::Yaml => serde_yaml::to_string(value)
            .map_err(|error| IoError{file: None, cause: IoErrorType::SerdeYaml(error)}),
        CfgFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|error| IoError{file: None, cause: IoErrorType::SerdeJson(error)}),
        CfgFormat::Toml => toml::to_string_pretty(value)
            .map_err(|error| IoError{file: None, cause: IoErrorType::TomlSer(error)}),
    }
}

/// Point file formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum PointFormat {
    /// Whitespace separated values, three per point (`.txt`, `.xyz`).
    Text,
    /// Comma separated values, three per point (`.csv`).
    Csv,
    /// Little-endian `f64` values (`.bin`).
    Binary,
    /// Serialized `Coords` (`.json`).
    Json,
    /// Vertices of a STL surface (`.stl`, read only).
    Stl,
}
impl PointFormat {
    pub fn from_path(path: &str) -> IoResult<Self> {
        match extension(path).as_deref() {
            Some("txt") | Some("xyz") => Ok(PointFormat::Text),
            Some("csv") => Ok(PointFormat::Csv),
            Some("bin") => Ok(PointFormat::Binary),
            Some("json") => Ok(PointFormat::Json),
            Some("stl") => Ok(PointFormat::Stl),
            _ => {
                let supported_filetypes = vec!["txt", "xyz", "csv", "bin", "json", "stl"];
                let error_string = format!("Unsupported filetype for point file: {}\nSupported filetypes: {:?}", path, supported_filetypes);
                file_err(path, &error_string)
            },
        }
    }
}

/// Read a point set from file, the format being chosen by extension.
pub fn read_points(path: &str) -> coords::ProcResult<Coords> {
    match PointFormat::from_path(path)? {
        PointFormat::Text => Coords::from_string(&read_to_string(path)?, ' ', 3, None),
        PointFormat::Csv => Coords::from_string(&read_to_string(path)?, ',', 3, None),
        PointFormat::Binary => Coords::from_file(path, FloatWidth::F64),
        PointFormat::Json => Ok(read_cfg_file(path)?),
        PointFormat::Stl => Ok(stl::load_stl(path)?.to_coords()),
    }
}

/// Write a point set to file, the format being chosen by extension.
/// Text formats write one point per line at full precision.
pub fn write_points(path: &str, coords: &Coords) -> IoResult<()> {
    match PointFormat::from_path(path)? {
        PointFormat::Text => write_to_file(path, &points_to_string(coords, " ")),
        PointFormat::Csv => write_to_file(path, &points_to_string(coords, ",")),
        PointFormat::Binary => coords.to_file(path, FloatWidth::F64),
        PointFormat::Json => {
            let buffer = serde_json::to_string(coords)
                .map_err(|error| IoError{file: Some(path.to_string()), cause: IoErrorType::SerdeJson(error)})?;
            write_to_file(path, &buffer)
        },
        PointFormat::Stl => file_err(path, "Writing points to STL is not supported"),
    }
}

fn points_to_string(coords: &Coords, sep: &str) -> String {
    let mut buffer = String::new();
    for p in coords.iter_points() {
        buffer.push_str(&format!("{}{sep}{}{sep}{}\n", p.x, p.y, p.z, sep = sep));
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let c = Coords::from_points(vec![[1.5, -2.0, 0.1], [1e-7, 3.0, 4.25]]);
        for name in ["points.txt", "points.csv", "points.bin", "points.json"] {
            let path = dir.path().join(name);
            let path = path.to_str().unwrap();
            write_points(path, &c).unwrap();
            let back = read_points(path).unwrap();
            assert_eq!(back, c, "round trip through {}", name);
        }
    }

    #[test]
    fn unsupported_extensions() {
        assert!(PointFormat::from_path("points.vtk").is_err());
        assert!(read_cfg_file::<serde_json::Value>("cfg.ini").is_err());
        let c = Coords::from([0.0, 0.0, 0.0]);
        assert!(write_points("/nonexistent/out.stl", &c).is_err());
    }

    #[test]
    fn cfg_strings() {
        let value = serde_json::json!({"a": 1});
        assert!(to_cfg_string(&value, CfgFormat::Yaml).unwrap().contains("a: 1"));
        assert!(to_cfg_string(&value, CfgFormat::Toml).unwrap().contains("a = 1"));
    }
}
