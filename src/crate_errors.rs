use crate::{
    args,
    coords,
    io,
    pipeline,
};

/// Error-type enum for the `coords3d` crate.
/// Wraps the errors of the individual modules.
#[derive(Debug)]
pub enum Coords3dError {
    ArgError(args::ArgError),
    CoordsError(coords::CoordsError),
    PipelineError(pipeline::PipelineError),
    IoError(io::IoError),
    StringOnly(String),
}
impl std::fmt::Display for Coords3dError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Coords3dError::ArgError(error) => write!(f, "! ARGUMENT ERROR:\n{}", error),
            Coords3dError::CoordsError(error) => write!(f, "! COORDINATE ERROR:\n- {}", error),
            Coords3dError::PipelineError(error) => write!(f, "! PIPELINE ERROR:\n{}", error),
            Coords3dError::IoError(error) => write!(f, "! IO ERROR:\n{}", error),
            Coords3dError::StringOnly(error) => write!(f, "! COORDS3D ERROR:\n- {}", error),
        }
    }
}
impl std::error::Error for Coords3dError {}
impl From<String> for Coords3dError {
    fn from(error: String) -> Self {
        Coords3dError::StringOnly(error)
    }
}
impl From<args::ArgError> for Coords3dError {
    fn from(error: args::ArgError) -> Self {
        Coords3dError::ArgError(error)
    }
}
impl From<coords::CoordsError> for Coords3dError {
    fn from(error: coords::CoordsError) -> Self {
        Coords3dError::CoordsError(error)
    }
}
impl From<pipeline::PipelineError> for Coords3dError {
    fn from(error: pipeline::PipelineError) -> Self {
        Coords3dError::PipelineError(error)
    }
}
impl From<io::IoError> for Coords3dError {
    fn from(error: io::IoError) -> Self {
        Coords3dError::IoError(error)
    }
}

/// Result type for the `coords3d` crate.
pub type Coords3dResult<T> = std::result::Result<T, Coords3dError>;

/// Create a `Coords3dResult` with an `Err` from a string.
/// Shorthand to avoid writing `Err(crate::Coords3dError::StringOnly(error_str))`.
pub fn err_str<T>(error_str: &str) -> Coords3dResult<T> {
    Err(Coords3dError::StringOnly(error_str.to_string()))
}
