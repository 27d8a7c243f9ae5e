/// Pipeline process error type.
#[derive(Debug)]
pub enum PipelineError {
    /// Error from a coordinate operation.
    CoordsError(crate::coords::CoordsError),
    /// IO error.
    IoError(crate::io::IoError),
    /// StringOnly error.
    StringOnly(String),
}
impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::CoordsError(error) => write!(f, "- {}", error),
            PipelineError::IoError(error) => write!(f, "- IO Error:\n{}", error),
            PipelineError::StringOnly(error) => write!(f, "- {}", error),
        }
    }
}
impl From<crate::coords::CoordsError> for PipelineError {
    fn from(error: crate::coords::CoordsError) -> Self {
        PipelineError::CoordsError(error)
    }
}
impl From<crate::io::IoError> for PipelineError {
    fn from(error: crate::io::IoError) -> Self {
        PipelineError::IoError(error)
    }
}
impl From<String> for PipelineError {
    fn from(error: String) -> Self {
        PipelineError::StringOnly(error)
    }
}

/// Result type for the `pipeline` module.
pub type ProcResult<T> = std::result::Result<T, PipelineError>;

/// Create a `PipelineError::StringOnly` from a string.
pub fn err_str<T>(error_str: &str) -> ProcResult<T> {
    Err(PipelineError::StringOnly(error_str.to_string()))
}
