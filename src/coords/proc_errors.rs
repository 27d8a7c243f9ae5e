/// Coordinate algebra error type.
#[derive(Debug)]
pub enum CoordsError {
    /// Invalid array shape (trailing axis, rank or size mismatch).
    Shape(String),
    /// Missing or inconsistent arguments.
    Argument(String),
    /// Parsed input does not hold the expected number of values.
    Format(String),
    /// Geometric configuration the algorithm cannot resolve.
    Runtime(String),
    /// IO error while reading coordinates.
    Io(crate::io::IoError),
}
impl std::fmt::Display for CoordsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordsError::Shape(error) => write!(f, "Shape Error: {}", error),
            CoordsError::Argument(error) => write!(f, "Argument Error: {}", error),
            CoordsError::Format(error) => write!(f, "Format Error: {}", error),
            CoordsError::Runtime(error) => write!(f, "Runtime Error: {}", error),
            CoordsError::Io(error) => write!(f, "IO Error:\n{}", error),
        }
    }
}
impl std::error::Error for CoordsError {}
impl From<crate::io::IoError> for CoordsError {
    fn from(error: crate::io::IoError) -> Self {
        CoordsError::Io(error)
    }
}

/// Result type for the `coords` module.
pub type ProcResult<T> = std::result::Result<T, CoordsError>;

/// Create a `CoordsError::Shape` from a string.
pub fn shape_err<T>(error_str: &str) -> ProcResult<T> {
    Err(CoordsError::Shape(error_str.to_string()))
}

/// Create a `CoordsError::Argument` from a string.
pub fn arg_err<T>(error_str: &str) -> ProcResult<T> {
    Err(CoordsError::Argument(error_str.to_string()))
}

/// Create a `CoordsError::Format` from a string.
pub fn format_err<T>(error_str: &str) -> ProcResult<T> {
    Err(CoordsError::Format(error_str.to_string()))
}

/// Create a `CoordsError::Runtime` from a string.
pub fn runtime_err<T>(error_str: &str) -> ProcResult<T> {
    Err(CoordsError::Runtime(error_str.to_string()))
}
