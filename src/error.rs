use std::fmt;

/// Custom error types for location trail playback
#[derive(Debug)]
pub enum TrailError {
    /// I/O errors
    Io(std::io::Error),
    /// JSON document errors
    #[cfg(feature = "json")]
    Json(serde_json::Error),
    /// CSV writer errors
    #[cfg(feature = "csv")]
    Csv(csv::Error),
    /// A latitudeE7/longitudeE7 value that cannot be decoded
    MalformedCoordinate { raw: String, reason: String },
    /// Parse errors with context
    Parse(String),
    /// Export format error
    Export(String),
}

impl TrailError {
    pub fn malformed(raw: &str, reason: impl Into<String>) -> Self {
        TrailError::MalformedCoordinate {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }

    /// True for per-record decode failures that only skip one reveal
    pub fn is_malformed_coordinate(&self) -> bool {
        matches!(self, TrailError::MalformedCoordinate { .. })
    }
}

impl fmt::Display for TrailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailError::Io(err) => write!(f, "I/O error: {}", err),
            #[cfg(feature = "json")]
            TrailError::Json(err) => write!(f, "JSON error: {}", err),
            #[cfg(feature = "csv")]
            TrailError::Csv(err) => write!(f, "CSV error: {}", err),
            TrailError::MalformedCoordinate { raw, reason } => {
                write!(f, "Malformed coordinate '{}': {}", raw, reason)
            }
            TrailError::Parse(msg) => write!(f, "Parse error: {}", msg),
            TrailError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for TrailError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrailError::Io(err) => Some(err),
            #[cfg(feature = "json")]
            TrailError::Json(err) => Some(err),
            #[cfg(feature = "csv")]
            TrailError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TrailError {
    fn from(err: std::io::Error) -> Self {
        TrailError::Io(err)
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for TrailError {
    fn from(err: serde_json::Error) -> Self {
        TrailError::Json(err)
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for TrailError {
    fn from(err: csv::Error) -> Self {
        TrailError::Csv(err)
    }
}

impl From<anyhow::Error> for TrailError {
    fn from(err: anyhow::Error) -> Self {
        TrailError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrailError>;
