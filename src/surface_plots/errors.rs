use plotters::drawing::DrawingAreaErrorKind;
use std::fmt;

/// Error types of the loading, grid reconstruction and rendering pipelines.
/// Every variant is fatal: the run stops at the first one.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotError {
    /// non-numeric token, ragged field matrix, empty source, row count != number of time points
    MalformedInput {
        source_name: String,
        line: usize,
        detail: String,
    },
    /// column count != m (1D) or k^2 (2D), mesh and field disagree, reshape failure
    ShapeMismatch {
        context: String,
        expected: String,
        actual: String,
    },
    /// fewer than 2 time points survive truncation (dt cannot be computed)
    InsufficientFrames { retained: usize, cutoff: Option<f64> },
    Io { path: String, message: String },
    Config(String),
    Render(String),
}

pub type PlotResult<T> = Result<T, PlotError>;

impl PlotError {
    pub fn malformed(source_name: &str, line: usize, detail: impl Into<String>) -> Self {
        PlotError::MalformedInput {
            source_name: source_name.to_string(),
            line,
            detail: detail.into(),
        }
    }

    pub fn shape(
        context: impl Into<String>,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        PlotError::ShapeMismatch {
            context: context.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlotError::MalformedInput {
                source_name,
                line,
                detail,
            } => write!(f, "Malformed input in {} (line {}): {}", source_name, line, detail),
            PlotError::ShapeMismatch {
                context,
                expected,
                actual,
            } => write!(
                f,
                "Shape mismatch in {}: expected {}, got {}",
                context, expected, actual
            ),
            PlotError::InsufficientFrames { retained, cutoff } => match cutoff {
                Some(c) => write!(
                    f,
                    "Insufficient frames: {} increasing time point(s) below t = {}, at least 2 required",
                    retained, c
                ),
                None => write!(
                    f,
                    "Insufficient frames: {} increasing time point(s), at least 2 required",
                    retained
                ),
            },
            PlotError::Io { path, message } => write!(f, "I/O error on {}: {}", path, message),
            PlotError::Config(msg) => write!(f, "Invalid task configuration: {}", msg),
            PlotError::Render(msg) => write!(f, "Rendering failed: {}", msg),
        }
    }
}

impl std::error::Error for PlotError {}

impl From<std::io::Error> for PlotError {
    fn from(e: std::io::Error) -> Self {
        PlotError::Io {
            path: String::from("<unknown>"),
            message: e.to_string(),
        }
    }
}

impl From<csv::Error> for PlotError {
    fn from(e: csv::Error) -> Self {
        PlotError::Io {
            path: String::from("<csv>"),
            message: e.to_string(),
        }
    }
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Render(e.to_string())
    }
}
