use std::path::PathBuf;

use thiserror::Error;

/// Coarse error categories surfaced to front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input image could not be read or decoded.
    Decode,
    /// A model failed to load or to run.
    Inference,
    /// The two models and the label set do not agree.
    Configuration,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("unsupported image type {path} (expected one of: png, jpg, jpeg)")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to load model {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    #[error("tensor shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("model output has {actual} values, expected {expected}")]
    OutputShape { expected: usize, actual: usize },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Decode { .. } | Error::UnsupportedFormat { .. } => ErrorKind::Decode,
            Error::ModelLoad { .. }
            | Error::ShapeMismatch { .. }
            | Error::OutputShape { .. }
            | Error::Inference(_) => ErrorKind::Inference,
            Error::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Startup failures leave no usable pipeline; everything else is per-call.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::ModelLoad { .. } | Error::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let load = Error::ModelLoad {
            path: PathBuf::from("missing.rten"),
            reason: "not found".to_string(),
        };
        assert!(load.is_fatal());
        assert_eq!(load.kind(), ErrorKind::Inference);

        let shape = Error::ShapeMismatch {
            expected: vec![1, 460, 460, 3],
            actual: vec![1, 224, 224, 3],
        };
        assert!(!shape.is_fatal());
        assert_eq!(shape.kind(), ErrorKind::Inference);

        let config = Error::Configuration("label mismatch".to_string());
        assert!(config.is_fatal());
        assert_eq!(config.kind(), ErrorKind::Configuration);

        let unsupported = Error::UnsupportedFormat {
            path: PathBuf::from("scan.bmp"),
        };
        assert!(!unsupported.is_fatal());
        assert_eq!(unsupported.kind(), ErrorKind::Decode);
    }
}
