mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from lungscan for tests
pub use lungscan::{
    ClassLabel, Classifier, EnsemblePipeline, Error, ImageTensor, ModelId,
    ProbabilityVector,
};
