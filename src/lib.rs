pub mod classifier;
pub mod config;
pub mod device;
pub mod ensemble;
pub mod error;
pub mod models;
pub mod normalization;
pub mod pipeline;
pub mod preprocessing;
pub mod report;

pub use classifier::{Classifier, RtenClassifier};
pub use config::AppConfig;
pub use ensemble::ensemble;
pub use error::{Error, ErrorKind, Result};
pub use models::{
    ClassLabel, Classification, EnsembleResult, ImageInfo, ImageTensor, ModelId,
    PredictionCandidate, ProbabilityVector,
};
pub use normalization::Normalization;
pub use pipeline::EnsemblePipeline;
pub use preprocessing::preprocess;

#[cfg(feature = "gui")]
pub mod gui;
