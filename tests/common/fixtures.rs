#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use image::{ImageBuffer, Rgb};
use lungscan::classifier::check_input_shape;
use lungscan::{ClassLabel, Classifier, ImageTensor, ModelId, ProbabilityVector, Result};
use tempfile::NamedTempFile;

/// Creates a solid-color PNG of the given size and returns the temp file.
/// The file will be automatically cleaned up when dropped.
pub fn create_test_image(width: u32, height: u32, color: [u8; 3]) -> NamedTempFile {
    let img = ImageBuffer::from_fn(width, height, |_, _| Rgb(color));
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// Creates a file with a `.png` name that is not an image.
pub fn create_corrupt_image() -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(b"\x89PNG but truncated")
        .expect("Failed to write temp file");
    file
}

/// Stub classifier returning a fixed output and recording what it was fed.
pub struct StubClassifier {
    id: ModelId,
    labels: Vec<String>,
    output: Vec<f32>,
    input_shape: [usize; 4],
    seen: Mutex<Vec<[f32; 3]>>,
}

impl StubClassifier {
    pub fn new(id: ModelId, output: [f32; 4]) -> Self {
        Self {
            id,
            labels: ClassLabel::names(),
            output: output.to_vec(),
            input_shape: lungscan::preprocessing::INPUT_SHAPE,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_raw_output(mut self, output: Vec<f32>) -> Self {
        self.output = output;
        self
    }

    pub fn with_input_shape(mut self, shape: [usize; 4]) -> Self {
        self.input_shape = shape;
        self
    }

    /// Top-left pixel of every tensor passed to `predict`.
    pub fn seen(&self) -> Vec<[f32; 3]> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Classifier for StubClassifier {
    fn model_id(&self) -> ModelId {
        self.id
    }

    fn input_shape(&self) -> [usize; 4] {
        self.input_shape
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn predict(&self, input: &ImageTensor) -> Result<ProbabilityVector> {
        check_input_shape(self.input_shape, input)?;
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(input.pixel(0, 0));
        ProbabilityVector::try_from_slice(&self.output)
    }
}

/// Builds a pipeline from two stubs, keeping handles for assertions.
pub fn stub_pipeline(
    resnet: StubClassifier,
    densenet: StubClassifier,
) -> (
    lungscan::EnsemblePipeline,
    Arc<StubClassifier>,
    Arc<StubClassifier>,
) {
    let resnet = Arc::new(resnet);
    let densenet = Arc::new(densenet);
    let pipeline = lungscan::EnsemblePipeline::new(resnet.clone(), densenet.clone())
        .expect("stub pipeline should be valid");
    (pipeline, resnet, densenet)
}
