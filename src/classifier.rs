use std::path::Path;

use rten::Model;
use rten_tensor::prelude::*;
use rten_tensor::{NdTensor, Tensor};
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::device::Device;
use crate::error::{Error, Result};
use crate::models::{ClassLabel, ImageTensor, ModelId, ProbabilityVector};
use crate::normalization::Normalization;
use crate::preprocessing::INPUT_SHAPE;

/// A trained image classifier behind a uniform prediction contract.
///
/// Implementations are loaded once and shared read-only, so `predict` takes
/// `&self` and must not mutate hidden state.
pub trait Classifier: Send + Sync {
    fn model_id(&self) -> ModelId;

    /// Normalization the caller applies to the raw tensor before `predict`.
    fn normalization(&self) -> Normalization {
        self.model_id().normalization()
    }

    fn input_shape(&self) -> [usize; 4] {
        INPUT_SHAPE
    }

    /// Class names in the order of the model's output.
    fn labels(&self) -> &[String];

    fn predict(&self, input: &ImageTensor) -> Result<ProbabilityVector>;
}

/// Rejects tensors whose shape differs from what the model was built for.
pub fn check_input_shape(expected: [usize; 4], input: &ImageTensor) -> Result<()> {
    if input.shape() != expected {
        return Err(Error::ShapeMismatch {
            expected: expected.to_vec(),
            actual: input.shape().to_vec(),
        });
    }
    Ok(())
}

/// Classifier backed by an rten model file.
pub struct RtenClassifier {
    model_id: ModelId,
    model: Model,
    labels: Vec<String>,
    input_shape: [usize; 4],
}

impl RtenClassifier {
    /// Load the model artifact. Failure here is fatal for the pipeline.
    pub fn load(model_id: ModelId, config: &ModelConfig, device: &Device) -> Result<Self> {
        let path = config.path.as_path();
        info!("Loading {} from {} on {:?}", model_id, path.display(), device);
        let model = load_model(path)?;
        Ok(Self {
            model_id,
            model,
            labels: config.labels.clone().unwrap_or_else(ClassLabel::names),
            input_shape: INPUT_SHAPE,
        })
    }
}

fn load_model(path: &Path) -> Result<Model> {
    if !path.is_file() {
        return Err(Error::ModelLoad {
            path: path.to_path_buf(),
            reason: "file not found".to_string(),
        });
    }
    Model::load_file(path).map_err(|e| Error::ModelLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

impl Classifier for RtenClassifier {
    fn model_id(&self) -> ModelId {
        self.model_id
    }

    fn input_shape(&self) -> [usize; 4] {
        self.input_shape
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn predict(&self, input: &ImageTensor) -> Result<ProbabilityVector> {
        check_input_shape(self.input_shape, input)?;

        let tensor = NdTensor::from_data(input.shape(), input.data().to_vec());
        let output = self
            .model
            .run_one(tensor.view().into(), None)
            .map_err(|e| Error::Inference(format!("{}: {e}", self.model_id)))?;
        let output: Tensor<f32> = output
            .try_into()
            .map_err(|e| Error::Inference(format!("{}: unexpected output type: {e:?}", self.model_id)))?;

        let values = output.to_vec();
        debug!(model = %self.model_id, output = ?values, "model output");
        ProbabilityVector::try_from_slice(&values)
    }
}
