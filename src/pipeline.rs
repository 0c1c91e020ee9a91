use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info};

use crate::classifier::{Classifier, RtenClassifier};
use crate::config::AppConfig;
use crate::device::select_device;
use crate::ensemble::ensemble;
use crate::error::{Error, Result};
use crate::models::{
    ClassLabel, Classification, EnsembleResult, ImageInfo, ImageTensor, ModelId,
    ProbabilityVector,
};
use crate::preprocessing;

/// Preprocess, run both classifiers and merge their outputs.
///
/// Holds the two loaded classifiers. Cheap to share behind an `Arc`; every
/// call allocates its own tensors, so concurrent callers do not interfere.
#[derive(Clone)]
pub struct EnsemblePipeline {
    resnet: Arc<dyn Classifier>,
    densenet: Arc<dyn Classifier>,
}

impl EnsemblePipeline {
    /// Assemble a pipeline from already loaded classifiers.
    ///
    /// Fails with [`Error::Configuration`] when an adapter is registered under
    /// the wrong model, or when its label set differs from [`ClassLabel::ALL`].
    pub fn new(resnet: Arc<dyn Classifier>, densenet: Arc<dyn Classifier>) -> Result<Self> {
        for (expected, classifier) in ModelId::ENSEMBLE_ORDER.iter().zip([&resnet, &densenet]) {
            if classifier.model_id() != *expected {
                return Err(Error::Configuration(format!(
                    "expected a {expected} classifier, got {}",
                    classifier.model_id()
                )));
            }
            check_labels(*expected, classifier.labels())?;
        }
        Ok(Self { resnet, densenet })
    }

    /// Load both rten models named in `config`.
    pub fn load(config: &AppConfig) -> Result<Self> {
        let device = select_device(config.runtime.force_cpu);
        let resnet = RtenClassifier::load(ModelId::ResNet50, &config.models.resnet, &device)?;
        let densenet =
            RtenClassifier::load(ModelId::DenseNet201, &config.models.densenet, &device)?;
        let pipeline = Self::new(Arc::new(resnet), Arc::new(densenet))?;

        if config.models.verify_on_load {
            pipeline.verify()?;
        }
        info!("Ensemble pipeline ready");
        Ok(pipeline)
    }

    /// Run each model once on a blank input to check its output width.
    pub fn verify(&self) -> Result<()> {
        for classifier in [&self.resnet, &self.densenet] {
            let probe = ImageTensor::zeros(classifier.input_shape());
            match classifier.predict(&probe) {
                Ok(_) => debug!("{} passed startup probe", classifier.model_id()),
                Err(Error::OutputShape { expected, actual }) => {
                    return Err(Error::Configuration(format!(
                        "{} predicts {actual} classes, expected {expected}",
                        classifier.model_id()
                    )));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    pub fn classifier(&self, model: ModelId) -> &dyn Classifier {
        match model {
            ModelId::ResNet50 => self.resnet.as_ref(),
            ModelId::DenseNet201 => self.densenet.as_ref(),
        }
    }

    /// Classify the image at `path`.
    pub fn classify(&self, path: &Path) -> Result<EnsembleResult> {
        let img = preprocessing::load_image(path)?;
        self.classify_image(&img)
    }

    /// Classify an already decoded image.
    pub fn classify_image(&self, img: &DynamicImage) -> Result<EnsembleResult> {
        let start = Instant::now();
        let raw = preprocessing::preprocess_image(img)?;
        debug!("Preprocessing took {:?}", start.elapsed());

        let resnet_probs = self.predict_with(self.resnet.as_ref(), &raw)?;
        let densenet_probs = self.predict_with(self.densenet.as_ref(), &raw)?;

        let result = ensemble(resnet_probs, densenet_probs);
        info!(
            label = %result.final_label,
            model = %result.winning_model,
            probability = result.winning_probability(),
            "Ensemble prediction"
        );
        Ok(result)
    }

    /// Classify `path` and collect the file details shown alongside the result.
    pub fn classify_file(&self, path: &Path) -> Result<Classification> {
        let img = preprocessing::load_image(path)?;
        let size_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let info = ImageInfo {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            width: img.width(),
            height: img.height(),
            size_kb: size_bytes / 1024,
        };
        let result = self.classify_image(&img)?;
        Ok(Classification { info, result })
    }

    fn predict_with(
        &self,
        classifier: &dyn Classifier,
        raw: &ImageTensor,
    ) -> Result<ProbabilityVector> {
        let start = Instant::now();
        let input = classifier.normalization().apply(raw);
        let probs = classifier.predict(&input)?;
        probs.check(classifier.model_id());
        debug!(
            "{} prediction took {:?}: {:?}",
            classifier.model_id(),
            start.elapsed(),
            probs.values()
        );
        Ok(probs)
    }
}

fn check_labels(model: ModelId, labels: &[String]) -> Result<()> {
    let expected = ClassLabel::names();
    if labels.len() != expected.len() {
        return Err(Error::Configuration(format!(
            "{model} has {} labels, expected {}",
            labels.len(),
            expected.len()
        )));
    }
    if labels != expected.as_slice() {
        return Err(Error::Configuration(format!(
            "{model} labels {labels:?} do not match {expected:?}"
        )));
    }
    Ok(())
}
