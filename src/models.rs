use std::fmt;

use tracing::warn;

use crate::error::{Error, Result};
use crate::normalization::Normalization;

pub const NUM_CLASSES: usize = 4;

/// Histological category predicted for a scan.
///
/// The discriminant order is the index order of every probability vector
/// produced by either model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassLabel {
    Adenocarcinoma,
    LargeCellCarcinoma,
    Normal,
    SquamousCellCarcinoma,
}

impl ClassLabel {
    pub const ALL: [ClassLabel; NUM_CLASSES] = [
        ClassLabel::Adenocarcinoma,
        ClassLabel::LargeCellCarcinoma,
        ClassLabel::Normal,
        ClassLabel::SquamousCellCarcinoma,
    ];

    pub fn index(self) -> usize {
        match self {
            ClassLabel::Adenocarcinoma => 0,
            ClassLabel::LargeCellCarcinoma => 1,
            ClassLabel::Normal => 2,
            ClassLabel::SquamousCellCarcinoma => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            ClassLabel::Adenocarcinoma => "Adenocarcinoma",
            ClassLabel::LargeCellCarcinoma => "Large Cell Carcinoma",
            ClassLabel::Normal => "Normal",
            ClassLabel::SquamousCellCarcinoma => "Squamous Cell Carcinoma",
        }
    }

    /// Names in index order, as a model's label set is expected to read.
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|l| l.name().to_string()).collect()
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The two ensemble members. Model A is ResNet50, Model B is DenseNet201.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelId {
    ResNet50,
    DenseNet201,
}

impl ModelId {
    /// Candidate order used by the ensemble: Model A first.
    pub const ENSEMBLE_ORDER: [ModelId; 2] = [ModelId::ResNet50, ModelId::DenseNet201];

    pub fn name(self) -> &'static str {
        match self {
            ModelId::ResNet50 => "ResNet50",
            ModelId::DenseNet201 => "DenseNet201",
        }
    }

    /// Input normalization the model was trained with.
    pub fn normalization(self) -> Normalization {
        match self {
            ModelId::ResNet50 => Normalization::Caffe,
            ModelId::DenseNet201 => Normalization::Torch,
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Batched NHWC image buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    shape: [usize; 4],
    data: Vec<f32>,
}

impl ImageTensor {
    pub fn new(shape: [usize; 4], data: Vec<f32>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                actual: vec![data.len()],
            });
        }
        Ok(Self { shape, data })
    }

    /// Element-wise transforms keep the length, so no check is needed.
    pub(crate) fn from_normalized(shape: [usize; 4], data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), shape.iter().product::<usize>());
        Self { shape, data }
    }

    pub fn zeros(shape: [usize; 4]) -> Self {
        let len = shape.iter().product();
        Self {
            shape,
            data: vec![0.0; len],
        }
    }

    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn height(&self) -> usize {
        self.shape[1]
    }

    pub fn width(&self) -> usize {
        self.shape[2]
    }

    pub fn channels(&self) -> usize {
        self.shape[3]
    }

    /// Channel values at `(y, x)` of the first batch entry.
    pub fn pixel(&self, y: usize, x: usize) -> [f32; 3] {
        let c = self.channels();
        let offset = (y * self.width() + x) * c;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ]
    }
}

/// Per-class confidences from one model, indexed like [`ClassLabel::ALL`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityVector([f32; NUM_CLASSES]);

impl ProbabilityVector {
    pub const DEFAULT_TOLERANCE: f32 = 0.01;

    pub fn new(values: [f32; NUM_CLASSES]) -> Self {
        Self(values)
    }

    pub fn try_from_slice(values: &[f32]) -> Result<Self> {
        let values: [f32; NUM_CLASSES] =
            values.try_into().map_err(|_| Error::OutputShape {
                expected: NUM_CLASSES,
                actual: values.len(),
            })?;
        Ok(Self(values))
    }

    pub fn values(&self) -> &[f32; NUM_CLASSES] {
        &self.0
    }

    pub fn get(&self, label: ClassLabel) -> f32 {
        self.0[label.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassLabel, f32)> + '_ {
        ClassLabel::ALL.iter().copied().zip(self.0.iter().copied())
    }

    pub fn sum(&self) -> f32 {
        self.0.iter().sum()
    }

    /// True when every entry lies in `[0, 1]` and the sum is within
    /// `tolerance` of 1.
    pub fn is_distribution(&self, tolerance: f32) -> bool {
        self.0.iter().all(|p| (0.0..=1.0).contains(p)) && (self.sum() - 1.0).abs() <= tolerance
    }

    /// Logs a warning when the vector does not look like softmax output.
    /// Never rejects the vector.
    pub fn check(&self, model: ModelId) -> bool {
        let ok = self.is_distribution(Self::DEFAULT_TOLERANCE);
        if !ok {
            warn!(
                model = model.name(),
                sum = self.sum(),
                values = ?self.0,
                "probability vector is not a normalized distribution"
            );
        }
        ok
    }
}

/// One `(probability, model, class)` entry considered by the ensemble.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionCandidate {
    pub probability: f32,
    pub model: ModelId,
    pub class_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleResult {
    pub resnet_probabilities: ProbabilityVector,
    pub densenet_probabilities: ProbabilityVector,
    pub final_label: ClassLabel,
    pub winning_model: ModelId,
}

impl EnsembleResult {
    pub fn probabilities(&self, model: ModelId) -> &ProbabilityVector {
        match model {
            ModelId::ResNet50 => &self.resnet_probabilities,
            ModelId::DenseNet201 => &self.densenet_probabilities,
        }
    }

    pub fn winning_probability(&self) -> f32 {
        self.probabilities(self.winning_model).get(self.final_label)
    }
}

/// File metadata shown next to a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub size_kb: u64,
}

/// A result together with the image it was computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub info: ImageInfo,
    pub result: EnsembleResult,
}
