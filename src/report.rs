//! Text shown to the user, shared by the CLI and the GUI.

use std::fmt::Write as _;

use crate::models::{ClassLabel, EnsembleResult, ImageInfo, ModelId};

pub const APP_TITLE: &str = "Lung Cancer Image Classifier";

pub const INTRO_TEXT: &str = "Interpreting radiographic patterns to distinguish adenocarcinoma, \
large cell, and squamous cell carcinoma by leveraging deep learning to support evidence-based \
diagnostics.";

pub const DISCLAIMER_TEXT: &str = "Disclaimer: This AI model may make mistakes. Always consult a \
qualified medical professional for diagnosis and treatment.";

pub const LOADING_TEXT: &str = "Loading, please wait...";

/// One row of a model's breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassBar {
    pub label: ClassLabel,
    /// Bar fill in `0.0..=100.0`.
    pub percent: f32,
    pub text: String,
}

/// `0.1234` becomes `"12.34%"`.
pub fn format_percent(probability: f32) -> String {
    format!("{:.2}%", probability * 100.0)
}

pub fn model_bars(result: &EnsembleResult, model: ModelId) -> Vec<ClassBar> {
    result
        .probabilities(model)
        .iter()
        .map(|(label, p)| ClassBar {
            label,
            percent: (p * 100.0).clamp(0.0, 100.0),
            text: format!("{}: {}", label, format_percent(p)),
        })
        .collect()
}

/// Bars for the initial, empty frames.
pub fn empty_bars() -> Vec<ClassBar> {
    ClassLabel::ALL
        .iter()
        .map(|&label| ClassBar {
            label,
            percent: 0.0,
            text: format!("{}: {}", label, format_percent(0.0)),
        })
        .collect()
}

pub fn final_prediction_text(result: &EnsembleResult) -> String {
    format!("Final Prediction: {}", result.final_label)
}

pub fn image_info_text(info: &ImageInfo) -> String {
    format!(
        "File: {} | {}x{} | {} KB",
        info.file_name, info.width, info.height, info.size_kb
    )
}

/// Plain-text report used by the CLI.
pub fn render_text(info: &ImageInfo, result: &EnsembleResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", image_info_text(info));
    let _ = writeln!(out, "{}", final_prediction_text(result));
    let _ = writeln!(
        out,
        "Selected from {} ({})",
        result.winning_model,
        format_percent(result.winning_probability())
    );
    for model in ModelId::ENSEMBLE_ORDER {
        let _ = writeln!(out, "\n{model}");
        for bar in model_bars(result, model) {
            let _ = writeln!(out, "  {}", bar.text);
        }
    }
    out
}
