use crate::models::{
    ClassLabel, EnsembleResult, ModelId, PredictionCandidate, ProbabilityVector,
};

/// All eight candidates in decision order: every ResNet50 class in index
/// order, then every DenseNet201 class in index order.
pub fn candidates(
    resnet: &ProbabilityVector,
    densenet: &ProbabilityVector,
) -> Vec<PredictionCandidate> {
    ModelId::ENSEMBLE_ORDER
        .iter()
        .zip([resnet, densenet])
        .flat_map(|(&model, probs)| {
            probs
                .values()
                .iter()
                .enumerate()
                .map(move |(class_index, &probability)| PredictionCandidate {
                    probability,
                    model,
                    class_index,
                })
        })
        .collect()
}

/// Merge two probability vectors by picking the single most confident
/// candidate.
///
/// Only a strictly greater probability replaces the current best, so on exact
/// ties the earlier candidate wins: ResNet50 over DenseNet201, and the lower
/// class index within a model.
pub fn ensemble(resnet: ProbabilityVector, densenet: ProbabilityVector) -> EnsembleResult {
    let all = candidates(&resnet, &densenet);
    let mut best = all[0];
    for candidate in &all[1..] {
        // NaN compares false, so it never displaces a number.
        let replaces = if best.probability.is_nan() {
            !candidate.probability.is_nan()
        } else {
            candidate.probability > best.probability
        };
        if replaces {
            best = *candidate;
        }
    }

    EnsembleResult {
        resnet_probabilities: resnet,
        densenet_probabilities: densenet,
        final_label: ClassLabel::ALL[best.class_index],
        winning_model: best.model,
    }
}
