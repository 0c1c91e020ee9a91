use std::sync::Arc;

use crate::pipeline::EnsemblePipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<EnsemblePipeline>,
    /// A classification is in flight; further picks are ignored.
    pub busy: bool,
}

impl AppState {
    pub fn new(pipeline: Arc<EnsemblePipeline>) -> Self {
        Self {
            pipeline,
            busy: false,
        }
    }
}
