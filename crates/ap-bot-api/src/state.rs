//! Shared application state for the Axum server.

use std::sync::Arc;

use ap_assistant::{Assistant, AssistantConfig, FallbackResponder, MockResponder};
use ap_sheets::{MockRecordSource, RecordSource};

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
}

impl AppState {
    pub fn new(
        records: Arc<dyn RecordSource>,
        responder: Arc<dyn FallbackResponder>,
        config: AssistantConfig,
    ) -> Self {
        Self {
            assistant: Arc::new(Assistant::new(records, responder, config)),
        }
    }

    /// Sample inventory and a canned fallback reply, for development and tests.
    pub fn with_sample_data() -> Self {
        Self::new(
            Arc::new(MockRecordSource::with_sample_inventory()),
            Arc::new(MockResponder::replying(
                "Подскажите, какой бюджет и тип кузова вы рассматриваете?",
            )),
            AssistantConfig::default(),
        )
    }
}
