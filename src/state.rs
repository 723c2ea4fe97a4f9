use std::sync::Arc;

use crate::config::Config;
use crate::provider::QuestionProvider;
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// None when no API key is configured; the quiz endpoint reports that
    /// per request instead of the process refusing to start.
    pub provider: Option<Arc<dyn QuestionProvider>>,
    pub store: Arc<DocumentStore>,
}

impl AppState {
    pub fn new(config: Config, provider: Option<Arc<dyn QuestionProvider>>) -> Self {
        let store = Arc::new(DocumentStore::new(config.snapshot_path.as_deref()));
        Self {
            config: Arc::new(config),
            provider,
            store,
        }
    }
}
