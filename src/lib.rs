pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod provider;
pub mod quiz_flow;
pub mod routes;
pub mod session_cache;
pub mod state;
pub mod store;

use std::sync::Arc;

use crate::provider::{QuestionProvider, QuizApiClient};

pub fn build_state() -> state::AppState {
    let config = config::Config::from_env();
    let provider = QuizApiClient::from_config(&config)
        .map(|client| Arc::new(client) as Arc<dyn QuestionProvider>);
    state::AppState::new(config, provider)
}
