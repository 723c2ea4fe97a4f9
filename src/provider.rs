use std::collections::BTreeMap;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::models::QuizMode;

pub const DEFAULT_CATEGORY: &str = "code";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTag {
    pub name: String,
}

/// One question exactly as quizapi.io returns it: fixed answer slots that may
/// be null, and a parallel map of `*_correct` string flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawQuestion {
    pub question: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub answers: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub correct_answers: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone)]
pub struct QuizQuery {
    pub mode: QuizMode,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub limit: Option<u8>,
}

impl QuizQuery {
    pub fn effective_limit(&self) -> u8 {
        match self.mode {
            QuizMode::Casual => self.limit.unwrap_or(self.mode.page_size()),
            // ranked runs always draw a full page, caller limits are ignored
            QuizMode::Ranked => self.mode.page_size(),
        }
    }

    pub fn provider_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if self.mode == QuizMode::Casual {
            let category = self
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
            params.push(("category", category));
        }
        params.push(("limit", self.effective_limit().to_string()));
        if let Some(difficulty) = self.difficulty.as_deref() {
            // "any" means no difficulty filter at all
            if !difficulty.eq_ignore_ascii_case("any") {
                params.push(("difficulty", difficulty.to_string()));
            }
        }
        params
    }
}

pub trait QuestionProvider: Send + Sync {
    fn fetch_questions(
        &self,
        query: &QuizQuery,
    ) -> BoxFuture<'static, anyhow::Result<Vec<RawQuestion>>>;
}

pub struct QuizApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl QuizApiClient {
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.quiz_api_key.clone()?;
        Some(Self::new(config.quiz_api_url.clone(), api_key))
    }

    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl QuestionProvider for QuizApiClient {
    fn fetch_questions(
        &self,
        query: &QuizQuery,
    ) -> BoxFuture<'static, anyhow::Result<Vec<RawQuestion>>> {
        let http = self.http.clone();
        let base_url = self.base_url.clone();
        let mut params = vec![("apiKey", self.api_key.clone())];
        params.extend(query.provider_params());
        Box::pin(async move {
            let response = http.get(&base_url).query(&params).send().await?;
            let status = response.status();
            if !status.is_success() {
                anyhow::bail!(
                    "Failed to fetch: {}",
                    status.canonical_reason().unwrap_or(status.as_str())
                );
            }
            Ok(response.json::<Vec<RawQuestion>>().await?)
        })
    }
}

/// Canned provider for tests and offline runs.
#[derive(Clone, Default)]
pub struct MockProvider {
    pub questions: Vec<RawQuestion>,
}

impl MockProvider {
    pub fn new(questions: Vec<RawQuestion>) -> Self {
        Self { questions }
    }
}

impl QuestionProvider for MockProvider {
    fn fetch_questions(
        &self,
        query: &QuizQuery,
    ) -> BoxFuture<'static, anyhow::Result<Vec<RawQuestion>>> {
        let mut questions = self.questions.clone();
        questions.truncate(query.effective_limit() as usize);
        Box::pin(async move { Ok(questions) })
    }
}
