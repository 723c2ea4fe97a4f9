use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::provider::RawQuestion;

const EXPLANATION_FALLBACK: &str = "Not Available";
const CORRECT_SUFFIX: &str = "_correct";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Answer {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub description: Option<String>,
    pub answers: Vec<Answer>,
    #[serde(rename = "correctAnswers")]
    pub correct_answers: Vec<String>,
    pub explanation: String,
    pub tags: Vec<String>,
    pub difficulty: String,
    pub category: String,
}

impl Question {
    pub fn is_correct(&self, answer_id: &str) -> bool {
        self.correct_answers.iter().any(|id| id == answer_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizMode {
    Casual,
    Ranked,
}

impl QuizMode {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("rank") | Some("ranked") => QuizMode::Ranked,
            _ => QuizMode::Casual,
        }
    }

    pub fn page_size(self) -> u8 {
        match self {
            QuizMode::Casual => 10,
            QuizMode::Ranked => 20,
        }
    }

    pub fn timer(self) -> Option<Duration> {
        match self {
            QuizMode::Casual => None,
            QuizMode::Ranked => Some(Duration::from_secs(60)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "userImg")]
    pub user_img: Option<String>,
    #[serde(rename = "highScore", default)]
    pub high_score: u32,
}

impl UserProfile {
    pub fn new(email: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            user_name: user_name.into(),
            user_img: None,
            high_score: 0,
        }
    }

    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.user_img = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub email: String,
    pub name: String,
    pub score: u32,
}

/// Highest score first; ties keep their incoming order.
pub fn sort_leaderboard(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
}

pub fn reshape_questions(raw: Vec<RawQuestion>, rng: &mut impl Rng) -> Vec<Question> {
    let mut questions = Vec::with_capacity(raw.len());
    for item in raw {
        if let Some(question) = reshape_question(item, rng) {
            questions.push(question);
        }
    }
    questions
}

/// Turns the provider's sparse answer maps into the list shape the client
/// renders: null slots dropped, order shuffled, correct ids derived from the
/// `*_correct` flag map. A question whose flags point at no surviving answer
/// is unplayable and gets dropped.
pub fn reshape_question(raw: RawQuestion, rng: &mut impl Rng) -> Option<Question> {
    let mut answers: Vec<Answer> = raw
        .answers
        .into_iter()
        .filter_map(|(id, text)| text.map(|text| Answer { id, text }))
        .collect();
    answers.shuffle(rng);

    let correct_answers: Vec<String> = raw
        .correct_answers
        .into_iter()
        .filter(|(_, flag)| flag.as_deref() == Some("true"))
        .map(|(key, _)| match key.strip_suffix(CORRECT_SUFFIX) {
            Some(bare) => bare.to_string(),
            None => key,
        })
        .collect();

    if !correct_answers
        .iter()
        .any(|id| answers.iter().any(|a| &a.id == id))
    {
        tracing::warn!("dropping unplayable question: {}", raw.question);
        return None;
    }

    Some(Question {
        question: raw.question,
        description: raw.description,
        answers,
        correct_answers,
        explanation: raw
            .explanation
            .unwrap_or_else(|| EXPLANATION_FALLBACK.to_string()),
        tags: raw.tags.into_iter().map(|tag| tag.name).collect(),
        difficulty: raw.difficulty.unwrap_or_default(),
        category: raw.category.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::RawTag;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn string_map(pairs: &[(&str, Option<&str>)]) -> BTreeMap<String, Option<String>> {
        pairs
            .iter()
            .map(|&(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    fn sample_raw() -> RawQuestion {
        RawQuestion {
            question: "What is 2+2?".into(),
            description: None,
            answers: string_map(&[
                ("answer_a", Some("4")),
                ("answer_b", None),
                ("answer_c", Some("5")),
            ]),
            correct_answers: string_map(&[
                ("answer_a_correct", Some("true")),
                ("answer_c_correct", Some("false")),
            ]),
            explanation: None,
            tags: vec![RawTag { name: "Math".into() }],
            category: Some("code".into()),
            difficulty: Some("Easy".into()),
        }
    }

    #[test]
    fn reshape_drops_null_answers_and_derives_correct_ids() {
        let mut rng = StdRng::seed_from_u64(7);
        let question = reshape_question(sample_raw(), &mut rng).unwrap();

        assert_eq!(question.answers.len(), 2);
        let mut ids: Vec<_> = question.answers.iter().map(|a| a.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["answer_a", "answer_c"]);
        assert_eq!(question.correct_answers, vec!["answer_a"]);
        assert_eq!(question.explanation, "Not Available");
        assert_eq!(question.tags, vec!["Math"]);
    }

    #[test]
    fn shuffle_preserves_the_answer_multiset() {
        let mut raw = sample_raw();
        raw.answers = string_map(&[
            ("answer_a", Some("one")),
            ("answer_b", Some("two")),
            ("answer_c", Some("three")),
            ("answer_d", Some("four")),
            ("answer_e", Some("five")),
            ("answer_f", Some("six")),
        ]);
        raw.correct_answers = string_map(&[("answer_d_correct", Some("true"))]);

        let mut rng = StdRng::seed_from_u64(42);
        let question = reshape_question(raw, &mut rng).unwrap();

        let mut pairs: Vec<_> = question
            .answers
            .iter()
            .map(|a| (a.id.clone(), a.text.clone()))
            .collect();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("answer_a".to_string(), "one".to_string()),
                ("answer_b".to_string(), "two".to_string()),
                ("answer_c".to_string(), "three".to_string()),
                ("answer_d".to_string(), "four".to_string()),
                ("answer_e".to_string(), "five".to_string()),
                ("answer_f".to_string(), "six".to_string()),
            ]
        );
    }

    #[test]
    fn present_explanation_is_kept() {
        let mut raw = sample_raw();
        raw.explanation = Some("Addition.".into());
        let mut rng = StdRng::seed_from_u64(1);
        let question = reshape_question(raw, &mut rng).unwrap();
        assert_eq!(question.explanation, "Addition.");
    }

    #[test]
    fn question_without_a_playable_correct_answer_is_dropped() {
        // The only flagged answer is the null one that gets filtered out.
        let mut raw = sample_raw();
        raw.correct_answers = string_map(&[("answer_b_correct", Some("true"))]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(reshape_question(raw, &mut rng).is_none());
    }

    #[test]
    fn question_with_no_flags_at_all_is_dropped() {
        let mut raw = sample_raw();
        raw.correct_answers = BTreeMap::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(reshape_question(raw, &mut rng).is_none());
    }

    #[test]
    fn reshape_questions_skips_only_the_bad_ones() {
        let mut bad = sample_raw();
        bad.correct_answers = BTreeMap::new();
        let mut rng = StdRng::seed_from_u64(3);
        let questions = reshape_questions(vec![sample_raw(), bad, sample_raw()], &mut rng);
        assert_eq!(questions.len(), 2);
    }

    #[test]
    fn missing_category_and_difficulty_become_empty_strings() {
        let mut raw = sample_raw();
        raw.category = None;
        raw.difficulty = None;
        let mut rng = StdRng::seed_from_u64(1);
        let question = reshape_question(raw, &mut rng).unwrap();
        assert_eq!(question.category, "");
        assert_eq!(question.difficulty, "");
    }

    #[test]
    fn mode_parsing_and_page_sizes() {
        assert_eq!(QuizMode::parse(Some("rank")), QuizMode::Ranked);
        assert_eq!(QuizMode::parse(Some("ranked")), QuizMode::Ranked);
        assert_eq!(QuizMode::parse(Some("casual")), QuizMode::Casual);
        assert_eq!(QuizMode::parse(None), QuizMode::Casual);
        assert_eq!(QuizMode::Casual.page_size(), 10);
        assert_eq!(QuizMode::Ranked.page_size(), 20);
        assert!(QuizMode::Casual.timer().is_none());
        assert_eq!(QuizMode::Ranked.timer(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn leaderboard_sorts_by_score_descending() {
        let entry = |email: &str, score: u32| LeaderboardEntry {
            email: email.into(),
            name: email.into(),
            score,
        };
        let mut entries = vec![entry("a", 3), entry("b", 9), entry("c", 3), entry("d", 7)];
        sort_leaderboard(&mut entries);
        let scores: Vec<_> = entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![9, 7, 3, 3]);
        // stable sort keeps a before c on the tie
        assert_eq!(entries[2].email, "a");
        assert_eq!(entries[3].email, "c");
    }

    #[test]
    fn new_profile_starts_with_zero_high_score() {
        let profile = UserProfile::new("dev@example.com", "Dev").with_avatar("https://img/dev");
        assert!(!profile.id.is_empty());
        assert_eq!(profile.high_score, 0);
        assert_eq!(profile.user_img.as_deref(), Some("https://img/dev"));
    }

    #[test]
    fn profile_serializes_with_client_field_names() {
        let profile = UserProfile::new("dev@example.com", "Dev");
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("userName").is_some());
        assert!(value.get("highScore").is_some());
        assert!(value.get("user_name").is_none());
    }
}
