use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::models::{Question, QuizMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    NoData,
    Answering,
    Revealed,
    Complete,
}

/// Drives one run of fetched questions from first render to the results
/// screen. The session never touches the network; callers feed it reshaped
/// questions and user input.
#[derive(Debug)]
pub struct QuizSession {
    questions: Vec<Question>,
    mode: QuizMode,
    phase: QuizPhase,
    current: usize,
    score: u32,
    selected: Option<String>,
    last_correct: Option<bool>,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>, mode: QuizMode) -> Self {
        let phase = if questions.is_empty() {
            QuizPhase::NoData
        } else {
            QuizPhase::Answering
        };
        Self {
            questions,
            mode,
            phase,
            current: 0,
            score: 0,
            selected: None,
            last_correct: None,
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            QuizPhase::Answering | QuizPhase::Revealed => self.questions.get(self.current),
            QuizPhase::NoData | QuizPhase::Complete => None,
        }
    }

    pub fn question_number(&self) -> usize {
        self.current + 1
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn selected_answer(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn last_answer_correct(&self) -> Option<bool> {
        self.last_correct
    }

    /// One selection per question; anything after the first is ignored.
    pub fn select_answer(&mut self, answer_id: &str) -> Option<bool> {
        if self.phase != QuizPhase::Answering {
            return None;
        }
        let correct = self.questions[self.current].is_correct(answer_id);
        self.selected = Some(answer_id.to_string());
        self.last_correct = Some(correct);
        if correct {
            self.score += 1;
        }
        self.phase = QuizPhase::Revealed;
        Some(correct)
    }

    /// Moves to the next question, or completes the run when the current
    /// question was the last one. Advancing works with or without a
    /// selection, so skipping a question is allowed.
    pub fn advance(&mut self) -> QuizPhase {
        match self.phase {
            QuizPhase::Answering | QuizPhase::Revealed => {
                if self.current + 1 < self.questions.len() {
                    self.current += 1;
                    self.selected = None;
                    self.last_correct = None;
                    self.phase = QuizPhase::Answering;
                } else {
                    self.phase = QuizPhase::Complete;
                }
            }
            QuizPhase::NoData | QuizPhase::Complete => {}
        }
        self.phase
    }

    /// Only timed modes end on expiry; untimed sessions ignore the signal.
    pub fn expire_timer(&mut self) -> QuizPhase {
        if self.mode.timer().is_some()
            && matches!(self.phase, QuizPhase::Answering | QuizPhase::Revealed)
        {
            self.phase = QuizPhase::Complete;
        }
        self.phase
    }
}

/// The score only travels to the backend when it beats the cached best.
pub fn should_submit_score(final_score: u32, previous_high: u32) -> bool {
    final_score > previous_high
}

/// Second-resolution countdown running on its own task. Observers watch the
/// remaining seconds through the channel; dropping the timer stops it.
#[derive(Debug)]
pub struct QuizTimer {
    remaining: watch::Receiver<u32>,
    task: JoinHandle<()>,
}

impl QuizTimer {
    pub fn start(seconds: u32) -> Self {
        let (tx, remaining) = watch::channel(seconds);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // the first tick completes immediately
            interval.tick().await;
            let mut left = seconds;
            while left > 0 {
                interval.tick().await;
                left -= 1;
                if tx.send(left).is_err() {
                    return;
                }
            }
        });
        Self { remaining, task }
    }

    pub fn for_mode(mode: QuizMode) -> Option<Self> {
        mode.timer().map(|limit| Self::start(limit.as_secs() as u32))
    }

    pub fn remaining(&self) -> u32 {
        *self.remaining.borrow()
    }

    pub fn expired(&self) -> bool {
        self.remaining() == 0
    }

    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.remaining.clone()
    }
}

impl Drop for QuizTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
