//! Reflective question flow and the answers it captures.

use crate::content::Question;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Answers keyed by question text.
///
/// Grows for the whole session; a repeated question overwrites its answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerRecord(BTreeMap<String, String>);

impl AnswerRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the answer for `question`.
    pub fn upsert(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.0.insert(question.into(), answer.into());
    }

    pub fn get(&self, question: &str) -> Option<&str> {
        self.0.get(question).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(q, a)| (q.as_str(), a.as_str()))
    }
}

/// An answer the flow wants recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedAnswer {
    pub question: String,
    pub answer: String,
}

/// Steps through the questions one at a time.
#[derive(Debug, Clone)]
pub struct QuestionFlow {
    questions: Vec<Question>,
    current: usize,
    complete: bool,
}

impl QuestionFlow {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            complete: questions.is_empty(),
            questions,
            current: 0,
        }
    }

    /// The question being asked, or `None` once complete.
    pub fn current(&self) -> Option<&Question> {
        if self.complete {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    /// Zero-based position of the current question.
    pub fn position(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Submit the answer for the current question and move on.
    ///
    /// Blank answers advance without being captured. After the last
    /// question the flow is complete and further submissions are ignored.
    pub fn submit(&mut self, answer: &str) -> Option<CapturedAnswer> {
        let question = self.current()?.text.clone();
        let captured = (!answer.trim().is_empty()).then(|| CapturedAnswer {
            question,
            answer: answer.to_string(),
        });

        if self.current + 1 < self.questions.len() {
            self.current += 1;
        } else {
            self.complete = true;
        }
        captured
    }
}
