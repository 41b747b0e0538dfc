//! In-memory question source for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::errors::DomainResult;
use crate::domain::models::{LadderLevel, QuizCategory};
use crate::domain::ports::QuestionSource;

/// `QuestionSource` backed by a seeded map.
#[derive(Default)]
pub struct MemoryQuestionSource {
    questions: RwLock<HashMap<(LadderLevel, QuizCategory), Vec<serde_json::Value>>>,
}

impl MemoryQuestionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed questions for a (level, category) pair.
    pub async fn seed(
        &self,
        level: LadderLevel,
        category: QuizCategory,
        questions: Vec<serde_json::Value>,
    ) {
        let mut store = self.questions.write().await;
        store.insert((level, category), questions);
    }

    /// Seed `count` standard multiple-choice questions for every category at
    /// the given level. Grammar and vocabulary get flat payloads; reading
    /// gets one passage carrying all `count` nested questions. The correct
    /// answer is always `"b"`.
    pub async fn seed_standard(&self, level: LadderLevel, count: usize) {
        for category in [QuizCategory::Grammar, QuizCategory::Vocabulary] {
            let questions = (0..count)
                .map(|i| {
                    serde_json::json!({
                        "question": format!("{category} question {i} ({level})"),
                        "options": ["a", "b", "c", "d"],
                        "correct_answer": "b"
                    })
                })
                .collect();
            self.seed(level, category, questions).await;
        }

        let nested: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "question": format!("reading question {i} ({level})"),
                    "options": ["a", "b", "c", "d"],
                    "correct_answer": "b"
                })
            })
            .collect();
        self.seed(
            level,
            QuizCategory::Reading,
            vec![serde_json::json!({
                "text": format!("A passage at {level}."),
                "questions": nested
            })],
        )
        .await;
    }
}

#[async_trait]
impl QuestionSource for MemoryQuestionSource {
    async fn load_questions(
        &self,
        level: LadderLevel,
        category: QuizCategory,
    ) -> DomainResult<Vec<serde_json::Value>> {
        let store = self.questions.read().await;
        Ok(store.get(&(level, category)).cloned().unwrap_or_default())
    }
}
