//! In-memory repository adapters.
//!
//! Used by tests and local development; behavior mirrors the SQLite
//! adapters. The session repository counts writes so tests can assert the
//! idempotence contract ("no additional writes") directly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{GeneratedQuestion, LeveledQuiz, PlacementSession, SectionKind};
use crate::domain::ports::{GeneratedQuestionRepository, QuizRepository, SessionRepository};

/// In-memory `SessionRepository`.
#[derive(Default)]
pub struct MemorySessionRepository {
    sessions: RwLock<HashMap<Uuid, PlacementSession>>,
    writes: AtomicUsize,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total create/update calls, for write-count assertions in tests.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn create(&self, session: &PlacementSession) -> DomainResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<PlacementSession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(&id).cloned())
    }

    async fn update(&self, session: &PlacementSession) -> DomainResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(&session.id) {
            return Err(DomainError::SessionNotFound(session.id));
        }
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<PlacementSession>> {
        let sessions = self.sessions.read().await;
        let mut result: Vec<PlacementSession> = sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }
}

/// In-memory `QuizRepository`.
#[derive(Default)]
pub struct MemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<Uuid, LeveledQuiz>>>,
}

impl MemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizRepository for MemoryQuizRepository {
    async fn replace_for_session(
        &self,
        session_id: Uuid,
        quizzes: &[LeveledQuiz],
    ) -> DomainResult<()> {
        let mut store = self.quizzes.write().await;
        store.retain(|_, q| q.session_id != session_id);
        for quiz in quizzes {
            store.insert(quiz.id, quiz.clone());
        }
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<LeveledQuiz>> {
        let store = self.quizzes.read().await;
        Ok(store.get(&id).cloned())
    }

    async fn list_for_session(&self, session_id: Uuid) -> DomainResult<Vec<LeveledQuiz>> {
        let store = self.quizzes.read().await;
        let mut result: Vec<LeveledQuiz> = store
            .values()
            .filter(|q| q.session_id == session_id)
            .cloned()
            .collect();
        result.sort_by_key(|q| q.order_index);
        Ok(result)
    }

    async fn record_answer(
        &self,
        id: Uuid,
        answer: &str,
        is_correct: bool,
        answered_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let mut store = self.quizzes.write().await;
        let quiz = store.get_mut(&id).ok_or(DomainError::QuestionNotFound(id))?;
        quiz.user_answer = Some(answer.to_string());
        quiz.is_correct = Some(is_correct);
        quiz.answered_at = Some(answered_at);
        Ok(())
    }
}

/// In-memory `GeneratedQuestionRepository`.
#[derive(Default)]
pub struct MemoryGeneratedQuestionRepository {
    questions: Arc<RwLock<HashMap<Uuid, GeneratedQuestion>>>,
}

impl MemoryGeneratedQuestionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GeneratedQuestionRepository for MemoryGeneratedQuestionRepository {
    async fn insert_many(&self, questions: &[GeneratedQuestion]) -> DomainResult<()> {
        let mut store = self.questions.write().await;
        for question in questions {
            store.insert(question.id, question.clone());
        }
        Ok(())
    }

    async fn list_for_session(
        &self,
        session_id: Uuid,
        kind: Option<SectionKind>,
    ) -> DomainResult<Vec<GeneratedQuestion>> {
        let store = self.questions.read().await;
        let mut result: Vec<GeneratedQuestion> = store
            .values()
            .filter(|q| q.session_id == session_id && kind.is_none_or(|k| q.kind == k))
            .cloned()
            .collect();
        result.sort_by_key(|q| (q.kind.as_str(), q.number));
        Ok(result)
    }

    async fn record_score(
        &self,
        id: Uuid,
        user_answer: &str,
        score: f64,
        feedback: Option<&str>,
    ) -> DomainResult<()> {
        let mut store = self.questions.write().await;
        let question = store.get_mut(&id).ok_or(DomainError::QuestionNotFound(id))?;
        question.user_answer = Some(user_answer.to_string());
        question.score = Some(score);
        question.feedback = feedback.map(str::to_string);
        Ok(())
    }
}
