//! Placement session lifecycle service.
//!
//! Coordinates session creation, leveled quiz generation, answer submission,
//! and completion through the repository ports. Completion feeds the score
//! into the ladder state machine and records the resulting decision on the
//! session; completing an already-completed session replays the recorded
//! decision without recomputation.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AnswerOutcome, CefrLevel, LadderLevel, LeveledQuiz, NextAction, PlacementSession,
    QuizCategory, SessionStatus,
};
use crate::domain::ports::{QuestionSource, QuizRepository, SessionRepository};
use crate::services::ladder;
use crate::services::scoring::{self, ScoreReport};

/// Summary returned by leveled quiz generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizPlan {
    pub session_id: Uuid,
    pub level: LadderLevel,
    pub total_questions: usize,
    pub grammar_count: usize,
    pub vocabulary_count: usize,
    pub reading_count: usize,
}

/// One question as presented to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizEntry {
    pub id: Uuid,
    pub order_index: u32,
    pub data: serde_json::Value,
}

/// Session questions grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizBundle {
    pub grammar: Vec<QuizEntry>,
    pub vocabulary: Vec<QuizEntry>,
    pub reading: Vec<QuizEntry>,
}

/// Outcome of completing a placement round.
///
/// Deliberately excludes the per-category breakdown so that replaying the
/// completion of an already-completed session can return the identical
/// report from stored fields alone; use [`PlacementService::score_breakdown`]
/// for the category stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionReport {
    pub session_id: Uuid,
    pub score_percentage: f64,
    pub passed: bool,
    pub current_level: LadderLevel,
    pub next_action: NextAction,
    pub determined_level: Option<CefrLevel>,
}

/// Service for the adaptive placement session lifecycle.
pub struct PlacementService {
    sessions: Arc<dyn SessionRepository>,
    quizzes: Arc<dyn QuizRepository>,
    source: Arc<dyn QuestionSource>,
    per_category: usize,
}

impl PlacementService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        quizzes: Arc<dyn QuizRepository>,
        source: Arc<dyn QuestionSource>,
        per_category: usize,
    ) -> Self {
        Self {
            sessions,
            quizzes,
            source,
            per_category,
        }
    }

    /// Start a new placement session for a user.
    #[instrument(skip(self), err)]
    pub async fn start_session(&self, user_id: Uuid) -> DomainResult<PlacementSession> {
        let session = PlacementSession::new(user_id);
        self.sessions.create(&session).await?;
        info!(session_id = %session.id, %user_id, "placement session started");
        Ok(session)
    }

    /// All sessions belonging to a user, newest first.
    pub async fn sessions_for_user(
        &self,
        user_id: Uuid,
    ) -> DomainResult<Vec<PlacementSession>> {
        self.sessions.list_for_user(user_id).await
    }

    /// Fetch a session, enforcing ownership.
    pub async fn owned_session(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<PlacementSession> {
        let session = self
            .sessions
            .get(session_id)
            .await?
            .ok_or(DomainError::SessionNotFound(session_id))?;
        if session.user_id != user_id {
            return Err(DomainError::NotSessionOwner {
                session_id,
                user_id,
            });
        }
        Ok(session)
    }

    /// Generate a leveled quiz for the session, replacing any prior quizzes.
    ///
    /// Loads up to `per_category` questions for each category from the
    /// question bank. Reading files carry passages with nested questions;
    /// these are flattened so every quiz row is one gradable question that
    /// retains its passage text. Ordering indices are dense across the whole
    /// set.
    #[instrument(skip(self), err)]
    pub async fn generate_level_quiz(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        level: LadderLevel,
    ) -> DomainResult<QuizPlan> {
        let mut session = self.owned_session(session_id, user_id).await?;
        // A completed round may only be followed by a new quiz when the
        // recorded decision was to continue up the ladder.
        let resumable = match session.status {
            SessionStatus::InProgress | SessionStatus::Ready => true,
            SessionStatus::Completed => {
                matches!(session.next_action, Some(NextAction::ContinueTest { .. }))
            }
            _ => false,
        };
        if !resumable {
            return Err(DomainError::InvalidStatus {
                operation: "generate a quiz for".to_string(),
                status: session.status.to_string(),
            });
        }

        let grammar = self
            .source
            .load_questions(level, QuizCategory::Grammar)
            .await?;
        let vocabulary = self
            .source
            .load_questions(level, QuizCategory::Vocabulary)
            .await?;
        let reading = self
            .source
            .load_questions(level, QuizCategory::Reading)
            .await?;

        let mut quizzes: Vec<LeveledQuiz> = Vec::new();
        let mut order: u32 = 0;

        let mut grammar_count = 0;
        for question in grammar.into_iter().take(self.per_category) {
            order += 1;
            quizzes.push(LeveledQuiz::new(
                session_id,
                QuizCategory::Grammar,
                question,
                order,
            ));
            grammar_count += 1;
        }

        let mut vocabulary_count = 0;
        for question in vocabulary.into_iter().take(self.per_category) {
            order += 1;
            quizzes.push(LeveledQuiz::new(
                session_id,
                QuizCategory::Vocabulary,
                question,
                order,
            ));
            vocabulary_count += 1;
        }

        let mut reading_count = 0;
        'passages: for passage in reading {
            let text = passage
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let Some(nested) = passage.get("questions").and_then(|v| v.as_array()) else {
                continue;
            };
            for question in nested {
                if reading_count >= self.per_category {
                    break 'passages;
                }
                order += 1;
                quizzes.push(LeveledQuiz::new(
                    session_id,
                    QuizCategory::Reading,
                    serde_json::json!({"text": text, "question": question}),
                    order,
                ));
                reading_count += 1;
            }
        }

        self.quizzes
            .replace_for_session(session_id, &quizzes)
            .await?;

        session.current_level = level;
        session.status = SessionStatus::Ready;
        self.sessions.update(&session).await?;

        info!(
            %session_id,
            %level,
            total = quizzes.len(),
            "leveled quiz generated"
        );

        Ok(QuizPlan {
            session_id,
            level,
            total_questions: quizzes.len(),
            grammar_count,
            vocabulary_count,
            reading_count,
        })
    }

    /// All questions of the session's current quiz, grouped by category.
    pub async fn questions(&self, session_id: Uuid, user_id: Uuid) -> DomainResult<QuizBundle> {
        self.owned_session(session_id, user_id).await?;
        let quizzes = self.quizzes.list_for_session(session_id).await?;

        let mut bundle = QuizBundle::default();
        for quiz in quizzes {
            let entry = QuizEntry {
                id: quiz.id,
                order_index: quiz.order_index,
                data: quiz.question,
            };
            match quiz.category {
                QuizCategory::Grammar => bundle.grammar.push(entry),
                QuizCategory::Vocabulary => bundle.vocabulary.push(entry),
                QuizCategory::Reading => bundle.reading.push(entry),
            }
        }
        Ok(bundle)
    }

    /// Submit an answer to a quiz question, overwriting any prior answer.
    ///
    /// Allowed while the session is non-terminal; once a session has
    /// completed (or been annulled) its recorded answers are frozen.
    #[instrument(skip(self, answer), fields(answer_len = answer.len()), err)]
    pub async fn submit_answer(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        question_id: Uuid,
        answer: &str,
    ) -> DomainResult<AnswerOutcome> {
        let session = self.owned_session(session_id, user_id).await?;
        if session.status.is_terminal() {
            return Err(DomainError::InvalidStatus {
                operation: "submit an answer to".to_string(),
                status: session.status.to_string(),
            });
        }

        let quiz = self
            .quizzes
            .get(question_id)
            .await?
            .filter(|q| q.session_id == session_id)
            .ok_or(DomainError::QuestionNotFound(question_id))?;

        let was_updated = quiz.user_answer.is_some();
        if was_updated {
            warn!(%question_id, "answer overwritten");
        }

        let correct_answer = quiz.correct_answer().map(str::to_string);
        let is_correct = correct_answer.as_deref() == Some(answer);

        self.quizzes
            .record_answer(question_id, answer, is_correct, Utc::now())
            .await?;

        Ok(AnswerOutcome {
            is_correct,
            correct_answer,
            was_updated,
        })
    }

    /// Complete the current quiz round: tally the score, run the ladder
    /// state machine, and record the decision on the session.
    ///
    /// Idempotent: completing an already-completed session replays the
    /// recorded report without recomputing the score or re-triggering any
    /// downstream work.
    #[instrument(skip(self), err)]
    pub async fn complete_session(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<CompletionReport> {
        let mut session = self.owned_session(session_id, user_id).await?;

        if session.status == SessionStatus::Completed {
            info!(%session_id, "session already completed; returning recorded result");
            return Self::replay_report(&session);
        }

        if !matches!(
            session.status,
            SessionStatus::InProgress | SessionStatus::Ready
        ) {
            return Err(DomainError::InvalidStatus {
                operation: "complete".to_string(),
                status: session.status.to_string(),
            });
        }

        let quizzes = self.quizzes.list_for_session(session_id).await?;
        let report = scoring::tally(&quizzes);

        let action = ladder::next_action(session.current_level, report.passed);
        session.record_completion(report.score_percentage, action);
        self.sessions.update(&session).await?;

        info!(
            %session_id,
            score = report.score_percentage,
            passed = report.passed,
            ?action,
            "placement round completed"
        );

        Ok(CompletionReport {
            session_id,
            score_percentage: report.score_percentage,
            passed: report.passed,
            current_level: session.current_level,
            next_action: action,
            determined_level: session.determined_level,
        })
    }

    /// Per-category breakdown of the session's current quiz round.
    pub async fn score_breakdown(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<ScoreReport> {
        self.owned_session(session_id, user_id).await?;
        let quizzes = self.quizzes.list_for_session(session_id).await?;
        Ok(scoring::tally(&quizzes))
    }

    /// Resolve a pending AI-test decision with the generated test's score.
    ///
    /// The session must have concluded with an `AiTest` action; the score is
    /// mapped through the recorded outcome table at the pass threshold.
    #[instrument(skip(self), err)]
    pub async fn resolve_ai_outcome(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        score_percentage: f64,
    ) -> DomainResult<CefrLevel> {
        let mut session = self.owned_session(session_id, user_id).await?;

        let Some(NextAction::AiTest { outcomes, .. }) = session.next_action else {
            return Err(DomainError::InvalidStatus {
                operation: "resolve an AI test for".to_string(),
                status: session.status.to_string(),
            });
        };

        let level = outcomes.resolve(scoring::passes(score_percentage));
        session.resolve_determined_level(level);
        self.sessions.update(&session).await?;

        info!(%session_id, score = score_percentage, %level, "AI test outcome resolved");
        Ok(level)
    }

    /// Annul the session, e.g. after repeated proctoring violations.
    #[instrument(skip(self), err)]
    pub async fn annul_session(&self, session_id: Uuid, user_id: Uuid) -> DomainResult<()> {
        let mut session = self.owned_session(session_id, user_id).await?;
        if session.status.is_terminal() {
            return Err(DomainError::InvalidStatus {
                operation: "annul".to_string(),
                status: session.status.to_string(),
            });
        }
        session.annul();
        self.sessions.update(&session).await?;
        warn!(%session_id, "placement session annulled");
        Ok(())
    }

    fn replay_report(session: &PlacementSession) -> DomainResult<CompletionReport> {
        let action = session.next_action.ok_or_else(|| {
            DomainError::ValidationFailed(format!(
                "completed session {} has no recorded next action",
                session.id
            ))
        })?;
        let score = session.score_percentage.unwrap_or(0.0);
        Ok(CompletionReport {
            session_id: session.id,
            score_percentage: score,
            passed: scoring::passes(score),
            current_level: session.current_level,
            next_action: action,
            determined_level: session.determined_level,
        })
    }
}
