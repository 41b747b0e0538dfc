//! Domain models for adaptive placement sessions.
//!
//! A placement session tracks one run of the adaptive level-finding flow for
//! one user: the current ladder level, the last computed score, the next
//! action decided by the ladder state machine, and the final CEFR level once
//! the session reaches a terminal state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::models::level::{CefrLevel, LadderLevel};

/// Placement session lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Session created, quizzes being answered.
    InProgress,
    /// A leveled quiz has been generated and is ready to take.
    Ready,
    /// A full AI test is being generated in the background.
    Generating,
    /// Placement concluded (a next action has been decided).
    Completed,
    /// Session voided, e.g. due to proctoring violations.
    Annulled,
    /// Generation failed permanently.
    Error,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Ready => "ready",
            SessionStatus::Generating => "generating",
            SessionStatus::Completed => "completed",
            SessionStatus::Annulled => "annulled",
            SessionStatus::Error => "error",
        }
    }

    /// Terminal statuses accept no further quiz activity.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Annulled)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(SessionStatus::InProgress),
            "ready" => Ok(SessionStatus::Ready),
            "generating" => Ok(SessionStatus::Generating),
            "completed" => Ok(SessionStatus::Completed),
            "annulled" => Ok(SessionStatus::Annulled),
            "error" => Ok(SessionStatus::Error),
            other => Err(DomainError::ValidationFailed(format!(
                "unknown session status: {other}"
            ))),
        }
    }
}

/// Pass/fail outcome table for a supplementary AI test.
///
/// Maps the generated test's pass/fail result (scored against the same 70%
/// threshold as the quizzes) to the final CEFR level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiOutcomes {
    pub pass: CefrLevel,
    pub fail: CefrLevel,
}

impl AiOutcomes {
    pub fn resolve(&self, passed: bool) -> CefrLevel {
        if passed {
            self.pass
        } else {
            self.fail
        }
    }
}

/// Next step decided by the ladder state machine after scoring a quiz.
///
/// Serialized with an `action` tag so the stored JSON matches the wire shape
/// callers see (`{"action": "set_level", "level": "A1"}` etc.).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NextAction {
    /// Terminal: placement concludes at the given CEFR level.
    SetLevel { level: CefrLevel },
    /// Non-terminal: regenerate a leveled quiz at the next ladder level.
    ContinueTest { next_level: LadderLevel },
    /// Terminal trigger: run a full AI-generated test at `level`; the test's
    /// pass/fail result resolves the final level through `outcomes`.
    AiTest {
        level: LadderLevel,
        outcomes: AiOutcomes,
    },
}

impl NextAction {
    /// Final level for actions that decide one immediately.
    pub fn determined_level(&self) -> Option<CefrLevel> {
        match self {
            NextAction::SetLevel { level } => Some(*level),
            NextAction::ContinueTest { .. } | NextAction::AiTest { .. } => None,
        }
    }
}

/// One run of the adaptive placement flow for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: SessionStatus,
    /// Ladder level of the current (or last generated) leveled quiz.
    pub current_level: LadderLevel,
    /// Score of the last completed quiz round, percent.
    pub score_percentage: Option<f64>,
    /// Decision recorded by the last completion, if any.
    pub next_action: Option<NextAction>,
    /// Final CEFR level; set once the placement outcome is resolved.
    pub determined_level: Option<CefrLevel>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl PlacementSession {
    /// Creates a new in-progress session starting at the bottom of the ladder.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            status: SessionStatus::InProgress,
            current_level: LadderLevel::PreIntermediate,
            score_percentage: None,
            next_action: None,
            determined_level: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Records the completion decision for the current quiz round.
    pub fn record_completion(&mut self, score_percentage: f64, action: NextAction) {
        self.status = SessionStatus::Completed;
        self.score_percentage = Some(score_percentage);
        self.next_action = Some(action);
        self.determined_level = action.determined_level();
        self.completed_at = Some(Utc::now());
    }

    /// Resolves a pending AI-test decision into a final level.
    pub fn resolve_determined_level(&mut self, level: CefrLevel) {
        self.determined_level = Some(level);
        self.completed_at = Some(Utc::now());
    }

    /// Marks the session annulled (e.g. proctoring violations).
    pub fn annul(&mut self) {
        self.status = SessionStatus::Annulled;
        self.completed_at = Some(Utc::now());
    }
}
