//! Models for AI-generated full tests.
//!
//! A full test has four sections (reading, listening, writing, speaking).
//! Sections are processed independently: a failed section is captured as a
//! `SectionOutcome::Failed` marker next to its usable siblings rather than
//! aborting the whole test.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::models::level::LadderLevel;

/// One of the four test skill sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Reading,
    Listening,
    Writing,
    Speaking,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Reading,
        SectionKind::Listening,
        SectionKind::Writing,
        SectionKind::Speaking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Reading => "reading",
            SectionKind::Listening => "listening",
            SectionKind::Writing => "writing",
            SectionKind::Speaking => "speaking",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reading" => Ok(SectionKind::Reading),
            "listening" => Ok(SectionKind::Listening),
            "writing" => Ok(SectionKind::Writing),
            "speaking" => Ok(SectionKind::Speaking),
            other => Err(DomainError::ValidationFailed(format!(
                "unknown section kind: {other}"
            ))),
        }
    }
}

/// Durable record of one generated test question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub id: Uuid,
    pub session_id: Uuid,
    pub kind: SectionKind,
    /// Position within the section, 1-based.
    pub number: u32,
    /// Section-specific content (question text, prompt, audio script, ...).
    pub content: serde_json::Value,
    pub options: Option<serde_json::Value>,
    pub correct_answer: Option<String>,
    pub user_answer: Option<String>,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub audio_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GeneratedQuestion {
    pub fn new(
        session_id: Uuid,
        kind: SectionKind,
        number: u32,
        content: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            kind,
            number,
            content,
            options: None,
            correct_answer: None,
            user_answer: None,
            score: None,
            feedback: None,
            audio_path: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_options(mut self, options: serde_json::Value) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_correct_answer(mut self, answer: impl Into<String>) -> Self {
        self.correct_answer = Some(answer.into());
        self
    }

    pub fn with_audio_path(mut self, path: Option<String>) -> Self {
        self.audio_path = path;
        self
    }
}

/// Client-facing projection of one generated item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionItem {
    pub id: Uuid,
    pub number: u32,
    pub content: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<String>,
}

/// Successfully processed section content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionData {
    pub kind: SectionKind,
    /// Shared reading passage, present for the reading section only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passage: Option<String>,
    pub items: Vec<SectionItem>,
}

/// Per-section result: content, or an error marker kept as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionOutcome {
    Ready(SectionData),
    Failed { reason: String },
}

impl SectionOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        SectionOutcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SectionOutcome::Failed { .. })
    }
}

/// Combined output of one full-test generation for a (session, level) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTest {
    pub session_id: Uuid,
    pub level: LadderLevel,
    pub reading: SectionOutcome,
    pub listening: SectionOutcome,
    pub writing: SectionOutcome,
    pub speaking: SectionOutcome,
}

impl GeneratedTest {
    pub fn sections(&self) -> [(SectionKind, &SectionOutcome); 4] {
        [
            (SectionKind::Reading, &self.reading),
            (SectionKind::Listening, &self.listening),
            (SectionKind::Writing, &self.writing),
            (SectionKind::Speaking, &self.speaking),
        ]
    }

    /// True when no section carries an error marker. Only complete tests are
    /// eligible for caching; partial results force regeneration on retry.
    pub fn is_complete(&self) -> bool {
        !self.sections().iter().any(|(_, s)| s.is_failed())
    }

    /// Reasons of all failed sections, for caller-facing diagnostics.
    pub fn failures(&self) -> Vec<(SectionKind, &str)> {
        self.sections()
            .iter()
            .filter_map(|(kind, outcome)| match outcome {
                SectionOutcome::Failed { reason } => Some((*kind, reason.as_str())),
                SectionOutcome::Ready(_) => None,
            })
            .collect()
    }
}

/// Handle to a queued background generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub id: Uuid,
}

/// Work item for the background generation queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationJob {
    pub session_id: Uuid,
    pub level: LadderLevel,
}

/// Caller-facing generation state for a (session, level) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationStatus {
    NotStarted,
    Generating {
        #[serde(skip_serializing_if = "Option::is_none")]
        job: Option<JobHandle>,
        estimate: String,
    },
    Ready(Box<GeneratedTest>),
    Error {
        reason: String,
    },
}

/// Per-section and overall averages for a completed generated test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestScore {
    pub reading: Option<f64>,
    pub listening: Option<f64>,
    pub writing: Option<f64>,
    pub speaking: Option<f64>,
    pub overall: f64,
    pub passed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ready_section(kind: SectionKind) -> SectionOutcome {
        SectionOutcome::Ready(SectionData {
            kind,
            passage: None,
            items: vec![SectionItem {
                id: Uuid::new_v4(),
                number: 1,
                content: json!({"question": "q"}),
                options: None,
                audio_path: None,
            }],
        })
    }

    fn full_test() -> GeneratedTest {
        GeneratedTest {
            session_id: Uuid::new_v4(),
            level: LadderLevel::Intermediate,
            reading: ready_section(SectionKind::Reading),
            listening: ready_section(SectionKind::Listening),
            writing: ready_section(SectionKind::Writing),
            speaking: ready_section(SectionKind::Speaking),
        }
    }

    #[test]
    fn test_complete_when_all_sections_ready() {
        assert!(full_test().is_complete());
        assert!(full_test().failures().is_empty());
    }

    #[test]
    fn test_one_failed_section_marks_test_incomplete() {
        let mut test = full_test();
        test.listening = SectionOutcome::failed("no scenarios in payload");

        assert!(!test.is_complete());
        let failures = test.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, SectionKind::Listening);
    }

    #[test]
    fn test_generation_status_json_shape() {
        let status = GenerationStatus::Generating {
            job: Some(JobHandle { id: Uuid::nil() }),
            estimate: "2-5 minutes".to_string(),
        };
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["status"], "generating");
        assert_eq!(value["estimate"], "2-5 minutes");

        let not_started = serde_json::to_value(GenerationStatus::NotStarted).unwrap();
        assert_eq!(not_started["status"], "not_started");
    }

    #[test]
    fn test_section_outcome_round_trip() {
        let outcome = SectionOutcome::failed("missing field: questions");
        let json = serde_json::to_string(&outcome).unwrap();
        let back: SectionOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(outcome, back);
    }
}
