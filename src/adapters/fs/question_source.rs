//! Filesystem question bank adapter.
//!
//! Questions live under `<root>/<category>/<level>/questions.json`, each
//! file holding a JSON array of question payloads. A missing file means the
//! bank has no questions for that (level, category), which is not an error.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::warn;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{LadderLevel, QuizCategory};
use crate::domain::ports::QuestionSource;

/// `QuestionSource` reading JSON files from a directory tree.
pub struct FsQuestionSource {
    root: PathBuf,
}

impl FsQuestionSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn file_path(&self, level: LadderLevel, category: QuizCategory) -> PathBuf {
        self.root
            .join(category.as_str())
            .join(level.as_str())
            .join("questions.json")
    }
}

#[async_trait]
impl QuestionSource for FsQuestionSource {
    async fn load_questions(
        &self,
        level: LadderLevel,
        category: QuizCategory,
    ) -> DomainResult<Vec<serde_json::Value>> {
        let path = self.file_path(level, category);

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "question file missing; returning empty set");
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(DomainError::ValidationFailed(format!(
                    "failed to read question file {}: {err}",
                    path.display()
                )))
            }
        };

        let questions: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_loads_questions_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let file_dir = dir.path().join("grammar").join("intermediate");
        std::fs::create_dir_all(&file_dir).unwrap();
        std::fs::write(
            file_dir.join("questions.json"),
            r#"[{"question": "q1", "correct_answer": "a"}]"#,
        )
        .unwrap();

        let source = FsQuestionSource::new(dir.path());
        let questions = source
            .load_questions(LadderLevel::Intermediate, QuizCategory::Grammar)
            .await
            .unwrap();

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0]["question"], "q1");
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsQuestionSource::new(dir.path());

        let questions = source
            .load_questions(LadderLevel::Advanced, QuizCategory::Reading)
            .await
            .unwrap();
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file_dir = dir.path().join("vocabulary").join("advanced");
        std::fs::create_dir_all(&file_dir).unwrap();
        std::fs::write(file_dir.join("questions.json"), "not json").unwrap();

        let source = FsQuestionSource::new(dir.path());
        let err = source
            .load_questions(LadderLevel::Advanced, QuizCategory::Vocabulary)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SerializationError(_)));
    }
}
