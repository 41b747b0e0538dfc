//! Mock generation provider for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::models::{LadderLevel, SectionKind};
use crate::domain::ports::{ProviderError, SpeechSynthesizer, TestProvider};

/// Mock response configuration for one section.
#[derive(Debug, Clone)]
pub struct MockSection {
    /// Payload returned on success.
    pub payload: serde_json::Value,
    /// Whether to simulate a provider failure.
    pub fail: bool,
    /// Error message if failing.
    pub error_message: Option<String>,
    /// Simulated latency before answering.
    pub delay: Duration,
}

impl MockSection {
    pub fn success(payload: serde_json::Value) -> Self {
        Self {
            payload,
            fail: false,
            error_message: None,
            delay: Duration::ZERO,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            payload: serde_json::Value::Null,
            fail: true,
            error_message: Some(error.into()),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Default section payloads, valid per the section processors.
pub fn default_payload(kind: SectionKind) -> serde_json::Value {
    match kind {
        SectionKind::Reading => serde_json::json!({
            "passage": "The city library reopened last month after a long renovation.",
            "questions": [
                {
                    "question": "Why was the library closed?",
                    "options": ["A fire", "A renovation", "A strike", "A flood"],
                    "correct_answer": "A renovation"
                },
                {
                    "question": "When did it reopen?",
                    "options": ["Last week", "Last month", "Last year", "Yesterday"],
                    "correct_answer": "Last month"
                }
            ]
        }),
        SectionKind::Listening => serde_json::json!({
            "scenarios": [
                {
                    "audio_script": "Good morning. The next train to Leeds departs from platform four.",
                    "question": "Which platform does the train leave from?",
                    "options": ["Two", "Three", "Four", "Five"],
                    "correct_answer": "Four"
                }
            ]
        }),
        SectionKind::Writing => serde_json::json!({
            "prompts": [
                {
                    "title": "A Memorable Journey",
                    "prompt": "Describe a journey you will never forget.",
                    "instructions": "Write a structured essay with an introduction and a conclusion.",
                    "word_count": 250,
                    "time_limit": 40,
                    "evaluation_criteria": ["coherence", "grammar", "vocabulary"]
                }
            ]
        }),
        SectionKind::Speaking => serde_json::json!({
            "questions": [
                {
                    "question": "Tell me about your hometown.",
                    "follow_up": "What would you change about it?"
                }
            ]
        }),
    }
}

/// Mock `TestProvider` with per-section response overrides and an invocation
/// counter for dedup assertions.
pub struct MockProvider {
    overrides: Arc<RwLock<HashMap<SectionKind, MockSection>>>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            overrides: Arc::new(RwLock::new(HashMap::new())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Set a specific response for a section kind.
    pub async fn set_section(&self, kind: SectionKind, section: MockSection) {
        let mut overrides = self.overrides.write().await;
        overrides.insert(kind, section);
    }

    /// Apply the same latency to all four sections.
    pub async fn set_delay(&self, delay: Duration) {
        let mut overrides = self.overrides.write().await;
        for kind in SectionKind::ALL {
            let entry = overrides
                .entry(kind)
                .or_insert_with(|| MockSection::success(default_payload(kind)));
            entry.delay = delay;
        }
    }

    /// Number of `generate_section` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TestProvider for MockProvider {
    async fn generate_section(
        &self,
        kind: SectionKind,
        _level: LadderLevel,
    ) -> Result<serde_json::Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let section = {
            let overrides = self.overrides.read().await;
            overrides
                .get(&kind)
                .cloned()
                .unwrap_or_else(|| MockSection::success(default_payload(kind)))
        };

        if !section.delay.is_zero() {
            tokio::time::sleep(section.delay).await;
        }

        if section.fail {
            return Err(ProviderError::Failed(
                section
                    .error_message
                    .unwrap_or_else(|| "mock failure".to_string()),
            ));
        }
        Ok(section.payload)
    }
}

/// Mock `SpeechSynthesizer` returning deterministic paths without touching
/// the filesystem.
#[derive(Default)]
pub struct MockSpeech {
    fail: bool,
}

impl MockSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeech {
    async fn synthesize(&self, _script: &str, file_stem: &str) -> Result<String, ProviderError> {
        if self.fail {
            return Err(ProviderError::Failed("mock synthesis failure".to_string()));
        }
        Ok(format!("audio/{file_stem}.mp3"))
    }
}
