//! Full-test generation coordinator.
//!
//! Produces a four-section test (reading, listening, writing, speaking) for
//! a (session, level) pair through the provider port, with:
//!
//! - result caching keyed by `(session, level)` — complete tests only
//! - at-most-one-in-flight enforcement via the advisory lock
//! - a bounded interactive wait that falls back to a background job
//! - per-section soft failures that never abort sibling sections
//!
//! The advisory lock is released on every exit path: success, soft failure,
//! deadline fallback, and hard error.

use futures::future::join_all;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    GeneratedQuestion, GeneratedTest, GenerationConfig, GenerationJob, GenerationStatus,
    JobHandle, LadderLevel, PlacementSession, SectionData, SectionItem, SectionKind,
    SectionOutcome, SessionStatus, TestScore, PASS_THRESHOLD,
};
use crate::domain::ports::{
    Cache, GeneratedQuestionRepository, JobQueue, SessionRepository, SpeechSynthesizer,
    TestProvider,
};
use crate::services::advisory_lock::AdvisoryLock;

/// Coordinator for asynchronous AI-backed full-test generation.
pub struct GenerationService {
    sessions: Arc<dyn SessionRepository>,
    questions: Arc<dyn GeneratedQuestionRepository>,
    provider: Arc<dyn TestProvider>,
    speech: Arc<dyn SpeechSynthesizer>,
    cache: Arc<dyn Cache>,
    queue: Arc<dyn JobQueue>,
    lock: AdvisoryLock,
    config: GenerationConfig,
}

impl GenerationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        questions: Arc<dyn GeneratedQuestionRepository>,
        provider: Arc<dyn TestProvider>,
        speech: Arc<dyn SpeechSynthesizer>,
        cache: Arc<dyn Cache>,
        queue: Arc<dyn JobQueue>,
        config: GenerationConfig,
    ) -> Self {
        let lock = AdvisoryLock::new(Arc::clone(&cache), config.lock_ttl());
        Self {
            sessions,
            questions,
            provider,
            speech,
            cache,
            queue,
            lock,
            config,
        }
    }

    fn cache_key(session_id: Uuid, level: LadderLevel) -> String {
        format!("generated_test:{session_id}:{level}")
    }

    fn generating(&self, job: Option<JobHandle>) -> GenerationStatus {
        GenerationStatus::Generating {
            job,
            estimate: self.config.estimated_wait.clone(),
        }
    }

    /// Generate (or fetch) the full test for a (session, level) pair.
    ///
    /// Returns `Ready` with the combined result when the provider answers
    /// within the deadline (possibly with per-section failure markers), or
    /// `Generating` when the work is already in flight or has been handed to
    /// the background queue.
    #[instrument(skip(self), err)]
    pub async fn generate_full_test(
        &self,
        session_id: Uuid,
        level: LadderLevel,
    ) -> DomainResult<GenerationStatus> {
        self.session(session_id).await?;

        let cache_key = Self::cache_key(session_id, level);
        if let Some(test) = self.cached_test(&cache_key).await {
            info!(%session_id, %level, "returning cached generated test");
            return Ok(GenerationStatus::Ready(Box::new(test)));
        }

        if self.lock.is_held(session_id).await {
            info!(%session_id, "generation already in flight");
            return Ok(self.generating(None));
        }
        if !self.lock.acquire(session_id).await {
            return Ok(self.generating(None));
        }

        let outcome = self.run_interactive(session_id, level, &cache_key).await;
        if outcome.is_err() {
            // Hard failure: drop any partial cache entry, mark the session,
            // then release and propagate.
            if let Err(err) = self.cache.delete(&cache_key).await {
                warn!(%session_id, error = %err, "failed to invalidate cache entry");
            }
            self.mark_error(session_id).await;
        }
        self.lock.release(session_id).await;
        outcome
    }

    async fn run_interactive(
        &self,
        session_id: Uuid,
        level: LadderLevel,
        cache_key: &str,
    ) -> DomainResult<GenerationStatus> {
        match timeout(
            self.config.deadline(),
            self.generate_and_store(session_id, level),
        )
        .await
        {
            Ok(result) => {
                let test = result?;
                self.transition(session_id, SessionStatus::Ready).await?;
                self.cache_if_complete(cache_key, &test).await;
                Ok(GenerationStatus::Ready(Box::new(test)))
            }
            Err(_elapsed) => {
                warn!(%session_id, deadline_secs = self.config.deadline_secs,
                      "generation deadline exceeded; falling back to background job");
                let job = self
                    .queue
                    .enqueue(GenerationJob { session_id, level })
                    .await?;
                self.transition(session_id, SessionStatus::Generating)
                    .await?;
                Ok(self.generating(Some(job)))
            }
        }
    }

    /// Background entry point; re-enters the generation logic without the
    /// interactive deadline.
    #[instrument(skip(self), fields(session_id = %job.session_id, level = %job.level), err)]
    pub async fn run_background(&self, job: GenerationJob) -> DomainResult<()> {
        let cache_key = Self::cache_key(job.session_id, job.level);
        if self.cached_test(&cache_key).await.is_some() {
            info!("cached test already present; background job is a no-op");
            return Ok(());
        }
        if !self.lock.acquire(job.session_id).await {
            info!("another generation is in flight; skipping background job");
            return Ok(());
        }

        let result = async {
            let test = self.generate_and_store(job.session_id, job.level).await?;
            self.transition(job.session_id, SessionStatus::Ready).await?;
            self.cache_if_complete(&cache_key, &test).await;
            Ok(())
        }
        .await;

        if result.is_err() {
            if let Err(err) = self.cache.delete(&cache_key).await {
                warn!(error = %err, "failed to invalidate cache entry");
            }
            self.mark_error(job.session_id).await;
        }
        self.lock.release(job.session_id).await;
        result
    }

    /// Current generation state for a (session, level) pair.
    ///
    /// Callers poll this after receiving `Generating`.
    #[instrument(skip(self), err)]
    pub async fn generation_status(
        &self,
        session_id: Uuid,
        level: LadderLevel,
    ) -> DomainResult<GenerationStatus> {
        let session = self.session(session_id).await?;

        let cache_key = Self::cache_key(session_id, level);
        if let Some(test) = self.cached_test(&cache_key).await {
            return Ok(GenerationStatus::Ready(Box::new(test)));
        }
        if self.lock.is_held(session_id).await {
            return Ok(self.generating(None));
        }

        match session.status {
            SessionStatus::Generating => Ok(self.generating(None)),
            SessionStatus::Error => Ok(GenerationStatus::Error {
                reason: "test generation failed".to_string(),
            }),
            _ => match self.load_persisted(session_id, level).await? {
                Some(test) => Ok(GenerationStatus::Ready(Box::new(test))),
                None => Ok(GenerationStatus::NotStarted),
            },
        }
    }

    /// Per-section and overall averages over the persisted question scores.
    ///
    /// Unscored questions count as zero within their section; sections with
    /// no questions are excluded from the overall average.
    pub async fn score_generated_test(&self, session_id: Uuid) -> DomainResult<TestScore> {
        let questions = self.questions.list_for_session(session_id, None).await?;

        let mut by_kind: [(SectionKind, Option<f64>); 4] = [
            (SectionKind::Reading, None),
            (SectionKind::Listening, None),
            (SectionKind::Writing, None),
            (SectionKind::Speaking, None),
        ];
        for (kind, slot) in &mut by_kind {
            let in_section: Vec<&GeneratedQuestion> =
                questions.iter().filter(|q| q.kind == *kind).collect();
            if in_section.is_empty() {
                continue;
            }
            let total: f64 = in_section.iter().map(|q| q.score.unwrap_or(0.0)).sum();
            *slot = Some(total / in_section.len() as f64);
        }

        let present: Vec<f64> = by_kind.iter().filter_map(|(_, s)| *s).collect();
        let overall = if present.is_empty() {
            0.0
        } else {
            present.iter().sum::<f64>() / present.len() as f64
        };

        Ok(TestScore {
            reading: by_kind[0].1,
            listening: by_kind[1].1,
            writing: by_kind[2].1,
            speaking: by_kind[3].1,
            overall,
            passed: overall >= PASS_THRESHOLD,
        })
    }

    /// Record a user's evaluated answer to one generated question.
    pub async fn record_result(
        &self,
        question_id: Uuid,
        user_answer: &str,
        score: f64,
        feedback: Option<&str>,
    ) -> DomainResult<()> {
        self.questions
            .record_score(question_id, user_answer, score, feedback)
            .await
    }

    // ---- internals ----

    async fn session(&self, session_id: Uuid) -> DomainResult<PlacementSession> {
        self.sessions
            .get(session_id)
            .await?
            .ok_or(DomainError::SessionNotFound(session_id))
    }

    async fn transition(&self, session_id: Uuid, status: SessionStatus) -> DomainResult<()> {
        let mut session = self.session(session_id).await?;
        session.status = status;
        self.sessions.update(&session).await
    }

    async fn mark_error(&self, session_id: Uuid) {
        match self.sessions.get(session_id).await {
            Ok(Some(mut session)) => {
                session.status = SessionStatus::Error;
                if let Err(err) = self.sessions.update(&session).await {
                    error!(%session_id, error = %err, "failed to mark session as errored");
                }
            }
            Ok(None) => {}
            Err(err) => error!(%session_id, error = %err, "failed to load session for error marking"),
        }
    }

    async fn cached_test(&self, cache_key: &str) -> Option<GeneratedTest> {
        let value = match self.cache.get(cache_key).await {
            Ok(value) => value?,
            Err(err) => {
                warn!(error = %err, "cache read failed; treating as miss");
                return None;
            }
        };
        match serde_json::from_value::<GeneratedTest>(value) {
            Ok(test) if test.is_complete() => Some(test),
            Ok(_) | Err(_) => {
                // Stale or malformed entry; drop it so it cannot satisfy a
                // later lookup either.
                if let Err(err) = self.cache.delete(cache_key).await {
                    warn!(error = %err, "failed to drop stale cache entry");
                }
                None
            }
        }
    }

    async fn cache_if_complete(&self, cache_key: &str, test: &GeneratedTest) {
        if !test.is_complete() {
            info!("not caching partially failed test result");
            return;
        }
        match serde_json::to_value(test) {
            Ok(value) => {
                if let Err(err) = self
                    .cache
                    .set(cache_key, value, self.config.cache_ttl())
                    .await
                {
                    warn!(error = %err, "failed to cache generated test");
                }
            }
            Err(err) => warn!(error = %err, "failed to serialize generated test for caching"),
        }
    }

    /// Call the provider for all four sections in parallel and process each
    /// payload independently. Provider and validation problems become
    /// per-section failure markers; only storage problems are hard errors.
    async fn generate_and_store(
        &self,
        session_id: Uuid,
        level: LadderLevel,
    ) -> DomainResult<GeneratedTest> {
        let payloads = join_all(SectionKind::ALL.map(|kind| async move {
            (kind, self.provider.generate_section(kind, level).await)
        }))
        .await;

        let mut reading = SectionOutcome::failed("section not generated");
        let mut listening = SectionOutcome::failed("section not generated");
        let mut writing = SectionOutcome::failed("section not generated");
        let mut speaking = SectionOutcome::failed("section not generated");

        for (kind, payload) in payloads {
            let outcome = match payload {
                Ok(raw) => self.process_section(session_id, kind, &raw).await?,
                Err(err) => {
                    warn!(%session_id, %kind, error = %err, "provider call failed");
                    SectionOutcome::failed(format!("provider error: {err}"))
                }
            };
            match kind {
                SectionKind::Reading => reading = outcome,
                SectionKind::Listening => listening = outcome,
                SectionKind::Writing => writing = outcome,
                SectionKind::Speaking => speaking = outcome,
            }
        }

        Ok(GeneratedTest {
            session_id,
            level,
            reading,
            listening,
            writing,
            speaking,
        })
    }

    async fn process_section(
        &self,
        session_id: Uuid,
        kind: SectionKind,
        payload: &serde_json::Value,
    ) -> DomainResult<SectionOutcome> {
        // Providers sometimes deliver their own error object instead of
        // section content; pass it through as the failure reason.
        if let Some(err) = payload.get("error").and_then(|v| v.as_str()) {
            return Ok(SectionOutcome::failed(format!("provider error: {err}")));
        }

        let outcome = match kind {
            SectionKind::Reading => self.process_reading(session_id, payload).await,
            SectionKind::Listening => self.process_listening(session_id, payload).await,
            SectionKind::Writing => self.process_writing(session_id, payload).await,
            SectionKind::Speaking => self.process_speaking(session_id, payload).await,
        };

        match outcome {
            Ok(Ok(data)) => Ok(SectionOutcome::Ready(data)),
            Ok(Err(reason)) => {
                warn!(%session_id, %kind, %reason, "section payload rejected");
                Ok(SectionOutcome::failed(reason))
            }
            Err(err) => Err(err),
        }
    }

    // Each processor returns:
    //   Ok(Ok(data))    - section processed and persisted
    //   Ok(Err(reason)) - soft failure (malformed payload), kept as data
    //   Err(_)          - hard failure (storage), propagated

    async fn process_reading(
        &self,
        session_id: Uuid,
        payload: &serde_json::Value,
    ) -> DomainResult<Result<SectionData, String>> {
        let passage = payload
            .get("passage")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let Some(raw_questions) = payload.get("questions").and_then(|v| v.as_array()) else {
            return Ok(Err("missing field: questions".to_string()));
        };
        if raw_questions.is_empty() {
            return Ok(Err("no questions in payload".to_string()));
        }

        let mut records = Vec::with_capacity(raw_questions.len());
        for (i, raw) in raw_questions.iter().enumerate() {
            let number = i as u32 + 1;
            let Some(question) = raw.get("question").and_then(|v| v.as_str()) else {
                return Ok(Err(format!("question {number}: missing field: question")));
            };
            let Some(options) = raw.get("options") else {
                return Ok(Err(format!("question {number}: missing field: options")));
            };
            let Some(correct) = raw.get("correct_answer").and_then(|v| v.as_str()) else {
                return Ok(Err(format!(
                    "question {number}: missing field: correct_answer"
                )));
            };

            records.push(
                GeneratedQuestion::new(
                    session_id,
                    SectionKind::Reading,
                    number,
                    serde_json::json!({
                        "passage": passage,
                        "question": question,
                        "question_number": number,
                    }),
                )
                .with_options(options.clone())
                .with_correct_answer(correct),
            );
        }

        self.questions.insert_many(&records).await?;

        Ok(Ok(SectionData {
            kind: SectionKind::Reading,
            passage: Some(passage),
            items: records.iter().map(Self::project).collect(),
        }))
    }

    async fn process_listening(
        &self,
        session_id: Uuid,
        payload: &serde_json::Value,
    ) -> DomainResult<Result<SectionData, String>> {
        let Some(scenarios) = payload.get("scenarios").and_then(|v| v.as_array()) else {
            return Ok(Err("missing field: scenarios".to_string()));
        };
        if scenarios.is_empty() {
            return Ok(Err("no scenarios in payload".to_string()));
        }

        let mut records = Vec::with_capacity(scenarios.len());
        for (i, scenario) in scenarios.iter().enumerate() {
            let number = i as u32 + 1;
            let Some(script) = scenario.get("audio_script").and_then(|v| v.as_str()) else {
                return Ok(Err(format!(
                    "scenario {number}: missing field: audio_script"
                )));
            };
            let Some(question) = scenario.get("question").and_then(|v| v.as_str()) else {
                return Ok(Err(format!("scenario {number}: missing field: question")));
            };
            let Some(options) = scenario.get("options") else {
                return Ok(Err(format!("scenario {number}: missing field: options")));
            };
            let Some(correct) = scenario.get("correct_answer").and_then(|v| v.as_str()) else {
                return Ok(Err(format!(
                    "scenario {number}: missing field: correct_answer"
                )));
            };

            let audio_path = self
                .synthesize_soft(script, &format!("listening_{session_id}_{number}"))
                .await;

            records.push(
                GeneratedQuestion::new(
                    session_id,
                    SectionKind::Listening,
                    number,
                    serde_json::json!({
                        "audio_script": script,
                        "audio_path": audio_path,
                        "question": question,
                        "scenario_number": number,
                    }),
                )
                .with_options(options.clone())
                .with_correct_answer(correct)
                .with_audio_path(audio_path),
            );
        }

        self.questions.insert_many(&records).await?;

        Ok(Ok(SectionData {
            kind: SectionKind::Listening,
            passage: None,
            items: records.iter().map(Self::project).collect(),
        }))
    }

    async fn process_writing(
        &self,
        session_id: Uuid,
        payload: &serde_json::Value,
    ) -> DomainResult<Result<SectionData, String>> {
        let Some(prompts) = payload.get("prompts").and_then(|v| v.as_array()) else {
            return Ok(Err("missing field: prompts".to_string()));
        };
        if prompts.is_empty() {
            return Ok(Err("no prompts in payload".to_string()));
        }

        let mut records = Vec::with_capacity(prompts.len());
        for (i, prompt) in prompts.iter().enumerate() {
            let number = i as u32 + 1;
            for field in ["title", "prompt", "instructions"] {
                if prompt.get(field).and_then(|v| v.as_str()).is_none() {
                    return Ok(Err(format!("prompt {number}: missing field: {field}")));
                }
            }

            let mut content = prompt.clone();
            content["prompt_number"] = serde_json::json!(number);
            records.push(GeneratedQuestion::new(
                session_id,
                SectionKind::Writing,
                number,
                content,
            ));
        }

        self.questions.insert_many(&records).await?;

        Ok(Ok(SectionData {
            kind: SectionKind::Writing,
            passage: None,
            items: records.iter().map(Self::project).collect(),
        }))
    }

    async fn process_speaking(
        &self,
        session_id: Uuid,
        payload: &serde_json::Value,
    ) -> DomainResult<Result<SectionData, String>> {
        let Some(questions) = payload.get("questions").and_then(|v| v.as_array()) else {
            return Ok(Err("missing field: questions".to_string()));
        };
        if questions.is_empty() {
            return Ok(Err("no questions in payload".to_string()));
        }

        let mut records = Vec::with_capacity(questions.len());
        for (i, raw) in questions.iter().enumerate() {
            let number = i as u32 + 1;
            let Some(question) = raw.get("question").and_then(|v| v.as_str()) else {
                return Ok(Err(format!("question {number}: missing field: question")));
            };
            let follow_up = raw.get("follow_up").and_then(|v| v.as_str()).unwrap_or("");

            let script = format!("{question} {follow_up}");
            let audio_path = self
                .synthesize_soft(script.trim(), &format!("speaking_{session_id}_{number}"))
                .await;

            let mut content = raw.clone();
            content["audio_path"] = serde_json::json!(audio_path);
            content["question_number"] = serde_json::json!(number);
            records.push(
                GeneratedQuestion::new(session_id, SectionKind::Speaking, number, content)
                    .with_audio_path(audio_path),
            );
        }

        self.questions.insert_many(&records).await?;

        Ok(Ok(SectionData {
            kind: SectionKind::Speaking,
            passage: None,
            items: records.iter().map(Self::project).collect(),
        }))
    }

    /// Speech synthesis may fail without failing the section; the item then
    /// carries a null audio reference.
    async fn synthesize_soft(&self, script: &str, file_stem: &str) -> Option<String> {
        match self.speech.synthesize(script, file_stem).await {
            Ok(path) => Some(path),
            Err(err) => {
                warn!(file_stem, error = %err, "speech synthesis failed; item keeps null audio");
                None
            }
        }
    }

    fn project(question: &GeneratedQuestion) -> SectionItem {
        SectionItem {
            id: question.id,
            number: question.number,
            content: question.content.clone(),
            options: question.options.clone(),
            audio_path: question.audio_path.clone(),
        }
    }

    /// Rebuild the client-facing test from persisted question records, for
    /// status queries after the cache entry has expired.
    async fn load_persisted(
        &self,
        session_id: Uuid,
        level: LadderLevel,
    ) -> DomainResult<Option<GeneratedTest>> {
        let questions = self.questions.list_for_session(session_id, None).await?;
        if questions.is_empty() {
            return Ok(None);
        }

        let section = |kind: SectionKind| -> SectionOutcome {
            let items: Vec<SectionItem> = questions
                .iter()
                .filter(|q| q.kind == kind)
                .map(Self::project)
                .collect();
            if items.is_empty() {
                return SectionOutcome::failed("section unavailable");
            }
            let passage = (kind == SectionKind::Reading)
                .then(|| {
                    items[0]
                        .content
                        .get("passage")
                        .and_then(|v| v.as_str())
                        .map(str::to_string)
                })
                .flatten();
            SectionOutcome::Ready(SectionData {
                kind,
                passage,
                items,
            })
        };

        Ok(Some(GeneratedTest {
            session_id,
            level,
            reading: section(SectionKind::Reading),
            listening: section(SectionKind::Listening),
            writing: section(SectionKind::Writing),
            speaking: section(SectionKind::Speaking),
        }))
    }
}
