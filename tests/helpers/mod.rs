//! Shared fixtures for integration tests.

use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use levelset::adapters::memory::{
    ChannelJobQueue, MemoryCache, MemoryGeneratedQuestionRepository, MemoryQuestionSource,
    MemoryQuizRepository, MemorySessionRepository, MockProvider, MockSpeech,
};
use levelset::domain::models::{
    GenerationConfig, GenerationJob, LadderLevel, PlacementSession,
};
use levelset::domain::ports::{GeneratedQuestionRepository, SessionRepository};
use levelset::services::{CompletionReport, GenerationService, PlacementService};

/// Everything a placement flow test needs, with memory adapters exposed for
/// assertions.
pub struct PlacementFixture {
    pub service: PlacementService,
    pub sessions: Arc<MemorySessionRepository>,
    pub quizzes: Arc<MemoryQuizRepository>,
    pub source: Arc<MemoryQuestionSource>,
    pub user_id: Uuid,
}

pub async fn placement_fixture() -> PlacementFixture {
    let sessions = Arc::new(MemorySessionRepository::new());
    let quizzes = Arc::new(MemoryQuizRepository::new());
    let source = Arc::new(MemoryQuestionSource::new());

    for level in LadderLevel::ALL {
        source.seed_standard(level, 10).await;
    }

    let service = PlacementService::new(
        sessions.clone(),
        quizzes.clone(),
        source.clone(),
        10,
    );

    PlacementFixture {
        service,
        sessions,
        quizzes,
        source,
        user_id: Uuid::new_v4(),
    }
}

impl PlacementFixture {
    /// Answer `correct` questions correctly and the rest wrong, then
    /// complete the round. Seeded questions all expect answer "b".
    pub async fn answer_and_complete(&self, session_id: Uuid, correct: usize) -> CompletionReport {
        let bundle = self
            .service
            .questions(session_id, self.user_id)
            .await
            .unwrap();
        let all: Vec<_> = bundle
            .grammar
            .iter()
            .chain(&bundle.vocabulary)
            .chain(&bundle.reading)
            .collect();

        for (i, entry) in all.iter().enumerate() {
            let answer = if i < correct { "b" } else { "z" };
            self.service
                .submit_answer(session_id, self.user_id, entry.id, answer)
                .await
                .unwrap();
        }

        self.service
            .complete_session(session_id, self.user_id)
            .await
            .unwrap()
    }
}

/// Knobs for building a generation fixture.
pub struct GenerationFixtureOptions {
    pub config: GenerationConfig,
    /// Replace the working speech synthesizer with an always-failing one.
    pub failing_speech: bool,
    /// Replace the in-memory question store, e.g. with a failing stub.
    pub questions_override: Option<Arc<dyn GeneratedQuestionRepository>>,
}

impl Default for GenerationFixtureOptions {
    fn default() -> Self {
        Self {
            config: fast_config(),
            failing_speech: false,
            questions_override: None,
        }
    }
}

/// Coordination settings with a deadline long enough for fast mock calls.
pub fn fast_config() -> GenerationConfig {
    GenerationConfig {
        deadline_secs: 5,
        lock_ttl_secs: 30,
        cache_ttl_secs: 60,
        estimated_wait: "2-5 minutes".to_string(),
    }
}

/// Everything a generation coordinator test needs.
pub struct GenerationFixture {
    pub service: Arc<GenerationService>,
    pub sessions: Arc<MemorySessionRepository>,
    pub questions: Arc<MemoryGeneratedQuestionRepository>,
    pub provider: Arc<MockProvider>,
    pub cache: Arc<MemoryCache>,
    pub queue: Arc<ChannelJobQueue>,
    pub receiver: Option<mpsc::UnboundedReceiver<GenerationJob>>,
    pub user_id: Uuid,
}

pub async fn generation_fixture(config: GenerationConfig) -> GenerationFixture {
    generation_fixture_opts(GenerationFixtureOptions {
        config,
        ..Default::default()
    })
    .await
}

pub async fn generation_fixture_opts(options: GenerationFixtureOptions) -> GenerationFixture {
    let sessions = Arc::new(MemorySessionRepository::new());
    let questions = Arc::new(MemoryGeneratedQuestionRepository::new());
    let provider = Arc::new(MockProvider::new());
    let cache = Arc::new(MemoryCache::new());
    let (queue, receiver) = ChannelJobQueue::new();
    let queue = Arc::new(queue);

    let questions_port: Arc<dyn GeneratedQuestionRepository> = match options.questions_override {
        Some(repo) => repo,
        None => questions.clone(),
    };
    let speech = if options.failing_speech {
        Arc::new(MockSpeech::failing())
    } else {
        Arc::new(MockSpeech::new())
    };

    let service = Arc::new(GenerationService::new(
        sessions.clone(),
        questions_port,
        provider.clone(),
        speech,
        cache.clone(),
        queue.clone(),
        options.config,
    ));

    GenerationFixture {
        service,
        sessions,
        questions,
        provider,
        cache,
        queue,
        receiver: Some(receiver),
        user_id: Uuid::new_v4(),
    }
}

impl GenerationFixture {
    /// Create a placement session directly in the store.
    pub async fn seed_session(&self) -> Uuid {
        let session = PlacementSession::new(self.user_id);
        let id = session.id;
        self.sessions.create(&session).await.unwrap();
        id
    }

    /// Load a session straight from the store.
    pub async fn stored_session(&self, id: Uuid) -> PlacementSession {
        self.sessions.get(id).await.unwrap().unwrap()
    }
}
