//! Levelset CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::warn;

use levelset::adapters::fs::FsQuestionSource;
use levelset::adapters::memory::{ChannelJobQueue, MemoryCache, MockProvider, MockSpeech};
use levelset::adapters::sqlite::{
    all_migrations, create_pool, Migrator, PoolConfig, SqliteGeneratedQuestionRepository,
    SqliteQuizRepository, SqliteSessionRepository,
};
use levelset::cli::{dispatch, AppContext, Cli};
use levelset::domain::models::Config;
use levelset::domain::ports::{SpeechSynthesizer, TestProvider};
use levelset::infrastructure::config::ConfigLoader;
use levelset::infrastructure::logging::init_logging;
use levelset::infrastructure::provider::{FileSpeechSynthesizer, GenerationApiClient};
use levelset::services::{GenerationService, GenerationWorker, PlacementService};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load()?;
    let _log_guard = init_logging(&config.logging)?;

    let (ctx, queue, worker) = build_context(&config).await?;

    let result = dispatch(&cli, &ctx).await;

    // Closing the queue lets the worker drain any queued background
    // generation and stop before the process exits.
    queue.close();
    drop(ctx);
    worker.join();

    result
}

async fn build_context(
    config: &Config,
) -> Result<(AppContext, Arc<ChannelJobQueue>, GenerationWorker)> {
    let database_url = format!("sqlite://{}", config.database.path);
    let pool = create_pool(
        &database_url,
        Some(PoolConfig {
            max_connections: config.database.max_connections,
            ..Default::default()
        }),
    )
    .await
    .context("Failed to open database")?;

    Migrator::new(pool.clone())
        .run_embedded_migrations(all_migrations())
        .await
        .context("Failed to run database migrations")?;

    let sessions = Arc::new(SqliteSessionRepository::new(pool.clone()));
    let quizzes = Arc::new(SqliteQuizRepository::new(pool.clone()));
    let questions = Arc::new(SqliteGeneratedQuestionRepository::new(pool));
    let source = Arc::new(FsQuestionSource::new(&config.questions.path));
    let cache = Arc::new(MemoryCache::new());
    let (queue, receiver) = ChannelJobQueue::new();
    let queue = Arc::new(queue);

    let (provider, speech): (Arc<dyn TestProvider>, Arc<dyn SpeechSynthesizer>) =
        if config.provider.api_key.is_empty() {
            warn!("no provider API key configured; using the built-in mock provider");
            (Arc::new(MockProvider::new()), Arc::new(MockSpeech::new()))
        } else {
            let client = Arc::new(
                GenerationApiClient::new(&config.provider)
                    .context("Failed to build generation API client")?,
            );
            let speech = Arc::new(FileSpeechSynthesizer::new(
                Arc::clone(&client),
                &config.provider.audio_dir,
            ));
            (client, speech)
        };

    let sessions_port: Arc<dyn levelset::domain::ports::SessionRepository> =
        sessions.clone();
    let placement = Arc::new(PlacementService::new(
        sessions_port,
        quizzes,
        source,
        config.questions.per_category,
    ));
    let queue_port: Arc<dyn levelset::domain::ports::JobQueue> = queue.clone();
    let generation = Arc::new(GenerationService::new(
        sessions,
        questions,
        provider,
        speech,
        cache,
        queue_port,
        config.generation.clone(),
    ));

    let worker = GenerationWorker::spawn(Arc::clone(&generation), receiver)
        .context("Failed to spawn generation worker")?;

    Ok((
        AppContext {
            placement,
            generation,
        },
        queue,
        worker,
    ))
}
