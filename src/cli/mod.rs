//! Command-line interface.

pub mod commands;
pub mod display;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::LadderLevel;
use crate::services::{GenerationService, PlacementService};

/// Shared services handed to command handlers.
pub struct AppContext {
    pub placement: Arc<PlacementService>,
    pub generation: Arc<GenerationService>,
}

/// Adaptive English placement engine
#[derive(Parser)]
#[command(name = "levelset", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Acting user ID
    #[arg(long, global = true, env = "LEVELSET_USER")]
    pub user: Option<Uuid>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage placement sessions
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Manage leveled quizzes
    Quiz {
        #[command(subcommand)]
        command: QuizCommands,
    },
    /// Manage AI-generated full tests
    Test {
        #[command(subcommand)]
        command: TestCommands,
    },
    /// Show the placement ladder transition table
    Ladder,
}

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Start a new placement session
    Start,
    /// List the user's placement sessions
    List,
    /// Show session status
    Status { session_id: Uuid },
    /// Complete the current quiz round
    Complete { session_id: Uuid },
    /// Annul the session (proctoring violations)
    Annul { session_id: Uuid },
    /// Resolve a pending AI-test decision with the test's score
    Resolve { session_id: Uuid, score: f64 },
}

#[derive(Subcommand)]
pub enum QuizCommands {
    /// Generate a leveled quiz for the session
    Generate {
        session_id: Uuid,
        level: LadderLevel,
    },
    /// List the session's questions grouped by category
    Questions { session_id: Uuid },
    /// Submit an answer to a question
    Answer {
        session_id: Uuid,
        question_id: Uuid,
        answer: String,
    },
}

#[derive(Subcommand)]
pub enum TestCommands {
    /// Generate the full four-section test
    Generate {
        session_id: Uuid,
        level: LadderLevel,
    },
    /// Poll generation status
    Status {
        session_id: Uuid,
        level: LadderLevel,
    },
    /// Show section and overall scores
    Score { session_id: Uuid },
}

impl Cli {
    fn require_user(&self) -> Result<Uuid> {
        match self.user {
            Some(user) => Ok(user),
            None => bail!("this command requires --user <uuid> (or LEVELSET_USER)"),
        }
    }
}

/// Dispatch a parsed CLI invocation to its handler.
pub async fn dispatch(cli: &Cli, ctx: &AppContext) -> Result<()> {
    match &cli.command {
        Commands::Session { command } => match command {
            SessionCommands::Start => {
                let user = cli.user.unwrap_or_else(Uuid::new_v4);
                commands::session::handle_start(ctx, user, cli.json).await
            }
            SessionCommands::List => {
                commands::session::handle_list(ctx, cli.require_user()?, cli.json).await
            }
            SessionCommands::Status { session_id } => {
                commands::session::handle_status(ctx, *session_id, cli.require_user()?, cli.json)
                    .await
            }
            SessionCommands::Complete { session_id } => {
                commands::session::handle_complete(ctx, *session_id, cli.require_user()?, cli.json)
                    .await
            }
            SessionCommands::Annul { session_id } => {
                commands::session::handle_annul(ctx, *session_id, cli.require_user()?, cli.json)
                    .await
            }
            SessionCommands::Resolve { session_id, score } => {
                commands::session::handle_resolve(
                    ctx,
                    *session_id,
                    cli.require_user()?,
                    *score,
                    cli.json,
                )
                .await
            }
        },
        Commands::Quiz { command } => match command {
            QuizCommands::Generate { session_id, level } => {
                commands::quiz::handle_generate(
                    ctx,
                    *session_id,
                    cli.require_user()?,
                    *level,
                    cli.json,
                )
                .await
            }
            QuizCommands::Questions { session_id } => {
                commands::quiz::handle_questions(ctx, *session_id, cli.require_user()?, cli.json)
                    .await
            }
            QuizCommands::Answer {
                session_id,
                question_id,
                answer,
            } => {
                commands::quiz::handle_answer(
                    ctx,
                    *session_id,
                    cli.require_user()?,
                    *question_id,
                    answer.clone(),
                    cli.json,
                )
                .await
            }
        },
        Commands::Test { command } => match command {
            TestCommands::Generate { session_id, level } => {
                commands::test::handle_generate(
                    ctx,
                    *session_id,
                    cli.require_user()?,
                    *level,
                    cli.json,
                )
                .await
            }
            TestCommands::Status { session_id, level } => {
                commands::test::handle_status(
                    ctx,
                    *session_id,
                    cli.require_user()?,
                    *level,
                    cli.json,
                )
                .await
            }
            TestCommands::Score { session_id } => {
                commands::test::handle_score(ctx, *session_id, cli.require_user()?, cli.json).await
            }
        },
        Commands::Ladder => {
            println!("{}", display::ladder_table());
            Ok(())
        }
    }
}
