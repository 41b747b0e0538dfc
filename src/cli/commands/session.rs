use anyhow::{Context, Result};
use uuid::Uuid;

use crate::cli::display::session_table;
use crate::cli::AppContext;

/// Handle session start command
pub async fn handle_start(ctx: &AppContext, user_id: Uuid, json: bool) -> Result<()> {
    let session = ctx
        .placement
        .start_session(user_id)
        .await
        .context("Failed to start placement session")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        println!("Placement session started.");
        println!("  Session ID: {}", session.id);
        println!("  User: {}", session.user_id);
        println!("  Starting level: {}", session.current_level);
    }
    Ok(())
}

/// Handle session list command
pub async fn handle_list(ctx: &AppContext, user_id: Uuid, json: bool) -> Result<()> {
    let sessions = ctx
        .placement
        .sessions_for_user(user_id)
        .await
        .context("Failed to list sessions")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    let mut table = crate::cli::display::list_table(&["ID", "Status", "Level", "Score", "Result"]);
    for session in &sessions {
        table.add_row(vec![
            session.id.to_string(),
            session.status.to_string(),
            session.current_level.to_string(),
            session
                .score_percentage
                .map_or_else(|| "-".to_string(), |s| format!("{s:.1}%")),
            session
                .determined_level
                .map_or_else(|| "-".to_string(), |l| l.to_string()),
        ]);
    }
    println!("{table}");
    println!("\nShowing {} session(s)", sessions.len());
    Ok(())
}

/// Handle session status command
pub async fn handle_status(
    ctx: &AppContext,
    session_id: Uuid,
    user_id: Uuid,
    json: bool,
) -> Result<()> {
    let session = ctx
        .placement
        .owned_session(session_id, user_id)
        .await
        .context("Failed to load session")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        println!("{}", session_table(&session));
    }
    Ok(())
}

/// Handle session complete command
pub async fn handle_complete(
    ctx: &AppContext,
    session_id: Uuid,
    user_id: Uuid,
    json: bool,
) -> Result<()> {
    let report = ctx
        .placement
        .complete_session(session_id, user_id)
        .await
        .context("Failed to complete session")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Round completed at level {}.", report.current_level);
        println!(
            "  Score: {:.1}% ({})",
            report.score_percentage,
            if report.passed { "passed" } else { "failed" }
        );
        println!("  Next action: {:?}", report.next_action);
        if let Some(level) = report.determined_level {
            println!("  Determined level: {level}");
        }
    }
    Ok(())
}

/// Handle session annul command
pub async fn handle_annul(
    ctx: &AppContext,
    session_id: Uuid,
    user_id: Uuid,
    json: bool,
) -> Result<()> {
    ctx.placement
        .annul_session(session_id, user_id)
        .await
        .context("Failed to annul session")?;

    if json {
        println!(
            "{}",
            serde_json::json!({"session_id": session_id, "status": "annulled"})
        );
    } else {
        println!("Session {session_id} annulled.");
    }
    Ok(())
}

/// Handle session resolve command (AI-test outcome)
pub async fn handle_resolve(
    ctx: &AppContext,
    session_id: Uuid,
    user_id: Uuid,
    score: f64,
    json: bool,
) -> Result<()> {
    let level = ctx
        .placement
        .resolve_ai_outcome(session_id, user_id, score)
        .await
        .context("Failed to resolve AI test outcome")?;

    if json {
        println!(
            "{}",
            serde_json::json!({"session_id": session_id, "determined_level": level})
        );
    } else {
        println!("AI test scored {score:.1}%; determined level: {level}");
    }
    Ok(())
}
