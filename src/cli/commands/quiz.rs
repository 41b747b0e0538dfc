use anyhow::{Context, Result};
use uuid::Uuid;

use crate::cli::display::list_table;
use crate::cli::AppContext;
use crate::domain::models::LadderLevel;
use crate::services::QuizBundle;

/// Handle quiz generate command
pub async fn handle_generate(
    ctx: &AppContext,
    session_id: Uuid,
    user_id: Uuid,
    level: LadderLevel,
    json: bool,
) -> Result<()> {
    let plan = ctx
        .placement
        .generate_level_quiz(session_id, user_id, level)
        .await
        .context("Failed to generate leveled quiz")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        println!("Quiz generated at level {}.", plan.level);
        println!(
            "  {} questions (grammar {}, vocabulary {}, reading {})",
            plan.total_questions, plan.grammar_count, plan.vocabulary_count, plan.reading_count
        );
    }
    Ok(())
}

/// Handle quiz questions command
pub async fn handle_questions(
    ctx: &AppContext,
    session_id: Uuid,
    user_id: Uuid,
    json: bool,
) -> Result<()> {
    let bundle = ctx
        .placement
        .questions(session_id, user_id)
        .await
        .context("Failed to load questions")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
    } else {
        print_bundle(&bundle);
    }
    Ok(())
}

fn print_bundle(bundle: &QuizBundle) {
    let mut table = list_table(&["#", "Category", "ID", "Question"]);
    for (category, entries) in [
        ("grammar", &bundle.grammar),
        ("vocabulary", &bundle.vocabulary),
        ("reading", &bundle.reading),
    ] {
        for entry in entries {
            let question = entry
                .data
                .get("question")
                .map(|q| match q {
                    serde_json::Value::String(s) => s.clone(),
                    other => other
                        .get("question")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string(),
                })
                .unwrap_or_default();
            table.add_row(vec![
                entry.order_index.to_string(),
                category.to_string(),
                entry.id.to_string(),
                question,
            ]);
        }
    }
    println!("{table}");
}

/// Handle quiz answer command
pub async fn handle_answer(
    ctx: &AppContext,
    session_id: Uuid,
    user_id: Uuid,
    question_id: Uuid,
    answer: String,
    json: bool,
) -> Result<()> {
    let outcome = ctx
        .placement
        .submit_answer(session_id, user_id, question_id, &answer)
        .await
        .context("Failed to submit answer")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        if outcome.is_correct {
            println!("Correct.");
        } else {
            println!(
                "Incorrect. Expected: {}",
                outcome.correct_answer.as_deref().unwrap_or("-")
            );
        }
        if outcome.was_updated {
            println!("  (previous answer overwritten)");
        }
    }
    Ok(())
}
