use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use uuid::Uuid;

use levelset::domain::models::{LeveledQuiz, QuizCategory};
use levelset::services::scoring::tally;

fn quizzes(count: usize) -> Vec<LeveledQuiz> {
    (0..count)
        .map(|i| {
            let category = match i % 3 {
                0 => QuizCategory::Grammar,
                1 => QuizCategory::Vocabulary,
                _ => QuizCategory::Reading,
            };
            let mut quiz = LeveledQuiz::new(
                Uuid::nil(),
                category,
                json!({"question": "q", "correct_answer": "a"}),
                i as u32 + 1,
            );
            quiz.is_correct = Some(i % 2 == 0);
            quiz
        })
        .collect()
}

fn bench_tally(c: &mut Criterion) {
    let set = quizzes(30);
    c.bench_function("tally_30_questions", |b| {
        b.iter(|| black_box(tally(black_box(&set))));
    });
}

criterion_group!(benches, bench_tally);
criterion_main!(benches);
