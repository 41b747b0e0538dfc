use criterion::{black_box, criterion_group, criterion_main, Criterion};

use levelset::domain::models::LadderLevel;
use levelset::services::ladder::next_action;

fn bench_next_action(c: &mut Criterion) {
    c.bench_function("next_action_full_table", |b| {
        b.iter(|| {
            for level in LadderLevel::ALL {
                for passed in [true, false] {
                    black_box(next_action(black_box(level), black_box(passed)));
                }
            }
        });
    });
}

criterion_group!(benches, bench_next_action);
criterion_main!(benches);
