use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use mentions_input_engine::EditSelection;
use mentions_input_engine::text::{char_len, splice};
mod common;

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");
    group.sample_size(20);

    let engine = common::engine();
    let value = common::generate_markup(200);
    let plain = engine.plain_text(&value);
    let end = char_len(&plain);

    group.bench_function("type_at_end", |b| {
        let typed = format!("{plain}x");
        b.iter(|| {
            black_box(engine.reconcile(
                black_box(&value),
                &typed,
                EditSelection::caret(end, end + 1),
            ))
        });
    });

    group.bench_function("type_in_middle", |b| {
        let middle = end / 2;
        let typed = splice(&plain, middle, middle, "x");
        b.iter(|| {
            black_box(engine.reconcile(
                black_box(&value),
                &typed,
                EditSelection::caret(middle, middle + 1),
            ))
        });
    });

    group.bench_function("delete_first_mention", |b| {
        // "Message 0 for " is 14 chars, so 15 is inside the first display.
        let deleted = splice(&plain, 15, 16, "");
        b.iter(|| {
            black_box(engine.reconcile(
                black_box(&value),
                &deleted,
                EditSelection::caret(16, 15),
            ))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_reconcile);
criterion_main!(benches);
