use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use render_probe::{Composer, Root, Scope, State};

pub struct Row;
pub struct Cell;

fn app(s: Scope<Root>, rows: State<usize>) {
    s.render_counter("Table");
    for i in 0..rows.get() {
        s.key(i, move |s| {
            s.component(move |s: Scope<Row>| {
                s.render_counter(format!("Row {i}"));
                s.memo(i, |s: Scope<Cell>| {
                    s.render_counter("Cell");
                });
            });
        });
    }
}

fn run_app(count: usize) {
    let mut recomposer = Composer::compose_with(app, move || count);
    recomposer.recompose_with(count / 2);
    recomposer.recompose_with(count);
}

fn criterion_benchmark(c: &mut Criterion) {
    for count in [100, 1000, 5000, 10000] {
        c.bench_function(&format!("bench {}", count), |b| {
            b.iter(|| run_app(black_box(count)))
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
