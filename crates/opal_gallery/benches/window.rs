use criterion::{black_box, criterion_group, criterion_main, Criterion};
use opal_gallery::window::{self, Direction};

fn bench_recompute_shift(c: &mut Criterion) {
    c.bench_function("recompute_shift/sweep_500", |b| {
        b.iter(|| {
            let mut acc = 0isize;
            for active in 0..black_box(500usize) {
                acc += window::recompute_shift(500, 7, active);
            }
            acc
        })
    });
}

fn bench_step_chain(c: &mut Criterion) {
    c.bench_function("step/forward_chain_500", |b| {
        b.iter(|| {
            let mut shift = 0isize;
            for _ in 0..black_box(500usize) {
                shift = window::step(shift, Direction::Forward, 500, 7);
            }
            shift
        })
    });
}

fn bench_visibility_scan(c: &mut Criterion) {
    c.bench_function("is_index_visible/scan_500", |b| {
        b.iter(|| {
            let shift = window::recompute_shift(500, 7, 250);
            (0..black_box(500usize))
                .filter(|&i| window::is_index_visible(i, shift, 7))
                .count()
        })
    });
}

criterion_group!(
    benches,
    bench_recompute_shift,
    bench_step_chain,
    bench_visibility_scan
);
criterion_main!(benches);
