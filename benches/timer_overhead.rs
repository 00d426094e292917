/// Region timing overhead benchmarks
///
/// Measures the cost of the hot start/stop path and of building reports
/// over trees of increasing size.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use timetree::{TimeUnit, TimerRegistry};

/// Benchmark: start + stop of an existing top-level region
///
/// Target: <1μs
fn bench_start_stop(c: &mut Criterion) {
    let mut timer = TimerRegistry::new();
    timer.start_recording("hot").unwrap();
    timer.stop_recording("hot").unwrap();

    c.bench_function("start_stop_top_level", |b| {
        b.iter(|| {
            timer.start_recording(black_box("hot")).unwrap();
            black_box(timer.stop_recording(black_box("hot")).unwrap());
        });
    });
}

/// Benchmark: start + stop of a nested region (parent lookup included)
fn bench_start_stop_nested(c: &mut Criterion) {
    let mut timer = TimerRegistry::new();
    timer.start_recording("outer").unwrap();
    timer.start_child("inner", "outer").unwrap();
    timer.stop_recording("inner").unwrap();

    c.bench_function("start_stop_nested", |b| {
        b.iter(|| {
            timer.start_child(black_box("inner"), black_box("outer")).unwrap();
            black_box(timer.stop_recording(black_box("inner")).unwrap());
        });
    });
}

/// Build a tree where every region has `fanout` children, `depth` levels deep
fn build_tree(fanout: usize, depth: usize) -> TimerRegistry {
    let mut timer = TimerRegistry::new();
    let mut level = vec!["n".to_string()];
    timer.start_recording("n").unwrap();
    timer.stop_recording("n").unwrap();

    for _ in 1..depth {
        let mut next = Vec::with_capacity(level.len() * fanout);
        for parent in &level {
            for i in 0..fanout {
                let name = format!("{}.{}", parent, i);
                timer
                    .start_child_with_unit(&name, parent, TimeUnit::Microseconds)
                    .unwrap();
                timer.stop_recording(&name).unwrap();
                next.push(name);
            }
        }
        level = next;
    }
    timer
}

/// Benchmark: full report rendering over growing trees
fn bench_report_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_all");

    for depth in [2, 3, 4, 5] {
        let timer = build_tree(4, depth);
        group.bench_with_input(BenchmarkId::from_parameter(timer.len()), &timer, |b, timer| {
            b.iter(|| black_box(timer.report_all().to_string()));
        });
    }

    group.finish();
}

/// Benchmark: erase and rebuild of a subtree
fn bench_erase_subtree(c: &mut Criterion) {
    c.bench_function("erase_subtree_85_nodes", |b| {
        b.iter_with_setup(
            || build_tree(4, 4),
            |mut timer| {
                timer.erase(black_box("n")).unwrap();
                black_box(timer.len());
            },
        );
    });
}

criterion_group!(
    benches,
    bench_start_stop,
    bench_start_stop_nested,
    bench_report_all,
    bench_erase_subtree
);
criterion_main!(benches);
