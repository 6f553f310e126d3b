// Benchmarks for layout computation under each built-in engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::{Duration, Instant};
use strato_bench::scenario::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use strato_bench::{builtin_loaders, detect_adapters, LayoutDirection, ScenarioRegistry};

// Only successful layout calls are timed; trees are built and released outside them.
fn bench_scenarios(c: &mut Criterion) {
    let registry = ScenarioRegistry::builtin();
    let mut adapters = detect_adapters(&builtin_loaders());

    let mut group = c.benchmark_group("layout");
    for scenario in &registry {
        for adapter in adapters.iter_mut() {
            let id = BenchmarkId::new(scenario.name.as_str(), adapter.id().as_str());
            group.bench_function(id, |b| {
                b.iter_custom(|iters| {
                    let mut total = Duration::ZERO;
                    for _ in 0..iters {
                        let Ok(root) = scenario.build(adapter.as_mut()) else {
                            continue;
                        };
                        let start = Instant::now();
                        let outcome = black_box(adapter.compute_layout(
                            root,
                            VIEWPORT_WIDTH,
                            VIEWPORT_HEIGHT,
                            LayoutDirection::Ltr,
                        ));
                        let elapsed = start.elapsed();
                        if outcome.is_ok() {
                            total += elapsed;
                        }
                        adapter
                            .release(root)
                            .expect("scenario tree should release cleanly");
                    }
                    total
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_scenarios);
criterion_main!(benches);
