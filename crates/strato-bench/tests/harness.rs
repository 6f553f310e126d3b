//! End-to-end behavior of the benchmark harness

use pretty_assertions::assert_eq;
use strato_bench::prelude::*;
use strato_bench::{
    AdapterError, AdapterId, AdapterLoader, JsonReport, LayoutDirection, ManualClock,
    ProbeAdapter, TimedExecutor,
};

fn manual_runner(iterations: usize, warmup: usize, clock: &ManualClock) -> BenchmarkRunner<ManualClock> {
    BenchmarkRunner::with_executor(
        BenchConfig::new(iterations, warmup),
        TimedExecutor::with_clock(clock.clone()),
    )
}

/// Probe whose every layout call takes exactly `ms` on `clock`
fn fixed_duration_probe(id: &str, clock: &ManualClock, ms: f64) -> Box<dyn LayoutAdapter> {
    let clock = clock.clone();
    Box::new(ProbeAdapter::new(id).with_layout_hook(move |_| {
        clock.advance(ms);
        Ok(())
    }))
}

#[test]
fn fixed_duration_collapses_all_statistics() {
    let clock = ManualClock::new();
    let registry = ScenarioRegistry::builtin();
    let mut adapters = vec![fixed_duration_probe("stub", &clock, 1.5)];

    let table = manual_runner(100, 10, &clock)
        .run_all(&registry, &mut adapters)
        .unwrap();

    for scenario in &registry {
        let summary = table.get("stub", &scenario.name).unwrap();
        assert_eq!(
            *summary,
            StatSummary {
                average: 1.5,
                median: 1.5,
                min: 1.5,
                max: 1.5,
                p95: 1.5,
                p99: 1.5,
                samples: 100,
            },
            "summary for {}",
            scenario.name
        );
    }
}

#[test]
fn recorded_duration_sequence_matches_index_rules() {
    let clock = ManualClock::new();
    let ticking = clock.clone();
    let mut probe = ProbeAdapter::new("stub").with_layout_hook(move |call| {
        ticking.advance((call % 5 + 1) as f64);
        Ok(())
    });
    let registry = ScenarioRegistry::builtin();
    let simple = registry.get("Simple").unwrap();
    let executor = TimedExecutor::with_clock(clock);

    let batch = executor.run_iterations(simple, &mut probe, 5).unwrap();
    assert_eq!(batch.samples, vec![1.0, 2.0, 3.0, 4.0, 5.0]);

    let summary = summarize(&batch.samples).unwrap();
    assert_eq!(summary.min, 1.0);
    assert_eq!(summary.max, 5.0);
    assert_eq!(summary.median, 3.0);
    assert_eq!(summary.average, 3.0);
    assert_eq!(summary.p95, 5.0);
    assert_eq!(summary.p99, 5.0);
}

#[test]
fn scenario_builds_are_structurally_identical() {
    let mut probe = ProbeAdapter::new("probe");

    for scenario in &ScenarioRegistry::builtin() {
        let first = scenario.build(&mut probe).unwrap();
        let second = scenario.build(&mut probe).unwrap();
        assert_ne!(first, second);

        let a = probe.snapshot(first).unwrap();
        let b = probe.snapshot(second).unwrap();
        assert_eq!(a.len(), scenario.expected_node_count);
        assert_eq!(a, b, "structure of {}", scenario.name);
    }
}

#[test]
fn compare_emits_one_row_per_complete_scenario() {
    let clock = ManualClock::new();
    let registry = ScenarioRegistry::builtin();
    let mut adapters = vec![
        fixed_duration_probe("a", &clock, 1.0),
        fixed_duration_probe("b", &clock, 2.0),
    ];

    let table = manual_runner(3, 1, &clock)
        .run_all(&registry, &mut adapters)
        .unwrap();
    let rows = compare(&table, &registry);

    assert_eq!(rows.len(), registry.len());
    let names: Vec<_> = rows.iter().map(|r| r.scenario_name.as_str()).collect();
    assert_eq!(names, registry.names());
    for row in &rows {
        assert_eq!(row.time_a, 1.0);
        assert_eq!(row.time_b, 2.0);
        assert_eq!(row.speedup_ratio, Some(2.0));
    }
}

#[test]
fn compare_skips_scenario_missing_from_one_adapter() {
    let clock = ManualClock::new();
    let registry = ScenarioRegistry::builtin();

    // 3 measured + 1 warmup layout calls per scenario; from the fourth
    // scenario on, every call fails.
    let ticking = clock.clone();
    let failing_late = ProbeAdapter::new("b").with_layout_hook(move |call| {
        if call >= 12 {
            return Err(AdapterError::Engine("solver diverged".into()));
        }
        ticking.advance(1.0);
        Ok(())
    });
    let mut adapters = vec![
        fixed_duration_probe("a", &clock, 1.0),
        Box::new(failing_late) as Box<dyn LayoutAdapter>,
    ];

    let table = manual_runner(3, 1, &clock)
        .run_all(&registry, &mut adapters)
        .unwrap();
    let rows = compare(&table, &registry);

    assert!(table.get("b", "Complex app").is_none());
    assert_eq!(rows.len(), registry.len() - 1);
    assert!(rows.iter().all(|r| r.scenario_name != "Complex app"));
}

#[test]
fn compare_needs_two_adapters() {
    let clock = ManualClock::new();
    let registry = ScenarioRegistry::builtin();
    let mut adapters = vec![fixed_duration_probe("only", &clock, 1.0)];

    let table = manual_runner(2, 0, &clock)
        .run_all(&registry, &mut adapters)
        .unwrap();

    assert!(compare(&table, &registry).is_empty());
}

#[test]
fn no_adapters_when_every_loader_fails() {
    let loaders = vec![
        AdapterLoader::new("native", || {
            Err(BenchError::adapter_unavailable("native", "not built"))
        }),
        AdapterLoader::new("taffy", || {
            Err(BenchError::adapter_unavailable("taffy", "not built"))
        }),
    ];

    let result = BenchmarkRunner::new(BenchConfig::default())
        .run_all_with_loaders(&ScenarioRegistry::builtin(), &loaders);

    match result {
        Err(BenchError::NoAdaptersAvailable { attempted, results }) => {
            assert_eq!(attempted, vec!["native", "taffy"]);
            assert!(results.is_empty());
            assert!(results.adapters().is_empty());
        }
        other => panic!("expected NoAdaptersAvailable, got {:?}", other),
    }
}

#[test]
fn one_failed_loader_does_not_stop_the_other() {
    let loaders = vec![
        AdapterLoader::new("native", || {
            Err(BenchError::adapter_unavailable("native", "not built"))
        }),
        AdapterLoader::new("probe", || Ok(Box::new(ProbeAdapter::new("probe")) as _)),
    ];

    let table = BenchmarkRunner::new(BenchConfig::new(2, 1))
        .run_all_with_loaders(&ScenarioRegistry::builtin(), &loaders)
        .unwrap();

    assert_eq!(table.adapters().len(), 1);
    assert_eq!(table.adapters()[0].scenarios.len(), 4);
}

#[test]
fn every_iteration_failing_omits_the_scenario() {
    let clock = ManualClock::new();
    let registry = ScenarioRegistry::builtin();
    let broken = ProbeAdapter::new("broken")
        .with_layout_hook(|_| Err(AdapterError::Engine("always fails".into())));
    let mut adapters = vec![
        Box::new(broken) as Box<dyn LayoutAdapter>,
        fixed_duration_probe("ok", &clock, 1.0),
    ];

    let table = manual_runner(5, 2, &clock)
        .run_all(&registry, &mut adapters)
        .unwrap();

    assert!(table.adapter("broken").unwrap().scenarios.is_empty());
    assert_eq!(table.adapter("ok").unwrap().scenarios.len(), 4);
    assert!(compare(&table, &registry).is_empty());
}

#[test]
fn partial_failures_are_counted_as_dropped() {
    let clock = ManualClock::new();
    let ticking = clock.clone();
    let flaky = ProbeAdapter::new("flaky").with_layout_hook(move |call| {
        if call % 4 == 0 {
            return Err(AdapterError::Engine("flaky".into()));
        }
        ticking.advance(1.0);
        Ok(())
    });
    let mut registry = ScenarioRegistry::new();
    registry
        .register(ScenarioRegistry::builtin().get("Simple").unwrap().clone())
        .unwrap();
    let mut adapters = vec![Box::new(flaky) as Box<dyn LayoutAdapter>];

    // Calls 0..2 are warmup, 2..10 are measured; calls 4 and 8 fail
    let table = manual_runner(8, 2, &clock)
        .run_all(&registry, &mut adapters)
        .unwrap();

    let result = table.adapter("flaky").unwrap().get("Simple").unwrap();
    assert_eq!(result.dropped, 2);
    assert_eq!(result.summary.samples, 6);
    assert_eq!(result.summary.average, 1.0);
}

/// Adapter without explicit cleanup: relies on the default `release`
struct NoRelease {
    inner: ProbeAdapter,
}

impl LayoutAdapter for NoRelease {
    fn id(&self) -> &AdapterId {
        self.inner.id()
    }

    fn create_node(&mut self) -> AdapterResult<NodeHandle> {
        self.inner.create_node()
    }

    fn set_flex_direction(&mut self, node: NodeHandle, direction: FlexDirection) -> AdapterResult<()> {
        self.inner.set_flex_direction(node, direction)
    }

    fn set_width(&mut self, node: NodeHandle, width: f32) -> AdapterResult<()> {
        self.inner.set_width(node, width)
    }

    fn set_height(&mut self, node: NodeHandle, height: f32) -> AdapterResult<()> {
        self.inner.set_height(node, height)
    }

    fn set_flex_grow(&mut self, node: NodeHandle, grow: f32) -> AdapterResult<()> {
        self.inner.set_flex_grow(node, grow)
    }

    fn set_margin(&mut self, node: NodeHandle, edge: Edge, value: f32) -> AdapterResult<()> {
        self.inner.set_margin(node, edge, value)
    }

    fn set_padding(&mut self, node: NodeHandle, edge: Edge, value: f32) -> AdapterResult<()> {
        self.inner.set_padding(node, edge, value)
    }

    fn insert_child(&mut self, parent: NodeHandle, child: NodeHandle, index: usize) -> AdapterResult<()> {
        self.inner.insert_child(parent, child, index)
    }

    fn compute_layout(
        &mut self,
        root: NodeHandle,
        width: f32,
        height: f32,
        direction: LayoutDirection,
    ) -> AdapterResult<()> {
        self.inner.compute_layout(root, width, height, direction)
    }

    fn subtree_size(&self, root: NodeHandle) -> AdapterResult<usize> {
        self.inner.subtree_size(root)
    }
}

#[test]
fn adapter_without_release_is_measured() {
    let clock = ManualClock::new();
    let registry = ScenarioRegistry::builtin();
    let mut adapters = vec![Box::new(NoRelease {
        inner: ProbeAdapter::new("leaky"),
    }) as Box<dyn LayoutAdapter>];

    let table = manual_runner(2, 1, &clock)
        .run_all(&registry, &mut adapters)
        .unwrap();

    assert_eq!(table.adapter("leaky").unwrap().scenarios.len(), 4);
}

#[test]
fn report_renders_statistics_and_comparison() {
    let clock = ManualClock::new();
    let registry = ScenarioRegistry::builtin();
    let mut adapters = vec![
        fixed_duration_probe("native", &clock, 1.5),
        fixed_duration_probe("taffy", &clock, 3.0),
    ];

    let table = manual_runner(4, 1, &clock)
        .run_all(&registry, &mut adapters)
        .unwrap();
    let text = Report::new(&table, &registry).to_string();

    assert!(text.contains("== native =="));
    assert!(text.contains("1.500 ms"));
    assert!(text.contains("== comparison =="));
    assert!(text.contains("2.00x"));
    assert!(text.contains("geometric mean speedup 2.00x over 4 scenarios"));

    let json = JsonReport::new(BenchConfig::new(4, 1), &table, &registry)
        .to_json()
        .unwrap();
    assert!(json.contains("\"speedup_ratio\": 2.0"));
    assert!(json.contains("\"timestamp\""));
}

#[cfg(all(feature = "native-engine", feature = "taffy-engine"))]
mod builtin_engines {
    use super::*;
    use pretty_assertions::assert_eq;
    use strato_bench::builtin_loaders;
    use strato_bench::scenario::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

    #[test]
    fn builtin_adapters_build_expected_trees() {
        let registry = ScenarioRegistry::builtin();

        for loader in builtin_loaders() {
            let mut adapter = loader.load().unwrap();
            for scenario in &registry {
                let root = scenario.build(adapter.as_mut()).unwrap();
                assert_eq!(
                    adapter.subtree_size(root).unwrap(),
                    scenario.expected_node_count,
                    "{} under {}",
                    scenario.name,
                    loader.id()
                );
                adapter
                    .compute_layout(root, VIEWPORT_WIDTH, VIEWPORT_HEIGHT, LayoutDirection::Ltr)
                    .unwrap();
                adapter.release(root).unwrap();
            }
        }
    }

    #[test]
    fn full_run_compares_native_against_taffy() {
        let registry = ScenarioRegistry::builtin();
        let table = BenchmarkRunner::new(BenchConfig::new(3, 1))
            .run_all_with_loaders(&registry, &builtin_loaders())
            .unwrap();

        let ids: Vec<_> = table.adapters().iter().map(|a| a.adapter.as_str()).collect();
        assert_eq!(ids, vec!["native", "taffy"]);
        assert_eq!(compare(&table, &registry).len(), registry.len());
    }
}
