//! Benchmark runner: warmup, measure, summarize for every adapter and scenario
//!
//! The run is strictly sequential: adapters in detection order, scenarios in
//! registry order, iterations one at a time. The [`ResultsTable`] is built
//! locally and handed back by value.

use crate::adapter::{
    detect_adapters, ensure_unique_loaders, AdapterId, AdapterLoader, LayoutAdapter,
};
use crate::config::BenchConfig;
use crate::error::{BenchError, ErrorContext, Result};
use crate::executor::{Clock, MonotonicClock, TimedExecutor};
use crate::logging::LogCategory;
use crate::scenario::{Scenario, ScenarioRegistry};
use crate::stats::{summarize, StatSummary};
use crate::{bench_debug, bench_info, bench_warn};
use serde::{Deserialize, Serialize};

/// Summary of one scenario under one adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario: String,
    pub summary: StatSummary,
    /// Measured iterations whose layout failed and were left out
    pub dropped: usize,
}

/// All scenario results for one adapter, in registry order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterResults {
    pub adapter: AdapterId,
    pub scenarios: Vec<ScenarioResult>,
}

impl AdapterResults {
    pub fn get(&self, scenario: &str) -> Option<&ScenarioResult> {
        self.scenarios.iter().find(|r| r.scenario == scenario)
    }
}

/// Adapter -> scenario -> summary, in adapter detection order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsTable {
    adapters: Vec<AdapterResults>,
}

impl ResultsTable {
    pub fn adapters(&self) -> &[AdapterResults] {
        &self.adapters
    }

    pub fn adapter(&self, adapter: &str) -> Option<&AdapterResults> {
        self.adapters.iter().find(|a| a.adapter.as_str() == adapter)
    }

    /// Summary for `scenario` under `adapter`, if it was measured
    pub fn get(&self, adapter: &str, scenario: &str) -> Option<&StatSummary> {
        self.adapter(adapter)?.get(scenario).map(|r| &r.summary)
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

/// Drives the two-phase warmup/measurement protocol
#[derive(Debug, Clone)]
pub struct BenchmarkRunner<C: Clock = MonotonicClock> {
    config: BenchConfig,
    executor: TimedExecutor<C>,
}

impl BenchmarkRunner<MonotonicClock> {
    pub fn new(config: BenchConfig) -> Self {
        Self::with_executor(config, TimedExecutor::new())
    }
}

impl<C: Clock> BenchmarkRunner<C> {
    pub fn with_executor(config: BenchConfig, executor: TimedExecutor<C>) -> Self {
        Self { config, executor }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Detect adapters from `loaders`, then run every scenario against them
    pub fn run_all_with_loaders(
        &self,
        registry: &ScenarioRegistry,
        loaders: &[AdapterLoader],
    ) -> Result<ResultsTable> {
        self.config.validate()?;
        ensure_unique_loaders(loaders)?;
        let mut adapters = detect_adapters(loaders);
        if adapters.is_empty() {
            return Err(BenchError::no_adapters(
                loaders.iter().map(|l| l.id().to_string()).collect(),
            ));
        }
        self.run_all(registry, &mut adapters)
    }

    /// Run every scenario against every adapter.
    ///
    /// Fails only on invalid configuration or when `adapters` is empty.
    /// Problems with a single (scenario, adapter) pair are logged and that
    /// pair is left out of the table.
    pub fn run_all(
        &self,
        registry: &ScenarioRegistry,
        adapters: &mut [Box<dyn LayoutAdapter>],
    ) -> Result<ResultsTable> {
        self.config.validate()?;
        if adapters.is_empty() {
            return Err(BenchError::no_adapters(Vec::new()));
        }

        bench_info!(
            LogCategory::Runner,
            adapters = adapters.len(),
            scenarios = registry.len(),
            iterations = self.config.iterations,
            warmup = self.config.warmup_iterations,
            "starting benchmark run"
        );

        let mut table = ResultsTable::default();
        for adapter in adapters.iter_mut() {
            let adapter = adapter.as_mut();
            let mut scenarios = Vec::with_capacity(registry.len());

            for scenario in registry {
                match self.measure(scenario, adapter) {
                    Ok(Some(result)) => scenarios.push(result),
                    Ok(None) => {}
                    Err(e) => {
                        bench_warn!(
                            LogCategory::Runner,
                            scenario = %scenario.name,
                            adapter = %adapter.id(),
                            "skipping scenario: {}",
                            e.format_for_log()
                        );
                    }
                }
            }

            table.adapters.push(AdapterResults {
                adapter: adapter.id().clone(),
                scenarios,
            });
        }

        Ok(table)
    }

    /// Measure one pair. `Ok(None)` means every measured iteration failed.
    fn measure(
        &self,
        scenario: &Scenario,
        adapter: &mut dyn LayoutAdapter,
    ) -> Result<Option<ScenarioResult>> {
        self.check_node_count(scenario, adapter)?;

        let warmup = self
            .executor
            .run_iterations(scenario, adapter, self.config.warmup_iterations)?;
        bench_debug!(
            LogCategory::Runner,
            scenario = %scenario.name,
            adapter = %adapter.id(),
            failures = warmup.failures,
            "warmup complete"
        );

        let batch = self
            .executor
            .run_iterations(scenario, adapter, self.config.iterations)?;
        if batch.failures > 0 {
            bench_warn!(
                LogCategory::Runner,
                scenario = %scenario.name,
                adapter = %adapter.id(),
                dropped = batch.failures,
                measured = batch.samples.len(),
                "layout failures dropped from measurement"
            );
        }
        if batch.samples.is_empty() {
            bench_warn!(
                LogCategory::Runner,
                scenario = %scenario.name,
                adapter = %adapter.id(),
                "every measured iteration failed; omitting scenario"
            );
            return Ok(None);
        }

        let summary = summarize(&batch.samples)?;
        bench_info!(
            LogCategory::Runner,
            scenario = %scenario.name,
            adapter = %adapter.id(),
            average_ms = summary.average,
            "scenario measured"
        );

        Ok(Some(ScenarioResult {
            scenario: scenario.name.clone(),
            summary,
            dropped: batch.failures,
        }))
    }

    fn check_node_count(&self, scenario: &Scenario, adapter: &mut dyn LayoutAdapter) -> Result<()> {
        let adapter_id = adapter.id().clone();
        let context = || {
            ErrorContext::new("check_node_count", "runner")
                .with_metadata("scenario", &scenario.name)
                .with_metadata("adapter", &adapter_id)
        };

        let root = scenario
            .build(adapter)
            .map_err(|e| BenchError::tree_build_with_context(e.to_string(), context()))?;
        let counted = adapter.subtree_size(root);
        if let Err(e) = adapter.release(root) {
            bench_warn!(LogCategory::Runner, scenario = %scenario.name, "failed to release tree: {}", e);
        }

        let counted =
            counted.map_err(|e| BenchError::tree_build_with_context(e.to_string(), context()))?;
        if counted != scenario.expected_node_count {
            return Err(BenchError::invalid_scenario_with_context(
                format!(
                    "built {} nodes, expected {}",
                    counted, scenario.expected_node_count
                ),
                context(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::NodeHandle;
    use crate::adapters::ProbeAdapter;
    use crate::error::AdapterResult;
    use crate::executor::ManualClock;
    use pretty_assertions::assert_eq;

    fn leaf(adapter: &mut dyn LayoutAdapter) -> AdapterResult<NodeHandle> {
        adapter.create_node()
    }

    fn leaf_registry(expected: usize) -> ScenarioRegistry {
        let mut registry = ScenarioRegistry::new();
        registry
            .register(Scenario::new("Leaf", "one node", expected, leaf))
            .unwrap();
        registry
    }

    fn probes(ids: &[&str]) -> Vec<Box<dyn LayoutAdapter>> {
        ids.iter()
            .map(|id| Box::new(ProbeAdapter::new(*id)) as Box<dyn LayoutAdapter>)
            .collect()
    }

    fn manual_runner(iterations: usize, warmup: usize) -> BenchmarkRunner<ManualClock> {
        BenchmarkRunner::with_executor(
            BenchConfig::new(iterations, warmup),
            TimedExecutor::with_clock(ManualClock::new()),
        )
    }

    #[test]
    fn test_table_keeps_adapter_order() {
        let runner = manual_runner(3, 1);
        let mut adapters = probes(&["second", "first"]);

        let table = runner.run_all(&leaf_registry(1), &mut adapters).unwrap();

        let ids: Vec<_> = table.adapters().iter().map(|a| a.adapter.as_str()).collect();
        assert_eq!(ids, vec!["second", "first"]);
        assert_eq!(table.get("first", "Leaf").unwrap().samples, 3);
        assert!(table.get("first", "Missing").is_none());
    }

    #[test]
    fn test_empty_adapter_list_is_no_adapters() {
        let runner = manual_runner(3, 1);
        let err = runner.run_all(&leaf_registry(1), &mut []).unwrap_err();
        match err {
            BenchError::NoAdaptersAvailable { attempted, results } => {
                assert!(attempted.is_empty());
                assert!(results.is_empty());
            }
            other => panic!("expected NoAdaptersAvailable, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_iterations_rejected_before_running() {
        let runner = manual_runner(0, 1);
        let err = runner
            .run_all(&leaf_registry(1), &mut probes(&["a"]))
            .unwrap_err();
        assert!(matches!(err, BenchError::Configuration { .. }));
    }

    #[test]
    fn test_duplicate_loaders_rejected_before_detection() {
        let loaders = vec![
            AdapterLoader::new("a", || Ok(Box::new(ProbeAdapter::new("a")) as _)),
            AdapterLoader::new("a", || Ok(Box::new(ProbeAdapter::new("a")) as _)),
        ];
        let err = manual_runner(3, 1)
            .run_all_with_loaders(&leaf_registry(1), &loaders)
            .unwrap_err();
        assert!(matches!(err, BenchError::Configuration { .. }));
    }

    #[test]
    fn test_node_count_mismatch_skips_pair() {
        let runner = manual_runner(3, 1);
        let table = runner
            .run_all(&leaf_registry(2), &mut probes(&["a"]))
            .unwrap();

        assert_eq!(table.adapters().len(), 1);
        assert!(table.adapters()[0].scenarios.is_empty());
    }
}
