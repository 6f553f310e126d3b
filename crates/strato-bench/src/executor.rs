//! Timed executor: build one tree, time only its layout computation
//!
//! Tree construction and teardown are never part of a sample. The same
//! [`TimedExecutor::run_iterations`] primitive drives both warmup and
//! measurement.

use crate::adapter::{LayoutAdapter, LayoutDirection};
use crate::error::{BenchError, ErrorContext, Result};
use crate::logging::LogCategory;
use crate::scenario::{Scenario, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::{bench_trace, bench_warn};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Source of timestamps in fractional milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Monotonic wall clock relative to its creation
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Outcome of a series of timed runs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IterationBatch {
    /// Successful durations in milliseconds, in run order
    pub samples: Vec<f64>,
    /// Iterations whose layout computation failed
    pub failures: usize,
}

impl IterationBatch {
    pub fn attempted(&self) -> usize {
        self.samples.len() + self.failures
    }
}

/// Runs scenarios against adapters and times the layout call
#[derive(Debug, Clone)]
pub struct TimedExecutor<C: Clock = MonotonicClock> {
    clock: C,
    width: f32,
    height: f32,
    direction: LayoutDirection,
}

impl TimedExecutor<MonotonicClock> {
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for TimedExecutor<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TimedExecutor<C> {
    /// Executor over the standard 800x600 left-to-right viewport
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
            direction: LayoutDirection::Ltr,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Build a fresh tree, time one layout computation, then release the tree.
    ///
    /// The tree is released even when the layout fails. A failed release is
    /// logged and does not affect the sample.
    pub fn run(&self, scenario: &Scenario, adapter: &mut dyn LayoutAdapter) -> Result<f64> {
        let root = scenario.build(adapter).map_err(|e| {
            BenchError::tree_build_with_context(
                e.to_string(),
                ErrorContext::new("build", "executor")
                    .with_metadata("scenario", &scenario.name)
                    .with_metadata("adapter", adapter.id()),
            )
        })?;

        let start = self.clock.now_ms();
        let outcome = adapter.compute_layout(root, self.width, self.height, self.direction);
        let elapsed = self.clock.now_ms() - start;

        if let Err(e) = adapter.release(root) {
            bench_warn!(
                LogCategory::Executor,
                scenario = %scenario.name,
                adapter = %adapter.id(),
                "failed to release tree: {}",
                e
            );
        }

        outcome.map_err(|e| {
            BenchError::layout_with_context(
                e.to_string(),
                ErrorContext::new("compute_layout", "executor")
                    .with_metadata("scenario", &scenario.name)
                    .with_metadata("adapter", adapter.id()),
            )
        })?;

        bench_trace!(LogCategory::Executor, scenario = %scenario.name, elapsed_ms = elapsed, "layout timed");
        Ok(elapsed)
    }

    /// Run `count` iterations, collecting successful samples.
    ///
    /// Layout failures are logged and counted. Any other error, such as a
    /// tree that cannot be built, stops the batch.
    pub fn run_iterations(
        &self,
        scenario: &Scenario,
        adapter: &mut dyn LayoutAdapter,
        count: usize,
    ) -> Result<IterationBatch> {
        let mut batch = IterationBatch {
            samples: Vec::with_capacity(count),
            failures: 0,
        };

        for iteration in 0..count {
            match self.run(scenario, adapter) {
                Ok(elapsed) => batch.samples.push(elapsed),
                Err(e @ BenchError::LayoutComputationFailure { .. }) => {
                    bench_warn!(
                        LogCategory::Executor,
                        iteration,
                        "dropping sample: {}",
                        e.format_for_log()
                    );
                    batch.failures += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(batch)
    }
}
