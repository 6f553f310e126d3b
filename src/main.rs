//! StratoSDK layout benchmark command line

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use strato_bench::{
    bench_error, bench_info, builtin_loaders, select_loaders, AdapterLoader, BenchmarkRunner,
    HarnessConfig, JsonReport, LogCategory, Report, ResultsTable, ScenarioRegistry,
};

/// Compare layout engines on a fixed set of scenario trees
///
/// Every scenario is built fresh for each iteration and only the layout
/// computation is timed. The native engine is adapter A and Taffy is
/// adapter B; a speedup above 1 means native was faster.
///
/// # Examples
///
/// ```bash
/// # 100 measured iterations after 10 warmup iterations
/// strato-layout-bench
///
/// # 500 iterations, 50 warmup, Grid scenario only, JSON export
/// strato-layout-bench 500 50 --scenario Grid --json results.json
/// ```
#[derive(Parser, Debug)]
#[command(name = "strato-layout-bench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Measured iterations per scenario and engine [default: 100]
    iterations: Option<usize>,

    /// Discarded warmup iterations per scenario and engine [default: 10]
    warmup: Option<usize>,

    /// Only run the named scenario (repeatable)
    #[arg(long = "scenario", value_name = "NAME")]
    scenarios: Vec<String>,

    /// Only run the named engine (repeatable)
    #[arg(long = "engine", value_name = "ENGINE", value_parser = ["native", "taffy"])]
    engines: Vec<String>,

    /// JSON configuration file; flags given here override it
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Also write the results as JSON to this path
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Decimal places for millisecond values
    #[arg(long, value_name = "N")]
    precision: Option<usize>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn harness_config(&self) -> anyhow::Result<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => HarnessConfig::default(),
        };

        if let Some(iterations) = self.iterations {
            config.bench.iterations = iterations;
        }
        if let Some(warmup) = self.warmup {
            config.bench.warmup_iterations = warmup;
        }
        if let Some(precision) = self.precision {
            config.report.precision = precision;
        }
        if self.json.is_some() {
            config.report.json_output = self.json.clone();
        }
        match self.verbose {
            0 => {}
            1 => config.logging.set_verbosity("debug"),
            _ => config.logging.set_verbosity("trace"),
        }

        config.bench.validate()?;
        Ok(config)
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.harness_config()?;
    strato_bench::init(&config);

    let registry = ScenarioRegistry::builtin().filter(&cli.scenarios)?;
    let loaders = select_loaders(builtin_loaders(), &cli.engines)?;
    bench_info!(
        LogCategory::Core,
        scenarios = registry.len(),
        engines = loaders.len(),
        iterations = config.bench.iterations,
        "strato-layout-bench {}",
        strato_layout_bench::VERSION
    );

    let table = run_benchmark(&config, &registry, &loaders)?;

    print!(
        "{}",
        Report::new(&table, &registry).with_precision(config.report.precision)
    );

    if let Some(path) = &config.report.json_output {
        JsonReport::new(config.bench, &table, &registry)
            .write_json(path)
            .with_context(|| format!("writing {}", path.display()))?;
        bench_info!(LogCategory::Core, path = %path.display(), "JSON report written");
    }

    Ok(())
}

fn run_benchmark(
    config: &HarnessConfig,
    registry: &ScenarioRegistry,
    loaders: &[AdapterLoader],
) -> anyhow::Result<ResultsTable> {
    BenchmarkRunner::new(config.bench)
        .run_all_with_loaders(registry, loaders)
        .map_err(|e| {
            bench_error!(LogCategory::Core, "benchmark run failed: {}", e.format_for_log());
            anyhow::Error::new(e).context("benchmark run failed")
        })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
