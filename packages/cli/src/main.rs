use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vigil_detect::{standard_library, DetectionReport, PredicateLibrary, Scenario};

mod demo;

/// Vigil offline global predicate detector
#[derive(Parser)]
#[command(name = "vigil", version)]
#[command(about = "Decide whether global predicates possibly or definitely held", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the built-in three-process demo and classify its predicates
    Demo {
        /// Sleep between producer steps, in milliseconds
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
        /// Classify process pairs on separate threads
        #[arg(long)]
        parallel: bool,
    },
    /// Replay a recorded execution from a JSON scenario file
    Analyze {
        /// Scenario file
        scenario: PathBuf,
        /// Classify process pairs on separate threads
        #[arg(long)]
        parallel: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let library = standard_library();

    let report = match cli.command {
        Commands::Demo { delay_ms, parallel } => {
            info!(delay_ms, parallel, "starting three-process demo");
            let (monitor, producers) = demo::spawn(parallel, Duration::from_millis(delay_ms))?;

            for (p, handle) in producers.into_iter().enumerate() {
                let result = handle
                    .join()
                    .map_err(|_| anyhow::anyhow!("producer p{p} panicked"))?;
                let final_state = result.with_context(|| format!("producer p{p} failed"))?;
                info!(process = p, final_state, "producer done");
            }

            monitor.run().context("detection failed")?
        }
        Commands::Analyze { scenario: path, parallel } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let mut scenario: Scenario<i64> = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            scenario.parallel |= parallel;

            let monitor = scenario.replay(library.clone()).context("replaying scenario")?;
            monitor.run().context("detection failed")?
        }
    };

    print_report(&report, &library);

    if !report.is_clean() {
        bail!("{} combination(s) could not be classified", report.failures().count());
    }
    Ok(())
}

fn print_report(report: &DetectionReport, library: &PredicateLibrary<i64>) {
    println!("{:<4} {:<24} {:<10} {:<9} {:<10}", "#", "predicate", "pair", "possibly", "definitely");
    for outcome in report.outcomes() {
        let combination = outcome.combination;
        let name = library.get(combination.predicate).map_or("?", |p| p.name());
        let pair = combination.pair().to_string();

        match &outcome.result {
            Ok(verdict) => println!(
                "{:<4} {:<24} {:<10} {:<9} {:<10}",
                combination.predicate, name, pair, verdict.possibly, verdict.definitely
            ),
            Err(err) => println!(
                "{:<4} {:<24} {:<10} error: {} [{}]",
                combination.predicate,
                name,
                pair,
                err,
                err.category()
            ),
        }
    }

    println!();
    for (index, name) in library.names().enumerate() {
        println!(
            "{:<4} {:<24} possibly={} definitely={}",
            index,
            name,
            report.possibly(index),
            report.definitely(index)
        );
    }
}
