// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Command-line planner.
//!
//! Loads a MovingAI map, takes agents from a scenario file (or places them
//! at random), solves, checks the result and writes a `key=value` report.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use tracing::{info, warn};

use lacam::metrics::{self, RunInfo};
use lacam::{solve, Deadline, Graph, Instance, PlannerConfig, StateSpace};

#[derive(Parser, Debug)]
#[command(name = "lacam")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multi-agent path finding with goal sequences", long_about = None)]
struct Cli {
    /// MovingAI map file
    #[arg(short, long)]
    map: PathBuf,

    /// MovingAI scenario file; agents are placed at random without one
    #[arg(short = 'i', long)]
    scen: Option<PathBuf>,

    /// Number of agents
    #[arg(short = 'N', long, default_value_t = 1)]
    num: usize,

    /// Seed for instance generation and tie-breaking
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Time limit in milliseconds
    #[arg(short, long, default_value_t = 3000)]
    time_limit_ms: u64,

    /// 0 quiet, 1 summaries, 2 progress
    #[arg(short, long, default_value_t = 0)]
    verbose: u8,

    /// Goal-stage advances that count as solved (default: every goal)
    #[arg(long)]
    threshold: Option<usize>,

    /// Let agents enter cells vacated in the same step
    #[arg(long)]
    allow_following: bool,

    /// Report file
    #[arg(short, long, default_value = "./build/result.txt")]
    output: PathBuf,

    /// Leave the configurations out of the report
    #[arg(short, long)]
    log_short: bool,
}

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let graph = Graph::load(&cli.map)
        .with_context(|| format!("Failed to load map {}", cli.map.display()))?;
    let mut space = StateSpace::new(Arc::new(graph));
    let mut rng = ChaCha12Rng::seed_from_u64(cli.seed);

    let instance = match &cli.scen {
        Some(scen) => Instance::load_scenario(&mut space, scen, cli.num)
            .with_context(|| format!("Failed to load scenario {}", scen.display()))?,
        None => Instance::random(&mut space, &mut rng, cli.num)?,
    };
    instance.validate(&space).context("Invalid instance")?;

    let config = PlannerConfig::default()
        .with_verbose(cli.verbose)
        .with_threshold(cli.threshold)
        .with_allow_following(cli.allow_following);
    let deadline = Deadline::new(cli.time_limit_ms);
    let solution = solve(&mut space, &instance, &config, Some(&deadline), Some(&mut rng));
    let comp_time_ms = deadline.elapsed_ms();

    if solution.is_empty() {
        warn!(comp_time_ms, "failed to solve");
    } else if !metrics::is_feasible_solution(
        &mut space,
        &instance,
        &solution,
        cli.threshold,
        cli.allow_following,
    ) {
        bail!("Planner returned an infeasible solution");
    }
    metrics::log_stats(&mut space, &instance, &solution, comp_time_ms);

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let file = File::create(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;
    let run = RunInfo {
        map_name: cli
            .map
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        solver: "lacam".to_string(),
        comp_time_ms,
        seed: cli.seed,
        log_short: cli.log_short,
    };
    let mut writer = BufWriter::new(file);
    metrics::write_log(&mut writer, &mut space, &instance, &solution, &run)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    info!(output = %cli.output.display(), "report written");
    Ok(())
}
