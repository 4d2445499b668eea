/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use ncs_cost::config::SystemConfig;
use ncs_cost::cost::{CostEvaluator, LoopCost};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Steady-state LQG cost of periodic channel schedules.
///
/// Example:
///   ncs-cost --config loops.yaml --schedule 0,1,0,1 --breakdown
#[derive(Debug, Parser)]
#[command(
    name = "ncs-cost",
    about = "Evaluate the LQG cost of periodic channel schedules",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML loop-set file.
    #[arg(short = 'c', long = "config")]
    config: PathBuf,

    /// Schedule to evaluate as comma-separated allocation indices.  May be
    /// repeated; schedules listed in the file are evaluated as well.
    #[arg(short = 's', long = "schedule", value_parser = parse_schedule)]
    schedules: Vec<Schedule>,

    /// Print the allocation table (index → served loops).
    #[arg(short = 'l', long = "list-allocations", default_value_t = false)]
    list_allocations: bool,

    /// Print each loop's contribution, not only the total.
    #[arg(short = 'b', long = "breakdown", default_value_t = false)]
    breakdown: bool,

    /// Override the cost reported for an unserved unstable loop.
    #[arg(long = "max-cost")]
    max_cost: Option<f64>,
}

/// One `--schedule` value.
#[derive(Debug, Clone)]
struct Schedule(Vec<usize>);

fn parse_schedule(s: &str) -> Result<Schedule, String> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .map_err(|e| format!("invalid allocation index {part:?}: {e}"))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Schedule)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // ── Logging ───────────────────────────────────────────────────────────────
    // RUST_LOG=debug shows per-loop solver details
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        config           = %cli.config.display(),
        schedules        = cli.schedules.len(),
        list_allocations = cli.list_allocations,
        breakdown        = cli.breakdown,
        max_cost         = ?cli.max_cost,
        "Configuration"
    );

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = SystemConfig::load_from_file(&cli.config)?;
    if let Some(max_cost) = cli.max_cost {
        config.max_cost = max_cost;
    }

    let evaluator = config
        .build_evaluator()
        .with_context(|| format!("Invalid loop set in {}", cli.config.display()))?;

    if cli.list_allocations {
        list_allocations(&evaluator);
    }

    let schedules: Vec<Vec<usize>> = config
        .schedules
        .iter()
        .cloned()
        .chain(cli.schedules.into_iter().map(|s| s.0))
        .collect();

    if schedules.is_empty() {
        if !cli.list_allocations {
            warn!("No schedules given; use --schedule or a `schedules:` list in the file");
        }
        return Ok(());
    }

    for schedule in &schedules {
        if let Some(period) = config.period {
            if schedule.len() != period {
                warn!(
                    ?schedule,
                    period,
                    "Schedule length differs from the configured period"
                );
            }
        }
        report(&evaluator, schedule, cli.breakdown)
            .with_context(|| format!("Cannot evaluate schedule {schedule:?}"))?;
    }

    Ok(())
}

fn list_allocations(evaluator: &CostEvaluator) {
    let table = evaluator.table();
    info!(
        "{} allocation(s) for {} loop(s) on {} channel(s):",
        table.len(),
        table.n_loops(),
        table.n_channels()
    );
    for (index, loops) in table.iter() {
        info!("  [{index}]  loops={loops:?}");
    }
}

fn report(evaluator: &CostEvaluator, schedule: &[usize], breakdown: bool) -> Result<()> {
    let costs = evaluator.loop_costs(schedule)?;

    if breakdown {
        for entry in &costs.loops {
            match entry {
                LoopCost::Served { loop_id, cost } => {
                    info!("  loop {loop_id}: {cost:.6} (served)")
                }
                LoopCost::Idle { loop_id, cost } => {
                    info!("  loop {loop_id}: {cost:.6} (never served, stable)")
                }
                LoopCost::Unstable { loop_id } => {
                    warn!("  loop {loop_id}: never served and open-loop unstable")
                }
            }
        }
    }

    if costs.is_capped() {
        warn!(?schedule, cost = costs.total(), "Schedule cost capped at max_cost");
    } else {
        info!(?schedule, cost = costs.total(), "Schedule cost");
    }
    Ok(())
}
