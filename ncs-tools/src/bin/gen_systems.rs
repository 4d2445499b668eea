/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Random loop-set generator.
//!
//! Writes a YAML file that `ncs-cost --config` accepts directly.
//!
//! ```text
//! gen-systems -n 3 -m 2 -p 2 --loops 4 --unstable 2,4 --seed 7 --out loops.yaml
//! ```
//!
//! Without `--out` the YAML goes to stdout.

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};

use ncs_cost::config::SystemConfig;
use ncs_cost::generator::SystemGenerator;
use ncs_cost::model::Dimensions;

#[derive(Debug, Parser)]
#[command(
    name = "gen-systems",
    about = "Generate a random ncs-cost loop set",
    long_about = None,
)]
struct Cli {
    /// State dimension.
    #[arg(short = 'n', default_value_t = 2)]
    n: usize,

    /// Input dimension.
    #[arg(short = 'm', default_value_t = 1)]
    m: usize,

    /// Output dimension.
    #[arg(short = 'p', default_value_t = 1)]
    p: usize,

    /// Number of loops.
    #[arg(long = "loops", default_value_t = 2)]
    loops: usize,

    /// 1-based ids of loops that must be open-loop unstable.
    #[arg(long = "unstable", value_delimiter = ',')]
    unstable: Vec<usize>,

    /// RNG seed.
    #[arg(long = "seed", default_value_t = 0)]
    seed: u64,

    /// Channels per time step, written into the config.
    #[arg(long = "channels", default_value_t = 1)]
    channels: usize,

    /// Output file; stdout when omitted.
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(&bad) = cli.unstable.iter().find(|&&id| id == 0 || id > cli.loops) {
        bail!("--unstable id {bad} is outside 1..={}", cli.loops);
    }

    let stable: Vec<bool> = (1..=cli.loops)
        .map(|id| !cli.unstable.contains(&id))
        .collect();
    let dims = Dimensions {
        n: cli.n,
        m: cli.m,
        p: cli.p,
    };

    info!(
        loops    = cli.loops,
        n        = dims.n,
        m        = dims.m,
        p        = dims.p,
        unstable = ?cli.unstable,
        seed     = cli.seed,
        "Generating loop set"
    );

    let models = SystemGenerator::new(cli.seed)
        .generate(dims, &stable)
        .context("Loop generation failed")?;
    let config = SystemConfig::from_models(&models, cli.channels);

    match &cli.out {
        Some(path) => config.save_to_file(path)?,
        None => {
            let yaml =
                serde_yaml::to_string(&config).context("Failed to serialise configuration")?;
            print!("{yaml}");
        }
    }
    Ok(())
}
