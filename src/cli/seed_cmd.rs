//! Seed command - Print random seeds, optionally drawn by worker processes.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::WorkerError;
use crate::seed;

pub fn cmd_seed(
    cfg: &Config,
    config_path: Option<&Path>,
    count: Option<usize>,
    workers: Option<usize>,
    init_parent: bool,
) -> Result<()> {
    let count = count.unwrap_or(cfg.seed.count);
    let workers = workers.unwrap_or(cfg.seed.workers);

    if init_parent {
        let seed = seed::get_random_seed();
        debug!(seed, "Initialized parent seed generator");
    }

    let seeds = if workers == 0 {
        (0..count).map(|_| seed::get_random_seed()).collect()
    } else {
        let program = std::env::current_exe().context("locating simcore executable")?;
        draw_in_workers(&program, config_path, count, workers)?
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for seed in seeds {
        writeln!(out, "{}", seed)?;
    }
    Ok(())
}

/// Split `count` draws across `workers` child processes running
/// `seed --workers 0`, collecting their output in worker order.
///
/// Children are independent processes, so each builds its own generator.
pub fn draw_in_workers(
    program: &Path,
    config_path: Option<&Path>,
    count: usize,
    workers: usize,
) -> std::result::Result<Vec<u32>, WorkerError> {
    let shares = split_tasks(count, workers);
    info!(count, workers = shares.len(), "Drawing seeds in worker processes");

    let mut children: Vec<(usize, Child)> = Vec::with_capacity(shares.len());
    for (worker, share) in shares.into_iter().enumerate() {
        let mut cmd = Command::new(program);
        if let Some(path) = config_path {
            cmd.arg("--config").arg(path);
        }
        cmd.args(["seed", "--workers", "0", "--count"])
            .arg(share.to_string())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        match cmd.spawn() {
            Ok(child) => {
                debug!(worker, pid = child.id(), share, "Spawned seed worker");
                children.push((worker, child));
            }
            Err(source) => {
                reap_workers(children);
                return Err(WorkerError::Spawn { worker, source });
            }
        }
    }

    let mut seeds = Vec::with_capacity(count);
    let mut pending = children.into_iter();
    while let Some((worker, child)) = pending.next() {
        if let Err(e) = collect_worker(worker, child, &mut seeds) {
            reap_workers(pending);
            return Err(e);
        }
    }
    Ok(seeds)
}

/// Wait for one worker and append its seeds.
fn collect_worker(
    worker: usize,
    child: Child,
    seeds: &mut Vec<u32>,
) -> std::result::Result<(), WorkerError> {
    let output = child
        .wait_with_output()
        .map_err(|source| WorkerError::Spawn { worker, source })?;
    if !output.status.success() {
        return Err(WorkerError::Failed {
            worker,
            status: output.status,
        });
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        let seed = line.trim().parse::<u32>().map_err(|_| WorkerError::BadOutput {
            worker,
            line: line.to_string(),
        })?;
        seeds.push(seed);
    }
    Ok(())
}

/// Kill and wait for workers whose output is no longer wanted.
fn reap_workers(children: impl IntoIterator<Item = (usize, Child)>) {
    for (worker, mut child) in children {
        // Already-exited children still need the wait below.
        let _ = child.kill();
        if let Err(e) = child.wait() {
            warn!(worker, error = %e, "Failed to reap seed worker");
        }
    }
}

/// Divide `count` tasks as evenly as possible; workers left with nothing to
/// do are dropped.
fn split_tasks(count: usize, workers: usize) -> Vec<usize> {
    if workers == 0 {
        return Vec::new();
    }
    let base = count / workers;
    let extra = count % workers;
    (0..workers)
        .map(|i| base + usize::from(i < extra))
        .filter(|&share| share > 0)
        .collect()
}
