//! # Arena Application Logic
//!
//! [`run`] turns parsed command-line [`Args`] into an evaluation run: it builds
//! the environment and policy, plays the requested number of episodes, and,
//! when a log directory is given, writes one JSON record per episode to
//! `<log_dir>/<app>_<policy>_<persona>_eval.jsonl`.

use anyhow::{Context, Result};
use rl::{evaluate, EvalReport, JsonLinesRecorder};
use std::fs::{self, File};
use std::io::BufWriter;

use crate::cli::Args;

/// Run an evaluation as described by `args`.
///
/// # Errors
///
/// Returns any error produced while creating the log file, playing an
/// episode, or writing a record.
pub fn run(args: &Args) -> Result<EvalReport> {
    let config = args.eval_config();

    let report = if let Some(dir) = &args.log_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
        let path = dir.join(config.log_file_name());
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        tracing::info!("Saving evaluation to: {}", path.display());

        let mut recorder = JsonLinesRecorder::new(BufWriter::new(file));
        let report = evaluate(&config, |outcome| recorder.record(outcome))?;
        recorder.finish()?;
        report
    } else {
        evaluate(&config, |_| Ok(()))?
    };

    let summary = &report.summary;
    tracing::info!(
        episodes = summary.episodes,
        mean_reward = summary.mean_reward,
        min_reward = summary.min_reward,
        max_reward = summary.max_reward,
        mean_ticks = summary.mean_ticks,
        terminated = summary.terminated,
        truncated = summary.truncated,
        "Evaluation complete."
    );
    for (ending, count) in &summary.endings {
        tracing::info!("  {ending}: {count}");
    }

    Ok(report)
}
