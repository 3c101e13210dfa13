//! # Evaluation Runs
//!
//! Plays a fixed number of episodes of one app/persona/policy combination,
//! streams every [`EpisodeOutcome`] to a caller supplied sink such as
//! [`JsonLinesRecorder`] and condenses the run into a [`Summary`].

use anyhow::{Context, Result};
use envs::{App, Env, FlappyConfig, FlappyEnv, Persona, WebFlowConfig, WebFlowEnv};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

use crate::episode::{run_episode, EpisodeOutcome, OutcomeDetail, TerminalCause};
use crate::policy::PolicyKind;

#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub app: App,
    pub persona: Persona,
    pub policy: PolicyKind,
    pub episodes: usize,
    /// Base seed. Episode `k` (1-based) resets with `seed + k - 1`; the policy
    /// is seeded with `seed`.
    pub seed: u64,
    /// Overrides the app's default tick limit
    pub max_steps: Option<u32>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            app: App::Flappy,
            persona: Persona::Explorer,
            policy: PolicyKind::Random,
            episodes: 30,
            seed: 7,
            max_steps: None,
        }
    }
}

impl EvalConfig {
    /// Builds the environment described by this config.
    #[must_use]
    pub fn build_env(&self) -> Box<dyn Env + Send> {
        let seed = Some(self.seed);
        match self.app {
            App::Flappy => {
                let mut config = FlappyConfig::default();
                if let Some(max_steps) = self.max_steps {
                    config.max_steps = max_steps;
                }
                Box::new(FlappyEnv::with_config(config, self.persona, seed))
            }
            App::WebFlow => {
                let mut config = WebFlowConfig::default();
                if let Some(max_steps) = self.max_steps {
                    config.max_steps = max_steps;
                }
                Box::new(WebFlowEnv::with_config(config, self.persona, seed))
            }
        }
    }

    /// File name of the outcome log, `<app>_<policy>_<persona>_eval.jsonl`.
    #[must_use]
    pub fn log_file_name(&self) -> String {
        format!("{}_{}_{}_eval.jsonl", self.app, self.policy, self.persona)
    }
}

/// Writes one JSON object per line.
pub struct JsonLinesRecorder<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesRecorder<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// # Errors
    ///
    /// Propagates serialization and I/O failures.
    pub fn record<T: Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, value).context("failed to serialize record")?;
        self.writer.write_all(b"\n").context("failed to write record")?;
        Ok(())
    }

    /// # Errors
    ///
    /// Propagates the flush failure of the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush().context("failed to flush records")?;
        Ok(self.writer)
    }
}

/// Aggregate statistics of an evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub episodes: usize,
    pub mean_reward: f64,
    pub min_reward: f64,
    pub max_reward: f64,
    pub mean_ticks: f64,
    pub terminated: usize,
    pub truncated: usize,
    /// Death reasons for flappy, final pages for web flow
    pub endings: BTreeMap<String, usize>,
}

impl Summary {
    #[must_use]
    pub fn from_outcomes(outcomes: &[EpisodeOutcome]) -> Self {
        let n = outcomes.len();
        let mut summary = Self {
            episodes: n,
            mean_reward: 0.0,
            min_reward: 0.0,
            max_reward: 0.0,
            mean_ticks: 0.0,
            terminated: 0,
            truncated: 0,
            endings: BTreeMap::new(),
        };
        if n == 0 {
            return summary;
        }

        summary.min_reward = f64::INFINITY;
        summary.max_reward = f64::NEG_INFINITY;
        let mut reward_sum = 0.0;
        let mut tick_sum = 0.0;
        for outcome in outcomes {
            reward_sum += outcome.total_reward;
            tick_sum += f64::from(outcome.ticks);
            summary.min_reward = summary.min_reward.min(outcome.total_reward);
            summary.max_reward = summary.max_reward.max(outcome.total_reward);
            match outcome.cause {
                TerminalCause::Terminated => summary.terminated += 1,
                TerminalCause::Truncated => summary.truncated += 1,
            }
            let ending = match outcome.detail {
                OutcomeDetail::Flappy { death_reason, .. } => {
                    death_reason.map_or("none", |r| r.as_str())
                }
                OutcomeDetail::WebFlow { final_page, .. } => final_page.as_str(),
            };
            *summary.endings.entry(ending.to_owned()).or_default() += 1;
        }
        summary.mean_reward = reward_sum / n as f64;
        summary.mean_ticks = tick_sum / n as f64;
        summary
    }
}

#[derive(Debug, Clone)]
pub struct EvalReport {
    pub outcomes: Vec<EpisodeOutcome>,
    pub summary: Summary,
}

/// Runs `config.episodes` episodes, handing every outcome to `on_outcome` as
/// soon as the episode ends.
///
/// # Errors
///
/// Fails if an episode is rejected by the environment or `on_outcome` fails.
pub fn evaluate<F>(config: &EvalConfig, mut on_outcome: F) -> Result<EvalReport>
where
    F: FnMut(&EpisodeOutcome) -> Result<()>,
{
    let mut env = config.build_env();
    let mut policy = config.policy.build(config.app, env.action_size(), config.seed)?;

    tracing::info!(
        app = %config.app,
        persona = %config.persona,
        policy = %config.policy,
        episodes = config.episodes,
        seed = config.seed,
        "starting evaluation"
    );

    let mut outcomes = Vec::with_capacity(config.episodes);
    for episode in 1..=config.episodes {
        let seed = config.seed.wrapping_add(episode as u64 - 1);
        let rollout = run_episode(&mut env, &mut policy, Some(seed))
            .with_context(|| format!("episode {episode} failed"))?;
        let outcome = EpisodeOutcome::new(episode, config.app, config.persona, rollout);

        on_outcome(&outcome)?;
        tracing::info!(
            "Episode {}/{} complete. reward={:.3} ticks={} cause={:?}",
            episode,
            config.episodes,
            outcome.total_reward,
            outcome.ticks,
            outcome.cause
        );
        outcomes.push(outcome);
    }

    let summary = Summary::from_outcomes(&outcomes);
    Ok(EvalReport { outcomes, summary })
}
