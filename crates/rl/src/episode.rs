use anyhow::{Context, Result};
use envs::{App, DeathReason, Env, Page, Persona, Snapshot};
use serde::Serialize;

use crate::policy::Policy;

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalCause {
    Terminated,
    Truncated,
}

/// App-specific fields recorded at the end of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutcomeDetail {
    Flappy {
        pipes_passed: u32,
        death_reason: Option<DeathReason>,
    },
    WebFlow {
        final_page: Page,
        error_flag: bool,
    },
}

impl From<Snapshot> for OutcomeDetail {
    fn from(snapshot: Snapshot) -> Self {
        match snapshot {
            Snapshot::Flappy { pipes_passed, death_reason, .. } => {
                OutcomeDetail::Flappy { pipes_passed, death_reason }
            }
            Snapshot::WebFlow { page, has_error, .. } => {
                OutcomeDetail::WebFlow { final_page: page, error_flag: has_error }
            }
        }
    }
}

/// Everything [`run_episode`] observed while playing one episode.
#[derive(Debug, Clone, PartialEq)]
pub struct Rollout {
    pub total_reward: f64,
    pub ticks: u32,
    pub cause: TerminalCause,
    pub detail: OutcomeDetail,
}

/// One record of the evaluation log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeOutcome {
    pub episode: usize,
    pub app: App,
    pub persona: Persona,
    pub total_reward: f64,
    pub ticks: u32,
    pub cause: TerminalCause,
    #[serde(flatten)]
    pub detail: OutcomeDetail,
}

impl EpisodeOutcome {
    #[must_use]
    pub fn new(episode: usize, app: App, persona: Persona, rollout: Rollout) -> Self {
        Self {
            episode,
            app,
            persona,
            total_reward: rollout.total_reward,
            ticks: rollout.ticks,
            cause: rollout.cause,
            detail: rollout.detail,
        }
    }
}

/// Resets `env` and plays until it reports termination or truncation.
///
/// The environment's own tick limit is the only stopping rule, so every
/// episode is finite.
///
/// # Errors
///
/// Fails if the policy picks an action outside the action space.
pub fn run_episode<E, P>(env: &mut E, policy: &mut P, seed: Option<u64>) -> Result<Rollout>
where
    E: Env + ?Sized,
    P: Policy + ?Sized,
{
    let mut obs = env.reset(seed);
    let mut total_reward = 0.0_f64;
    let mut ticks = 0_u32;
    loop {
        let action = policy.act(&obs);
        let t = env
            .step(action)
            .with_context(|| format!("step {} rejected action {action}", ticks + 1))?;
        ticks += 1;
        total_reward += t.reward;
        if t.terminated || t.truncated {
            let cause = if t.terminated {
                TerminalCause::Terminated
            } else {
                TerminalCause::Truncated
            };
            return Ok(Rollout {
                total_reward,
                ticks,
                cause,
                detail: env.snapshot().into(),
            });
        }
        obs = t.obs;
    }
}
